#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod combinator;
pub mod grammar;
mod lexer;
pub mod state;

use anyhow::{Context, Result};
use benzene_ast::ast::Node;
use benzene_ast::diag::Diagnostics;
use benzene_ast::token::Token;
use serde::Serialize;
use std::path::Path;

pub use lexer::{tokenize, Lexed};
pub use state::{Checkpoint, ParseOptions, ParseState};

/// A parsed source file: the top-level forest and every lexer and parser
/// diagnostic, in the order they were produced.
#[derive(Debug, Clone, Serialize)]
pub struct Parsed {
    pub forest: Vec<Node>,
    pub diagnostics: Diagnostics,
}

pub fn parse(tokens: &[Token]) -> (Vec<Node>, Diagnostics) {
    parse_with(tokens, ParseOptions::default())
}

pub fn parse_with(tokens: &[Token], options: ParseOptions) -> (Vec<Node>, Diagnostics) {
    let mut state = ParseState::with_options(tokens, options);
    let forest = grammar::program(&mut state);
    (forest, state.into_diagnostics())
}

pub fn parse_str(src: &str) -> Parsed {
    parse_str_with(src, ParseOptions::default())
}

pub fn parse_str_with(src: &str, options: ParseOptions) -> Parsed {
    let lexed = tokenize(src);
    let (forest, parse_diags) = parse_with(&lexed.tokens, options);
    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(parse_diags);
    Parsed {
        forest,
        diagnostics,
    }
}

pub fn parse_file(path: impl AsRef<Path>, options: ParseOptions) -> Result<Parsed> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_str_with(&src, options))
}
