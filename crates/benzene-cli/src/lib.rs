#![forbid(unsafe_code)]
#![deny(unused_must_use)]

pub mod report;

use anyhow::{bail, Context, Result};
use benzene_ast::ast::Node;
use benzene_ast::diag::Diagnostics;
use benzene_parse::{parse_str_with, ParseOptions};
use benzene_resolve::{resolve, SymbolTable};
use std::path::Path;

/// Maximum source file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: u64 = 1_000_000;

pub fn read_source(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if meta.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            meta.len()
        );
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Result of the full parse + resolve pipeline over one file.
pub struct Checked {
    pub forest: Vec<Node>,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
}

/// Parse and resolve `src`. Resolution runs on whatever the parser
/// recovered, so one pass reports both kinds of problems.
pub fn check_source(src: &str, options: ParseOptions) -> Checked {
    let parsed = parse_str_with(src, options);
    let mut forest = parsed.forest;
    let mut diagnostics = parsed.diagnostics;
    let symbols = resolve(&mut forest, &mut diagnostics);
    Checked {
        forest,
        symbols,
        diagnostics,
    }
}
