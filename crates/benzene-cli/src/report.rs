//! Human and machine output for diagnostics.

use benzene_ast::ast::Node;
use benzene_ast::diag::{Diagnostic, Diagnostics, Severity};
use benzene_ast::token::Token;
use benzene_resolve::{Symbol, SymbolTable};
use serde::Serialize;

/// One diagnostic per line, prefixed with the file; related notes are
/// indented below their parent.
pub fn render(diag: &Diagnostic, file: &str) -> String {
    let mut out = format!("{file}: {diag}");
    for related in &diag.related {
        out.push_str(&format!("\n    {file}: {related}"));
    }
    out
}

/// Every diagnostic in source order.
pub fn render_all(diags: &Diagnostics, file: &str) -> Vec<String> {
    diags.sorted().iter().map(|d| render(d, file)).collect()
}

pub fn summary(diags: &Diagnostics) -> String {
    fn plural(n: usize, word: &str) -> String {
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    }
    format!(
        "{}, {}",
        plural(diags.count(Severity::Fail), "error"),
        plural(diags.count(Severity::Warn), "warning")
    )
}

/// Process exit status: non-zero iff any `Fail` diagnostic exists.
pub fn exit_status(diags: &Diagnostics) -> u8 {
    u8::from(diags.has_errors())
}

pub fn render_token(token: &Token) -> String {
    format!(
        "{}:{}\t{:?}\t{:?}",
        token.line, token.column, token.kind, token.text
    )
}

#[derive(Serialize)]
pub struct CheckReport<'a> {
    pub forest: &'a [Node],
    pub symbols: Vec<&'a Symbol>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> CheckReport<'a> {
    pub fn new(forest: &'a [Node], symbols: &'a SymbolTable, diags: &Diagnostics) -> Self {
        Self {
            forest,
            symbols: symbols.iter().map(|(_, s)| s).collect(),
            diagnostics: diags.sorted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benzene_ast::diag::{Location, Phase};

    fn at(line: u32, column: u32) -> Location {
        Location { line, column }
    }

    #[test]
    fn render_includes_related_notes() {
        let d = Diagnostic::fail(Phase::Resolver, at(4, 5), "Duplicate declaration of `x`")
            .with_related(Diagnostic::note(Phase::Resolver, at(2, 5), "`x` previously declared here"));
        assert_eq!(
            render(&d, "m.bz"),
            "m.bz: error [resolver] (Ln 4, Col 5): Duplicate declaration of `x`\n    \
             m.bz: note [resolver] (Ln 2, Col 5): `x` previously declared here"
        );
    }

    #[test]
    fn summary_and_exit_status() {
        let mut diags = Diagnostics::new();
        assert_eq!(summary(&diags), "0 errors, 0 warnings");
        assert_eq!(exit_status(&diags), 0);

        diags.push(Diagnostic::warn(Phase::Lexer, at(1, 1), "odd"));
        assert_eq!(exit_status(&diags), 0);
        diags.push(Diagnostic::fail(Phase::Parser, at(1, 2), "bad"));
        assert_eq!(summary(&diags), "1 error, 1 warning");
        assert_eq!(exit_status(&diags), 1);
    }

    #[test]
    fn render_all_sorts_by_location() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::fail(Phase::Parser, at(3, 1), "late"));
        diags.push(Diagnostic::fail(Phase::Resolver, at(1, 1), "early"));
        let lines = render_all(&diags, "f");
        assert!(lines[0].ends_with("early"));
        assert!(lines[1].ends_with("late"));
    }
}
