//! Diagnostics shared by every analysis phase.
//!
//! Phases only ever append; ordering for display and exit-status
//! derivation are left to the driver.

use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Note,
    Warn,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Lexer,
    Parser,
    Resolver,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub phase: Phase,
    pub location: Location,
    pub message: String,
    pub related: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        phase: Phase,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            phase,
            location,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn fail(phase: Phase, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Fail, phase, location, message)
    }

    pub fn warn(phase: Phase, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, phase, location, message)
    }

    pub fn note(phase: Phase, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, phase, location, message)
    }

    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related.push(related);
        self
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warn => "warning",
            Severity::Fail => "error",
        })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
            Phase::Resolver => "resolver",
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({}): {}",
            self.severity, self.phase, self.location, self.message
        )
    }
}

/// Append-only collection of diagnostics for one analysis pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.items.push(diag);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// True iff any `Fail`-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Fail)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|d| d.severity == severity).count()
    }

    /// Drop everything recorded after the first `len` entries.
    ///
    /// Only backtracking parsers use this, to discard what an abandoned
    /// alternative reported.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Copy of the diagnostics ordered by source location (stable).
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut out = self.items.clone();
        out.sort_by_key(|d| d.location);
        out
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
