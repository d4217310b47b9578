use benzene_ast::diag::{Diagnostic, Diagnostics, Location, Phase};
use benzene_ast::token::{Token, TokenKind};
use std::ops::{Deref, DerefMut};

/// Knobs for a parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Print every captured top-level construct to stderr.
    pub trace: bool,
    /// Maximum expression nesting before a rule gives up. Keeps pathological
    /// input from overflowing the stack.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trace: false,
            max_depth: 256,
        }
    }
}

/// Cursor over a token slice plus the diagnostics sink of one pass.
pub struct ParseState<'t> {
    tokens: &'t [Token],
    pos: usize,
    furthest: usize,
    depth: usize,
    /// Kept apart from `diagnostics` so checkpoint rollback cannot drop it.
    depth_exceeded: Option<Diagnostic>,
    diagnostics: Diagnostics,
    options: ParseOptions,
}

impl<'t> ParseState<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(tokens: &'t [Token], options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            furthest: 0,
            depth: 0,
            depth_exceeded: None,
            diagnostics: Diagnostics::new(),
            options,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::Eof, |t| t.kind)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub fn is_at_end(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Consume the current token. Never moves past `Eof`.
    pub fn advance(&mut self) -> Option<&'t Token> {
        let tok = self.peek()?;
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
            self.furthest = self.furthest.max(self.pos);
        }
        Some(tok)
    }

    /// Consume the current token iff it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<&'t Token> {
        if self.at(kind) {
            self.advance()
        } else {
            None
        }
    }

    /// Advance until the current token has the given kind (not consumed)
    /// or input runs out.
    pub fn skip_until(&mut self, kind: TokenKind) {
        while !self.is_at_end() && !self.at(kind) {
            self.advance();
        }
    }

    /// Move the cursor back. Only checkpoints and the program driver do this.
    pub(crate) fn reset(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len());
        self.pos = pos;
    }

    /// Snapshot the cursor; the returned guard restores it on drop unless
    /// committed.
    pub fn checkpoint(&mut self) -> Checkpoint<'_, 't> {
        Checkpoint {
            start: self.pos,
            diag_len: self.diagnostics.len(),
            committed: false,
            state: self,
        }
    }

    /// Forget how far previous statements got.
    pub(crate) fn reset_furthest(&mut self) {
        self.furthest = self.pos;
    }

    /// The token at the furthest position any rule has reached since the
    /// last [`reset_furthest`](Self::reset_furthest). This is where a
    /// failed production actually broke down, even after rollback.
    pub fn furthest_token(&self) -> Option<&'t Token> {
        self.tokens
            .get(self.furthest)
            .or_else(|| self.tokens.last())
    }

    /// Location used for diagnostics about the current position.
    pub fn location(&self) -> Location {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(Token::location)
            .unwrap_or_default()
    }

    pub fn report(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn report_at(&mut self, at: Location, message: impl Into<String>) {
        self.report(Diagnostic::fail(Phase::Parser, at, message));
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        let mut diagnostics = self.diagnostics;
        if let Some(limit) = self.depth_exceeded {
            diagnostics.push(limit);
        }
        diagnostics
    }

    pub(crate) fn trace(&self, what: &str) {
        if self.options.trace {
            let at = self.location();
            eprintln!("[parser] captured {} (next: {})", what, at);
        }
    }

    /// Enter one level of nesting. Returns `false` (and reports once) when
    /// the configured limit is hit; the caller must then fail its rule.
    pub(crate) fn descend(&mut self) -> bool {
        if self.depth >= self.options.max_depth {
            if self.depth_exceeded.is_none() {
                self.depth_exceeded = Some(Diagnostic::fail(
                    Phase::Parser,
                    self.location(),
                    format!(
                        "nesting limit of {} exceeded; input too deeply nested",
                        self.options.max_depth
                    ),
                ));
            }
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Scoped cursor snapshot. Dropping it without [`commit`](Self::commit)
/// rewinds the cursor and discards diagnostics recorded since it was
/// taken, on every exit path including `?`.
pub struct Checkpoint<'s, 't> {
    state: &'s mut ParseState<'t>,
    start: usize,
    diag_len: usize,
    committed: bool,
}

impl<'s, 't> Checkpoint<'s, 't> {
    /// Keep everything consumed since the snapshot.
    pub fn commit(mut self) {
        self.committed = true;
    }

    pub fn start(&self) -> usize {
        self.start
    }
}

impl<'s, 't> Deref for Checkpoint<'s, 't> {
    type Target = ParseState<'t>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<'s, 't> DerefMut for Checkpoint<'s, 't> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for Checkpoint<'_, '_> {
    fn drop(&mut self) {
        if !self.committed {
            self.state.reset(self.start);
            self.state.diagnostics.truncate(self.diag_len);
        }
    }
}
