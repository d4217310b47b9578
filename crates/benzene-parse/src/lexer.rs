use benzene_ast::diag::{Diagnostic, Diagnostics, Location, Phase};
use benzene_ast::token::{Token, TokenKind};
use serde::Serialize;

/// Output of [`tokenize`]. `tokens` always ends with an `Eof` token.
#[derive(Debug, Clone, Serialize)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

pub fn tokenize(src: &str) -> Lexed {
    Lexer::new(src).run()
}

// longest first where prefixes overlap
const OPERATORS: &[(&str, TokenKind)] = &[
    ("|>", TokenKind::PipeOp),
    (">=", TokenKind::Ge),
    ("<=", TokenKind::Le),
    ("~=", TokenKind::NotEq),
    ("!=", TokenKind::NotEq),
    ("==", TokenKind::EqEq),
    ("&&", TokenKind::AndOp),
    ("||", TokenKind::OrOp),
    (":>", TokenKind::RtnTypeOp),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    (">", TokenKind::Gt),
    ("<", TokenKind::Lt),
    ("=", TokenKind::Eq),
    ("~", TokenKind::NotOp),
    (":", TokenKind::Colon),
    (",", TokenKind::Delim),
    (".", TokenKind::Dot),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBrack),
    ("]", TokenKind::RBrack),
];

fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "Load" => TokenKind::ImportKeyword,
        "let" => TokenKind::LetKeyword,
        "const" => TokenKind::ConstKeyword,
        "func" => TokenKind::FuncStart,
        "end" => TokenKind::EndStmt,
        "case" => TokenKind::Case,
        "True" => TokenKind::TrueLiteral,
        "False" => TokenKind::FalseLiteral,
        "Nil" => TokenKind::NilLiteral,
        _ => return None,
    })
}

struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    diagnostics: Diagnostics,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Self {
            src: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = *self.src.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }

    fn at_str(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.src.get(self.pos + i) == Some(&c))
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, (line, column): (u32, u32)) {
        self.tokens.push(Token::new(kind, text, line, column));
    }

    fn warn(&mut self, (line, column): (u32, u32), message: impl Into<String>) {
        let at = Location { line, column };
        self.diagnostics.push(Diagnostic::warn(Phase::Lexer, at, message));
    }

    fn fail(&mut self, (line, column): (u32, u32), message: impl Into<String>) {
        let at = Location { line, column };
        self.diagnostics.push(Diagnostic::fail(Phase::Lexer, at, message));
    }

    fn run(mut self) -> Lexed {
        while let Some(c) = self.peek() {
            let start = (self.line, self.column);
            if c.is_whitespace() {
                self.bump();
            } else if c == '"' {
                self.scan_string(start);
            } else if c.is_ascii_digit() {
                self.scan_number(start);
            } else if c.is_alphabetic() || c == '_' {
                self.scan_word(start);
            } else if !self.scan_operator(start) {
                self.bump();
                self.push(TokenKind::Unknown, c.to_string(), start);
                self.warn(start, format!("unknown character `{c}`"));
            }
        }
        let end = (self.line, self.column);
        self.push(TokenKind::Eof, "", end);
        Lexed {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn scan_operator(&mut self, start: (u32, u32)) -> bool {
        let Some(&(op, kind)) = OPERATORS.iter().find(|(op, _)| self.at_str(op)) else {
            return false;
        };
        for _ in op.chars() {
            self.bump();
        }
        self.push(kind, op, start);
        true
    }

    fn scan_number(&mut self, start: (u32, u32)) {
        let mut s = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            s.push(c);
            self.bump();
        }
        let mut kind = TokenKind::IntegerLiteral;
        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            kind = TokenKind::FloatLiteral;
            s.push('.');
            self.bump();
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                s.push(c);
                self.bump();
            }
        }
        self.push(kind, s, start);
    }

    fn scan_string(&mut self, start: (u32, u32)) {
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.fail(start, "unterminated string literal");
                    break;
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    let esc_at = (self.line, self.column);
                    self.bump();
                    let Some(esc) = self.peek().filter(|c| *c != '\n') else {
                        continue;
                    };
                    self.bump();
                    s.push(match esc {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        '"' => '"',
                        '\\' => '\\',
                        other => {
                            self.warn(esc_at, format!("unknown escape sequence `\\{other}`"));
                            other
                        }
                    });
                }
                Some(c) => {
                    s.push(c);
                    self.bump();
                }
            }
        }
        self.push(TokenKind::StringLiteral, s, start);
    }

    fn scan_word(&mut self, start: (u32, u32)) {
        let mut word = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            word.push(c);
            self.bump();
        }
        match word.as_str() {
            "Cmt" => self.scan_comment(start),
            _ => match keyword(&word) {
                Some(TokenKind::ImportKeyword) => {
                    self.push(TokenKind::ImportKeyword, word, start);
                    self.scan_import_module();
                }
                Some(kind) => self.push(kind, word, start),
                None => self.push(TokenKind::Identifier, word, start),
            },
        }
    }

    /// `Cmt ...` runs to end of line; `Cmt { ... }` to the closing brace.
    /// A backtick escapes the next character inside a block comment.
    fn scan_comment(&mut self, start: (u32, u32)) {
        while self.peek().is_some_and(|c| c == ' ' || c == '\t') {
            self.bump();
        }
        if self.peek() != Some('{') {
            while self.peek().is_some_and(|c| c != '\n') {
                self.bump();
            }
            return;
        }
        self.bump();
        loop {
            match self.bump() {
                None => {
                    self.warn(start, "unterminated block comment");
                    return;
                }
                Some('}') => return,
                Some('`') => {
                    self.bump();
                }
                Some(_) => {}
            }
        }
    }

    /// The rest of the line after `Load`, with whitespace removed.
    fn scan_import_module(&mut self) {
        let mut module = String::new();
        let mut at = None;
        while let Some(c) = self.peek().filter(|c| *c != '\n') {
            if !c.is_whitespace() {
                if at.is_none() {
                    at = Some((self.line, self.column));
                }
                module.push(c);
            }
            self.bump();
        }
        if let Some(at) = at {
            self.push(TokenKind::ImportModule, module, at);
        }
    }
}
