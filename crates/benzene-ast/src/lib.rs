#![forbid(unsafe_code)]
#![deny(unused_must_use)]

pub mod ast;
pub mod diag;
pub mod visit;

pub mod token {
    use serde::Serialize;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
    pub enum TokenKind {
        Identifier,
        // literals
        IntegerLiteral,
        FloatLiteral,
        StringLiteral,
        TrueLiteral,
        FalseLiteral,
        NilLiteral,
        // keywords
        ImportKeyword,
        ImportModule,
        LetKeyword,
        ConstKeyword,
        FuncStart,
        EndStmt,
        Case,
        // arithmetic
        Plus,
        Minus,
        Star,
        Slash,
        Percent,
        // relational / equality
        Lt,
        Le,
        Gt,
        Ge,
        EqEq,
        NotEq,
        // assignment
        Eq,
        // logical
        AndOp,
        OrOp,
        NotOp,
        RtnTypeOp, // :>
        PipeOp,    // |>
        // punctuation
        Colon,
        Delim, // ,
        Dot,
        LParen,
        RParen,
        LBrace,
        RBrace,
        LBrack,
        RBrack,
        Eof,
        Unknown,
    }

    impl TokenKind {
        pub fn is_literal(self) -> bool {
            matches!(
                self,
                TokenKind::IntegerLiteral
                    | TokenKind::FloatLiteral
                    | TokenKind::StringLiteral
                    | TokenKind::TrueLiteral
                    | TokenKind::FalseLiteral
                    | TokenKind::NilLiteral
            )
        }

        /// Human-readable name used in diagnostics.
        pub fn describe(self) -> &'static str {
            match self {
                TokenKind::Identifier => "identifier",
                TokenKind::IntegerLiteral => "integer literal",
                TokenKind::FloatLiteral => "float literal",
                TokenKind::StringLiteral => "string literal",
                TokenKind::TrueLiteral => "`True`",
                TokenKind::FalseLiteral => "`False`",
                TokenKind::NilLiteral => "`Nil`",
                TokenKind::ImportKeyword => "`Load`",
                TokenKind::ImportModule => "module name",
                TokenKind::LetKeyword => "`let`",
                TokenKind::ConstKeyword => "`const`",
                TokenKind::FuncStart => "`func`",
                TokenKind::EndStmt => "`end`",
                TokenKind::Case => "`case`",
                TokenKind::Plus => "`+`",
                TokenKind::Minus => "`-`",
                TokenKind::Star => "`*`",
                TokenKind::Slash => "`/`",
                TokenKind::Percent => "`%`",
                TokenKind::Lt => "`<`",
                TokenKind::Le => "`<=`",
                TokenKind::Gt => "`>`",
                TokenKind::Ge => "`>=`",
                TokenKind::EqEq => "`==`",
                TokenKind::NotEq => "`!=`",
                TokenKind::Eq => "`=`",
                TokenKind::AndOp => "`&&`",
                TokenKind::OrOp => "`||`",
                TokenKind::NotOp => "`~`",
                TokenKind::RtnTypeOp => "`:>`",
                TokenKind::PipeOp => "`|>`",
                TokenKind::Colon => "`:`",
                TokenKind::Delim => "`,`",
                TokenKind::Dot => "`.`",
                TokenKind::LParen => "`(`",
                TokenKind::RParen => "`)`",
                TokenKind::LBrace => "`{`",
                TokenKind::RBrace => "`}`",
                TokenKind::LBrack => "`[`",
                TokenKind::RBrack => "`]`",
                TokenKind::Eof => "end of input",
                TokenKind::Unknown => "unknown character",
            }
        }
    }

    /// One lexical unit. Positions are 1-based.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct Token {
        pub kind: TokenKind,
        pub text: String,
        pub line: u32,
        pub column: u32,
    }

    impl Token {
        pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
            Self {
                kind,
                text: text.into(),
                line,
                column,
            }
        }

        pub fn location(&self) -> crate::diag::Location {
            crate::diag::Location {
                line: self.line,
                column: self.column,
            }
        }
    }
}
