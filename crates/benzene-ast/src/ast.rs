//! Syntax tree produced by the parser and annotated by the resolver.
//!
//! Children are owned by their parent. The only cross-link is
//! [`Identifier::symbol`], an index into the resolver's symbol arena.

use crate::token::{Token, TokenKind};
use serde::Serialize;

/// Stable handle to a symbol in the resolver's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Node {
    Literal(Literal),
    Identifier(Identifier),
    Import(ImportDirective),
    Let(LetBind),
    Const(ConstExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Scope(ScopeExpr),
    Call(CallExpr),
    CallChain(CallChain),
    FuncDecl(FuncDeclExpr),
    Case(CaseExpr),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Literal {
    pub token: Token,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Identifier {
    pub token: Token,
    /// Filled in by the resolver.
    pub symbol: Option<SymbolId>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportDirective {
    pub keyword: Token,
    pub module: Token,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

/// `let name [: Type] = value`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LetBind {
    pub name: Identifier,
    pub value: Box<Node>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

/// `const name [: Type] = literal`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConstExpr {
    pub name: Identifier,
    pub value: Literal,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub op_token: Token,
    pub operand: Box<Node>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BinOp {
    // logical
    Or,
    And,
    // equality
    Eq,
    Ne,
    // relational
    Lt,
    Le,
    Gt,
    Ge,
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    pub fn from_kind(kind: TokenKind) -> Option<BinOp> {
        Some(match kind {
            TokenKind::OrOp => BinOp::Or,
            TokenKind::AndOp => BinOp::And,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::NotEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Ge => BinOp::Ge,
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Rem,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub lhs: Box<Node>,
    pub op: BinOp,
    pub op_token: Token,
    pub rhs: Box<Node>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

/// `{ expression* }`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScopeExpr {
    pub open: Token,
    pub expressions: Vec<Node>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

/// `callee ( arg, ... )`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CallExpr {
    pub callee: Identifier,
    pub args: Vec<Node>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

/// `f(..) |> g(..) |> ...`, kept flat in source order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CallChain {
    pub calls: Vec<CallExpr>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuncParam {
    pub name: Token,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuncDeclExpr {
    pub name: Token,
    pub params: Vec<FuncParam>,
    pub return_type: Option<Token>,
    pub body: Vec<Node>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaseBranch {
    pub patterns: Vec<Node>,
    pub result: Box<Node>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaseExpr {
    pub keyword: Token,
    pub conditions: Vec<Node>,
    pub branches: Vec<CaseBranch>,
    pub ty: Option<Token>,
    pub poisoned: bool,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            symbol: None,
            ty: None,
            poisoned: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.token.text
    }
}

impl Literal {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            ty: None,
            poisoned: false,
        }
    }
}

impl CallExpr {
    pub fn name(&self) -> &str {
        self.callee.name()
    }
}

impl Node {
    /// Token a diagnostic about this node points at.
    pub fn anchor(&self) -> &Token {
        match self {
            Node::Literal(n) => &n.token,
            Node::Identifier(n) => &n.token,
            Node::Import(n) => &n.keyword,
            Node::Let(n) => &n.name.token,
            Node::Const(n) => &n.name.token,
            Node::Unary(n) => &n.op_token,
            Node::Binary(n) => &n.op_token,
            Node::Scope(n) => &n.open,
            Node::Call(n) => &n.callee.token,
            // a chain is never built empty
            Node::CallChain(n) => &n.calls[0].callee.token,
            Node::FuncDecl(n) => &n.name,
            Node::Case(n) => &n.keyword,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal(_) => "Literal",
            Node::Identifier(_) => "Identifier",
            Node::Import(_) => "ImportDirective",
            Node::Let(_) => "LetBind",
            Node::Const(_) => "ConstExpr",
            Node::Unary(_) => "UnaryExpr",
            Node::Binary(_) => "BinaryExpr",
            Node::Scope(_) => "ScopeExpr",
            Node::Call(_) => "CallExpr",
            Node::CallChain(_) => "CallChain",
            Node::FuncDecl(_) => "FuncDeclExpr",
            Node::Case(_) => "CaseExpr",
        }
    }

    pub fn is_poisoned(&self) -> bool {
        *self.poison_flag()
    }

    /// Mark the node invalid. The flag is never cleared.
    pub fn poison(&mut self) {
        *self.poison_flag_mut() = true;
    }

    pub fn ty(&self) -> Option<&Token> {
        match self {
            Node::Literal(n) => n.ty.as_ref(),
            Node::Identifier(n) => n.ty.as_ref(),
            Node::Import(n) => n.ty.as_ref(),
            Node::Let(n) => n.ty.as_ref(),
            Node::Const(n) => n.ty.as_ref(),
            Node::Unary(n) => n.ty.as_ref(),
            Node::Binary(n) => n.ty.as_ref(),
            Node::Scope(n) => n.ty.as_ref(),
            Node::Call(n) => n.ty.as_ref(),
            Node::CallChain(n) => n.ty.as_ref(),
            Node::FuncDecl(n) => n.ty.as_ref(),
            Node::Case(n) => n.ty.as_ref(),
        }
    }

    fn poison_flag(&self) -> &bool {
        match self {
            Node::Literal(n) => &n.poisoned,
            Node::Identifier(n) => &n.poisoned,
            Node::Import(n) => &n.poisoned,
            Node::Let(n) => &n.poisoned,
            Node::Const(n) => &n.poisoned,
            Node::Unary(n) => &n.poisoned,
            Node::Binary(n) => &n.poisoned,
            Node::Scope(n) => &n.poisoned,
            Node::Call(n) => &n.poisoned,
            Node::CallChain(n) => &n.poisoned,
            Node::FuncDecl(n) => &n.poisoned,
            Node::Case(n) => &n.poisoned,
        }
    }

    fn poison_flag_mut(&mut self) -> &mut bool {
        match self {
            Node::Literal(n) => &mut n.poisoned,
            Node::Identifier(n) => &mut n.poisoned,
            Node::Import(n) => &mut n.poisoned,
            Node::Let(n) => &mut n.poisoned,
            Node::Const(n) => &mut n.poisoned,
            Node::Unary(n) => &mut n.poisoned,
            Node::Binary(n) => &mut n.poisoned,
            Node::Scope(n) => &mut n.poisoned,
            Node::Call(n) => &mut n.poisoned,
            Node::CallChain(n) => &mut n.poisoned,
            Node::FuncDecl(n) => &mut n.poisoned,
            Node::Case(n) => &mut n.poisoned,
        }
    }
}

/// Number of poisoned nodes (and parameters) in a forest.
pub fn count_poisoned(forest: &[Node]) -> usize {
    use crate::visit::{walk_call_chain, walk_func_decl, walk_node, Visit};

    struct Counter(usize);

    impl Visit for Counter {
        fn visit_node(&mut self, node: &Node) {
            if node.is_poisoned() {
                self.0 += 1;
            }
            walk_node(self, node);
        }

        // chained calls are not wrapped in a `Node`
        fn visit_call_chain(&mut self, chain: &CallChain) {
            self.0 += chain.calls.iter().filter(|c| c.poisoned).count();
            walk_call_chain(self, chain);
        }

        fn visit_func_decl(&mut self, decl: &FuncDeclExpr) {
            self.0 += decl.params.iter().filter(|p| p.poisoned).count();
            walk_func_decl(self, decl);
        }
    }

    let mut counter = Counter(0);
    for node in forest {
        counter.visit_node(node);
    }
    counter.0
}
