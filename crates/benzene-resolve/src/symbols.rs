//! Symbol arena and lexical scope stack.
//!
//! Symbols are stored once in an arena and addressed by [`SymbolId`].
//! Scopes only map names to ids, so popping a scope never invalidates an
//! id already stored in the tree.

use benzene_ast::ast::SymbolId;
use benzene_ast::diag::Location;
use benzene_ast::token::Token;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SymbolKind {
    Unresolved,
    Function,
    FuncParam,
    Binding,
    Constant,
    Module,
    Type,
}

/// Kind-specific payload attached to a symbol.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SymbolData {
    None,
    Function {
        params: Vec<SymbolId>,
        return_type: Option<Token>,
    },
    Binding {
        ty: Option<Token>,
    },
    Constant {
        ty: Option<Token>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// The declaring token; its position is the declaration site.
    pub token: Token,
    pub data: SymbolData,
}

impl Symbol {
    pub fn location(&self) -> Location {
        self.token.location()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScopeKind {
    Application,
    Module,
    FunctionExpression,
    ScopedExpression,
    CaseExpression,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    names: HashMap<String, SymbolId>,
}

/// Why a declaration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclareError {
    /// The name already exists in the innermost scope.
    Duplicate { previous: SymbolId },
    /// No scope is open.
    NoScope,
}

impl std::fmt::Display for DeclareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclareError::Duplicate { previous } => {
                write!(f, "name already declared in this scope (symbol #{})", previous.0)
            }
            DeclareError::NoScope => write!(f, "declaration outside of any scope"),
        }
    }
}

impl std::error::Error for DeclareError {}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            names: HashMap::new(),
        });
    }

    /// Pop the innermost scope. Its symbols stay in the arena.
    pub fn pop_scope(&mut self) -> Option<ScopeKind> {
        self.scopes.pop().map(|s| s.kind)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Innermost scope kind; `None` at application level (no scope open).
    pub fn current_scope_type(&self) -> Option<ScopeKind> {
        self.scopes.last().map(|s| s.kind)
    }

    /// Bind `token`'s text in the innermost scope.
    pub fn declare(&mut self, token: &Token, kind: SymbolKind) -> Result<SymbolId, DeclareError> {
        if let Some(previous) = self.lookup_local(&token.text) {
            return Err(DeclareError::Duplicate { previous });
        }
        let scope = self.scopes.last_mut().ok_or(DeclareError::NoScope)?;
        let id = SymbolId(self.symbols.len() as u32);
        scope.names.insert(token.text.clone(), id);
        self.symbols.push(Symbol {
            name: token.text.clone(),
            kind,
            token: token.clone(),
            data: SymbolData::None,
        });
        Ok(id)
    }

    /// Innermost-to-outermost; the nearest declaration shadows the rest.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.names.get(name).copied())
    }

    /// Innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<SymbolId> {
        self.scopes.last()?.names.get(name).copied()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    /// Every symbol ever declared, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benzene_ast::token::TokenKind;

    fn ident(name: &str, line: u32) -> Token {
        Token::new(TokenKind::Identifier, name, line, 1)
    }

    #[test]
    fn declare_without_scope_fails() {
        let mut table = SymbolTable::new();
        assert_eq!(
            table.declare(&ident("x", 1), SymbolKind::Binding),
            Err(DeclareError::NoScope)
        );
        assert_eq!(table.current_scope_type(), None);
    }

    #[test]
    fn duplicates_only_within_one_scope() {
        let mut table = SymbolTable::new();
        table.new_scope(ScopeKind::Module);
        let first = table.declare(&ident("x", 1), SymbolKind::Binding).unwrap();
        assert_eq!(
            table.declare(&ident("x", 2), SymbolKind::Binding),
            Err(DeclareError::Duplicate { previous: first })
        );

        table.new_scope(ScopeKind::ScopedExpression);
        let inner = table.declare(&ident("x", 3), SymbolKind::Binding).unwrap();
        assert_ne!(inner, first);
        assert_eq!(table.lookup("x"), Some(inner));
        assert_eq!(table.lookup_local("x"), Some(inner));

        table.pop_scope();
        assert_eq!(table.lookup("x"), Some(first));
    }

    #[test]
    fn ids_outlive_their_scope() {
        let mut table = SymbolTable::new();
        table.new_scope(ScopeKind::Module);
        table.new_scope(ScopeKind::FunctionExpression);
        let id = table.declare(&ident("p", 4), SymbolKind::FuncParam).unwrap();
        assert_eq!(table.pop_scope(), Some(ScopeKind::FunctionExpression));

        assert_eq!(table.lookup("p"), None);
        let sym = table.get(id).unwrap();
        assert_eq!(sym.name, "p");
        assert_eq!(sym.kind, SymbolKind::FuncParam);
        assert_eq!(sym.location(), Location { line: 4, column: 1 });
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn scope_kind_tracks_innermost() {
        let mut table = SymbolTable::new();
        table.new_scope(ScopeKind::Module);
        table.new_scope(ScopeKind::CaseExpression);
        assert_eq!(table.current_scope_type(), Some(ScopeKind::CaseExpression));
        assert_eq!(table.depth(), 2);
        table.pop_scope();
        assert_eq!(table.current_scope_type(), Some(ScopeKind::Module));
    }
}
