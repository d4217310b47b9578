//! Scope-aware name resolution.
//!
//! One depth-first walk over the forest. Every node kind has a fixed set of
//! scope kinds it may appear in; a node found elsewhere is poisoned and
//! reported, and the walk still descends into it. Declarations bind into
//! the innermost scope, references are looked up outward and, when found,
//! get the symbol's id written back into the tree.

use crate::symbols::{DeclareError, ScopeKind, Symbol, SymbolData, SymbolKind, SymbolTable};
use benzene_ast::ast::*;
use benzene_ast::diag::{Diagnostic, Diagnostics, Phase};
use benzene_ast::token::Token;
use benzene_ast::visit::{
    walk_case_mut, walk_const_mut, walk_func_decl_mut, walk_let_mut, walk_scope_mut, VisitMut,
};
use std::ops::{Deref, DerefMut};

use ScopeKind::*;

const IMPORT_SCOPES: &[ScopeKind] = &[Module];
const VALUE_SCOPES: &[ScopeKind] = &[Module, FunctionExpression, ScopedExpression];
const LET_SCOPES: &[ScopeKind] = &[FunctionExpression, ScopedExpression];
const CONST_SCOPES: &[ScopeKind] = &[Module, Application];
const CALL_SCOPES: &[ScopeKind] = &[CaseExpression, ScopedExpression, FunctionExpression];
const FUNC_SCOPES: &[ScopeKind] = &[Module, FunctionExpression, ScopedExpression];
const BLOCK_SCOPES: &[ScopeKind] = &[FunctionExpression, ScopedExpression];
const CASE_SCOPES: &[ScopeKind] = &[FunctionExpression, ScopedExpression];

/// Resolve every name in `forest` inside a fresh module scope.
///
/// Problems are appended to `diagnostics` and poison the offending node.
/// The returned table backs the [`SymbolId`]s written into the tree.
pub fn resolve(forest: &mut [Node], diagnostics: &mut Diagnostics) -> SymbolTable {
    let mut resolver = Resolver::new(diagnostics);
    {
        let mut module = resolver.enter(ScopeKind::Module);
        for node in forest.iter_mut() {
            module.visit_node_mut(node);
        }
    }
    resolver.into_table()
}

pub struct Resolver<'d> {
    table: SymbolTable,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> Resolver<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            table: SymbolTable::new(),
            diagnostics,
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn into_table(self) -> SymbolTable {
        self.table
    }

    /// Open a scope that closes when the guard is dropped.
    pub fn enter(&mut self, kind: ScopeKind) -> ScopeGuard<'_, 'd> {
        self.table.new_scope(kind);
        ScopeGuard { resolver: self }
    }

    fn fail(&mut self, at: &Token, message: String) {
        self.diagnostics
            .push(Diagnostic::fail(Phase::Resolver, at.location(), message));
    }

    /// True when a scope is open and its kind is not in `allowed`.
    fn out_of_scope(&self, allowed: &[ScopeKind]) -> bool {
        self.table
            .current_scope_type()
            .is_some_and(|kind| !allowed.contains(&kind))
    }

    fn declare(
        &mut self,
        token: &Token,
        kind: SymbolKind,
        poisoned: &mut bool,
    ) -> Option<SymbolId> {
        match self.table.declare(token, kind) {
            Ok(id) => Some(id),
            Err(DeclareError::Duplicate { previous }) => {
                *poisoned = true;
                let prev = self
                    .table
                    .get(previous)
                    .map(Symbol::location)
                    .unwrap_or_default();
                let diag = Diagnostic::fail(
                    Phase::Resolver,
                    token.location(),
                    format!(
                        "Duplicate declaration of `{}` (see {} for previous declaration)",
                        token.text, prev
                    ),
                )
                .with_related(Diagnostic::note(
                    Phase::Resolver,
                    prev,
                    format!("`{}` previously declared here", token.text),
                ));
                self.diagnostics.push(diag);
                None
            }
            Err(DeclareError::NoScope) => {
                *poisoned = true;
                self.fail(token, format!("`{}` declared outside of any scope", token.text));
                None
            }
        }
    }

    fn set_data(&mut self, id: Option<SymbolId>, data: SymbolData) {
        if let Some(sym) = id.and_then(|id| self.table.get_mut(id)) {
            sym.data = data;
        }
    }

    /// Callee lookup plus arguments; scope legality is checked by the caller.
    fn resolve_call(&mut self, call: &mut CallExpr) {
        match self.table.lookup(call.name()) {
            Some(id) => call.callee.symbol = Some(id),
            None => {
                call.poisoned = true;
                let message = format!("Function `{}` is not defined", call.name());
                self.fail(&call.callee.token, message);
            }
        }
        for arg in &mut call.args {
            self.visit_node_mut(arg);
        }
    }
}

/// Scope opened by [`Resolver::enter`]. Derefs to the resolver.
pub struct ScopeGuard<'r, 'd> {
    resolver: &'r mut Resolver<'d>,
}

impl<'r, 'd> Deref for ScopeGuard<'r, 'd> {
    type Target = Resolver<'d>;

    fn deref(&self) -> &Self::Target {
        self.resolver
    }
}

impl<'r, 'd> DerefMut for ScopeGuard<'r, 'd> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resolver
    }
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        self.resolver.table.pop_scope();
    }
}

impl VisitMut for Resolver<'_> {
    fn visit_literal_mut(&mut self, lit: &mut Literal) {
        if self.out_of_scope(VALUE_SCOPES) {
            lit.poisoned = true;
            let message = format!("Literal value `{}` not in allowed scope", lit.token.text);
            self.fail(&lit.token, message);
        }
    }

    fn visit_identifier_mut(&mut self, ident: &mut Identifier) {
        if self.out_of_scope(VALUE_SCOPES) {
            ident.poisoned = true;
            let message = format!("Identifier `{}` not in allowed scope", ident.name());
            self.fail(&ident.token, message);
        }
        match self.table.lookup(ident.name()) {
            Some(id) => ident.symbol = Some(id),
            None => {
                ident.poisoned = true;
                let message = format!("Identifier `{}` is not defined", ident.name());
                self.fail(&ident.token, message);
            }
        }
    }

    fn visit_import_mut(&mut self, import: &mut ImportDirective) {
        if self.out_of_scope(IMPORT_SCOPES) {
            import.poisoned = true;
            self.fail(
                &import.keyword,
                "Import statements are only allowed in the top Module scope".to_string(),
            );
        }
        self.declare(&import.module, SymbolKind::Module, &mut import.poisoned);
    }

    fn visit_let_mut(&mut self, bind: &mut LetBind) {
        if self.out_of_scope(LET_SCOPES) {
            bind.poisoned = true;
            self.fail(
                &bind.name.token,
                "`let` expression is not in valid scope".to_string(),
            );
        }
        // the value cannot see the name it is bound to
        walk_let_mut(self, bind);
        let id = self.declare(&bind.name.token, SymbolKind::Binding, &mut bind.poisoned);
        self.set_data(id, SymbolData::Binding { ty: bind.ty.clone() });
        bind.name.symbol = id;
    }

    fn visit_const_mut(&mut self, decl: &mut ConstExpr) {
        if self.out_of_scope(CONST_SCOPES) {
            decl.poisoned = true;
            self.fail(
                &decl.name.token,
                "`const` expression is not in valid scope".to_string(),
            );
        }
        walk_const_mut(self, decl);
        let id = self.declare(&decl.name.token, SymbolKind::Constant, &mut decl.poisoned);
        self.set_data(id, SymbolData::Constant { ty: decl.ty.clone() });
        decl.name.symbol = id;
    }

    fn visit_scope_mut(&mut self, scope: &mut ScopeExpr) {
        if self.out_of_scope(BLOCK_SCOPES) {
            scope.poisoned = true;
            self.fail(
                &scope.open,
                "Scoped expression not allowed in current scope".to_string(),
            );
        }
        let mut inner = self.enter(ScopeKind::ScopedExpression);
        walk_scope_mut(&mut *inner, scope);
    }

    fn visit_call_mut(&mut self, call: &mut CallExpr) {
        if self.out_of_scope(CALL_SCOPES) {
            call.poisoned = true;
            self.fail(
                &call.callee.token,
                "Function call not in valid scope".to_string(),
            );
        }
        self.resolve_call(call);
    }

    fn visit_call_chain_mut(&mut self, chain: &mut CallChain) {
        if self.out_of_scope(CALL_SCOPES) {
            chain.poisoned = true;
            if let Some(first) = chain.calls.first() {
                self.fail(
                    &first.callee.token,
                    "Call chain not allowed in current scope".to_string(),
                );
            }
        }
        for call in &mut chain.calls {
            self.resolve_call(call);
        }
    }

    fn visit_func_decl_mut(&mut self, decl: &mut FuncDeclExpr) {
        if self.out_of_scope(FUNC_SCOPES) {
            decl.poisoned = true;
            self.fail(
                &decl.name,
                "Function declaration not in valid scope".to_string(),
            );
        }
        // bound before the body so recursive calls resolve
        let func_id = self.declare(&decl.name, SymbolKind::Function, &mut decl.poisoned);

        let mut params = Vec::with_capacity(decl.params.len());
        {
            let mut body = self.enter(ScopeKind::FunctionExpression);
            for param in &mut decl.params {
                let id = body.declare(&param.name, SymbolKind::FuncParam, &mut param.poisoned);
                body.set_data(id, SymbolData::Binding { ty: param.ty.clone() });
                params.extend(id);
            }
            walk_func_decl_mut(&mut *body, decl);
        }

        self.set_data(
            func_id,
            SymbolData::Function {
                params,
                return_type: decl.return_type.clone(),
            },
        );
    }

    fn visit_case_mut(&mut self, expr: &mut CaseExpr) {
        if self.out_of_scope(CASE_SCOPES) {
            expr.poisoned = true;
            self.fail(
                &expr.keyword,
                "Case expression not allowed in current scope".to_string(),
            );
        }
        let mut inner = self.enter(ScopeKind::CaseExpression);
        walk_case_mut(&mut *inner, expr);
    }
}
