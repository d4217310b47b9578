//! Tree walkers over the closed set of node kinds.
//!
//! Each hook defaults to the matching `walk_*` function, which descends
//! into the children in source order. Override a hook to intercept a kind;
//! call the `walk_*` function from the override to keep descending.
//! Declared names (`let`/`const` targets, callees, parameters) are part of
//! their declaring node and are not visited as identifier references.

use crate::ast::*;

pub trait Visit {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }
    fn visit_literal(&mut self, _lit: &Literal) {}
    fn visit_identifier(&mut self, _ident: &Identifier) {}
    fn visit_import(&mut self, _import: &ImportDirective) {}
    fn visit_let(&mut self, bind: &LetBind) {
        walk_let(self, bind);
    }
    fn visit_const(&mut self, decl: &ConstExpr) {
        walk_const(self, decl);
    }
    fn visit_unary(&mut self, expr: &UnaryExpr) {
        walk_unary(self, expr);
    }
    fn visit_binary(&mut self, expr: &BinaryExpr) {
        walk_binary(self, expr);
    }
    fn visit_scope(&mut self, scope: &ScopeExpr) {
        walk_scope(self, scope);
    }
    fn visit_call(&mut self, call: &CallExpr) {
        walk_call(self, call);
    }
    fn visit_call_chain(&mut self, chain: &CallChain) {
        walk_call_chain(self, chain);
    }
    fn visit_func_decl(&mut self, decl: &FuncDeclExpr) {
        walk_func_decl(self, decl);
    }
    fn visit_case(&mut self, expr: &CaseExpr) {
        walk_case(self, expr);
    }
}

pub fn walk_node<V: Visit + ?Sized>(v: &mut V, node: &Node) {
    match node {
        Node::Literal(n) => v.visit_literal(n),
        Node::Identifier(n) => v.visit_identifier(n),
        Node::Import(n) => v.visit_import(n),
        Node::Let(n) => v.visit_let(n),
        Node::Const(n) => v.visit_const(n),
        Node::Unary(n) => v.visit_unary(n),
        Node::Binary(n) => v.visit_binary(n),
        Node::Scope(n) => v.visit_scope(n),
        Node::Call(n) => v.visit_call(n),
        Node::CallChain(n) => v.visit_call_chain(n),
        Node::FuncDecl(n) => v.visit_func_decl(n),
        Node::Case(n) => v.visit_case(n),
    }
}

pub fn walk_let<V: Visit + ?Sized>(v: &mut V, bind: &LetBind) {
    v.visit_node(&bind.value);
}

pub fn walk_const<V: Visit + ?Sized>(v: &mut V, decl: &ConstExpr) {
    v.visit_literal(&decl.value);
}

pub fn walk_unary<V: Visit + ?Sized>(v: &mut V, expr: &UnaryExpr) {
    v.visit_node(&expr.operand);
}

pub fn walk_binary<V: Visit + ?Sized>(v: &mut V, expr: &BinaryExpr) {
    v.visit_node(&expr.lhs);
    v.visit_node(&expr.rhs);
}

pub fn walk_scope<V: Visit + ?Sized>(v: &mut V, scope: &ScopeExpr) {
    for expr in &scope.expressions {
        v.visit_node(expr);
    }
}

pub fn walk_call<V: Visit + ?Sized>(v: &mut V, call: &CallExpr) {
    for arg in &call.args {
        v.visit_node(arg);
    }
}

pub fn walk_call_chain<V: Visit + ?Sized>(v: &mut V, chain: &CallChain) {
    for call in &chain.calls {
        v.visit_call(call);
    }
}

pub fn walk_func_decl<V: Visit + ?Sized>(v: &mut V, decl: &FuncDeclExpr) {
    for expr in &decl.body {
        v.visit_node(expr);
    }
}

pub fn walk_case<V: Visit + ?Sized>(v: &mut V, expr: &CaseExpr) {
    for cond in &expr.conditions {
        v.visit_node(cond);
    }
    for branch in &expr.branches {
        for pat in &branch.patterns {
            v.visit_node(pat);
        }
        v.visit_node(&branch.result);
    }
}

/// Mutable counterpart of [`Visit`]. Hooks may rewrite node fields but
/// must not change the shape of the tree.
pub trait VisitMut {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }
    fn visit_literal_mut(&mut self, _lit: &mut Literal) {}
    fn visit_identifier_mut(&mut self, _ident: &mut Identifier) {}
    fn visit_import_mut(&mut self, _import: &mut ImportDirective) {}
    fn visit_let_mut(&mut self, bind: &mut LetBind) {
        walk_let_mut(self, bind);
    }
    fn visit_const_mut(&mut self, decl: &mut ConstExpr) {
        walk_const_mut(self, decl);
    }
    fn visit_unary_mut(&mut self, expr: &mut UnaryExpr) {
        walk_unary_mut(self, expr);
    }
    fn visit_binary_mut(&mut self, expr: &mut BinaryExpr) {
        walk_binary_mut(self, expr);
    }
    fn visit_scope_mut(&mut self, scope: &mut ScopeExpr) {
        walk_scope_mut(self, scope);
    }
    fn visit_call_mut(&mut self, call: &mut CallExpr) {
        walk_call_mut(self, call);
    }
    fn visit_call_chain_mut(&mut self, chain: &mut CallChain) {
        walk_call_chain_mut(self, chain);
    }
    fn visit_func_decl_mut(&mut self, decl: &mut FuncDeclExpr) {
        walk_func_decl_mut(self, decl);
    }
    fn visit_case_mut(&mut self, expr: &mut CaseExpr) {
        walk_case_mut(self, expr);
    }
}

pub fn walk_node_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Node) {
    match node {
        Node::Literal(n) => v.visit_literal_mut(n),
        Node::Identifier(n) => v.visit_identifier_mut(n),
        Node::Import(n) => v.visit_import_mut(n),
        Node::Let(n) => v.visit_let_mut(n),
        Node::Const(n) => v.visit_const_mut(n),
        Node::Unary(n) => v.visit_unary_mut(n),
        Node::Binary(n) => v.visit_binary_mut(n),
        Node::Scope(n) => v.visit_scope_mut(n),
        Node::Call(n) => v.visit_call_mut(n),
        Node::CallChain(n) => v.visit_call_chain_mut(n),
        Node::FuncDecl(n) => v.visit_func_decl_mut(n),
        Node::Case(n) => v.visit_case_mut(n),
    }
}

pub fn walk_let_mut<V: VisitMut + ?Sized>(v: &mut V, bind: &mut LetBind) {
    v.visit_node_mut(&mut bind.value);
}

pub fn walk_const_mut<V: VisitMut + ?Sized>(v: &mut V, decl: &mut ConstExpr) {
    v.visit_literal_mut(&mut decl.value);
}

pub fn walk_unary_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut UnaryExpr) {
    v.visit_node_mut(&mut expr.operand);
}

pub fn walk_binary_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut BinaryExpr) {
    v.visit_node_mut(&mut expr.lhs);
    v.visit_node_mut(&mut expr.rhs);
}

pub fn walk_scope_mut<V: VisitMut + ?Sized>(v: &mut V, scope: &mut ScopeExpr) {
    for expr in &mut scope.expressions {
        v.visit_node_mut(expr);
    }
}

pub fn walk_call_mut<V: VisitMut + ?Sized>(v: &mut V, call: &mut CallExpr) {
    for arg in &mut call.args {
        v.visit_node_mut(arg);
    }
}

pub fn walk_call_chain_mut<V: VisitMut + ?Sized>(v: &mut V, chain: &mut CallChain) {
    for call in &mut chain.calls {
        v.visit_call_mut(call);
    }
}

pub fn walk_func_decl_mut<V: VisitMut + ?Sized>(v: &mut V, decl: &mut FuncDeclExpr) {
    for expr in &mut decl.body {
        v.visit_node_mut(expr);
    }
}

pub fn walk_case_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut CaseExpr) {
    for cond in &mut expr.conditions {
        v.visit_node_mut(cond);
    }
    for branch in &mut expr.branches {
        for pat in &mut branch.patterns {
            v.visit_node_mut(pat);
        }
        v.visit_node_mut(&mut branch.result);
    }
}
