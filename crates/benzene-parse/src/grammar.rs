//! Grammar rules for Benzene source.
//!
//! Rules are plain functions `fn(&mut ParseState) -> Option<Node>` and
//! compose through the combinators in [`crate::combinator`]. A rule that
//! returns `None` has not moved the cursor. Once a function declaration,
//! scoped block or case expression has seen its opening tokens it commits:
//! later problems are reported and recovered from locally, and the rule
//! returns the partial (poisoned) node.

use crate::combinator::{
    chain_left, first_match, map, match_kind, one_of, optional, sequence, Rule,
};
use crate::state::ParseState;
use benzene_ast::ast::*;
use benzene_ast::token::{Token, TokenKind};

const MULTIPLICATIVE: &[TokenKind] = &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent];
const ADDITIVE: &[TokenKind] = &[TokenKind::Plus, TokenKind::Minus];
const COMPARISON: &[TokenKind] = &[TokenKind::Lt, TokenKind::Le, TokenKind::Gt, TokenKind::Ge];
const EQUALITY: &[TokenKind] = &[TokenKind::EqEq, TokenKind::NotEq];
const LOGICAL_AND: &[TokenKind] = &[TokenKind::AndOp];
const LOGICAL_OR: &[TokenKind] = &[TokenKind::OrOp];

/// Parse statements until end of input, recovering after each failure.
pub fn program(state: &mut ParseState<'_>) -> Vec<Node> {
    let mut forest = Vec::new();
    while !state.is_at_end() {
        state.reset_furthest();
        match statement(state) {
            Some(node) => {
                state.trace(node.kind_name());
                forest.push(node);
            }
            None => recover_statement(state),
        }
    }
    forest
}

/// Anything that may appear at top level or in a body.
pub fn statement(state: &mut ParseState<'_>) -> Option<Node> {
    nested(state, |state: &mut ParseState<'_>| {
        let alternatives: [&dyn Rule<Node>; 5] = [
            &import_directive,
            &let_bind,
            &const_expr,
            &func_decl,
            &value_expression,
        ];
        let out = first_match(&alternatives).parse(state);
        out
    })
}

/// Right-hand sides, call arguments, case conditions, patterns and results.
///
/// Calls, call chains, literals and identifiers are reached through the
/// operator ladder's primaries, tried in that same order.
pub fn value_expression(state: &mut ParseState<'_>) -> Option<Node> {
    nested(state, |state: &mut ParseState<'_>| {
        let alternatives: [&dyn Rule<Node>; 3] = [&logical_or, &scoped_block, &case_expr];
        let out = first_match(&alternatives).parse(state);
        out
    })
}

fn nested<T>(state: &mut ParseState<'_>, rule: impl Rule<T>) -> Option<T> {
    if !state.descend() {
        return None;
    }
    let out = rule.parse(state);
    state.ascend();
    out
}

// ----- statements -----

fn import_directive(state: &mut ParseState<'_>) -> Option<Node> {
    let keyword = match_kind(TokenKind::ImportKeyword);
    let module = match_kind(TokenKind::ImportModule);
    let parts: [&dyn Rule<Token>; 2] = [&keyword, &module];
    let rule = map(sequence(&parts), |tokens: Vec<Token>| {
        let [keyword, module]: [Token; 2] = tokens.try_into().ok()?;
        Some(Node::Import(ImportDirective {
            keyword,
            module,
            ty: None,
            poisoned: false,
        }))
    });
    rule.parse(state).flatten()
}

/// `: TYPE`, yielding the type name.
fn type_annotation(state: &mut ParseState<'_>) -> Option<Token> {
    let colon = match_kind(TokenKind::Colon);
    let name = match_kind(TokenKind::Identifier);
    let parts: [&dyn Rule<Token>; 2] = [&colon, &name];
    let rule = map(sequence(&parts), |mut tokens: Vec<Token>| tokens.pop());
    rule.parse(state).flatten()
}

fn let_bind(state: &mut ParseState<'_>) -> Option<Node> {
    let mut cp = state.checkpoint();
    cp.eat(TokenKind::LetKeyword)?;
    let name = cp.eat(TokenKind::Identifier)?.clone();
    let ty = optional(type_annotation).parse(&mut cp).flatten();
    cp.eat(TokenKind::Eq)?;
    let value = value_expression(&mut cp)?;
    cp.commit();
    Some(Node::Let(LetBind {
        name: Identifier::new(name),
        value: Box::new(value),
        ty,
        poisoned: false,
    }))
}

fn const_expr(state: &mut ParseState<'_>) -> Option<Node> {
    let mut cp = state.checkpoint();
    cp.eat(TokenKind::ConstKeyword)?;
    let name = cp.eat(TokenKind::Identifier)?.clone();
    let ty = optional(type_annotation).parse(&mut cp).flatten();
    cp.eat(TokenKind::Eq)?;
    let Some(Node::Literal(value)) = literal(&mut cp) else {
        return None;
    };
    cp.commit();
    Some(Node::Const(ConstExpr {
        name: Identifier::new(name),
        value,
        ty,
        poisoned: false,
    }))
}

fn func_decl(state: &mut ParseState<'_>) -> Option<Node> {
    let mut cp = state.checkpoint();
    cp.eat(TokenKind::FuncStart)?;
    let name = cp.eat(TokenKind::Identifier)?.clone();
    cp.eat(TokenKind::LParen)?;
    cp.commit();

    let mut decl = FuncDeclExpr {
        name,
        params: Vec::new(),
        return_type: None,
        body: Vec::new(),
        ty: None,
        poisoned: false,
    };
    if func_header(state, &mut decl).is_none() {
        report_structural(state, "Invalid function declaration");
        skip_past_end(state);
        decl.poisoned = true;
        return Some(Node::FuncDecl(decl));
    }

    loop {
        if state.eat(TokenKind::EndStmt).is_some() {
            break;
        }
        if state.is_at_end() {
            let at = state.location();
            state.report_at(
                at,
                format!(
                    "Unterminated function declaration `{}`: expected `end`",
                    decl.name.text
                ),
            );
            decl.poisoned = true;
            break;
        }
        state.reset_furthest();
        match statement(state) {
            Some(expr) => decl.body.push(expr),
            None => {
                let what = format!("Invalid expression in body of `{}`", decl.name.text);
                report_structural(state, &what);
                skip_past_end(state);
                decl.poisoned = true;
                break;
            }
        }
    }
    Some(Node::FuncDecl(decl))
}

/// Parameters (the opening paren is already consumed), optional return
/// type and the optional `,`/`:` separator before the body.
fn func_header(state: &mut ParseState<'_>, decl: &mut FuncDeclExpr) -> Option<()> {
    if state.eat(TokenKind::RParen).is_none() {
        loop {
            let name = state.eat(TokenKind::Identifier)?.clone();
            let ty = type_annotation(state);
            decl.params.push(FuncParam {
                name,
                ty,
                poisoned: false,
            });
            if state.eat(TokenKind::Delim).is_none() {
                state.eat(TokenKind::RParen)?;
                break;
            }
        }
    }
    if state.eat(TokenKind::RtnTypeOp).is_some() {
        decl.return_type = Some(state.eat(TokenKind::Identifier)?.clone());
    }
    if state.eat(TokenKind::Delim).is_none() {
        state.eat(TokenKind::Colon);
    }
    Some(())
}

// ----- blocks -----

fn scoped_block(state: &mut ParseState<'_>) -> Option<Node> {
    let open = state.eat(TokenKind::LBrace)?.clone();
    let mut scope = ScopeExpr {
        open,
        expressions: Vec::new(),
        ty: None,
        poisoned: false,
    };
    loop {
        if state.eat(TokenKind::RBrace).is_some() {
            break;
        }
        if state.is_at_end() {
            let at = state.location();
            state.report_at(at, "Unterminated scoped expression: expected `}`");
            scope.poisoned = true;
            break;
        }
        state.reset_furthest();
        match statement(state) {
            Some(expr) => scope.expressions.push(expr),
            None => {
                report_structural(state, "Invalid scoped expression");
                skip_balanced(state, &[TokenKind::LBrace], TokenKind::RBrace);
                scope.poisoned = true;
                break;
            }
        }
    }
    Some(Node::Scope(scope))
}

fn case_expr(state: &mut ParseState<'_>) -> Option<Node> {
    let keyword = state.eat(TokenKind::Case)?.clone();
    let mut expr = CaseExpr {
        keyword,
        conditions: Vec::new(),
        branches: Vec::new(),
        ty: None,
        poisoned: false,
    };
    state.reset_furthest();
    if case_body(state, &mut expr).is_none() {
        report_structural(state, "Invalid case expression");
        skip_past_end(state);
        expr.poisoned = true;
    }
    Some(Node::Case(expr))
}

fn case_body(state: &mut ParseState<'_>, expr: &mut CaseExpr) -> Option<()> {
    expr.conditions = comma_separated(state)?;
    state.eat(TokenKind::Colon)?;
    while state.eat(TokenKind::EndStmt).is_none() {
        let patterns = comma_separated(state)?;
        state.eat(TokenKind::RtnTypeOp)?;
        let result = value_expression(state)?;
        expr.branches.push(CaseBranch {
            patterns,
            result: Box::new(result),
        });
    }
    Some(())
}

fn comma_separated(state: &mut ParseState<'_>) -> Option<Vec<Node>> {
    let mut items = vec![value_expression(state)?];
    while state.eat(TokenKind::Delim).is_some() {
        items.push(value_expression(state)?);
    }
    Some(items)
}

// ----- operator ladder -----

fn logical_or(state: &mut ParseState<'_>) -> Option<Node> {
    chain_left(logical_and, one_of(LOGICAL_OR)).parse(state)
}

fn logical_and(state: &mut ParseState<'_>) -> Option<Node> {
    chain_left(equality, one_of(LOGICAL_AND)).parse(state)
}

fn equality(state: &mut ParseState<'_>) -> Option<Node> {
    chain_left(comparison, one_of(EQUALITY)).parse(state)
}

fn comparison(state: &mut ParseState<'_>) -> Option<Node> {
    chain_left(additive, one_of(COMPARISON)).parse(state)
}

fn additive(state: &mut ParseState<'_>) -> Option<Node> {
    chain_left(multiplicative, one_of(ADDITIVE)).parse(state)
}

fn multiplicative(state: &mut ParseState<'_>) -> Option<Node> {
    chain_left(unary, one_of(MULTIPLICATIVE)).parse(state)
}

fn unary(state: &mut ParseState<'_>) -> Option<Node> {
    let op = match state.peek_kind() {
        TokenKind::Minus => UnOp::Neg,
        TokenKind::NotOp => UnOp::Not,
        _ => return primary(state),
    };
    let mut cp = state.checkpoint();
    let op_token = cp.advance()?.clone();
    let operand = nested(&mut cp, unary)?;
    cp.commit();
    Some(Node::Unary(UnaryExpr {
        op,
        op_token,
        operand: Box::new(operand),
        ty: None,
        poisoned: false,
    }))
}

fn primary(state: &mut ParseState<'_>) -> Option<Node> {
    let alternatives: [&dyn Rule<Node>; 4] =
        [&parenthesized, &call_or_chain, &literal, &identifier];
    let out = first_match(&alternatives).parse(state);
    out
}

fn parenthesized(state: &mut ParseState<'_>) -> Option<Node> {
    let mut cp = state.checkpoint();
    cp.eat(TokenKind::LParen)?;
    let inner = value_expression(&mut cp)?;
    cp.eat(TokenKind::RParen)?;
    cp.commit();
    Some(inner)
}

fn call(state: &mut ParseState<'_>) -> Option<CallExpr> {
    let mut cp = state.checkpoint();
    let name = cp.eat(TokenKind::Identifier)?.clone();
    cp.eat(TokenKind::LParen)?;
    let mut args = Vec::new();
    if cp.eat(TokenKind::RParen).is_none() {
        args = comma_separated(&mut cp)?;
        cp.eat(TokenKind::RParen)?;
    }
    cp.commit();
    Some(CallExpr {
        callee: Identifier::new(name),
        args,
        ty: None,
        poisoned: false,
    })
}

/// A single call, or two or more calls joined by `|>`.
fn call_or_chain(state: &mut ParseState<'_>) -> Option<Node> {
    let mut calls = vec![call(state)?];
    loop {
        let mut cp = state.checkpoint();
        if cp.eat(TokenKind::PipeOp).is_none() {
            break;
        }
        let Some(next) = call(&mut cp) else {
            break;
        };
        cp.commit();
        calls.push(next);
    }
    if calls.len() == 1 {
        return calls.pop().map(Node::Call);
    }
    Some(Node::CallChain(CallChain {
        calls,
        ty: None,
        poisoned: false,
    }))
}

fn literal(state: &mut ParseState<'_>) -> Option<Node> {
    if !state.peek_kind().is_literal() {
        return None;
    }
    let token = state.advance()?.clone();
    Some(Node::Literal(Literal::new(token)))
}

fn identifier(state: &mut ParseState<'_>) -> Option<Node> {
    let token = state.eat(TokenKind::Identifier)?.clone();
    Some(Node::Identifier(Identifier::new(token)))
}

// ----- recovery -----

fn is_statement_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::ImportKeyword
            | TokenKind::LetKeyword
            | TokenKind::ConstKeyword
            | TokenKind::FuncStart
    )
}

fn describe_found(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier | TokenKind::Unknown => {
            format!("{} `{}`", token.kind.describe(), token.text)
        }
        kind if kind.is_literal() && !token.text.is_empty() => {
            format!("{} `{}`", kind.describe(), token.text)
        }
        kind => kind.describe().to_string(),
    }
}

/// Report a failed construct at the furthest token any attempt reached.
fn report_structural(state: &mut ParseState<'_>, construct: &str) {
    let (at, found) = match state.furthest_token() {
        Some(token) => (token.location(), describe_found(token)),
        None => (state.location(), TokenKind::Eof.describe().to_string()),
    };
    state.report_at(at, format!("{construct}: unexpected {found}"));
}

fn recover_statement(state: &mut ParseState<'_>) {
    let construct = match state.peek_kind() {
        TokenKind::ImportKeyword => "Invalid Import expression",
        TokenKind::LetKeyword => "Invalid `let` expression",
        TokenKind::ConstKeyword => "Invalid `const` expression",
        TokenKind::FuncStart => "Invalid function declaration",
        _ => "Invalid top-level expression",
    };
    report_structural(state, construct);
    state.advance();
    while !state.is_at_end() && !is_statement_start(state.peek_kind()) {
        state.advance();
    }
}

/// Skip to just past the `end` closing the construct the cursor is in.
fn skip_past_end(state: &mut ParseState<'_>) {
    skip_balanced(state, &[TokenKind::FuncStart, TokenKind::Case], TokenKind::EndStmt);
}

fn skip_balanced(state: &mut ParseState<'_>, openers: &[TokenKind], closer: TokenKind) {
    let mut depth = 1usize;
    while !state.is_at_end() {
        let kind = state.peek_kind();
        state.advance();
        if openers.contains(&kind) {
            depth += 1;
        } else if kind == closer {
            depth -= 1;
            if depth == 0 {
                return;
            }
        }
    }
}
