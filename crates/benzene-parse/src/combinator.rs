//! Backtracking parser combinators over [`ParseState`].
//!
//! A rule either produces a value or fails without moving the cursor.
//! Every combinator here that consumes more than one token does so through
//! a [`Checkpoint`](crate::state::Checkpoint), so a failed attempt leaves
//! neither cursor movement nor diagnostics behind.

use crate::state::ParseState;
use benzene_ast::ast::{BinOp, BinaryExpr, Node};
use benzene_ast::token::{Token, TokenKind};

pub trait Rule<T> {
    fn parse(&self, state: &mut ParseState<'_>) -> Option<T>;
}

impl<T, F> Rule<T> for F
where
    F: Fn(&mut ParseState<'_>) -> Option<T>,
{
    fn parse(&self, state: &mut ParseState<'_>) -> Option<T> {
        self(state)
    }
}

/// Consume exactly one token of the given kind.
pub fn match_kind(kind: TokenKind) -> impl Rule<Token> {
    move |state: &mut ParseState<'_>| state.eat(kind).cloned()
}

/// Consume one token whose kind is in `kinds`.
pub fn one_of(kinds: &'static [TokenKind]) -> impl Rule<Token> {
    move |state: &mut ParseState<'_>| {
        if kinds.contains(&state.peek_kind()) {
            state.advance().cloned()
        } else {
            None
        }
    }
}

/// Run every rule in order; all or nothing.
pub fn sequence<'r, T>(rules: &'r [&'r dyn Rule<T>]) -> impl Rule<Vec<T>> + 'r {
    move |state: &mut ParseState<'_>| {
        let mut cp = state.checkpoint();
        let mut out = Vec::with_capacity(rules.len());
        for rule in rules {
            out.push(rule.parse(&mut cp)?);
        }
        cp.commit();
        Some(out)
    }
}

/// Try each alternative from the same starting position; first success wins.
pub fn first_match<'r, T>(rules: &'r [&'r dyn Rule<T>]) -> impl Rule<T> + 'r {
    move |state: &mut ParseState<'_>| {
        for rule in rules {
            let mut cp = state.checkpoint();
            if let Some(value) = rule.parse(&mut cp) {
                cp.commit();
                return Some(value);
            }
        }
        None
    }
}

/// Never fails; yields `None` without consuming when `rule` does not match.
pub fn optional<T>(rule: impl Rule<T>) -> impl Rule<Option<T>> {
    move |state: &mut ParseState<'_>| {
        let mut cp = state.checkpoint();
        let value = rule.parse(&mut cp);
        if value.is_some() {
            cp.commit();
        }
        Some(value)
    }
}

/// Zero or more repetitions. Stops at the first failure or at a match that
/// consumed nothing.
pub fn many<T>(rule: impl Rule<T>) -> impl Rule<Vec<T>> {
    move |state: &mut ParseState<'_>| {
        let mut out = Vec::new();
        loop {
            let mut cp = state.checkpoint();
            let Some(value) = rule.parse(&mut cp) else {
                break;
            };
            if cp.position() == cp.start() {
                break;
            }
            cp.commit();
            out.push(value);
        }
        Some(out)
    }
}

pub fn map<T, U>(rule: impl Rule<T>, f: impl Fn(T) -> U) -> impl Rule<U> {
    move |state: &mut ParseState<'_>| rule.parse(state).map(&f)
}

/// One precedence tier: `term (op term)*`, folded to the left.
///
/// Once the first `term` matched this never fails; a trailing operator
/// without a right operand is left unconsumed.
pub fn chain_left(term: impl Rule<Node>, op: impl Rule<Token>) -> impl Rule<Node> {
    move |state: &mut ParseState<'_>| {
        let mut lhs = term.parse(state)?;
        loop {
            let mut cp = state.checkpoint();
            let Some(op_token) = op.parse(&mut cp) else {
                break;
            };
            let Some(op) = BinOp::from_kind(op_token.kind) else {
                break;
            };
            let Some(rhs) = term.parse(&mut cp) else {
                break;
            };
            cp.commit();
            lhs = Node::Binary(BinaryExpr {
                lhs: Box::new(lhs),
                op,
                op_token,
                rhs: Box::new(rhs),
                ty: None,
                poisoned: false,
            });
        }
        Some(lhs)
    }
}
