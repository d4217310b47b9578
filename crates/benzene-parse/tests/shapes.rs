use benzene_ast::ast::{BinOp, Node};
use benzene_ast::token::TokenKind;
use benzene_parse::grammar;
use benzene_parse::{parse, parse_str, tokenize, ParseState};

fn parse_clean(src: &str) -> Vec<Node> {
    let parsed = parse_str(src);
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics for {src:?}: {:?}",
        parsed.diagnostics
    );
    parsed.forest
}

#[test]
fn function_declaration_shape() {
    let forest = parse_clean("func add ( a , b ) : a + b end");
    assert_eq!(forest.len(), 1);
    let Node::FuncDecl(decl) = &forest[0] else {
        panic!("expected FuncDeclExpr, got {}", forest[0].kind_name());
    };
    assert_eq!(decl.name.text, "add");
    let params: Vec<_> = decl.params.iter().map(|p| p.name.text.as_str()).collect();
    assert_eq!(params, ["a", "b"]);
    assert_eq!(decl.body.len(), 1);
    let Node::Binary(body) = &decl.body[0] else {
        panic!("expected BinaryExpr body");
    };
    assert_eq!(body.op, BinOp::Add);
    assert_eq!(body.op_token.text, "+");
}

#[test]
fn pipe_chain_is_flat_and_ordered() {
    let forest = parse_clean("f ( 1 ) |> g ( ) |> h ( )");
    assert_eq!(forest.len(), 1);
    let Node::CallChain(chain) = &forest[0] else {
        panic!("expected CallChain, got {}", forest[0].kind_name());
    };
    let names: Vec<_> = chain.calls.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["f", "g", "h"]);
    assert_eq!(chain.calls[0].args.len(), 1);
    assert!(chain.calls[1].args.is_empty());
}

#[test]
fn single_call_is_not_a_chain() {
    let forest = parse_clean("f ( 1 , x )");
    let Node::Call(call) = &forest[0] else {
        panic!("expected CallExpr");
    };
    assert_eq!(call.args.len(), 2);
}

#[test]
fn case_structure() {
    let forest = parse_clean(r#"case 1 : 1 :> "one" 2 :> "two" end"#);
    assert_eq!(forest.len(), 1);
    let Node::Case(case) = &forest[0] else {
        panic!("expected CaseExpr");
    };
    assert_eq!(case.conditions.len(), 1);
    assert_eq!(case.branches.len(), 2);
    for branch in &case.branches {
        assert_eq!(branch.patterns.len(), 1);
    }
    let Node::Literal(result) = &*case.branches[1].result else {
        panic!("expected literal result");
    };
    assert_eq!(result.token.text, "two");
}

#[test]
fn subtraction_is_left_associative() {
    let forest = parse_clean("let v = 1 - 2 - 3");
    let Node::Let(bind) = &forest[0] else {
        panic!("expected LetBind");
    };
    let Node::Binary(outer) = &*bind.value else {
        panic!("expected BinaryExpr");
    };
    assert_eq!(outer.op, BinOp::Sub);
    let Node::Literal(three) = &*outer.rhs else {
        panic!("rhs should be the literal 3");
    };
    assert_eq!(three.token.text, "3");
    let Node::Binary(inner) = &*outer.lhs else {
        panic!("lhs should be (1 - 2)");
    };
    assert_eq!(inner.op, BinOp::Sub);
}

#[test]
fn failed_statement_leaves_cursor_in_place() {
    let lexed = tokenize(") 1");
    let mut state = ParseState::new(&lexed.tokens);
    assert!(grammar::statement(&mut state).is_none());
    assert_eq!(state.position(), 0);
    assert!(state.diagnostics().is_empty());
}

#[test]
fn parse_accepts_tokens_without_eof() {
    let mut tokens = tokenize("let x = 1").tokens;
    assert_eq!(tokens.pop().map(|t| t.kind), Some(TokenKind::Eof));
    let (forest, diags) = parse(&tokens);
    assert_eq!(forest.len(), 1);
    assert!(diags.is_empty());
}

#[test]
fn empty_input_gives_empty_forest() {
    let (forest, diags) = parse(&[]);
    assert!(forest.is_empty());
    assert!(diags.is_empty());
    assert!(parse_clean("Cmt nothing here").is_empty());
}
