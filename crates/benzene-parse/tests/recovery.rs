use benzene_ast::diag::{Location, Phase, Severity};
use benzene_parse::parse_str;

fn messages(src: &str) -> Vec<String> {
    parse_str(src)
        .diagnostics
        .iter()
        .map(|d| d.message.clone())
        .collect()
}

#[test]
fn bad_let_is_reported_at_breaking_token() {
    let parsed = parse_str("let = 5\nlet y = 2");
    assert_eq!(parsed.forest.len(), 1);
    assert_eq!(parsed.forest[0].kind_name(), "LetBind");

    let diags: Vec<_> = parsed.diagnostics.iter().collect();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Fail);
    assert_eq!(diags[0].phase, Phase::Parser);
    assert_eq!(diags[0].location, Location { line: 1, column: 5 });
    assert_eq!(diags[0].message, "Invalid `let` expression: unexpected `=`");
}

#[test]
fn one_diagnostic_per_skipped_run() {
    let parsed = parse_str(") ) let a = 1 ] let b = 2");
    assert_eq!(parsed.forest.len(), 2);
    let msgs: Vec<_> = parsed.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        msgs,
        [
            "Invalid top-level expression: unexpected `)`",
            "Invalid top-level expression: unexpected `]`",
        ]
    );
}

#[test]
fn function_body_error_skips_to_matching_end() {
    let parsed = parse_str("func f ( ) : case x : 1 :> 2 end let end\nlet z = 1");
    assert_eq!(parsed.forest.len(), 2);
    let func = &parsed.forest[0];
    assert_eq!(func.kind_name(), "FuncDeclExpr");
    assert!(func.is_poisoned());
    assert_eq!(parsed.forest[1].kind_name(), "LetBind");
    assert_eq!(
        messages("func f ( ) : let end"),
        ["Invalid expression in body of `f`: unexpected `end`"]
    );
}

#[test]
fn function_header_error_keeps_partial_node() {
    let parsed = parse_str("func f ( a b ) x end let y = 1");
    assert_eq!(parsed.forest.len(), 2);
    let benzene_ast::ast::Node::FuncDecl(decl) = &parsed.forest[0] else {
        panic!("expected FuncDeclExpr");
    };
    assert!(decl.poisoned);
    assert_eq!(decl.params.len(), 1);
    assert_eq!(
        messages("func f ( a b ) x end"),
        ["Invalid function declaration: unexpected identifier `b`"]
    );
}

#[test]
fn function_without_name_is_not_committed() {
    let parsed = parse_str("func ( ) end");
    assert!(parsed.forest.is_empty());
    assert_eq!(
        messages("func ( ) end"),
        ["Invalid function declaration: unexpected `(`"]
    );
}

#[test]
fn unterminated_function_and_block() {
    assert_eq!(
        messages("func f ( ) : 1"),
        ["Unterminated function declaration `f`: expected `end`"]
    );

    let parsed = parse_str("let x = { 1");
    assert_eq!(parsed.forest.len(), 1);
    let benzene_ast::ast::Node::Let(bind) = &parsed.forest[0] else {
        panic!("expected LetBind");
    };
    assert!(bind.value.is_poisoned());
    assert_eq!(
        messages("let x = { 1"),
        ["Unterminated scoped expression: expected `}`"]
    );
}

#[test]
fn block_error_skips_to_matching_brace() {
    let parsed = parse_str("{ { 1 } ) 2 } let y = 1");
    assert_eq!(parsed.forest.len(), 2);
    assert!(parsed.forest[0].is_poisoned());
    assert_eq!(
        messages("{ ) }"),
        ["Invalid scoped expression: unexpected `)`"]
    );
}

#[test]
fn case_error_skips_to_matching_end() {
    let parsed = parse_str("case x : 1 2 end let y = 1");
    assert_eq!(parsed.forest.len(), 2);
    assert!(parsed.forest[0].is_poisoned());
    assert_eq!(
        messages("case x : 1 2 end"),
        ["Invalid case expression: unexpected integer literal `2`"]
    );
}

#[test]
fn lexer_and_parser_diagnostics_merge() {
    let parsed = parse_str("let x = $");
    let phases: Vec<_> = parsed.diagnostics.iter().map(|d| d.phase).collect();
    assert_eq!(phases, [Phase::Lexer, Phase::Parser]);
    assert_eq!(parsed.diagnostics.count(Severity::Warn), 1);
    assert!(parsed.diagnostics.has_errors());
}
