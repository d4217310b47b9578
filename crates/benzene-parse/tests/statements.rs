use benzene_ast::ast::Node;
use benzene_ast::token::TokenKind;
use benzene_parse::parse_str;

fn parse_clean(src: &str) -> Vec<Node> {
    let parsed = parse_str(src);
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    parsed.forest
}

#[test]
fn let_with_type_annotation() {
    let forest = parse_clean("let x : Int = 5");
    let Node::Let(bind) = &forest[0] else {
        panic!("expected LetBind");
    };
    assert_eq!(bind.name.name(), "x");
    assert_eq!(bind.ty.as_ref().map(|t| t.text.as_str()), Some("Int"));
}

#[test]
fn const_takes_a_single_literal() {
    let forest = parse_clean("const pi : Float = 3.14 const name = \"bz\" const nothing = Nil");
    assert_eq!(forest.len(), 3);
    let Node::Const(pi) = &forest[0] else {
        panic!("expected ConstExpr");
    };
    assert_eq!(pi.value.token.kind, TokenKind::FloatLiteral);
    assert_eq!(pi.ty.as_ref().map(|t| t.text.as_str()), Some("Float"));

    let parsed = parse_str("const x = y");
    assert!(parsed.forest.is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics.iter().next().unwrap().message.starts_with("Invalid `const` expression"));
}

#[test]
fn import_directive() {
    let forest = parse_clean("Load std.io\nlet x = 1");
    assert_eq!(forest.len(), 2);
    let Node::Import(import) = &forest[0] else {
        panic!("expected ImportDirective");
    };
    assert_eq!(import.module.text, "std.io");
}

#[test]
fn scoped_block_holds_statements() {
    let forest = parse_clean("{ let a = 1 a }");
    let Node::Scope(scope) = &forest[0] else {
        panic!("expected ScopeExpr");
    };
    let kinds: Vec<_> = scope.expressions.iter().map(Node::kind_name).collect();
    assert_eq!(kinds, ["LetBind", "Identifier"]);
}

#[test]
fn bare_identifier_is_not_a_call() {
    let forest = parse_clean("f let g = f ( )");
    assert_eq!(forest[0].kind_name(), "Identifier");
    let Node::Let(bind) = &forest[1] else {
        panic!("expected LetBind");
    };
    let Node::Call(call) = &*bind.value else {
        panic!("expected CallExpr");
    };
    assert!(call.args.is_empty());
}

#[test]
fn nested_call_arguments() {
    let forest = parse_clean("f ( g ( 1 ) , 2 )");
    let Node::Call(call) = &forest[0] else {
        panic!("expected CallExpr");
    };
    assert_eq!(call.args.len(), 2);
    assert_eq!(call.args[0].kind_name(), "CallExpr");
    assert_eq!(call.args[1].kind_name(), "Literal");
}

#[test]
fn function_header_variants() {
    let forest = parse_clean(
        "func f ( a : Int , b ) :> Int , a end
         func g ( ) x end
         func h ( ) : end",
    );
    assert_eq!(forest.len(), 3);
    let Node::FuncDecl(f) = &forest[0] else {
        panic!("expected FuncDeclExpr");
    };
    assert_eq!(f.params[0].ty.as_ref().map(|t| t.text.as_str()), Some("Int"));
    assert!(f.params[1].ty.is_none());
    assert_eq!(f.return_type.as_ref().map(|t| t.text.as_str()), Some("Int"));

    let Node::FuncDecl(g) = &forest[1] else {
        panic!("expected FuncDeclExpr");
    };
    assert!(g.params.is_empty());
    assert_eq!(g.body.len(), 1);

    let Node::FuncDecl(h) = &forest[2] else {
        panic!("expected FuncDeclExpr");
    };
    assert!(h.body.is_empty());
}

#[test]
fn nested_functions_and_case_in_body() {
    let forest = parse_clean(
        "func outer ( n ) :
            func inner ( m ) : m * 2 end
            let r = case n : 0 :> inner ( 1 ) 1 , 2 :> inner ( n ) end
            r
         end",
    );
    let Node::FuncDecl(outer) = &forest[0] else {
        panic!("expected FuncDeclExpr");
    };
    let kinds: Vec<_> = outer.body.iter().map(Node::kind_name).collect();
    assert_eq!(kinds, ["FuncDeclExpr", "LetBind", "Identifier"]);
    let Node::Let(bind) = &outer.body[1] else {
        unreachable!()
    };
    let Node::Case(case) = &*bind.value else {
        panic!("expected CaseExpr");
    };
    assert_eq!(case.branches[1].patterns.len(), 2);
}

#[test]
fn case_with_several_conditions() {
    let forest = parse_clean("case a , b : 1 , 2 :> True end");
    let Node::Case(case) = &forest[0] else {
        panic!("expected CaseExpr");
    };
    assert_eq!(case.conditions.len(), 2);
    assert_eq!(case.branches.len(), 1);
}

#[test]
fn import_without_module_leaves_nothing_behind() {
    let parsed = parse_str("Load\nlet x = 1");
    assert_eq!(parsed.forest.len(), 1);
    assert_eq!(parsed.forest[0].kind_name(), "LetBind");
    let messages: Vec<_> = parsed.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Invalid Import expression"), "{messages:?}");
}

#[test]
fn colon_without_type_name_is_not_an_annotation() {
    let parsed = parse_str("let x : = 1");
    assert!(parsed.forest.is_empty());
    let messages: Vec<_> = parsed.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Invalid `let` expression"), "{messages:?}");
}
