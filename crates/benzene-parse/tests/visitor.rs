use benzene_ast::ast::{count_poisoned, Identifier, Literal, Node};
use benzene_ast::token::{Token, TokenKind};
use benzene_ast::visit::{Visit, VisitMut};
use benzene_parse::parse_str;

#[derive(Default)]
struct References(Vec<String>);

impl Visit for References {
    fn visit_identifier(&mut self, ident: &Identifier) {
        self.0.push(ident.name().to_string());
    }
}

#[test]
fn identifier_references_in_source_order() {
    let parsed = parse_str(
        "func f ( a ) : g ( a , b ) |> h ( c ) end
         let z = case d : e :> k end",
    );
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);

    let mut refs = References::default();
    for node in &parsed.forest {
        refs.visit_node(node);
    }
    assert_eq!(refs.0, ["a", "b", "c", "d", "e", "k"]);
}

struct AnnotateLiterals;

impl VisitMut for AnnotateLiterals {
    fn visit_literal_mut(&mut self, lit: &mut Literal) {
        let name = match lit.token.kind {
            TokenKind::IntegerLiteral => "Int",
            TokenKind::StringLiteral => "String",
            _ => "Any",
        };
        lit.ty = Some(Token::new(
            TokenKind::Identifier,
            name,
            lit.token.line,
            lit.token.column,
        ));
    }
}

#[test]
fn mutable_visitor_rewrites_fields_in_place() {
    let mut forest = parse_str(r#"let x = 1 + "s""#).forest;
    for node in &mut forest {
        AnnotateLiterals.visit_node_mut(node);
    }
    let Node::Let(bind) = &forest[0] else {
        panic!("expected LetBind");
    };
    let Node::Binary(sum) = &*bind.value else {
        panic!("expected BinaryExpr");
    };
    assert_eq!(sum.lhs.ty().map(|t| t.text.as_str()), Some("Int"));
    assert_eq!(sum.rhs.ty().map(|t| t.text.as_str()), Some("String"));
}

#[test]
fn count_poisoned_after_recovery() {
    let parsed = parse_str("func f ( a b ) end { ) } let ok = 1");
    assert_eq!(parsed.forest.len(), 3);
    assert_eq!(count_poisoned(&parsed.forest), 2);
}
