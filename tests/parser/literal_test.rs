//! 既定値リテラルのパーステスト

use super::*;
use pretty_assertions::assert_eq;

fn default_of(field: &str) -> Literal {
    match parse_decl(&format!("struct S {{ {} }}", field)) {
        TypeDecl::Struct(decl) => decl.fields[0]
            .default
            .clone()
            .expect("field should have a default")
            .literal,
        other => panic!("expected struct, got {:?}", other),
    }
}

#[test]
fn test_scalar_literals() {
    assert_eq!(default_of("n: Int32 = -42;"), Literal::Integer(-42));
    assert_eq!(default_of("f: Float64 = 2.5e3;"), Literal::Float(2500.0));
    assert_eq!(default_of("b: Boolean = true;"), Literal::Boolean(true));
    assert_eq!(default_of("m: String? = null;"), Literal::Null);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        default_of(r#"s: String = "line\n\"quoted\"";"#),
        Literal::String("line\n\"quoted\"".to_string())
    );
}

#[test]
fn test_list_literal() {
    match default_of("xs: [Int32] = [1, 2, 3];") {
        Literal::List(items) => {
            let values: Vec<Literal> = items.into_iter().map(|i| i.literal).collect();
            assert_eq!(
                values,
                vec![Literal::Integer(1), Literal::Integer(2), Literal::Integer(3)]
            );
        }
        other => panic!("expected list, got {:?}", other),
    }
    assert_eq!(default_of("xs: [Int32] = [];"), Literal::List(Vec::new()));
}

#[test]
fn test_constant_path() {
    assert_eq!(
        default_of("s: Status = shop.Status.Open;"),
        Literal::Constant {
            namespace: None,
            path: vec!["shop".to_string(), "Status".to_string(), "Open".to_string()],
        }
    );
}

#[test]
fn test_constant_with_explicit_namespace() {
    let literal = default_of("s: shop@2/Status = shop.common@2/Status.Open;");
    assert_eq!(
        literal,
        Literal::Constant {
            namespace: Some(Namespace::new(["shop", "common"], 2)),
            path: vec!["Status".to_string(), "Open".to_string()],
        }
    );
    assert_eq!(literal.to_string(), "shop.common@2/Status.Open");
}

#[test]
fn test_qualified_constant_requires_type_and_value() {
    let err = assert_parse_error("namespace t;\nstruct S { s: Status = shop/Status; }");
    assert_eq!(err.to_string(), "expected '.', found ';'");
}
