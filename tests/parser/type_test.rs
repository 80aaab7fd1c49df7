//! 型参照のパーステスト

use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case("Int32" ; "plain")]
#[test_case("Int32?" ; "nullable")]
#[test_case("Int32*" ; "pointer")]
#[test_case("[Int32]" ; "list")]
#[test_case("[Int32]+" ; "non empty list")]
#[test_case("[[String]+?]*" ; "nested")]
#[test_case("a.b@3/Name?" ; "qualified")]
#[test_case("Int64~(,0]" ; "open range")]
#[test_case("UInt8~[1,)" ; "half bounded range")]
#[test_case("String~/[a-z]+/?" ; "regex then quantifier")]
fn test_type_display_matches_source(source: &str) {
    let ty = parse_type(source).expect("type should parse");
    assert_eq!(ty.to_string(), source);
}

#[test]
fn test_list_quantifier_structure() {
    let ty = parse_type("[Int32?]+").expect("type should parse");
    match ty {
        TypeExpr::List {
            element,
            allow_empty,
        } => {
            assert!(!allow_empty);
            assert!(matches!(*element, TypeExpr::Nullable(_)));
        }
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn test_range_restriction_fields() {
    let ty = parse_type("Int32~(0,10]").expect("type should parse");
    match ty {
        TypeExpr::Named {
            restriction:
                Some(RestrictionSyntax::Range {
                    min,
                    max,
                    min_inclusive,
                    max_inclusive,
                    ..
                }),
            ..
        } => {
            assert_eq!(min.map(|m| m.literal), Some(Literal::Integer(0)));
            assert_eq!(max.map(|m| m.literal), Some(Literal::Integer(10)));
            assert!(!min_inclusive);
            assert!(max_inclusive);
        }
        other => panic!("expected range restriction, got {:?}", other),
    }
}

#[test]
fn test_base_name_looks_through_quantifiers() {
    let ty = parse_type("[shop/Money?]*").expect("type should parse");
    let base = ty.base_name();
    assert_eq!(base.name, "Money");
    assert_eq!(base.namespace, Some(Namespace::new(["shop"], 0)));
    assert_eq!(ty.location().column, 2);
}

#[test]
fn test_dotted_name_requires_namespace_separator() {
    assert!(parse_type("a.b").is_err());
    assert!(parse_type("a@1").is_err());
}
