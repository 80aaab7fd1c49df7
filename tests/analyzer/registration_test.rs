//! 宣言の登録テスト

use super::*;

#[test]
fn test_conflict_with_externally_loaded_type() {
    let mut external = core_types();
    let ext = qname("a/Ext");
    external.insert(ext.clone(), Definition::Primitive(ext.clone()));

    let result = compile_with(&["namespace a;\nstruct Ext {}\n"], external);

    let rendered: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(rendered, vec!["unit0.idl:2:1: a/Ext conflicts with externally loaded type"]);
    assert!(result.built_types.is_empty());
}

#[test]
fn test_core_primitive_cannot_be_redeclared() {
    assert_single_error(
        &["namespace core;\nstruct String {}\n"],
        "core/String conflicts with externally loaded type",
    );
}

#[test]
fn test_duplicate_across_source_units_of_one_namespace() {
    let result = compile(&["namespace a;\nstruct S {}\n", "namespace a;\nenum S { X }\n"]);

    let rendered: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["unit1.idl:2:1: a/S conflicts with earlier declaration at unit0.idl:2:1"]
    );
    assert!(matches!(built(&result, "a/S"), Definition::Struct(_)));
}

#[test]
fn test_same_name_in_different_namespaces() {
    let result = assert_success(&[
        "namespace a;\nstruct S {}\n",
        "namespace b;\nstruct S {}\n",
        "namespace a@2;\nstruct S {}\n",
    ]);
    assert_eq!(result.built_types.len(), 3);
    assert!(result.built_types.contains_key(&qname("a@2/S")));
}

#[test]
fn test_conflicting_declaration_is_not_built_even_when_valid() {
    let result = compile(&["namespace a;\nalias T Int32;\nalias T String;\nstruct U { t: T; }\n"]);

    assert_eq!(messages(&result).len(), 1);
    assert_eq!(field(&result, "a/U", "t").ty.base_name(), &qname("core/Int32"));
}

#[test]
fn test_external_types_are_not_part_of_the_output() {
    let result = assert_success(&["namespace a;\nstruct S { n: Int32; }\n"]);
    assert_eq!(result.built_types.len(), 1);
    assert!(!result.built_types.contains_key(&qname("core/Int32")));
}

#[test]
fn test_each_kind_is_built_by_its_own_builder() {
    let result = assert_success(&[r#"namespace a;
service Api secured by Login { get {} -> Order; }
prototype Login { authentication: Token; } -> Order;
struct Order with Tagged { state: State = State.Open; }
schema Tagged { tag: Token; }
enum State { Open, Closed }
alias Token String;
"#]);

    let names = ["a/Api", "a/Login", "a/Order", "a/Tagged", "a/State", "a/Token"];
    let kinds: Vec<(&str, idlc::ast::TypeKind)> = names
        .into_iter()
        .map(|name| (name, built(&result, name).kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("a/Api", idlc::ast::TypeKind::Service),
            ("a/Login", idlc::ast::TypeKind::Prototype),
            ("a/Order", idlc::ast::TypeKind::Struct),
            ("a/Tagged", idlc::ast::TypeKind::Schema),
            ("a/State", idlc::ast::TypeKind::Enum),
            ("a/Token", idlc::ast::TypeKind::Alias),
        ]
    );
}
