//! フィールド集合、ミックスイン、既定値のテスト

use super::*;
use idlc::value::Value;
use pretty_assertions::assert_eq;

fn enum_value(ty: &str, value: &str) -> Value {
    Value::Enum {
        ty: qname(ty),
        value: value.to_string(),
    }
}

#[test]
fn test_defaults_are_evaluated_and_cast() {
    let result = assert_success(&[r#"namespace a;
enum Status { Open, Paid }
struct Order {
    status: Status = Status.Paid;
    count: Int32 = 3;
    ratio: Float64 = 2;
    tags: [String] = ["new", "gift"];
    weights: [Float32]+ = [1, 2.5];
    note: String? = null;
    flag: Boolean = true;
    plain: Int64;
}
"#]);

    assert_eq!(field(&result, "a/Order", "status").default, Some(enum_value("a/Status", "Paid")));
    assert_eq!(field(&result, "a/Order", "count").default, Some(Value::Int(3)));
    assert_eq!(field(&result, "a/Order", "ratio").default, Some(Value::Float(2.0)));
    assert_eq!(
        field(&result, "a/Order", "tags").default,
        Some(Value::List(vec![
            Value::String("new".to_string()),
            Value::String("gift".to_string()),
        ]))
    );
    assert_eq!(
        field(&result, "a/Order", "weights").default,
        Some(Value::List(vec![Value::Float(1.0), Value::Float(2.5)]))
    );
    assert_eq!(field(&result, "a/Order", "note").default, Some(Value::Null));
    assert_eq!(field(&result, "a/Order", "flag").default, Some(Value::Bool(true)));
    assert_eq!(field(&result, "a/Order", "plain").default, None);
}

#[test]
fn test_enum_constant_through_qualified_path() {
    let result = assert_success(&[
        "namespace shop.common;\nenum Currency { JPY, USD }\n",
        "namespace shop;\nstruct Price { currency: shop.common/Currency = shop.common.Currency.JPY; }\n",
    ]);
    assert_eq!(
        field(&result, "shop/Price", "currency").default,
        Some(enum_value("shop.common/Currency", "JPY"))
    );
}

#[test]
fn test_enum_constant_in_versioned_namespace() {
    let result = assert_success(&[
        "namespace shop.common@2;\nenum Currency { JPY, USD }\n",
        "namespace shop;\nstruct Price { currency: shop.common@2/Currency = shop.common@2/Currency.USD; }\n",
    ]);
    assert_eq!(
        field(&result, "shop/Price", "currency").default,
        Some(enum_value("shop.common@2/Currency", "USD"))
    );
}

#[test]
fn test_unversioned_constant_path_misses_versioned_namespace() {
    assert_single_error(
        &[
            "namespace shop.common@2;\nenum Currency { JPY }\n",
            "namespace shop;\nstruct Price { currency: shop.common@2/Currency = shop.common.Currency.JPY; }\n",
        ],
        "unresolvable constant identifier shop.common.Currency.JPY",
    );
}

#[test]
fn test_default_may_reference_enum_declared_later() {
    let result = assert_success(&["namespace a;\nstruct S { s: Status = Status.Paid; }\nenum Status { Open, Paid }\n"]);
    assert_eq!(field(&result, "a/S", "s").default, Some(enum_value("a/Status", "Paid")));
}

#[test]
fn test_unresolvable_constant() {
    let result = assert_single_error(
        &["namespace a;\nstruct S { x: Int32 = Nope.Value; }\n"],
        "unresolvable constant identifier Nope.Value",
    );
    assert_eq!(field(&result, "a/S", "x").default, None);
}

#[test]
fn test_unknown_enum_member() {
    assert_single_error(
        &["namespace a;\nenum E { X }\nstruct S { e: E = E.Y; }\n"],
        "unresolvable constant identifier E.Y",
    );
}

#[test]
fn test_constant_of_another_enum() {
    assert_single_error(
        &["namespace a;\nenum A { X }\nenum B { Y }\nstruct S { b: B = A.X; }\n"],
        "cannot cast A.X to a/B",
    );
}

#[test]
fn test_default_type_mismatch() {
    assert_single_error(
        &["namespace a;\nstruct S { name: String = 42; }\n"],
        "cannot cast 42 to core/String",
    );
}

#[test]
fn test_empty_default_for_non_empty_list() {
    assert_single_error(
        &["namespace a;\nstruct S { tags: [String]+ = []; }\n"],
        "empty list is not allowed for [core/String]+",
    );
}

#[test]
fn test_duplicate_direct_field() {
    let result = assert_single_error(
        &["namespace a;\nstruct S {\n  x: Int32;\n  x: String;\n}\n"],
        "field x is already declared at unit0.idl:3:3",
    );
    assert_eq!(field(&result, "a/S", "x").ty.base_name(), &qname("core/Int32"));
}

#[test]
fn test_supertype_fields_and_defaults_are_inherited() {
    let result = assert_success(&[
        "namespace a;\nstruct Entity < Base { name: String; }\nstruct Base { id: Int32 = 7; }\n",
    ]);
    let fields = built(&result, "a/Entity").fields().expect("struct fields");
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["id", "name"]);
    assert_eq!(field(&result, "a/Entity", "id").default, Some(Value::Int(7)));
}

#[test]
fn test_identical_redefinition_of_inherited_field() {
    assert_success(&["namespace a;\nstruct Base { id: Int32 = 1; }\nstruct S < Base { id: Int32 = 1; }\n"]);
}

#[test]
fn test_conflicting_redefinition_of_inherited_field() {
    let result = compile(&["namespace a;\nstruct Base { id: Int32; }\nstruct S < Base {\n  id: Int64;\n}\n"]);
    let rendered: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["unit0.idl:3:1: field id of a/S has conflicting definitions from declaration at unit0.idl:4:3, supertype a/Base"]
    );
    assert_eq!(field(&result, "a/S", "id").ty.base_name(), &qname("core/Int64"));
}

#[test]
fn test_shared_mixin_field_with_identical_definitions() {
    let result = assert_success(&[r#"namespace a;
schema Audited { createdBy: String = "system"; }
schema Left with Audited {}
schema Right with Audited {}
struct Doc with Left, Right { title: String; }
"#]);
    let created = field(&result, "a/Doc", "createdBy");
    assert_eq!(created.default, Some(Value::String("system".to_string())));
}

#[test]
fn test_shared_mixin_field_with_different_defaults() {
    assert_single_error(
        &[r#"namespace a;
schema Left { priority: Int32 = 1; }
schema Right { priority: Int32 = 2; }
struct Task with Left, Right {}
"#],
        "field priority of a/Task has conflicting definitions from mixin a/Left, mixin a/Right",
    );
}

#[test]
fn test_shared_mixin_field_with_different_types() {
    assert_single_error(
        &["namespace a;\nschema Left { id: Int32; }\nschema Right { id: Int64; }\nschema Both with Left, Right {}\n"],
        "field id of a/Both has conflicting definitions from mixin a/Left, mixin a/Right",
    );
}

#[test]
fn test_shared_mixin_field_with_equal_list_defaults() {
    let result = assert_success(&[r#"namespace a;
schema Left { sizes: [Int32] = [1, 2]; }
schema Right { sizes: [Int32] = [1, 2]; }
struct Box with Left, Right {}
"#]);
    assert_eq!(
        field(&result, "a/Box", "sizes").default,
        Some(Value::List(vec![Value::Int(1), Value::Int(2)]))
    );
}

#[test]
fn test_shared_mixin_field_with_reordered_list_defaults() {
    assert_single_error(
        &[r#"namespace a;
schema Left { sizes: [Int32] = [1, 2]; }
schema Right { sizes: [Int32] = [2, 1]; }
struct Box with Left, Right {}
"#],
        "field sizes of a/Box has conflicting definitions from mixin a/Left, mixin a/Right",
    );
}

#[test]
fn test_schema_mixins_are_built_first() {
    let result = assert_success(&[
        "namespace a;\nschema Outer with Inner { b: Int32; }\nschema Inner { a: String = \"x\"; }\n",
    ]);
    let fields = built(&result, "a/Outer").fields().expect("schema fields");
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(field(&result, "a/Outer", "a").default, Some(Value::String("x".to_string())));
}

#[test]
fn test_mixin_must_be_a_schema() {
    assert_single_error(
        &["namespace a;\nstruct T {}\nstruct S with T {}\n"],
        "a/T is not a schema",
    );
}

#[test]
fn test_circular_mixins() {
    let result = assert_single_error(
        &["namespace a;\nschema B with A {}\nschema A with B {}\nschema C {}\n"],
        "circular mixin dependency among a/A, a/B",
    );
    assert!(!result.built_types.contains_key(&qname("a/A")));
    assert!(!result.built_types.contains_key(&qname("a/B")));
    assert!(result.built_types.contains_key(&qname("a/C")));
}

#[test]
fn test_struct_supertype_must_be_a_struct() {
    assert_single_error(
        &["namespace a;\nschema X {}\nstruct S < X {}\n"],
        "supertype a/X of a/S is not a struct",
    );
}

#[test]
fn test_struct_supertype_cycle() {
    let result = compile(&["namespace a;\nstruct A < B {}\nstruct B < A {}\nstruct C < A {}\n"]);
    assert_eq!(
        messages(&result),
        vec![
            "a/A is involved in a circular dependency",
            "a/B is involved in a circular dependency",
            "a/C is involved in a circular dependency",
        ]
    );
    assert!(result.built_types.is_empty());
}

#[test]
fn test_duplicate_enum_values() {
    let result = assert_single_error(
        &["namespace a;\nenum E { A, B, A }\n"],
        "duplicate enum value A in a/E (first declared at unit0.idl:2:10)",
    );
    match built(&result, "a/E") {
        Definition::Enum(def) => assert_eq!(def.values, vec!["A", "B"]),
        other => panic!("expected enum, got {:?}", other),
    }
}
