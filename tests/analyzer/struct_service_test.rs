//! コンストラクタ、送出型、サービス、セキュリティのテスト

use super::*;
use idlc::types::{ServiceDefinition, StructDefinition, TypeReference};
use idlc::value::Value;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn struct_def<'r>(result: &'r CompilationResult, name: &str) -> &'r StructDefinition {
    match built(result, name) {
        Definition::Struct(def) => def,
        other => panic!("expected struct, got {:?}", other),
    }
}

fn service_def<'r>(result: &'r CompilationResult, name: &str) -> &'r ServiceDefinition {
    match built(result, name) {
        Definition::Service(def) => def,
        other => panic!("expected service, got {:?}", other),
    }
}

fn rendered(types: &[TypeReference]) -> Vec<String> {
    types.iter().map(ToString::to_string).collect()
}

// ==================== コンストラクタ ====================

#[test]
fn test_constructors_are_resolved() {
    let result = assert_success(&[
        "namespace a;\nalias Code String~/[0-9]+/;\nstruct Id {\n  constructor Code;\n  constructor [Int32]+;\n}\n",
    ]);
    assert_eq!(
        rendered(&struct_def(&result, "a/Id").constructors),
        vec!["core/String~/[0-9]+/", "[core/Int32]+"]
    );
}

#[test_case("S", "constructor of a/S cannot take a/S itself" ; "self")]
#[test_case("S?", "constructor of a/S cannot take a/S itself" ; "nullable self")]
#[test_case("Map", "constructor of a/S cannot take the raw symbol map core/Map" ; "symbol map")]
fn test_forbidden_constructor(param: &str, expected: &str) {
    let source = format!("namespace a;\nstruct S {{ constructor {}; }}\n", param);
    let result = assert_single_error(&[&source], expected);
    assert!(struct_def(&result, "a/S").constructors.is_empty());
}

#[test]
fn test_duplicate_constructor() {
    let result = assert_single_error(
        &["namespace a;\nstruct S { constructor String; constructor String; }\n"],
        "duplicate constructor core/String in a/S",
    );
    assert_eq!(struct_def(&result, "a/S").constructors.len(), 1);
}

#[test]
fn test_ambiguous_constructors() {
    let result = compile(&["namespace a;\nstruct S {\n  constructor String;\n  constructor String?;\n}\n"]);
    assert_eq!(
        messages(&result),
        vec!["ambiguous constructors of a/S: core/String at unit0.idl:3:3, core/String? at unit0.idl:4:3"]
    );
}

#[test]
fn test_list_constructor_is_distinct_from_element() {
    assert_success(&["namespace a;\nstruct S { constructor String; constructor [String]; }\n"]);
}

// ==================== 送出型 ====================

#[test]
fn test_prototype_signature() {
    let result = assert_success(&[
        "namespace a;\nstruct NotFound {}\nstruct Denied {}\nprototype Lookup { id: Int64; verbose: Boolean = false; } -> String throws NotFound, Denied*;\n",
    ]);
    match built(&result, "a/Lookup") {
        Definition::Prototype(def) => {
            assert_eq!(def.signature.returns.as_ref().map(ToString::to_string), Some("core/String".to_string()));
            assert_eq!(rendered(&def.signature.throws), vec!["a/NotFound", "a/Denied*"]);
            assert_eq!(
                def.signature.fields.get("verbose").and_then(|f| f.default.clone()),
                Some(Value::Bool(false))
            );
        }
        other => panic!("expected prototype, got {:?}", other),
    }
}

#[test_case("String", "thrown type core/String of a/P is not a struct" ; "primitive")]
#[test_case("E?", "thrown type a/E? of a/P must not be nullable or a list" ; "nullable")]
#[test_case("[E]", "thrown type [a/E] of a/P must not be nullable or a list" ; "list")]
#[test_case("E**", "thrown type a/E** of a/P must be a struct behind at most one pointer" ; "double pointer")]
fn test_invalid_thrown_type(thrown: &str, expected: &str) {
    let source = format!("namespace a;\nstruct E {{}}\nprototype P {{}} throws {};\n", thrown);
    assert_single_error(&[&source], expected);
}

#[test]
fn test_ambiguous_thrown_types() {
    assert_single_error(
        &["namespace a;\nstruct E {}\nprototype P {} throws E, E*;\n"],
        "ambiguous thrown types of a/P: a/E at",
    );
}

#[test]
fn test_thrown_type_of_operation_names_the_operation() {
    assert_single_error(
        &["namespace a;\nservice S { run {} throws Int32; }\n"],
        "thrown type core/Int32 of a/S.run is not a struct",
    );
}

// ==================== サービス ====================

#[test]
fn test_service_inherits_operations_and_defaults() {
    let result = assert_success(&[
        "namespace a;\nservice Child < Base { pong {}; }\nservice Base { ping { times: Int32 = 5; } -> String; }\n",
    ]);
    let child = service_def(&result, "a/Child");
    assert_eq!(child.supertype, Some(qname("a/Base")));
    assert_eq!(child.operations.keys().collect::<Vec<_>>(), vec!["ping", "pong"]);
    let times = child.operations["ping"].signature.fields.get("times").expect("inherited field");
    assert_eq!(times.default, Some(Value::Int(5)));
}

#[test]
fn test_operation_redeclaring_inherited_one() {
    assert_single_error(
        &["namespace a;\nservice Base { ping {}; }\nservice S < Base { ping {}; }\n"],
        "operation ping of a/S redeclares an inherited operation",
    );
}

#[test]
fn test_duplicate_operation_name() {
    let result = assert_single_error(
        &["namespace a;\nservice S { ping {}; ping { n: Int32; }; }\n"],
        "duplicate operation name ping in a/S",
    );
    assert!(service_def(&result, "a/S").operations["ping"].signature.fields.is_empty());
}

#[test]
fn test_service_supertype_must_be_a_service() {
    assert_single_error(
        &["namespace a;\nstruct T {}\nservice S < T {}\n"],
        "supertype a/T of a/S is not a service",
    );
}

#[test]
fn test_service_supertype_cycle() {
    let result = compile(&["namespace a;\nservice A < B {}\nservice B < A {}\n"]);
    assert_eq!(
        messages(&result),
        vec![
            "a/A is involved in a circular dependency",
            "a/B is involved in a circular dependency",
        ]
    );
}

#[test]
fn test_security_prototype() {
    let result = assert_success(&[
        "namespace a;\nprototype Auth { authentication: String; };\nservice S secured by Auth { ping {} -> String; }\n",
    ]);
    assert_eq!(service_def(&result, "a/S").security, Some(qname("a/Auth")));
}

#[test]
fn test_security_must_be_a_prototype() {
    assert_single_error(
        &["namespace a;\nstruct Auth {}\nservice S secured by Auth {}\n"],
        "security declaration a/Auth of a/S is not a prototype",
    );
}

#[test_case("{ token: String; }" ; "wrong field name")]
#[test_case("{ authentication: String = \"x\"; }" ; "field with default")]
#[test_case("{ authentication: String; extra: Int32; }" ; "extra field")]
#[test_case("{}" ; "no field")]
fn test_malformed_security_prototype(fields: &str) {
    let source = format!(
        "namespace a;\nprototype Auth {};\nservice S secured by Auth {{}}\n",
        fields
    );
    let result = assert_single_error(
        &[&source],
        "security prototype a/Auth of a/S must have exactly one field named authentication without a default",
    );
    assert_eq!(service_def(&result, "a/S").security, None);
}

#[test]
fn test_external_security_prototype() {
    let mut external = core_types();
    let auth = qname("auth/Token");
    let mut fields = idlc::types::FieldSet::new();
    fields.insert(
        "authentication".to_string(),
        FieldDefinition {
            name: "authentication".to_string(),
            ty: TypeReference::atomic(qname("core/String")),
            default: None,
        },
    );
    external.insert(
        auth.clone(),
        Definition::Prototype(idlc::types::PrototypeDefinition {
            name: auth.clone(),
            signature: idlc::types::CallSignature {
                fields,
                returns: None,
                throws: Vec::new(),
            },
        }),
    );

    let result = compile_with(&["namespace a;\nservice S secured by auth/Token {}\n"], external);
    assert!(result.is_success(), "{:?}", messages(&result));
    assert_eq!(service_def(&result, "a/S").security, Some(auth));
}
