//! エンドツーエンドのシナリオテスト

use super::*;
use idlc::error::CompileError;
use idlc::types::TypeReference;
use pretty_assertions::assert_eq;

#[test]
fn test_duplicate_struct_in_one_namespace() {
    let result = compile(&["namespace a;\nstruct S1 {}\nstruct S1 {}\n"]);

    let rendered: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["unit0.idl:3:1: a/S1 conflicts with earlier declaration at unit0.idl:2:1"]
    );
    assert_eq!(result.built_types.len(), 1);
    assert!(matches!(built(&result, "a/S1"), Definition::Struct(_)));
}

#[test]
fn test_struct_extending_itself() {
    let result = compile(&["namespace a;\nstruct S1 < S1 {}\n"]);

    assert_eq!(messages(&result), vec!["a/S1 is involved in a circular dependency"]);
    assert!(result.built_types.is_empty());
}

#[test]
fn test_mutually_recursive_aliases() {
    let result = compile(&["namespace a;\nalias A1 A2;\nalias A2 A1*;\n"]);

    let rendered: Vec<String> = result.diagnostics_sorted().iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "unit0.idl:2:1: circular alias dependency: a/A1 -> a/A2 -> a/A1",
            "unit0.idl:3:1: circular alias dependency: a/A2 -> a/A1 -> a/A2",
        ]
    );
    assert!(result.built_types.is_empty());
}

#[test]
fn test_default_outside_restriction() {
    let result = compile(&["namespace a;\nstruct S {\n  x: Int32~[0,10) = 12;\n}\n"]);

    assert_eq!(messages(&result), vec!["12 does not satisfy restriction [0,10)"]);
    let x = field(&result, "a/S", "x");
    assert_eq!(x.default, None);
    assert!(matches!(&x.ty, TypeReference::Atomic { restriction: Some(_), .. }));
}

#[test]
fn test_excluded_glob_import_does_not_conflict_with_local() {
    let result = assert_success(&[
        "namespace ns1;\nstruct S2 {}\nstruct S3 {}\n",
        "namespace ns2;\nimport ns1/* except [S2];\nstruct S2 {}\nstruct User { local: S2; other: S3; }\n",
    ]);

    assert_eq!(field(&result, "ns2/User", "local").ty.base_name(), &qname("ns2/S2"));
    assert_eq!(field(&result, "ns2/User", "other").ty.base_name(), &qname("ns1/S3"));
}

#[test]
fn test_empty_input_without_external_types() {
    let result = Compilation::new(Vec::new(), Some(DefinitionMap::new()))
        .execute()
        .expect("Compilation should run");

    assert!(result.built_types.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_missing_external_types_is_an_error() {
    let result = Compilation::new(Vec::new(), None).execute();
    assert_eq!(result.unwrap_err(), CompileError::MissingExternalTypes);
}

#[test]
fn test_repeated_failures_collapse_into_one_diagnostic() {
    // Missing の解決失敗は A の構築時と、A を展開する B の構築時の2回起きる
    let result = compile(&["namespace a;\nalias A Missing;\nalias B A;\nstruct S { x: A; y: B; }\n"]);

    assert_eq!(messages(&result), vec!["unresolved type reference Missing"]);
    assert!(!result.built_types.contains_key(&qname("a/A")));
    assert!(!result.built_types.contains_key(&qname("a/B")));
    assert_eq!(built(&result, "a/S").fields().map(|f| f.len()), Some(0));
}

#[test]
fn test_built_types_serialize_to_json() {
    let result = assert_success(&["namespace a;\nenum Status { Open, Paid }\n"]);

    let json = serde_json::to_string(&result.built_types).expect("serialize");
    assert_eq!(json, r#"{"a/Status":{"Enum":{"name":"a/Status","values":["Open","Paid"]}}}"#);
}

/// 常に同じ値を返す評価器
struct FixedEvaluator(i128);

impl idlc::value::Evaluator for FixedEvaluator {
    fn evaluate(
        &self,
        _expr: &idlc::value::Expr,
        _definitions: &dyn idlc::types::DefinitionLookup,
    ) -> Result<idlc::value::Value, idlc::value::EvalError> {
        Ok(idlc::value::Value::Int(self.0))
    }
}

#[test]
fn test_evaluator_can_be_replaced() {
    let unit = parse_source("unit0.idl", "namespace a;\nstruct S { n: Int32 = 1; }\n").expect("Parsing should succeed");
    let result = Compilation::new(vec![unit], Some(core_types()))
        .with_evaluator(FixedEvaluator(7))
        .execute()
        .expect("Compilation should run");
    assert!(result.is_success(), "{:?}", messages(&result));
    assert_eq!(
        field(&result, "a/S", "n").default,
        Some(idlc::value::Value::Int(7))
    );
}
