//! 名前空間の循環検出テスト

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_mutual_namespace_references() {
    let result = compile(&[
        "namespace b;\nstruct Y { x: a/X?; }\n",
        "namespace a;\nstruct X { y: b/Y; }\n",
    ]);

    let rendered: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["unit1.idl:1:1: circular namespace dependency among a, b"]
    );
    // 型自体は構築される
    assert_eq!(result.built_types.len(), 2);
}

#[test]
fn test_acyclic_namespace_chain() {
    assert_success(&[
        "namespace c;\nenum Level { Low, High }\n",
        "namespace b;\nimport c/*;\nstruct Item { level: Level = Level.Low; }\n",
        "namespace a;\nimport b/*;\nstruct Order { items: [Item]; }\n",
    ]);
}

#[test]
fn test_namespace_depending_on_cycle_is_not_reported() {
    let result = compile(&[
        "namespace a;\nstruct X { y: b/Y; }\n",
        "namespace b;\nstruct Y { x: a/X?; }\n",
        "namespace c;\nstruct Z { x: a/X; }\n",
    ]);

    let rendered: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["unit0.idl:1:1: circular namespace dependency among a, b"]
    );
    assert!(result.built_types.contains_key(&qname("c/Z")));
}

#[test]
fn test_cycle_through_supertype_and_mixins() {
    assert_single_error(
        &[
            "namespace a;\nstruct Base {}\nschema Tagged {}\n",
            "namespace b;\nstruct Child < a/Base with a/Tagged {}\n",
            "namespace a;\nservice Api { get {} -> b/Child; }\n",
        ],
        "circular namespace dependency among a, b",
    );
}

#[test]
fn test_cycle_through_security_prototype() {
    assert_single_error(
        &[
            "namespace auth;\nstruct Denied {}\nprototype Login { authentication: String; } throws api/Failure;\n",
            "namespace api;\nstruct Failure {}\nservice Api secured by auth/Login {}\n",
        ],
        "circular namespace dependency among api, auth",
    );
}

#[test]
fn test_versions_are_distinct_namespaces() {
    assert_success(&[
        "namespace shop@1;\nstruct Order {}\n",
        "namespace shop@2;\nstruct Order { previous: shop@1/Order?; }\n",
    ]);
}

#[test]
fn test_alias_substitution_does_not_create_an_edge() {
    // a の別名は b で使われると core の型に置き換わるため、b から a への辺はできない
    assert_success(&[
        "namespace a;\nalias Count Int32;\nstruct Holder { thing: b/Thing; }\n",
        "namespace b;\nimport a/[Count];\nstruct Thing { n: Count; }\n",
    ]);
}
