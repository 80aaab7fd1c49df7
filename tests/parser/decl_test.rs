//! 宣言のパーステスト

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_namespace_declaration() {
    let unit = assert_parse_success("namespace shop.orders@2;");
    assert_eq!(unit.namespace.namespace, Namespace::new(["shop", "orders"], 2));
    assert_eq!(unit.namespace.namespace.to_string(), "shop.orders@2");
    assert!(unit.imports.is_empty());
    assert!(unit.decls.is_empty());
}

#[test]
fn test_import_clauses() {
    let unit = assert_parse_success(
        "namespace a;\nimport b/*;\nimport c.d@1/[X, Y];\nimport e/* except [Z];\n",
    );
    assert_eq!(unit.imports.len(), 3);

    let glob = &unit.imports[0];
    assert!(glob.glob);
    assert!(glob.includes.is_empty() && glob.excludes.is_empty());

    let explicit = &unit.imports[1];
    assert_eq!(explicit.namespace, Namespace::new(["c", "d"], 1));
    assert!(!explicit.glob);
    let names: Vec<&str> = explicit.includes.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["X", "Y"]);

    let excluding = &unit.imports[2];
    assert!(excluding.glob);
    assert_eq!(excluding.excludes[0].name, "Z");
    assert_eq!((excluding.location.line, excluding.location.column), (4, 1));
}

#[test]
fn test_alias() {
    match parse_decl("alias Id Int64;") {
        TypeDecl::Alias(decl) => {
            assert_eq!(decl.name.name, "Id");
            assert_eq!(decl.target.to_string(), "Int64");
        }
        other => panic!("expected alias, got {:?}", other),
    }
}

#[test]
fn test_struct_with_supertype_mixins_and_constructors() {
    let source = r#"struct Order < common/Base with Audited, Tagged {
    id: OrderId;
    note: String? = "none";
    constructor String;
}"#;
    match parse_decl(source) {
        TypeDecl::Struct(decl) => {
            assert_eq!(decl.name.name, "Order");
            assert_eq!(decl.supertype.as_ref().map(ToString::to_string), Some("common/Base".to_string()));
            let mixins: Vec<String> = decl.mixins.iter().map(ToString::to_string).collect();
            assert_eq!(mixins, vec!["Audited", "Tagged"]);
            let fields: Vec<&str> = decl.fields.iter().map(|f| f.name.name.as_str()).collect();
            assert_eq!(fields, vec!["id", "note"]);
            assert_eq!(
                decl.fields[1].default.as_ref().map(|d| d.literal.clone()),
                Some(Literal::String("none".to_string()))
            );
            assert_eq!(decl.constructors.len(), 1);
            assert_eq!(decl.constructors[0].param.to_string(), "String");
        }
        other => panic!("expected struct, got {:?}", other),
    }
}

#[test]
fn test_enum_allows_trailing_comma() {
    match parse_decl("enum Status { Open, Paid, }") {
        TypeDecl::Enum(decl) => {
            let values: Vec<&str> = decl.values.iter().map(|v| v.name.as_str()).collect();
            assert_eq!(values, vec!["Open", "Paid"]);
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn test_schema() {
    match parse_decl("schema Audited with Base { createdAt: Timestamp; };") {
        TypeDecl::Schema(decl) => {
            assert_eq!(decl.mixins.len(), 1);
            assert_eq!(decl.fields[0].ty.to_string(), "Timestamp");
        }
        other => panic!("expected schema, got {:?}", other),
    }
}

#[test]
fn test_prototype_signature() {
    match parse_decl("prototype Login { user: String; } -> Session throws Denied, Locked*;") {
        TypeDecl::Prototype(decl) => {
            assert_eq!(decl.signature.fields.len(), 1);
            assert_eq!(decl.signature.returns.as_ref().map(ToString::to_string), Some("Session".to_string()));
            let throws: Vec<String> = decl.signature.throws.iter().map(ToString::to_string).collect();
            assert_eq!(throws, vec!["Denied", "Locked*"]);
        }
        other => panic!("expected prototype, got {:?}", other),
    }
}

#[test]
fn test_service_with_operations() {
    let source = r#"service Orders < Base secured by Login {
    place { order: Order; } -> OrderId throws Rejected;
    cancel { id: OrderId; };
}"#;
    match parse_decl(source) {
        TypeDecl::Service(decl) => {
            assert_eq!(decl.supertype.as_ref().map(|n| n.name.as_str()), Some("Base"));
            assert_eq!(decl.security.as_ref().map(|n| n.name.as_str()), Some("Login"));
            let ops: Vec<&str> = decl.operations.iter().map(|o| o.name.name.as_str()).collect();
            assert_eq!(ops, vec!["place", "cancel"]);
            assert!(decl.operations[1].signature.returns.is_none());
        }
        other => panic!("expected service, got {:?}", other),
    }
}

#[test]
fn test_declaration_location_starts_at_keyword() {
    let unit = assert_parse_success("namespace a;\n\n  struct S {}\n");
    let location = unit.decls[0].location();
    assert_eq!((location.line, location.column), (3, 3));
    assert_eq!(location.file, "test.idl");
}

#[test]
fn test_line_comments_are_ignored() {
    let unit = assert_parse_success("// orders\nnamespace a; // trailing\nstruct S {} // done\n");
    assert_eq!(unit.decls.len(), 1);
}

#[test]
fn test_unit_round_trips_through_json() {
    let unit = assert_parse_success("namespace a;\nimport b/*;\nstruct S { x: [Int32]+ = [1]; }\n");
    let json = serde_json::to_string(&unit).expect("serialize");
    let back: SourceUnit = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, unit);
}
