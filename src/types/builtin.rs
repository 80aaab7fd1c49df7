//! Built-in primitives of the implicit `core` namespace.

use super::{Definition, DefinitionMap, QualifiedTypeName};

/// Integer primitives with their inclusive value ranges
pub const INTEGER_PRIMITIVES: &[(&str, i128, i128)] = &[
    ("Int8", i8::MIN as i128, i8::MAX as i128),
    ("Int16", i16::MIN as i128, i16::MAX as i128),
    ("Int32", i32::MIN as i128, i32::MAX as i128),
    ("Int64", i64::MIN as i128, i64::MAX as i128),
    ("UInt8", 0, u8::MAX as i128),
    ("UInt16", 0, u16::MAX as i128),
    ("UInt32", 0, u32::MAX as i128),
    ("UInt64", 0, u64::MAX as i128),
];

pub const FLOAT_PRIMITIVES: &[&str] = &["Float32", "Float64"];

const OTHER_PRIMITIVES: &[&str] = &["Null", "Boolean", "String", "Bytes", "Timestamp", "Map"];

const REGEX_RESTRICTABLE: &[&str] = &["String"];

/// Every primitive of the `core` namespace
pub fn core_types() -> DefinitionMap {
    INTEGER_PRIMITIVES
        .iter()
        .map(|(name, _, _)| *name)
        .chain(FLOAT_PRIMITIVES.iter().copied())
        .chain(OTHER_PRIMITIVES.iter().copied())
        .map(|name| {
            let qname = QualifiedTypeName::core(name);
            (qname.clone(), Definition::Primitive(qname))
        })
        .collect()
}

/// Whether `~[min,max]` may be attached to this type
pub fn is_range_restrictable(name: &QualifiedTypeName) -> bool {
    name.namespace.is_core()
        && (INTEGER_PRIMITIVES.iter().any(|(n, _, _)| *n == name.name)
            || FLOAT_PRIMITIVES.contains(&name.name.as_str()))
}

/// Whether `~/pattern/` may be attached to this type
pub fn is_regex_restrictable(name: &QualifiedTypeName) -> bool {
    name.namespace.is_core() && REGEX_RESTRICTABLE.contains(&name.name.as_str())
}
