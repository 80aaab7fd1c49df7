//! Resolved type model produced by the analyzer.
//!
//! Everything here is fully resolved: names are qualified, aliases are
//! substituted away, restrictions are validated.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ast::{Namespace, TypeKind};
use crate::value::Value;

mod builtin;

pub use builtin::{core_types, is_range_restrictable, is_regex_restrictable, FLOAT_PRIMITIVES, INTEGER_PRIMITIVES};

/// The unique key of every type: namespace plus declared name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedTypeName {
    pub namespace: Namespace,
    pub name: String,
}

impl QualifiedTypeName {
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    pub fn core(name: impl Into<String>) -> Self {
        Self::new(Namespace::core(), name)
    }
}

impl fmt::Display for QualifiedTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for QualifiedTypeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s
            .rsplit_once('/')
            .ok_or_else(|| format!("qualified type name '{}' has no namespace", s))?;
        if name.is_empty() {
            return Err(format!("qualified type name '{}' has no type name", s));
        }
        Ok(Self::new(namespace.parse()?, name))
    }
}

// Serialized as "ns@v/Name" so it can be used as a JSON map key.
impl Serialize for QualifiedTypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedTypeName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One end of a range restriction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    Unbounded,
    Inclusive(Value),
    Exclusive(Value),
}

impl Bound {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Bound::Unbounded => None,
            Bound::Inclusive(v) | Bound::Exclusive(v) => Some(v),
        }
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self, Bound::Exclusive(_))
    }
}

/// Validated min/max constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRestriction {
    pub min: Bound,
    pub max: Bound,
}

impl fmt::Display for RangeRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.min {
            Bound::Unbounded => write!(f, "(")?,
            Bound::Inclusive(v) => write!(f, "[{}", v)?,
            Bound::Exclusive(v) => write!(f, "({}", v)?,
        }
        write!(f, ",")?;
        match &self.max {
            Bound::Unbounded => write!(f, ")"),
            Bound::Inclusive(v) => write!(f, "{}]", v),
            Bound::Exclusive(v) => write!(f, "{})", v),
        }
    }
}

/// Restriction narrowing the legal values of an atomic type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Restriction {
    Regex(String),
    Range(RangeRestriction),
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restriction::Regex(pattern) => write!(f, "/{}/", pattern),
            Restriction::Range(range) => write!(f, "{}", range),
        }
    }
}

/// Fully resolved type reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeReference {
    Atomic {
        name: QualifiedTypeName,
        restriction: Option<Restriction>,
    },
    Nullable(Box<TypeReference>),
    List {
        element: Box<TypeReference>,
        allow_empty: bool,
    },
    Pointer(Box<TypeReference>),
}

impl TypeReference {
    pub fn atomic(name: QualifiedTypeName) -> Self {
        TypeReference::Atomic {
            name,
            restriction: None,
        }
    }

    /// The atomic name at the bottom of all quantifiers
    pub fn base_name(&self) -> &QualifiedTypeName {
        match self {
            TypeReference::Atomic { name, .. } => name,
            TypeReference::Nullable(inner) | TypeReference::Pointer(inner) => inner.base_name(),
            TypeReference::List { element, .. } => element.base_name(),
        }
    }

    /// A plain unrestricted atomic reference, substitutable by name
    pub fn is_plain(&self) -> bool {
        matches!(
            self,
            TypeReference::Atomic {
                restriction: None,
                ..
            }
        )
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Atomic { name, restriction } => {
                write!(f, "{}", name)?;
                if let Some(r) = restriction {
                    write!(f, "~{}", r)?;
                }
                Ok(())
            }
            TypeReference::Nullable(inner) => write!(f, "{}?", inner),
            TypeReference::Pointer(inner) => write!(f, "{}*", inner),
            TypeReference::List {
                element,
                allow_empty,
            } => {
                write!(f, "[{}]", element)?;
                if !allow_empty {
                    write!(f, "+")?;
                }
                Ok(())
            }
        }
    }
}

/// A field of a struct, schema or call signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeReference,
    pub default: Option<Value>,
}

/// Field name to definition; keys are unique after merging
pub type FieldSet = IndexMap<String, FieldDefinition>;

/// Fields, return type and thrown types
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CallSignature {
    pub fields: FieldSet,
    pub returns: Option<TypeReference>,
    pub throws: Vec<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub signature: CallSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasDefinition {
    pub name: QualifiedTypeName,
    pub target: TypeReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub name: QualifiedTypeName,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDefinition {
    pub name: QualifiedTypeName,
    pub supertype: Option<QualifiedTypeName>,
    pub mixins: Vec<QualifiedTypeName>,
    pub fields: FieldSet,
    pub constructors: Vec<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: QualifiedTypeName,
    pub mixins: Vec<QualifiedTypeName>,
    pub fields: FieldSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeDefinition {
    pub name: QualifiedTypeName,
    pub signature: CallSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: QualifiedTypeName,
    pub supertype: Option<QualifiedTypeName>,
    pub operations: IndexMap<String, Operation>,
    pub security: Option<QualifiedTypeName>,
}

/// Built output, one per declared (or externally supplied) type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Definition {
    Primitive(QualifiedTypeName),
    AliasedType(AliasDefinition),
    Enum(EnumDefinition),
    Struct(StructDefinition),
    Schema(SchemaDefinition),
    Prototype(PrototypeDefinition),
    Service(ServiceDefinition),
}

impl Definition {
    pub fn name(&self) -> &QualifiedTypeName {
        match self {
            Definition::Primitive(name) => name,
            Definition::AliasedType(d) => &d.name,
            Definition::Enum(d) => &d.name,
            Definition::Struct(d) => &d.name,
            Definition::Schema(d) => &d.name,
            Definition::Prototype(d) => &d.name,
            Definition::Service(d) => &d.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Definition::Primitive(_) => TypeKind::Primitive,
            Definition::AliasedType(_) => TypeKind::Alias,
            Definition::Enum(_) => TypeKind::Enum,
            Definition::Struct(_) => TypeKind::Struct,
            Definition::Schema(_) => TypeKind::Schema,
            Definition::Prototype(_) => TypeKind::Prototype,
            Definition::Service(_) => TypeKind::Service,
        }
    }

    /// Direct or merged fields, for kinds that carry a field set
    pub fn fields(&self) -> Option<&FieldSet> {
        match self {
            Definition::Struct(d) => Some(&d.fields),
            Definition::Schema(d) => Some(&d.fields),
            Definition::Prototype(d) => Some(&d.signature.fields),
            _ => None,
        }
    }
}

/// Qualified name to definition; both the external symbol table and the output
pub type DefinitionMap = IndexMap<QualifiedTypeName, Definition>;

/// Read access to definitions, used by the value collaborators
pub trait DefinitionLookup {
    fn definition(&self, name: &QualifiedTypeName) -> Option<&Definition>;
}

impl DefinitionLookup for DefinitionMap {
    fn definition(&self, name: &QualifiedTypeName) -> Option<&Definition> {
        self.get(name)
    }
}
