//! Abstract Syntax Tree (AST) definitions for IDL source units.
//!
//! These are the parser-side structures consumed by the semantic analyzer.
//! They are never mutated after parsing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

mod types;

pub use types::ResolveBase;

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// A position in a named source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, span: Span, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            span,
            line,
            column,
        }
    }

    /// Location used for programmatically constructed nodes
    pub fn synthetic(file: impl Into<String>) -> Self {
        Self::new(file, Span::dummy(), 0, 0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then(self.line.cmp(&other.line))
            .then(self.column.cmp(&other.column))
            .then(self.span.start.cmp(&other.span.start))
    }
}

/// A versioned, dotted namespace such as `shop.orders@2`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    pub parts: Vec<String>,
    pub version: u32,
}

impl Namespace {
    pub fn new<I, S>(parts: I, version: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
            version,
        }
    }

    /// The implicit namespace holding the built-in primitives
    pub fn core() -> Self {
        Self::new(["core"], 0)
    }

    pub fn is_core(&self) -> bool {
        *self == Self::core()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))?;
        if self.version != 0 {
            write!(f, "@{}", self.version)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, version) = match s.split_once('@') {
            Some((path, version)) => (
                path,
                version
                    .parse::<u32>()
                    .map_err(|e| format!("invalid namespace version in '{}': {}", s, e))?,
            ),
            None => (s, 0),
        };
        let parts: Vec<String> = path.split('.').map(str::to_string).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(format!("invalid namespace '{}'", s));
        }
        Ok(Self { parts, version })
    }
}

/// An identifier with its location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub location: Location,
}

impl Ident {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// A possibly namespace-qualified type name as written in source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRef {
    pub namespace: Option<Namespace>,
    pub name: String,
    pub location: Location,
}

impl NameRef {
    pub fn simple(name: impl Into<String>, location: Location) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            location,
        }
    }
}

impl fmt::Display for NameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Root node: one parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub namespace: NamespaceDecl,
    pub imports: Vec<ImportClause>,
    pub decls: Vec<TypeDecl>,
}

/// `namespace a.b@1;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub namespace: Namespace,
    pub location: Location,
}

/// `import ns/*;`, `import ns/[A, B];`, `import ns/* except [C];`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportClause {
    pub namespace: Namespace,
    pub glob: bool,
    pub includes: Vec<Ident>,
    pub excludes: Vec<Ident>,
    pub location: Location,
}

/// Top-level type declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDecl {
    Alias(AliasDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Schema(SchemaDecl),
    Prototype(PrototypeDecl),
    Service(ServiceDecl),
}

/// Declaration kind, shared by declarations and built definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Primitive,
    Alias,
    Enum,
    Struct,
    Schema,
    Prototype,
    Service,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Alias => "alias",
            TypeKind::Enum => "enum",
            TypeKind::Struct => "struct",
            TypeKind::Schema => "schema",
            TypeKind::Prototype => "prototype",
            TypeKind::Service => "service",
        };
        f.write_str(name)
    }
}

impl TypeDecl {
    pub fn name(&self) -> &Ident {
        match self {
            TypeDecl::Alias(d) => &d.name,
            TypeDecl::Struct(d) => &d.name,
            TypeDecl::Enum(d) => &d.name,
            TypeDecl::Schema(d) => &d.name,
            TypeDecl::Prototype(d) => &d.name,
            TypeDecl::Service(d) => &d.name,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            TypeDecl::Alias(d) => &d.location,
            TypeDecl::Struct(d) => &d.location,
            TypeDecl::Enum(d) => &d.location,
            TypeDecl::Schema(d) => &d.location,
            TypeDecl::Prototype(d) => &d.location,
            TypeDecl::Service(d) => &d.location,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDecl::Alias(_) => TypeKind::Alias,
            TypeDecl::Struct(_) => TypeKind::Struct,
            TypeDecl::Enum(_) => TypeKind::Enum,
            TypeDecl::Schema(_) => TypeKind::Schema,
            TypeDecl::Prototype(_) => TypeKind::Prototype,
            TypeDecl::Service(_) => TypeKind::Service,
        }
    }
}

/// `alias Name Target;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasDecl {
    pub name: Ident,
    pub target: TypeExpr,
    pub location: Location,
}

/// Field in a struct, schema or call signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: TypeExpr,
    pub default: Option<LiteralExpr>,
    pub location: Location,
}

/// `struct Name < Super with Mixin { fields; constructor T; }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: Ident,
    pub supertype: Option<NameRef>,
    pub mixins: Vec<NameRef>,
    pub fields: Vec<FieldDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub location: Location,
}

/// Alternative single-parameter construction of a struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub param: TypeExpr,
    pub location: Location,
}

/// `enum Name { A, B }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: Ident,
    pub values: Vec<Ident>,
    pub location: Location,
}

/// `schema Name with Mixin { fields }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDecl {
    pub name: Ident,
    pub mixins: Vec<NameRef>,
    pub fields: Vec<FieldDecl>,
    pub location: Location,
}

/// Fields, return type and thrown types shared by prototypes and operations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignatureDecl {
    pub fields: Vec<FieldDecl>,
    pub returns: Option<TypeExpr>,
    pub throws: Vec<TypeExpr>,
}

/// `prototype Name { fields } -> Ret throws E;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeDecl {
    pub name: Ident,
    pub signature: SignatureDecl,
    pub location: Location,
}

/// Named operation inside a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDecl {
    pub name: Ident,
    pub signature: SignatureDecl,
    pub location: Location,
}

/// `service Name < Super secured by Proto { operations }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDecl {
    pub name: Ident,
    pub supertype: Option<NameRef>,
    pub security: Option<NameRef>,
    pub operations: Vec<OperationDecl>,
    pub location: Location,
}

/// Syntactic type reference, before any name resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExpr {
    Named {
        name: NameRef,
        restriction: Option<RestrictionSyntax>,
    },
    Nullable(Box<TypeExpr>),
    List {
        element: Box<TypeExpr>,
        allow_empty: bool,
    },
    Pointer(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: NameRef) -> Self {
        TypeExpr::Named {
            name,
            restriction: None,
        }
    }

    /// Location of the innermost base name
    pub fn location(&self) -> &Location {
        match self {
            TypeExpr::Named { name, .. } => &name.location,
            TypeExpr::Nullable(inner) | TypeExpr::Pointer(inner) => inner.location(),
            TypeExpr::List { element, .. } => element.location(),
        }
    }

    /// The base name, found by looking through every quantifier
    pub fn base_name(&self) -> &NameRef {
        match self {
            TypeExpr::Named { name, .. } => name,
            TypeExpr::Nullable(inner) | TypeExpr::Pointer(inner) => inner.base_name(),
            TypeExpr::List { element, .. } => element.base_name(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { name, restriction } => {
                write!(f, "{}", name)?;
                if let Some(r) = restriction {
                    write!(f, "~{}", r)?;
                }
                Ok(())
            }
            TypeExpr::Nullable(inner) => write!(f, "{}?", inner),
            TypeExpr::Pointer(inner) => write!(f, "{}*", inner),
            TypeExpr::List {
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

/// Restriction syntax attached to a base name: `~/re/` or `~[a,b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RestrictionSyntax {
    Regex {
        pattern: String,
        location: Location,
    },
    Range {
        min: Option<LiteralExpr>,
        max: Option<LiteralExpr>,
        min_inclusive: bool,
        max_inclusive: bool,
        location: Location,
    },
}

impl RestrictionSyntax {
    pub fn location(&self) -> &Location {
        match self {
            RestrictionSyntax::Regex { location, .. } | RestrictionSyntax::Range { location, .. } => {
                location
            }
        }
    }
}

impl fmt::Display for RestrictionSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestrictionSyntax::Regex { pattern, .. } => write!(f, "/{}/", pattern),
            RestrictionSyntax::Range {
                min,
                max,
                min_inclusive,
                max_inclusive,
                ..
            } => {
                write!(f, "{}", if *min_inclusive { '[' } else { '(' })?;
                if let Some(min) = min {
                    write!(f, "{}", min.literal)?;
                }
                write!(f, ",")?;
                if let Some(max) = max {
                    write!(f, "{}", max.literal)?;
                }
                write!(f, "{}", if *max_inclusive { ']' } else { ')' })
            }
        }
    }
}

/// Literal default values and restriction bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i128),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    List(Vec<LiteralExpr>),
    /// Enum constant access: `Status.Open`, `shop.Status.Open`, or with an
    /// explicit namespace `shop.common@2/Status.Open`
    Constant {
        namespace: Option<Namespace>,
        path: Vec<String>,
    },
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.literal)?;
                }
                write!(f, "]")
            }
            Literal::Constant {
                namespace: Some(ns),
                path,
            } => write!(f, "{}/{}", ns, path.join(".")),
            Literal::Constant {
                namespace: None,
                path,
            } => write!(f, "{}", path.join(".")),
        }
    }
}

/// A literal with its source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub literal: Literal,
    pub location: Location,
}

impl LiteralExpr {
    pub fn new(literal: Literal, location: Location) -> Self {
        Self { literal, location }
    }
}
