//! IDL Compiler Library
//!
//! This library provides the semantic-analysis core of the IDL compiler:
//! parsing source units, resolving them against externally known types and
//! building a fully resolved type map with diagnostics.

pub mod analyzer;
pub mod ast;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use analyzer::{Compilation, CompilationResult};
pub use ast::{Location, Namespace, SourceUnit};
pub use compiler::{CompilationPipeline, CompilationState, CompilerOptions};
pub use error::{CompileError, Diagnostic, ErrorSet, IdlError, IdlResult};
pub use lexer::{Lexer, Token, TokenWithPosition};
pub use parser::{parse_source, ParseError, ParseResult, Parser};
pub use types::{core_types, Definition, DefinitionMap, QualifiedTypeName, TypeReference};
pub use value::{Caster, Evaluator, Value};
