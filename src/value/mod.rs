//! Constant values and the value collaborators.
//!
//! The analyzer depends only on the [`Caster`] and [`Evaluator`] traits; the
//! implementations here are the defaults used by [`crate::Compilation`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::types::QualifiedTypeName;

mod cast;
mod eval;

pub use cast::{CastError, Caster, ValueCaster};
pub(crate) use cast::compile_pattern;
pub use eval::{ConstInterpreter, EvalError, Evaluator, Expr};

/// A constant value: evaluated defaults and restriction bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Enum {
        ty: QualifiedTypeName,
        value: String,
    },
}

impl Value {
    /// Numeric ordering; `None` for non-numeric operands
    pub fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Enum { ty, value } => write!(f, "{}.{}", ty.name, value),
        }
    }
}
