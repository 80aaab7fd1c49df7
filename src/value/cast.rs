//! 値のキャスト
//!
//! デフォルト値と制約の境界値を対象の型に合わせて検証・変換します。

use regex::Regex;
use std::cmp::Ordering;
use thiserror::Error;

use super::Value;
use crate::types::{
    Bound, Definition, DefinitionLookup, QualifiedTypeName, RangeRestriction, Restriction,
    TypeReference, FLOAT_PRIMITIVES, INTEGER_PRIMITIVES,
};

/// キャストの失敗理由
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CastError {
    #[error("cannot cast {value} to {target}")]
    Incompatible { value: String, target: String },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: String },

    #[error("{value} does not satisfy restriction {restriction}")]
    Restriction { value: String, restriction: String },

    #[error("empty list is not allowed for {target}")]
    EmptyList { target: String },

    #[error("{value} is not a value of enum {target}")]
    UnknownEnumValue { value: String, target: String },

    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// `cast(value, targetType) -> Result<Value, Error>`
pub trait Caster {
    fn cast(
        &self,
        value: &Value,
        target: &TypeReference,
        definitions: &dyn DefinitionLookup,
    ) -> Result<Value, CastError>;
}

/// 標準のキャストエンジン
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueCaster;

impl Caster for ValueCaster {
    fn cast(
        &self,
        value: &Value,
        target: &TypeReference,
        definitions: &dyn DefinitionLookup,
    ) -> Result<Value, CastError> {
        match target {
            TypeReference::Nullable(inner) => match value {
                Value::Null => Ok(Value::Null),
                _ => self.cast(value, inner, definitions),
            },
            TypeReference::Pointer(inner) => self.cast(value, inner, definitions),
            TypeReference::List {
                element,
                allow_empty,
            } => match value {
                Value::List(items) => {
                    if items.is_empty() && !allow_empty {
                        return Err(CastError::EmptyList {
                            target: target.to_string(),
                        });
                    }
                    items
                        .iter()
                        .map(|item| self.cast(item, element, definitions))
                        .collect::<Result<Vec<_>, _>>()
                        .map(Value::List)
                }
                _ => Err(incompatible(value, target)),
            },
            TypeReference::Atomic { name, restriction } => {
                let cast = self.cast_atomic(value, name, target, definitions)?;
                if let Some(restriction) = restriction {
                    check_restriction(&cast, restriction)?;
                }
                Ok(cast)
            }
        }
    }
}

impl ValueCaster {
    fn cast_atomic(
        &self,
        value: &Value,
        name: &QualifiedTypeName,
        target: &TypeReference,
        definitions: &dyn DefinitionLookup,
    ) -> Result<Value, CastError> {
        if name.namespace.is_core() {
            return cast_primitive(value, name, target);
        }

        match definitions.definition(name) {
            Some(Definition::Enum(def)) => match value {
                Value::Enum { ty, value: member } if ty == name => {
                    if def.values.iter().any(|v| v == member) {
                        Ok(value.clone())
                    } else {
                        Err(CastError::UnknownEnumValue {
                            value: value.to_string(),
                            target: name.to_string(),
                        })
                    }
                }
                _ => Err(incompatible(value, target)),
            },
            Some(Definition::AliasedType(def)) => self.cast(value, &def.target, definitions),
            // 外部から供給された名前空間外のプリミティブは不透明として扱う
            Some(Definition::Primitive(_)) => Ok(value.clone()),
            _ => Err(incompatible(value, target)),
        }
    }
}

fn cast_primitive(
    value: &Value,
    name: &QualifiedTypeName,
    target: &TypeReference,
) -> Result<Value, CastError> {
    let primitive = name.name.as_str();

    if let Some((_, min, max)) = INTEGER_PRIMITIVES.iter().find(|(n, _, _)| *n == primitive) {
        return match value {
            Value::Int(n) if (*min..=*max).contains(n) => Ok(Value::Int(*n)),
            Value::Int(_) => Err(CastError::OutOfRange {
                value: value.to_string(),
                target: name.to_string(),
            }),
            _ => Err(incompatible(value, target)),
        };
    }

    if FLOAT_PRIMITIVES.contains(&primitive) {
        return match value {
            Value::Int(n) => Ok(Value::Float(*n as f64)),
            Value::Float(n) => Ok(Value::Float(*n)),
            _ => Err(incompatible(value, target)),
        };
    }

    match (primitive, value) {
        ("Null", Value::Null) => Ok(Value::Null),
        ("Boolean", Value::Bool(b)) => Ok(Value::Bool(*b)),
        ("String" | "Bytes" | "Timestamp", Value::String(s)) => Ok(Value::String(s.clone())),
        _ => Err(incompatible(value, target)),
    }
}

fn incompatible(value: &Value, target: &TypeReference) -> CastError {
    CastError::Incompatible {
        value: value.to_string(),
        target: target.to_string(),
    }
}

fn check_restriction(value: &Value, restriction: &Restriction) -> Result<(), CastError> {
    let satisfied = match restriction {
        Restriction::Regex(pattern) => {
            let regex = compile_pattern(pattern)?;
            matches!(value, Value::String(s) if regex.is_match(s))
        }
        Restriction::Range(range) => in_range(value, range),
    };

    if satisfied {
        Ok(())
    } else {
        Err(CastError::Restriction {
            value: value.to_string(),
            restriction: restriction.to_string(),
        })
    }
}

/// パターンは値全体にマッチする必要がある
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, CastError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| CastError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn in_range(value: &Value, range: &RangeRestriction) -> bool {
    let above_min = match &range.min {
        Bound::Unbounded => true,
        Bound::Inclusive(min) => matches!(
            value.numeric_cmp(min),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Bound::Exclusive(min) => matches!(value.numeric_cmp(min), Some(Ordering::Greater)),
    };
    let below_max = match &range.max {
        Bound::Unbounded => true,
        Bound::Inclusive(max) => {
            matches!(value.numeric_cmp(max), Some(Ordering::Less | Ordering::Equal))
        }
        Bound::Exclusive(max) => matches!(value.numeric_cmp(max), Some(Ordering::Less)),
    };
    above_min && below_max
}
