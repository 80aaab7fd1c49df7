//! 定数式インタプリタ
//!
//! デフォルト値に必要な最小限の定数式（リテラル、リスト、列挙値の参照）を評価します。

use thiserror::Error;

use super::Value;
use crate::types::{Definition, DefinitionLookup, QualifiedTypeName};

/// コンパイル済みのデフォルト値式
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    List(Vec<Expr>),
    /// `Status.Open` のような列挙値の参照
    Constant {
        path: String,
        enum_type: Option<QualifiedTypeName>,
        value: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unresolvable constant identifier {0}")]
    UnresolvableConstant(String),
}

/// `evaluate(compiledExpr) -> Result<Value, Error>`
pub trait Evaluator {
    fn evaluate(&self, expr: &Expr, definitions: &dyn DefinitionLookup) -> Result<Value, EvalError>;
}

/// 標準の定数式インタプリタ
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstInterpreter;

impl Evaluator for ConstInterpreter {
    fn evaluate(&self, expr: &Expr, definitions: &dyn DefinitionLookup) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::List(items) => items
                .iter()
                .map(|item| self.evaluate(item, definitions))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Constant {
                path,
                enum_type,
                value,
            } => {
                let unresolvable = || EvalError::UnresolvableConstant(path.clone());
                let ty = enum_type.as_ref().ok_or_else(unresolvable)?;
                match definitions.definition(ty) {
                    Some(Definition::Enum(def)) if def.values.iter().any(|v| v == value) => {
                        Ok(Value::Enum {
                            ty: ty.clone(),
                            value: value.clone(),
                        })
                    }
                    _ => Err(unresolvable()),
                }
            }
        }
    }
}
