//! 制約の検証
//!
//! 解決済みの基底型に対して制約が適用可能か、範囲が空でないかを検査します。

use std::cmp::Ordering;

use crate::ast::{Literal, LiteralExpr, RestrictionSyntax};
use crate::types::{
    is_range_restrictable, is_regex_restrictable, Bound, QualifiedTypeName, RangeRestriction,
    Restriction, TypeReference,
};
use crate::value::{compile_pattern, Value};

use super::resolver::ResolutionContext;
use super::semantic_analyzer::SemanticAnalyzer;

impl SemanticAnalyzer<'_> {
    pub(super) fn compile_restriction(
        &self,
        syntax: &RestrictionSyntax,
        base: &QualifiedTypeName,
        ctx: &mut ResolutionContext,
    ) -> Option<Restriction> {
        match syntax {
            RestrictionSyntax::Regex { pattern, location } => {
                if !is_regex_restrictable(base) {
                    ctx.report(
                        location.clone(),
                        format!("regex restriction {} cannot be applied to {}", syntax, base),
                    );
                    return None;
                }
                if let Err(e) = compile_pattern(pattern) {
                    ctx.report(location.clone(), e.to_string());
                    return None;
                }
                Some(Restriction::Regex(pattern.clone()))
            }
            RestrictionSyntax::Range {
                min,
                max,
                min_inclusive,
                max_inclusive,
                location,
            } => {
                if !is_range_restrictable(base) {
                    ctx.report(
                        location.clone(),
                        format!("range restriction {} cannot be applied to {}", syntax, base),
                    );
                    return None;
                }

                let target = TypeReference::atomic(base.clone());
                let min = self.compile_bound(min.as_ref(), *min_inclusive, &target, ctx)?;
                let max = self.compile_bound(max.as_ref(), *max_inclusive, &target, ctx)?;
                let range = RangeRestriction { min, max };

                if !range_is_satisfiable(&range) {
                    ctx.report(
                        location.clone(),
                        format!("range restriction {} is unsatisfiable", range),
                    );
                    return None;
                }
                Some(Restriction::Range(range))
            }
        }
    }

    /// 境界値を基底型にキャストする
    fn compile_bound(
        &self,
        literal: Option<&LiteralExpr>,
        inclusive: bool,
        target: &TypeReference,
        ctx: &mut ResolutionContext,
    ) -> Option<Bound> {
        let Some(literal) = literal else {
            return Some(Bound::Unbounded);
        };

        let value = match &literal.literal {
            Literal::Integer(n) => Value::Int(*n),
            Literal::Float(n) => Value::Float(*n),
            other => {
                ctx.report(
                    literal.location.clone(),
                    format!("restriction bound {} is not a number", other),
                );
                return None;
            }
        };

        match self.caster.cast(&value, target, &self.definitions()) {
            Ok(value) if inclusive => Some(Bound::Inclusive(value)),
            Ok(value) => Some(Bound::Exclusive(value)),
            Err(e) => {
                ctx.report(literal.location.clone(), e.to_string());
                None
            }
        }
    }
}

/// 範囲に属する値が1つでも存在するか
pub(super) fn range_is_satisfiable(range: &RangeRestriction) -> bool {
    let (Some(min), Some(max)) = (range.min.value(), range.max.value()) else {
        return true;
    };

    match min.numeric_cmp(max) {
        Some(Ordering::Less) => match (min, max) {
            // 両端を含まない整数範囲は間に整数が必要
            (Value::Int(lo), Value::Int(hi))
                if range.min.is_exclusive() && range.max.is_exclusive() =>
            {
                hi - lo >= 2
            }
            _ => true,
        },
        Some(Ordering::Equal) => !range.min.is_exclusive() && !range.max.is_exclusive(),
        _ => false,
    }
}
