//! 既定値の評価と遅延タスク
//!
//! 既定値のリテラルはフィールドの型が分かった時点で式にコンパイルされますが、
//! 評価と型検査は全ての型が揃うまで遅延されます。タスクは登録順に
//! 一度だけ実行され、失敗しても再試行はしません。

use std::fmt;

use crate::ast::{Literal, LiteralExpr, Location, NameRef, Namespace, TypeKind};
use crate::error::Diagnostic;
use crate::types::{
    Definition, FieldDefinition, FieldSet, QualifiedTypeName, TypeReference, FLOAT_PRIMITIVES,
};
use crate::value::{Expr, Value};

use super::fields::Contributor;
use super::semantic_analyzer::SemanticAnalyzer;

/// フィールド集合の識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum FieldSetId {
    /// 構造体、スキーマ、プロトタイプ
    Type(QualifiedTypeName),
    /// サービスの操作
    Operation(QualifiedTypeName, String),
}

impl fmt::Display for FieldSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSetId::Type(name) => write!(f, "{}", name),
            FieldSetId::Operation(service, operation) => write!(f, "{}.{}", service, operation),
        }
    }
}

#[derive(Debug, Clone)]
pub(super) enum DeferredTask {
    /// 既定値を評価し、フィールドの型にキャストして書き戻す
    EvaluateDefault {
        owner: FieldSetId,
        field: String,
        expr: Expr,
        location: Location,
    },
    /// 受け継いだフィールドに供給元の評価済み既定値を写す
    InheritDefault {
        owner: FieldSetId,
        field: String,
        source: FieldSetId,
    },
    /// 複数の供給元を持つフィールドが全て一致するか確認する
    CheckRedefinition {
        owner: FieldSetId,
        field: String,
        contributors: Vec<Contributor>,
        location: Location,
    },
}

impl SemanticAnalyzer<'_> {
    /// 既定値のリテラルを式にコンパイル（型が分かっているので数値の幅を選べる）
    pub(super) fn compile_default(
        &self,
        literal: &LiteralExpr,
        ty: &TypeReference,
        namespace: &Namespace,
    ) -> Expr {
        match &literal.literal {
            Literal::Integer(n) => {
                let base = ty.base_name();
                if base.namespace.is_core() && FLOAT_PRIMITIVES.contains(&base.name.as_str()) {
                    Expr::Literal(Value::Float(*n as f64))
                } else {
                    Expr::Literal(Value::Int(*n))
                }
            }
            Literal::Float(n) => Expr::Literal(Value::Float(*n)),
            Literal::String(s) => Expr::Literal(Value::String(s.clone())),
            Literal::Boolean(b) => Expr::Literal(Value::Bool(*b)),
            Literal::Null => Expr::Literal(Value::Null),
            Literal::List(items) => Expr::List(
                items
                    .iter()
                    .map(|item| self.compile_default(item, ty, namespace))
                    .collect(),
            ),
            Literal::Constant {
                namespace: qualifier,
                path,
            } => self.compile_constant(
                &literal.literal,
                qualifier.as_ref(),
                path,
                &literal.location,
                namespace,
            ),
        }
    }

    /// `Status.Open` の型部分を黙って解決する。解決できなければ評価時にエラーになる
    ///
    /// 名前空間が `/` で明示されていなければ、先頭のドット区切りの部分を
    /// 版数 0 の名前空間として扱う。
    fn compile_constant(
        &self,
        literal: &Literal,
        qualifier: Option<&Namespace>,
        path: &[String],
        location: &Location,
        namespace: &Namespace,
    ) -> Expr {
        let rendered = literal.to_string();
        let (type_namespace, type_name, value) = match (qualifier, path) {
            (Some(qualifier), [type_name, value]) => (Some(qualifier.clone()), type_name, value),
            (None, [parts @ .., type_name, value]) => (
                (!parts.is_empty()).then(|| Namespace::new(parts.iter().cloned(), 0)),
                type_name,
                value,
            ),
            _ => {
                return Expr::Constant {
                    path: rendered.clone(),
                    enum_type: None,
                    value: rendered,
                }
            }
        };

        let name = NameRef {
            namespace: type_namespace,
            name: type_name.clone(),
            location: location.clone(),
        };
        let enum_type = self
            .peek_name(&name, namespace)
            .filter(|qname| self.kind_of(qname) == Some(TypeKind::Enum));

        Expr::Constant {
            path: rendered,
            enum_type,
            value: value.clone(),
        }
    }

    pub(super) fn drain_deferred(&mut self) {
        let tasks = std::mem::take(&mut self.deferred);
        log::debug!("running {} deferred tasks", tasks.len());

        for task in tasks {
            match task {
                DeferredTask::EvaluateDefault {
                    owner,
                    field,
                    expr,
                    location,
                } => self.evaluate_default(&owner, &field, &expr, location),
                DeferredTask::InheritDefault {
                    owner,
                    field,
                    source,
                } => {
                    let default = self
                        .field_set(&source)
                        .and_then(|fields| fields.get(&field))
                        .and_then(|f| f.default.clone());
                    if let Some(target) = self.field_mut(&owner, &field) {
                        target.default = default;
                    }
                }
                DeferredTask::CheckRedefinition {
                    owner,
                    field,
                    contributors,
                    location,
                } => self.check_redefinition(&owner, &field, &contributors, location),
            }
        }
    }

    fn evaluate_default(&mut self, owner: &FieldSetId, field: &str, expr: &Expr, location: Location) {
        let Some(ty) = self
            .field_set(owner)
            .and_then(|fields| fields.get(field))
            .map(|f| f.ty.clone())
        else {
            return;
        };

        let definitions = self.definitions();
        let result = self
            .evaluator
            .evaluate(expr, &definitions)
            .map_err(|e| e.to_string())
            .and_then(|value| {
                self.caster
                    .cast(&value, &ty, &definitions)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(value) => {
                log::trace!("default of {}.{} evaluated to {}", owner, field, value);
                if let Some(target) = self.field_mut(owner, field) {
                    target.default = Some(value);
                }
            }
            Err(message) => {
                self.errors.report(Diagnostic::new(location, message));
            }
        }
    }

    fn check_redefinition(
        &mut self,
        owner: &FieldSetId,
        field: &str,
        contributors: &[Contributor],
        location: Location,
    ) {
        let definitions: Vec<Option<&FieldDefinition>> = contributors
            .iter()
            .map(|contributor| {
                let source = match contributor {
                    Contributor::Direct(_) => owner.clone(),
                    Contributor::Mixin(name) | Contributor::Supertype(name) => {
                        FieldSetId::Type(name.clone())
                    }
                };
                self.field_set(&source).and_then(|fields| fields.get(field))
            })
            .collect();

        let consistent = match definitions.first() {
            Some(first) => definitions.iter().all(|d| same_field(*first, *d)),
            None => true,
        };
        if consistent {
            return;
        }

        let sources = contributors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.errors.report(Diagnostic::new(
            location,
            format!(
                "field {} of {} has conflicting definitions from {}",
                field, owner, sources
            ),
        ));
    }

    fn field_set(&self, id: &FieldSetId) -> Option<&FieldSet> {
        match id {
            FieldSetId::Type(name) => self.definition(name)?.fields(),
            FieldSetId::Operation(service, operation) => match self.definition(service)? {
                Definition::Service(def) => def.operations.get(operation).map(|op| &op.signature.fields),
                _ => None,
            },
        }
    }

    fn field_mut(&mut self, id: &FieldSetId, field: &str) -> Option<&mut FieldDefinition> {
        let fields = match id {
            FieldSetId::Type(name) => match self.built.get_mut(name)? {
                Definition::Struct(def) => &mut def.fields,
                Definition::Schema(def) => &mut def.fields,
                Definition::Prototype(def) => &mut def.signature.fields,
                _ => return None,
            },
            FieldSetId::Operation(service, operation) => match self.built.get_mut(service)? {
                Definition::Service(def) => &mut def.operations.get_mut(operation)?.signature.fields,
                _ => return None,
            },
        };
        fields.get_mut(field)
    }
}

/// 型と評価済みの既定値が一致するか（リストは要素ごとの構造的な比較）
fn same_field(a: Option<&FieldDefinition>, b: Option<&FieldDefinition>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.ty == b.ty && a.default == b.default,
        (None, None) => true,
        _ => false,
    }
}
