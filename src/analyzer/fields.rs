//! フィールド集合の構築
//!
//! 直接宣言されたフィールドと、上位型・ミックスインから受け継いだフィールドを
//! 名前ごとにまとめます。直接宣言の重複は即座にエラー、それ以外の複数の
//! 供給元は既定値の評価後に一致を確認します。

use indexmap::IndexMap;
use std::fmt;

use crate::ast::{FieldDecl, Location, Namespace};
use crate::error::Diagnostic;
use crate::types::{FieldDefinition, FieldSet, QualifiedTypeName};

use super::deferred::{DeferredTask, FieldSetId};
use super::resolver::ResolutionContext;
use super::semantic_analyzer::SemanticAnalyzer;

/// フィールドの供給元
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Contributor {
    Direct(Location),
    Mixin(QualifiedTypeName),
    Supertype(QualifiedTypeName),
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contributor::Direct(location) => write!(f, "declaration at {}", location),
            Contributor::Mixin(name) => write!(f, "mixin {}", name),
            Contributor::Supertype(name) => write!(f, "supertype {}", name),
        }
    }
}

/// 受け継いだフィールド集合
pub(super) struct Inherited {
    pub contributor: Contributor,
    pub source: FieldSetId,
    pub fields: FieldSet,
}

impl SemanticAnalyzer<'_> {
    /// 構築済みの型からフィールドを受け継ぐ。構築に失敗した型からは何も受け継がない
    pub(super) fn inherit_from(&self, contributor: Contributor) -> Option<Inherited> {
        let name = match &contributor {
            Contributor::Mixin(name) | Contributor::Supertype(name) => name.clone(),
            Contributor::Direct(_) => return None,
        };
        let fields = self.definition(&name)?.fields()?.clone();
        Some(Inherited {
            contributor,
            source: FieldSetId::Type(name),
            fields,
        })
    }

    pub(super) fn build_field_set(
        &mut self,
        owner: &FieldSetId,
        owner_location: &Location,
        direct: &[FieldDecl],
        inherited: Vec<Inherited>,
        namespace: &Namespace,
    ) -> FieldSet {
        let mut fields = FieldSet::new();
        let mut contributors: IndexMap<String, Vec<Contributor>> = IndexMap::new();
        // 受け継いだ代表フィールドの取得元
        let mut inherited_from: IndexMap<String, FieldSetId> = IndexMap::new();

        for source in &inherited {
            for (name, field) in &source.fields {
                let bucket = contributors.entry(name.clone()).or_default();
                if bucket.is_empty() {
                    fields.insert(name.clone(), field.clone());
                    inherited_from.insert(name.clone(), source.source.clone());
                }
                bucket.push(source.contributor.clone());
            }
        }

        let mut declared: IndexMap<&str, &Location> = IndexMap::new();
        for decl in direct {
            let name = decl.name.name.as_str();
            if let Some(first) = declared.get(name) {
                self.errors.report(Diagnostic::new(
                    decl.location.clone(),
                    format!("field {} is already declared at {}", name, first),
                ));
                continue;
            }
            declared.insert(name, &decl.location);

            let ctx = ResolutionContext::new(decl.location.clone());
            let Some(ty) = self.resolving(ctx, |this, ctx| this.resolve_type(&decl.ty, namespace, ctx)) else {
                continue;
            };

            // 直接宣言が代表になる
            inherited_from.shift_remove(name);
            contributors
                .entry(name.to_string())
                .or_default()
                .insert(0, Contributor::Direct(decl.location.clone()));

            if let Some(default) = &decl.default {
                let expr = self.compile_default(default, &ty, namespace);
                self.deferred.push(DeferredTask::EvaluateDefault {
                    owner: owner.clone(),
                    field: name.to_string(),
                    expr,
                    location: default.location.clone(),
                });
            }

            fields.insert(
                name.to_string(),
                FieldDefinition {
                    name: name.to_string(),
                    ty,
                    default: None,
                },
            );
        }

        for (field, source) in inherited_from {
            self.deferred.push(DeferredTask::InheritDefault {
                owner: owner.clone(),
                field,
                source,
            });
        }

        for (field, contributors) in contributors {
            if contributors.len() > 1 {
                log::trace!("field {} of {} has {} contributors", field, owner, contributors.len());
                self.deferred.push(DeferredTask::CheckRedefinition {
                    owner: owner.clone(),
                    field,
                    contributors,
                    location: owner_location.clone(),
                });
            }
        }

        fields
    }
}
