//! インポート解決
//!
//! 名前空間ごとに全ソース単位のインポート句をまとめ、非修飾名から
//! インポート元名前空間への対応表を作ります。全ての宣言が登録された後で
//! 実行する必要があります（ワイルドカードは全体像を必要とするため）。

use indexmap::IndexMap;

use crate::ast::{ImportClause, Location, Namespace, SourceUnit};
use crate::error::Diagnostic;
use crate::types::QualifiedTypeName;

use super::scope::{Binding, BuildScope};
use super::semantic_analyzer::SemanticAnalyzer;

/// インポート句が持ち込む1つの名前
struct ImportedName {
    name: String,
    location: Location,
    /// 明示的に列挙された名前か（ワイルドカードでないか）
    explicit: bool,
}

impl<'a> SemanticAnalyzer<'a> {
    pub(super) fn build_scopes(&mut self, units: &'a [SourceUnit]) {
        let mut clauses: IndexMap<Namespace, Vec<&'a ImportClause>> = IndexMap::new();
        for unit in units {
            clauses
                .entry(unit.namespace.namespace.clone())
                .or_default()
                .extend(unit.imports.iter());
        }

        log::debug!("resolving imports for {} namespaces", clauses.len());

        for (namespace, clauses) in clauses {
            let scope = self.resolve_imports(&namespace, &clauses);
            log::trace!("scope {} has {} bindings", namespace, scope.len());
            self.scopes.insert(namespace, scope);
        }
    }

    fn resolve_imports(&mut self, namespace: &Namespace, clauses: &[&ImportClause]) -> BuildScope {
        let mut scope = BuildScope::new(namespace.clone());

        // ローカルの宣言を先に入れておく（ワイルドカードに対しては常にローカルが優先）
        for name in self.visible_names(namespace) {
            scope.bind_local(name);
        }

        for clause in clauses {
            if clause.namespace == *namespace {
                log::trace!("ignoring self import of {}", namespace);
                continue;
            }

            if !self.is_known_namespace(&clause.namespace) {
                self.errors.report(Diagnostic::new(
                    clause.location.clone(),
                    format!("unknown target namespace {}", clause.namespace),
                ));
                continue;
            }

            for imported in self.clause_names(clause) {
                self.bind_imported(&mut scope, &clause.namespace, imported);
            }
        }

        scope
    }

    /// インポート句が持ち込む名前。除外は競合検査より前に適用する
    fn clause_names(&mut self, clause: &ImportClause) -> Vec<ImportedName> {
        let visible = self.visible_names(&clause.namespace);
        let excluded = |name: &str| clause.excludes.iter().any(|e| e.name == name);

        if clause.glob {
            return visible
                .into_iter()
                .filter(|name| !excluded(name))
                .map(|name| ImportedName {
                    name,
                    location: clause.location.clone(),
                    explicit: false,
                })
                .collect();
        }

        let mut names = Vec::new();
        for include in &clause.includes {
            if !visible.contains(&include.name) {
                self.errors.report(Diagnostic::new(
                    include.location.clone(),
                    format!("unresolved import {}/{}", clause.namespace, include.name),
                ));
                continue;
            }
            if !excluded(&include.name) {
                names.push(ImportedName {
                    name: include.name.clone(),
                    location: include.location.clone(),
                    explicit: true,
                });
            }
        }
        names
    }

    fn bind_imported(&mut self, scope: &mut BuildScope, from: &Namespace, imported: ImportedName) {
        match scope.binding(&imported.name) {
            None => scope.bind_import(imported.name, from.clone(), imported.location),
            Some(Binding::Local) => {
                if imported.explicit {
                    let local = QualifiedTypeName::new(scope.namespace.clone(), imported.name.clone());
                    let declared_at = self
                        .declarations
                        .get(&local)
                        .map(|ctx| ctx.decl.location().to_string())
                        .unwrap_or_else(|| "externally loaded type".to_string());
                    self.errors.report(Diagnostic::new(
                        imported.location,
                        format!(
                            "import of {}/{} conflicts with local declaration {} at {}",
                            from, imported.name, local, declared_at
                        ),
                    ));
                }
            }
            Some(Binding::Imported { from: earlier, .. }) if earlier == from => {}
            Some(Binding::Imported {
                from: earlier,
                location: earlier_location,
            }) => {
                let message = format!(
                    "{} is imported from both {} (at {}) and {}",
                    imported.name, earlier, earlier_location, from
                );
                self.errors
                    .report(Diagnostic::new(imported.location, message));
            }
        }
    }
}
