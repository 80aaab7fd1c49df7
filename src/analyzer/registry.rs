//! 宣言の登録
//!
//! 名前解決を始める前に、全ての宣言について名前の一意性を確定させます。

use crate::ast::{Namespace, SourceUnit, TypeDecl, TypeKind};
use crate::error::Diagnostic;
use crate::types::QualifiedTypeName;

use super::semantic_analyzer::{BuildContext, SemanticAnalyzer};

impl<'a> SemanticAnalyzer<'a> {
    pub(super) fn register_declarations(&mut self, units: &'a [SourceUnit]) {
        log::debug!("registering declarations from {} source units", units.len());

        for unit in units {
            let namespace = &unit.namespace.namespace;
            self.namespaces
                .entry(namespace.clone())
                .or_insert_with(|| unit.namespace.location.clone());

            for decl in &unit.decls {
                self.register(namespace, decl);
            }
        }

        log::debug!("registered {} declarations", self.declarations.len());
    }

    fn register(&mut self, namespace: &Namespace, decl: &'a TypeDecl) {
        let qname = QualifiedTypeName::new(namespace.clone(), decl.name().name.clone());

        if self.external.contains_key(&qname) {
            self.errors.report(Diagnostic::new(
                decl.location().clone(),
                format!("{} conflicts with externally loaded type", qname),
            ));
            return;
        }

        if let Some(earlier) = self.declarations.get(&qname) {
            let message = format!(
                "{} conflicts with earlier declaration at {}",
                qname,
                earlier.decl.location()
            );
            self.errors
                .report(Diagnostic::new(decl.location().clone(), message));
            return;
        }

        log::trace!("registered {} {}", decl.kind(), qname);
        self.declarations
            .insert(qname.clone(), BuildContext { qname, decl });
    }

    /// 宣言済みまたは外部定義に存在する型か
    pub(super) fn type_exists(&self, name: &QualifiedTypeName) -> bool {
        self.declarations.contains_key(name) || self.external.contains_key(name)
    }

    /// 型の種類（構築前の宣言も含む）
    pub(super) fn kind_of(&self, name: &QualifiedTypeName) -> Option<TypeKind> {
        match self.declarations.get(name) {
            Some(ctx) => Some(ctx.decl.kind()),
            None => self.external.get(name).map(|def| def.kind()),
        }
    }

    /// 今回のバッチまたは外部定義で知られている名前空間か
    pub(super) fn is_known_namespace(&self, namespace: &Namespace) -> bool {
        self.namespaces.contains_key(namespace)
            || self.external.keys().any(|name| &name.namespace == namespace)
    }

    /// 名前空間から参照可能な型名（宣言順、続いて外部定義）
    pub(super) fn visible_names(&self, namespace: &Namespace) -> Vec<String> {
        self.declarations
            .keys()
            .chain(self.external.keys())
            .filter(|name| &name.namespace == namespace)
            .map(|name| name.name.clone())
            .collect()
    }
}
