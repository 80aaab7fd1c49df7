//! ビルドスコープ
//!
//! 名前空間ごとに1つ作られ、その名前空間の非修飾名の解決先を保持します。

use indexmap::IndexMap;

use crate::ast::{Location, Namespace};

/// 非修飾名の束縛
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Binding {
    /// 同じ名前空間での宣言
    Local,
    /// インポートされた名前
    Imported { from: Namespace, location: Location },
}

#[derive(Debug, Clone)]
pub(super) struct BuildScope {
    pub namespace: Namespace,
    bindings: IndexMap<String, Binding>,
}

impl BuildScope {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            bindings: IndexMap::new(),
        }
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// インポート元の名前空間（ローカルの名前は含まない）
    pub fn imported_namespace(&self, name: &str) -> Option<&Namespace> {
        match self.bindings.get(name) {
            Some(Binding::Imported { from, .. }) => Some(from),
            _ => None,
        }
    }

    pub fn bind_local(&mut self, name: String) {
        self.bindings.insert(name, Binding::Local);
    }

    pub fn bind_import(&mut self, name: String, from: Namespace, location: Location) {
        self.bindings
            .insert(name, Binding::Imported { from, location });
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
