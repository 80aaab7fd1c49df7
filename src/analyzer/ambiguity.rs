//! 曖昧さの検査
//!
//! コンストラクタの引数型や throws の一覧で、構造的に区別できない型参照の
//! 組を検出します。ポインタ、null許容、リストの空許容は区別に使われません。

use indexmap::IndexMap;

use crate::ast::Location;
use crate::error::Diagnostic;
use crate::types::{QualifiedTypeName, TypeReference};

use super::semantic_analyzer::SemanticAnalyzer;

/// 型参照の構造的な形
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum ShapeKey {
    Atomic(QualifiedTypeName),
    List(Box<ShapeKey>),
}

impl From<&TypeReference> for ShapeKey {
    fn from(reference: &TypeReference) -> Self {
        match reference {
            TypeReference::Atomic { name, .. } => ShapeKey::Atomic(name.clone()),
            TypeReference::Nullable(inner) | TypeReference::Pointer(inner) => {
                ShapeKey::from(inner.as_ref())
            }
            TypeReference::List { element, .. } => {
                ShapeKey::List(Box::new(ShapeKey::from(element.as_ref())))
            }
        }
    }
}

/// 2つ以上の候補を持つ形のグループ（各グループは位置順）
pub(super) fn ambiguous_groups(
    candidates: &[(TypeReference, Location)],
) -> Vec<Vec<&(TypeReference, Location)>> {
    let mut groups: IndexMap<ShapeKey, Vec<&(TypeReference, Location)>> = IndexMap::new();
    for candidate in candidates {
        groups
            .entry(ShapeKey::from(&candidate.0))
            .or_default()
            .push(candidate);
    }

    groups
        .into_values()
        .filter(|group| group.len() > 1)
        .map(|mut group| {
            group.sort_by(|a, b| a.1.cmp(&b.1));
            group
        })
        .collect()
}

impl SemanticAnalyzer<'_> {
    pub(super) fn check_ambiguity(&mut self, what: &str, candidates: &[(TypeReference, Location)]) {
        for group in ambiguous_groups(candidates) {
            let members = group
                .iter()
                .map(|(ty, location)| format!("{} at {}", ty, location))
                .collect::<Vec<_>>()
                .join(", ");
            let location = group[0].1.clone();
            self.errors.report(Diagnostic::new(
                location,
                format!("ambiguous {}: {}", what, members),
            ));
        }
    }
}
