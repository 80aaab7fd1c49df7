//! 依存順序付け
//!
//! 「依存する」の意味が文脈によって異なるため、2つのアルゴリズムを持ちます。

use std::collections::HashSet;

use crate::types::QualifiedTypeName;

/// 順序付け待ちの項目
#[derive(Debug, Clone)]
pub(super) struct Pending<T> {
    pub name: QualifiedTypeName,
    pub requires: Vec<QualifiedTypeName>,
    pub item: T,
}

impl<T> Pending<T> {
    pub fn new(name: QualifiedTypeName, requires: Vec<QualifiedTypeName>, item: T) -> Self {
        Self {
            name,
            requires,
            item,
        }
    }
}

/// 一般的な順序付け
///
/// 未処理の項目のうち、依存先がどれも未処理でないものを結果へ移す操作を
/// 不動点まで繰り返します。戻り値は（順序付け済み、残り）です。
pub(super) fn general_order<T>(mut pending: Vec<Pending<T>>) -> (Vec<T>, Vec<T>) {
    let mut ordered = Vec::new();

    loop {
        let waiting: HashSet<QualifiedTypeName> = pending.iter().map(|p| p.name.clone()).collect();
        let (ready, blocked): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|p| p.requires.iter().all(|r| !waiting.contains(r)));
        pending = blocked;

        if ready.is_empty() {
            break;
        }
        ordered.extend(ready.into_iter().map(|p| p.item));
    }

    (ordered, pending.into_iter().map(|p| p.item).collect())
}

/// ミックスイン用の順序付け
///
/// 今回のバッチに含まれるミックスイン先が全て準備済みになった項目を
/// 準備済みにする操作を不動点まで繰り返します。
pub(super) fn mixin_order<T>(pending: Vec<Pending<T>>) -> (Vec<T>, Vec<T>) {
    let members: HashSet<QualifiedTypeName> = pending.iter().map(|p| p.name.clone()).collect();
    let mut ready: HashSet<QualifiedTypeName> = HashSet::new();
    let mut ordered = Vec::new();
    let mut slots: Vec<Option<Pending<T>>> = pending.into_iter().map(Some).collect();

    let mut changed = true;
    while changed {
        changed = false;
        for slot in slots.iter_mut() {
            let is_ready = match slot {
                Some(p) => p
                    .requires
                    .iter()
                    .filter(|r| members.contains(*r))
                    .all(|r| ready.contains(r)),
                None => false,
            };
            if is_ready {
                if let Some(p) = slot.take() {
                    ready.insert(p.name);
                    ordered.push(p.item);
                    changed = true;
                }
            }
        }
    }

    (ordered, slots.into_iter().flatten().map(|p| p.item).collect())
}
