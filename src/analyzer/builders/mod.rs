//! 型ビルダー
//!
//! 順序付けられた宣言を1つずつ定義に変換します。どのビルダーも局所的な
//! 失敗の後も処理を続け、問題のある定義・フィールド・既定値だけを省きます。

mod alias;
mod enums;
mod prototype;
mod schema;
mod service;
mod structs;

use crate::ast::{NameRef, Namespace, TypeKind};
use crate::error::Diagnostic;
use crate::types::QualifiedTypeName;

use super::ordering::Pending;
use super::resolver::ResolutionContext;
use super::semantic_analyzer::{BuildContext, SemanticAnalyzer};

impl<'a> SemanticAnalyzer<'a> {
    /// 指定した種類の型を参照しているか確認しながら名前を解決する
    fn resolve_kind(
        &mut self,
        name: &NameRef,
        namespace: &Namespace,
        expected: TypeKind,
        describe: impl FnOnce(&QualifiedTypeName) -> String,
    ) -> Option<QualifiedTypeName> {
        let ctx = ResolutionContext::new(name.location.clone());
        let qname = self.resolving(ctx, |this, ctx| this.resolve_name(name, namespace, ctx))?;

        if self.kind_of(&qname) != Some(expected) {
            self.errors
                .report(Diagnostic::new(name.location.clone(), describe(&qname)));
            return None;
        }
        Some(qname)
    }

    /// ミックスインはスキーマでなければならない
    fn resolve_mixins(&mut self, mixins: &[NameRef], namespace: &Namespace) -> Vec<QualifiedTypeName> {
        mixins
            .iter()
            .filter_map(|mixin| {
                self.resolve_kind(mixin, namespace, TypeKind::Schema, |q| {
                    format!("{} is not a schema", q)
                })
            })
            .collect()
    }

    /// 上位型（のみ）への依存で順序付けするための項目
    fn pending_by_supertype(
        &self,
        ctx: BuildContext<'a>,
        supertype: Option<&NameRef>,
    ) -> Pending<BuildContext<'a>> {
        let requires = supertype
            .and_then(|name| self.peek_name(name, ctx.namespace()))
            .into_iter()
            .collect();
        Pending::new(ctx.qname.clone(), requires, ctx)
    }

    /// 一般順序付けで残った宣言をそれぞれ循環として報告する
    fn report_circular(&mut self, leftovers: &[BuildContext<'a>]) {
        for ctx in leftovers {
            self.errors.report(Diagnostic::new(
                ctx.decl.location().clone(),
                format!("{} is involved in a circular dependency", ctx.qname),
            ));
        }
    }
}
