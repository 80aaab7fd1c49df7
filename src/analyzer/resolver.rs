//! 型参照の名前解決
//!
//! 基底名を次の順で解決します:
//! 1. 修飾済みの名前
//! 2. ローカルの宣言
//! 3. スコープのインポート表
//! 4. 暗黙の `core` 名前空間
//!
//! 別名に到達した場合は展開し、訪問した別名を解決コンテキストの連鎖に
//! 積みます。既に連鎖にある名前を再訪したら循環として報告します。
//! 未構築の別名を宣言から辿るのは別名の構築中だけです。それ以降に
//! 未構築の別名へ到達した場合は、その別名の構築が既に失敗して報告済みです。

use std::iter;

use crate::ast::{Location, NameRef, Namespace, RestrictionSyntax, TypeDecl, TypeExpr};
use crate::error::Diagnostic;
use crate::types::{Definition, QualifiedTypeName, TypeReference};

use super::semantic_analyzer::SemanticAnalyzer;

/// 1回のトップレベル解決の間だけ使われるコンテキスト
#[derive(Debug)]
pub(super) struct ResolutionContext {
    /// 循環などを報告する起点の位置
    pub origin: Location,
    /// これまでに訪問した別名
    pub chain: Vec<QualifiedTypeName>,
    /// 未構築の別名を宣言から展開するか（別名の構築中のみ）
    pub expand_declared: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionContext {
    pub fn new(origin: Location) -> Self {
        Self {
            origin,
            chain: Vec::new(),
            expand_declared: false,
            diagnostics: Vec::new(),
        }
    }

    /// 構築中の別名自身を連鎖の先頭に置いたコンテキスト
    pub fn seeded(origin: Location, alias: QualifiedTypeName) -> Self {
        Self {
            origin,
            chain: vec![alias],
            expand_declared: true,
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, location: Location, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(location, message));
    }
}

/// 別名の展開元
enum AliasSource<'r> {
    /// 今回のバッチで宣言され、まだ構築されていない別名
    Declared(&'r TypeExpr),
    /// 構築済み、または外部から供給された別名
    Resolved(&'r TypeReference),
}

impl<'a> SemanticAnalyzer<'a> {
    /// コンテキストを作って解決を実行し、診断情報をエラー集合へ移す
    pub(super) fn resolving<T>(
        &mut self,
        mut ctx: ResolutionContext,
        f: impl FnOnce(&Self, &mut ResolutionContext) -> T,
    ) -> T {
        let result = f(self, &mut ctx);
        self.errors.extend(ctx.diagnostics);
        result
    }

    /// 型参照を解決。量化子の適用は補完プロトコル側に任せる
    pub(super) fn resolve_type(
        &self,
        expr: &TypeExpr,
        namespace: &Namespace,
        ctx: &mut ResolutionContext,
    ) -> Option<TypeReference> {
        expr.complete(
            &mut |name: &NameRef, restriction: Option<&RestrictionSyntax>, nested: bool| {
                self.resolve_base(name, restriction, nested, namespace, ctx)
            },
        )
    }

    /// 型名だけを参照する位置（上位型、ミックスイン、セキュリティ）の解決
    pub(super) fn resolve_name(
        &self,
        name: &NameRef,
        namespace: &Namespace,
        ctx: &mut ResolutionContext,
    ) -> Option<QualifiedTypeName> {
        match self.resolve_base(name, None, false, namespace, ctx)? {
            TypeReference::Atomic {
                name: qname,
                restriction: None,
            } => Some(qname),
            other => {
                ctx.report(
                    name.location.clone(),
                    format!("{} does not name a type directly (it stands for {})", name, other),
                );
                None
            }
        }
    }

    /// 依存関係の調査用。診断情報は捨てる
    pub(super) fn peek_name(&self, name: &NameRef, namespace: &Namespace) -> Option<QualifiedTypeName> {
        let mut ctx = ResolutionContext::new(name.location.clone());
        self.resolve_name(name, namespace, &mut ctx)
    }

    /// 名前を修飾名に解決（別名は展開しない、診断なし）
    pub(super) fn lookup_name(&self, name: &NameRef, namespace: &Namespace) -> Option<QualifiedTypeName> {
        if let Some(qualified) = &name.namespace {
            let qname = QualifiedTypeName::new(qualified.clone(), name.name.clone());
            return self.type_exists(&qname).then_some(qname);
        }

        let local = QualifiedTypeName::new(namespace.clone(), name.name.clone());
        if self.type_exists(&local) {
            return Some(local);
        }

        if let Some(from) = self
            .scopes
            .get(namespace)
            .and_then(|scope| scope.imported_namespace(&name.name))
        {
            let imported = QualifiedTypeName::new(from.clone(), name.name.clone());
            if self.type_exists(&imported) {
                return Some(imported);
            }
        }

        let core = QualifiedTypeName::core(name.name.clone());
        self.type_exists(&core).then_some(core)
    }

    fn resolve_base(
        &self,
        name: &NameRef,
        restriction: Option<&RestrictionSyntax>,
        nested: bool,
        namespace: &Namespace,
        ctx: &mut ResolutionContext,
    ) -> Option<TypeReference> {
        let Some(qname) = self.lookup_name(name, namespace) else {
            ctx.report(
                name.location.clone(),
                format!("unresolved type reference {}", name),
            );
            return None;
        };

        let target = match self.alias_source(&qname) {
            None => return self.atomic(qname, name, restriction, nested, ctx),
            Some(AliasSource::Resolved(target)) => target.clone(),
            Some(AliasSource::Declared(_)) if !ctx.expand_declared => {
                log::trace!("alias {} failed to build; dropping reference", qname);
                return None;
            }
            Some(AliasSource::Declared(target)) => {
                if ctx.chain.contains(&qname) {
                    let chain = ctx
                        .chain
                        .iter()
                        .chain(iter::once(&qname))
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    let origin = ctx.origin.clone();
                    ctx.report(origin, format!("circular alias dependency: {}", chain));
                    return None;
                }

                // 別名の対象は別名自身の名前空間で解決する
                ctx.chain.push(qname.clone());
                let resolved = self.resolve_type(target, &qname.namespace, ctx);
                ctx.chain.pop();
                resolved?
            }
        };

        log::trace!("substituting alias {} with {}", qname, target);
        self.substitute(&qname, target, name, restriction, nested, ctx)
    }

    fn alias_source(&self, qname: &QualifiedTypeName) -> Option<AliasSource<'_>> {
        if let Some(Definition::AliasedType(def)) = self.definition(qname) {
            return Some(AliasSource::Resolved(&def.target));
        }
        match self.declarations.get(qname) {
            Some(ctx) => match ctx.decl {
                TypeDecl::Alias(decl) => Some(AliasSource::Declared(&decl.target)),
                _ => None,
            },
            None => None,
        }
    }

    /// 別名を展開した結果に外側の制約と入れ子の情報を適用する
    fn substitute(
        &self,
        alias: &QualifiedTypeName,
        target: TypeReference,
        name: &NameRef,
        restriction: Option<&RestrictionSyntax>,
        nested: bool,
        ctx: &mut ResolutionContext,
    ) -> Option<TypeReference> {
        // 単純な別名は名前で置き換え、外側の制約を改めて適用する
        if target.is_plain() {
            return self.atomic(target.base_name().clone(), name, restriction, nested, ctx);
        }

        if let Some(restriction) = restriction {
            ctx.report(
                restriction.location().clone(),
                format!(
                    "restriction {} cannot be applied to alias {} of {}",
                    restriction, alias, target
                ),
            );
            return None;
        }

        Some(target)
    }

    fn atomic(
        &self,
        qname: QualifiedTypeName,
        name: &NameRef,
        restriction: Option<&RestrictionSyntax>,
        nested: bool,
        ctx: &mut ResolutionContext,
    ) -> Option<TypeReference> {
        if nested && qname == QualifiedTypeName::core("Null") {
            ctx.report(
                name.location.clone(),
                "Null cannot be nested inside a quantified type",
            );
            return None;
        }

        let restriction = match restriction {
            Some(syntax) => Some(self.compile_restriction(syntax, &qname, ctx)?),
            None => None,
        };

        Some(TypeReference::Atomic {
            name: qname,
            restriction,
        })
    }
}
