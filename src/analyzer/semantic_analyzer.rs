//! セマンティック解析器のメイン実装
//!
//! 1回の `Compilation::execute()` の間だけ存在する作業状態を保持し、
//! 各フェーズを決められた順序で実行します。

use indexmap::IndexMap;

use crate::ast::{Location, Namespace, SourceUnit, TypeDecl, TypeKind};
use crate::error::ErrorSet;
use crate::types::{Definition, DefinitionLookup, DefinitionMap, QualifiedTypeName};
use crate::value::{Caster, Evaluator};

use super::compilation::CompilationResult;
use super::deferred::DeferredTask;
use super::scope::BuildScope;

/// 順序付けの単位：宣言とその修飾名
#[derive(Debug, Clone)]
pub(super) struct BuildContext<'a> {
    pub qname: QualifiedTypeName,
    pub decl: &'a TypeDecl,
}

impl BuildContext<'_> {
    pub fn namespace(&self) -> &Namespace {
        &self.qname.namespace
    }
}

/// 構築済みの定義と外部定義をまとめて参照するビュー
pub(super) struct Definitions<'b> {
    built: &'b DefinitionMap,
    external: &'b DefinitionMap,
}

impl DefinitionLookup for Definitions<'_> {
    fn definition(&self, name: &QualifiedTypeName) -> Option<&Definition> {
        self.built.get(name).or_else(|| self.external.get(name))
    }
}

/// セマンティック解析器
pub(super) struct SemanticAnalyzer<'a> {
    /// 外部から供給された定義（読み取り専用）
    pub(super) external: &'a DefinitionMap,
    pub(super) caster: &'a dyn Caster,
    pub(super) evaluator: &'a dyn Evaluator,
    /// 登録済みの宣言（登録順）
    pub(super) declarations: IndexMap<QualifiedTypeName, BuildContext<'a>>,
    /// 名前空間ごとの最初の名前空間宣言の位置
    pub(super) namespaces: IndexMap<Namespace, Location>,
    /// 名前空間ごとのビルドスコープ
    pub(super) scopes: IndexMap<Namespace, BuildScope>,
    /// 今回構築した定義
    pub(super) built: DefinitionMap,
    /// 遅延実行されるタスク
    pub(super) deferred: Vec<DeferredTask>,
    /// 収集された診断情報
    pub(super) errors: ErrorSet,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(
        external: &'a DefinitionMap,
        caster: &'a dyn Caster,
        evaluator: &'a dyn Evaluator,
    ) -> Self {
        Self {
            external,
            caster,
            evaluator,
            declarations: IndexMap::new(),
            namespaces: IndexMap::new(),
            scopes: IndexMap::new(),
            built: DefinitionMap::new(),
            deferred: Vec::new(),
            errors: ErrorSet::new(),
        }
    }

    /// 全フェーズを実行して結果を組み立てる
    pub fn run(mut self, units: &'a [SourceUnit]) -> CompilationResult {
        // 第一パス: 宣言の登録（インポート解決より前に全て終わらせる）
        self.register_declarations(units);

        // 第二パス: 名前空間ごとのインポート解決
        self.build_scopes(units);

        // 第三パス: 依存順に型を構築
        self.build_aliases();
        self.build_enums();
        self.build_schemas();
        self.build_structs();
        self.build_prototypes();
        self.build_services();

        // 第四パス: 完成したグラフに対する検査
        self.check_namespace_cycles();
        self.drain_deferred();

        log::debug!(
            "compilation finished: {} types built, {} diagnostics",
            self.built.len(),
            self.errors.len()
        );
        CompilationResult::new(self.built, self.errors)
    }

    /// 指定した種類の宣言を登録順に取得
    pub(super) fn declarations_of(&self, kind: TypeKind) -> Vec<BuildContext<'a>> {
        self.declarations
            .values()
            .filter(|ctx| ctx.decl.kind() == kind)
            .cloned()
            .collect()
    }

    pub(super) fn definitions(&self) -> Definitions<'_> {
        Definitions {
            built: &self.built,
            external: self.external,
        }
    }

    /// 構築済みまたは外部の定義を取得
    pub(super) fn definition(&self, name: &QualifiedTypeName) -> Option<&Definition> {
        self.built.get(name).or_else(|| self.external.get(name))
    }
}
