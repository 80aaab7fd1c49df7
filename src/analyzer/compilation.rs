//! コンパイルの公開API

use serde::{Deserialize, Serialize};

use crate::ast::SourceUnit;
use crate::error::{CompileError, Diagnostic, ErrorSet};
use crate::types::DefinitionMap;
use crate::value::{Caster, ConstInterpreter, Evaluator, ValueCaster};

use super::semantic_analyzer::SemanticAnalyzer;

/// 構文解析済みのソース単位と外部定義からなる1回分のビルド
pub struct Compilation {
    units: Vec<SourceUnit>,
    external: Option<DefinitionMap>,
    caster: Box<dyn Caster>,
    evaluator: Box<dyn Evaluator>,
}

impl Compilation {
    pub fn new(units: Vec<SourceUnit>, external: Option<DefinitionMap>) -> Self {
        Self {
            units,
            external,
            caster: Box::new(ValueCaster),
            evaluator: Box::new(ConstInterpreter),
        }
    }

    /// キャストエンジンを差し替える
    pub fn with_caster(mut self, caster: impl Caster + 'static) -> Self {
        self.caster = Box::new(caster);
        self
    }

    /// 定数式インタプリタを差し替える
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// 毎回ゼロからビルドする。意味的な問題は全て診断情報として返し、
    /// `Err` は環境レベルの失敗にだけ使う
    pub fn execute(&self) -> Result<CompilationResult, CompileError> {
        let external = self
            .external
            .as_ref()
            .ok_or(CompileError::MissingExternalTypes)?;

        log::debug!(
            "compiling {} source units against {} external types",
            self.units.len(),
            external.len()
        );

        let analyzer = SemanticAnalyzer::new(external, self.caster.as_ref(), self.evaluator.as_ref());
        Ok(analyzer.run(&self.units))
    }
}

/// 構築された定義と、重複排除された診断情報
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationResult {
    pub built_types: DefinitionMap,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationResult {
    pub(super) fn new(built_types: DefinitionMap, errors: ErrorSet) -> Self {
        Self {
            built_types,
            diagnostics: errors.into_vec(),
        }
    }

    /// 診断情報が1つもなければ成功
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 位置順に並べた診断情報
    pub fn diagnostics_sorted(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics.clone();
        diagnostics.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.message.cmp(&b.message))
        });
        diagnostics
    }
}
