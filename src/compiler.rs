//! コンパイラのメイン処理モジュール
//!
//! このモジュールは、複数のソースファイルの読み込みから意味解析・診断情報の
//! 出力までのパイプライン全体を管理します。構文エラーのあるファイルは
//! 診断情報として記録してスキップし、残りのファイルで処理を続けます。

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::{Compilation, CompilationResult};
use crate::ast::SourceUnit;
use crate::error::{CompileError, Diagnostic, IdlError, IdlResult};
use crate::parser::parse_source;
use crate::types::{core_types, DefinitionMap};

/// コンパイラの設定
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// 組み込みの `core` プリミティブを外部定義に含める
    pub include_core: bool,
    /// 外部定義（JSON）のパス
    pub external: Option<PathBuf>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            include_core: true,
            external: None,
        }
    }
}

impl CompilerOptions {
    /// 外部定義を読み込み、必要なら `core` プリミティブと合わせる
    pub fn load_external_types(&self) -> IdlResult<DefinitionMap> {
        let mut types = if self.include_core {
            core_types()
        } else {
            DefinitionMap::new()
        };

        if let Some(path) = &self.external {
            let external_error = |message: String| {
                IdlError::Compile(CompileError::ExternalTypes {
                    path: path.display().to_string(),
                    message,
                })
            };
            let json = fs::read_to_string(path).map_err(|e| external_error(e.to_string()))?;
            let loaded: DefinitionMap =
                serde_json::from_str(&json).map_err(|e| external_error(e.to_string()))?;
            log::debug!("loaded {} external types from {}", loaded.len(), path.display());
            types.extend(loaded);
        }

        Ok(types)
    }
}

/// コンパイル状態を管理する構造体
pub struct CompilationState {
    pub files: SimpleFiles<String, String>,
    file_ids: HashMap<String, usize>,
    pub units: Vec<SourceUnit>,
    /// 字句・構文エラー（該当ファイルはスキップされる）
    pub syntax_errors: Vec<Diagnostic>,
}

impl Default for CompilationState {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationState {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            file_ids: HashMap::new(),
            units: Vec::new(),
            syntax_errors: Vec::new(),
        }
    }

    /// ファイルを読み込んで解析
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> IdlResult<()> {
        let name = path.as_ref().display().to_string();
        let source = fs::read_to_string(path.as_ref())
            .map_err(|e| IdlError::Io(format!("failed to read source file {}: {}", name, e)))?;
        self.add_source(&name, source);
        Ok(())
    }

    /// 文字列から解析（テスト用）
    pub fn add_source(&mut self, name: &str, source: String) {
        let parsed = parse_source(name, &source);
        let file_id = self.files.add(name.to_string(), source);
        self.file_ids.insert(name.to_string(), file_id);

        match parsed {
            Ok(unit) => {
                log::debug!("parsed {} with {} declarations", name, unit.decls.len());
                self.units.push(unit);
            }
            Err(IdlError::Lexer(e)) => self.syntax_errors.push(Diagnostic::from(&e)),
            Err(IdlError::Parser(e)) => self.syntax_errors.push(Diagnostic::from(&e)),
            Err(e) => self.syntax_errors.push(Diagnostic::new(
                crate::ast::Location::synthetic(name),
                e.to_string(),
            )),
        }
    }

    pub fn has_syntax_errors(&self) -> bool {
        !self.syntax_errors.is_empty()
    }

    /// 診断情報を報告
    pub fn report_diagnostics(&self, diagnostics: &[Diagnostic]) -> IdlResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();

        for diagnostic in diagnostics {
            match self.file_ids.get(&diagnostic.location.file) {
                Some(file_id) => {
                    let report = diagnostic.to_report(*file_id);
                    codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, &report)
                        .map_err(|e| IdlError::Io(format!("failed to emit diagnostic: {}", e)))?;
                }
                // 読み込んでいないファイル（外部定義など）の位置はそのまま表示
                None => eprintln!("error: {}", diagnostic),
            }
        }

        Ok(())
    }
}

/// コンパイルパイプライン
pub struct CompilationPipeline {
    state: CompilationState,
    options: CompilerOptions,
}

impl CompilationPipeline {
    pub fn new(state: CompilationState, options: CompilerOptions) -> Self {
        Self { state, options }
    }

    /// コンパイル状態への参照を取得
    pub fn state(&self) -> &CompilationState {
        &self.state
    }

    /// 意味解析を実行し、構文エラーと合わせた結果を返す
    pub fn analyze(&self) -> IdlResult<CompilationResult> {
        let external = self.options.load_external_types()?;
        let compilation = Compilation::new(self.state.units.clone(), Some(external));
        let mut result = compilation.execute()?;

        let mut diagnostics = self.state.syntax_errors.clone();
        diagnostics.append(&mut result.diagnostics);
        result.diagnostics = diagnostics;
        Ok(result)
    }

    /// パイプライン全体を実行し、診断情報を出力する
    pub fn run(&self) -> IdlResult<CompilationResult> {
        let result = self.analyze()?;
        self.state.report_diagnostics(&result.diagnostics_sorted())?;

        if !result.is_success() {
            eprintln!(
                "\ncompilation failed: {} error(s) found",
                result.diagnostics.len()
            );
        }
        Ok(result)
    }
}
