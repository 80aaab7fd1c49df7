//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、コンパイラ全体で使用されるエラー型と
//! 意味解析の診断情報（重複排除付き）を提供します。

use crate::ast::Location;
use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// コンパイラの統一エラー型
#[derive(Error, Debug, Clone)]
pub enum IdlError {
    /// レキサーエラー
    #[error("lexical error: {0}")]
    Lexer(#[from] LexerError),

    /// パーサーエラー
    #[error("syntax error: {0}")]
    Parser(#[from] ParserError),

    /// 環境レベルのコンパイルエラー
    #[error("compilation error: {0}")]
    Compile(#[from] CompileError),

    /// ファイルI/Oエラー
    #[error("file error: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// レキサーエラーの詳細
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("unrecognized token '{token}'")]
    UnrecognizedToken { token: String, location: Location },
}

impl LexerError {
    pub fn location(&self) -> &Location {
        match self {
            LexerError::UnrecognizedToken { location, .. } => location,
        }
    }
}

/// パーサーエラーの詳細
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: Location,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, location: Location },

    #[error("{message}")]
    SyntaxError { message: String, location: Location },
}

impl ParserError {
    pub fn location(&self) -> &Location {
        match self {
            ParserError::UnexpectedToken { location, .. }
            | ParserError::UnexpectedEof { location, .. }
            | ParserError::SyntaxError { location, .. } => location,
        }
    }
}

/// 環境レベルの失敗（意味解析の問題は診断情報として報告される）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("no external type map was supplied")]
    MissingExternalTypes,

    #[error("cannot load external types from {path}: {message}")]
    ExternalTypes { path: String, message: String },
}

/// 意味解析の診断情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// 重複排除のキーとなる文字列表現
    pub fn render(&self) -> String {
        format!("{}: {}", self.location, self.message)
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_report(&self, file_id: usize) -> Report<usize> {
        let span = self.location.span;
        Report::error()
            .with_message(self.message.clone())
            .with_labels(vec![Label::primary(file_id, span.start..span.end)])
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&LexerError> for Diagnostic {
    fn from(e: &LexerError) -> Self {
        Diagnostic::new(e.location().clone(), e.to_string())
    }
}

impl From<&ParserError> for Diagnostic {
    fn from(e: &ParserError) -> Self {
        Diagnostic::new(e.location().clone(), e.to_string())
    }
}

/// 描画文字列で重複排除される診断情報の集合
#[derive(Debug, Default, Clone)]
pub struct ErrorSet {
    entries: IndexMap<String, Diagnostic>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 診断情報を追加。同じ描画結果が既にあれば何もせず false を返す
    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        let key = diagnostic.render();
        if self.entries.contains_key(&key) {
            log::trace!("duplicate diagnostic dropped: {}", key);
            return false;
        }
        self.entries.insert(key, diagnostic);
        true
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries.into_values().collect()
    }

    /// 位置順に並べた診断情報
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self.entries.values().cloned().collect();
        diagnostics.sort_by(|a, b| a.location.cmp(&b.location).then_with(|| a.message.cmp(&b.message)));
        diagnostics
    }
}

/// Result型のエイリアス
pub type IdlResult<T> = Result<T, IdlError>;

impl From<std::io::Error> for IdlError {
    fn from(e: std::io::Error) -> Self {
        IdlError::Io(e.to_string())
    }
}
