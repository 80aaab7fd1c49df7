//! レキサーのメイン実装

use logos::{Lexer as LogosLexer, Logos, Span};

use super::token::Token;
use crate::ast::Location;
use crate::error::LexerError;

/// 位置情報付きトークン
#[derive(Debug, Clone)]
pub struct TokenWithPosition {
    pub token: Token,
    pub span: Span,
}

/// バイトオフセットから行・列を求めるための索引
#[derive(Debug, Clone)]
pub struct LineIndex {
    file: String,
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(file: impl Into<String>, source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            file: file.into(),
            line_starts,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1始まりの行・列を持つ位置情報を作成
    pub fn location(&self, span: Span) -> Location {
        let line = match self.line_starts.binary_search(&span.start) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let column = span.start - self.line_starts[line] + 1;
        Location::new(self.file.clone(), span.into(), line + 1, column)
    }
}

/// IDLのレキサー
pub struct Lexer<'a> {
    inner: LogosLexer<'a, Token>,
    index: LineIndex,
}

impl<'a> Lexer<'a> {
    /// 新しいレキサーを作成
    pub fn new(file: impl Into<String>, input: &'a str) -> Self {
        Self {
            inner: Token::lexer(input),
            index: LineIndex::new(file, input),
        }
    }

    /// 次のトークンを取得
    pub fn next_token(&mut self) -> Option<Result<TokenWithPosition, LexerError>> {
        let token = self.inner.next()?;
        let span = self.inner.span();

        Some(match token {
            Ok(token) => Ok(TokenWithPosition { token, span }),
            Err(_) => Err(LexerError::UnrecognizedToken {
                token: self.inner.slice().to_string(),
                location: self.index.location(span),
            }),
        })
    }

    /// すべてのトークンを収集（最初の不正なトークンで失敗する）
    pub fn tokenize(mut self) -> Result<(Vec<TokenWithPosition>, LineIndex), LexerError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token?);
        }
        Ok((tokens, self.index))
    }
}

/// デバッグ用：トークンストリームを文字列として出力
pub fn format_tokens(tokens: &[TokenWithPosition]) -> String {
    tokens
        .iter()
        .map(|t| format!("{:?} @ {:?}", t.token, t.span))
        .collect::<Vec<_>>()
        .join("\n")
}
