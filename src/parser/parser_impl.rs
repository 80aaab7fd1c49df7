//! メインパーサー構造とユーティリティ

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::{LineIndex, Token, TokenWithPosition};

use super::ParseResult;

/// IDLパーサー
pub struct Parser {
    pub(super) tokens: Vec<TokenWithPosition>,
    pub(super) current: usize,
    pub(super) index: LineIndex,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPosition>, index: LineIndex) -> Self {
        Self {
            tokens,
            current: 0,
            index,
        }
    }

    /// ソース単位全体を解析
    pub fn parse(&mut self) -> ParseResult<SourceUnit> {
        // 名前空間宣言を解析
        let namespace = self.parse_namespace_decl()?;

        // インポートを解析（オプション）
        let mut imports = Vec::new();
        while self.check(&Token::Import) {
            imports.push(self.parse_import()?);
        }

        // トップレベルの型宣言を解析
        let mut decls = Vec::new();
        while !self.is_at_end() {
            decls.push(self.parse_decl()?);
        }

        Ok(SourceUnit {
            namespace,
            imports,
            decls,
        })
    }

    /// 単一の型参照を解析（テストやツール用）
    pub fn parse_type_expression(&mut self) -> ParseResult<TypeExpr> {
        self.parse_type()
    }

    // ==================== ユーティリティメソッド ====================

    /// 現在のトークンを取得
    pub(super) fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|t| &t.token)
    }

    /// 現在のスパンを取得
    pub(super) fn current_span(&self) -> logos::Span {
        match self.tokens.get(self.current) {
            Some(t) => t.span.clone(),
            None => {
                let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
                end..end
            }
        }
    }

    /// 現在のトークンの位置情報
    pub(super) fn current_location(&self) -> Location {
        self.index.location(self.current_span())
    }

    /// 開始位置から直前のトークンまでの位置情報を作成
    pub(super) fn location_from(&self, start: usize) -> Location {
        let end = if self.current > 0 {
            self.tokens
                .get(self.current - 1)
                .map(|t| t.span.end)
                .unwrap_or(start)
        } else {
            self.current_span().end
        };
        self.index.location(start..end.max(start))
    }

    /// 次のトークンに進む
    pub(super) fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// 終端に到達したかチェック
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// 特定のトークンをチェック（進まない）
    pub(super) fn check(&self, token_type: &Token) -> bool {
        if let Some(token) = self.current_token() {
            std::mem::discriminant(token) == std::mem::discriminant(token_type)
        } else {
            false
        }
    }

    /// 特定のトークンにマッチしたら進む
    pub(super) fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 特定のトークンを期待
    pub(super) fn expect(&mut self, token_type: Token) -> ParseResult<()> {
        if self.check(&token_type) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(format!("'{}'", token_type)))
        }
    }

    /// 識別子を期待
    pub(super) fn expect_identifier(&mut self) -> ParseResult<Ident> {
        match self.current_token() {
            Some(Token::Identifier(name)) => {
                let ident = Ident::new(name.clone(), self.current_location());
                self.advance();
                Ok(ident)
            }
            _ => Err(self.unexpected("identifier".to_string())),
        }
    }

    /// 予期しないトークンエラーを作成
    pub(super) fn unexpected(&self, expected: String) -> ParserError {
        match self.current_token() {
            Some(token) => ParserError::UnexpectedToken {
                expected,
                found: format!("'{}'", token),
                location: self.current_location(),
            },
            None => ParserError::UnexpectedEof {
                expected,
                location: self.current_location(),
            },
        }
    }

    /// エラーを作成
    pub(super) fn error(&self, message: String) -> ParserError {
        ParserError::SyntaxError {
            message,
            location: self.current_location(),
        }
    }
}
