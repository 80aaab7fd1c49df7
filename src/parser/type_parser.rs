//! 型参照のパース

use crate::ast::*;
use crate::lexer::Token;

use super::parser_impl::Parser;
use super::ParseResult;

impl Parser {
    /// 型参照をパース
    pub(super) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let mut ty = if self.match_token(&Token::LeftBracket) {
            // リスト型: [T] または [T]+
            let element = self.parse_type()?;
            self.expect(Token::RightBracket)?;
            let allow_empty = !self.match_token(&Token::Plus);
            TypeExpr::List {
                element: Box::new(element),
                allow_empty,
            }
        } else {
            let name = self.parse_name_ref()?;
            let restriction = self.parse_restriction()?;
            TypeExpr::Named { name, restriction }
        };

        // 後置の量化子
        loop {
            if self.match_token(&Token::Question) {
                ty = TypeExpr::Nullable(Box::new(ty));
            } else if self.match_token(&Token::Star) {
                ty = TypeExpr::Pointer(Box::new(ty));
            } else {
                break;
            }
        }

        Ok(ty)
    }

    /// 型名: `Name` または `a.b@1/Name`
    pub(super) fn parse_name_ref(&mut self) -> ParseResult<NameRef> {
        let start = self.current_span().start;
        let first = self.expect_identifier()?;

        let mut parts = vec![first.name];
        while self.match_token(&Token::Dot) {
            parts.push(self.expect_identifier()?.name);
        }
        let has_version = self.check(&Token::At);
        let version = self.parse_version_suffix()?;

        if self.match_token(&Token::Slash) {
            let name = self.expect_identifier()?;
            return Ok(NameRef {
                namespace: Some(Namespace { parts, version }),
                name: name.name,
                location: self.location_from(start),
            });
        }

        if parts.len() > 1 || has_version {
            return Err(self.unexpected("'/'".to_string()));
        }

        let name = parts.pop().unwrap_or_default();
        Ok(NameRef::simple(name, self.location_from(start)))
    }

    /// 制約: `~/regex/` または `~[min,max)`
    fn parse_restriction(&mut self) -> ParseResult<Option<RestrictionSyntax>> {
        if let Some(Token::Pattern(pattern)) = self.current_token() {
            let pattern = pattern.clone();
            let location = self.current_location();
            self.advance();
            return Ok(Some(RestrictionSyntax::Regex { pattern, location }));
        }

        if !self.check(&Token::Tilde) {
            return Ok(None);
        }
        let start = self.current_span().start;
        self.advance();

        let min_inclusive = if self.match_token(&Token::LeftBracket) {
            true
        } else if self.match_token(&Token::LeftParen) {
            false
        } else {
            return Err(self.unexpected("'[', '(' or regex pattern".to_string()));
        };

        let min = if self.check(&Token::Comma) {
            None
        } else {
            Some(self.parse_literal()?)
        };
        self.expect(Token::Comma)?;
        let max = if self.check(&Token::RightBracket) || self.check(&Token::RightParen) {
            None
        } else {
            Some(self.parse_literal()?)
        };

        let max_inclusive = if self.match_token(&Token::RightBracket) {
            true
        } else if self.match_token(&Token::RightParen) {
            false
        } else {
            return Err(self.unexpected("']' or ')'".to_string()));
        };

        Ok(Some(RestrictionSyntax::Range {
            min,
            max,
            min_inclusive,
            max_inclusive,
            location: self.location_from(start),
        }))
    }
}
