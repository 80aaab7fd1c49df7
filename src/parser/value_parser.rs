//! リテラル（既定値・制約の境界）のパース

use crate::ast::*;
use crate::lexer::Token;

use super::parser_impl::Parser;
use super::ParseResult;

impl Parser {
    pub(super) fn parse_literal(&mut self) -> ParseResult<LiteralExpr> {
        let start = self.current_span().start;

        let literal = match self.current_token() {
            Some(Token::Integer(n)) => {
                let n = *n;
                self.advance();
                Literal::Integer(n)
            }
            Some(Token::Float(n)) => {
                let n = *n;
                self.advance();
                Literal::Float(n)
            }
            Some(Token::String(s)) => {
                let s = s.clone();
                self.advance();
                Literal::String(s)
            }
            Some(Token::True) => {
                self.advance();
                Literal::Boolean(true)
            }
            Some(Token::False) => {
                self.advance();
                Literal::Boolean(false)
            }
            Some(Token::Null) => {
                self.advance();
                Literal::Null
            }
            Some(Token::LeftBracket) => {
                self.advance();
                let mut items = Vec::new();
                while !self.check(&Token::RightBracket) {
                    items.push(self.parse_literal()?);
                    if !self.match_token(&Token::Comma) {
                        break;
                    }
                }
                self.expect(Token::RightBracket)?;
                Literal::List(items)
            }
            Some(Token::Identifier(_)) => {
                // 定数参照: `Status.Open` または `a.b@1/Status.Open`
                let mut path = vec![self.expect_identifier()?.name];
                while self.match_token(&Token::Dot) {
                    path.push(self.expect_identifier()?.name);
                }

                if self.check(&Token::At) || self.check(&Token::Slash) {
                    let version = self.parse_version_suffix()?;
                    self.expect(Token::Slash)?;
                    let type_name = self.expect_identifier()?.name;
                    self.expect(Token::Dot)?;
                    let value = self.expect_identifier()?.name;
                    Literal::Constant {
                        namespace: Some(Namespace {
                            parts: path,
                            version,
                        }),
                        path: vec![type_name, value],
                    }
                } else {
                    Literal::Constant {
                        namespace: None,
                        path,
                    }
                }
            }
            _ => return Err(self.unexpected("literal".to_string())),
        };

        Ok(LiteralExpr::new(literal, self.location_from(start)))
    }
}
