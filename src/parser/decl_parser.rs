//! 宣言のパース

use crate::ast::*;
use crate::lexer::Token;

use super::parser_impl::Parser;
use super::ParseResult;

impl Parser {
    /// 名前空間宣言: `namespace a.b@1;`
    pub(super) fn parse_namespace_decl(&mut self) -> ParseResult<NamespaceDecl> {
        let start = self.current_span().start;
        self.expect(Token::Namespace)?;
        let namespace = self.parse_namespace_path()?;
        self.expect(Token::Semicolon)?;

        Ok(NamespaceDecl {
            namespace,
            location: self.location_from(start),
        })
    }

    /// 名前空間パス: `a.b.c` に任意で `@版数`
    pub(super) fn parse_namespace_path(&mut self) -> ParseResult<Namespace> {
        let mut parts = vec![self.expect_identifier()?.name];
        while self.match_token(&Token::Dot) {
            parts.push(self.expect_identifier()?.name);
        }
        let version = self.parse_version_suffix()?;
        Ok(Namespace { parts, version })
    }

    /// 任意の版数 `@n`。省略時は 0
    pub(super) fn parse_version_suffix(&mut self) -> ParseResult<u32> {
        if !self.match_token(&Token::At) {
            return Ok(0);
        }
        match self.current_token() {
            Some(Token::Integer(n)) => {
                let version = u32::try_from(*n)
                    .map_err(|_| self.error(format!("invalid namespace version {}", n)))?;
                self.advance();
                Ok(version)
            }
            _ => Err(self.unexpected("namespace version".to_string())),
        }
    }

    /// インポート句
    pub(super) fn parse_import(&mut self) -> ParseResult<ImportClause> {
        let start = self.current_span().start;
        self.expect(Token::Import)?;
        let namespace = self.parse_namespace_path()?;
        self.expect(Token::Slash)?;

        let mut includes = Vec::new();
        let glob = if self.match_token(&Token::Star) {
            true
        } else if self.check(&Token::LeftBracket) {
            includes = self.parse_ident_list()?;
            false
        } else {
            return Err(self.unexpected("'*' or '['".to_string()));
        };

        let mut excludes = Vec::new();
        if self.check(&Token::Except) {
            if !glob {
                return Err(self.error("'except' is only allowed after a wildcard import".to_string()));
            }
            self.advance();
            excludes = self.parse_ident_list()?;
        }
        self.expect(Token::Semicolon)?;

        Ok(ImportClause {
            namespace,
            glob,
            includes,
            excludes,
            location: self.location_from(start),
        })
    }

    /// `[A, B, C]`
    fn parse_ident_list(&mut self) -> ParseResult<Vec<Ident>> {
        self.expect(Token::LeftBracket)?;
        let mut idents = Vec::new();
        while !self.check(&Token::RightBracket) {
            idents.push(self.expect_identifier()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RightBracket)?;
        Ok(idents)
    }

    /// トップレベル宣言
    pub(super) fn parse_decl(&mut self) -> ParseResult<TypeDecl> {
        match self.current_token() {
            Some(Token::Alias) => self.parse_alias().map(TypeDecl::Alias),
            Some(Token::Struct) => self.parse_struct().map(TypeDecl::Struct),
            Some(Token::Enum) => self.parse_enum().map(TypeDecl::Enum),
            Some(Token::Schema) => self.parse_schema().map(TypeDecl::Schema),
            Some(Token::Prototype) => self.parse_prototype().map(TypeDecl::Prototype),
            Some(Token::Service) => self.parse_service().map(TypeDecl::Service),
            _ => Err(self.unexpected("type declaration".to_string())),
        }
    }

    fn parse_alias(&mut self) -> ParseResult<AliasDecl> {
        let start = self.current_span().start;
        self.expect(Token::Alias)?;
        let name = self.expect_identifier()?;
        let target = self.parse_type()?;
        self.expect(Token::Semicolon)?;

        Ok(AliasDecl {
            name,
            target,
            location: self.location_from(start),
        })
    }

    fn parse_struct(&mut self) -> ParseResult<StructDecl> {
        let start = self.current_span().start;
        self.expect(Token::Struct)?;
        let name = self.expect_identifier()?;

        let supertype = if self.match_token(&Token::Lt) {
            Some(self.parse_name_ref()?)
        } else {
            None
        };
        let mixins = self.parse_mixins()?;

        self.expect(Token::LeftBrace)?;
        let mut fields = Vec::new();
        let mut constructors = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            if self.check(&Token::Constructor) {
                let ctor_start = self.current_span().start;
                self.advance();
                let param = self.parse_type()?;
                self.expect(Token::Semicolon)?;
                constructors.push(ConstructorDecl {
                    param,
                    location: self.location_from(ctor_start),
                });
            } else {
                fields.push(self.parse_field()?);
            }
        }
        self.expect(Token::RightBrace)?;
        self.match_token(&Token::Semicolon);

        Ok(StructDecl {
            name,
            supertype,
            mixins,
            fields,
            constructors,
            location: self.location_from(start),
        })
    }

    fn parse_enum(&mut self) -> ParseResult<EnumDecl> {
        let start = self.current_span().start;
        self.expect(Token::Enum)?;
        let name = self.expect_identifier()?;

        self.expect(Token::LeftBrace)?;
        let mut values = Vec::new();
        while !self.check(&Token::RightBrace) {
            values.push(self.expect_identifier()?);
            // 末尾のカンマを許可
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RightBrace)?;
        self.match_token(&Token::Semicolon);

        Ok(EnumDecl {
            name,
            values,
            location: self.location_from(start),
        })
    }

    fn parse_schema(&mut self) -> ParseResult<SchemaDecl> {
        let start = self.current_span().start;
        self.expect(Token::Schema)?;
        let name = self.expect_identifier()?;
        let mixins = self.parse_mixins()?;
        let fields = self.parse_field_block()?;
        self.match_token(&Token::Semicolon);

        Ok(SchemaDecl {
            name,
            mixins,
            fields,
            location: self.location_from(start),
        })
    }

    fn parse_prototype(&mut self) -> ParseResult<PrototypeDecl> {
        let start = self.current_span().start;
        self.expect(Token::Prototype)?;
        let name = self.expect_identifier()?;
        let signature = self.parse_signature()?;
        self.expect(Token::Semicolon)?;

        Ok(PrototypeDecl {
            name,
            signature,
            location: self.location_from(start),
        })
    }

    fn parse_service(&mut self) -> ParseResult<ServiceDecl> {
        let start = self.current_span().start;
        self.expect(Token::Service)?;
        let name = self.expect_identifier()?;

        let supertype = if self.match_token(&Token::Lt) {
            Some(self.parse_name_ref()?)
        } else {
            None
        };
        let security = if self.match_token(&Token::Secured) {
            self.expect(Token::By)?;
            Some(self.parse_name_ref()?)
        } else {
            None
        };

        self.expect(Token::LeftBrace)?;
        let mut operations = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            let op_start = self.current_span().start;
            let op_name = self.expect_identifier()?;
            let signature = self.parse_signature()?;
            self.expect(Token::Semicolon)?;
            operations.push(OperationDecl {
                name: op_name,
                signature,
                location: self.location_from(op_start),
            });
        }
        self.expect(Token::RightBrace)?;
        self.match_token(&Token::Semicolon);

        Ok(ServiceDecl {
            name,
            supertype,
            security,
            operations,
            location: self.location_from(start),
        })
    }

    /// `with A, B`
    fn parse_mixins(&mut self) -> ParseResult<Vec<NameRef>> {
        let mut mixins = Vec::new();
        if self.match_token(&Token::With) {
            loop {
                mixins.push(self.parse_name_ref()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        Ok(mixins)
    }

    /// 呼び出しシグネチャ: `{ fields } -> Ret throws E1, E2`
    fn parse_signature(&mut self) -> ParseResult<SignatureDecl> {
        let fields = self.parse_field_block()?;

        let returns = if self.match_token(&Token::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut throws = Vec::new();
        if self.match_token(&Token::Throws) {
            loop {
                throws.push(self.parse_type()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }

        Ok(SignatureDecl {
            fields,
            returns,
            throws,
        })
    }

    fn parse_field_block(&mut self) -> ParseResult<Vec<FieldDecl>> {
        self.expect(Token::LeftBrace)?;
        let mut fields = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            fields.push(self.parse_field()?);
        }
        self.expect(Token::RightBrace)?;
        Ok(fields)
    }

    /// フィールド: `name: Type = default;`
    fn parse_field(&mut self) -> ParseResult<FieldDecl> {
        let start = self.current_span().start;
        let name = self.expect_identifier()?;
        self.expect(Token::Colon)?;
        let ty = self.parse_type()?;
        let default = if self.match_token(&Token::Assign) {
            Some(self.parse_literal()?)
        } else {
            None
        };
        self.expect(Token::Semicolon)?;

        Ok(FieldDecl {
            name,
            ty,
            default,
            location: self.location_from(start),
        })
    }
}
