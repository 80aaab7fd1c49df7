//! パーサーテストの共通モジュール
//!
//! パーサーテストで使用する共通のヘルパー関数を定義する。

use idlc::ast::*;
use idlc::error::IdlError;
use idlc::lexer::Lexer;
use idlc::parser::{ParseError, Parser};

/// ソースコードを解析してソース単位を取得するヘルパー関数
pub fn parse(source: &str) -> Result<SourceUnit, IdlError> {
    idlc::parser::parse_source("test.idl", source)
}

/// 解析に成功することを確認するヘルパー関数
pub fn assert_parse_success(source: &str) -> SourceUnit {
    parse(source).expect("Parsing should succeed")
}

/// 構文エラーになることを確認し、そのエラーを返すヘルパー関数
pub fn assert_parse_error(source: &str) -> ParseError {
    match parse(source) {
        Err(IdlError::Parser(e)) => e,
        other => panic!("Expected a syntax error, got: {:?}", other),
    }
}

/// 宣言を1つだけ含むソースを解析する
pub fn parse_decl(decl: &str) -> TypeDecl {
    let mut unit = assert_parse_success(&format!("namespace t;\n{}", decl));
    assert_eq!(unit.decls.len(), 1, "Expected exactly one declaration");
    unit.decls.remove(0)
}

/// 単独の型参照を解析する
pub fn parse_type(source: &str) -> Result<TypeExpr, ParseError> {
    let (tokens, index) = Lexer::new("test.idl", source)
        .tokenize()
        .expect("Lexing should succeed");
    Parser::new(tokens, index).parse_type_expression()
}

// サブモジュールの宣言
#[cfg(test)]
mod decl_test;
#[cfg(test)]
mod literal_test;
#[cfg(test)]
mod type_test;
