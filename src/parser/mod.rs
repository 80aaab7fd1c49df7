//! パーサーモジュール
//!
//! このモジュールはトークンをソース単位（`SourceUnit`）に解析する責任を持ちます。
//! 再帰下降構文解析を使用します。
//!
//! ## 構文の概要
//!
//! ```text
//! namespace shop.orders@2;
//! import shop.common/* except [Money];
//! import billing/[Invoice];
//!
//! alias OrderId String~/[A-Z]{3}-[0-9]+/;
//! enum Status { Open, Paid }
//! schema Audited { created: Timestamp; }
//! struct Order < Base with Audited {
//!     id: OrderId;
//!     status: Status = Status.Open;
//!     lines: [Line]+;
//!     constructor String;
//! }
//! prototype Login { authentication: Token; } -> Session throws Denied;
//! service Orders secured by Login {
//!     place { order: Order; } -> OrderId throws Rejected*;
//! }
//! ```
//!
//! 型参照の末尾には `?`（null許容）と `*`（ポインタ）を付けられます。
//! `[T]` は空を許すリスト、`[T]+` は空を許さないリストです。

mod decl_parser;
mod parser_impl;
mod type_parser;
mod value_parser;

// 公開API
pub use parser_impl::Parser;

use crate::ast::SourceUnit;
use crate::error::{IdlError, ParserError};
use crate::lexer::Lexer;

pub type ParseError = ParserError;
pub type ParseResult<T> = Result<T, ParseError>;

/// ソースコードを字句解析・構文解析してソース単位を得る
pub fn parse_source(file: &str, source: &str) -> Result<SourceUnit, IdlError> {
    let (tokens, index) = Lexer::new(file, source).tokenize()?;
    let mut parser = Parser::new(tokens, index);
    Ok(parser.parse()?)
}
