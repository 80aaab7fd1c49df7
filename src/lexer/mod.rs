//! Lexical analysis module for IDL source files.
//!
//! This module is responsible for tokenizing IDL source code into a stream of
//! tokens: keywords, identifiers, literals, restriction patterns and the
//! punctuation used by namespaces, imports and type quantifiers.

mod lexer;
mod literal_parser;
mod token;

pub use lexer::{format_tokens, Lexer, LineIndex, TokenWithPosition};
pub use literal_parser::unescape_string;
pub use token::Token;
