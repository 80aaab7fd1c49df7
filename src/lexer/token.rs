//! トークン定義

use logos::Logos;
use std::fmt;

/// IDLのトークン型
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")] // 空白文字と改行をスキップ
#[logos(skip r"//[^\n]*")] // `/*` はグロブインポートと衝突するため行コメントのみ
pub enum Token {
    // キーワード
    #[token("namespace")]
    Namespace,
    #[token("import")]
    Import,
    #[token("except")]
    Except,
    #[token("alias")]
    Alias,
    #[token("struct")]
    Struct,
    #[token("enum")]
    Enum,
    #[token("schema")]
    Schema,
    #[token("prototype")]
    Prototype,
    #[token("service")]
    Service,
    #[token("constructor")]
    Constructor,
    #[token("throws")]
    Throws,
    #[token("secured")]
    Secured,
    #[token("by")]
    By,
    #[token("with")]
    With,

    // リテラル
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // 識別子（キーワードの後に来る必要がある）
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned(), priority = 1)]
    Identifier(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i128>().ok())]
    Integer(i128),

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        super::literal_parser::unescape_string(&s[1..s.len()-1])
    })]
    String(String),

    /// 制約の正規表現 `~/pattern/`
    #[regex(r"~/([^/\\\n]|\\.)*/", |lex| super::literal_parser::regex_body(lex.slice()))]
    Pattern(String),

    // 記号
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("<")]
    Lt,
    #[token("=")]
    Assign,
    #[token("->")]
    Arrow,
    #[token("@")]
    At,
    #[token("/")]
    Slash,

    // デリミタ
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Namespace => write!(f, "namespace"),
            Token::Import => write!(f, "import"),
            Token::Except => write!(f, "except"),
            Token::Alias => write!(f, "alias"),
            Token::Struct => write!(f, "struct"),
            Token::Enum => write!(f, "enum"),
            Token::Schema => write!(f, "schema"),
            Token::Prototype => write!(f, "prototype"),
            Token::Service => write!(f, "service"),
            Token::Constructor => write!(f, "constructor"),
            Token::Throws => write!(f, "throws"),
            Token::Secured => write!(f, "secured"),
            Token::By => write!(f, "by"),
            Token::With => write!(f, "with"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::Integer(n) => write!(f, "{}", n),
            Token::Float(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Pattern(s) => write!(f, "~/{}/", s),
            Token::Tilde => write!(f, "~"),
            Token::Question => write!(f, "?"),
            Token::Star => write!(f, "*"),
            Token::Plus => write!(f, "+"),
            Token::Lt => write!(f, "<"),
            Token::Assign => write!(f, "="),
            Token::Arrow => write!(f, "->"),
            Token::At => write!(f, "@"),
            Token::Slash => write!(f, "/"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
        }
    }
}
