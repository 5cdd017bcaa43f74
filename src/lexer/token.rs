//! トークン定義
//!
//! キーワード・データ型・修飾子の分類は固定のトークンテーブル
//! （logosのトークン／正規表現規則）で行う。`float4x4`のような
//! ベクトル・行列型はコールバックで構造化された`DataType`値に分類する。

use logos::{Lexer, Logos};
use std::fmt;

use crate::ast::{DataType, ScalarType, StorageModifier, TypeModifier};

/// トークンの大分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Literal,
    Operator,
    Punctuation,
    Directive,
    Comment,
}

/// HLSLのトークン型
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // キーワード
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("discard")]
    Discard,
    #[token("return")]
    Return,
    #[token("struct")]
    Struct,
    #[token("void")]
    Void,
    #[token("cbuffer")]
    CBuffer,
    #[token("tbuffer")]
    TBuffer,
    #[token("register")]
    Register,
    #[token("packoffset")]
    PackOffset,

    // 真偽値リテラル
    #[token("true")]
    True,
    #[token("false")]
    False,

    // ストレージクラスおよび補間修飾子
    #[token("extern", |_| StorageModifier::Extern)]
    #[token("static", |_| StorageModifier::Static)]
    #[token("uniform", |_| StorageModifier::Uniform)]
    #[token("volatile", |_| StorageModifier::Volatile)]
    #[token("in", |_| StorageModifier::In)]
    #[token("out", |_| StorageModifier::Out)]
    #[token("inout", |_| StorageModifier::InOut)]
    #[token("linear", |_| StorageModifier::Linear)]
    #[token("centroid", |_| StorageModifier::Centroid)]
    #[token("nointerpolation", |_| StorageModifier::NoInterpolation)]
    #[token("noperspective", |_| StorageModifier::NoPerspective)]
    #[token("sample", |_| StorageModifier::Sample)]
    Storage(StorageModifier),

    // 型修飾子
    #[token("const", |_| TypeModifier::Const)]
    #[token("row_major", |_| TypeModifier::RowMajor)]
    #[token("column_major", |_| TypeModifier::ColumnMajor)]
    TypeMod(TypeModifier),

    // 組み込みデータ型（スカラー、ベクトル、行列）
    #[regex(
        r"(bool|int|uint|dword|half|float|double)([1-4](x[1-4])?)?",
        parse_data_type,
        priority = 5
    )]
    DataType(DataType),

    // テクスチャ型
    #[regex(
        r"texture|Texture1DArray|Texture1D|Texture2DMSArray|Texture2DMS|Texture2DArray|Texture2D|Texture3D|TextureCubeArray|TextureCube",
        |lex| lex.slice().to_owned(),
        priority = 5
    )]
    TextureType(String),

    // サンプラー型
    #[regex(
        r"sampler1D|sampler2D|sampler3D|samplerCUBE|sampler_state|sampler|SamplerState|SamplerComparisonState",
        |lex| lex.slice().to_owned(),
        priority = 5
    )]
    SamplerType(String),

    // 識別子（キーワードの後に来る必要がある）
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned(), priority = 1)]
    Identifier(String),

    // 数値リテラル
    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]?", |lex| super::literal_parser::parse_int_literal(lex.slice()))]
    #[regex(r"[0-9]+[uUlL]?", |lex| super::literal_parser::parse_int_literal(lex.slice()))]
    IntLiteral(i64),

    #[regex(
        r"([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?[fFhH]?",
        |lex| super::literal_parser::parse_float_literal(lex.slice())
    )]
    #[regex(
        r"[0-9]+[eE][+-]?[0-9]+[fFhH]?",
        |lex| super::literal_parser::parse_float_literal(lex.slice())
    )]
    FloatLiteral(f64),

    // 文字列リテラル
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        super::literal_parser::unescape_string(&s[1..s.len()-1])
    })]
    StringLiteral(String),

    // プリプロセッサ指令（1行まるごと）
    #[regex(r"#[^\n]*", |lex| lex.slice().trim_end().to_owned())]
    Directive(String),

    // コメント
    #[regex(r"//[^\n]*", |lex| lex.slice()[2..].trim().to_owned())]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", block_comment_text)]
    Comment(String),

    // 演算子
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    CaretAssign,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Or,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("?")]
    Question,

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

/// データ型の字句を構造化された`DataType`に分類
fn parse_data_type(lex: &mut Lexer<Token>) -> Option<DataType> {
    data_type_from_str(lex.slice())
}

fn data_type_from_str(s: &str) -> Option<DataType> {
    const SCALARS: [(&str, ScalarType); 7] = [
        ("bool", ScalarType::Bool),
        ("uint", ScalarType::UInt),
        ("int", ScalarType::Int),
        ("dword", ScalarType::DWord),
        ("half", ScalarType::Half),
        ("float", ScalarType::Float),
        ("double", ScalarType::Double),
    ];

    for (name, scalar) in SCALARS {
        if let Some(rest) = s.strip_prefix(name) {
            let bytes = rest.as_bytes();
            return match bytes {
                [] => Some(DataType::Scalar(scalar)),
                [n] if (b'1'..=b'4').contains(n) => Some(DataType::Vector(scalar, n - b'0')),
                [r, b'x', c] if (b'1'..=b'4').contains(r) && (b'1'..=b'4').contains(c) => {
                    Some(DataType::Matrix(scalar, r - b'0', c - b'0'))
                }
                _ => None,
            };
        }
    }
    None
}

/// ブロックコメントの内部テキストを取り出す
fn block_comment_text(lex: &mut Lexer<Token>) -> String {
    let s = lex.slice();
    s[2..s.len() - 2].trim().to_owned()
}

impl Token {
    /// トークンの大分類を返す
    pub fn category(&self) -> TokenCategory {
        match self {
            Token::If
            | Token::Else
            | Token::For
            | Token::While
            | Token::Do
            | Token::Switch
            | Token::Case
            | Token::Default
            | Token::Break
            | Token::Continue
            | Token::Discard
            | Token::Return
            | Token::Struct
            | Token::Void
            | Token::CBuffer
            | Token::TBuffer
            | Token::Register
            | Token::PackOffset
            | Token::Storage(_)
            | Token::TypeMod(_)
            | Token::DataType(_)
            | Token::TextureType(_)
            | Token::SamplerType(_) => TokenCategory::Keyword,
            Token::Identifier(_) => TokenCategory::Identifier,
            Token::True
            | Token::False
            | Token::IntLiteral(_)
            | Token::FloatLiteral(_)
            | Token::StringLiteral(_) => TokenCategory::Literal,
            Token::Directive(_) => TokenCategory::Directive,
            Token::Comment(_) => TokenCategory::Comment,
            Token::LeftParen
            | Token::RightParen
            | Token::LeftBracket
            | Token::RightBracket
            | Token::LeftBrace
            | Token::RightBrace
            | Token::Comma
            | Token::Semicolon
            | Token::Colon => TokenCategory::Punctuation,
            _ => TokenCategory::Operator,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::For => write!(f, "for"),
            Token::While => write!(f, "while"),
            Token::Do => write!(f, "do"),
            Token::Switch => write!(f, "switch"),
            Token::Case => write!(f, "case"),
            Token::Default => write!(f, "default"),
            Token::Break => write!(f, "break"),
            Token::Continue => write!(f, "continue"),
            Token::Discard => write!(f, "discard"),
            Token::Return => write!(f, "return"),
            Token::Struct => write!(f, "struct"),
            Token::Void => write!(f, "void"),
            Token::CBuffer => write!(f, "cbuffer"),
            Token::TBuffer => write!(f, "tbuffer"),
            Token::Register => write!(f, "register"),
            Token::PackOffset => write!(f, "packoffset"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Storage(m) => write!(f, "{}", m),
            Token::TypeMod(m) => write!(f, "{}", m),
            Token::DataType(ty) => write!(f, "{}", ty),
            Token::TextureType(s) => write!(f, "{}", s),
            Token::SamplerType(s) => write!(f, "{}", s),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::IntLiteral(n) => write!(f, "{}", n),
            Token::FloatLiteral(n) => write!(f, "{}", n),
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::Directive(s) => write!(f, "{}", s),
            Token::Comment(_) => write!(f, "comment"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Assign => write!(f, "="),
            Token::PlusAssign => write!(f, "+="),
            Token::MinusAssign => write!(f, "-="),
            Token::StarAssign => write!(f, "*="),
            Token::SlashAssign => write!(f, "/="),
            Token::PercentAssign => write!(f, "%="),
            Token::ShlAssign => write!(f, "<<="),
            Token::ShrAssign => write!(f, ">>="),
            Token::AmpAssign => write!(f, "&="),
            Token::OrAssign => write!(f, "|="),
            Token::CaretAssign => write!(f, "^="),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Bang => write!(f, "!"),
            Token::Ampersand => write!(f, "&"),
            Token::Or => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::Tilde => write!(f, "~"),
            Token::Shl => write!(f, "<<"),
            Token::Shr => write!(f, ">>"),
            Token::Inc => write!(f, "++"),
            Token::Dec => write!(f, "--"),
            Token::Question => write!(f, "?"),
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
