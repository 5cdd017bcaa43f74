//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、フロントエンド全体で使用される統一的なエラー型を
//! 提供します。字句・構文エラーは回復可能でレポートとして蓄積され、
//! 再帰深度の超過のみが致命的エラーとして解析全体を中断します。

use crate::ast::Span;
use thiserror::Error;

/// フロントエンドの統一エラー型
#[derive(Error, Debug, Clone)]
pub enum HlslError {
    /// レキサーエラー
    #[error("字句解析エラー")]
    Lexer(#[from] LexerError),

    /// パーサーエラー
    #[error("構文解析エラー")]
    Parser(#[from] ParserError),

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// レキサーエラーの詳細
#[derive(Error, Debug, Clone)]
pub enum LexerError {
    #[error("認識できないトークン: '{token}'")]
    UnrecognizedToken { token: String, span: Span },

    #[error("未終了の文字列リテラル")]
    UnterminatedString { span: Span },

    #[error("未終了のブロックコメント")]
    UnterminatedBlockComment { span: Span },

    #[error("不正な数値リテラル: '{literal}'")]
    InvalidNumber { literal: String, span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnrecognizedToken { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::UnterminatedBlockComment { span }
            | LexerError::InvalidNumber { span, .. } => *span,
        }
    }
}

/// パーサーエラーの詳細
#[derive(Error, Debug, Clone)]
pub enum ParserError {
    #[error("予期しないトークン: {expected}を期待しましたが、{found}が見つかりました")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("予期しない入力の終了: {expected}を期待していました")]
    UnexpectedEof { expected: String, span: Span },

    #[error("構文エラー: {message}")]
    SyntaxError { message: String, span: Span },

    #[error("修飾子 '{modifier}' は{context}では使用できません")]
    ModifierPlacement {
        modifier: String,
        context: String,
        span: Span,
    },

    #[error("再帰深度の上限({limit})を超えました")]
    RecursionLimit { limit: usize, span: Span },
}

impl ParserError {
    pub fn span(&self) -> Span {
        match self {
            ParserError::UnexpectedToken { span, .. }
            | ParserError::UnexpectedEof { span, .. }
            | ParserError::SyntaxError { span, .. }
            | ParserError::ModifierPlacement { span, .. }
            | ParserError::RecursionLimit { span, .. } => *span,
        }
    }

    /// 回復不能なエラーかどうか
    ///
    /// 再帰深度の超過のみが該当し、呼び出し側は即座に解析を打ち切る。
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParserError::RecursionLimit { .. })
    }
}

/// Result型のエイリアス
pub type HlslResult<T> = Result<T, HlslError>;

impl From<std::io::Error> for HlslError {
    fn from(e: std::io::Error) -> Self {
        HlslError::Io(e.to_string())
    }
}

/// エラー変換用のヘルパートレイト
pub trait IntoHlslError {
    fn into_hlsl_error(self) -> HlslError;
}

impl IntoHlslError for std::io::Error {
    fn into_hlsl_error(self) -> HlslError {
        HlslError::Io(self.to_string())
    }
}

impl IntoHlslError for anyhow::Error {
    fn into_hlsl_error(self) -> HlslError {
        HlslError::Other(self.to_string())
    }
}

/// エラーコンテキスト追加用のヘルパートレイト
pub trait WithContext<T> {
    fn with_context<F>(self, f: F) -> HlslResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> WithContext<T> for Result<T, E>
where
    E: IntoHlslError,
{
    fn with_context<F>(self, f: F) -> HlslResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let base_error = e.into_hlsl_error();
            match base_error {
                HlslError::Other(msg) => HlslError::Other(format!("{}: {}", f(), msg)),
                _ => base_error,
            }
        })
    }
}
