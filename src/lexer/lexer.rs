//! レキサーのメイン実装
//!
//! `next_token`は次のトークンを消費して返し、`peek_token`は消費せずに
//! 現在のトークンを返す（常に1トークンの先読みが可能）。不正な文字列に
//! 遭遇した場合はエラーを記録し、次の行頭から走査を再開する。1文字の
//! 不正で入力全体を放棄することはない。

use logos::{Lexer as LogosLexer, Logos, Span};

use super::token::Token;
use crate::error::LexerError;
use crate::options::Options;
use crate::source::{LineIndex, SourceLocation};

/// 位置情報付きトークン
#[derive(Debug, Clone)]
pub struct TokenWithPosition {
    pub token: Token,
    pub span: Span,
    pub location: SourceLocation,
}

/// HLSLのレキサー
pub struct Lexer<'a> {
    inner: LogosLexer<'a, Token>,
    source: &'a str,
    line_index: LineIndex,
    preserve_comments: bool,
    peeked: Option<Option<TokenWithPosition>>,
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    /// 新しいレキサーを作成（コメントはトークン列から除去される）
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: Token::lexer(input),
            source: input,
            line_index: LineIndex::new(input),
            preserve_comments: false,
            peeked: None,
            errors: Vec::new(),
        }
    }

    /// オプション付きでレキサーを作成
    pub fn with_options(input: &'a str, options: &Options) -> Self {
        let mut lexer = Self::new(input);
        lexer.preserve_comments = options.preserve_comments;
        lexer
    }

    /// 次のトークンを取得して消費する
    pub fn next_token(&mut self) -> Option<TokenWithPosition> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.scan_token(),
        }
    }

    /// 現在のトークンを消費せずに参照する
    pub fn peek_token(&mut self) -> Option<&TokenWithPosition> {
        if self.peeked.is_none() {
            let token = self.scan_token();
            self.peeked = Some(token);
        }
        self.peeked.as_ref().and_then(|t| t.as_ref())
    }

    /// すべてのトークンと字句エラーを収集
    pub fn collect_tokens(mut self) -> (Vec<TokenWithPosition>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        (tokens, self.errors)
    }

    fn scan_token(&mut self) -> Option<TokenWithPosition> {
        loop {
            let result = self.inner.next()?;
            let span = self.inner.span();

            match result {
                Ok(Token::Comment(_)) if !self.preserve_comments => continue,
                Ok(token) => {
                    let location = self.line_index.location(span.start);
                    return Some(TokenWithPosition {
                        token,
                        span,
                        location,
                    });
                }
                Err(_) => {
                    // エラーを記録し、次の行頭まで読み飛ばして続行する
                    self.record_error(span);
                    self.skip_to_next_line();
                }
            }
        }
    }

    fn record_error(&mut self, span: Span) {
        let rest = &self.source[span.start..];
        let error = if rest.starts_with('"') {
            LexerError::UnterminatedString { span: span.into() }
        } else if rest.starts_with("/*") {
            LexerError::UnterminatedBlockComment { span: span.into() }
        } else {
            LexerError::UnrecognizedToken {
                token: self.source[span.clone()].to_string(),
                span: span.into(),
            }
        };
        self.errors.push(error);
    }

    fn skip_to_next_line(&mut self) {
        let remainder = self.inner.remainder();
        match remainder.find('\n') {
            Some(pos) => self.inner.bump(pos + 1),
            None => self.inner.bump(remainder.len()),
        }
    }

    /// エラー位置の行・桁を求めるための索引
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }
}

/// ソースコードをトークン化
pub fn tokenize(input: &str) -> (Vec<TokenWithPosition>, Vec<LexerError>) {
    Lexer::new(input).collect_tokens()
}
