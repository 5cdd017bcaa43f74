//! メインパーサー構造とユーティリティ

use indexmap::IndexSet;

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::{Token, TokenWithPosition};
use crate::log::{Log, Report};
use crate::options::Options;
use crate::source::SourceLocation;

use super::{ParseError, ParseResult};

/// HLSLパーサー
///
/// トークン列上のカーソルと、解析中に宣言された型名のレジストリ以外に
/// 呼び出しをまたぐ状態を持たない。レポートは構築時に渡された外部所有の
/// ログシンクへ送信される。
pub struct Parser<'a> {
    pub(super) tokens: Vec<TokenWithPosition>,
    pub(super) current: usize,
    pub(super) options: Options,
    pub(super) declared_types: IndexSet<String>,
    pub(super) depth: usize,
    pub(super) error_count: usize,
    pub(super) context_stack: Vec<String>,
    pub(super) log: &'a mut dyn Log,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<TokenWithPosition>, options: Options, log: &'a mut dyn Log) -> Self {
        Self {
            tokens,
            current: 0,
            options,
            declared_types: IndexSet::new(),
            depth: 0,
            error_count: 0,
            context_stack: Vec::new(),
            log,
        }
    }

    /// 完全なソースユニットを解析
    ///
    /// 回復可能なエラーはシンクへ送信したうえで解析を続行し、部分的な
    /// 構文木を`Ok`で返す。呼び出し側は`error_count`（またはシンク）を
    /// 確認して後段のパスに渡すかどうかを判断する。`Err`を返すのは
    /// 再帰深度の上限を超えた場合のみ。
    pub fn parse(&mut self) -> ParseResult<Program> {
        let mut global_decls = Vec::new();

        while !self.is_at_end() {
            // グローバルスコープのコメントは構文木に残さない
            if matches!(self.current_token(), Some(Token::Comment(_))) {
                self.advance();
                continue;
            }

            let start_pos = self.current;
            match self.parse_global_decl() {
                Ok(decl) => global_decls.push(decl),
                Err(err) => {
                    self.submit_error(&err);
                    if err.is_fatal() {
                        return Err(err);
                    }
                    self.synchronize_global();
                    if self.current == start_pos {
                        // 前進を保証する
                        self.advance();
                    }
                }
            }
        }

        let span = match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => Span::dummy(),
        };

        Ok(Program { global_decls, span })
    }

    /// 単一の式を解析（テスト・ツール用）
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_expression_internal()
    }

    /// 単一の文を解析（テスト・ツール用）
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        self.parse_statement_internal()
    }

    /// 回復済みも含めて送信したエラーレポートの数
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    // ==================== ユーティリティメソッド ====================

    /// 現在のトークンを取得
    pub(super) fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|t| &t.token)
    }

    /// 特定のオフセット先のトークンを取得
    pub(super) fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset).map(|t| &t.token)
    }

    /// 現在のスパンを取得
    pub(super) fn current_span(&self) -> logos::Span {
        self.tokens
            .get(self.current)
            .map(|t| t.span.clone())
            .unwrap_or_else(|| {
                self.tokens
                    .last()
                    .map(|t| t.span.end..t.span.end)
                    .unwrap_or(0..0)
            })
    }

    /// 開始位置から現在位置までのスパンを作成
    pub(super) fn span_from(&self, start: usize) -> Span {
        let end = if self.current > 0 {
            self.tokens
                .get(self.current - 1)
                .map(|t| t.span.end)
                .unwrap_or(start)
        } else {
            self.current_span().end
        };
        Span::new(start, end)
    }

    /// 次のトークンに進む
    pub(super) fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// 終端に到達したかチェック
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// 特定のトークンをチェック（進まない）
    pub(super) fn check(&self, token_type: &Token) -> bool {
        if let Some(token) = self.current_token() {
            std::mem::discriminant(token) == std::mem::discriminant(token_type)
        } else {
            false
        }
    }

    /// 特定のトークンにマッチしたら進む
    ///
    /// マッチしない場合はカーソルを動かさない（省略可能な構文と
    /// 予測的分岐に使う。エラーにはならない）。
    pub(super) fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 複数のトークンタイプのいずれかにマッチしたら進む
    pub(super) fn match_tokens(&mut self, token_types: &[Token]) -> Option<Token> {
        for token_type in token_types {
            if self.check(token_type) {
                let token = self.current_token()?.clone();
                self.advance();
                return Some(token);
            }
        }
        None
    }

    /// 特定のトークンを期待
    pub(super) fn expect(&mut self, token_type: Token) -> ParseResult<()> {
        if self.check(&token_type) {
            self.advance();
            Ok(())
        } else {
            match self.current_token() {
                Some(found) => Err(ParserError::UnexpectedToken {
                    expected: format!("'{}'", token_type),
                    found: format!("'{}'", found),
                    span: self.current_span().into(),
                }),
                None => Err(ParserError::UnexpectedEof {
                    expected: format!("'{}'", token_type),
                    span: self.current_span().into(),
                }),
            }
        }
    }

    /// 識別子を期待
    pub(super) fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.current_token() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("Expected identifier".to_string())),
        }
    }

    /// エラーを作成
    pub(super) fn error(&self, message: String) -> ParseError {
        ParserError::SyntaxError {
            message,
            span: self.current_span().into(),
        }
    }

    /// 予期しないトークンエラーを作成
    pub(super) fn unexpected_token(&self) -> ParseError {
        match self.current_token() {
            Some(token) => self.error(format!("Unexpected token: '{}'", token)),
            None => ParserError::UnexpectedEof {
                expected: "token".to_string(),
                span: self.current_span().into(),
            },
        }
    }

    // ==================== 分類述語 ====================

    /// 現在のトークンが組み込みデータ型かどうか
    pub(super) fn is_data_type(&self) -> bool {
        matches!(
            self.current_token(),
            Some(Token::DataType(_) | Token::TextureType(_) | Token::SamplerType(_))
        )
    }

    /// 現在のトークンが型名の開始かどうか
    ///
    /// 組み込み型に加えて、ここまでの解析で宣言された構造体名の
    /// レジストリを参照する。レジストリなしではユーザー定義型で始まる
    /// 宣言と式文を区別できない。
    pub(super) fn is_type_name(&self) -> bool {
        match self.current_token() {
            Some(Token::Struct) => true,
            Some(Token::Identifier(name)) => self.declared_types.contains(name),
            _ => self.is_data_type(),
        }
    }

    /// 現在のトークンが変数宣言の開始かどうか
    pub(super) fn is_var_decl_start(&self) -> bool {
        match self.current_token() {
            Some(Token::Storage(_) | Token::TypeMod(_)) => true,
            _ => self.is_type_name(),
        }
    }

    /// 現在のトークンがリテラルかどうか
    pub(super) fn is_literal(&self) -> bool {
        matches!(
            self.current_token(),
            Some(
                Token::IntLiteral(_)
                    | Token::FloatLiteral(_)
                    | Token::StringLiteral(_)
                    | Token::True
                    | Token::False
            )
        )
    }

    /// 現在のトークンがプライマリ式の開始かどうか
    pub(super) fn is_primary_expr(&self) -> bool {
        self.is_literal()
            || matches!(
                self.current_token(),
                Some(
                    Token::Identifier(_)
                        | Token::DataType(_)
                        | Token::LeftParen
                        | Token::LeftBrace
                )
            )
    }

    /// 型名レジストリに登録
    pub(super) fn register_type_name(&mut self, name: &str) {
        self.declared_types.insert(name.to_string());
    }

    // ==================== 再帰深度の制御 ====================

    /// 深度カウンタを増やして`f`を実行する
    ///
    /// 上限を超えた場合は致命的エラーを返し、呼び出し側はそれ以上の
    /// 回復を行わずに解析全体を打ち切る。ネイティブスタックの枯渇を
    /// 防ぐため、文・式の入口は必ずこれを経由する。
    pub(super) fn with_depth<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.options.max_recursion_depth {
            return Err(ParserError::RecursionLimit {
                limit: self.options.max_recursion_depth,
                span: self.current_span().into(),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ==================== レポート送信 ====================

    /// エラーレポートを構築してシンクへ送信
    pub(super) fn submit_error(&mut self, err: &ParseError) {
        let span = err.span();
        let mut report = Report::error(err.to_string(), self.location_of(span), span);
        for context in self.context_stack.iter().rev() {
            report = report.with_sub_report(Report::info(
                format!("{}の中で", context),
                self.location_of(span),
                span,
            ));
        }
        self.error_count += 1;
        self.log.submit_report(report);
    }

    /// 警告レポートを送信（`warnings`オプション有効時のみ）
    pub(super) fn submit_warning(&mut self, message: String, span: Span) {
        if self.options.warnings {
            let report = Report::warning(message, self.location_of(span), span);
            self.log.submit_report(report);
        }
    }

    /// スパンに対応するソース位置を求める
    fn location_of(&self, span: Span) -> SourceLocation {
        let idx = self
            .tokens
            .partition_point(|t| t.span.start < span.start);
        self.tokens
            .get(idx)
            .or_else(|| self.tokens.last())
            .map(|t| t.location)
            .unwrap_or_default()
    }

    pub(super) fn push_context(&mut self, context: String) {
        self.context_stack.push(context);
    }

    pub(super) fn pop_context(&mut self) {
        self.context_stack.pop();
    }

    // ==================== エラー回復 ====================

    /// 次のグローバル宣言の開始まで読み飛ばす
    pub(super) fn synchronize_global(&mut self) {
        while !self.is_at_end() {
            match self.current_token() {
                Some(Token::Semicolon) => {
                    self.advance();
                    return;
                }
                Some(Token::RightBrace) => {
                    self.advance();
                    return;
                }
                Some(
                    Token::Struct
                    | Token::CBuffer
                    | Token::TBuffer
                    | Token::TextureType(_)
                    | Token::SamplerType(_)
                    | Token::Directive(_)
                    | Token::LeftBracket
                    | Token::Void
                    | Token::DataType(_)
                    | Token::Storage(_)
                    | Token::TypeMod(_),
                ) => return,
                _ => self.advance(),
            }
        }
    }

    /// 次の文の境界まで読み飛ばす
    ///
    /// 文の終端（`;`）を消費するか、ブロックの閉じ・次の文の開始と
    /// 認識できるトークンの手前で止まる。
    pub(super) fn synchronize_statement(&mut self) {
        while !self.is_at_end() {
            match self.current_token() {
                Some(Token::Semicolon) => {
                    self.advance();
                    return;
                }
                Some(Token::RightBrace) => return,
                Some(
                    Token::If
                    | Token::For
                    | Token::While
                    | Token::Do
                    | Token::Switch
                    | Token::Return
                    | Token::Break
                    | Token::Continue
                    | Token::Discard
                    | Token::LeftBrace,
                ) => return,
                Some(Token::Storage(_) | Token::TypeMod(_) | Token::DataType(_)) => return,
                _ => self.advance(),
            }
        }
    }
}
