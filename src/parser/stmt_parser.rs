//! 文の解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser<'_> {
    /// 文を解析（内部実装）
    pub(super) fn parse_statement_internal(&mut self) -> ParseResult<Statement> {
        self.with_depth(|p| p.parse_statement_dispatch())
    }

    /// 文の種別を確定して解析する
    ///
    /// 先頭の属性リストを最初に消費し、ループ・条件・switch文の
    /// コンストラクタへ引き渡す。属性は直後の文にのみ付与される。
    fn parse_statement_dispatch(&mut self) -> ParseResult<Statement> {
        let attribs = self.parse_attribute_list()?;

        match self.current_token() {
            Some(Token::For) => Ok(Statement::For(self.parse_for_loop_statement(attribs)?)),
            Some(Token::While) => Ok(Statement::While(self.parse_while_loop_statement(attribs)?)),
            Some(Token::Do) => Ok(Statement::DoWhile(
                self.parse_do_while_loop_statement(attribs)?,
            )),
            Some(Token::If) => Ok(Statement::If(self.parse_if_statement(attribs)?)),
            Some(Token::Switch) => Ok(Statement::Switch(self.parse_switch_statement(attribs)?)),
            _ => {
                if !attribs.is_empty() {
                    let span = attribs[0].span;
                    self.submit_warning(
                        "属性はループ・条件・switch文にのみ付与できるため無視されます".to_string(),
                        span,
                    );
                }
                self.parse_plain_statement()
            }
        }
    }

    /// 属性を取らない文を解析
    fn parse_plain_statement(&mut self) -> ParseResult<Statement> {
        match self.current_token() {
            Some(Token::Comment(_)) => self.parse_comment_statement(),
            Some(Token::Semicolon) => {
                let span: Span = self.current_span().into();
                self.advance();
                Ok(Statement::Null(NullStatement { span }))
            }
            Some(Token::Directive(_)) => self.parse_directive_statement(),
            Some(Token::LeftBrace) => Ok(Statement::CodeBlock(self.parse_code_block()?)),
            Some(Token::Break | Token::Continue | Token::Discard) => {
                self.parse_ctrl_transfer_statement()
            }
            Some(Token::Return) => self.parse_return_statement(),
            _ if self.is_var_decl_start() => {
                Ok(Statement::VarDecl(self.parse_var_decl_statement()?))
            }
            _ if self.is_primary_expr()
                || matches!(
                    self.current_token(),
                    Some(
                        Token::Bang
                            | Token::Tilde
                            | Token::Minus
                            | Token::Plus
                            | Token::Inc
                            | Token::Dec
                    )
                ) =>
            {
                self.parse_expr_statement()
            }
            _ => Err(self.unexpected_token()),
        }
    }

    /// コメント文を解析（`preserve_comments`有効時のみ現れる）
    fn parse_comment_statement(&mut self) -> ParseResult<Statement> {
        let span: Span = self.current_span().into();
        let text = match self.current_token() {
            Some(Token::Comment(text)) => text.clone(),
            _ => return Err(self.unexpected_token()),
        };
        self.advance();
        Ok(Statement::Comment(CommentStatement { text, span }))
    }

    /// ブロック内のプリプロセッサ指令を解析
    fn parse_directive_statement(&mut self) -> ParseResult<Statement> {
        let span: Span = self.current_span().into();
        let line = match self.current_token() {
            Some(Token::Directive(line)) => line.clone(),
            _ => return Err(self.unexpected_token()),
        };
        self.advance();
        Ok(Statement::Directive(DirectiveStatement { line, span }))
    }

    /// コードブロックを解析
    ///
    /// ブロックは文単位の回復境界でもある。文の解析に失敗した場合は
    /// レポートを送信して次の文の境界まで読み飛ばし、残りの文の解析を
    /// 続行する。致命的エラーのみ即座に伝播する。
    pub(super) fn parse_code_block(&mut self) -> ParseResult<CodeBlock> {
        let start = self.current_span().start;
        self.expect(Token::LeftBrace)?;

        let mut statements = Vec::new();

        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            let start_pos = self.current;
            match self.parse_statement_internal() {
                Ok(statement) => statements.push(statement),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    self.submit_error(&err);
                    self.synchronize_statement();
                    if self.current == start_pos {
                        self.advance();
                    }
                }
            }
        }

        self.expect(Token::RightBrace)?;

        Ok(CodeBlock {
            statements,
            span: self.span_from(start),
        })
    }

    /// for文を解析
    fn parse_for_loop_statement(&mut self, attribs: Vec<Attribute>) -> ParseResult<ForLoopStatement> {
        let start = self.current_span().start;
        self.expect(Token::For)?;
        self.expect(Token::LeftParen)?;

        // 初期化部（変数宣言、式文、または空）
        let init = if self.match_token(&Token::Semicolon) {
            None
        } else if self.is_var_decl_start() {
            Some(Statement::VarDecl(self.parse_var_decl_statement()?))
        } else {
            let expr_start = self.current_span().start;
            let expr = self.parse_list_expression()?;
            let span = self.span_from(expr_start);
            self.expect(Token::Semicolon)?;
            Some(Statement::Expr(ExprStatement { expr, span }))
        };

        // 条件部
        let condition = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression_internal()?)
        };
        self.expect(Token::Semicolon)?;

        // 更新部（カンマ区切りの式列を許す）
        let update = if self.check(&Token::RightParen) {
            None
        } else {
            Some(self.parse_list_expression()?)
        };
        self.expect(Token::RightParen)?;

        let body = self.parse_statement_internal()?;

        Ok(ForLoopStatement {
            attribs,
            init: init.map(Box::new),
            condition,
            update,
            body: Box::new(body),
            span: self.span_from(start),
        })
    }

    /// while文を解析
    fn parse_while_loop_statement(
        &mut self,
        attribs: Vec<Attribute>,
    ) -> ParseResult<WhileLoopStatement> {
        let start = self.current_span().start;
        self.expect(Token::While)?;
        self.expect(Token::LeftParen)?;
        let condition = self.parse_expression_internal()?;
        self.expect(Token::RightParen)?;

        let body = self.parse_statement_internal()?;

        Ok(WhileLoopStatement {
            attribs,
            condition,
            body: Box::new(body),
            span: self.span_from(start),
        })
    }

    /// do-while文を解析
    fn parse_do_while_loop_statement(
        &mut self,
        attribs: Vec<Attribute>,
    ) -> ParseResult<DoWhileLoopStatement> {
        let start = self.current_span().start;
        self.expect(Token::Do)?;

        let body = self.parse_statement_internal()?;

        self.expect(Token::While)?;
        self.expect(Token::LeftParen)?;
        let condition = self.parse_expression_internal()?;
        self.expect(Token::RightParen)?;
        self.expect(Token::Semicolon)?;

        Ok(DoWhileLoopStatement {
            attribs,
            body: Box::new(body),
            condition,
            span: self.span_from(start),
        })
    }

    /// if文を解析
    ///
    /// elseブランチは独立したノードとして解析され、このifに連結される。
    /// `else if`の連鎖はelseの本体が再びif文になることで表現される。
    fn parse_if_statement(&mut self, attribs: Vec<Attribute>) -> ParseResult<IfStatement> {
        let start = self.current_span().start;
        self.expect(Token::If)?;
        self.expect(Token::LeftParen)?;
        let condition = self.parse_expression_internal()?;
        self.expect(Token::RightParen)?;

        let body = self.parse_statement_internal()?;

        let else_branch = if self.check(&Token::Else) {
            Some(self.parse_else_statement()?)
        } else {
            None
        };

        Ok(IfStatement {
            attribs,
            condition,
            body: Box::new(body),
            else_branch,
            span: self.span_from(start),
        })
    }

    /// else文を解析
    fn parse_else_statement(&mut self) -> ParseResult<ElseStatement> {
        let start = self.current_span().start;
        self.expect(Token::Else)?;
        let body = self.parse_statement_internal()?;

        Ok(ElseStatement {
            body: Box::new(body),
            span: self.span_from(start),
        })
    }

    /// switch文を解析
    fn parse_switch_statement(&mut self, attribs: Vec<Attribute>) -> ParseResult<SwitchStatement> {
        let start = self.current_span().start;
        self.expect(Token::Switch)?;
        self.expect(Token::LeftParen)?;
        let selector = self.parse_expression_internal()?;
        self.expect(Token::RightParen)?;
        self.expect(Token::LeftBrace)?;

        let mut cases = Vec::new();
        while matches!(self.current_token(), Some(Token::Case | Token::Default)) {
            cases.push(self.parse_switch_case()?);
        }

        if !self.check(&Token::RightBrace) {
            return Err(self.error("Expected 'case' or 'default' in switch body".to_string()));
        }
        self.expect(Token::RightBrace)?;

        Ok(SwitchStatement {
            attribs,
            selector,
            cases,
            span: self.span_from(start),
        })
    }

    /// switchのケースを解析。各ケースが自身の文リストを所有する
    fn parse_switch_case(&mut self) -> ParseResult<SwitchCase> {
        let start = self.current_span().start;

        let expr = if self.match_token(&Token::Case) {
            let expr = self.parse_expression_internal()?;
            Some(expr)
        } else {
            self.expect(Token::Default)?;
            None
        };
        self.expect(Token::Colon)?;

        let mut statements = Vec::new();
        while !matches!(
            self.current_token(),
            Some(Token::Case | Token::Default | Token::RightBrace) | None
        ) {
            statements.push(self.parse_statement_internal()?);
        }

        Ok(SwitchCase {
            expr,
            statements,
            span: self.span_from(start),
        })
    }

    /// 制御移行文を解析（break / continue / discard）
    fn parse_ctrl_transfer_statement(&mut self) -> ParseResult<Statement> {
        let start = self.current_span().start;

        let kind = match self.current_token() {
            Some(Token::Break) => CtrlTransfer::Break,
            Some(Token::Continue) => CtrlTransfer::Continue,
            Some(Token::Discard) => CtrlTransfer::Discard,
            _ => return Err(self.unexpected_token()),
        };
        self.advance();
        self.expect(Token::Semicolon)?;

        Ok(Statement::CtrlTransfer(CtrlTransferStatement {
            kind,
            span: self.span_from(start),
        }))
    }

    /// return文を解析
    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let start = self.current_span().start;
        self.expect(Token::Return)?;

        let expr = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression_internal()?)
        };

        self.expect(Token::Semicolon)?;

        Ok(Statement::Return(ReturnStatement {
            expr,
            span: self.span_from(start),
        }))
    }

    /// 式文を解析（カンマ区切りの式列を許す）
    fn parse_expr_statement(&mut self) -> ParseResult<Statement> {
        let start = self.current_span().start;
        let expr = self.parse_list_expression()?;
        let span = self.span_from(start);
        self.expect(Token::Semicolon)?;

        Ok(Statement::Expr(ExprStatement { expr, span }))
    }

    /// 文に先行する属性リストを解析（`[unroll]`, `[numthreads(8,8,1)]`）
    pub(super) fn parse_attribute_list(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attribs = Vec::new();

        while self.check(&Token::LeftBracket) {
            let start = self.current_span().start;
            self.advance();

            let name = self.expect_identifier()?;

            let args = if self.match_token(&Token::LeftParen) {
                let args = self.parse_expr_list(&Token::RightParen, false)?;
                self.expect(Token::RightParen)?;
                args
            } else {
                Vec::new()
            };

            self.expect(Token::RightBracket)?;

            attribs.push(Attribute {
                name,
                args,
                span: self.span_from(start),
            });
        }

        Ok(attribs)
    }
}
