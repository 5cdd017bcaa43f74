//! 式の解析
//!
//! 演算子の優先順位に従った優先順位クライミングで式を解析する。
//! 優先順位は低い順に、カンマ列（許可された文脈のみ）→ 代入 → 三項 →
//! 論理OR → 論理AND → ビットOR → ビットXOR → ビットAND → 等価 → 関係 →
//! シフト → 加算 → 乗算 → 単項・キャスト → 後置 → プライマリ。

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser<'_> {
    /// 式を解析（内部実装）
    pub(super) fn parse_expression_internal(&mut self) -> ParseResult<Expression> {
        self.with_depth(|p| p.parse_assignment_expression())
    }

    /// カンマ区切りの式列を解析（式文とfor文の更新部でのみ使用）
    pub(super) fn parse_list_expression(&mut self) -> ParseResult<Expression> {
        let start = self.current_span().start;
        let first = self.parse_expression_internal()?;

        if !self.check(&Token::Comma) {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.match_token(&Token::Comma) {
            exprs.push(self.parse_expression_internal()?);
        }

        Ok(Expression::List(ListExpr {
            exprs,
            span: self.span_from(start),
        }))
    }

    /// 代入式を解析（右結合）
    fn parse_assignment_expression(&mut self) -> ParseResult<Expression> {
        let left = self.parse_ternary_expression()?;

        let op = match self.match_tokens(&[
            Token::Assign,
            Token::PlusAssign,
            Token::MinusAssign,
            Token::StarAssign,
            Token::SlashAssign,
            Token::PercentAssign,
            Token::ShlAssign,
            Token::ShrAssign,
            Token::AmpAssign,
            Token::OrAssign,
            Token::CaretAssign,
        ]) {
            Some(Token::Assign) => AssignOp::Assign,
            Some(Token::PlusAssign) => AssignOp::Add,
            Some(Token::MinusAssign) => AssignOp::Subtract,
            Some(Token::StarAssign) => AssignOp::Multiply,
            Some(Token::SlashAssign) => AssignOp::Divide,
            Some(Token::PercentAssign) => AssignOp::Modulo,
            Some(Token::ShlAssign) => AssignOp::Shl,
            Some(Token::ShrAssign) => AssignOp::Shr,
            Some(Token::AmpAssign) => AssignOp::BitAnd,
            Some(Token::OrAssign) => AssignOp::BitOr,
            Some(Token::CaretAssign) => AssignOp::BitXor,
            _ => return Ok(left),
        };

        let value = self.parse_assignment_expression()?;
        let span = Span::new(left.span().start, value.span().end);

        Ok(Expression::Assign(AssignExpr {
            target: Box::new(left),
            op,
            value: Box::new(value),
            span,
        }))
    }

    /// 三項式を解析
    fn parse_ternary_expression(&mut self) -> ParseResult<Expression> {
        let condition = self.parse_or_expression()?;

        if !self.match_token(&Token::Question) {
            return Ok(condition);
        }

        let then_expr = self.parse_expression_internal()?;
        self.expect(Token::Colon)?;
        let else_expr = self.parse_assignment_expression()?;
        let span = Span::new(condition.span().start, else_expr.span().end);

        Ok(Expression::Ternary(TernaryExpr {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            span,
        }))
    }

    /// OR式を解析
    fn parse_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and_expression()?;

        while self.match_token(&Token::OrOr) {
            let right = self.parse_and_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op: BinaryOp::Or,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// AND式を解析
    fn parse_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_or_expression()?;

        while self.match_token(&Token::AndAnd) {
            let right = self.parse_bitwise_or_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op: BinaryOp::And,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// ビット演算OR式を解析
    fn parse_bitwise_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_xor_expression()?;

        while self.match_token(&Token::Or) {
            let right = self.parse_bitwise_xor_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op: BinaryOp::BitOr,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// ビット演算XOR式を解析
    fn parse_bitwise_xor_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_and_expression()?;

        while self.match_token(&Token::Caret) {
            let right = self.parse_bitwise_and_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op: BinaryOp::BitXor,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// ビット演算AND式を解析
    fn parse_bitwise_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_equality_expression()?;

        while self.match_token(&Token::Ampersand) {
            let right = self.parse_equality_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op: BinaryOp::BitAnd,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// 等価式を解析
    fn parse_equality_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_relational_expression()?;

        while let Some(op) = self.match_tokens(&[Token::EqEq, Token::NotEq]) {
            let op = match op {
                Token::EqEq => BinaryOp::Eq,
                Token::NotEq => BinaryOp::Ne,
                _ => unreachable!(),
            };
            let right = self.parse_relational_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// 関係式を解析
    fn parse_relational_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_shift_expression()?;

        while let Some(op) = self.match_tokens(&[Token::Lt, Token::Gt, Token::LtEq, Token::GtEq]) {
            let op = match op {
                Token::Lt => BinaryOp::Lt,
                Token::Gt => BinaryOp::Gt,
                Token::LtEq => BinaryOp::Le,
                Token::GtEq => BinaryOp::Ge,
                _ => unreachable!(),
            };
            let right = self.parse_shift_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// シフト式を解析
    fn parse_shift_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_additive_expression()?;

        while let Some(op) = self.match_tokens(&[Token::Shl, Token::Shr]) {
            let op = match op {
                Token::Shl => BinaryOp::Shl,
                Token::Shr => BinaryOp::Shr,
                _ => unreachable!(),
            };
            let right = self.parse_additive_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// 加算式を解析
    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;

        while let Some(op) = self.match_tokens(&[Token::Plus, Token::Minus]) {
            let op = match op {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Subtract,
                _ => unreachable!(),
            };
            let right = self.parse_multiplicative_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// 乗算式を解析
    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expression()?;

        while let Some(op) = self.match_tokens(&[Token::Star, Token::Slash, Token::Percent]) {
            let op = match op {
                Token::Star => BinaryOp::Multiply,
                Token::Slash => BinaryOp::Divide,
                Token::Percent => BinaryOp::Modulo,
                _ => unreachable!(),
            };
            let right = self.parse_unary_expression()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            });
        }

        Ok(left)
    }

    /// 単項式を解析
    pub(super) fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        self.with_depth(|p| p.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> ParseResult<Expression> {
        let op = match self.current_token() {
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Tilde) => Some(UnaryOp::BitNot),
            Some(Token::Minus) => Some(UnaryOp::Negate),
            Some(Token::Plus) => Some(UnaryOp::Plus),
            Some(Token::Inc) => Some(UnaryOp::PreInc),
            Some(Token::Dec) => Some(UnaryOp::PreDec),
            _ => None,
        };

        if let Some(op) = op {
            let start = self.current_span().start;
            self.advance();
            let expr = self.parse_unary_expression()?;
            Ok(Expression::Unary(UnaryExpr {
                op,
                expr: Box::new(expr),
                span: self.span_from(start),
            }))
        } else {
            self.parse_postfix_expression()
        }
    }

    /// 後置式を解析（後置インクリメント・デクリメント）
    fn parse_postfix_expression(&mut self) -> ParseResult<Expression> {
        let start = self.current_span().start;
        let mut expr = self.parse_primary_expression()?;

        loop {
            let op = match self.current_token() {
                Some(Token::Inc) => UnaryOp::PostInc,
                Some(Token::Dec) => UnaryOp::PostDec,
                _ => break,
            };
            self.advance();
            expr = Expression::Unary(UnaryExpr {
                op,
                expr: Box::new(expr),
                span: self.span_from(start),
            });
        }

        Ok(expr)
    }

    /// プライマリ式を解析（リテラル、識別子、括弧付き式など）
    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        if self.is_literal() {
            return self.parse_literal_expr();
        }

        match self.current_token() {
            Some(Token::DataType(ty)) => {
                // 型コンストラクタ呼び出し（`float3(x, y, z)`）
                let ty = *ty;
                self.parse_type_ctor_call(ty)
            }
            Some(Token::LeftParen) => self.parse_bracket_or_cast_expression(),
            Some(Token::LeftBrace) => self.parse_initializer_expression(),
            Some(Token::Identifier(_)) => self.parse_var_access_or_function_call(),
            _ => Err(self.error("Expected expression".to_string())),
        }
    }

    /// リテラル式を解析
    fn parse_literal_expr(&mut self) -> ParseResult<Expression> {
        let span: Span = self.current_span().into();
        let value = match self.current_token() {
            Some(Token::IntLiteral(value)) => Literal::Int(*value),
            Some(Token::FloatLiteral(value)) => Literal::Float(*value),
            Some(Token::StringLiteral(value)) => Literal::String(value.clone()),
            Some(Token::True) => Literal::Bool(true),
            Some(Token::False) => Literal::Bool(false),
            _ => return Err(self.error("Expected literal".to_string())),
        };
        self.advance();

        Ok(Expression::Literal(LiteralExpr { value, span }))
    }

    /// 型コンストラクタ呼び出しを解析
    fn parse_type_ctor_call(&mut self, ty: DataType) -> ParseResult<Expression> {
        let start = self.current_span().start;
        let name_span: Span = self.current_span().into();
        self.advance();

        self.expect(Token::LeftParen)?;
        let args = self.parse_expr_list(&Token::RightParen, self.options.allow_extensions)?;
        self.expect(Token::RightParen)?;

        let name = VarIdent {
            segments: vec![VarIdentSegment {
                ident: ty.to_string(),
                array_indices: Vec::new(),
                span: name_span,
            }],
            span: name_span,
        };

        Ok(Expression::Call(FunctionCallExpr {
            name,
            args,
            span: self.span_from(start),
        }))
    }

    /// 括弧で始まる式を解析（キャストまたは括弧付き式）
    ///
    /// `(`の直後を先読みしてどちらかに確定する。データ型トークン、
    /// または「レジストリ上の型名 + `)`」ならキャスト、それ以外は
    /// 括弧付き式。トークンを巻き戻すことはない。
    fn parse_bracket_or_cast_expression(&mut self) -> ParseResult<Expression> {
        let start = self.current_span().start;
        self.expect(Token::LeftParen)?;

        if self.is_cast_type_ahead() {
            let target_type = self.parse_var_type(false)?;
            if let Some(modifier) = target_type.storage_modifiers.first() {
                return Err(ParserError::ModifierPlacement {
                    modifier: modifier.to_string(),
                    context: "キャスト式".to_string(),
                    span: target_type.span,
                });
            }
            self.expect(Token::RightParen)?;
            let expr = self.parse_unary_expression()?;

            Ok(Expression::Cast(CastExpr {
                target_type,
                expr: Box::new(expr),
                span: self.span_from(start),
            }))
        } else {
            let expr = self.parse_expression_internal()?;
            self.expect(Token::RightParen)?;

            Ok(Expression::Bracket(BracketExpr {
                expr: Box::new(expr),
                span: self.span_from(start),
            }))
        }
    }

    /// `(`消費後、キャスト型が続くかどうか
    fn is_cast_type_ahead(&self) -> bool {
        match self.current_token() {
            Some(Token::DataType(_) | Token::TypeMod(_)) => true,
            Some(Token::Identifier(name)) => {
                self.declared_types.contains(name)
                    && matches!(self.peek(1), Some(Token::RightParen))
            }
            _ => false,
        }
    }

    /// 変数アクセスまたは関数呼び出しを解析
    ///
    /// まず識別子チェーンを構築し、`(`が続けば関数呼び出し、
    /// そうでなければ変数アクセスとしてチェーンの所有権を引き渡す。
    fn parse_var_access_or_function_call(&mut self) -> ParseResult<Expression> {
        let start = self.current_span().start;
        let ident = self.parse_var_ident()?;

        if self.match_token(&Token::LeftParen) {
            let args = self.parse_expr_list(&Token::RightParen, self.options.allow_extensions)?;
            self.expect(Token::RightParen)?;

            Ok(Expression::Call(FunctionCallExpr {
                name: ident,
                args,
                span: self.span_from(start),
            }))
        } else {
            Ok(Expression::VarAccess(VarAccessExpr {
                ident,
                span: self.span_from(start),
            }))
        }
    }

    /// 変数識別子チェーンを解析
    ///
    /// 各セグメントは識別子と省略可能な配列添字の列。チェーンは
    /// 空にならない。`buf.data[i].x`は3セグメントになる。
    pub(super) fn parse_var_ident(&mut self) -> ParseResult<VarIdent> {
        let start = self.current_span().start;
        let mut segments = Vec::new();

        loop {
            let segment_start = self.current_span().start;
            let ident = self.expect_identifier()?;

            let mut array_indices = Vec::new();
            while self.match_token(&Token::LeftBracket) {
                array_indices.push(self.parse_expression_internal()?);
                self.expect(Token::RightBracket)?;
            }

            segments.push(VarIdentSegment {
                ident,
                array_indices,
                span: self.span_from(segment_start),
            });

            if !self.match_token(&Token::Dot) {
                break;
            }
        }

        Ok(VarIdent {
            segments,
            span: self.span_from(start),
        })
    }

    /// 初期化子リスト式を解析（`{ 1, 2, 3 }`、末尾カンマ可）
    pub(super) fn parse_initializer_expression(&mut self) -> ParseResult<Expression> {
        let start = self.current_span().start;
        self.expect(Token::LeftBrace)?;

        let elements = self.parse_expr_list(&Token::RightBrace, true)?;

        self.expect(Token::RightBrace)?;

        Ok(Expression::Initializer(InitializerExpr {
            elements,
            span: self.span_from(start),
        }))
    }

    /// カンマ区切りの式リストを解析
    ///
    /// `allow_last_comma`が真の場合のみ終端記号の直前のカンマを許す。
    pub(super) fn parse_expr_list(
        &mut self,
        terminator: &Token,
        allow_last_comma: bool,
    ) -> ParseResult<Vec<Expression>> {
        let mut exprs = Vec::new();

        if self.check(terminator) {
            return Ok(exprs);
        }

        loop {
            exprs.push(self.parse_expression_internal()?);

            if !self.match_token(&Token::Comma) {
                break;
            }
            if self.check(terminator) {
                if allow_last_comma {
                    break;
                }
                return Err(self.error("Trailing comma is not allowed here".to_string()));
            }
        }

        Ok(exprs)
    }
}
