//! グローバル宣言（関数、バッファ、テクスチャ、サンプラー、構造体）の解析

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser<'_> {
    /// グローバル宣言を解析
    ///
    /// 先頭トークンと分類述語で宣言の種別を1つに確定する。
    pub(super) fn parse_global_decl(&mut self) -> ParseResult<GlobalDecl> {
        match self.current_token() {
            Some(Token::Directive(_)) => self.parse_directive_decl(),
            Some(Token::Struct) => {
                let decl = self.parse_struct_decl()?;
                self.expect(Token::Semicolon)?;
                Ok(GlobalDecl::Struct(decl))
            }
            Some(Token::CBuffer | Token::TBuffer) => self.parse_uniform_buffer_decl(),
            Some(Token::TextureType(_)) => self.parse_texture_decl(),
            Some(Token::SamplerType(_)) => self.parse_sampler_decl(),
            Some(Token::LeftBracket) => {
                let attribs = self.parse_attribute_list()?;
                self.parse_function_or_var_decl(attribs)
            }
            Some(_) => self.parse_function_or_var_decl(Vec::new()),
            None => Err(self.unexpected_token()),
        }
    }

    /// プリプロセッサ指令宣言を解析
    fn parse_directive_decl(&mut self) -> ParseResult<GlobalDecl> {
        let span: Span = self.current_span().into();
        let line = match self.current_token() {
            Some(Token::Directive(line)) => line.clone(),
            _ => return Err(self.unexpected_token()),
        };
        self.advance();
        Ok(GlobalDecl::Directive(DirectiveDecl { line, span }))
    }

    /// 構造体宣言を解析（型位置では無名も許される）
    ///
    /// 宣言された名前は型名レジストリに登録され、以降の解析で
    /// 宣言開始の分類に使われる。
    pub(super) fn parse_struct_decl(&mut self) -> ParseResult<StructDecl> {
        let start = self.current_span().start;
        self.expect(Token::Struct)?;

        let name = match self.current_token() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        if let Some(name) = &name {
            self.register_type_name(name);
        }

        self.expect(Token::LeftBrace)?;

        let mut members = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            members.push(self.parse_var_decl_statement()?);
        }

        self.expect(Token::RightBrace)?;

        Ok(StructDecl {
            name,
            members,
            span: self.span_from(start),
        })
    }

    /// 定数バッファ宣言を解析（cbuffer / tbuffer）
    fn parse_uniform_buffer_decl(&mut self) -> ParseResult<GlobalDecl> {
        let start = self.current_span().start;

        let kind = match self.current_token() {
            Some(Token::CBuffer) => BufferKind::CBuffer,
            Some(Token::TBuffer) => BufferKind::TBuffer,
            _ => return Err(self.unexpected_token()),
        };
        self.advance();

        let idents = self.parse_buffer_decl_ident_list()?;

        self.expect(Token::LeftBrace)?;
        let mut members = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            members.push(self.parse_var_decl_statement()?);
        }
        self.expect(Token::RightBrace)?;

        // 閉じ括弧の後のセミコロンは省略できる
        self.match_token(&Token::Semicolon);

        Ok(GlobalDecl::UniformBuffer(UniformBufferDecl {
            kind,
            idents,
            members,
            span: self.span_from(start),
        }))
    }

    /// テクスチャ宣言を解析
    fn parse_texture_decl(&mut self) -> ParseResult<GlobalDecl> {
        let start = self.current_span().start;

        let texture_type = match self.current_token() {
            Some(Token::TextureType(name)) => name.clone(),
            _ => return Err(self.unexpected_token()),
        };
        self.advance();

        // 要素型の指定（`Texture2D<float4>`）
        let format = if self.match_token(&Token::Lt) {
            let ty = match self.current_token() {
                Some(Token::DataType(ty)) => *ty,
                _ => return Err(self.error("Expected data type in texture format".to_string())),
            };
            self.advance();
            self.expect(Token::Gt)?;
            Some(ty)
        } else {
            None
        };

        let idents = self.parse_buffer_decl_ident_list()?;
        self.expect(Token::Semicolon)?;

        Ok(GlobalDecl::Texture(TextureDecl {
            texture_type,
            format,
            idents,
            span: self.span_from(start),
        }))
    }

    /// サンプラー宣言を解析
    fn parse_sampler_decl(&mut self) -> ParseResult<GlobalDecl> {
        let start = self.current_span().start;

        let sampler_type = match self.current_token() {
            Some(Token::SamplerType(name)) => name.clone(),
            _ => return Err(self.unexpected_token()),
        };
        self.advance();

        let idents = self.parse_buffer_decl_ident_list()?;
        self.expect(Token::Semicolon)?;

        Ok(GlobalDecl::Sampler(SamplerDecl {
            sampler_type,
            idents,
            span: self.span_from(start),
        }))
    }

    /// バッファ宣言の束縛対象リストを解析
    ///
    /// `tex0 : register(t0), tex1 : register(t1)` のようなカンマ区切りの
    /// 列。各束縛対象が自身のアノテーションを独立して持つ。
    fn parse_buffer_decl_ident_list(&mut self) -> ParseResult<Vec<BufferDeclIdent>> {
        let mut idents = Vec::new();

        loop {
            idents.push(self.parse_buffer_decl_ident()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        Ok(idents)
    }

    /// 単一のバッファ宣言束縛対象を解析
    fn parse_buffer_decl_ident(&mut self) -> ParseResult<BufferDeclIdent> {
        let start = self.current_span().start;
        let name = self.expect_identifier()?;

        let mut register_name = None;
        let mut pack_offset = None;

        while self.match_token(&Token::Colon) {
            match self.current_token() {
                Some(Token::Register) => {
                    self.advance();
                    register_name = Some(self.parse_register_annotation()?);
                }
                Some(Token::PackOffset) => {
                    self.advance();
                    pack_offset = Some(self.parse_pack_offset_annotation()?);
                }
                _ => {
                    return Err(self.error("Expected 'register' or 'packoffset'".to_string()));
                }
            }
        }

        Ok(BufferDeclIdent {
            name,
            register_name,
            pack_offset,
            span: self.span_from(start),
        })
    }

    /// `register(...)` アノテーションを解析（`register`は消費済み）
    pub(super) fn parse_register_annotation(&mut self) -> ParseResult<String> {
        self.expect(Token::LeftParen)?;
        let name = self.expect_identifier()?;
        self.expect(Token::RightParen)?;
        Ok(name)
    }

    /// `packoffset(...)` アノテーションを解析（`packoffset`は消費済み）
    pub(super) fn parse_pack_offset_annotation(&mut self) -> ParseResult<PackOffset> {
        let start = self.current_span().start;
        self.expect(Token::LeftParen)?;
        let register_name = self.expect_identifier()?;

        let component = if self.match_token(&Token::Dot) {
            let component = self.expect_identifier()?;
            component.chars().next()
        } else {
            None
        };

        self.expect(Token::RightParen)?;

        Ok(PackOffset {
            register_name,
            component,
            span: self.span_from(start),
        })
    }

    /// 関数宣言またはグローバル変数宣言を解析
    ///
    /// 両者は `型 識別子` という接頭辞を共有するため、識別子の次の
    /// トークンが `(` かどうかで確定する。
    fn parse_function_or_var_decl(&mut self, attribs: Vec<Attribute>) -> ParseResult<GlobalDecl> {
        let start = self.current_span().start;
        let var_type = self.parse_var_type(true)?;
        let name = self.expect_identifier()?;

        if self.check(&Token::LeftParen) {
            self.parse_function_decl(attribs, var_type, name, start)
        } else {
            if !attribs.is_empty() {
                let span = attribs[0].span;
                self.submit_warning(
                    "属性は変数宣言には付与できないため無視されます".to_string(),
                    span,
                );
            }
            let decl = self.parse_var_decl_stmnt_rest(var_type, name, start)?;
            Ok(GlobalDecl::VarDeclStmt(decl))
        }
    }

    /// 関数宣言の残りを解析（名前まで消費済み）
    fn parse_function_decl(
        &mut self,
        attribs: Vec<Attribute>,
        return_type: VarType,
        name: String,
        start: usize,
    ) -> ParseResult<GlobalDecl> {
        // 補間修飾子は戻り値型には置けない。レポートを送信して解析は続行する
        for modifier in &return_type.storage_modifiers {
            if modifier.is_interpolation() {
                let err = ParserError::ModifierPlacement {
                    modifier: modifier.to_string(),
                    context: "関数の戻り値型".to_string(),
                    span: return_type.span,
                };
                self.submit_error(&err);
            }
        }

        self.expect(Token::LeftParen)?;
        let params = self.parse_parameter_list()?;
        self.expect(Token::RightParen)?;

        let semantic = if self.match_token(&Token::Colon) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let body = if self.match_token(&Token::Semicolon) {
            // プロトタイプ宣言
            None
        } else {
            self.push_context(format!("関数 '{}'", name));
            self.log.inc_indent();
            let block = self.parse_code_block();
            self.log.dec_indent();
            self.pop_context();
            Some(block?)
        };

        Ok(GlobalDecl::Function(FunctionDecl {
            attribs,
            return_type,
            name,
            params,
            semantic,
            body,
            span: self.span_from(start),
        }))
    }

    /// パラメータリストを解析
    fn parse_parameter_list(&mut self) -> ParseResult<Vec<VarDeclStatement>> {
        let mut params = Vec::new();

        if self.check(&Token::RightParen) {
            return Ok(params);
        }

        // `f(void)` はパラメータなし
        if self.check(&Token::Void) && matches!(self.peek(1), Some(Token::RightParen)) {
            self.advance();
            return Ok(params);
        }

        loop {
            params.push(self.parse_parameter()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// 単一のパラメータを解析
    ///
    /// パラメータは単一の変数宣言を持つ変数宣言文として表現する。
    /// セマンティクスとデフォルト値（`= expr`）も受け付ける。
    fn parse_parameter(&mut self) -> ParseResult<VarDeclStatement> {
        let start = self.current_span().start;
        let var_type = self.parse_var_type(false)?;
        let name = self.expect_identifier()?;
        let var_decl = self.parse_var_decl_rest(name)?;

        Ok(VarDeclStatement {
            var_type,
            var_decls: vec![var_decl],
            span: self.span_from(start),
        })
    }

    /// 変数宣言文を解析
    pub(super) fn parse_var_decl_statement(&mut self) -> ParseResult<VarDeclStatement> {
        let start = self.current_span().start;
        let var_type = self.parse_var_type(false)?;
        let name = self.expect_identifier()?;
        self.parse_var_decl_stmnt_rest(var_type, name, start)
    }

    /// 変数宣言文の残りを解析（型と最初の名前まで消費済み）
    ///
    /// `float a = 1, b = 2;` のようなカンマ区切りの宣言列を集め、
    /// 終端のセミコロンまで消費する。
    fn parse_var_decl_stmnt_rest(
        &mut self,
        var_type: VarType,
        first_name: String,
        start: usize,
    ) -> ParseResult<VarDeclStatement> {
        let mut var_decls = vec![self.parse_var_decl_rest(first_name)?];

        while self.match_token(&Token::Comma) {
            let name = self.expect_identifier()?;
            var_decls.push(self.parse_var_decl_rest(name)?);
        }

        self.expect(Token::Semicolon)?;

        Ok(VarDeclStatement {
            var_type,
            var_decls,
            span: self.span_from(start),
        })
    }

    /// 単一の変数宣言の残りを解析（名前まで消費済み）
    fn parse_var_decl_rest(&mut self, name: String) -> ParseResult<VarDecl> {
        let start = self.current_span().start;

        // 配列次元
        let mut array_dims = Vec::new();
        while self.match_token(&Token::LeftBracket) {
            array_dims.push(self.parse_expression_internal()?);
            self.expect(Token::RightBracket)?;
        }

        // アノテーション（セマンティクス・レジスタ・パックオフセット）は
        // それぞれ独立した省略可能な接尾辞
        let mut semantics = Vec::new();
        while self.match_token(&Token::Colon) {
            semantics.push(self.parse_var_semantic()?);
        }

        let initializer = if self.match_token(&Token::Assign) {
            Some(self.parse_initializer()?)
        } else {
            None
        };

        Ok(VarDecl {
            name,
            array_dims,
            semantics,
            initializer,
            span: self.span_from(start),
        })
    }

    /// 単一のアノテーションを解析（`:`は消費済み）
    fn parse_var_semantic(&mut self) -> ParseResult<VarSemantic> {
        match self.current_token() {
            Some(Token::Register) => {
                self.advance();
                Ok(VarSemantic::Register(self.parse_register_annotation()?))
            }
            Some(Token::PackOffset) => {
                self.advance();
                Ok(VarSemantic::PackOffset(
                    self.parse_pack_offset_annotation()?,
                ))
            }
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Ok(VarSemantic::Semantic(name))
            }
            _ => Err(self.error("Expected semantic name".to_string())),
        }
    }

    /// 初期化子を解析（式または波括弧の初期化子リスト）
    fn parse_initializer(&mut self) -> ParseResult<Expression> {
        if self.check(&Token::LeftBrace) {
            self.parse_initializer_expression()
        } else {
            self.parse_expression_internal()
        }
    }
}
