//! 型記述子の解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser<'_> {
    /// 変数の型記述子を解析
    ///
    /// ストレージ修飾子・型修飾子は出現順に収集する。`allow_void`は
    /// 関数の戻り値型を解析するときのみ真。
    pub(super) fn parse_var_type(&mut self, allow_void: bool) -> ParseResult<VarType> {
        let start = self.current_span().start;

        let mut storage_modifiers = Vec::new();
        let mut type_modifiers = Vec::new();

        loop {
            match self.current_token() {
                Some(Token::Storage(modifier)) => {
                    let modifier = *modifier;
                    self.advance();
                    storage_modifiers.push(modifier);
                }
                Some(Token::TypeMod(modifier)) => {
                    let modifier = *modifier;
                    self.advance();
                    type_modifiers.push(modifier);
                }
                _ => break,
            }
        }

        let base = match self.current_token() {
            Some(Token::Void) => {
                if !allow_void {
                    return Err(
                        self.error("'void' is only allowed as a function return type".to_string())
                    );
                }
                self.advance();
                TypeDenoter::Void
            }
            Some(Token::DataType(ty)) => {
                let ty = *ty;
                self.advance();
                TypeDenoter::Base(ty)
            }
            Some(Token::TextureType(name)) => {
                let name = name.clone();
                self.advance();
                TypeDenoter::Texture(name)
            }
            Some(Token::SamplerType(name)) => {
                let name = name.clone();
                self.advance();
                TypeDenoter::Sampler(name)
            }
            Some(Token::Struct) => {
                let decl = self.parse_struct_decl()?;
                TypeDenoter::Struct(Box::new(decl))
            }
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                TypeDenoter::Ident(name)
            }
            _ => return Err(self.error("Expected type name".to_string())),
        };

        Ok(VarType {
            storage_modifiers,
            type_modifiers,
            base,
            span: self.span_from(start),
        })
    }
}
