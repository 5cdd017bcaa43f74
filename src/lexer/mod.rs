//! Lexical analysis module for the HLSL front end.
//!
//! This module is responsible for tokenizing HLSL source code into a stream
//! of classified tokens with source positions. Keywords, data types
//! (`float4x4`, `uint3`, ...), texture and sampler types, modifiers,
//! literals, preprocessor directives and operators are classified by a fixed
//! token table; whitespace and comments are elided from the stream.

mod lexer;
mod literal_parser;
mod token;

pub use lexer::{tokenize, Lexer, TokenWithPosition};
pub use literal_parser::{parse_float_literal, parse_int_literal, unescape_string};
pub use token::{Token, TokenCategory};
