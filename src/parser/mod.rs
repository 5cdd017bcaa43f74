//! パーサーモジュール
//!
//! このモジュールはトークン列を抽象構文木（AST）に解析する責任を持ちます。
//! 再帰下降構文解析を使用し、適切な優先順位処理を行います。
//!
//! ## 予測的ディスパッチ
//!
//! HLSLの文法は単純なLL(1)ではありません。宣言と式は先頭の識別子を共有し、
//! 型名は分類なしには通常の識別子と区別できません。そのためパーサーは
//! 現在のトークン（必要に応じてもう1トークンの先読み）を調べる分類述語で
//! 文法の選択肢を1つに確定し、消費済みトークンを巻き戻すことはありません。
//!
//! 組み込み型のキーワード集合に加えて、解析中に宣言された構造体名の
//! レジストリを参照することで、ユーザー定義型で始まる宣言
//! （`VertexInput v;`）と式文（`v;`）を区別します。
//!
//! ## エラー回復
//!
//! 構文エラーはレポートとして外部シンクに蓄積され、パーサーは文の終端・
//! ブロックの閉じ・次の宣言開始まで読み飛ばして解析を再開します。
//! 1つの不正な構文の影響範囲は、それを含む文または宣言に限定されます。
//! 再帰深度の上限超過のみが致命的エラーとして解析全体を中断します。

mod decl_parser;
mod expr_parser;
mod parser_impl;
mod stmt_parser;
mod type_parser;

// 公開API
pub use parser_impl::Parser;

// 後方互換性のための型エイリアス
use crate::error::ParserError;
pub type ParseError = ParserError;
pub type ParseResult<T> = Result<T, ParseError>;
