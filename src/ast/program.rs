//! プログラム（構文木のルート）

use serde::{Deserialize, Serialize};

use super::{GlobalDecl, Span};

/// 1つのソースユニット全体を表すルートノード
///
/// `global_decls`の順序はソース上の宣言順と一致する。後段のパスは
/// 宣言が使用より先に現れることに依存するため、この順序は保存される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub global_decls: Vec<GlobalDecl>,
    pub span: Span,
}

impl Program {
    /// 構文木をJSON文字列へダンプする（デバッグ用）
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for decl in &self.global_decls {
            writeln!(f, "{}", decl)?;
        }
        Ok(())
    }
}
