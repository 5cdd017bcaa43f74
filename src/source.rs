//! ソース位置情報
//!
//! バイトオフセットのスパンから(行, 桁)への変換を提供する。
//! 診断レポートはこの位置情報を添えて外部シンクへ送信される。

use serde::{Deserialize, Serialize};

/// ソースコード上の位置（1始まりの行と桁）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// 行頭オフセットの索引
///
/// 入力全体を一度だけ走査して各行の開始オフセットを記録し、
/// 以降は二分探索でオフセットを行・桁に変換する。
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// 入力テキストから索引を構築
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// バイトオフセットに対応する位置を返す
    pub fn location(&self, offset: usize) -> SourceLocation {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        SourceLocation {
            line: line as u32,
            column: (offset - line_start) as u32 + 1,
        }
    }
}
