//! パーサーの構成オプション
//!
//! オプションはパーサー構築時に値で取り込まれ、以降は不変。
//! プロセス全体で共有される可変状態は存在しない。

/// 構文解析の動作を制御するオプション
#[derive(Debug, Clone)]
pub struct Options {
    /// 警告レポートを出力するかどうか
    pub warnings: bool,
    /// 拡張構文を許可する（引数リスト末尾のカンマなど）
    pub allow_extensions: bool,
    /// コメントをトークン列に残し、コメント文として構文木に取り込む
    pub preserve_comments: bool,
    /// 再帰下降の最大ネスト深度。超過した場合は解析全体を中断する
    pub max_recursion_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            warnings: false,
            allow_extensions: false,
            preserve_comments: false,
            max_recursion_depth: 256,
        }
    }
}
