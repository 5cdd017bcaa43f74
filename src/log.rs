//! 診断レポートとログシンク
//!
//! パーサーは外部所有のログシンクへの参照を保持し、字句・構文エラーを
//! 構造化レポートとして送信する。シンクとの結合面は4つの操作
//! （レポート送信、インデント設定、インデント増加、インデント減少）のみで、
//! レポートの描画方法には依存しない。

use serde::{Deserialize, Serialize};

use crate::ast::Span;
use crate::source::SourceLocation;

/// レポートの重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// 診断レポート
///
/// 入れ子のサブレポートで文脈の連鎖（「関数Fの中で: 予期しないトークン」）を
/// 表現できる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
    pub span: Span,
    pub sub_reports: Vec<Report>,
}

impl Report {
    pub fn new(severity: Severity, message: String, location: SourceLocation, span: Span) -> Self {
        Self {
            severity,
            message,
            location,
            span,
            sub_reports: Vec::new(),
        }
    }

    pub fn error(message: String, location: SourceLocation, span: Span) -> Self {
        Self::new(Severity::Error, message, location, span)
    }

    pub fn warning(message: String, location: SourceLocation, span: Span) -> Self {
        Self::new(Severity::Warning, message, location, span)
    }

    pub fn info(message: String, location: SourceLocation, span: Span) -> Self {
        Self::new(Severity::Info, message, location, span)
    }

    /// サブレポートを追加した自身を返す
    pub fn with_sub_report(mut self, sub: Report) -> Self {
        self.sub_reports.push(sub);
        self
    }
}

/// ログシンクのインターフェース
///
/// パーサーが消費する唯一の結合面。具体的な描画は実装側の責任。
pub trait Log {
    /// レポートを送信する
    fn submit_report(&mut self, report: Report);

    /// インデント単位文字列を設定する（デフォルトは空白2つ）
    fn set_indent(&mut self, indent: &str);

    /// インデントを1段深くする
    fn inc_indent(&mut self);

    /// インデントを1段浅くする
    fn dec_indent(&mut self);
}

/// インデント状態の管理
///
/// `set_indent`で単位文字列が途中で変わっても対応できるよう、
/// 各段の長さを記録しておく。
#[derive(Debug, Clone)]
pub struct IndentHandler {
    unit: String,
    full: String,
    lengths: Vec<usize>,
}

impl Default for IndentHandler {
    fn default() -> Self {
        Self {
            unit: "  ".to_string(),
            full: String::new(),
            lengths: Vec::new(),
        }
    }
}

impl IndentHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_indent(&mut self, indent: &str) {
        self.unit = indent.to_string();
    }

    pub fn inc_indent(&mut self) {
        self.lengths.push(self.unit.len());
        self.full.push_str(&self.unit);
    }

    pub fn dec_indent(&mut self) {
        if let Some(len) = self.lengths.pop() {
            self.full.truncate(self.full.len() - len);
        }
    }

    /// 現在の完全なインデント文字列を返す
    pub fn full_indent(&self) -> &str {
        &self.full
    }
}

/// ログエントリ（送信時点のインデントとレポートの組）
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub indent: String,
    pub report: Report,
}

/// 標準ログシンク
///
/// レポートを送信順に蓄積する参照実装。後段のパスは`has_errors`を見て
/// 部分的な構文木を受け入れるかどうかを判断する。
#[derive(Debug, Default)]
pub struct StdLog {
    entries: Vec<LogEntry>,
    indent_handler: IndentHandler,
}

impl StdLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 蓄積されたエントリ
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// 蓄積されたレポート（送信順）
    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.entries.iter().map(|e| &e.report)
    }

    pub fn error_count(&self) -> usize {
        self.reports()
            .filter(|r| r.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.reports()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// すべてのレポートを標準エラー出力へ表示する
    pub fn print_all(&self, verbose: bool) {
        for entry in &self.entries {
            Self::print_report(&entry.report, &entry.indent, verbose);
        }
    }

    fn print_report(report: &Report, indent: &str, verbose: bool) {
        if verbose {
            eprintln!(
                "{}{} ({}): {}",
                indent, report.severity, report.location, report.message
            );
        } else {
            eprintln!("{}{}: {}", indent, report.severity, report.message);
        }
        for sub in &report.sub_reports {
            Self::print_report(sub, &format!("{}  ", indent), verbose);
        }
    }
}

impl Log for StdLog {
    fn submit_report(&mut self, report: Report) {
        self.entries.push(LogEntry {
            indent: self.indent_handler.full_indent().to_string(),
            report,
        });
    }

    fn set_indent(&mut self, indent: &str) {
        self.indent_handler.set_indent(indent);
    }

    fn inc_indent(&mut self) {
        self.indent_handler.inc_indent();
    }

    fn dec_indent(&mut self) {
        self.indent_handler.dec_indent();
    }
}
