//! フロントエンドのメイン処理モジュール
//!
//! 字句解析から構文解析までのパイプラインを管理し、蓄積された
//! レポートの描画を提供します。回復可能なエラーが発生した場合でも
//! ベストエフォートの部分的な構文木を返すため、呼び出し側はシンクの
//! エラー数を確認して後段のパスに渡すかどうかを判断してください。

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::fs;
use std::path::Path;

use crate::ast::Program;
use crate::error::{HlslError, HlslResult};
use crate::lexer::Lexer;
use crate::log::{Log, Report, Severity};
use crate::options::Options;
use crate::parser::Parser;
use crate::source::LineIndex;

/// 1つのソースユニットを解析する
///
/// 字句エラー・構文エラーはすべて`log`へ送信される。戻り値が`Some`でも
/// エラーが記録されている場合があり、その構文木はベストエフォートの
/// 部分的な結果である。`None`は致命的エラー（再帰深度の超過）のみ。
pub fn parse_source_unit(
    filename: &str,
    source: &str,
    options: &Options,
    log: &mut dyn Log,
) -> Option<Program> {
    ::log::debug!("字句解析を開始: {}", filename);

    let lexer = Lexer::with_options(source, options);
    let (tokens, lex_errors) = lexer.collect_tokens();

    let line_index = LineIndex::new(source);
    for err in &lex_errors {
        let span = err.span();
        log.submit_report(Report::error(
            err.to_string(),
            line_index.location(span.start),
            span,
        ));
    }

    ::log::debug!("構文解析を開始: {} ({}トークン)", filename, tokens.len());

    let mut parser = Parser::new(tokens, options.clone(), &mut *log);
    match parser.parse() {
        Ok(program) => {
            ::log::debug!(
                "構文解析が完了: {} ({}宣言)",
                filename,
                program.global_decls.len()
            );
            Some(program)
        }
        Err(_) => {
            // 致命的エラーはパーサーがレポート送信済み
            ::log::debug!("構文解析を中断: {}", filename);
            None
        }
    }
}

/// ファイルを読み込んで解析する
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    options: &Options,
    log: &mut dyn Log,
) -> HlslResult<Option<Program>> {
    let filename = path.as_ref().display().to_string();
    let source = fs::read_to_string(path.as_ref())
        .map_err(|e| HlslError::Io(format!("Failed to read source file: {}", e)))?;

    Ok(parse_source_unit(&filename, &source, options, log))
}

/// 蓄積されたレポートを標準エラー出力へ描画する
pub fn report_diagnostics(filename: &str, source: &str, reports: &[Report]) -> HlslResult<()> {
    let mut files = SimpleFiles::new();
    let file_id = files.add(filename.to_string(), source.to_string());

    let writer = StandardStream::stderr(ColorChoice::Always);
    let config = codespan_reporting::term::Config::default();

    for report in reports {
        let diagnostic = to_diagnostic(report, file_id);
        codespan_reporting::term::emit(&mut writer.lock(), &config, &files, &diagnostic)
            .map_err(|e| HlslError::Io(format!("Failed to emit diagnostic: {}", e)))?;
    }

    Ok(())
}

/// レポートをcodespan-reportingのDiagnosticに変換
fn to_diagnostic(report: &Report, file_id: usize) -> Diagnostic<usize> {
    let diagnostic = match report.severity {
        Severity::Error => Diagnostic::error(),
        Severity::Warning => Diagnostic::warning(),
        Severity::Info => Diagnostic::note(),
    };

    let notes = report
        .sub_reports
        .iter()
        .map(|sub| sub.message.clone())
        .collect();

    diagnostic
        .with_message(report.message.clone())
        .with_labels(vec![Label::primary(
            file_id,
            report.span.start..report.span.end,
        )])
        .with_notes(notes)
}
