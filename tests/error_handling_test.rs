//! エラーハンドリングのテスト
//!
//! 構文エラーからの回復、エラーの蓄積、修飾子配置チェック、
//! 再帰深度の上限を検証する。

use hlslfront::ast::*;
use hlslfront::error::ParserError;
use hlslfront::lexer::Lexer;
use hlslfront::log::{Severity, StdLog};
use hlslfront::options::Options;
use hlslfront::parser::{ParseError, Parser};

fn parse_source_with(source: &str, options: Options) -> (Result<Program, ParseError>, StdLog) {
    let (tokens, _) = Lexer::with_options(source, &options).collect_tokens();
    let mut log = StdLog::new();
    let result = {
        let mut parser = Parser::new(tokens, options, &mut log);
        parser.parse()
    };
    (result, log)
}

fn parse_source(source: &str) -> (Result<Program, ParseError>, StdLog) {
    parse_source_with(source, Options::default())
}

#[test]
fn test_missing_semicolon_recovers_at_next_statement() {
    // セミコロンの欠落は1つのエラーレポートになり、ブロックの残りは
    // 破棄されずに次の文の境界から解析が再開される
    let source = r#"
    void f() {
        float a = 1.0
        float b = 2.0;
        float c = 3.0;
    }
    "#;
    let (result, log) = parse_source(source);
    let program = result.expect("Parsing should recover");

    assert_eq!(log.error_count(), 1);

    if let GlobalDecl::Function(func) = &program.global_decls[0] {
        let statements = &func.body.as_ref().unwrap().statements;
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Statement::VarDecl(d) if d.var_decls[0].name == "b"));
        assert!(matches!(&statements[1], Statement::VarDecl(d) if d.var_decls[0].name == "c"));
    } else {
        panic!("Expected function declaration");
    }
}

#[test]
fn test_multiple_errors_accumulate_in_one_pass() {
    // 1回の解析パスで独立した複数の診断が蓄積される
    let source = r#"
    void f() {
        x = ;
    }
    void g() {
        y = ;
    }
    "#;
    let (result, log) = parse_source(source);
    let program = result.expect("Parsing should recover");

    assert_eq!(log.error_count(), 2);
    // どちらの関数も構文木に現れる
    assert_eq!(program.global_decls.len(), 2);
}

#[test]
fn test_error_report_carries_function_context() {
    let source = r#"
    void shade() {
        x = ;
    }
    "#;
    let (_, log) = parse_source(source);

    assert_eq!(log.error_count(), 1);
    let report = log.reports().next().unwrap();
    assert_eq!(report.severity, Severity::Error);
    assert!(!report.sub_reports.is_empty());
    assert!(report.sub_reports[0].message.contains("shade"));
}

#[test]
fn test_garbage_global_decl_recovers() {
    let source = "12345\nvoid f() { }";
    let (result, log) = parse_source(source);
    let program = result.expect("Parsing should recover");

    assert_eq!(log.error_count(), 1);
    assert_eq!(program.global_decls.len(), 1);
    assert!(matches!(&program.global_decls[0], GlobalDecl::Function(_)));
}

#[test]
fn test_modifier_placement_on_return_type() {
    // 補間修飾子は構文上は受理されるが、戻り値型の位置では
    // 配置エラーとして報告され、解析は続行する
    let source = "linear float4 f() { return x; }";
    let (result, log) = parse_source(source);
    let program = result.expect("Parsing should recover");

    assert_eq!(log.error_count(), 1);
    let report = log.reports().next().unwrap();
    assert!(report.message.contains("linear"));

    // 関数自体は解析されている
    if let GlobalDecl::Function(func) = &program.global_decls[0] {
        assert_eq!(func.name, "f");
        assert!(func.body.is_some());
    } else {
        panic!("Expected function declaration");
    }
}

#[test]
fn test_recursion_limit_is_fatal() {
    // 設定された上限をはるかに超えるネストは致命的エラーになり、
    // ネイティブスタックを溢れさせずに即座に失敗を返す
    let depth = 5000;
    let source = format!(
        "void f() {{ float x = {}1.0{}; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let (result, log) = parse_source(&source);

    let err = result.expect_err("Parsing should abort");
    assert!(matches!(err, ParserError::RecursionLimit { .. }));
    assert!(err.is_fatal());
    assert!(log.has_errors());
}

#[test]
fn test_recursion_limit_respects_configured_value() {
    let options = Options {
        max_recursion_depth: 16,
        ..Options::default()
    };
    let source = format!(
        "void f() {{ float x = {}1.0{}; }}",
        "(".repeat(64),
        ")".repeat(64)
    );
    let (result, _) = parse_source_with(&source, options);

    assert!(matches!(result, Err(ParserError::RecursionLimit { limit: 16, .. })));
}

#[test]
fn test_deep_but_legal_nesting_succeeds() {
    let source = format!(
        "void f() {{ float x = {}1.0{}; }}",
        "(".repeat(20),
        ")".repeat(20)
    );
    let (result, log) = parse_source(&source);

    assert!(result.is_ok());
    assert_eq!(log.error_count(), 0);
}

#[test]
fn test_attribute_on_plain_statement_warns() {
    let options = Options {
        warnings: true,
        ..Options::default()
    };
    let source = "void f() { [unroll] return; }";
    let (result, log) = parse_source_with(source, options);
    let program = result.expect("Parsing should succeed");

    assert_eq!(log.error_count(), 0);
    assert_eq!(log.warning_count(), 1);

    // 文自体は属性なしで解析される
    if let GlobalDecl::Function(func) = &program.global_decls[0] {
        let statements = &func.body.as_ref().unwrap().statements;
        assert!(matches!(&statements[0], Statement::Return(_)));
    } else {
        panic!("Expected function declaration");
    }
}

#[test]
fn test_warnings_suppressed_by_default() {
    let source = "void f() { [unroll] return; }";
    let (result, log) = parse_source(source);

    assert!(result.is_ok());
    assert_eq!(log.warning_count(), 0);
}

#[test]
fn test_unbalanced_block_reports_error() {
    let source = "void f() { if (x) { return; ";
    let (result, log) = parse_source(source);

    assert!(result.is_err() || log.has_errors());
}

#[test]
fn test_partial_tree_is_best_effort() {
    // 壊れた宣言の前後の宣言は部分的な構文木に残る
    let source = r#"
    float4 before;
    cbuffer { }
    float4 after;
    "#;
    let (result, log) = parse_source(source);
    let program = result.expect("Parsing should recover");

    assert!(log.has_errors());
    let names: Vec<_> = program
        .global_decls
        .iter()
        .filter_map(|decl| match decl {
            GlobalDecl::VarDeclStmt(d) => Some(d.var_decls[0].name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["before".to_string(), "after".to_string()]);
}
