//! パーサーテスト
//!
//! HLSLフロントエンドのパーサー（構文解析器）の包括的なテストスイート。
//! 宣言・文・式の各構文、予測的ディスパッチ、演算子優先順位を網羅する。

#[cfg(test)]
mod tests {
    use hlslfront::ast::*;
    use hlslfront::lexer::Lexer;
    use hlslfront::log::StdLog;
    use hlslfront::options::Options;
    use hlslfront::parser::{ParseError, Parser};

    /// ソースコードを解析してASTとログを取得するヘルパー関数
    fn parse_source(source: &str) -> (Result<Program, ParseError>, StdLog) {
        parse_source_with(source, Options::default())
    }

    /// オプション付きで解析するヘルパー関数
    fn parse_source_with(source: &str, options: Options) -> (Result<Program, ParseError>, StdLog) {
        let (tokens, lex_errors) = Lexer::with_options(source, &options).collect_tokens();
        assert!(
            lex_errors.is_empty(),
            "unexpected lexical errors: {:?}",
            lex_errors
        );
        let mut log = StdLog::new();
        let result = {
            let mut parser = Parser::new(tokens, options, &mut log);
            parser.parse()
        };
        (result, log)
    }

    /// 解析に成功する（エラーレポートなし）ことを確認するヘルパー関数
    fn assert_parse_success(source: &str) -> Program {
        let (result, log) = parse_source(source);
        let program = result.expect("Parsing should succeed");
        assert_eq!(log.error_count(), 0, "unexpected error reports");
        program
    }

    /// エラーが記録されることを確認するヘルパー関数
    fn assert_parse_error(source: &str) {
        let (result, log) = parse_source(source);
        assert!(
            result.is_err() || log.has_errors(),
            "Parsing should report an error"
        );
    }

    /// 単一の式を解析するヘルパー関数
    fn parse_expr(source: &str) -> Expression {
        let (tokens, _) = Lexer::new(source).collect_tokens();
        let mut log = StdLog::new();
        let mut parser = Parser::new(tokens, Options::default(), &mut log);
        parser.parse_expression().expect("Expression should parse")
    }

    /// 関数本体の文リストを取り出すヘルパー関数
    fn body_of(program: &Program, index: usize) -> &Vec<Statement> {
        match &program.global_decls[index] {
            GlobalDecl::Function(func) => &func.body.as_ref().expect("function body").statements,
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    // ==================== グローバル宣言 ====================

    #[test]
    fn test_global_variable() {
        let program = assert_parse_success("float4 color;");

        assert_eq!(program.global_decls.len(), 1);
        if let GlobalDecl::VarDeclStmt(decl) = &program.global_decls[0] {
            assert_eq!(
                decl.var_type.base,
                TypeDenoter::Base(DataType::Vector(ScalarType::Float, 4))
            );
            assert_eq!(decl.var_decls.len(), 1);
            assert_eq!(decl.var_decls[0].name, "color");
        } else {
            panic!("Expected variable declaration");
        }
    }

    #[test]
    fn test_global_variable_with_modifiers() {
        let program = assert_parse_success("static const float PI = 3.14159;");

        if let GlobalDecl::VarDeclStmt(decl) = &program.global_decls[0] {
            assert_eq!(
                decl.var_type.storage_modifiers,
                vec![StorageModifier::Static]
            );
            assert_eq!(decl.var_type.type_modifiers, vec![TypeModifier::Const]);
            assert!(decl.var_decls[0].initializer.is_some());
        } else {
            panic!("Expected variable declaration");
        }
    }

    #[test]
    fn test_multiple_var_decls_share_type() {
        let program = assert_parse_success("float a = 1.0, b = 2.0, c;");

        if let GlobalDecl::VarDeclStmt(decl) = &program.global_decls[0] {
            assert_eq!(decl.var_decls.len(), 3);
            assert_eq!(decl.var_decls[0].name, "a");
            assert_eq!(decl.var_decls[1].name, "b");
            assert_eq!(decl.var_decls[2].name, "c");
            assert!(decl.var_decls[2].initializer.is_none());
        } else {
            panic!("Expected variable declaration");
        }
    }

    #[test]
    fn test_function_declaration() {
        let source = r#"
        float4 main(float4 position : POSITION, float2 uv : TEXCOORD0) : SV_Position {
            return position;
        }
        "#;
        let program = assert_parse_success(source);

        if let GlobalDecl::Function(func) = &program.global_decls[0] {
            assert_eq!(func.name, "main");
            assert_eq!(func.params.len(), 2);
            assert_eq!(func.semantic.as_deref(), Some("SV_Position"));
            assert!(func.body.is_some());

            let param = &func.params[0];
            assert_eq!(param.var_decls[0].name, "position");
            assert_eq!(
                param.var_decls[0].semantics,
                vec![VarSemantic::Semantic("POSITION".to_string())]
            );
        } else {
            panic!("Expected function declaration");
        }
    }

    #[test]
    fn test_function_prototype() {
        let program = assert_parse_success("float4 shade(float3 normal);");

        if let GlobalDecl::Function(func) = &program.global_decls[0] {
            assert_eq!(func.name, "shade");
            assert!(func.body.is_none());
        } else {
            panic!("Expected function prototype");
        }
    }

    #[test]
    fn test_void_function_no_params() {
        let program = assert_parse_success("void noop(void) { }");

        if let GlobalDecl::Function(func) = &program.global_decls[0] {
            assert_eq!(func.return_type.base, TypeDenoter::Void);
            assert!(func.params.is_empty());
        } else {
            panic!("Expected function declaration");
        }
    }

    #[test]
    fn test_param_modifiers() {
        let program = assert_parse_success("void f(inout float3 acc, uniform float scale) { }");

        if let GlobalDecl::Function(func) = &program.global_decls[0] {
            assert_eq!(
                func.params[0].var_type.storage_modifiers,
                vec![StorageModifier::InOut]
            );
            assert_eq!(
                func.params[1].var_type.storage_modifiers,
                vec![StorageModifier::Uniform]
            );
        } else {
            panic!("Expected function declaration");
        }
    }

    #[test]
    fn test_struct_declaration() {
        let source = r#"
        struct VS_INPUT {
            float4 position : POSITION;
            float2 texCoord : TEXCOORD0;
        };
        "#;
        let program = assert_parse_success(source);

        if let GlobalDecl::Struct(decl) = &program.global_decls[0] {
            assert_eq!(decl.name.as_deref(), Some("VS_INPUT"));
            assert_eq!(decl.members.len(), 2);
        } else {
            panic!("Expected struct declaration");
        }
    }

    #[test]
    fn test_cbuffer_with_multiple_idents() {
        // N個のカンマ区切り束縛対象は、それぞれが自身のアノテーションを
        // 独立して持つN個のエントリになる
        let source = r#"
        cbuffer PerFrame : register(b0), PerObject : register(b1) {
            float4x4 worldViewProj;
            float4 tint : packoffset(c4.x);
        };
        "#;
        let program = assert_parse_success(source);

        if let GlobalDecl::UniformBuffer(decl) = &program.global_decls[0] {
            assert_eq!(decl.kind, BufferKind::CBuffer);
            assert_eq!(decl.idents.len(), 2);
            assert_eq!(decl.idents[0].name, "PerFrame");
            assert_eq!(decl.idents[0].register_name.as_deref(), Some("b0"));
            assert_eq!(decl.idents[1].name, "PerObject");
            assert_eq!(decl.idents[1].register_name.as_deref(), Some("b1"));
            assert_eq!(decl.members.len(), 2);

            // packoffsetアノテーション
            if let Some(VarSemantic::PackOffset(po)) =
                decl.members[1].var_decls[0].semantics.first()
            {
                assert_eq!(po.register_name, "c4");
                assert_eq!(po.component, Some('x'));
            } else {
                panic!("Expected packoffset annotation");
            }
        } else {
            panic!("Expected uniform buffer declaration");
        }
    }

    #[test]
    fn test_tbuffer() {
        let program = assert_parse_success("tbuffer Lights { float4 lightDir; };");

        if let GlobalDecl::UniformBuffer(decl) = &program.global_decls[0] {
            assert_eq!(decl.kind, BufferKind::TBuffer);
            assert_eq!(decl.idents.len(), 1);
            assert!(decl.idents[0].register_name.is_none());
        } else {
            panic!("Expected uniform buffer declaration");
        }
    }

    #[test]
    fn test_texture_declaration() {
        let source = "Texture2D<float4> diffuseMap : register(t0), normalMap : register(t1);";
        let program = assert_parse_success(source);

        if let GlobalDecl::Texture(decl) = &program.global_decls[0] {
            assert_eq!(decl.texture_type, "Texture2D");
            assert_eq!(decl.format, Some(DataType::Vector(ScalarType::Float, 4)));
            assert_eq!(decl.idents.len(), 2);
            assert_eq!(decl.idents[1].register_name.as_deref(), Some("t1"));
        } else {
            panic!("Expected texture declaration");
        }
    }

    #[test]
    fn test_sampler_declaration() {
        let program = assert_parse_success("SamplerState samLinear : register(s0);");

        if let GlobalDecl::Sampler(decl) = &program.global_decls[0] {
            assert_eq!(decl.sampler_type, "SamplerState");
            assert_eq!(decl.idents[0].register_name.as_deref(), Some("s0"));
        } else {
            panic!("Expected sampler declaration");
        }
    }

    #[test]
    fn test_directive_declaration() {
        let program = assert_parse_success("#include \"common.hlsl\"\nfloat x;");

        assert_eq!(program.global_decls.len(), 2);
        if let GlobalDecl::Directive(decl) = &program.global_decls[0] {
            assert_eq!(decl.line, "#include \"common.hlsl\"");
        } else {
            panic!("Expected directive declaration");
        }
    }

    #[test]
    fn test_function_attributes() {
        let program = assert_parse_success("[numthreads(8, 8, 1)] void cs_main() { }");

        if let GlobalDecl::Function(func) = &program.global_decls[0] {
            assert_eq!(func.attribs.len(), 1);
            assert_eq!(func.attribs[0].name, "numthreads");
            assert_eq!(func.attribs[0].args.len(), 3);
        } else {
            panic!("Expected function declaration");
        }
    }

    #[test]
    fn test_array_dimensions() {
        let program = assert_parse_success("float weights[4][2];");

        if let GlobalDecl::VarDeclStmt(decl) = &program.global_decls[0] {
            assert_eq!(decl.var_decls[0].array_dims.len(), 2);
        } else {
            panic!("Expected variable declaration");
        }
    }

    // ==================== 予測的ディスパッチ ====================

    #[test]
    fn test_var_decl_vs_expr_statement() {
        // `int a;` は変数宣言文、`a;` は（宣言済みの型名aがなければ）
        // 変数アクセスを包む式文になる
        let source = r#"
        void f() {
            int a;
            a;
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        assert_eq!(statements.len(), 2);

        if let Statement::VarDecl(decl) = &statements[0] {
            assert_eq!(
                decl.var_type.base,
                TypeDenoter::Base(DataType::Scalar(ScalarType::Int))
            );
        } else {
            panic!("Expected variable declaration statement");
        }

        if let Statement::Expr(stmt) = &statements[1] {
            assert!(matches!(stmt.expr, Expression::VarAccess(_)));
        } else {
            panic!("Expected expression statement");
        }
    }

    #[test]
    fn test_user_defined_type_in_statement() {
        // 構造体名はレジストリに登録され、以降の宣言開始の分類に使われる
        let source = r#"
        struct Light { float3 dir; };
        void f() {
            Light l;
            l.dir = float3(0.0, 1.0, 0.0);
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 1);

        if let Statement::VarDecl(decl) = &statements[0] {
            assert_eq!(decl.var_type.base, TypeDenoter::Ident("Light".to_string()));
        } else {
            panic!("Expected variable declaration statement");
        }
        assert!(matches!(&statements[1], Statement::Expr(_)));
    }

    #[test]
    fn test_inline_struct_var_decl() {
        let source = r#"
        void f() {
            struct { float x; } tmp;
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        if let Statement::VarDecl(decl) = &statements[0] {
            assert!(matches!(decl.var_type.base, TypeDenoter::Struct(_)));
            assert_eq!(decl.var_decls[0].name, "tmp");
        } else {
            panic!("Expected variable declaration statement");
        }
    }

    // ==================== 文 ====================

    #[test]
    fn test_attribute_attached_to_for_loop() {
        // 属性は直後のfor文にのみ付与され、兄弟の文には付かない
        let source = r#"
        void f() {
            [unroll] for (int i = 0; i < 4; i++) {
                g();
            }
            return;
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        assert_eq!(statements.len(), 2);

        if let Statement::For(stmt) = &statements[0] {
            assert_eq!(stmt.attribs.len(), 1);
            assert_eq!(stmt.attribs[0].name, "unroll");
            assert!(stmt.init.is_some());
            assert!(stmt.condition.is_some());
            assert!(stmt.update.is_some());
        } else {
            panic!("Expected for loop statement");
        }

        assert!(matches!(&statements[1], Statement::Return(_)));
    }

    #[test]
    fn test_while_and_do_while() {
        let source = r#"
        void f() {
            while (x > 0) x--;
            do { x++; } while (x < 10);
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        assert!(matches!(&statements[0], Statement::While(_)));
        if let Statement::DoWhile(stmt) = &statements[1] {
            assert!(matches!(*stmt.body, Statement::CodeBlock(_)));
        } else {
            panic!("Expected do-while statement");
        }
    }

    #[test]
    fn test_if_else_chain() {
        let source = r#"
        void f() {
            if (a) x = 1;
            else if (b) x = 2;
            else x = 3;
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        if let Statement::If(stmt) = &statements[0] {
            // elseは独立したノードとしてifに連結される
            let else_branch = stmt.else_branch.as_ref().expect("else branch");
            if let Statement::If(nested) = else_branch.body.as_ref() {
                assert!(nested.else_branch.is_some());
            } else {
                panic!("Expected nested if in else branch");
            }
        } else {
            panic!("Expected if statement");
        }
    }

    #[test]
    fn test_switch_statement() {
        let source = r#"
        void f() {
            switch (mode) {
                case 0:
                    x = 1;
                    break;
                case 1 + 1:
                    break;
                default:
                    discard;
            }
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        if let Statement::Switch(stmt) = &statements[0] {
            assert_eq!(stmt.cases.len(), 3);
            assert!(stmt.cases[0].expr.is_some());
            assert_eq!(stmt.cases[0].statements.len(), 2);
            assert!(stmt.cases[2].expr.is_none());
            assert!(matches!(
                &stmt.cases[2].statements[0],
                Statement::CtrlTransfer(s) if s.kind == CtrlTransfer::Discard
            ));
        } else {
            panic!("Expected switch statement");
        }
    }

    #[test]
    fn test_ctrl_transfer_statements() {
        let source = r#"
        void f() {
            while (true) {
                break;
                continue;
            }
            discard;
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        if let Statement::While(stmt) = &statements[0] {
            if let Statement::CodeBlock(block) = stmt.body.as_ref() {
                assert!(matches!(
                    &block.statements[0],
                    Statement::CtrlTransfer(s) if s.kind == CtrlTransfer::Break
                ));
                assert!(matches!(
                    &block.statements[1],
                    Statement::CtrlTransfer(s) if s.kind == CtrlTransfer::Continue
                ));
            } else {
                panic!("Expected code block");
            }
        } else {
            panic!("Expected while statement");
        }
    }

    #[test]
    fn test_null_statement() {
        let program = assert_parse_success("void f() { ; }");
        let statements = body_of(&program, 0);

        assert!(matches!(&statements[0], Statement::Null(_)));
    }

    #[test]
    fn test_for_with_comma_update() {
        let source = r#"
        void f() {
            for (i = 0, j = 4; i < j; i++, j--) { }
        }
        "#;
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        if let Statement::For(stmt) = &statements[0] {
            if let Some(Statement::Expr(init)) = stmt.init.as_deref() {
                assert!(matches!(&init.expr, Expression::List(list) if list.exprs.len() == 2));
            } else {
                panic!("Expected expression init");
            }
            assert!(matches!(
                stmt.update.as_ref(),
                Some(Expression::List(list)) if list.exprs.len() == 2
            ));
        } else {
            panic!("Expected for loop statement");
        }
    }

    #[test]
    fn test_comment_statement_with_preserve_option() {
        let options = Options {
            preserve_comments: true,
            ..Options::default()
        };
        let source = r#"
        void f() {
            // 注釈
            return;
        }
        "#;
        let (result, log) = parse_source_with(source, options);
        let program = result.expect("Parsing should succeed");
        assert_eq!(log.error_count(), 0);

        let statements = body_of(&program, 0);
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Statement::Comment(_)));
        assert!(matches!(&statements[1], Statement::Return(_)));
    }

    #[test]
    fn test_directive_statement() {
        let source = "void f() {\n#line 42\nreturn;\n}";
        let program = assert_parse_success(source);
        let statements = body_of(&program, 0);

        assert!(matches!(&statements[0], Statement::Directive(_)));
    }

    // ==================== 式 ====================

    #[test]
    fn test_precedence_multiplication_binds_tighter() {
        let expr = parse_expr("1 + 2 * 3");

        if let Expression::Binary(add) = expr {
            assert_eq!(add.op, BinaryOp::Add);
            if let Expression::Binary(mul) = add.right.as_ref() {
                assert_eq!(mul.op, BinaryOp::Multiply);
            } else {
                panic!("Expected multiplication on the right");
            }
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_precedence_shift_vs_relational() {
        let expr = parse_expr("a << 2 < b");

        if let Expression::Binary(cmp) = expr {
            assert_eq!(cmp.op, BinaryOp::Lt);
            assert!(matches!(
                cmp.left.as_ref(),
                Expression::Binary(shl) if shl.op == BinaryOp::Shl
            ));
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_ternary_expression() {
        let expr = parse_expr("a > 0 ? 1.0 : -1.0");

        assert!(matches!(expr, Expression::Ternary(_)));
    }

    #[test]
    fn test_assignment_right_associative() {
        let expr = parse_expr("a = b = 1");

        if let Expression::Assign(outer) = expr {
            assert_eq!(outer.op, AssignOp::Assign);
            assert!(matches!(outer.value.as_ref(), Expression::Assign(_)));
        } else {
            panic!("Expected assignment expression");
        }
    }

    #[test]
    fn test_compound_assignment() {
        let expr = parse_expr("color.a *= 0.5");

        if let Expression::Assign(assign) = expr {
            assert_eq!(assign.op, AssignOp::Multiply);
            assert!(matches!(assign.target.as_ref(), Expression::VarAccess(_)));
        } else {
            panic!("Expected assignment expression");
        }
    }

    #[test]
    fn test_chained_var_access() {
        // `buf.data[i].x` は3セグメントの識別子チェーンを持つ
        // 1つの変数アクセス式になる
        let expr = parse_expr("buf.data[i].x");

        if let Expression::VarAccess(access) = expr {
            assert_eq!(access.ident.segments.len(), 3);
            assert_eq!(access.ident.segments[0].ident, "buf");
            assert!(access.ident.segments[0].array_indices.is_empty());
            assert_eq!(access.ident.segments[1].ident, "data");
            assert_eq!(access.ident.segments[1].array_indices.len(), 1);
            assert_eq!(access.ident.segments[2].ident, "x");
        } else {
            panic!("Expected variable access expression");
        }
    }

    #[test]
    fn test_method_style_call() {
        let expr = parse_expr("diffuseMap.Sample(samLinear, uv)");

        if let Expression::Call(call) = expr {
            assert_eq!(call.name.segments.len(), 2);
            assert_eq!(call.name.segments[1].ident, "Sample");
            assert_eq!(call.args.len(), 2);
        } else {
            panic!("Expected function call expression");
        }
    }

    #[test]
    fn test_type_constructor_call() {
        let expr = parse_expr("float3(1.0, 0.0, 0.0)");

        if let Expression::Call(call) = expr {
            assert_eq!(call.name.segments[0].ident, "float3");
            assert_eq!(call.args.len(), 3);
        } else {
            panic!("Expected type constructor call");
        }
    }

    #[test]
    fn test_cast_expression() {
        let expr = parse_expr("(float)x");

        if let Expression::Cast(cast) = expr {
            assert_eq!(
                cast.target_type.base,
                TypeDenoter::Base(DataType::Scalar(ScalarType::Float))
            );
        } else {
            panic!("Expected cast expression");
        }
    }

    #[test]
    fn test_bracket_expression() {
        let expr = parse_expr("(x + y) * 2");

        if let Expression::Binary(mul) = expr {
            assert!(matches!(mul.left.as_ref(), Expression::Bracket(_)));
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_cast_to_user_defined_type() {
        // 宣言済みの型名と`)`が続く場合のみキャストに確定する
        let source = r#"
        struct Wrapped { float v; };
        void f() {
            Wrapped w = (Wrapped)y;
        }
        "#;
        assert_parse_success(source);
    }

    #[test]
    fn test_unary_expressions() {
        assert!(matches!(
            parse_expr("-x"),
            Expression::Unary(e) if e.op == UnaryOp::Negate
        ));
        assert!(matches!(
            parse_expr("!flag"),
            Expression::Unary(e) if e.op == UnaryOp::Not
        ));
        assert!(matches!(
            parse_expr("~bits"),
            Expression::Unary(e) if e.op == UnaryOp::BitNot
        ));
        assert!(matches!(
            parse_expr("++i"),
            Expression::Unary(e) if e.op == UnaryOp::PreInc
        ));
        assert!(matches!(
            parse_expr("i++"),
            Expression::Unary(e) if e.op == UnaryOp::PostInc
        ));
    }

    #[test]
    fn test_initializer_list_with_trailing_comma() {
        // 初期化子リストでは終端記号の直前のカンマが許される
        let program = assert_parse_success("float2 v = { 0.0, 1.0, };");

        if let GlobalDecl::VarDeclStmt(decl) = &program.global_decls[0] {
            if let Some(Expression::Initializer(init)) = &decl.var_decls[0].initializer {
                assert_eq!(init.elements.len(), 2);
            } else {
                panic!("Expected initializer expression");
            }
        } else {
            panic!("Expected variable declaration");
        }
    }

    #[test]
    fn test_nested_initializer() {
        let program = assert_parse_success("float2x2 m = { { 1.0, 0.0 }, { 0.0, 1.0 } };");

        if let GlobalDecl::VarDeclStmt(decl) = &program.global_decls[0] {
            if let Some(Expression::Initializer(init)) = &decl.var_decls[0].initializer {
                assert_eq!(init.elements.len(), 2);
                assert!(matches!(init.elements[0], Expression::Initializer(_)));
            } else {
                panic!("Expected initializer expression");
            }
        } else {
            panic!("Expected variable declaration");
        }
    }

    #[test]
    fn test_trailing_comma_in_arguments_rejected_by_default() {
        assert_parse_error("void f() { g(1, 2,); }");
    }

    #[test]
    fn test_trailing_comma_in_arguments_with_extensions() {
        let options = Options {
            allow_extensions: true,
            ..Options::default()
        };
        let (result, log) = parse_source_with("void f() { g(1, 2,); }", options);

        assert!(result.is_ok());
        assert_eq!(log.error_count(), 0);
    }

    #[test]
    fn test_string_literal_expression() {
        let expr = parse_expr(r#""debug message""#);

        assert!(matches!(
            expr,
            Expression::Literal(lit) if lit.value == Literal::String("debug message".to_string())
        ));
    }
}
