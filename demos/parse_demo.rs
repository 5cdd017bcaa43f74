//! Demonstrates parsing HLSL source code and collecting diagnostics

use hlslfront::frontend;
use hlslfront::log::StdLog;
use hlslfront::options::Options;

fn main() {
    env_logger::init();

    let examples = vec![
        (
            "Constant buffer and function",
            r#"cbuffer PerFrame : register(b0) {
    float4x4 worldViewProj;
};

float4 VS(float4 position : POSITION) : SV_Position {
    return mul(worldViewProj, position);
}"#,
        ),
        (
            "Struct and attributes",
            r#"struct VS_OUTPUT {
    float4 position : SV_Position;
    float2 texCoord : TEXCOORD0;
};

float4 PS(VS_OUTPUT input) : SV_Target {
    float4 color = float4(0.0, 0.0, 0.0, 1.0);
    [unroll]
    for (int i = 0; i < 4; i++) {
        color.r += 0.25;
    }
    return color;
}"#,
        ),
        (
            "Recovered syntax error",
            r#"void broken() {
    float a = 1.0
    float b = 2.0;
}"#,
        ),
    ];

    for (name, code) in examples {
        println!("\n=== {} ===", name);
        println!("Code:\n{}\n", code);

        let mut log = StdLog::new();
        match frontend::parse_source_unit("demo.hlsl", code, &Options::default(), &mut log) {
            Some(program) => {
                println!("✓ Parsed {} global declaration(s)", program.global_decls.len());
                if log.has_errors() {
                    println!("  ... with {} recovered error(s):", log.error_count());
                    log.print_all(true);
                }
            }
            None => {
                println!("✗ Parsing aborted");
                log.print_all(true);
            }
        }
    }
}
