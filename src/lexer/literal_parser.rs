//! リテラルの解析

/// 文字列のエスケープシーケンスを処理
pub fn unescape_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some('0') => result.push('\0'),
                Some('x') => {
                    // 16進数エスケープ（\xNN）
                    let mut hex = String::new();
                    if let Some(h1) = chars.next() {
                        hex.push(h1);
                    }
                    if let Some(h2) = chars.next() {
                        hex.push(h2);
                    }
                    if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                        result.push(byte as char);
                    } else {
                        // 無効な16進数エスケープはそのまま残す
                        result.push('\\');
                        result.push('x');
                        result.push_str(&hex);
                    }
                }
                Some(c) => {
                    // 認識されないエスケープシーケンス
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'), // 文字列の終端
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// 整数リテラルを解析（10進・16進、u/U/l/Lサフィックス付き）
pub fn parse_int_literal(s: &str) -> Option<i64> {
    let stripped = s.trim_end_matches(['u', 'U', 'l', 'L']);

    if let Some(hex) = stripped
        .strip_prefix("0x")
        .or_else(|| stripped.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()
    } else {
        stripped.parse::<i64>().ok()
    }
}

/// 浮動小数点リテラルを解析（f/F/h/Hサフィックス付き）
pub fn parse_float_literal(s: &str) -> Option<f64> {
    let stripped = s.trim_end_matches(['f', 'F', 'h', 'H']);

    // Rustのf64パーサーが受け付けない ".5" や "1." を補正する
    let normalized = if stripped.starts_with('.') {
        format!("0{}", stripped)
    } else if stripped.ends_with('.') {
        format!("{}0", stripped)
    } else {
        stripped.to_string()
    };

    normalized.parse::<f64>().ok()
}
