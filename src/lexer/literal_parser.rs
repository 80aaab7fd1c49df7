//! リテラルの解析

/// 文字列のエスケープシーケンスを処理
pub fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('u') => {
                // Unicodeエスケープ（\u{NNNN}）
                let rest: String = chars.clone().collect();
                match parse_unicode_escape(&rest) {
                    Some((ch, consumed)) => {
                        result.push(ch);
                        for _ in 0..consumed {
                            chars.next();
                        }
                    }
                    None => result.push_str("\\u"),
                }
            }
            Some(c) => {
                // 認識されないエスケープはそのまま残す
                result.push('\\');
                result.push(c);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// `{NNNN}` を解析し、文字と消費した文字数を返す
fn parse_unicode_escape(rest: &str) -> Option<(char, usize)> {
    let body = rest.strip_prefix('{')?;
    let end = body.find('}')?;
    let hex = &body[..end];
    let code = u32::from_str_radix(hex, 16).ok()?;
    let ch = char::from_u32(code)?;
    Some((ch, hex.chars().count() + 2))
}

/// 正規表現リテラル `~/.../` の本体を取り出す（`\/` のみ展開）
pub fn regex_body(slice: &str) -> String {
    slice[2..slice.len() - 1].replace("\\/", "/")
}
