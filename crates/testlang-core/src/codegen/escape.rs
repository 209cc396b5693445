//! String literal escaping for generated source.
//!
//! Both targets share the same double-quoted literal syntax for the
//! characters that matter here, so one escaper serves both.

/// Escapes `\`, `"`, newline, carriage return and tab.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// `text` as a double-quoted, escaped literal.
pub fn quoted(text: &str) -> String {
    format!("\"{}\"", escape(text))
}
