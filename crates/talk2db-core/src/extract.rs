use regex::Regex;
use std::sync::OnceLock;

const FENCE: &str = "```";

/// Language tags accepted on the opener line when the statement follows on the same line.
const INLINE_HINTS: &[&str] = &[
    "sql", "tsql", "t-sql", "mssql", "sqlite", "mysql", "postgres", "postgresql", "plpgsql", "plsql",
];

fn fence_opener() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ``` with an optional language hint, alone on its line
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_+.-]*[ \t]*\r?\n").expect("valid regex"))
}

/// Strip markdown code fences and surrounding whitespace from model output.
///
/// Handles:
/// - ```sql ... ```
/// - ``` ... ```
/// - ```SELECT 1``` (fences on the same line)
/// - ```sql SELECT 1``` (known language tag on the statement line)
///
/// Text without fences only gets trimmed. Applied until nothing changes, so
/// `extract_sql(extract_sql(x)) == extract_sql(x)`.
pub fn extract_sql(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let next = strip_once(current);
        if next == current {
            return current.to_string();
        }
        current = next;
    }
}

fn strip_once(text: &str) -> &str {
    let mut s = text;
    if let Some(m) = fence_opener().find(s) {
        s = &s[m.end()..];
    } else if let Some(rest) = s.strip_prefix(FENCE) {
        s = strip_inline_hint(rest);
    }
    if let Some(rest) = s.strip_suffix(FENCE) {
        s = rest;
    }
    s.trim()
}

fn strip_inline_hint(text: &str) -> &str {
    match text.split_once([' ', '\t']) {
        Some((tag, rest)) if INLINE_HINTS.iter().any(|h| h.eq_ignore_ascii_case(tag)) => rest,
        _ => text,
    }
}
