//! Brace-delimited quoted snapshot format (canonical)
//!
//! ```text
//! {
//!   "key1": "value1",
//!   "key2": "value2"
//! }
//! ```
//!
//! Only `"` and `\` are escaped; entries never span lines, so values
//! containing newlines are not representable. Loading is line-oriented
//! rather than a full JSON parse, and unescapes the same two sequences
//! that saving produces.

use std::collections::HashMap;

pub(crate) fn encode(entries: &HashMap<String, String>) -> String {
    let mut out = String::from("{\n");
    let total = entries.len();
    for (i, (key, value)) in entries.iter().enumerate() {
        out.push_str("  \"");
        out.push_str(&escape(key));
        out.push_str("\": \"");
        out.push_str(&escape(value));
        out.push('"');
        if i + 1 < total {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

pub(crate) fn decode(text: &str) -> Vec<(String, String)> {
    text.lines().filter_map(parse_entry).collect()
}

/// Parse one `"key": "value"` line; `None` for braces, blank lines and
/// anything without a `:` separator.
fn parse_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim_matches([' ', '\t', '\r', '\n']);
    if line.is_empty() || line == "{" || line == "}" {
        return None;
    }
    let (key, value) = line.split_once(':')?;

    let key = strip_quotes(key.trim());

    let mut value = value.trim();
    value = value.strip_prefix('"').unwrap_or(value);
    value = value.strip_suffix(',').unwrap_or(value);
    value = value.strip_suffix('"').unwrap_or(value);

    Some((unescape(key), unescape(value)))
}

fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            // Unknown escape, keep it verbatim
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
