//! Legacy `key=value` snapshot format
//!
//! One entry per line; the first `=` is the delimiter, the value is
//! everything after it. No escaping, so keys containing `=` and values
//! containing newlines are not representable.

use std::collections::HashMap;

pub(crate) fn encode(entries: &HashMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

pub(crate) fn decode(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
