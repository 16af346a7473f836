//! Snapshot serialization for the store
//!
//! Two on-disk formats are supported: a brace-delimited quoted format
//! (canonical) and a legacy `key=value` line format. Saving uses the
//! configured format; loading detects the format from the file itself.

pub mod json;
pub mod line;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// On-disk snapshot format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One quoted `"key": "value"` entry per line between braces
    #[default]
    Json,
    /// One `key=value` entry per line
    Line,
}

/// Encode all entries in the given format
pub fn encode(format: Format, entries: &HashMap<String, String>) -> String {
    match format {
        Format::Json => json::encode(entries),
        Format::Line => line::encode(entries),
    }
}

/// Decode a snapshot, detecting the format from its first non-blank line.
/// Unparsable records are skipped.
pub fn decode(text: &str) -> Vec<(String, String)> {
    match detect(text) {
        Format::Json => json::decode(text),
        Format::Line => line::decode(text),
    }
}

fn detect(text: &str) -> Format {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        return if line == "{" { Format::Json } else { Format::Line };
    }
    Format::Line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_json() {
        assert_eq!(detect("{\n  \"a\": \"1\"\n}\n"), Format::Json);
        assert_eq!(detect("\n  \n{\n}\n"), Format::Json);
    }

    #[test]
    fn test_detect_line() {
        assert_eq!(detect("a=1\nb=2\n"), Format::Line);
        assert_eq!(detect(""), Format::Line);
    }

    #[test]
    fn test_decode_dispatches_on_format() {
        let json = "{\n  \"a\": \"1\"\n}\n";
        assert_eq!(decode(json), vec![("a".to_string(), "1".to_string())]);

        let line = "a=1\n";
        assert_eq!(decode(line), vec![("a".to_string(), "1".to_string())]);
    }
}
