use std::io::{self, Write};

/// Result of executing a command, rendered to the session's output
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Completed without printable output (mutations log instead)
    None,
    /// A found value for `get`
    Value { key: String, value: String },
    /// `get` on an absent key
    NotFound,
    /// All entries for `list`
    Listing(Vec<(String, String)>),
    /// Operation failed; the store has already logged the details
    Error(String),
}

impl Reply {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Reply::None => Ok(()),
            Reply::Value { key, value } => writeln!(out, "{} = {}", key, value),
            Reply::NotFound => writeln!(out, "not found"),
            Reply::Listing(entries) => {
                if entries.is_empty() {
                    return writeln!(out, "(empty)");
                }
                for (key, value) in entries {
                    writeln!(out, "- {}: {}", key, value)?;
                }
                Ok(())
            }
            Reply::Error(msg) => writeln!(out, "error: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(reply: Reply) -> String {
        let mut out = Vec::new();
        reply.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_value() {
        let reply = Reply::Value {
            key: "name".to_string(),
            value: "Ada".to_string(),
        };
        assert_eq!(render(reply), "name = Ada\n");
    }

    #[test]
    fn test_render_not_found() {
        assert_eq!(render(Reply::NotFound), "not found\n");
    }

    #[test]
    fn test_render_listing() {
        let reply = Reply::Listing(vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        assert_eq!(render(reply), "- a: 1\n- b: 2\n");
    }

    #[test]
    fn test_render_empty_listing() {
        assert_eq!(render(Reply::Listing(Vec::new())), "(empty)\n");
    }

    #[test]
    fn test_render_none_is_silent() {
        assert_eq!(render(Reply::None), "");
    }
}
