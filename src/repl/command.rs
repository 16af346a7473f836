use thiserror::Error;

use crate::repl::reply::Reply;
use crate::snapshot::Format;
use crate::store::Store;

/// Hint printed after an unknown command
pub const COMMAND_HINT: &str =
    "available commands: set <key> <value>, get <key>, remove <key>, list, clear, \
     save <file>, load <file>, exit";

/// A parsed interpreter command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { key: String, value: String },
    Get { key: String },
    Remove { key: String },
    List,
    Clear,
    Save { path: String },
    Load { path: String },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Blank input, nothing to do
    #[error("empty input")]
    Empty,
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command: {0}")]
    Unknown(String),
}

impl Command {
    /// Parse one input line into a command.
    ///
    /// The `set` value is everything after the key, trimmed, so it may
    /// contain spaces. Other verbs take their first whitespace-separated
    /// token and ignore the rest.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }
        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest),
            None => (input, ""),
        };

        match verb {
            "set" => {
                let rest = rest.trim_start();
                let (key, value) = match rest.split_once(char::is_whitespace) {
                    Some((key, value)) => (key, value.trim()),
                    None => (rest, ""),
                };
                if key.is_empty() || value.is_empty() {
                    return Err(ParseError::Usage("set <key> <value>"));
                }
                Ok(Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
            "get" => one_arg(rest, "get <key>").map(|key| Command::Get { key }),
            "remove" => one_arg(rest, "remove <key>").map(|key| Command::Remove { key }),
            "list" => Ok(Command::List),
            "clear" => Ok(Command::Clear),
            "save" => one_arg(rest, "save <file>").map(|path| Command::Save { path }),
            "load" => one_arg(rest, "load <file>").map(|path| Command::Load { path }),
            "exit" => Ok(Command::Exit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }

    /// Execute the command against the store and produce a reply.
    ///
    /// `format` is the snapshot format used by `save`; `load` detects the
    /// format from the file.
    pub fn execute(&self, store: &Store, format: Format) -> Reply {
        match self {
            Command::Set { key, value } => {
                match store.set(key.clone(), value.clone()) {
                    Ok(()) => Reply::None,
                    Err(e) => Reply::Error(e.to_string()),
                }
            }
            Command::Get { key } => match store.get(key) {
                Ok(Some(value)) => Reply::Value {
                    key: key.clone(),
                    value,
                },
                Ok(None) => Reply::NotFound,
                Err(e) => Reply::Error(e.to_string()),
            },
            Command::Remove { key } => match store.remove(key) {
                Ok(()) => Reply::None,
                Err(e) => Reply::Error(e.to_string()),
            },
            Command::List => match store.entries() {
                Ok(entries) => Reply::Listing(entries),
                Err(e) => Reply::Error(e.to_string()),
            },
            Command::Clear => match store.clear() {
                Ok(()) => Reply::None,
                Err(e) => Reply::Error(e.to_string()),
            },
            Command::Save { path } => match store.save(path, format) {
                Ok(()) => Reply::None,
                Err(e) => Reply::Error(e.to_string()),
            },
            Command::Load { path } => match store.load(path) {
                Ok(()) => Reply::None,
                Err(e) => Reply::Error(e.to_string()),
            },
            // The session breaks out of its loop before executing Exit
            Command::Exit => Reply::None,
        }
    }
}

fn one_arg(rest: &str, usage: &'static str) -> Result<String, ParseError> {
    match rest.split_whitespace().next() {
        Some(arg) => Ok(arg.to_string()),
        None => Err(ParseError::Usage(usage)),
    }
}
