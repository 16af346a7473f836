use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::error;

use crate::repl::command::{COMMAND_HINT, Command, ParseError};
use crate::snapshot::Format;
use crate::store::Store;

/// Interactive line-oriented session over a store
///
/// Reads one line at a time, dispatches at most one store operation per
/// line, and keeps going until `exit` or end of input. Every error is
/// recovered at the point of occurrence; nothing here terminates the
/// process.
pub struct Session {
    store: Arc<Store>,
    prompt: String,
    format: Format,
}

impl Session {
    pub fn new(store: Arc<Store>, prompt: String, format: Format) -> Self {
        Self {
            store,
            prompt,
            format,
        }
    }

    /// Run the loop until `exit` or EOF
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<()> {
        let mut line = String::new();
        loop {
            output.write_all(self.prompt.as_bytes())?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                // EOF behaves like `exit`
                break;
            }

            match Command::parse(&line) {
                Ok(Command::Exit) => break,
                Ok(cmd) => cmd.execute(&self.store, self.format).write_to(&mut output)?,
                Err(ParseError::Empty) => continue,
                Err(err @ ParseError::Usage(_)) => error!("{}", err),
                Err(err @ ParseError::Unknown(_)) => {
                    error!("{}", err);
                    writeln!(output, "{}", COMMAND_HINT)?;
                }
            }
        }
        Ok(())
    }
}
