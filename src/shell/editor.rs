//! Line editing for interactive terminals.
//!
//! History lives only as long as the editor; nothing is written to disk.

use rustyline::error::ReadlineError;
use rustyline::history::History;

/// One read from the line editor, after signal handling.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Eof,
}

/// Ctrl-D ends the session, Ctrl-C abandons the current line.
pub fn classify(read: Result<String, ReadlineError>) -> Result<Input, ReadlineError> {
    match read {
        Ok(line) => Ok(Input::Line(line)),
        Err(ReadlineError::Interrupted) => Ok(Input::Line(String::new())),
        Err(ReadlineError::Eof) => Ok(Input::Eof),
        Err(e) => Err(e),
    }
}

/// Adds a non-blank line to `history`. Returns whether it was stored.
pub fn remember<H: History>(history: &mut H, line: &str) -> rustyline::Result<bool> {
    if line.trim().is_empty() {
        return Ok(false);
    }
    history.add(line)
}
