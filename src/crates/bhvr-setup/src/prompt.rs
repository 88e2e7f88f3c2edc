//! Operator input
//!
//! The setup flow has exactly one interactive question (the database name),
//! but the orchestrator talks to a trait so tests can script replies
//! without a TTY.

use std::io::{self, BufRead, Write};

/// Source of one-line operator replies
pub trait PromptInput {
    /// Ask a question and return the trimmed reply
    ///
    /// Returns an empty string when the operator just presses enter; the
    /// caller substitutes its own default in that case.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// Real prompt backed by stdin/stdout
pub struct StdinPrompt;

impl PromptInput for StdinPrompt {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        read_response(&mut io::stdin().lock())
    }
}

/// Read and trim a single line from any buffered reader
pub fn read_response<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut input = String::new();
    reader.read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_response_trims_whitespace() {
        let mut input = Cursor::new("  my-db  \n");
        assert_eq!(read_response(&mut input).unwrap(), "my-db");
    }

    #[test]
    fn test_read_response_empty_line() {
        let mut input = Cursor::new("\n");
        assert_eq!(read_response(&mut input).unwrap(), "");
    }

    #[test]
    fn test_read_response_eof() {
        let mut input = Cursor::new("");
        assert_eq!(read_response(&mut input).unwrap(), "");
    }
}
