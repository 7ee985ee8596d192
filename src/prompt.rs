//! Interactive input behind a trait.
//!
//! Resolvers ask a [`Prompt`] for missing values instead of reading the
//! terminal directly, so tests can answer with fixed strings.

use std::io::{self, BufRead, Write};

/// Source of interactive answers.
pub trait Prompt {
    /// Asks a question whose answer is echoed as typed.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Asks a question whose answer is not echoed.
    fn read_password(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads answers from the controlling terminal.
///
/// Prompts are written to stderr so stdout stays clean for the policy
/// listing.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for input",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_password(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}
