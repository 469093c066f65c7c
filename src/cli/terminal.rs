//! Line-oriented input and output.

use crate::{
    core::{confirm::Confirm, status::Status},
    errors::Result,
};
use std::io::{BufRead, Write};
use tracing::warn;

/// Reads answers from `input` and writes prompts and results to `output`.
#[derive(Debug)]
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Wraps an input/output pair.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `question` and reads one line. `None` means end of input.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Writes a block of text followed by a newline.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text.trim_end_matches('\n'))?;
        Ok(())
    }

    /// Writes a status line.
    pub fn report(&mut self, status: &Status) -> Result<()> {
        self.say(&status.to_string())
    }

    /// Gives back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Confirm for Terminal<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.ask(&format!("{prompt} (yes/no): ")) {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "yes" | "y"),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read confirmation, treating it as no: {}", e);
                false
            }
        }
    }
}
