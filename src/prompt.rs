//! Line-based operator I/O.
//!
//! Flows talk to the operator only through [`Prompter`], so tests can script
//! answers and capture output. End of input (Ctrl-D, or a closed pipe) comes
//! back as `None` and is treated by every flow as an operator interrupt.
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

pub trait Prompter {
    /// Show `prompt` and read one line without its trailing newline.
    /// Returns `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Print one line of output.
    fn say(&mut self, line: &str) -> Result<()>;
}

/// Ask a yes/no question. Only `y`/`yes` (any case) count as yes; `None`
/// means the operator interrupted.
pub fn confirm(prompter: &mut dyn Prompter, question: &str) -> Result<Option<bool>> {
    let answer = prompter.ask(&format!("{question} (y/n): "))?;
    Ok(answer.map(|text| is_yes(&text)))
}

pub fn is_yes(text: &str) -> bool {
    matches!(text.trim().to_lowercase().as_str(), "y" | "yes")
}

pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("read operator input")?;
        if read == 0 {
            // Keep the next output off the prompt line.
            writeln!(self.output).context("write newline")?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed.to_string()))
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").context("write output")
    }
}

/// Prompter fed from a fixed list of answers, recording everything shown.
#[cfg(test)]
pub(crate) struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub(crate) transcript: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub(crate) fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub(crate) fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub(crate) fn count(&self, needle: &str) -> usize {
        self.transcript
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn say(&mut self, line: &str) -> Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }
}
