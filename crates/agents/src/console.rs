use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use anyhow::{Context, Result};

pub const BOT_PREFIX: &str = "Bot: ";

/// Line-oriented port between the assistant and whoever is typing.
pub trait Console {
    /// Shows `prompt` and reads one line, trimmed. `None` once input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Writes `line` verbatim.
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Writes a bot utterance.
    fn say(&mut self, message: &str) -> Result<()> {
        self.write_line(&format!("{BOT_PREFIX}{message}"))
    }
}

pub struct StdConsole<R, W> {
    input: R,
    output: W,
}

impl StdConsole<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("failed writing prompt")?;
        self.output.flush().context("failed flushing prompt")?;

        // bytes, not `read_line`: undecodable input becomes U+FFFD instead of an error
        let mut raw = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut raw)
            .context("failed reading console input")?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&raw).trim().to_string()))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").context("failed writing console output")
    }
}

/// Replays canned input lines and records everything shown, prompts included.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Bot utterances with the prefix stripped.
    pub fn bot_lines(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|line| line.strip_prefix(BOT_PREFIX))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.transcript
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let Some(line) = self.inputs.pop_front() else {
            return Ok(None);
        };
        let line = line.trim().to_string();
        self.transcript.push(format!("{prompt}{line}"));
        Ok(Some(line))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }
}
