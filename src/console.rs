//! Line-oriented terminal access for the interactive session.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tracing::{debug, instrument};

/// Where the session reads answers and writes messages.
#[async_trait]
pub trait Console: Send {
    /// Shows `prompt` and waits for one line. `Ok(None)` once input is exhausted.
    async fn prompt(&mut self, prompt: &str) -> std::io::Result<Option<String>>;

    /// Writes `text` followed by a newline.
    async fn say(&mut self, text: &str) -> std::io::Result<()>;
}

/// Console over the process's stdin and stdout.
#[derive(Debug)]
pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl StdConsole {
    /// Wraps the process streams.
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: tokio::io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn prompt(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        self.lines.next_line().await
    }

    async fn say(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }
}

/// Console fed from a fixed list of answers, recording everything shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    /// Creates a console that will answer prompts with `answers`, in order.
    #[instrument(skip(answers))]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Every prompt and message shown so far.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// The transcript joined with newlines.
    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn prompt(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        let answer = self.answers.pop_front();
        debug!(?answer, "Scripted answer");
        Ok(answer)
    }

    async fn say(&mut self, text: &str) -> std::io::Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }
}
