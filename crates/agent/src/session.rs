//! The session loop: read a line, decide what it is, answer it, repeat.
//!
//! Per line, in order:
//!
//! 1. trim it;
//! 2. a whole-line termination keyword (case-insensitive) ends the session
//!    with a goodbye line;
//! 3. an empty line is skipped and the user is prompted again;
//! 4. anything else is one turn for the responder, answered with exactly
//!    one line prefixed by the bot label.
//!
//! The keyword check is exact on the whole line. A farewell phrase inside a
//! sentence ("goodbye party") is an ordinary turn.

use rustbot_config::AppConfig;
use rustbot_core::channel::Channel;
use rustbot_core::responder::{Responder, Strategy};
use rustbot_core::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The user typed a termination keyword
    Terminated,
    /// The input source was exhausted
    InputClosed,
}

/// Counters for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Lines handed to the responder
    pub turns: u64,
    /// Empty lines skipped
    pub skipped: u64,
    /// Turns whose responder failed
    pub failed: u64,
}

/// What one input line amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// End the session after printing this line
    Exit(String),
    /// Nothing to answer; prompt again
    Skip,
    /// Print this line and continue
    Reply(String),
}

/// Drives one conversation over a channel with a fixed responder.
pub struct SessionLoop {
    responder: Box<dyn Responder>,
    label: String,
    termination_keywords: Vec<String>,
    goodbye: String,
    prompt: String,
    stats: SessionStats,
}

impl SessionLoop {
    /// Create a loop with default labels and keywords.
    pub fn new(responder: Box<dyn Responder>) -> Self {
        Self::from_config(responder, &AppConfig::default())
    }

    pub fn from_config(responder: Box<dyn Responder>, config: &AppConfig) -> Self {
        Self {
            responder,
            label: config.bot_label.clone(),
            termination_keywords: config
                .session
                .termination_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .collect(),
            goodbye: config.session.goodbye.clone(),
            prompt: config.session.prompt.clone(),
            stats: SessionStats::default(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.responder.strategy()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Whether `line` is, as a whole, a termination keyword.
    pub fn is_termination(&self, line: &str) -> bool {
        let line = line.trim().to_lowercase();
        self.termination_keywords.iter().any(|k| *k == line)
    }

    fn labelled(&self, text: &str) -> String {
        format!("{}: {}", self.label, text)
    }

    /// Handle a single raw input line.
    ///
    /// Responder failures are returned as errors; the stats still count
    /// the attempted turn.
    pub async fn handle_line(&mut self, line: &str) -> Result<LineOutcome> {
        let line = line.trim();

        if self.is_termination(line) {
            debug!("Termination keyword received");
            return Ok(LineOutcome::Exit(self.labelled(&self.goodbye)));
        }

        if line.is_empty() {
            self.stats.skipped += 1;
            return Ok(LineOutcome::Skip);
        }

        self.stats.turns += 1;
        match self.responder.respond(line).await {
            Ok(response) => Ok(LineOutcome::Reply(self.labelled(&response))),
            Err(e) => {
                self.stats.failed += 1;
                Err(e)
            }
        }
    }

    /// Run the conversation until a termination keyword or end of input.
    pub async fn run(&mut self, channel: &dyn Channel) -> Result<SessionOutcome> {
        let mut rx = channel.start().await?;

        info!(
            channel = channel.name(),
            strategy = %self.responder.strategy(),
            responder = self.responder.name(),
            "Session started"
        );

        channel.prompt(&self.prompt).await?;

        let outcome = loop {
            let Some(msg) = rx.recv().await else {
                break SessionOutcome::InputClosed;
            };
            let msg = msg?;

            match self.handle_line(&msg.content).await {
                Ok(LineOutcome::Exit(line)) => {
                    channel.send(&line).await?;
                    break SessionOutcome::Terminated;
                }
                Ok(LineOutcome::Skip) => {}
                Ok(LineOutcome::Reply(line)) => channel.send(&line).await?,
                Err(e) => {
                    warn!(error = %e, "Turn failed");
                    channel.send(&self.labelled(&format!("[error] {e}"))).await?;
                }
            }

            channel.prompt(&self.prompt).await?;
        };

        channel.stop().await?;

        info!(
            outcome = ?outcome,
            turns = self.stats.turns,
            skipped = self.stats.skipped,
            failed = self.stats.failed,
            "Session ended"
        );

        Ok(outcome)
    }
}
