//! Shared test helpers: scripted channels and backends.

use async_trait::async_trait;
use rustbot_core::channel::{Channel, ChannelId, ChannelMessage};
use rustbot_core::error::{ChannelError, GenerationError};
use rustbot_core::generation::{Generation, GenerationBackend, TokenHistory};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// A channel that replays fixed input lines and records everything sent.
pub struct ScriptedChannel {
    id: ChannelId,
    lines: Vec<String>,
    sent: Mutex<Vec<String>>,
    prompts: Mutex<usize>,
}

impl ScriptedChannel {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            id: ChannelId("scripted".into()),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            sent: Mutex::new(Vec::new()),
            prompts: Mutex::new(0),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> usize {
        *self.prompts.lock().unwrap()
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        let (tx, rx) = mpsc::channel(self.lines.len().max(1));
        for line in &self.lines {
            let msg = ChannelMessage::new(&self.id, "tester", line.clone());
            tx.send(Ok(msg)).await.unwrap();
        }
        Ok(rx)
    }

    async fn send(&self, content: &str) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn prompt(&self, _prompt: &str) -> Result<(), ChannelError> {
        *self.prompts.lock().unwrap() += 1;
        Ok(())
    }
}

/// A backend that echoes the utterance and appends two tokens per turn.
pub struct ScriptedBackend {
    seen: Mutex<Vec<Option<usize>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Length of the history passed in on each call.
    pub fn seen_history_lens(&self) -> Vec<Option<usize>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        utterance: &str,
        history: Option<&TokenHistory>,
    ) -> Result<Generation, GenerationError> {
        self.seen.lock().unwrap().push(history.map(TokenHistory::len));
        let mut next = history.cloned().unwrap_or_default();
        next.extend_from_slice(&[utterance.len() as u32, 0]);
        Ok(Generation {
            response: format!("echo: {utterance}"),
            history: next,
        })
    }
}

/// A backend whose every turn fails.
pub struct FailingBackend;

#[async_trait]
impl GenerationBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(
        &self,
        _utterance: &str,
        _history: Option<&TokenHistory>,
    ) -> Result<Generation, GenerationError> {
        Err(GenerationError::Inference("out of memory".into()))
    }
}
