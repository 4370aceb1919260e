//! Channel trait — the abstraction over where turns come from.
//!
//! A Channel delivers raw user lines to the session and carries responses
//! back. The terminal (stdin/stdout) is the only production channel; tests
//! drive sessions through scripted channels.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ChannelError;

/// Unique identifier for a channel instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line of user input received from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// The channel this message belongs to
    pub channel_id: ChannelId,

    /// Sender identifier
    pub sender_id: String,

    /// The raw text, exactly as read (untrimmed)
    pub content: String,

    /// Channel-specific metadata
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ChannelMessage {
    pub fn new(channel_id: &ChannelId, sender_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.clone(),
            sender_id: sender_id.into(),
            content: content.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// The core Channel trait.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "cli").
    fn name(&self) -> &str;

    /// Unique ID for this channel instance.
    fn id(&self) -> &ChannelId;

    /// Start listening for incoming lines.
    ///
    /// The receiver closes when the input source is exhausted.
    async fn start(
        &self,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<ChannelMessage, ChannelError>>,
        ChannelError,
    >;

    /// Deliver one response line.
    async fn send(&self, content: &str) -> std::result::Result<(), ChannelError>;

    /// Show the input prompt before the next line is read.
    async fn prompt(&self, _prompt: &str) -> std::result::Result<(), ChannelError> {
        Ok(()) // No-op default
    }

    /// Stop the channel gracefully.
    async fn stop(&self) -> std::result::Result<(), ChannelError> {
        Ok(())
    }
}
