//! CLI channel — interactive terminal-based chat.
//!
//! Reads lines from stdin, writes responses to stdout. Lines are forwarded
//! exactly as read; trimming, empty-line handling and exit keywords belong
//! to the session loop.

use async_trait::async_trait;
use rustbot_core::channel::{Channel, ChannelId, ChannelMessage};
use rustbot_core::error::ChannelError;
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tracing::debug;

const SENDER_ID: &str = "local_user";

/// Interactive CLI channel for terminal-based chat.
pub struct CliChannel {
    id: ChannelId,
}

impl CliChannel {
    pub fn new() -> Self {
        Self {
            id: ChannelId("cli".into()),
        }
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward every line of `reader` into `tx` until EOF or the receiver closes.
///
/// Blocking: runs on its own OS thread, never on the runtime.
fn forward_lines<R>(
    reader: R,
    channel_id: ChannelId,
    tx: mpsc::Sender<Result<ChannelMessage, ChannelError>>,
) where
    R: BufRead,
{
    for line in reader.lines() {
        match line {
            Ok(line) => {
                let msg = ChannelMessage::new(&channel_id, SENDER_ID, line);
                if tx.blocking_send(Ok(msg)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(ChannelError::ConnectionLost(e.to_string())));
                break;
            }
        }
    }
    debug!("CLI input closed");
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        // Capacity 1 keeps reading in step with the conversation.
        let (tx, rx) = mpsc::channel(1);
        let channel_id = self.id.clone();

        // A plain thread, not spawn_blocking: a read still pending after the
        // session ends must not hold up runtime shutdown.
        std::thread::Builder::new()
            .name("rustbot-stdin".into())
            .spawn(move || forward_lines(std::io::stdin().lock(), channel_id, tx))
            .map_err(|e| ChannelError::ConnectionLost(format!("Failed to spawn stdin reader: {e}")))?;

        Ok(rx)
    }

    async fn send(&self, content: &str) -> Result<(), ChannelError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{content}")
            .and_then(|_| stdout.flush())
            .map_err(|e| ChannelError::DeliveryFailed {
                channel: "cli".into(),
                reason: e.to_string(),
            })
    }

    async fn prompt(&self, prompt: &str) -> Result<(), ChannelError> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{prompt}")
            .and_then(|_| stdout.flush())
            .map_err(|e| ChannelError::DeliveryFailed {
                channel: "cli".into(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_channel_properties() {
        let ch = CliChannel::new();
        assert_eq!(ch.name(), "cli");
        assert_eq!(ch.id().0, "cli");
    }

    #[test]
    fn forwards_raw_lines_until_eof() {
        let input: &[u8] = b"hello\n  \nMy name is Alice  \n";
        let (tx, mut rx) = mpsc::channel(8);
        forward_lines(input, ChannelId("cli".into()), tx);

        let mut lines = Vec::new();
        while let Some(msg) = rx.blocking_recv() {
            lines.push(msg.unwrap().content);
        }
        assert_eq!(lines, vec!["hello", "  ", "My name is Alice  "]);
    }

    #[test]
    fn stops_when_receiver_dropped() {
        let input: &[u8] = b"one\ntwo\n";
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        // Must return instead of blocking on a closed channel.
        forward_lines(input, ChannelId("cli".into()), tx);
    }
}
