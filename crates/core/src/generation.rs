//! Generation backend trait — the abstraction over text-generation models.
//!
//! A backend turns a user utterance plus the running token history into a
//! response. The history is an opaque buffer of token ids that accumulates
//! both user and bot turns, so each generation is conditioned on the whole
//! visible conversation.
//!
//! Implementations: local GGUF models via Candle (`rustbot-providers`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::GenerationError;

/// Sampling and history policy for a generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Temperature (0.0 = greedy)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Top-k truncation applied before nucleus sampling
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Maximum tokens generated per turn
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// Forbid repeating any n-gram of this size (0 disables)
    #[serde(default = "default_no_repeat_ngram_size")]
    pub no_repeat_ngram_size: usize,

    /// Upper bound on the token history fed back into the model
    #[serde(default = "default_max_history_tokens")]
    pub max_history_tokens: usize,

    /// RNG seed for sampling
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_temperature() -> f32 {
    0.8
}
fn default_top_p() -> f32 {
    0.9
}
fn default_top_k() -> usize {
    40
}
fn default_max_new_tokens() -> u32 {
    50
}
fn default_no_repeat_ngram_size() -> usize {
    3
}
fn default_max_history_tokens() -> usize {
    1024
}
fn default_seed() -> u64 {
    299_792_458
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_new_tokens: default_max_new_tokens(),
            no_repeat_ngram_size: default_no_repeat_ngram_size(),
            max_history_tokens: default_max_history_tokens(),
            seed: default_seed(),
        }
    }
}

/// Running token history of one conversation.
///
/// Append-only from the caller's point of view: only a backend builds new
/// histories, and the responder swaps in whatever the backend returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenHistory {
    tokens: Vec<u32>,
}

impl TokenHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<u32>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[u32] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<u32> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn extend_from_slice(&mut self, tokens: &[u32]) {
        self.tokens.extend_from_slice(tokens);
    }

    /// Drop the oldest tokens until at most `max_tokens` remain.
    ///
    /// The cut is moved forward to the first token following a `boundary`
    /// (end-of-turn) token so that no turn is left half-truncated. When no
    /// boundary lies in the droppable range the cut is made exactly at the
    /// window edge. Returns the number of tokens dropped.
    pub fn trim_to_window(&mut self, max_tokens: usize, boundary: u32) -> usize {
        let len = self.tokens.len();
        if len <= max_tokens {
            return 0;
        }

        let min_cut = len - max_tokens;
        let cut = self.tokens[min_cut - 1..]
            .iter()
            .position(|&t| t == boundary)
            .map(|offset| min_cut + offset)
            .unwrap_or(min_cut);

        self.tokens.drain(..cut);
        cut
    }
}

/// The result of one generation turn.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Decoded text of the newly generated tokens
    pub response: String,

    /// The full history after this turn (user turn + bot turn appended)
    pub history: TokenHistory,
}

/// The core generation trait.
///
/// The session calls `generate()` once per turn and keeps the returned
/// history for the next call. Whether a backend is usable at all is decided
/// once at startup, never per turn.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "local").
    fn name(&self) -> &str;

    /// Generate a response to `utterance`, conditioned on `history`.
    async fn generate(
        &self,
        utterance: &str,
        history: Option<&TokenHistory>,
    ) -> std::result::Result<Generation, GenerationError>;

    /// Health check — is the backend ready to generate?
    async fn health_check(&self) -> std::result::Result<bool, GenerationError> {
        Ok(true)
    }
}
