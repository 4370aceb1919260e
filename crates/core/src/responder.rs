//! Responder trait — one turn in, one response out.
//!
//! A session holds exactly one responder for its whole lifetime. The session
//! loop only ever talks to this trait, so it never needs to know whether
//! responses come from a generation model or from the rule engine.

use async_trait::async_trait;
use crate::error::Result;

/// Which response strategy a responder implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Responses sampled from a generation backend
    Generative,
    /// Responses from the deterministic fallback engine
    RuleBased,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Generative => write!(f, "generative"),
            Strategy::RuleBased => write!(f, "rule-based"),
        }
    }
}

#[async_trait]
pub trait Responder: Send {
    /// A human-readable name (e.g., "fallback", "local").
    fn name(&self) -> &str;

    fn strategy(&self) -> Strategy;

    /// Produce the response to one non-empty, trimmed utterance.
    async fn respond(&mut self, utterance: &str) -> Result<String>;
}
