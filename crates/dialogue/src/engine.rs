//! The fallback dialogue engine.
//!
//! Every turn runs three phases in strict order and stops at the first one
//! that produces a response:
//!
//! 1. **Context** — slot cues ("my name is ...", "what is my name")
//! 2. **Pattern** — the ordered [`RuleTable`]
//! 3. **Default** — a fixed non-comprehension response
//!
//! Only the context phase may change memory.

use serde::Serialize;
use tracing::debug;

use crate::context::{self, ContextCue};
use crate::memory::SessionMemory;
use crate::rules::RuleTable;

/// Response used when neither the context nor the pattern phase applies.
pub const DEFAULT_RESPONSE: &str =
    "I'm not sure how to respond to that. Try saying 'hello' or 'help'.";

/// Which phase produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Matched {
    /// The name slot was set
    SetName,
    /// The name slot was recalled
    RecallName,
    /// A pattern rule fired; carries its intent label
    Pattern { intent: String },
    /// Nothing matched
    Default,
}

/// The outcome of one turn.
#[derive(Debug, Clone)]
pub struct Reply {
    /// The response text (never empty)
    pub text: String,

    /// Memory after the turn
    pub memory: SessionMemory,

    /// The phase that answered
    pub matched: Matched,
}

/// Deterministic responder built from context cues and a rule table.
#[derive(Debug, Clone)]
pub struct FallbackEngine {
    rules: RuleTable,
}

impl FallbackEngine {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Answer one utterance against `memory`.
    ///
    /// Total over non-empty input: always returns a non-empty response.
    /// Callers are expected to drop empty or whitespace-only lines before
    /// calling.
    pub fn respond(&self, utterance: &str, memory: SessionMemory) -> Reply {
        if let Some(cue) = context::detect(utterance) {
            let matched = match cue {
                ContextCue::SetName(_) => Matched::SetName,
                ContextCue::RecallName => Matched::RecallName,
            };
            let (text, memory) = context::apply(cue, memory);
            debug!(phase = "context", ?matched, "Fallback reply");
            return Reply { text, memory, matched };
        }

        if let Some(rule) = self.rules.first_match(utterance) {
            debug!(phase = "pattern", intent = %rule.intent(), "Fallback reply");
            return Reply {
                text: rule.response().to_string(),
                memory,
                matched: Matched::Pattern {
                    intent: rule.intent().to_string(),
                },
            };
        }

        debug!(phase = "default", "Fallback reply");
        Reply {
            text: DEFAULT_RESPONSE.to_string(),
            memory,
            matched: Matched::Default,
        }
    }
}

impl Default for FallbackEngine {
    fn default() -> Self {
        Self::new(RuleTable::standard())
    }
}
