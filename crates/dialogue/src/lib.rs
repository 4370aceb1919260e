//! Fallback dialogue engine for rustbot.
//!
//! A deterministic responder used whenever no generation backend is
//! available. It answers every turn from, in order:
//!
//! 1. **Context cues** that read or write [`SessionMemory`]
//! 2. **Pattern rules** from an ordered [`RuleTable`] (first match wins)
//! 3. A fixed **default** response
//!
//! Memory is threaded through [`FallbackEngine::respond`] by value and
//! returned updated, which keeps each turn a pure function of
//! `(utterance, memory)`.

pub mod context;
pub mod engine;
pub mod memory;
pub mod rules;

pub use context::ContextCue;
pub use engine::{DEFAULT_RESPONSE, FallbackEngine, Matched, Reply};
pub use memory::{SessionMemory, Slot};
pub use rules::{Intent, Rule, RuleError, RuleTable};
