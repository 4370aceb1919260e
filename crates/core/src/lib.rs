//! # rustbot Core
//!
//! Domain types, traits, and error definitions for the rustbot conversational
//! agent. Every subsystem that has more than one implementation is a trait
//! here; implementations live in their respective crates:
//!
//! - [`Responder`] — the per-session response strategy (`rustbot-agent`)
//! - [`GenerationBackend`] — text generation models (`rustbot-providers`)
//! - [`Channel`] — where user lines come from (`rustbot-channels`)

pub mod channel;
pub mod error;
pub mod generation;
pub mod responder;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChannelId, ChannelMessage};
pub use error::{ChannelError, Error, GenerationError, Result};
pub use generation::{Generation, GenerationBackend, GenerationParams, TokenHistory};
pub use responder::{Responder, Strategy};
