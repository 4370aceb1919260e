//! The conversation side of rustbot.
//!
//! A session picks one [`Responder`](rustbot_core::Responder) up front
//! (generative when a backend is available, rule-based otherwise) and the
//! [`SessionLoop`] drives it over a channel until the user says goodbye or
//! input runs out.

pub mod responder;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use responder::{GenerativeResponder, RuleResponder, select_responder};
pub use session::{LineOutcome, SessionLoop, SessionOutcome, SessionStats};
