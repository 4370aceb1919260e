//! Chat channel implementations for rustbot.
//!
//! All channels implement the `rustbot_core::Channel` trait.

pub mod cli;

pub use cli::CliChannel;
