//! `rustbot chat` — Interactive or single-message chat mode.

use std::path::Path;

use rustbot_agent::{LineOutcome, SessionLoop, SessionOutcome, select_responder};
use rustbot_channels::CliChannel;
use rustbot_config::AppConfig;
use rustbot_dialogue::FallbackEngine;

/// Flags accepted by `chat`.
#[derive(Debug, Default)]
pub struct ChatOptions {
    pub message: Option<String>,
    pub rules_only: bool,
    pub model: Option<String>,
}

pub async fn run(
    config_path: Option<&Path>,
    options: ChatOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(model) = options.model {
        config.generation.model = model;
    }
    if options.rules_only {
        config.generation.enabled = false;
    }

    let rules = config
        .dialogue
        .rule_table()
        .map_err(|e| format!("Invalid dialogue rules: {e}"))?;
    let engine = FallbackEngine::new(rules);

    // Decided once; the session never switches strategy afterwards.
    let backend = rustbot_providers::probe(&config.generation).await.into_backend();
    let responder = select_responder(backend, engine);
    let mut session = SessionLoop::from_config(responder, &config);

    if let Some(msg) = options.message {
        // Single message mode
        match session.handle_line(&msg).await {
            Ok(LineOutcome::Reply(line)) | Ok(LineOutcome::Exit(line)) => println!("{line}"),
            Ok(LineOutcome::Skip) => {}
            Err(e) => return Err(format!("Failed to respond: {e}").into()),
        }
        return Ok(());
    }

    print_banner(&config, &session);

    let channel = CliChannel::new();
    let outcome = session
        .run(&channel)
        .await
        .map_err(|e| format!("Session error: {e}"))?;

    if outcome == SessionOutcome::InputClosed {
        // Keep the shell prompt off the dangling "You: ".
        println!();
    }

    Ok(())
}

fn print_banner(config: &AppConfig, session: &SessionLoop) {
    let keywords = config
        .session
        .termination_keywords
        .iter()
        .map(|k| format!("'{k}'"))
        .collect::<Vec<_>>();

    println!("{}", "=".repeat(60));
    println!("     rustbot ({} mode)", session.strategy());
    println!("{}", "=".repeat(60));
    println!("Type {} to end the conversation.", join_words(&keywords));
    println!();
}

/// "a", "a or b", "a, b, or c".
fn join_words(words: &[String]) -> String {
    match words {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} or {b}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}
