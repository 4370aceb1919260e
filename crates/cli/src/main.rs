//! rustbot CLI — the main entry point.
//!
//! Commands:
//! - `chat`     — Interactive chat or single-message mode (default)
//! - `models`   — List the generation model presets
//! - `status`   — Show effective configuration and generation availability
//! - `onboard`  — Write a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "rustbot",
    about = "rustbot — a command-line conversational agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.rustbot/config.toml
    #[arg(short, long, global = true, env = "RUSTBOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the bot
    Chat {
        /// Answer a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Skip the generation model and use the rule-based responder
        #[arg(long)]
        rules_only: bool,

        /// Generation model alias or path to a .gguf file
        #[arg(long)]
        model: Option<String>,
    },

    /// List the generation model presets
    Models,

    /// Show system status
    Status,

    /// Initialize configuration
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the conversation.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        None => commands::chat::run(config_path, commands::chat::ChatOptions::default()).await?,
        Some(Commands::Chat {
            message,
            rules_only,
            model,
        }) => {
            let options = commands::chat::ChatOptions {
                message,
                rules_only,
                model,
            };
            commands::chat::run(config_path, options).await?
        }
        Some(Commands::Models) => commands::models::run().await?,
        Some(Commands::Status) => commands::status::run(config_path).await?,
        Some(Commands::Onboard) => commands::onboard::run(config_path).await?,
    }

    Ok(())
}
