//! `rustbot status` — Show effective configuration and generation availability.

use std::path::Path;

use rustbot_config::AppConfig;
use rustbot_providers::{Capability, LOCAL_COMPILED};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path);
    let params = &config.generation.params;

    println!("rustbot status");
    println!("==============");
    println!("  Config file:  {}", path.display());
    println!("  Bot label:    {}", config.bot_label);
    println!("  Keywords:     {}", config.session.termination_keywords.join(", "));
    println!(
        "  Rules:        {}",
        if config.dialogue.rules.is_empty() {
            "built-in".to_string()
        } else {
            format!("{} custom", config.dialogue.rules.len())
        }
    );
    println!("  Model:        {}", config.generation.model);
    println!("  Temperature:  {}", params.temperature);
    println!("  Top-p/top-k:  {}/{}", params.top_p, params.top_k);
    println!("  New tokens:   {}", params.max_new_tokens);
    println!("  History:      {} tokens", params.max_history_tokens);
    println!("  Local build:  {}", if LOCAL_COMPILED { "yes" } else { "no" });

    match rustbot_providers::probe(&config.generation).await {
        Capability::Available(backend) => {
            println!("\n  Generation available ({})", backend.name());
        }
        Capability::Unavailable { reason } => {
            println!("\n  Generation unavailable: {reason}");
            println!("  Chat will use the rule-based responder.");
        }
    }

    if !path.exists() {
        println!("\n  No config file, using defaults. Run `rustbot onboard` to create one.");
    }

    Ok(())
}
