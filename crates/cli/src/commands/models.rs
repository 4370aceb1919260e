//! `rustbot models` — List the generation model presets.

use rustbot_config::GenerationConfig;
use rustbot_providers::{LOCAL_COMPILED, PRESETS};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let default_model = GenerationConfig::default().model;

    println!("Generation model presets");
    println!("========================");
    println!();
    for preset in PRESETS {
        let marker = if preset.alias == default_model { "*" } else { " " };
        println!("  {marker} {:<14} {}", preset.alias, preset.description);
        println!("      {}/{}", preset.repo, preset.gguf_file);
        if !preset.aliases.is_empty() {
            println!("      also: {}", preset.aliases.join(", "));
        }
    }
    println!();
    println!("  * default. Any path ending in .gguf is also accepted.");
    println!("  Select with `rustbot chat --model <alias>` or RUSTBOT_MODEL.");

    if !LOCAL_COMPILED {
        println!();
        println!("  Note: this build lacks the `local` feature; chat uses the rule-based responder.");
    }

    Ok(())
}
