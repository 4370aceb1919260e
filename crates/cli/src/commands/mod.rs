pub mod chat;
pub mod models;
pub mod onboard;
pub mod status;

use std::path::Path;

use rustbot_config::AppConfig;

/// Load the config from `path` if given, otherwise from the default location.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
    let config = match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    };
    let config = config.map_err(|e| format!("Failed to load config: {e}"))?;
    tracing::debug!(
        bot_label = %config.bot_label,
        model = %config.generation.model,
        generation = config.generation.enabled,
        custom_rules = config.dialogue.rules.len(),
        "Configuration loaded"
    );
    Ok(config)
}
