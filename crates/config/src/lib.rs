//! Configuration loading, validation, and management for rustbot.
//!
//! Loads configuration from `~/.rustbot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use rustbot_core::GenerationParams;
use rustbot_dialogue::{Intent, Rule, RuleTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.rustbot/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Label printed in front of every bot line
    #[serde(default = "default_bot_label")]
    pub bot_label: String,

    /// Generation backend configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Session loop configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Fallback dialogue configuration
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

fn default_bot_label() -> String {
    "ChatBot".into()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Try to load a generation backend at startup
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Preset alias (e.g. "smollm:135m") or path to a `.gguf` file
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling and history policy
    #[serde(flatten)]
    pub params: GenerationParams,
}

fn default_model() -> String {
    "smollm:135m".into()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_model(),
            params: GenerationParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whole-line inputs that end the session (case-insensitive)
    #[serde(default = "default_termination_keywords")]
    pub termination_keywords: Vec<String>,

    /// Line printed (after the bot label) when the session ends
    #[serde(default = "default_goodbye")]
    pub goodbye: String,

    /// Input prompt
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_termination_keywords() -> Vec<String> {
    vec!["bye".into(), "exit".into(), "quit".into()]
}
fn default_goodbye() -> String {
    "Goodbye!".into()
}
fn default_prompt() -> String {
    "You: ".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            termination_keywords: default_termination_keywords(),
            goodbye: default_goodbye(),
            prompt: default_prompt(),
        }
    }
}

/// Fallback dialogue configuration.
///
/// An empty `rules` list keeps the built-in rule table; a non-empty list
/// replaces it entirely, in the order given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

/// A single pattern rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Intent label ("greeting", "help", or any custom label)
    pub intent: String,

    /// Case-insensitive regex searched anywhere in the utterance
    pub pattern: String,

    /// Fixed response
    pub response: String,
}

impl DialogueConfig {
    /// Build the rule table this configuration describes.
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        if self.rules.is_empty() {
            return Ok(RuleTable::standard());
        }

        let rules = self
            .rules
            .iter()
            .map(|r| {
                Rule::new(Intent::from_label(&r.intent), &r.pattern, r.response.clone())
                    .map_err(|e| ConfigError::ValidationError(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleTable::from_rules(rules))
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.rustbot/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `RUSTBOT_MODEL` — generation model alias or path
    /// - `RUSTBOT_GENERATION` — `0`/`false`/`off` disables generation
    /// - `RUSTBOT_BOT_LABEL` — bot label
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path())
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process env).
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(model) = var("RUSTBOT_MODEL") {
            self.generation.model = model;
        }

        if let Some(flag) = var("RUSTBOT_GENERATION") {
            self.generation.enabled = !matches!(
                flag.trim().to_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }

        if let Some(label) = var("RUSTBOT_BOT_LABEL") {
            self.bot_label = label;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".rustbot")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let params = &self.generation.params;

        if !(0.0..=2.0).contains(&params.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(params.top_p > 0.0 && params.top_p <= 1.0) {
            return Err(ConfigError::ValidationError(
                "generation.top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if params.max_new_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_new_tokens must be > 0".into(),
            ));
        }

        if self.session.termination_keywords.is_empty()
            || self
                .session
                .termination_keywords
                .iter()
                .any(|k| k.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "session.termination_keywords must be non-empty words".into(),
            ));
        }

        self.dialogue.rule_table()?;
        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot_label: default_bot_label(),
            generation: GenerationConfig::default(),
            session: SessionConfig::default(),
            dialogue: DialogueConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.bot_label, "ChatBot");
        assert!(config.generation.enabled);
        assert_eq!(config.generation.model, "smollm:135m");
        assert_eq!(config.session.termination_keywords, vec!["bye", "exit", "quit"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.bot_label, config.bot_label);
        assert_eq!(parsed.generation.params, config.generation.params);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.generation.params.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_top_p_rejected() {
        let mut config = AppConfig::default();
        config.generation.params.top_p = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_termination_keyword_rejected() {
        let mut config = AppConfig::default();
        config.session.termination_keywords = vec!["bye".into(), "  ".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.bot_label, "ChatBot");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
bot_label = "Bot"

[generation]
enabled = false
top_k = 10
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.bot_label, "Bot");
        assert!(!config.generation.enabled);
        assert_eq!(config.generation.params.top_k, 10);
        assert_eq!(config.generation.params.max_new_tokens, 50);
        assert_eq!(config.session.goodbye, "Goodbye!");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "bot_label = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn custom_rules_replace_standard_table() {
        let toml_str = r#"
[[dialogue.rules]]
intent = "weather"
pattern = "rain|snow"
response = "Dress warmly."

[[dialogue.rules]]
intent = "greeting"
pattern = "hello"
response = "Hi there!"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        let table = config.dialogue.rule_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.first_match("SNOW and hello").unwrap().response(), "Dress warmly.");
    }

    #[test]
    fn invalid_rule_pattern_fails_validation() {
        let toml_str = r#"
[[dialogue.rules]]
intent = "broken"
pattern = "(unclosed"
response = "never"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn no_rules_means_standard_table() {
        let table = AppConfig::default().dialogue.rule_table().unwrap();
        assert_eq!(table.len(), RuleTable::standard().len());
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("RUSTBOT_MODEL", "tinyllama"),
            ("RUSTBOT_GENERATION", "off"),
            ("RUSTBOT_BOT_LABEL", "Bot"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.generation.model, "tinyllama");
        assert!(!config.generation.enabled);
        assert_eq!(config.bot_label, "Bot");
    }

    #[test]
    fn generation_flag_truthy_values_enable() {
        let mut config = AppConfig::default();
        config.generation.enabled = false;
        config.apply_overrides(|k| (k == "RUSTBOT_GENERATION").then(|| "1".to_string()));
        assert!(config.generation.enabled);
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("ChatBot"));
        assert!(toml_str.contains("smollm:135m"));
        assert!(toml_str.contains("termination_keywords"));
    }
}
