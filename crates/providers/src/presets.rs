//! Well-known model aliases.
//!
//! Friendly names that resolve to a Hugging Face repo + GGUF filename + the
//! repo holding the matching `tokenizer.json`.

/// A downloadable model preset.
#[derive(Debug, Clone, Copy)]
pub struct ModelPreset {
    /// Canonical alias shown to users
    pub alias: &'static str,
    /// Other accepted spellings
    pub aliases: &'static [&'static str],
    pub repo: &'static str,
    pub gguf_file: &'static str,
    pub tokenizer_repo: &'static str,
    pub description: &'static str,
}

pub const PRESETS: &[ModelPreset] = &[
    ModelPreset {
        alias: "smollm:135m",
        aliases: &["smollm", "smollm-135m"],
        repo: "TheBloke/SmolLM-135M-Instruct-GGUF",
        gguf_file: "smollm-135m-instruct.Q4_K_M.gguf",
        tokenizer_repo: "HuggingFaceTB/SmolLM-135M-Instruct",
        description: "135M params, ~100 MB — fastest, default",
    },
    ModelPreset {
        alias: "smollm:360m",
        aliases: &["smollm-360m"],
        repo: "TheBloke/SmolLM-360M-Instruct-GGUF",
        gguf_file: "smollm-360m-instruct.Q4_K_M.gguf",
        tokenizer_repo: "HuggingFaceTB/SmolLM-360M-Instruct",
        description: "360M params, ~250 MB",
    },
    ModelPreset {
        alias: "smollm:1.7b",
        aliases: &["smollm-1.7b"],
        repo: "TheBloke/SmolLM-1.7B-Instruct-GGUF",
        gguf_file: "smollm-1.7b-instruct.Q4_K_M.gguf",
        tokenizer_repo: "HuggingFaceTB/SmolLM-1.7B-Instruct",
        description: "1.7B params, ~1 GB — most coherent",
    },
    ModelPreset {
        alias: "tinyllama",
        aliases: &["tiny-llama", "tinyllama-1.1b"],
        repo: "TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF",
        gguf_file: "tinyllama-1.1b-chat-v1.0.Q4_K_M.gguf",
        tokenizer_repo: "TinyLlama/TinyLlama-1.1B-Chat-v1.0",
        description: "1.1B params, ~670 MB",
    },
];

/// Resolve an alias (case-insensitive) to its preset.
pub fn resolve_preset(name: &str) -> Option<&'static ModelPreset> {
    let name = name.trim().to_lowercase();
    PRESETS
        .iter()
        .find(|p| p.alias == name || p.aliases.contains(&name.as_str()))
}

/// Whether `name` refers to a local GGUF file rather than a preset.
pub fn is_gguf_path(name: &str) -> bool {
    name.to_lowercase().ends_with(".gguf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_aliases() {
        assert_eq!(resolve_preset("smollm").unwrap().alias, "smollm:135m");
        assert_eq!(resolve_preset("SmolLM:360M").unwrap().alias, "smollm:360m");
        assert_eq!(resolve_preset("TinyLlama").unwrap().alias, "tinyllama");
        assert!(resolve_preset("gpt-5").is_none());
    }

    #[test]
    fn aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for preset in PRESETS {
            assert!(seen.insert(preset.alias));
            for alias in preset.aliases {
                assert!(seen.insert(alias), "duplicate alias {alias}");
            }
        }
    }

    #[test]
    fn gguf_paths() {
        assert!(is_gguf_path("/models/My-Model.GGUF"));
        assert!(!is_gguf_path("smollm"));
    }
}
