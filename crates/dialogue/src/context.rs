//! Context phase — slot-aware cues checked before any pattern rule.
//!
//! Two cues are recognized:
//!
//! ```text
//! ... my name is <name>      → store <name> in the name slot
//! what is my name / what's my name → recall the name slot
//! ```
//!
//! Matching is done on the lowercased utterance. When "my name is" occurs
//! more than once, the text after the last occurrence is the name.

use crate::memory::{SessionMemory, Slot};

const SET_NAME_PHRASE: &str = "my name is";
const RECALL_NAME_PHRASES: [&str; 2] = ["what is my name", "what's my name"];

/// A context cue found in an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextCue {
    /// "my name is ..." with the extracted, title-cased name (may be empty)
    SetName(String),
    /// "what is my name"
    RecallName,
}

/// Find the context cue in `utterance`, if any. Setting wins over recall.
pub fn detect(utterance: &str) -> Option<ContextCue> {
    let lower = utterance.to_lowercase();

    if let Some(idx) = lower.rfind(SET_NAME_PHRASE) {
        let rest = &lower[idx + SET_NAME_PHRASE.len()..];
        return Some(ContextCue::SetName(title_case(rest.trim())));
    }

    if RECALL_NAME_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(ContextCue::RecallName);
    }

    None
}

/// Apply a cue to `memory`, producing the response and the updated memory.
pub fn apply(cue: ContextCue, memory: SessionMemory) -> (String, SessionMemory) {
    match cue {
        ContextCue::SetName(name) => {
            let response = format!("Nice to meet you, {name}!");
            (response, memory.with(Slot::Name, name))
        }
        ContextCue::RecallName => {
            // An empty stored name is as good as none.
            let response = match memory.name() {
                Some(name) if !name.is_empty() => format!("Your name is {name}."),
                _ => "I don't know your name yet. Tell me with 'My name is ...'.".to_string(),
            };
            (response, memory)
        }
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A "word" starts at any letter not preceded by a letter, so
/// `"mary-jane o'neil"` becomes `"Mary-Jane O'Neil"`.
///
/// When a word's first letter upper-cases to several characters, only the
/// first stays upper-case (`"ß"` becomes `"Ss"`, `"ﬁ"` becomes `"Fi"`).
/// This approximates Unicode title case; letters whose title case differs
/// from both of these forms (such as `ǆ`) may still differ.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            let mut upper = c.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
        }
        prev_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_set_name() {
        assert_eq!(
            detect("My name is Alice"),
            Some(ContextCue::SetName("Alice".into()))
        );
    }

    #[test]
    fn detect_uses_last_occurrence() {
        assert_eq!(
            detect("my name is Bob, no wait, MY NAME IS carol smith"),
            Some(ContextCue::SetName("Carol Smith".into()))
        );
    }

    #[test]
    fn detect_empty_name() {
        assert_eq!(detect("my name is   "), Some(ContextCue::SetName(String::new())));
    }

    #[test]
    fn detect_recall_variants() {
        assert_eq!(detect("What is my name?"), Some(ContextCue::RecallName));
        assert_eq!(detect("so what's my name"), Some(ContextCue::RecallName));
        assert_eq!(detect("whats my name"), None);
    }

    #[test]
    fn set_wins_over_recall() {
        assert_eq!(
            detect("what is my name? my name is dave"),
            Some(ContextCue::SetName("Dave".into()))
        );
    }

    #[test]
    fn no_cue() {
        assert_eq!(detect("hello there"), None);
        assert_eq!(detect("name"), None);
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("alice"), "Alice");
        assert_eq!(title_case("jean luc picard"), "Jean Luc Picard");
        assert_eq!(title_case("mary-jane o'neil"), "Mary-Jane O'Neil");
        assert_eq!(title_case("alice."), "Alice.");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn title_case_keeps_one_capital_for_expanding_letters() {
        assert_eq!(title_case("ßo"), "Sso");
        assert_eq!(title_case("ﬁre ﬂy"), "Fire Fly");
        assert_eq!(
            detect("my name is ßtefan"),
            Some(ContextCue::SetName("Sstefan".into()))
        );
    }

    #[test]
    fn apply_set_then_recall() {
        let (response, memory) = apply(ContextCue::SetName("Alice".into()), SessionMemory::new());
        assert_eq!(response, "Nice to meet you, Alice!");
        assert_eq!(memory.name(), Some("Alice"));

        let (response, memory) = apply(ContextCue::RecallName, memory);
        assert_eq!(response, "Your name is Alice.");
        assert_eq!(memory.name(), Some("Alice"));
    }

    #[test]
    fn recall_unknown_and_empty() {
        let (response, _) = apply(ContextCue::RecallName, SessionMemory::new());
        assert!(response.contains("don't know your name"));

        let memory = SessionMemory::new().with(Slot::Name, "");
        let (response, memory) = apply(ContextCue::RecallName, memory);
        assert!(response.contains("don't know your name"));
        assert_eq!(memory.name(), Some(""));
    }
}
