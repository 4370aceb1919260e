//! Pattern phase — an ordered table of (intent, matcher, response) rules.
//!
//! Matchers are case-insensitive regular expressions searched anywhere in
//! the raw utterance; they are not anchored and carry no word boundaries,
//! so `hi` also fires inside "this". The first rule in table order whose
//! matcher is found wins.

use regex_lite::{Regex, RegexBuilder};
use thiserror::Error;

/// What a pattern rule recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    WellBeing,
    Identity,
    Capability,
    Farewell,
    Gratitude,
    Help,
    /// A rule supplied by configuration under its own label
    Custom(String),
}

impl Intent {
    /// Parse a configuration label. Unknown labels become `Custom`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "greeting" => Intent::Greeting,
            "well_being" | "wellbeing" => Intent::WellBeing,
            "identity" => Intent::Identity,
            "capability" => Intent::Capability,
            "farewell" => Intent::Farewell,
            "gratitude" => Intent::Gratitude,
            "help" => Intent::Help,
            _ => Intent::Custom(label.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Intent::Greeting => "greeting",
            Intent::WellBeing => "well_being",
            Intent::Identity => "identity",
            Intent::Capability => "capability",
            Intent::Farewell => "farewell",
            Intent::Gratitude => "gratitude",
            Intent::Help => "help",
            Intent::Custom(label) => label,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
pub enum RuleError {
    #[error("Invalid pattern for rule '{intent}': {reason}")]
    InvalidPattern { intent: String, reason: String },
}

/// A single pattern rule.
#[derive(Debug, Clone)]
pub struct Rule {
    intent: Intent,
    matcher: Regex,
    response: String,
}

impl Rule {
    /// Compile a rule. `pattern` is matched case-insensitively.
    pub fn new(
        intent: Intent,
        pattern: &str,
        response: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let matcher = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RuleError::InvalidPattern {
                intent: intent.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            intent,
            matcher,
            response: response.into(),
        })
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn matches(&self, utterance: &str) -> bool {
        self.matcher.is_match(utterance)
    }
}

/// Built-in rules, in precedence order.
const STANDARD_RULES: [(Intent, &str, &str); 7] = [
    (Intent::Greeting, "hello|hi|hey", "Hello! How can I help you?"),
    (
        Intent::WellBeing,
        "how are you",
        "I'm just code, but I'm functioning perfectly!",
    ),
    (
        Intent::Identity,
        "your name|who are you",
        "I'm a Rust chatbot. You can call me RustBot.",
    ),
    (
        Intent::Capability,
        "what can you do",
        "I respond to greetings, remember your name, and answer basic questions.",
    ),
    (Intent::Farewell, "bye|goodbye|exit", "Goodbye! Have a great day."),
    (Intent::Gratitude, "thanks|thank you", "You're welcome!"),
    (
        Intent::Help,
        "help",
        "I understand greetings and name remembering. Try 'my name is ...'.",
    ),
];

/// An ordered, immutable rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table from rules in precedence order.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in table.
    pub fn standard() -> Self {
        let rules = STANDARD_RULES
            .into_iter()
            .map(|(intent, pattern, response)| {
                Rule::new(intent, pattern, response).expect("built-in rule patterns are valid")
            })
            .collect();
        Self { rules }
    }

    /// The first rule, in table order, whose matcher occurs in `utterance`.
    pub fn first_match(&self, utterance: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(utterance))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_of(table: &RuleTable, utterance: &str) -> Option<Intent> {
        table.first_match(utterance).map(|r| r.intent().clone())
    }

    #[test]
    fn standard_table_order() {
        let table = RuleTable::standard();
        let order: Vec<_> = table.iter().map(|r| r.intent().clone()).collect();
        assert_eq!(
            order,
            vec![
                Intent::Greeting,
                Intent::WellBeing,
                Intent::Identity,
                Intent::Capability,
                Intent::Farewell,
                Intent::Gratitude,
                Intent::Help,
            ]
        );
    }

    #[test]
    fn recognizes_each_intent() {
        let table = RuleTable::standard();
        assert_eq!(intent_of(&table, "Hey!"), Some(Intent::Greeting));
        assert_eq!(intent_of(&table, "how are you today"), Some(Intent::WellBeing));
        assert_eq!(intent_of(&table, "WHO ARE YOU"), Some(Intent::Identity));
        assert_eq!(intent_of(&table, "what can you do?"), Some(Intent::Capability));
        assert_eq!(intent_of(&table, "goodbye party"), Some(Intent::Farewell));
        assert_eq!(intent_of(&table, "thank you so much"), Some(Intent::Gratitude));
        assert_eq!(intent_of(&table, "I need help"), Some(Intent::Help));
        assert_eq!(intent_of(&table, "asdkjasd"), None);
    }

    #[test]
    fn first_match_wins() {
        let table = RuleTable::standard();
        assert_eq!(
            intent_of(&table, "hello there, how are you"),
            Some(Intent::Greeting)
        );
    }

    #[test]
    fn substring_matching_has_no_word_boundaries() {
        let table = RuleTable::standard();
        // "this" contains "hi"
        assert_eq!(intent_of(&table, "is this thing on"), Some(Intent::Greeting));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = Rule::new(Intent::Custom("weather".into()), "rain(", "Bring an umbrella.")
            .unwrap_err();
        assert!(err.to_string().contains("weather"));
    }

    #[test]
    fn custom_table() {
        let table = RuleTable::from_rules(vec![
            Rule::new(Intent::from_label("weather"), r"\brain\b", "Bring an umbrella.").unwrap(),
            Rule::new(Intent::from_label("greeting"), "hello", "Hi!").unwrap(),
        ]);
        assert_eq!(table.len(), 2);
        let rule = table.first_match("Hello, will it RAIN?").unwrap();
        assert_eq!(rule.intent(), &Intent::Custom("weather".into()));
        assert_eq!(rule.response(), "Bring an umbrella.");
        assert!(table.first_match("training").is_none());
    }

    #[test]
    fn intent_labels_roundtrip() {
        for (intent, _, _) in STANDARD_RULES {
            assert_eq!(Intent::from_label(intent.as_str()), intent);
        }
        assert_eq!(Intent::from_label(" Farewell "), Intent::Farewell);
    }
}
