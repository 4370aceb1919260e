//! Session memory — the named conversational slots of one session.
//!
//! Memory is a plain value: the engine takes it by value and hands back the
//! updated copy, so nothing is ever mutated behind the caller's back and two
//! sessions can never share a slot.

use serde::{Deserialize, Serialize};

/// A recognized memory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// The user's name, as told with "my name is ..."
    Name,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Name => "name",
        }
    }
}

/// The slots remembered for one session. Every slot starts absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMemory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Name => self.name.as_deref(),
        }
    }

    /// Return a copy of this memory with `slot` set to `value`.
    ///
    /// There is no way to reset a slot to absent: a set slot can only be
    /// re-assigned.
    #[must_use]
    pub fn with(mut self, slot: Slot, value: impl Into<String>) -> Self {
        match slot {
            Slot::Name => self.name = Some(value.into()),
        }
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.get(Slot::Name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let memory = SessionMemory::new();
        assert_eq!(memory.name(), None);
        assert_eq!(memory.get(Slot::Name), None);
    }

    #[test]
    fn with_reassigns_last_write_wins() {
        let memory = SessionMemory::new()
            .with(Slot::Name, "Alice")
            .with(Slot::Name, "Carol");
        assert_eq!(memory.name(), Some("Carol"));
    }

    #[test]
    fn with_leaves_original_untouched() {
        let original = SessionMemory::new().with(Slot::Name, "Alice");
        let updated = original.clone().with(Slot::Name, "Bob");
        assert_eq!(original.name(), Some("Alice"));
        assert_eq!(updated.name(), Some("Bob"));
    }

    #[test]
    fn empty_memory_serializes_without_slots() {
        let json = serde_json::to_string(&SessionMemory::new()).unwrap();
        assert_eq!(json, "{}");
        let json = serde_json::to_string(&SessionMemory::new().with(Slot::Name, "Ann")).unwrap();
        assert_eq!(json, r#"{"name":"Ann"}"#);
        assert_eq!(Slot::Name.as_str(), "name");
    }
}
