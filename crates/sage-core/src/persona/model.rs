//! Persona domain model.
//!
//! A persona is a named instruction that conditions how the language model
//! answers: it is sent as the system message ahead of the user's question.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Identifier of a persona in the catalog.
///
/// The set is closed. Parsing is case-insensitive so that `"a"` and `"A"`
/// select the same persona.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PersonaKey {
    A,
    B,
    C,
    D,
}

impl PersonaKey {
    /// Parses a key from user input, ignoring surrounding whitespace.
    ///
    /// Returns `None` for anything outside the closed set.
    pub fn parse(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }
}

/// An expert persona: a display name plus the instruction sent as the
/// system-level directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Catalog key
    pub key: PersonaKey,
    /// Display name of the persona
    pub name: String,
    /// System prompt that establishes the persona's role
    pub instruction: String,
}

impl Persona {
    pub fn new(key: PersonaKey, name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            instruction: instruction.into(),
        }
    }

    /// Label used by pickers, e.g. `A: Data Scientist`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.key, self.name)
    }

    /// First `max_chars` characters of the instruction followed by `...`.
    ///
    /// Counts characters, not bytes, so multi-byte text is never split.
    pub fn summary(&self, max_chars: usize) -> String {
        let head: String = self.instruction.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(PersonaKey::parse("a"), Some(PersonaKey::A));
        assert_eq!(PersonaKey::parse("  D \n"), Some(PersonaKey::D));
        assert_eq!(PersonaKey::parse("Z"), None);
        assert_eq!(PersonaKey::parse(""), None);
    }

    #[test]
    fn test_key_display_matches_variant() {
        assert_eq!(PersonaKey::B.to_string(), "B");
        assert_eq!(PersonaKey::C.as_ref(), "C");
    }

    #[test]
    fn test_summary_counts_characters() {
        let persona = Persona::new(PersonaKey::A, "Tester", "データサイエンティスト。分析");
        assert_eq!(persona.summary(3), "データ...");
    }

    #[test]
    fn test_label() {
        let persona = Persona::new(PersonaKey::B, "Software Engineer", "Writes code.");
        assert_eq!(persona.label(), "B: Software Engineer");
    }
}
