//! Trigger word and transcript matching

use std::fmt;

use serde::{Deserialize, Serialize};

/// Trigger word used when none has been saved
pub const DEFAULT_TRIGGER_WORD: &str = "help";

/// Case-insensitive substring check of `trigger_word` in `transcript`.
///
/// Returns false when either side is empty. No fuzzy matching.
pub fn matches(transcript: &str, trigger_word: &str) -> bool {
    let needle = trigger_word.trim();
    if transcript.is_empty() || needle.is_empty() {
        return false;
    }
    transcript.to_lowercase().contains(&needle.to_lowercase())
}

/// Keyword whose detection in transcribed audio raises an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerWord(String);

impl TriggerWord {
    pub fn new(word: impl Into<String>) -> Self {
        Self(word.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this word occurs in `transcript`
    pub fn matches(&self, transcript: &str) -> bool {
        matches(transcript, &self.0)
    }
}

impl Default for TriggerWord {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_WORD)
    }
}

impl fmt::Display for TriggerWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert!(matches("I need HELP now", "help"));
        assert!(matches("i need help now", "HELP"));
    }

    #[test]
    fn no_match_without_word() {
        assert!(!matches("nothing here", "help"));
    }

    #[test]
    fn empty_inputs_never_match() {
        assert!(!matches("", "help"));
        assert!(!matches("help", ""));
        assert!(!matches("help", "   "));
    }

    #[test]
    fn substring_counts() {
        // Plain containment, so "helpful" also fires.
        assert!(matches("that was helpful", "help"));
    }

    #[test]
    fn trigger_word_defaults_to_help() {
        assert_eq!(TriggerWord::default().as_str(), "help");
    }

    #[test]
    fn trigger_word_is_trimmed() {
        let word = TriggerWord::new("  pineapple ");
        assert_eq!(word.as_str(), "pineapple");
        assert!(word.matches("Pineapple pizza"));
    }

    #[test]
    fn blank_trigger_word_matches_nothing() {
        let word = TriggerWord::new("  ");
        assert!(word.is_empty());
        assert!(!word.matches("anything at all"));
    }
}
