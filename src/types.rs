//! Result types for combined analysis.

use serde::{Deserialize, Serialize};

use crate::classifier::Trigger;

/// Which rule produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// "not only X but also Y" rewritten to "both X and Y".
    NotOnlyButAlso,
    /// "X makes Y feel Z" rewritten to "Y feel(s) Z with X".
    CausalComplement,
    /// Negations replaced with affirmatives.
    Injunction,
    /// "but" replaced with "and".
    Conjunction,
}

impl std::fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotOnlyButAlso => "not_only_but_also",
            Self::CausalComplement => "causal_complement",
            Self::Injunction => "injunction",
            Self::Conjunction => "conjunction",
        };
        f.write_str(name)
    }
}

/// A rewritten sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The rule that fired.
    pub kind: SuggestionKind,
    /// The rewritten text.
    pub text: String,
}

impl Suggestion {
    /// Create a new suggestion.
    #[must_use]
    pub fn new(kind: SuggestionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Flags and suggestions for one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceReport {
    /// The sentence as it appears in the input.
    pub text: String,
    /// Byte offset of the sentence start in the input.
    pub begin: usize,
    /// Byte offset one past the sentence end in the input.
    pub end: usize,
    /// What made the sentence an injunction, if anything.
    pub trigger: Option<Trigger>,
    /// A token lemma is profane.
    pub profanity: bool,
    /// The sentence contains "but".
    pub conjunction: bool,
    /// The sentence contains "not only ... but also".
    pub not_only_but_also: bool,
    /// Rewrites that differ from the sentence.
    pub suggestions: Vec<Suggestion>,
}

impl SentenceReport {
    /// Check if the sentence contains negation or prohibition language.
    #[must_use]
    pub fn is_injunction(&self) -> bool {
        self.trigger.is_some()
    }

    /// Check if any replacement check fired.
    #[must_use]
    pub fn needs_replacement(&self) -> bool {
        self.is_injunction() || self.conjunction || self.not_only_but_also
    }

    /// The suggestion produced by `kind`, if any.
    #[must_use]
    pub fn suggestion(&self, kind: SuggestionKind) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.kind == kind)
    }
}

/// Per-sentence analysis of a text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// One report per annotated sentence, in order.
    pub sentences: Vec<SentenceReport>,
}

impl Analysis {
    /// Check if no sentence was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.sentences
            .iter()
            .all(|s| !s.needs_replacement() && !s.profanity)
    }

    /// Check if any sentence needs a replacement.
    #[must_use]
    pub fn needs_replacement(&self) -> bool {
        self.sentences.iter().any(SentenceReport::needs_replacement)
    }

    /// Check if any sentence is profane.
    #[must_use]
    pub fn contains_profanity(&self) -> bool {
        self.sentences.iter().any(|s| s.profanity)
    }

    /// All suggestions across sentences.
    pub fn suggestions(&self) -> impl Iterator<Item = &Suggestion> {
        self.sentences.iter().flat_map(|s| &s.suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TriggerKind;

    fn report(trigger: Option<Trigger>, profanity: bool) -> SentenceReport {
        SentenceReport {
            text: "x".to_string(),
            begin: 0,
            end: 1,
            trigger,
            profanity,
            conjunction: false,
            not_only_but_also: false,
            suggestions: vec![Suggestion::new(SuggestionKind::Injunction, "y")],
        }
    }

    #[test]
    fn test_flags() {
        let trigger = Trigger {
            token: 0,
            kind: TriggerKind::Modal,
        };
        let analysis = Analysis {
            sentences: vec![report(None, false), report(Some(trigger), false)],
        };
        assert!(analysis.needs_replacement());
        assert!(!analysis.contains_profanity());
        assert!(!analysis.is_clean());
        assert_eq!(analysis.suggestions().count(), 2);

        let profane = Analysis {
            sentences: vec![report(None, true)],
        };
        assert!(!profane.needs_replacement());
        assert!(!profane.is_clean());
        assert!(Analysis::default().is_clean());
    }

    #[test]
    fn test_serialization() {
        let suggestion = Suggestion::new(SuggestionKind::NotOnlyButAlso, "Both.");
        let json = serde_json::to_string(&suggestion).unwrap();
        assert_eq!(json, r#"{"kind":"not_only_but_also","text":"Both."}"#);
        let back: Suggestion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, suggestion);
        assert_eq!(SuggestionKind::CausalComplement.to_string(), "causal_complement");
    }
}
