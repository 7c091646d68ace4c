//! The "not only ... but also" construction.
//!
//! Detection needs both adjacent pairs, in any order. Rewriting needs them
//! in reading order and turns
//! "She is not only talented but also hardworking." into
//! "She is both talented and hardworking."

use crate::annotation::{Sentence, Token};
use crate::lexicon::normalize;

use super::{ensure_terminal_punctuation, match_first_case, render_tokens};

/// Token positions of the two word pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotOnlyMatch {
    /// Position of "not".
    pub not: usize,
    /// Position of "only" (always `not + 1`).
    pub only: usize,
    /// Position of "but".
    pub but: usize,
    /// Position of "also" (always `but + 1`).
    pub also: usize,
}

impl NotOnlyMatch {
    /// Check if the pairs appear in reading order with a phrase between them.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.only < self.but
    }
}

/// Index of the first word of the first adjacent `first` + `second` pair.
fn adjacent_pair<S: AsRef<str>>(words: &[S], first: &str, second: &str) -> Option<usize> {
    words
        .windows(2)
        .position(|pair| pair[0].as_ref() == first && pair[1].as_ref() == second)
}

/// Find both pairs in a sequence of lowercased words.
#[must_use]
pub fn find_in_words<S: AsRef<str>>(words: &[S]) -> Option<NotOnlyMatch> {
    let not = adjacent_pair(words, "not", "only")?;
    let but = adjacent_pair(words, "but", "also")?;
    Some(NotOnlyMatch {
        not,
        only: not + 1,
        but,
        also: but + 1,
    })
}

/// Find both pairs among a sentence's tokens.
#[must_use]
pub fn find(tokens: &[Token]) -> Option<NotOnlyMatch> {
    let words: Vec<String> = tokens.iter().map(|t| normalize(&t.text)).collect();
    find_in_words(&words)
}

/// Check if the sentence contains the construction.
#[must_use]
pub fn is_present(sentence: &Sentence) -> bool {
    find(&sentence.tokens).is_some()
}

/// Check raw text for the construction by whitespace-separated words.
///
/// Used when no annotation is available.
#[must_use]
pub fn is_present_in_text(text: &str) -> bool {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| normalize(w.trim_matches(|c: char| !c.is_alphanumeric())))
        .collect();
    find_in_words(&words).is_some()
}

/// Rewrite the construction into "both X and Y".
///
/// Returns `None` if either pair is missing or "but also" comes first.
#[must_use]
pub fn rewrite(sentence: &Sentence) -> Option<String> {
    let tokens = &sentence.tokens;
    let found = find(tokens)?;
    if !found.is_ordered() {
        tracing::debug!(
            sentence = %sentence.text(),
            "not-only rewrite declined: \"but also\" precedes \"not only\""
        );
        return None;
    }

    let prefix = render_tokens(&tokens[..found.not], None, false);
    let first = render_tokens(&tokens[found.only + 1..found.but], None, true);
    let second = render_tokens(&tokens[found.also + 1..], None, true);

    let mut rewritten = format!("{prefix}both {first} and {second}");
    if let Some(original) = tokens.first().and_then(|t| t.text.chars().next()) {
        rewritten = match_first_case(&rewritten, original);
    }
    let rewritten = ensure_terminal_punctuation(rewritten.trim());

    tracing::debug!(rewritten = %rewritten, "not-only rewrite applied");
    Some(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotator, RuleBasedAnnotator};

    fn sentence(text: &str) -> Sentence {
        RuleBasedAnnotator::new()
            .annotate(text)
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_rewrite_basic() {
        let s = sentence("She is not only talented but also hardworking.");
        assert_eq!(
            rewrite(&s).as_deref(),
            Some("She is both talented and hardworking.")
        );
    }

    #[test]
    fn test_rewrite_at_sentence_start() {
        let s = sentence("Not only is he kind but also he is brave.");
        assert_eq!(
            rewrite(&s).as_deref(),
            Some("Both is he kind and he is brave.")
        );
    }

    #[test]
    fn test_rewrite_appends_period() {
        let s = sentence("It is not only fast but also cheap");
        assert_eq!(rewrite(&s).as_deref(), Some("It is both fast and cheap."));
    }

    #[test]
    fn test_rewrite_keeps_question_mark() {
        let s = sentence("Is it not only fast but also cheap?");
        assert_eq!(rewrite(&s).as_deref(), Some("Is it both fast and cheap?"));
    }

    #[test]
    fn test_missing_pair() {
        let s = sentence("She is not only talented.");
        assert!(find(&s.tokens).is_none());
        assert!(rewrite(&s).is_none());

        let s = sentence("She is talented but also lazy.");
        assert!(!is_present(&s));
    }

    #[test]
    fn test_pairs_must_be_adjacent() {
        let s = sentence("She is not really only talented but also hardworking.");
        assert!(!is_present(&s));
    }

    #[test]
    fn test_detection_is_order_independent() {
        let s = sentence("He is smart but also, not only at work, kind.");
        assert!(is_present(&s));
        assert!(rewrite(&s).is_none());
    }

    #[test]
    fn test_raw_text_detection() {
        assert!(is_present_in_text("She is NOT only talented, but also kind"));
        assert!(!is_present_in_text("Nothing only butterflies also"));
    }

    #[test]
    fn test_find_in_words() {
        let words = ["x", "but", "also", "y", "not", "only"];
        let found = find_in_words(&words).unwrap();
        assert_eq!((found.not, found.but), (4, 1));
        assert!(!found.is_ordered());
    }
}
