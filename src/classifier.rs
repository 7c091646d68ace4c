//! Sentence classifiers.
//!
//! Pure predicates over annotated sentences. Matching is whole-token, so
//! "notable" and "butler" never trigger on "not" and "but".

use serde::{Deserialize, Serialize};

use crate::annotation::{PosTag, Sentence, Token};
use crate::lexicon::{
    Lexicon, adverb_matches, conjunction_matches, has_negative_suffix, is_negative_adverb,
    modal_matches, negation_map, normalize,
};
use crate::rewrite::{not_only, suggest};

/// Why a sentence was classified as an injunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// The "not only ... but also" construction.
    NotOnlyButAlso,
    /// A negative contraction from the negation table.
    Contraction,
    /// A bare negative adverb.
    NegativeAdverb,
    /// A token ending in "n't".
    NegativeSuffix,
    /// An adverb from the adverb match set.
    Adverb,
    /// A modal from the modal match set.
    Modal,
    /// A coordinating conjunction from the conjunction match set.
    Conjunction,
}

/// The first token that made a sentence an injunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Index of the token in the sentence, or of "not" for the construction.
    pub token: usize,
    /// What matched.
    pub kind: TriggerKind,
}

fn token_trigger(token: &Token) -> Option<TriggerKind> {
    let surface = normalize(&token.text);
    let lemma = normalize(&token.lemma);

    if negation_map().contains_key(surface.as_str()) {
        return Some(TriggerKind::Contraction);
    }
    if is_negative_adverb(&surface) || is_negative_adverb(&lemma) {
        return Some(TriggerKind::NegativeAdverb);
    }
    // Catches contractions the negation table does not list.
    if has_negative_suffix(&surface) {
        return Some(TriggerKind::NegativeSuffix);
    }

    match token.tag {
        PosTag::Adverb if adverb_matches().contains(surface.as_str()) => Some(TriggerKind::Adverb),
        PosTag::Modal if modal_matches().contains(surface.as_str()) => Some(TriggerKind::Modal),
        PosTag::CoordinatingConjunction if conjunction_matches().contains(surface.as_str()) => {
            Some(TriggerKind::Conjunction)
        }
        _ => None,
    }
}

/// Find what makes `sentence` an injunction, scanning left to right.
#[must_use]
pub fn injunction_trigger(sentence: &Sentence) -> Option<Trigger> {
    if let Some(found) = not_only::find(&sentence.tokens) {
        return Some(Trigger {
            token: found.not,
            kind: TriggerKind::NotOnlyButAlso,
        });
    }
    sentence
        .tokens
        .iter()
        .enumerate()
        .find_map(|(token, t)| token_trigger(t).map(|kind| Trigger { token, kind }))
}

/// Check if annotated `text` contains negation or prohibition language.
///
/// When the annotation is empty the raw text is still checked for the
/// "not only ... but also" construction.
#[must_use]
pub fn is_injunction(text: &str, sentences: &[Sentence]) -> bool {
    if sentences.is_empty() {
        return not_only::is_present_in_text(text);
    }
    sentences.iter().any(|s| injunction_trigger(s).is_some())
}

/// Check if any token lemma is in the profanity set.
#[must_use]
pub fn contains_profanity(sentences: &[Sentence], lexicon: &Lexicon) -> bool {
    sentences
        .iter()
        .flat_map(|s| &s.tokens)
        .any(|t| lexicon.is_profane(&t.lemma))
}

/// Check if any sentence contains an adversative conjunction.
#[must_use]
pub fn has_conjunction(sentences: &[Sentence]) -> bool {
    sentences.iter().any(|s| suggest::has_conjunction(&s.tokens))
}

/// Check if any sentence contains the "not only ... but also" construction.
#[must_use]
pub fn has_not_only_but_also(sentences: &[Sentence]) -> bool {
    sentences.iter().any(not_only::is_present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotator, DependencyGraph, RuleBasedAnnotator};

    fn annotate(text: &str) -> Vec<Sentence> {
        RuleBasedAnnotator::new().annotate(text).unwrap()
    }

    fn injunction(text: &str) -> bool {
        is_injunction(text, &annotate(text))
    }

    fn first_trigger(text: &str) -> Option<TriggerKind> {
        annotate(text)
            .iter()
            .find_map(injunction_trigger)
            .map(|t| t.kind)
    }

    #[test]
    fn test_injunctions() {
        assert!(injunction("I can't do this anymore."));
        assert!(injunction("I do not like it."));
        assert!(injunction("You should stop."));
        assert!(injunction("I tried, but I failed."));
        assert!(injunction("She is not only talented but also hardworking."));
        assert!(injunction("He never calls."));
    }

    #[test]
    fn test_clean_sentences() {
        assert!(!injunction("This is a clean sentence."));
        assert!(!injunction("The butterfly is beautiful."));
        assert!(!injunction("The notable butler arrived."));
        assert!(!injunction(""));
    }

    #[test]
    fn test_trigger_kinds() {
        assert_eq!(
            first_trigger("She is not only kind but also brave."),
            Some(TriggerKind::NotOnlyButAlso)
        );
        assert_eq!(first_trigger("I can't go."), Some(TriggerKind::NegativeAdverb));
        assert_eq!(first_trigger("I never go."), Some(TriggerKind::NegativeAdverb));
        assert_eq!(first_trigger("You must go."), Some(TriggerKind::Modal));
        assert_eq!(first_trigger("Slow but sure."), Some(TriggerKind::Conjunction));
    }

    #[test]
    fn test_unsplit_contraction_tokens() {
        let sentence = |word: &str| {
            Sentence::new(
                vec![Token::new("I", 0).with_after(" "), Token::new(word, 2)],
                DependencyGraph::new(),
            )
            .unwrap()
        };
        assert_eq!(
            injunction_trigger(&sentence("isn't")).map(|t| (t.token, t.kind)),
            Some((1, TriggerKind::Contraction))
        );
        assert_eq!(
            injunction_trigger(&sentence("mayn’t")).map(|t| t.kind),
            Some(TriggerKind::NegativeSuffix)
        );
    }

    #[test]
    fn test_raw_fallback_without_annotation() {
        assert!(is_injunction("not only this but also that", &[]));
        assert!(!is_injunction("I can't", &[]));
    }

    #[test]
    fn test_profanity_by_lemma() {
        let lexicon = Lexicon::with_profanity(["damn"]);
        assert!(contains_profanity(&annotate("Damn it."), &lexicon));
        let inflected = Sentence::new(
            vec![Token::new("Damns", 0).with_lemma("damn")],
            DependencyGraph::new(),
        )
        .unwrap();
        assert!(contains_profanity(&[inflected], &lexicon));
        assert!(!contains_profanity(&annotate("What a day."), &lexicon));
    }

    #[test]
    fn test_profanity_at_sentence_start() {
        let lexicon = Lexicon::with_profanity(["bastard"]);
        assert!(contains_profanity(&annotate("Bastards left."), &lexicon));
        assert!(contains_profanity(&annotate("Those bastards left."), &lexicon));
    }

    #[test]
    fn test_conjunction_and_not_only() {
        assert!(has_conjunction(&annotate("Good but slow.")));
        assert!(!has_conjunction(&annotate("The butler left.")));
        assert!(has_not_only_but_also(&annotate(
            "It is not only fast but also cheap."
        )));
        assert!(!has_not_only_but_also(&annotate("It is fast.")));
    }
}
