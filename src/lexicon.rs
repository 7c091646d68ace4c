//! Lexical knowledge base.
//!
//! Process-wide, read-only word tables consulted by the classifiers and
//! rewrite rules. The fixed tables are built lazily on first use and never
//! mutated. The profanity set is the only table loaded from a word list, so
//! it lives in [`Lexicon`], which can be built from configuration.
//!
//! All lookups are case-insensitive and treat the curly apostrophe (`’`) as
//! a straight one.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;

use crate::config::LexiconConfig;
use crate::error::LexiconError;

/// Word list bundled with the crate, one lemma per line.
const BUNDLED_PROFANITY: &str = include_str!("../resources/profanity.txt");

/// Lowercase `word` and normalize curly apostrophes.
#[must_use]
pub fn normalize(word: &str) -> String {
    word.to_lowercase().replace('’', "'")
}

/// Negative contractions mapped to their affirmative form.
pub fn negation_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
        [
            ("can't", "can"),
            ("cannot", "can"),
            ("won't", "will"),
            ("don't", "do"),
            ("doesn't", "does"),
            ("didn't", "did"),
            ("isn't", "is"),
            ("aren't", "are"),
            ("wasn't", "was"),
            ("weren't", "were"),
            ("haven't", "have"),
            ("hasn't", "has"),
            ("hadn't", "had"),
            ("shouldn't", "should"),
            ("wouldn't", "would"),
            ("couldn't", "could"),
            ("mustn't", "must"),
            ("shan't", "shall"),
            ("mightn't", "might"),
            ("needn't", "need"),
            ("ain't", "is"),
        ]
        .into_iter()
        .collect()
    });
    &MAP
}

/// Contractions and split contraction pieces mapped to their full form.
pub fn contraction_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
        [
            ("can't", "cannot"),
            ("won't", "will not"),
            ("don't", "do not"),
            ("doesn't", "does not"),
            ("didn't", "did not"),
            ("isn't", "is not"),
            ("aren't", "are not"),
            ("wasn't", "was not"),
            ("weren't", "were not"),
            ("haven't", "have not"),
            ("hasn't", "has not"),
            ("hadn't", "had not"),
            ("shouldn't", "should not"),
            ("wouldn't", "would not"),
            ("couldn't", "could not"),
            ("mustn't", "must not"),
            ("shan't", "shall not"),
            ("ain't", "am not"),
            ("i'm", "i am"),
            ("you're", "you are"),
            ("we're", "we are"),
            ("they're", "they are"),
            ("i've", "i have"),
            ("you've", "you have"),
            ("we've", "we have"),
            ("they've", "they have"),
            ("i'll", "i will"),
            ("you'll", "you will"),
            ("he'll", "he will"),
            ("she'll", "she will"),
            ("we'll", "we will"),
            ("they'll", "they will"),
            ("i'd", "i would"),
            ("you'd", "you would"),
            ("he'd", "he would"),
            ("she'd", "she would"),
            ("we'd", "we would"),
            ("they'd", "they would"),
            ("ca", "can"),
            ("wo", "will"),
            ("sha", "shall"),
            ("n't", "not"),
            ("'ll", "will"),
            ("'d", "would"),
            ("'m", "am"),
            ("'re", "are"),
            ("'ve", "have"),
        ]
        .into_iter()
        .collect()
    });
    &MAP
}

/// Words that negate on their own.
pub fn negative_adverbs() -> &'static HashSet<&'static str> {
    static SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
        [
            "not", "never", "no", "nowhere", "nothing", "neither", "nor", "none", "nobody",
            "hardly", "barely", "scarcely",
        ]
        .into_iter()
        .collect()
    });
    &SET
}

/// Adverbs that flag an injunction when tagged as adverbs.
pub fn adverb_matches() -> &'static HashSet<&'static str> {
    static SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
        [
            "never", "not", "hardly", "barely", "scarcely", "rarely", "seldom",
        ]
        .into_iter()
        .collect()
    });
    &SET
}

/// Modals that flag an injunction.
pub fn modal_matches() -> &'static HashSet<&'static str> {
    static SET: Lazy<HashSet<&'static str>> =
        Lazy::new(|| ["should", "must", "ought", "shall"].into_iter().collect());
    &SET
}

/// Adversative conjunctions.
pub fn conjunction_matches() -> &'static HashSet<&'static str> {
    static SET: Lazy<HashSet<&'static str>> = Lazy::new(|| ["but"].into_iter().collect());
    &SET
}

fn irregular_past() -> &'static HashMap<&'static str, &'static str> {
    static MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
        [
            ("have", "had"),
            ("do", "did"),
            ("go", "went"),
            ("feel", "felt"),
            ("make", "made"),
            ("get", "got"),
            ("become", "became"),
            ("keep", "kept"),
            ("grow", "grew"),
            ("know", "knew"),
            ("think", "thought"),
            ("see", "saw"),
            ("come", "came"),
            ("take", "took"),
            ("give", "gave"),
            ("find", "found"),
            ("tell", "told"),
            ("leave", "left"),
            ("lose", "lost"),
            ("win", "won"),
            ("run", "ran"),
            ("say", "said"),
            ("teach", "taught"),
            ("bring", "brought"),
            ("buy", "bought"),
            ("pay", "paid"),
            ("spend", "spent"),
            ("meet", "met"),
            ("sleep", "slept"),
            ("eat", "ate"),
            ("write", "wrote"),
            ("speak", "spoke"),
            ("read", "read"),
            ("understand", "understood"),
            ("hear", "heard"),
            ("forgive", "forgave"),
            ("hurt", "hurt"),
            ("put", "put"),
            ("let", "let"),
            ("lead", "led"),
            ("drive", "drove"),
            ("stand", "stood"),
            ("sit", "sat"),
            ("fall", "fell"),
            ("begin", "began"),
            ("break", "broke"),
            ("choose", "chose"),
            ("fight", "fought"),
            ("hold", "held"),
            ("sing", "sang"),
            ("swim", "swam"),
            ("wear", "wore"),
            ("stick", "stuck"),
            ("shine", "shone"),
        ]
        .into_iter()
        .collect()
    });
    &MAP
}

fn irregular_present() -> &'static HashMap<&'static str, &'static str> {
    static MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
        [("be", "is"), ("have", "has"), ("do", "does"), ("go", "goes")]
            .into_iter()
            .collect()
    });
    &MAP
}

/// Irregular past tense of `lemma`, if it has one.
#[must_use]
pub fn irregular_past_of(lemma: &str) -> Option<&'static str> {
    irregular_past().get(normalize(lemma).as_str()).copied()
}

/// Irregular third-person singular present of `lemma`, if it has one.
#[must_use]
pub fn irregular_present_of(lemma: &str) -> Option<&'static str> {
    irregular_present().get(normalize(lemma).as_str()).copied()
}

/// Subject-case and object-case pronoun pairs.
const PRONOUN_PAIRS: &[(&str, &str)] = &[
    ("i", "me"),
    ("you", "you"),
    ("he", "him"),
    ("she", "her"),
    ("we", "us"),
    ("they", "them"),
    ("it", "it"),
];

fn subject_to_object_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: Lazy<HashMap<&'static str, &'static str>> =
        Lazy::new(|| PRONOUN_PAIRS.iter().copied().collect());
    &MAP
}

fn object_to_subject_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
        PRONOUN_PAIRS
            .iter()
            .map(|&(subject, object)| (object, subject))
            .collect()
    });
    &MAP
}

/// Map a subject-case pronoun to object case ("she" → "her").
///
/// Anything outside the pronoun set is returned unchanged.
#[must_use]
pub fn subject_to_object(word: &str) -> String {
    subject_to_object_map()
        .get(normalize(word).as_str())
        .map_or_else(|| word.to_string(), |&object| object.to_string())
}

/// Map an object-case pronoun to subject case ("me" → "i").
///
/// Anything outside the pronoun set is returned unchanged.
#[must_use]
pub fn object_to_subject(word: &str) -> String {
    object_to_subject_map()
        .get(normalize(word).as_str())
        .map_or_else(|| word.to_string(), |&subject| subject.to_string())
}

/// Reflexive pronouns.
pub fn reflexive_pronouns() -> &'static HashSet<&'static str> {
    static SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
        [
            "myself",
            "yourself",
            "himself",
            "herself",
            "itself",
            "ourselves",
            "yourselves",
            "themselves",
            "oneself",
        ]
        .into_iter()
        .collect()
    });
    &SET
}

/// Check if `word` is a reflexive pronoun.
#[must_use]
pub fn is_reflexive(word: &str) -> bool {
    reflexive_pronouns().contains(normalize(word).as_str())
}

/// Affirmative form of a negative contraction ("can't" → "can").
#[must_use]
pub fn affirmative_of(word: &str) -> Option<&'static str> {
    negation_map().get(normalize(word).as_str()).copied()
}

/// Affirmative form of a negative contraction, agreeing "ain't" with the
/// word before it ("I ain't" → "am", "they ain't" → "are").
#[must_use]
pub fn affirmative_after(word: &str, previous: Option<&str>) -> Option<&'static str> {
    if normalize(word) != "ain't" {
        return affirmative_of(word);
    }
    let form = match previous.map(normalize).as_deref() {
        Some("i") => "am",
        Some("you" | "we" | "they") => "are",
        _ => "is",
    };
    Some(form)
}

/// Full form of a contraction or contraction piece ("wo" → "will").
#[must_use]
pub fn expand_contraction(word: &str) -> Option<&'static str> {
    contraction_map().get(normalize(word).as_str()).copied()
}

/// Check if `word` is in the negative-adverb set.
#[must_use]
pub fn is_negative_adverb(word: &str) -> bool {
    negative_adverbs().contains(normalize(word).as_str())
}

/// Check if `word` ends in a negative contraction suffix.
#[must_use]
pub fn has_negative_suffix(word: &str) -> bool {
    normalize(word).ends_with("n't")
}

/// Check if `word` is an adversative conjunction.
#[must_use]
pub fn is_conjunction_match(word: &str) -> bool {
    conjunction_matches().contains(normalize(word).as_str())
}

/// The word lists that can be configured at runtime.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    profanity: HashSet<String>,
}

static GLOBAL: Lazy<Lexicon> = Lazy::new(Lexicon::bundled);

impl Lexicon {
    /// A lexicon backed by the bundled word list.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            profanity: parse_word_list(BUNDLED_PROFANITY),
        }
    }

    /// The process-wide lexicon built from the bundled word list.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// A lexicon with the given profanity words.
    #[must_use]
    pub fn with_profanity<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            profanity: words
                .into_iter()
                .map(|w| normalize(w.as_ref().trim()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Build a lexicon from configuration.
    ///
    /// A word list that cannot be read is logged and replaced by an empty
    /// set, unless `strict` is set.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`LexiconError::Load`] if the configured word
    /// list cannot be read and [`LexiconError::Empty`] if it has no entries.
    pub fn from_config(config: &LexiconConfig) -> Result<Self, LexiconError> {
        let mut profanity = match &config.profanity_path {
            None => parse_word_list(BUNDLED_PROFANITY),
            Some(path) => Self::load_word_list(path, config.strict)?,
        };
        profanity.extend(
            config
                .extra_profanity
                .iter()
                .map(|w| normalize(w.trim()))
                .filter(|w| !w.is_empty()),
        );
        Ok(Self { profanity })
    }

    fn load_word_list(path: &Path, strict: bool) -> Result<HashSet<String>, LexiconError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let words = parse_word_list(&content);
                if words.is_empty() {
                    if strict {
                        return Err(LexiconError::Empty(path.to_path_buf()));
                    }
                    tracing::warn!(path = %path.display(), "profanity list is empty");
                }
                Ok(words)
            }
            Err(source) if strict => Err(LexiconError::Load {
                path: path.to_path_buf(),
                source,
            }),
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "failed to load profanity list, continuing with an empty set"
                );
                Ok(HashSet::new())
            }
        }
    }

    /// Check if `lemma` is profane.
    #[must_use]
    pub fn is_profane(&self, lemma: &str) -> bool {
        self.profanity.contains(normalize(lemma).as_str())
    }

    /// Number of profanity entries.
    #[must_use]
    pub fn profanity_len(&self) -> usize {
        self.profanity.len()
    }
}

/// Parse a word list: one entry per line, `#` starts a comment.
fn parse_word_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(normalize)
        .collect()
}
