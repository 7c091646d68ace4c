//! The synchronous engine.
//!
//! [`Reframer`] ties an [`Annotator`] to the lexicon and exposes every
//! classifier and rewrite as a function of plain text. Each call annotates
//! its own input. Rewrites are total: when no rule applies the input comes
//! back unchanged.

use std::fmt;
use std::sync::Arc;

use crate::annotation::{Annotator, RuleBasedAnnotator, Sentence, Token};
use crate::classifier;
use crate::config::{ReframeConfig, SegmentationConfig};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::rewrite::{causal, not_only, rewrite_sentences, suggest};
use crate::segment::{self, SentenceExtraction, SentenceStream};
use crate::types::{Analysis, SentenceReport, Suggestion, SuggestionKind};

/// Negative-phrasing detection and rewriting over an annotation pipeline.
///
/// Cloning is cheap; the annotator and lexicon are shared.
#[derive(Clone)]
pub struct Reframer {
    annotator: Arc<dyn Annotator>,
    lexicon: Arc<Lexicon>,
    segmentation: SegmentationConfig,
}

impl fmt::Debug for Reframer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reframer")
            .field("profanity_entries", &self.lexicon.profanity_len())
            .field("segmentation", &self.segmentation)
            .finish_non_exhaustive()
    }
}

impl Default for Reframer {
    fn default() -> Self {
        Self {
            annotator: Arc::new(RuleBasedAnnotator::new()),
            lexicon: Arc::new(Lexicon::global().clone()),
            segmentation: SegmentationConfig::default(),
        }
    }
}

impl Reframer {
    /// Create an engine with the built-in annotator and bundled word list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from configuration, using the built-in annotator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or, in strict mode,
    /// if the profanity list cannot be loaded.
    pub fn from_config(config: &ReframeConfig) -> Result<Self> {
        config.validate()?;
        let lexicon = Lexicon::from_config(&config.lexicon)?;
        Ok(Self::new()
            .with_lexicon(lexicon)
            .with_segmentation(config.segmentation.clone()))
    }

    /// Use a different annotation pipeline.
    #[must_use]
    pub fn with_annotator<A: Annotator + 'static>(mut self, annotator: A) -> Self {
        self.annotator = Arc::new(annotator);
        self
    }

    /// Use a different lexicon.
    #[must_use]
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Arc::new(lexicon);
        self
    }

    /// Use different sentence terminators for extraction.
    #[must_use]
    pub fn with_segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// The lexicon in use.
    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// The segmentation settings in use.
    #[must_use]
    pub fn segmentation(&self) -> &SegmentationConfig {
        &self.segmentation
    }

    /// Annotate `text`.
    ///
    /// Blank text is not sent to the annotator. An annotator failure is
    /// logged and treated as an empty annotation. Sentences whose graph
    /// points past their tokens are logged and dropped.
    #[must_use]
    pub fn annotate(&self, text: &str) -> Vec<Sentence> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        match self.annotator.annotate(text) {
            Ok(sentences) => sentences
                .into_iter()
                .filter(|sentence| match sentence.validate() {
                    Ok(()) => true,
                    Err(error) => {
                        tracing::warn!(%error, begin = sentence.begin, "dropping malformed sentence");
                        false
                    }
                })
                .collect(),
            Err(error) => {
                tracing::warn!(%error, "annotation failed, treating input as unmatched");
                Vec::new()
            }
        }
    }

    fn tokens(&self, text: &str) -> Vec<Token> {
        self.annotate(text)
            .into_iter()
            .flat_map(|s| s.tokens)
            .collect()
    }

    // ------------------------------------------------------------------
    // Classifiers
    // ------------------------------------------------------------------

    /// Check if `text` contains negation or prohibition language.
    #[must_use]
    pub fn is_injunction(&self, text: &str) -> bool {
        classifier::is_injunction(text, &self.annotate(text))
    }

    /// Check if any word in `text` is profane, by lemma.
    #[must_use]
    pub fn contains_profanity(&self, text: &str) -> bool {
        classifier::contains_profanity(&self.annotate(text), &self.lexicon)
    }

    /// Check if `text` contains an adversative conjunction.
    #[must_use]
    pub fn has_conjunction(&self, text: &str) -> bool {
        classifier::has_conjunction(&self.annotate(text))
    }

    /// Check if `text` contains "not only ... but also".
    #[must_use]
    pub fn has_not_only_but_also(&self, text: &str) -> bool {
        classifier::has_not_only_but_also(&self.annotate(text))
    }

    // ------------------------------------------------------------------
    // Rewrites
    // ------------------------------------------------------------------

    /// Rewrite "not only X but also Y" into "both X and Y".
    #[must_use]
    pub fn rewrite_not_only(&self, text: &str) -> String {
        rewrite_sentences(text, &self.annotate(text), not_only::rewrite)
            .unwrap_or_else(|| text.to_string())
    }

    /// Rewrite "X makes Y feel Z" into "Y feel(s) Z with X".
    #[must_use]
    pub fn transform(&self, text: &str) -> String {
        rewrite_sentences(text, &self.annotate(text), causal::transform)
            .unwrap_or_else(|| text.to_string())
    }

    /// Apply the "not only" rewrite, falling back to the causal transform,
    /// sentence by sentence.
    #[must_use]
    pub fn suggest_improved_sentence(&self, text: &str) -> String {
        rewrite_sentences(text, &self.annotate(text), |s| {
            not_only::rewrite(s).or_else(|| causal::transform(s))
        })
        .unwrap_or_else(|| text.to_string())
    }

    /// Replace negations with affirmatives and drop negative adverbs.
    #[must_use]
    pub fn suggest_injunction_replacement(&self, text: &str) -> String {
        suggest::replace_injunctions(&self.tokens(text)).unwrap_or_else(|| text.to_string())
    }

    /// Replace "but" with "and".
    #[must_use]
    pub fn suggest_conjunction_replacement(&self, text: &str) -> String {
        suggest::replace_conjunctions(&self.tokens(text)).unwrap_or_else(|| text.to_string())
    }

    // ------------------------------------------------------------------
    // Streaming and analysis
    // ------------------------------------------------------------------

    /// Split a growing buffer into complete sentences and a remainder.
    #[must_use]
    pub fn extract_complete_sentences(&self, text: &str) -> SentenceExtraction {
        segment::extract(text, &self.annotate(text), &self.segmentation)
    }

    /// Start a streaming session.
    #[must_use]
    pub fn stream(&self) -> SentenceStream<'_> {
        SentenceStream::new(self)
    }

    /// Classify and rewrite every sentence of `text` in one pass.
    #[must_use]
    pub fn analyze(&self, text: &str) -> Analysis {
        let sentences = self.annotate(text);
        let reports = sentences
            .iter()
            .map(|sentence| self.report(text, sentence))
            .collect();
        Analysis { sentences: reports }
    }

    fn report(&self, text: &str, sentence: &Sentence) -> SentenceReport {
        let original = text
            .get(sentence.begin..sentence.end)
            .map_or_else(|| sentence.text(), str::to_string);

        let improved = not_only::rewrite(sentence)
            .map(|s| Suggestion::new(SuggestionKind::NotOnlyButAlso, s))
            .or_else(|| {
                causal::transform(sentence).map(|s| Suggestion::new(SuggestionKind::CausalComplement, s))
            });
        let injunction = suggest::replace_injunctions(&sentence.tokens)
            .map(|s| Suggestion::new(SuggestionKind::Injunction, s));
        let conjunction = suggest::replace_conjunctions(&sentence.tokens)
            .map(|s| Suggestion::new(SuggestionKind::Conjunction, s));

        let suggestions = [improved, injunction, conjunction]
            .into_iter()
            .flatten()
            .filter(|s| s.text != original)
            .collect();

        SentenceReport {
            trigger: classifier::injunction_trigger(sentence),
            profanity: classifier::contains_profanity(std::slice::from_ref(sentence), &self.lexicon),
            conjunction: suggest::has_conjunction(&sentence.tokens),
            not_only_but_also: not_only::is_present(sentence),
            suggestions,
            begin: sentence.begin,
            end: sentence.end,
            text: original,
        }
    }
}
