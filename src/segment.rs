//! Incremental sentence extraction for streamed text.
//!
//! A live transcription grows a text buffer one chunk at a time. The
//! extractor commits complete sentences strictly left to right and hands
//! back everything after the last committed sentence as the remainder.

use serde::{Deserialize, Serialize};

use crate::annotation::Sentence;
use crate::config::SegmentationConfig;
use crate::engine::Reframer;

/// Closing characters allowed after a terminator.
const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', ']', '}'];

/// Complete sentences plus the unconsumed tail of the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceExtraction {
    /// Complete sentences in reading order.
    pub complete: Vec<String>,
    /// Text after the last complete sentence, untrimmed.
    pub remainder: String,
}

impl SentenceExtraction {
    /// Check if no sentence was completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.complete.is_empty()
    }
}

fn is_complete(span: &str, config: &SegmentationConfig) -> bool {
    config.is_complete(span.trim_end().trim_end_matches(CLOSERS))
}

/// Partition annotated `text` into complete sentences and a remainder.
///
/// Extraction stops at the first sentence that does not end in a
/// terminator, even if later sentences do. Blank text yields an empty
/// extraction.
#[must_use]
pub fn extract(text: &str, sentences: &[Sentence], config: &SegmentationConfig) -> SentenceExtraction {
    if text.trim().is_empty() {
        return SentenceExtraction::default();
    }

    let mut complete = Vec::new();
    let mut consumed = 0;
    for sentence in sentences {
        let Some(span) = text.get(sentence.begin..sentence.end) else {
            tracing::warn!(
                begin = sentence.begin,
                end = sentence.end,
                len = text.len(),
                "sentence offsets outside the annotated text"
            );
            break;
        };
        if !is_complete(span, config) {
            break;
        }
        complete.push(span.to_string());
        consumed = sentence.end;
    }

    SentenceExtraction {
        complete,
        remainder: text.get(consumed..).unwrap_or_default().to_string(),
    }
}

/// A streaming session over a [`Reframer`].
///
/// Owns the uncommitted buffer between chunks.
#[derive(Debug)]
pub struct SentenceStream<'a> {
    reframer: &'a Reframer,
    buffer: String,
}

impl<'a> SentenceStream<'a> {
    /// Start an empty session.
    #[must_use]
    pub fn new(reframer: &'a Reframer) -> Self {
        Self {
            reframer,
            buffer: String::new(),
        }
    }

    /// Append `chunk` and return the sentences it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        let extraction = self.reframer.extract_complete_sentences(&self.buffer);
        self.buffer = extraction.remainder;
        extraction.complete
    }

    /// Text not yet committed as a sentence.
    #[must_use]
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// End the session, returning the remainder as a final sentence.
    pub fn flush(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        let rest = rest.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotator, RuleBasedAnnotator};
    use proptest::prelude::*;

    fn run(text: &str) -> SentenceExtraction {
        let sentences = RuleBasedAnnotator::new().annotate(text).unwrap_or_default();
        extract(text, &sentences, &SegmentationConfig::default())
    }

    #[test]
    fn test_first_complete_sentence() {
        let extraction = run("First done. Second unfinished");
        assert_eq!(extraction.complete, vec!["First done."]);
        assert_eq!(extraction.remainder, " Second unfinished");
    }

    #[test]
    fn test_all_complete() {
        let extraction = run("One. Two! Three?");
        assert_eq!(extraction.complete, vec!["One.", "Two!", "Three?"]);
        assert_eq!(extraction.remainder, "");
    }

    #[test]
    fn test_nothing_complete() {
        let extraction = run("still talking");
        assert!(extraction.is_empty());
        assert_eq!(extraction.remainder, "still talking");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(run(""), SentenceExtraction::default());
        assert_eq!(run("   \n"), SentenceExtraction::default());
    }

    #[test]
    fn test_stops_at_first_incomplete() {
        let text = "Done. Not done";
        let mut sentences = RuleBasedAnnotator::new().annotate(text).unwrap();
        // A later sentence that ends in a terminator must not be committed.
        let mut trailing = sentences[0].clone();
        trailing.begin = 0;
        trailing.end = 5;
        sentences.push(trailing);
        let extraction = extract(text, &sentences, &SegmentationConfig::default());
        assert_eq!(extraction.complete, vec!["Done."]);
        assert_eq!(extraction.remainder, " Not done");
    }

    #[test]
    fn test_closing_quote() {
        let extraction = run("He said \"stop.\" Then");
        assert_eq!(extraction.complete, vec!["He said \"stop.\""]);
        assert_eq!(extraction.remainder, " Then");
    }

    #[test]
    fn test_custom_terminators() {
        let text = "Wait; then go";
        let sentences = RuleBasedAnnotator::new().annotate(text).unwrap();
        let config = SegmentationConfig::new().with_terminators(vec!['o']);
        let extraction = extract(text, &sentences, &config);
        assert_eq!(extraction.complete, vec!["Wait; then go"]);
    }

    #[test]
    fn test_stream_session() {
        let reframer = Reframer::new();
        let mut stream = reframer.stream();
        assert!(stream.push("Hello the").is_empty());
        assert_eq!(stream.push("re. How are"), vec!["Hello there."]);
        assert_eq!(stream.buffered(), " How are");
        assert_eq!(stream.push(" you? Fine"), vec!["How are you?"]);
        assert_eq!(stream.flush().as_deref(), Some("Fine"));
        assert_eq!(stream.flush(), None);
    }

    proptest! {
        #[test]
        fn prop_remainder_is_suffix(text in "[A-Za-z ,.!?]{0,80}") {
            let extraction = run(&text);
            prop_assert!(text.ends_with(extraction.remainder.as_str()) || text.trim().is_empty());
            for sentence in &extraction.complete {
                prop_assert!(text.contains(sentence.as_str()));
            }
        }
    }
}
