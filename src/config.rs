//! Configuration management for `reframe`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration for `reframe`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReframeConfig {
    /// Lexical table configuration.
    #[serde(default)]
    pub lexicon: LexiconConfig,
    /// Streaming segmentation configuration.
    #[serde(default)]
    pub segmentation: SegmentationConfig,
}

/// Configuration for the lexical knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Profanity word list, one word per line. `None` uses the bundled list.
    pub profanity_path: Option<PathBuf>,
    /// Words added to the profanity set on top of the list.
    pub extra_profanity: Vec<String>,
    /// Fail instead of degrading to an empty set when the list cannot be read.
    pub strict: bool,
}

impl LexiconConfig {
    /// Create a new lexicon configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load profanity from a word list file.
    #[must_use]
    pub fn with_profanity_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profanity_path = Some(path.into());
        self
    }

    /// Add extra profane words.
    #[must_use]
    pub fn with_extra_profanity<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_profanity.extend(words.into_iter().map(Into::into));
        self
    }

    /// Set strict loading.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Configuration for incremental sentence extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Characters that end a complete sentence.
    pub terminators: Vec<char>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            terminators: vec!['.', '!', '?'],
        }
    }
}

impl SegmentationConfig {
    /// Create a new segmentation configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sentence terminators.
    #[must_use]
    pub fn with_terminators(mut self, terminators: impl Into<Vec<char>>) -> Self {
        self.terminators = terminators.into();
        self
    }

    /// Check if `text` ends in one of the terminators.
    #[must_use]
    pub fn is_complete(&self, text: &str) -> bool {
        text.trim_end()
            .chars()
            .next_back()
            .is_some_and(|c| self.terminators.contains(&c))
    }
}

impl ReframeConfig {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file (native only).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[cfg(feature = "native")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file (native only).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[cfg(feature = "native")]
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> crate::error::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the configuration is invalid.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::error::Result<String> {
        let content = serde_json::to_string_pretty(self)?;
        Ok(content)
    }

    /// Check the configuration for values no component can work with.
    ///
    /// # Errors
    ///
    /// Returns [`ReframeError::Config`](crate::error::ReframeError::Config) if
    /// no sentence terminator is configured.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.segmentation.terminators.is_empty() {
            return Err(crate::error::ReframeError::Config(
                "segmentation.terminators must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Set lexicon configuration.
    #[must_use]
    pub fn with_lexicon(mut self, lexicon: LexiconConfig) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Set segmentation configuration.
    #[must_use]
    pub fn with_segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.segmentation = segmentation;
        self
    }
}
