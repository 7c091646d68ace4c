//! Unified error types for `reframe`.
//!
//! The rewrite rules themselves never fail: a rule that does not apply
//! returns its input. Errors only come from the edges of the crate, which are
//! loading configuration and word lists, the annotation pipeline, and the
//! awaitable dispatch surface.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for `reframe` operations.
#[derive(Debug, Error)]
pub enum ReframeError {
    /// Annotation pipeline errors
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Lexical table errors
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    /// Dispatch errors
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by an annotation pipeline.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// An edge or the root refers to a token that does not exist.
    #[error("Malformed dependency graph: token index {index} out of range for {len} tokens")]
    MalformedGraph {
        /// Offending token index
        index: usize,
        /// Number of tokens in the sentence
        len: usize,
    },
}

/// Errors raised while loading lexical tables.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// A word list could not be read.
    #[error("Failed to load word list {}: {source}", path.display())]
    Load {
        /// Path of the word list
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A word list was read but contained no entries.
    #[error("Word list {} is empty", .0.display())]
    Empty(PathBuf),
}

/// Errors raised by the awaitable dispatch surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The executor refused the job.
    #[error("Job rejected: {0}")]
    Rejected(String),

    /// The job was dropped before it reported a result.
    #[error("Job dropped before completing")]
    Disconnected,
}

/// A type alias for Results with [`ReframeError`].
pub type Result<T> = std::result::Result<T, ReframeError>;
