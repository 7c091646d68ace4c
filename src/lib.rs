//! `reframe` - detection and rewriting of self-limiting phrasing.
//!
//! `reframe` flags negative or self-limiting language in English sentences
//! (negations, prohibitive modals, adversative conjunctions, the
//! "not only ... but also" construction, profanity) and rewrites sentences
//! that match a small set of grammatical patterns into self-affirming form:
//!
//! - **Classifiers**: injunction, profanity, conjunction and "not only" checks
//! - **Rewrites**: "She makes me feel happy." becomes "I feel happy with her."
//! - **Segmentation**: complete sentences committed from a streaming buffer
//! - **Dispatch**: every operation submitted to an injected executor
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reframe::prelude::*;
//!
//! let reframer = Reframer::new();
//!
//! assert!(reframer.is_injunction("I can't do this anymore."));
//! assert_eq!(
//!     reframer.transform("She made me feel happy."),
//!     "I felt happy with her."
//! );
//!
//! let extraction = reframer.extract_complete_sentences("First done. Second unfinished");
//! assert_eq!(extraction.complete, vec!["First done."]);
//! assert_eq!(extraction.remainder, " Second unfinished");
//! ```
//!
//! # Features
//!
//! - `native` (default): thread and tokio executors, file based configuration
//!
//! # Architecture
//!
//! ```text
//!        text
//!          │
//!          ▼
//! ┌──────────────────┐
//! │    Annotator     │  ← tokens, lemmas, tags, dependency graph
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Classifiers    │ ──► │     Lexicon      │  ← read-only word tables
//! │    Rewrites      │     └──────────────────┘
//! │   Segmentation   │
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │    Executor      │  ← callbacks and futures
//! └──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod annotation;
pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod rewrite;
pub mod segment;
pub mod types;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::annotation::{
        Annotator, DependencyGraph, DependencyRelation, Edge, PosTag, RuleBasedAnnotator,
        Sentence, Token,
    };
    pub use crate::classifier::{Trigger, TriggerKind};
    pub use crate::config::{LexiconConfig, ReframeConfig, SegmentationConfig};
    pub use crate::dispatch::{
        AsyncReframer, ClaimOnce, Executor, InlineExecutor, Job, ReframeService, ThreadExecutor,
    };
    #[cfg(feature = "native")]
    pub use crate::dispatch::TokioExecutor;
    pub use crate::engine::Reframer;
    pub use crate::error::{AnnotationError, DispatchError, LexiconError, ReframeError};
    pub use crate::lexicon::Lexicon;
    pub use crate::segment::{SentenceExtraction, SentenceStream};
    pub use crate::types::{Analysis, SentenceReport, Suggestion, SuggestionKind};
}

pub use error::{ReframeError, Result};
