//! Callback-based async dispatch.
//!
//! The engine never owns threads. Work is handed to an injected
//! [`Executor`] as a boxed closure and results come back through a
//! caller-supplied callback. [`AsyncReframer`] wraps every [`Reframer`]
//! operation this way, and [`ReframeService`] turns the callbacks into
//! futures.
//!
//! # Example
//!
//! ```rust,ignore
//! use reframe::prelude::*;
//!
//! let service = AsyncReframer::new(Reframer::new(), ThreadExecutor::new());
//! service.transform_async("She makes me feel happy.", |rewritten| {
//!     println!("{rewritten}");
//! });
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::engine::Reframer;
use crate::error::DispatchError;
use crate::segment::SentenceExtraction;
use crate::types::Analysis;

/// A unit of work submitted to an [`Executor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs submitted jobs under a policy the engine does not control.
///
/// There is no ordering guarantee between two submissions.
pub trait Executor: Send + Sync {
    /// Run `job` now or later, on any thread.
    fn execute(&self, job: Job);
}

impl<F> Executor for F
where
    F: Fn(Job) + Send + Sync,
{
    fn execute(&self, job: Job) {
        self(job);
    }
}

/// Runs each job immediately on the submitting thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Runs each job on a new OS thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadExecutor {
    name: Option<String>,
}

impl ThreadExecutor {
    /// Create a thread-per-job executor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the spawned threads.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        let slot = Arc::new(Mutex::new(Some(job)));
        let spawned_slot = Arc::clone(&slot);
        let mut builder = std::thread::Builder::new();
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        let spawned = builder.spawn(move || {
            let job = spawned_slot.lock().ok().and_then(|mut s| s.take());
            if let Some(job) = job {
                job();
            }
        });
        if let Err(error) = spawned {
            tracing::warn!(%error, "failed to spawn worker thread, running job inline");
            let job = slot.lock().ok().and_then(|mut s| s.take());
            if let Some(job) = job {
                job();
            }
        }
    }
}

/// Runs each job on a tokio runtime's blocking pool.
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct TokioExecutor {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "native")]
impl TokioExecutor {
    /// Submit onto the runtime behind `handle`.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Submit onto the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Rejected`] outside a tokio runtime.
    pub fn current() -> Result<Self, DispatchError> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|e| DispatchError::Rejected(e.to_string()))
    }
}

#[cfg(feature = "native")]
impl Executor for TokioExecutor {
    fn execute(&self, job: Job) {
        drop(self.handle.spawn_blocking(job));
    }
}

/// Fires an action at most once across concurrent claimants.
///
/// The first caller of [`fire`](Self::fire) swaps the guard and runs the
/// action; every later caller observes the claimed guard and does nothing.
pub struct ClaimOnce {
    claimed: AtomicBool,
    action: Box<dyn Fn() + Send + Sync>,
}

impl std::fmt::Debug for ClaimOnce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimOnce")
            .field("claimed", &self.is_claimed())
            .finish_non_exhaustive()
    }
}

impl ClaimOnce {
    /// Guard `action`.
    #[must_use]
    pub fn new(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            claimed: AtomicBool::new(false),
            action: Box::new(action),
        }
    }

    /// Claim the guard and run the action. Returns `true` for the winner.
    pub fn fire(&self) -> bool {
        if self.claimed.swap(true, Ordering::AcqRel) {
            return false;
        }
        (self.action)();
        true
    }

    /// Check if the action has been claimed.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

type Check = fn(&Reframer, &str) -> bool;

/// The checks raced by [`AsyncReframer::needs_replacement`].
const REPLACEMENT_CHECKS: [(&str, Check); 3] = [
    ("injunction", Reframer::is_injunction),
    ("not_only_but_also", Reframer::has_not_only_but_also),
    ("conjunction", Reframer::has_conjunction),
];

/// A [`Reframer`] whose operations run on an [`Executor`].
#[derive(Clone)]
pub struct AsyncReframer {
    reframer: Reframer,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for AsyncReframer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncReframer")
            .field("reframer", &self.reframer)
            .finish_non_exhaustive()
    }
}

impl AsyncReframer {
    /// Wrap `reframer`, submitting work to `executor`.
    #[must_use]
    pub fn new(reframer: Reframer, executor: impl Executor + 'static) -> Self {
        Self {
            reframer,
            executor: Arc::new(executor),
        }
    }

    /// Wrap `reframer` with an executor shared with other components.
    #[must_use]
    pub fn with_shared_executor(reframer: Reframer, executor: Arc<dyn Executor>) -> Self {
        Self { reframer, executor }
    }

    /// The wrapped engine.
    #[must_use]
    pub fn reframer(&self) -> &Reframer {
        &self.reframer
    }

    fn submit<T, C>(&self, text: impl Into<String>, compute: fn(&Reframer, &str) -> T, callback: C)
    where
        T: 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let reframer = self.reframer.clone();
        let text = text.into();
        self.executor
            .execute(Box::new(move || callback(compute(&reframer, &text))));
    }

    /// [`Reframer::is_injunction`] with the result delivered to `callback`.
    pub fn is_injunction_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(bool) + Send + 'static,
    ) {
        self.submit(text, Reframer::is_injunction, callback);
    }

    /// [`Reframer::contains_profanity`] with the result delivered to `callback`.
    pub fn contains_profanity_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(bool) + Send + 'static,
    ) {
        self.submit(text, Reframer::contains_profanity, callback);
    }

    /// [`Reframer::has_conjunction`] with the result delivered to `callback`.
    pub fn has_conjunction_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(bool) + Send + 'static,
    ) {
        self.submit(text, Reframer::has_conjunction, callback);
    }

    /// [`Reframer::has_not_only_but_also`] with the result delivered to `callback`.
    pub fn has_not_only_but_also_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(bool) + Send + 'static,
    ) {
        self.submit(text, Reframer::has_not_only_but_also, callback);
    }

    /// [`Reframer::rewrite_not_only`] with the result delivered to `callback`.
    pub fn rewrite_not_only_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(String) + Send + 'static,
    ) {
        self.submit(text, Reframer::rewrite_not_only, callback);
    }

    /// [`Reframer::transform`] with the result delivered to `callback`.
    pub fn transform_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(String) + Send + 'static,
    ) {
        self.submit(text, Reframer::transform, callback);
    }

    /// [`Reframer::suggest_improved_sentence`] with the result delivered to `callback`.
    pub fn suggest_improved_sentence_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(String) + Send + 'static,
    ) {
        self.submit(text, Reframer::suggest_improved_sentence, callback);
    }

    /// [`Reframer::suggest_injunction_replacement`] with the result delivered to `callback`.
    pub fn suggest_injunction_replacement_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(String) + Send + 'static,
    ) {
        self.submit(text, Reframer::suggest_injunction_replacement, callback);
    }

    /// [`Reframer::suggest_conjunction_replacement`] with the result delivered to `callback`.
    pub fn suggest_conjunction_replacement_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(String) + Send + 'static,
    ) {
        self.submit(text, Reframer::suggest_conjunction_replacement, callback);
    }

    /// [`Reframer::extract_complete_sentences`] with the result delivered to `callback`.
    pub fn extract_complete_sentences_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(SentenceExtraction) + Send + 'static,
    ) {
        self.submit(text, Reframer::extract_complete_sentences, callback);
    }

    /// [`Reframer::analyze`] with the result delivered to `callback`.
    pub fn analyze_async(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce(Analysis) + Send + 'static,
    ) {
        self.submit(text, Reframer::analyze, callback);
    }

    /// Race the injunction, "not only" and conjunction checks.
    ///
    /// The three checks are submitted independently. The first to match
    /// fires `action`; later matches do nothing. If none matches, `action`
    /// never runs. The returned guard reports whether it was claimed.
    pub fn needs_replacement(
        &self,
        sentence: impl Into<String>,
        action: impl Fn() + Send + Sync + 'static,
    ) -> Arc<ClaimOnce> {
        let claim = Arc::new(ClaimOnce::new(action));
        let sentence: Arc<str> = Arc::from(sentence.into());

        for (name, check) in REPLACEMENT_CHECKS {
            let reframer = self.reframer.clone();
            let claim = Arc::clone(&claim);
            let sentence = Arc::clone(&sentence);
            self.executor.execute(Box::new(move || {
                if check(&reframer, &sentence) && claim.fire() {
                    tracing::debug!(check = name, "replacement action claimed");
                }
            }));
        }
        claim
    }

    async fn request<T>(&self, text: &str, compute: fn(&Reframer, &str) -> T) -> Result<T, DispatchError>
    where
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.submit(text, compute, move |value| {
            // The receiver may have been dropped by a cancelled caller.
            let _ = tx.send(value);
        });
        rx.await.map_err(|_| DispatchError::Disconnected)
    }
}

/// Awaitable engine operations.
#[async_trait]
pub trait ReframeService: Send + Sync {
    /// See [`Reframer::is_injunction`].
    async fn is_injunction(&self, text: &str) -> Result<bool, DispatchError>;

    /// See [`Reframer::contains_profanity`].
    async fn contains_profanity(&self, text: &str) -> Result<bool, DispatchError>;

    /// See [`Reframer::has_conjunction`].
    async fn has_conjunction(&self, text: &str) -> Result<bool, DispatchError>;

    /// See [`Reframer::has_not_only_but_also`].
    async fn has_not_only_but_also(&self, text: &str) -> Result<bool, DispatchError>;

    /// See [`Reframer::rewrite_not_only`].
    async fn rewrite_not_only(&self, text: &str) -> Result<String, DispatchError>;

    /// See [`Reframer::transform`].
    async fn transform(&self, text: &str) -> Result<String, DispatchError>;

    /// See [`Reframer::suggest_improved_sentence`].
    async fn suggest_improved_sentence(&self, text: &str) -> Result<String, DispatchError>;

    /// See [`Reframer::suggest_injunction_replacement`].
    async fn suggest_injunction_replacement(&self, text: &str) -> Result<String, DispatchError>;

    /// See [`Reframer::suggest_conjunction_replacement`].
    async fn suggest_conjunction_replacement(&self, text: &str) -> Result<String, DispatchError>;

    /// See [`Reframer::extract_complete_sentences`].
    async fn extract_complete_sentences(
        &self,
        text: &str,
    ) -> Result<SentenceExtraction, DispatchError>;

    /// See [`Reframer::analyze`].
    async fn analyze(&self, text: &str) -> Result<Analysis, DispatchError>;
}

#[async_trait]
impl ReframeService for AsyncReframer {
    async fn is_injunction(&self, text: &str) -> Result<bool, DispatchError> {
        self.request(text, Reframer::is_injunction).await
    }

    async fn contains_profanity(&self, text: &str) -> Result<bool, DispatchError> {
        self.request(text, Reframer::contains_profanity).await
    }

    async fn has_conjunction(&self, text: &str) -> Result<bool, DispatchError> {
        self.request(text, Reframer::has_conjunction).await
    }

    async fn has_not_only_but_also(&self, text: &str) -> Result<bool, DispatchError> {
        self.request(text, Reframer::has_not_only_but_also).await
    }

    async fn rewrite_not_only(&self, text: &str) -> Result<String, DispatchError> {
        self.request(text, Reframer::rewrite_not_only).await
    }

    async fn transform(&self, text: &str) -> Result<String, DispatchError> {
        self.request(text, Reframer::transform).await
    }

    async fn suggest_improved_sentence(&self, text: &str) -> Result<String, DispatchError> {
        self.request(text, Reframer::suggest_improved_sentence).await
    }

    async fn suggest_injunction_replacement(&self, text: &str) -> Result<String, DispatchError> {
        self.request(text, Reframer::suggest_injunction_replacement)
            .await
    }

    async fn suggest_conjunction_replacement(&self, text: &str) -> Result<String, DispatchError> {
        self.request(text, Reframer::suggest_conjunction_replacement)
            .await
    }

    async fn extract_complete_sentences(
        &self,
        text: &str,
    ) -> Result<SentenceExtraction, DispatchError> {
        self.request(text, Reframer::extract_complete_sentences)
            .await
    }

    async fn analyze(&self, text: &str) -> Result<Analysis, DispatchError> {
        self.request(text, Reframer::analyze).await
    }
}
