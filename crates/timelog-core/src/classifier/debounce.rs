//! Cancel-and-reschedule timer.
//!
//! Every `schedule` cancels the previously armed attempt before arming a
//! new one, so a burst of edits produces at most one call, fired once the
//! input has been quiet for the configured delay.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::rules::ActivityClassifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceOutcome<T> {
    Fired(T),
    Cancelled,
}

/// Handle to one scheduled attempt.
#[derive(Debug)]
pub struct Pending<T> {
    token: CancellationToken,
    task: JoinHandle<Option<T>>,
}

impl<T> Pending<T> {
    /// Cancel the attempt if it has not fired yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token that cancels this attempt, for owners that outlive the handle.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait until the attempt either fires or is cancelled.
    pub async fn outcome(self) -> DebounceOutcome<T> {
        match self.task.await {
            Ok(Some(value)) => DebounceOutcome::Fired(value),
            Ok(None) | Err(_) => DebounceOutcome::Cancelled,
        }
    }
}

/// Owns the single armed attempt. Dropping the debouncer cancels it, so a
/// torn-down form never receives a stale callback.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    armed: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, armed: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm `f` to run after the quiet period, cancelling any earlier
    /// attempt. Must be called inside a tokio runtime.
    pub fn schedule<F, T>(&mut self, f: F) -> Pending<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let guard = token.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => None,
                _ = tokio::time::sleep(delay) => Some(f()),
            }
        });

        self.armed = Some(token.clone());
        Pending { token, task }
    }

    /// Cancel the armed attempt, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.armed.take() {
            if !token.is_cancelled() {
                trace!("debounced attempt superseded");
            }
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Debounced category suggestion for a title field.
pub struct ClassificationDebouncer {
    classifier: Arc<ActivityClassifier>,
    debouncer: Debouncer,
}

impl ClassificationDebouncer {
    pub fn new(classifier: Arc<ActivityClassifier>, quiet_period: Duration) -> Self {
        Self {
            classifier,
            debouncer: Debouncer::new(quiet_period),
        }
    }

    /// Record a title edit. The returned attempt resolves to the suggested
    /// category unless a later edit supersedes it.
    pub fn title_changed(&mut self, title: impl Into<String>) -> Pending<Option<String>> {
        let classifier = Arc::clone(&self.classifier);
        let title = title.into();
        self.debouncer
            .schedule(move || classifier.classify(&title).map(str::to_string))
    }

    /// Drop any pending suggestion, e.g. when the form closes.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
