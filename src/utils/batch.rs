//! Best-effort concurrent fan-out.
//!
//! Every task gets its own timeout and its own outcome slot. One task timing
//! out, failing or panicking never cancels or corrupts its siblings, and the
//! outcomes come back in submission order regardless of completion order.

use std::time::Duration;

use futures::future::{join_all, BoxFuture};
use log::{debug, warn};

/// Result of one fan-out task.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Failed(String),
    TimedOut,
}

impl<T> Outcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// A labelled unit of work for [`join_all_outcomes`].
pub struct Task<T> {
    pub label: String,
    pub future: BoxFuture<'static, anyhow::Result<T>>,
}

impl<T> Task<T> {
    pub fn new(label: impl Into<String>, future: BoxFuture<'static, anyhow::Result<T>>) -> Self {
        Self {
            label: label.into(),
            future,
        }
    }
}

/// Spawns every task, bounds each by `timeout`, and waits for all of them.
///
/// Failures are logged at warn level here so callers only deal with
/// values. The returned vector is index-aligned with `tasks`.
pub async fn join_all_outcomes<T: Send + 'static>(
    tasks: Vec<Task<T>>,
    timeout: Duration,
) -> Vec<Outcome<T>> {
    let labels: Vec<String> = tasks.iter().map(|t| t.label.clone()).collect();

    let handles = tasks.into_iter().map(|task| {
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, task.future).await {
                Ok(Ok(value)) => Outcome::Success(value),
                Ok(Err(e)) => Outcome::Failed(format!("{:#}", e)),
                Err(_) => Outcome::TimedOut,
            }
        })
    });

    let results = join_all(handles).await;

    results
        .into_iter()
        .zip(labels)
        .map(|(joined, label)| {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Outcome::Failed(format!("task panicked: {}", e)),
            };
            match &outcome {
                Outcome::Success(_) => debug!("{}: ok", label),
                Outcome::Failed(reason) => warn!("{}: failed: {}", label, reason),
                Outcome::TimedOut => warn!("{}: timed out after {:?}", label, timeout),
            }
            outcome
        })
        .collect()
}

/// Runs `fetch` over `items` in sequential rounds of `batch_size` concurrent
/// calls. Failed items yield `None` at their index.
///
/// Used for per-instrument endpoints where hundreds of markets would
/// otherwise trip upstream rate limits.
pub async fn fetch_in_batches<I, T, F, Fut>(items: &[I], batch_size: usize, fetch: F) -> Vec<Option<T>>
where
    F: Fn(&I) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    let mut out = Vec::with_capacity(items.len());

    for chunk in items.chunks(batch_size.max(1)) {
        let round = join_all(chunk.iter().map(&fetch)).await;
        out.extend(round.into_iter().map(|r| r.ok()));
    }

    out
}
