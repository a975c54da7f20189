use anyhow::Result;
use chrono::NaiveDate;
use futures::future::BoxFuture;

use crate::models::Snapshot;

/// Append-only, date-keyed history of per-venue metrics.
///
/// Implementations are interchangeable; the orchestrator only ever talks
/// to `Arc<dyn SnapshotStore>`.
pub trait SnapshotStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Idempotent upsert keyed by `(date, venue id)`.
    fn record<'a>(&'a self, snapshot: &'a Snapshot) -> BoxFuture<'a, Result<()>>;

    /// Snapshots recorded on exactly these dates. Dates with nothing stored
    /// are absent from the result, never synthesised.
    fn fetch<'a>(&'a self, dates: &'a [NaiveDate]) -> BoxFuture<'a, Result<Vec<Snapshot>>>;

    /// Most recent snapshot, for serving reads without a live pass.
    /// Backends that do not serve reads keep the default.
    fn latest(&self) -> BoxFuture<'_, Result<Option<Snapshot>>> {
        Box::pin(async { Ok(None) })
    }
}
