mod metrics;
mod partial;
mod snapshot;

pub use metrics::{MarketTotals, MetricChange, Variation, VenueMetrics};
pub use partial::{Contribution, PartialRecord, Tier};
pub use snapshot::{Snapshot, SnapshotEntry};
