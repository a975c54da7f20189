use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::VenueMetrics;

/// The two metrics persisted per venue per day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub volume_24h: f64,
    pub open_interest: f64,
}

/// One day of history, keyed by venue id.
///
/// Stored as `{ "date": "YYYY-MM-DD", "data": { "<venue>": {...} } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub data: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    pub fn new(date: NaiveDate, data: BTreeMap<String, SnapshotEntry>) -> Self {
        Self { date, data }
    }

    pub fn from_metrics(date: NaiveDate, metrics: &[VenueMetrics]) -> Self {
        let data = metrics
            .iter()
            .map(|m| {
                (
                    m.id.clone(),
                    SnapshotEntry {
                        volume_24h: m.volume_24h,
                        open_interest: m.open_interest,
                    },
                )
            })
            .collect();

        Self { date, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
