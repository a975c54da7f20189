use serde::{Deserialize, Serialize};

use crate::registry::VenueInfo;

/// Canonical per-venue record returned by the orchestrator.
///
/// Built fresh on every pass; the venue id is its only stable identity.
/// Fee and leverage fields stay strings because schedules are tiered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueMetrics {
    pub id: String,
    pub name: String,
    pub chain: String,
    pub volume_24h: f64,
    pub volume_7d: f64,
    pub total_value_locked: f64,
    pub open_interest: f64,
    pub pair_count: u32,
    pub maker_fee: String,
    pub taker_fee: String,
    pub max_leverage: String,
    pub referral_url: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<Variation>,
}

impl VenueMetrics {
    /// Empty record carrying only the registry metadata.
    pub fn from_venue(venue: &VenueInfo) -> Self {
        Self {
            id: venue.id.to_string(),
            name: venue.name.to_string(),
            chain: venue.chain.to_string(),
            volume_24h: 0.0,
            volume_7d: 0.0,
            total_value_locked: 0.0,
            open_interest: 0.0,
            pair_count: 0,
            maker_fee: venue.maker_fee.to_string(),
            taker_fee: venue.taker_fee.to_string(),
            max_leverage: venue.max_leverage.to_string(),
            referral_url: venue.referral_url.to_string(),
            icon: venue.icon.to_string(),
            variation: None,
        }
    }
}

/// Signed ratios against the snapshots 1, 7 and 30 days back.
/// `None` means no snapshot existed on that exact date, or it was zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChange {
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
    pub change_30d: Option<f64>,
}

impl MetricChange {
    pub fn is_empty(&self) -> bool {
        self.change_24h.is_none() && self.change_7d.is_none() && self.change_30d.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub volume: MetricChange,
    pub open_interest: MetricChange,
}

/// Market-wide sums over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTotals {
    pub venues: usize,
    pub volume_24h: f64,
    pub volume_7d: f64,
    pub open_interest: f64,
}

impl MarketTotals {
    pub fn from_metrics(metrics: &[VenueMetrics]) -> Self {
        metrics.iter().fold(Self::default(), |mut acc, m| {
            acc.venues += 1;
            acc.volume_24h += m.volume_24h;
            acc.volume_7d += m.volume_7d;
            acc.open_interest += m.open_interest;
            acc
        })
    }
}
