use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::validate_usd_amount;

/// Output of a single source for a single venue.
///
/// Every field is optional: `None` means the source has no opinion, which
/// is different from reporting zero. The merger only overlays `Some` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRecord {
    pub name: Option<String>,
    pub chain: Option<String>,
    pub volume_24h: Option<f64>,
    pub volume_7d: Option<f64>,
    pub total_value_locked: Option<f64>,
    pub open_interest: Option<f64>,
    pub pair_count: Option<u32>,
    pub maker_fee: Option<String>,
    pub taker_fee: Option<String>,
    pub max_leverage: Option<String>,
    pub referral_url: Option<String>,
    pub icon: Option<String>,
}

impl PartialRecord {
    pub fn with_volume_24h(mut self, volume: f64) -> Self {
        self.volume_24h = validate_usd_amount(volume);
        self
    }

    pub fn with_volume_7d(mut self, volume: f64) -> Self {
        self.volume_7d = validate_usd_amount(volume);
        self
    }

    pub fn with_open_interest(mut self, open_interest: f64) -> Self {
        self.open_interest = validate_usd_amount(open_interest);
        self
    }

    pub fn with_total_value_locked(mut self, tvl: f64) -> Self {
        self.total_value_locked = validate_usd_amount(tvl);
        self
    }

    pub fn with_pair_count(mut self, pairs: u32) -> Self {
        self.pair_count = Some(pairs);
        self
    }

    /// True when at least one metric field is present. Metadata alone does
    /// not count: a venue backed only by metadata is not reported.
    pub fn has_data(&self) -> bool {
        self.volume_24h.is_some()
            || self.volume_7d.is_some()
            || self.total_value_locked.is_some()
            || self.open_interest.is_some()
            || self.pair_count.is_some()
    }
}

/// Priority tier of a contribution. Declaration order is merge order:
/// later tiers overwrite earlier ones field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    StaticFallback,
    Aggregator,
    Native,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::StaticFallback => write!(f, "static"),
            Tier::Aggregator => write!(f, "aggregator"),
            Tier::Native => write!(f, "native"),
        }
    }
}

/// A partial record tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub venue_id: String,
    pub tier: Tier,
    pub source: String,
    pub record: PartialRecord,
}

impl Contribution {
    pub fn new(
        venue_id: impl Into<String>,
        tier: Tier,
        source: impl Into<String>,
        record: PartialRecord,
    ) -> Self {
        Self {
            venue_id: venue_id.into(),
            tier,
            source: source.into(),
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_amounts_stay_missing() {
        let record = PartialRecord::default()
            .with_volume_24h(f64::NAN)
            .with_open_interest(-5.0)
            .with_volume_7d(f64::INFINITY);
        assert_eq!(record.volume_24h, None);
        assert_eq!(record.open_interest, None);
        assert_eq!(record.volume_7d, None);
        assert!(!record.has_data());
    }

    #[test]
    fn test_zero_is_data() {
        let record = PartialRecord::default().with_open_interest(0.0);
        assert_eq!(record.open_interest, Some(0.0));
        assert!(record.has_data());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::StaticFallback < Tier::Aggregator);
        assert!(Tier::Aggregator < Tier::Native);
    }
}
