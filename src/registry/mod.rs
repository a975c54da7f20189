//! Static per-venue data.
//!
//! - [`venues`] - Display metadata and aggregator aliases, one row per venue
//! - [`fallback`] - Conservative metric estimates, the lowest priority tier

mod fallback;
mod venues;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::models::{Contribution, PartialRecord, Tier};

pub use fallback::{FallbackEstimate, FALLBACK_ESTIMATES};
pub use venues::{VenueInfo, VENUES};

static VENUE_INDEX: Lazy<FxHashMap<&'static str, &'static VenueInfo>> =
    Lazy::new(|| VENUES.iter().map(|v| (v.id, v)).collect());

/// Look up a built-in venue by id.
pub fn venue(id: &str) -> Option<&'static VenueInfo> {
    VENUE_INDEX.get(id).copied()
}

/// The set of venues a collection pass works over, together with the static
/// fallback tier for them.
///
/// [`Registry::builtin`] is what production uses; tests build their own.
#[derive(Debug, Clone)]
pub struct Registry {
    venues: Vec<VenueInfo>,
    fallback: Vec<(String, PartialRecord)>,
}

impl Registry {
    pub fn new(venues: Vec<VenueInfo>, fallback: Vec<(String, PartialRecord)>) -> Self {
        Self { venues, fallback }
    }

    pub fn builtin() -> Self {
        let fallback = FALLBACK_ESTIMATES
            .iter()
            .map(|estimate| (estimate.venue_id.to_string(), estimate.to_record()))
            .collect();

        Self::new(VENUES.to_vec(), fallback)
    }

    pub fn venues(&self) -> &[VenueInfo] {
        &self.venues
    }

    pub fn get(&self, id: &str) -> Option<&VenueInfo> {
        self.venues.iter().find(|v| v.id == id)
    }

    /// Static-tier contributions, one per venue that has an estimate.
    pub fn fallback_contributions(&self) -> Vec<Contribution> {
        self.fallback
            .iter()
            .filter(|(id, _)| self.get(id).is_some())
            .map(|(id, record)| Contribution::new(id.clone(), Tier::StaticFallback, "static", record.clone()))
            .collect()
    }
}
