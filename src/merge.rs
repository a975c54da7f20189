//! Reconciliation of per-source partial records into one record per venue.
//!
//! Priority, lowest to highest: static fallback, aggregator, native
//! connector, then registry metadata. A higher tier overwrites a lower one
//! only for fields it actually reports; a missing field never becomes zero.
//! The result depends only on the set of contributions and their order
//! within a tier, never on the order in which the sources completed.

use log::debug;
use rustc_hash::FxHashMap;

use crate::{
    models::{Contribution, PartialRecord, VenueMetrics},
    registry::{Registry, VenueInfo},
};

/// Days in the derived weekly volume when no source reports it.
const DAYS_PER_WEEK: f64 = 7.0;

/// Overlays `upper` onto `base`, field by field, for present fields only.
pub fn overlay(base: &mut PartialRecord, upper: &PartialRecord) {
    fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
        if let Some(v) = value {
            *slot = Some(v.clone());
        }
    }

    set(&mut base.name, &upper.name);
    set(&mut base.chain, &upper.chain);
    set(&mut base.volume_24h, &upper.volume_24h);
    set(&mut base.volume_7d, &upper.volume_7d);
    set(&mut base.total_value_locked, &upper.total_value_locked);
    set(&mut base.open_interest, &upper.open_interest);
    set(&mut base.pair_count, &upper.pair_count);
    set(&mut base.maker_fee, &upper.maker_fee);
    set(&mut base.taker_fee, &upper.taker_fee);
    set(&mut base.max_leverage, &upper.max_leverage);
    set(&mut base.referral_url, &upper.referral_url);
    set(&mut base.icon, &upper.icon);
}

/// Registry metadata as the top-priority overlay.
fn metadata_record(venue: &VenueInfo) -> PartialRecord {
    PartialRecord {
        name: Some(venue.name.to_string()),
        chain: Some(venue.chain.to_string()),
        maker_fee: Some(venue.maker_fee.to_string()),
        taker_fee: Some(venue.taker_fee.to_string()),
        max_leverage: Some(venue.max_leverage.to_string()),
        referral_url: Some(venue.referral_url.to_string()),
        icon: Some(venue.icon.to_string()),
        ..Default::default()
    }
}

fn finalize(venue: &VenueInfo, record: PartialRecord) -> VenueMetrics {
    let mut metrics = VenueMetrics::from_venue(venue);
    let volume_24h = record.volume_24h.unwrap_or(0.0);

    metrics.name = record.name.unwrap_or(metrics.name);
    metrics.chain = record.chain.unwrap_or(metrics.chain);
    metrics.volume_24h = volume_24h;
    metrics.volume_7d = record.volume_7d.unwrap_or(volume_24h * DAYS_PER_WEEK);
    metrics.total_value_locked = record.total_value_locked.unwrap_or(0.0);
    metrics.open_interest = record.open_interest.unwrap_or(0.0);
    metrics.pair_count = record.pair_count.unwrap_or(0);
    metrics.maker_fee = record.maker_fee.unwrap_or(metrics.maker_fee);
    metrics.taker_fee = record.taker_fee.unwrap_or(metrics.taker_fee);
    metrics.max_leverage = record.max_leverage.unwrap_or(metrics.max_leverage);
    metrics.referral_url = record.referral_url.unwrap_or(metrics.referral_url);
    metrics.icon = record.icon.unwrap_or(metrics.icon);
    metrics
}

/// Merges every contribution into one record per registry venue.
///
/// Venues with no data-bearing contribution are dropped rather than
/// reported as zero. Output follows registry order; sorting is the
/// caller's concern.
pub fn merge(registry: &Registry, contributions: &[Contribution]) -> Vec<VenueMetrics> {
    // Stable sort: tier order first, then submission order within a tier
    let mut ordered: Vec<&Contribution> = contributions.iter().collect();
    ordered.sort_by_key(|c| c.tier);

    let mut merged: FxHashMap<&str, PartialRecord> = FxHashMap::default();

    for contribution in ordered {
        if !contribution.record.has_data() {
            continue;
        }
        let Some(venue) = registry.get(&contribution.venue_id) else {
            debug!(
                "Ignoring {} contribution for unknown venue {}",
                contribution.source, contribution.venue_id
            );
            continue;
        };
        overlay(merged.entry(venue.id).or_default(), &contribution.record);
    }

    registry
        .venues()
        .iter()
        .filter_map(|venue| {
            let mut record = merged.remove(venue.id)?;
            overlay(&mut record, &metadata_record(venue));
            Some(finalize(venue, record))
        })
        .collect()
}

/// Sorts descending by 24h volume, ties broken by id.
pub fn sort_by_volume(metrics: &mut [VenueMetrics]) {
    metrics.sort_by(|a, b| {
        b.volume_24h
            .total_cmp(&a.volume_24h)
            .then_with(|| a.id.cmp(&b.id))
    });
}
