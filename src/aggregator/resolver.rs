use std::sync::Arc;

use log::{debug, warn};

use super::feed::{OverviewEntry, OverviewFeed, OverviewKind};
use crate::{
    cache::ResultCache,
    models::{Contribution, PartialRecord, Tier},
    registry::{Registry, VenueInfo},
};

type Overview = Arc<Vec<OverviewEntry>>;

/// Produces the aggregator tier for every registry venue, matched by alias.
///
/// Nothing is short-circuited here. A venue with a native connector still
/// gets an aggregator contribution; the merger decides per field.
pub struct FallbackResolver {
    feed: Arc<dyn OverviewFeed>,
    cache: ResultCache<OverviewKind, Overview>,
}

impl FallbackResolver {
    pub fn new(feed: Arc<dyn OverviewFeed>, cache: ResultCache<OverviewKind, Overview>) -> Self {
        Self { feed, cache }
    }

    /// Overview listing through the cache. Failures degrade to an empty
    /// listing so the static tier still applies.
    async fn overview(&self, kind: OverviewKind) -> Overview {
        let feed = self.feed.clone();
        let result = self
            .cache
            .get_or_compute(kind, async move { feed.fetch(kind).await.map(Arc::new) })
            .await;

        match result {
            Ok(entries) => entries,
            Err(e) => {
                warn!("aggregator {}: {:#}", kind, e);
                Arc::new(Vec::new())
            },
        }
    }

    pub async fn resolve(&self, registry: &Registry) -> Vec<Contribution> {
        let (derivatives, open_interest) = tokio::join!(
            self.overview(OverviewKind::Derivatives),
            self.overview(OverviewKind::OpenInterest)
        );

        let mut contributions = Vec::new();

        for venue in registry.venues() {
            let record = aggregator_record(venue, &derivatives, &open_interest);
            if record.has_data() {
                contributions.push(Contribution::new(venue.id, Tier::Aggregator, "aggregator", record));
            } else {
                debug!("aggregator: no entry for {}", venue.id);
            }
        }

        contributions
    }
}

/// Best matching entry for a venue. When several rows match (e.g. separate
/// v1/v2 listings) the one with the largest `total24h` wins.
fn find_entry<'a>(venue: &VenueInfo, entries: &'a [OverviewEntry]) -> Option<&'a OverviewEntry> {
    entries
        .iter()
        .filter(|entry| entry.identifiers().any(|id| venue.matches_alias(id)))
        .max_by(|a, b| {
            a.total24h
                .unwrap_or(0.0)
                .total_cmp(&b.total24h.unwrap_or(0.0))
        })
}

fn aggregator_record(
    venue: &VenueInfo,
    derivatives: &[OverviewEntry],
    open_interest: &[OverviewEntry],
) -> PartialRecord {
    let mut record = PartialRecord::default();

    if let Some(entry) = find_entry(venue, derivatives) {
        if let Some(volume) = entry.total24h {
            record = record.with_volume_24h(volume);
        }
        if let Some(volume) = entry.total7d {
            record = record.with_volume_7d(volume);
        }
    }

    if let Some(oi) = find_entry(venue, open_interest).and_then(|entry| entry.total24h) {
        record = record.with_open_interest(oi);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedFeed {
        derivatives: Vec<OverviewEntry>,
        open_interest: Option<Vec<OverviewEntry>>,
        calls: AtomicUsize,
    }

    impl OverviewFeed for FixedFeed {
        fn fetch(&self, kind: OverviewKind) -> BoxFuture<'_, anyhow::Result<Vec<OverviewEntry>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match kind {
                OverviewKind::Derivatives => Ok(self.derivatives.clone()),
                OverviewKind::OpenInterest => self
                    .open_interest
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("HTTP 503")),
            };
            Box::pin(async move { result })
        }
    }

    fn entry(name: &str, slug: &str, total24h: f64) -> OverviewEntry {
        OverviewEntry {
            name: name.to_string(),
            slug: Some(slug.to_string()),
            total24h: Some(total24h),
            ..Default::default()
        }
    }

    fn resolver(feed: FixedFeed) -> (Arc<FixedFeed>, FallbackResolver) {
        let feed = Arc::new(feed);
        let resolver = FallbackResolver::new(feed.clone(), ResultCache::new(crate::cache::DEFAULT_TTL));
        (feed, resolver)
    }

    fn only(registry_ids: &[&str]) -> Registry {
        let venues = registry_ids
            .iter()
            .map(|id| registry::venue(id).unwrap().clone())
            .collect();
        Registry::new(venues, Vec::new())
    }

    #[tokio::test]
    async fn test_matches_by_alias_and_merges_both_overviews() {
        let (_, resolver) = resolver(FixedFeed {
            derivatives: vec![
                entry("GMX V1 Perps", "gmx-v1-perps", 1.0),
                entry("GMX V2 Perps", "gmx-v2-perps", 250_000_000.0),
            ],
            open_interest: Some(vec![entry("GMX V2 Perps", "gmx-v2-perps", 300_000_000.0)]),
            calls: AtomicUsize::new(0),
        });

        let contributions = resolver.resolve(&only(&["gmx", "vertex"])).await;
        assert_eq!(contributions.len(), 1);

        let gmx = &contributions[0];
        assert_eq!(gmx.venue_id, "gmx");
        assert_eq!(gmx.tier, Tier::Aggregator);
        assert_eq!(gmx.record.volume_24h, Some(250_000_000.0));
        assert_eq!(gmx.record.open_interest, Some(300_000_000.0));
    }

    #[tokio::test]
    async fn test_failed_overview_degrades_to_partial_data() {
        let (_, resolver) = resolver(FixedFeed {
            derivatives: vec![entry("Paradex Perps", "paradex-perps", 5.0)],
            open_interest: None,
            calls: AtomicUsize::new(0),
        });

        let contributions = resolver.resolve(&only(&["paradex"])).await;
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].record.volume_24h, Some(5.0));
        assert_eq!(contributions[0].record.open_interest, None);
    }

    #[tokio::test]
    async fn test_overviews_are_cached_across_passes() {
        let (feed, resolver) = resolver(FixedFeed {
            derivatives: Vec::new(),
            open_interest: Some(Vec::new()),
            calls: AtomicUsize::new(0),
        });

        resolver.resolve(&only(&["dydx"])).await;
        resolver.resolve(&only(&["dydx"])).await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_only_aggregator_tier_is_emitted() {
        let (_, resolver) = resolver(FixedFeed {
            derivatives: vec![entry("dYdX V4", "dydx-v4", 9.0)],
            open_interest: Some(Vec::new()),
            calls: AtomicUsize::new(0),
        });

        let contributions = resolver.resolve(&Registry::builtin()).await;
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].venue_id, "dydx");
        assert_eq!(contributions[0].tier, Tier::Aggregator);
    }
}
