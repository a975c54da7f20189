//! The collection pass: fan out to every source, reconcile, persist and
//! attach day/week/month deltas.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use log::{error, info, warn};

use crate::{
    aggregator::{FallbackResolver, LlamaFeed},
    cache::ResultCache,
    config::Settings,
    db::SnapshotStore,
    merge::{merge, sort_by_volume},
    models::{Contribution, PartialRecord, Snapshot, Tier, VenueMetrics},
    registry::Registry,
    sources::{default_connectors, Connector, HttpClient},
    utils::{join_all_outcomes, Outcome, Task},
    variation::{apply_variation, lookback_dates},
};

/// Options for [`PerpDexService::fetch_perp_dex_data`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Force a live pass and persist today's snapshot.
    pub refresh: bool,
}

impl FetchOptions {
    pub fn refresh() -> Self {
        Self { refresh: true }
    }
}

pub struct PerpDexService {
    registry: Arc<Registry>,
    connectors: Vec<Arc<dyn Connector>>,
    resolver: Arc<FallbackResolver>,
    store: Arc<dyn SnapshotStore>,
    http: HttpClient,
    connector_timeout: Duration,
}

impl PerpDexService {
    /// Production wiring: built-in registry, every native connector and the
    /// HTTP aggregator feed behind the result cache.
    pub fn from_settings(settings: &Settings, store: Arc<dyn SnapshotStore>) -> anyhow::Result<Self> {
        let http = HttpClient::new(&settings.http).context("Failed to initialize HTTP client")?;
        let feed = Arc::new(LlamaFeed::new(http.clone(), settings.aggregator.base_url.clone()));
        let cache = ResultCache::new(Duration::from_secs(settings.aggregator.cache_ttl_secs));

        Ok(Self::new(
            Registry::builtin(),
            default_connectors(),
            FallbackResolver::new(feed, cache),
            store,
            http,
        ))
    }

    pub fn new(
        registry: Registry,
        connectors: Vec<Arc<dyn Connector>>,
        resolver: FallbackResolver,
        store: Arc<dyn SnapshotStore>,
        http: HttpClient,
    ) -> Self {
        let connector_timeout = http.timeout();
        Self {
            registry: Arc::new(registry),
            connectors,
            resolver: Arc::new(resolver),
            store,
            http,
            connector_timeout,
        }
    }

    /// Bound applied to each source in the fan-out, independent of the
    /// HTTP client's own timeout.
    pub fn with_connector_timeout(mut self, timeout: Duration) -> Self {
        self.connector_timeout = timeout;
        self
    }

    /// Current metrics for every venue that has any data, sorted by 24h
    /// volume descending.
    ///
    /// Without `refresh`, a stored snapshot is served when the backend has
    /// one. Otherwise a live pass runs; with `refresh` its result is
    /// recorded as today's snapshot. Source and storage failures degrade
    /// the result but never fail the call.
    pub async fn fetch_perp_dex_data(&self, options: FetchOptions) -> anyhow::Result<Vec<VenueMetrics>> {
        if !options.refresh {
            if let Some(metrics) = self.serve_latest().await {
                return Ok(metrics);
            }
        }

        let today = Utc::now().date_naive();
        let mut metrics = self.live_pass().await;

        if metrics.is_empty() {
            warn!("Live pass produced no data, not even static estimates");
            return Ok(metrics);
        }

        if options.refresh {
            let snapshot = Snapshot::from_metrics(today, &metrics);
            match self.store.record(&snapshot).await {
                Ok(()) => info!(
                    "Recorded {} snapshot for {} ({} venues)",
                    self.store.backend(),
                    today,
                    snapshot.data.len()
                ),
                Err(e) => error!("Failed to record snapshot for {}: {:#}", today, e),
            }
        }

        let history = self.history(today).await;
        apply_variation(&mut metrics, today, &history);
        sort_by_volume(&mut metrics);

        Ok(metrics)
    }

    /// Every source, concurrently. A failed, timed out or panicked source
    /// contributes nothing; the static estimates always apply.
    async fn live_pass(&self) -> Vec<VenueMetrics> {
        let start = std::time::Instant::now();
        let mut tasks: Vec<Task<Vec<Contribution>>> = Vec::with_capacity(self.connectors.len() + 1);

        for connector in &self.connectors {
            let connector = connector.clone();
            let http = self.http.clone();
            let venue_id = connector.venue_id();
            tasks.push(Task::new(
                venue_id,
                Box::pin(async move {
                    let record = connector.attempt(&http).await?;
                    Ok(vec![Contribution::new(venue_id, Tier::Native, venue_id, record)])
                }),
            ));
        }

        let resolver = self.resolver.clone();
        let registry = self.registry.clone();
        tasks.push(Task::new(
            "aggregator",
            Box::pin(async move { Ok(resolver.resolve(&registry).await) }),
        ));

        let outcomes = join_all_outcomes(tasks, self.connector_timeout).await;
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let total = outcomes.len();

        // Static tier sits outside the time-bounded tasks
        let mut contributions = self.registry.fallback_contributions();
        contributions.extend(outcomes.into_iter().filter_map(Outcome::ok).flatten());

        let metrics = merge(&self.registry, &contributions);
        info!(
            "Live pass: {}/{} sources succeeded, {} venues in {:?}",
            succeeded,
            total,
            metrics.len(),
            start.elapsed()
        );
        metrics
    }

    /// Latest stored snapshot hydrated with registry metadata, with the
    /// deltas as of the snapshot's own date.
    async fn serve_latest(&self) -> Option<Vec<VenueMetrics>> {
        let snapshot = match self.store.latest().await {
            Ok(Some(snapshot)) if !snapshot.is_empty() => snapshot,
            Ok(_) => return None,
            Err(e) => {
                error!("Failed to read latest {} snapshot: {:#}", self.store.backend(), e);
                return None;
            },
        };

        let contributions: Vec<Contribution> = snapshot
            .data
            .iter()
            .map(|(venue_id, entry)| {
                let record = PartialRecord {
                    volume_24h: Some(entry.volume_24h),
                    open_interest: Some(entry.open_interest),
                    ..Default::default()
                };
                Contribution::new(venue_id.clone(), Tier::Native, "snapshot", record)
            })
            .collect();

        let mut metrics = merge(&self.registry, &contributions);
        if metrics.is_empty() {
            return None;
        }

        let history = self.history(snapshot.date).await;
        apply_variation(&mut metrics, snapshot.date, &history);
        sort_by_volume(&mut metrics);

        info!("Serving {} snapshot from {}", self.store.backend(), snapshot.date);
        Some(metrics)
    }

    async fn history(&self, base: NaiveDate) -> Vec<Snapshot> {
        let dates = lookback_dates(base);
        match self.store.fetch(&dates).await {
            Ok(history) => history,
            Err(e) => {
                error!("Failed to load snapshot history for {}: {:#}", base, e);
                Vec::new()
            },
        }
    }
}
