use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate, Utc};
use futures::future::BoxFuture;

use perpwatch::aggregator::{FallbackResolver, OverviewEntry, OverviewFeed, OverviewKind};
use perpwatch::cache::ResultCache;
use perpwatch::config::HttpSettings;
use perpwatch::db::FileSnapshotStore;
use perpwatch::models::{PartialRecord, Snapshot};
use perpwatch::registry::{self, Registry};
use perpwatch::sources::{Connector, HttpClient};
use perpwatch::{open_store, FetchOptions, PerpDexService, Settings, SnapshotStore};

struct StaticConnector {
    venue_id: &'static str,
    record: PartialRecord,
}

impl Connector for StaticConnector {
    fn venue_id(&self) -> &'static str {
        self.venue_id
    }

    fn attempt<'a>(&'a self, _http: &'a HttpClient) -> BoxFuture<'a, anyhow::Result<PartialRecord>> {
        let record = self.record.clone();
        Box::pin(async move { Ok(record) })
    }
}

struct ListingFeed {
    derivatives: Vec<OverviewEntry>,
}

impl OverviewFeed for ListingFeed {
    fn fetch(&self, kind: OverviewKind) -> BoxFuture<'_, anyhow::Result<Vec<OverviewEntry>>> {
        let result = match kind {
            OverviewKind::Derivatives => Ok(self.derivatives.clone()),
            OverviewKind::OpenInterest => Err(anyhow::anyhow!("upstream unavailable")),
        };
        Box::pin(async move { result })
    }
}

fn builtin_subset(ids: &[&str], fallback: Vec<(String, PartialRecord)>) -> Registry {
    let venues = ids
        .iter()
        .map(|id| registry::venue(id).unwrap().clone())
        .collect();
    Registry::new(venues, fallback)
}

fn service(
    registry: Registry,
    connectors: Vec<Arc<dyn Connector>>,
    feed: ListingFeed,
    store: Arc<dyn SnapshotStore>,
) -> PerpDexService {
    let resolver = FallbackResolver::new(Arc::new(feed), ResultCache::new(Duration::from_secs(300)));
    let http = HttpClient::new(&HttpSettings::default()).unwrap();
    PerpDexService::new(registry, connectors, resolver, store, http)
        .with_connector_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn test_priority_tiers_across_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(dir.path().join("s.json"), 90));

    let fallback = vec![
        (
            "dydx".to_string(),
            PartialRecord::default()
                .with_volume_24h(1.0)
                .with_open_interest(2.0)
                .with_pair_count(3),
        ),
        ("gmx".to_string(), PartialRecord::default().with_volume_24h(10.0)),
    ];
    let registry = builtin_subset(&["dydx", "gmx", "vertex"], fallback);

    let connectors: Vec<Arc<dyn Connector>> = vec![Arc::new(StaticConnector {
        venue_id: "dydx",
        record: PartialRecord {
            name: Some("spoofed".to_string()),
            ..PartialRecord::default().with_volume_24h(300.0)
        },
    })];

    let feed = ListingFeed {
        derivatives: vec![OverviewEntry {
            name: "dYdX V4".to_string(),
            slug: Some("dydx-v4".to_string()),
            total24h: Some(200.0),
            total7d: Some(1_400.0),
            ..Default::default()
        }],
    };

    let svc = service(registry, connectors, feed, store);
    let metrics = svc.fetch_perp_dex_data(FetchOptions::default()).await.unwrap();

    let ids: Vec<&str> = metrics.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["dydx", "gmx"]);

    let dydx = &metrics[0];
    // Native beats aggregator, aggregator beats static, field by field
    assert_eq!(dydx.volume_24h, 300.0);
    assert_eq!(dydx.volume_7d, 1_400.0);
    assert_eq!(dydx.open_interest, 2.0);
    assert_eq!(dydx.pair_count, 3);
    // Registry metadata always wins
    assert_eq!(dydx.name, registry::venue("dydx").unwrap().name);

    let gmx = &metrics[1];
    assert_eq!(gmx.volume_24h, 10.0);
    assert_eq!(gmx.volume_7d, 70.0);
    assert_eq!(gmx.open_interest, 0.0);
}

#[tokio::test]
async fn test_daily_refreshes_build_history() {
    let dir = tempfile::tempdir().unwrap();
    let file_store = Arc::new(FileSnapshotStore::new(dir.path().join("s.json"), 3));
    let store: Arc<dyn SnapshotStore> = file_store.clone();

    let today = Utc::now().date_naive();
    let days_back = |n: u64| -> NaiveDate { today.checked_sub_days(Days::new(n)).unwrap() };

    for n in [30u64, 9, 7, 1] {
        let mut snapshot = Snapshot::new(days_back(n), Default::default());
        snapshot.data.insert(
            "paradex".to_string(),
            perpwatch::models::SnapshotEntry {
                volume_24h: 50.0,
                open_interest: 10.0,
            },
        );
        store.record(&snapshot).await.unwrap();
    }

    // Ring buffer of 3 dropped the 30-day anchor
    let kept: Vec<NaiveDate> = file_store.load().await.unwrap().iter().map(|s| s.date).collect();
    assert_eq!(kept, vec![days_back(9), days_back(7), days_back(1)]);

    let connectors: Vec<Arc<dyn Connector>> = vec![Arc::new(StaticConnector {
        venue_id: "paradex",
        record: PartialRecord::default()
            .with_volume_24h(100.0)
            .with_open_interest(10.0),
    })];
    let svc = service(
        builtin_subset(&["paradex"], Vec::new()),
        connectors,
        ListingFeed {
            derivatives: Vec::new(),
        },
        store.clone(),
    );

    let metrics = svc.fetch_perp_dex_data(FetchOptions::refresh()).await.unwrap();
    let variation = metrics[0].variation.unwrap();
    assert_eq!(variation.volume.change_24h, Some(1.0));
    assert_eq!(variation.volume.change_7d, Some(1.0));
    assert_eq!(variation.volume.change_30d, None);
    assert_eq!(variation.open_interest.change_24h, Some(0.0));

    // Same-day refresh replaces rather than appends
    svc.fetch_perp_dex_data(FetchOptions::refresh()).await.unwrap();
    let kept: Vec<NaiveDate> = file_store.load().await.unwrap().iter().map(|s| s.date).collect();
    assert_eq!(kept, vec![days_back(7), days_back(1), today]);
}

#[tokio::test]
async fn test_settings_without_postgres_select_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.snapshot_path = dir.path().join("s.json").to_string_lossy().into_owned();

    let store = open_store(&settings).await;
    assert_eq!(store.backend(), "file");
    assert!(store.fetch(&[Utc::now().date_naive()]).await.unwrap().is_empty());
}
