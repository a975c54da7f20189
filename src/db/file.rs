use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use log::{debug, error, warn};

use super::SnapshotStore;
use crate::models::Snapshot;

/// Snapshot history in a single local JSON array, bounded to the newest
/// `max_snapshots` dates.
///
/// Every write reads the whole file, replaces or appends the entry for its
/// date, trims the oldest entries and writes back through a temp file and
/// rename. Writers are not coordinated; the last one wins.
pub struct FileSnapshotStore {
    path: PathBuf,
    max_snapshots: usize,
}

impl FileSnapshotStore {
    pub fn new(path: impl AsRef<Path>, max_snapshots: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_snapshots: max_snapshots.max(1),
        }
    }

    /// Whole history, oldest first. A missing file is empty history; a
    /// corrupt file is reset to an empty array.
    pub async fn load(&self) -> Result<Vec<Snapshot>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            },
        };

        match serde_json::from_str::<Vec<Snapshot>>(&raw) {
            Ok(snapshots) => Ok(snapshots),
            Err(e) => {
                warn!(
                    "Snapshot file {} is corrupt, resetting: {}",
                    self.path.display(),
                    e
                );
                if let Err(e) = self.save(&[]).await {
                    error!("Failed to reset {}: {:#}", self.path.display(), e);
                }
                Ok(Vec::new())
            },
        }
    }

    async fn save(&self, snapshots: &[Snapshot]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(snapshots).context("Failed to encode snapshots")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }

    async fn upsert(&self, snapshot: &Snapshot) -> Result<()> {
        let mut history = self.load().await?;

        history.retain(|s| s.date != snapshot.date);
        history.push(snapshot.clone());
        history.sort_by_key(|s| s.date);

        if history.len() > self.max_snapshots {
            let evicted = history.len() - self.max_snapshots;
            history.drain(..evicted);
            debug!("Evicted {} oldest snapshot(s) from {}", evicted, self.path.display());
        }

        self.save(&history).await
    }

    async fn select(&self, dates: &[NaiveDate]) -> Result<Vec<Snapshot>> {
        let history = self.load().await?;
        Ok(history
            .into_iter()
            .filter(|s| dates.contains(&s.date))
            .collect())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    fn record<'a>(&'a self, snapshot: &'a Snapshot) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.upsert(snapshot))
    }

    fn fetch<'a>(&'a self, dates: &'a [NaiveDate]) -> BoxFuture<'a, Result<Vec<Snapshot>>> {
        Box::pin(self.select(dates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnapshotEntry;
    use std::collections::BTreeMap;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn snapshot(d: &str, volume: f64) -> Snapshot {
        Snapshot::new(
            date(d),
            BTreeMap::from([(
                "dydx".to_string(),
                SnapshotEntry {
                    volume_24h: volume,
                    open_interest: volume / 2.0,
                },
            )]),
        )
    }

    fn store(dir: &tempfile::TempDir, max: usize) -> FileSnapshotStore {
        FileSnapshotStore::new(dir.path().join("nested/snapshots.json"), max)
    }

    #[tokio::test]
    async fn test_same_date_write_replaces_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 10);

        store.record(&snapshot("2024-01-01", 100.0)).await.unwrap();
        store.record(&snapshot("2024-01-01", 250.0)).await.unwrap();

        let history = store.load().await.unwrap();
        assert_eq!(history, vec![snapshot("2024-01-01", 250.0)]);
    }

    #[tokio::test]
    async fn test_ring_buffer_evicts_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 3);

        for (i, d) in ["2024-01-04", "2024-01-01", "2024-01-03", "2024-01-02"].iter().enumerate() {
            store.record(&snapshot(d, i as f64)).await.unwrap();
        }

        let dates: Vec<NaiveDate> = store.load().await.unwrap().iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date("2024-01-02"), date("2024-01-03"), date("2024-01-04")]);
    }

    #[tokio::test]
    async fn test_fetch_returns_exact_dates_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 10);
        store.record(&snapshot("2024-01-01", 1.0)).await.unwrap();
        store.record(&snapshot("2024-01-05", 5.0)).await.unwrap();

        let found = store
            .fetch(&[date("2024-01-05"), date("2024-01-04"), date("2023-12-01")])
            .await
            .unwrap();
        assert_eq!(found, vec![snapshot("2024-01-05", 5.0)]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 10);

        assert!(store.fetch(&[date("2024-01-01")]).await.unwrap().is_empty());
        assert!(store.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let store = FileSnapshotStore::new(&path, 10);

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap().trim(), "[]");

        store.record(&snapshot("2024-01-01", 1.0)).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
