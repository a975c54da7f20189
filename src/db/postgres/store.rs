use anyhow::Result;
use chrono::NaiveDate;
use futures::future::BoxFuture;
use log::debug;

use super::PostgresClient;
use crate::{db::SnapshotStore, models::Snapshot};

/// Remote snapshot table. No retention cap is enforced here.
pub struct PostgresSnapshotStore {
    client: PostgresClient,
}

impl PostgresSnapshotStore {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

impl SnapshotStore for PostgresSnapshotStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn record<'a>(&'a self, snapshot: &'a Snapshot) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let written = self.client.upsert_snapshot(snapshot).await?;
            debug!("Upserted {} snapshot rows for {}", written, snapshot.date);
            Ok(())
        })
    }

    fn fetch<'a>(&'a self, dates: &'a [NaiveDate]) -> BoxFuture<'a, Result<Vec<Snapshot>>> {
        Box::pin(self.client.get_snapshots(dates))
    }

    fn latest(&self) -> BoxFuture<'_, Result<Option<Snapshot>>> {
        Box::pin(self.client.get_latest_snapshot())
    }
}
