use std::sync::Arc;

use log::{error, info};

use crate::config::Settings;

pub mod file;
pub mod postgres;
mod store;

pub use file::FileSnapshotStore;
pub use postgres::{PostgresClient, PostgresSnapshotStore};
pub use store::SnapshotStore;

/// Selects the snapshot backend once for the process lifetime.
///
/// A `[postgres]` section selects the remote table. Without one, or when
/// the remote table cannot be reached at startup, the local file is used.
pub async fn open_store(settings: &Settings) -> Arc<dyn SnapshotStore> {
    let file_store = || -> Arc<dyn SnapshotStore> {
        Arc::new(FileSnapshotStore::new(
            &settings.storage.snapshot_path,
            settings.storage.max_snapshots,
        ))
    };

    let Some(pg_settings) = settings.postgres.clone() else {
        info!(
            "Using local snapshot file {} (max {} snapshots)",
            settings.storage.snapshot_path, settings.storage.max_snapshots
        );
        return file_store();
    };

    let remote = async {
        let client = PostgresClient::new(pg_settings).await?;
        client.migrate().await?;
        anyhow::Ok(client)
    };

    match remote.await {
        Ok(client) => {
            info!("Using PostgreSQL snapshot table");
            Arc::new(PostgresSnapshotStore::new(client))
        },
        Err(e) => {
            error!(
                "PostgreSQL snapshot store unavailable, falling back to {}: {:#}",
                settings.storage.snapshot_path, e
            );
            file_store()
        },
    }
}
