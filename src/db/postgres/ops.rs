use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::error;
use tokio_postgres::Row;

use crate::db::postgres::PostgresClient;
use crate::models::{Snapshot, SnapshotEntry};

/// `(date, venue_id, volume_24h, open_interest)` as stored.
type SnapshotRow = (NaiveDate, String, f64, f64);

fn decode_row(row: &Row) -> SnapshotRow {
    (
        row.get("date"),
        row.get("venue_id"),
        row.get("volume_24h"),
        row.get("open_interest"),
    )
}

/// Groups rows into one snapshot per date, oldest first.
fn group_rows(rows: impl IntoIterator<Item = SnapshotRow>) -> Vec<Snapshot> {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, SnapshotEntry>> = BTreeMap::new();

    for (date, venue_id, volume_24h, open_interest) in rows {
        by_date.entry(date).or_default().insert(
            venue_id,
            SnapshotEntry {
                volume_24h,
                open_interest,
            },
        );
    }

    by_date
        .into_iter()
        .map(|(date, data)| Snapshot::new(date, data))
        .collect()
}

impl PostgresClient {
    // ==================== SNAPSHOTS ====================

    /// Upsert every venue of a snapshot in one statement using UNNEST.
    pub async fn upsert_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<u64> {
        if snapshot.is_empty() {
            return Ok(0);
        }

        let mut venue_ids = Vec::with_capacity(snapshot.data.len());
        let mut volumes = Vec::with_capacity(snapshot.data.len());
        let mut open_interests = Vec::with_capacity(snapshot.data.len());

        for (venue_id, entry) in &snapshot.data {
            venue_ids.push(venue_id.clone());
            volumes.push(entry.volume_24h);
            open_interests.push(entry.open_interest);
        }

        let client = self.pool.get().await?;
        let query = r#"
            INSERT INTO perp_snapshots (date, venue_id, volume_24h, open_interest, updated_at)
            SELECT $1::date, u.venue_id, u.volume_24h, u.open_interest, NOW()
            FROM UNNEST($2::text[], $3::float8[], $4::float8[])
                AS u(venue_id, volume_24h, open_interest)
            ON CONFLICT (date, venue_id) DO UPDATE SET
                volume_24h = EXCLUDED.volume_24h,
                open_interest = EXCLUDED.open_interest,
                updated_at = EXCLUDED.updated_at
        "#;

        let written = client
            .execute(query, &[&snapshot.date, &venue_ids, &volumes, &open_interests])
            .await
            .map_err(|e| {
                error!("Failed to upsert snapshot {}: {:?}", snapshot.date, e);
                e
            })?;

        Ok(written)
    }

    /// Snapshots for exactly the given dates.
    pub async fn get_snapshots(&self, dates: &[NaiveDate]) -> anyhow::Result<Vec<Snapshot>> {
        if dates.is_empty() {
            return Ok(vec![]);
        }

        let client = self.pool.get().await?;
        let query = r#"
            SELECT date, venue_id, volume_24h, open_interest
            FROM perp_snapshots
            WHERE date = ANY($1)
        "#;

        let rows = client.query(query, &[&dates]).await?;
        Ok(group_rows(rows.iter().map(decode_row)))
    }

    /// The snapshot with the most recent date, if any.
    pub async fn get_latest_snapshot(&self) -> anyhow::Result<Option<Snapshot>> {
        let client = self.pool.get().await?;
        let query = r#"
            SELECT date, venue_id, volume_24h, open_interest
            FROM perp_snapshots
            WHERE date = (SELECT MAX(date) FROM perp_snapshots)
        "#;

        let rows = client.query(query, &[]).await?;
        Ok(group_rows(rows.iter().map(decode_row)).pop())
    }
}
