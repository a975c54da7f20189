pub mod refresh_snapshot;
