pub mod client;
pub mod ops;
mod store;

pub use client::PostgresClient;
pub use store::PostgresSnapshotStore;
