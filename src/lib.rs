pub mod aggregator;
pub mod cache;
pub mod config;
pub mod cron;
pub mod db;
pub mod merge;
pub mod models;
pub mod registry;
pub mod service;
pub mod sources;
pub mod utils;
pub mod variation;

pub use config::Settings;
pub use cron::CronScheduler;
pub use db::{open_store, SnapshotStore};
pub use models::{MarketTotals, VenueMetrics};
pub use registry::Registry;
pub use service::{FetchOptions, PerpDexService};
