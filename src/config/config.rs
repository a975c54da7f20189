use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Local snapshot file configuration.
///
/// Used whenever no `[postgres]` section is present, and as the
/// fallback when the remote table cannot be reached at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// Ring buffer capacity, oldest dates are evicted first
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            max_snapshots: default_max_snapshots(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/perp_snapshots.json".to_string()
}

fn default_max_snapshots() -> usize {
    90 // 30d lookback needs at least 31 retained days
}

/// PostgreSQL connection configuration for the remote snapshot table.
///
/// Its presence alone selects the remote backend.
#[derive(Debug, Deserialize, Clone)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_pool_size() -> usize {
    4
}

/// Outbound HTTP configuration shared by every connector.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpSettings {
    /// Per-call timeout, also the upper bound for a whole connector attempt
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("perpwatch/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Shared metrics aggregator (derivatives + open-interest overviews).
#[derive(Debug, Deserialize, Clone)]
pub struct AggregatorSettings {
    #[serde(default = "default_aggregator_url")]
    pub base_url: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            base_url: default_aggregator_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_aggregator_url() -> String {
    "https://api.llama.fi".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerSettings {
    /// Interval between refresh passes that persist a snapshot - default 1 day
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    86_400
}

/// Root application configuration.
///
/// Loaded from an optional `config.{yaml,toml,json}` file, then overridden by
/// `PERPWATCH__<SECTION>__<KEY>` environment variables. Every section has
/// defaults, so an empty environment yields a file-backed setup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub postgres: Option<PostgresSettings>,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub aggregator: AggregatorSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("PERPWATCH").separator("__"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
