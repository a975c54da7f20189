#[allow(clippy::module_inception)]
mod config;

pub use config::{
    AggregatorSettings, HttpSettings, PostgresSettings, SchedulerSettings, Settings,
    StorageSettings,
};
