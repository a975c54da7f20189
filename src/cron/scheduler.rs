//! Cron scheduler for periodic background tasks.
//!
//! Runs the snapshot refresh so history accumulates one entry per day
//! even when no caller asks for a refresh.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::config::SchedulerSettings;
use crate::service::PerpDexService;

use super::jobs;

/// Cron scheduler that manages periodic background jobs.
pub struct CronScheduler {
    service: Arc<PerpDexService>,
    settings: SchedulerSettings,
}

impl CronScheduler {
    pub fn new(service: Arc<PerpDexService>, settings: SchedulerSettings) -> Self {
        Self { service, settings }
    }

    /// Starts the cron scheduler and runs until cancellation.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<()> {
        let mut scheduler = JobScheduler::new().await?;

        self.register_refresh_snapshot_job(&scheduler).await?;

        scheduler.start().await?;
        info!("Cron scheduler started");

        cancellation_token.cancelled().await;
        info!("Cron scheduler shutting down...");

        scheduler.shutdown().await?;
        Ok(())
    }

    async fn register_refresh_snapshot_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let service = self.service.clone();
        let interval = self.settings.refresh_interval_secs;

        let job = Job::new_repeated_async(
            std::time::Duration::from_secs(interval),
            move |_uuid, _lock| {
                let service = service.clone();
                Box::pin(async move {
                    if let Err(e) = jobs::refresh_snapshot::run(&service).await {
                        error!("Failed to refresh snapshot: {:#}", e);
                    }
                })
            },
        )?;

        scheduler.add(job).await?;
        info!("Registered refresh_snapshot job (every {}s)", interval);
        Ok(())
    }
}
