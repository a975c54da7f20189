use std::sync::Arc;

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use perpwatch::{
    open_store, CronScheduler, FetchOptions, MarketTotals, PerpDexService, Settings, VenueMetrics,
};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .context("Failed to initialize logger")?;

    // Load configuration
    let settings = Settings::new()
        .context("Failed to load configuration. Please ensure config.yaml is valid")?;

    let store = open_store(&settings).await;

    let service = Arc::new(
        PerpDexService::from_settings(&settings, store)
            .context("Failed to initialize perp DEX service")?,
    );

    // Initial pass so there is a snapshot for today before the first tick
    match service.fetch_perp_dex_data(FetchOptions::refresh()).await {
        Ok(metrics) => log_table(&metrics),
        Err(e) => error!("Initial refresh failed: {:#}", e),
    }

    let cancellation_token = CancellationToken::new();

    let cron_scheduler = CronScheduler::new(service.clone(), settings.scheduler.clone());

    let cron_token = cancellation_token.child_token();
    let cron_handle = tokio::spawn(async move {
        if let Err(e) = cron_scheduler.run(cron_token).await {
            error!("Cron scheduler failed: {:#}", e);
        }
    });

    info!(
        "Cron scheduler started - refreshing every {}s",
        settings.scheduler.refresh_interval_secs
    );

    #[cfg(unix)]
    let mut sigterm_stream = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    info!("perpwatch running. Press Ctrl+C to stop.");

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
        };
    }

    cancellation_token.cancel();

    info!("Waiting for cron scheduler to stop...");
    let _ = cron_handle.await;

    info!("Shutdown complete");
    Ok(())
}

fn log_table(metrics: &[VenueMetrics]) {
    info!(
        "{:<14} {:>18} {:>18} {:>10} {:>10}",
        "venue", "volume 24h", "open interest", "vol 24h %", "oi 24h %"
    );

    for m in metrics {
        let (volume_change, oi_change) = m
            .variation
            .map(|v| (v.volume.change_24h, v.open_interest.change_24h))
            .unwrap_or((None, None));

        info!(
            "{:<14} {:>18.0} {:>18.0} {:>10} {:>10}",
            m.id,
            m.volume_24h,
            m.open_interest,
            format_change(volume_change),
            format_change(oi_change)
        );
    }

    let totals = MarketTotals::from_metrics(metrics);
    info!(
        "{} venues: ${:.0} volume 24h, ${:.0} volume 7d, ${:.0} open interest",
        totals.venues, totals.volume_24h, totals.volume_7d, totals.open_interest
    );
}

fn format_change(change: Option<f64>) -> String {
    change
        .map(|c| format!("{:+.1}%", c * 100.0))
        .unwrap_or_else(|| "-".to_string())
}
