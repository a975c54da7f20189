//! Job to run a live collection pass and persist today's snapshot.
//!
//! Re-running on the same day overwrites that day's snapshot, so the
//! interval can be shorter than a day without growing the history.

use anyhow::Result;
use log::info;

use crate::models::MarketTotals;
use crate::service::{FetchOptions, PerpDexService};

pub async fn run(service: &PerpDexService) -> Result<()> {
    info!("Starting refresh_snapshot job...");

    let start = std::time::Instant::now();

    let metrics = service.fetch_perp_dex_data(FetchOptions::refresh()).await?;
    let totals = MarketTotals::from_metrics(&metrics);

    info!(
        "Completed refresh_snapshot job in {:?} ({} venues, ${:.0} volume 24h, ${:.0} open interest)",
        start.elapsed(),
        totals.venues,
        totals.volume_24h,
        totals.open_interest
    );
    Ok(())
}
