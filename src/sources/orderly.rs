use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, notional_usd},
};

const ORDERLY_API: &str = "https://api-evm.orderly.org/v1";

/// Orderly's `open_interest` counts one side of the book. The public
/// dashboard shows long+short combined, so the summed figure is doubled.
/// This is an approximation matched against the dashboard, not an identity.
const OPEN_INTEREST_SIDES: f64 = 2.0;

/// Orderly Network via `public/futures`.
pub struct OrderlyConnector {
    base_url: String,
}

impl Default for OrderlyConnector {
    fn default() -> Self {
        Self::new(ORDERLY_API)
    }
}

#[derive(Debug, Deserialize)]
struct FuturesResponse {
    success: bool,
    data: FuturesData,
}

#[derive(Debug, Deserialize)]
struct FuturesData {
    rows: Vec<FuturesRow>,
}

#[derive(Debug, Deserialize)]
struct FuturesRow {
    #[serde(default, deserialize_with = "de_f64_lenient")]
    mark_price: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    open_interest: f64,
    #[serde(default, rename = "24h_amount", deserialize_with = "de_f64_lenient")]
    amount_24h: f64,
}

impl OrderlyConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let url = format!("{}/public/futures", self.base_url);
        let response: FuturesResponse = http.get_json(&url).await?;
        if !response.success {
            anyhow::bail!("orderly reported success=false");
        }
        Ok(summarize(&response.data.rows))
    }
}

fn summarize(rows: &[FuturesRow]) -> PartialRecord {
    let volume: f64 = rows.iter().map(|r| r.amount_24h).sum();
    let one_side: f64 = rows
        .iter()
        .map(|r| notional_usd(r.open_interest, r.mark_price))
        .sum();

    PartialRecord::default()
        .with_volume_24h(volume)
        .with_open_interest(one_side * OPEN_INTEREST_SIDES)
        .with_pair_count(rows.len() as u32)
}

impl Connector for OrderlyConnector {
    fn venue_id(&self) -> &'static str {
        "orderly"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}
