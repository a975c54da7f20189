use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, notional_usd},
};

const DRIFT_DATA_API: &str = "https://data.api.drift.trade";

/// Drift via the data API `stats/markets`. Spot markets share the listing.
/// OI is split into long and short base amounts; the long side is used,
/// which is the conventional single-sided figure.
pub struct DriftConnector {
    base_url: String,
}

impl Default for DriftConnector {
    fn default() -> Self {
        Self::new(DRIFT_DATA_API)
    }
}

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    #[serde(default)]
    markets: Vec<MarketStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketStats {
    market_type: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    oracle_price: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    quote_volume: f64,
    #[serde(default)]
    open_interest: Option<OpenInterestSides>,
}

#[derive(Debug, Deserialize)]
struct OpenInterestSides {
    #[serde(default, deserialize_with = "de_f64_lenient")]
    long: f64,
}

impl DriftConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let url = format!("{}/stats/markets", self.base_url);
        let response: MarketsResponse = http.get_json(&url).await?;
        Ok(summarize(&response.markets))
    }
}

fn summarize(markets: &[MarketStats]) -> PartialRecord {
    let perps: Vec<&MarketStats> = markets.iter().filter(|m| m.market_type == "perp").collect();

    let volume: f64 = perps.iter().map(|m| m.quote_volume).sum();
    let open_interest: f64 = perps
        .iter()
        .filter_map(|m| {
            m.open_interest
                .as_ref()
                .map(|oi| notional_usd(oi.long.abs(), m.oracle_price))
        })
        .sum();

    PartialRecord::default()
        .with_volume_24h(volume)
        .with_open_interest(open_interest)
        .with_pair_count(perps.len() as u32)
}

impl Connector for DriftConnector {
    fn venue_id(&self) -> &'static str {
        "drift"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}
