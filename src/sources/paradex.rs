use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, notional_usd},
};

const PARADEX_API: &str = "https://api.prod.paradex.trade/v1";

/// Paradex via `markets/summary?market=ALL`. Options and spot share the
/// listing, so only `-PERP` symbols are counted.
pub struct ParadexConnector {
    base_url: String,
}

impl Default for ParadexConnector {
    fn default() -> Self {
        Self::new(PARADEX_API)
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    results: Vec<MarketSummary>,
}

#[derive(Debug, Deserialize)]
struct MarketSummary {
    symbol: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    volume_24h: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    open_interest: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    mark_price: f64,
}

impl ParadexConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let url = format!("{}/markets/summary?market=ALL", self.base_url);
        let response: SummaryResponse = http.get_json(&url).await?;
        Ok(summarize(&response.results))
    }
}

fn summarize(markets: &[MarketSummary]) -> PartialRecord {
    let perps = markets.iter().filter(|m| m.symbol.ends_with("-PERP"));

    let (volume, open_interest, pairs) = perps.fold((0.0, 0.0, 0u32), |(v, oi, n), m| {
        (
            v + m.volume_24h,
            oi + notional_usd(m.open_interest, m.mark_price),
            n + 1,
        )
    });

    PartialRecord::default()
        .with_volume_24h(volume)
        .with_open_interest(open_interest)
        .with_pair_count(pairs)
}

impl Connector for ParadexConnector {
    fn venue_id(&self) -> &'static str {
        "paradex"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}
