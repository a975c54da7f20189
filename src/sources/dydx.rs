use std::collections::HashMap;

use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, notional_usd},
};

const DYDX_INDEXER: &str = "https://indexer.dydx.trade/v4";

/// dYdX v4 via the indexer's `perpetualMarkets` listing.
pub struct DydxConnector {
    base_url: String,
}

impl Default for DydxConnector {
    fn default() -> Self {
        Self::new(DYDX_INDEXER)
    }
}

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    markets: HashMap<String, PerpetualMarket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerpetualMarket {
    status: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    oracle_price: f64,
    #[serde(default, rename = "volume24H", deserialize_with = "de_f64_lenient")]
    volume_24h: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    open_interest: f64,
}

impl DydxConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let url = format!("{}/perpetualMarkets", self.base_url);
        let response: MarketsResponse = http.get_json(&url).await?;
        Ok(summarize(&response))
    }
}

fn summarize(response: &MarketsResponse) -> PartialRecord {
    let active: Vec<&PerpetualMarket> = response
        .markets
        .values()
        .filter(|m| m.status == "ACTIVE")
        .collect();

    let volume: f64 = active.iter().map(|m| m.volume_24h).sum();
    let open_interest: f64 = active
        .iter()
        .map(|m| notional_usd(m.open_interest, m.oracle_price))
        .sum();

    PartialRecord::default()
        .with_volume_24h(volume)
        .with_open_interest(open_interest)
        .with_pair_count(active.len() as u32)
}

impl Connector for DydxConnector {
    fn venue_id(&self) -> &'static str {
        "dydx"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}
