use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, notional_usd},
};

const LIGHTER_API: &str = "https://mainnet.zklighter.elliot.ai/api/v1";

/// Lighter reports open interest for one side only; doubled to match the
/// long+short figure on its dashboard. Known approximation.
const OPEN_INTEREST_SIDES: f64 = 2.0;

/// Lighter via `orderBookDetails`.
pub struct LighterConnector {
    base_url: String,
}

impl Default for LighterConnector {
    fn default() -> Self {
        Self::new(LIGHTER_API)
    }
}

#[derive(Debug, Deserialize)]
struct OrderBookDetailsResponse {
    #[serde(default)]
    order_book_details: Vec<OrderBookDetail>,
}

#[derive(Debug, Deserialize)]
struct OrderBookDetail {
    #[serde(default)]
    status: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    last_trade_price: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    daily_quote_token_volume: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    open_interest: f64,
}

impl LighterConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let url = format!("{}/orderBookDetails", self.base_url);
        let response: OrderBookDetailsResponse = http.get_json(&url).await?;
        if response.order_book_details.is_empty() {
            anyhow::bail!("empty order book listing");
        }
        Ok(summarize(&response.order_book_details))
    }
}

fn summarize(details: &[OrderBookDetail]) -> PartialRecord {
    let active: Vec<&OrderBookDetail> = details.iter().filter(|d| d.status == "active").collect();

    let volume: f64 = active.iter().map(|d| d.daily_quote_token_volume).sum();
    let one_side: f64 = active
        .iter()
        .map(|d| notional_usd(d.open_interest, d.last_trade_price))
        .sum();

    PartialRecord::default()
        .with_volume_24h(volume)
        .with_open_interest(one_side * OPEN_INTEREST_SIDES)
        .with_pair_count(active.len() as u32)
}

impl Connector for LighterConnector {
    fn venue_id(&self) -> &'static str {
        "lighter"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}
