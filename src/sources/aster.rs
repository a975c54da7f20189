use std::collections::HashMap;

use anyhow::Result;
use futures::future::BoxFuture;
use log::debug;
use serde::Deserialize;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, fetch_in_batches, notional_usd},
};

const ASTER_API: &str = "https://fapi.asterdex.com/fapi/v1";

/// Symbols per round of `openInterest` calls. The endpoint is per-symbol
/// and the listing runs to hundreds of contracts.
const OI_BATCH_SIZE: usize = 25;

/// Aster futures (Binance-compatible API).
///
/// Volume and the pair list come from `ticker/24hr`. Open interest is only
/// exposed per symbol in contracts, so it is fetched in batches and priced
/// with the mark price from `premiumIndex`.
pub struct AsterConnector {
    base_url: String,
}

impl Default for AsterConnector {
    fn default() -> Self {
        Self::new(ASTER_API)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    symbol: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    quote_volume: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PremiumIndex {
    symbol: String,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    mark_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterest {
    #[serde(default, deserialize_with = "de_f64_lenient")]
    open_interest: f64,
}

impl AsterConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let tickers: Vec<Ticker24h> = http
            .get_json(&format!("{}/ticker/24hr", self.base_url))
            .await?;
        let marks: Vec<PremiumIndex> = http
            .get_json(&format!("{}/premiumIndex", self.base_url))
            .await?;

        let symbols: Vec<String> = tickers.iter().map(|t| t.symbol.clone()).collect();
        let contracts = fetch_in_batches(&symbols, OI_BATCH_SIZE, |symbol| {
            let url = format!("{}/openInterest?symbol={}", self.base_url, symbol);
            async move {
                let oi: OpenInterest = http.get_json(&url).await?;
                Ok(oi.open_interest)
            }
        })
        .await;

        let missing = contracts.iter().filter(|c| c.is_none()).count();
        if missing > 0 {
            debug!("aster: open interest missing for {}/{} symbols", missing, symbols.len());
        }

        let open_interest: HashMap<String, f64> = symbols
            .into_iter()
            .zip(contracts)
            .filter_map(|(symbol, oi)| oi.map(|oi| (symbol, oi)))
            .collect();

        Ok(summarize(&tickers, &marks, &open_interest))
    }
}

fn summarize(
    tickers: &[Ticker24h],
    marks: &[PremiumIndex],
    open_interest: &HashMap<String, f64>,
) -> PartialRecord {
    let mark_by_symbol: HashMap<&str, f64> = marks
        .iter()
        .map(|m| (m.symbol.as_str(), m.mark_price))
        .collect();

    let volume: f64 = tickers.iter().map(|t| t.quote_volume).sum();
    let notional: f64 = open_interest
        .iter()
        .filter_map(|(symbol, contracts)| {
            mark_by_symbol
                .get(symbol.as_str())
                .map(|mark| notional_usd(*contracts, *mark))
        })
        .sum();

    let mut record = PartialRecord::default()
        .with_volume_24h(volume)
        .with_pair_count(tickers.len() as u32);

    // A partial sum would outrank a complete lower-tier figure
    let complete = tickers.iter().all(|t| open_interest.contains_key(&t.symbol));
    if complete && !tickers.is_empty() {
        record = record.with_open_interest(notional);
    }

    record
}

impl Connector for AsterConnector {
    fn venue_id(&self) -> &'static str {
        "aster"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (Vec<Ticker24h>, Vec<PremiumIndex>) {
        let tickers: Vec<Ticker24h> = serde_json::from_str(
            r#"[
                {"symbol": "BTCUSDT", "lastPrice": "60000", "quoteVolume": "9000000.5"},
                {"symbol": "ETHUSDT", "lastPrice": "3000", "quoteVolume": "1000000"}
            ]"#,
        )
        .unwrap();
        let marks: Vec<PremiumIndex> = serde_json::from_str(
            r#"[
                {"symbol": "BTCUSDT", "markPrice": "60010", "lastFundingRate": "0.0001"},
                {"symbol": "ETHUSDT", "markPrice": "3000", "lastFundingRate": "0.0001"}
            ]"#,
        )
        .unwrap();
        (tickers, marks)
    }

    #[test]
    fn test_summarize_prices_contracts_at_mark() {
        let (tickers, marks) = fixtures();
        let oi = HashMap::from([("BTCUSDT".to_string(), 10.0), ("ETHUSDT".to_string(), 200.0)]);

        let record = summarize(&tickers, &marks, &oi);
        assert_eq!(record.volume_24h, Some(10_000_000.5));
        assert_eq!(record.open_interest, Some(600_100.0 + 600_000.0));
        assert_eq!(record.pair_count, Some(2));
    }

    #[test]
    fn test_summarize_without_any_oi_leaves_field_missing() {
        let (tickers, marks) = fixtures();
        let record = summarize(&tickers, &marks, &HashMap::new());
        assert_eq!(record.open_interest, None);
        assert!(record.volume_24h.is_some());
    }

    #[test]
    fn test_summarize_with_partial_oi_leaves_field_missing() {
        let (tickers, marks) = fixtures();
        let oi = HashMap::from([("BTCUSDT".to_string(), 10.0)]);

        let record = summarize(&tickers, &marks, &oi);
        assert_eq!(record.open_interest, None);
        assert_eq!(record.volume_24h, Some(10_000_000.5));
    }

    #[test]
    fn test_open_interest_payload() {
        let oi: OpenInterest =
            serde_json::from_str(r#"{"openInterest": "10659.509", "symbol": "BTCUSDT", "time": 1589437530011}"#)
                .unwrap();
        assert_eq!(oi.open_interest, 10659.509);
    }
}
