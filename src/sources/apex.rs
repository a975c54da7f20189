use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, fetch_in_batches, notional_usd},
};

const APEX_API: &str = "https://omni.apex.exchange/api/v3";

/// Tickers per round; `ticker` only answers for one symbol at a time.
const TICKER_BATCH_SIZE: usize = 25;

/// ApeX Omni. The contract list comes from `symbols`, then each tradable
/// contract's `ticker` provides turnover and base-unit open interest.
pub struct ApexConnector {
    base_url: String,
}

impl Default for ApexConnector {
    fn default() -> Self {
        Self::new(APEX_API)
    }
}

#[derive(Debug, Deserialize)]
struct SymbolsResponse {
    data: SymbolsData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolsData {
    contract_config: ContractConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractConfig {
    #[serde(default)]
    perpetual_contract: Vec<PerpetualContract>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerpetualContract {
    cross_symbol_name: String,
    #[serde(default)]
    enable_trade: bool,
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    data: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker {
    #[serde(default, deserialize_with = "de_f64_lenient")]
    turnover24h: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    open_interest: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    last_price: f64,
}

impl ApexConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let symbols: SymbolsResponse = http.get_json(&format!("{}/symbols", self.base_url)).await?;
        let tradable = tradable_symbols(&symbols);

        let tickers = fetch_in_batches(&tradable, TICKER_BATCH_SIZE, |symbol| {
            let url = format!("{}/ticker?symbol={}", self.base_url, symbol);
            async move {
                let response: TickerResponse = http.get_json(&url).await?;
                response
                    .data
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("empty ticker"))
            }
        })
        .await;

        let tickers: Vec<Ticker> = tickers.into_iter().flatten().collect();
        if tickers.is_empty() {
            anyhow::bail!("no ticker responses for {} contracts", tradable.len());
        }

        Ok(summarize(&tickers, tradable.len()))
    }
}

fn tradable_symbols(response: &SymbolsResponse) -> Vec<String> {
    response
        .data
        .contract_config
        .perpetual_contract
        .iter()
        .filter(|c| c.enable_trade)
        .map(|c| c.cross_symbol_name.clone())
        .collect()
}

/// Totals are only reported when every tradable contract answered; a
/// partial sum would outrank a complete lower-tier figure.
fn summarize(tickers: &[Ticker], pairs: usize) -> PartialRecord {
    let record = PartialRecord::default().with_pair_count(pairs as u32);
    if tickers.len() < pairs {
        return record;
    }

    let volume: f64 = tickers.iter().map(|t| t.turnover24h).sum();
    let open_interest: f64 = tickers
        .iter()
        .map(|t| notional_usd(t.open_interest, t.last_price))
        .sum();

    record.with_volume_24h(volume).with_open_interest(open_interest)
}

impl Connector for ApexConnector {
    fn venue_id(&self) -> &'static str {
        "apex"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tradable_symbols() {
        let payload = r#"{"data": {"contractConfig": {"perpetualContract": [
            {"symbol": "BTC-USDT", "crossSymbolName": "BTCUSDT", "enableTrade": true},
            {"symbol": "ETH-USDT", "crossSymbolName": "ETHUSDT", "enableTrade": true},
            {"symbol": "XYZ-USDT", "crossSymbolName": "XYZUSDT", "enableTrade": false}
        ]}}}"#;
        let response: SymbolsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(tradable_symbols(&response), vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn test_summarize_tickers() {
        let payload = r#"{"data": [{"symbol": "BTCUSDT", "turnover24h": "2500000", "openInterest": "4", "lastPrice": "60000"}]}"#;
        let response: TickerResponse = serde_json::from_str(payload).unwrap();
        let record = summarize(&response.data, 1);

        assert_eq!(record.volume_24h, Some(2_500_000.0));
        assert_eq!(record.open_interest, Some(240_000.0));
        assert_eq!(record.pair_count, Some(1));
    }

    #[test]
    fn test_missing_tickers_leave_totals_to_lower_tiers() {
        let payload = r#"{"data": [{"symbol": "BTCUSDT", "turnover24h": "2500000", "openInterest": "4", "lastPrice": "60000"}]}"#;
        let response: TickerResponse = serde_json::from_str(payload).unwrap();
        let record = summarize(&response.data, 3);

        assert_eq!(record.volume_24h, None);
        assert_eq!(record.open_interest, None);
        assert_eq!(record.pair_count, Some(3));
    }
}
