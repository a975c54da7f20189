use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::json;

use super::{Connector, HttpClient};
use crate::{
    models::PartialRecord,
    utils::{de_f64_lenient, notional_usd},
};

const HYPERLIQUID_API: &str = "https://api.hyperliquid.xyz";

/// Hyperliquid perps via the `metaAndAssetCtxs` info request.
///
/// The response is a two-element array: the universe (one entry per listed
/// asset) and the per-asset contexts, index-aligned with the universe.
/// `openInterest` is in base units, so it is priced at `markPx`.
pub struct HyperliquidConnector {
    base_url: String,
}

impl Default for HyperliquidConnector {
    fn default() -> Self {
        Self::new(HYPERLIQUID_API)
    }
}

#[derive(Debug, Deserialize)]
struct Meta {
    universe: Vec<UniverseAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UniverseAsset {
    #[serde(default)]
    is_delisted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetCtx {
    #[serde(default, deserialize_with = "de_f64_lenient")]
    day_ntl_vlm: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    open_interest: f64,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    mark_px: f64,
}

impl HyperliquidConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, http: &HttpClient) -> Result<PartialRecord> {
        let url = format!("{}/info", self.base_url);
        let (meta, ctxs): (Meta, Vec<AssetCtx>) = http
            .post_json(&url, &json!({ "type": "metaAndAssetCtxs" }))
            .await?;

        Ok(summarize(&meta, &ctxs))
    }
}

fn summarize(meta: &Meta, ctxs: &[AssetCtx]) -> PartialRecord {
    let mut volume = 0.0;
    let mut open_interest = 0.0;
    let mut pairs = 0u32;

    for (asset, ctx) in meta.universe.iter().zip(ctxs) {
        if asset.is_delisted {
            continue;
        }
        pairs += 1;
        volume += ctx.day_ntl_vlm;
        open_interest += notional_usd(ctx.open_interest, ctx.mark_px);
    }

    PartialRecord::default()
        .with_volume_24h(volume)
        .with_open_interest(open_interest)
        .with_pair_count(pairs)
}

impl Connector for HyperliquidConnector {
    fn venue_id(&self) -> &'static str {
        "hyperliquid"
    }

    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<PartialRecord>> {
        Box::pin(self.fetch(http))
    }
}
