use std::fmt;

use anyhow::Result;
use futures::future::BoxFuture;
use serde::Deserialize;

use crate::{sources::HttpClient, utils::de_opt_f64_lenient};

/// The two global overview listings. Each is one call covering every
/// protocol, so the kind alone is a complete cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverviewKind {
    Derivatives,
    OpenInterest,
}

impl OverviewKind {
    fn path(&self) -> &'static str {
        match self {
            OverviewKind::Derivatives => "overview/derivatives",
            OverviewKind::OpenInterest => "overview/open-interest",
        }
    }
}

impl fmt::Display for OverviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One protocol row of an overview. Naming is inconsistent across the
/// aggregator and venues, hence the several identifier fields.
///
/// For the open-interest overview `total24h` carries the current OI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub defillama_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64_lenient")]
    pub total24h: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64_lenient")]
    pub total7d: Option<f64>,
}

impl OverviewEntry {
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.display_name.as_deref())
            .chain(self.slug.as_deref())
            .chain(self.defillama_id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct OverviewResponse {
    #[serde(default)]
    protocols: Vec<OverviewEntry>,
}

/// Source of overview listings. The HTTP implementation is [`LlamaFeed`].
pub trait OverviewFeed: Send + Sync {
    fn fetch(&self, kind: OverviewKind) -> BoxFuture<'_, Result<Vec<OverviewEntry>>>;
}

/// DefiLlama-style overview endpoints.
pub struct LlamaFeed {
    http: HttpClient,
    base_url: String,
}

impl LlamaFeed {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, kind: OverviewKind) -> String {
        format!(
            "{}/{}?excludeTotalDataChart=true&excludeTotalDataChartBreakdown=true",
            self.base_url,
            kind.path()
        )
    }
}

impl OverviewFeed for LlamaFeed {
    fn fetch(&self, kind: OverviewKind) -> BoxFuture<'_, Result<Vec<OverviewEntry>>> {
        Box::pin(async move {
            let response: OverviewResponse = self.http.get_json(&self.url(kind)).await?;
            Ok(response.protocols)
        })
    }
}
