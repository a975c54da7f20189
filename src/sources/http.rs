use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::HttpSettings;

/// Thin JSON client shared by every connector and the aggregator feed.
///
/// Every request carries the per-call timeout; non-success statuses and
/// undecodable bodies surface as errors for the fan-out to absorb.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            timeout: settings.timeout(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        Self::decode(url, response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} from {}", status, url);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", url))?;

        serde_json::from_str(&body).with_context(|| format!("Malformed payload from {}", url))
    }
}
