//! HTTP client for the exchange-rate API (`GET {base_url}/latest/{BASE}`).
//!
//! One request per call; no caching or retry. Callers own the client and
//! drop it when done.

use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

use super::{CurrencyCode, RateSnapshot};
use crate::error::WebToolsError;
use crate::WebToolsResult;

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExchangeRateClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> WebToolsResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, base_url))
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        ExchangeRateClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the latest rates quoted against `base`.
    pub async fn latest(&self, base: &CurrencyCode) -> WebToolsResult<RateSnapshot> {
        let url = format!("{}/latest/{}", self.base_url, base);
        info!(%url, "fetching exchange rates");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "exchange-rate request failed");
            WebToolsError::Network(format!("Failed to fetch exchange rates: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "exchange-rate API returned an error status");
            return Err(WebToolsError::Network(format!(
                "Exchange-rate API returned {status} for {url}"
            )));
        }

        let mut snapshot: RateSnapshot = response.json().await.map_err(|e| {
            if e.is_decode() {
                WebToolsError::Serialization(format!("Unexpected exchange-rate payload: {e}"))
            } else {
                WebToolsError::Network(e.to_string())
            }
        })?;

        if snapshot.base != *base {
            warn!(requested = %base, received = %snapshot.base, "exchange-rate base mismatch");
        }
        snapshot.fetched_at = Some(Utc::now());

        info!(
            base = %snapshot.base,
            currencies = snapshot.rates.len(),
            "exchange rates received"
        );
        Ok(snapshot)
    }
}
