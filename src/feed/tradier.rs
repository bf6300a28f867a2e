//! Tradier REST client
//!
//! Fetches the underlying quote and option chains for a ticker. Chains are
//! requested for each listed expiration concurrently. When Tradier lists no
//! expirations the client tries the coming Fridays, and when every chain
//! comes back empty it derives expirations from the option symbol lookup.

use super::types::{ChainResponse, ExpirationsResponse, LookupResponse, QuotesResponse};
use super::{next_fridays, ChainSource, FeedError, Ticker};
use crate::chain::{Quote, RawContract};
use crate::telemetry::{increment_counter, record_latency, CounterMetric, LatencyMetric};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures_util::future::join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Tradier API base URL
pub const TRADIER_API_URL: &str = "https://api.tradier.com/v1";

/// Fridays tried when no expirations are listed
const FALLBACK_FRIDAYS: usize = 8;

/// Configuration for the Tradier client
#[derive(Clone)]
pub struct TradierConfig {
    /// Base URL for the Tradier API
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Expirations fetched per analysis
    pub max_expirations: usize,
}

impl Default for TradierConfig {
    fn default() -> Self {
        Self {
            base_url: TRADIER_API_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
            max_expirations: 5,
        }
    }
}

impl std::fmt::Debug for TradierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradierConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_expirations", &self.max_expirations)
            .finish()
    }
}

impl TradierConfig {
    /// Read the API key from the named environment variable
    pub fn api_key_from_env(mut self, var: &str) -> Result<Self, FeedError> {
        self.api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| FeedError::MissingApiKey(var.to_string()))?;
        Ok(self)
    }
}

/// Client for the Tradier market data API
pub struct TradierClient {
    config: TradierConfig,
    client: Client,
}

impl TradierClient {
    /// Create a client with custom configuration
    pub fn with_config(config: TradierConfig) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TradierConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        metric: LatencyMetric,
    ) -> Result<T, FeedError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let start = Instant::now();

        tracing::debug!(url = %url, ?query, "Requesting Tradier endpoint");

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        record_latency(metric, start.elapsed());

        match status {
            StatusCode::UNAUTHORIZED => Err(FeedError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(FeedError::RateLimited),
            s if !s.is_success() => Err(FeedError::Status {
                status: s.as_u16(),
                body,
            }),
            _ => Ok(serde_json::from_str(&body)?),
        }
    }

    /// Listed expirations, capped; failures degrade to an empty list
    pub async fn fetch_expirations(&self, ticker: &Ticker) -> Vec<NaiveDate> {
        let result: Result<ExpirationsResponse, _> = self
            .get(
                "/markets/options/expirations",
                &[("symbol", ticker.as_str())],
                LatencyMetric::Expirations,
            )
            .await;

        match result {
            Ok(response) => {
                let mut dates = response.into_dates();
                dates.truncate(self.config.max_expirations);
                tracing::debug!(ticker = %ticker, count = dates.len(), "Fetched expirations");
                dates
            }
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "Failed to fetch expirations");
                increment_counter(CounterMetric::FetchFailures, 1);
                Vec::new()
            }
        }
    }

    /// Chain for one expiration; failures degrade to an empty chain
    pub async fn fetch_chain(&self, ticker: &Ticker, expiration: NaiveDate) -> Vec<RawContract> {
        let expiration_str = expiration.format("%Y-%m-%d").to_string();
        let result: Result<ChainResponse, _> = self
            .get(
                "/markets/options/chains",
                &[
                    ("symbol", ticker.as_str()),
                    ("expiration", expiration_str.as_str()),
                    ("greeks", "true"),
                ],
                LatencyMetric::Chain,
            )
            .await;

        match result {
            Ok(response) => {
                let contracts = response.into_contracts(expiration);
                if contracts.is_empty() {
                    tracing::warn!(ticker = %ticker, %expiration, "No options found");
                }
                contracts
            }
            Err(e) => {
                tracing::warn!(ticker = %ticker, %expiration, error = %e, "Failed to fetch chain");
                increment_counter(CounterMetric::FetchFailures, 1);
                Vec::new()
            }
        }
    }

    /// Fan out over expirations and concatenate in expiration order
    pub async fn fetch_chains_for(
        &self,
        ticker: &Ticker,
        expirations: &[NaiveDate],
    ) -> Vec<RawContract> {
        let fetches = expirations
            .iter()
            .map(|&expiration| self.fetch_chain(ticker, expiration));
        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Expirations derived from the option symbol lookup
    pub async fn lookup_expirations(&self, ticker: &Ticker) -> Vec<NaiveDate> {
        let result: Result<LookupResponse, _> = self
            .get(
                "/markets/options/lookup",
                &[("underlying", ticker.as_str())],
                LatencyMetric::Lookup,
            )
            .await;

        match result {
            Ok(response) => {
                let mut dates = response.expirations();
                dates.truncate(self.config.max_expirations);
                dates
            }
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "Symbol lookup failed");
                increment_counter(CounterMetric::FetchFailures, 1);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ChainSource for TradierClient {
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote, FeedError> {
        let response: QuotesResponse = self
            .get(
                "/markets/quotes",
                &[("symbols", ticker.as_str())],
                LatencyMetric::Quote,
            )
            .await?;

        response
            .into_quote()
            .ok_or_else(|| FeedError::QuoteNotFound(ticker.to_string()))
    }

    async fn fetch_chains(&self, ticker: &Ticker) -> Result<Vec<RawContract>, FeedError> {
        let mut expirations = self.fetch_expirations(ticker).await;

        if expirations.is_empty() {
            expirations = next_fridays(Utc::now().date_naive(), FALLBACK_FRIDAYS);
            tracing::info!(
                ticker = %ticker,
                tried = expirations.len(),
                "No listed expirations, trying upcoming Fridays"
            );
            increment_counter(CounterMetric::FallbackUsed, 1);
        }

        let contracts = self.fetch_chains_for(ticker, &expirations).await;
        if !contracts.is_empty() {
            tracing::info!(
                ticker = %ticker,
                expirations = expirations.len(),
                contracts = contracts.len(),
                "Fetched option chains"
            );
            return Ok(contracts);
        }

        tracing::info!(ticker = %ticker, "No chains found, trying symbol lookup");
        increment_counter(CounterMetric::FallbackUsed, 1);

        let expirations = self.lookup_expirations(ticker).await;
        if expirations.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.fetch_chains_for(ticker, &expirations).await)
    }
}
