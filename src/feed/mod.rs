//! Chain data sources
//!
//! Supplies the underlying quote and raw option records for one ticker,
//! either from the Tradier REST API or from a JSON snapshot on disk

mod expirations;
mod snapshot;
mod tradier;
mod types;

pub use expirations::{next_fridays, parse_occ_expiration};
pub use snapshot::{ChainSnapshot, SnapshotSource};
pub use tradier::{TradierClient, TradierConfig, TRADIER_API_URL};
pub use types::{ChainResponse, ExpirationsResponse, LookupResponse, OneOrMany, QuotesResponse};

use crate::chain::{Quote, RawContract};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while fetching market data
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("authentication failed, check the API key")]
    Unauthorized,

    #[error("rate limit exceeded, wait a moment and try again")]
    RateLimited,

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("quote not found for {0}")]
    QuoteNotFound(String),

    #[error("environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Invalid ticker input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker is empty")]
    Empty,
    #[error("invalid ticker {0:?}: expected 1-5 letters")]
    Invalid(String),
}

/// A validated stock ticker: 1-5 ASCII letters, upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, TickerError> {
        let symbol = input.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        if symbol.len() > 5 || !symbol.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(TickerError::Invalid(input.trim().to_string()));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trait for option chain data sources
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Fetch the underlying quote
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote, FeedError>;

    /// Fetch raw option records across the available expirations
    async fn fetch_chains(&self, ticker: &Ticker) -> Result<Vec<RawContract>, FeedError>;
}
