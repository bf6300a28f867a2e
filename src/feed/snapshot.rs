//! Offline chain source backed by a JSON snapshot

use super::{ChainSource, FeedError, Ticker};
use crate::chain::{Quote, RawContract};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A captured quote and its raw option records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub quote: Quote,
    #[serde(default)]
    pub contracts: Vec<RawContract>,
}

impl ChainSnapshot {
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serves a single snapshot through [`ChainSource`]
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: ChainSnapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let snapshot = ChainSnapshot::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            symbol = %snapshot.quote.symbol,
            contracts = snapshot.contracts.len(),
            "Loaded chain snapshot"
        );
        Ok(Self::new(snapshot))
    }

    fn covers(&self, ticker: &Ticker) -> bool {
        self.snapshot.quote.symbol.eq_ignore_ascii_case(ticker.as_str())
    }
}

#[async_trait]
impl ChainSource for SnapshotSource {
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote, FeedError> {
        if !self.covers(ticker) {
            return Err(FeedError::QuoteNotFound(ticker.to_string()));
        }
        Ok(self.snapshot.quote.clone())
    }

    async fn fetch_chains(&self, ticker: &Ticker) -> Result<Vec<RawContract>, FeedError> {
        if !self.covers(ticker) {
            return Ok(Vec::new());
        }
        Ok(self.snapshot.contracts.clone())
    }
}
