//! Analysis orchestration
//!
//! Fetches a quote and raw chains from a [`ChainSource`], enriches them in
//! one batch, and assembles an [`AnalysisReport`] with volume leaders,
//! expiration notices, recommendations and a filtered chain view.

mod expiration;
mod report;

pub use expiration::{classify_expirations, expiration_notice, ExpirationInfo, ExpirationKind};
pub use report::{AnalysisReport, ChainEntry};

use crate::chain::{EnrichedBatch, EnrichedContract, Enricher, Quote};
use crate::feed::{ChainSource, FeedError, Ticker};
use crate::model::{BlackScholesModel, GreeksModel, GreeksSource};
use crate::ranking::{ChainFilter, GreeksScorer, MarketOutlook, OptimalSelector};
use crate::telemetry::{
    increment_counter, record_latency, set_gauge, CounterMetric, GaugeMetric, LatencyMetric,
};
use chrono::Utc;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

/// Number of volume leaders in a report
pub const VOLUME_LEADERS: usize = 5;

/// Errors raised by an analysis run
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("no option chains found for {0}; it may not have listed options")]
    NoChains(Ticker),
}

/// Per-run parameters
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub outlook: MarketOutlook,
    pub filter: ChainFilter,
}

/// Runs analyses against a chain source
pub struct Analyzer<S, M: GreeksModel = BlackScholesModel> {
    source: S,
    enricher: Enricher<M>,
    scorer: GreeksScorer,
}

impl<S: ChainSource> Analyzer<S> {
    /// Analyzer estimating missing Greeks with Black-Scholes at `risk_free_rate`
    pub fn new(source: S, risk_free_rate: f64) -> Self {
        Self::with_parts(source, Enricher::black_scholes(risk_free_rate), GreeksScorer::default())
    }
}

impl<S: ChainSource, M: GreeksModel> Analyzer<S, M> {
    pub fn with_parts(source: S, enricher: Enricher<M>, scorer: GreeksScorer) -> Self {
        Self {
            source,
            enricher,
            scorer,
        }
    }

    /// Fetch, enrich and report on one ticker
    pub async fn analyze(
        &self,
        ticker: &Ticker,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, AnalysisError> {
        let (quote, raws) = tokio::try_join!(
            self.source.fetch_quote(ticker),
            self.source.fetch_chains(ticker)
        )?;

        if raws.is_empty() {
            return Err(AnalysisError::NoChains(ticker.clone()));
        }

        let start = Instant::now();
        let batch = self.enricher.enrich_all(&raws, &quote, Utc::now());
        record_batch(&batch);

        if batch.contracts.is_empty() {
            return Err(AnalysisError::NoChains(ticker.clone()));
        }

        let report = self.build_report(ticker, quote, batch, request);
        record_latency(LatencyMetric::Analysis, start.elapsed());
        set_gauge(GaugeMetric::Recommendations, report.recommendations.len() as f64);
        set_gauge(GaugeMetric::ChainRows, report.chain.len() as f64);

        tracing::info!(
            ticker = %ticker,
            contracts = report.contract_count,
            rejected = report.rejected.len(),
            recommendations = report.recommendations.len(),
            outlook = %request.outlook,
            "Analysis complete"
        );

        Ok(report)
    }

    /// Assemble a report from an already enriched batch
    pub fn build_report(
        &self,
        ticker: &Ticker,
        quote: Quote,
        batch: EnrichedBatch,
        request: &AnalysisRequest,
    ) -> AnalysisReport {
        let spot = quote.spot();
        let EnrichedBatch {
            as_of,
            contracts,
            rejected,
        } = batch;

        let recommendations = OptimalSelector::new(self.scorer).select(&contracts, spot, request.outlook);
        let chain = request
            .filter
            .apply(&contracts, &self.scorer, spot, request.outlook)
            .into_iter()
            .map(ChainEntry::from)
            .collect();
        let expirations = classify_expirations(contracts.iter().map(|c| c.expiration_date()));
        let expiration_notice = expiration_notice(&expirations);
        if let Some(notice) = &expiration_notice {
            tracing::debug!(ticker = %ticker, notice = %notice, "Non-standard expirations present");
        }

        AnalysisReport {
            id: Uuid::new_v4(),
            generated_at: as_of,
            ticker: ticker.clone(),
            outlook: request.outlook,
            sort: request.filter.sort,
            quote,
            contract_count: contracts.len(),
            rejected,
            volume_leaders: volume_leaders(&contracts, VOLUME_LEADERS),
            expirations,
            expiration_notice,
            recommendations,
            chain,
        }
    }
}

/// The `limit` most traded contracts, ties in input order
pub fn volume_leaders(contracts: &[EnrichedContract], limit: usize) -> Vec<EnrichedContract> {
    let mut traded: Vec<&EnrichedContract> = contracts.iter().filter(|c| c.volume() > 0).collect();
    traded.sort_by(|a, b| b.volume().cmp(&a.volume()));
    traded.into_iter().take(limit).cloned().collect()
}

fn record_batch(batch: &EnrichedBatch) {
    increment_counter(CounterMetric::ContractsEnriched, batch.contracts.len() as u64);
    increment_counter(CounterMetric::ContractsRejected, batch.rejected.len() as u64);
    increment_counter(
        CounterMetric::ProviderGreeks,
        batch.source_count(GreeksSource::Provider) as u64,
    );
    increment_counter(
        CounterMetric::EstimatedGreeks,
        batch.source_count(GreeksSource::Estimated) as u64,
    );
    increment_counter(
        CounterMetric::UnavailableGreeks,
        batch.source_count(GreeksSource::Unavailable) as u64,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{OptionType, RawContract};
    use crate::feed::{ChainSnapshot, SnapshotSource};
    use crate::ranking::{SelectionReason, SortKey};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn raw(symbol: &str, side: OptionType, strike: Decimal, volume: u64) -> RawContract {
        RawContract::new(
            symbol,
            strike,
            side,
            NaiveDate::from_ymd_opt(2099, 11, 20).unwrap(),
        )
        .with_prices(dec!(1.9), dec!(2.1), dec!(2))
        .with_activity(volume, 50)
    }

    fn source(contracts: Vec<RawContract>) -> SnapshotSource {
        SnapshotSource::new(ChainSnapshot {
            quote: Quote::new("ACME").with_last(dec!(100)),
            contracts,
        })
    }

    #[tokio::test]
    async fn test_analyze_snapshot() {
        let analyzer = Analyzer::new(
            source(vec![
                raw("C100", OptionType::Call, dec!(100), 900),
                raw("P95", OptionType::Put, dec!(95), 300),
                raw("C110", OptionType::Call, dec!(110), 0),
            ]),
            0.05,
        );
        let request = AnalysisRequest {
            outlook: MarketOutlook::Bullish,
            filter: ChainFilter::default().sort(Some(SortKey::Strike)),
        };
        let ticker = Ticker::parse("acme").unwrap();
        let report = analyzer.analyze(&ticker, &request).await.unwrap();

        assert_eq!(report.contract_count, 3);
        assert_eq!(report.volume_leaders.len(), 2);
        assert_eq!(report.volume_leaders[0].symbol(), "C100");
        assert_eq!(report.recommendations[0].reason, SelectionReason::HighestVolume { rank: 1 });
        let strikes: Vec<Decimal> = report.chain.iter().map(|e| e.contract.strike()).collect();
        assert_eq!(strikes, vec![dec!(95), dec!(100), dec!(110)]);
        assert_eq!(report.expiration_notice, None);
        assert!(report.format_table().contains("ACME OPTIONS ANALYSIS"));
    }

    #[tokio::test]
    async fn test_no_chains() {
        let analyzer = Analyzer::new(source(Vec::new()), 0.05);
        let ticker = Ticker::parse("ACME").unwrap();
        let result = analyzer.analyze(&ticker, &AnalysisRequest::default()).await;
        assert!(matches!(result, Err(AnalysisError::NoChains(t)) if t.as_str() == "ACME"));
    }

    #[tokio::test]
    async fn test_quote_missing_is_feed_error() {
        let analyzer = Analyzer::new(source(vec![raw("C100", OptionType::Call, dec!(100), 1)]), 0.05);
        let ticker = Ticker::parse("XYZ").unwrap();
        let result = analyzer.analyze(&ticker, &AnalysisRequest::default()).await;
        assert!(matches!(
            result,
            Err(AnalysisError::Feed(FeedError::QuoteNotFound(_)))
        ));
    }

    #[test]
    fn test_volume_leaders_top_five() {
        let quote = Quote::new("ACME").with_last(dec!(100));
        let raws: Vec<RawContract> = (0..7u64)
            .map(|i| raw(&format!("C{}", i), OptionType::Call, dec!(100), i * 10))
            .collect();
        let batch = Enricher::default().enrich_all(&raws, &quote, Utc::now());

        let leaders = volume_leaders(&batch.contracts, VOLUME_LEADERS);
        let symbols: Vec<&str> = leaders.iter().map(|c| c.symbol()).collect();
        assert_eq!(symbols, vec!["C6", "C5", "C4", "C3", "C2"]);
    }
}
