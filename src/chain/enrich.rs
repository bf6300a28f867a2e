//! Contract enrichment
//!
//! Turns raw provider records into immutable [`EnrichedContract`]s. One
//! `now` is captured per batch so every contract in it shares the same
//! days-to-expiry reference.

use super::derived;
use super::{ContractError, DerivedMetrics, EnrichedContract, OptionType, Quote, RawContract};
use crate::model::{BlackScholesModel, Greeks, GreeksModel, GreeksParams, GreeksSource};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A record that failed shape validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub symbol: String,
    pub error: ContractError,
}

/// Result of enriching a batch of raw records
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedBatch {
    /// Reference time shared by every contract in the batch
    pub as_of: DateTime<Utc>,
    pub contracts: Vec<EnrichedContract>,
    pub rejected: Vec<Rejection>,
}

impl EnrichedBatch {
    /// Count of contracts by Greeks source
    pub fn source_count(&self, source: GreeksSource) -> usize {
        self.contracts
            .iter()
            .filter(|c| c.greeks().source == source)
            .count()
    }
}

/// Builds enriched contracts against a quote
pub struct Enricher<M: GreeksModel = BlackScholesModel> {
    model: M,
}

impl Enricher<BlackScholesModel> {
    /// Enricher using Black-Scholes at the given risk-free rate
    pub fn black_scholes(risk_free_rate: f64) -> Self {
        Self::new(BlackScholesModel::new(risk_free_rate))
    }
}

impl Default for Enricher<BlackScholesModel> {
    fn default() -> Self {
        Self::new(BlackScholesModel::default())
    }
}

impl<M: GreeksModel> Enricher<M> {
    /// Create an enricher with the given Greeks model
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Validate and enrich a single record
    pub fn enrich(
        &self,
        raw: &RawContract,
        quote: &Quote,
        now: DateTime<Utc>,
    ) -> Result<EnrichedContract, ContractError> {
        let (option_type, strike) = raw.validate()?;
        let spot = quote.spot();

        let derived = DerivedMetrics {
            days_to_expiry: derived::days_to_expiry(raw.expiration_date, now),
            moneyness: derived::moneyness(strike, spot, option_type),
            intrinsic_value: derived::intrinsic_value(strike, spot, option_type),
            time_value: derived::time_value(raw.last, strike, spot, option_type),
            break_even: derived::break_even(strike, raw.last, option_type),
        };

        let greeks = self.select_greeks(raw, option_type, strike, spot, derived.days_to_expiry);

        Ok(EnrichedContract::from_parts(
            raw,
            option_type,
            strike,
            derived,
            greeks,
        ))
    }

    /// Enrich a batch; invalid records are skipped and reported
    pub fn enrich_all(&self, raws: &[RawContract], quote: &Quote, now: DateTime<Utc>) -> EnrichedBatch {
        let mut contracts = Vec::with_capacity(raws.len());
        let mut rejected = Vec::new();

        for raw in raws {
            match self.enrich(raw, quote, now) {
                Ok(contract) => contracts.push(contract),
                Err(error) => {
                    tracing::warn!(symbol = %raw.symbol, error = %error, "Rejected contract");
                    rejected.push(Rejection {
                        symbol: raw.symbol.clone(),
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            enriched = contracts.len(),
            rejected = rejected.len(),
            "Enriched contract batch"
        );

        EnrichedBatch {
            as_of: now,
            contracts,
            rejected,
        }
    }

    /// Provider Greeks win outright; estimation only fills the gap
    fn select_greeks(
        &self,
        raw: &RawContract,
        option_type: OptionType,
        strike: Decimal,
        spot: Decimal,
        days_to_expiry: i64,
    ) -> Greeks {
        if let Some(provided) = &raw.greeks {
            return Greeks::from_provider(provided);
        }

        if spot <= Decimal::ZERO || strike <= Decimal::ZERO || days_to_expiry <= 0 {
            return Greeks::unavailable();
        }

        let params = GreeksParams {
            spot: to_f64(spot),
            strike: to_f64(strike),
            days_to_expiry,
            option_price: observed_price(raw),
            option_type,
        };
        self.model.estimate(&params)
    }
}

/// Last trade, else the bid/ask midpoint with absent sides as zero
fn observed_price(raw: &RawContract) -> f64 {
    match raw.last {
        Some(last) if last > Decimal::ZERO => to_f64(last),
        _ => {
            let bid = raw.bid.unwrap_or(Decimal::ZERO);
            let ask = raw.ask.unwrap_or(Decimal::ZERO);
            bid.checked_add(ask)
                .and_then(|sum| sum.checked_div(Decimal::TWO))
                .map_or(0.0, to_f64)
        }
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}
