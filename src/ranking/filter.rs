//! Chain filtering and ordering

use super::{GreeksScorer, MarketOutlook};
use crate::chain::{EnrichedContract, OptionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Column a chain view can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending; the only key that triggers scoring
    GreeksScore,
    Volume,
    OpenInterest,
    /// Descending absolute delta
    Delta,
    Gamma,
    /// Ascending absolute theta, slowest decay first
    Theta,
    Vega,
    /// Ascending
    Strike,
    Bid,
}

impl SortKey {
    /// Parse a sort key; unrecognised keys yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greeks_score" | "greeksscore" | "score" => Some(SortKey::GreeksScore),
            "volume" => Some(SortKey::Volume),
            "open_interest" | "openinterest" | "oi" => Some(SortKey::OpenInterest),
            "delta" => Some(SortKey::Delta),
            "gamma" => Some(SortKey::Gamma),
            "theta" => Some(SortKey::Theta),
            "vega" => Some(SortKey::Vega),
            "strike" => Some(SortKey::Strike),
            "bid" => Some(SortKey::Bid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::GreeksScore => "greeks_score",
            SortKey::Volume => "volume",
            SortKey::OpenInterest => "open_interest",
            SortKey::Delta => "delta",
            SortKey::Gamma => "gamma",
            SortKey::Theta => "theta",
            SortKey::Vega => "vega",
            SortKey::Strike => "strike",
            SortKey::Bid => "bid",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and ordering applied to an enriched chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFilter {
    /// Keep only this expiration
    pub expiration: Option<NaiveDate>,
    /// Keep only this side
    pub option_type: Option<OptionType>,
    /// `None` keeps input order
    pub sort: Option<SortKey>,
}

impl ChainFilter {
    pub fn expiration(mut self, expiration: NaiveDate) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    pub fn sort(mut self, sort: Option<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, contract: &EnrichedContract) -> bool {
        self.expiration
            .map_or(true, |date| contract.expiration_date() == date)
            && self
                .option_type
                .map_or(true, |side| contract.option_type() == side)
    }

    /// Filter then stable-sort `contracts`
    pub fn apply<'a>(
        &self,
        contracts: &'a [EnrichedContract],
        scorer: &GreeksScorer,
        spot: Decimal,
        outlook: MarketOutlook,
    ) -> Vec<ChainRow<'a>> {
        let mut rows: Vec<ChainRow<'a>> = contracts
            .iter()
            .filter(|c| self.matches(c))
            .map(|contract| ChainRow {
                contract,
                greeks_score: None,
            })
            .collect();

        let Some(key) = self.sort else {
            return rows;
        };

        if key == SortKey::GreeksScore {
            for row in rows.iter_mut() {
                row.greeks_score = Some(scorer.score(row.contract, spot, outlook));
            }
        }

        rows.sort_by(|a, b| compare(key, a, b));
        rows
    }
}

/// A contract in a filtered view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChainRow<'a> {
    #[serde(flatten)]
    pub contract: &'a EnrichedContract,
    /// Present only when the view is ordered by score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeks_score: Option<f64>,
}

fn compare(key: SortKey, a: &ChainRow<'_>, b: &ChainRow<'_>) -> Ordering {
    let (x, y) = (a.contract, b.contract);
    match key {
        SortKey::GreeksScore => desc_f64(
            a.greeks_score.unwrap_or(0.0),
            b.greeks_score.unwrap_or(0.0),
        ),
        SortKey::Volume => y.volume().cmp(&x.volume()),
        SortKey::OpenInterest => y.open_interest().cmp(&x.open_interest()),
        SortKey::Delta => desc_f64(x.greeks().delta.abs(), y.greeks().delta.abs()),
        SortKey::Gamma => desc_f64(x.greeks().gamma, y.greeks().gamma),
        SortKey::Theta => x.greeks().theta.abs().total_cmp(&y.greeks().theta.abs()),
        SortKey::Vega => desc_f64(x.greeks().vega, y.greeks().vega),
        SortKey::Strike => x.strike().cmp(&y.strike()),
        SortKey::Bid => y
            .bid()
            .unwrap_or(Decimal::ZERO)
            .cmp(&x.bid().unwrap_or(Decimal::ZERO)),
    }
}

fn desc_f64(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Filter and sort with the default scorer
pub fn filter_and_sort<'a>(
    contracts: &'a [EnrichedContract],
    spot: Decimal,
    outlook: MarketOutlook,
    filter: &ChainFilter,
) -> Vec<ChainRow<'a>> {
    filter.apply(contracts, &GreeksScorer::default(), spot, outlook)
}
