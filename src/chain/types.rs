//! Option chain types
//!
//! Raw provider records, the underlying quote, and the immutable enriched
//! contract produced by [`super::Enricher`].

use crate::model::Greeks;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Option type (call or put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            _ => Err(ContractError::InvalidOptionType(s.to_string())),
        }
    }
}

/// Contract shape violations, rejected before enrichment
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum ContractError {
    /// Option type outside {call, put}
    #[error("invalid option type: {0:?}")]
    InvalidOptionType(String),
    /// Record carries no strike
    #[error("missing strike")]
    MissingStrike,
    /// Strike below zero
    #[error("negative strike: {0}")]
    NegativeStrike(Decimal),
}

/// Underlying snapshot, fetched once per analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last: Option<Decimal>,
    #[serde(default)]
    pub prevclose: Option<Decimal>,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<u64>,
}

impl Quote {
    /// Create an empty quote for a symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Set the last traded price
    pub fn with_last(mut self, last: Decimal) -> Self {
        self.last = Some(last);
        self
    }

    /// Spot price used by every derivation; zero when absent
    pub fn spot(&self) -> Decimal {
        self.last.unwrap_or(Decimal::ZERO)
    }

    /// Percentage change from previous close
    pub fn change_pct(&self) -> Option<Decimal> {
        let last = self.last?;
        let prev = self.prevclose?;
        if prev.is_zero() {
            return None;
        }
        last.checked_sub(prev)?
            .checked_div(prev)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

/// Greeks block as supplied by a data provider; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderGreeks {
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
    #[serde(default)]
    pub rho: Option<f64>,
    #[serde(default)]
    pub phi: Option<f64>,
    /// Primary implied volatility (ORATS smoothed)
    #[serde(default)]
    pub smv_vol: Option<f64>,
    /// Secondary mid implied volatility
    #[serde(default)]
    pub mid_iv: Option<f64>,
    #[serde(default)]
    pub bid_iv: Option<f64>,
    #[serde(default)]
    pub ask_iv: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// An option record as received from a data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawContract {
    /// Option symbol (e.g. OCC "AAPL261120C00150000")
    pub symbol: String,
    #[serde(default)]
    pub underlying: Option<String>,
    #[serde(default)]
    pub strike: Option<Decimal>,
    /// Unvalidated option type; must be "call" or "put"
    pub option_type: String,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub last: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub open_interest: Option<u64>,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub greeks: Option<ProviderGreeks>,
}

impl RawContract {
    /// Create a record with identity fields only
    pub fn new(
        symbol: impl Into<String>,
        strike: Decimal,
        option_type: OptionType,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            underlying: None,
            strike: Some(strike),
            option_type: option_type.as_str().to_string(),
            bid: None,
            ask: None,
            last: None,
            volume: None,
            open_interest: None,
            expiration_date,
            greeks: None,
        }
    }

    /// Set bid, ask and last prices
    pub fn with_prices(mut self, bid: Decimal, ask: Decimal, last: Decimal) -> Self {
        self.bid = Some(bid);
        self.ask = Some(ask);
        self.last = Some(last);
        self
    }

    /// Set volume and open interest
    pub fn with_activity(mut self, volume: u64, open_interest: u64) -> Self {
        self.volume = Some(volume);
        self.open_interest = Some(open_interest);
        self
    }

    /// Attach a provider Greeks block
    pub fn with_greeks(mut self, greeks: ProviderGreeks) -> Self {
        self.greeks = Some(greeks);
        self
    }

    /// Check the record's shape, returning its parsed type and strike
    pub fn validate(&self) -> Result<(OptionType, Decimal), ContractError> {
        let option_type = self.option_type.parse::<OptionType>()?;
        let strike = self.strike.ok_or(ContractError::MissingStrike)?;
        if strike < Decimal::ZERO {
            return Err(ContractError::NegativeStrike(strike));
        }
        Ok((option_type, strike))
    }
}

/// Fields computed from a raw record during enrichment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub days_to_expiry: i64,
    pub moneyness: f64,
    pub intrinsic_value: Decimal,
    pub time_value: Decimal,
    pub break_even: Decimal,
}

/// A validated contract with derived metrics and Greeks.
///
/// Only [`super::Enricher`] constructs these; there is no way to change a
/// field afterwards. Scoring layers decorate a reference or a clone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedContract {
    symbol: String,
    underlying: Option<String>,
    strike: Decimal,
    option_type: OptionType,
    expiration_date: NaiveDate,
    bid: Option<Decimal>,
    ask: Option<Decimal>,
    last: Option<Decimal>,
    volume: Option<u64>,
    open_interest: Option<u64>,
    #[serde(flatten)]
    derived: DerivedMetrics,
    greeks: Greeks,
}

impl EnrichedContract {
    pub(crate) fn from_parts(
        raw: &RawContract,
        option_type: OptionType,
        strike: Decimal,
        derived: DerivedMetrics,
        greeks: Greeks,
    ) -> Self {
        Self {
            symbol: raw.symbol.clone(),
            underlying: raw.underlying.clone(),
            strike,
            option_type,
            expiration_date: raw.expiration_date,
            bid: raw.bid,
            ask: raw.ask,
            last: raw.last,
            volume: raw.volume,
            open_interest: raw.open_interest,
            derived,
            greeks,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn underlying(&self) -> Option<&str> {
        self.underlying.as_deref()
    }

    pub fn strike(&self) -> Decimal {
        self.strike
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    pub fn bid(&self) -> Option<Decimal> {
        self.bid
    }

    pub fn ask(&self) -> Option<Decimal> {
        self.ask
    }

    pub fn last(&self) -> Option<Decimal> {
        self.last
    }

    /// Traded volume, zero when absent
    pub fn volume(&self) -> u64 {
        self.volume.unwrap_or(0)
    }

    /// Open interest, zero when absent
    pub fn open_interest(&self) -> u64 {
        self.open_interest.unwrap_or(0)
    }

    pub fn days_to_expiry(&self) -> i64 {
        self.derived.days_to_expiry
    }

    pub fn moneyness(&self) -> f64 {
        self.derived.moneyness
    }

    pub fn intrinsic_value(&self) -> Decimal {
        self.derived.intrinsic_value
    }

    pub fn time_value(&self) -> Decimal {
        self.derived.time_value
    }

    pub fn break_even(&self) -> Decimal {
        self.derived.break_even
    }

    pub fn greeks(&self) -> &Greeks {
        &self.greeks
    }
}
