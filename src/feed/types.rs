//! Tradier wire types
//!
//! Tradier collapses single-element arrays into bare objects and empty
//! collections into `null`, so every list is read through [`OneOrMany`].

use super::parse_occ_expiration;
use crate::chain::{ProviderGreeks, Quote, RawContract};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// A value that may arrive as a single item or an array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn flatten<T>(value: Option<OneOrMany<T>>) -> Vec<T> {
    value.map(OneOrMany::into_vec).unwrap_or_default()
}

/// `GET /markets/quotes`
#[derive(Debug, Deserialize)]
pub struct QuotesResponse {
    #[serde(default)]
    quotes: Option<QuotesBody>,
}

#[derive(Debug, Deserialize)]
struct QuotesBody {
    #[serde(default)]
    quote: Option<OneOrMany<Quote>>,
}

impl QuotesResponse {
    /// First quote in the payload, if any
    pub fn into_quote(self) -> Option<Quote> {
        self.quotes
            .and_then(|body| flatten(body.quote).into_iter().next())
    }
}

/// `GET /markets/options/expirations`
#[derive(Debug, Deserialize)]
pub struct ExpirationsResponse {
    #[serde(default)]
    expirations: Option<ExpirationsBody>,
}

#[derive(Debug, Deserialize)]
struct ExpirationsBody {
    #[serde(default)]
    date: Option<OneOrMany<NaiveDate>>,
}

impl ExpirationsResponse {
    pub fn into_dates(self) -> Vec<NaiveDate> {
        self.expirations
            .map(|body| flatten(body.date))
            .unwrap_or_default()
    }
}

/// `GET /markets/options/chains`
#[derive(Debug, Deserialize)]
pub struct ChainResponse {
    #[serde(default)]
    options: Option<ChainBody>,
}

#[derive(Debug, Deserialize)]
struct ChainBody {
    #[serde(default)]
    option: Option<OneOrMany<TradierOption>>,
}

/// One option record as Tradier sends it
#[derive(Debug, Deserialize)]
struct TradierOption {
    symbol: String,
    #[serde(default)]
    underlying: Option<String>,
    #[serde(default)]
    strike: Option<Decimal>,
    #[serde(default)]
    option_type: String,
    #[serde(default)]
    bid: Option<Decimal>,
    #[serde(default)]
    ask: Option<Decimal>,
    #[serde(default)]
    last: Option<Decimal>,
    #[serde(default)]
    volume: Option<u64>,
    #[serde(default)]
    open_interest: Option<u64>,
    #[serde(default)]
    greeks: Option<ProviderGreeks>,
}

impl ChainResponse {
    /// Records stamped with the expiration they were requested for
    pub fn into_contracts(self, expiration: NaiveDate) -> Vec<RawContract> {
        let options = self
            .options
            .map(|body| flatten(body.option))
            .unwrap_or_default();

        options
            .into_iter()
            .map(|o| RawContract {
                symbol: o.symbol,
                underlying: o.underlying,
                strike: o.strike,
                option_type: o.option_type,
                bid: o.bid,
                ask: o.ask,
                last: o.last,
                volume: o.volume,
                open_interest: o.open_interest,
                expiration_date: expiration,
                greeks: o.greeks,
            })
            .collect()
    }
}

/// `GET /markets/options/lookup`
#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    symbols: Option<LookupBody>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LookupBody {
    List(Vec<LookupEntry>),
    Wrapped {
        #[serde(default)]
        symbol: Option<OneOrMany<LookupEntry>>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LookupEntry {
    Symbol(String),
    Record(LookupRecord),
}

#[derive(Debug, Deserialize)]
struct LookupRecord {
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, alias = "expiration")]
    expiration_date: Option<NaiveDate>,
}

impl LookupResponse {
    /// Distinct expirations in first-seen order
    pub fn expirations(self) -> Vec<NaiveDate> {
        let entries = match self.symbols {
            Some(LookupBody::List(entries)) => entries,
            Some(LookupBody::Wrapped { symbol }) => flatten(symbol),
            None => Vec::new(),
        };

        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut push = |date: NaiveDate| {
            if !dates.contains(&date) {
                dates.push(date);
            }
        };

        for entry in entries {
            match entry {
                LookupEntry::Symbol(symbol) => {
                    if let Some(date) = parse_occ_expiration(&symbol) {
                        push(date);
                    }
                }
                LookupEntry::Record(record) => {
                    if let Some(date) = record.expiration_date {
                        push(date);
                    }
                    for date in record.options.iter().filter_map(|s| parse_occ_expiration(s)) {
                        push(date);
                    }
                }
            }
        }

        dates
    }
}
