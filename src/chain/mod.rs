//! Option chain module
//!
//! Raw contract and quote types, per-contract metric derivation, and the
//! enrichment pass that attaches derived metrics and Greeks

pub mod derived;
mod enrich;
mod types;

pub use enrich::{EnrichedBatch, Enricher, Rejection};
pub use types::{
    ContractError, DerivedMetrics, EnrichedContract, OptionType, ProviderGreeks, Quote,
    RawContract,
};
