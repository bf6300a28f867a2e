//! options-scout: options chain analytics for a single ticker
//!
//! This library provides the core components for:
//! - Per-contract derived metrics (moneyness, intrinsic/time value, break-even)
//! - Black-Scholes Greeks with a time-value volatility proxy
//! - Outlook-aware Greeks scoring
//! - Optimal contract selection and chain filtering/sorting
//! - Tradier and snapshot chain sources
//! - Report assembly, CLI, and the logging/metrics stack

pub mod analysis;
pub mod chain;
pub mod cli;
pub mod config;
pub mod feed;
pub mod model;
pub mod ranking;
pub mod telemetry;
