//! Greeks model module
//!
//! Black-Scholes Greeks with a heuristic volatility proxy, used when the
//! data provider does not supply a Greeks block.

mod black_scholes;
mod volatility;

pub use black_scholes::{normal_cdf, normal_pdf, BlackScholesModel, DEFAULT_RISK_FREE_RATE};
pub use volatility::{proxy_volatility, BASE_VOLATILITY, MAX_VOLATILITY, MIN_VOLATILITY};

use crate::chain::{OptionType, ProviderGreeks};
use serde::{Deserialize, Serialize};

/// Where a contract's Greeks came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreeksSource {
    /// Copied from the data provider's Greeks block
    Provider,
    /// Computed by a [`GreeksModel`]
    Estimated,
    /// No block and not eligible for estimation; all zero
    Unavailable,
}

/// Option Greeks for a single contract.
///
/// Either every field comes from the provider or every field comes from the
/// estimator. The provider-only fields (`rho`, `phi`, bid/ask IV,
/// `updated_at`) are `None` unless `source` is [`GreeksSource::Provider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub source: GreeksSource,
    /// dV/dS
    pub delta: f64,
    /// d²V/dS²
    pub gamma: f64,
    /// Time decay per calendar day
    pub theta: f64,
    /// Sensitivity per percentage point of volatility
    pub vega: f64,
    /// Annualized implied volatility (proxy when estimated)
    pub implied_vol: f64,
    pub rho: Option<f64>,
    pub phi: Option<f64>,
    pub bid_iv: Option<f64>,
    pub ask_iv: Option<f64>,
    pub updated_at: Option<String>,
}

impl Greeks {
    /// All-zero placeholder
    pub fn unavailable() -> Self {
        Self {
            source: GreeksSource::Unavailable,
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            implied_vol: 0.0,
            rho: None,
            phi: None,
            bid_iv: None,
            ask_iv: None,
            updated_at: None,
        }
    }

    /// Engine-estimated Greeks; non-finite values become zero
    pub fn estimated(delta: f64, gamma: f64, theta: f64, vega: f64, implied_vol: f64) -> Self {
        Self {
            source: GreeksSource::Estimated,
            delta: finite_or_zero(delta),
            gamma: finite_or_zero(gamma),
            theta: finite_or_zero(theta),
            vega: finite_or_zero(vega),
            implied_vol: finite_or_zero(implied_vol),
            ..Self::unavailable()
        }
    }

    /// Provider Greeks taken verbatim, absent fields as zero.
    ///
    /// Implied volatility prefers `smv_vol`, then `mid_iv`.
    pub fn from_provider(provided: &ProviderGreeks) -> Self {
        let implied_vol = provided
            .smv_vol
            .filter(|v| *v != 0.0)
            .or(provided.mid_iv)
            .unwrap_or(0.0);

        Self {
            source: GreeksSource::Provider,
            delta: provided.delta.unwrap_or(0.0),
            gamma: provided.gamma.unwrap_or(0.0),
            theta: provided.theta.unwrap_or(0.0),
            vega: provided.vega.unwrap_or(0.0),
            implied_vol,
            rho: Some(provided.rho.unwrap_or(0.0)),
            phi: Some(provided.phi.unwrap_or(0.0)),
            bid_iv: Some(provided.bid_iv.unwrap_or(0.0)),
            ask_iv: Some(provided.ask_iv.unwrap_or(0.0)),
            updated_at: provided.updated_at.clone(),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Inputs for a Greeks estimate
#[derive(Debug, Clone, Copy)]
pub struct GreeksParams {
    /// Underlying spot price
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Calendar days to expiry
    pub days_to_expiry: i64,
    /// Observed option price (last, else bid/ask midpoint)
    pub option_price: f64,
    pub option_type: OptionType,
}

/// Trait for Greeks estimator implementations
pub trait GreeksModel: Send + Sync {
    /// Estimate Greeks for a single contract
    fn estimate(&self, params: &GreeksParams) -> Greeks;
}
