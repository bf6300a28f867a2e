//! Volatility proxy
//!
//! Rough annualized volatility from an option's time value. This is not an
//! implied volatility: there is no iteration against a pricing model, only
//! sigma ~= 2 * time_value / (S * sqrt(T)) clamped to a sane band.

use crate::chain::OptionType;

/// Volatility assumed when the contract carries no time value
pub const BASE_VOLATILITY: f64 = 0.20;
/// Lower clamp for the proxy
pub const MIN_VOLATILITY: f64 = 0.10;
/// Upper clamp for the proxy
pub const MAX_VOLATILITY: f64 = 2.00;

/// Estimate volatility from the observed option price
pub fn proxy_volatility(
    spot: f64,
    strike: f64,
    option_price: f64,
    t_years: f64,
    option_type: OptionType,
) -> f64 {
    let intrinsic = match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    };
    let time_value = (option_price - intrinsic).max(0.0);

    if time_value > 0.0 && t_years > 0.0 {
        (time_value / (spot * t_years.sqrt()) * 2.0).clamp(MIN_VOLATILITY, MAX_VOLATILITY)
    } else {
        BASE_VOLATILITY
    }
}
