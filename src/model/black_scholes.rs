//! Black-Scholes Greeks model
//!
//! d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma*sqrt(T)), d2 = d1 - sigma*sqrt(T)
//!
//! Volatility is not solved for. The model uses [`proxy_volatility`], a
//! single-pass estimate from the contract's time value; downstream scoring
//! is tuned to that scale.

use super::{proxy_volatility, Greeks, GreeksModel, GreeksParams};
use crate::chain::OptionType;

/// Default annualized risk-free rate
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

const DAYS_PER_YEAR: f64 = 365.0;

/// Black-Scholes Greeks estimator
#[derive(Debug, Clone)]
pub struct BlackScholesModel {
    risk_free_rate: f64,
}

impl BlackScholesModel {
    /// Create a model with the given annualized risk-free rate
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Greeks at a known volatility.
    ///
    /// `t_years` and `spot` must be positive; callers check.
    pub fn greeks_at(
        &self,
        spot: f64,
        strike: f64,
        t_years: f64,
        sigma: f64,
        option_type: OptionType,
    ) -> Greeks {
        let r = self.risk_free_rate;
        let sqrt_t = t_years.sqrt();
        let d1 = d1(spot, strike, r, t_years, sigma);
        let d2 = d1 - sigma * sqrt_t;

        let nd1 = normal_cdf(d1);
        let nd2 = normal_cdf(d2);
        let pdf_d1 = normal_pdf(d1);
        let discounted_strike = r * strike * (-r * t_years).exp();
        let decay = -(spot * pdf_d1 * sigma) / (2.0 * sqrt_t);

        let (delta, theta) = match option_type {
            OptionType::Call => (nd1, decay - discounted_strike * nd2),
            OptionType::Put => (nd1 - 1.0, decay + discounted_strike * (1.0 - nd2)),
        };

        let gamma = pdf_d1 / (spot * sigma * sqrt_t);
        let vega = spot * pdf_d1 * sqrt_t / 100.0;

        Greeks::estimated(delta, gamma, theta / DAYS_PER_YEAR, vega, sigma)
    }
}

impl Default for BlackScholesModel {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_RATE)
    }
}

impl GreeksModel for BlackScholesModel {
    fn estimate(&self, params: &GreeksParams) -> Greeks {
        let t_years = params.days_to_expiry as f64 / DAYS_PER_YEAR;

        if params.option_price <= 0.0 || t_years <= 0.0 || params.spot <= 0.0 {
            return Greeks::unavailable();
        }

        let sigma = proxy_volatility(
            params.spot,
            params.strike,
            params.option_price,
            t_years,
            params.option_type,
        );

        self.greeks_at(params.spot, params.strike, t_years, sigma, params.option_type)
    }
}

fn d1(spot: f64, strike: f64, r: f64, t_years: f64, sigma: f64) -> f64 {
    ((spot / strike).ln() + (r + 0.5 * sigma * sigma) * t_years) / (sigma * t_years.sqrt())
}

/// Standard normal CDF approximation (Abramowitz and Stegun 7.1.26, |error| < 1.5e-7)
pub fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Standard normal PDF
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
}
