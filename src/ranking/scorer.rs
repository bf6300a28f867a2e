//! Composite Greeks score
//!
//! A weighted heuristic, not a probability. Weights are tuning constants and
//! do not sum to one. The score is floored at zero.

use super::MarketOutlook;
use crate::chain::{derived, EnrichedContract};
use rust_decimal::Decimal;

/// Delta multiplier when the outlook matches the option type
const DIRECTIONAL_DELTA_SCALE: f64 = 100.0;
/// Delta multiplier for neutral outlook or a directional mismatch
const NEUTRAL_DELTA_SCALE: f64 = 50.0;
const GAMMA_SCALE: f64 = 1000.0;
const GAMMA_CAP: f64 = 50.0;
const THETA_SCALE: f64 = 100.0;
const THETA_CAP: f64 = 30.0;
const VEGA_SCALE: f64 = 10.0;
const VEGA_CAP: f64 = 20.0;
const VOLUME_DIVISOR: f64 = 100.0;
const VOLUME_CAP: f64 = 10.0;
const MONEYNESS_BONUS_MAX: f64 = 10.0;
const MONEYNESS_BONUS_WEIGHT: f64 = 0.1;

/// Component weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub volume: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            delta: 0.30,
            gamma: 0.20,
            theta: 0.25,
            vega: 0.15,
            volume: 0.10,
        }
    }
}

/// Scores contracts under a market outlook
#[derive(Debug, Clone, Copy, Default)]
pub struct GreeksScorer {
    weights: ScoreWeights,
}

impl GreeksScorer {
    /// Create a scorer with custom weights
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score a contract; moneyness is measured against `spot`.
    ///
    /// Takes the contract by shared reference, so rescoring under another
    /// outlook can never disturb it.
    pub fn score(&self, contract: &EnrichedContract, spot: Decimal, outlook: MarketOutlook) -> f64 {
        let w = &self.weights;
        let greeks = contract.greeks();

        let delta_scale = if outlook.favours(contract.option_type()) {
            DIRECTIONAL_DELTA_SCALE
        } else {
            NEUTRAL_DELTA_SCALE
        };
        let delta = greeks.delta.abs() * delta_scale * w.delta;
        let gamma = (greeks.gamma * GAMMA_SCALE).min(GAMMA_CAP) * w.gamma;
        let theta_penalty = (greeks.theta.abs() * THETA_SCALE).min(THETA_CAP) * w.theta;
        let vega = (greeks.vega * VEGA_SCALE).min(VEGA_CAP) * w.vega;
        let volume = (contract.volume() as f64 / VOLUME_DIVISOR).min(VOLUME_CAP) * w.volume;

        let moneyness = derived::moneyness(contract.strike(), spot, contract.option_type());
        let moneyness_bonus =
            (MONEYNESS_BONUS_MAX - (moneyness * 100.0).abs()).max(0.0) * MONEYNESS_BONUS_WEIGHT;

        let total = delta + gamma - theta_penalty + vega + volume + moneyness_bonus;
        if total.is_finite() {
            total.max(0.0)
        } else {
            0.0
        }
    }
}

/// Score with the default weights
pub fn score(contract: &EnrichedContract, spot: Decimal, outlook: MarketOutlook) -> f64 {
    GreeksScorer::default().score(contract, spot, outlook)
}
