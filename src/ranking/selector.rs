//! Optimal contract selection
//!
//! Candidates are gathered in a fixed precedence order, then deduplicated
//! by symbol (earlier category wins) and truncated. The result is never
//! padded.

use super::{GreeksScorer, MarketOutlook, Recommendation, SelectionReason};
use crate::chain::{EnrichedContract, OptionType};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Upper bound on recommendations
pub const MAX_RECOMMENDATIONS: usize = 4;
/// Volume leaders taken in the first category
const VOLUME_LEADERS: usize = 2;
/// Risk/reward candidates must have more days left than this
const MIN_RISK_REWARD_DAYS: i64 = 7;

struct Candidate<'a> {
    contract: &'a EnrichedContract,
    score: f64,
}

/// Picks a small set of recommended contracts
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalSelector {
    scorer: GreeksScorer,
}

impl OptimalSelector {
    /// Create a selector that ranks with the given scorer
    pub fn new(scorer: GreeksScorer) -> Self {
        Self { scorer }
    }

    /// Select at most [`MAX_RECOMMENDATIONS`] contracts
    pub fn select(
        &self,
        contracts: &[EnrichedContract],
        spot: Decimal,
        outlook: MarketOutlook,
    ) -> Vec<Recommendation> {
        let traded: Vec<Candidate<'_>> = contracts
            .iter()
            .filter(|c| c.volume() > 0)
            .map(|contract| Candidate {
                contract,
                score: self.scorer.score(contract, spot, outlook),
            })
            .collect();

        let mut picks: Vec<(&Candidate<'_>, SelectionReason)> = Vec::new();

        let mut by_volume: Vec<&Candidate<'_>> = traded.iter().collect();
        by_volume.sort_by(|a, b| b.contract.volume().cmp(&a.contract.volume()));
        for (i, candidate) in by_volume.into_iter().take(VOLUME_LEADERS).enumerate() {
            picks.push((candidate, SelectionReason::HighestVolume { rank: i + 1 }));
        }

        let best_score = traded
            .iter()
            .filter(|c| c.contract.bid().unwrap_or(Decimal::ZERO) > Decimal::ZERO)
            .reduce(|best, current| if current.score > best.score { current } else { best });
        if let Some(candidate) = best_score {
            picks.push((candidate, SelectionReason::BestGreeksScore));
        }

        if let Some(candidate) = highest_volume_of(&traded, OptionType::Call) {
            picks.push((candidate, SelectionReason::HighestVolumeCall));
        }
        if let Some(candidate) = highest_volume_of(&traded, OptionType::Put) {
            picks.push((candidate, SelectionReason::HighestVolumePut));
        }

        // Least time value paid per remaining day. Kept as-is: this favours
        // contracts closer to worthless per day.
        let best_risk_reward = traded
            .iter()
            .filter(|c| {
                c.contract.days_to_expiry() > MIN_RISK_REWARD_DAYS
                    && c.contract.time_value() > Decimal::ZERO
            })
            .reduce(|best, current| {
                if decay_per_day(current.contract) < decay_per_day(best.contract) {
                    current
                } else {
                    best
                }
            });
        if let Some(candidate) = best_risk_reward {
            picks.push((candidate, SelectionReason::BestRiskReward));
        }

        let mut seen = HashSet::new();
        let recommendations: Vec<Recommendation> = picks
            .into_iter()
            .filter(|(candidate, _)| seen.insert(candidate.contract.symbol()))
            .take(MAX_RECOMMENDATIONS)
            .map(|(candidate, reason)| Recommendation {
                reason,
                greeks_score: candidate.score,
                contract: candidate.contract.clone(),
            })
            .collect();

        tracing::debug!(
            candidates = traded.len(),
            selected = recommendations.len(),
            outlook = %outlook,
            "Selected optimal contracts"
        );

        recommendations
    }
}

/// Select with the default scorer
pub fn select_optimal(
    contracts: &[EnrichedContract],
    spot: Decimal,
    outlook: MarketOutlook,
) -> Vec<Recommendation> {
    OptimalSelector::default().select(contracts, spot, outlook)
}

fn highest_volume_of<'c, 'a>(
    traded: &'c [Candidate<'a>],
    option_type: OptionType,
) -> Option<&'c Candidate<'a>> {
    traded
        .iter()
        .filter(|c| c.contract.option_type() == option_type)
        .reduce(|best, current| {
            if current.contract.volume() > best.contract.volume() {
                current
            } else {
                best
            }
        })
}

fn decay_per_day(contract: &EnrichedContract) -> Decimal {
    contract.time_value() / Decimal::from(contract.days_to_expiry())
}
