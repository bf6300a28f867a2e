//! Ranking types

use crate::chain::{EnrichedContract, OptionType};
use serde::{Deserialize, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Directional bias applied to delta scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketOutlook {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl MarketOutlook {
    /// Whether the outlook points the same way as the option type
    pub fn favours(&self, option_type: OptionType) -> bool {
        matches!(
            (self, option_type),
            (MarketOutlook::Bullish, OptionType::Call) | (MarketOutlook::Bearish, OptionType::Put)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketOutlook::Bullish => "bullish",
            MarketOutlook::Bearish => "bearish",
            MarketOutlook::Neutral => "neutral",
        }
    }
}

impl fmt::Display for MarketOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything other than bullish/bearish is neutral
impl FromStr for MarketOutlook {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "bullish" => MarketOutlook::Bullish,
            "bearish" => MarketOutlook::Bearish,
            _ => MarketOutlook::Neutral,
        })
    }
}

/// Why a contract was recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// One of the two most traded contracts (rank 1 or 2)
    HighestVolume { rank: usize },
    /// Top Greeks score among liquid, bid contracts
    BestGreeksScore,
    /// Most traded call
    HighestVolumeCall,
    /// Most traded put
    HighestVolumePut,
    /// Lowest time value per remaining day
    BestRiskReward,
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionReason::HighestVolume { rank } => write!(f, "Highest Volume (#{})", rank),
            SelectionReason::BestGreeksScore => f.write_str("Best Greeks Score"),
            SelectionReason::HighestVolumeCall => f.write_str("Highest Volume Call"),
            SelectionReason::HighestVolumePut => f.write_str("Highest Volume Put"),
            SelectionReason::BestRiskReward => f.write_str("Best Risk/Reward"),
        }
    }
}

impl Serialize for SelectionReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A selected contract with its score under the requested outlook
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub reason: SelectionReason,
    pub greeks_score: f64,
    pub contract: EnrichedContract,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlook_parse_is_lenient() {
        assert_eq!("bullish".parse::<MarketOutlook>().unwrap(), MarketOutlook::Bullish);
        assert_eq!("BEARISH".parse::<MarketOutlook>().unwrap(), MarketOutlook::Bearish);
        assert_eq!("sideways".parse::<MarketOutlook>().unwrap(), MarketOutlook::Neutral);
        assert_eq!("".parse::<MarketOutlook>().unwrap(), MarketOutlook::Neutral);
    }

    #[test]
    fn test_outlook_favours() {
        assert!(MarketOutlook::Bullish.favours(OptionType::Call));
        assert!(!MarketOutlook::Bullish.favours(OptionType::Put));
        assert!(MarketOutlook::Bearish.favours(OptionType::Put));
        assert!(!MarketOutlook::Neutral.favours(OptionType::Call));
        assert!(!MarketOutlook::Neutral.favours(OptionType::Put));
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(
            SelectionReason::HighestVolume { rank: 1 }.to_string(),
            "Highest Volume (#1)"
        );
        assert_eq!(
            SelectionReason::HighestVolume { rank: 2 }.to_string(),
            "Highest Volume (#2)"
        );
        assert_eq!(SelectionReason::BestRiskReward.to_string(), "Best Risk/Reward");
        let json = serde_json::to_string(&SelectionReason::BestGreeksScore).unwrap();
        assert_eq!(json, "\"Best Greeks Score\"");
    }
}
