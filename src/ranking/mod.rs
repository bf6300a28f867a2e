//! Ranking module
//!
//! Scores enriched contracts under a market outlook, picks the optimal
//! handful, and produces filtered and ordered chain views

mod filter;
mod scorer;
mod selector;
mod types;

pub use filter::{filter_and_sort, ChainFilter, ChainRow, SortKey};
pub use scorer::{score, GreeksScorer, ScoreWeights};
pub use selector::{select_optimal, OptimalSelector, MAX_RECOMMENDATIONS};
pub use types::{MarketOutlook, Recommendation, SelectionReason};
