//! Analysis report and its text rendering

use super::ExpirationInfo;
use crate::chain::{EnrichedContract, Quote, Rejection};
use crate::feed::Ticker;
use crate::ranking::{ChainRow, MarketOutlook, Recommendation, SortKey};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

/// A chain row owned by the report
#[derive(Debug, Clone, Serialize)]
pub struct ChainEntry {
    #[serde(flatten)]
    pub contract: EnrichedContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeks_score: Option<f64>,
}

impl From<ChainRow<'_>> for ChainEntry {
    fn from(row: ChainRow<'_>) -> Self {
        Self {
            contract: row.contract.clone(),
            greeks_score: row.greeks_score,
        }
    }
}

/// Everything produced by one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub ticker: Ticker,
    pub outlook: MarketOutlook,
    pub sort: Option<SortKey>,
    pub quote: Quote,
    /// Contracts that passed validation
    pub contract_count: usize,
    pub rejected: Vec<Rejection>,
    /// Most traded contracts, busiest first
    pub volume_leaders: Vec<EnrichedContract>,
    pub expirations: Vec<ExpirationInfo>,
    pub expiration_notice: Option<String>,
    pub recommendations: Vec<Recommendation>,
    /// Filtered and ordered chain view
    pub chain: Vec<ChainEntry>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Format the report as a human-readable table
    pub fn format_table(&self) -> String {
        let q = &self.quote;
        let mut out = format!(
            r#"
══════════════════════════════════════════════════════
               {} OPTIONS ANALYSIS
══════════════════════════════════════════════════════
{}

UNDERLYING
───────────────────────────────────────────────────────
Price:            {}
Change:           {}
Volume:           {}
Bid / Ask:        {} / {}

CHAIN
───────────────────────────────────────────────────────
Contracts:        {} ({} rejected)
Expirations:      {}
Outlook:          {}
"#,
            self.ticker,
            q.description.as_deref().unwrap_or("N/A"),
            money(q.last),
            q.change_pct()
                .map(|pct| format!("{:+.2}%", pct))
                .unwrap_or_else(|| "N/A".to_string()),
            count(q.volume),
            money(q.bid),
            money(q.ask),
            self.contract_count,
            self.rejected.len(),
            self.expirations
                .iter()
                .map(|e| match e.kind {
                    super::ExpirationKind::Standard => e.date.to_string(),
                    kind => format!("{} ({})", e.date, kind),
                })
                .collect::<Vec<_>>()
                .join(", "),
            self.outlook,
        );

        if let Some(notice) = &self.expiration_notice {
            let _ = writeln!(out, "Notice:           {}", notice);
        }

        out.push_str("\nVOLUME LEADERS\n───────────────────────────────────────────────────────\n");
        if self.volume_leaders.is_empty() {
            out.push_str("No traded contracts\n");
        }
        for c in &self.volume_leaders {
            let _ = writeln!(
                out,
                "{:<22} {:>4} {:>9} {:>10} {:>10}",
                c.symbol(),
                c.option_type().as_str().to_uppercase(),
                c.strike(),
                count(Some(c.volume())),
                money(c.last().or(c.bid())),
            );
        }

        out.push_str("\nOPTIMAL CONTRACTS\n───────────────────────────────────────────────────────\n");
        if self.recommendations.is_empty() {
            out.push_str("No contracts met the selection criteria\n");
        }
        for rec in &self.recommendations {
            let c = &rec.contract;
            let g = c.greeks();
            let _ = writeln!(
                out,
                "{} (Score: {:.1})\n  {} {} {} exp {}  bid/ask {} / {}  break-even {}\n  \
                 delta {:.3}  gamma {:.4}  theta {:.3}  vega {:.3}  IV {}  volume {}",
                rec.reason,
                rec.greeks_score,
                c.symbol(),
                c.option_type().as_str().to_uppercase(),
                c.strike(),
                c.expiration_date(),
                money(c.bid()),
                money(c.ask()),
                money(Some(c.break_even())),
                g.delta,
                g.gamma,
                g.theta,
                g.vega,
                percent(g.implied_vol),
                count(Some(c.volume())),
            );
        }

        let _ = write!(
            out,
            "\nCHAIN ({} rows{})\n───────────────────────────────────────────────────────\n",
            self.chain.len(),
            self.sort
                .map(|key| format!(", by {}", key))
                .unwrap_or_default(),
        );
        let _ = writeln!(
            out,
            "{:<22} {:>4} {:>10} {:>8} {:>8} {:>8} {:>8} {:>7} {:>7} {:>8} {:>7} {:>6}",
            "SYMBOL", "TYPE", "EXPIRY", "STRIKE", "BID", "ASK", "VOLUME", "DELTA", "GAMMA", "THETA",
            "VEGA", "IV"
        );
        for entry in &self.chain {
            let c = &entry.contract;
            let g = c.greeks();
            let _ = writeln!(
                out,
                "{:<22} {:>4} {:>10} {:>8} {:>8} {:>8} {:>8} {:>7.3} {:>7.4} {:>8.3} {:>7.3} {:>6}",
                c.symbol(),
                c.option_type().as_str().to_uppercase(),
                c.expiration_date(),
                c.strike(),
                money(c.bid()),
                money(c.ask()),
                count(Some(c.volume())),
                g.delta,
                g.gamma,
                g.theta,
                g.vega,
                percent(g.implied_vol),
            );
        }
        out.push_str("══════════════════════════════════════════════════════\n");

        out
    }
}

fn money(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("${:.2}", v),
        None => "N/A".to_string(),
    }
}

fn count(value: Option<u64>) -> String {
    match value {
        Some(v) if v > 0 => v.to_string(),
        _ => "N/A".to_string(),
    }
}

fn percent(vol: f64) -> String {
    if vol > 0.0 {
        format!("{:.1}%", vol * 100.0)
    } else {
        "N/A".to_string()
    }
}
