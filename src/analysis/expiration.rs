//! Expiration day classification

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

/// How an expiration date relates to the regular Friday cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationKind {
    /// Regular Friday expiry
    Standard,
    /// Thursday expiry, usually moved for a Friday market holiday
    HolidayAdjusted,
    /// Any other weekday
    NonStandard(Weekday),
}

impl ExpirationKind {
    pub fn classify(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Fri => ExpirationKind::Standard,
            Weekday::Thu => ExpirationKind::HolidayAdjusted,
            other => ExpirationKind::NonStandard(other),
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, ExpirationKind::Standard)
    }
}

impl fmt::Display for ExpirationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpirationKind::Standard => f.write_str("Standard Friday"),
            ExpirationKind::HolidayAdjusted => f.write_str("Thu - Holiday Adj."),
            ExpirationKind::NonStandard(day) => write!(f, "{}", day),
        }
    }
}

/// An expiration present in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpirationInfo {
    pub date: NaiveDate,
    pub kind: ExpirationKind,
}

/// Sorted, distinct expirations with their classification
pub fn classify_expirations(dates: impl IntoIterator<Item = NaiveDate>) -> Vec<ExpirationInfo> {
    let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
    dates.sort();
    dates.dedup();
    dates
        .into_iter()
        .map(|date| ExpirationInfo {
            date,
            kind: ExpirationKind::classify(date),
        })
        .collect()
}

/// User-facing notice when any expiration falls off a Friday
pub fn expiration_notice(expirations: &[ExpirationInfo]) -> Option<String> {
    let non_standard = expirations.iter().filter(|e| !e.kind.is_standard()).count();
    if non_standard == 0 {
        return None;
    }

    let thursdays = expirations
        .iter()
        .filter(|e| e.kind == ExpirationKind::HolidayAdjusted)
        .count();

    let text = if thursdays == non_standard {
        "Options expire on Thursdays due to market holiday adjustments.".to_string()
    } else if thursdays > 0 {
        format!(
            "Some options expire on non-standard days ({} on Thursdays, likely due to holidays).",
            thursdays
        )
    } else {
        "Some options have non-standard expiration days (not Fridays).".to_string()
    };
    Some(text)
}
