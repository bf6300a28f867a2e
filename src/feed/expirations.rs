//! Expiration date helpers used by the fetch fallbacks

use chrono::{Datelike, Days, NaiveDate};

/// The next `count` Fridays after `today`.
///
/// When `today` is itself a Friday the sequence starts one week out.
/// Dates are always distinct, so a Friday `today` never yields next week twice.
pub fn next_fridays(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let weekday = today.weekday().num_days_from_monday();
    let ahead = match (4 + 7 - weekday) % 7 {
        0 => 7,
        n => n,
    };

    (0..count as u64)
        .filter_map(|week| today.checked_add_days(Days::new(u64::from(ahead) + week * 7)))
        .collect()
}

/// Expiration encoded in an OCC option symbol (`ROOT YYMMDD C|P STRIKE8`)
pub fn parse_occ_expiration(symbol: &str) -> Option<NaiveDate> {
    const TAIL: usize = 15;

    let symbol = symbol.trim();
    if symbol.len() <= TAIL || !symbol.is_ascii() {
        return None;
    }
    let tail = &symbol.as_bytes()[symbol.len() - TAIL..];
    let (date, rest) = tail.split_at(6);
    let (side, strike) = rest.split_at(1);

    if !matches!(side[0], b'C' | b'P')
        || !date.iter().all(u8::is_ascii_digit)
        || !strike.iter().all(u8::is_ascii_digit)
    {
        return None;
    }

    let field = |i: usize| u32::from(date[i] - b'0') * 10 + u32::from(date[i + 1] - b'0');
    NaiveDate::from_ymd_opt(2000 + field(0) as i32, field(2), field(4))
}
