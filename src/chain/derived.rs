//! Per-contract metric derivation
//!
//! Pure functions over raw contract fields. Missing or zero inputs produce a
//! neutral zero instead of an error so illiquid contracts never abort a batch.

use super::OptionType;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Calendar days until expiry, rounded up.
///
/// The expiration date is taken as midnight UTC. Negative for contracts the
/// provider still returns after expiry.
pub fn days_to_expiry(expiration: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expiry = expiration.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (expiry - now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}

/// Signed distance of strike from spot, positive when in the money
pub fn moneyness(strike: Decimal, spot: Decimal, option_type: OptionType) -> f64 {
    if spot.is_zero() {
        return 0.0;
    }
    let distance = match option_type {
        OptionType::Call => spot.checked_sub(strike),
        OptionType::Put => strike.checked_sub(spot),
    };
    distance
        .and_then(|d| d.checked_div(spot))
        .and_then(|ratio| f64::try_from(ratio).ok())
        .unwrap_or(0.0)
}

/// Payoff if exercised now
pub fn intrinsic_value(strike: Decimal, spot: Decimal, option_type: OptionType) -> Decimal {
    if spot.is_zero() {
        return Decimal::ZERO;
    }
    let payoff = match option_type {
        OptionType::Call => spot.checked_sub(strike),
        OptionType::Put => strike.checked_sub(spot),
    };
    payoff.unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
}

/// Price in excess of intrinsic value, never negative
pub fn time_value(
    price: Option<Decimal>,
    strike: Decimal,
    spot: Decimal,
    option_type: OptionType,
) -> Decimal {
    let price = match price {
        Some(p) if !p.is_zero() => p,
        _ => return Decimal::ZERO,
    };
    if spot.is_zero() {
        return Decimal::ZERO;
    }
    price
        .checked_sub(intrinsic_value(strike, spot, option_type))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

/// Underlying price at which a long position breaks even at expiry
pub fn break_even(strike: Decimal, price: Option<Decimal>, option_type: OptionType) -> Decimal {
    let price = match price {
        Some(p) if !p.is_zero() => p,
        _ => return Decimal::ZERO,
    };
    match option_type {
        OptionType::Call => strike.checked_add(price),
        OptionType::Put => strike.checked_sub(price),
    }
    .unwrap_or(Decimal::ZERO)
}
