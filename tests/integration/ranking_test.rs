//! Integration tests for the analytics core

use chrono::{NaiveDate, TimeZone, Utc};
use options_scout::chain::{EnrichedContract, Enricher, OptionType, ProviderGreeks, Quote, RawContract};
use options_scout::model::{BlackScholesModel, GreeksSource};
use options_scout::ranking::{
    filter_and_sort, score, select_optimal, ChainFilter, MarketOutlook, SortKey,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 20).unwrap()
}

fn enrich(raws: &[RawContract]) -> Vec<EnrichedContract> {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 14, 0, 0).unwrap();
    let quote = Quote::new("ACME").with_last(dec!(100));
    Enricher::default().enrich_all(raws, &quote, now).contracts
}

#[test]
fn test_reference_call_delta() {
    let greeks = BlackScholesModel::new(0.05).greeks_at(100.0, 100.0, 0.25, 0.20, OptionType::Call);
    assert!((greeks.delta - 0.5694601832).abs() < 1e-6);
    assert_eq!(greeks.source, GreeksSource::Estimated);
}

#[test]
fn test_in_the_money_call_metrics() {
    let raw = RawContract::new("ACME261120C00095000", dec!(95), OptionType::Call, expiry())
        .with_prices(dec!(6.9), dec!(7.1), dec!(7));
    let c = &enrich(&[raw])[0];

    assert_eq!(c.intrinsic_value(), dec!(5));
    assert_eq!(c.time_value(), dec!(2));
    assert_eq!(c.break_even(), dec!(102));
    assert!((c.moneyness() - 0.05).abs() < 1e-12);
}

#[test]
fn test_dead_chain_selects_nothing() {
    let raws: Vec<RawContract> = [dec!(90), dec!(100), dec!(110)]
        .into_iter()
        .map(|strike| {
            let mut raw = RawContract::new("ACME", strike, OptionType::Call, expiry())
                .with_activity(0, 0);
            raw.bid = Some(Decimal::ZERO);
            raw
        })
        .collect();
    let contracts = enrich(&raws);
    assert_eq!(contracts.len(), 3);

    for outlook in [MarketOutlook::Bullish, MarketOutlook::Bearish, MarketOutlook::Neutral] {
        assert!(select_optimal(&contracts, dec!(100), outlook).is_empty());
    }
}

#[test]
fn test_theta_order_and_score_stability() {
    let with_theta = |symbol: &str, theta: f64| {
        RawContract::new(symbol, dec!(100), OptionType::Put, expiry())
            .with_prices(dec!(2), dec!(2.2), dec!(2.1))
            .with_greeks(ProviderGreeks {
                delta: Some(-0.45),
                theta: Some(theta),
                ..Default::default()
            })
    };
    let contracts = enrich(&[with_theta("FAST", -0.10), with_theta("SLOW", -0.02)]);

    let filter = ChainFilter::default().sort(Some(SortKey::Theta));
    let rows = filter_and_sort(&contracts, dec!(100), MarketOutlook::Bearish, &filter);
    let order: Vec<&str> = rows.iter().map(|r| r.contract.symbol()).collect();
    assert_eq!(order, vec!["SLOW", "FAST"]);

    let snapshot = contracts.clone();
    let first = score(&contracts[0], dec!(100), MarketOutlook::Bearish);
    let _ = score(&contracts[0], dec!(100), MarketOutlook::Bullish);
    assert_eq!(score(&contracts[0], dec!(100), MarketOutlook::Bearish), first);
    assert_eq!(contracts, snapshot);
}
