//! Integration tests for chain data sources

use chrono::{Datelike, NaiveDate, Weekday};
use options_scout::chain::Quote;
use options_scout::feed::{
    next_fridays, parse_occ_expiration, ChainResponse, ChainSnapshot, ChainSource,
    ExpirationsResponse, FeedError, LookupResponse, QuotesResponse, SnapshotSource, Ticker,
    TickerError,
};
use std::io::Write;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_ticker_validation() {
    assert_eq!(Ticker::parse("tsla").unwrap().as_str(), "TSLA");
    assert_eq!(Ticker::parse(""), Err(TickerError::Empty));
    assert!(Ticker::parse("ABCDEF").is_err());
    assert!(Ticker::parse("A1").is_err());
}

#[test]
fn test_tradier_payloads_end_to_end() {
    let quote = serde_json::from_str::<QuotesResponse>(
        r#"{"quotes":{"quote":{"symbol":"ACME","last":101.25,"prevclose":100.0}}}"#,
    )
    .unwrap()
    .into_quote()
    .unwrap();
    assert_eq!(quote.spot().to_string(), "101.25");

    let dates = serde_json::from_str::<ExpirationsResponse>(
        r#"{"expirations":{"date":["2026-11-20","2026-11-27"]}}"#,
    )
    .unwrap()
    .into_dates();
    assert_eq!(dates.len(), 2);

    let chain = serde_json::from_str::<ChainResponse>(
        r#"{"options":{"option":[
            {"symbol":"ACME261120C00100000","strike":100,"option_type":"call","last":3.1,"greeks":null},
            {"symbol":"ACME261120P00100000","strike":100,"option_type":"put","last":2.4}
        ]}}"#,
    )
    .unwrap()
    .into_contracts(dates[0]);
    assert_eq!(chain.len(), 2);
    assert!(chain.iter().all(|c| c.expiration_date == dates[0]));
    assert!(chain[0].greeks.is_none());
}

#[test]
fn test_lookup_fallback_dates() {
    let response: LookupResponse = serde_json::from_str(
        r#"{"symbols":[{"rootSymbol":"ACME","options":[
            "ACME261218C00100000","ACME261120C00100000","ACME261218P00090000"]}]}"#,
    )
    .unwrap();
    assert_eq!(
        response.expirations(),
        vec![date(2026, 12, 18), date(2026, 11, 20)]
    );
    assert_eq!(
        parse_occ_expiration("ACME261218P00090000"),
        Some(date(2026, 12, 18))
    );
}

#[test]
fn test_friday_fallback() {
    let fridays = next_fridays(date(2026, 10, 22), 8);
    assert_eq!(fridays.len(), 8);
    assert_eq!(fridays[0], date(2026, 10, 23));
    assert!(fridays.windows(2).all(|w| (w[1] - w[0]).num_days() == 7));
    assert!(fridays.iter().all(|d| d.weekday() == Weekday::Fri));
}

#[tokio::test]
async fn test_snapshot_roundtrip_through_file() {
    let snapshot = ChainSnapshot {
        quote: Quote::new("ACME"),
        contracts: Vec::new(),
    };
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&snapshot).unwrap().as_bytes())
        .unwrap();

    let source = SnapshotSource::load(file.path()).unwrap();
    let ticker = Ticker::parse("ACME").unwrap();
    let quote = tokio_test::assert_ok!(source.fetch_quote(&ticker).await);
    assert_eq!(quote.spot(), rust_decimal::Decimal::ZERO);
    assert!(tokio_test::assert_ok!(source.fetch_chains(&ticker).await).is_empty());

    let other = Ticker::parse("ZZZ").unwrap();
    tokio_test::assert_err!(source.fetch_quote(&other).await);
}

#[test]
fn test_snapshot_load_errors() {
    assert!(matches!(
        SnapshotSource::load("/nonexistent/chain.json"),
        Err(FeedError::Io(_))
    ));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not json").unwrap();
    assert!(matches!(
        SnapshotSource::load(file.path()),
        Err(FeedError::Json(_))
    ));
}
