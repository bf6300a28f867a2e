//! End-to-end integration tests

use options_scout::analysis::{AnalysisError, AnalysisRequest, Analyzer, ExpirationKind};
use options_scout::chain::OptionType;
use options_scout::config::Config;
use options_scout::feed::{SnapshotSource, Ticker};
use options_scout::model::GreeksSource;
use options_scout::ranking::{ChainFilter, MarketOutlook, SelectionReason, SortKey};
use std::collections::HashSet;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/acme_chain.json");

fn analyzer() -> Analyzer<SnapshotSource> {
    let config = Config::bundled().unwrap();
    Analyzer::new(
        SnapshotSource::load(FIXTURE).unwrap(),
        config.analysis.risk_free_rate,
    )
}

fn acme() -> Ticker {
    Ticker::parse("ACME").unwrap()
}

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();
    assert_eq!(config.source.api_key_env, "TRADIER_API_KEY");
    assert_eq!(config.analysis.sort_key(), Some(SortKey::Volume));
}

#[tokio::test]
async fn test_full_report_from_snapshot() {
    let report = analyzer()
        .analyze(&acme(), &AnalysisRequest::default())
        .await
        .unwrap();

    assert_eq!(report.contract_count, 6);
    let rejected: Vec<&str> = report.rejected.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(rejected, vec!["ACME-BAD", "ACME991120C_NOSTRIKE"]);

    let leaders: Vec<&str> = report.volume_leaders.iter().map(|c| c.symbol()).collect();
    assert_eq!(
        leaders,
        vec![
            "ACME991120C00100000",
            "ACME991120C00095000",
            "ACME991120P00095000",
            "ACME991119C00110000",
            "ACME991119P00090000",
        ]
    );

    assert_eq!(report.expirations.len(), 2);
    assert_eq!(report.expirations[0].kind, ExpirationKind::HolidayAdjusted);
    assert_eq!(report.expirations[1].kind, ExpirationKind::Standard);
    assert_eq!(
        report.expiration_notice.as_deref(),
        Some("Options expire on Thursdays due to market holiday adjustments.")
    );
}

#[tokio::test]
async fn test_recommendations_are_bounded_and_unique() {
    let report = analyzer()
        .analyze(&acme(), &AnalysisRequest::default())
        .await
        .unwrap();
    let recs = &report.recommendations;

    assert!(!recs.is_empty() && recs.len() <= 4);
    assert_eq!(recs[0].contract.symbol(), "ACME991120C00100000");
    assert_eq!(recs[0].reason, SelectionReason::HighestVolume { rank: 1 });
    assert_eq!(recs[1].contract.symbol(), "ACME991120C00095000");
    assert_eq!(recs[1].reason, SelectionReason::HighestVolume { rank: 2 });

    let symbols: HashSet<&str> = recs.iter().map(|r| r.contract.symbol()).collect();
    assert_eq!(symbols.len(), recs.len());
    assert!(recs.iter().all(|r| r.contract.volume() > 0));
    assert!(recs.iter().all(|r| r.greeks_score >= 0.0));
}

#[tokio::test]
async fn test_greeks_sources_are_exclusive() {
    let report = analyzer()
        .analyze(&acme(), &AnalysisRequest::default())
        .await
        .unwrap();

    for entry in &report.chain {
        let greeks = entry.contract.greeks();
        match greeks.source {
            GreeksSource::Provider => assert!(greeks.rho.is_some()),
            _ => {
                assert!(greeks.rho.is_none());
                assert!(greeks.updated_at.is_none());
            }
        }
    }

    let provided = report
        .chain
        .iter()
        .find(|e| e.contract.symbol() == "ACME991120C00095000")
        .unwrap();
    assert_eq!(provided.contract.greeks().source, GreeksSource::Provider);
    assert_eq!(provided.contract.greeks().implied_vol, 0.25);
}

#[tokio::test]
async fn test_filtered_chain_view() {
    let request = AnalysisRequest {
        outlook: MarketOutlook::Bearish,
        filter: ChainFilter::default()
            .option_type(OptionType::Put)
            .sort(Some(SortKey::Volume)),
    };
    let report = analyzer().analyze(&acme(), &request).await.unwrap();

    let symbols: Vec<&str> = report.chain.iter().map(|e| e.contract.symbol()).collect();
    assert_eq!(
        symbols,
        vec![
            "ACME991120P00095000",
            "ACME991119P00090000",
            "ACME991120P00105000",
        ]
    );
    assert!(report.chain.iter().all(|e| e.greeks_score.is_none()));
}

#[tokio::test]
async fn test_json_report_shape() {
    let request = AnalysisRequest {
        outlook: MarketOutlook::Bullish,
        filter: ChainFilter::default().sort(Some(SortKey::GreeksScore)),
    };
    let report = analyzer().analyze(&acme(), &request).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["ticker"], "ACME");
    assert_eq!(json["outlook"], "bullish");
    assert_eq!(json["recommendations"][0]["reason"], "Highest Volume (#1)");
    assert_eq!(json["rejected"][0]["symbol"], "ACME-BAD");
    let first_row = &json["chain"][0];
    assert!(first_row["symbol"].is_string());
    assert!(first_row["greeks_score"].is_number());
    assert!(first_row["days_to_expiry"].is_number());

    let table = report.format_table();
    assert!(table.contains("ACME OPTIONS ANALYSIS"));
    assert!(table.contains("Highest Volume (#1)"));
    assert!(table.contains("Thu - Holiday Adj."));
}

#[tokio::test]
async fn test_unknown_ticker_fails() {
    let ticker = Ticker::parse("NOPE").unwrap();
    let result = analyzer().analyze(&ticker, &AnalysisRequest::default()).await;
    assert!(matches!(result, Err(AnalysisError::Feed(_))));
}
