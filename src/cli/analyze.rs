//! Analyze command implementation

use crate::analysis::{AnalysisReport, AnalysisRequest, Analyzer};
use crate::chain::OptionType;
use crate::config::Config;
use crate::feed::{SnapshotSource, Ticker, TradierClient};
use crate::ranking::{ChainFilter, MarketOutlook, SortKey};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Stock ticker (1-5 letters)
    pub ticker: String,

    /// Market outlook: bullish, bearish or neutral
    #[arg(long)]
    pub outlook: Option<String>,

    /// Only show this expiration (YYYY-MM-DD)
    #[arg(long)]
    pub expiration: Option<NaiveDate>,

    /// Only show calls or puts
    #[arg(long = "type")]
    pub option_type: Option<OptionType>,

    /// Chain sort key
    #[arg(long)]
    pub sort: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Analyze a saved JSON snapshot instead of calling Tradier
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Build the per-run request, falling back to configured defaults
    pub fn request(&self, config: &Config) -> AnalysisRequest {
        let outlook = match &self.outlook {
            Some(s) => s.parse::<MarketOutlook>().unwrap_or_default(),
            None => config.analysis.outlook(),
        };

        let sort = match &self.sort {
            Some(s) => {
                let key = SortKey::parse(s);
                if key.is_none() {
                    tracing::warn!(sort = %s, "Unknown sort key, keeping provider order");
                }
                key
            }
            None => config.analysis.sort_key(),
        };

        AnalysisRequest {
            outlook,
            filter: ChainFilter {
                expiration: self.expiration,
                option_type: self.option_type,
                sort,
            },
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let ticker = Ticker::parse(&self.ticker)?;
        let request = self.request(config);
        let rate = config.analysis.risk_free_rate;

        let report: AnalysisReport = match &self.snapshot {
            Some(path) => {
                tracing::info!(ticker = %ticker, path = %path.display(), "Analyzing snapshot");
                let source = SnapshotSource::load(path)?;
                Analyzer::new(source, rate).analyze(&ticker, &request).await?
            }
            None => {
                tracing::info!(ticker = %ticker, "Fetching chains from Tradier");
                let client = TradierClient::with_config(config.source.tradier()?)?;
                Analyzer::new(client, rate).analyze(&ticker, &request).await?
            }
        };

        match self.format {
            OutputFormat::Table => println!("{}", report.format_table()),
            OutputFormat::Json => println!("{}", report.to_json()?),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> AnalyzeArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Analyze(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_analyze_args() {
        let args = parse(&[
            "options-scout",
            "analyze",
            "aapl",
            "--outlook",
            "bearish",
            "--type",
            "put",
            "--expiration",
            "2026-11-20",
            "--sort",
            "theta",
            "--format",
            "json",
        ]);
        assert_eq!(args.ticker, "aapl");
        assert_eq!(args.option_type, Some(OptionType::Put));
        assert_eq!(args.expiration, NaiveDate::from_ymd_opt(2026, 11, 20));
        assert_eq!(args.format, OutputFormat::Json);

        let request = args.request(&Config::default());
        assert_eq!(request.outlook, MarketOutlook::Bearish);
        assert_eq!(request.filter.sort, Some(SortKey::Theta));
    }

    #[test]
    fn test_request_falls_back_to_config() {
        let args = parse(&["options-scout", "analyze", "MSFT"]);
        let mut config = Config::default();
        config.analysis.outlook = "bullish".to_string();
        config.analysis.sort = "gamma".to_string();

        let request = args.request(&config);
        assert_eq!(request.outlook, MarketOutlook::Bullish);
        assert_eq!(request.filter.sort, Some(SortKey::Gamma));
        assert_eq!(request.filter.option_type, None);
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn test_unknown_sort_keeps_order() {
        let args = parse(&["options-scout", "analyze", "MSFT", "--sort", "rho"]);
        assert_eq!(args.request(&Config::default()).filter.sort, None);
    }

    #[test]
    fn test_invalid_option_type_rejected() {
        let result = Cli::try_parse_from(["options-scout", "analyze", "MSFT", "--type", "warrant"]);
        assert!(result.is_err());
    }
}
