//! Configuration types for options-scout

use crate::feed::{FeedError, TradierConfig, TRADIER_API_URL};
use crate::model::DEFAULT_RISK_FREE_RATE;
use crate::ranking::{MarketOutlook, SortKey};
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bundled example configuration, used when no file is present
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config.toml.example");

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Market data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API token
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Expirations fetched per analysis
    #[serde(default = "default_max_expirations")]
    pub max_expirations: usize,
}

fn default_base_url() -> String {
    TRADIER_API_URL.to_string()
}
fn default_api_key_env() -> String {
    "TRADIER_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_expirations() -> usize {
    5
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_expirations: default_max_expirations(),
        }
    }
}

impl SourceConfig {
    /// Tradier client settings; reads the API key from the environment
    pub fn tradier(&self) -> Result<TradierConfig, FeedError> {
        TradierConfig {
            base_url: self.base_url.clone(),
            api_key: String::new(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_expirations: self.max_expirations,
        }
        .api_key_from_env(&self.api_key_env)
    }
}

/// Analysis defaults, overridable per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Annualised rate used by the Greeks estimator
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// bullish, bearish or neutral; anything else reads as neutral
    #[serde(default = "default_outlook")]
    pub outlook: String,

    /// Chain sort key; unknown keys keep provider order
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}
fn default_outlook() -> String {
    MarketOutlook::Neutral.as_str().to_string()
}
fn default_sort() -> String {
    SortKey::Volume.as_str().to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            outlook: default_outlook(),
            sort: default_sort(),
        }
    }
}

impl AnalysisConfig {
    pub fn outlook(&self) -> MarketOutlook {
        self.outlook.parse().unwrap_or_default()
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        SortKey::parse(&self.sort)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus scrape port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// The bundled example configuration
    pub fn bundled() -> anyhow::Result<Self> {
        Ok(toml::from_str(DEFAULT_CONFIG_TOML)?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
