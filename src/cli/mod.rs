//! CLI interface for options-scout
//!
//! Provides subcommands for:
//! - `analyze`: Analyze a ticker's option chains
//! - `config`: Show the effective configuration

mod analyze;

pub use analyze::{AnalyzeArgs, OutputFormat};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "options-scout")]
#[command(about = "Options chain analytics: Greeks, scoring and contract selection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a ticker's option chains
    Analyze(AnalyzeArgs),
    /// Show the effective configuration
    Config,
}
