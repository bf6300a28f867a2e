use clap::Parser;
use options_scout::cli::{Cli, Commands};
use options_scout::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::bundled()?
        }
    };

    // Initialize telemetry
    options_scout::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Analyze(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", config.to_toml()?);
            let key_state = if std::env::var(&config.source.api_key_env).is_ok() {
                "set"
            } else {
                "not set"
            };
            println!("\n# {} is {}", config.source.api_key_env, key_state);
        }
    }

    Ok(())
}
