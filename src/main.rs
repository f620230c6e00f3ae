use btc_forecast::cli::{Cli, Commands};
use btc_forecast::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using bundled default configuration");
            let config: Config = toml::from_str(include_str!("../config.toml.example"))?;
            config.validate()?;
            config
        }
    };

    // Initialize telemetry
    let _telemetry = btc_forecast::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Predict(args) => {
            tracing::info!("Running forecast");
            args.execute(&config).await?;
        }
        Commands::Serve(args) => {
            tracing::info!("Starting dashboard server");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
