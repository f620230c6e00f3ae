//! CLI interface for btc-forecast
//!
//! Provides subcommands for:
//! - `predict`: Run the pipeline once and print the dashboard
//! - `serve`: Serve the dashboard over HTTP
//! - `config`: Show the effective configuration

mod predict;
mod serve;

pub use predict::{OutputFormat, PredictArgs};
pub use serve::ServeArgs;

use crate::config::{Config, Credentials};
use crate::model::ModelArtifact;
use crate::pipeline::Pipeline;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "btc-forecast")]
#[command(about = "Next-day Bitcoin price forecast from news sentiment, gold and RSI")]
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
    /// Run one forecast and print the dashboard
    Predict(PredictArgs),
    /// Serve the dashboard over HTTP
    Serve(ServeArgs),
    /// Show configuration
    Config,
}

/// Resolve credentials, load the model once and wire the live sources
pub fn build_pipeline(config: &Config) -> anyhow::Result<Arc<Pipeline>> {
    let credentials = Credentials::from_env(&config.news)?;
    let model = Arc::new(ModelArtifact::load(&config.model.path)?);
    let pipeline = Pipeline::from_config(config, &credentials, model)?;
    Ok(Arc::new(pipeline))
}
