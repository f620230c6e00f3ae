//! Predict command implementation

use crate::config::Config;
use crate::dashboard::{render_text, Dashboard};
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable dashboard
    Text,
    /// Dashboard view model as JSON
    Json,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl PredictArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let pipeline = super::build_pipeline(config)?;
        let run = pipeline.run().await?;
        let dashboard = Dashboard::from_run(&run);

        match self.format {
            OutputFormat::Text => print!("{}", render_text(&dashboard)),
            OutputFormat::Json => println!("{}", dashboard.to_json()?),
        }
        Ok(())
    }
}
