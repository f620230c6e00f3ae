//! Configuration types for btc-forecast

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CoinGecko public API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// NewsAPI base URL
pub const NEWSAPI_URL: &str = "https://newsapi.org/v2";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Market data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Base URL for spot quotes and daily history
    #[serde(default = "default_coingecko_url")]
    pub coingecko_url: String,

    /// Lookback window for history and news (days)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_coingecko_url() -> String {
    COINGECKO_API_URL.to_string()
}
fn default_lookback_days() -> u32 {
    30
}
fn default_timeout_secs() -> u64 {
    10
}

impl SourcesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            coingecko_url: default_coingecko_url(),
            lookback_days: default_lookback_days(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// News source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_newsapi_url")]
    pub base_url: String,

    /// Search query sent to the news source
    #[serde(default = "default_query")]
    pub query: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Optional dotenv file loaded before the key is read
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

fn default_newsapi_url() -> String {
    NEWSAPI_URL.to_string()
}
fn default_query() -> String {
    "Bitcoin".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_api_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_newsapi_url(),
            query: default_query(),
            language: default_language(),
            api_key_env: default_api_key_env(),
            env_file: None,
        }
    }
}

/// Technical indicator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,
}

fn default_rsi_window() -> usize {
    14
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_window: default_rsi_window(),
        }
    }
}

/// Prediction model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the JSON model artifact
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model/bitcoin_price_model.json")
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Dashboard server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8501))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Prometheus exporter port, disabled when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.sources.lookback_days == 0 {
            return Err(PipelineError::InvalidInput(
                "sources.lookback_days must be greater than zero".to_string(),
            ));
        }
        if self.indicator.rsi_window == 0 {
            return Err(PipelineError::InvalidInput(
                "indicator.rsi_window must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Secrets resolved once at startup
#[derive(Clone)]
pub struct Credentials {
    pub news_api_key: String,
}

impl Credentials {
    /// Read the news API key, loading the configured dotenv file first
    pub fn from_env(news: &NewsConfig) -> Result<Self, PipelineError> {
        if let Some(ref file) = news.env_file {
            if let Err(e) = dotenvy::from_path(file) {
                tracing::warn!(path = %file.display(), error = %e, "Could not load env file");
            }
        } else {
            dotenvy::dotenv().ok();
        }

        match std::env::var(&news.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self { news_api_key: key }),
            _ => Err(PipelineError::MissingCredential(news.api_key_env.clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("news_api_key", &"<redacted>")
            .finish()
    }
}
