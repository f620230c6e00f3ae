//! CoinGecko client for spot quotes and daily history
//!
//! Spot prices come from `/simple/price`, daily closes from
//! `/coins/{id}/market_chart`. Each call is a single attempt.

use super::{Asset, HistorySource, PricePoint, PriceQuote, PriceSeries, QuoteSource};
use crate::config::{SourcesConfig, COINGECKO_API_URL};
use crate::error::{PipelineError, Result};
use crate::http::{build_client, fetch_json};
use crate::telemetry::LatencyMetric;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const SOURCE: &str = "coingecko";

/// Configuration for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&SourcesConfig> for CoinGeckoConfig {
    fn from(sources: &SourcesConfig) -> Self {
        Self {
            base_url: sources.coingecko_url.trim_end_matches('/').to_string(),
            timeout: sources.timeout(),
        }
    }
}

/// Client for CoinGecko's public API
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    client: Client,
}

impl CoinGeckoClient {
    /// Create a client with default configuration
    pub fn new() -> reqwest::Result<Self> {
        Self::with_config(CoinGeckoConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: CoinGeckoConfig) -> reqwest::Result<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl QuoteSource for CoinGeckoClient {
    async fn quotes(&self, assets: &[Asset]) -> Result<Vec<PriceQuote>> {
        let url = format!("{}/simple/price", self.config.base_url);
        let ids = assets
            .iter()
            .map(|a| a.coingecko_id())
            .collect::<Vec<_>>()
            .join(",");

        tracing::debug!(url = %url, ids = %ids, "Fetching spot prices");

        let request = self
            .client
            .get(&url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")]);
        let body: SimplePriceResponse =
            fetch_json(request, SOURCE, LatencyMetric::SpotQuotes).await?;

        let timestamp = Utc::now();
        assets
            .iter()
            .map(|&asset| quote_from_response(&body, asset, timestamp))
            .collect()
    }
}

#[async_trait]
impl HistorySource for CoinGeckoClient {
    async fn history(&self, asset: Asset, window_days: u32) -> Result<PriceSeries> {
        if window_days == 0 {
            return Err(PipelineError::InvalidInput(
                "history window must be at least one day".to_string(),
            ));
        }

        let url = format!(
            "{}/coins/{}/market_chart",
            self.config.base_url,
            asset.coingecko_id()
        );

        tracing::debug!(url = %url, %asset, window_days, "Fetching daily history");

        let days = window_days.to_string();
        let request = self.client.get(&url).query(&[
            ("vs_currency", "usd"),
            ("days", days.as_str()),
            ("interval", "daily"),
        ]);
        let body: MarketChartResponse =
            fetch_json(request, SOURCE, LatencyMetric::PriceHistory).await?;

        series_from_chart(asset, body)
    }
}

/// `/simple/price` body: `{"bitcoin": {"usd": 60000.0}, ...}`
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct SimplePriceResponse {
    prices: HashMap<String, SimplePrice>,
}

#[derive(Debug, Deserialize)]
struct SimplePrice {
    usd: Option<Decimal>,
}

/// `/market_chart` body; only `prices` is required
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[timestamp_ms, price]` pairs
    prices: Vec<(f64, Decimal)>,
}

fn quote_from_response(
    body: &SimplePriceResponse,
    asset: Asset,
    timestamp: DateTime<Utc>,
) -> Result<PriceQuote> {
    let value = body
        .prices
        .get(asset.coingecko_id())
        .and_then(|p| p.usd)
        .ok_or_else(|| {
            PipelineError::unavailable(
                SOURCE,
                format!("no usd price for {}", asset.coingecko_id()),
            )
        })?;

    if value <= Decimal::ZERO {
        return Err(PipelineError::unavailable(
            SOURCE,
            format!("non-positive price {value} for {asset}"),
        ));
    }

    Ok(PriceQuote {
        asset,
        value,
        timestamp,
    })
}

fn series_from_chart(asset: Asset, body: MarketChartResponse) -> Result<PriceSeries> {
    if body.prices.is_empty() {
        return Err(PipelineError::unavailable(
            SOURCE,
            format!("empty price history for {asset}"),
        ));
    }

    let mut points = Vec::with_capacity(body.prices.len());
    for (ts_ms, close) in body.prices {
        let date = DateTime::from_timestamp_millis(ts_ms as i64)
            .ok_or_else(|| PipelineError::unavailable(SOURCE, format!("bad timestamp {ts_ms}")))?
            .date_naive();
        if close <= Decimal::ZERO {
            return Err(PipelineError::unavailable(
                SOURCE,
                format!("non-positive close {close} for {asset} on {date}"),
            ));
        }
        points.push(PricePoint { date, close });
    }

    Ok(PriceSeries::from_points(asset, points))
}
