//! Market data module
//!
//! Current spot quotes and daily closing-price history for BTC and gold

mod coingecko;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tracked instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    /// Bitcoin
    Btc,
    /// Gold, tracked through the PAX Gold token
    Gold,
}

impl Asset {
    /// Identifier used by the price source
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::Btc => "bitcoin",
            Asset::Gold => "pax-gold",
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin",
            Asset::Gold => "Gold (PAX Gold)",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Btc => write!(f, "BTC"),
            Asset::Gold => write!(f, "GOLD"),
        }
    }
}

/// A current spot price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub asset: Asset,
    /// Price in USD, always positive
    pub value: Decimal,
    /// When the quote was fetched
    pub timestamp: DateTime<Utc>,
}

/// A single daily close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Daily closing prices for one asset, ascending by date with unique dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    asset: Asset,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered observations
    ///
    /// Points are sorted by date; when a date repeats the last observation
    /// in input order wins.
    pub fn from_points(asset: Asset, points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut by_date = BTreeMap::new();
        for point in points {
            by_date.insert(point.date, point.close);
        }
        let points = by_date
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect();
        Self { asset, points }
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices as floats, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| f64::try_from(p.close).unwrap_or(0.0))
            .collect()
    }
}

/// Source of current spot prices
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch one quote per requested asset, in request order
    async fn quotes(&self, assets: &[Asset]) -> Result<Vec<PriceQuote>>;
}

/// Source of daily closing-price history
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch `window_days` of daily closes for an asset
    async fn history(&self, asset: Asset, window_days: u32) -> Result<PriceSeries>;
}
