//! Model input assembly
//!
//! The model consumes features positionally, so the order below must match
//! the order the artifact was trained with.

use crate::indicator::RsiValue;
use crate::market::PriceQuote;
use crate::sentiment::SentimentScore;
use serde::{Deserialize, Serialize};

/// Number of model inputs
pub const NUM_FEATURES: usize = 4;

/// Feature names in model order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = ["sentiment", "btc_price", "gold_price", "rsi"];

/// Fixed-order model input: (sentiment, btc_price, gold_price, rsi)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    /// Assemble from validated pipeline values
    pub fn assemble(
        sentiment: SentimentScore,
        btc: &PriceQuote,
        gold: &PriceQuote,
        rsi: RsiValue,
    ) -> Self {
        Self([
            sentiment.value(),
            f64::try_from(btc.value).unwrap_or(0.0),
            f64::try_from(gold.value).unwrap_or(0.0),
            rsi.value(),
        ])
    }

    /// Build directly from raw values in model order
    pub fn from_array(values: [f64; NUM_FEATURES]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; NUM_FEATURES] {
        &self.0
    }

    pub fn sentiment(&self) -> f64 {
        self.0[0]
    }

    pub fn btc_price(&self) -> f64 {
        self.0[1]
    }

    pub fn gold_price(&self) -> f64 {
        self.0[2]
    }

    pub fn rsi(&self) -> f64 {
        self.0[3]
    }
}
