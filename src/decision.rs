//! Prediction and recommendation decision
//!
//! Runs the model once, converts the predicted price into a percentage
//! change against the current price and classifies it with fixed ±2%
//! thresholds (exclusive on both sides).

use crate::error::{PipelineError, Result};
use crate::features::FeatureVector;
use crate::model::PriceModel;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicted rise above which the recommendation is Buy (percent)
pub const BUY_THRESHOLD_PCT: Decimal = dec!(2);

/// Predicted fall below which the recommendation is Sell (percent)
pub const SELL_THRESHOLD_PCT: Decimal = dec!(-2);

/// Trading recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    /// Classify a predicted percentage change
    pub fn from_percent_change(percent_change: Decimal) -> Self {
        if percent_change > BUY_THRESHOLD_PCT {
            Recommendation::Buy
        } else if percent_change < SELL_THRESHOLD_PCT {
            Recommendation::Sell
        } else {
            Recommendation::Hold
        }
    }

    /// Why this recommendation was made
    pub fn rationale(&self) -> &'static str {
        match self {
            Recommendation::Buy => "predicted rise above 2%",
            Recommendation::Hold => "predicted change within ±2%",
            Recommendation::Sell => "predicted fall below -2%",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "BUY"),
            Recommendation::Hold => write!(f, "HOLD"),
            Recommendation::Sell => write!(f, "SELL"),
        }
    }
}

/// Outcome of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Tomorrow's predicted BTC price in USD
    pub predicted_price: Decimal,
    /// (predicted - current) / current * 100
    pub percent_change: Decimal,
    pub recommendation: Recommendation,
}

/// Percentage change from `current` to `predicted`
pub fn percent_change(predicted: Decimal, current: Decimal) -> Result<Decimal> {
    if current <= Decimal::ZERO {
        return Err(PipelineError::InvalidInput(format!(
            "current price must be positive, got {current}"
        )));
    }
    Ok((predicted - current) / current * dec!(100))
}

/// Run the model once and classify the result
pub fn decide<M: PriceModel + ?Sized>(
    model: &M,
    features: &FeatureVector,
    current_price: Decimal,
) -> Result<PredictionResult> {
    let outputs = model
        .predict(std::slice::from_ref(features))
        .map_err(|e| PipelineError::ModelUnavailable(format!("inference failed: {e:#}")))?;

    let raw = match outputs.as_slice() {
        [value] => *value,
        other => {
            return Err(PipelineError::ModelUnavailable(format!(
                "expected 1 prediction, got {}",
                other.len()
            )))
        }
    };

    if !raw.is_finite() || raw <= 0.0 {
        return Err(PipelineError::ModelUnavailable(format!(
            "model produced an unusable price: {raw}"
        )));
    }

    let predicted_price = Decimal::try_from(raw).map_err(|e| {
        PipelineError::ModelUnavailable(format!("prediction {raw} out of range: {e}"))
    })?;
    let percent_change = percent_change(predicted_price, current_price)?;
    let recommendation = Recommendation::from_percent_change(percent_change);

    tracing::debug!(
        %predicted_price,
        %percent_change,
        %recommendation,
        "Prediction classified"
    );

    Ok(PredictionResult {
        predicted_price,
        percent_change,
        recommendation,
    })
}
