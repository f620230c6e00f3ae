//! Relative Strength Index
//!
//! RSI = 100 - 100 / (1 + RS), RS = smoothed gain / smoothed loss, using
//! Wilder smoothing (alpha = 1/window). The first point contributes a zero
//! gain and loss, so both averages start at 0. A point is defined once it
//! has `window` closes behind it (itself included); earlier points resolve
//! to 0.

use serde::{Deserialize, Serialize};

/// Default look-back window
pub const DEFAULT_RSI_WINDOW: usize = 14;

/// RSI reading in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RsiValue(f64);

impl RsiValue {
    /// Value reported when history is insufficient
    pub const UNDEFINED: RsiValue = RsiValue(0.0);

    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Wilder-smoothed RSI calculator
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    window: usize,
}

impl Rsi {
    /// Create a calculator; a zero window is treated as 1
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// RSI for every point of an ascending close series
    pub fn series(&self, closes: &[f64]) -> Vec<RsiValue> {
        let mut out = vec![RsiValue::UNDEFINED; closes.len()];
        if closes.len() < 2 {
            return out;
        }

        let alpha = 1.0 / self.window as f64;
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;

        for i in 0..closes.len() {
            if i > 0 {
                let change = closes[i] - closes[i - 1];
                avg_gain = (1.0 - alpha) * avg_gain + alpha * change.max(0.0);
                avg_loss = (1.0 - alpha) * avg_loss + alpha * (-change).max(0.0);
            }

            if i + 1 < self.window {
                continue;
            }

            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - 100.0 / (1.0 + rs)
            };
            out[i] = RsiValue::new(rsi);
        }

        out
    }

    /// RSI at the most recent point
    pub fn latest(&self, closes: &[f64]) -> RsiValue {
        self.series(closes)
            .last()
            .copied()
            .unwrap_or(RsiValue::UNDEFINED)
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_WINDOW)
    }
}
