//! Linear regression model

use super::PriceModel;
use crate::features::{FeatureVector, NUM_FEATURES};
use serde::{Deserialize, Serialize};

/// `y = intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: [f64; NUM_FEATURES],
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: [f64; NUM_FEATURES]) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    fn predict_one(&self, row: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(row.as_array())
            .fold(self.intercept, |acc, (w, x)| acc + w * x)
    }
}

impl PriceModel for LinearModel {
    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
        Ok(rows.iter().map(|row| self.predict_one(row)).collect())
    }
}
