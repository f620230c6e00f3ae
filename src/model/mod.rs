//! Price prediction model module
//!
//! A trained regressor is consumed through a single capability, `predict`.
//! Artifacts are loaded from JSON; linear and tree-ensemble formats are
//! supported.

mod artifact;
mod forest;
mod linear;

pub use artifact::{ArtifactModel, ModelArtifact};
pub use forest::{ForestModel, RegressionTree};
pub use linear::LinearModel;

use crate::features::FeatureVector;

/// Trait for trained next-day price regressors
pub trait PriceModel: Send + Sync {
    /// Predict one price per input row
    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>>;
}

impl<M: PriceModel + ?Sized> PriceModel for std::sync::Arc<M> {
    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
        (**self).predict(rows)
    }
}

impl<M: PriceModel + ?Sized> PriceModel for Box<M> {
    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
        (**self).predict(rows)
    }
}
