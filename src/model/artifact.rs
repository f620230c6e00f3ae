//! Model artifact loading

use super::{ForestModel, LinearModel, PriceModel};
use crate::error::PipelineError;
use crate::features::{FeatureVector, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A trained model as stored on disk
///
/// ```json
/// {"kind": "linear", "intercept": 0.0, "coefficients": [0.0, 1.0, 0.0, 0.0]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Training-time feature order, checked against ours when present
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub model: ArtifactModel,
}

/// Supported model families
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArtifactModel {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl ModelArtifact {
    /// Read and validate an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::ModelUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let artifact = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            kind = artifact.kind(),
            "Loaded model artifact"
        );
        Ok(artifact)
    }

    /// Parse and validate an artifact from JSON text
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| PipelineError::ModelUnavailable(format!("invalid artifact: {e}")))?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self.model {
            ArtifactModel::Linear(_) => "linear",
            ArtifactModel::Forest(_) => "forest",
        }
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if let Some(ref names) = self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(PipelineError::ModelUnavailable(format!(
                    "artifact feature order {names:?} does not match {FEATURE_NAMES:?}"
                )));
            }
        }

        // Forests validate while deserializing
        if let ArtifactModel::Linear(ref linear) = self.model {
            let finite =
                linear.intercept.is_finite() && linear.coefficients.iter().all(|c| c.is_finite());
            if !finite {
                return Err(PipelineError::ModelUnavailable(
                    "linear model has non-finite parameters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl PriceModel for ModelArtifact {
    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
        match self.model {
            ArtifactModel::Linear(ref m) => m.predict(rows),
            ArtifactModel::Forest(ref m) => m.predict(rows),
        }
    }
}
