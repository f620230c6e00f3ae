//! Pipeline error taxonomy

use thiserror::Error;

/// Failures that halt a forecast run
///
/// Empty news and short price history are not errors: they resolve to a
/// neutral sentiment and an RSI of zero respectively.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An external fetch failed or returned an unexpected shape
    #[error("{source_name} data unavailable: {reason}")]
    DataUnavailable {
        source_name: &'static str,
        reason: String,
    },
    /// The model artifact could not be loaded or invoked
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    /// A required credential is missing from the environment
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),
    /// A caller precondition was violated
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PipelineError {
    /// Shorthand for a `DataUnavailable` error
    pub fn unavailable(source_name: &'static str, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_name,
            reason: reason.into(),
        }
    }

    /// Stable label used for metrics and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "data_unavailable",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::MissingCredential(_) => "missing_credential",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
