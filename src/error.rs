//! Error taxonomy for the pricing pipeline and its front-ends.
//!
//! Every failure is surfaced synchronously to the caller; nothing is retried
//! or swallowed. Exit codes group failures for scripting:
//!
//! - 2: configuration / artifact problems
//! - 3: input data problems
//! - 4: internal / inference problems

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    /// A numeric field violated its domain constraint (e.g. non-positive weight).
    #[error("Invalid input: {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    /// A categorical value is outside the trained vocabulary.
    #[error("Unknown {field} category: '{value}'")]
    UnknownCategory { field: &'static str, value: String },

    /// A fitted artifact could not be located or deserialized.
    #[error("Failed to load artifact '{}': {message}", path.display())]
    ArtifactLoad { path: PathBuf, message: String },

    /// The model evaluation failed or produced an unusable value.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Anything else that prevents a run (I/O on exports, terminal setup, ...).
    #[error("{0}")]
    App(String),
}

impl PricingError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn unknown_category(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            field,
            value: value.into(),
        }
    }

    pub fn artifact_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Process exit code for the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            PricingError::ArtifactLoad { .. } => 2,
            PricingError::InvalidInput { .. } | PricingError::UnknownCategory { .. } => 3,
            PricingError::Inference(_) | PricingError::App(_) => 4,
        }
    }
}
