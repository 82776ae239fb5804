//! Pretrained population-impact model.
//!
//! The regressor is exported to ONNX and evaluated with ONNX Runtime (feature
//! `onnx`). The categorical label encoders and feature scaler it was trained
//! with are stored next to it as JSON.
//!
//! ```text
//! features -> [scaler?] -> RegressionModel::predict -> affected population
//!                 ^                 ^
//!        population_estimate_  population_estimate_
//!          scaler.json            model.onnx
//! ```
//!
//! [`RegressionModel`] is the seam: anything that maps a feature vector to a
//! scalar can stand in for the ONNX session.

mod artifacts;
#[cfg(feature = "onnx")]
mod onnx;
mod preprocessing;

pub use artifacts::{
    ModelArtifacts, ENCODERS_FILE, MODEL_FILE, MODEL_INFO_FILE, SCALER_FILE,
};
#[cfg(feature = "onnx")]
pub use onnx::OnnxRegressor;
pub use preprocessing::{LabelEncoder, LabelEncoders, StandardScaler};

use std::path::Path;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in ML operations
#[derive(Debug, Error)]
pub enum MlError {
    /// An artifact file could not be read or parsed
    #[error("Failed to load model artifact {path}: {message}")]
    ArtifactLoad {
        /// Artifact path
        path: String,
        /// What went wrong
        message: String,
    },

    /// An artifact parsed but is structurally invalid
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// Feature vector length does not match what the model expects
    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A categorical value the encoder was not fitted on
    #[error("Unseen label '{label}' for column {column}")]
    UnseenLabel {
        /// Encoder column
        column: String,
        /// Offending value
        label: String,
    },

    /// Inference produced no usable value
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Built without an inference backend
    #[error("No inference backend: {0}")]
    BackendUnavailable(String),
}

impl MlError {
    /// Artifact read failure at `path`
    pub fn artifact_load(path: &Path, message: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Result type for ML operations
pub type MlResult<T> = Result<T, MlError>;

/// Confidence label attached to a model's predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    /// Trained model on representative data
    #[default]
    High,
    /// Partially representative training data
    Medium,
    /// Experimental model
    Low,
}

impl std::fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfidenceLabel::High => "High",
            ConfidenceLabel::Medium => "Medium",
            ConfidenceLabel::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Descriptive metadata exported alongside the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    /// Short model identifier
    pub name: String,
    /// Confidence label reported with predictions
    pub confidence: ConfidenceLabel,
    /// Whether the model was trained on standardized features
    pub expects_scaled_features: bool,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            name: "gradient_boosting".to_string(),
            confidence: ConfidenceLabel::High,
            expects_scaled_features: false,
        }
    }
}

/// A regression model mapping a feature vector to a scalar prediction.
///
/// Implementations must be deterministic and safe to share across threads.
pub trait RegressionModel: Send + Sync {
    /// Number of features the model consumes
    fn n_features(&self) -> usize;

    /// Predict a single value
    fn predict(&self, features: ArrayView1<'_, f64>) -> MlResult<f64>;

    /// Whether inputs must be standardized before [`predict`](Self::predict)
    fn expects_scaled_features(&self) -> bool {
        false
    }

    /// Confidence label reported alongside predictions
    fn confidence(&self) -> ConfidenceLabel {
        ConfidenceLabel::High
    }

    /// Short model identifier for status reports
    fn name(&self) -> &str;
}

/// Check a feature vector length against a model
pub(crate) fn check_shape(expected: usize, features: ArrayView1<'_, f64>) -> MlResult<()> {
    if features.len() != expected {
        return Err(MlError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}
