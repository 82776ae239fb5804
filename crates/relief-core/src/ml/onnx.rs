//! ONNX Runtime backend for the population model.
//!
//! The regressor is exported from the trained scikit-learn estimator with
//! `skl2onnx`, giving a graph with one `[batch, n_features]` float input and
//! one `[batch, 1]` float output.

use std::path::Path;

use ndarray::ArrayView1;
use ort::session::Session;
use parking_lot::Mutex;
use tracing::{info, instrument};

use super::{check_shape, ConfidenceLabel, MlError, MlResult, ModelInfo, RegressionModel};

/// A regression model evaluated by ONNX Runtime.
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex.
pub struct OnnxRegressor {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    n_features: usize,
    info: ModelInfo,
}

impl std::fmt::Debug for OnnxRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxRegressor")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("n_features", &self.n_features)
            .field("info", &self.info)
            .finish()
    }
}

impl OnnxRegressor {
    /// Load an exported model from a file
    #[instrument(skip_all, fields(path = %path.as_ref().display(), n_features = n_features))]
    pub fn from_file(path: impl AsRef<Path>, n_features: usize, info: ModelInfo) -> MlResult<Self> {
        let path = path.as_ref();
        let session = Session::builder()
            .map_err(|e| MlError::artifact_load(path, format!("Failed to create session builder: {e}")))?
            .commit_from_file(path)
            .map_err(|e| MlError::artifact_load(path, format!("Failed to load model: {e}")))?;
        Self::from_session(session, n_features, info)
    }

    /// Load an exported model from in-memory bytes
    pub fn from_bytes(bytes: &[u8], n_features: usize, info: ModelInfo) -> MlResult<Self> {
        let session = Session::builder()
            .map_err(|e| MlError::InvalidArtifact(format!("Failed to create session builder: {e}")))?
            .commit_from_memory(bytes)
            .map_err(|e| MlError::InvalidArtifact(format!("Failed to load model from bytes: {e}")))?;
        Self::from_session(session, n_features, info)
    }

    fn from_session(session: Session, n_features: usize, info: ModelInfo) -> MlResult<Self> {
        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| MlError::InvalidArtifact("model graph has no inputs".into()))?;
        let output_name = session
            .outputs()
            .first()
            .map(|output| output.name().to_string())
            .ok_or_else(|| MlError::InvalidArtifact("model graph has no outputs".into()))?;

        info!(input = %input_name, output = %output_name, n_features, "ONNX model loaded");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            n_features,
            info,
        })
    }
}

impl RegressionModel for OnnxRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: ArrayView1<'_, f64>) -> MlResult<f64> {
        check_shape(self.n_features, features)?;

        // skl2onnx exports float32 graphs
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let shape = vec![1_i64, self.n_features as i64];
        let tensor = ort::value::Tensor::from_array((shape, data))
            .map_err(|e| MlError::Inference(format!("Failed to create input tensor: {e}")))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| MlError::Inference(e.to_string()))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| MlError::Inference(format!("missing output '{}'", self.output_name)))?;
        let (_, values) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| MlError::Inference(e.to_string()))?;

        let prediction = values
            .first()
            .map(|&v| f64::from(v))
            .ok_or_else(|| MlError::Inference("model returned an empty tensor".into()));
        prediction
    }

    fn expects_scaled_features(&self) -> bool {
        self.info.expects_scaled_features
    }

    fn confidence(&self) -> ConfidenceLabel {
        self.info.confidence
    }

    fn name(&self) -> &str {
        &self.info.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_garbage_bytes() {
        let result = OnnxRegressor::from_bytes(b"not an onnx graph", 17, ModelInfo::default());
        assert!(matches!(result, Err(MlError::InvalidArtifact(_))));
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let result = OnnxRegressor::from_file(tmp.path().join("absent.onnx"), 17, ModelInfo::default());
        assert!(matches!(result, Err(MlError::ArtifactLoad { .. })));
    }
}
