//! Loading the model, encoders and scaler from a model directory.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ndarray::ArrayView1;
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use super::{ConfidenceLabel, LabelEncoders, MlError, MlResult, ModelInfo, RegressionModel, StandardScaler};

/// Exported regressor file name
pub const MODEL_FILE: &str = "population_estimate_model.onnx";
/// Optional model metadata file name
pub const MODEL_INFO_FILE: &str = "population_estimate_model_info.json";
/// Label encoder file name
pub const ENCODERS_FILE: &str = "population_estimate_encoders.json";
/// Feature scaler file name
pub const SCALER_FILE: &str = "population_estimate_scaler.json";

/// A loaded model with the preprocessing it was trained with.
///
/// Cheap to clone; the model itself is shared.
#[derive(Clone)]
pub struct ModelArtifacts {
    model: Arc<dyn RegressionModel>,
    encoders: LabelEncoders,
    scaler: StandardScaler,
}

impl fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("model", &self.model.name())
            .field("n_features", &self.model.n_features())
            .field("encoders", &self.encoders)
            .finish_non_exhaustive()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> MlResult<T> {
    let text = std::fs::read_to_string(path).map_err(|e| MlError::artifact_load(path, e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| MlError::artifact_load(path, e.to_string()))
}

/// Model metadata, defaulted when the info file is absent
fn read_model_info(dir: &Path) -> MlResult<ModelInfo> {
    let path = dir.join(MODEL_INFO_FILE);
    if path.exists() {
        read_json(&path)
    } else {
        Ok(ModelInfo::default())
    }
}

#[cfg(feature = "onnx")]
fn load_regressor(dir: &Path, n_features: usize, info: ModelInfo) -> MlResult<super::OnnxRegressor> {
    super::OnnxRegressor::from_file(dir.join(MODEL_FILE), n_features, info)
}

#[cfg(not(feature = "onnx"))]
fn load_regressor(_dir: &Path, _n_features: usize, _info: ModelInfo) -> MlResult<UnavailableModel> {
    Err(MlError::BackendUnavailable(
        "built without the `onnx` feature".to_string(),
    ))
}

#[cfg(not(feature = "onnx"))]
enum UnavailableModel {}

#[cfg(not(feature = "onnx"))]
impl RegressionModel for UnavailableModel {
    fn n_features(&self) -> usize {
        match *self {}
    }
    fn predict(&self, _features: ArrayView1<'_, f64>) -> MlResult<f64> {
        match *self {}
    }
    fn name(&self) -> &str {
        match *self {}
    }
}

impl ModelArtifacts {
    /// Load the encoders, scaler and exported model from `dir` and check
    /// they agree on the feature count `n_features`.
    ///
    /// Without the `onnx` feature this always fails with
    /// [`MlError::BackendUnavailable`] once the preprocessing files are read.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>, n_features: usize) -> MlResult<Self> {
        let dir = dir.as_ref();
        let encoders: LabelEncoders = read_json(&dir.join(ENCODERS_FILE))?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;
        let info = read_model_info(dir)?;
        let model = load_regressor(dir, n_features, info)?;

        let artifacts = Self::from_parts(model, encoders, scaler, n_features)?;
        info!(model = artifacts.model_name(), n_features, "Population model loaded");
        Ok(artifacts)
    }

    /// Assemble artifacts from an arbitrary model
    pub fn from_parts<M>(
        model: M,
        encoders: LabelEncoders,
        scaler: StandardScaler,
        n_features: usize,
    ) -> MlResult<Self>
    where
        M: RegressionModel + 'static,
    {
        if model.n_features() != n_features {
            return Err(MlError::InvalidArtifact(format!(
                "model expects {} features, pipeline produces {n_features}",
                model.n_features()
            )));
        }
        encoders.validate()?;
        scaler.validate(n_features)?;
        Ok(Self {
            model: Arc::new(model),
            encoders,
            scaler,
        })
    }

    /// Categorical encoders
    pub fn encoders(&self) -> &LabelEncoders {
        &self.encoders
    }

    /// Model identifier
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Confidence label the model declares
    pub fn confidence(&self) -> ConfidenceLabel {
        self.model.confidence()
    }

    /// Run inference, standardizing first if the model was trained on scaled inputs
    pub fn predict(&self, features: ArrayView1<'_, f64>) -> MlResult<f64> {
        if self.model.expects_scaled_features() {
            let scaled = self.scaler.transform(features)?;
            self.model.predict(scaled.view())
        } else {
            self.model.predict(features)
        }
    }
}
