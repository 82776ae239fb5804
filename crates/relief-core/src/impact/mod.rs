//! Impact prediction: weather severity, feature construction and model inference.

pub mod features;
pub mod predictor;
pub mod weather;

pub use features::{build_features, FeatureInputs, FEATURE_COUNT, FEATURE_NAMES};
pub use predictor::{base_affected, ImpactPredictor, ImpactRequest, ImpactResult};
pub use weather::weather_factors;
