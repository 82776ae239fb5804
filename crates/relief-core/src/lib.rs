//! # Relief Core
//!
//! Disaster impact prediction and relief resource planning for regional
//! emergency operations.
//!
//! Given a place name, a disaster category and current weather, the crate
//! estimates how many people are affected, converts that population into
//! concrete relief requirements, and splits a limited stock of relief
//! resources across concurrent incidents by priority.
//!
//! ## Features
//!
//! - **Location resolution**: free-text place names and city aliases mapped to canonical regions
//! - **Impact prediction**: weather severity factors and a pretrained regressor run through ONNX Runtime
//! - **Resource estimation**: humanitarian standards scaled by disaster-specific multipliers
//! - **Scarce allocation**: priority-weighted sharing that never overdraws the pool
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          relief-core                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────┐  │
//! │  │ Location │──►│  Impact  │──►│ Resources │──►│Allocation│  │
//! │  │ Resolver │   │Predictor │   │ Estimator │   │          │  │
//! │  └────┬─────┘   └────┬─────┘   └───────────┘   └──────────┘  │
//! │       │              │                                       │
//! │  ┌────▼──────────────▼───┐                                   │
//! │  │ Reference data  +  ML │   loaded once, immutable          │
//! │  └───────────────────────┘                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use relief_core::{Incident, ReliefCoordinator, ResourceNeeds};
//!
//! let coordinator = ReliefCoordinator::builtin();
//!
//! let estimate = coordinator.estimate_resources(10_000, "flood", None)?;
//! let incident = Incident::new("Dehradun Flood", "Dehradun", 10_000u64, estimate.tracked_needs());
//!
//! let report = coordinator.allocate(&ResourceNeeds::new(100_000, 20, 40), &[incident]);
//! assert!(report.has_shortage());
//! # Ok::<(), relief_core::ReliefError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod allocation;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod domain;
pub mod impact;
pub mod location;
pub mod ml;
pub mod pipeline;
pub mod resources;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

pub use allocation::{
    AllocationReport, AllocationStatus, IncidentAllocation, PriorityCalculator, ResourceAllocation,
    ResourceAllocator, ResourceUsage,
};
pub use config::{ConfigError, PlatformConfig};
pub use domain::{
    AllocationPool, CategoryTable, DisasterCategory, DisasterKind, Incident, IncidentKind,
    Population, ReferenceData, Region, RegionTable, ResourceAmount, ResourceCategory,
    ResourceNeeds, TrackedResource, WeatherFactors, WeatherObservation,
};
pub use impact::{ImpactPredictor, ImpactRequest, ImpactResult, FEATURE_COUNT};
pub use location::{LocationResolver, MatchRule};
pub use ml::{ConfidenceLabel, MlError, MlResult, ModelArtifacts, ModelInfo, RegressionModel};
pub use pipeline::{FullAnalysis, FullAnalysisRequest};
pub use resources::{ResourceEstimate, ResourceEstimator, ResourceRequirement};

#[cfg(feature = "api")]
pub use api::{create_router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for relief operations
pub type Result<T> = std::result::Result<T, ReliefError>;

/// Unified error type for relief operations
#[derive(Debug, thiserror::Error)]
pub enum ReliefError {
    /// Place name matched no region or alias
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// Disaster category key is not in the category table
    #[error("Unknown disaster category: {0}")]
    UnknownDisasterCategory(String),

    /// Prediction requested without a loaded model
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Request field out of range or malformed
    #[error("Invalid input for `{field}`: {message}")]
    InvalidInput {
        /// Offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Model inference or feature encoding failed
    #[error("Inference error: {0}")]
    Inference(#[from] ml::MlError),

    /// Reference tables could not be loaded or are inconsistent
    #[error("Reference data error: {0}")]
    ReferenceData(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReliefError {
    /// Construct a [`ReliefError::InvalidInput`]
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReliefError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the caller can fix this error by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReliefError::UnknownLocation(_)
                | ReliefError::UnknownDisasterCategory(_)
                | ReliefError::InvalidInput { .. }
        )
    }
}

/// Per-request pipeline settings
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Response duration when a request names none
    pub default_duration_days: u32,
    /// Event duration fed to the population model
    pub inference_duration_days: u32,
    /// Calendar month fed to the population model (1-12)
    pub inference_month: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_duration_days: 7,
            inference_duration_days: 1,
            inference_month: 6,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set the default response duration
    pub fn default_duration_days(mut self, days: u32) -> Self {
        self.config.default_duration_days = days.max(1);
        self
    }

    /// Set the event duration used for inference
    pub fn inference_duration_days(mut self, days: u32) -> Self {
        self.config.inference_duration_days = days.max(1);
        self
    }

    /// Set the month used for inference
    pub fn inference_month(mut self, month: u32) -> Self {
        self.config.inference_month = month.clamp(1, 12);
        self
    }

    /// Build the configuration
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

/// Snapshot of what the coordinator has loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Library version
    pub version: String,
    /// Whether predictions are possible
    pub model_loaded: bool,
    /// Loaded model identifier
    pub model_name: Option<String>,
    /// Canonical regions
    pub regions: usize,
    /// Active aliases
    pub aliases: usize,
    /// Disaster category keys
    pub disaster_types: Vec<String>,
}

/// Main relief coordinator.
///
/// Built once at startup and shared read-only; every operation is a pure
/// function of its inputs and the loaded tables.
#[derive(Debug, Clone)]
pub struct ReliefCoordinator {
    reference: Arc<ReferenceData>,
    predictor: ImpactPredictor,
    estimator: ResourceEstimator,
    allocator: ResourceAllocator,
    config: PipelineConfig,
}

impl ReliefCoordinator {
    /// Create a coordinator over the given tables and optional model
    pub fn new(reference: ReferenceData, model: Option<ModelArtifacts>, config: PipelineConfig) -> Self {
        let reference = Arc::new(reference);
        let predictor = ImpactPredictor::new(Arc::clone(&reference), model, config.clone());
        Self {
            reference,
            predictor,
            estimator: ResourceEstimator::new(),
            allocator: ResourceAllocator::new(),
            config,
        }
    }

    /// Built-in tables, no model
    pub fn builtin() -> Self {
        Self::new(ReferenceData::builtin(), None, PipelineConfig::default())
    }

    /// Load reference data and model artifacts as `platform` describes.
    ///
    /// A missing model is only fatal when `require_model` is set; otherwise
    /// the coordinator starts and predictions fail with
    /// [`ReliefError::ModelUnavailable`].
    #[instrument(skip_all)]
    pub fn from_platform_config(platform: &PlatformConfig) -> Result<Self> {
        platform.validate()?;

        let mut reference = match &platform.data_dir {
            Some(dir) => ReferenceData::from_dir(dir)?,
            None => ReferenceData::builtin(),
        };
        if let Some(path) = &platform.alias_file {
            let merged = reference.merge_alias_file(path);
            info!(merged, "City aliases merged");
        }

        let model = match ModelArtifacts::load(&platform.model_dir, FEATURE_COUNT) {
            Ok(model) => Some(model),
            Err(e) if platform.require_model => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Population model not loaded, predictions disabled");
                None
            }
        };

        Ok(Self::new(reference, model, platform.pipeline()))
    }

    /// Loaded reference tables
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Pipeline settings
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether a population model is loaded
    pub fn has_model(&self) -> bool {
        self.predictor.has_model()
    }

    /// Resolve a free-text place name to its canonical region
    pub fn resolve_location(&self, input: &str) -> Result<&Region> {
        LocationResolver::new(&self.reference.regions).resolve(input)
    }

    /// Predict the affected population
    pub fn predict_impact(&self, request: &ImpactRequest) -> Result<ImpactResult> {
        self.predictor.predict(request)
    }

    /// Estimate resource requirements; `duration_days` defaults to the configured value
    pub fn estimate_resources(
        &self,
        affected_population: u64,
        disaster_type: &str,
        duration_days: Option<u32>,
    ) -> Result<ResourceEstimate> {
        let days = duration_days.unwrap_or(self.config.default_duration_days);
        self.estimator.estimate(affected_population, disaster_type, days)
    }

    /// Allocate a pool across incidents
    pub fn allocate(&self, pool: &AllocationPool, incidents: &[Incident]) -> AllocationReport {
        self.allocator.allocate(pool, incidents)
    }

    /// Predict, estimate and, when a pool is supplied, allocate
    #[instrument(skip_all, fields(location = %request.location, disaster_type = %request.disaster_type))]
    pub fn full_analysis(&self, request: &FullAnalysisRequest) -> Result<FullAnalysis> {
        let impact = self.predict_impact(&request.impact_request())?;
        let resources = self.estimate_resources(
            impact.predicted_affected,
            &impact.disaster_type,
            request.duration_days,
        )?;
        let incident = pipeline::analysis_incident(&impact, &resources);
        let allocation = request
            .available_resources
            .as_ref()
            .map(|pool| self.allocate(pool, std::slice::from_ref(&incident)));

        info!(
            incident = %incident.name,
            allocated = allocation.is_some(),
            "Full disaster analysis completed"
        );
        Ok(FullAnalysis {
            id: uuid::Uuid::new_v4(),
            analyzed_at: chrono::Utc::now(),
            impact,
            resources,
            incident,
            allocation,
        })
    }

    /// Status snapshot
    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            version: VERSION.to_string(),
            model_loaded: self.has_model(),
            model_name: self.predictor.model().map(|m| m.model_name().to_string()),
            regions: self.reference.regions.len(),
            aliases: self.reference.regions.aliases().len(),
            disaster_types: self.reference.categories.iter().map(|c| c.key.clone()).collect(),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AllocationPool, AllocationReport, AllocationStatus, DisasterKind, FullAnalysis,
        FullAnalysisRequest, ImpactRequest, ImpactResult, Incident, IncidentKind, PipelineConfig,
        PlatformConfig, ReliefCoordinator, ReliefError, ResourceCategory, ResourceEstimate,
        ResourceNeeds, Result, TrackedResource, WeatherObservation,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::builder()
            .default_duration_days(10)
            .inference_duration_days(3)
            .inference_month(9)
            .build();

        assert_eq!(config.default_duration_days, 10);
        assert_eq!(config.inference_duration_days, 3);
        assert_eq!(config.inference_month, 9);
    }

    #[test]
    fn test_builder_clamping() {
        let config = PipelineConfig::builder()
            .default_duration_days(0)
            .inference_month(13)
            .build();
        assert_eq!(config.default_duration_days, 1);
        assert_eq!(config.inference_month, 12);

        let config = PipelineConfig::builder().inference_month(0).build();
        assert_eq!(config.inference_month, 1);
    }

    #[test]
    fn test_client_errors() {
        assert!(ReliefError::UnknownLocation("x".into()).is_client_error());
        assert!(ReliefError::invalid_input("population", "must be >= 0").is_client_error());
        assert!(!ReliefError::ModelUnavailable("x".into()).is_client_error());
        assert!(!ReliefError::ReferenceData("x".into()).is_client_error());
    }

    #[test]
    fn test_coordinator_without_model() {
        let coordinator = ReliefCoordinator::builtin();
        assert!(!coordinator.has_model());
        assert_eq!(coordinator.resolve_location("haldwani").unwrap().name(), "Nainital");

        let estimate = coordinator.estimate_resources(1_000, "earthquake", None).unwrap();
        assert_eq!(estimate.duration_days, 7);

        let weather = WeatherObservation::new(28.5, 45.2, 78.3, 12.5);
        assert!(matches!(
            coordinator.full_analysis(&FullAnalysisRequest::new("Dehradun", "flood", weather)),
            Err(ReliefError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_status() {
        let status = ReliefCoordinator::builtin().status();
        assert_eq!(status.regions, 13);
        assert_eq!(status.aliases, 4);
        assert_eq!(status.disaster_types.len(), 6);
        assert!(!status.model_loaded);
        assert!(status.model_name.is_none());
    }

    #[test]
    fn test_require_model_fails_startup() {
        let tmp = tempfile::tempdir().unwrap();
        let platform = PlatformConfig {
            model_dir: tmp.path().join("missing"),
            require_model: true,
            ..PlatformConfig::default()
        };
        assert!(matches!(
            ReliefCoordinator::from_platform_config(&platform),
            Err(ReliefError::Inference(MlError::ArtifactLoad { .. }))
        ));

        let lenient = PlatformConfig {
            require_model: false,
            ..platform
        };
        let coordinator = ReliefCoordinator::from_platform_config(&lenient).unwrap();
        assert!(!coordinator.has_model());
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
