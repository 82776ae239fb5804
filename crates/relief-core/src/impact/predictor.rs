//! Population impact prediction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::features::{build_features, FeatureInputs};
use super::weather::weather_factors;
use crate::domain::{ReferenceData, WeatherFactors, WeatherObservation};
use crate::location::LocationResolver;
use crate::ml::{ConfidenceLabel, MlError, ModelArtifacts};
use crate::{PipelineConfig, ReliefError, Result};

/// Inputs for one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRequest {
    /// Place name as the user typed it
    pub location: String,
    /// Disaster category key
    pub disaster_type: String,
    /// Share of population affected (0-100); the category default when absent
    #[serde(default)]
    pub affected_area_percent: Option<f64>,
    /// Current weather at the location
    pub weather: WeatherObservation,
}

impl ImpactRequest {
    /// Create a request that uses the category's default footprint
    pub fn new(location: impl Into<String>, disaster_type: impl Into<String>, weather: WeatherObservation) -> Self {
        Self {
            location: location.into(),
            disaster_type: disaster_type.into(),
            affected_area_percent: None,
            weather,
        }
    }

    /// Override the affected area
    pub fn with_affected_area_percent(mut self, percent: f64) -> Self {
        self.affected_area_percent = Some(percent);
        self
    }
}

/// Outcome of a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    /// Canonical region
    pub region: String,
    /// Location as supplied
    pub input_location: String,
    /// Normalized category key
    pub disaster_type: String,
    /// Region population
    pub region_population: u64,
    /// Footprint used (0-100)
    pub affected_area_percent: f64,
    /// `floor(population × percent / 100)`, for comparison only
    pub base_affected: u64,
    /// Model estimate, clamped to a non-negative integer
    pub predicted_affected: u64,
    /// Weather used
    pub weather: WeatherObservation,
    /// Factors derived from the weather
    pub weather_factors: WeatherFactors,
    /// Category description
    pub description: String,
    /// Model confidence
    pub confidence: ConfidenceLabel,
}

/// `floor(population × percent / 100)`
pub fn base_affected(population: u64, percent: f64) -> u64 {
    (population as f64 * (percent / 100.0)).floor() as u64
}

fn clamp_prediction(raw: f64) -> std::result::Result<u64, MlError> {
    if !raw.is_finite() {
        return Err(MlError::Inference(format!("non-finite prediction {raw}")));
    }
    // Truncate toward zero, then floor at zero.
    Ok(if raw <= 0.0 { 0 } else { raw.trunc() as u64 })
}

/// Predicts how many people a disaster affects in a region
#[derive(Debug, Clone)]
pub struct ImpactPredictor {
    reference: Arc<ReferenceData>,
    model: Option<ModelArtifacts>,
    config: PipelineConfig,
}

impl ImpactPredictor {
    /// Create a predictor. Without a model every prediction fails with
    /// [`ReliefError::ModelUnavailable`].
    pub fn new(reference: Arc<ReferenceData>, model: Option<ModelArtifacts>, config: PipelineConfig) -> Self {
        Self {
            reference,
            model,
            config,
        }
    }

    /// Whether a model is loaded
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Loaded model, if any
    pub fn model(&self) -> Option<&ModelArtifacts> {
        self.model.as_ref()
    }

    /// Predict the affected population for a request
    #[instrument(skip(self, request), fields(location = %request.location, disaster_type = %request.disaster_type))]
    pub fn predict(&self, request: &ImpactRequest) -> Result<ImpactResult> {
        let region = LocationResolver::new(&self.reference.regions).resolve(&request.location)?;
        let category = self
            .reference
            .categories
            .get(&request.disaster_type)
            .ok_or_else(|| ReliefError::UnknownDisasterCategory(request.disaster_type.clone()))?;

        let percent = request
            .affected_area_percent
            .unwrap_or(category.default_affected_area_percent);
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(ReliefError::invalid_input(
                "affected_area_percent",
                format!("must be within [0, 100], got {percent}"),
            ));
        }
        request.weather.validate()?;

        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ReliefError::ModelUnavailable("population model is not loaded".into()))?;

        let factors = weather_factors(&request.weather);
        let features = build_features(
            &FeatureInputs {
                region: region.name(),
                population: region.population(),
                affected_area_percent: percent,
                weather: &request.weather,
                factors: &factors,
                category,
                duration_days: self.config.inference_duration_days,
                month: self.config.inference_month,
            },
            model.encoders(),
        )?;

        let predicted_affected = clamp_prediction(model.predict(features.view())?)?;
        let result = ImpactResult {
            region: region.name().to_string(),
            input_location: request.location.clone(),
            disaster_type: category.key.clone(),
            region_population: region.population(),
            affected_area_percent: percent,
            base_affected: base_affected(region.population(), percent),
            predicted_affected,
            weather: request.weather,
            weather_factors: factors,
            description: category.description.clone(),
            confidence: model.confidence(),
        };

        info!(
            region = %result.region,
            predicted_affected = result.predicted_affected,
            "Impact prediction completed"
        );
        Ok(result)
    }
}
