//! Full disaster analysis: predict, estimate, then optionally allocate.
//!
//! ```text
//! FullAnalysisRequest
//!        │
//!        ▼
//!  ImpactPredictor ──► predicted_affected
//!        │
//!        ▼
//!  ResourceEstimator ──► ResourceEstimate ──► Incident
//!                                               │
//!                       available_resources? ───┤
//!                                               ▼
//!                                       ResourceAllocator
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::AllocationReport;
use crate::domain::{title_case_key, AllocationPool, DisasterKind, Incident, WeatherObservation};
use crate::impact::{ImpactRequest, ImpactResult};
use crate::resources::ResourceEstimate;

/// Inputs for one end-to-end analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysisRequest {
    /// Place name as the user typed it
    pub location: String,
    /// Disaster category key
    pub disaster_type: String,
    /// Footprint override (0-100)
    #[serde(default)]
    pub affected_area_percent: Option<f64>,
    /// Current weather at the location
    pub weather: WeatherObservation,
    /// Response duration; the configured default when absent
    #[serde(default)]
    pub duration_days: Option<u32>,
    /// Stock to allocate from; allocation is skipped when absent
    #[serde(default)]
    pub available_resources: Option<AllocationPool>,
}

impl FullAnalysisRequest {
    /// Analysis without allocation
    pub fn new(location: impl Into<String>, disaster_type: impl Into<String>, weather: WeatherObservation) -> Self {
        Self {
            location: location.into(),
            disaster_type: disaster_type.into(),
            affected_area_percent: None,
            weather,
            duration_days: None,
            available_resources: None,
        }
    }

    /// Allocate the resulting needs from `pool`
    pub fn with_pool(mut self, pool: AllocationPool) -> Self {
        self.available_resources = Some(pool);
        self
    }

    /// Override the response duration
    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    /// The prediction part of this request
    pub fn impact_request(&self) -> ImpactRequest {
        ImpactRequest {
            location: self.location.clone(),
            disaster_type: self.disaster_type.clone(),
            affected_area_percent: self.affected_area_percent,
            weather: self.weather,
        }
    }
}

/// Result of an end-to-end analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysis {
    /// Analysis identifier
    pub id: Uuid,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
    /// Population impact
    pub impact: ImpactResult,
    /// Resource requirements for the predicted population
    pub resources: ResourceEstimate,
    /// Incident built from the tracked requirements
    pub incident: Incident,
    /// Allocation of the supplied pool, if any
    pub allocation: Option<AllocationReport>,
}

/// `"<Region> <Title Case Type>"`, e.g. `"Dehradun Flash Flood"`
pub fn incident_name(region: &str, disaster_type: &str) -> String {
    format!("{region} {}", title_case_key(disaster_type))
}

/// Build the incident the allocator sees from a prediction and its estimate.
///
/// Categories without a priority type of their own (cloudburst, avalanche)
/// carry only a label, so the allocator falls back for them.
pub fn analysis_incident(impact: &ImpactResult, estimate: &ResourceEstimate) -> Incident {
    let label = title_case_key(&impact.disaster_type);
    let incident = Incident::new(
        incident_name(&impact.region, &impact.disaster_type),
        impact.region.clone(),
        impact.predicted_affected,
        estimate.tracked_needs(),
    )
    .with_label(label);

    match DisasterKind::parse(&impact.disaster_type).and_then(|k| k.incident_kind()) {
        Some(kind) => incident.with_kind(kind),
        None => incident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IncidentKind, WeatherFactors};
    use crate::ml::ConfidenceLabel;
    use crate::resources::ResourceEstimator;

    fn impact(disaster_type: &str, predicted: u64) -> ImpactResult {
        let weather = WeatherObservation::new(20.0, 0.0, 50.0, 0.0);
        ImpactResult {
            region: "Chamoli".into(),
            input_location: "chamoli".into(),
            disaster_type: disaster_type.into(),
            region_population: 391_605,
            affected_area_percent: 10.0,
            base_affected: 39_160,
            predicted_affected: predicted,
            weather,
            weather_factors: WeatherFactors::neutral(),
            description: String::new(),
            confidence: ConfidenceLabel::High,
        }
    }

    #[test]
    fn test_incident_name() {
        assert_eq!(incident_name("Dehradun", "flash_flood"), "Dehradun Flash Flood");
        assert_eq!(incident_name("Tehri Garhwal", "earthquake"), "Tehri Garhwal Earthquake");
    }

    #[test]
    fn test_incident_carries_tracked_needs() {
        let impact = impact("landslide", 2_000);
        let estimate = ResourceEstimator::new().estimate(2_000, "landslide", 7).unwrap();
        let incident = analysis_incident(&impact, &estimate);

        assert_eq!(incident.name, "Chamoli Landslide");
        assert_eq!(incident.affected_population.get(), 2_000);
        assert_eq!(incident.kind, Some(IncidentKind::Landslide));
        assert_eq!(incident.needs, estimate.tracked_needs());
    }

    #[test]
    fn test_cloudburst_has_no_explicit_kind() {
        let impact = impact("cloudburst", 500);
        let estimate = ResourceEstimator::new().estimate(500, "cloudburst", 7).unwrap();
        let incident = analysis_incident(&impact, &estimate);
        assert_eq!(incident.kind, None);
        assert_eq!(incident.inference_text(), "Cloudburst");
    }

    #[test]
    fn test_request_defaults_from_json() {
        let req: FullAnalysisRequest = serde_json::from_str(
            r#"{"location": "Dehradun", "disaster_type": "flood",
                "weather": {"temperature": 28.5, "rainfall": 45.2, "humidity": 78.3, "wind_speed": 12.5}}"#,
        )
        .unwrap();
        assert!(req.duration_days.is_none());
        assert!(req.available_resources.is_none());
        assert_eq!(req.impact_request().location, "Dehradun");
    }
}
