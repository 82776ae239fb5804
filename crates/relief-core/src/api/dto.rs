//! Data Transfer Objects (DTOs) for the relief REST API.
//!
//! Request types accept the loose shapes field clients send (signed counts,
//! optional sections) and convert into validated domain values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AllocationPool, Incident, IncidentKind, Population, ResourceNeeds, WeatherObservation};
use crate::impact::{ImpactRequest, ImpactResult};
use crate::pipeline::{FullAnalysis, FullAnalysisRequest};
use crate::resources::ResourceEstimate;
use crate::{AllocationReport, ReliefError, SystemStatus};

// ============================================================================
// Service info
// ============================================================================

/// Response body for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfoResponse {
    /// Service name
    pub message: String,
    /// Library version
    pub version: String,
    /// Always `"active"` while serving
    pub status: String,
    /// Route → description
    pub endpoints: BTreeMap<String, String>,
    /// Response time
    pub timestamp: DateTime<Utc>,
}

/// Response body for `GET /api/system-status`.
///
/// ## Example Response
///
/// ```json
/// {
///   "api_status": "healthy",
///   "population_prediction": "unhealthy",
///   "started_at": "2026-10-19T08:00:00Z",
///   "timestamp": "2026-10-19T08:05:00Z",
///   "system": {
///     "version": "0.1.0",
///     "model_loaded": false,
///     "model_name": null,
///     "regions": 13,
///     "aliases": 4,
///     "disaster_types": ["avalanche", "cloudburst", "earthquake", "flash_flood", "flood", "landslide"]
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatusResponse {
    /// Always `"healthy"` while serving
    pub api_status: String,
    /// `"healthy"` when a model is loaded
    pub population_prediction: String,
    /// Service start time
    pub started_at: DateTime<Utc>,
    /// Response time
    pub timestamp: DateTime<Utc>,
    /// Loaded tables and model
    pub system: SystemStatus,
}

// ============================================================================
// Prediction DTOs
// ============================================================================

/// Request body for `POST /api/predict-population`.
///
/// ## Example
///
/// ```json
/// {
///   "location": "Dehradun",
///   "disaster_type": "flash_flood",
///   "affected_area_percentage": 15,
///   "weather_data": {"rainfall": 45.2, "wind_speed": 12.5, "humidity": 78.3, "temperature": 28.5}
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PredictPopulationRequest {
    /// Place name
    pub location: String,
    /// Disaster category key
    pub disaster_type: String,
    /// Footprint override (0-100)
    #[serde(default, alias = "affected_area_percent")]
    pub affected_area_percentage: Option<f64>,
    /// Current weather
    pub weather_data: WeatherObservation,
}

impl From<PredictPopulationRequest> for ImpactRequest {
    fn from(req: PredictPopulationRequest) -> Self {
        ImpactRequest {
            location: req.location,
            disaster_type: req.disaster_type,
            affected_area_percent: req.affected_area_percentage,
            weather: req.weather_data,
        }
    }
}

/// Response body for `POST /api/predict-population`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictPopulationResponse {
    /// Always true on 200
    pub success: bool,
    /// Prediction
    pub prediction: ImpactResult,
    /// Response time
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Resource DTOs
// ============================================================================

/// Request body for `POST /api/calculate-resources`.
///
/// ## Example
///
/// ```json
/// {"affected_population": 50000, "disaster_type": "flash_flood", "duration_days": 7}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateResourcesRequest {
    /// People to provision for; fractional values are truncated
    pub affected_population: f64,
    /// Disaster category key
    pub disaster_type: String,
    /// Response duration; the configured default when absent
    #[serde(default)]
    pub duration_days: Option<i64>,
}

impl CalculateResourcesRequest {
    /// Validated population and duration
    pub fn validate(&self) -> Result<(u64, Option<u32>), ReliefError> {
        let population = Population::from_float("affected_population", self.affected_population)?;
        let duration = self
            .duration_days
            .map(|d| {
                u32::try_from(d)
                    .ok()
                    .filter(|d| *d >= 1)
                    .ok_or_else(|| ReliefError::invalid_input("duration_days", format!("must be >= 1, got {d}")))
            })
            .transpose()?;
        Ok((population.get(), duration))
    }
}

/// Response body for `POST /api/calculate-resources`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResourcesResponse {
    /// Always true on 200
    pub success: bool,
    /// Requirements per category
    pub resource_calculation: ResourceEstimate,
    /// Response time
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Allocation DTOs
// ============================================================================

/// Stock on hand. Missing fields count as zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AvailableResourcesDto {
    /// Food packets
    #[serde(default)]
    pub food_packets: i64,
    /// Rescue teams
    #[serde(default)]
    pub rescue_teams: i64,
    /// Medical staff
    #[serde(default)]
    pub medical_staff: i64,
}

impl AvailableResourcesDto {
    /// Validated pool
    pub fn to_pool(self) -> Result<AllocationPool, ReliefError> {
        ResourceNeeds::from_signed(
            "available_resources",
            self.food_packets,
            self.rescue_teams,
            self.medical_staff,
        )
    }
}

/// One incident in an allocation request.
#[derive(Debug, Clone, Deserialize)]
pub struct DisasterDto {
    /// Display name
    pub name: String,
    /// Place name
    pub location: String,
    /// People affected
    pub affected_people: i64,
    /// Food packets requested
    pub food_needed: i64,
    /// Rescue teams requested
    pub rescue_teams_needed: i64,
    /// Medical staff requested
    pub medical_staff_needed: i64,
    /// Explicit type; inferred from `disaster_label` or `name` when absent
    #[serde(default)]
    pub disaster_type: Option<IncidentKind>,
    /// Free-text type label
    #[serde(default)]
    pub disaster_label: Option<String>,
}

impl DisasterDto {
    /// Validated incident; `index` locates errors in the request
    pub fn to_incident(&self, index: usize) -> Result<Incident, ReliefError> {
        let prefix = format!("disasters[{index}]");
        let population = Population::from_signed(&format!("{prefix}.affected_people"), self.affected_people)?;
        let needs = ResourceNeeds::from_signed(
            &prefix,
            self.food_needed,
            self.rescue_teams_needed,
            self.medical_staff_needed,
        )?;
        let mut incident = Incident::new(self.name.clone(), self.location.clone(), population, needs);
        incident.kind = self.disaster_type;
        incident.disaster_label = self.disaster_label.clone();
        Ok(incident)
    }
}

/// Request body for `POST /api/allocate-resources`.
///
/// ## Example
///
/// ```json
/// {
///   "available_resources": {"food_packets": 500000, "rescue_teams": 400, "medical_staff": 700},
///   "disasters": [
///     {
///       "name": "Dehradun Flood",
///       "location": "Dehradun",
///       "affected_people": 50000,
///       "food_needed": 250000,
///       "rescue_teams_needed": 150,
///       "medical_staff_needed": 250
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AllocateResourcesRequest {
    /// Stock on hand
    pub available_resources: AvailableResourcesDto,
    /// Competing incidents
    pub disasters: Vec<DisasterDto>,
}

/// Response body for `POST /api/allocate-resources`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateResourcesResponse {
    /// Always true on 200
    pub success: bool,
    /// Per-incident allocations and per-resource usage
    pub allocation: AllocationReport,
    /// Response time
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Full analysis DTOs
// ============================================================================

/// Disaster section of a full analysis request.
#[derive(Debug, Clone, Deserialize)]
pub struct DisasterInfoDto {
    /// Place name
    pub location: String,
    /// Disaster category key
    pub disaster_type: String,
    /// Footprint override (0-100)
    #[serde(default, alias = "affected_area_percent")]
    pub affected_area_percentage: Option<f64>,
    /// Response duration
    #[serde(default)]
    pub duration_days: Option<i64>,
}

/// Request body for `POST /api/full-disaster-analysis`.
///
/// ## Example
///
/// ```json
/// {
///   "disaster_info": {"location": "Haldwani", "disaster_type": "flood", "duration_days": 7},
///   "weather_data": {"rainfall": 45.2, "wind_speed": 12.5, "humidity": 78.3, "temperature": 28.5},
///   "available_resources": {"food_packets": 100000, "rescue_teams": 50, "medical_staff": 80}
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FullAnalysisRequestDto {
    /// What happened where
    pub disaster_info: DisasterInfoDto,
    /// Current weather
    pub weather_data: WeatherObservation,
    /// Stock to allocate from; allocation is skipped when absent
    #[serde(default)]
    pub available_resources: Option<AvailableResourcesDto>,
}

impl FullAnalysisRequestDto {
    /// Validated pipeline request
    pub fn to_request(&self) -> Result<FullAnalysisRequest, ReliefError> {
        let info = &self.disaster_info;
        let duration_days = info
            .duration_days
            .map(|d| {
                u32::try_from(d)
                    .ok()
                    .filter(|d| *d >= 1)
                    .ok_or_else(|| {
                        ReliefError::invalid_input("disaster_info.duration_days", format!("must be >= 1, got {d}"))
                    })
            })
            .transpose()?;
        let available_resources = self.available_resources.map(|r| r.to_pool()).transpose()?;

        Ok(FullAnalysisRequest {
            location: info.location.clone(),
            disaster_type: info.disaster_type.clone(),
            affected_area_percent: info.affected_area_percentage,
            weather: self.weather_data,
            duration_days,
            available_resources,
        })
    }
}

/// Response body for `POST /api/full-disaster-analysis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAnalysisResponse {
    /// Always true on 200
    pub success: bool,
    /// Prediction, requirements and allocation
    pub analysis: FullAnalysis,
}
