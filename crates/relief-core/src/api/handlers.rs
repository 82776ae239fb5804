//! Axum request handlers for the relief REST API.
//!
//! Each handler is documented with OpenAPI-style documentation comments.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use chrono::Utc;

use super::dto::*;
use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::domain::Incident;
use crate::impact::ImpactRequest;

// ============================================================================
// Service Handlers
// ============================================================================

/// Service information and route list.
///
/// # OpenAPI Specification
///
/// ```yaml
/// /:
///   get:
///     summary: API information
///     tags: [Service]
///     responses:
///       200:
///         description: Service name, version and routes
/// ```
pub async fn api_info() -> Json<ApiInfoResponse> {
    let endpoints = [
        ("GET /", "API information"),
        ("GET /api/system-status", "Loaded tables and model"),
        ("POST /api/predict-population", "Predict affected population"),
        ("POST /api/calculate-resources", "Calculate resource needs"),
        ("POST /api/allocate-resources", "Allocate resources across incidents"),
        ("POST /api/full-disaster-analysis", "Predict, estimate and allocate"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect::<BTreeMap<_, _>>();

    Json(ApiInfoResponse {
        message: "Disaster Response Coordination Platform API".to_string(),
        version: crate::VERSION.to_string(),
        status: "active".to_string(),
        endpoints,
        timestamp: Utc::now(),
    })
}

/// Health of the loaded components.
///
/// # OpenAPI Specification
///
/// ```yaml
/// /api/system-status:
///   get:
///     summary: System status
///     tags: [Service]
///     responses:
///       200:
///         description: Table sizes and model availability
///         content:
///           application/json:
///             schema:
///               $ref: '#/components/schemas/SystemStatusResponse'
/// ```
#[tracing::instrument(skip(state))]
pub async fn system_status(State(state): State<AppState>) -> Json<SystemStatusResponse> {
    let system = state.coordinator().status();
    Json(SystemStatusResponse {
        api_status: "healthy".to_string(),
        population_prediction: if system.model_loaded { "healthy" } else { "unhealthy" }.to_string(),
        started_at: state.started_at(),
        timestamp: Utc::now(),
        system,
    })
}

// ============================================================================
// Pipeline Handlers
// ============================================================================

/// Predict the population affected by a disaster.
///
/// # OpenAPI Specification
///
/// ```yaml
/// /api/predict-population:
///   post:
///     summary: Predict affected population
///     tags: [Prediction]
///     requestBody:
///       required: true
///       content:
///         application/json:
///           schema:
///             $ref: '#/components/schemas/PredictPopulationRequest'
///     responses:
///       200:
///         description: Prediction
///       400:
///         description: Unknown location or category, or invalid input
///       503:
///         description: No population model loaded
/// ```
#[tracing::instrument(skip(state, request), fields(location = %request.location))]
pub async fn predict_population(
    State(state): State<AppState>,
    Json(request): Json<PredictPopulationRequest>,
) -> ApiResult<Json<PredictPopulationResponse>> {
    let request = ImpactRequest::from(request);
    let prediction = state.coordinator().predict_impact(&request)?;
    Ok(Json(PredictPopulationResponse {
        success: true,
        prediction,
        timestamp: Utc::now(),
    }))
}

/// Calculate resource requirements for an affected population.
///
/// # OpenAPI Specification
///
/// ```yaml
/// /api/calculate-resources:
///   post:
///     summary: Calculate resource needs
///     tags: [Resources]
///     requestBody:
///       required: true
///       content:
///         application/json:
///           schema:
///             $ref: '#/components/schemas/CalculateResourcesRequest'
///     responses:
///       200:
///         description: Requirements per resource category
///       400:
///         description: Negative population or invalid duration
/// ```
#[tracing::instrument(skip(state, request), fields(disaster_type = %request.disaster_type))]
pub async fn calculate_resources(
    State(state): State<AppState>,
    Json(request): Json<CalculateResourcesRequest>,
) -> ApiResult<Json<CalculateResourcesResponse>> {
    let (population, duration) = request.validate()?;
    let estimate = state
        .coordinator()
        .estimate_resources(population, &request.disaster_type, duration)?;
    Ok(Json(CalculateResourcesResponse {
        success: true,
        resource_calculation: estimate,
        timestamp: Utc::now(),
    }))
}

/// Allocate a shared pool across competing incidents.
///
/// # OpenAPI Specification
///
/// ```yaml
/// /api/allocate-resources:
///   post:
///     summary: Allocate resources
///     description: Splits the pool by priority when requests exceed it
///     tags: [Allocation]
///     requestBody:
///       required: true
///       content:
///         application/json:
///           schema:
///             $ref: '#/components/schemas/AllocateResourcesRequest'
///     responses:
///       200:
///         description: Allocation report
///       400:
///         description: Negative quantity
///       422:
///         description: Empty incident list
/// ```
#[tracing::instrument(skip(state, request), fields(disasters = request.disasters.len()))]
pub async fn allocate_resources(
    State(state): State<AppState>,
    Json(request): Json<AllocateResourcesRequest>,
) -> ApiResult<Json<AllocateResourcesResponse>> {
    if request.disasters.is_empty() {
        return Err(ApiError::validation(
            "disasters must be a non-empty list",
            Some("disasters".to_string()),
        ));
    }
    let pool = request.available_resources.to_pool()?;
    let incidents = request
        .disasters
        .iter()
        .enumerate()
        .map(|(i, d)| d.to_incident(i))
        .collect::<Result<Vec<Incident>, _>>()?;

    let allocation = state.coordinator().allocate(&pool, &incidents);
    Ok(Json(AllocateResourcesResponse {
        success: true,
        allocation,
        timestamp: Utc::now(),
    }))
}

/// Predict, estimate and optionally allocate in one call.
///
/// # OpenAPI Specification
///
/// ```yaml
/// /api/full-disaster-analysis:
///   post:
///     summary: Full disaster analysis
///     tags: [Analysis]
///     requestBody:
///       required: true
///       content:
///         application/json:
///           schema:
///             $ref: '#/components/schemas/FullAnalysisRequest'
///     responses:
///       200:
///         description: Prediction, requirements and allocation
///       400:
///         description: Unknown location or category, or invalid input
///       503:
///         description: No population model loaded
/// ```
#[tracing::instrument(skip(state, request), fields(location = %request.disaster_info.location))]
pub async fn full_disaster_analysis(
    State(state): State<AppState>,
    Json(request): Json<FullAnalysisRequestDto>,
) -> ApiResult<Json<FullAnalysisResponse>> {
    let request = request.to_request()?;
    let analysis = state.coordinator().full_analysis(&request)?;
    Ok(Json(FullAnalysisResponse {
        success: true,
        analysis,
    }))
}
