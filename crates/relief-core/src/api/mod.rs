//! REST API for the relief coordination platform.
//!
//! ## Endpoints
//!
//! ### Service
//! - `GET /` - API information
//! - `GET /api/system-status` - Loaded tables and model availability
//!
//! ### Pipeline
//! - `POST /api/predict-population` - Predict affected population
//! - `POST /api/calculate-resources` - Resource requirements for a population
//! - `POST /api/allocate-resources` - Split a shared pool across incidents
//! - `POST /api/full-disaster-analysis` - Predict, estimate and allocate

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};

pub use dto::*;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Create the relief API router with all endpoints.
///
/// # Example
///
/// ```rust,no_run
/// use relief_core::api::{create_router, AppState};
/// use relief_core::ReliefCoordinator;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let state = AppState::new(ReliefCoordinator::builtin());
///     let app = create_router(state);
///     let listener = tokio::net::TcpListener::bind("localhost:5002").await?;
///     axum::serve(listener, app).await?;
///     Ok(())
/// }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::api_info))
        .route("/api/system-status", get(handlers::system_status))
        .route("/api/predict-population", post(handlers::predict_population))
        .route("/api/calculate-resources", post(handlers::calculate_resources))
        .route("/api/allocate-resources", post(handlers::allocate_resources))
        .route("/api/full-disaster-analysis", post(handlers::full_disaster_analysis))
        .with_state(state)
}
