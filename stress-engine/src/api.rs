use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::dataset::BuildingModel;
use crate::models::{
    CalculationRequest, CalculationResponse, CalculationStatus, Force, Section, StressParams,
    StressResult,
};
use crate::solver;

/// Application state: the model is generated once at startup and served
/// read-only, so no lock is needed around it.
pub struct AppState {
    model: BuildingModel,
}

impl AppState {
    pub fn new(max_level: u16) -> Self {
        Self {
            model: BuildingModel::generate(max_level),
        }
    }
}

/// Build the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/v1/sections", get(sections_handler))
        .route("/api/v1/forces", get(forces_handler))
        .route("/api/v1/stress-results", get(stress_results_handler))
        .route("/api/v1/calculate", post(calculate_handler))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Root endpoint
async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Stress Engine Service",
        "version": "0.1.0",
        "status": "running",
        "description": "Per-floor pier stress analysis across gravity, wind and seismic load combinations",
    }))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "max_level": state.model.max_level,
        "stress_rows": state.model.stress.len(),
    }))
}

async fn sections_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Section>> {
    tracing::debug!("Serving {} sections", state.model.sections.len());
    Json(state.model.sections.clone())
}

async fn forces_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Force>> {
    tracing::debug!("Serving {} forces", state.model.forces.len());
    Json(state.model.forces.clone())
}

async fn stress_results_handler(State(state): State<Arc<AppState>>) -> Json<Vec<StressResult>> {
    tracing::debug!("Serving {} stress results", state.model.stress.len());
    Json(state.model.stress.clone())
}

/// Run a parametrized recalculation
async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let params = &request.params;
    tracing::info!(
        "Received calculation request: levels {}-{}, factors g={} w={} s={}",
        params.level_range.0,
        params.level_range.1,
        params.load_factors.gravity,
        params.load_factors.wind,
        params.load_factors.seismic,
    );

    validate_params(params)?;

    let results = solver::calculate(&state.model, params);
    tracing::info!("Calculation produced {} rows", results.len());

    Ok(Json(CalculationResponse {
        job_id: Uuid::new_v4().to_string(),
        status: CalculationStatus::Success,
        results: Some(results),
        error_message: None,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

fn validate_params(params: &StressParams) -> Result<(), ApiError> {
    let (min, max) = params.level_range;
    if min == 0 {
        return Err(ApiError::ValidationError(
            "Level range must start at 1 or above".to_string(),
        ));
    }
    if min > max {
        return Err(ApiError::ValidationError(format!(
            "Invalid level range: {} > {}",
            min, max
        )));
    }
    Ok(())
}

/// API Errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoadFactors;

    fn params(range: (u16, u16)) -> StressParams {
        StressParams {
            load_factors: LoadFactors {
                gravity: 1.0,
                wind: 1.0,
                seismic: 1.0,
            },
            level_range: range,
        }
    }

    #[test]
    fn rejects_zero_based_range() {
        assert!(validate_params(&params((0, 10))).is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(validate_params(&params((20, 10))).is_err());
    }

    #[test]
    fn accepts_single_level_range() {
        assert!(validate_params(&params((5, 5))).is_ok());
    }
}
