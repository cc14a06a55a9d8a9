//! HTTP request handlers for the SPM threshold API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_threshold_at, compare_thresholds, resolve_location};
use crate::error::EngineError;
use crate::export::SpmDataDocument;
use crate::models::{HouseholdInput, Tenure};

use super::request::{CompareRequest, ThresholdRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/threshold", post(threshold_handler))
        .route("/compare", post(compare_handler))
        .route("/config", get(config_handler))
        .with_state(state)
}

/// Handler for POST /threshold endpoint.
///
/// Resolves the location, then returns the threshold with its breakdown.
async fn threshold_handler(
    State(state): State<AppState>,
    payload: Result<Json<ThresholdRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing threshold request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let tenure = match request.tenure.parse::<Tenure>() {
        Ok(tenure) => tenure,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                tenure = %request.tenure,
                "Unknown tenure"
            );
            return engine_error_response(err);
        }
    };

    let config = state.config().config();
    let location = match resolve_location(&request.location, config) {
        Ok(location) => location,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                location = ?request.location,
                "Location not found"
            );
            return engine_error_response(err);
        }
    };

    let household = HouseholdInput {
        year: request.year,
        tenure,
        num_adults: request.num_adults,
        num_children: request.num_children,
        geoadj: location.geoadj,
    };

    match calculate_threshold_at(&household, &location, config) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                year = household.year,
                tenure = %household.tenure,
                household_size = household.size(),
                location = %location.label,
                threshold = %result.threshold.round_dp(2),
                duration_us = result.audit_trace.duration_us,
                "Threshold calculated"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            engine_error_response(err)
        }
    }
}

/// Handler for POST /compare endpoint.
///
/// Returns thresholds for every tenure across low, average and high cost areas.
async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing comparison request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match compare_thresholds(
        request.year,
        request.num_adults,
        request.num_children,
        state.config().config(),
    ) {
        Ok(grid) => {
            info!(
                correlation_id = %correlation_id,
                year = grid.year,
                rows = grid.rows.len(),
                "Comparison completed"
            );
            json_response(StatusCode::OK, grid)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Comparison failed"
            );
            engine_error_response(err)
        }
    }
}

/// Handler for GET /config endpoint.
///
/// Returns the same document the export writes to `spm_config.json`.
async fn config_handler(State(state): State<AppState>) -> Response {
    match SpmDataDocument::from_config(state.config().config()) {
        Ok(document) => json_response(StatusCode::OK, document),
        Err(err) => {
            warn!(error = %err, "Failed to build config document");
            engine_error_response(err)
        }
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn engine_error_response(err: EngineError) -> Response {
    ApiErrorResponse::from(err).into_response()
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
