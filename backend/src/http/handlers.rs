//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{ForecastOutcome, ForecastQuery, HealthResponse, WindowEntryDto, WindowsResponse};
use super::error::AppError;
use super::state::AppState;
use crate::error::ForecastError;
use crate::services::{execute, prepare_request, ForecastParams};

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint reporting the engine and current fit capacity.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: state.engine.name().to_string(),
        fit_slots_available: state.limiter.available(),
        max_concurrent_fits: state.limiter.max_concurrent(),
    }))
}

// =============================================================================
// Window Policy
// =============================================================================

/// GET /windows
///
/// List the date window applied to each forecast type.
pub async fn list_windows(State(state): State<AppState>) -> HandlerResult<WindowsResponse> {
    let windows = state
        .policy
        .entries()
        .map(|(forecast_type, window)| WindowEntryDto {
            forecast_type: forecast_type.to_string(),
            start: window.start(),
            end: window.end(),
        })
        .collect();

    Ok(Json(WindowsResponse {
        default_horizon_days: state.config.forecast.horizon_days,
        windows,
    }))
}

// =============================================================================
// Forecast
// =============================================================================

/// POST /forecast?type=<occupancy|event>&horizon_days=<n>
///
/// Body: JSON array of `{ds, y}` records. Responds with `[{ds, yhat}]` for the
/// configured window, `404` with a message when no prediction falls inside it,
/// or a structured error. Every response carries an `x-request-id` header.
pub async fn forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut response = match run_forecast_request(&state, query, body, &request_id).await {
        Ok(outcome) => outcome.into_response(),
        Err(err) => {
            let (status, error) = err.to_parts();
            if status.is_client_error() {
                warn!(request_id = %request_id, code = %error.code, "forecast rejected: {}", error.message);
            } else {
                warn!(request_id = %request_id, code = %error.code, "forecast failed: {}", error.message);
            }
            (status, Json(error)).into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Parsing and normalizing a large body is CPU work, so it runs on the
/// blocking pool. It does not take a fit slot: rejected input never competes
/// with accepted requests for fit capacity.
async fn run_forecast_request(
    state: &AppState,
    query: Result<Query<ForecastQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
    request_id: &str,
) -> Result<ForecastOutcome, AppError> {
    let Query(query) = query
        .map_err(|e| ForecastError::validation(format!("invalid query string: {}", e.body_text())))?;
    let body = body.map_err(AppError::from)?;

    let ctx = state.pipeline_context();
    let ForecastQuery {
        forecast_type,
        horizon_days,
    } = query;
    let (ctx, request) = tokio::task::spawn_blocking(move || {
        let params = ForecastParams {
            forecast_type: forecast_type.as_deref(),
            horizon_days,
        };
        prepare_request(&ctx, params, &body).map(|request| (ctx, request))
    })
    .await
    .map_err(|e| ForecastError::internal(format!("request preparation failed: {}", e)))??;

    info!(
        request_id = %request_id,
        forecast_type = %request.forecast_type,
        points = request.series.len(),
        horizon_days = request.horizon_days,
        "forecast accepted"
    );

    let outcome = state
        .limiter
        .run(move || execute(&ctx, &request))
        .await?;
    Ok(outcome)
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("no such endpoint; try POST /forecast".to_string())
}
