//! Data Transfer Objects for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::services::response::{ForecastOutcome, ForecastValue, NoDataBody, WindowBounds};

/// Query parameters for the forecast endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForecastQuery {
    /// Forecast-type selector (`occupancy` when absent)
    #[serde(default, rename = "type", alias = "forecast_type", alias = "forecastType")]
    pub forecast_type: Option<String>,
    /// Horizon override in days
    #[serde(default, alias = "horizonDays")]
    pub horizon_days: Option<u32>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Name of the forecasting engine
    pub engine: String,
    /// Fit slots currently free
    pub fit_slots_available: usize,
    /// Total fit slots
    pub max_concurrent_fits: usize,
}

/// One row of the window table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowEntryDto {
    pub forecast_type: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Window table response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowsResponse {
    /// Horizon applied when the caller does not pass one
    pub default_horizon_days: u32,
    /// Windows, one per forecast type
    pub windows: Vec<WindowEntryDto>,
}

impl IntoResponse for ForecastOutcome {
    fn into_response(self) -> Response {
        match self {
            ForecastOutcome::Points(values) => (StatusCode::OK, Json(values)).into_response(),
            ForecastOutcome::NoData(body) => (StatusCode::NOT_FOUND, Json(body)).into_response(),
        }
    }
}
