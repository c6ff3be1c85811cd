//! HTTP error handling and response types.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Failure reported by the forecast pipeline
    Forecast(ForecastError),
    /// Unknown route or resource
    NotFound(String),
    /// Request body larger than the configured limit
    PayloadTooLarge(String),
}

impl AppError {
    /// Status code and body for this error.
    pub fn to_parts(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg.clone())),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiError::new("PAYLOAD_TOO_LARGE", msg.clone()),
            ),
            AppError::Forecast(err) => {
                let status = match err {
                    ForecastError::Validation { .. } | ForecastError::UnknownForecastType { .. } => {
                        StatusCode::BAD_REQUEST
                    }
                    ForecastError::Overloaded { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    ForecastError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                    ForecastError::ModelFit { .. }
                    | ForecastError::Configuration { .. }
                    | ForecastError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let body = ApiError::new(err.category(), err.to_string());
                let body = match err {
                    ForecastError::UnknownForecastType { expected, .. } => {
                        body.with_details(format!("expected one of: {}", expected))
                    }
                    _ => body,
                };
                (status, body)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.to_parts();
        (status, Json(error)).into_response()
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::Forecast(err)
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!("request body is too large ({})", rejection.body_text()))
        } else {
            AppError::Forecast(ForecastError::validation(format!(
                "could not read request body: {}",
                rejection.body_text()
            )))
        }
    }
}
