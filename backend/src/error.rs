//! Error types for the forecast pipeline.
//!
//! Every stage of the pipeline reports failures through [`ForecastError`]. The
//! variants double as the failure categories exposed on the wire, so the HTTP
//! layer only has to map a category to a status code.

use crate::engine::ModelError;

/// Result type for pipeline operations
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Error type for the forecast pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    /// Malformed or insufficient input (bad shape, bad date, non-numeric
    /// value, duplicate date, too few points).
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The forecast-type selector did not name a known type.
    #[error("Unknown forecast type '{value}' (expected one of: {expected})")]
    UnknownForecastType { value: String, expected: String },

    /// The model capability could not fit or predict. Terminal for the request.
    #[error("Model fit error: {message}")]
    ModelFit { message: String },

    /// The admission limit for concurrent fits was reached.
    #[error("Service overloaded: {message}")]
    Overloaded { message: String },

    /// The request did not finish before its deadline.
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// Configuration or initialization error.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Internal/unexpected errors.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ForecastError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unknown forecast type error.
    pub fn unknown_forecast_type(value: impl Into<String>) -> Self {
        let expected = crate::models::ForecastType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownForecastType {
            value: value.into(),
            expected,
        }
    }

    /// Create a model fit error.
    pub fn model_fit(message: impl Into<String>) -> Self {
        Self::ModelFit {
            message: message.into(),
        }
    }

    /// Create an overloaded error.
    pub fn overloaded(message: impl Into<String>) -> Self {
        Self::Overloaded {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable category code.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::UnknownForecastType { .. } => "UNKNOWN_FORECAST_TYPE",
            Self::ModelFit { .. } => "MODEL_FIT_ERROR",
            Self::Overloaded { .. } => "OVERLOADED",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::UnknownForecastType { .. }
        )
    }
}

impl From<ModelError> for ForecastError {
    fn from(err: ModelError) -> Self {
        ForecastError::model_fit(err.to_string())
    }
}
