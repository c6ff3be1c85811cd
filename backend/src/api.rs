//! Public API surface for the forecast backend.
//!
//! This file consolidates the types that cross the wire so clients and tests
//! can depend on one module.

pub use crate::error::{ForecastError, ForecastResult};
pub use crate::models::{DateWindow, ForecastPoint, ForecastRequest, ForecastType, Observation, Series};
pub use crate::services::response::{ForecastOutcome, ForecastValue, NoDataBody, WindowBounds};

/// Endpoint paths served by the HTTP layer.
pub const FORECAST_PATH: &str = "/forecast";
pub const HEALTH_PATH: &str = "/health";
pub const WINDOWS_PATH: &str = "/windows";
