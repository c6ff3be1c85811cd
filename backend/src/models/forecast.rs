//! Forecast request and prediction types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::Series;
use crate::error::ForecastError;

/// Forecast horizon used when neither configuration nor caller overrides it.
pub const DEFAULT_HORIZON_DAYS: u32 = 60;

/// Kind of forecast being requested. Selects the date window via the window policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ForecastType {
    /// Room occupancy rate forecast
    #[default]
    Occupancy,
    /// Event count forecast
    Event,
}

impl ForecastType {
    pub const ALL: [ForecastType; 2] = [ForecastType::Occupancy, ForecastType::Event];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Occupancy => "occupancy",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for ForecastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastType {
    type Err = ForecastError;

    /// Parse a forecast type selector ("occupancy", "event"), ignoring case
    /// and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "occupancy" => Ok(Self::Occupancy),
            "event" => Ok(Self::Event),
            _ => Err(ForecastError::unknown_forecast_type(s)),
        }
    }
}

/// One predicted value for a specific date, with optional uncertainty bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yhat_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yhat_upper: Option<f64>,
}

impl ForecastPoint {
    /// Point estimate without bounds.
    pub fn new(ds: NaiveDate, yhat: f64) -> Self {
        Self {
            ds,
            yhat,
            yhat_lower: None,
            yhat_upper: None,
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.yhat_lower = Some(lower);
        self.yhat_upper = Some(upper);
        self
    }
}

/// Fully validated forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub series: Series,
    pub forecast_type: ForecastType,
    pub horizon_days: u32,
}
