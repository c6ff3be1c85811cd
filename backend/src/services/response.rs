//! Public response contract for a completed forecast.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DateWindow, ForecastPoint, ForecastType};

/// Public projection of a forecast point: uncertainty bounds are not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastValue {
    pub ds: NaiveDate,
    pub yhat: f64,
}

impl From<&ForecastPoint> for ForecastValue {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            ds: point.ds,
            yhat: point.yhat,
        }
    }
}

/// Window description carried by a "no data" result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<DateWindow> for WindowBounds {
    fn from(window: DateWindow) -> Self {
        Self {
            start: window.start(),
            end: window.end(),
        }
    }
}

/// Body of a "no data for requested window" result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataBody {
    pub message: String,
    pub forecast_type: ForecastType,
    pub window: WindowBounds,
}

/// Successful pipeline outcome. Errors travel separately as `ForecastError`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    /// One value per day in the window, ascending.
    Points(Vec<ForecastValue>),
    /// The predictions never reached the window.
    NoData(NoDataBody),
}

impl ForecastOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}

/// Map the filtered predictions to the response contract.
pub fn serialize_outcome(
    filtered: &[ForecastPoint],
    forecast_type: ForecastType,
    window: DateWindow,
) -> ForecastOutcome {
    if filtered.is_empty() {
        return ForecastOutcome::NoData(NoDataBody {
            message: format!(
                "No forecast data for {} window {}",
                forecast_type, window
            ),
            forecast_type,
            window: window.into(),
        });
    }
    ForecastOutcome::Points(filtered.iter().map(ForecastValue::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::window::placeholder_window;

    #[test]
    fn test_points_drop_bounds() {
        let ds = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let points = [ForecastPoint::new(ds, 3.5).with_bounds(3.0, 4.0)];
        let outcome = serialize_outcome(&points, ForecastType::Occupancy, placeholder_window());
        match outcome {
            ForecastOutcome::Points(values) => {
                let json = serde_json::to_value(&values).unwrap();
                assert_eq!(json, serde_json::json!([{"ds": "2025-01-05", "yhat": 3.5}]));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_empty_is_no_data() {
        let outcome = serialize_outcome(&[], ForecastType::Event, placeholder_window());
        assert!(outcome.is_no_data());
        if let ForecastOutcome::NoData(body) = outcome {
            assert_eq!(body.message, "No forecast data for event window 2025-01-01..2025-02-01");
            let json = serde_json::to_value(&body).unwrap();
            assert_eq!(json["window"]["start"], "2025-01-01");
            assert_eq!(json["forecast_type"], "event");
        }
    }
}
