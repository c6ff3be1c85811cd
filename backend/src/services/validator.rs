//! Inbound payload validation.
//!
//! Turns the raw request body and the out-of-band forecast-type selector into
//! typed values. Records are projected onto `{ds, y}` here; any other field a
//! caller sends (`isHistorical`, `event_type`, ...) is dropped.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::error::{ForecastError, ForecastResult};
use crate::models::{ForecastType, Observation};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Resolve the forecast-type selector. Absent means [`ForecastType::Occupancy`].
pub fn parse_forecast_type(selector: Option<&str>) -> ForecastResult<ForecastType> {
    match selector {
        None => Ok(ForecastType::default()),
        Some(s) => s.parse(),
    }
}

/// Parse a request body into a JSON value, reporting syntax errors as validation errors.
pub fn parse_body(body: &[u8]) -> ForecastResult<Value> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ForecastError::validation("request body is empty; expected a JSON array"));
    }
    serde_json::from_slice(body)
        .map_err(|e| ForecastError::validation(format!("request body is not valid JSON: {}", e)))
}

/// Check the payload shape and convert each record to an [`Observation`].
///
/// # Errors
/// Returns a validation error when the payload is not an array, a record is not
/// an object, lacks `ds`/`y`, has an unparseable date or a non-numeric value,
/// or when fewer than `min_observations` records are present.
pub fn validate_payload(payload: &Value, min_observations: usize) -> ForecastResult<Vec<Observation>> {
    let records = payload.as_array().ok_or_else(|| {
        ForecastError::validation(format!(
            "payload must be a JSON array of {{ds, y}} records, got {}",
            json_kind(payload)
        ))
    })?;

    if records.len() < min_observations {
        return Err(ForecastError::validation(format!(
            "insufficient points: got {}, need at least {}",
            records.len(),
            min_observations
        )));
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let fields = record.as_object().ok_or_else(|| {
                ForecastError::validation(format!(
                    "record {} must be an object, got {}",
                    index,
                    json_kind(record)
                ))
            })?;
            validate_record(index, fields)
        })
        .collect()
}

fn validate_record(index: usize, fields: &Map<String, Value>) -> ForecastResult<Observation> {
    let ds = fields
        .get("ds")
        .ok_or_else(|| ForecastError::validation(format!("record {} is missing 'ds'", index)))?;
    let y = fields
        .get("y")
        .ok_or_else(|| ForecastError::validation(format!("record {} is missing 'y'", index)))?;

    let ds = ds
        .as_str()
        .ok_or_else(|| {
            ForecastError::validation(format!(
                "record {}: 'ds' must be a date string, got {}",
                index,
                json_kind(ds)
            ))
        })
        .and_then(|s| {
            parse_date(s).ok_or_else(|| {
                ForecastError::validation(format!(
                    "record {}: 'ds' value '{}' is not an ISO calendar date",
                    index, s
                ))
            })
        })?;

    let y = parse_value(y).ok_or_else(|| {
        ForecastError::validation(format!("record {}: 'y' value {} is not numeric", index, y))
    })?;

    Ok(Observation::new(ds, y))
}

/// Parse `YYYY-MM-DD`, or an ISO date-time whose calendar date is taken.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Numbers are taken as-is; numeric strings are coerced. Everything else is rejected.
fn parse_value(value: &Value) -> Option<f64> {
    let y = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    y.is_finite().then_some(y)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forecast_type_defaults_to_occupancy() {
        assert_eq!(parse_forecast_type(None).unwrap(), ForecastType::Occupancy);
        assert_eq!(parse_forecast_type(Some("event")).unwrap(), ForecastType::Event);
    }

    #[test]
    fn test_forecast_type_rejects_unknown() {
        let err = parse_forecast_type(Some("spurious")).unwrap_err();
        assert_eq!(err.category(), "UNKNOWN_FORECAST_TYPE");
    }

    #[test]
    fn test_validate_drops_extra_fields() {
        let payload = json!([
            {"ds": "2024-01-01", "y": 1.0, "isHistorical": true},
            {"ds": "2024-01-02", "y": 2, "event_type": "wedding"},
        ]);
        let records = validate_payload(&payload, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].y, 2.0);
        assert_eq!(records[0].ds, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_validate_rejects_non_array() {
        let err = validate_payload(&json!({"ds": "2024-01-01", "y": 1}), 2).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_validate_rejects_empty_and_single() {
        let empty = validate_payload(&json!([]), 2).unwrap_err();
        assert!(empty.to_string().contains("insufficient points"));

        let single = validate_payload(&json!([{"ds": "2024-01-01", "y": 1}]), 2).unwrap_err();
        assert!(single.to_string().contains("insufficient points"));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let payload = json!([{"ds": "2024-01-01", "y": 1}, {"ds": "2024-01-02"}]);
        let err = validate_payload(&payload, 2).unwrap_err();
        assert!(err.to_string().contains("record 1 is missing 'y'"));

        let payload = json!([{"y": 1}, {"ds": "2024-01-02", "y": 2}]);
        let err = validate_payload(&payload, 2).unwrap_err();
        assert!(err.to_string().contains("record 0 is missing 'ds'"));
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let payload = json!([{"ds": "2024-13-45", "y": 1}, {"ds": "2024-01-02", "y": 2}]);
        let err = validate_payload(&payload, 2).unwrap_err();
        assert!(matches!(err, ForecastError::Validation { .. }));

        let payload = json!([{"ds": 20240101, "y": 1}, {"ds": "2024-01-02", "y": 2}]);
        assert!(validate_payload(&payload, 2).is_err());
    }

    #[test]
    fn test_validate_rejects_non_numeric_y() {
        for bad in [json!("abc"), json!(null), json!(true), json!([1]), json!({"v": 1})] {
            let payload = json!([{"ds": "2024-01-01", "y": bad}, {"ds": "2024-01-02", "y": 2}]);
            let err = validate_payload(&payload, 2).unwrap_err();
            assert!(err.to_string().contains("not numeric"), "{}", err);
        }
    }

    #[test]
    fn test_validate_coerces_numeric_strings() {
        let payload = json!([{"ds": "2024-01-01", "y": "1.5"}, {"ds": "2024-01-02", "y": " 2 "}]);
        let records = validate_payload(&payload, 2).unwrap();
        assert_eq!(records[0].y, 1.5);
        assert_eq!(records[1].y, 2.0);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(parse_date("2025-01-15"), Some(expected));
        assert_eq!(parse_date("2025-01-15T00:00:00"), Some(expected));
        assert_eq!(parse_date("2025-01-15 12:30:00"), Some(expected));
        assert_eq!(parse_date("2025-01-15T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("2025-01-15T08:00:00.000+02:00"), Some(expected));
        assert_eq!(parse_date("15/01/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(b"[]").is_ok());
        assert!(parse_body(b"   ").is_err());
        let err = parse_body(b"[{\"ds\":").unwrap_err();
        assert_eq!(err.category(), "VALIDATION_ERROR");
    }
}
