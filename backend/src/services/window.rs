//! Forecast-type window policy and window filtering.
//!
//! The policy is a plain table from [`ForecastType`] to [`DateWindow`]. Adding
//! a forecast type means adding an entry; the filter never branches on type.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::models::{DateWindow, ForecastPoint, ForecastType};

/// First day of the placeholder window (inclusive).
pub const PLACEHOLDER_START: NaiveDate = literal_date(2025, 1, 1);
/// Day after the placeholder window (exclusive).
pub const PLACEHOLDER_END: NaiveDate = literal_date(2025, 2, 1);

const fn literal_date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid literal date"),
    }
}

/// Fixed placeholder window shared by every forecast type: January 2025.
pub fn placeholder_window() -> DateWindow {
    DateWindow::from_ordered(PLACEHOLDER_START, PLACEHOLDER_END)
}

/// Mapping from forecast type to the date window whose predictions are returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowPolicy {
    windows: BTreeMap<ForecastType, DateWindow>,
}

impl WindowPolicy {
    /// Empty policy; every lookup fails until entries are added.
    pub fn empty() -> Self {
        Self {
            windows: BTreeMap::new(),
        }
    }

    /// Add or replace the window for a forecast type.
    pub fn with_window(mut self, forecast_type: ForecastType, window: DateWindow) -> Self {
        self.windows.insert(forecast_type, window);
        self
    }

    /// Window for `forecast_type`.
    ///
    /// # Errors
    /// Returns a configuration error if the table has no entry for the type.
    pub fn resolve(&self, forecast_type: ForecastType) -> ForecastResult<DateWindow> {
        self.windows.get(&forecast_type).copied().ok_or_else(|| {
            ForecastError::configuration(format!(
                "no window configured for forecast type '{}'",
                forecast_type
            ))
        })
    }

    /// Forecast types that have no entry.
    pub fn missing_types(&self) -> Vec<ForecastType> {
        ForecastType::ALL
            .into_iter()
            .filter(|t| !self.windows.contains_key(t))
            .collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (ForecastType, DateWindow)> + '_ {
        self.windows.iter().map(|(t, w)| (*t, *w))
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        ForecastType::ALL
            .into_iter()
            .fold(Self::empty(), |policy, t| policy.with_window(t, placeholder_window()))
    }
}

/// Points with `window.start <= ds < window.end`, order preserved. May be empty.
pub fn filter_window(points: &[ForecastPoint], window: &DateWindow) -> Vec<ForecastPoint> {
    points
        .iter()
        .filter(|p| window.contains(p.ds))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn points(start: NaiveDate, n: u64) -> Vec<ForecastPoint> {
        (0..n)
            .map(|i| ForecastPoint::new(start + Days::new(i), i as f64))
            .collect()
    }

    #[test]
    fn test_default_policy_uses_placeholder_for_all_types() {
        let policy = WindowPolicy::default();
        for t in ForecastType::ALL {
            let w = policy.resolve(t).unwrap();
            assert_eq!(w.start(), date(2025, 1, 1));
            assert_eq!(w.end(), date(2025, 2, 1));
        }
        assert!(policy.missing_types().is_empty());
    }

    #[test]
    fn test_placeholder_window_is_january_2025() {
        let window = placeholder_window();
        assert_eq!(window.start(), PLACEHOLDER_START);
        assert_eq!(window.end(), PLACEHOLDER_END);
        assert_eq!(PLACEHOLDER_START, date(2025, 1, 1));
        assert_eq!(PLACEHOLDER_END, date(2025, 2, 1));
        assert_eq!(window.len_days(), 31);
    }

    #[test]
    fn test_with_window_overrides_single_entry() {
        let custom = DateWindow::new(date(2024, 6, 1), date(2024, 7, 1)).unwrap();
        let policy = WindowPolicy::default().with_window(ForecastType::Event, custom);
        assert_eq!(policy.resolve(ForecastType::Event).unwrap(), custom);
        assert_eq!(policy.resolve(ForecastType::Occupancy).unwrap(), placeholder_window());
    }

    #[test]
    fn test_empty_policy_fails_to_resolve() {
        let policy = WindowPolicy::empty();
        let err = policy.resolve(ForecastType::Occupancy).unwrap_err();
        assert_eq!(err.category(), "CONFIGURATION_ERROR");
        assert_eq!(policy.missing_types().len(), ForecastType::ALL.len());
    }

    #[test]
    fn test_filter_is_half_open() {
        let window = placeholder_window();
        let filtered = filter_window(&points(date(2024, 12, 30), 40), &window);
        assert_eq!(filtered.len(), 31);
        assert_eq!(filtered.first().unwrap().ds, date(2025, 1, 1));
        assert_eq!(filtered.last().unwrap().ds, date(2025, 1, 31));
        assert!(filtered.iter().all(|p| p.ds != date(2025, 2, 1)));
    }

    #[test]
    fn test_filter_outside_window_is_empty() {
        let filtered = filter_window(&points(date(2024, 1, 1), 70), &placeholder_window());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_policy_deserializes_from_table() {
        let toml = r#"
[occupancy]
start = "2025-03-01"
end = "2025-04-01"

[event]
start = "2025-01-01"
end = "2025-02-01"
"#;
        let policy: WindowPolicy = toml::from_str(toml).unwrap();
        assert_eq!(
            policy.resolve(ForecastType::Occupancy).unwrap().start(),
            date(2025, 3, 1)
        );
        assert!(policy.missing_types().is_empty());
    }
}
