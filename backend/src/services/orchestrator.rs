//! Horizon computation and model invocation.

use chrono::{Days, NaiveDate};
use log::{debug, warn};

use crate::engine::ForecastEngine;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{ForecastPoint, Series};

/// `horizon_days` consecutive calendar days starting the day after `last`.
///
/// # Errors
/// Returns a validation error if the horizon runs past the representable calendar.
pub fn future_dates(last: NaiveDate, horizon_days: u32) -> ForecastResult<Vec<NaiveDate>> {
    (1..=u64::from(horizon_days))
        .map(|offset| {
            last.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::validation(format!(
                    "horizon of {} days after {} exceeds the supported calendar range",
                    horizon_days, last
                ))
            })
        })
        .collect()
}

/// Fit the engine on `series` and predict every historical date plus the horizon.
///
/// The returned sequence has exactly `series.len() + horizon_days` points, in
/// ascending date order. A capability that returns anything else is treated as
/// a fit failure.
pub fn forecast(
    series: &Series,
    horizon_days: u32,
    engine: &dyn ForecastEngine,
) -> ForecastResult<Vec<ForecastPoint>> {
    let mut dates: Vec<NaiveDate> = series.dates().collect();
    dates.extend(future_dates(series.last_date(), horizon_days)?);

    let model = engine.fit(series).map_err(|e| {
        warn!("engine '{}' failed to fit {} points: {}", engine.name(), series.len(), e);
        ForecastError::from(e)
    })?;
    let points = model.predict(&dates).map_err(|e| {
        warn!("engine '{}' failed to predict {} dates: {}", engine.name(), dates.len(), e);
        ForecastError::from(e)
    })?;

    if points.len() != dates.len() {
        return Err(ForecastError::model_fit(format!(
            "engine '{}' returned {} points for {} requested dates",
            engine.name(),
            points.len(),
            dates.len()
        )));
    }
    if let Some((point, expected)) = points.iter().zip(&dates).find(|(p, d)| p.ds != **d) {
        return Err(ForecastError::model_fit(format!(
            "engine '{}' returned a point for {} where {} was expected",
            engine.name(),
            point.ds,
            expected
        )));
    }

    debug!(
        "engine '{}' predicted {} points ({} history + {} horizon)",
        engine.name(),
        points.len(),
        series.len(),
        horizon_days
    );
    Ok(points)
}
