//! Canonical series construction: sort ascending by date, reject duplicate dates.

use log::debug;

use crate::error::{ForecastError, ForecastResult};
use crate::models::{Observation, Series};

/// Sort validated records and build a [`Series`].
///
/// Two records sharing a date are rejected rather than merged, since there is
/// no way to tell which value the caller meant.
pub fn normalize(mut records: Vec<Observation>) -> ForecastResult<Series> {
    records.sort_by_key(|o| o.ds);

    if let Some(pair) = records.windows(2).find(|w| w[0].ds == w[1].ds) {
        return Err(ForecastError::validation(format!(
            "duplicate date {} (values {} and {})",
            pair[0].ds, pair[0].y, pair[1].y
        )));
    }

    let series = Series::from_sorted(records)?;
    debug!(
        "normalized series: {} points from {} to {}",
        series.len(),
        series.first_date(),
        series.last_date()
    );
    Ok(series)
}
