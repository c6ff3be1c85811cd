//! Historical observations and the canonical series built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Minimum number of observations a model can be fit on.
pub const MIN_OBSERVATIONS: usize = 2;

/// One historical `(date, value)` measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub ds: NaiveDate,
    pub y: f64,
}

impl Observation {
    pub fn new(ds: NaiveDate, y: f64) -> Self {
        Self { ds, y }
    }
}

/// Validated series: strictly ascending by date, at least
/// [`MIN_OBSERVATIONS`] points.
///
/// The only way to obtain one is [`Series::from_sorted`], which re-checks the
/// ordering invariant; in the pipeline that call is made by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series from observations that are already sorted.
    ///
    /// # Errors
    /// Returns a validation error if there are fewer than [`MIN_OBSERVATIONS`]
    /// points or if the dates are not strictly ascending.
    pub fn from_sorted(observations: Vec<Observation>) -> ForecastResult<Self> {
        if observations.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::validation(format!(
                "insufficient points: got {}, need at least {}",
                observations.len(),
                MIN_OBSERVATIONS
            )));
        }
        if let Some(pair) = observations.windows(2).find(|w| w[0].ds >= w[1].ds) {
            return Err(ForecastError::validation(format!(
                "series is not strictly ascending at {} -> {}",
                pair[0].ds, pair[1].ds
            )));
        }
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|o| o.ds)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.y)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].ds
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].ds
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
