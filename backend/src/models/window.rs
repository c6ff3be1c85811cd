use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateWindow")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateWindow> for DateWindow {
    type Error = ForecastError;

    fn try_from(raw: RawDateWindow) -> Result<Self, Self::Error> {
        DateWindow::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// # Errors
    /// Returns a configuration error unless `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> ForecastResult<Self> {
        if start >= end {
            return Err(ForecastError::configuration(format!(
                "window start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from bounds the caller already knows are ordered.
    pub(crate) fn from_ordered(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Number of calendar days covered.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
