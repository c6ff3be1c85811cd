//! Forecasting model capability.
//!
//! The pipeline never looks inside a model. It hands a validated [`Series`] to a
//! [`ForecastEngine`], gets back a [`FittedModel`], and asks that model for one
//! [`ForecastPoint`] per requested date. Any statistical engine can sit behind
//! these two traits; [`TrendSeasonalityEngine`] is the one the server ships with.
//!
//! ```
//! use chrono::NaiveDate;
//! use occupancy_forecast::engine::{ForecastEngine, TrendSeasonalityEngine};
//! use occupancy_forecast::models::Observation;
//! use occupancy_forecast::services::normalizer::normalize;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let records = (0..10)
//!     .map(|i| Observation::new(start + chrono::Days::new(i), i as f64))
//!     .collect();
//! let series = normalize(records).unwrap();
//!
//! let model = TrendSeasonalityEngine::default().fit(&series).unwrap();
//! let next = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
//! let points = model.predict(&[next]).unwrap();
//! assert!((points[0].yhat - 10.0).abs() < 1e-9);
//! ```

pub mod trend;

pub use trend::TrendSeasonalityEngine;

use chrono::NaiveDate;

use crate::models::{ForecastPoint, Series};

/// Failure reported by a model capability.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Not enough observations to estimate the model.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// Input or estimated values are NaN or infinite.
    #[error("non-finite value: {0}")]
    NonFinite(String),
    /// The data does not determine the model (e.g. no variation in time).
    #[error("degenerate model: {0}")]
    Degenerate(String),
    /// Prediction failed for the requested dates.
    #[error("prediction failed: {0}")]
    Prediction(String),
}

/// A forecasting engine that can be fit on a series.
///
/// Implementations must be stateless across calls: every `fit` produces an
/// independent model owned by the caller.
pub trait ForecastEngine: Send + Sync {
    /// Short identifier reported by the health endpoint and in logs.
    fn name(&self) -> &str;

    /// Fit a model on the given series.
    fn fit(&self, series: &Series) -> Result<Box<dyn FittedModel>, ModelError>;
}

/// A model produced by [`ForecastEngine::fit`].
pub trait FittedModel: Send {
    /// Predict one point per date, in the order the dates are given.
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastPoint>, ModelError>;
}
