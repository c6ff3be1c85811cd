//! Linear trend with an additive day-of-week component.

use chrono::{Datelike, NaiveDate};
use log::debug;

use super::{FittedModel, ForecastEngine, ModelError};
use crate::models::{ForecastPoint, Series};

/// Standard normal quantile for an 80% central interval.
const Z_80: f64 = 1.2816;

/// Minimum history span (in days) before a weekly component is estimated.
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;

/// Default engine: ordinary least squares trend over day offsets, plus a
/// day-of-week effect once at least two weeks of history are available.
///
/// Uncertainty bounds are `yhat ± z·σ` with σ the residual standard deviation.
#[derive(Debug, Clone, Copy)]
pub struct TrendSeasonalityEngine {
    /// Quantile used for the uncertainty band
    pub interval_z: f64,
    /// Whether to estimate the day-of-week component
    pub weekly_seasonality: bool,
}

impl Default for TrendSeasonalityEngine {
    fn default() -> Self {
        Self {
            interval_z: Z_80,
            weekly_seasonality: true,
        }
    }
}

impl ForecastEngine for TrendSeasonalityEngine {
    fn name(&self) -> &str {
        "trend-seasonality"
    }

    fn fit(&self, series: &Series) -> Result<Box<dyn FittedModel>, ModelError> {
        let n = series.len();
        if n < 2 {
            return Err(ModelError::InsufficientData(format!(
                "need at least 2 observations, got {}",
                n
            )));
        }

        let origin = series.first_date();
        let mut t = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        for (i, obs) in series.observations().iter().enumerate() {
            if !obs.y.is_finite() {
                return Err(ModelError::NonFinite(format!("y[{}] = {}", i, obs.y)));
            }
            t.push((obs.ds - origin).num_days() as f64);
            y.push(obs.y);
        }

        let nf = n as f64;
        let mean_t = t.iter().sum::<f64>() / nf;
        let mean_y = y.iter().sum::<f64>() / nf;
        let sxx: f64 = t.iter().map(|ti| (ti - mean_t).powi(2)).sum();
        let sxy: f64 = t
            .iter()
            .zip(&y)
            .map(|(ti, yi)| (ti - mean_t) * (yi - mean_y))
            .sum();
        if sxx <= 0.0 {
            return Err(ModelError::Degenerate(
                "observations do not vary in time".to_string(),
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_t;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(ModelError::NonFinite(format!(
                "trend coefficients slope={} intercept={}",
                slope, intercept
            )));
        }

        let span = (series.last_date() - origin).num_days();
        let weekly = if self.weekly_seasonality && span >= WEEKLY_MIN_SPAN_DAYS {
            Some(weekday_effects(series, &t, intercept, slope))
        } else {
            None
        };

        let mut sse = 0.0;
        for (obs, ti) in series.observations().iter().zip(&t) {
            let fitted = intercept + slope * ti + seasonal(&weekly, obs.ds);
            sse += (obs.y - fitted).powi(2);
        }
        let dof = n.saturating_sub(2).max(1) as f64;
        let sigma = (sse / dof).sqrt();
        if !sigma.is_finite() {
            return Err(ModelError::NonFinite(format!("residual sigma = {}", sigma)));
        }

        debug!(
            "fitted trend model: n={} slope={:.6} intercept={:.6} sigma={:.6} weekly={}",
            n,
            slope,
            intercept,
            sigma,
            weekly.is_some()
        );

        Ok(Box::new(TrendModel {
            origin,
            intercept,
            slope,
            weekly,
            half_width: self.interval_z * sigma,
        }))
    }
}

/// Mean residual per weekday (Monday = 0), centered on the weekdays observed.
fn weekday_effects(series: &Series, t: &[f64], intercept: f64, slope: f64) -> [f64; 7] {
    let mut sums = [0.0; 7];
    let mut counts = [0usize; 7];
    for (obs, ti) in series.observations().iter().zip(t) {
        let idx = obs.ds.weekday().num_days_from_monday() as usize;
        sums[idx] += obs.y - (intercept + slope * ti);
        counts[idx] += 1;
    }

    let mut effects = [0.0; 7];
    let mut total = 0.0;
    let mut present = 0usize;
    for i in 0..7 {
        if counts[i] > 0 {
            effects[i] = sums[i] / counts[i] as f64;
            total += effects[i];
            present += 1;
        }
    }
    if present > 0 {
        let center = total / present as f64;
        for i in 0..7 {
            if counts[i] > 0 {
                effects[i] -= center;
            }
        }
    }
    effects
}

fn seasonal(weekly: &Option<[f64; 7]>, ds: NaiveDate) -> f64 {
    weekly
        .as_ref()
        .map(|w| w[ds.weekday().num_days_from_monday() as usize])
        .unwrap_or(0.0)
}

struct TrendModel {
    origin: NaiveDate,
    intercept: f64,
    slope: f64,
    weekly: Option<[f64; 7]>,
    half_width: f64,
}

impl FittedModel for TrendModel {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastPoint>, ModelError> {
        dates
            .iter()
            .map(|&ds| {
                let ti = (ds - self.origin).num_days() as f64;
                let yhat = self.intercept + self.slope * ti + seasonal(&self.weekly, ds);
                if !yhat.is_finite() {
                    return Err(ModelError::Prediction(format!("yhat for {} = {}", ds, yhat)));
                }
                Ok(ForecastPoint::new(ds, yhat)
                    .with_bounds(yhat - self.half_width, yhat + self.half_width))
            })
            .collect()
    }
}
