#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Days, NaiveDate};
use serde_json::{json, Value};

use occupancy_forecast::config::ForecastSettings;
use occupancy_forecast::engine::{FittedModel, ForecastEngine, ModelError, TrendSeasonalityEngine};
use occupancy_forecast::models::{ForecastPoint, Series};
use occupancy_forecast::services::{PipelineContext, WindowPolicy};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` daily records starting at `start`, with `y = slope * i + intercept`.
pub fn linear_payload(start: NaiveDate, n: u64, slope: f64, intercept: f64) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "ds": (start + Days::new(i)).format("%Y-%m-%d").to_string(),
                    "y": slope * i as f64 + intercept,
                    "isHistorical": true,
                })
            })
            .collect(),
    )
}

pub fn body_of(payload: &Value) -> Vec<u8> {
    serde_json::to_vec(payload).unwrap()
}

/// Engine wrapper that counts `fit` calls.
#[derive(Clone, Default)]
pub struct CountingEngine {
    inner: TrendSeasonalityEngine,
    fits: Arc<AtomicUsize>,
}

impl CountingEngine {
    pub fn fit_count(&self) -> usize {
        self.fits.load(Ordering::SeqCst)
    }
}

impl ForecastEngine for CountingEngine {
    fn name(&self) -> &str {
        "counting"
    }

    fn fit(&self, series: &Series) -> Result<Box<dyn FittedModel>, ModelError> {
        self.fits.fetch_add(1, Ordering::SeqCst);
        self.inner.fit(series)
    }
}

/// Engine whose fit always fails.
pub struct RejectingEngine;

impl ForecastEngine for RejectingEngine {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn fit(&self, _series: &Series) -> Result<Box<dyn FittedModel>, ModelError> {
        Err(ModelError::Degenerate("insufficient variation".to_string()))
    }
}

/// Engine that predicts the constant 1.0 with no bounds.
pub struct ConstantEngine;

struct ConstantModel;

impl FittedModel for ConstantModel {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastPoint>, ModelError> {
        Ok(dates.iter().map(|&d| ForecastPoint::new(d, 1.0)).collect())
    }
}

impl ForecastEngine for ConstantEngine {
    fn name(&self) -> &str {
        "constant"
    }

    fn fit(&self, _series: &Series) -> Result<Box<dyn FittedModel>, ModelError> {
        Ok(Box::new(ConstantModel))
    }
}

pub fn context_with(engine: Arc<dyn ForecastEngine>) -> PipelineContext {
    PipelineContext::new(
        ForecastSettings::default(),
        Arc::new(WindowPolicy::default()),
        engine,
    )
}
