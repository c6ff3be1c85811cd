//! End-to-end forecast pipeline.
//!
//! ```text
//! selector ─► validator ─► normalizer ─► orchestrator ─► window policy/filter ─► response
//! ```
//!
//! The pipeline is split in two phases. [`prepare_request`] does the cheap
//! input checks and never touches the engine, so rejected input cannot consume
//! fit capacity. [`execute`] fits, predicts and applies the window; it is the
//! CPU-bound part and is expected to run on a blocking thread.

use std::sync::Arc;

use log::{debug, info, warn};

use super::response::{serialize_outcome, ForecastOutcome};
use super::window::{filter_window, WindowPolicy};
use super::{normalizer, orchestrator, validator};
use crate::config::ForecastSettings;
use crate::engine::ForecastEngine;
use crate::error::{ForecastError, ForecastResult};
use crate::models::ForecastRequest;

/// Request-scoped configuration handed to the pipeline.
///
/// Built fresh for every request from the shared server state; nothing in it
/// is mutated while the request runs.
#[derive(Clone)]
pub struct PipelineContext {
    pub settings: ForecastSettings,
    pub policy: Arc<WindowPolicy>,
    pub engine: Arc<dyn ForecastEngine>,
}

impl PipelineContext {
    pub fn new(
        settings: ForecastSettings,
        policy: Arc<WindowPolicy>,
        engine: Arc<dyn ForecastEngine>,
    ) -> Self {
        Self {
            settings,
            policy,
            engine,
        }
    }
}

/// Caller-supplied parameters that travel outside the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastParams<'a> {
    /// Forecast-type selector; `None` means occupancy.
    pub forecast_type: Option<&'a str>,
    /// Horizon override in days; `None` uses the configured horizon.
    pub horizon_days: Option<u32>,
}

/// Validate parameters and the raw request body, producing a request ready
/// for fitting.
///
/// Checks run in a fixed order: forecast type, horizon, JSON syntax, payload
/// shape, normalization. The engine is never invoked here.
pub fn prepare_request(
    ctx: &PipelineContext,
    params: ForecastParams<'_>,
    body: &[u8],
) -> ForecastResult<ForecastRequest> {
    let forecast_type = validator::parse_forecast_type(params.forecast_type)?;
    let horizon_days = resolve_horizon(&ctx.settings, params.horizon_days)?;

    let payload = validator::parse_body(body)?;
    let records = validator::validate_payload(&payload, ctx.settings.min_observations)?;
    let series = normalizer::normalize(records)?;

    debug!(
        "prepared {} forecast: {} points, horizon {} days",
        forecast_type,
        series.len(),
        horizon_days
    );
    Ok(ForecastRequest {
        series,
        forecast_type,
        horizon_days,
    })
}

/// Fit, predict, apply the window, and shape the outcome.
pub fn execute(ctx: &PipelineContext, request: &ForecastRequest) -> ForecastResult<ForecastOutcome> {
    let window = ctx.policy.resolve(request.forecast_type)?;
    let predictions =
        orchestrator::forecast(&request.series, request.horizon_days, ctx.engine.as_ref())?;
    let filtered = filter_window(&predictions, &window);

    let outcome = serialize_outcome(&filtered, request.forecast_type, window);
    if outcome.is_no_data() {
        warn!(
            "{} forecast ending {} does not reach window {}",
            request.forecast_type,
            predictions.last().map(|p| p.ds.to_string()).unwrap_or_default(),
            window
        );
    } else {
        info!(
            "{} forecast: {} of {} predictions inside window {}",
            request.forecast_type,
            filtered.len(),
            predictions.len(),
            window
        );
    }
    Ok(outcome)
}

/// Run both phases synchronously.
pub fn run_forecast(
    ctx: &PipelineContext,
    params: ForecastParams<'_>,
    body: &[u8],
) -> ForecastResult<ForecastOutcome> {
    let request = prepare_request(ctx, params, body)?;
    execute(ctx, &request)
}

fn resolve_horizon(settings: &ForecastSettings, requested: Option<u32>) -> ForecastResult<u32> {
    let horizon = requested.unwrap_or(settings.horizon_days);
    if horizon == 0 || horizon > settings.max_horizon_days {
        return Err(ForecastError::validation(format!(
            "horizon_days must be between 1 and {}, got {}",
            settings.max_horizon_days, horizon
        )));
    }
    Ok(horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TrendSeasonalityEngine;
    use serde_json::{json, Value};

    fn context() -> PipelineContext {
        PipelineContext::new(
            ForecastSettings::default(),
            Arc::new(WindowPolicy::default()),
            Arc::new(TrendSeasonalityEngine::default()),
        )
    }

    #[test]
    fn test_resolve_horizon_bounds() {
        let settings = ForecastSettings::default();
        assert_eq!(resolve_horizon(&settings, None).unwrap(), 60);
        assert_eq!(resolve_horizon(&settings, Some(400)).unwrap(), 400);
        assert!(resolve_horizon(&settings, Some(0)).is_err());
        assert!(resolve_horizon(&settings, Some(settings.max_horizon_days + 1)).is_err());
    }

    #[test]
    fn test_unknown_type_checked_before_payload() {
        // Payload is invalid too; the type error must win.
        let err = prepare_request(
            &context(),
            ForecastParams {
                forecast_type: Some("spurious"),
                horizon_days: None,
            },
            b"not json at all",
        )
        .unwrap_err();
        assert_eq!(err.category(), "UNKNOWN_FORECAST_TYPE");
    }

    #[test]
    fn test_prepare_request_defaults() {
        let payload = json!([
            {"ds": "2024-01-02", "y": 2.0},
            {"ds": "2024-01-01", "y": 1.0},
        ]);
        let body = payload.to_string();
        let request =
            prepare_request(&context(), ForecastParams::default(), body.as_bytes()).unwrap();
        assert_eq!(request.horizon_days, 60);
        assert_eq!(request.series.len(), 2);
        assert_eq!(request.forecast_type.as_str(), "occupancy");
    }

    #[test]
    fn test_run_forecast_no_data_for_early_series() {
        let payload: Vec<Value> = (1..=10)
            .map(|d| json!({"ds": format!("2024-01-{:02}", d), "y": d as f64}))
            .collect();
        let body = Value::Array(payload).to_string();
        let outcome =
            run_forecast(&context(), ForecastParams::default(), body.as_bytes()).unwrap();
        assert!(outcome.is_no_data());
    }
}
