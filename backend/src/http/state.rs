//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::engine::ForecastEngine;
use crate::services::{FitLimiter, PipelineContext, WindowPolicy};

/// Shared application state passed to all handlers.
///
/// Everything here is read-only after startup apart from the limiter's slots.
#[derive(Clone)]
pub struct AppState {
    /// Validated service configuration
    pub config: Arc<ServiceConfig>,
    /// Forecast type to window table
    pub policy: Arc<WindowPolicy>,
    /// Model capability used for every request
    pub engine: Arc<dyn ForecastEngine>,
    /// Admission control for fits
    pub limiter: FitLimiter,
}

impl AppState {
    /// Create application state from a validated configuration and an engine.
    pub fn new(config: ServiceConfig, engine: Arc<dyn ForecastEngine>) -> Self {
        let policy = Arc::new(config.window_policy());
        let limiter = FitLimiter::from_settings(&config.limits);
        Self {
            config: Arc::new(config),
            policy,
            engine,
            limiter,
        }
    }

    /// Per-request pipeline context.
    pub fn pipeline_context(&self) -> PipelineContext {
        PipelineContext::new(
            self.config.forecast,
            Arc::clone(&self.policy),
            Arc::clone(&self.engine),
        )
    }
}
