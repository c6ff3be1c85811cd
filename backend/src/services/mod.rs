//! Forecast pipeline stages.
//!
//! Each stage is a plain function over request-local data; nothing here keeps
//! state between requests except the [`limiter::FitLimiter`] slots.

pub mod limiter;
pub mod normalizer;
pub mod orchestrator;
pub mod pipeline;
pub mod response;
pub mod validator;
pub mod window;

pub use limiter::FitLimiter;
pub use pipeline::{execute, prepare_request, run_forecast, ForecastParams, PipelineContext};
pub use response::{ForecastOutcome, ForecastValue, NoDataBody};
pub use window::{filter_window, WindowPolicy};
