//! # Occupancy Forecast Backend
//!
//! Forecasting service for hotel occupancy and event counts.
//!
//! A caller posts a historical daily series (`[{ds, y}, ...]`) and a forecast
//! type; the service fits a model, predicts over history plus a future
//! horizon, and returns the predictions that fall inside the date window
//! configured for that forecast type.
//!
//! ## Architecture
//!
//! - [`models`]: Domain types (observations, series, forecast points, windows)
//! - [`services`]: Pipeline stages: validation, normalization, orchestration,
//!   window policy, response shaping, and fit admission control
//! - [`engine`]: The model capability (`fit` / `predict`) and the default engine
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`api`]: Public DTO surface
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use occupancy_forecast::config::ForecastSettings;
//! use occupancy_forecast::engine::TrendSeasonalityEngine;
//! use occupancy_forecast::services::{run_forecast, ForecastOutcome, ForecastParams, PipelineContext, WindowPolicy};
//!
//! let ctx = PipelineContext::new(
//!     ForecastSettings::default(),
//!     Arc::new(WindowPolicy::default()),
//!     Arc::new(TrendSeasonalityEngine::default()),
//! );
//! let body = br#"[{"ds": "2024-12-01", "y": 40.0}, {"ds": "2024-12-15", "y": 55.0}]"#;
//! let outcome = run_forecast(&ctx, ForecastParams::default(), body).unwrap();
//! match outcome {
//!     ForecastOutcome::Points(values) => assert_eq!(values.len(), 31),
//!     ForecastOutcome::NoData(_) => unreachable!(),
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ForecastError, ForecastResult};
