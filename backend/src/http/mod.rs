//! HTTP server module for the forecast service.
//!
//! This module provides an axum-based HTTP server that exposes the forecast
//! pipeline as a REST API. Handlers only translate between the wire and the
//! service layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query/body extraction                                  │
//! │  - JSON serialization, status codes                       │
//! │  - CORS, compression, tracing                             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Validation, normalization, window policy               │
//! │  - FitLimiter admission control                           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Model capability (engine/)                               │
//! │  - ForecastEngine::fit / FittedModel::predict             │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
