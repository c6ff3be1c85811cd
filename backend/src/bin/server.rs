//! Forecast HTTP Server Binary
//!
//! Loads configuration, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin forecast-server
//!
//! # Explicit config file and port
//! FORECAST_CONFIG=forecast.toml PORT=8080 cargo run --bin forecast-server
//! ```
//!
//! # Environment Variables
//!
//! - `FORECAST_CONFIG`: Path to a TOML config file (default: search `forecast.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `FORECAST_HORIZON_DAYS`, `FORECAST_MAX_CONCURRENT_FITS`,
//!   `FORECAST_REQUEST_TIMEOUT_SECS`: see `ServiceConfig::apply_env_overrides`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use occupancy_forecast::config::ServiceConfig;
use occupancy_forecast::engine::TrendSeasonalityEngine;
use occupancy_forecast::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting forecast HTTP server");

    let config = ServiceConfig::load()?;
    for (forecast_type, window) in config.window_policy().entries() {
        info!("Window for {}: {}", forecast_type, window);
    }
    info!(
        "Horizon {} days, {} concurrent fits, {}s request timeout",
        config.forecast.horizon_days,
        config.limits.max_concurrent_fits,
        config.limits.request_timeout_secs
    );

    let addr: SocketAddr = config.bind_address().parse()?;

    let state = AppState::new(config, Arc::new(TrendSeasonalityEngine::default()));
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
