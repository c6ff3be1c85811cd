//! Service configuration.
//!
//! Settings come from a TOML file (every key optional) and are then overridden
//! by environment variables. A missing file is not an error; the built-in
//! defaults are port 5000, a 60-day horizon and the January 2025 window for
//! every forecast type.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//!
//! [forecast]
//! horizon_days = 60
//!
//! [limits]
//! max_concurrent_fits = 4
//! admission_timeout_ms = 2000
//! request_timeout_secs = 30
//!
//! [windows.occupancy]
//! start = "2025-01-01"
//! end = "2025-02-01"
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::models::{DateWindow, ForecastType, DEFAULT_HORIZON_DAYS, MIN_OBSERVATIONS};
use crate::services::window::WindowPolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FORECAST_CONFIG";

/// Largest fit concurrency the limiter's semaphore can hold.
pub const MAX_CONCURRENT_FITS: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// Full service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub limits: LimitSettings,
    /// Per-type window overrides, merged over the placeholder table.
    #[serde(default)]
    pub windows: BTreeMap<ForecastType, DateWindow>,
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

/// Forecast horizon and input requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSettings {
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_max_horizon_days")]
    pub max_horizon_days: u32,
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,
}

/// Resource limits for model fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_concurrent_fits")]
    pub max_concurrent_fits: usize,
    #[serde(default = "default_admission_timeout_ms")]
    pub admission_timeout_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_body_limit_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_max_horizon_days() -> u32 {
    3660
}

fn default_min_observations() -> usize {
    MIN_OBSERVATIONS
}

fn default_max_concurrent_fits() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_admission_timeout_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            max_horizon_days: default_max_horizon_days(),
            min_observations: default_min_observations(),
        }
    }
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_concurrent_fits: default_max_concurrent_fits(),
            admission_timeout_ms: default_admission_timeout_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ForecastResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ForecastError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ForecastResult<Self> {
        toml::from_str(content).map_err(|e| {
            ForecastError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Search for `forecast.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn from_default_location() -> ForecastResult<Option<Self>> {
        let search_paths = [
            PathBuf::from("forecast.toml"),
            PathBuf::from("backend/forecast.toml"),
            PathBuf::from("../forecast.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve the configuration the server runs with.
    ///
    /// `FORECAST_CONFIG` names an explicit file (which must exist); otherwise
    /// the default locations are searched, falling back to built-in defaults.
    /// Environment overrides are applied last and the result is validated.
    pub fn load() -> ForecastResult<Self> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                info!("Loading configuration from {} ({})", path, CONFIG_PATH_ENV);
                Self::from_file(path)?
            }
            Err(_) => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Environment Variables
    /// - `HOST`: listen host
    /// - `PORT`: listen port
    /// - `FORECAST_HORIZON_DAYS`: default horizon
    /// - `FORECAST_MAX_CONCURRENT_FITS`: concurrent fit slots
    /// - `FORECAST_REQUEST_TIMEOUT_SECS`: per-request deadline
    pub fn apply_env_overrides(&mut self) -> ForecastResult<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ForecastResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_override(&lookup, "PORT")? {
            self.server.port = port;
        }
        if let Some(horizon) = parse_override(&lookup, "FORECAST_HORIZON_DAYS")? {
            self.forecast.horizon_days = horizon;
        }
        if let Some(fits) = parse_override(&lookup, "FORECAST_MAX_CONCURRENT_FITS")? {
            self.limits.max_concurrent_fits = fits;
        }
        if let Some(secs) = parse_override(&lookup, "FORECAST_REQUEST_TIMEOUT_SECS")? {
            self.limits.request_timeout_secs = secs;
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ForecastResult<()> {
        let f = &self.forecast;
        if f.max_horizon_days == 0 {
            return Err(ForecastError::configuration("forecast.max_horizon_days must be positive"));
        }
        if f.horizon_days == 0 || f.horizon_days > f.max_horizon_days {
            return Err(ForecastError::configuration(format!(
                "forecast.horizon_days must be between 1 and {}, got {}",
                f.max_horizon_days, f.horizon_days
            )));
        }
        if f.min_observations < MIN_OBSERVATIONS {
            return Err(ForecastError::configuration(format!(
                "forecast.min_observations must be at least {}, got {}",
                MIN_OBSERVATIONS, f.min_observations
            )));
        }
        let fits = self.limits.max_concurrent_fits;
        if fits == 0 || fits > MAX_CONCURRENT_FITS {
            return Err(ForecastError::configuration(format!(
                "limits.max_concurrent_fits must be between 1 and {}, got {}",
                MAX_CONCURRENT_FITS, fits
            )));
        }
        if self.limits.request_timeout_secs == 0 {
            return Err(ForecastError::configuration("limits.request_timeout_secs must be positive"));
        }
        let missing = self.window_policy().missing_types();
        if !missing.is_empty() {
            return Err(ForecastError::configuration(format!(
                "no window configured for: {:?}",
                missing
            )));
        }
        Ok(())
    }

    /// Placeholder table with the configured windows applied over it.
    pub fn window_policy(&self) -> WindowPolicy {
        self.windows
            .iter()
            .fold(WindowPolicy::default(), |policy, (t, w)| policy.with_window(*t, *w))
    }

    /// `host:port` listen address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> ForecastResult<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ForecastError::configuration(format!("{} has an invalid value '{}'", key, raw))
        }),
    }
}
