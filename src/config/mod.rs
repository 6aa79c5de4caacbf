use std::env;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

/// Configuration could not be assembled from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for environment variable {key}")]
    Invalid { key: &'static str, value: String },
}

/// API server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_origin: HeaderValue,
    /// Utilization (percent) strictly below which a warehouse is flagged as under-utilized.
    pub under_utilized_threshold: f64,
    /// Utilization (percent) at or above which a storage overload warning is raised.
    pub overload_threshold: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let frontend_url = lookup("FRONTEND_URL")
            .unwrap_or_else(|| "http://localhost:5173".to_string());
        let frontend_origin =
            HeaderValue::from_str(&frontend_url).map_err(|_| ConfigError::Invalid {
                key: "FRONTEND_URL",
                value: frontend_url.clone(),
            })?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            host: lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "BACKEND_PORT", 3000)?,
            frontend_origin,
            under_utilized_threshold: percent_or(&lookup, "UNDER_UTILIZED_THRESHOLD", 20.0)?,
            overload_threshold: percent_or(&lookup, "OVERLOAD_THRESHOLD", 90.0)?,
        })
    }
}

/// Configuration for the polling terminal dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub forecast_service_url: Option<String>,
    pub optimization_service_url: Option<String>,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_secs: u64 = parse_or(&lookup, "POLL_INTERVAL_SECS", 30)?;
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                value: poll_secs.to_string(),
            });
        }
        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Self {
            api_url: lookup("INVENX_API_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            poll_interval: Duration::from_secs(poll_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            forecast_service_url: lookup("FORECAST_SERVICE_URL").filter(|s| !s.is_empty()),
            optimization_service_url: lookup("OPTIMIZATION_SERVICE_URL").filter(|s| !s.is_empty()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn percent_or<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: f64 = parse_or(lookup, key, default)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
