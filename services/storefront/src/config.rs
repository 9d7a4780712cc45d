//! services/storefront/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote catalog/auth service, without a trailing slash.
    pub api_base: String,
    /// Directory the file store keeps the cart and token in.
    pub data_dir: PathBuf,
    pub page_size: u32,
    pub notification_ttl: Duration,
    pub http_timeout: Duration,
    /// Forwarded to the login endpoint as `expiresInMins` when set.
    pub token_ttl_mins: Option<u32>,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://dummyjson.com".to_string(),
            data_dir: PathBuf::from("./.storefront"),
            page_size: 20,
            notification_ttl: Duration::from_millis(3000),
            http_timeout: Duration::from_secs(30),
            token_ttl_mins: None,
            log_level: Level::INFO,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base = lookup("STOREFRONT_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);
        if api_base.is_empty() {
            return Err(ConfigError::InvalidValue(
                "STOREFRONT_API_BASE".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let data_dir = lookup("STOREFRONT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let page_size = parse_var(&lookup, "STOREFRONT_PAGE_SIZE")?.unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "STOREFRONT_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let notification_ttl = parse_var(&lookup, "STOREFRONT_NOTIFICATION_TTL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.notification_ttl);

        let http_timeout = parse_var(&lookup, "STOREFRONT_HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        let token_ttl_mins = parse_var(&lookup, "STOREFRONT_TOKEN_TTL_MINS")?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base,
            data_dir,
            page_size,
            notification_ttl,
            http_timeout,
            token_ttl_mins,
            log_level,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
        })
        .transpose()
}
