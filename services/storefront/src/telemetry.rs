//! services/storefront/src/telemetry.rs
//!
//! Logging setup for hosts embedding the storefront.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::StorefrontError;

/// Installs a global `tracing` subscriber filtered at the configured level.
///
/// Fails if the host already installed one.
pub fn init_tracing(config: &Config) -> Result<(), StorefrontError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| StorefrontError::Internal(format!("failed to install tracing subscriber: {e}")))
}
