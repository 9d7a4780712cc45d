//! services/storefront/src/error.rs
//!
//! Defines the primary error type for the storefront client.

use crate::config::ConfigError;
use storefront_core::ports::PortError;

/// The primary error type for the `storefront` library.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error building the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., creating the data directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation needs a logged-in user.
    #[error("No user is logged in")]
    NotAuthenticated,

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
