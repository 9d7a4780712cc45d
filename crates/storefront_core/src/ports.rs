//! crates/storefront_core/src/ports.rs
//!
//! Defines the service contracts (traits) the storefront depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! stores independent of the concrete HTTP client and storage backend.

use async_trait::async_trait;

use crate::domain::{
    CartItemRef, LoginCredentials, Notice, Product, ProductPage, RemoteCart, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (network, disk).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Request failed: {0}")]
    Network(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_products(&self, skip: u64, limit: u64) -> PortResult<ProductPage>;

    async fn search_products(&self, query: &str, skip: u64, limit: u64)
        -> PortResult<ProductPage>;

    async fn get_product(&self, id: u64) -> PortResult<Product>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a user and its bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> PortResult<(User, String)>;

    /// Resolves the user a bearer token belongs to.
    async fn current_user(&self, token: &str) -> PortResult<User>;
}

#[async_trait]
pub trait RemoteCartService: Send + Sync {
    /// Returns the user's first remote cart, or `RemoteCart::empty` if none exists.
    async fn user_cart(&self, user_id: u64, token: &str) -> PortResult<RemoteCart>;

    async fn add_to_cart(
        &self,
        user_id: u64,
        items: &[CartItemRef],
        token: &str,
    ) -> PortResult<RemoteCart>;
}

/// String blobs persisted between runs, keyed by name.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// Receives user-facing messages from the stores.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}
