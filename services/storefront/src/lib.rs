//! services/storefront/src/lib.rs
//!
//! Storefront client: catalog browsing, a persistent cart and user sessions
//! over a DummyJSON-style HTTP service.

pub mod adapters;
pub mod config;
pub mod error;
pub mod storefront;
pub mod stores;
pub mod telemetry;

pub use config::Config;
pub use error::StorefrontError;
pub use storefront::{Services, Storefront};
