//! crates/storefront_core/src/domain.rs
//!
//! Defines the pure, core data structures for the storefront.
//! These structs are independent of any wire or storage format; adapters map
//! their own record types onto them.

use rust_decimal::Decimal;

/// A catalog product as returned by the remote service. Immutable snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    /// Percentage in the range 0-100.
    pub discount_percentage: Decimal,
    pub stock: u32,
    pub rating: Decimal,
    pub category: String,
    pub brand: Option<String>,
    pub thumbnail: String,
    pub images: Vec<String>,
}

/// One page of a product listing or search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

// Represents an authenticated user - no credentials attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub image: String,
}

/// A user together with the bearer token that proves the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

// Only used for login - contains the plain password
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
    pub expires_in_mins: Option<u32>,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expires_in_mins: None,
        }
    }
}

/// A product reference sent to the remote cart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemRef {
    pub product_id: u64,
    pub quantity: u32,
}

/// A user's cart as held by the remote service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteCart {
    pub id: u64,
    pub user_id: u64,
    pub lines: Vec<RemoteCartLine>,
    pub total: Decimal,
    pub discounted_total: Decimal,
    pub total_products: u32,
    pub total_quantity: u32,
}

impl RemoteCart {
    /// The placeholder used when the user has no cart upstream.
    pub fn empty(user_id: u64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCartLine {
    pub product_id: u64,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
    pub discount_percentage: Decimal,
    pub thumbnail: String,
}

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// A user-facing message emitted by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            variant: NoticeVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            ..Self::new(title, description)
        }
    }
}
