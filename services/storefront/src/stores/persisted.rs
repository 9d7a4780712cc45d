//! services/storefront/src/stores/persisted.rs
//!
//! Storage keys and the on-disk shape of persisted state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::cart::{Cart, CartLine};

pub const CART_KEY: &str = "cart";
pub const TOKEN_KEY: &str = "access_token";

// Derived totals are not stored; they are recomputed from price and quantity.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLineRecord {
    id: u64,
    title: String,
    price: Decimal,
    quantity: u32,
    #[serde(default)]
    discount_percentage: Decimal,
    #[serde(default)]
    thumbnail: String,
}

impl CartLineRecord {
    fn from_domain(line: &CartLine) -> Self {
        Self {
            id: line.product_id,
            title: line.title.clone(),
            price: line.price,
            quantity: line.quantity,
            discount_percentage: line.discount_percentage,
            thumbnail: line.thumbnail.clone(),
        }
    }

    fn to_domain(self) -> CartLine {
        CartLine {
            product_id: self.id,
            title: self.title,
            price: self.price,
            quantity: self.quantity,
            discount_percentage: self.discount_percentage,
            thumbnail: self.thumbnail,
        }
    }
}

pub fn encode_cart(cart: &Cart) -> Result<String, serde_json::Error> {
    let records: Vec<CartLineRecord> = cart.lines().iter().map(CartLineRecord::from_domain).collect();
    serde_json::to_string(&records)
}

/// Parses a persisted cart. The result is normalised, so duplicated or
/// zero-quantity entries written by older builds do not break invariants.
/// Lines with a negative or overflowing price are dropped and discounts are
/// clamped to 0-100.
pub fn decode_cart(raw: &str) -> Result<Cart, serde_json::Error> {
    let records: Vec<CartLineRecord> = serde_json::from_str(raw)?;
    Ok(Cart::from_lines(records.into_iter().map(CartLineRecord::to_domain)))
}
