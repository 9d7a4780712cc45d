//! services/storefront/src/stores/cart_store.rs
//!
//! Owns the in-memory cart, persists it after every effective mutation and
//! reports each change on the notification channel.

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront_core::cart::{Cart, CartChange, CartLine};
use storefront_core::domain::{Notice, Product, RemoteCart};
use storefront_core::ports::{KeyValueStore, NotificationSink};
use tracing::{info, warn};

use crate::stores::persisted::{decode_cart, encode_cart, CART_KEY};

pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl CartStore {
    /// An empty store; call `restore` to load persisted state.
    pub fn new(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            notifier,
        }
    }

    /// Loads the persisted cart. Any failure leaves the cart empty.
    pub async fn restore(&mut self) {
        self.cart = match self.storage.get(CART_KEY).await {
            Ok(Some(raw)) => match decode_cart(&raw) {
                Ok(cart) => {
                    info!("Restored cart with {} line(s).", cart.len());
                    cart
                }
                Err(e) => {
                    warn!("Discarding malformed persisted cart: {}", e);
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!("Could not read persisted cart: {}", e);
                Cart::new()
            }
        };
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    pub fn total_quantity(&self) -> u64 {
        self.cart.total_quantity()
    }

    pub async fn add_item(&mut self, product: &Product, quantity: u32) {
        let change = self.cart.add(product, quantity);
        self.commit(change).await;
    }

    pub async fn remove_item(&mut self, product_id: u64) {
        let change = self.cart.remove(product_id);
        self.commit(change).await;
    }

    pub async fn set_quantity(&mut self, product_id: u64, quantity: i64) {
        let change = self.cart.set_quantity(product_id, quantity);
        self.commit(change).await;
    }

    pub async fn clear(&mut self) {
        let change = self.cart.clear();
        self.commit(Some(change)).await;
    }

    pub async fn merge(&mut self, lines: impl IntoIterator<Item = CartLine>) {
        let change = self.cart.merge(lines);
        self.commit(change).await;
    }

    /// Folds the lines of a remote cart into the local one.
    pub async fn merge_remote(&mut self, remote: &RemoteCart) {
        self.merge(remote.lines.iter().map(CartLine::from)).await;
    }

    /// Drops the in-memory lines without persisting or notifying.
    /// Used after logout, when the persisted copy is already gone.
    pub fn reset(&mut self) {
        self.cart = Cart::new();
    }

    async fn commit(&mut self, change: Option<CartChange>) {
        let Some(change) = change else {
            return;
        };

        self.persist().await;
        self.notifier.notify(notice_for(&change));
    }

    // Fire-and-forget: a failed write is logged and the in-memory cart stays authoritative.
    async fn persist(&self) {
        let encoded = match encode_cart(&self.cart) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to serialize cart: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(CART_KEY, &encoded).await {
            warn!("Failed to persist cart: {}", e);
        }
    }
}

fn notice_for(change: &CartChange) -> Notice {
    match change {
        CartChange::Added { title } => Notice::new(
            "Added to cart",
            format!("{title} has been added to your cart"),
        ),
        CartChange::QuantityChanged { title, quantity } => Notice::new(
            "Cart updated",
            format!("{title} quantity updated to {quantity}"),
        ),
        CartChange::Removed { title } => Notice::new(
            "Removed from cart",
            format!("{title} has been removed from your cart"),
        ),
        CartChange::Cleared => Notice::new(
            "Cart cleared",
            "All items have been removed from your cart",
        ),
        CartChange::Merged { lines } => Notice::new(
            "Cart synced",
            format!("{lines} item(s) merged into your cart"),
        ),
    }
}
