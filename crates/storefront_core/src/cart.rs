//! crates/storefront_core/src/cart.rs
//!
//! The cart reducer. A `Cart` is an ordered list of lines, unique by product id.
//! Every mutation reports what actually changed so the owning store can decide
//! whether to persist and what to tell the user.

use rust_decimal::Decimal;

use crate::domain::{CartItemRef, Product, RemoteCartLine};

/// One product entry in the cart.
///
/// Price and discount are snapshotted when the line is created; later catalog
/// changes do not reach lines that already exist.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: u64,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
    pub discount_percentage: Decimal,
    pub thumbnail: String,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
            quantity,
            discount_percentage: product.discount_percentage,
            thumbnail: product.thumbnail.clone(),
        }
    }

    /// Checks a line coming from outside the cart (storage, remote cart, catalog).
    ///
    /// Lines with a zero quantity, a negative price or a `price × quantity`
    /// that does not fit a `Decimal` are rejected. The discount is clamped to
    /// 0-100.
    pub fn sanitized(mut self) -> Option<Self> {
        if self.quantity == 0 || self.price.is_sign_negative() {
            return None;
        }
        self.price.checked_mul(Decimal::from(self.quantity))?;
        self.discount_percentage = self
            .discount_percentage
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        Some(self)
    }

    /// `price × quantity`, before discount. Saturates instead of overflowing.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// `line_total × (1 − discount / 100)`.
    pub fn discounted_line_total(&self) -> Decimal {
        let factor = Decimal::ONE - self.discount_percentage / Decimal::ONE_HUNDRED;
        self.line_total().saturating_mul(factor)
    }
}

impl From<&RemoteCartLine> for CartLine {
    fn from(line: &RemoteCartLine) -> Self {
        Self {
            product_id: line.product_id,
            title: line.title.clone(),
            price: line.price,
            quantity: line.quantity,
            discount_percentage: line.discount_percentage,
            thumbnail: line.thumbnail.clone(),
        }
    }
}

/// The effect of a cart mutation that changed something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    Added { title: String },
    QuantityChanged { title: String, quantity: u32 },
    Removed { title: String },
    Cleared,
    Merged { lines: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from untrusted lines, collapsing duplicates and dropping
    /// zero-quantity entries.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        cart.merge(lines);
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` of `product`, incrementing an existing line if there is one.
    /// A quantity of zero changes nothing.
    /// A product with a negative price is refused.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Option<CartChange> {
        if quantity == 0 {
            return None;
        }

        match self.line_mut(product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                Some(CartChange::QuantityChanged {
                    title: line.title.clone(),
                    quantity: line.quantity,
                })
            }
            None => {
                let line = CartLine::from_product(product, quantity).sanitized()?;
                self.lines.push(line);
                Some(CartChange::Added {
                    title: product.title.clone(),
                })
            }
        }
    }

    pub fn remove(&mut self, product_id: u64) -> Option<CartChange> {
        let index = self
            .lines
            .iter()
            .position(|line| line.product_id == product_id)?;
        let removed = self.lines.remove(index);
        Some(CartChange::Removed {
            title: removed.title,
        })
    }

    /// Replaces a line's quantity. Anything `<= 0` removes the line.
    pub fn set_quantity(&mut self, product_id: u64, quantity: i64) -> Option<CartChange> {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = self.line_mut(product_id)?;
        line.quantity = quantity;
        Some(CartChange::QuantityChanged {
            title: line.title.clone(),
            quantity,
        })
    }

    pub fn clear(&mut self) -> CartChange {
        self.lines.clear();
        CartChange::Cleared
    }

    /// Folds `incoming` into the cart: quantities are summed for products
    /// already present, new products are appended in order. Lines failing
    /// `CartLine::sanitized` are skipped.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = CartLine>) -> Option<CartChange> {
        let mut merged = 0;
        for line in incoming {
            let Some(line) = line.sanitized() else {
                continue;
            };
            match self.line_mut(line.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => self.lines.push(line),
            }
            merged += 1;
        }

        (merged > 0).then_some(CartChange::Merged { lines: merged })
    }

    /// Sum of every line's discounted total.
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::discounted_line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of every line's undiscounted total.
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn item_refs(&self) -> Vec<CartItemRef> {
        self.lines
            .iter()
            .map(|line| CartItemRef {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect()
    }

    fn line_mut(&mut self, product_id: u64) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}
