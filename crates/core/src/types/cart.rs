//! Guest cart model.
//!
//! A guest cart holds items for shoppers without an authenticated session. It
//! is pure data: persistence and merging into the server cart live in the
//! storefront crate.
//!
//! The serialized form is a JSON array of
//! `{"productId", "quantity", "price", "discount"}` objects, one per product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Discount;

/// Errors raised by guest cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Quantities added to a cart must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    /// Prices cannot be negative.
    #[error("price cannot be negative (got {0})")]
    NegativePrice(Decimal),
}

/// A single guest cart line.
///
/// `price` and `discount` are written as exact decimal strings; numeric JSON
/// values are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Discount,
}

impl GuestCartItem {
    /// Discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.discount.apply(self.price) * Decimal::from(self.quantity)
    }
}

/// An ordered collection of guest cart lines, unique by product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestCart {
    items: Vec<GuestCartItem>,
}

impl GuestCart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[GuestCartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of discounted line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(GuestCartItem::line_total).sum()
    }

    /// Add units of a product.
    ///
    /// Increments the existing line when the product is already present, in
    /// which case the stored price and discount are refreshed to the values
    /// given here. Otherwise appends a new line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] for a zero quantity or negative price; the cart is
    /// left unchanged.
    pub fn add(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        price: Decimal,
        discount: Discount,
    ) -> Result<u64, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if price < Decimal::ZERO {
            return Err(CartError::NegativePrice(price));
        }

        match self.items.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(quantity);
                item.price = price;
                item.discount = discount;
            }
            None => self.items.push(GuestCartItem {
                product_id,
                quantity,
                price,
                discount,
            }),
        }

        Ok(self.count())
    }

    /// Set the quantity of a line. A quantity of zero removes it.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        match self.items.iter_mut().find(|item| &item.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if the product is not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
