//! Guest cart persisted in client storage.
//!
//! Anonymous visitors collect items locally under the `guestCart` key. On
//! sign-in the items are pushed to the server cart (see [`merge`]) and the
//! local cart is cleared.
//!
//! Reads fail soft: an unreadable or corrupt stored cart is treated as empty
//! so that a bad value never blocks browsing.

pub mod merge;

use rust_decimal::Decimal;
use shopfront_core::{CartError, Discount, GuestCart, GuestCartItem, ProductId};
use thiserror::Error;
use tracing::instrument;

use crate::storage::{KeyValueStore, StorageError, keys};

pub use merge::{MergeOutcome, MergeReport};

/// Errors from guest cart mutations.
#[derive(Debug, Error)]
pub enum GuestCartError {
    #[error(transparent)]
    Invalid(#[from] CartError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Guest cart operations over a key-value store.
#[derive(Debug, Clone)]
pub struct GuestCartStore<S> {
    store: S,
}

impl<S: KeyValueStore> GuestCartStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the stored cart. Missing, unreadable, or corrupt data yields an
    /// empty cart.
    #[must_use]
    pub fn load(&self) -> GuestCart {
        match self.try_load() {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable guest cart");
                GuestCart::new()
            }
        }
    }

    fn try_load(&self) -> Result<GuestCart, StorageError> {
        match self.store.get(keys::GUEST_CART)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(GuestCart::new()),
        }
    }

    fn save(&self, cart: &GuestCart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.store.set(keys::GUEST_CART, &raw)
    }

    /// Add units of a product and persist. Returns the new total item count.
    ///
    /// # Errors
    ///
    /// Returns `GuestCartError::Invalid` for a zero quantity or negative price
    /// (nothing is written), or `GuestCartError::Storage` if persisting fails.
    #[instrument(skip(self))]
    pub fn add_item(
        &self,
        product_id: ProductId,
        quantity: u32,
        price: Decimal,
        discount: Discount,
    ) -> Result<u64, GuestCartError> {
        let mut cart = self.load();
        let count = cart.add(product_id, quantity, price, discount)?;
        self.save(&cart)?;
        tracing::debug!(count, "Guest cart updated");
        Ok(count)
    }

    /// Total units across all lines; 0 when nothing can be read.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.load().count()
    }

    #[must_use]
    pub fn items(&self) -> Vec<GuestCartItem> {
        self.load().items().to_vec()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.load().subtotal()
    }

    /// Set a line's quantity (0 removes it). Returns `false` if the product
    /// is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails.
    pub fn set_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<bool, StorageError> {
        let mut cart = self.load();
        if !cart.set_quantity(product_id, quantity) {
            return Ok(false);
        }
        self.save(&cart)?;
        Ok(true)
    }

    /// Remove a line. Returns `false` if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails.
    pub fn remove(&self, product_id: &ProductId) -> Result<bool, StorageError> {
        let mut cart = self.load();
        if !cart.remove(product_id) {
            return Ok(false);
        }
        self.save(&cart)?;
        Ok(true)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored value cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::GUEST_CART)
    }
}
