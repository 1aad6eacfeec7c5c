//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod filter;
pub mod id;
pub mod price;

pub use cart::{CartError, GuestCart, GuestCartItem};
pub use email::{Email, EmailError};
pub use filter::{FilterShortcut, FilterState, ProductSort};
pub use id::*;
pub use price::{Discount, DiscountError, PriceDisplay, format_amount};
