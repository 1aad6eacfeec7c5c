//! Discounts and price display using decimal arithmetic.
//!
//! Catalog prices are plain decimals in the store currency. A product may carry
//! a percentage discount; the price shown to shoppers is
//! `price * (1 - discount / 100)` rounded to two decimal places, with the
//! original price struck through only when a discount applies.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Error returned when a discount percentage falls outside `0..=100`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("discount must be between 0 and 100 percent (got {0})")]
pub struct DiscountError(pub Decimal);

/// A percentage discount in the range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Discount(Decimal);

impl Discount {
    /// No discount.
    pub const NONE: Self = Self(Decimal::ZERO);

    /// Create a discount, rejecting values outside `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError`] for negative values or values above 100.
    pub fn new(percent: Decimal) -> Result<Self, DiscountError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(DiscountError(percent));
        }
        Ok(Self(percent))
    }

    /// Create a discount, clamping out-of-range values into `0..=100`.
    ///
    /// Used when normalizing backend data, which is not validated upstream.
    #[must_use]
    pub fn clamped(percent: Decimal) -> Self {
        Self(percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// The discount as a percentage.
    #[must_use]
    pub const fn percent(self) -> Decimal {
        self.0
    }

    /// Whether this discount changes the price at all.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Apply the discount to a price, rounding to cents.
    #[must_use]
    pub fn apply(self, price: Decimal) -> Decimal {
        let factor = Decimal::ONE - self.0 / Decimal::ONE_HUNDRED;
        (price * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl TryFrom<Decimal> for Discount {
    type Error = DiscountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Discount> for Decimal {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

/// Pre-formatted price strings for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDisplay {
    /// Price after discount, always two decimals (e.g. `"80.00"`).
    pub current: String,
    /// Original price, present only when a discount applies.
    pub original: Option<String>,
    /// Discount badge text (e.g. `"20%"`), present only when a discount applies.
    pub badge: Option<String>,
}

impl PriceDisplay {
    /// Compute display strings for a price and discount.
    #[must_use]
    pub fn new(price: Decimal, discount: Discount) -> Self {
        let current = format_amount(discount.apply(price));
        if discount.is_active() {
            Self {
                current,
                original: Some(format_amount(price)),
                badge: Some(discount.to_string()),
            }
        } else {
            Self {
                current,
                original: None,
                badge: None,
            }
        }
    }
}

/// Format an amount with exactly two decimal places.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_twenty_percent_off_one_hundred() {
        let display = PriceDisplay::new(dec("100"), Discount::new(dec("20")).unwrap());
        assert_eq!(display.current, "80.00");
        assert_eq!(display.original.as_deref(), Some("100.00"));
        assert_eq!(display.badge.as_deref(), Some("20%"));
    }

    #[test]
    fn test_no_discount_has_no_original_price() {
        let display = PriceDisplay::new(dec("100"), Discount::NONE);
        assert_eq!(display.current, "100.00");
        assert!(display.original.is_none());
        assert!(display.badge.is_none());
    }

    #[test]
    fn test_apply_rounds_half_away_from_zero() {
        // 19.99 * 0.85 = 16.9915
        assert_eq!(Discount::new(dec("15")).unwrap().apply(dec("19.99")), dec("16.99"));
        // 0.05 * 0.5 = 0.025
        assert_eq!(Discount::new(dec("50")).unwrap().apply(dec("0.05")), dec("0.03"));
    }

    #[test]
    fn test_full_discount_is_free() {
        assert_eq!(format_amount(Discount::new(dec("100")).unwrap().apply(dec("42"))), "0.00");
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Discount::new(dec("-1")).is_err());
        assert!(Discount::new(dec("100.5")).is_err());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Discount::clamped(dec("150")).percent(), dec("100"));
        assert_eq!(Discount::clamped(dec("-3")), Discount::NONE);
    }

    #[test]
    fn test_deserialize_from_number() {
        let discount: Discount = serde_json::from_str("12.5").unwrap();
        assert_eq!(discount.percent(), dec("12.5"));
        assert!(serde_json::from_str::<Discount>("250").is_err());
    }
}
