//! Canonical catalog entities.
//!
//! These types are what the rest of the crate works with. The backend's JSON
//! varies in shape (`_id` vs `id`, nested image uploads, relations embedded or
//! referenced by ID); see [`super::wire`] for the raw shapes and
//! [`super::normalize`] for the mapping.

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{CategoryId, DepartmentId, Discount, ProductId};

// =============================================================================
// Relation Types
// =============================================================================

/// Reference to a related entity.
///
/// A bare-ID reference has no name; an embedded document may carry a name
/// without an ID. At least one of the two is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef<Id> {
    pub id: Option<Id>,
    pub name: Option<String>,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A top-level department (e.g. "Electronics").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
    /// Image URL, if the department has one.
    pub image: Option<String>,
}

/// A category within a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub department: Option<EntityRef<DepartmentId>>,
    pub image: Option<String>,
}

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Undiscounted unit price.
    pub price: Decimal,
    pub discount: Discount,
    pub image: Option<String>,
    pub department: Option<EntityRef<DepartmentId>>,
    pub category: Option<EntityRef<CategoryId>>,
    /// Units in stock, when the backend reports it.
    pub stock: Option<u32>,
}

impl Product {
    /// Price after discount.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        self.discount.apply(self.price)
    }

    /// Whether the product can be added to a cart.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|stock| stock > 0)
    }
}

// =============================================================================
// Listing Types
// =============================================================================

/// Pagination info for a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Total number of pages (at least 1).
    pub total_pages: u32,
    /// Total number of matching items.
    pub total_items: u64,
}

impl Pagination {
    /// A single empty page.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total_items: 0,
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filter values the server reports as available for the current listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub departments: Vec<Department>,
    pub categories: Vec<Category>,
}

/// One page of products plus the filter values to offer next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    pub filters: FilterOptions,
}

/// A department landing page: the department and its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentPage {
    pub department: Department,
    pub categories: Vec<Category>,
}
