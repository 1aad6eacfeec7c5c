//! HTML fragments for catalog entities and carts.
//!
//! Rendering is a pure mapping: entity → view (see [`views`]) → compiled
//! Askama template. Templates live under `templates/partials/` and escape
//! all interpolated values.

mod filters;
pub mod views;

use askama::Template;
use shopfront_core::{CategoryId, DepartmentId, FilterState, GuestCart, ProductSort};

use crate::api::{Category, Department, Pagination, Product};
use crate::config::ClientConfig;

pub use views::{
    CartView, CategoryView, DepartmentView, OptionView, PaginationView, ProductView,
    truncate_description,
};

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "partials/product_card.html")]
struct ProductCardTemplate<'a> {
    product: &'a ProductView,
}

#[derive(Template)]
#[template(path = "partials/product_grid.html")]
struct ProductGridTemplate {
    products: Vec<ProductView>,
}

#[derive(Template)]
#[template(path = "partials/product_detail.html")]
struct ProductDetailTemplate {
    product: ProductView,
}

#[derive(Template)]
#[template(path = "partials/department_card.html")]
struct DepartmentCardTemplate {
    department: DepartmentView,
}

#[derive(Template)]
#[template(path = "partials/category_card.html")]
struct CategoryCardTemplate {
    category: CategoryView,
}

#[derive(Template)]
#[template(path = "partials/select_options.html")]
struct SelectOptionsTemplate<'a> {
    placeholder: &'a str,
    options: Vec<OptionView>,
}

#[derive(Template)]
#[template(path = "partials/pagination.html")]
struct PaginationTemplate {
    pagination: PaginationView,
}

#[derive(Template)]
#[template(path = "partials/cart_badge.html")]
struct CartBadgeTemplate {
    count: u64,
}

#[derive(Template)]
#[template(path = "partials/guest_cart.html")]
struct GuestCartTemplate {
    cart: CartView,
}

// =============================================================================
// Renderer
// =============================================================================

/// Renders entities into HTML fragments.
#[derive(Debug, Clone)]
pub struct Renderer {
    placeholder_image: String,
}

impl Renderer {
    #[must_use]
    pub fn new(placeholder_image: impl Into<String>) -> Self {
        Self {
            placeholder_image: placeholder_image.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.placeholder_image.clone())
    }

    #[must_use]
    pub fn product_view(&self, product: &Product) -> ProductView {
        ProductView::new(product, &self.placeholder_image)
    }

    /// Product card for listings.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn product_card(&self, product: &Product) -> askama::Result<String> {
        let product = self.product_view(product);
        ProductCardTemplate { product: &product }.render()
    }

    /// A grid of product cards, or an empty-state message.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn product_grid(&self, products: &[Product]) -> askama::Result<String> {
        ProductGridTemplate {
            products: products.iter().map(|p| self.product_view(p)).collect(),
        }
        .render()
    }

    /// Full product detail section.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn product_detail(&self, product: &Product) -> askama::Result<String> {
        ProductDetailTemplate {
            product: self.product_view(product),
        }
        .render()
    }

    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn department_card(&self, department: &Department) -> askama::Result<String> {
        DepartmentCardTemplate {
            department: DepartmentView::new(department, &self.placeholder_image),
        }
        .render()
    }

    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn category_card(&self, category: &Category) -> askama::Result<String> {
        CategoryCardTemplate {
            category: CategoryView::new(category, &self.placeholder_image),
        }
        .render()
    }

    /// Department dropdown options, with the selected department marked.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn department_options(
        &self,
        departments: &[Department],
        selected: Option<&DepartmentId>,
    ) -> askama::Result<String> {
        SelectOptionsTemplate {
            placeholder: "All Departments",
            options: departments
                .iter()
                .map(|d| OptionView::new(d.id.as_str(), &d.name, selected == Some(&d.id)))
                .collect(),
        }
        .render()
    }

    /// Category dropdown options, with the selected category marked.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn category_options(
        &self,
        categories: &[Category],
        selected: Option<&CategoryId>,
    ) -> askama::Result<String> {
        SelectOptionsTemplate {
            placeholder: "All Categories",
            options: categories
                .iter()
                .map(|c| OptionView::new(c.id.as_str(), &c.name, selected == Some(&c.id)))
                .collect(),
        }
        .render()
    }

    /// Sort dropdown options.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn sort_options(&self, selected: Option<ProductSort>) -> askama::Result<String> {
        SelectOptionsTemplate {
            placeholder: "Sort by",
            options: ProductSort::ALL
                .iter()
                .map(|s| OptionView::new(s.as_str(), s.label(), selected == Some(*s)))
                .collect(),
        }
        .render()
    }

    /// Pagination controls linking to `base_path` with the current filters.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn pagination(
        &self,
        pagination: &Pagination,
        filters: &FilterState,
        base_path: &str,
    ) -> askama::Result<String> {
        PaginationTemplate {
            pagination: PaginationView::new(pagination, filters, base_path),
        }
        .render()
    }

    /// Cart count badge; hidden when the count is zero.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn cart_badge(&self, count: u64) -> askama::Result<String> {
        CartBadgeTemplate { count }.render()
    }

    /// Guest cart table.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn guest_cart(&self, cart: &GuestCart) -> askama::Result<String> {
        GuestCartTemplate {
            cart: CartView::from(cart),
        }
        .render()
    }
}
