//! Display data for templates.
//!
//! Views hold fully precomputed strings and flags so templates contain no
//! logic beyond conditionals and loops.

use shopfront_core::{FilterState, GuestCart, GuestCartItem, PriceDisplay, format_amount};

use crate::api::{Category, Department, EntityRef, Pagination, Product};
use crate::catalog::query;

/// Label shown when a product has no category.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Label shown when a department is absent.
pub const UNKNOWN: &str = "Unknown";
/// Maximum description length on cards, in characters.
pub const EXCERPT_CHARS: usize = 100;

/// Truncate text to `max` characters, appending `...` when anything was cut.
#[must_use]
pub fn truncate_description(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

fn relation_label<Id>(relation: Option<&EntityRef<Id>>, fallback: &str) -> String {
    relation
        .and_then(|r| r.name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn image_or(image: Option<&str>, placeholder: &str) -> String {
    image.unwrap_or(placeholder).to_string()
}

// =============================================================================
// Catalog Views
// =============================================================================

/// Product display data for cards and detail pages.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub href: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub excerpt: String,
    pub department: String,
    pub category: String,
    pub current_price: String,
    pub original_price: String,
    pub discount_badge: String,
    pub has_discount: bool,
    pub in_stock: bool,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, placeholder_image: &str) -> Self {
        let price = PriceDisplay::new(product.price, product.discount);
        let has_discount = price.original.is_some();
        Self {
            id: product.id.to_string(),
            href: format!("/products/{}", product.id),
            name: product.name.clone(),
            image: image_or(product.image.as_deref(), placeholder_image),
            description: product.description.clone(),
            excerpt: truncate_description(&product.description, EXCERPT_CHARS),
            department: relation_label(product.department.as_ref(), UNKNOWN),
            category: relation_label(product.category.as_ref(), UNCATEGORIZED),
            current_price: price.current,
            original_price: price.original.unwrap_or_default(),
            discount_badge: price.badge.unwrap_or_default(),
            has_discount,
            in_stock: product.in_stock(),
        }
    }
}

/// Department card data.
#[derive(Debug, Clone)]
pub struct DepartmentView {
    pub id: String,
    pub href: String,
    pub name: String,
    pub image: String,
    pub excerpt: String,
}

impl DepartmentView {
    #[must_use]
    pub fn new(department: &Department, placeholder_image: &str) -> Self {
        Self {
            id: department.id.to_string(),
            href: format!("/departments/{}", department.id),
            name: department.name.clone(),
            image: image_or(department.image.as_deref(), placeholder_image),
            excerpt: truncate_description(
                department.description.as_deref().unwrap_or_default(),
                EXCERPT_CHARS,
            ),
        }
    }
}

/// Category card data. The link opens the product listing filtered to the
/// category (and its department, when known).
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: String,
    pub href: String,
    pub name: String,
    pub image: String,
    pub excerpt: String,
    pub department: String,
}

impl CategoryView {
    #[must_use]
    pub fn new(category: &Category, placeholder_image: &str) -> Self {
        let mut filters = FilterState::default();
        filters.set_department(category.department.as_ref().and_then(|d| d.id.clone()));
        filters.set_category(Some(category.id.clone()));
        Self {
            id: category.id.to_string(),
            href: query::location("/products", &filters),
            name: category.name.clone(),
            image: image_or(category.image.as_deref(), placeholder_image),
            excerpt: truncate_description(
                category.description.as_deref().unwrap_or_default(),
                EXCERPT_CHARS,
            ),
            department: relation_label(category.department.as_ref(), UNKNOWN),
        }
    }
}

// =============================================================================
// Filter Controls
// =============================================================================

/// One `<option>` in a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl OptionView {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// A numbered page link.
#[derive(Debug, Clone)]
pub struct PageLinkView {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Pagination controls.
#[derive(Debug, Clone)]
pub struct PaginationView {
    pub pages: Vec<PageLinkView>,
    pub has_previous: bool,
    pub previous_href: String,
    pub has_next: bool,
    pub next_href: String,
    pub total_items: u64,
}

/// Page links shown on either side of the current page.
const PAGE_WINDOW: u32 = 2;

impl PaginationView {
    #[must_use]
    pub fn new(pagination: &Pagination, filters: &FilterState, base_path: &str) -> Self {
        let href = |page: u32| {
            let mut target = filters.clone();
            target.set_page(page);
            query::location(base_path, &target)
        };

        let current = pagination.page.max(1);
        let last = pagination.total_pages.max(current);
        let first_shown = current.saturating_sub(PAGE_WINDOW).max(1);
        let last_shown = current.saturating_add(PAGE_WINDOW).min(last);

        Self {
            pages: (first_shown..=last_shown)
                .map(|number| PageLinkView {
                    number,
                    href: href(number),
                    current: number == current,
                })
                .collect(),
            has_previous: pagination.has_previous(),
            previous_href: href(current.saturating_sub(1).max(1)),
            has_next: pagination.has_next(),
            next_href: href(current.saturating_add(1).min(last)),
            total_items: pagination.total_items,
        }
    }

    /// Whether there is more than one page to navigate.
    #[must_use]
    pub fn is_paged(&self) -> bool {
        self.pages.len() > 1
    }
}

// =============================================================================
// Cart Views
// =============================================================================

/// Guest cart line display data.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: String,
    pub original_price: String,
    pub has_discount: bool,
    pub line_total: String,
}

impl From<&GuestCartItem> for CartLineView {
    fn from(item: &GuestCartItem) -> Self {
        let price = PriceDisplay::new(item.price, item.discount);
        Self {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            has_discount: price.original.is_some(),
            unit_price: price.current,
            original_price: price.original.unwrap_or_default(),
            line_total: format_amount(item.line_total()),
        }
    }
}

/// Guest cart display data.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl From<&GuestCart> for CartView {
    fn from(cart: &GuestCart) -> Self {
        Self {
            lines: cart.items().iter().map(CartLineView::from).collect(),
            subtotal: format_amount(cart.subtotal()),
            item_count: cart.count(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::{CategoryId, DepartmentId, Discount, ProductId};

    use super::*;

    fn product(price: i64, discount: i64) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Lamp".to_string(),
            description: "A lamp".to_string(),
            price: Decimal::from(price),
            discount: Discount::new(Decimal::from(discount)).unwrap(),
            image: None,
            department: None,
            category: None,
            stock: None,
        }
    }

    #[test]
    fn test_truncate_description() {
        let long = "x".repeat(150);
        let cut = truncate_description(&long, 100);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("..."));

        let exact = "y".repeat(100);
        assert_eq!(truncate_description(&exact, 100), exact);
        assert_eq!(truncate_description("", 100), "");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(101);
        let cut = truncate_description(&text, 100);
        assert_eq!(cut.chars().count(), 103);
        assert!(cut.starts_with(&"é".repeat(100)));
    }

    #[test]
    fn test_product_view_discount() {
        let view = ProductView::new(&product(100, 20), "/ph.png");
        assert!(view.has_discount);
        assert_eq!(view.current_price, "80.00");
        assert_eq!(view.original_price, "100.00");
        assert_eq!(view.discount_badge, "20%");

        let view = ProductView::new(&product(100, 0), "/ph.png");
        assert!(!view.has_discount);
        assert_eq!(view.current_price, "100.00");
        assert!(view.original_price.is_empty());
    }

    #[test]
    fn test_product_view_fallbacks() {
        let view = ProductView::new(&product(5, 0), "/ph.png");
        assert_eq!(view.image, "/ph.png");
        assert_eq!(view.category, UNCATEGORIZED);
        assert_eq!(view.department, UNKNOWN);

        let mut named = product(5, 0);
        named.image = Some("/img/lamp.jpg".to_string());
        named.category = Some(EntityRef {
            id: Some(CategoryId::new("c1")),
            name: Some("Lighting".to_string()),
        });
        named.department = Some(EntityRef {
            id: Some(DepartmentId::new("d1")),
            name: None,
        });
        let view = ProductView::new(&named, "/ph.png");
        assert_eq!(view.image, "/img/lamp.jpg");
        assert_eq!(view.category, "Lighting");
        assert_eq!(view.department, UNKNOWN);

        named.department = Some(EntityRef {
            id: None,
            name: Some("Office".to_string()),
        });
        assert_eq!(ProductView::new(&named, "/ph.png").department, "Office");
    }

    #[test]
    fn test_category_view_links_to_filtered_listing() {
        let category = Category {
            id: CategoryId::new("c1"),
            name: "Desks".to_string(),
            description: None,
            department: Some(EntityRef {
                id: Some(DepartmentId::new("d1")),
                name: Some("Office".to_string()),
            }),
            image: None,
        };
        let view = CategoryView::new(&category, "/ph.png");
        assert_eq!(
            view.href,
            "/products?page=1&limit=12&departmentId=d1&categoryId=c1"
        );
        assert_eq!(view.department, "Office");
    }

    #[test]
    fn test_pagination_window() {
        let pagination = Pagination {
            page: 5,
            total_pages: 9,
            total_items: 100,
        };
        let view = PaginationView::new(&pagination, &FilterState::default(), "/products");
        let numbers: Vec<u32> = view.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6, 7]);
        assert!(view.pages[2].current);
        assert_eq!(view.previous_href, "/products?page=4&limit=12");
        assert_eq!(view.next_href, "/products?page=6&limit=12");
        assert!(view.is_paged());

        let view = PaginationView::new(&Pagination::single(), &FilterState::default(), "/products");
        assert!(!view.has_previous);
        assert!(!view.has_next);
        assert!(!view.is_paged());
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = GuestCart::new();
        cart.add(
            ProductId::new("p1"),
            2,
            Decimal::from(100),
            Discount::new(Decimal::from(20)).unwrap(),
        )
        .unwrap();
        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "160.00");
        assert_eq!(view.lines[0].unit_price, "80.00");
        assert_eq!(view.lines[0].line_total, "160.00");
        assert!(view.lines[0].has_discount);
    }
}
