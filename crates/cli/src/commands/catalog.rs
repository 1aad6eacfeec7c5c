//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # List products with filters (mirrors the listing page URL contract)
//! sf-cli products --min-price 10 --max-price 50 --sort price
//!
//! # Resume from a listing URL query string
//! sf-cli products --query "page=2&limit=12&filter=trending"
//!
//! # Render a product card grid as HTML
//! sf-cli products --department d1 --html
//! ```

use std::io::Write;

use clap::Args;
use rust_decimal::Decimal;
use shopfront_core::{CategoryId, DepartmentId, FilterShortcut, FilterState, ProductId, ProductSort};
use shopfront_storefront::StorefrontError;
use shopfront_storefront::api::{CatalogApi, Category, Department, Product};
use shopfront_storefront::catalog::CatalogBrowser;

use super::Context;
use crate::error::CliError;

/// Path listing links point at.
const LISTING_PATH: &str = "/products";

/// Listing filters, named after the listing URL parameters.
#[derive(Debug, Default, Args)]
pub struct ListingArgs {
    /// Start from a listing URL query string; other flags override it
    #[arg(long)]
    pub query: Option<String>,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Department ID
    #[arg(short, long)]
    pub department: Option<String>,

    /// Category ID
    #[arg(short, long)]
    pub category: Option<String>,

    /// Minimum price
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Maximum price
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Sort order (newest, price, -price, name, popular)
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Shortcut filter (trending, discounted, new-arrival)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Page number (1-indexed)
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Products per page
    #[arg(short, long)]
    pub limit: Option<u32>,
}

impl ListingArgs {
    /// Overlay the flags onto a filter state. The page is applied last since
    /// every other setter resets it.
    fn apply(&self, filters: &mut FilterState) {
        if let Some(search) = &self.search {
            filters.set_search(Some(search));
        }
        if let Some(category) = &self.category {
            filters.set_category(Some(CategoryId::new(category.as_str())));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            filters.set_price_range(
                self.min_price.or(filters.min_price()),
                self.max_price.or(filters.max_price()),
            );
        }
        if let Some(sort) = &self.sort {
            let parsed = ProductSort::parse(sort);
            if parsed.is_none() {
                tracing::warn!(sort = %sort, "Ignoring unknown sort order");
            }
            filters.set_sort(parsed);
        }
        if let Some(filter) = &self.filter {
            let parsed = FilterShortcut::parse(filter);
            if parsed.is_none() {
                tracing::warn!(filter = %filter, "Ignoring unknown filter shortcut");
            }
            filters.set_shortcut(parsed);
        }
        if let Some(limit) = self.limit {
            filters.set_limit(limit);
        }
        if let Some(page) = self.page {
            filters.set_page(page);
        }
    }
}

/// `products`: one page of the product listing.
///
/// # Errors
///
/// Returns an error if the listing request or rendering fails.
pub async fn products<W: Write>(
    ctx: &Context,
    args: &ListingArgs,
    html: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let mut browser = CatalogBrowser::new(
        ctx.api.clone(),
        LISTING_PATH,
        args.query.as_deref().unwrap_or_default(),
        ctx.config.page_size,
    );

    // Department first: selecting it clears the category and refreshes the
    // category options scoped to it.
    if let Some(department) = &args.department {
        if let Err(e) = browser
            .select_department(Some(DepartmentId::new(department.as_str())))
            .await
        {
            tracing::warn!(error = %e, "Failed to refresh categories for department");
        }
    }
    args.apply(browser.filters_mut());

    let listing = browser.load().await?;

    if html {
        let grid = ctx
            .renderer
            .product_grid(&listing.products)
            .map_err(StorefrontError::from)?;
        let pagination = ctx
            .renderer
            .pagination(&listing.pagination, browser.filters(), LISTING_PATH)
            .map_err(StorefrontError::from)?;
        writeln!(out, "{grid}")?;
        writeln!(out, "{pagination}")?;
        return Ok(());
    }

    writeln!(out, "{}", browser.location())?;
    if listing.products.is_empty() {
        writeln!(out, "No products found.")?;
    }
    for product in &listing.products {
        write_product_line(ctx, product, out)?;
    }
    writeln!(
        out,
        "Page {} of {} ({} items)",
        listing.pagination.page, listing.pagination.total_pages, listing.pagination.total_items
    )?;

    let options = browser.options();
    if !options.categories.is_empty() {
        let names: Vec<&str> = options.categories.iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "Categories: {}", names.join(", "))?;
    }
    Ok(())
}

/// `product <id>`: product detail.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched or rendered.
pub async fn product<W: Write>(
    ctx: &Context,
    id: &str,
    html: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let product = ctx.api.get_product(&ProductId::new(id)).await?;

    if html {
        let detail = ctx
            .renderer
            .product_detail(&product)
            .map_err(StorefrontError::from)?;
        writeln!(out, "{detail}")?;
        return Ok(());
    }

    let view = ctx.renderer.product_view(&product);
    writeln!(out, "{} ({})", view.name, view.id)?;
    writeln!(out, "  {} / {}", view.department, view.category)?;
    if view.has_discount {
        writeln!(
            out,
            "  ${} (was ${}, -{})",
            view.current_price, view.original_price, view.discount_badge
        )?;
    } else {
        writeln!(out, "  ${}", view.current_price)?;
    }
    if !view.in_stock {
        writeln!(out, "  Out of stock")?;
    }
    if !view.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", view.description)?;
    }
    Ok(())
}

/// `department <id>`: a department and its categories.
///
/// # Errors
///
/// Returns an error if the department cannot be fetched or rendered.
pub async fn department<W: Write>(
    ctx: &Context,
    id: &str,
    html: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let page = ctx.api.get_department(&DepartmentId::new(id)).await?;

    if html {
        write_department_cards(ctx, std::slice::from_ref(&page.department), out)?;
        write_category_cards(ctx, &page.categories, out)?;
        return Ok(());
    }

    writeln!(out, "{} ({})", page.department.name, page.department.id)?;
    if let Some(description) = &page.department.description {
        writeln!(out, "  {description}")?;
    }
    write_category_lines(&page.categories, out)
}

/// `departments`: every department.
///
/// # Errors
///
/// Returns an error if the request or rendering fails.
pub async fn departments<W: Write>(ctx: &Context, html: bool, out: &mut W) -> Result<(), CliError> {
    let departments = ctx.api.list_departments().await?;

    if html {
        return write_department_cards(ctx, &departments, out);
    }
    for department in &departments {
        writeln!(out, "{}\t{}", department.id, department.name)?;
    }
    Ok(())
}

/// `categories`: all categories, or those of one department.
///
/// # Errors
///
/// Returns an error if the request or rendering fails.
pub async fn categories<W: Write>(
    ctx: &Context,
    department: Option<&str>,
    html: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let department = department.map(DepartmentId::new);
    let categories = ctx.api.list_categories(department.as_ref()).await?;

    if html {
        return write_category_cards(ctx, &categories, out);
    }
    write_category_lines(&categories, out)
}

// =============================================================================
// Output Helpers
// =============================================================================

fn write_product_line<W: Write>(ctx: &Context, product: &Product, out: &mut W) -> Result<(), CliError> {
    let view = ctx.renderer.product_view(product);
    let price = if view.has_discount {
        format!("${} (was ${})", view.current_price, view.original_price)
    } else {
        format!("${}", view.current_price)
    };
    writeln!(
        out,
        "{}\t{}\t{}\t{} / {}",
        view.id, view.name, price, view.department, view.category
    )?;
    Ok(())
}

fn write_category_lines<W: Write>(categories: &[Category], out: &mut W) -> Result<(), CliError> {
    if categories.is_empty() {
        writeln!(out, "No categories.")?;
    }
    for category in categories {
        writeln!(out, "{}\t{}", category.id, category.name)?;
    }
    Ok(())
}

fn write_department_cards<W: Write>(
    ctx: &Context,
    departments: &[Department],
    out: &mut W,
) -> Result<(), CliError> {
    for department in departments {
        let card = ctx
            .renderer
            .department_card(department)
            .map_err(StorefrontError::from)?;
        writeln!(out, "{card}")?;
    }
    Ok(())
}

fn write_category_cards<W: Write>(
    ctx: &Context,
    categories: &[Category],
    out: &mut W,
) -> Result<(), CliError> {
    for category in categories {
        let card = ctx
            .renderer
            .category_card(category)
            .map_err(StorefrontError::from)?;
        writeln!(out, "{card}")?;
    }
    Ok(())
}
