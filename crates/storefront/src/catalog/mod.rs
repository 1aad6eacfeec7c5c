//! Catalog browsing: filter state, listing requests, and filter options.
//!
//! A [`CatalogBrowser`] owns the state a listing page keeps between requests:
//! the current filters, the visible location (what the address bar shows),
//! and the options offered in the department and category dropdowns.
//!
//! Failed requests leave all of that untouched.

pub mod query;

use shopfront_core::{CategoryId, DepartmentId, FilterShortcut, FilterState};
use tracing::instrument;

use crate::api::{ApiError, CatalogApi, FilterOptions, ProductListing};

/// Listing page state bound to a catalog backend.
pub struct CatalogBrowser<A> {
    api: A,
    base_path: String,
    filters: FilterState,
    location: String,
    options: FilterOptions,
}

impl<A: CatalogApi> CatalogBrowser<A> {
    /// Start browsing from a page URL.
    ///
    /// `base_path` is the listing page path (e.g. `/products`) and `query` the
    /// page's current query string, from which the initial filters (including
    /// the `filter` shortcut) are restored.
    pub fn new(api: A, base_path: impl Into<String>, query: &str, page_size: u32) -> Self {
        let base_path = base_path.into();
        let filters = query::decode(query, page_size);
        let location = query::location(&base_path, &filters);
        Self {
            api,
            base_path,
            filters,
            location,
            options: FilterOptions::default(),
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Mutable access to the filters, for controls without a dedicated method.
    pub const fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// The location of the last successfully loaded listing.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Options for the department and category dropdowns.
    #[must_use]
    pub const fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// The active filter shortcut, if any.
    #[must_use]
    pub const fn shortcut(&self) -> Option<FilterShortcut> {
        self.filters.shortcut()
    }

    /// Fetch the initial dropdown options: all departments, plus categories
    /// for the selected department (or all categories).
    ///
    /// # Errors
    ///
    /// Returns the API error; options are unchanged on failure.
    #[instrument(skip(self))]
    pub async fn load_options(&mut self) -> Result<(), ApiError> {
        let departments = self.api.list_departments().await?;
        let categories = self
            .api
            .list_categories(self.filters.department_id())
            .await?;
        self.options = FilterOptions {
            departments,
            categories,
        };
        Ok(())
    }

    /// Request the listing for the current filters.
    ///
    /// On success, the location is rewritten to match the issued query and
    /// non-empty filter options echoed by the server replace the current ones.
    ///
    /// # Errors
    ///
    /// Returns the API error; location and options are unchanged on failure.
    #[instrument(skip(self), fields(location = %self.location))]
    pub async fn load(&mut self) -> Result<ProductListing, ApiError> {
        let listing = self.api.list_products(&self.filters).await?;

        self.location = query::location(&self.base_path, &self.filters);
        if !listing.filters.departments.is_empty() {
            self.options
                .departments
                .clone_from(&listing.filters.departments);
        }
        if !listing.filters.categories.is_empty() {
            self.options
                .categories
                .clone_from(&listing.filters.categories);
        }

        tracing::debug!(
            products = listing.products.len(),
            page = listing.pagination.page,
            total_pages = listing.pagination.total_pages,
            "Listing loaded"
        );
        Ok(listing)
    }

    /// Change the department selection and refresh the category options
    /// scoped to it.
    ///
    /// The selected category is cleared and the page resets to one. The
    /// filter change sticks even if the category refresh fails.
    ///
    /// # Errors
    ///
    /// Returns the API error from the category refresh.
    #[instrument(skip(self))]
    pub async fn select_department(
        &mut self,
        department: Option<DepartmentId>,
    ) -> Result<(), ApiError> {
        self.filters.set_department(department);
        let categories = self
            .api
            .list_categories(self.filters.department_id())
            .await?;
        self.options.categories = categories;
        Ok(())
    }

    /// Change the category selection.
    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.filters.set_category(category);
    }

    /// Move to a page and load it.
    ///
    /// # Errors
    ///
    /// Returns the API error from the listing request.
    pub async fn go_to_page(&mut self, page: u32) -> Result<ProductListing, ApiError> {
        self.filters.set_page(page);
        self.load().await
    }
}
