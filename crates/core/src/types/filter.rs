//! Catalog listing filter state.
//!
//! A [`FilterState`] is transient: it is rebuilt from the filter controls and
//! the current listing URL on every request. It produces an ordered list of
//! query parameters; URL encoding happens in the storefront crate.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, DepartmentId};

/// Predefined product filters the backend interprets server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterShortcut {
    Trending,
    Discounted,
    #[serde(alias = "new")]
    NewArrival,
}

impl FilterShortcut {
    /// All shortcuts, in display order.
    pub const ALL: [Self; 3] = [Self::Trending, Self::Discounted, Self::NewArrival];

    /// Query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Discounted => "discounted",
            Self::NewArrival => "new-arrival",
        }
    }

    /// Heading shown above a shortcut listing.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Trending => "Trending Products",
            Self::Discounted => "Discounted Products",
            Self::NewArrival => "New Arrivals",
        }
    }

    /// Parse a query parameter value. `new` is accepted as an alias.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "trending" => Some(Self::Trending),
            "discounted" => Some(Self::Discounted),
            "new-arrival" | "new" => Some(Self::NewArrival),
            _ => None,
        }
    }
}

impl fmt::Display for FilterShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing sort orders understood by the products endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
    Popular,
}

impl ProductSort {
    /// All sort orders, in display order.
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Name,
        Self::Popular,
    ];

    /// Query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
            Self::Name => "name",
            Self::Popular => "popular",
        }
    }

    /// Label for the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::Name => "Name",
            Self::Popular => "Most Popular",
        }
    }

    /// Parse a query parameter value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "newest" => Some(Self::Newest),
            "price" => Some(Self::PriceAsc),
            "-price" => Some(Self::PriceDesc),
            "name" => Some(Self::Name),
            "popular" => Some(Self::Popular),
            _ => None,
        }
    }
}

/// Query parameter names, in canonical order.
pub mod params {
    pub const PAGE: &str = "page";
    pub const LIMIT: &str = "limit";
    pub const SEARCH: &str = "search";
    pub const DEPARTMENT_ID: &str = "departmentId";
    pub const CATEGORY_ID: &str = "categoryId";
    pub const MIN_PRICE: &str = "minPrice";
    pub const MAX_PRICE: &str = "maxPrice";
    pub const SORT: &str = "sort";
    pub const FILTER: &str = "filter";
}

/// Filter and pagination state for a product listing request.
///
/// Invariants: `page >= 1`, `limit >= 1`, prices are non-negative and
/// `min_price <= max_price` when both are set. Every setter other than
/// [`FilterState::set_page`] returns to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search: Option<String>,
    department_id: Option<DepartmentId>,
    category_id: Option<CategoryId>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    sort: Option<ProductSort>,
    shortcut: Option<FilterShortcut>,
    page: u32,
    limit: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

impl FilterState {
    /// Products per page when not configured otherwise.
    pub const DEFAULT_LIMIT: u32 = 12;

    /// Create an unfiltered first-page state with the given page size.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            search: None,
            department_id: None,
            category_id: None,
            min_price: None,
            max_price: None,
            sort: None,
            shortcut: None,
            page: 1,
            limit: limit.max(1),
        }
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub const fn department_id(&self) -> Option<&DepartmentId> {
        self.department_id.as_ref()
    }

    #[must_use]
    pub const fn category_id(&self) -> Option<&CategoryId> {
        self.category_id.as_ref()
    }

    #[must_use]
    pub const fn min_price(&self) -> Option<Decimal> {
        self.min_price
    }

    #[must_use]
    pub const fn max_price(&self) -> Option<Decimal> {
        self.max_price
    }

    #[must_use]
    pub const fn sort(&self) -> Option<ProductSort> {
        self.sort
    }

    #[must_use]
    pub const fn shortcut(&self) -> Option<FilterShortcut> {
        self.shortcut
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Set the search text. Blank text clears the search.
    pub fn set_search(&mut self, search: Option<&str>) {
        self.search = non_blank(search);
        self.page = 1;
    }

    /// Select a department. Any selected category is cleared, since category
    /// options are scoped to the department.
    pub fn set_department(&mut self, department_id: Option<DepartmentId>) {
        self.department_id = department_id.filter(|id| !id.as_str().trim().is_empty());
        self.category_id = None;
        self.page = 1;
    }

    /// Select a category.
    pub fn set_category(&mut self, category_id: Option<CategoryId>) {
        self.category_id = category_id.filter(|id| !id.as_str().trim().is_empty());
        self.page = 1;
    }

    /// Set the price range. Negative bounds are dropped and an inverted range
    /// is swapped.
    pub fn set_price_range(&mut self, min: Option<Decimal>, max: Option<Decimal>) {
        let min = min.filter(|p| *p >= Decimal::ZERO);
        let max = max.filter(|p| *p >= Decimal::ZERO);
        (self.min_price, self.max_price) = match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
            other => other,
        };
        self.page = 1;
    }

    /// Set the sort order.
    pub fn set_sort(&mut self, sort: Option<ProductSort>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Set the filter shortcut.
    pub fn set_shortcut(&mut self, shortcut: Option<FilterShortcut>) {
        self.shortcut = shortcut;
        self.page = 1;
    }

    /// Set the page size. Sizes below one are treated as one.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.page = 1;
    }

    /// Move to a page. Page numbers below one are treated as one.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Whether any filter (not pagination) is applied.
    #[must_use]
    pub const fn has_filters(&self) -> bool {
        self.search.is_some()
            || self.department_id.is_some()
            || self.category_id.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.sort.is_some()
            || self.shortcut.is_some()
    }

    /// Ordered query parameters. `page` and `limit` are always present; every
    /// other parameter is omitted when unset.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (params::PAGE, self.page.to_string()),
            (params::LIMIT, self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push((params::SEARCH, search.clone()));
        }
        if let Some(id) = &self.department_id {
            pairs.push((params::DEPARTMENT_ID, id.to_string()));
        }
        if let Some(id) = &self.category_id {
            pairs.push((params::CATEGORY_ID, id.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push((params::MIN_PRICE, min.normalize().to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push((params::MAX_PRICE, max.normalize().to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push((params::SORT, sort.as_str().to_owned()));
        }
        if let Some(shortcut) = self.shortcut {
            pairs.push((params::FILTER, shortcut.as_str().to_owned()));
        }
        pairs
    }

    /// Rebuild a state from decoded query parameters.
    ///
    /// Unknown keys and unparsable values are ignored; a missing or invalid
    /// page becomes page one.
    #[must_use]
    pub fn from_pairs<'a, I>(pairs: I, default_limit: u32) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = Self::new(default_limit);
        let mut page = 1;
        let (mut min, mut max) = (None, None);

        for (key, value) in pairs {
            let value = value.trim();
            match key {
                params::PAGE => page = value.parse().unwrap_or(1),
                params::LIMIT => {
                    if let Ok(limit) = value.parse::<u32>() {
                        state.limit = limit.max(1);
                    }
                }
                params::SEARCH => state.search = non_blank(Some(value)),
                params::DEPARTMENT_ID if !value.is_empty() => {
                    state.department_id = Some(DepartmentId::new(value));
                }
                params::CATEGORY_ID if !value.is_empty() => {
                    state.category_id = Some(CategoryId::new(value));
                }
                params::MIN_PRICE => min = Decimal::from_str(value).ok(),
                params::MAX_PRICE => max = Decimal::from_str(value).ok(),
                params::SORT => state.sort = ProductSort::parse(value),
                params::FILTER => state.shortcut = FilterShortcut::parse(value),
                _ => {}
            }
        }

        state.set_price_range(min, max);
        state.set_page(page);
        state
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
