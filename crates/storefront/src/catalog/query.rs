//! Listing query strings.
//!
//! The canonical query string lists `page` and `limit` first and then only the
//! filters that are set, in a fixed order:
//! `page, limit, search, departmentId, categoryId, minPrice, maxPrice, sort, filter`.

use shopfront_core::{FilterShortcut, FilterState};
use url::form_urlencoded;

/// Encode a filter state as a canonical query string (without the `?`).
#[must_use]
pub fn encode(filters: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in filters.query_pairs() {
        serializer.append_pair(key, &value);
    }
    serializer.finish()
}

/// Decode a query string (with or without a leading `?`) into a filter state.
#[must_use]
pub fn decode(query: &str, default_limit: u32) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    FilterState::from_pairs(
        pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        default_limit,
    )
}

/// Read only the `filter` shortcut from a page URL's query string.
#[must_use]
pub fn shortcut(query: &str) -> Option<FilterShortcut> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "filter")
        .and_then(|(_, value)| FilterShortcut::parse(&value))
}

/// The visible page location for a filter state, e.g. `/products?page=2&limit=12`.
#[must_use]
pub fn location(base_path: &str, filters: &FilterState) -> String {
    format!("{base_path}?{}", encode(filters))
}
