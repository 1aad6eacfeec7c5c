//! Custom Askama template filters.

use std::fmt::Display;

/// Prefixes a preformatted amount with the currency symbol.
///
/// Usage in templates: `{{ product.current_price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${amount}"))
}

/// Singular or plural noun for a count.
///
/// Usage in templates: `{{ count|items }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn items(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    let noun = if count == "1" { "item" } else { "items" };
    Ok(format!("{count} {noun}"))
}
