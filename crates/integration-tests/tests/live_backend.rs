//! Smoke tests against a running backend.
//!
//! Point `SHOPFRONT_API_URL` at the backend and run with `--ignored`.

#![allow(clippy::unwrap_used)]

use shopfront_storefront::api::{ApiClient, CatalogApi};
use shopfront_storefront::catalog::CatalogBrowser;
use shopfront_storefront::config::ClientConfig;

fn client() -> ApiClient {
    ApiClient::new(&ClientConfig::from_env().unwrap()).unwrap()
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_departments_load() {
    let departments = client().list_departments().await.unwrap();
    assert!(departments.iter().all(|d| !d.id.as_str().is_empty()));
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_first_listing_page() {
    let mut browser = CatalogBrowser::new(client(), "/products", "", 12);
    let listing = browser.load().await.unwrap();

    assert_eq!(listing.pagination.page, 1);
    assert!(listing.products.len() <= 12);
    assert!(browser.location().starts_with("/products?page=1&limit=12"));
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_categories_scoped_to_first_department() {
    let api = client();
    let departments = api.list_departments().await.unwrap();
    let Some(first) = departments.first() else {
        return;
    };

    let categories = api.list_categories(Some(&first.id)).await.unwrap();
    assert!(
        categories
            .iter()
            .filter_map(|c| c.department.as_ref())
            .all(|d| d.id.as_ref().is_none_or(|id| *id == first.id))
    );
}
