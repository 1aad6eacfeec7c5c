//! Catalog browsing against the mock backend.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use shopfront_core::{DepartmentId, FilterShortcut, ProductId, ProductSort};
use shopfront_integration_tests::MockBackend;
use shopfront_storefront::api::{ApiClient, ApiError, CatalogApi};
use shopfront_storefront::catalog::CatalogBrowser;
use shopfront_storefront::render::Renderer;

fn client(backend: &MockBackend) -> ApiClient {
    ApiClient::new(&backend.client_config()).unwrap()
}

#[tokio::test]
async fn test_listing_sends_canonical_query() {
    let backend = MockBackend::start().await;
    let mut browser = CatalogBrowser::new(client(&backend), "/products", "", 12);

    let filters = browser.filters_mut();
    filters.set_search(Some("desk"));
    filters.set_price_range(Some(Decimal::from(10)), Some(Decimal::from(150)));
    filters.set_sort(Some(ProductSort::PriceDesc));
    filters.set_shortcut(Some(FilterShortcut::Discounted));
    browser.load().await.unwrap();

    let requests = backend.requests_to("/api/public/products");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].query.as_deref(),
        Some("page=1&limit=12&search=desk&minPrice=10&maxPrice=150&sort=-price&filter=discounted")
    );
    assert_eq!(
        browser.location(),
        "/products?page=1&limit=12&search=desk&minPrice=10&maxPrice=150&sort=-price&filter=discounted"
    );
}

#[tokio::test]
async fn test_page_change_rewrites_location() {
    let backend = MockBackend::start().await;
    let mut browser = CatalogBrowser::new(client(&backend), "/products", "filter=trending", 12);

    let listing = browser.go_to_page(2).await.unwrap();

    assert_eq!(listing.pagination.page, 2);
    assert_eq!(listing.pagination.total_pages, 2);
    assert!(!listing.pagination.has_next());
    assert_eq!(browser.location(), "/products?page=2&limit=12&filter=trending");
    assert_eq!(browser.shortcut(), Some(FilterShortcut::Trending));
}

#[tokio::test]
async fn test_department_change_refreshes_scoped_categories() {
    let backend = MockBackend::start().await;
    let mut browser = CatalogBrowser::new(client(&backend), "/products", "", 12);
    browser.load_options().await.unwrap();
    assert_eq!(browser.options().departments.len(), 2);
    assert_eq!(browser.options().categories.len(), 3);

    browser
        .select_department(Some(DepartmentId::new("d1")))
        .await
        .unwrap();

    let names: Vec<&str> = browser
        .options()
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Desks", "Chairs"]);

    let scoped: Vec<_> = backend
        .requests_to("/api/categories")
        .into_iter()
        .filter_map(|r| r.query)
        .collect();
    assert_eq!(scoped, vec!["department=d1".to_string()]);

    let listing = browser.load().await.unwrap();
    assert_eq!(listing.products.len(), 2);
    assert_eq!(browser.location(), "/products?page=1&limit=12&departmentId=d1");
}

#[tokio::test]
async fn test_entities_are_normalized() {
    let backend = MockBackend::start().await;
    let api = client(&backend);

    let departments = api.list_departments().await.unwrap();
    assert_eq!(departments[0].id, DepartmentId::new("d1"));
    assert_eq!(departments[1].id, DepartmentId::new("d2"));
    assert_eq!(departments[1].image.as_deref(), Some("/uploads/garden.jpg"));

    let categories = api.list_categories(None).await.unwrap();
    let chairs = categories.iter().find(|c| c.name == "Chairs").unwrap();
    let department = chairs.department.as_ref().unwrap();
    assert_eq!(department.id, Some(DepartmentId::new("d1")));
    assert!(department.name.is_none());

    let chair = api.get_product(&ProductId::new("p2")).await.unwrap();
    assert_eq!(chair.name, "Task Chair");
    assert_eq!(chair.price, Decimal::new(4950, 2));
    assert!(!chair.discount.is_active());
}

#[tokio::test]
async fn test_rendered_card_uses_fallbacks() {
    let backend = MockBackend::start().await;
    let api = client(&backend);
    let renderer = Renderer::new("/static/placeholder.png");

    let desk = api.get_product(&ProductId::new("p1")).await.unwrap();
    let html = renderer.product_card(&desk).unwrap();
    assert!(html.contains("80.00"));
    assert!(html.contains("<del class=\"price__original\">$100.00</del>"));
    assert!(html.contains("/uploads/desk.jpg"));

    let chair = api.get_product(&ProductId::new("p2")).await.unwrap();
    let html = renderer.product_card(&chair).unwrap();
    assert!(html.contains("49.50"));
    assert!(!html.contains("<del"));
    assert!(html.contains("/static/placeholder.png"));
    assert!(html.contains("Unknown"));
    assert!(html.contains("Uncategorized"));
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let backend = MockBackend::start().await;
    let api = client(&backend);

    let err = api.get_product(&ProductId::new("nope")).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(!err.is_server_fault());
}

#[tokio::test]
async fn test_department_page_and_cache() {
    let backend = MockBackend::start().await;
    let api = client(&backend);

    let page = api.get_department(&DepartmentId::new("d2")).await.unwrap();
    assert_eq!(page.department.name, "Garden");
    assert_eq!(page.categories.len(), 1);
    assert_eq!(page.categories[0].name, "Planters");

    api.get_department(&DepartmentId::new("d2")).await.unwrap();
    assert_eq!(backend.requests_to("/api/public/departments/d2").len(), 1);

    api.invalidate_all().await;
    api.get_department(&DepartmentId::new("d2")).await.unwrap();
    assert_eq!(backend.requests_to("/api/public/departments/d2").len(), 2);
}

#[tokio::test]
async fn test_failed_listing_keeps_location() {
    let backend = MockBackend::start().await;
    let mut config = backend.client_config();
    config.api_url = "http://127.0.0.1:9".parse().unwrap();
    let api = ApiClient::new(&config).unwrap();
    let mut browser = CatalogBrowser::new(api, "/products", "page=3", 12);
    let before = browser.location().to_string();

    browser.filters_mut().set_search(Some("lamp"));
    let err = browser.load().await.unwrap_err();

    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(browser.location(), before);
}
