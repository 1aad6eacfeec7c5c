//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process mock backend (always runs)
//! cargo test -p shopfront-integration-tests
//!
//! # Against a live backend
//! SHOPFRONT_API_URL=http://localhost:5000 cargo test -p shopfront-integration-tests -- --ignored
//! ```
//!
//! # Mock Backend
//!
//! [`MockBackend`] serves the REST endpoints the storefront client consumes
//! on an ephemeral local port, with a small fixed catalog and an in-memory
//! server cart. Every request is recorded so tests can assert on what the
//! client actually sent. Responses deliberately mix the shapes real backends
//! produce: `_id` and `id`, `{"data": ...}` envelopes and bare bodies,
//! embedded and referenced relations.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use shopfront_storefront::config::ClientConfig;

/// Token the mock backend issues and accepts.
pub const VALID_TOKEN: &str = "test-token";

/// Password the mock backend accepts for any email.
pub const VALID_PASSWORD: &str = "secret";

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Option<String>,
    pub token: Option<String>,
    pub body: Option<Value>,
}

/// Mutable backend state shared with handlers.
#[derive(Debug, Default)]
pub struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    server_cart: Mutex<Vec<(String, u32)>>,
    rejected_products: Mutex<HashSet<String>>,
    unavailable: Mutex<bool>,
}

impl MockState {
    fn record(
        &self,
        method: &'static str,
        path: &str,
        query: Option<String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        let token = headers
            .get("x-auth-token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            query,
            token,
            body,
        });
    }

    fn is_unavailable(&self) -> bool {
        *self.unavailable.lock().unwrap()
    }
}

/// In-process backend listening on `127.0.0.1`.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Bind an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this backend.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let base = self.base_url();
        ClientConfig::from_lookup(|key| match key {
            "SHOPFRONT_API_URL" => Some(base.clone()),
            "SHOPFRONT_REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap()
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests to one path.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Lines in the server cart, in insertion order.
    #[must_use]
    pub fn server_cart(&self) -> Vec<(String, u32)> {
        self.state.server_cart.lock().unwrap().clone()
    }

    /// Make `POST /api/cart/add` fail for a product.
    pub fn reject_product(&self, product_id: &str) {
        self.state
            .rejected_products
            .lock()
            .unwrap()
            .insert(product_id.to_string());
    }

    /// Make every cart endpoint answer 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.state.unavailable.lock().unwrap() = unavailable;
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn departments() -> Vec<Value> {
    vec![
        json!({"_id": "d1", "name": "Office", "description": "Desks and chairs"}),
        json!({"id": "d2", "name": "Garden", "imageUpload": {"url": "/uploads/garden.jpg"}}),
    ]
}

fn categories() -> Vec<Value> {
    vec![
        json!({"_id": "c1", "name": "Desks", "department": {"_id": "d1", "name": "Office"}}),
        json!({"_id": "c2", "name": "Chairs", "department": "d1"}),
        json!({"_id": "c3", "name": "Planters", "department": {"_id": "d2", "name": "Garden"}}),
    ]
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "_id": "p1",
            "name": "Standing Desk",
            "description": "Adjustable",
            "price": 100,
            "discount": 20,
            "department": {"_id": "d1", "name": "Office"},
            "category": {"_id": "c1", "name": "Desks"},
            "imageUpload": {"url": "/uploads/desk.jpg"},
            "stock": 5
        }),
        json!({
            "id": "p2",
            "title": "Task Chair",
            "price": "49.50",
            "department": "d1",
            "category": "c2"
        }),
        json!({
            "_id": "p3",
            "name": "Terracotta Pot",
            "price": 12,
            "discount": 0,
            "department": {"_id": "d2", "name": "Garden"},
            "image": "/img/pot.jpg",
            "stock": 0
        }),
    ]
}

fn department_of(category: &Value) -> Option<String> {
    match category.get("department")? {
        Value::String(id) => Some(id.clone()),
        embedded => embedded.get("_id")?.as_str().map(str::to_string),
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"message": message}))).into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token is not valid"})),
    )
        .into_response()
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/departments", get(list_departments))
        .route("/api/categories", get(list_categories))
        .route("/api/public/products", get(list_products))
        .route("/api/public/products/{id}", get(get_product))
        .route("/api/public/departments/{id}", get(get_department))
        .route("/api/cart/count", get(cart_count))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .with_state(state)
}

async fn list_departments(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/api/departments", None, &headers, None);
    Json(json!({ "data": departments() })).into_response()
}

#[derive(Debug, Deserialize)]
struct CategoryQuery {
    department: Option<String>,
}

async fn list_categories(
    State(state): State<Arc<MockState>>,
    Query(query): Query<CategoryQuery>,
    headers: HeaderMap,
) -> Response {
    state.record(
        "GET",
        "/api/categories",
        query.department.as_ref().map(|d| format!("department={d}")),
        &headers,
        None,
    );
    let categories: Vec<Value> = categories()
        .into_iter()
        .filter(|c| {
            query
                .department
                .as_ref()
                .is_none_or(|d| department_of(c).as_ref() == Some(d))
        })
        .collect();
    Json(Value::Array(categories)).into_response()
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(params): Query<Vec<(String, String)>>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.record("GET", "/api/public/products", raw, &headers, None);
    let page: u32 = params
        .iter()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(1);

    let department = params
        .iter()
        .find(|(k, _)| k == "departmentId")
        .map(|(_, v)| v.clone());
    let products: Vec<Value> = products()
        .into_iter()
        .filter(|p| {
            department
                .as_ref()
                .is_none_or(|d| department_of(p).as_ref() == Some(d))
        })
        .collect();
    let total = products.len();

    Json(json!({
        "products": products,
        "pagination": {"currentPage": page, "totalPages": 2, "totalProducts": total},
        "filters": {"departments": departments()}
    }))
    .into_response()
}

async fn get_product(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record("GET", &format!("/api/public/products/{id}"), None, &headers, None);
    products()
        .into_iter()
        .find(|p| p.get("_id").or_else(|| p.get("id")).and_then(Value::as_str) == Some(id.as_str()))
        .map_or_else(
            || not_found("Product not found"),
            |p| Json(json!({ "data": p })).into_response(),
        )
}

async fn get_department(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record(
        "GET",
        &format!("/api/public/departments/{id}"),
        None,
        &headers,
        None,
    );
    let Some(department) = departments().into_iter().find(|d| {
        d.get("_id").or_else(|| d.get("id")).and_then(Value::as_str) == Some(id.as_str())
    }) else {
        return not_found("Department not found");
    };
    let categories: Vec<Value> = categories()
        .into_iter()
        .filter(|c| department_of(c).as_deref() == Some(id.as_str()))
        .collect();
    Json(json!({"department": department, "categories": categories})).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-auth-token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|t| t == VALID_TOKEN)
}

async fn cart_count(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/api/cart/count", None, &headers, None);
    if state.is_unavailable() {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if !authorized(&headers) {
        return unauthorized();
    }
    let count: u64 = state
        .server_cart
        .lock()
        .unwrap()
        .iter()
        .map(|(_, q)| u64::from(*q))
        .sum();
    Json(json!({ "count": count })).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToCart {
    product_id: String,
    quantity: u32,
}

async fn add_to_cart(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/api/cart/add", None, &headers, Some(body.clone()));
    if state.is_unavailable() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"message": "Cart service unavailable"})),
        )
            .into_response();
    }
    if !authorized(&headers) {
        return unauthorized();
    }
    let Ok(item) = serde_json::from_value::<AddToCart>(body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "productId and quantity are required"})),
        )
            .into_response();
    };
    if state
        .rejected_products
        .lock()
        .unwrap()
        .contains(&item.product_id)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Insufficient stock"})),
        )
            .into_response();
    }
    state
        .server_cart
        .lock()
        .unwrap()
        .push((item.product_id, item.quantity));
    Json(json!({"message": "Added to cart"})).into_response()
}

async fn login(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/api/auth/login", None, &headers, Some(body.clone()));
    if body.get("password").and_then(Value::as_str) == Some(VALID_PASSWORD) {
        Json(json!({ "token": VALID_TOKEN })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn register(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(
        "POST",
        "/api/auth/register",
        None,
        &headers,
        Some(body.clone()),
    );
    if body.get("email").and_then(Value::as_str) == Some("taken@example.com") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        )
            .into_response();
    }
    Json(json!({ "data": { "token": VALID_TOKEN } })).into_response()
}
