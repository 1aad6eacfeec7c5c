//! HTTP implementation of the backend API.
//!
//! Uses `reqwest` for transport and `moka` to cache read-only catalog lookups
//! (departments, category lists, department pages, product detail). Listings
//! and everything cart or auth related always go to the backend.

use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shopfront_core::{DepartmentId, Email, FilterState, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::normalize::{
    convert_all, convert_category, convert_department, convert_department_detail,
    convert_listing, convert_product,
};
use super::wire::{
    AddToCartBody, CountBody, Envelope, ErrorBody, LoginBody, RawCategory, RawDepartment,
    RawDepartmentDetail, RawProduct, RawProductListing, RegisterBody, TokenBody,
};
use super::{
    ApiError, AuthApi, AuthToken, CartApi, CatalogApi, Category, Department, DepartmentPage,
    Product, ProductListing, Registration,
};
use crate::catalog::query;
use crate::config::ClientConfig;

/// Header carrying the auth token on authenticated requests.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Maximum number of cached catalog lookups.
const CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend.
///
/// Cheaply cloneable; clones share the connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialization fails).
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                cache,
            }),
        })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Resolve a resource path, percent-encoding each segment.
    fn resource(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Full listing URL for a filter state.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be joined.
    pub fn listing_url(&self, filters: &FilterState) -> Result<Url, ApiError> {
        let mut url = self.endpoint("api/public/products")?;
        url.set_query(Some(&query::encode(filters)));
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn send_raw(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let path = response.url().path().to_string();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        tracing::debug!(
            status = %status,
            path = %path,
            body = %body.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );

        Err(match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ApiError::Unauthorized(message)
            }
            reqwest::StatusCode::NOT_FOUND => ApiError::NotFound(path),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Send a request and decode the (optionally `data`-wrapped) JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => Ok(envelope.into_inner()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    fn get(&self, url: Url, token: Option<&AuthToken>) -> reqwest::RequestBuilder {
        let request = self.inner.client.get(url);
        match token {
            Some(token) => request.header(AUTH_HEADER, token.expose()),
            None => request,
        }
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        token: Option<&AuthToken>,
    ) -> reqwest::RequestBuilder {
        let request = self.inner.client.post(url).json(body);
        match token {
            Some(token) => request.header(AUTH_HEADER, token.expose()),
            None => request,
        }
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Catalog
// =============================================================================

impl CatalogApi for ApiClient {
    #[instrument(skip(self))]
    async fn list_products(&self, filters: &FilterState) -> Result<ProductListing, ApiError> {
        let url = self.listing_url(filters)?;
        let raw: RawProductListing = self.send_json(self.get(url, None)).await?;
        Ok(convert_listing(raw))
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.resource(&["api", "public", "products", id.as_str()])?;
        let raw: RawProduct = self.send_json(self.get(url, None)).await?;
        let product = convert_product(raw)?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    #[instrument(skip(self), fields(department_id = %id))]
    async fn get_department(&self, id: &DepartmentId) -> Result<DepartmentPage, ApiError> {
        let key = CacheKey::Department(id.clone());
        if let Some(CacheValue::Department(page)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for department");
            return Ok(*page);
        }

        let url = self.resource(&["api", "public", "departments", id.as_str()])?;
        let raw: RawDepartmentDetail = self.send_json(self.get(url, None)).await?;
        let page = convert_department_detail(raw)?;

        self.inner
            .cache
            .insert(key, CacheValue::Department(Box::new(page.clone())))
            .await;
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn list_departments(&self) -> Result<Vec<Department>, ApiError> {
        if let Some(CacheValue::Departments(departments)) =
            self.inner.cache.get(&CacheKey::Departments).await
        {
            debug!("Cache hit for departments");
            return Ok(departments);
        }

        let url = self.endpoint("api/departments")?;
        let raw: Vec<RawDepartment> = self.send_json(self.get(url, None)).await?;
        let departments = convert_all(raw, convert_department);

        self.inner
            .cache
            .insert(
                CacheKey::Departments,
                CacheValue::Departments(departments.clone()),
            )
            .await;
        Ok(departments)
    }

    #[instrument(skip(self))]
    async fn list_categories(
        &self,
        department: Option<&DepartmentId>,
    ) -> Result<Vec<Category>, ApiError> {
        let key = CacheKey::Categories {
            department: department.cloned(),
        };
        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let mut url = self.endpoint("api/categories")?;
        if let Some(department) = department {
            url.query_pairs_mut()
                .append_pair("department", department.as_str());
        }
        let raw: Vec<RawCategory> = self.send_json(self.get(url, None)).await?;
        let categories = convert_all(raw, convert_category);

        self.inner
            .cache
            .insert(key, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }
}

// =============================================================================
// Cart (not cached - mutable state)
// =============================================================================

impl CartApi for ApiClient {
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    async fn add_to_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("api/cart/add")?;
        let body = AddToCartBody {
            product_id: product_id.as_str(),
            quantity,
        };
        self.send_raw(self.post(url, &body, Some(token))).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn cart_count(&self, token: &AuthToken) -> Result<u64, ApiError> {
        let url = self.endpoint("api/cart/count")?;
        let body: CountBody = self.send_json(self.get(url, Some(token))).await?;
        Ok(body.count)
    }
}

// =============================================================================
// Auth
// =============================================================================

impl AuthApi for ApiClient {
    #[instrument(skip(self, password))]
    async fn login(
        &self,
        email: &Email,
        password: &secrecy::SecretString,
    ) -> Result<AuthToken, ApiError> {
        use secrecy::ExposeSecret;

        let url = self.endpoint("api/auth/login")?;
        let body = LoginBody {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let token: TokenBody = self.send_json(self.post(url, &body, None)).await?;
        Ok(AuthToken::new(token.token))
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<AuthToken, ApiError> {
        use secrecy::ExposeSecret;

        let url = self.endpoint("api/auth/register")?;
        let body = RegisterBody {
            name: registration.name.trim(),
            email: registration.email.as_str(),
            password: registration.password.expose_secret(),
        };
        let token: TokenBody = self.send_json(self.post(url, &body, None)).await?;
        Ok(AuthToken::new(token.token))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::ProductSort;

    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig::from_lookup(|key| {
            (key == "SHOPFRONT_API_URL").then(|| base.to_string())
        })
        .unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_prefix() {
        let client = client("http://localhost:5000/shop");
        assert_eq!(
            client.endpoint("/api/cart/add").unwrap().as_str(),
            "http://localhost:5000/shop/api/cart/add"
        );
    }

    #[test]
    fn test_resource_encodes_segments() {
        let client = client("http://localhost:5000/shop/");
        assert_eq!(
            client.resource(&["api", "public", "products", "a/b c"]).unwrap().as_str(),
            "http://localhost:5000/shop/api/public/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_listing_url() {
        let client = client("http://localhost:5000");
        let mut filters = FilterState::default();
        filters.set_sort(Some(ProductSort::PriceAsc));
        assert_eq!(
            client.listing_url(&filters).unwrap().as_str(),
            "http://localhost:5000/api/public/products?page=1&limit=12&sort=price"
        );
    }
}
