//! Backend REST API access.
//!
//! # Architecture
//!
//! - [`ApiClient`] talks to the backend over HTTP using `reqwest`
//! - The backend is the source of truth; only read-only catalog lookups are
//!   cached (in-memory via `moka`, 5 minute TTL by default)
//! - Raw JSON is normalized into the canonical entities in [`types`] before
//!   anything else sees it
//!
//! The operations are split into three traits so the guest cart, catalog
//! browser and session can be exercised against fakes:
//!
//! - [`CatalogApi`] - departments, categories, products, listings
//! - [`CartApi`] - the authenticated server-side cart
//! - [`AuthApi`] - login and registration
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::api::{ApiClient, CatalogApi};
//!
//! let client = ApiClient::new(&config)?;
//! let departments = client.list_departments().await?;
//! ```

mod cache;
mod client;
mod normalize;
pub mod types;
mod wire;

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use shopfront_core::{DepartmentId, Email, FilterState, ProductId};
use thiserror::Error;

pub use client::ApiClient;
pub use types::*;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the canonical reason phrase.
        message: String,
    },

    /// The auth token is missing, expired, or rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response was valid JSON but missing required data.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the failure lies with the backend or the network rather than
    /// with the request.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) | Self::Malformed(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Unauthorized(_) | Self::NotFound(_) | Self::Url(_) => false,
        }
    }
}

/// Bearer token issued by the backend on login or registration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for request headers and persistence only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Registration form data.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Read-only catalog endpoints.
pub trait CatalogApi: Send + Sync {
    /// `GET /api/public/products` with the filter state as query string.
    fn list_products(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<ProductListing, ApiError>> + Send;

    /// `GET /api/public/products/:id`.
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// `GET /api/public/departments/:id`.
    fn get_department(
        &self,
        id: &DepartmentId,
    ) -> impl Future<Output = Result<DepartmentPage, ApiError>> + Send;

    /// `GET /api/departments`.
    fn list_departments(&self) -> impl Future<Output = Result<Vec<Department>, ApiError>> + Send;

    /// `GET /api/categories`, optionally scoped with `?department=`.
    fn list_categories(
        &self,
        department: Option<&DepartmentId>,
    ) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;
}

/// Authenticated server-side cart endpoints.
pub trait CartApi: Send + Sync {
    /// `POST /api/cart/add`.
    fn add_to_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /api/cart/count`.
    fn cart_count(&self, token: &AuthToken) -> impl Future<Output = Result<u64, ApiError>> + Send;
}

/// Authentication endpoints.
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login`.
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<AuthToken, ApiError>> + Send;

    /// `POST /api/auth/register`.
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthToken, ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_token_debug_redacts() {
        let token = AuthToken::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
        assert_eq!(token.expose(), "eyJhbGciOiJIUzI1NiJ9.secret");
    }

    #[test]
    fn test_server_fault_classification() {
        assert!(
            ApiError::Status {
                status: 503,
                message: "down".to_string()
            }
            .is_server_fault()
        );
        assert!(
            !ApiError::Status {
                status: 422,
                message: "bad".to_string()
            }
            .is_server_fault()
        );
        assert!(!ApiError::Unauthorized("expired".to_string()).is_server_fault());
        assert!(ApiError::Malformed("x".to_string()).is_server_fault());
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("/api/public/products/p1".to_string());
        assert_eq!(err.to_string(), "Not found: /api/public/products/p1");
    }
}
