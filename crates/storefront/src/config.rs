//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_URL` - Backend base URL (default: `http://localhost:5000`)
//! - `SHOPFRONT_DATA_DIR` - Directory for the persisted guest cart and token
//!   (default: `.shopfront`)
//! - `SHOPFRONT_PAGE_SIZE` - Products per listing page (default: 12)
//! - `SHOPFRONT_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `SHOPFRONT_PLACEHOLDER_IMAGE` - Image shown for entities without one
//!   (default: `/images/placeholder.png`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_DATA_DIR: &str = ".shopfront";
const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths are joined onto it
    pub api_url: Url,
    /// Directory holding persisted client state
    pub data_dir: PathBuf,
    /// Products per listing page
    pub page_size: u32,
    /// Lifetime of cached catalog lookups
    pub cache_ttl: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Image URL used when an entity has none
    pub placeholder_image: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = parse_api_url(
            "SHOPFRONT_API_URL",
            &get("SHOPFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let data_dir = get("SHOPFRONT_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let page_size = parse_or("SHOPFRONT_PAGE_SIZE", get("SHOPFRONT_PAGE_SIZE"), 12_u32)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let cache_ttl = Duration::from_secs(parse_or(
            "SHOPFRONT_CACHE_TTL_SECS",
            get("SHOPFRONT_CACHE_TTL_SECS"),
            300,
        )?);
        let request_timeout = Duration::from_secs(parse_or(
            "SHOPFRONT_REQUEST_TIMEOUT_SECS",
            get("SHOPFRONT_REQUEST_TIMEOUT_SECS"),
            30,
        )?);
        let placeholder_image = get("SHOPFRONT_PLACEHOLDER_IMAGE")
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.to_string());

        Ok(Self {
            api_url,
            data_dir,
            page_size,
            cache_ttl,
            request_timeout,
            placeholder_image,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional numeric variable, falling back to a default when unset.
fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| {
        v.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse the backend URL, ensuring it ends in `/` so relative joins keep any
/// path prefix.
fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert_eq!(config.page_size, 12);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.placeholder_image, "/images/placeholder.png");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_api_url_keeps_path_prefix() {
        let config = load(&[("SHOPFRONT_API_URL", "https://shop.example.com/backend")]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://shop.example.com/backend/");
        assert_eq!(
            config.api_url.join("api/departments").unwrap().as_str(),
            "https://shop.example.com/backend/api/departments"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let err = load(&[("SHOPFRONT_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_API_URL"));

        let err = load(&[("SHOPFRONT_API_URL", "ftp://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_page_size() {
        assert!(load(&[("SHOPFRONT_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("SHOPFRONT_PAGE_SIZE", "many")]).is_err());
        assert_eq!(load(&[("SHOPFRONT_PAGE_SIZE", "24")]).unwrap().page_size, 24);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("SHOPFRONT_DATA_DIR", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert!(config.sentry_dsn.is_none());
    }
}
