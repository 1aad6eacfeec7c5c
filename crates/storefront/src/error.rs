//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StorefrontError` for everything a front end calls. It
//! carries a user-safe message via [`StorefrontError::user_message`] and
//! captures server-side faults to Sentry via [`StorefrontError::report`].

use shopfront_core::EmailError;
use thiserror::Error;

use crate::api::ApiError;
use crate::cart::GuestCartError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Guest cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] GuestCartError),

    /// Email address failed validation.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The operation needs a signed-in user.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Bad input from the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StorefrontError {
    /// Whether the fault lies with the system rather than the user's input.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_fault(),
            Self::Storage(_) | Self::Render(_) | Self::Config(_) => true,
            Self::Cart(err) => matches!(err, GuestCartError::Storage(_)),
            Self::Email(_) | Self::NotAuthenticated | Self::InvalidInput(_) => false,
        }
    }

    /// A message safe to show the user. Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => match err {
                ApiError::Unauthorized(_) => "Please sign in again".to_string(),
                ApiError::NotFound(_) => "Not found".to_string(),
                ApiError::Status { status, message } if *status < 500 => message.clone(),
                ApiError::Http(_) => "Could not reach the store, please try again".to_string(),
                _ => "External service error".to_string(),
            },
            Self::Cart(GuestCartError::Invalid(err)) => err.to_string(),
            Self::Email(_) => "Invalid email address".to_string(),
            Self::NotAuthenticated => "Please sign in first".to_string(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Config(err) => err.to_string(),
            Self::Storage(_) | Self::Cart(GuestCartError::Storage(_)) | Self::Render(_) => {
                "Internal error".to_string()
            }
        }
    }

    /// Log the error, capturing server-side faults to Sentry.
    pub fn report(&self) {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront request rejected");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to guest cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use shopfront_core::CartError;

    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::InvalidInput("quantity must be a number".to_string());
        assert_eq!(err.to_string(), "Invalid input: quantity must be a number");
        assert_eq!(StorefrontError::NotAuthenticated.to_string(), "Not signed in");
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = StorefrontError::Api(ApiError::Status {
            status: 500,
            message: "stack trace at db.js:42".to_string(),
        });
        assert_eq!(err.user_message(), "External service error");

        let err = StorefrontError::Api(ApiError::Malformed("missing _id".to_string()));
        assert_eq!(err.user_message(), "External service error");

        let err = StorefrontError::Storage(StorageError::Poisoned);
        assert_eq!(err.user_message(), "Internal error");
    }

    #[test]
    fn test_user_message_passes_client_errors_through() {
        let err = StorefrontError::Api(ApiError::Status {
            status: 400,
            message: "Invalid credentials".to_string(),
        });
        assert_eq!(err.user_message(), "Invalid credentials");

        let err = StorefrontError::Api(ApiError::Unauthorized("jwt expired".to_string()));
        assert_eq!(err.user_message(), "Please sign in again");

        let err = StorefrontError::Cart(GuestCartError::Invalid(CartError::InvalidQuantity));
        assert!(!err.is_server_fault());
    }

    #[test]
    fn test_server_fault_classification() {
        assert!(StorefrontError::Storage(StorageError::Poisoned).is_server_fault());
        assert!(
            StorefrontError::Cart(GuestCartError::Storage(StorageError::Poisoned))
                .is_server_fault()
        );
        assert!(!StorefrontError::NotAuthenticated.is_server_fault());
        assert!(!StorefrontError::Api(ApiError::NotFound("x".to_string())).is_server_fault());
    }
}
