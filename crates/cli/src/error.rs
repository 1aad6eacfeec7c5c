//! CLI error type.

use shopfront_storefront::StorefrontError;
use shopfront_storefront::api::ApiError;
use shopfront_storefront::cart::GuestCartError;
use shopfront_storefront::config::ConfigError;
use shopfront_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Writing to stdout or reading from stdin failed.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Message to show on the terminal.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storefront(err) => err.user_message(),
            Self::Io(err) => err.to_string(),
        }
    }

    /// Log the error, capturing server-side faults to Sentry.
    pub fn report(&self) {
        match self {
            Self::Storefront(err) => err.report(),
            Self::Io(err) => tracing::error!(error = %err, "Terminal I/O failed"),
        }
    }
}

macro_rules! via_storefront {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for CliError {
                fn from(err: $source) -> Self {
                    Self::Storefront(err.into())
                }
            }
        )*
    };
}

via_storefront!(ApiError, StorageError, GuestCartError, ConfigError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_route_through_storefront() {
        let err = CliError::from(ApiError::Unauthorized("expired".to_string()));
        assert!(matches!(err, CliError::Storefront(StorefrontError::Api(_))));
        assert_eq!(err.user_message(), "Please sign in again");
    }
}
