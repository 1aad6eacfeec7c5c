//! Signed-in state and cart routing.
//!
//! [`Storefront`] is what a front end drives. It persists the auth token,
//! merges the guest cart after login or registration, and sends add-to-cart
//! requests to the server cart when signed in or to the guest cart otherwise.

use secrecy::SecretString;
use shopfront_core::{CartError, Email};
use tracing::instrument;

use crate::api::{AuthApi, AuthToken, CartApi, Product, Registration};
use crate::cart::{GuestCartError, GuestCartStore, MergeReport};
use crate::error::{Result, StorefrontError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::storage::{KeyValueStore, keys};

/// Where an add-to-cart landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartDestination {
    Server,
    Guest,
}

/// Result of an add-to-cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartUpdate {
    /// Items in the cart that received the product.
    pub count: u64,
    pub destination: CartDestination,
}

/// Result of a login or registration.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// Per-item results of pushing the guest cart to the server.
    pub merge: MergeReport,
}

/// Client session over a key-value store and a backend.
pub struct Storefront<S, A> {
    store: S,
    api: A,
    guest_cart: GuestCartStore<S>,
}

impl<S, A> Storefront<S, A>
where
    S: KeyValueStore + Clone,
    A: CartApi + AuthApi,
{
    pub fn new(store: S, api: A) -> Self {
        Self {
            guest_cart: GuestCartStore::new(store.clone()),
            store,
            api,
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn guest_cart(&self) -> &GuestCartStore<S> {
        &self.guest_cart
    }

    /// The stored auth token, if any. Storage failures read as signed out.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        match self.store.get(keys::AUTH_TOKEN) {
            Ok(token) => token
                .filter(|t| !t.trim().is_empty())
                .map(AuthToken::new),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth token");
                None
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Sign in, persist the token, and merge the guest cart into the server
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Email` for a malformed address, the API
    /// error if the backend rejects the credentials, or a storage error if
    /// the token cannot be saved. The guest cart is untouched on failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthOutcome> {
        let email = Email::parse(email)?;
        let token = self.api.login(&email, password).await?;
        self.signed_in(&email, token).await
    }

    /// Create an account, then behave as [`Self::login`].
    ///
    /// # Errors
    ///
    /// As for [`Self::login`]; also `InvalidInput` for an empty name.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: SecretString,
    ) -> Result<AuthOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorefrontError::InvalidInput("Name is required".to_string()));
        }
        let registration = Registration {
            name: name.to_string(),
            email: Email::parse(email)?,
            password,
        };
        let token = self.api.register(&registration).await?;
        self.signed_in(&registration.email, token).await
    }

    async fn signed_in(&self, email: &Email, token: AuthToken) -> Result<AuthOutcome> {
        self.store.set(keys::AUTH_TOKEN, token.expose())?;
        set_sentry_user(email.as_str());
        add_breadcrumb("auth", "Signed in", None);

        let merge = self
            .guest_cart
            .merge_into_server_cart(&self.api, &token)
            .await;
        Ok(AuthOutcome { merge })
    }

    /// Forget the stored token. The guest cart starts empty again.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the token cannot be removed.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        clear_sentry_user();
        add_breadcrumb("auth", "Signed out", None);
        Ok(())
    }

    /// Add a product to the server cart when signed in, otherwise to the
    /// guest cart.
    ///
    /// A token the server rejects is discarded so the next attempt falls back
    /// to the guest cart.
    ///
    /// # Errors
    ///
    /// Returns a cart error for a zero quantity, the API error when the
    /// server cart rejects the item, or a storage error from the guest cart.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<CartUpdate> {
        if quantity == 0 {
            return Err(GuestCartError::Invalid(CartError::InvalidQuantity).into());
        }

        let Some(token) = self.token() else {
            let count = self.guest_cart.add_item(
                product.id.clone(),
                quantity,
                product.price,
                product.discount,
            )?;
            add_breadcrumb(
                "cart",
                "Added to guest cart",
                Some(&[("product_id", product.id.as_str())]),
            );
            return Ok(CartUpdate {
                count,
                destination: CartDestination::Guest,
            });
        };

        if let Err(e) = self.api.add_to_cart(&token, &product.id, quantity).await {
            if matches!(e, crate::api::ApiError::Unauthorized(_)) {
                tracing::info!("Discarding rejected auth token");
                if let Err(clear) = self.store.remove(keys::AUTH_TOKEN) {
                    tracing::warn!(error = %clear, "Failed to discard auth token");
                }
            }
            return Err(e.into());
        }
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product.id.as_str())]),
        );

        Ok(CartUpdate {
            count: self.server_count(&token).await,
            destination: CartDestination::Server,
        })
    }

    /// Items in the active cart: the server cart when signed in, else the
    /// guest cart. Failures read as 0.
    pub async fn cart_count(&self) -> u64 {
        match self.token() {
            Some(token) => self.server_count(&token).await,
            None => self.guest_cart.count(),
        }
    }

    async fn server_count(&self, token: &AuthToken) -> u64 {
        match self.api.cart_count(token).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch cart count");
                0
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;
    use secrecy::ExposeSecret;
    use shopfront_core::{Discount, ProductId};

    use super::*;
    use crate::api::ApiError;
    use crate::storage::MemoryStore;

    /// Backend with an in-memory server cart.
    #[derive(Default)]
    struct FakeBackend {
        server_cart: Mutex<Vec<(String, u32)>>,
        logins: Mutex<Vec<String>>,
        expired: bool,
    }

    impl CartApi for FakeBackend {
        async fn add_to_cart(
            &self,
            token: &AuthToken,
            product_id: &ProductId,
            quantity: u32,
        ) -> std::result::Result<(), ApiError> {
            if self.expired || token.expose() != "tok-1" {
                return Err(ApiError::Unauthorized("jwt expired".to_string()));
            }
            self.server_cart
                .lock()
                .unwrap()
                .push((product_id.to_string(), quantity));
            Ok(())
        }

        async fn cart_count(&self, _token: &AuthToken) -> std::result::Result<u64, ApiError> {
            Ok(self
                .server_cart
                .lock()
                .unwrap()
                .iter()
                .map(|(_, q)| u64::from(*q))
                .sum())
        }
    }

    impl AuthApi for FakeBackend {
        async fn login(
            &self,
            email: &Email,
            password: &SecretString,
        ) -> std::result::Result<AuthToken, ApiError> {
            self.logins.lock().unwrap().push(email.to_string());
            if password.expose_secret() == "hunter2" {
                Ok(AuthToken::new("tok-1"))
            } else {
                Err(ApiError::Status {
                    status: 400,
                    message: "Invalid credentials".to_string(),
                })
            }
        }

        async fn register(
            &self,
            _registration: &Registration,
        ) -> std::result::Result<AuthToken, ApiError> {
            Ok(AuthToken::new("tok-1"))
        }
    }

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            description: String::new(),
            price: Decimal::from(25),
            discount: Discount::NONE,
            image: None,
            department: None,
            category: None,
            stock: None,
        }
    }

    fn session() -> Storefront<Arc<MemoryStore>, FakeBackend> {
        Storefront::new(Arc::new(MemoryStore::new()), FakeBackend::default())
    }

    #[tokio::test]
    async fn test_guest_add_then_login_merges() {
        let shop = session();
        let update = shop.add_to_cart(&product("p1"), 2).await.unwrap();
        assert_eq!(update.destination, CartDestination::Guest);
        assert_eq!(update.count, 2);
        shop.add_to_cart(&product("p2"), 1).await.unwrap();

        let outcome = shop
            .login("  shopper@example.com ", &SecretString::from("hunter2"))
            .await
            .unwrap();

        assert_eq!(outcome.merge.merged_count(), 2);
        assert!(shop.is_authenticated());
        assert_eq!(shop.token().unwrap().expose(), "tok-1");
        assert_eq!(shop.guest_cart().count(), 0);
        assert_eq!(
            shop.api().server_cart.lock().unwrap().clone(),
            vec![("p1".to_string(), 2), ("p2".to_string(), 1)]
        );
        assert_eq!(shop.api().logins.lock().unwrap()[0], "shopper@example.com");
        assert_eq!(shop.cart_count().await, 3);
    }

    #[tokio::test]
    async fn test_signed_in_add_goes_to_server() {
        let shop = session();
        shop.login("a@b.co", &SecretString::from("hunter2"))
            .await
            .unwrap();

        let update = shop.add_to_cart(&product("p9"), 3).await.unwrap();

        assert_eq!(update.destination, CartDestination::Server);
        assert_eq!(update.count, 3);
        assert_eq!(shop.guest_cart().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_guest_cart() {
        let shop = session();
        shop.add_to_cart(&product("p1"), 1).await.unwrap();

        let err = shop
            .login("a@b.co", &SecretString::from("wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!shop.is_authenticated());
        assert_eq!(shop.guest_cart().count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_never_calls_backend() {
        let shop = session();
        let err = shop
            .login("not-an-email", &SecretString::from("hunter2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Email(_)));
        assert!(shop.api().logins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_requires_name() {
        let shop = session();
        let err = shop
            .register("  ", "a@b.co", SecretString::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::InvalidInput(_)));

        shop.register("Ada", "a@b.co", SecretString::from("pw"))
            .await
            .unwrap();
        assert!(shop.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_token_is_discarded() {
        let shop = Storefront::new(
            Arc::new(MemoryStore::new()),
            FakeBackend {
                expired: true,
                ..FakeBackend::default()
            },
        );
        shop.login("a@b.co", &SecretString::from("hunter2"))
            .await
            .unwrap();

        let err = shop.add_to_cart(&product("p1"), 1).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Api(ApiError::Unauthorized(_))));
        assert!(!shop.is_authenticated());

        let retry = shop.add_to_cart(&product("p1"), 1).await.unwrap();
        assert_eq!(retry.destination, CartDestination::Guest);
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let shop = session();
        let err = shop.add_to_cart(&product("p1"), 0).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Cart(_)));
        assert_eq!(shop.cart_count().await, 0);
    }

    #[tokio::test]
    async fn test_logout() {
        let shop = session();
        shop.login("a@b.co", &SecretString::from("hunter2"))
            .await
            .unwrap();
        shop.logout().unwrap();
        assert!(shop.token().is_none());
    }
}
