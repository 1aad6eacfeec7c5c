//! Command implementations.
//!
//! Each command writes its output to the given writer; diagnostics go
//! through `tracing` to stderr.

pub mod auth;
pub mod cart;
pub mod catalog;

use std::sync::Arc;

use shopfront_storefront::api::ApiClient;
use shopfront_storefront::config::ClientConfig;
use shopfront_storefront::render::Renderer;
use shopfront_storefront::session::Storefront;
use shopfront_storefront::storage::FileStore;

use crate::error::CliError;

/// Everything a command needs, built once from configuration.
pub struct Context {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub renderer: Renderer,
    pub shop: Storefront<Arc<FileStore>, ApiClient>,
}

impl Context {
    /// Build the API client, open the profile directory, and wire the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the data
    /// directory cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, CliError> {
        let api = ApiClient::new(&config)?;
        let store = Arc::new(FileStore::open(&config.data_dir)?);
        let renderer = Renderer::from_config(&config);
        let shop = Storefront::new(store, api.clone());
        Ok(Self {
            config,
            api,
            renderer,
            shop,
        })
    }
}
