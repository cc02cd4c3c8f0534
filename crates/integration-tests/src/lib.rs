//! Integration tests for Cosmopolitan.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cosmopolitan-integration-tests
//! ```
//!
//! Every test starts its own storefront on an ephemeral port and talks to it
//! over real HTTP with a cookie-keeping client, so carts behave as they do
//! for a browser. Product API traffic goes to a `wiremock` server; nothing
//! leaves the machine.
//!
//! # Test Categories
//!
//! - `catalog_client` - Product API client against a mock server
//! - `storefront_products` - Product listing, detail and search routes
//! - `storefront_cart` - Session-scoped cart routes

use std::net::SocketAddr;
use std::path::PathBuf;

use cosmopolitan_storefront::app;
use cosmopolitan_storefront::catalog::{Catalog, CatalogClient, FileCatalog};
use cosmopolitan_storefront::config::{CatalogConfig, CatalogSource, StorefrontConfig};
use cosmopolitan_storefront::state::AppState;
use reqwest::Client;

/// Path of the bundled `products.json` fixture.
#[must_use]
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/products.json")
}

/// Storefront configuration with every variable at its default.
///
/// # Panics
///
/// Panics if the defaults fail validation.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(|_| None).expect("default configuration is valid")
}

/// Catalog configuration pointing at a product API under `base_url`.
#[must_use]
pub fn api_catalog_config(base_url: &str) -> CatalogConfig {
    CatalogConfig {
        source: CatalogSource::Api {
            base_url: base_url.to_string(),
        },
        ..CatalogConfig::default()
    }
}

/// Product API client for `base_url` with default timeouts and caching.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn api_client(base_url: &str) -> CatalogClient {
    CatalogClient::new(base_url, &api_catalog_config(base_url))
        .expect("failed to build test client")
}

/// A storefront running in the background for one test.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestServer {
    /// Start a storefront serving `catalog`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(catalog: Catalog) -> Self {
        let state = AppState::new(test_config(), catalog);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { addr, client }
    }

    /// Start a storefront serving the bundled fixture file.
    ///
    /// # Panics
    ///
    /// Panics if the fixture cannot be loaded.
    pub async fn with_fixture() -> Self {
        let file = FileCatalog::load(&fixture_path(), test_config().catalog.page_size)
            .await
            .expect("fixture catalog loads");
        Self::start(Catalog::File(file)).await
    }

    /// Start a storefront backed by the product API at `base_url`.
    pub async fn with_api(base_url: &str) -> Self {
        Self::start(Catalog::Api(api_client(base_url))).await
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}
