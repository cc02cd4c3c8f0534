//! Product catalog sources.
//!
//! # Architecture
//!
//! - [`CatalogClient`] talks to the remote REST product API and normalizes
//!   whichever envelope it answers with into [`PaginatedProducts`]
//! - [`FileCatalog`] serves a static `products.json` loaded at startup
//! - [`Catalog`] picks one of the two from configuration; route handlers only
//!   see `Catalog`
//!
//! API responses are cached in memory via `moka` (TTL from configuration).
//! Search queries are not cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use cosmopolitan_storefront::catalog::{Catalog, ProductQuery};
//!
//! let catalog = Catalog::from_config(&config.catalog).await?;
//!
//! let page = catalog.products(&ProductQuery::page(2, 25)).await?;
//! let product = catalog.product("linen-shirt").await?;
//! ```

mod api;
mod cache;
mod file;

pub use api::CatalogClient;
pub use file::FileCatalog;

use cosmopolitan_core::catalog::MAX_PAGE_LIMIT;
use cosmopolitan_core::{NormalizeError, PageRequest, PaginatedProducts};
use serde_json::Value;
use thiserror::Error;

use crate::config::{CatalogConfig, CatalogSource};

/// Errors that can occur when reading the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Product API answered with a non-success status.
    #[error("Product API returned {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Listing payload was not one of the known envelopes.
    #[error(transparent)]
    Shape(#[from] NormalizeError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Catalog file could not be read.
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Product listing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    /// 1-indexed page number.
    pub page: u32,
    /// Page size; the source's default when `None`.
    pub limit: Option<u32>,
    /// Free-text search.
    pub search: Option<String>,
    /// Exact vendor filter.
    pub vendor: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
            search: None,
            vendor: None,
        }
    }
}

impl ProductQuery {
    /// Query one unfiltered page.
    #[must_use]
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Set the search term; blank terms are dropped.
    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = non_blank(search);
        self
    }

    /// Set the vendor filter; blank values are dropped.
    #[must_use]
    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        self.vendor = non_blank(vendor);
        self
    }

    /// The page/limit pair, with `page >= 1` and `limit` in `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.max(1),
            limit: self.limit.map(|l| l.clamp(1, MAX_PAGE_LIMIT)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The configured product source.
#[derive(Clone)]
pub enum Catalog {
    Api(CatalogClient),
    File(FileCatalog),
}

impl Catalog {
    /// Build the source named in configuration.
    ///
    /// A file source is read and parsed here, so a missing or malformed file
    /// fails startup rather than the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the catalog file
    /// cannot be loaded.
    pub async fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match &config.source {
            CatalogSource::Api { base_url } => {
                Ok(Self::Api(CatalogClient::new(base_url, config)?))
            }
            CatalogSource::File { path } => {
                Ok(Self::File(FileCatalog::load(path, config.page_size).await?))
            }
        }
    }

    /// Short name of the source, for logs.
    #[must_use]
    pub const fn source_name(&self) -> &'static str {
        match self {
            Self::Api(_) => "api",
            Self::File(_) => "file",
        }
    }

    /// Fetch one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the product API fails or answers with an
    /// unrecognized shape.
    pub async fn products(&self, query: &ProductQuery) -> Result<PaginatedProducts, CatalogError> {
        match self {
            Self::Api(client) => client.get_products(query).await,
            Self::File(file) => Ok(file.products(query)),
        }
    }

    /// Fetch a single product by handle.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has that handle.
    pub async fn product(&self, handle: &str) -> Result<Value, CatalogError> {
        match self {
            Self::Api(client) => client.get_product_by_handle(handle).await,
            Self::File(file) => file
                .product_by_handle(handle)
                .ok_or_else(|| CatalogError::NotFound(format!("Product not found: {handle}"))),
        }
    }
}
