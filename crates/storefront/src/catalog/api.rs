//! REST product API client.
//!
//! Uses `reqwest` for HTTP and `moka` for response caching. Listing responses
//! go through [`normalize_products`] so callers always see the canonical
//! paginated shape, whichever envelope the API used.

use std::sync::Arc;

use cosmopolitan_core::{PaginatedProducts, normalize_products};
use moka::future::Cache;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{CatalogError, ProductQuery};
use crate::config::CatalogConfig;

/// Longest body excerpt written to logs.
const LOG_BODY_CHARS: usize = 500;

/// Client for the REST product API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new product API client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, config: &CatalogConfig) -> Result<Self, CatalogError> {
        Url::parse(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        tracing::info!(base_url, "Initialized product API client");

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Build an absolute endpoint URL from a path below the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(Url::parse(&format!("{}{path}", self.inner.base_url))?)
    }

    /// GET `url` and decode the body as JSON.
    async fn fetch_json(&self, url: Url) -> Result<Value, CatalogError> {
        debug!(%url, "Fetching from product API");

        let response = self
            .inner
            .client
            .get(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Product API response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Product API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse product API response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Build the listing URL for `query`.
    ///
    /// Only parameters that are set are sent.
    fn products_url(&self, query: &ProductQuery) -> Result<Url, CatalogError> {
        let request = query.page_request();
        let mut url = self.endpoint("/products")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(limit) = request.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            pairs.append_pair("page", &request.page.to_string());
            if let Some(search) = &query.search {
                pairs.append_pair("search", search);
            }
            if let Some(vendor) = &query.vendor {
                pairs.append_pair("vendor", vendor);
            }
        }
        Ok(url)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body is not JSON, or the
    /// body is not a recognized listing envelope.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        query: &ProductQuery,
    ) -> Result<PaginatedProducts, CatalogError> {
        let cache_key = CacheKey::Products(query.clone());

        // Check cache (only for queries without search)
        if query.search.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.products_url(query)?;
        let payload = self.fetch_json(url).await?;

        let products = normalize_products(payload, query.page_request()).inspect_err(|e| {
            tracing::error!(error = %e, "Unexpected product listing format");
        })?;

        // Cache if not a search query
        if query.search.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a product by its URL handle.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] on 404, or another error if the
    /// request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Value, CatalogError> {
        let cache_key = CacheKey::ProductByHandle(handle.to_string());
        let path = format!("/products/handle/{}", urlencoding::encode(handle));
        self.get_product(cache_key, &path).await
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] on 404, or another error if the
    /// request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product_by_id(&self, id: &str) -> Result<Value, CatalogError> {
        let cache_key = CacheKey::ProductById(id.to_string());
        let path = format!("/products/{}", urlencoding::encode(id));
        self.get_product(cache_key, &path).await
    }

    async fn get_product(&self, cache_key: CacheKey, path: &str) -> Result<Value, CatalogError> {
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self.fetch_json(self.endpoint(path)?).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }
}
