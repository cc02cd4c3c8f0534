//! Static product catalog served from a JSON file.

use std::path::Path;
use std::sync::Arc;

use cosmopolitan_core::{PageRequest, PaginatedProducts, ProductEnvelope};
use serde_json::Value;

use super::{CatalogError, ProductQuery};

/// Products loaded once from disk and paged in memory.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    products: Arc<Vec<Value>>,
    page_size: u32,
}

impl FileCatalog {
    /// Read and parse the catalog file at `path`.
    ///
    /// Any listing shape is accepted: `{ "products": [...] }`, a `data`
    /// envelope, or a bare array.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not JSON, or is not a
    /// product listing.
    pub async fn load(path: &Path, page_size: u32) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let payload: Value = serde_json::from_str(&raw)?;
        let products = match ProductEnvelope::decode(payload)? {
            ProductEnvelope::Products(items) | ProductEnvelope::Bare(items) => items,
            ProductEnvelope::Data(envelope) => envelope.data,
        };

        tracing::info!(
            path = %path.display(),
            count = products.len(),
            "Loaded product catalog file"
        );

        Ok(Self::from_products(products, page_size))
    }

    /// Build a catalog from products already in memory.
    #[must_use]
    pub fn from_products(products: Vec<Value>, page_size: u32) -> Self {
        Self {
            products: Arc::new(products),
            page_size: page_size.max(1),
        }
    }

    /// One page of products matching `query`.
    ///
    /// `search` matches a case-insensitive substring of the title; `vendor`
    /// must match exactly, ignoring case.
    #[must_use]
    pub fn products(&self, query: &ProductQuery) -> PaginatedProducts {
        let PageRequest { page, limit } = query.page_request();
        let limit = limit.unwrap_or(self.page_size);

        if query.search.is_none() && query.vendor.is_none() {
            return PaginatedProducts::from_slice(&self.products, page, limit);
        }

        let search = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<Value> = self
            .products
            .iter()
            .filter(|p| search.as_deref().is_none_or(|term| title_contains(p, term)))
            .filter(|p| query.vendor.as_deref().is_none_or(|v| vendor_is(p, v)))
            .cloned()
            .collect();

        PaginatedProducts::from_slice(&matching, page, limit)
    }

    /// The product whose `handle` is exactly `handle`.
    #[must_use]
    pub fn product_by_handle(&self, handle: &str) -> Option<Value> {
        self.products
            .iter()
            .find(|p| p.get("handle").and_then(Value::as_str) == Some(handle))
            .cloned()
    }
}

fn title_contains(product: &Value, term: &str) -> bool {
    product
        .get("title")
        .or_else(|| product.get("name"))
        .and_then(Value::as_str)
        .is_some_and(|title| title.to_lowercase().contains(term))
}

fn vendor_is(product: &Value, vendor: &str) -> bool {
    product
        .get("vendor")
        .and_then(Value::as_str)
        .is_some_and(|v| v.eq_ignore_ascii_case(vendor))
}
