//! Cache types for product API responses.

use cosmopolitan_core::PaginatedProducts;
use serde_json::Value;

use super::ProductQuery;

/// Cache key for product listings and single products.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products(ProductQuery),
    ProductByHandle(String),
    ProductById(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(PaginatedProducts),
    Product(Box<Value>),
}
