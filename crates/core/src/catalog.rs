//! Canonical paginated product result and the upstream response normalizer.
//!
//! The product API has answered listing requests in three envelope shapes
//! over its lifetime:
//!
//! ```text
//! { "products": [...] }                                   single complete page
//! { "data": [...], "total", "page", "limit", "total_pages" }   already canonical
//! [ ... ]                                                 single complete page
//! ```
//!
//! [`ProductEnvelope::decode`] recognizes them in that order (so a payload
//! carrying both `products` and `data` is read as the first shape), and
//! [`normalize_products`] turns any of them into one [`PaginatedProducts`].
//! Product records themselves are passed through as opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 250;

/// Error decoding an upstream product listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The payload matched none of the known envelope shapes.
    #[error("Unexpected response shape: {found}")]
    UnexpectedResponseShape { found: &'static str },
}

/// The page that was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-indexed page number.
    pub page: u32,
    /// Page size, if the caller chose one.
    pub limit: Option<u32>,
}

impl PageRequest {
    /// Request `page` with an explicit `limit`.
    ///
    /// `page` is raised to 1 and `limit` is clamped to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: Some(limit.clamp(1, MAX_PAGE_LIMIT)),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
        }
    }
}

/// One page of products in the shape every consumer is written against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedProducts {
    /// Raw product records, in upstream order.
    pub data: Vec<Value>,
    /// Total products across all pages (best effort).
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    /// `ceil(total / limit)`, never less than 1.
    pub total_pages: u32,
}

impl PaginatedProducts {
    /// Wrap a complete, unpaginated list as page 1 of 1.
    ///
    /// `limit` falls back to the number of records when not given.
    #[must_use]
    pub fn single_page(data: Vec<Value>, limit: Option<u32>) -> Self {
        let total = len_u64(data.len());
        Self {
            limit: limit.unwrap_or_else(|| u32::try_from(data.len()).unwrap_or(u32::MAX)),
            data,
            total,
            page: 1,
            total_pages: 1,
        }
    }

    /// Cut page `page` of size `limit` out of a full in-memory list.
    #[must_use]
    pub fn from_slice(all: &[Value], page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let start = usize::try_from(u64::from(page - 1) * u64::from(limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let total = len_u64(all.len());

        Self {
            data: all.iter().skip(start).take(take).cloned().collect(),
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }

    /// The next page number if this page came back full.
    ///
    /// A short page means the listing is exhausted, regardless of what
    /// `total_pages` claims.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        let full =
            self.limit > 0 && self.data.len() == usize::try_from(self.limit).unwrap_or(usize::MAX);
        full.then(|| self.page.saturating_add(1))
    }
}

/// `ceil(total / limit)`, with a floor of 1 page.
#[must_use]
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Pagination fields of an envelope that is already canonical.
///
/// Fields other than `data` are optional; missing ones are filled from the
/// request when normalizing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataEnvelope {
    pub data: Vec<Value>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// The upstream listing shapes, in precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductEnvelope {
    /// `{ "products": [...] }`
    Products(Vec<Value>),
    /// `{ "data": [...], "total": .., "page": .., "limit": .., "total_pages": .. }`
    Data(DataEnvelope),
    /// `[ ... ]`
    Bare(Vec<Value>),
}

impl ProductEnvelope {
    /// Identify which shape `payload` is.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnexpectedResponseShape`] if the payload is
    /// neither an array nor an object with a `products` or `data` array, or if
    /// a `data` envelope carries pagination fields of the wrong type.
    pub fn decode(payload: Value) -> Result<Self, NormalizeError> {
        match payload {
            Value::Object(map) => Self::decode_object(map),
            Value::Array(items) => Ok(Self::Bare(items)),
            Value::Null => Err(unexpected("null")),
            Value::Bool(_) => Err(unexpected("boolean")),
            Value::Number(_) => Err(unexpected("number")),
            Value::String(_) => Err(unexpected("string")),
        }
    }

    fn decode_object(mut map: Map<String, Value>) -> Result<Self, NormalizeError> {
        if matches!(map.get("products"), Some(Value::Array(_)))
            && let Some(Value::Array(products)) = map.remove("products")
        {
            return Ok(Self::Products(products));
        }

        if matches!(map.get("data"), Some(Value::Array(_))) {
            return serde_json::from_value(Value::Object(map))
                .map(Self::Data)
                .map_err(|_| unexpected("data envelope with invalid pagination fields"));
        }

        Err(unexpected("object without a products or data array"))
    }

    /// Convert into the canonical result for `request`.
    #[must_use]
    pub fn into_paginated(self, request: PageRequest) -> PaginatedProducts {
        match self {
            Self::Products(items) | Self::Bare(items) => {
                PaginatedProducts::single_page(items, request.limit)
            }
            Self::Data(envelope) => {
                let total = envelope.total.unwrap_or_else(|| len_u64(envelope.data.len()));
                let limit = envelope
                    .limit
                    .or(request.limit)
                    .unwrap_or_else(|| u32::try_from(envelope.data.len()).unwrap_or(u32::MAX));
                PaginatedProducts {
                    page: envelope.page.unwrap_or(request.page),
                    total_pages: envelope
                        .total_pages
                        .unwrap_or_else(|| total_pages(total, limit)),
                    data: envelope.data,
                    total,
                    limit,
                }
            }
        }
    }
}

const fn unexpected(found: &'static str) -> NormalizeError {
    NormalizeError::UnexpectedResponseShape { found }
}

/// Normalize a decoded product-listing payload into [`PaginatedProducts`].
///
/// # Errors
///
/// Returns [`NormalizeError::UnexpectedResponseShape`] when the payload is
/// not one of the known shapes. The error is meant to reach the caller
/// unchanged; nothing here retries.
///
/// # Example
///
/// ```rust
/// # use cosmopolitan_core::{PageRequest, normalize_products};
/// # use serde_json::json;
/// let page = normalize_products(json!({"products": [{"id": 1}]}), PageRequest::new(1, 10)).unwrap();
/// assert_eq!(page.total, 1);
/// assert_eq!(page.limit, 10);
/// assert_eq!(page.total_pages, 1);
/// ```
pub fn normalize_products(
    payload: Value,
    request: PageRequest,
) -> Result<PaginatedProducts, NormalizeError> {
    ProductEnvelope::decode(payload).map(|envelope| envelope.into_paginated(request))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_limit() -> PageRequest {
        PageRequest::default()
    }

    #[test]
    fn test_products_envelope_is_single_page() {
        let payload = json!({"products": [{"id": "a"}, {"id": "b"}, {"id": "c"}]});

        let page = normalize_products(payload, PageRequest::new(1, 10)).unwrap();

        assert_eq!(
            page,
            PaginatedProducts {
                data: vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})],
                total: 3,
                page: 1,
                limit: 10,
                total_pages: 1,
            }
        );
    }

    #[test]
    fn test_products_envelope_limit_defaults_to_len() {
        let payload = json!({"products": [{"id": 1}, {"id": 2}]});

        let page = normalize_products(payload, no_limit()).unwrap();

        assert_eq!(page.limit, 2);
    }

    #[test]
    fn test_products_envelope_ignores_requested_page() {
        let payload = json!({"products": [{"id": 1}]});

        let page = normalize_products(payload, PageRequest::new(4, 10)).unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_data_envelope_passes_through() {
        let payload = json!({
            "data": [{"id": "a"}, {"id": "b"}],
            "total": 50,
            "page": 2,
            "limit": 25,
            "total_pages": 2
        });

        let page = normalize_products(payload.clone(), PageRequest::new(1, 10)).unwrap();

        assert_eq!(serde_json::to_value(&page).unwrap(), payload);
    }

    #[test]
    fn test_data_envelope_fills_missing_fields() {
        let payload = json!({"data": [{"id": 1}, {"id": 2}, {"id": 3}], "total": 7});

        let page = normalize_products(payload, PageRequest::new(2, 3)).unwrap();

        assert_eq!(page.total, 7);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 3);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_data_envelope_with_bad_total_is_rejected() {
        let payload = json!({"data": [], "total": "many"});

        let err = normalize_products(payload, no_limit()).unwrap_err();

        assert!(matches!(err, NormalizeError::UnexpectedResponseShape { .. }));
    }

    #[test]
    fn test_bare_array_is_single_page() {
        let page = normalize_products(json!([{"id": "a"}]), no_limit()).unwrap();

        assert_eq!(
            page,
            PaginatedProducts {
                data: vec![json!({"id": "a"})],
                total: 1,
                page: 1,
                limit: 1,
                total_pages: 1,
            }
        );
    }

    #[test]
    fn test_products_wins_over_data() {
        let payload = json!({
            "products": [{"id": "p"}],
            "data": [{"id": "d1"}, {"id": "d2"}],
            "total": 2
        });

        let envelope = ProductEnvelope::decode(payload).unwrap();

        assert_eq!(envelope, ProductEnvelope::Products(vec![json!({"id": "p"})]));
    }

    #[test]
    fn test_non_array_products_falls_through_to_data() {
        let payload = json!({"products": "none", "data": [{"id": 1}]});

        let envelope = ProductEnvelope::decode(payload).unwrap();

        assert!(matches!(envelope, ProductEnvelope::Data(_)));
    }

    #[test]
    fn test_unknown_object_is_rejected() {
        let err = normalize_products(json!({"foo": "bar"}), no_limit()).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::UnexpectedResponseShape {
                found: "object without a products or data array"
            }
        );
        assert!(err.to_string().starts_with("Unexpected response shape"));
    }

    #[test]
    fn test_scalars_are_rejected() {
        for payload in [json!(null), json!(true), json!(3), json!("products")] {
            assert!(normalize_products(payload, no_limit()).is_err());
        }
    }

    #[test]
    fn test_empty_products_has_one_page() {
        let page = normalize_products(json!({"products": []}), no_limit()).unwrap();

        assert_eq!(page.total, 0);
        assert_eq!(page.limit, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_total_pages_rounds_up_with_floor() {
        assert_eq!(total_pages(0, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(10, 0), 1);
    }

    #[test]
    fn test_from_slice_pages() {
        let all: Vec<Value> = (1..=12).map(|i| json!({"id": i})).collect();

        let second = PaginatedProducts::from_slice(&all, 2, 5);
        assert_eq!(second.data.first(), Some(&json!({"id": 6})));
        assert_eq!(second.data.len(), 5);
        assert_eq!(second.total, 12);
        assert_eq!(second.total_pages, 3);

        let past_end = PaginatedProducts::from_slice(&all, 9, 5);
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.page, 9);
    }

    #[test]
    fn test_next_page_only_when_full() {
        let all: Vec<Value> = (1..=12).map(|i| json!({"id": i})).collect();

        assert_eq!(PaginatedProducts::from_slice(&all, 1, 6).next_page(), Some(2));
        assert_eq!(PaginatedProducts::from_slice(&all, 3, 5).next_page(), None);
    }

    #[test]
    fn test_page_request_clamps() {
        let request = PageRequest::new(0, 10_000);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, Some(MAX_PAGE_LIMIT));
    }
}
