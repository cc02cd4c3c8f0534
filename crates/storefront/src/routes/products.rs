//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use cosmopolitan_core::PaginatedProducts;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::instrument;

use crate::catalog::ProductQuery;
use crate::error::Result;
use crate::state::AppState;

/// Deserialize empty strings as `None` for optional numeric fields.
pub(crate) fn empty_string_as_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub vendor: Option<String>,
}

impl ListingQuery {
    /// Resolve into a catalog query, defaulting the page size from config.
    fn into_product_query(self, default_limit: u32) -> ProductQuery {
        ProductQuery {
            page: self.page.unwrap_or(1),
            limit: Some(self.limit.unwrap_or(default_limit)),
            ..ProductQuery::default()
        }
        .with_search(self.search)
        .with_vendor(self.vendor)
    }
}

/// List one page of products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<PaginatedProducts>> {
    let query = query.into_product_query(state.config().catalog.page_size);
    let page = state.catalog().products(&query).await?;

    tracing::debug!(
        page = page.page,
        returned = page.data.len(),
        total = page.total,
        "Listed products"
    );

    Ok(Json(page))
}

/// Show a single product by handle.
#[instrument(skip(state), fields(handle = %handle))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Value>> {
    let product = state.catalog().product(&handle).await?;
    Ok(Json(product))
}
