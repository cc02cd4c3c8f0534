//! Search route handlers.
//!
//! Search pages are fixed at [`SEARCH_PAGE_SIZE`] results. A full page means
//! there may be more, so the response carries the next page number; a short
//! page ends the scroll.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::products::empty_string_as_none;
use crate::catalog::ProductQuery;
use crate::error::Result;
use crate::state::AppState;

/// Results per search page.
pub const SEARCH_PAGE_SIZE: u32 = 12;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
}

/// One page of search results.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Value>,
    pub page: u32,
    pub next_page: Option<u32>,
}

/// Search products by title.
#[instrument(skip(state), fields(q = %query.q))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let product_query = ProductQuery::page(query.page.unwrap_or(1), SEARCH_PAGE_SIZE)
        .with_search(Some(query.q));

    let results = state.catalog().products(&product_query).await?;
    let next_page = results.next_page();

    Ok(Json(SearchResponse {
        page: results.page,
        products: results.data,
        next_page,
    }))
}
