//! Normalize a saved product listing payload.
//!
//! Useful for checking what the storefront will make of a response captured
//! from the product API.

use std::path::Path;

use cosmopolitan_core::{PageRequest, PaginatedProducts, normalize_products};
use serde_json::Value;

use super::{CommandError, print_json};

/// Read `file`, normalize it for `page`/`limit`, and print the result.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or is not a
/// recognized listing shape.
pub async fn run(file: &Path, page: u32, limit: Option<u32>) -> Result<(), CommandError> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CommandError::Io {
            path: file.display().to_string(),
            source,
        })?;

    let request = limit.map_or_else(
        || PageRequest {
            page: page.max(1),
            limit: None,
        },
        |limit| PageRequest::new(page, limit),
    );

    let normalized = normalize_str(&raw, request)?;

    tracing::info!(
        returned = normalized.data.len(),
        total = normalized.total,
        total_pages = normalized.total_pages,
        "Normalized payload"
    );

    print_json(&normalized)
}

fn normalize_str(raw: &str, request: PageRequest) -> Result<PaginatedProducts, CommandError> {
    let payload: Value = serde_json::from_str(raw)?;
    Ok(normalize_products(payload, request)?)
}
