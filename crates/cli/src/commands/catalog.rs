//! Query the configured product catalog.
//!
//! Reads the same `CATALOG_*` environment variables as the storefront, so
//! this shows exactly what the storefront would serve.

use cosmopolitan_storefront::catalog::{Catalog, ProductQuery};
use cosmopolitan_storefront::config::StorefrontConfig;

use super::{CommandError, print_json};

async fn open_catalog() -> Result<Catalog, CommandError> {
    let config = StorefrontConfig::from_env()?;
    let catalog = Catalog::from_config(&config.catalog).await?;
    tracing::info!(source = catalog.source_name(), "Opened catalog");
    Ok(catalog)
}

/// Print one page of products.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the catalog request fails.
pub async fn products(
    page: u32,
    limit: Option<u32>,
    search: Option<String>,
    vendor: Option<String>,
) -> Result<(), CommandError> {
    let catalog = open_catalog().await?;

    let query = ProductQuery {
        page,
        limit,
        ..ProductQuery::default()
    }
    .with_search(search)
    .with_vendor(vendor);

    let page = catalog.products(&query).await?;
    print_json(&page)
}

/// Print a single product.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the product does not exist.
pub async fn product(handle: &str) -> Result<(), CommandError> {
    let catalog = open_catalog().await?;
    let product = catalog.product(handle).await?;
    print_json(&product)
}
