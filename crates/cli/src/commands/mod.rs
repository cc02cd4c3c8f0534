//! CLI subcommands.

pub mod catalog;
pub mod normalize;

use cosmopolitan_core::NormalizeError;
use cosmopolitan_storefront::catalog::CatalogError;
use cosmopolitan_storefront::config::ConfigError;
use thiserror::Error;

/// Errors a subcommand can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Write a value to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
fn print_json(value: &impl serde::Serialize) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
