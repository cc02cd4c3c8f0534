//! Cosmopolitan CLI - catalog inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a saved product API response
//! cosmo-cli normalize response.json --page 2 --limit 25
//!
//! # List products from the configured catalog
//! cosmo-cli products --search linen --limit 12
//!
//! # Show one product
//! cosmo-cli product linen-shirt
//! ```
//!
//! # Commands
//!
//! - `normalize` - Print the canonical paginated form of a listing payload
//! - `products` - Query the configured catalog (`CATALOG_*` variables)
//! - `product` - Fetch a product by handle

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cosmo-cli")]
#[command(author, version, about = "Cosmopolitan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a saved product listing payload
    Normalize {
        /// JSON file holding the payload
        file: PathBuf,

        /// Page the payload was requested for
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Page size the payload was requested with
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List products from the configured catalog
    Products {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long)]
        limit: Option<u32>,

        /// Title search
        #[arg(short, long)]
        search: Option<String>,

        /// Vendor filter
        #[arg(short, long)]
        vendor: Option<String>,
    },
    /// Show one product by handle
    Product {
        /// Product URL handle
        handle: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Normalize { file, page, limit } => {
            commands::normalize::run(&file, page, limit).await?;
        }
        Commands::Products {
            page,
            limit,
            search,
            vendor,
        } => commands::catalog::products(page, limit, search, vendor).await?,
        Commands::Product { handle } => commands::catalog::product(&handle).await?,
    }
    Ok(())
}
