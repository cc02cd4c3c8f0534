//! Cosmopolitan Core - Cart store and product normalization.
//!
//! Shared by the storefront HTTP service and the `cosmo-cli` tools.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session storage. Callers own the cart value and feed already
//! decoded JSON into the normalizer.
//!
//! # Modules
//!
//! - [`types`] - Line-item ids and unit prices
//! - [`cart`] - In-memory cart with add/update/remove and derived totals
//! - [`catalog`] - Canonical paginated product result and the response normalizer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, LineItem, LineItemCandidate};
pub use catalog::{
    NormalizeError, PageRequest, PaginatedProducts, ProductEnvelope, normalize_products,
};
pub use types::*;
