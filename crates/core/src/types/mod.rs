//! Core types for Cosmopolitan.
//!
//! This module provides type-safe wrappers for values copied into the cart.

pub mod id;
pub mod price;

pub use id::LineItemId;
pub use price::{MAX_UNIT_PRICE, PriceError, UnitPrice};
