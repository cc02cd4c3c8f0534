//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the shopper's [`Cart`](cosmopolitan_core::Cart).
    pub const CART: &str = "cart";
}
