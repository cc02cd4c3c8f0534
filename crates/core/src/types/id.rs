//! Line-item identifiers.
//!
//! Upstream catalogs identify variants with either numeric or string ids, and
//! the cart keeps whichever form it was given. The two forms never compare
//! equal: `LineItemId::Number(1)` and `LineItemId::Text("1")` are distinct keys.

use serde::{Deserialize, Serialize};

/// Identifier of a purchasable variant, unique within a cart.
///
/// # Example
///
/// ```rust
/// # use cosmopolitan_core::LineItemId;
/// let numeric: LineItemId = serde_json::from_str("42").unwrap();
/// let text: LineItemId = serde_json::from_str("\"gid://variant/42\"").unwrap();
///
/// assert_eq!(numeric, LineItemId::from(42));
/// assert_ne!(LineItemId::from("42"), LineItemId::from(42));
/// assert_eq!(text.to_string(), "gid://variant/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineItemId {
    /// Integer id (e.g., a Shopify variant id from `products.json`).
    Number(i64),
    /// Opaque string id.
    Text(String),
}

impl std::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for LineItemId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for LineItemId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for LineItemId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}
