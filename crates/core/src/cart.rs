//! In-memory shopping cart.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s keyed by [`LineItemId`].
//! It is owned by exactly one session and mutated only through
//! [`Cart::add_to_cart`], [`Cart::update_quantity`] and
//! [`Cart::remove_from_cart`].
//!
//! ## Invariants
//! - No two items share an `id` (adding an existing id bumps its quantity)
//! - Every item has `quantity >= 1` (setting a quantity of zero or less removes it)
//!
//! `count` and `total` are computed from `items` on every call and are never
//! stored, so they cannot go stale.
//!
//! ```rust
//! # use cosmopolitan_core::{Cart, LineItemCandidate};
//! # use rust_decimal::Decimal;
//! let mut cart = Cart::new();
//! cart.add_to_cart(LineItemCandidate::new(1, "Linen Shirt", "10".parse().unwrap()));
//! cart.add_to_cart(LineItemCandidate::new(1, "Linen Shirt", "10".parse().unwrap()));
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.count(), 2);
//! assert_eq!(cart.total(), Decimal::from(20));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{LineItemId, UnitPrice};

/// An item offered to the cart, before it has a quantity.
///
/// Title, price and image are frozen copies taken when the shopper clicks
/// "add"; the cart never re-reads them from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemCandidate {
    /// Variant identifier.
    pub id: LineItemId,
    /// Display name.
    pub title: String,
    /// Price per unit.
    pub unit_price: UnitPrice,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Selected options (e.g., `Size` -> `M`); opaque to the cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_attributes: Option<BTreeMap<String, String>>,
}

impl LineItemCandidate {
    /// Create a candidate with no image or variant attributes.
    #[must_use]
    pub fn new(id: impl Into<LineItemId>, title: impl Into<String>, unit_price: UnitPrice) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            unit_price,
            image: None,
            variant_attributes: None,
        }
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    pub title: String,
    pub unit_price: UnitPrice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_attributes: Option<BTreeMap<String, String>>,
    /// Always at least 1.
    pub quantity: u32,
}

impl LineItem {
    fn from_candidate(candidate: LineItemCandidate) -> Self {
        Self {
            id: candidate.id,
            title: candidate.title,
            unit_price: candidate.unit_price,
            image: candidate.image,
            variant_attributes: candidate.variant_attributes,
            quantity: 1,
        }
    }

    /// Unit price times quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// The shopping cart for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `candidate`.
    ///
    /// If a line with the same id exists its quantity goes up by one and its
    /// title, price and image stay as they were first added. Otherwise a new
    /// line with quantity 1 is appended.
    pub fn add_to_cart(&mut self, candidate: LineItemCandidate) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == candidate.id) {
            item.quantity = item.quantity.saturating_add(1);
            return;
        }
        self.items.push(LineItem::from_candidate(candidate));
    }

    /// Set the quantity of a line to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &LineItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| &i.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line with `id`, if any.
    pub fn remove_from_cart(&mut self, id: &LineItemId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Total units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` across all lines.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
