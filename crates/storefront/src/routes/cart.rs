//! Cart route handlers.
//!
//! Each session owns one [`Cart`], stored in the session under
//! [`session_keys::CART`]. Handlers load it, apply one operation and write it
//! back; a session without a cart reads as empty.
//!
//! Load, apply and save are not atomic per session. Two concurrent requests
//! carrying the same cookie each work on their own copy and the last save
//! wins. Carts assume one writer per session.
//!
//! A cart is only written back when the operation changed it, so requests
//! that leave the cart untouched never create a session record.

use axum::Json;
use cosmopolitan_core::{Cart, LineItem, LineItemCandidate, LineItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::models::session_keys;

/// Cart data returned to clients.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub count: u64,
    pub total: Decimal,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        Self {
            count: cart.count(),
            total: cart.total(),
            items: cart.items().to_vec(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, or an empty one.
async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart in the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Load, mutate, save if changed, and return the resulting view.
async fn modify_cart(session: &Session, op: impl FnOnce(&mut Cart)) -> Result<Json<CartView>> {
    let before = load_cart(session).await?;
    let mut cart = before.clone();
    op(&mut cart);

    let view = CartView::from(cart.clone());
    if cart != before {
        save_cart(session, &cart).await?;
    }
    Ok(Json(view))
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub id: LineItemId,
    pub quantity: i64,
}

/// Remove item request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub id: LineItemId,
}

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    Ok(Json(CartView::from(load_cart(&session).await?)))
}

/// Add one unit of an item.
///
/// An item already in the cart keeps its stored title and price; only the
/// quantity goes up.
#[instrument(skip(session, candidate), fields(item_id = %candidate.id))]
pub async fn add(
    session: Session,
    Json(candidate): Json<LineItemCandidate>,
) -> Result<Json<CartView>> {
    let item_id = candidate.id.to_string();
    add_breadcrumb("cart", "Added item", Some(&[("item_id", item_id.as_str())]));
    modify_cart(&session, |cart| cart.add_to_cart(candidate)).await
}

/// Set an item's quantity; zero or less removes it.
#[instrument(skip(session, request), fields(item_id = %request.id, quantity = request.quantity))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    modify_cart(&session, |cart| {
        cart.update_quantity(&request.id, request.quantity);
    })
    .await
}

/// Remove an item.
#[instrument(skip(session, request), fields(item_id = %request.id))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    modify_cart(&session, |cart| cart.remove_from_cart(&request.id)).await
}

/// Get the cart item count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.count(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_view_from_cart() {
        let mut cart = Cart::new();
        cart.add_to_cart(LineItemCandidate::new(1, "Linen Shirt", "10".parse().unwrap()));
        cart.add_to_cart(LineItemCandidate::new(1, "Linen Shirt", "10".parse().unwrap()));
        cart.add_to_cart(LineItemCandidate::new("tote", "Canvas Tote", "4.50".parse().unwrap()));

        let view = CartView::from(cart);

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.count, 3);
        assert_eq!(view.total, Decimal::new(2450, 2));
    }

    #[test]
    fn test_cart_view_serializes_total_as_string() {
        let view = CartView::from(Cart::new());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["count"], 0);
        assert_eq!(json["total"], "0");
    }
}
