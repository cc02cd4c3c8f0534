//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /api/products           - Product listing (?page&limit&search&vendor)
//! GET  /api/products/{handle}  - Product detail
//! GET  /api/search             - Title search, 12 per page (?q&page)
//!
//! # Cart (session-scoped)
//! GET  /cart                   - Cart contents with count and total
//! POST /cart/add               - Add one unit of an item
//! POST /cart/update            - Set an item's quantity
//! POST /cart/remove            - Remove an item
//! GET  /cart/count             - Cart count badge
//! ```

pub mod cart;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product API routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{handle}", get(products::show))
        .route("/search", get(search::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", product_routes())
        .nest("/cart", cart_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
