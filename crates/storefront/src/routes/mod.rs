//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Products (public)
//! GET  /products               - Product listing (search, owner, pagination)
//! GET  /products/{id}          - Product detail (cached)
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart with lines and derived total
//! POST /cart/add               - Add one unit (merge-or-insert)
//! POST /cart/remove            - Drop a line (no-op if absent)
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Unit count badge
//!
//! # Checkout & orders (requires auth)
//! POST /checkout               - Convert cart into an order
//! GET  /orders                 - Order history
//! GET  /orders/{id}            - Order detail
//!
//! # Auth
//! POST /auth/register          - Create account (+cart), start session
//! POST /auth/login             - Start session
//! POST /auth/logout            - End session
//! GET  /auth/me                - Current account
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(orders::checkout))
        .nest("/orders", order_routes())
        .nest("/auth", auth_routes())
}
