//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Auth
//! POST /auth/login             - Start session
//! POST /auth/logout            - End session
//! GET  /auth/me                - Current admin account
//!
//! # Catalog (requires admin; mutations need an editor role)
//! GET    /products             - Full catalog (owner filter)
//! POST   /products             - Create, owned by the current admin
//! GET    /products/{id}        - Product detail
//! PUT    /products/{id}        - Owner-only edits of mutable fields
//! DELETE /products/{id}        - Owner-only; prunes the product from carts
//! ```

pub mod auth;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/auth", auth_routes())
}
