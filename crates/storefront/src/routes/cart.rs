//! Cart route handlers.
//!
//! All cart routes act on the logged-in shopper's own cart; totals in the
//! responses are derived on every read, never stored.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sugar_plum_core::ProductId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::cart::{CartService, CartSnapshot};
use crate::state::AppState;

/// One cart line as shown to the client.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub image_url: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// The whole cart as shown to the client.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub currency: String,
    pub item_count: u64,
}

impl From<CartSnapshot> for CartView {
    fn from(snapshot: CartSnapshot) -> Self {
        let items = snapshot
            .lines
            .iter()
            .map(|(product, quantity)| CartItemView {
                product_id: product.id,
                title: product.title.clone(),
                image_url: product.image_url.clone(),
                unit_price: product.price.amount,
                quantity: *quantity,
                line_total: product.price.line_total(*quantity),
            })
            .collect();

        Self {
            items,
            subtotal: snapshot.subtotal,
            currency: snapshot.currency.code().to_string(),
            item_count: snapshot.total_quantity,
        }
    }
}

/// Request body for add/remove.
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub product_id: i32,
}

/// Response after a cart mutation: the touched line plus fresh totals.
#[derive(Debug, Serialize)]
pub struct CartMutationResponse {
    pub product_id: ProductId,
    /// The line's quantity after the mutation (0 when removed).
    pub quantity: u32,
    /// Derived cart total after the mutation.
    pub cart_total: Decimal,
    /// Units in the cart after the mutation.
    pub cart_count: u64,
}

/// Display the cart.
#[instrument(skip(state, auth_user))]
pub async fn show(
    State(state): State<AppState>,
    auth_user: RequireAuth,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool());
    let snapshot = cart.snapshot(auth_user.0.id).await?;

    Ok(Json(CartView::from(snapshot)))
}

/// Add one unit of a product: merge-or-insert.
#[instrument(skip(state, auth_user, body))]
pub async fn add(
    State(state): State<AppState>,
    auth_user: RequireAuth,
    Json(body): Json<CartLineRequest>,
) -> Result<Json<CartMutationResponse>> {
    let user_id = auth_user.0.id;
    let product_id = ProductId::new(body.product_id);
    let cart = CartService::new(state.pool());

    let quantity = cart.add(user_id, product_id).await?;
    let cart_total = cart.total(user_id).await?;
    let cart_count = cart.count(user_id).await?;

    Ok(Json(CartMutationResponse {
        product_id,
        quantity,
        cart_total,
        cart_count,
    }))
}

/// Drop a product's line entirely. Absent lines are a no-op.
#[instrument(skip(state, auth_user, body))]
pub async fn remove(
    State(state): State<AppState>,
    auth_user: RequireAuth,
    Json(body): Json<CartLineRequest>,
) -> Result<Json<CartMutationResponse>> {
    let user_id = auth_user.0.id;
    let product_id = ProductId::new(body.product_id);
    let cart = CartService::new(state.pool());

    cart.remove(user_id, product_id).await?;
    let cart_total = cart.total(user_id).await?;
    let cart_count = cart.count(user_id).await?;

    Ok(Json(CartMutationResponse {
        product_id,
        quantity: 0,
        cart_total,
        cart_count,
    }))
}

/// Empty the cart.
#[instrument(skip(state, auth_user))]
pub async fn clear(State(state): State<AppState>, auth_user: RequireAuth) -> Result<StatusCode> {
    CartService::new(state.pool()).clear(auth_user.0.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Unit count for the cart badge.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Get the cart badge count.
#[instrument(skip(state, auth_user))]
pub async fn count(
    State(state): State<AppState>,
    auth_user: RequireAuth,
) -> Result<Json<CartCountView>> {
    let count = CartService::new(state.pool()).count(auth_user.0.id).await?;

    Ok(Json(CartCountView { count }))
}
