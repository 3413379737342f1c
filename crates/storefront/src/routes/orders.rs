//! Checkout and order-history route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use sugar_plum_core::{OrderId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::order::Order;
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// One order line as shown to the client (the checkout-time snapshot).
#[derive(Debug, Serialize)]
pub struct OrderLineView {
    /// `None` once the product has been deleted from the catalog.
    pub product_id: Option<ProductId>,
    pub title: String,
    pub image_url: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// An order as shown to the client.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub reference: Uuid,
    pub total: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let lines = order
            .lines
            .iter()
            .map(|line| OrderLineView {
                product_id: line.snapshot.product_id,
                title: line.snapshot.title.clone(),
                image_url: line.snapshot.image_url.clone(),
                unit_price: line.snapshot.unit_price.amount,
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();

        Self {
            id: order.id,
            reference: order.reference,
            total: order.total.amount,
            currency: order.total.currency_code.code().to_string(),
            created_at: order.created_at,
            lines,
        }
    }
}

/// Convert the cart into an order.
///
/// Fails with 422 when the cart is empty; the cart is untouched in that case.
#[instrument(skip(state, auth_user))]
pub async fn checkout(
    State(state): State<AppState>,
    auth_user: RequireAuth,
) -> Result<(StatusCode, Json<OrderView>)> {
    let order = CheckoutService::new(state.pool())
        .checkout(auth_user.0.id)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderView::from(&order))))
}

/// List the shopper's orders, newest first.
#[instrument(skip(state, auth_user))]
pub async fn index(
    State(state): State<AppState>,
    auth_user: RequireAuth,
) -> Result<Json<Vec<OrderView>>> {
    let orders = CheckoutService::new(state.pool())
        .orders(auth_user.0.id)
        .await?;

    Ok(Json(orders.iter().map(OrderView::from).collect()))
}

/// One of the shopper's orders.
#[instrument(skip(state, auth_user))]
pub async fn show(
    State(state): State<AppState>,
    auth_user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<OrderView>> {
    let order_id = OrderId::new(id);
    let order = CheckoutService::new(state.pool())
        .order(auth_user.0.id, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    Ok(Json(OrderView::from(&order)))
}
