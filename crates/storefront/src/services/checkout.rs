//! Checkout service: converts a cart into an immutable order.

use sqlx::PgPool;
use thiserror::Error;

use sugar_plum_core::{OrderId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::order::Order;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was attempted with zero lines; nothing was written.
    #[error("cart is empty")]
    EmptyCart,

    /// A concurrent modification was detected twice in a row.
    #[error("checkout conflicted with a concurrent request, please retry")]
    Conflict,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Checkout service.
pub struct CheckoutService<'a> {
    carts: CartRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Convert the user's cart into an order.
    ///
    /// Snapshotting the lines, writing the order, and clearing the cart all
    /// happen in one transaction holding the cart's row lock, so a duplicate
    /// submission either waits and fails with [`CheckoutError::EmptyCart`] or
    /// never sees an intermediate state.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines (no state
    /// change), `CheckoutError::Conflict` if serialization failures persist
    /// past the automatic retry, or `CheckoutError::Repository` otherwise.
    pub async fn checkout(&self, user_id: UserId) -> Result<Order, CheckoutError> {
        let cart_id = self.carts.ensure_for_user(user_id).await?;

        let first = self.orders.checkout_cart(user_id, cart_id).await;
        let converted = match first {
            Err(e) if e.is_serialization_conflict() => {
                tracing::warn!(%cart_id, "retrying checkout after serialization conflict");
                self.orders
                    .checkout_cart(user_id, cart_id)
                    .await
                    .map_err(|e| {
                        if e.is_serialization_conflict() {
                            CheckoutError::Conflict
                        } else {
                            CheckoutError::Repository(e)
                        }
                    })?
            }
            other => other?,
        };

        let order = converted.ok_or(CheckoutError::EmptyCart)?;
        tracing::info!(
            order_id = %order.id,
            reference = %order.reference,
            lines = order.lines.len(),
            total = %order.total,
            "order placed"
        );
        Ok(order)
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn orders(&self, user_id: UserId) -> Result<Vec<Order>, CheckoutError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// Fetch one of the user's orders.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<Order>, CheckoutError> {
        Ok(self.orders.find_for_user(user_id, order_id).await?)
    }
}
