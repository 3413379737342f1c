//! Cart service: per-user cart orchestration.
//!
//! Wraps the cart repository with product resolution, derived-total
//! computation, and a single automatic retry when `PostgreSQL` reports a
//! serialization conflict.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use sugar_plum_core::cart::CartContents;
use sugar_plum_core::{CartId, CurrencyCode, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::product::Product;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The referenced product does not (or no longer) exist in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A concurrent modification was detected twice in a row.
    #[error("cart was modified concurrently, please retry")]
    Conflict,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A hydrated view of one cart: lines with their products, plus totals
/// derived from the same fetch.
#[derive(Debug)]
pub struct CartSnapshot {
    /// (product, quantity) pairs in the order first added.
    pub lines: Vec<(Product, u32)>,
    /// Σ(quantity × unit price) over this snapshot. Always derived on read.
    pub subtotal: Decimal,
    /// Currency of the subtotal.
    pub currency: CurrencyCode,
    /// Total units across all lines.
    pub total_quantity: u64,
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Resolve the user's cart ID.
    async fn cart_id(&self, user_id: UserId) -> Result<CartId, RepositoryError> {
        self.carts.ensure_for_user(user_id).await
    }

    /// Add one unit of `product_id` to the user's cart (merge-or-insert).
    ///
    /// Returns the line's resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product cannot be
    /// resolved, or `CartError::Conflict` if a concurrent modification was
    /// detected on both the initial attempt and the automatic retry.
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<u32, CartError> {
        // Resolve first so a stale reference fails with a clean not-found
        // rather than an FK error; the upsert still maps FK violations for
        // the delete-raced case.
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }

        let cart_id = self.cart_id(user_id).await?;

        match self.try_add(cart_id, product_id).await {
            Err(CartError::Repository(e)) if e.is_serialization_conflict() => {
                tracing::warn!(%cart_id, %product_id, "retrying add after serialization conflict");
                self.try_add(cart_id, product_id)
                    .await
                    .map_err(into_conflict)
            }
            other => other,
        }
    }

    async fn try_add(&self, cart_id: CartId, product_id: ProductId) -> Result<u32, CartError> {
        self.carts
            .add_product(cart_id, product_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ProductNotFound(product_id),
                other => CartError::Repository(other),
            })
    }

    /// Remove the line for `product_id` from the user's cart.
    ///
    /// Returns whether a line was removed; removing an absent product is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Conflict` after a failed automatic retry, or
    /// `CartError::Repository` for other database errors.
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<bool, CartError> {
        let cart_id = self.cart_id(user_id).await?;

        match self.carts.remove_product(cart_id, product_id).await {
            Err(e) if e.is_serialization_conflict() => {
                tracing::warn!(%cart_id, %product_id, "retrying remove after serialization conflict");
                self.carts
                    .remove_product(cart_id, product_id)
                    .await
                    .map_err(|e| into_conflict(CartError::Repository(e)))
            }
            other => other.map_err(CartError::Repository),
        }
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Conflict` after a failed automatic retry, or
    /// `CartError::Repository` for other database errors.
    pub async fn clear(&self, user_id: UserId) -> Result<(), CartError> {
        let cart_id = self.cart_id(user_id).await?;

        match self.carts.clear(cart_id).await {
            Err(e) if e.is_serialization_conflict() => {
                tracing::warn!(%cart_id, "retrying clear after serialization conflict");
                self.carts
                    .clear(cart_id)
                    .await
                    .map_err(|e| into_conflict(CartError::Repository(e)))
            }
            other => other.map_err(CartError::Repository),
        }
    }

    /// Fetch the cart with totals derived from one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the fetch fails.
    pub async fn snapshot(&self, user_id: UserId) -> Result<CartSnapshot, CartError> {
        let cart_id = self.cart_id(user_id).await?;
        let rows = self.carts.fetch_lines(cart_id).await?;

        // Recompute the total from exactly the rows fetched above - one
        // price source per call, never a mix of live and stale prices.
        let contents = CartContents::from_lines(rows.iter().map(|(line, _)| *line));
        let subtotal = contents
            .subtotal(|product_id| {
                rows.iter()
                    .find(|(_, product)| product.id == product_id)
                    .map(|(_, product)| product.price.amount)
            })
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let currency = rows
            .first()
            .map_or_else(CurrencyCode::default, |(_, product)| {
                product.price.currency_code
            });
        let total_quantity = contents.total_quantity();

        Ok(CartSnapshot {
            lines: rows
                .into_iter()
                .map(|(line, product)| (product, line.quantity))
                .collect(),
            subtotal,
            currency,
            total_quantity,
        })
    }

    /// Total units in the user's cart (the badge count).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn count(&self, user_id: UserId) -> Result<u64, CartError> {
        let cart_id = self.cart_id(user_id).await?;
        Ok(self.carts.total_quantity(cart_id).await?)
    }

    /// The cart's derived total price, computed in a single statement.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn total(&self, user_id: UserId) -> Result<Decimal, CartError> {
        let cart_id = self.cart_id(user_id).await?;
        Ok(self.carts.total_price(cart_id).await?)
    }
}

/// Collapse a second serialization failure into the transient-conflict error.
fn into_conflict(err: CartError) -> CartError {
    match err {
        CartError::Repository(e) if e.is_serialization_conflict() => CartError::Conflict,
        other => other,
    }
}
