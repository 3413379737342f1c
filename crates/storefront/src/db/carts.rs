//! Cart repository: the persistent side of cart aggregation.
//!
//! Every mutation here is a single atomic statement, so concurrent requests
//! against the same cart (a double-clicked add-to-cart button) can never lose
//! an update: the merge-or-insert is an `ON CONFLICT` upsert that increments
//! in place.

use rust_decimal::Decimal;
use sqlx::PgPool;

use sugar_plum_core::cart::CartLine;
use sugar_plum_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use crate::models::product::Product;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the cart belonging to `user_id`.
    ///
    /// Carts are created alongside their user at registration; if the row is
    /// missing anyway (e.g. data restored from an older backup), it is
    /// recreated here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::NotFound` if the user itself does not exist.
    pub async fn ensure_for_user(&self, user_id: UserId) -> Result<CartId, RepositoryError> {
        if let Some(id) = self.find_by_user(user_id).await? {
            return Ok(id);
        }

        sqlx::query("INSERT INTO storefront.carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                let err = RepositoryError::from(e);
                if err.is_foreign_key_violation() {
                    RepositoryError::NotFound
                } else {
                    err
                }
            })?;

        self.find_by_user(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Look up the cart ID for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Option<CartId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CartId>(
            "SELECT id FROM storefront.carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// Add one unit of `product_id` to the cart: merge-or-insert.
    ///
    /// Returns the line's resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product no longer exists
    /// in the catalog, or `RepositoryError::Database` for other failures.
    pub async fn add_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<u32, RepositoryError> {
        let quantity = sqlx::query_scalar::<_, i32>(
            "INSERT INTO storefront.cart_items (cart_id, product_id, quantity)
             VALUES ($1, $2, 1)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + 1
             RETURNING quantity",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = RepositoryError::from(e);
            if err.is_foreign_key_violation() {
                RepositoryError::NotFound
            } else {
                err
            }
        })?;

        Ok(u32::try_from(quantity).unwrap_or(0))
    }

    /// Delete the line for `product_id`, if present.
    ///
    /// Returns whether a line was removed; removing an absent product is a
    /// no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM storefront.cart_items WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Empty all lines from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM storefront.cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Fetch the cart's lines together with their catalog products, in the
    /// order they were first added.
    ///
    /// One query produces both the quantities and the prices, so every total
    /// derived from this snapshot uses a single consistent price source.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn fetch_lines(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<(CartLine, Product)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CartItemRow {
            quantity: i32,
            #[sqlx(flatten)]
            product: super::products::ProductRow,
        }

        let rows = sqlx::query_as::<_, CartItemRow>(
            "SELECT ci.quantity,
                    p.id, p.title, p.description, p.image_url, p.price, p.currency,
                    p.owner_id, p.created_at, p.updated_at
             FROM storefront.cart_items ci
             JOIN storefront.products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.added_at, p.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let product: Product = row.product.try_into()?;
                let line = CartLine {
                    product_id: product.id,
                    quantity: u32::try_from(row.quantity).unwrap_or(0),
                };
                Ok((line, product))
            })
            .collect()
    }

    /// Total number of units in the cart (the badge count).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_quantity(&self, cart_id: CartId) -> Result<u64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)
             FROM storefront.cart_items
             WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Derived cart total in one statement: Σ(quantity × live catalog price).
    ///
    /// Never stored; the single `SUM` keeps the price source consistent for
    /// the whole computation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_price(&self, cart_id: CartId) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(ci.quantity * p.price), 0)
             FROM storefront.cart_items ci
             JOIN storefront.products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }
}
