//! Order repository: checkout conversion and order history.
//!
//! Checkout is one transaction that locks the cart row, snapshots the lines,
//! writes the order, and clears the cart. Either all of that commits or none
//! of it does; there is no observable state with both an order and a
//! populated cart. A concurrent duplicate submission blocks on the row lock,
//! then sees an empty cart and converts nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use sugar_plum_core::cart::{CartContents, CartLine};
use sugar_plum_core::{CartId, CurrencyCode, OrderId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderLine, ProductSnapshot};

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    reference: Uuid,
    user_id: i32,
    total: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
}

/// Internal row type for `PostgreSQL` order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: Option<i32>,
    title: String,
    description: String,
    image_url: String,
    unit_price: Decimal,
    currency: String,
    quantity: i32,
}

/// The product columns captured inside the checkout transaction.
#[derive(Debug, sqlx::FromRow)]
struct SnapshotRow {
    product_id: i32,
    quantity: i32,
    title: String,
    description: String,
    image_url: String,
    price: Decimal,
    currency: String,
}

fn parse_price(
    amount: Decimal,
    currency: &str,
    context: &str,
) -> Result<Price, RepositoryError> {
    let currency = currency.parse::<CurrencyCode>().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid currency in {context}: {e}"))
    })?;
    Price::new(amount, currency)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in {context}: {e}")))
}

impl TryFrom<OrderItemRow> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let unit_price = parse_price(row.unit_price, &row.currency, "order item")?;

        Ok(Self {
            snapshot: ProductSnapshot {
                product_id: row.product_id.map(ProductId::new),
                title: row.title,
                description: row.description,
                image_url: row.image_url,
                unit_price,
            },
            quantity: u32::try_from(row.quantity).unwrap_or(0),
        })
    }
}

fn assemble_order(row: OrderRow, lines: Vec<OrderLine>) -> Result<Order, RepositoryError> {
    let total = parse_price(row.total, &row.currency, "order")?;

    Ok(Order {
        id: OrderId::new(row.id),
        reference: row.reference,
        user_id: UserId::new(row.user_id),
        total,
        created_at: row.created_at,
        lines,
    })
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the cart into an order and clear it, atomically.
    ///
    /// Returns `Ok(None)` if the cart holds no lines; nothing is written in
    /// that case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart row is missing,
    /// `RepositoryError::DataCorruption` for invalid stored data, or
    /// `RepositoryError::Database` for other failures (including
    /// serialization conflicts, which the service layer retries).
    pub async fn checkout_cart(
        &self,
        user_id: UserId,
        cart_id: CartId,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Serializes checkouts (and guards against double submission): the
        // second transaction waits here, then finds the cart already empty.
        let locked = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM storefront.carts WHERE id = $1 FOR UPDATE",
        )
        .bind(cart_id)
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let snapshot = sqlx::query_as::<_, SnapshotRow>(
            "SELECT ci.product_id, ci.quantity,
                    p.title, p.description, p.image_url, p.price, p.currency
             FROM storefront.cart_items ci
             JOIN storefront.products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.added_at, p.id",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if snapshot.is_empty() {
            return Ok(None);
        }

        // Total over the same snapshot the lines are built from.
        let contents = CartContents::from_lines(snapshot.iter().map(|row| CartLine {
            product_id: ProductId::new(row.product_id),
            quantity: u32::try_from(row.quantity).unwrap_or(0),
        }));
        let total_amount = contents
            .subtotal(|product_id| {
                snapshot
                    .iter()
                    .find(|row| row.product_id == product_id.as_i32())
                    .map(|row| row.price)
            })
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let currency = snapshot
            .first()
            .map_or(CurrencyCode::default(), |row| {
                row.currency.parse().unwrap_or_default()
            });

        let reference = Uuid::new_v4();
        let order_row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO storefront.orders (reference, user_id, total, currency)
             VALUES ($1, $2, $3, $4)
             RETURNING id, reference, user_id, total, currency, created_at",
        )
        .bind(reference)
        .bind(user_id)
        .bind(total_amount)
        .bind(currency.code())
        .fetch_one(&mut *tx)
        .await?;

        let product_ids: Vec<i32> = snapshot.iter().map(|row| row.product_id).collect();
        let titles: Vec<&str> = snapshot.iter().map(|row| row.title.as_str()).collect();
        let descriptions: Vec<&str> = snapshot.iter().map(|row| row.description.as_str()).collect();
        let image_urls: Vec<&str> = snapshot.iter().map(|row| row.image_url.as_str()).collect();
        let prices: Vec<Decimal> = snapshot.iter().map(|row| row.price).collect();
        let currencies: Vec<&str> = snapshot.iter().map(|row| row.currency.as_str()).collect();
        let quantities: Vec<i32> = snapshot.iter().map(|row| row.quantity).collect();

        sqlx::query(
            "INSERT INTO storefront.order_items
                 (order_id, product_id, title, description, image_url, unit_price, currency, quantity)
             SELECT $1, unnest($2::int[]), unnest($3::text[]), unnest($4::text[]),
                    unnest($5::text[]), unnest($6::numeric[]), unnest($7::text[]), unnest($8::int[])",
        )
        .bind(order_row.id)
        .bind(&product_ids)
        .bind(&titles)
        .bind(&descriptions)
        .bind(&image_urls)
        .bind(&prices)
        .bind(&currencies)
        .bind(&quantities)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM storefront.cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let lines = snapshot
            .into_iter()
            .map(|row| {
                let unit_price = parse_price(row.price, &row.currency, "cart snapshot")?;
                Ok(OrderLine {
                    snapshot: ProductSnapshot {
                        product_id: Some(ProductId::new(row.product_id)),
                        title: row.title,
                        description: row.description,
                        image_url: row.image_url,
                        unit_price,
                    },
                    quantity: u32::try_from(row.quantity).unwrap_or(0),
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(Some(assemble_order(order_row, lines)?))
    }

    /// List a user's orders, newest first, with their lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, reference, user_id, total, currency, created_at
             FROM storefront.orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let order_ids: Vec<i32> = order_rows.iter().map(|row| row.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT order_id, product_id, title, description, image_url,
                    unit_price, currency, quantity
             FROM storefront.order_items
             WHERE order_id = ANY($1)
             ORDER BY id",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut lines_by_order: std::collections::HashMap<i32, Vec<OrderLine>> =
            std::collections::HashMap::with_capacity(order_rows.len());
        for item in item_rows {
            let order_id = item.order_id;
            lines_by_order
                .entry(order_id)
                .or_default()
                .push(item.try_into()?);
        }

        order_rows
            .into_iter()
            .map(|row| {
                let lines = lines_by_order.remove(&row.id).unwrap_or_default();
                assemble_order(row, lines)
            })
            .collect()
    }

    /// Fetch one of the user's orders by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn find_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, OrderRow>(
            "SELECT id, reference, user_id, total, currency, created_at
             FROM storefront.orders
             WHERE id = $1 AND user_id = $2",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, OrderItemRow>(
            "SELECT order_id, product_id, title, description, image_url,
                    unit_price, currency, quantity
             FROM storefront.order_items
             WHERE order_id = $1
             ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<OrderLine>, _>>()?;

        Ok(Some(assemble_order(row, lines)?))
    }
}
