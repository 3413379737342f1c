//! Catalog write access: the admin side of the product store.
//!
//! Ownership is enforced here: mutable fields are editable only by the admin
//! user that created the product. Deleting a product prunes it from every
//! shopper's cart in the same transaction (the FK cascade remains as a
//! backstop); order history is untouched because order lines carry their own
//! snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use sugar_plum_core::{AdminUserId, CurrencyCode, Price, ProductId};

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductChanges};

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    description: String,
    image_url: String,
    price: Decimal,
    currency: String,
    owner_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency = row.currency.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;
        let price = Price::new(row.price, currency).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            price,
            owner_id: AdminUserId::new(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, title, description, image_url, price, currency, owner_id, created_at, updated_at";

/// Repository for catalog management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole catalog, newest first, optionally restricted to one
    /// owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(
        &self,
        owner_id: Option<AdminUserId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {SELECT_COLUMNS}
             FROM storefront.products
             WHERE ($1::int IS NULL OR owner_id = $1)
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id.map(AdminUserId::as_i32))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Look up a single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM storefront.products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a product owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        owner_id: AdminUserId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO storefront.products
                 (title, description, image_url, price, currency, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.price.amount)
        .bind(product.price.currency_code.code())
        .bind(owner_id)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply `changes` to a product owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::NotOwner` if it belongs to a different admin, or
    /// `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: ProductId,
        owner_id: AdminUserId,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE storefront.products
             SET title       = COALESCE($3, title),
                 description = COALESCE($4, description),
                 image_url   = COALESCE($5, image_url),
                 price       = COALESCE($6, price),
                 currency    = COALESCE($7, currency),
                 updated_at  = now()
             WHERE id = $1 AND owner_id = $2
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id)
        .bind(owner_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.image_url.as_deref())
        .bind(changes.price)
        .bind(changes.currency.map(CurrencyCode::code))
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(self.missing_or_not_owner(id).await?),
        }
    }

    /// Delete a product owned by `owner_id`, pruning it from all carts.
    ///
    /// Returns the number of cart lines removed along with the product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::NotOwner` if it belongs to a different admin, or
    /// `RepositoryError::Database` for other failures.
    pub async fn delete(
        &self,
        id: ProductId,
        owner_id: AdminUserId,
    ) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so the ownership check and the delete agree.
        let owner = sqlx::query_scalar::<_, i32>(
            "SELECT owner_id FROM storefront.products WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        match owner {
            None => return Err(RepositoryError::NotFound),
            Some(found) if found != owner_id.as_i32() => {
                return Err(RepositoryError::NotOwner);
            }
            Some(_) => {}
        }

        let pruned = sqlx::query("DELETE FROM storefront.cart_items WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM storefront.products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(pruned)
    }

    /// Distinguish a missing product from one owned by someone else.
    async fn missing_or_not_owner(&self, id: ProductId) -> Result<RepositoryError, sqlx::Error> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM storefront.products WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(if exists {
            RepositoryError::NotOwner
        } else {
            RepositoryError::NotFound
        })
    }
}
