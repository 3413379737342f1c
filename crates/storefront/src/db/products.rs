//! Catalog read access for the storefront.
//!
//! Products are created and edited by the admin service; the storefront only
//! ever reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use sugar_plum_core::{AdminUserId, CurrencyCode, Price, ProductId};

use super::RepositoryError;
use crate::models::product::Product;

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Decimal,
    pub currency: String,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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

/// Filter and pagination parameters for catalog listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match against the title.
    pub search: Option<String>,
    /// Restrict to products owned by one admin user.
    pub owner_id: Option<AdminUserId>,
    /// Page size; `None` means the repository default.
    pub limit: Option<i64>,
    /// Row offset into the filtered listing.
    pub offset: i64,
}

/// Default page size for catalog listings.
const DEFAULT_LIMIT: i64 = 50;

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, title, description, image_url, price, currency, owner_id,
                    created_at, updated_at
             FROM storefront.products
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List products, newest first, applying the given filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 200);
        let offset = filter.offset.max(0);

        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, title, description, image_url, price, currency, owner_id,
                    created_at, updated_at
             FROM storefront.products
             WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
               AND ($2::int IS NULL OR owner_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(filter.search.as_deref())
        .bind(filter.owner_id.map(AdminUserId::as_i32))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
