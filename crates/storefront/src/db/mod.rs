//! Database operations for the storefront.
//!
//! # Tables (schema `storefront`)
//!
//! - `users` / `user_passwords` - shopper accounts and Argon2 hashes
//! - `sessions` - tower-sessions storage
//! - `products` - the catalog (written by the admin service, read here)
//! - `carts` / `cart_items` - one cart per user, one line per product
//! - `orders` / `order_items` - immutable checkout snapshots
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p sugar-plum-cli -- migrate
//! ```
//!
//! All queries are runtime-bound (`sqlx::query_as` with row structs), so the
//! workspace builds without a live database.

pub mod carts;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether this error is a serialization failure or deadlock - a lost
    /// update detected by `PostgreSQL` (SQLSTATE 40001 / 40P01). These are
    /// retried once by the service layer before being surfaced.
    #[must_use]
    pub fn is_serialization_conflict(&self) -> bool {
        if let Self::Database(sqlx::Error::Database(db_err)) = self {
            matches!(db_err.code().as_deref(), Some("40001" | "40P01"))
        } else {
            false
        }
    }

    /// Whether this error is a foreign-key violation, e.g. adding a product
    /// to a cart after the product was deleted from the catalog.
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        if let Self::Database(sqlx::Error::Database(db_err)) = self {
            db_err.is_foreign_key_violation()
        } else {
            false
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
