//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use sugar_plum_core::ProductId;

use crate::config::StorefrontConfig;
use crate::models::product::Product;

/// How long product detail reads may be served from cache.
///
/// Cart totals and checkout never consult this cache; they always read the
/// catalog inside their own query or transaction.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Maximum number of products kept in the read cache.
const PRODUCT_CACHE_CAPACITY: u64 = 1024;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    product_cache: Cache<ProductId, Product>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                product_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product read cache.
    #[must_use]
    pub fn product_cache(&self) -> &Cache<ProductId, Product> {
        &self.inner.product_cache
    }
}
