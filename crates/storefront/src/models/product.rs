//! Catalog domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sugar_plum_core::{AdminUserId, Price, ProductId};

/// A catalog product.
///
/// Identity is immutable; the mutable fields (title, description, image,
/// price) are editable only by the owning admin user through the admin
/// service. The storefront treats products as read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Price,
    /// The admin user that owns this product.
    pub owner_id: AdminUserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
