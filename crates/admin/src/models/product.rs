//! Catalog domain types, admin side.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sugar_plum_core::{AdminUserId, Price, ProductId};

/// A catalog product as managed by the admin panel.
///
/// Identity and ownership are immutable; title, description, image, and
/// price may be edited by the owning admin user.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Price,
    pub owner_id: AdminUserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new catalog product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Price,
}

/// The editable fields of a product. `None` leaves a field unchanged.
///
/// Price amount and currency are independent so a price change keeps the
/// product's existing currency unless one is given explicitly.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<rust_decimal::Decimal>,
    pub currency: Option<sugar_plum_core::CurrencyCode>,
}
