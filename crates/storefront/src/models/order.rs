//! Order domain types.
//!
//! An order is an immutable record of a checked-out cart. Each line carries a
//! snapshot of the product as it was at checkout time, so later catalog edits
//! or deletions never change what a customer actually bought.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sugar_plum_core::{OrderId, Price, ProductId, UserId};

/// The product fields frozen into an order line at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSnapshot {
    /// Soft link back to the catalog; `None` once the product is deleted.
    pub product_id: Option<ProductId>,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub unit_price: Price,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    #[serde(flatten)]
    pub snapshot: ProductSnapshot,
    pub quantity: u32,
}

impl OrderLine {
    /// The amount this line contributes to the order total.
    #[must_use]
    pub fn line_total(&self) -> rust_decimal::Decimal {
        self.snapshot.unit_price.line_total(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    /// Public order reference, safe to show to customers.
    pub reference: Uuid,
    pub user_id: UserId,
    /// Total at checkout time, Σ(line quantity × snapshot unit price).
    pub total: Price,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sugar_plum_core::CurrencyCode;

    #[test]
    fn line_total_uses_the_snapshot_price() {
        let line = OrderLine {
            snapshot: ProductSnapshot {
                product_id: Some(ProductId::new(1)),
                title: "Plum Jam".to_string(),
                description: String::new(),
                image_url: String::new(),
                unit_price: Price::from_cents(450, CurrencyCode::USD).unwrap(),
            },
            quantity: 3,
        };
        assert_eq!(line.line_total(), Decimal::new(1350, 2));
    }
}
