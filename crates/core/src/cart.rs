//! In-memory cart aggregation.
//!
//! A cart is a mapping from product to quantity with two invariants: at most
//! one line per product, and every quantity strictly positive. The database
//! enforces the same invariants at rest (`PRIMARY KEY (cart_id, product_id)`,
//! `CHECK (quantity > 0)`); this module implements them for hydrated carts so
//! the storefront computes totals and assembles orders from one consistent
//! snapshot per call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One product-quantity pair within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Number of units, always >= 1.
    pub quantity: u32,
}

/// Error returned by [`CartContents::subtotal`] when a line references a
/// product the price source cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("product {0} not present in price source")]
pub struct UnknownProduct(pub ProductId);

/// The aggregated contents of one shopper's cart.
///
/// Lines keep insertion order, matching the order items were first added.
/// Construct via [`CartContents::from_lines`] so the invariants hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartContents {
    lines: Vec<CartLine>,
}

impl CartContents {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build cart contents from stored lines.
    ///
    /// Duplicate product references are merged by summing quantities and
    /// zero-quantity lines are dropped, so the uniqueness and positivity
    /// invariants hold regardless of input.
    #[must_use]
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = CartLine>,
    {
        let mut contents = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match contents.line_mut(line.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => contents.lines.push(line),
            }
        }
        contents
    }

    /// Add one unit of `product_id`: merge-or-insert.
    ///
    /// If a line for the product exists its quantity is incremented by 1,
    /// otherwise a new line with quantity 1 is appended. Returns the
    /// resulting quantity.
    pub fn add(&mut self, product_id: ProductId) -> u32 {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine {
            product_id,
            quantity: 1,
        });
        1
    }

    /// Remove the line for `product_id` entirely.
    ///
    /// Removing an absent product is a no-op, not an error. Returns whether
    /// a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Empty all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The quantity for `product_id`, if a line exists.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Derived total: Σ(quantity × unit price).
    ///
    /// `price_of` must represent a single consistent price snapshot; callers
    /// pass either the catalog rows fetched alongside the lines or the frozen
    /// order-line prices, never a mix.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownProduct`] for the first line `price_of` cannot
    /// resolve.
    pub fn subtotal<F>(&self, mut price_of: F) -> Result<Decimal, UnknownProduct>
    where
        F: FnMut(ProductId) -> Option<Decimal>,
    {
        let mut total = Decimal::ZERO;
        for line in &self.lines {
            let unit = price_of(line.product_id).ok_or(UnknownProduct(line.product_id))?;
            total += unit * Decimal::from(line.quantity);
        }
        Ok(total)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const A: ProductId = ProductId::new(1);
    const B: ProductId = ProductId::new(2);

    fn price_of(product_id: ProductId) -> Option<Decimal> {
        match product_id {
            id if id == A => Some(Decimal::new(1000, 2)), // $10.00
            id if id == B => Some(Decimal::new(500, 2)),  // $5.00
            _ => None,
        }
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let mut cart = CartContents::new();
        for _ in 0..5 {
            cart.add(A);
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(A), Some(5));
    }

    #[test]
    fn add_returns_the_new_quantity() {
        let mut cart = CartContents::new();
        assert_eq!(cart.add(A), 1);
        assert_eq!(cart.add(A), 2);
        assert_eq!(cart.add(B), 1);
    }

    #[test]
    fn remove_absent_product_is_a_noop() {
        let mut cart = CartContents::new();
        cart.add(A);
        let before = cart.clone();
        assert!(!cart.remove(B));
        assert_eq!(cart, before);
    }

    #[test]
    fn add_add_remove_leaves_no_line() {
        let mut cart = CartContents::new();
        cart.add(A);
        cart.add(A);
        assert!(cart.remove(A));
        assert_eq!(cart.quantity_of(A), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut cart = CartContents::new();
        cart.add(A);
        cart.add(B);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn subtotal_sums_quantity_times_price() {
        let mut cart = CartContents::new();
        cart.add(A);
        cart.add(A);
        cart.add(B);
        // {A: 2 @ $10, B: 1 @ $5} -> $25
        assert_eq!(cart.subtotal(price_of).unwrap(), Decimal::new(2500, 2));
    }

    #[test]
    fn subtotal_is_invariant_under_add_order() {
        let mut forward = CartContents::new();
        forward.add(A);
        forward.add(A);
        forward.add(B);

        let mut shuffled = CartContents::new();
        shuffled.add(B);
        shuffled.add(A);
        shuffled.add(A);

        assert_eq!(
            forward.subtotal(price_of).unwrap(),
            shuffled.subtotal(price_of).unwrap()
        );
    }

    #[test]
    fn subtotal_reports_unresolvable_product() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(99));
        assert_eq!(
            cart.subtotal(price_of),
            Err(UnknownProduct(ProductId::new(99)))
        );
    }

    #[test]
    fn from_lines_merges_duplicates_and_drops_zeroes() {
        let cart = CartContents::from_lines([
            CartLine {
                product_id: A,
                quantity: 2,
            },
            CartLine {
                product_id: B,
                quantity: 0,
            },
            CartLine {
                product_id: A,
                quantity: 3,
            },
        ]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(A), Some(5));
        assert_eq!(cart.quantity_of(B), None);
    }

    #[test]
    fn total_quantity_counts_units_not_lines() {
        let mut cart = CartContents::new();
        cart.add(A);
        cart.add(A);
        cart.add(B);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.len(), 2);
    }
}
