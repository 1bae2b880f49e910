//! # Cart Metrics
//!
//! Computes the numeric value a condition compares against its threshold.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  carts: [Some(A), None, Some(C)]           target: "SKU-1"              │
//! │                                                                         │
//! │  A ── (SKU-1, 2) ──────► 2 × 1 = 2                                      │
//! │    └─ (SKU-2, 9) ──────► 9 × 0 = 0                                      │
//! │  None ─────────────────► skipped                                        │
//! │  C ── (SKU-1, 3) ──────► 3 × 1 = 3                                      │
//! │    └─ (no product, 1) ─► skipped                                        │
//! │                          ─────                                          │
//! │                            5  (u64)  ──► promote() ──► Decimal 5        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Numeric Promotion
//! Quantities are discrete counts and are accumulated as `u64`. Thresholds
//! are decimal. Before comparing, the count is widened with [`promote`];
//! the threshold is never truncated to an integer, so a threshold of `4.5`
//! behaves as `4.5`.

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::types::Cart;

// =============================================================================
// Aggregation
// =============================================================================

/// Sums the quantity of `target_product_id` across the given carts.
///
/// Absent carts, absent lines and lines without a product contribute zero.
/// Product ids are matched exactly (case-sensitive). The sum saturates at
/// `u64::MAX`.
pub fn aggregate<'a, I>(carts: I, target_product_id: &str) -> u64
where
    I: IntoIterator<Item = Option<&'a Cart>>,
{
    carts.into_iter().flatten().fold(0u64, |total, cart| {
        let cart_quantity = present_lines(cart).fold(0u64, |partial, (product_id, quantity)| {
            let matches = u64::from(product_id == target_product_id);
            partial.saturating_add(u64::from(quantity) * matches)
        });
        total.saturating_add(cart_quantity)
    })
}

/// [`aggregate`] over a slice of optional carts.
///
/// ## Example
/// ```rust
/// use cartrule_core::metric::aggregate_carts;
/// use cartrule_core::types::{Cart, CartLine};
///
/// let carts = vec![
///     Some(Cart::new("a", "u").with_line(CartLine::new("SKU-1", 2))),
///     None,
/// ];
/// assert_eq!(aggregate_carts(&carts, "SKU-1"), 2);
/// assert_eq!(aggregate_carts(&[], "SKU-1"), 0);
/// ```
pub fn aggregate_carts(carts: &[Option<Cart>], target_product_id: &str) -> u64 {
    aggregate(carts.iter().map(Option::as_ref), target_product_id)
}

/// Widens an integer metric into the threshold's decimal domain.
///
/// Lossless for every `u64`.
#[inline]
pub fn promote(metric: u64) -> Decimal {
    Decimal::from(metric)
}

/// Yields `(product_id, quantity)` for every line that has a product.
fn present_lines(cart: &Cart) -> impl Iterator<Item = (&str, u32)> + '_ {
    cart.lines
        .iter()
        .flatten()
        .filter_map(|line| line.product_id().map(|id| (id, line.quantity)))
}

// =============================================================================
// Metric Strategies
// =============================================================================

/// A way of reducing a set of carts to a single count.
///
/// The evaluator is written against this trait so sibling conditions
/// (total items, distinct products) reuse the same fetch / compare / report
/// pipeline with a different measurement.
pub trait CartMetric: Send + Sync {
    /// Short name used in diagnostic records.
    fn name(&self) -> &str;

    /// Measures the carts. Must treat absent elements as zero.
    fn measure(&self, carts: &[Option<Cart>]) -> u64;
}

/// Quantity of one specific product across all carts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificProductQuantity {
    product_id: String,
}

impl SpecificProductQuantity {
    pub fn new(product_id: impl Into<String>) -> Self {
        SpecificProductQuantity {
            product_id: product_id.into(),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }
}

impl CartMetric for SpecificProductQuantity {
    fn name(&self) -> &str {
        "specific_product_quantity"
    }

    fn measure(&self, carts: &[Option<Cart>]) -> u64 {
        aggregate_carts(carts, &self.product_id)
    }
}

/// Quantity of every product across all carts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalQuantity;

impl CartMetric for TotalQuantity {
    fn name(&self) -> &str {
        "total_quantity"
    }

    fn measure(&self, carts: &[Option<Cart>]) -> u64 {
        carts
            .iter()
            .flatten()
            .flat_map(present_lines)
            .fold(0u64, |total, (_, quantity)| total.saturating_add(u64::from(quantity)))
    }
}

/// Number of distinct product ids across all carts.
///
/// Lines with zero quantity still count as a product being present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistinctProducts;

impl CartMetric for DistinctProducts {
    fn name(&self) -> &str {
        "distinct_products"
    }

    fn measure(&self, carts: &[Option<Cart>]) -> u64 {
        let distinct: HashSet<&str> = carts
            .iter()
            .flatten()
            .flat_map(present_lines)
            .map(|(product_id, _)| product_id)
            .collect();
        distinct.len() as u64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
