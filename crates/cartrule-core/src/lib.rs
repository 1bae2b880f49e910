//! # cartrule-core: Pure Logic for the Cart Quantity Condition
//!
//! This crate answers one question without touching the outside world:
//! "is the quantity of product X across these carts related to a threshold
//! by operator OP?"
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Rules Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Host rule engine (schedules conditions)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        cartrule-engine (resolve user, fetch carts, report)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cartrule-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  operator │  │  metric   │  │ validation│  │   │
//! │  │   │   Cart    │  │  compare  │  │ aggregate │  │ product id│  │   │
//! │  │   │  Config   │  │  6 tags   │  │  promote  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart, line, product, session and condition config types
//! - [`operator`] - The six relational operators and [`compare`]
//! - [`metric`] - Cart metric aggregation and numeric promotion
//! - [`error`] - Domain error types
//! - [`validation`] - Config validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use cartrule_core::metric::{aggregate_carts, promote};
//! use cartrule_core::operator::{compare, ComparisonOperator};
//! use cartrule_core::types::{Cart, CartLine};
//! use rust_decimal::Decimal;
//!
//! let carts = vec![
//!     Some(Cart::new("cart-a", "user-1").with_line(CartLine::new("SKU-1", 2))),
//!     None,
//!     Some(Cart::new("cart-c", "user-1").with_line(CartLine::new("SKU-1", 3))),
//! ];
//!
//! let metric = promote(aggregate_carts(&carts, "SKU-1"));
//! assert!(compare(ComparisonOperator::GreaterThanOrEqual, &metric, &Decimal::from(5)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod metric;
pub mod operator;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use metric::{aggregate, aggregate_carts, promote, CartMetric};
pub use operator::{compare, compare_tag, ComparisonOperator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a rule name.
pub const MAX_RULE_NAME_LEN: usize = 100;
