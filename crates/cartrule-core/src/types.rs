//! # Domain Types
//!
//! Data shapes the condition reads. Nothing here is mutated by evaluation.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Cart       │   │    CartLine     │   │   CartProduct   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  product (opt)  │──►│  product_id     │       │
//! │  │  user_id        │   │  quantity (u32) │   └─────────────────┘       │
//! │  │  lines (opt)    │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ConditionConfig │   │     Session     │   │ EvaluationResult│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  contact_id     │   │  outcome        │       │
//! │  │  threshold (dec)│   │  authenticated  │   │  metric, user   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sparse Data
//! Upstream cart services may hand back holes: a cart that could not be
//! hydrated, a line slot with nothing in it, a line whose product was
//! removed from the catalog. Those are modelled as `Option` rather than
//! errors and count as zero everywhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::operator::ComparisonOperator;
use crate::validation::validate_product_id;

// =============================================================================
// Cart Product
// =============================================================================

/// The product a cart line points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartProduct {
    /// Stable catalog identifier, matched exactly against the configured id.
    pub product_id: String,
}

impl CartProduct {
    pub fn new(product_id: impl Into<String>) -> Self {
        CartProduct {
            product_id: product_id.into(),
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product on this line. `None` when the catalog entry is gone.
    #[serde(default)]
    pub product: Option<CartProduct>,

    /// Quantity of the product on this line.
    pub quantity: u32,
}

impl CartLine {
    /// Creates a line for `product_id` with the given quantity.
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        CartLine {
            product: Some(CartProduct::new(product_id)),
            quantity,
        }
    }

    /// Creates a line whose product is absent.
    pub fn without_product(quantity: u32) -> Self {
        CartLine {
            product: None,
            quantity,
        }
    }

    /// Returns the product id, if the line has a product.
    #[inline]
    pub fn product_id(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.product_id.as_str())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A fully hydrated cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,

    /// Owner of the cart (anonymous contact id or customer external id).
    pub user_id: String,

    /// Lines in insertion order. A `None` slot is an absent line.
    #[serde(default)]
    pub lines: Vec<Option<CartLine>>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Cart {
            id: id.into(),
            user_id: user_id.into(),
            lines: Vec::new(),
        }
    }

    /// Appends a line (builder style).
    pub fn with_line(mut self, line: CartLine) -> Self {
        self.lines.push(Some(line));
        self
    }

    /// Appends an absent line slot (builder style).
    pub fn with_missing_line(mut self) -> Self {
        self.lines.push(None);
        self
    }

    /// Returns the lightweight reference for this cart.
    pub fn reference(&self) -> CartRef {
        CartRef {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// A lightweight cart reference as returned by a cart listing.
///
/// Listings may omit lines; the evaluator hydrates each reference with a
/// second call before measuring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartRef {
    pub id: String,
    pub user_id: String,
}

impl CartRef {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        CartRef {
            id: id.into(),
            user_id: user_id.into(),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// A resolved customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Identifier carts are stored under once the visitor is known.
    pub external_id: String,
}

impl CustomerRecord {
    pub fn new(external_id: impl Into<String>) -> Self {
        CustomerRecord {
            external_id: external_id.into(),
        }
    }
}

/// The visitor session a condition is evaluated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Anonymous contact identifier. Always present.
    pub contact_id: String,

    /// Whether the visitor has logged in.
    #[serde(default)]
    pub authenticated: bool,
}

impl Session {
    /// A session that has not logged in.
    pub fn anonymous(contact_id: impl Into<String>) -> Self {
        Session {
            contact_id: contact_id.into(),
            authenticated: false,
        }
    }

    /// A logged-in session. The customer record is still looked up by the
    /// anonymous contact id.
    pub fn authenticated(contact_id: impl Into<String>) -> Self {
        Session {
            contact_id: contact_id.into(),
            authenticated: true,
        }
    }
}

/// The site (shop) the evaluation runs for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteContext {
    pub name: String,
}

impl SiteContext {
    pub fn new(name: impl Into<String>) -> Self {
        SiteContext { name: name.into() }
    }
}

// =============================================================================
// Condition Config
// =============================================================================

/// Per-rule configuration: which product to count and what to compare with.
///
/// ## Invariants
/// - `product_id` is non-empty (checked on construction and on deserialize)
/// - Immutable: fields are private and only exposed through accessors
///
/// ## Example
/// ```rust
/// use cartrule_core::types::ConditionConfig;
/// use rust_decimal::Decimal;
///
/// let config = ConditionConfig::new("SKU-1", Decimal::from(5)).unwrap();
/// assert_eq!(config.product_id(), "SKU-1");
/// assert!(ConditionConfig::new("", Decimal::from(5)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConditionConfig")]
pub struct ConditionConfig {
    product_id: String,
    threshold: Decimal,
}

impl ConditionConfig {
    /// Creates a validated config.
    pub fn new(product_id: impl Into<String>, threshold: Decimal) -> Result<Self, ValidationError> {
        let product_id = product_id.into();
        validate_product_id(&product_id)?;

        Ok(ConditionConfig {
            product_id,
            threshold,
        })
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    #[inline]
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }
}

/// Unvalidated wire shape of [`ConditionConfig`].
#[derive(Deserialize)]
struct RawConditionConfig {
    product_id: String,
    threshold: Decimal,
}

impl TryFrom<RawConditionConfig> for ConditionConfig {
    type Error = ValidationError;

    fn try_from(raw: RawConditionConfig) -> Result<Self, Self::Error> {
        ConditionConfig::new(raw.product_id, raw.threshold)
    }
}

// =============================================================================
// Evaluation Result
// =============================================================================

/// Outcome of one evaluation plus the context needed to explain it.
///
/// Built fresh per call and never retained by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    /// The boolean decision returned to the rule engine.
    pub outcome: bool,

    /// Metric after promotion to the threshold's domain.
    pub metric: Decimal,

    /// Threshold the metric was compared with.
    pub threshold: Decimal,

    pub operator: ComparisonOperator,

    /// Identity used for the cart lookup.
    pub user_id: String,

    /// Number of carts fetched, absent ones included.
    pub carts_considered: usize,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cart_builder() {
        let cart = Cart::new("cart-1", "user-1")
            .with_line(CartLine::new("SKU-1", 2))
            .with_missing_line()
            .with_line(CartLine::without_product(4));

        assert_eq!(cart.lines.len(), 3);
        assert_eq!(cart.lines[0].as_ref().and_then(|l| l.product_id()), Some("SKU-1"));
        assert!(cart.lines[1].is_none());
        assert_eq!(cart.lines[2].as_ref().and_then(|l| l.product_id()), None);
        assert_eq!(cart.reference(), CartRef::new("cart-1", "user-1"));
    }

    #[test]
    fn test_session_constructors() {
        assert!(!Session::anonymous("c-1").authenticated);
        assert!(Session::authenticated("c-1").authenticated);
    }

    #[test]
    fn test_condition_config_validates_product_id() {
        assert!(ConditionConfig::new("SKU-1", dec!(5)).is_ok());
        assert!(matches!(
            ConditionConfig::new("", dec!(5)),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_condition_config_keeps_long_product_id_verbatim() {
        let long = "A".repeat(150);
        let config = ConditionConfig::new(long.clone(), dec!(1)).unwrap();
        assert_eq!(config.product_id(), long);

        let padded = ConditionConfig::new(" SKU-1 ", dec!(1)).unwrap();
        assert_eq!(padded.product_id(), " SKU-1 ");
    }

    #[test]
    fn test_condition_config_deserialize_validates() {
        let config: ConditionConfig =
            serde_json::from_str(r#"{"product_id":"SKU-1","threshold":"4.5"}"#).unwrap();
        assert_eq!(config.product_id(), "SKU-1");
        assert_eq!(config.threshold(), dec!(4.5));

        let numeric: ConditionConfig =
            serde_json::from_str(r#"{"product_id":"SKU-1","threshold":5}"#).unwrap();
        assert_eq!(numeric.threshold(), dec!(5));

        let err = serde_json::from_str::<ConditionConfig>(r#"{"product_id":"","threshold":5}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_cart_deserialize_with_holes() {
        let json = r#"{
            "id": "cart-1",
            "user_id": "user-1",
            "lines": [
                {"product": {"product_id": "SKU-1"}, "quantity": 2},
                null,
                {"product": null, "quantity": 1},
                {"quantity": 7}
            ]
        }"#;

        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.lines.len(), 4);
        assert!(cart.lines[1].is_none());
        assert_eq!(cart.lines[3].as_ref().map(|l| l.product.is_none()), Some(true));
    }
}
