//! # Validation Module
//!
//! Validation of rule configuration before it is ever evaluated.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Rule authoring (host)                                        │
//! │  └── Picks operator, product and threshold                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization (serde)                                      │
//! │  ├── Operator tag must be one of the six                               │
//! │  └── THIS MODULE: product id / rule name checks                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Evaluation                                                   │
//! │  └── Site context must be present                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_RULE_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates the configured target product id.
///
/// The only rule is that the id is not empty. It is neither trimmed nor
/// length-checked: matching against cart lines is exact, so any id a cart
/// line can carry is a valid target.
///
/// ## Example
/// ```rust
/// use cartrule_core::validation::validate_product_id;
///
/// assert!(validate_product_id("SKU-1").is_ok());
/// assert!(validate_product_id("").is_err());
/// ```
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    if product_id.is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }
    Ok(())
}

/// Validates a rule name from configuration.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - At most [`MAX_RULE_NAME_LEN`] characters
/// - No control characters
pub fn validate_rule_name(name: &str) -> ValidationResult<()> {
    const FIELD: &str = "rule name";

    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: FIELD.to_string(),
        });
    }

    if name.chars().count() > MAX_RULE_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: FIELD.to_string(),
            max: MAX_RULE_NAME_LEN,
        });
    }

    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: FIELD.to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
