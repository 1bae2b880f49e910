//! # Error Types
//!
//! Domain-specific error types for cartrule-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartrule-core errors (this file)                                      │
//! │  ├── CoreError        - Misconfigured rule (operator, config)          │
//! │  └── ValidationError  - Config field validation failures               │
//! │                                                                         │
//! │  cartrule-engine errors (separate crate)                               │
//! │  ├── LookupError      - Cart / identity collaborator failures          │
//! │  └── EvaluationError  - What the host rule engine sees                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EvaluationError → Host            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sparse cart data (absent carts, lines or products) is never an error.
//! It contributes zero to the metric.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors that indicate a misconfigured rule.
///
/// Both variants are fatal for the evaluation that hits them. They are never
/// retried and never replaced with a default boolean.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The operator tag supplied by the host is not one of the six
    /// supported relational operators.
    #[error("Unsupported comparison operator: '{tag}'")]
    UnsupportedOperator { tag: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Condition config validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. control characters in an identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
