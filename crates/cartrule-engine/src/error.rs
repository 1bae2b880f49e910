//! # Engine Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Precondition   │  │  Configuration  │  │     Collaborator        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  MissingSite    │  │  Core (operator,│  │  CartLookup   (fatal)   │ │
//! │  │  Context        │  │  product id)    │  │  Identity   (recovered) │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Evaluation either returns a boolean or one of these. There is no      │
//! │  degraded boolean result.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cartrule_core::CoreError;
use thiserror::Error;

// =============================================================================
// Collaborator Errors
// =============================================================================

/// Failure reported by a cart or identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The backing service could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The backing service answered with an error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for collaborator calls.
pub type LookupResult<T> = Result<T, LookupError>;

/// Failure reported by a diagnostics sink. Never affects an outcome.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("Diagnostic record rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// Evaluation Errors
// =============================================================================

/// Fatal errors surfaced to the host rule engine.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The evaluating site is unknown.
    #[error("Site context is required to evaluate cart conditions")]
    MissingSiteContext,

    /// Misconfigured rule: unsupported operator or invalid condition config.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Listing or loading carts failed.
    #[error("Cart lookup failed for user '{user_id}' on site '{site}': {source}")]
    CartLookup {
        site: String,
        user_id: String,
        source: LookupError,
    },
}

/// Result type alias for evaluations.
pub type EvalResult<T> = Result<T, EvaluationError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading engine configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for configuration operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cartrule_core::ValidationError;
    use std::error::Error as _;

    #[test]
    fn test_cart_lookup_error_keeps_source() {
        let err = EvaluationError::CartLookup {
            site: "storefront".to_string(),
            user_id: "u-1".to_string(),
            source: LookupError::Unavailable("connection refused".to_string()),
        };

        assert_eq!(
            err.to_string(),
            "Cart lookup failed for user 'u-1' on site 'storefront': Service unavailable: connection refused"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_core_errors_convert() {
        let err: EvaluationError = CoreError::UnsupportedOperator {
            tag: "between".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Unsupported comparison operator: 'between'");

        let err: EvaluationError = CoreError::from(ValidationError::Required {
            field: "product_id".to_string(),
        })
        .into();
        assert!(matches!(err, EvaluationError::Core(CoreError::Validation(_))));
    }
}
