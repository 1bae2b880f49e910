//! # cartrule-engine: Cart Condition Evaluation
//!
//! Evaluates "quantity of product X in the user's carts OP threshold" for a
//! host rule engine.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ConditionEvaluator                                  │
//! │                                                                         │
//! │   ctx: impl RuleContext ──► session, site                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ UserResolver   │  │  CartLookup    │  │  cartrule-core         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ anonymous id   │  │ list + hydrate │  │ measure, promote,      │    │
//! │  │ → customer id  │  │ per user/site  │  │ compare                │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │                       ┌────────────────────────┐                        │
//! │                       │  DiagnosticsSink       │                        │
//! │                       │  one record per call   │                        │
//! │                       └────────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`evaluator`] - `ConditionEvaluator` orchestrator
//! - [`resolver`] - Anonymous vs. customer identity resolution
//! - [`lookup`] - Cart and identity collaborator traits
//! - [`memory`] - In-memory collaborators
//! - [`context`] - `RuleContext` trait and `EvaluationContext`
//! - [`diagnostics`] - Diagnostic records and sinks
//! - [`rule`] - Named, configured rules
//! - [`config`] - TOML/env configuration
//! - [`error`] - Engine error types
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use cartrule_core::{Cart, CartLine, Session, SiteContext};
//! use cartrule_engine::{ConditionEvaluator, EngineConfig, EvaluationContext};
//! use cartrule_engine::memory::{InMemoryCartStore, InMemoryIdentityDirectory};
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     [diagnostics]
//!     sink = "none"
//!
//!     [[rules]]
//!     name = "bulk-sku-1"
//!     product_id = "SKU-1"
//!     threshold = "5"
//!     operator = ">="
//! "#).unwrap();
//!
//! let carts = Arc::new(InMemoryCartStore::new());
//! carts.insert("storefront", Cart::new("c-1", "contact-1").with_line(CartLine::new("SKU-1", 5)));
//!
//! let evaluator = ConditionEvaluator::new(carts, Arc::new(InMemoryIdentityDirectory::new()))
//!     .with_sink(config.build_sink())
//!     .with_settings(config.evaluator_settings());
//!
//! let ctx = EvaluationContext::new(Session::anonymous("contact-1"), SiteContext::new("storefront"));
//! let rule = config.rule("bulk-sku-1").unwrap();
//! assert!(rule.evaluate(&evaluator, &ctx).unwrap());
//! ```

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod lookup;
pub mod memory;
pub mod resolver;
pub mod rule;

// Re-exports
pub use config::{DiagnosticsSettings, EngineConfig, SinkKind};
pub use context::{EvaluationContext, RuleContext};
pub use diagnostics::{ConditionDiagnostic, DiagnosticsSink, MemorySink, NullSink, TracingSink};
pub use error::{
    DiagnosticsError, EngineError, EngineResult, EvalResult, EvaluationError, LookupError,
    LookupResult,
};
pub use evaluator::{ConditionEvaluator, EvaluatorSettings};
pub use lookup::{CartLookup, IdentityLookup};
pub use resolver::UserResolver;
pub use rule::ConditionRule;
