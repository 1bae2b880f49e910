//! # Condition Evaluator
//!
//! Runs one evaluation of a cart metric condition.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        evaluate(config, op, ctx)                        │
//! │                                                                         │
//! │  1. ctx.site() ─────────── None ──► Err(MissingSiteContext)            │
//! │        │                                                                │
//! │  2. UserResolver ───────── session ──► user_id (never fails)           │
//! │        │                                                                │
//! │  3. CartLookup::list_carts ──► [CartRef]                               │
//! │     CartLookup::load_cart  ──► [Option<Cart>]     (Err ──► fatal)      │
//! │        │                                                                │
//! │  4. CartMetric::measure ──► u64 ──► promote ──► Decimal                │
//! │        │                                                                │
//! │  5. compare(op, metric, threshold) ──► bool                            │
//! │        │                                                                │
//! │  6. DiagnosticsSink::record (failures ignored)                         │
//! │        │                                                                │
//! │  7. return bool                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The evaluator only holds `Arc`'d collaborators and immutable settings.
//! Share one instance across threads with `Arc<ConditionEvaluator>`; every
//! call keeps its state on its own stack.

use std::fmt;
use std::sync::Arc;

use cartrule_core::metric::SpecificProductQuantity;
use cartrule_core::{
    compare, promote, Cart, CartMetric, ComparisonOperator, ConditionConfig, EvaluationResult,
    SiteContext,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::context::RuleContext;
use crate::diagnostics::{ConditionDiagnostic, DiagnosticsSink, TracingSink};
use crate::error::{EvalResult, EvaluationError};
use crate::lookup::{CartLookup, IdentityLookup};
use crate::resolver::UserResolver;

/// Condition name reported when none is configured.
pub const DEFAULT_CONDITION_NAME: &str = "SpecificProductQuantityCondition";

// =============================================================================
// Settings
// =============================================================================

/// Evaluator behavior that is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorSettings {
    /// Runtime name reported in diagnostic records.
    pub condition_name: String,

    /// Whether to emit a diagnostic record per evaluation.
    pub emit_diagnostics: bool,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        EvaluatorSettings {
            condition_name: DEFAULT_CONDITION_NAME.to_string(),
            emit_diagnostics: true,
        }
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Evaluates cart metric conditions against injected collaborators.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use cartrule_core::{Cart, CartLine, ComparisonOperator, ConditionConfig, Session, SiteContext};
/// use cartrule_engine::context::EvaluationContext;
/// use cartrule_engine::evaluator::ConditionEvaluator;
/// use cartrule_engine::memory::{InMemoryCartStore, InMemoryIdentityDirectory};
/// use rust_decimal::Decimal;
///
/// let carts = Arc::new(InMemoryCartStore::new());
/// carts.insert("storefront", Cart::new("c-1", "contact-1").with_line(CartLine::new("SKU-1", 6)));
///
/// let evaluator = ConditionEvaluator::new(carts, Arc::new(InMemoryIdentityDirectory::new()));
/// let config = ConditionConfig::new("SKU-1", Decimal::from(5)).unwrap();
/// let ctx = EvaluationContext::new(Session::anonymous("contact-1"), SiteContext::new("storefront"));
///
/// assert!(evaluator.evaluate(&config, ComparisonOperator::GreaterThan, &ctx).unwrap());
/// ```
#[derive(Clone)]
pub struct ConditionEvaluator {
    carts: Arc<dyn CartLookup>,
    resolver: UserResolver,
    sink: Arc<dyn DiagnosticsSink>,
    settings: EvaluatorSettings,
}

impl ConditionEvaluator {
    /// Creates an evaluator that reports through [`TracingSink`].
    pub fn new(carts: Arc<dyn CartLookup>, identities: Arc<dyn IdentityLookup>) -> Self {
        ConditionEvaluator {
            carts,
            resolver: UserResolver::new(identities),
            sink: Arc::new(TracingSink),
            settings: EvaluatorSettings::default(),
        }
    }

    /// Replaces the diagnostics sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: EvaluatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }

    // =========================================================================
    // Entry Points
    // =========================================================================

    /// Evaluates "quantity of `config.product_id` in the user's carts
    /// `operator` `config.threshold`".
    pub fn evaluate<C>(
        &self,
        config: &ConditionConfig,
        operator: ComparisonOperator,
        ctx: &C,
    ) -> EvalResult<bool>
    where
        C: RuleContext + ?Sized,
    {
        self.evaluate_detailed(config, operator, ctx)
            .map(|result| result.outcome)
    }

    /// Like [`evaluate`](Self::evaluate) with the operator given as a host
    /// tag. An unsupported tag fails before any collaborator is called.
    pub fn evaluate_tag<C>(&self, config: &ConditionConfig, operator: &str, ctx: &C) -> EvalResult<bool>
    where
        C: RuleContext + ?Sized,
    {
        let operator: ComparisonOperator = operator.parse()?;
        self.evaluate(config, operator, ctx)
    }

    /// Evaluates and returns the full result.
    pub fn evaluate_detailed<C>(
        &self,
        config: &ConditionConfig,
        operator: ComparisonOperator,
        ctx: &C,
    ) -> EvalResult<EvaluationResult>
    where
        C: RuleContext + ?Sized,
    {
        let metric = SpecificProductQuantity::new(config.product_id());
        self.evaluate_metric(&metric, config.threshold(), operator, ctx)
    }

    /// Evaluates any metric strategy against a threshold.
    pub fn evaluate_metric<C>(
        &self,
        metric: &dyn CartMetric,
        threshold: Decimal,
        operator: ComparisonOperator,
        ctx: &C,
    ) -> EvalResult<EvaluationResult>
    where
        C: RuleContext + ?Sized,
    {
        let site = ctx.site().ok_or(EvaluationError::MissingSiteContext)?;
        let user_id = self.resolver.resolve_user_id(ctx.session());

        let carts = self.fetch_carts(site, &user_id)?;
        let value = promote(metric.measure(&carts));
        let outcome = compare(operator, &value, &threshold);

        debug!(
            site = %site.name,
            user_id = %user_id,
            metric = metric.name(),
            value = %value,
            operator = operator.symbol(),
            threshold = %threshold,
            outcome,
            "Compared cart metric"
        );

        let result = EvaluationResult {
            outcome,
            metric: value,
            threshold,
            operator,
            user_id,
            carts_considered: carts.len(),
        };

        self.report(site, metric.name(), &result);
        Ok(result)
    }

    // =========================================================================
    // Pipeline Steps
    // =========================================================================

    /// Lists the user's carts, then hydrates each reference.
    fn fetch_carts(&self, site: &SiteContext, user_id: &str) -> EvalResult<Vec<Option<Cart>>> {
        let lookup_failed = |source| EvaluationError::CartLookup {
            site: site.name.clone(),
            user_id: user_id.to_string(),
            source,
        };

        let refs = self
            .carts
            .list_carts(site, &[user_id.to_string()])
            .map_err(lookup_failed)?;

        debug!(site = %site.name, user_id = %user_id, count = refs.len(), "Listed carts");

        refs.iter()
            .map(|cart_ref| {
                self.carts
                    .load_cart(site, &cart_ref.id, &cart_ref.user_id)
                    .map_err(lookup_failed)
            })
            .collect()
    }

    fn report(&self, site: &SiteContext, metric: &str, result: &EvaluationResult) {
        if !self.settings.emit_diagnostics {
            return;
        }

        let diagnostic = ConditionDiagnostic {
            evaluation_id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            condition: self.settings.condition_name.clone(),
            metric: metric.to_string(),
            site: site.name.clone(),
            user_id: result.user_id.clone(),
            operator: result.operator,
            outcome: result.outcome,
            cart_count: result.carts_considered,
            value: result.metric,
            threshold: result.threshold,
        };

        if let Err(e) = self.sink.record(&diagnostic) {
            warn!(error = %e, evaluation_id = %diagnostic.evaluation_id, "Failed to record condition diagnostic");
        }
    }
}

impl fmt::Debug for ConditionEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionEvaluator")
            .field("resolver", &self.resolver)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
