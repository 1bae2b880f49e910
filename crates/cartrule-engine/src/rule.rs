//! # Condition Rules
//!
//! A named, fully configured condition: product, threshold and operator.
//! Rules are usually loaded from the `[[rules]]` tables of the engine
//! config.

use cartrule_core::validation::validate_rule_name;
use cartrule_core::{ComparisonOperator, ConditionConfig, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::error::EvalResult;
use crate::evaluator::ConditionEvaluator;

/// One configured cart quantity condition.
///
/// ```toml
/// [[rules]]
/// name = "bulk-sku-1"
/// product_id = "SKU-1"
/// threshold = "5"
/// operator = ">="
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub name: String,
    pub product_id: String,
    pub threshold: Decimal,
    pub operator: ComparisonOperator,
}

impl ConditionRule {
    /// Checks the name and builds the validated condition config.
    pub fn condition(&self) -> CoreResult<ConditionConfig> {
        validate_rule_name(&self.name)?;
        Ok(ConditionConfig::new(self.product_id.clone(), self.threshold)?)
    }

    /// Evaluates this rule.
    pub fn evaluate<C>(&self, evaluator: &ConditionEvaluator, ctx: &C) -> EvalResult<bool>
    where
        C: RuleContext + ?Sized,
    {
        let config = self.condition()?;
        evaluator.evaluate(&config, self.operator, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EvaluationContext;
    use crate::diagnostics::NullSink;
    use crate::error::EvaluationError;
    use crate::memory::{InMemoryCartStore, InMemoryIdentityDirectory};
    use cartrule_core::{Cart, CartLine, CoreError, Session, SiteContext};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn rule(product_id: &str) -> ConditionRule {
        ConditionRule {
            name: "bulk".to_string(),
            product_id: product_id.to_string(),
            threshold: dec!(3),
            operator: ComparisonOperator::GreaterThanOrEqual,
        }
    }

    fn evaluator() -> ConditionEvaluator {
        let carts = Arc::new(InMemoryCartStore::new());
        carts.insert("shop", Cart::new("c-1", "contact-1").with_line(CartLine::new("SKU-1", 3)));
        ConditionEvaluator::new(carts, Arc::new(InMemoryIdentityDirectory::new()))
            .with_sink(Arc::new(NullSink))
    }

    #[test]
    fn test_rule_evaluates() {
        let ctx = EvaluationContext::new(Session::anonymous("contact-1"), SiteContext::new("shop"));
        assert!(rule("SKU-1").evaluate(&evaluator(), &ctx).unwrap());
        assert!(!rule("SKU-2").evaluate(&evaluator(), &ctx).unwrap());
    }

    #[test]
    fn test_invalid_product_id_is_fatal() {
        let ctx = EvaluationContext::new(Session::anonymous("contact-1"), SiteContext::new("shop"));
        let err = rule("").evaluate(&evaluator(), &ctx).unwrap_err();
        assert!(matches!(err, EvaluationError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn test_rule_from_toml() {
        let parsed: ConditionRule = toml::from_str(
            r#"
            name = "bulk"
            product_id = "SKU-1"
            threshold = "3"
            operator = ">="
            "#,
        )
        .unwrap();
        assert_eq!(parsed, rule("SKU-1"));

        let bad = toml::from_str::<ConditionRule>(
            r#"
            name = "bulk"
            product_id = "SKU-1"
            threshold = "3"
            operator = "between"
            "#,
        );
        assert!(bad.is_err());
    }
}
