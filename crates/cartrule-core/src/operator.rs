//! # Comparison Operators
//!
//! The relational operator a rule author picks for a condition, and the pure
//! function that applies it.
//!
//! ## Operator Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator              Symbol   True when                               │
//! │  ────────────────────  ──────   ─────────────────────                   │
//! │  Equal                 ==       metric == threshold                     │
//! │  NotEqual              !=       metric != threshold                     │
//! │  GreaterThan           >        metric >  threshold                     │
//! │  GreaterThanOrEqual    >=       metric >= threshold                     │
//! │  LessThan              <        metric <  threshold                     │
//! │  LessThanOrEqual       <=       metric <= threshold                     │
//! │                                                                         │
//! │  Anything else ──► CoreError::UnsupportedOperator (fatal)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartrule_core::operator::{compare, compare_tag, ComparisonOperator};
//!
//! assert!(compare(ComparisonOperator::LessThan, &3, &5));
//! assert!(compare_tag(">=", &5, &5).unwrap());
//! assert!(compare_tag("between", &5, &5).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Comparison Operator
// =============================================================================

/// One of the six two-operand relational operators.
///
/// Selected per rule instance by the host; it is never part of the
/// condition's own state. Serializes as its canonical snake_case name and
/// deserializes from any tag accepted by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Every supported operator, in declaration order.
    pub const ALL: [ComparisonOperator; 6] = [
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanOrEqual,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanOrEqual,
    ];

    /// Canonical snake_case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "equal",
            ComparisonOperator::NotEqual => "not_equal",
            ComparisonOperator::GreaterThan => "greater_than",
            ComparisonOperator::GreaterThanOrEqual => "greater_than_or_equal",
            ComparisonOperator::LessThan => "less_than",
            ComparisonOperator::LessThanOrEqual => "less_than_or_equal",
        }
    }

    /// Relational symbol, for log lines.
    pub const fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
        }
    }

    /// Applies the operator to `metric` (left) and `threshold` (right).
    #[inline]
    pub fn apply<T: Ord + ?Sized>(&self, metric: &T, threshold: &T) -> bool {
        compare(*self, metric, threshold)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOperator {
    type Err = CoreError;

    /// Parses a host-supplied operator tag.
    ///
    /// Accepts canonical names in any case with or without separators
    /// (`greater_than`, `GreaterThan`, `greater-than`), short forms
    /// (`eq`, `ne`, `gt`, `ge`, `lt`, `le`) and relational symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "equal" | "equals" | "eq" | "==" | "=" => Ok(ComparisonOperator::Equal),
            "notequal" | "notequals" | "ne" | "neq" | "!=" | "<>" => {
                Ok(ComparisonOperator::NotEqual)
            }
            "greaterthan" | "gt" | ">" => Ok(ComparisonOperator::GreaterThan),
            "greaterthanorequal" | "greaterthanorequalto" | "ge" | "gte" | ">=" | "=>" => {
                Ok(ComparisonOperator::GreaterThanOrEqual)
            }
            "lessthan" | "lt" | "<" => Ok(ComparisonOperator::LessThan),
            "lessthanorequal" | "lessthanorequalto" | "le" | "lte" | "<=" | "=<" => {
                Ok(ComparisonOperator::LessThanOrEqual)
            }
            _ => Err(CoreError::UnsupportedOperator { tag: s.to_string() }),
        }
    }
}

impl TryFrom<String> for ComparisonOperator {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComparisonOperator> for String {
    fn from(op: ComparisonOperator) -> Self {
        op.as_str().to_string()
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// Compares `metric` against `threshold` with the given operator.
///
/// Both sides must live in the same totally ordered domain. Callers with an
/// integer metric and a decimal threshold promote the metric first with
/// [`crate::metric::promote`].
pub fn compare<T: Ord + ?Sized>(operator: ComparisonOperator, metric: &T, threshold: &T) -> bool {
    match operator {
        ComparisonOperator::Equal => metric == threshold,
        ComparisonOperator::NotEqual => metric != threshold,
        ComparisonOperator::GreaterThan => metric > threshold,
        ComparisonOperator::GreaterThanOrEqual => metric >= threshold,
        ComparisonOperator::LessThan => metric < threshold,
        ComparisonOperator::LessThanOrEqual => metric <= threshold,
    }
}

/// Parses `tag` and compares.
///
/// An unknown tag yields [`CoreError::UnsupportedOperator`], never a
/// default boolean.
pub fn compare_tag<T: Ord + ?Sized>(tag: &str, metric: &T, threshold: &T) -> CoreResult<bool> {
    let operator: ComparisonOperator = tag.parse()?;
    Ok(compare(operator, metric, threshold))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_truth_table() {
        use ComparisonOperator::*;

        // (operator, metric < threshold, metric == threshold, metric > threshold)
        let table = [
            (Equal, false, true, false),
            (NotEqual, true, false, true),
            (GreaterThan, false, false, true),
            (GreaterThanOrEqual, false, true, true),
            (LessThan, true, false, false),
            (LessThanOrEqual, true, true, false),
        ];

        for (op, below, equal, above) in table {
            assert_eq!(compare(op, &4, &5), below, "{op} with 4 vs 5");
            assert_eq!(compare(op, &5, &5), equal, "{op} with 5 vs 5");
            assert_eq!(compare(op, &6, &5), above, "{op} with 6 vs 5");
        }
    }

    #[test]
    fn test_compare_decimals_across_scales() {
        // 5 and 5.00 are the same value
        assert!(compare(ComparisonOperator::Equal, &dec!(5), &dec!(5.00)));
        assert!(compare(ComparisonOperator::GreaterThan, &dec!(5), &dec!(4.5)));
        assert!(compare(ComparisonOperator::LessThan, &dec!(5), &dec!(5.5)));
        assert!(!compare(ComparisonOperator::Equal, &Decimal::from(5u64), &dec!(5.01)));
    }

    #[test]
    fn test_parse_canonical_names() {
        for op in ComparisonOperator::ALL {
            assert_eq!(op.as_str().parse::<ComparisonOperator>().unwrap(), op);
            assert_eq!(op.symbol().parse::<ComparisonOperator>().unwrap(), op);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            "GreaterThanOrEqual".parse::<ComparisonOperator>().unwrap(),
            ComparisonOperator::GreaterThanOrEqual
        );
        assert_eq!(
            "Greater-Than-Or-Equal".parse::<ComparisonOperator>().unwrap(),
            ComparisonOperator::GreaterThanOrEqual
        );
        assert_eq!("  LTE ".parse::<ComparisonOperator>().unwrap(), ComparisonOperator::LessThanOrEqual);
        assert_eq!("<>".parse::<ComparisonOperator>().unwrap(), ComparisonOperator::NotEqual);
        assert_eq!("=>".parse::<ComparisonOperator>().unwrap(), ComparisonOperator::GreaterThanOrEqual);
        assert_eq!("eq".parse::<ComparisonOperator>().unwrap(), ComparisonOperator::Equal);
    }

    #[test]
    fn test_unsupported_operator_is_error() {
        for tag in ["", "between", "contains", "~=", ">>"] {
            let err = compare_tag(tag, &1, &1).unwrap_err();
            match err {
                CoreError::UnsupportedOperator { tag: reported } => assert_eq!(reported, tag),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_compare_tag_supported() {
        assert!(compare_tag("greater_than_or_equal", &5, &5).unwrap());
        assert!(!compare_tag("!=", &5, &5).unwrap());
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&ComparisonOperator::LessThanOrEqual).unwrap();
        assert_eq!(json, "\"less_than_or_equal\"");

        let parsed: ComparisonOperator = serde_json::from_str("\">=\"").unwrap();
        assert_eq!(parsed, ComparisonOperator::GreaterThanOrEqual);

        assert!(serde_json::from_str::<ComparisonOperator>("\"between\"").is_err());
    }

    #[test]
    fn test_apply_matches_compare() {
        for op in ComparisonOperator::ALL {
            assert_eq!(op.apply(&3, &7), compare(op, &3, &7));
        }
    }
}
