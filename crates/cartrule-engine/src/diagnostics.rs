//! # Diagnostics
//!
//! One structured record per evaluation, handed to a [`DiagnosticsSink`].
//!
//! ## Sinks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TracingSink (default) ──► tracing::info! with structured fields       │
//! │  MemorySink            ──► Vec<ConditionDiagnostic> (tests, hosts)     │
//! │  NullSink              ──► dropped                                     │
//! │                                                                         │
//! │  A sink returning Err is logged and ignored: reporting can never       │
//! │  change the outcome of an evaluation.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;

use cartrule_core::ComparisonOperator;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::DiagnosticsError;

/// Tracing target for condition records.
pub const DIAGNOSTICS_TARGET: &str = "cartrule::condition";

// =============================================================================
// Diagnostic Record
// =============================================================================

/// What happened in one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionDiagnostic {
    /// Correlation id for this evaluation.
    pub evaluation_id: Uuid,

    pub evaluated_at: DateTime<Utc>,

    /// Runtime name of the condition (from settings).
    pub condition: String,

    /// Name of the metric strategy that produced `value`.
    pub metric: String,

    pub site: String,

    /// Identity the carts were fetched for.
    pub user_id: String,

    pub operator: ComparisonOperator,

    pub outcome: bool,

    /// Raw number of carts fetched, absent ones included.
    pub cart_count: usize,

    /// Promoted metric value.
    pub value: Decimal,

    pub threshold: Decimal,
}

impl ConditionDiagnostic {
    /// Serializes the record as a single JSON line.
    pub fn to_json(&self) -> Result<String, DiagnosticsError> {
        serde_json::to_string(self).map_err(|e| DiagnosticsError::Rejected(e.to_string()))
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Receives diagnostic records.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, diagnostic: &ConditionDiagnostic) -> Result<(), DiagnosticsError>;
}

/// Emits each record as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, d: &ConditionDiagnostic) -> Result<(), DiagnosticsError> {
        info!(
            target: DIAGNOSTICS_TARGET,
            evaluation_id = %d.evaluation_id,
            condition = %d.condition,
            metric = %d.metric,
            site = %d.site,
            user_id = %d.user_id,
            operator = %d.operator,
            outcome = d.outcome,
            cart_count = d.cart_count,
            value = %d.value,
            threshold = %d.threshold,
            "Condition evaluated"
        );
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _diagnostic: &ConditionDiagnostic) -> Result<(), DiagnosticsError> {
        Ok(())
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ConditionDiagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records collected so far.
    pub fn records(&self) -> Vec<ConditionDiagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(records) => records.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, diagnostic: &ConditionDiagnostic) -> Result<(), DiagnosticsError> {
        self.records
            .lock()
            .map_err(|_| DiagnosticsError::Rejected("memory sink lock poisoned".to_string()))?
            .push(diagnostic.clone());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
