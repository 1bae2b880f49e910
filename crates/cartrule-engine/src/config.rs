//! # Engine Configuration
//!
//! Diagnostics settings and configured rules for the condition engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARTRULE_DIAGNOSTICS_ENABLED=false                                 │
//! │     CARTRULE_DIAGNOSTICS_SINK=none                                     │
//! │     CARTRULE_CONDITION_NAME=BulkSkuCondition                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cartrule/cartrule.toml (Linux)                           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     diagnostics on, tracing sink, no rules                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [diagnostics]
//! enabled = true
//! sink = "tracing"   # tracing | none
//! condition_name = "SpecificProductQuantityCondition"
//!
//! [[rules]]
//! name = "bulk-sku-1"
//! product_id = "SKU-1"
//! threshold = "5"
//! operator = "greater_than_or_equal"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::diagnostics::{DiagnosticsSink, NullSink, TracingSink};
use crate::error::{EngineError, EngineResult};
use crate::evaluator::{EvaluatorSettings, DEFAULT_CONDITION_NAME};
use crate::rule::ConditionRule;

// =============================================================================
// Sink Kind
// =============================================================================

/// Which built-in diagnostics sink to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Structured `tracing` events.
    #[default]
    Tracing,

    /// Drop every record.
    None,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Tracing => write!(f, "tracing"),
            SinkKind::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for SinkKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tracing" | "log" => Ok(SinkKind::Tracing),
            "none" | "off" | "null" => Ok(SinkKind::None),
            other => Err(EngineError::InvalidConfig(format!(
                "Unknown diagnostics sink: '{}'. Valid options: tracing, none",
                other
            ))),
        }
    }
}

// =============================================================================
// Diagnostics Settings
// =============================================================================

/// Diagnostics settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsSettings {
    /// Emit one record per evaluation.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub sink: SinkKind,

    /// Runtime condition name reported in records.
    #[serde(default = "default_condition_name")]
    pub condition_name: String,
}

fn default_true() -> bool {
    true
}

fn default_condition_name() -> String {
    DEFAULT_CONDITION_NAME.to_string()
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        DiagnosticsSettings {
            enabled: true,
            sink: SinkKind::default(),
            condition_name: default_condition_name(),
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub diagnostics: DiagnosticsSettings,

    /// Configured rules, evaluated by name.
    #[serde(default)]
    pub rules: Vec<ConditionRule>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML document. No environment overrides.
    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml_string(&self) -> EngineResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cartrule.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                config = Self::read_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn read_file(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    ///
    /// Rule names must be unique and every rule must build a valid
    /// condition.
    pub fn validate(&self) -> EngineResult<()> {
        if self.diagnostics.condition_name.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "diagnostics.condition_name must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            rule.condition().map_err(|e| {
                EngineError::InvalidConfig(format!("rule '{}': {}", rule.name, e))
            })?;

            if !seen.insert(rule.name.as_str()) {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate rule name: '{}'",
                    rule.name
                )));
            }
        }

        Ok(())
    }

    /// Applies `CARTRULE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key/value source.
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(enabled) = var("CARTRULE_DIAGNOSTICS_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.diagnostics.enabled = true,
                "0" | "false" | "no" | "off" => self.diagnostics.enabled = false,
                _ => warn!(value = %enabled, "Unknown CARTRULE_DIAGNOSTICS_ENABLED value"),
            }
        }

        if let Some(sink) = var("CARTRULE_DIAGNOSTICS_SINK") {
            match sink.parse() {
                Ok(parsed) => {
                    debug!(sink = %sink, "Overriding diagnostics sink from environment");
                    self.diagnostics.sink = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring CARTRULE_DIAGNOSTICS_SINK"),
            }
        }

        if let Some(name) = var("CARTRULE_CONDITION_NAME") {
            self.diagnostics.condition_name = name;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cartrule", "cartrule")
            .map(|dirs| dirs.config_dir().join("cartrule.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Evaluator settings derived from the diagnostics section.
    pub fn evaluator_settings(&self) -> EvaluatorSettings {
        EvaluatorSettings {
            condition_name: self.diagnostics.condition_name.clone(),
            emit_diagnostics: self.diagnostics.enabled,
        }
    }

    /// Builds the configured diagnostics sink.
    pub fn build_sink(&self) -> Arc<dyn DiagnosticsSink> {
        match self.diagnostics.sink {
            SinkKind::Tracing => Arc::new(TracingSink),
            SinkKind::None => Arc::new(NullSink),
        }
    }

    /// Looks up a rule by name.
    pub fn rule(&self, name: &str) -> Option<&ConditionRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartrule_core::ComparisonOperator;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
        [diagnostics]
        enabled = true
        sink = "none"

        [[rules]]
        name = "bulk-sku-1"
        product_id = "SKU-1"
        threshold = "5"
        operator = "greater_than_or_equal"

        [[rules]]
        name = "few-sku-2"
        product_id = "SKU-2"
        threshold = 2.5
        operator = "<"
    "#;

    #[test]
    fn test_sink_kind_parsing() {
        assert_eq!("tracing".parse::<SinkKind>().unwrap(), SinkKind::Tracing);
        assert_eq!("NONE".parse::<SinkKind>().unwrap(), SinkKind::None);
        assert!("syslog".parse::<SinkKind>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.diagnostics.enabled);
        assert_eq!(config.diagnostics.sink, SinkKind::Tracing);
        assert_eq!(config.diagnostics.condition_name, DEFAULT_CONDITION_NAME);
        assert!(config.rules.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sample() {
        let config = EngineConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.diagnostics.sink, SinkKind::None);
        assert_eq!(config.diagnostics.condition_name, DEFAULT_CONDITION_NAME);
        assert_eq!(config.rules.len(), 2);

        let bulk = config.rule("bulk-sku-1").unwrap();
        assert_eq!(bulk.threshold, dec!(5));
        assert_eq!(bulk.operator, ComparisonOperator::GreaterThanOrEqual);

        let few = config.rule("few-sku-2").unwrap();
        assert_eq!(few.threshold, dec!(2.5));
        assert_eq!(few.operator, ComparisonOperator::LessThan);

        assert!(config.rule("missing").is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::from_toml_str(SAMPLE).unwrap();

        config.rules[1].name = "bulk-sku-1".to_string();
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        config.rules[1].name = "few-sku-2".to_string();
        config.rules[1].product_id = String::new();
        assert!(config.validate().is_err());

        config.rules[1].product_id = "SKU-2".to_string();
        config.diagnostics.condition_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_operator_rejected_at_parse() {
        let toml = r#"
            [[rules]]
            name = "odd"
            product_id = "SKU-1"
            threshold = "1"
            operator = "between"
        "#;
        assert!(matches!(
            EngineConfig::from_toml_str(toml),
            Err(EngineError::TomlParse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = EngineConfig::default();
        let vars: HashMap<&str, &str> = [
            ("CARTRULE_DIAGNOSTICS_ENABLED", "false"),
            ("CARTRULE_DIAGNOSTICS_SINK", "none"),
            ("CARTRULE_CONDITION_NAME", "BulkSkuCondition"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(!config.diagnostics.enabled);
        assert_eq!(config.diagnostics.sink, SinkKind::None);

        let settings = config.evaluator_settings();
        assert_eq!(settings.condition_name, "BulkSkuCondition");
        assert!(!settings.emit_diagnostics);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides(|key| match key {
            "CARTRULE_DIAGNOSTICS_ENABLED" => Some("maybe".to_string()),
            "CARTRULE_DIAGNOSTICS_SINK" => Some("syslog".to_string()),
            _ => None,
        });

        assert!(config.diagnostics.enabled);
        assert_eq!(config.diagnostics.sink, SinkKind::Tracing);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("cartrule-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, SAMPLE).unwrap();

        let config = EngineConfig::load(Some(path.clone())).unwrap();
        assert_eq!(config.rules.len(), 2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("cartrule-does-not-exist.toml");
        let config = EngineConfig::load_or_default(Some(path));
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_toml_serialization() {
        let config = EngineConfig::from_toml_str(SAMPLE).unwrap();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[diagnostics]"));
        assert!(toml_str.contains("[[rules]]"));

        let reparsed = EngineConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(reparsed, config);
    }
}
