//! Validation configuration and the context a build runs under.
//!
//! A [`ValidationConfig`] is plain, serializable data. A [`ValidationContext`]
//! pairs it with the pluggable collaborators (terminology, diagnostics). One
//! context is installed process-wide; any build may pass its own instead.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, DiagnosticsSink, TerminologyService};

pub const DEFAULT_MAX_ISSUES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Master switch. When off, `build()` evaluates no rules at all.
    pub validating: bool,
    pub references: ReferencesConfig,
    pub terminology: TerminologyConfig,
    pub strings: StringsConfig,
    pub constraints: ConstraintsConfig,
    pub exec: ExecConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validating: true,
            references: ReferencesConfig::default(),
            terminology: TerminologyConfig::default(),
            strings: StringsConfig::default(),
            constraints: ConstraintsConfig::default(),
            exec: ExecConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    /// Check literal references and `Reference.type` against target whitelists.
    pub check_types: bool,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self { check_types: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminologyConfig {
    /// Require a valid coding for every required binding instead of only
    /// rejecting codings that contradict it.
    pub extended_codeable_concept_validation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringsConfig {
    pub check_control_chars: bool,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            check_control_chars: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintsConfig {
    /// Constraint keys that are never evaluated, e.g. `dom-6`.
    pub suppress: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    pub fail_fast: bool,
    /// Blocking issues after which a run stops; warnings do not count.
    pub max_issues: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_issues: DEFAULT_MAX_ISSUES,
        }
    }
}

impl ValidationConfig {
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// A configuration with the engine switched off.
    pub fn disabled() -> Self {
        Self {
            validating: false,
            ..Self::default()
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        tracing::trace!(validating = config.validating, "loaded validation config");
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Rejects settings the engine cannot honour.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.exec.max_issues == 0 {
            return Err(ConfigError::InvalidConfig(
                "exec.max_issues must be greater than zero".to_string(),
            ));
        }
        if let Some(key) = self.constraints.suppress.iter().find(|k| k.trim().is_empty()) {
            return Err(ConfigError::InvalidConfig(format!(
                "constraints.suppress contains an empty key: {:?}",
                key
            )));
        }
        Ok(())
    }

    pub fn is_suppressed(&self, key: &str) -> bool {
        self.constraints.suppress.iter().any(|k| k == key)
    }
}

#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    config: ValidationConfig,
}

impl ValidationConfigBuilder {
    pub fn validating(mut self, enabled: bool) -> Self {
        self.config.validating = enabled;
        self
    }

    pub fn check_reference_types(mut self, enabled: bool) -> Self {
        self.config.references.check_types = enabled;
        self
    }

    pub fn extended_codeable_concept_validation(mut self, enabled: bool) -> Self {
        self.config.terminology.extended_codeable_concept_validation = enabled;
        self
    }

    pub fn check_control_chars(mut self, enabled: bool) -> Self {
        self.config.strings.check_control_chars = enabled;
        self
    }

    pub fn suppress(mut self, key: impl Into<String>) -> Self {
        self.config.constraints.suppress.push(key.into());
        self
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.config.exec.fail_fast = enabled;
        self
    }

    /// Caps the blocking issues one build collects. Zero is raised to one,
    /// the smallest cap [`ValidationConfig::check`] accepts.
    pub fn max_issues(mut self, max: usize) -> Self {
        self.config.exec.max_issues = max.max(1);
        self
    }

    pub fn build(self) -> ValidationConfig {
        self.config
    }
}

static GLOBAL: Lazy<RwLock<Arc<ValidationContext>>> =
    Lazy::new(|| RwLock::new(Arc::new(ValidationContext::default())));

/// Everything a build consults while validating.
#[derive(Clone, Default)]
pub struct ValidationContext {
    config: ValidationConfig,
    terminology: Option<Arc<dyn TerminologyService>>,
    diagnostics: Option<Arc<dyn DiagnosticsSink>>,
}

impl ValidationContext {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            terminology: None,
            diagnostics: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(ValidationConfig::disabled())
    }

    pub fn with_terminology(mut self, terminology: Arc<dyn TerminologyService>) -> Self {
        self.terminology = Some(terminology);
        self
    }

    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn is_validating(&self) -> bool {
        self.config.validating
    }

    pub fn terminology(&self) -> Option<&dyn TerminologyService> {
        self.terminology.as_deref()
    }

    pub fn diagnostics(&self) -> Option<&dyn DiagnosticsSink> {
        self.diagnostics.as_deref()
    }

    /// The process-wide context used by plain `build()` calls.
    pub fn global() -> Arc<ValidationContext> {
        let guard = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replaces the process-wide context, returning the previous one.
    pub fn set_global(context: ValidationContext) -> Arc<ValidationContext> {
        let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(context))
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("config", &self.config)
            .field("terminology", &self.terminology.is_some())
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything_but_extended_codings() {
        let config = ValidationConfig::default();
        assert!(config.validating);
        assert!(config.references.check_types);
        assert!(!config.terminology.extended_codeable_concept_validation);
        assert!(config.strings.check_control_chars);
        assert!(!config.exec.fail_fast);
        assert_eq!(config.exec.max_issues, DEFAULT_MAX_ISSUES);
    }

    #[test]
    fn yaml_sections_are_optional() {
        let yaml = r#"
validating: true
references:
  check_types: false
constraints:
  suppress:
    - "dom-6"
exec:
  fail_fast: true
"#;
        let config = ValidationConfig::from_yaml(yaml).unwrap();
        assert!(!config.references.check_types);
        assert!(config.is_suppressed("dom-6"));
        assert!(!config.is_suppressed("dom-3"));
        assert!(config.exec.fail_fast);
        assert_eq!(config.exec.max_issues, DEFAULT_MAX_ISSUES);
    }

    #[test]
    fn yaml_round_trips_through_to_yaml() {
        let config = ValidationConfig::builder()
            .extended_codeable_concept_validation(true)
            .suppress("dom-6")
            .max_issues(5)
            .build();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ValidationConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn zero_max_issues_is_rejected() {
        let err = ValidationConfig::from_yaml("exec:\n  max_issues: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn builder_never_produces_a_zero_cap() {
        let config = ValidationConfig::builder().max_issues(0).build();
        assert_eq!(config.exec.max_issues, 1);
        assert!(config.check().is_ok());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = ValidationConfig::from_yaml("validating: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ValidationConfig::from_yaml_file("/nonexistent/validation.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/validation.yaml"));
    }
}
