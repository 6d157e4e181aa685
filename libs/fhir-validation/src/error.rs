use thiserror::Error;

use crate::ValidationOutcome;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Blocking validation failure raised when a node is built.
///
/// Carries the complete outcome so callers can inspect every violated rule
/// or render it as an OperationOutcome.
#[derive(Debug, Clone, Error)]
#[error("{}", render(.outcome))]
pub struct ValidationError {
    outcome: ValidationOutcome,
}

impl ValidationError {
    pub fn new(outcome: ValidationOutcome) -> Self {
        Self { outcome }
    }

    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> ValidationOutcome {
        self.outcome
    }

    /// Diagnostics of every error-level issue, in evaluation order.
    pub fn messages(&self) -> Vec<&str> {
        self.outcome
            .issues
            .iter()
            .filter(|issue| issue.is_blocking())
            .map(|issue| issue.diagnostics.as_str())
            .collect()
    }
}

fn render(outcome: &ValidationOutcome) -> String {
    let messages: Vec<String> = outcome
        .issues
        .iter()
        .filter(|issue| issue.is_blocking())
        .map(|issue| match &issue.location {
            Some(location) => format!("{} (at {})", issue.diagnostics, location),
            None => issue.diagnostics.clone(),
        })
        .collect();
    format!("invalid {}: {}", outcome.type_name, messages.join("; "))
}
