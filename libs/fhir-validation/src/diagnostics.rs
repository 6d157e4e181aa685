use std::sync::{Mutex, PoisonError};

use crate::ValidationIssue;

/// Side channel for non-blocking issues.
///
/// Warning-level constraints never fail a build; they are logged through
/// `tracing` and, when a sink is installed on the context, handed to it.
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, type_name: &str, issue: &ValidationIssue);
}

/// Sink that keeps every reported issue in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    issues: Mutex<Vec<(String, ValidationIssue)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the collected `(type name, issue)` pairs.
    pub fn take(&self) -> Vec<(String, ValidationIssue)> {
        let mut issues = self.issues.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *issues)
    }

    pub fn len(&self) -> usize {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&self, type_name: &str, issue: &ValidationIssue) {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((type_name.to_string(), issue.clone()));
    }
}
