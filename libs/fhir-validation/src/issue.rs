//! Issues raised while a node is built, and the outcome of one build.

use std::fmt;

use serde_json::{json, Map, Value};

/// Every issue raised while building one node, in evaluation order.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Name of the node type that was built, e.g. `Account` or `Quantity`.
    pub type_name: String,
    /// False as soon as one issue is blocking.
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn from_issues(type_name: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        Self {
            type_name: type_name.into(),
            valid: !issues.iter().any(ValidationIssue::is_blocking),
            issues,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(IssueSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(IssueSeverity::Warning)
    }

    fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Issues raised by the named constraint (`dom-3`) or on the named
    /// element (`owner`).
    pub fn issues_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |issue| {
            issue.constraint.as_deref() == Some(key) || issue.element() == Some(key)
        })
    }

    /// Renders the outcome as a FHIR `OperationOutcome` resource.
    pub fn to_operation_outcome(&self) -> Value {
        let issues: Vec<Value> = self.issues.iter().map(ValidationIssue::to_json).collect();
        json!({
            "resourceType": "OperationOutcome",
            "issue": issues,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    /// `Type.element` for element rules, the declared context for invariants.
    pub location: Option<String>,
    /// FHIRPath source of the invariant, kept for reporting only.
    pub expression: Option<Vec<String>>,
    /// Constraint key (e.g. `dom-3`) when the issue comes from a named invariant.
    pub constraint: Option<String>,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, diagnostics: String) -> Self {
        Self::with_severity(IssueSeverity::Error, code, diagnostics)
    }

    pub fn warning(code: IssueCode, diagnostics: String) -> Self {
        Self::with_severity(IssueSeverity::Warning, code, diagnostics)
    }

    fn with_severity(severity: IssueSeverity, code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity,
            code,
            diagnostics,
            location: None,
            expression: None,
            constraint: None,
        }
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_expression(mut self, expression: Vec<String>) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn with_constraint(mut self, key: &str) -> Self {
        self.constraint = Some(key.to_string());
        self
    }

    /// Blocking issues make `build()` fail; warnings never do.
    pub fn is_blocking(&self) -> bool {
        self.severity == IssueSeverity::Error
    }

    /// Last segment of the location.
    fn element(&self) -> Option<&str> {
        self.location.as_deref().and_then(|loc| loc.rsplit('.').next())
    }

    fn to_json(&self) -> Value {
        let mut issue = Map::new();
        issue.insert("severity".into(), json!(self.severity.as_str()));
        issue.insert("code".into(), json!(self.code.as_str()));
        issue.insert("diagnostics".into(), json!(self.diagnostics));
        if let Some(location) = &self.location {
            issue.insert("location".into(), json!([location]));
        }
        if let Some(expression) = &self.expression {
            issue.insert("expression".into(), json!(expression));
        }
        Value::Object(issue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `issue-type` codes a build can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    /// Malformed reference or reference to a disallowed type.
    Invalid,
    /// Shape problems: null list items, prohibited elements, choice types.
    Structure,
    Required,
    /// Lexical problems in a primitive value.
    Value,
    Invariant,
    TooLong,
    CodeInvalid,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::Required => "required",
            Self::Value => "value",
            Self::Invariant => "invariant",
            Self::TooLong => "too-long",
            Self::CodeInvalid => "code-invalid",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
