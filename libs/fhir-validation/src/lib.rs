//! Build-time validation engine for the FHIR object model
//!
//! Every node type runs a short, ordered list of rules when it is built:
//! required elements, list shape, choice types, named invariants, value-set
//! bindings and reference target types. This crate holds those rules and the
//! state they share; it knows nothing about concrete node types; callers
//! hand it plain facts (element names, strings, codings).
//!
//! # Module Organization
//!
//! - `config`: [`ValidationConfig`] (YAML-loadable) and [`ValidationContext`]
//! - `validator`: [`ValidationRun`], the per-node rule interpreter
//! - `issue`: issues and outcomes, renderable as OperationOutcome
//! - `reference`: literal reference parsing
//! - `terminology`: the [`TerminologyService`] seam and required bindings
//! - `primitives`: lexical checks for primitive values
//!
//! # Example
//!
//! ```rust
//! use ferrum_validation::{ValidationContext, ValidationRun};
//!
//! let ctx = ValidationContext::default();
//! let mut run = ValidationRun::new(&ctx, "Account");
//! run.require::<String>("status", &None);
//! run.check_reference_type("owner", Some("Patient/1"), None, &["Organization"]);
//!
//! let err = run.finish().unwrap_err();
//! assert_eq!(err.outcome().error_count(), 2);
//! ```

#![forbid(unsafe_code)]

mod config;
mod constraint;
mod diagnostics;
mod error;
mod issue;
pub mod primitives;
pub mod reference;
mod resource_types;
pub mod terminology;
mod validator;

pub use config::{
    ConstraintsConfig, ExecConfig, ReferencesConfig, StringsConfig, TerminologyConfig,
    ValidationConfig, ValidationConfigBuilder, ValidationContext, DEFAULT_MAX_ISSUES,
};
pub use constraint::{Constraint, ConstraintLevel};
pub use diagnostics::{CollectingSink, DiagnosticsSink};
pub use error::{ConfigError, ValidationError};
pub use issue::{IssueCode, IssueSeverity, ValidationIssue, ValidationOutcome};
pub use reference::LiteralReference;
pub use resource_types::is_resource_type;
pub use terminology::{Binding, CodingFacts, StaticTerminology, TerminologyService};
pub use validator::{reference_type_error, ValidationRun};
