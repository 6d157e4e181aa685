//! FHIR R4B object model
//!
//! Immutable, strongly-typed nodes for a subset of FHIR R4B resources, the
//! datatypes they use, and the machinery shared by all of them:
//!
//! - every node is created by a builder; `build()` runs the node's rules and
//!   either returns the node or fails with every blocking issue found;
//! - `to_builder()` copies a node back into a builder for updates;
//! - every node lists its children in schema order, which drives the
//!   depth-first [`walk`], [`Node::has_children`] and structural hashing.
//!
//! The rules themselves live in `ferrum-validation`.
//!
//! # Module Organization
//!
//! - `node`: the borrowed [`Node`] view and the [`NodeType`] contract
//! - `visitor`: [`Visitor`] callbacks, [`walk`] and [`CollectingVisitor`]
//! - `primitive`: primitive datatypes ([`FhirString`], [`DateTime`], ..)
//! - `datatypes`: complex datatypes ([`Reference`], [`CodeableConcept`], ..)
//! - `choice`: closed unions for `[x]` fields
//! - `codes`: closed enums for required-binding codes
//! - `resources`: the resource types and their backbone elements
//!
//! # Example
//!
//! ```rust
//! use ferrum_model::prelude::*;
//!
//! let ctx = ValidationContext::default();
//! let owner = Reference::builder().reference("Organization/acme").build_with(&ctx)?;
//! let account = Account::builder()
//!     .status(AccountStatus::Active)
//!     .name("Main")
//!     .owner(owner)
//!     .build_with(&ctx)?;
//!
//! let renamed = account.to_builder().name("Primary").build_with(&ctx)?;
//! assert_eq!(renamed.name().and_then(|n| n.as_str()), Some("Primary"));
//! assert_eq!(account.name().and_then(|n| n.as_str()), Some("Main"));
//! # Ok::<(), ferrum_model::Error>(())
//! ```

#![forbid(unsafe_code)]

#[macro_use]
mod macros;

pub mod base;
pub mod builder;
pub mod choice;
pub mod codes;
pub mod datatypes;
pub mod element;
mod error;
pub mod node;
pub mod primitive;
pub mod resource;
pub mod resources;
mod validation;
pub mod visitor;

pub use base::{Documented, Identified, Modifiable, ResourceMeta};
pub use builder::{ChoiceType, IntoChoice, IntoElement, Untyped};
pub use element::Element;
pub use error::{Error, Result};
pub use node::{FieldSink, Node, NodeType};
pub use primitive::{
    Base64Binary, Boolean, Canonical, Code, Date, DateTime, Decimal, FhirId, FhirString, Instant,
    Integer, Markdown, PositiveInt, Primitive, PrimitiveBuilder, PrimitiveKind, Time, UnsignedInt,
    Uri, Url, Xhtml,
};
pub use resource::{Resource, ResourceType};
pub use visitor::{walk, CollectingVisitor, Visitor};

pub use ferrum_validation::{
    CollectingSink, DiagnosticsSink, ValidationConfig, ValidationContext, ValidationError,
    ValidationIssue, ValidationOutcome,
};

/// Everything needed to build and walk nodes.
pub mod prelude {
    pub use crate::base::{Documented, Identified, Modifiable, ResourceMeta};
    pub use crate::builder::Untyped;
    pub use crate::choice::*;
    pub use crate::codes::*;
    pub use crate::datatypes::*;
    pub use crate::element::Element;
    pub use crate::error::{Error, Result};
    pub use crate::node::{Node, NodeType};
    pub use crate::primitive::{
        Base64Binary, Boolean, Canonical, Code, Date, DateTime, Decimal, FhirId, FhirString,
        Instant, Integer, Markdown, PositiveInt, Time, UnsignedInt, Uri, Url, Xhtml,
    };
    pub use crate::resource::{Resource, ResourceType};
    pub use crate::resources::account::{AccountCoverage, AccountGuarantor};
    pub use crate::resources::clinical_impression::{
        ClinicalImpressionFinding, ClinicalImpressionInvestigation,
    };
    pub use crate::resources::questionnaire_response::{
        QuestionnaireResponseItem, QuestionnaireResponseItemAnswer,
    };
    pub use crate::resources::risk_assessment::RiskAssessmentPrediction;
    pub use crate::resources::supply_delivery::SupplyDeliverySuppliedItem;
    pub use crate::resources::*;
    pub use crate::visitor::{walk, CollectingVisitor, Visitor};
    pub use ferrum_validation::{ValidationConfig, ValidationContext};
}
