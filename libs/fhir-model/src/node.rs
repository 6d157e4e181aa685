//! The closed node sum type and the child enumeration every node exposes
//!
//! Each node type lists its children once, in schema order, through
//! [`NodeType::fields`]. Traversal, the child-presence probe and the
//! structural hash are all [`FieldSink`] implementations fed by that single
//! listing, so they can never disagree about what a node contains.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ferrum_validation::primitives::ValueResult;
use ferrum_validation::ValidationConfig;

use crate::codes::CodedValue;
use crate::datatypes::{
    Annotation, Attachment, CodeableConcept, Coding, Extension, Identifier, Meta, Narrative,
    Period, Quantity, Range, Ratio, Reference, Timing,
};
use crate::primitive::{
    Base64Binary, Boolean, Canonical, Code, Date, DateTime, Decimal, FhirId, FhirString, Instant,
    Integer, Markdown, PositiveInt, Time, UnsignedInt, Uri, Url, Xhtml,
};
use crate::resources::account::{Account, AccountCoverage, AccountGuarantor};
use crate::resources::clinical_impression::{
    ClinicalImpression, ClinicalImpressionFinding, ClinicalImpressionInvestigation,
};
use crate::resources::device_use_statement::DeviceUseStatement;
use crate::resources::questionnaire_response::{
    QuestionnaireResponse, QuestionnaireResponseItem, QuestionnaireResponseItemAnswer,
};
use crate::resources::risk_assessment::{RiskAssessment, RiskAssessmentPrediction};
use crate::resources::service_request::ServiceRequest;
use crate::resources::supply_delivery::{SupplyDelivery, SupplyDeliverySuppliedItem};

/// Implemented by every concrete node type.
pub trait NodeType {
    /// Name reported by [`Node::type_name`] and used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Feeds every present child to `sink`, in schema order.
    fn fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S);

    /// The structural hash computed when the node was built.
    fn hash_code(&self) -> u64;

    /// Whether the node carries a primitive value of its own.
    fn has_value(&self) -> bool {
        false
    }

    /// Contributes the primitive value, if any, to the structural hash.
    fn hash_value<H: Hasher>(&self, _state: &mut H) {}

    /// Lexical check of the primitive value, if any.
    fn check_value(&self, _config: &ValidationConfig) -> ValueResult {
        Ok(())
    }
}

/// Receives the children of a node.
///
/// Repeated fields arrive bracketed by `list_start`/`list_end` and carry
/// their index; singular fields carry `None`. Absent values and empty lists
/// are never reported.
pub trait FieldSink<'a> {
    fn field(&mut self, name: &'static str, index: Option<usize>, node: Node<'a>);

    fn list_start(&mut self, _name: &'static str, _len: usize) {}

    fn list_end(&mut self, _name: &'static str, _len: usize) {}

    /// Plain string attribute, e.g. `id` or `Extension.url`.
    fn text(&mut self, name: &'static str, value: Option<&'a str>) {
        if let Some(value) = value {
            self.field(name, None, Node::Str(value));
        }
    }

    fn one<T: 'a>(&mut self, name: &'static str, value: Option<&'a T>)
    where
        &'a T: Into<Node<'a>>,
    {
        if let Some(value) = value {
            self.field(name, None, value.into());
        }
    }

    fn many<T: 'a>(&mut self, name: &'static str, values: &'a [T])
    where
        &'a T: Into<Node<'a>>,
    {
        if values.is_empty() {
            return;
        }
        self.list_start(name, values.len());
        for (index, value) in values.iter().enumerate() {
            self.field(name, Some(index), value.into());
        }
        self.list_end(name, values.len());
    }
}

macro_rules! node_enum {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        /// A borrowed view of any node in the tree.
        ///
        /// Leaves that are not elements of their own (`id`, `Extension.url`,
        /// required-binding codes) appear as [`Node::Str`] and
        /// [`Node::Coded`].
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum Node<'a> {
            Str(&'a str),
            Coded(CodedValue),
            $( $variant(&'a $ty), )*
        }

        $(
            impl<'a> From<&'a $ty> for Node<'a> {
                fn from(value: &'a $ty) -> Self {
                    Node::$variant(value)
                }
            }
        )*

        impl<'a> Node<'a> {
            pub fn type_name(&self) -> &'static str {
                match self {
                    Node::Str(_) => "System.String",
                    Node::Coded(coded) => coded.type_name,
                    $( Node::$variant(_) => <$ty as NodeType>::TYPE_NAME, )*
                }
            }

            /// Feeds the children of this node to `sink`.
            pub fn fields<S: FieldSink<'a>>(&self, sink: &mut S) {
                match *self {
                    Node::Str(_) | Node::Coded(_) => {}
                    $( Node::$variant(node) => node.fields(sink), )*
                }
            }

            pub fn has_value(&self) -> bool {
                match self {
                    Node::Str(_) | Node::Coded(_) => true,
                    $( Node::$variant(node) => node.has_value(), )*
                }
            }

            pub fn check_value(&self, config: &ValidationConfig) -> ValueResult {
                match self {
                    Node::Str(_) | Node::Coded(_) => Ok(()),
                    $( Node::$variant(node) => node.check_value(config), )*
                }
            }

            pub fn hash_code(&self) -> u64 {
                match self {
                    Node::Str(value) => hash_of(value),
                    Node::Coded(coded) => hash_of(coded),
                    $( Node::$variant(node) => node.hash_code(), )*
                }
            }
        }
    };
}

node_enum! {
    Boolean => Boolean,
    Integer => Integer,
    PositiveInt => PositiveInt,
    UnsignedInt => UnsignedInt,
    Decimal => Decimal,
    String => FhirString,
    Uri => Uri,
    Url => Url,
    Canonical => Canonical,
    Code => Code,
    Id => FhirId,
    Markdown => Markdown,
    Date => Date,
    DateTime => DateTime,
    Time => Time,
    Instant => Instant,
    Base64Binary => Base64Binary,
    Xhtml => Xhtml,
    Extension => Extension,
    Coding => Coding,
    CodeableConcept => CodeableConcept,
    Identifier => Identifier,
    Reference => Reference,
    Period => Period,
    Quantity => Quantity,
    Range => Range,
    Ratio => Ratio,
    Annotation => Annotation,
    Attachment => Attachment,
    Timing => Timing,
    Meta => Meta,
    Narrative => Narrative,
    Account => Account,
    AccountCoverage => AccountCoverage,
    AccountGuarantor => AccountGuarantor,
    ClinicalImpression => ClinicalImpression,
    ClinicalImpressionInvestigation => ClinicalImpressionInvestigation,
    ClinicalImpressionFinding => ClinicalImpressionFinding,
    DeviceUseStatement => DeviceUseStatement,
    QuestionnaireResponse => QuestionnaireResponse,
    QuestionnaireResponseItem => QuestionnaireResponseItem,
    QuestionnaireResponseItemAnswer => QuestionnaireResponseItemAnswer,
    RiskAssessment => RiskAssessment,
    RiskAssessmentPrediction => RiskAssessmentPrediction,
    ServiceRequest => ServiceRequest,
    SupplyDelivery => SupplyDelivery,
    SupplyDeliverySuppliedItem => SupplyDeliverySuppliedItem,
}

impl<'a> Node<'a> {
    /// True when at least one child is present. Uses the same enumeration
    /// as the walk.
    pub fn has_children(&self) -> bool {
        let mut probe = ChildProbe { found: false };
        self.fields(&mut probe);
        probe.found
    }

    /// Direct children as `(name, index, node)`, in schema order.
    pub fn children(&self) -> Vec<(&'static str, Option<usize>, Node<'a>)> {
        let mut children = Children(Vec::new());
        self.fields(&mut children);
        children.0
    }

    /// True for nodes that carry neither a value nor children.
    pub fn is_empty(&self) -> bool {
        !self.has_value() && !self.has_children()
    }

    /// The string value of a string-like primitive or plain attribute.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Node::Str(value) => Some(value),
            Node::String(p) => p.value().map(String::as_str),
            Node::Uri(p) => p.value().map(String::as_str),
            Node::Url(p) => p.value().map(String::as_str),
            Node::Canonical(p) => p.value().map(String::as_str),
            Node::Code(p) => p.value().map(String::as_str),
            Node::Id(p) => p.value().map(String::as_str),
            Node::Markdown(p) => p.value().map(String::as_str),
            Node::Date(p) => p.value().map(String::as_str),
            Node::DateTime(p) => p.value().map(String::as_str),
            Node::Time(p) => p.value().map(String::as_str),
            Node::Instant(p) => p.value().map(String::as_str),
            Node::Base64Binary(p) => p.value().map(String::as_str),
            Node::Xhtml(p) => p.value().map(String::as_str),
            Node::Coded(coded) => Some(coded.code),
            _ => None,
        }
    }
}

struct ChildProbe {
    found: bool,
}

impl<'a> FieldSink<'a> for ChildProbe {
    fn field(&mut self, _name: &'static str, _index: Option<usize>, _node: Node<'a>) {
        self.found = true;
    }
}

struct Children<'a>(Vec<(&'static str, Option<usize>, Node<'a>)>);

impl<'a> FieldSink<'a> for Children<'a> {
    fn field(&mut self, name: &'static str, index: Option<usize>, node: Node<'a>) {
        self.0.push((name, index, node));
    }
}

struct HashSink(DefaultHasher);

impl<'a> FieldSink<'a> for HashSink {
    fn field(&mut self, name: &'static str, index: Option<usize>, node: Node<'a>) {
        name.hash(&mut self.0);
        index.hash(&mut self.0);
        node.hash_code().hash(&mut self.0);
    }
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Deep hash over the type name, the primitive value and the cached hashes
/// of the children. Called once, when a node is assembled.
pub(crate) fn structural_hash<T: NodeType>(node: &T) -> u64 {
    let mut sink = HashSink(DefaultHasher::new());
    T::TYPE_NAME.hash(&mut sink.0);
    node.hash_value(&mut sink.0);
    node.fields(&mut sink);
    sink.0.finish()
}
