use std::hash::{Hash, Hasher};

use ferrum_validation::primitives::check_uri;
use ferrum_validation::{Constraint, ValidationContext, ValidationRun};

use crate::base::{ElementBase, Identified};
use crate::builder::IntoElement;
use crate::element::Element;
use crate::error::Result;
use crate::node::{structural_hash, FieldSink, Node, NodeType};
use crate::validation::check_primitive_values;
use crate::visitor::{walk, Visitor};

const EXT_1: Constraint = Constraint::rule(
    "ext-1",
    "Extension",
    "Must have either extensions or value[x], not both",
    "extension.exists() != value.exists()",
);

/// Additional content defined by an implementation, identified by `url`.
///
/// `value[x]` admits any datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    hash: u64,
    base: ElementBase,
    url: Option<String>,
    value: Option<Element>,
}

impl Extension {
    pub fn builder() -> ExtensionBuilder {
        ExtensionBuilder::default()
    }

    pub fn to_builder(&self) -> ExtensionBuilder {
        ExtensionBuilder::from(self)
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn value(&self) -> Option<&Element> {
        self.value.as_ref()
    }

    pub fn as_node(&self) -> Node<'_> {
        Node::from(self)
    }

    pub fn has_children(&self) -> bool {
        self.as_node().has_children()
    }

    pub fn accept<'a, V: Visitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        walk(Self::TYPE_NAME, None, self.as_node(), visitor);
    }
}

impl NodeType for Extension {
    const TYPE_NAME: &'static str = "Extension";

    fn fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        self.base.fields(sink);
        sink.text("url", self.url.as_deref());
        sink.one("value", self.value.as_ref());
    }

    fn hash_code(&self) -> u64 {
        self.hash
    }
}

impl Hash for Extension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Identified for Extension {
    fn id(&self) -> Option<&str> {
        self.base.id.as_deref()
    }

    fn extension(&self) -> &[Extension] {
        &self.base.extension
    }
}

/// Builder for [`Extension`].
#[derive(Debug, Clone, Default)]
pub struct ExtensionBuilder {
    base: ElementBase,
    url: Option<String>,
    value: Option<Element>,
}

impl ExtensionBuilder {
    base_setters!(element);

    pub fn url(mut self, url: impl IntoElement<String>) -> Self {
        self.url = url.into_element();
        self
    }

    /// Sets `value[x]` to a value of any datatype.
    pub fn value(mut self, value: impl IntoElement<Element>) -> Self {
        self.value = value.into_element();
        self
    }

    pub fn build(self) -> Result<Extension> {
        let context = ValidationContext::global();
        self.build_with(&context)
    }

    pub fn build_with(self, context: &ValidationContext) -> Result<Extension> {
        let mut run = ValidationRun::new(context, Extension::TYPE_NAME);
        let mut extension = Extension {
            hash: 0,
            base: self.base,
            url: self.url,
            value: self.value,
        };
        extension.hash = structural_hash(&extension);
        if run.is_enabled() {
            let view = extension.as_node();
            check_primitive_values(view, &mut run);
            extension.base.validate(view, &mut run);
            run.require("url", &extension.url);
            if let Some(url) = &extension.url {
                let checked = check_uri(url, run.config().strings.check_control_chars);
                run.check_value("url", checked);
            }
            let has_extension = !extension.base.extension.is_empty();
            let has_value = extension.value.is_some();
            run.constraint(&EXT_1, || has_extension != has_value);
            extension.base.validate_after(view, &mut run);
        }
        run.finish()?;
        Ok(extension)
    }
}

impl From<&Extension> for ExtensionBuilder {
    fn from(extension: &Extension) -> Self {
        Self {
            base: extension.base.clone(),
            url: extension.url.clone(),
            value: extension.value.clone(),
        }
    }
}

macro_rules! value_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoElement<Element> for $ty {
                fn into_element(self) -> Option<Element> {
                    Some(Element::from(self))
                }
            }
        )*
    };
}

value_conversions!(
    crate::primitive::Boolean,
    crate::primitive::Integer,
    crate::primitive::PositiveInt,
    crate::primitive::UnsignedInt,
    crate::primitive::Decimal,
    crate::primitive::FhirString,
    crate::primitive::Uri,
    crate::primitive::Url,
    crate::primitive::Canonical,
    crate::primitive::Code,
    crate::primitive::FhirId,
    crate::primitive::Markdown,
    crate::primitive::Date,
    crate::primitive::DateTime,
    crate::primitive::Time,
    crate::primitive::Instant,
    crate::primitive::Base64Binary,
    super::Coding,
    super::CodeableConcept,
    super::Identifier,
    super::Reference,
    super::Period,
    super::Quantity,
    super::Range,
    super::Ratio,
    super::Annotation,
    super::Attachment,
    super::Timing,
    super::Meta,
);
