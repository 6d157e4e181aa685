//! Base data shared by every node kind and the capability traits exposing it
//!
//! Each concrete node embeds exactly one of [`ElementBase`],
//! [`BackboneBase`] or [`DomainResourceBase`]; the traits below give
//! uniform read access to that data.

use std::collections::HashSet;

use ferrum_validation::primitives::check_id;
use ferrum_validation::terminology::{ALL_LANG_VALUE_SET_URL, BCP_47_URN};
use ferrum_validation::{Binding, Constraint, ValidationRun};

use crate::datatypes::{Extension, Meta, Narrative};
use crate::node::Node;
use crate::primitive::{Code, Uri};
use crate::resource::Resource;
use crate::visitor::CollectingVisitor;

const LANGUAGE_BINDING: Binding = Binding::new(ALL_LANG_VALUE_SET_URL, BCP_47_URN, &[]);

const DOM_2: Constraint = Constraint::rule(
    "dom-2",
    "DomainResource",
    "If the resource is contained in another resource, it SHALL NOT contain nested Resources",
    "contained.contained.empty()",
);
const DOM_3: Constraint = Constraint::rule(
    "dom-3",
    "DomainResource",
    "If the resource is contained in another resource, it SHALL be referred to from elsewhere in the resource or SHALL refer to the containing resource",
    "contained.where((('#'+id in (%resource.descendants().reference | %resource.descendants().as(canonical) | %resource.descendants().as(uri) | %resource.descendants().as(url))) or descendants().where(reference = '#').exists() or descendants().where(as(canonical) = '#').exists() or descendants().where(as(uri) = '#').exists()).not()).trace('unmatched', id).empty()",
);
const DOM_4: Constraint = Constraint::rule(
    "dom-4",
    "DomainResource",
    "If a resource is contained in another resource, it SHALL NOT have a meta.versionId or a meta.lastUpdated",
    "contained.meta.versionId.empty() and contained.meta.lastUpdated.empty()",
);
const DOM_5: Constraint = Constraint::rule(
    "dom-5",
    "DomainResource",
    "If a resource is contained in another resource, it SHALL NOT have a security label",
    "contained.meta.security.empty()",
);
const DOM_6: Constraint = Constraint::warning(
    "dom-6",
    "DomainResource",
    "A resource should have narrative for robust management",
    "text.`div`.exists()",
);

/// Read access to the identity shared by every node.
pub trait Identified {
    fn id(&self) -> Option<&str>;
    fn extension(&self) -> &[Extension];
}

/// Nodes that may carry modifier extensions.
pub trait Modifiable: Identified {
    fn modifier_extension(&self) -> &[Extension];
}

pub trait ResourceMeta: Identified {
    fn meta(&self) -> Option<&Meta>;
    fn implicit_rules(&self) -> Option<&Uri>;
    fn language(&self) -> Option<&Code>;
}

/// Resources with narrative and contained resources.
pub trait Documented: ResourceMeta + Modifiable {
    fn text(&self) -> Option<&Narrative>;
    fn contained(&self) -> &[Resource];
}

/// True when `item` carries a value or at least one child.
pub(crate) fn is_meaningful<T>(item: &T) -> bool
where
    for<'x> &'x T: Into<Node<'x>>,
{
    let node: Node<'_> = item.into();
    !node.is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ElementBase {
    pub(crate) id: Option<String>,
    pub(crate) extension: Vec<Extension>,
}

impl ElementBase {
    pub(crate) fn fields<'a, S: crate::node::FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.text("id", self.id.as_deref());
        sink.many("extension", &self.extension);
    }

    pub(crate) fn validate(&self, _node: Node<'_>, run: &mut ValidationRun<'_>) {
        run.check_list("extension", &self.extension, is_meaningful);
    }

    pub(crate) fn validate_after(&self, node: Node<'_>, run: &mut ValidationRun<'_>) {
        run.require_value_or_children(node.has_value(), node.has_children());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BackboneBase {
    pub(crate) id: Option<String>,
    pub(crate) extension: Vec<Extension>,
    pub(crate) modifier_extension: Vec<Extension>,
}

impl BackboneBase {
    pub(crate) fn fields<'a, S: crate::node::FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.text("id", self.id.as_deref());
        sink.many("extension", &self.extension);
        sink.many("modifierExtension", &self.modifier_extension);
    }

    pub(crate) fn validate(&self, _node: Node<'_>, run: &mut ValidationRun<'_>) {
        run.check_list("extension", &self.extension, is_meaningful);
        run.check_list("modifierExtension", &self.modifier_extension, is_meaningful);
    }

    pub(crate) fn validate_after(&self, node: Node<'_>, run: &mut ValidationRun<'_>) {
        run.require_value_or_children(node.has_value(), node.has_children());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResourceBase {
    pub(crate) id: Option<String>,
    pub(crate) meta: Option<Meta>,
    pub(crate) implicit_rules: Option<Uri>,
    pub(crate) language: Option<Code>,
}

impl ResourceBase {
    pub(crate) fn fields<'a, S: crate::node::FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.text("id", self.id.as_deref());
        sink.one("meta", self.meta.as_ref());
        sink.one("implicitRules", self.implicit_rules.as_ref());
        sink.one("language", self.language.as_ref());
    }

    pub(crate) fn validate(&self, run: &mut ValidationRun<'_>) {
        if let Some(id) = &self.id {
            run.check_value("id", check_id(id));
        }
        if let Some(language) = &self.language {
            run.check_code_binding(
                "language",
                &LANGUAGE_BINDING,
                language.value().map(String::as_str),
                language.has_only_data_absent_reason(),
            );
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DomainResourceBase {
    pub(crate) resource: ResourceBase,
    pub(crate) text: Option<Narrative>,
    pub(crate) contained: Vec<Resource>,
    pub(crate) extension: Vec<Extension>,
    pub(crate) modifier_extension: Vec<Extension>,
}

impl DomainResourceBase {
    pub(crate) fn fields<'a, S: crate::node::FieldSink<'a>>(&'a self, sink: &mut S) {
        self.resource.fields(sink);
        sink.one("text", self.text.as_ref());
        sink.many("contained", &self.contained);
        sink.many("extension", &self.extension);
        sink.many("modifierExtension", &self.modifier_extension);
    }

    pub(crate) fn validate(&self, node: Node<'_>, run: &mut ValidationRun<'_>) {
        self.resource.validate(run);
        run.check_list("contained", &self.contained, is_meaningful);
        run.check_list("extension", &self.extension, is_meaningful);
        run.check_list("modifierExtension", &self.modifier_extension, is_meaningful);

        let contained = &self.contained;
        run.constraint(&DOM_2, || contained.iter().all(|r| r.contained().is_empty()));
        run.constraint(&DOM_3, || contained_are_referenced(node, contained));
        run.constraint(&DOM_4, || {
            contained.iter().all(|r| {
                r.meta()
                    .map_or(true, |m| m.version_id().is_none() && m.last_updated().is_none())
            })
        });
        run.constraint(&DOM_5, || {
            contained
                .iter()
                .all(|r| r.meta().map_or(true, |m| m.security().is_empty()))
        });
        let text = self.text.as_ref();
        run.constraint(&DOM_6, || text.map_or(false, |t| t.div().is_some()));
    }

    pub(crate) fn validate_after(&self, _node: Node<'_>, _run: &mut ValidationRun<'_>) {}
}

fn is_link(node: &Node<'_>) -> bool {
    matches!(
        node,
        Node::Reference(_) | Node::Canonical(_) | Node::Uri(_) | Node::Url(_)
    )
}

fn link_value<'a>(node: &Node<'a>) -> Option<&'a str> {
    match node {
        Node::Reference(reference) => reference.reference().and_then(|r| r.value()).map(String::as_str),
        other => other.as_str(),
    }
}

/// Every contained resource is either referenced as `#id` from somewhere in
/// `container`, or refers back to the container with `#`.
fn contained_are_referenced(container: Node<'_>, contained: &[Resource]) -> bool {
    if contained.is_empty() {
        return true;
    }
    let links: HashSet<&str> = CollectingVisitor::collect(container, is_link)
        .iter()
        .filter_map(link_value)
        .collect();
    contained.iter().all(|resource| {
        let referenced = resource
            .id()
            .map_or(false, |id| links.contains(format!("#{}", id).as_str()));
        referenced
            || CollectingVisitor::collect(resource.into(), is_link)
                .iter()
                .filter_map(link_value)
                .any(|value| value == "#")
    })
}
