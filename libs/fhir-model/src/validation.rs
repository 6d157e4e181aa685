//! Glue between node types and the rule engine

use ferrum_validation::{Binding, ValidationRun};

use crate::datatypes::{CodeableConcept, Reference};
use crate::node::Node;

/// Lexical checks of the primitive children of `node`, reported under the
/// child's element name.
pub(crate) fn check_primitive_values(node: Node<'_>, run: &mut ValidationRun<'_>) {
    for (name, _, child) in node.children() {
        let checked = child.check_value(run.config());
        run.check_value(name, checked);
    }
}

pub(crate) fn check_reference(
    run: &mut ValidationRun<'_>,
    element: &str,
    reference: Option<&Reference>,
    allowed: &[&str],
) {
    if let Some(reference) = reference {
        run.check_reference_type(element, reference.literal(), reference.type_hint(), allowed);
    }
}

pub(crate) fn check_references(
    run: &mut ValidationRun<'_>,
    element: &str,
    references: &[Reference],
    allowed: &[&str],
) {
    for reference in references {
        check_reference(run, element, Some(reference), allowed);
    }
}

pub(crate) fn check_concept_binding(
    run: &mut ValidationRun<'_>,
    element: &str,
    binding: &Binding,
    concept: Option<&CodeableConcept>,
) {
    if let Some(concept) = concept {
        run.check_codeable_concept_binding(element, binding, &concept.coding_facts());
    }
}
