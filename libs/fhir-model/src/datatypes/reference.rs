use ferrum_validation::{LiteralReference, ValidationRun};

use crate::datatypes::Identifier;
use crate::node::FieldSink;
use crate::primitive::{FhirString, Uri};

fhir_node! {
    /// A reference from one resource to another.
    ///
    /// Never dereferenced; only the literal value and the declared type are
    /// checked against the target whitelist of the field holding it.
    Reference, ReferenceBuilder, element, "Reference";
    one {
        /// Literal reference: relative, internal (`#id`) or absolute URL.
        reference: FhirString,
        /// Type the reference refers to, e.g. `Patient`.
        type_: Uri,
        /// Logical reference, when the literal one is not known.
        identifier: Identifier,
        display: FhirString,
    }
    many {}
    choice {}
}

impl Reference {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("reference", self.reference.as_ref());
        sink.one("type", self.type_.as_ref());
        sink.one("identifier", self.identifier.as_ref());
        sink.one("display", self.display.as_ref());
    }

    fn rules(&self, _run: &mut ValidationRun<'_>) {}

    /// The literal reference value.
    pub fn literal(&self) -> Option<&str> {
        self.reference.as_ref().and_then(|r| r.as_str())
    }

    /// The value of `Reference.type`.
    pub fn type_hint(&self) -> Option<&str> {
        self.type_.as_ref().and_then(|t| t.as_str())
    }

    pub fn parsed(&self) -> Option<LiteralReference<'_>> {
        self.literal().map(LiteralReference::parse)
    }
}
