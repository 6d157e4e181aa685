use ferrum_validation::ValidationRun;

use crate::codes::IdentifierUse;
use crate::datatypes::{CodeableConcept, Period, Reference};
use crate::node::FieldSink;
use crate::primitive::{FhirString, Uri};
use crate::validation::check_reference;

fhir_node! {
    /// A numeric or alphanumeric string associated with a single object or
    /// entity within a given system.
    Identifier, IdentifierBuilder, element, "Identifier";
    one {
        use_: IdentifierUse,
        type_: CodeableConcept,
        /// The namespace for the identifier value.
        system: Uri,
        value: FhirString,
        period: Period,
        /// Organization that issued the identifier.
        assigner: Box<Reference>,
    }
    many {}
    choice {}
}

impl Identifier {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("use", self.use_.as_ref());
        sink.one("type", self.type_.as_ref());
        sink.one("system", self.system.as_ref());
        sink.one("value", self.value.as_ref());
        sink.one("period", self.period.as_ref());
        sink.one("assigner", self.assigner.as_deref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        check_reference(run, "assigner", self.assigner.as_deref(), &["Organization"]);
    }
}
