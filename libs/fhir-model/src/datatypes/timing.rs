use ferrum_validation::ValidationRun;

use crate::base::is_meaningful;
use crate::datatypes::CodeableConcept;
use crate::node::FieldSink;
use crate::primitive::DateTime;

fhir_node! {
    /// An event that may occur multiple times, given as explicit times
    /// and/or a code such as `BID`.
    Timing, TimingBuilder, backbone, "Timing";
    one {
        code: CodeableConcept,
    }
    many {
        event / set_event: DateTime,
    }
    choice {}
}

impl Timing {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("event", &self.event);
        sink.one("code", self.code.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("event", &self.event, is_meaningful);
    }
}
