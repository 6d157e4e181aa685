use ferrum_validation::ValidationRun;

use crate::choice::ReferenceOrString;
use crate::node::FieldSink;
use crate::primitive::{DateTime, Markdown};
use crate::validation::check_reference;

fhir_node! {
    /// A text note with its author and time.
    Annotation, AnnotationBuilder, element, "Annotation";
    one {
        time: DateTime,
        text: Markdown,
    }
    many {}
    choice {
        /// The individual responsible for the annotation.
        author("author"): ReferenceOrString,
    }
}

impl Annotation {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("author", self.author.as_ref());
        sink.one("time", self.time.as_ref());
        sink.one("text", self.text.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_choice("author");
        check_reference(
            run,
            "author",
            self.author.as_ref().and_then(ReferenceOrString::as_reference),
            &["Practitioner", "PractitionerRole", "Patient", "RelatedPerson", "Organization"],
        );
        run.require("text", &self.text);
    }
}
