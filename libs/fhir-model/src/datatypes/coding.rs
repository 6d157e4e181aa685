use ferrum_validation::{CodingFacts, ValidationRun};

use crate::datatypes::has_data_absent_reason;
use crate::node::FieldSink;
use crate::primitive::{Boolean, Code, FhirString, Uri};

fhir_node! {
    /// A reference to a code defined by a terminology system.
    Coding, CodingBuilder, element, "Coding";
    one {
        system: Uri,
        version: FhirString,
        code: Code,
        display: FhirString,
        user_selected: Boolean,
    }
    many {}
    choice {}
}

impl Coding {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("system", self.system.as_ref());
        sink.one("version", self.version.as_ref());
        sink.one("code", self.code.as_ref());
        sink.one("display", self.display.as_ref());
        sink.one("userSelected", self.user_selected.as_ref());
    }

    fn rules(&self, _run: &mut ValidationRun<'_>) {}

    /// System and code as the binding checks see them.
    pub fn facts(&self) -> CodingFacts<'_> {
        let system = self.system.as_ref().and_then(|s| s.as_str());
        let code = self.code.as_ref().and_then(|c| c.as_str());
        CodingFacts {
            system,
            code,
            data_absent: system.is_none()
                && code.is_none()
                && has_data_absent_reason(&self.base.extension),
        }
    }
}

fhir_node! {
    /// A concept given by codings and/or free text.
    CodeableConcept, CodeableConceptBuilder, element, "CodeableConcept";
    one {
        text: FhirString,
    }
    many {
        coding / set_coding: Coding,
    }
    choice {}
}

impl CodeableConcept {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("coding", &self.coding);
        sink.one("text", self.text.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("coding", &self.coding, crate::base::is_meaningful);
    }

    pub fn coding_facts(&self) -> Vec<CodingFacts<'_>> {
        self.coding.iter().map(Coding::facts).collect()
    }

    /// True when any coding matches `system` and `code`.
    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|c| {
            let facts = c.facts();
            facts.system == Some(system) && facts.code == Some(code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_validation::ValidationContext;

    #[test]
    fn test_concept_lists_codings_before_text() {
        let ctx = ValidationContext::default();
        let coding = Coding::builder()
            .system("http://loinc.org")
            .code("1234-5")
            .build_with(&ctx)
            .unwrap();
        let concept = CodeableConcept::builder()
            .coding([coding])
            .text("Glucose")
            .build_with(&ctx)
            .unwrap();
        let names: Vec<&str> = concept.as_node().children().iter().map(|c| c.0).collect();
        assert_eq!(names, vec!["coding", "text"]);
        assert!(concept.has_coding("http://loinc.org", "1234-5"));
    }

    #[test]
    fn test_empty_coding_is_rejected() {
        let err = Coding::builder()
            .build_with(&ValidationContext::default())
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec!["ele-1: All FHIR elements must have a @value or children"]
        );
    }

    #[test]
    fn test_invalid_code_is_reported_at_its_element() {
        let err = Coding::builder()
            .code(" padded")
            .build_with(&ValidationContext::default())
            .unwrap_err();
        let issue = &err.validation().unwrap().outcome().issues[0];
        assert_eq!(issue.location.as_deref(), Some("Coding.code"));
    }
}
