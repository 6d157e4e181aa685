use ferrum_validation::ValidationRun;

use crate::base::is_meaningful;
use crate::choice::DateTimeOrPeriod;
use crate::codes::ClinicalImpressionStatus;
use crate::datatypes::{Annotation, CodeableConcept, Identifier, Reference};
use crate::node::FieldSink;
use crate::primitive::{DateTime, FhirString, Uri};
use crate::validation::{check_reference, check_references};

fhir_node! {
    /// A record of a clinical assessment performed to determine what
    /// problems and diagnoses are relevant to a patient.
    ClinicalImpression, ClinicalImpressionBuilder, domain_resource, "ClinicalImpression";
    one {
        status: ClinicalImpressionStatus,
        status_reason: CodeableConcept,
        /// Kind of assessment performed.
        code: CodeableConcept,
        description: FhirString,
        /// Patient or group assessed.
        subject: Reference,
        encounter: Reference,
        /// When the assessment was documented.
        date: DateTime,
        assessor: Reference,
        /// Reference to the last assessment.
        previous: Reference,
        summary: FhirString,
    }
    many {
        identifier / set_identifier: Identifier,
        /// Relevant impressions of patient state.
        problem / set_problem: Reference,
        investigation / set_investigation: ClinicalImpressionInvestigation,
        /// Clinical protocols followed.
        protocol / set_protocol: Uri,
        finding / set_finding: ClinicalImpressionFinding,
        prognosis_codeable_concept / set_prognosis_codeable_concept: CodeableConcept,
        prognosis_reference / set_prognosis_reference: Reference,
        supporting_info / set_supporting_info: Reference,
        note / set_note: Annotation,
    }
    choice {
        /// Time of assessment.
        effective("effective"): DateTimeOrPeriod,
    }
}

impl ClinicalImpression {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("identifier", &self.identifier);
        sink.one("status", self.status.as_ref());
        sink.one("statusReason", self.status_reason.as_ref());
        sink.one("code", self.code.as_ref());
        sink.one("description", self.description.as_ref());
        sink.one("subject", self.subject.as_ref());
        sink.one("encounter", self.encounter.as_ref());
        sink.one("effective", self.effective.as_ref());
        sink.one("date", self.date.as_ref());
        sink.one("assessor", self.assessor.as_ref());
        sink.one("previous", self.previous.as_ref());
        sink.many("problem", &self.problem);
        sink.many("investigation", &self.investigation);
        sink.many("protocol", &self.protocol);
        sink.one("summary", self.summary.as_ref());
        sink.many("finding", &self.finding);
        sink.many("prognosisCodeableConcept", &self.prognosis_codeable_concept);
        sink.many("prognosisReference", &self.prognosis_reference);
        sink.many("supportingInfo", &self.supporting_info);
        sink.many("note", &self.note);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("identifier", &self.identifier, is_meaningful);
        run.require("status", &self.status);
        run.require("subject", &self.subject);
        run.check_choice("effective");
        run.check_list("problem", &self.problem, is_meaningful);
        run.check_list("investigation", &self.investigation, is_meaningful);
        run.check_list("protocol", &self.protocol, is_meaningful);
        run.check_list("finding", &self.finding, is_meaningful);
        run.check_list(
            "prognosisCodeableConcept",
            &self.prognosis_codeable_concept,
            is_meaningful,
        );
        run.check_list("prognosisReference", &self.prognosis_reference, is_meaningful);
        run.check_list("supportingInfo", &self.supporting_info, is_meaningful);
        run.check_list("note", &self.note, is_meaningful);
        check_reference(run, "subject", self.subject.as_ref(), &["Patient", "Group"]);
        check_reference(run, "encounter", self.encounter.as_ref(), &["Encounter"]);
        check_reference(
            run,
            "assessor",
            self.assessor.as_ref(),
            &["Practitioner", "PractitionerRole"],
        );
        check_reference(run, "previous", self.previous.as_ref(), &["ClinicalImpression"]);
        check_references(run, "problem", &self.problem, &["Condition", "AllergyIntolerance"]);
        check_references(
            run,
            "prognosisReference",
            &self.prognosis_reference,
            &["RiskAssessment"],
        );
    }
}

fhir_node! {
    /// One or more sets of investigations (signs, symptoms, etc.).
    ClinicalImpressionInvestigation, ClinicalImpressionInvestigationBuilder, backbone,
        "ClinicalImpression.Investigation";
    one {
        /// A name or code for the group, e.g. "initial examination".
        code: CodeableConcept,
    }
    many {
        item / set_item: Reference,
    }
    choice {}
}

impl ClinicalImpressionInvestigation {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("code", self.code.as_ref());
        sink.many("item", &self.item);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.require("code", &self.code);
        run.check_list("item", &self.item, is_meaningful);
        check_references(
            run,
            "item",
            &self.item,
            &[
                "Observation",
                "QuestionnaireResponse",
                "FamilyMemberHistory",
                "DiagnosticReport",
                "RiskAssessment",
                "ImagingStudy",
                "Media",
            ],
        );
    }
}

fhir_node! {
    /// A possible or likely finding or diagnosis.
    ClinicalImpressionFinding, ClinicalImpressionFindingBuilder, backbone,
        "ClinicalImpression.Finding";
    one {
        item_codeable_concept: CodeableConcept,
        item_reference: Reference,
        /// Which investigations support the finding.
        basis: FhirString,
    }
    many {}
    choice {}
}

impl ClinicalImpressionFinding {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("itemCodeableConcept", self.item_codeable_concept.as_ref());
        sink.one("itemReference", self.item_reference.as_ref());
        sink.one("basis", self.basis.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        check_reference(
            run,
            "itemReference",
            self.item_reference.as_ref(),
            &["Condition", "Observation", "Media"],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Untyped;
    use crate::datatypes::{Period, Quantity};
    use crate::element::Element;
    use ferrum_validation::ValidationContext;

    fn patient() -> Reference {
        Reference::builder()
            .reference("Patient/example")
            .build_with(&ValidationContext::default())
            .unwrap()
    }

    #[test]
    fn test_effective_accepts_date_time_and_period() {
        let ctx = ValidationContext::default();
        let by_time = ClinicalImpression::builder()
            .status(ClinicalImpressionStatus::Completed)
            .subject(patient())
            .effective(DateTime::of("2024-05-01"))
            .build_with(&ctx)
            .unwrap();
        assert_eq!(by_time.effective().map(DateTimeOrPeriod::type_name), Some("DateTime"));

        let period = Period::builder().start("2024-05-01").build_with(&ctx).unwrap();
        let by_period = by_time.to_builder().effective(period).build_with(&ctx).unwrap();
        assert_eq!(by_period.effective().map(DateTimeOrPeriod::type_name), Some("Period"));
    }

    #[test]
    fn test_effective_rejects_quantity_after_required_fields() {
        let quantity = Quantity::builder()
            .value(rust_decimal::Decimal::ONE)
            .build_with(&ValidationContext::default())
            .unwrap();
        let err = ClinicalImpression::builder()
            .effective(Untyped(Element::from(quantity)))
            .build_with(&ValidationContext::default())
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec![
                "Missing required element: 'status'",
                "Missing required element: 'subject'",
                "Invalid type: Quantity for choice element: 'effective' must be one of: [DateTime, Period]",
            ]
        );
    }

    #[test]
    fn test_investigation_requires_code() {
        let err = ClinicalImpressionInvestigation::builder()
            .item([patient()])
            .build_with(&ValidationContext::default())
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec![
                "Missing required element: 'code'",
                "Resource type found in reference value: 'Patient/example' for element: 'item' must be one of: [Observation, QuestionnaireResponse, FamilyMemberHistory, DiagnosticReport, RiskAssessment, ImagingStudy, Media]",
            ]
        );
    }
}
