use ferrum_validation::ValidationRun;

use crate::base::is_meaningful;
use crate::choice::TimingOrPeriodOrDateTime;
use crate::codes::DeviceUseStatementStatus;
use crate::datatypes::{Annotation, CodeableConcept, Identifier, Reference};
use crate::node::FieldSink;
use crate::primitive::DateTime;
use crate::validation::{check_reference, check_references};

fhir_node! {
    /// A record of a device being used by a patient, as reported by the
    /// patient, a caregiver or a practitioner.
    DeviceUseStatement, DeviceUseStatementBuilder, domain_resource, "DeviceUseStatement";
    one {
        status: DeviceUseStatementStatus,
        subject: Reference,
        /// When the statement was recorded.
        recorded_on: DateTime,
        /// Who made the statement.
        source: Reference,
        device: Reference,
        /// Target body site.
        body_site: CodeableConcept,
    }
    many {
        identifier / set_identifier: Identifier,
        /// Fulfils plan, proposal or order.
        based_on / set_based_on: Reference,
        /// Supporting information.
        derived_from / set_derived_from: Reference,
        reason_code / set_reason_code: CodeableConcept,
        reason_reference / set_reason_reference: Reference,
        note / set_note: Annotation,
    }
    choice {
        /// How often the device was used.
        timing("timing"): TimingOrPeriodOrDateTime,
    }
}

impl DeviceUseStatement {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("identifier", &self.identifier);
        sink.many("basedOn", &self.based_on);
        sink.one("status", self.status.as_ref());
        sink.one("subject", self.subject.as_ref());
        sink.many("derivedFrom", &self.derived_from);
        sink.one("timing", self.timing.as_ref());
        sink.one("recordedOn", self.recorded_on.as_ref());
        sink.one("source", self.source.as_ref());
        sink.one("device", self.device.as_ref());
        sink.many("reasonCode", &self.reason_code);
        sink.many("reasonReference", &self.reason_reference);
        sink.one("bodySite", self.body_site.as_ref());
        sink.many("note", &self.note);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("identifier", &self.identifier, is_meaningful);
        run.check_list("basedOn", &self.based_on, is_meaningful);
        run.require("status", &self.status);
        run.require("subject", &self.subject);
        run.check_list("derivedFrom", &self.derived_from, is_meaningful);
        run.check_choice("timing");
        run.require("device", &self.device);
        run.check_list("reasonCode", &self.reason_code, is_meaningful);
        run.check_list("reasonReference", &self.reason_reference, is_meaningful);
        run.check_list("note", &self.note, is_meaningful);
        check_references(run, "basedOn", &self.based_on, &["ServiceRequest"]);
        check_reference(run, "subject", self.subject.as_ref(), &["Patient", "Group"]);
        check_references(
            run,
            "derivedFrom",
            &self.derived_from,
            &[
                "ServiceRequest",
                "Procedure",
                "Claim",
                "Observation",
                "QuestionnaireResponse",
                "DocumentReference",
            ],
        );
        check_reference(
            run,
            "source",
            self.source.as_ref(),
            &["Patient", "Practitioner", "PractitionerRole", "RelatedPerson"],
        );
        check_reference(run, "device", self.device.as_ref(), &["Device"]);
        check_references(
            run,
            "reasonReference",
            &self.reason_reference,
            &[
                "Condition",
                "Observation",
                "DiagnosticReport",
                "DocumentReference",
                "Media",
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_validation::ValidationContext;

    #[test]
    fn test_missing_required_fields_in_rule_order() {
        let err = DeviceUseStatement::builder()
            .build_with(&ValidationContext::default())
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec![
                "Missing required element: 'status'",
                "Missing required element: 'subject'",
                "Missing required element: 'device'",
            ]
        );
    }

    #[test]
    fn test_device_must_reference_a_device() {
        let ctx = ValidationContext::default();
        let reference = |value: &str| {
            Reference::builder()
                .reference(value)
                .build_with(&ctx)
                .unwrap()
        };
        let err = DeviceUseStatement::builder()
            .status(DeviceUseStatementStatus::Active)
            .subject(reference("Patient/1"))
            .device(reference("Patient/1"))
            .build_with(&ctx)
            .unwrap_err();
        let outcome = err.validation().unwrap().outcome();
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(
            outcome.issues_for("device").next().map(|i| i.diagnostics.as_str()),
            Some("Resource type found in reference value: 'Patient/1' for element: 'device' must be one of: [Device]")
        );
    }
}
