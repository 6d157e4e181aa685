use ferrum_validation::{Constraint, ValidationRun};

use crate::base::is_meaningful;
use crate::choice::{BooleanOrCodeableConcept, DateTimeOrPeriodOrTiming, QuantityOrRatioOrRange};
use crate::codes::{RequestIntent, RequestPriority, RequestStatus};
use crate::datatypes::{Annotation, CodeableConcept, Identifier, Reference};
use crate::node::FieldSink;
use crate::primitive::{Boolean, Canonical, DateTime, FhirString, Uri};
use crate::validation::{check_reference, check_references};

const PRR_1: Constraint = Constraint::rule(
    "prr-1",
    "ServiceRequest",
    "orderDetail SHALL only be present if code is present",
    "orderDetail.empty() or code.exists()",
);

fhir_node! {
    /// A record of a request for service such as diagnostic investigations,
    /// treatments, or operations to be performed.
    ServiceRequest, ServiceRequestBuilder, domain_resource, "ServiceRequest";
    one {
        /// Composite request this is part of.
        requisition: Identifier,
        status: RequestStatus,
        intent: RequestIntent,
        priority: RequestPriority,
        /// True if the service is not to be performed.
        do_not_perform: Boolean,
        /// What is being requested or ordered.
        code: CodeableConcept,
        subject: Reference,
        encounter: Reference,
        /// Date the request was signed.
        authored_on: DateTime,
        requester: Reference,
        performer_type: CodeableConcept,
        patient_instruction: FhirString,
    }
    many {
        identifier / set_identifier: Identifier,
        instantiates_canonical / set_instantiates_canonical: Canonical,
        instantiates_uri / set_instantiates_uri: Uri,
        based_on / set_based_on: Reference,
        /// Requests this one supersedes.
        replaces / set_replaces: Reference,
        category / set_category: CodeableConcept,
        /// Additional order information. Only meaningful with a `code`.
        order_detail / set_order_detail: CodeableConcept,
        performer / set_performer: Reference,
        location_code / set_location_code: CodeableConcept,
        location_reference / set_location_reference: Reference,
        reason_code / set_reason_code: CodeableConcept,
        reason_reference / set_reason_reference: Reference,
        insurance / set_insurance: Reference,
        supporting_info / set_supporting_info: Reference,
        specimen / set_specimen: Reference,
        body_site / set_body_site: CodeableConcept,
        note / set_note: Annotation,
        relevant_history / set_relevant_history: Reference,
    }
    choice {
        /// Service amount.
        quantity("quantity"): QuantityOrRatioOrRange,
        /// When the service should occur.
        occurrence("occurrence"): DateTimeOrPeriodOrTiming,
        /// Preconditions for the service.
        as_needed("asNeeded"): BooleanOrCodeableConcept,
    }
}

impl ServiceRequest {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("identifier", &self.identifier);
        sink.many("instantiatesCanonical", &self.instantiates_canonical);
        sink.many("instantiatesUri", &self.instantiates_uri);
        sink.many("basedOn", &self.based_on);
        sink.many("replaces", &self.replaces);
        sink.one("requisition", self.requisition.as_ref());
        sink.one("status", self.status.as_ref());
        sink.one("intent", self.intent.as_ref());
        sink.many("category", &self.category);
        sink.one("priority", self.priority.as_ref());
        sink.one("doNotPerform", self.do_not_perform.as_ref());
        sink.one("code", self.code.as_ref());
        sink.many("orderDetail", &self.order_detail);
        sink.one("quantity", self.quantity.as_ref());
        sink.one("subject", self.subject.as_ref());
        sink.one("encounter", self.encounter.as_ref());
        sink.one("occurrence", self.occurrence.as_ref());
        sink.one("asNeeded", self.as_needed.as_ref());
        sink.one("authoredOn", self.authored_on.as_ref());
        sink.one("requester", self.requester.as_ref());
        sink.one("performerType", self.performer_type.as_ref());
        sink.many("performer", &self.performer);
        sink.many("locationCode", &self.location_code);
        sink.many("locationReference", &self.location_reference);
        sink.many("reasonCode", &self.reason_code);
        sink.many("reasonReference", &self.reason_reference);
        sink.many("insurance", &self.insurance);
        sink.many("supportingInfo", &self.supporting_info);
        sink.many("specimen", &self.specimen);
        sink.many("bodySite", &self.body_site);
        sink.many("note", &self.note);
        sink.one("patientInstruction", self.patient_instruction.as_ref());
        sink.many("relevantHistory", &self.relevant_history);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("identifier", &self.identifier, is_meaningful);
        run.check_list("instantiatesCanonical", &self.instantiates_canonical, is_meaningful);
        run.check_list("instantiatesUri", &self.instantiates_uri, is_meaningful);
        run.check_list("basedOn", &self.based_on, is_meaningful);
        run.check_list("replaces", &self.replaces, is_meaningful);
        run.require("status", &self.status);
        run.require("intent", &self.intent);
        run.check_list("category", &self.category, is_meaningful);
        run.check_list("orderDetail", &self.order_detail, is_meaningful);
        run.check_choice("quantity");
        run.require("subject", &self.subject);
        run.check_choice("occurrence");
        run.check_choice("asNeeded");
        run.check_list("performer", &self.performer, is_meaningful);
        run.check_list("locationCode", &self.location_code, is_meaningful);
        run.check_list("locationReference", &self.location_reference, is_meaningful);
        run.check_list("reasonCode", &self.reason_code, is_meaningful);
        run.check_list("reasonReference", &self.reason_reference, is_meaningful);
        run.check_list("insurance", &self.insurance, is_meaningful);
        run.check_list("supportingInfo", &self.supporting_info, is_meaningful);
        run.check_list("specimen", &self.specimen, is_meaningful);
        run.check_list("bodySite", &self.body_site, is_meaningful);
        run.check_list("note", &self.note, is_meaningful);
        run.check_list("relevantHistory", &self.relevant_history, is_meaningful);
        check_references(
            run,
            "basedOn",
            &self.based_on,
            &["CarePlan", "ServiceRequest", "MedicationRequest"],
        );
        check_references(run, "replaces", &self.replaces, &["ServiceRequest"]);
        check_reference(
            run,
            "subject",
            self.subject.as_ref(),
            &["Patient", "Group", "Location", "Device"],
        );
        check_reference(run, "encounter", self.encounter.as_ref(), &["Encounter"]);
        check_reference(
            run,
            "requester",
            self.requester.as_ref(),
            &[
                "Practitioner",
                "PractitionerRole",
                "Organization",
                "Patient",
                "RelatedPerson",
                "Device",
            ],
        );
        check_references(
            run,
            "performer",
            &self.performer,
            &[
                "Practitioner",
                "PractitionerRole",
                "Organization",
                "CareTeam",
                "HealthcareService",
                "Patient",
                "Device",
                "RelatedPerson",
            ],
        );
        check_references(run, "locationReference", &self.location_reference, &["Location"]);
        check_references(
            run,
            "reasonReference",
            &self.reason_reference,
            &["Condition", "Observation", "DiagnosticReport", "DocumentReference"],
        );
        check_references(run, "insurance", &self.insurance, &["Coverage", "ClaimResponse"]);
        check_references(run, "specimen", &self.specimen, &["Specimen"]);
        check_references(run, "relevantHistory", &self.relevant_history, &["Provenance"]);

        let has_order_detail = !self.order_detail.is_empty();
        let has_code = self.code.is_some();
        run.constraint(&PRR_1, || !has_order_detail || has_code);
    }
}
