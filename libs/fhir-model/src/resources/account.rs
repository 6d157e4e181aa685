//! Account: a financial tool for tracking value accrued for a particular
//! purpose.

use ferrum_validation::ValidationRun;

use crate::base::is_meaningful;
use crate::codes::AccountStatus;
use crate::datatypes::{CodeableConcept, Identifier, Period, Reference};
use crate::node::FieldSink;
use crate::primitive::{Boolean, FhirString, PositiveInt};
use crate::validation::{check_reference, check_references};

fhir_node! {
    /// A financial tool for tracking value accrued for a particular purpose.
    ///
    /// In the healthcare field, used to track charges for a patient, cost
    /// centers, etc.
    Account, AccountBuilder, domain_resource, "Account";
    one {
        status: AccountStatus,
        /// Categorizes the account for reporting and searching purposes.
        type_: CodeableConcept,
        /// Human-readable label.
        name: FhirString,
        /// Transaction window.
        service_period: Period,
        /// Entity managing the account.
        owner: Reference,
        description: FhirString,
        /// Reference to a parent account.
        part_of: Reference,
    }
    many {
        identifier / set_identifier: Identifier,
        /// The entity that caused the expenses.
        subject / set_subject: Reference,
        /// The insurance coverages applicable to this account, in order of
        /// use.
        coverage / set_coverage: AccountCoverage,
        /// The parties ultimately responsible for balancing the account.
        guarantor / set_guarantor: AccountGuarantor,
    }
    choice {}
}

impl Account {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("identifier", &self.identifier);
        sink.one("status", self.status.as_ref());
        sink.one("type", self.type_.as_ref());
        sink.one("name", self.name.as_ref());
        sink.many("subject", &self.subject);
        sink.one("servicePeriod", self.service_period.as_ref());
        sink.many("coverage", &self.coverage);
        sink.one("owner", self.owner.as_ref());
        sink.one("description", self.description.as_ref());
        sink.many("guarantor", &self.guarantor);
        sink.one("partOf", self.part_of.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("identifier", &self.identifier, is_meaningful);
        run.require("status", &self.status);
        run.check_list("subject", &self.subject, is_meaningful);
        run.check_list("coverage", &self.coverage, is_meaningful);
        run.check_list("guarantor", &self.guarantor, is_meaningful);
        check_references(
            run,
            "subject",
            &self.subject,
            &[
                "Patient",
                "Device",
                "Practitioner",
                "PractitionerRole",
                "Location",
                "HealthcareService",
                "Organization",
            ],
        );
        check_reference(run, "owner", self.owner.as_ref(), &["Organization"]);
        check_reference(run, "partOf", self.part_of.as_ref(), &["Account"]);
    }
}

fhir_node! {
    /// An insurance coverage applicable to the account.
    AccountCoverage, AccountCoverageBuilder, backbone, "Account.Coverage";
    one {
        coverage: Reference,
        /// Relative order of the coverage; 1 is used first.
        priority: PositiveInt,
    }
    many {}
    choice {}
}

impl AccountCoverage {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("coverage", self.coverage.as_ref());
        sink.one("priority", self.priority.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.require("coverage", &self.coverage);
        check_reference(run, "coverage", self.coverage.as_ref(), &["Coverage"]);
    }
}

fhir_node! {
    /// A party responsible for balancing the account.
    AccountGuarantor, AccountGuarantorBuilder, backbone, "Account.Guarantor";
    one {
        party: Reference,
        /// Credit or other hold applied.
        on_hold: Boolean,
        /// When the guarantor is responsible.
        period: Period,
    }
    many {}
    choice {}
}

impl AccountGuarantor {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("party", self.party.as_ref());
        sink.one("onHold", self.on_hold.as_ref());
        sink.one("period", self.period.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.require("party", &self.party);
        check_reference(
            run,
            "party",
            self.party.as_ref(),
            &["Patient", "RelatedPerson", "Organization"],
        );
    }
}
