use ferrum_validation::terminology::UCUM_CODE_SYSTEM_URL;
use ferrum_validation::{Constraint, ValidationRun};
use rust_decimal::Decimal as HostDecimal;

use crate::base::is_meaningful;
use crate::choice::{DateTimeOrPeriod, DecimalOrRange, PeriodOrRange};
use crate::codes::ObservationStatus;
use crate::datatypes::{Annotation, CodeableConcept, Identifier, Quantity, Reference};
use crate::node::FieldSink;
use crate::primitive::{Decimal, FhirString};
use crate::validation::{check_reference, check_references};

const RAS_1: Constraint = Constraint::rule(
    "ras-1",
    "RiskAssessment.prediction.probability",
    "low and high must be percentages, if present",
    "(low.empty() or ((low.code = '%') and (low.system = %ucum))) and (high.empty() or ((high.code = '%') and (high.system = %ucum)))",
);
const RAS_2: Constraint = Constraint::rule(
    "ras-2",
    "RiskAssessment.prediction",
    "Must be <= 100",
    "probability.exists($this is decimal) implies (probability as decimal) <= 100",
);

fhir_node! {
    /// An assessment of the likely outcome(s) for a patient or other
    /// subject, as well as the likelihood of each outcome.
    RiskAssessment, RiskAssessmentBuilder, domain_resource, "RiskAssessment";
    one {
        /// Request fulfilled by this assessment.
        based_on: Reference,
        parent: Reference,
        status: ObservationStatus,
        /// Evaluation mechanism.
        method: CodeableConcept,
        code: CodeableConcept,
        subject: Reference,
        encounter: Reference,
        /// Condition assessed.
        condition: Reference,
        performer: Reference,
        /// How to reduce risk.
        mitigation: FhirString,
    }
    many {
        identifier / set_identifier: Identifier,
        reason_code / set_reason_code: CodeableConcept,
        reason_reference / set_reason_reference: Reference,
        /// Information used in the assessment.
        basis / set_basis: Reference,
        prediction / set_prediction: RiskAssessmentPrediction,
        note / set_note: Annotation,
    }
    choice {
        occurrence("occurrence"): DateTimeOrPeriod,
    }
}

impl RiskAssessment {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("identifier", &self.identifier);
        sink.one("basedOn", self.based_on.as_ref());
        sink.one("parent", self.parent.as_ref());
        sink.one("status", self.status.as_ref());
        sink.one("method", self.method.as_ref());
        sink.one("code", self.code.as_ref());
        sink.one("subject", self.subject.as_ref());
        sink.one("encounter", self.encounter.as_ref());
        sink.one("occurrence", self.occurrence.as_ref());
        sink.one("condition", self.condition.as_ref());
        sink.one("performer", self.performer.as_ref());
        sink.many("reasonCode", &self.reason_code);
        sink.many("reasonReference", &self.reason_reference);
        sink.many("basis", &self.basis);
        sink.many("prediction", &self.prediction);
        sink.one("mitigation", self.mitigation.as_ref());
        sink.many("note", &self.note);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("identifier", &self.identifier, is_meaningful);
        run.require("status", &self.status);
        run.require("subject", &self.subject);
        run.check_choice("occurrence");
        run.check_list("reasonCode", &self.reason_code, is_meaningful);
        run.check_list("reasonReference", &self.reason_reference, is_meaningful);
        run.check_list("basis", &self.basis, is_meaningful);
        run.check_list("prediction", &self.prediction, is_meaningful);
        run.check_list("note", &self.note, is_meaningful);
        check_reference(run, "subject", self.subject.as_ref(), &["Patient", "Group"]);
        check_reference(run, "encounter", self.encounter.as_ref(), &["Encounter"]);
        check_reference(run, "condition", self.condition.as_ref(), &["Condition"]);
        check_reference(
            run,
            "performer",
            self.performer.as_ref(),
            &["Practitioner", "PractitionerRole", "Device"],
        );
        check_references(
            run,
            "reasonReference",
            &self.reason_reference,
            &["Condition", "Observation", "DiagnosticReport", "DocumentReference"],
        );
    }
}

fhir_node! {
    /// One of the potential outcomes for the subject, with its likelihood.
    RiskAssessmentPrediction, RiskAssessmentPredictionBuilder, backbone,
        "RiskAssessment.Prediction";
    one {
        outcome: CodeableConcept,
        qualitative_risk: CodeableConcept,
        /// Relative likelihood compared to the general population.
        relative_risk: Decimal,
        /// Explanation of the prediction.
        rationale: FhirString,
    }
    many {}
    choice {
        /// Likelihood of the outcome, as a percentage or a range of
        /// percentages.
        probability("probability"): DecimalOrRange,
        /// Timeframe or age range.
        when("when"): PeriodOrRange,
    }
}

impl RiskAssessmentPrediction {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("outcome", self.outcome.as_ref());
        sink.one("probability", self.probability.as_ref());
        sink.one("qualitativeRisk", self.qualitative_risk.as_ref());
        sink.one("relativeRisk", self.relative_risk.as_ref());
        sink.one("when", self.when.as_ref());
        sink.one("rationale", self.rationale.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_choice("probability");
        run.check_choice("when");
        let probability = self.probability.as_ref();
        run.constraint(&RAS_1, || match probability {
            Some(DecimalOrRange::Range(range)) => {
                range.low().map_or(true, is_percentage) && range.high().map_or(true, is_percentage)
            }
            _ => true,
        });
        run.constraint(&RAS_2, || match probability {
            Some(DecimalOrRange::Decimal(decimal)) => decimal
                .value()
                .map_or(true, |value| *value <= HostDecimal::ONE_HUNDRED),
            _ => true,
        });
    }
}

fn is_percentage(quantity: &Quantity) -> bool {
    quantity.code().and_then(|c| c.as_str()) == Some("%")
        && quantity.system().and_then(|s| s.as_str()) == Some(UCUM_CODE_SYSTEM_URL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::Range;
    use ferrum_validation::ValidationContext;

    fn ctx() -> ValidationContext {
        ValidationContext::default()
    }

    fn percent(value: i64, code: &str) -> Quantity {
        Quantity::builder()
            .value(HostDecimal::new(value, 0))
            .system(UCUM_CODE_SYSTEM_URL)
            .code(code)
            .build_with(&ctx())
            .unwrap()
    }

    #[test]
    fn test_probability_above_one_hundred_breaks_ras_2() {
        let err = RiskAssessmentPrediction::builder()
            .probability(Decimal::of(HostDecimal::new(1005, 1)))
            .build_with(&ctx())
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec!["ras-2: Must be <= 100"]
        );
        assert!(RiskAssessmentPrediction::builder()
            .probability(Decimal::of(HostDecimal::ONE_HUNDRED))
            .build_with(&ctx())
            .is_ok());
    }

    #[test]
    fn test_probability_range_must_use_percentages() {
        let range = Range::builder()
            .low(percent(10, "%"))
            .high(percent(20, "mg"))
            .build_with(&ctx())
            .unwrap();
        let err = RiskAssessmentPrediction::builder()
            .probability(range)
            .build_with(&ctx())
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec!["ras-1: low and high must be percentages, if present"]
        );
    }
}
