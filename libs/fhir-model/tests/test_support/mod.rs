#![allow(dead_code)]

use std::sync::OnceLock;

use ferrum_model::prelude::*;
use tracing_subscriber::EnvFilter;

static TRACING: OnceLock<()> = OnceLock::new();

/// Routes `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn ctx() -> ValidationContext {
    init_tracing();
    ValidationContext::default()
}

pub fn reference(value: &str) -> Reference {
    Reference::builder()
        .reference(value)
        .build_with(&ctx())
        .expect("valid reference")
}

pub fn concept(text: &str) -> CodeableConcept {
    CodeableConcept::builder()
        .text(text)
        .build_with(&ctx())
        .expect("valid concept")
}

pub fn narrative(text: &str) -> Narrative {
    Narrative::builder()
        .status(NarrativeStatus::Generated)
        .div(format!(
            "<div xmlns=\"http://www.w3.org/1999/xhtml\">{}</div>",
            text
        ))
        .build_with(&ctx())
        .expect("valid narrative")
}

pub fn account() -> AccountBuilder {
    Account::builder().status(AccountStatus::Active)
}

pub fn clinical_impression() -> ClinicalImpressionBuilder {
    ClinicalImpression::builder()
        .status(ClinicalImpressionStatus::Completed)
        .subject(reference("Patient/example"))
}

pub fn device_use_statement() -> DeviceUseStatementBuilder {
    DeviceUseStatement::builder()
        .status(DeviceUseStatementStatus::Active)
        .subject(reference("Patient/example"))
        .device(reference("Device/pump"))
}

pub fn questionnaire_response() -> QuestionnaireResponseBuilder {
    QuestionnaireResponse::builder().status(QuestionnaireResponseStatus::Completed)
}

pub fn risk_assessment() -> RiskAssessmentBuilder {
    RiskAssessment::builder()
        .status(ObservationStatus::Final)
        .subject(reference("Patient/example"))
}

pub fn service_request() -> ServiceRequestBuilder {
    ServiceRequest::builder()
        .status(RequestStatus::Active)
        .intent(RequestIntent::Order)
        .subject(reference("Patient/example"))
}

pub fn supply_delivery() -> SupplyDeliveryBuilder {
    SupplyDelivery::builder().status(SupplyDeliveryStatus::Completed)
}

/// Blocking diagnostics of a failed build.
pub fn messages<T: std::fmt::Debug>(result: Result<T>) -> Vec<String> {
    let err = result.expect_err("build should fail");
    err.validation()
        .expect("validation error")
        .messages()
        .into_iter()
        .map(str::to_string)
        .collect()
}
