//! The rule interpreter driven through its public API, the way generated
//! node types drive it.

use std::sync::Arc;

use ferrum_validation::terminology::UCUM_UNITS_VALUE_SET_URL;
use ferrum_validation::{
    Binding, CodingFacts, CollectingSink, Constraint, StaticTerminology, ValidationConfig,
    ValidationContext, ValidationRun,
};

const TYPE_BINDING: Binding = Binding::new(
    "http://hl7.org/fhir/ValueSet/supplydelivery-type",
    "http://terminology.hl7.org/CodeSystem/supply-item-type",
    &["medication", "device"],
);
const UCUM_BINDING: Binding = Binding::new(
    UCUM_UNITS_VALUE_SET_URL,
    "http://unitsofmeasure.org",
    &[],
);
const ALWAYS: Constraint = Constraint::rule("tst-1", "Test.value", "never holds", "false");
const ADVICE: Constraint = Constraint::warning("tst-2", "Test", "should hold", "false");

fn extended() -> ValidationContext {
    ValidationContext::new(
        ValidationConfig::builder()
            .extended_codeable_concept_validation(true)
            .build(),
    )
}

#[test]
fn test_clean_run_keeps_warnings() {
    let sink = Arc::new(CollectingSink::new());
    let ctx = ValidationContext::default().with_diagnostics(sink.clone());
    let mut run = ValidationRun::new(&ctx, "Test");
    run.require("status", &Some("active"));
    run.constraint(&ADVICE, || false);

    let outcome = run.finish().unwrap();
    assert!(outcome.valid);
    assert_eq!(outcome.warning_count(), 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_issues_keep_evaluation_order() {
    let ctx = ValidationContext::default();
    let mut run = ValidationRun::new(&ctx, "Test");
    run.require::<()>("status", &None);
    run.constraint(&ALWAYS, || false);
    run.prohibited("quantity.comparator", true);

    let err = run.finish().unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "Missing required element: 'status'",
            "tst-1: never holds",
            "Element: 'quantity.comparator' is prohibited.",
        ]
    );
    let locations: Vec<_> = err
        .outcome()
        .issues
        .iter()
        .filter_map(|i| i.location.as_deref())
        .collect();
    assert_eq!(locations, vec!["Test.status", "Test.value", "Test.quantity.comparator"]);
}

#[test]
fn test_terminology_service_widens_a_binding() {
    let food = [CodingFacts::new(
        Some("http://terminology.hl7.org/CodeSystem/supply-item-type"),
        Some("food"),
    )];

    let ctx = ValidationContext::default();
    let mut run = ValidationRun::new(&ctx, "SupplyDelivery");
    run.check_codeable_concept_binding("type", &TYPE_BINDING, &food);
    assert!(run.finish().is_err());

    let terminology = StaticTerminology::new().with_codes(
        TYPE_BINDING.value_set,
        TYPE_BINDING.system,
        ["food"],
    );
    let ctx = ValidationContext::default().with_terminology(Arc::new(terminology));
    let mut run = ValidationRun::new(&ctx, "SupplyDelivery");
    run.check_codeable_concept_binding("type", &TYPE_BINDING, &food);
    assert!(run.finish().is_ok());
}

#[test]
fn test_extended_mode_reports_the_failing_part() {
    let ctx = extended();
    let mut run = ValidationRun::new(&ctx, "Quantity");
    run.check_coding_binding(
        "code",
        &UCUM_BINDING,
        &CodingFacts::new(Some("http://example.org/units"), Some("mg")),
    );
    run.check_code_binding("unit", &TYPE_BINDING, Some("food"), false);
    run.check_code_binding("absent", &TYPE_BINDING, None, true);

    let err = run.finish().unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "Element 'code': 'http://example.org/units' is not a valid system for value set 'http://hl7.org/fhir/ValueSet/ucum-units'",
            "Element 'unit': 'food' is not a valid code for value set 'http://hl7.org/fhir/ValueSet/supplydelivery-type'",
        ]
    );
}

#[test]
fn test_disabled_context_records_nothing() {
    let ctx = ValidationContext::disabled();
    let mut run = ValidationRun::new(&ctx, "Test");
    assert!(!run.is_enabled());
    run.require::<()>("status", &None);
    run.reject_choice("value", "Quantity", &["String"]);
    run.check_choice("value");
    assert!(run.finish().unwrap().issues.is_empty());
}

#[test]
fn test_rejected_choice_surfaces_at_finish() {
    let ctx = ValidationContext::default();
    let mut run = ValidationRun::new(&ctx, "Annotation");
    run.reject_choice("author", "Quantity", &["Reference", "String"]);
    let err = run.finish().unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Invalid type: Quantity for choice element: 'author' must be one of: [Reference, String]"]
    );
}

#[test]
fn test_config_loaded_from_yaml_drives_the_run() {
    let config = ValidationConfig::from_yaml(
        "references:\n  check_types: false\nconstraints:\n  suppress: [tst-1]\n",
    )
    .unwrap();
    let ctx = ValidationContext::new(config);
    let mut run = ValidationRun::new(&ctx, "Account");
    run.check_reference_type("owner", Some("Patient/1"), None, &["Organization"]);
    run.constraint(&ALWAYS, || false);
    assert!(run.finish().is_ok());
}
