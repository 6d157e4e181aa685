//! Construction protocol: build, to_builder, required fields, choice fields
//! and the validation switches.

mod test_support;

use ferrum_model::prelude::*;
use ferrum_model::{IntoChoice, ValidationConfig};
use rust_decimal::Decimal as HostDecimal;
use test_support::*;

#[test]
fn test_to_builder_round_trip_is_equal() {
    let ctx = ctx();
    let account = account()
        .name("Main")
        .owner(reference("Organization/acme"))
        .subject([reference("Patient/1"), reference("Device/2")])
        .text(narrative("Main account"))
        .build_with(&ctx)
        .unwrap();

    let copy = account.to_builder().build_with(&ctx).unwrap();
    assert_eq!(copy, account);
    assert_eq!(copy.as_node().hash_code(), account.as_node().hash_code());
}

#[test]
fn test_updates_leave_the_original_untouched() {
    let ctx = ctx();
    let original = account().name("Main").build_with(&ctx).unwrap();
    let updated = original
        .to_builder()
        .name("Renamed")
        .status(AccountStatus::Inactive)
        .build_with(&ctx)
        .unwrap();

    assert_eq!(original.name().and_then(|n| n.as_str()), Some("Main"));
    assert_eq!(original.status(), Some(&AccountStatus::Active));
    assert_eq!(updated.name().and_then(|n| n.as_str()), Some("Renamed"));
    assert_ne!(original, updated);
}

#[test]
fn test_list_setters_append_and_replace() {
    let ctx = ctx();
    let request = service_request()
        .category([concept("lab")])
        .category([concept("imaging")])
        .build_with(&ctx)
        .unwrap();
    assert_eq!(request.category().len(), 2);

    let replaced = request
        .to_builder()
        .set_category([concept("nursing")])
        .build_with(&ctx)
        .unwrap();
    assert_eq!(replaced.category().len(), 1);
    assert_eq!(request.category().len(), 2);
}

#[test]
fn test_none_clears_a_field() {
    let ctx = ctx();
    let account = account().name("Main").build_with(&ctx).unwrap();
    let cleared = account
        .to_builder()
        .name(None::<FhirString>)
        .build_with(&ctx)
        .unwrap();
    assert!(cleared.name().is_none());
}

#[test]
fn test_every_resource_reports_its_required_fields() {
    let ctx = ctx();
    assert_eq!(
        messages(Account::builder().build_with(&ctx)),
        vec!["Missing required element: 'status'"]
    );
    assert_eq!(
        messages(ClinicalImpression::builder().build_with(&ctx)),
        vec![
            "Missing required element: 'status'",
            "Missing required element: 'subject'",
        ]
    );
    assert_eq!(
        messages(DeviceUseStatement::builder().build_with(&ctx)),
        vec![
            "Missing required element: 'status'",
            "Missing required element: 'subject'",
            "Missing required element: 'device'",
        ]
    );
    assert_eq!(
        messages(QuestionnaireResponse::builder().build_with(&ctx)),
        vec!["Missing required element: 'status'"]
    );
    assert_eq!(
        messages(RiskAssessment::builder().build_with(&ctx)),
        vec![
            "Missing required element: 'status'",
            "Missing required element: 'subject'",
        ]
    );
    assert_eq!(
        messages(ServiceRequest::builder().build_with(&ctx)),
        vec![
            "Missing required element: 'status'",
            "Missing required element: 'intent'",
            "Missing required element: 'subject'",
        ]
    );
    assert!(SupplyDelivery::builder().build_with(&ctx).is_ok());
}

#[test]
fn test_minimal_resources_build() {
    let ctx = ctx();
    assert!(account().build_with(&ctx).is_ok());
    assert!(clinical_impression().build_with(&ctx).is_ok());
    assert!(device_use_statement().build_with(&ctx).is_ok());
    assert!(questionnaire_response().build_with(&ctx).is_ok());
    assert!(risk_assessment().build_with(&ctx).is_ok());
    assert!(service_request().build_with(&ctx).is_ok());
    assert!(supply_delivery().build_with(&ctx).is_ok());
}

#[test]
fn test_account_owner_must_be_an_organization() {
    let ctx = ctx();
    let err = account()
        .owner(reference("Patient/1"))
        .build_with(&ctx)
        .unwrap_err();
    let outcome = err.validation().unwrap().outcome();
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(
        outcome.issues_for("owner").next().map(|i| i.diagnostics.as_str()),
        Some("Resource type found in reference value: 'Patient/1' for element: 'owner' must be one of: [Organization]")
    );

    assert!(account()
        .owner(reference("Organization/1"))
        .build_with(&ctx)
        .is_ok());
}

#[test]
fn test_reference_shapes_that_are_not_inspected() {
    let ctx = ctx();
    for value in [
        "#local",
        "urn:uuid:9d1f4c4e-0a61-4e5e-9a0a-1d0d5d4c0e11",
        "https://example.org/fhir/Patient/1",
    ] {
        assert!(
            account().owner(reference(value)).build_with(&ctx).is_ok(),
            "{value} should not be inspected"
        );
    }
}

#[test]
fn test_reference_type_hint_must_agree() {
    let ctx = ctx();
    let mismatched = Reference::builder()
        .reference("Organization/1")
        .type_("Patient")
        .build_with(&ctx)
        .unwrap();
    assert_eq!(
        messages(account().owner(mismatched).build_with(&ctx)),
        vec!["Resource type found in Reference.type: 'Patient' for element: 'owner' must be one of: [Organization]"]
    );

    let conditional = reference("Organization?identifier=123");
    assert!(account().owner(conditional).build_with(&ctx).is_ok());

    let malformed = reference("not a reference");
    assert_eq!(
        messages(account().owner(malformed).build_with(&ctx)),
        vec!["Invalid reference value or resource type not found in reference value: 'not a reference' for element: 'owner'"]
    );
}

#[test]
fn test_reference_type_checks_can_be_switched_off() {
    let relaxed = ValidationContext::new(
        ValidationConfig::builder().check_reference_types(false).build(),
    );
    assert!(account()
        .owner(reference("Patient/1"))
        .build_with(&relaxed)
        .is_ok());
}

#[test]
fn test_choice_rejects_undeclared_type_when_validating() {
    let ctx = ctx();
    let quantity = Quantity::builder()
        .value(HostDecimal::ONE)
        .build_with(&ctx)
        .unwrap();
    let untyped = Untyped(Element::from(quantity));

    assert_eq!(
        messages(clinical_impression().effective(untyped.clone()).build_with(&ctx)),
        vec!["Invalid type: Quantity for choice element: 'effective' must be one of: [DateTime, Period]"]
    );

    let unchecked = clinical_impression()
        .effective(untyped)
        .build_with(&ValidationContext::disabled())
        .unwrap();
    assert!(unchecked.effective().is_none());
}

#[test]
fn test_choice_accepts_declared_types_statically() {
    let ctx = ctx();
    let by_element = Untyped(Element::from(DateTime::of("2024-05-01")));
    let impression = clinical_impression()
        .effective(by_element)
        .build_with(&ctx)
        .unwrap();
    assert_eq!(
        impression.effective(),
        Some(&DateTimeOrPeriod::DateTime(DateTime::of("2024-05-01")))
    );

    let timing = Timing::builder()
        .code(concept("BID"))
        .build_with(&ctx)
        .unwrap();
    let statement = device_use_statement().timing(timing).build_with(&ctx).unwrap();
    assert_eq!(statement.timing().map(|t| t.type_name()), Some("Timing"));

    let cleared: Option<TimingOrPeriodOrDateTime> = None;
    let statement = statement.to_builder().timing(cleared).build_with(&ctx).unwrap();
    assert!(statement.timing().is_none());
}

#[test]
fn test_disabled_validation_builds_anything() {
    let disabled = ValidationContext::disabled();
    let account = Account::builder()
        .owner(reference("Patient/1"))
        .build_with(&disabled)
        .unwrap();
    assert!(account.status().is_none());
    assert!(FhirString::builder().build_with(&disabled).is_ok());
}

#[test]
fn test_all_issues_are_collected_unless_fail_fast() {
    let builder = || {
        ServiceRequest::builder()
            .text(narrative("Order"))
            .order_detail([concept("fasting")])
            .requester(reference("Specimen/1"))
    };
    assert_eq!(
        messages(builder().build_with(&ctx())),
        vec![
            "Missing required element: 'status'",
            "Missing required element: 'intent'",
            "Missing required element: 'subject'",
            "Resource type found in reference value: 'Specimen/1' for element: 'requester' must be one of: [Practitioner, PractitionerRole, Organization, Patient, RelatedPerson, Device]",
            "prr-1: orderDetail SHALL only be present if code is present",
        ]
    );

    let fail_fast = ValidationContext::new(ValidationConfig::builder().fail_fast(true).build());
    assert_eq!(
        messages(builder().build_with(&fail_fast)),
        vec!["Missing required element: 'status'"]
    );

    let capped = ValidationContext::new(ValidationConfig::builder().max_issues(2).build());
    assert_eq!(messages(builder().build_with(&capped)).len(), 2);
}

#[test]
fn test_narrative_warning_leaves_room_for_required_fields() {
    let capped = ValidationContext::new(ValidationConfig::builder().max_issues(1).build());
    let err = Account::builder().name("Main").build_with(&capped).unwrap_err();
    let failure = err.validation().unwrap();
    assert_eq!(failure.messages(), vec!["Missing required element: 'status'"]);
    assert_eq!(failure.outcome().warning_count(), 1);
}

#[test]
fn test_primitive_values_are_checked_inside_resources() {
    let ctx = ctx();
    let err = account().name("   ").build_with(&ctx).unwrap_err();
    let issue = &err.validation().unwrap().outcome().issues[0];
    assert_eq!(issue.location.as_deref(), Some("Account.name"));

    let err = account().id("not valid!").build_with(&ctx).unwrap_err();
    assert_eq!(
        err.validation().unwrap().outcome().issues[0].location.as_deref(),
        Some("Account.id")
    );
}

#[test]
fn test_unknown_code_is_an_error() {
    let err = "closed".parse::<AccountStatus>().unwrap_err();
    assert!(matches!(err, Error::UnknownCode { type_name: "AccountStatus", .. }));
    assert_eq!("on-hold".parse::<AccountStatus>().unwrap(), AccountStatus::OnHold);
    assert_eq!(RequestIntent::Option.to_string(), "option");
}

#[test]
fn test_into_choice_is_implemented_for_member_types() {
    fn into_effective<T: IntoChoice<DateTimeOrPeriod>>(value: T) -> Option<Element> {
        value.into_choice()
    }
    assert!(into_effective(DateTime::of("2024")).is_some());
    assert!(into_effective(None::<DateTimeOrPeriod>).is_none());
}

#[test]
fn test_validation_error_renders_operation_outcome() {
    let err = Account::builder().build_with(&ctx()).unwrap_err();
    let outcome = err.validation().unwrap().outcome().to_operation_outcome();
    assert_eq!(outcome["resourceType"], serde_json::json!("OperationOutcome"));
    assert_eq!(outcome["issue"].as_array().map(Vec::len), Some(2));
}
