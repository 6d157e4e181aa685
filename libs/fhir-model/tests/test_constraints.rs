//! Named invariants: the DomainResource family and the resource-specific
//! rules, seen through whole-resource builds.

mod test_support;

use std::sync::Arc;

use ferrum_model::prelude::*;
use ferrum_model::CollectingSink;
use rust_decimal::Decimal as HostDecimal;
use test_support::*;

const UCUM: &str = "http://unitsofmeasure.org";

fn contained_account(id: &str) -> AccountBuilder {
    account().id(id).text(narrative("Contained"))
}

fn container() -> AccountBuilder {
    account().text(narrative("Container"))
}

#[test]
fn test_dom_2_contained_resources_cannot_nest() {
    let disabled = ValidationContext::disabled();
    let nested = contained_account("nested").build_with(&disabled).unwrap();
    let inner = contained_account("inner")
        .contained([nested])
        .build_with(&disabled)
        .unwrap();

    assert_eq!(
        messages(
            container()
                .owner(reference("#inner"))
                .contained([inner])
                .build_with(&ctx())
        ),
        vec!["dom-2: If the resource is contained in another resource, it SHALL NOT contain nested Resources"]
    );
}

#[test]
fn test_dom_3_contained_resource_must_be_referenced() {
    let ctx = ctx();
    let orphan = contained_account("orphan").build_with(&ctx).unwrap();

    let err = container()
        .contained([orphan.clone()])
        .build_with(&ctx)
        .unwrap_err();
    let outcome = err.validation().unwrap().outcome();
    assert_eq!(outcome.issues_for("dom-3").count(), 1);
    assert_eq!(outcome.issues[0].location.as_deref(), Some("DomainResource"));

    assert!(container()
        .owner(reference("#orphan"))
        .contained([orphan])
        .build_with(&ctx)
        .is_ok());
}

#[test]
fn test_dom_3_back_reference_to_container_is_enough() {
    let ctx = ctx();
    let pointing_back = contained_account("child")
        .part_of(reference("#"))
        .build_with(&ctx)
        .unwrap();
    assert!(container()
        .contained([pointing_back])
        .build_with(&ctx)
        .is_ok());
}

#[test]
fn test_dom_3_references_from_any_depth_count() {
    let ctx = ctx();
    let device = contained_account("acct").build_with(&ctx).unwrap();
    let statement = device_use_statement()
        .text(narrative("Pump"))
        .note([Annotation::builder()
            .author(reference("#acct"))
            .text("see contained account")
            .build_with(&ctx)
            .unwrap()])
        .contained([device])
        .build_with(&ctx);
    assert!(statement.is_ok(), "{:?}", statement.err());
}

#[test]
fn test_dom_4_and_dom_5_restrict_contained_meta() {
    let ctx = ctx();
    let versioned = contained_account("v")
        .meta(Meta::builder().version_id("2").build_with(&ctx).unwrap())
        .build_with(&ctx)
        .unwrap();
    assert_eq!(
        messages(
            container()
                .owner(reference("#v"))
                .contained([versioned])
                .build_with(&ctx)
        ),
        vec!["dom-4: If a resource is contained in another resource, it SHALL NOT have a meta.versionId or a meta.lastUpdated"]
    );

    let label = Coding::builder()
        .system("http://terminology.hl7.org/CodeSystem/v3-Confidentiality")
        .code("R")
        .build_with(&ctx)
        .unwrap();
    let labelled = contained_account("s")
        .meta(Meta::builder().security([label]).build_with(&ctx).unwrap())
        .build_with(&ctx)
        .unwrap();
    assert_eq!(
        messages(
            container()
                .owner(reference("#s"))
                .contained([labelled])
                .build_with(&ctx)
        ),
        vec!["dom-5: If a resource is contained in another resource, it SHALL NOT have a security label"]
    );
}

#[test]
fn test_dom_6_is_a_warning_only() {
    let sink = Arc::new(CollectingSink::new());
    let ctx = ValidationContext::default().with_diagnostics(sink.clone());

    let built = account().build_with(&ctx);
    assert!(built.is_ok());
    let reported = sink.take();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].0, "Account");
    assert_eq!(reported[0].1.constraint.as_deref(), Some("dom-6"));
    assert!(!reported[0].1.is_blocking());

    assert!(account().text(narrative("Main")).build_with(&ctx).is_ok());
    assert!(sink.is_empty());
}

#[test]
fn test_warnings_travel_with_errors() {
    let err = Account::builder().build_with(&ctx()).unwrap_err();
    let outcome = err.validation().unwrap().outcome();
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(outcome.warning_count(), 1);
    assert_eq!(err.validation().unwrap().messages(), vec!["Missing required element: 'status'"]);
}

#[test]
fn test_suppressed_dom_constraint() {
    let sink = Arc::new(CollectingSink::new());
    let ctx = ValidationContext::new(ValidationConfig::builder().suppress("dom-6").build())
        .with_diagnostics(sink.clone());
    assert!(account().build_with(&ctx).is_ok());
    assert!(sink.is_empty());
}

#[test]
fn test_questionnaire_items_nest_through_answers() {
    let ctx = ctx();
    let leaf = QuestionnaireResponseItem::builder()
        .link_id("1.1.1")
        .answer([QuestionnaireResponseItemAnswer::builder()
            .value(Integer::of(4))
            .build_with(&ctx)
            .unwrap()])
        .build_with(&ctx)
        .unwrap();
    let answer = QuestionnaireResponseItemAnswer::builder()
        .value(Boolean::of(true))
        .item([leaf])
        .build_with(&ctx)
        .unwrap();
    let question = QuestionnaireResponseItem::builder()
        .link_id("1.1")
        .answer([answer])
        .build_with(&ctx)
        .unwrap();
    let response = questionnaire_response()
        .text(narrative("Answers"))
        .item([question.clone()])
        .build_with(&ctx)
        .unwrap();

    let items = CollectingVisitor::collect(response.as_node(), |node| {
        matches!(node, Node::QuestionnaireResponseItem(_))
    });
    assert_eq!(items.len(), 2);

    let err = question
        .to_builder()
        .item([QuestionnaireResponseItem::builder()
            .link_id("1.2")
            .build_with(&ValidationContext::disabled())
            .unwrap()])
        .build_with(&ctx)
        .unwrap_err();
    assert_eq!(
        err.validation().unwrap().messages(),
        vec!["qrs-1: Nested item can't be beneath both item and answer"]
    );
}

#[test]
fn test_risk_assessment_probabilities() {
    let ctx = ctx();
    let percent = |value: i64, code: &str| {
        Quantity::builder()
            .value(HostDecimal::new(value, 0))
            .system(UCUM)
            .code(code)
            .build_with(&ctx)
            .unwrap()
    };
    let range = |code: &str| {
        Range::builder()
            .low(percent(10, code))
            .high(percent(20, code))
            .build_with(&ctx)
            .unwrap()
    };

    let prediction = RiskAssessmentPrediction::builder()
        .outcome(concept("stroke"))
        .probability(range("%"))
        .build_with(&ctx)
        .unwrap();
    let assessment = risk_assessment()
        .text(narrative("Stroke risk"))
        .prediction([prediction])
        .build_with(&ctx)
        .unwrap();
    assert_eq!(assessment.prediction().len(), 1);

    let err = RiskAssessmentPrediction::builder()
        .probability(range("mg"))
        .build_with(&ctx)
        .unwrap_err();
    let issue = &err.validation().unwrap().outcome().issues[0];
    assert_eq!(issue.constraint.as_deref(), Some("ras-1"));
    assert_eq!(
        issue.location.as_deref(),
        Some("RiskAssessment.prediction.probability")
    );

    assert_eq!(
        messages(
            RiskAssessmentPrediction::builder()
                .probability(Decimal::of(HostDecimal::new(101, 0)))
                .build_with(&ctx)
        ),
        vec!["ras-2: Must be <= 100"]
    );
}

#[test]
fn test_service_request_prr_1_is_evaluated_last() {
    let err = service_request()
        .text(narrative("Order"))
        .order_detail([concept("fasting")])
        .build_with(&ctx())
        .unwrap_err();
    let outcome = err.validation().unwrap().outcome();
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].location.as_deref(), Some("ServiceRequest"));
    assert_eq!(outcome.issues_for("prr-1").count(), 1);
}

#[test]
fn test_operation_outcome_rendering() {
    let err = service_request()
        .text(narrative("Order"))
        .order_detail([concept("fasting")])
        .build_with(&ctx())
        .unwrap_err();
    let json = err.validation().unwrap().outcome().to_operation_outcome();
    let issue = &json["issue"][0];
    assert_eq!(issue["severity"], "error");
    assert_eq!(issue["code"], "invariant");
    assert_eq!(
        issue["diagnostics"],
        "prr-1: orderDetail SHALL only be present if code is present"
    );
    assert_eq!(issue["location"], serde_json::json!(["ServiceRequest"]));
    assert_eq!(
        issue["expression"],
        serde_json::json!(["orderDetail.empty() or code.exists()"])
    );
}
