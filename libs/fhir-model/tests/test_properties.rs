//! Properties every resource must satisfy, checked over one populated
//! sample of each resource type.

mod test_support;

use ferrum_model::prelude::*;
use rust_decimal::Decimal as HostDecimal;
use test_support::*;

fn samples() -> Vec<Resource> {
    let ctx = ctx();
    let account = account()
        .text(narrative("Account"))
        .name("Main")
        .subject([reference("Patient/1")])
        .coverage([AccountCoverage::builder()
            .coverage(reference("Coverage/1"))
            .priority(1u32)
            .build_with(&ctx)
            .unwrap()])
        .guarantor([AccountGuarantor::builder()
            .party(reference("Organization/1"))
            .on_hold(false)
            .build_with(&ctx)
            .unwrap()])
        .build_with(&ctx)
        .unwrap();

    let impression = clinical_impression()
        .effective(DateTime::of("2024-01-02T10:00:00Z"))
        .investigation([ClinicalImpressionInvestigation::builder()
            .code(concept("initial examination"))
            .item([reference("Observation/bp")])
            .build_with(&ctx)
            .unwrap()])
        .finding([ClinicalImpressionFinding::builder()
            .item_codeable_concept(concept("hypertension"))
            .basis("blood pressure")
            .build_with(&ctx)
            .unwrap()])
        .protocol([Uri::of("http://example.org/protocol/1")])
        .build_with(&ctx)
        .unwrap();

    let statement = device_use_statement()
        .reason_code([concept("sleep apnea")])
        .recorded_on("2024-02-01")
        .build_with(&ctx)
        .unwrap();

    let response = questionnaire_response()
        .item([QuestionnaireResponseItem::builder()
            .link_id("1")
            .text("Smoker?")
            .answer([QuestionnaireResponseItemAnswer::builder()
                .value(FhirString::of("no"))
                .build_with(&ctx)
                .unwrap()])
            .build_with(&ctx)
            .unwrap()])
        .build_with(&ctx)
        .unwrap();

    let assessment = risk_assessment()
        .prediction([RiskAssessmentPrediction::builder()
            .outcome(concept("stroke"))
            .probability(Decimal::of(HostDecimal::new(12, 0)))
            .build_with(&ctx)
            .unwrap()])
        .mitigation("exercise")
        .build_with(&ctx)
        .unwrap();

    let request = service_request()
        .code(concept("glucose"))
        .order_detail([concept("fasting")])
        .occurrence(DateTime::of("2024-03-01"))
        .as_needed(Boolean::of(false))
        .build_with(&ctx)
        .unwrap();

    let delivery = supply_delivery()
        .supplied_item(
            SupplyDeliverySuppliedItem::builder()
                .quantity(
                    Quantity::builder()
                        .value(HostDecimal::new(3, 0))
                        .build_with(&ctx)
                        .unwrap(),
                )
                .item(concept("bandage"))
                .build_with(&ctx)
                .unwrap(),
        )
        .build_with(&ctx)
        .unwrap();

    vec![
        account.into(),
        impression.into(),
        statement.into(),
        response.into(),
        assessment.into(),
        request.into(),
        delivery.into(),
    ]
}

fn rebuild(resource: &Resource) -> Resource {
    let ctx = ctx();
    match resource {
        Resource::Account(r) => r.to_builder().build_with(&ctx).unwrap().into(),
        Resource::ClinicalImpression(r) => r.to_builder().build_with(&ctx).unwrap().into(),
        Resource::DeviceUseStatement(r) => r.to_builder().build_with(&ctx).unwrap().into(),
        Resource::QuestionnaireResponse(r) => r.to_builder().build_with(&ctx).unwrap().into(),
        Resource::RiskAssessment(r) => r.to_builder().build_with(&ctx).unwrap().into(),
        Resource::ServiceRequest(r) => r.to_builder().build_with(&ctx).unwrap().into(),
        Resource::SupplyDelivery(r) => r.to_builder().build_with(&ctx).unwrap().into(),
    }
}

/// Checks that every `visit_start` is closed by the matching `visit_end`.
#[derive(Default)]
struct Pairing {
    open: Vec<(String, Option<usize>)>,
    started: usize,
    max_depth: usize,
}

impl<'a> Visitor<'a> for Pairing {
    fn visit_start(&mut self, name: &str, index: Option<usize>, _node: Node<'a>) {
        self.open.push((name.to_string(), index));
        self.started += 1;
        self.max_depth = self.max_depth.max(self.open.len());
    }

    fn visit_end(&mut self, name: &str, index: Option<usize>, _node: Node<'a>) {
        assert_eq!(self.open.pop(), Some((name.to_string(), index)));
    }
}

#[test]
fn test_samples_cover_every_resource_type() {
    let types: Vec<_> = samples().iter().map(Resource::resource_type).collect();
    assert_eq!(types, ResourceType::ALL);
}

#[test]
fn test_to_builder_round_trip() {
    for resource in samples() {
        let rebuilt = rebuild(&resource);
        assert_eq!(rebuilt, resource, "{}", resource.type_name());
        assert_eq!(
            rebuilt.as_node().hash_code(),
            resource.as_node().hash_code(),
            "{}",
            resource.type_name()
        );
    }
}

#[test]
fn test_walk_pairs_and_reaches_every_node() {
    for resource in samples() {
        let mut pairing = Pairing::default();
        resource.accept(&mut pairing);
        assert!(pairing.open.is_empty(), "{}", resource.type_name());
        assert!(pairing.max_depth >= 3, "{}", resource.type_name());

        let all = CollectingVisitor::collect(resource.as_node(), |_| true);
        assert_eq!(pairing.started, all.len(), "{}", resource.type_name());
    }
}

#[test]
fn test_has_children_matches_enumeration() {
    for resource in samples() {
        for node in CollectingVisitor::collect(resource.as_node(), |_| true) {
            assert_eq!(
                node.has_children(),
                !node.children().is_empty(),
                "{} in {}",
                node.type_name(),
                resource.type_name()
            );
        }
    }
}

#[test]
fn test_distinct_samples_hash_apart() {
    let hashes: std::collections::HashSet<u64> = samples()
        .iter()
        .map(|r| r.as_node().hash_code())
        .collect();
    assert_eq!(hashes.len(), ResourceType::ALL.len());
}

#[test]
fn test_contained_resources_are_walked_as_their_own_type() {
    let ctx = ctx();
    let [inner, ..] = <[Resource; 7]>::try_from(samples()).unwrap();
    let inner = Account::try_from(inner)
        .unwrap()
        .to_builder()
        .id("acct")
        .build_with(&ctx)
        .unwrap();
    let outer = service_request()
        .text(narrative("Order"))
        .insurance([reference("Coverage/1")])
        .supporting_info([reference("#acct")])
        .contained([inner])
        .build_with(&ctx)
        .unwrap();

    let accounts = CollectingVisitor::collect(outer.as_node(), |node| {
        matches!(node, Node::Account(_))
    });
    assert_eq!(accounts.len(), 1);
    let names: Vec<&str> = outer.as_node().children().iter().map(|c| c.0).collect();
    assert_eq!(
        names,
        vec!["text", "contained", "status", "intent", "subject", "insurance", "supportingInfo"]
    );
}
