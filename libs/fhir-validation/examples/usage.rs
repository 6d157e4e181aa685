use std::sync::Arc;

use ferrum_validation::*;

const OWNER_TARGETS: &[&str] = &["Organization"];
const ORDER_DETAIL: Constraint = Constraint::rule(
    "prr-1",
    "ServiceRequest",
    "orderDetail SHALL only be present if code is present",
    "orderDetail.empty() or code.exists()",
);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: defaults
    let ctx = ValidationContext::default();
    let mut run = ValidationRun::new(&ctx, "Account");
    run.require("status", &Some("active"));
    run.check_reference_type("owner", Some("Organization/acme"), None, OWNER_TARGETS);
    let outcome = run.finish()?;
    println!("Account valid: {}", outcome.valid);

    // Example 2: builder with a diagnostics sink
    let sink = Arc::new(CollectingSink::new());
    let strict = ValidationContext::new(
        ValidationConfig::builder()
            .extended_codeable_concept_validation(true)
            .fail_fast(true)
            .build(),
    )
    .with_diagnostics(sink.clone());

    let mut run = ValidationRun::new(&strict, "ServiceRequest");
    run.constraint(&ORDER_DETAIL, || false);
    if let Err(err) = run.finish() {
        println!("{}", err);
        println!(
            "{}",
            serde_json::to_string_pretty(&err.outcome().to_operation_outcome())?
        );
    }

    // Example 3: YAML configuration
    let yaml = r#"
references:
  check_types: false
constraints:
  suppress:
    - "dom-6"
exec:
  fail_fast: false
  max_issues: 50
"#;

    let config = ValidationConfig::from_yaml(yaml)?;
    println!("Suppressed: {:?}", config.constraints.suppress);
    println!("{}", config.to_yaml()?);

    Ok(())
}
