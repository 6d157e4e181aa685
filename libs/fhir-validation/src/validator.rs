use crate::primitives::ValueError;
use crate::reference::LiteralReference;
use crate::terminology::{
    is_valid_language_tag, is_valid_ucum_syntax, Binding, CodingFacts, ALL_LANG_VALUE_SET_URL,
    BCP_47_URN, UCUM_CODE_SYSTEM_URL, UCUM_UNITS_VALUE_SET_URL,
};
use crate::{
    is_resource_type, Constraint, IssueCode, ValidationConfig, ValidationContext,
    ValidationError, ValidationIssue, ValidationOutcome,
};

/// Short-lived validation execution for one node.
///
/// Rules are evaluated in the order the caller invokes them; each call
/// records at most one issue. A run that was created with validation
/// switched off ignores every rule.
pub struct ValidationRun<'a> {
    context: &'a ValidationContext,
    type_name: &'static str,
    issues: Vec<ValidationIssue>,
    rejected_choices: Vec<(&'static str, ValidationIssue)>,
    /// Blocking issues recorded so far; only these count toward `max_issues`.
    errors: usize,
    halted: bool,
}

impl<'a> ValidationRun<'a> {
    pub fn new(context: &'a ValidationContext, type_name: &'static str) -> Self {
        Self {
            context,
            type_name,
            issues: Vec::new(),
            rejected_choices: Vec::new(),
            errors: 0,
            halted: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.context.is_validating()
    }

    pub fn config(&self) -> &ValidationConfig {
        self.context.config()
    }

    pub fn context(&self) -> &'a ValidationContext {
        self.context
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn active(&self) -> bool {
        self.is_enabled() && !self.halted
    }

    fn location(&self, element: &str) -> String {
        format!("{}.{}", self.type_name, element)
    }

    fn push(&mut self, issue: ValidationIssue) {
        if !self.active() {
            return;
        }
        let blocking = issue.is_blocking();
        if !blocking {
            tracing::warn!(
                type_name = self.type_name,
                constraint = issue.constraint.as_deref().unwrap_or(""),
                "{}",
                issue.diagnostics
            );
            if let Some(sink) = self.context.diagnostics() {
                sink.report(self.type_name, &issue);
            }
        }
        self.issues.push(issue);
        if !blocking {
            return;
        }
        self.errors += 1;
        let exec = &self.context.config().exec;
        if exec.fail_fast || self.errors >= exec.max_issues {
            self.halted = true;
        }
    }

    fn error(&mut self, code: IssueCode, element: &str, diagnostics: String) {
        let issue = ValidationIssue::error(code, diagnostics).with_location(self.location(element));
        self.push(issue);
    }

    /// `Missing required element` unless `value` is present.
    pub fn require<T>(&mut self, element: &str, value: &Option<T>) {
        if self.active() && value.is_none() {
            self.error(
                IssueCode::Required,
                element,
                format!("Missing required element: '{}'", element),
            );
        }
    }

    /// `Missing required element` unless at least one item is present.
    pub fn require_non_empty<T>(&mut self, element: &str, values: &[T]) {
        if self.active() && values.is_empty() {
            self.error(
                IssueCode::Required,
                element,
                format!("Missing required element: '{}'", element),
            );
        }
    }

    /// Repeating elements may not hold meaningless (empty) items.
    pub fn check_list<T>(&mut self, element: &str, values: &[T], is_present: impl Fn(&T) -> bool) {
        if self.active() && !values.iter().all(is_present) {
            self.error(
                IssueCode::Structure,
                element,
                format!(
                    "Repeating element: '{}' does not permit null elements",
                    element
                ),
            );
        }
    }

    /// Records a choice value whose type is outside the declared set.
    ///
    /// The issue is held back until [`ValidationRun::check_choice`] runs for
    /// the element, so it lands at its declared position in the rule order.
    pub fn reject_choice(&mut self, element: &'static str, found: &str, allowed: &[&str]) {
        if !self.is_enabled() {
            tracing::warn!(
                type_name = self.type_name,
                element,
                found,
                "dropping choice value of undeclared type"
            );
            return;
        }
        let issue = ValidationIssue::error(
            IssueCode::Structure,
            format!(
                "Invalid type: {} for choice element: '{}' must be one of: [{}]",
                found,
                element,
                allowed.join(", ")
            ),
        )
        .with_location(self.location(element));
        self.rejected_choices.push((element, issue));
    }

    pub fn check_choice(&mut self, element: &str) {
        let (rejected, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rejected_choices)
            .into_iter()
            .partition(|(name, _)| *name == element);
        self.rejected_choices = kept;
        for (_, issue) in rejected {
            self.push(issue);
        }
    }

    /// Whitelist check of one reference's literal value and `Reference.type`.
    pub fn check_reference_type(
        &mut self,
        element: &str,
        reference: Option<&str>,
        type_hint: Option<&str>,
        allowed: &[&str],
    ) {
        if !self.active() || !self.config().references.check_types {
            return;
        }
        if let Some(diagnostics) = reference_type_error(element, reference, type_hint, allowed) {
            self.error(IssueCode::Invalid, element, diagnostics);
        }
    }

    /// `ele-1`: a node must carry a value or at least one child.
    pub fn require_value_or_children(&mut self, has_value: bool, has_children: bool) {
        if self.active() && !has_value && !has_children {
            let issue = ValidationIssue::error(
                IssueCode::Invariant,
                "ele-1: All FHIR elements must have a @value or children".to_string(),
            )
            .with_location(self.type_name.to_string())
            .with_constraint("ele-1");
            self.push(issue);
        }
    }

    pub fn prohibited(&mut self, element: &str, present: bool) {
        if self.active() && present {
            self.error(
                IssueCode::Structure,
                element,
                format!("Element: '{}' is prohibited.", element),
            );
        }
    }

    /// Lexical check result of a primitive value.
    pub fn check_value(&mut self, element: &str, result: Result<(), ValueError>) {
        if !self.active() {
            return;
        }
        if let Err(err) = result {
            let code = match err {
                ValueError::TooLong { .. } => IssueCode::TooLong,
                _ => IssueCode::Value,
            };
            self.error(code, element, err.to_string());
        }
    }

    /// Evaluates a named invariant unless it is suppressed by configuration.
    pub fn constraint(&mut self, constraint: &Constraint, holds: impl FnOnce() -> bool) {
        if !self.active() || self.config().is_suppressed(constraint.key) {
            return;
        }
        if holds() {
            return;
        }
        let diagnostics = format!("{}: {}", constraint.key, constraint.description);
        let issue = if constraint.is_rule() {
            ValidationIssue::error(IssueCode::Invariant, diagnostics)
        } else {
            ValidationIssue::warning(IssueCode::Invariant, diagnostics)
        };
        let issue = issue
            .with_location(constraint.location.to_string())
            .with_expression(vec![constraint.expression.to_string()])
            .with_constraint(constraint.key);
        self.push(issue);
    }

    /// Required binding on a CodeableConcept.
    pub fn check_codeable_concept_binding(
        &mut self,
        element: &str,
        binding: &Binding,
        codings: &[CodingFacts<'_>],
    ) {
        if !self.active() {
            return;
        }
        let failed = if self.extended() {
            !codings
                .iter()
                .any(|coding| self.extended_coding_error(element, binding, coding).is_none())
        } else {
            !binding.codes.is_empty()
                && codings.iter().any(CodingFacts::has_system_and_code)
                && !codings.iter().any(|coding| self.is_member(binding, coding))
        };
        if failed {
            self.error(
                IssueCode::CodeInvalid,
                element,
                format!(
                    "Element '{}': does not contain a Coding element with a valid system and code combination for value set: '{}'",
                    element, binding.value_set
                ),
            );
        }
    }

    /// Required binding on a Coding or a coded Quantity. Only enforced in
    /// extended mode.
    pub fn check_coding_binding(&mut self, element: &str, binding: &Binding, coding: &CodingFacts<'_>) {
        if !self.active() || !self.extended() {
            return;
        }
        if let Some(diagnostics) = self.extended_coding_error(element, binding, coding) {
            self.error(IssueCode::CodeInvalid, element, diagnostics);
        }
    }

    /// Required binding on a code, uri or string. Only enforced in extended mode.
    pub fn check_code_binding(
        &mut self,
        element: &str,
        binding: &Binding,
        code: Option<&str>,
        data_absent: bool,
    ) {
        if !self.active() || !self.extended() || data_absent {
            return;
        }
        let diagnostics = match code {
            None => Some(format!(
                "Element '{}': does not contain a valid code for value set '{}'",
                element, binding.value_set
            )),
            Some(code) if binding.is_syntax_validated() => {
                syntax_validated_error(element, binding.value_set, None, code)
            }
            Some(code) if !self.is_member(binding, &CodingFacts::new(None, Some(code))) => {
                Some(format!(
                    "Element '{}': '{}' is not a valid code for value set '{}'",
                    element, code, binding.value_set
                ))
            }
            Some(_) => None,
        };
        if let Some(diagnostics) = diagnostics {
            self.error(IssueCode::CodeInvalid, element, diagnostics);
        }
    }

    fn extended(&self) -> bool {
        self.config().terminology.extended_codeable_concept_validation
    }

    fn is_member(&self, binding: &Binding, coding: &CodingFacts<'_>) -> bool {
        let Some(code) = coding.code else {
            return false;
        };
        if let Some(terminology) = self.context.terminology() {
            if terminology.validate_code(binding.value_set, coding.system, code) {
                return true;
            }
        }
        let system_matches = coding.system.map_or(true, |s| s == binding.system);
        system_matches && binding.codes.contains(&code)
    }

    fn extended_coding_error(
        &self,
        element: &str,
        binding: &Binding,
        coding: &CodingFacts<'_>,
    ) -> Option<String> {
        if coding.data_absent {
            return None;
        }
        let (Some(system), Some(code)) = (coding.system, coding.code) else {
            return Some(format!(
                "Element '{}': does not contain a valid system and code combination for value set: '{}'",
                element, binding.value_set
            ));
        };
        if binding.is_syntax_validated() {
            return syntax_validated_error(element, binding.value_set, Some(system), code);
        }
        if system != binding.system {
            return Some(format!(
                "Element '{}': '{}' is not a valid system for value set '{}'",
                element, system, binding.value_set
            ));
        }
        if !self.is_member(binding, coding) {
            return Some(format!(
                "Element '{}': '{}' is not a valid code for value set '{}'",
                element, code, binding.value_set
            ));
        }
        None
    }

    /// Closes the run. Warnings are kept on the returned outcome; any
    /// blocking issue turns the outcome into an error.
    pub fn finish(mut self) -> Result<ValidationOutcome, ValidationError> {
        let leftovers: Vec<&'static str> =
            self.rejected_choices.iter().map(|(name, _)| *name).collect();
        for element in leftovers {
            self.check_choice(element);
        }
        let outcome = ValidationOutcome::from_issues(self.type_name, self.issues);
        if outcome.valid {
            Ok(outcome)
        } else {
            tracing::debug!(
                type_name = self.type_name,
                errors = outcome.error_count(),
                "build rejected by validation"
            );
            Err(ValidationError::new(outcome))
        }
    }
}

fn syntax_validated_error(
    element: &str,
    value_set: &str,
    system: Option<&str>,
    code: &str,
) -> Option<String> {
    let (expected_system, valid) = if value_set == ALL_LANG_VALUE_SET_URL {
        (BCP_47_URN, is_valid_language_tag(code))
    } else if value_set == UCUM_UNITS_VALUE_SET_URL {
        (UCUM_CODE_SYSTEM_URL, is_valid_ucum_syntax(code))
    } else {
        return None;
    };
    match system {
        Some(system) if system != expected_system => Some(format!(
            "Element '{}': '{}' is not a valid system for value set '{}'",
            element, system, value_set
        )),
        _ if !valid => Some(format!(
            "Element '{}': '{}' is not a valid code for value set '{}'",
            element, code, value_set
        )),
        _ => None,
    }
}

/// Diagnostics for a reference that breaks its target whitelist, if any.
pub fn reference_type_error(
    element: &str,
    reference: Option<&str>,
    type_hint: Option<&str>,
    allowed: &[&str],
) -> Option<String> {
    let allowed_list = format!("[{}]", allowed.join(", "));
    let mut literal_type = None;

    if let Some(value) = reference {
        let parsed = LiteralReference::parse(value);
        if parsed.is_inspected() {
            let Some(resource_type) = parsed.checked_type() else {
                return Some(format!(
                    "Invalid reference value or resource type not found in reference value: '{}' for element: '{}'",
                    value, element
                ));
            };
            if !is_resource_type(resource_type) {
                return Some(format!(
                    "Resource type found in reference value: '{}' for element: '{}' must be a valid resource type name",
                    value, element
                ));
            }
            if !allowed.contains(&resource_type) {
                return Some(format!(
                    "Resource type found in reference value: '{}' for element: '{}' must be one of: {}",
                    value, element, allowed_list
                ));
            }
            literal_type = Some(resource_type);
        }
    }

    if let Some(type_hint) = type_hint {
        if !is_resource_type(type_hint) {
            return Some(format!(
                "Resource type found in Reference.type: '{}' for element: '{}' must be a valid resource type name",
                type_hint, element
            ));
        }
        if !allowed.contains(&type_hint) {
            return Some(format!(
                "Resource type found in Reference.type: '{}' for element: '{}' must be one of: {}",
                type_hint, element, allowed_list
            ));
        }
        if let (Some(value), Some(literal_type)) = (reference, literal_type) {
            if literal_type != type_hint {
                return Some(format!(
                    "Resource type found in reference value: '{}' for element: '{}' does not match Reference.type: {}",
                    value, element, type_hint
                ));
            }
        }
    }

    None
}
