//! Value-set membership, as consulted by required bindings.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

pub const ALL_LANG_VALUE_SET_URL: &str = "http://hl7.org/fhir/ValueSet/all-languages";
pub const UCUM_UNITS_VALUE_SET_URL: &str = "http://hl7.org/fhir/ValueSet/ucum-units";
pub const BCP_47_URN: &str = "urn:ietf:bcp:47";
pub const UCUM_CODE_SYSTEM_URL: &str = "http://unitsofmeasure.org";

/// External membership lookup keyed by (value set, code system, code).
///
/// Implementations may be a static table or a remote service; the engine only
/// needs a synchronous answer.
pub trait TerminologyService: Send + Sync {
    fn validate_code(&self, value_set: &str, system: Option<&str>, code: &str) -> bool;
}

impl<F> TerminologyService for F
where
    F: Fn(&str, Option<&str>, &str) -> bool + Send + Sync,
{
    fn validate_code(&self, value_set: &str, system: Option<&str>, code: &str) -> bool {
        self(value_set, system, code)
    }
}

/// In-memory value-set table.
#[derive(Debug, Clone, Default)]
pub struct StaticTerminology {
    value_sets: HashMap<String, HashSet<(String, String)>>,
}

impl StaticTerminology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes<'a>(
        mut self,
        value_set: &str,
        system: &str,
        codes: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let entry = self.value_sets.entry(value_set.to_string()).or_default();
        entry.extend(codes.into_iter().map(|c| (system.to_string(), c.to_string())));
        self
    }

    pub fn contains_value_set(&self, value_set: &str) -> bool {
        self.value_sets.contains_key(value_set)
    }
}

impl TerminologyService for StaticTerminology {
    fn validate_code(&self, value_set: &str, system: Option<&str>, code: &str) -> bool {
        let Some(members) = self.value_sets.get(value_set) else {
            return false;
        };
        match system {
            Some(system) => members.contains(&(system.to_string(), code.to_string())),
            None => members.iter().any(|(_, c)| c == code),
        }
    }
}

/// A required binding declared on a coded element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub value_set: &'static str,
    pub system: &'static str,
    pub codes: &'static [&'static str],
}

impl Binding {
    pub const fn new(
        value_set: &'static str,
        system: &'static str,
        codes: &'static [&'static str],
    ) -> Self {
        Self {
            value_set,
            system,
            codes,
        }
    }

    /// Value sets whose membership is decided by syntax rather than by a table.
    pub fn is_syntax_validated(&self) -> bool {
        is_syntax_validated_value_set(self.value_set)
    }
}

/// System and code of one coding (or coded quantity) under test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodingFacts<'a> {
    pub system: Option<&'a str>,
    pub code: Option<&'a str>,
    /// True when the element carries nothing but a data-absent-reason extension.
    pub data_absent: bool,
}

impl<'a> CodingFacts<'a> {
    pub fn new(system: Option<&'a str>, code: Option<&'a str>) -> Self {
        Self {
            system,
            code,
            data_absent: false,
        }
    }

    pub fn has_system_and_code(&self) -> bool {
        self.system.is_some() && self.code.is_some()
    }
}

pub fn is_syntax_validated_value_set(value_set: &str) -> bool {
    value_set == ALL_LANG_VALUE_SET_URL || value_set == UCUM_UNITS_VALUE_SET_URL
}

static LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z]{2,3}(?:-[A-Za-z]{3}){0,3}|[A-Za-z]{4,8})(?:-[A-Za-z]{4})?(?:-(?:[A-Za-z]{2}|[0-9]{3}))?(?:-(?:[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*(?:-[0-9A-WY-Za-wy-z](?:-[A-Za-z0-9]{2,8})+)*(?:-[xX](?:-[A-Za-z0-9]{1,8})+)?$|^[xX](?:-[A-Za-z0-9]{1,8})+$")
        .expect("language tag pattern is valid")
});

/// Well-formedness of a BCP-47 language tag.
pub fn is_valid_language_tag(code: &str) -> bool {
    LANGUAGE_TAG.is_match(code)
}

/// Structural UCUM check: printable ASCII, no whitespace, balanced brackets.
pub fn is_valid_ucum_syntax(code: &str) -> bool {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_graphic()) {
        return false;
    }
    let mut depth: i32 = 0;
    let mut in_annotation = false;
    for ch in code.chars() {
        match ch {
            '{' if !in_annotation => in_annotation = true,
            '}' if in_annotation => in_annotation = false,
            '}' => return false,
            '(' | '[' if !in_annotation => depth += 1,
            ')' | ']' if !in_annotation => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && !in_annotation
}
