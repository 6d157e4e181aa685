use ferrum_validation::terminology::{UCUM_CODE_SYSTEM_URL, UCUM_UNITS_VALUE_SET_URL};
use ferrum_validation::{Binding, CodingFacts, Constraint, ValidationRun};

use crate::codes::QuantityComparator;
use crate::node::FieldSink;
use crate::primitive::{Code, Decimal, FhirString, Uri};

const QTY_3: Constraint = Constraint::rule(
    "qty-3",
    "Quantity",
    "If a code for the unit is present, the system SHALL also be present",
    "code.empty() or system.exists()",
);
const RNG_2: Constraint = Constraint::rule(
    "rng-2",
    "Range",
    "If present, low SHALL have a lower value than high",
    "low.empty() or high.empty() or (low <= high)",
);
const RAT_1: Constraint = Constraint::rule(
    "rat-1",
    "Ratio",
    "Numerator and denominator SHALL both be present, or both are absent. If both are absent, there SHALL be some extension present",
    "(numerator.empty() xor denominator.exists()) and (numerator.exists() or extension.exists())",
);

const UCUM_BINDING: Binding = Binding::new(UCUM_UNITS_VALUE_SET_URL, UCUM_CODE_SYSTEM_URL, &[]);

fhir_node! {
    /// A measured amount, optionally coded with a unit system.
    Quantity, QuantityBuilder, element, "Quantity";
    one {
        value: Decimal,
        /// How to read the value: `<`, `<=`, `>=` or `>`.
        comparator: QuantityComparator,
        /// Unit representation for humans.
        unit: FhirString,
        system: Uri,
        code: Code,
    }
    many {}
    choice {}
}

impl Quantity {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("value", self.value.as_ref());
        sink.one("comparator", self.comparator.as_ref());
        sink.one("unit", self.unit.as_ref());
        sink.one("system", self.system.as_ref());
        sink.one("code", self.code.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        let has_code = self.code.is_some();
        let has_system = self.system.is_some();
        run.constraint(&QTY_3, || !has_code || has_system);
        let system = self.system.as_ref().and_then(|s| s.as_str());
        if system == Some(UCUM_CODE_SYSTEM_URL) {
            let code = self.code.as_ref().and_then(|c| c.as_str());
            run.check_coding_binding("code", &UCUM_BINDING, &CodingFacts::new(system, code));
        }
    }

    /// The numeric value, if any.
    pub fn decimal(&self) -> Option<rust_decimal::Decimal> {
        self.value.as_ref().and_then(|v| v.value()).copied()
    }

    fn unit_key(&self) -> Option<&str> {
        self.code
            .as_ref()
            .and_then(|c| c.as_str())
            .or_else(|| self.unit.as_ref().and_then(|u| u.as_str()))
    }
}

fhir_node! {
    /// A set of ordered quantities between a low and a high bound.
    ///
    /// Both bounds are simple quantities: they never carry a comparator.
    Range, RangeBuilder, element, "Range";
    one {
        low: Quantity,
        high: Quantity,
    }
    many {}
    choice {}
}

impl Range {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("low", self.low.as_ref());
        sink.one("high", self.high.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.prohibited(
            "low.comparator",
            self.low.as_ref().map_or(false, |q| q.comparator.is_some()),
        );
        run.prohibited(
            "high.comparator",
            self.high.as_ref().map_or(false, |q| q.comparator.is_some()),
        );
        let (low, high) = (self.low.as_ref(), self.high.as_ref());
        run.constraint(&RNG_2, || match (low, high) {
            (Some(low), Some(high)) if low.unit_key() == high.unit_key() => {
                match (low.decimal(), high.decimal()) {
                    (Some(low), Some(high)) => low <= high,
                    _ => true,
                }
            }
            _ => true,
        });
    }
}

fhir_node! {
    /// A relationship of two quantities.
    Ratio, RatioBuilder, element, "Ratio";
    one {
        numerator: Quantity,
        denominator: Quantity,
    }
    many {}
    choice {}
}

impl Ratio {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("numerator", self.numerator.as_ref());
        sink.one("denominator", self.denominator.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        let numerator = self.numerator.is_some();
        let denominator = self.denominator.is_some();
        let extended = !self.base.extension.is_empty();
        run.constraint(&RAT_1, || {
            numerator == denominator && (numerator || extended)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_validation::{ValidationConfig, ValidationContext};
    use rust_decimal::Decimal as D;

    fn ctx() -> ValidationContext {
        ValidationContext::default()
    }

    fn mg(value: i64) -> Quantity {
        Quantity::builder()
            .value(D::new(value, 0))
            .unit("mg")
            .system(UCUM_CODE_SYSTEM_URL)
            .code("mg")
            .build_with(&ctx())
            .unwrap()
    }

    #[test]
    fn test_code_without_system_breaks_qty_3() {
        let err = Quantity::builder()
            .value(D::new(5, 0))
            .code("mg")
            .build_with(&ctx())
            .unwrap_err();
        let issue = &err.validation().unwrap().outcome().issues[0];
        assert_eq!(issue.constraint.as_deref(), Some("qty-3"));
    }

    #[test]
    fn test_ucum_syntax_only_checked_in_extended_mode() {
        let extended = ValidationContext::new(
            ValidationConfig::builder()
                .extended_codeable_concept_validation(true)
                .build(),
        );
        let err = Quantity::builder()
            .value(D::new(5, 0))
            .system(UCUM_CODE_SYSTEM_URL)
            .code("m[g")
            .build_with(&extended)
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec!["Element 'code': 'm[g' is not a valid code for value set 'http://hl7.org/fhir/ValueSet/ucum-units'"]
        );
        assert!(Quantity::builder()
            .value(D::new(5, 0))
            .system(UCUM_CODE_SYSTEM_URL)
            .code("m[g")
            .build_with(&ctx())
            .is_ok());
    }

    #[test]
    fn test_range_bounds_are_ordered() {
        let err = Range::builder()
            .low(mg(10))
            .high(mg(5))
            .build_with(&ctx())
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().outcome().issues[0].constraint.as_deref(),
            Some("rng-2")
        );
        assert!(Range::builder().low(mg(5)).high(mg(10)).build_with(&ctx()).is_ok());
    }

    #[test]
    fn test_range_bounds_reject_comparators() {
        let bound = mg(5)
            .to_builder()
            .comparator(QuantityComparator::LessThan)
            .build_with(&ctx())
            .unwrap();
        let err = Range::builder().low(bound).build_with(&ctx()).unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec!["Element: 'low.comparator' is prohibited."]
        );
    }

    #[test]
    fn test_ratio_needs_both_terms() {
        let err = Ratio::builder().numerator(mg(1)).build_with(&ctx()).unwrap_err();
        assert_eq!(
            err.validation().unwrap().outcome().issues[0].constraint.as_deref(),
            Some("rat-1")
        );
        assert!(Ratio::builder()
            .numerator(mg(1))
            .denominator(mg(2))
            .build_with(&ctx())
            .is_ok());
    }
}
