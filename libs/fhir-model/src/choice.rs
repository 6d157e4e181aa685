//! Closed unions for choice (`[x]`) fields, one per distinct type set

use crate::datatypes::{
    Attachment, CodeableConcept, Coding, Period, Quantity, Range, Ratio, Reference, Timing,
};
use crate::primitive::{Boolean, Date, DateTime, Decimal, FhirString, Integer, Time, Uri};

choice_type! {
    /// `effective[x]`, `occurrence[x]`: a point in time or a period.
    DateTimeOrPeriod {
        DateTime(DateTime),
        Period(Period),
    }
}

choice_type! {
    /// `occurrence[x]`: a point in time, a period or a schedule.
    DateTimeOrPeriodOrTiming {
        DateTime(DateTime),
        Period(Period),
        Timing(Timing),
    }
}

choice_type! {
    /// `DeviceUseStatement.timing[x]`: same members, schedule first.
    TimingOrPeriodOrDateTime {
        Timing(Timing),
        Period(Period),
        DateTime(DateTime),
    }
}

choice_type! {
    /// `QuestionnaireResponse.item.answer.value[x]`
    AnswerValue {
        Boolean(Boolean),
        Decimal(Decimal),
        Integer(Integer),
        Date(Date),
        DateTime(DateTime),
        Time(Time),
        String(FhirString),
        Uri(Uri),
        Attachment(Attachment),
        Coding(Coding),
        Quantity(Quantity),
        Reference(Reference),
    }
}

choice_type! {
    DecimalOrRange {
        Decimal(Decimal),
        Range(Range),
    }
}

choice_type! {
    PeriodOrRange {
        Period(Period),
        Range(Range),
    }
}

choice_type! {
    QuantityOrRatioOrRange {
        Quantity(Quantity),
        Ratio(Ratio),
        Range(Range),
    }
}

choice_type! {
    BooleanOrCodeableConcept {
        Boolean(Boolean),
        CodeableConcept(CodeableConcept),
    }
}

choice_type! {
    CodeableConceptOrReference {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

choice_type! {
    /// `Annotation.author[x]`
    ReferenceOrString {
        Reference(Reference),
        String(FhirString),
    }
}

impl ReferenceOrString {
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            ReferenceOrString::Reference(reference) => Some(reference),
            ReferenceOrString::String(_) => None,
        }
    }
}

impl CodeableConceptOrReference {
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            CodeableConceptOrReference::Reference(reference) => Some(reference),
            CodeableConceptOrReference::CodeableConcept(_) => None,
        }
    }
}

impl AnswerValue {
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            AnswerValue::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ChoiceType;
    use crate::element::Element;

    #[test]
    fn test_allowed_lists_member_types_in_order() {
        assert_eq!(DateTimeOrPeriod::ALLOWED, &["DateTime", "Period"]);
        assert_eq!(
            <DateTimeOrPeriodOrTiming as ChoiceType>::ALLOWED,
            &["DateTime", "Period", "Timing"]
        );
    }

    #[test]
    fn test_narrowing_from_element() {
        let element = Element::from(DateTime::of("2024-03-01"));
        let choice = DateTimeOrPeriod::try_from(element).unwrap();
        assert_eq!(choice.type_name(), "DateTime");

        let rejected = DecimalOrRange::try_from(Element::from(Boolean::of(true))).unwrap_err();
        assert_eq!(rejected.type_name(), "Boolean");
    }
}
