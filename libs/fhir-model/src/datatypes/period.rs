use std::cmp::Ordering;

use chrono::DateTime as ChronoDateTime;
use ferrum_validation::{Constraint, ValidationRun};

use crate::node::FieldSink;
use crate::primitive::DateTime;

const PER_1: Constraint = Constraint::rule(
    "per-1",
    "Period",
    "If present, start SHALL have a lower value than end",
    "start.hasValue().not() or end.hasValue().not() or (start <= end)",
);

fhir_node! {
    /// A time period defined by a start and end date/time.
    Period, PeriodBuilder, element, "Period";
    one {
        start: DateTime,
        /// End of the period, inclusive. Absent means ongoing.
        end: DateTime,
    }
    many {}
    choice {}
}

impl Period {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("start", self.start.as_ref());
        sink.one("end", self.end.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        let start = self.start.as_ref().and_then(|s| s.as_str());
        let end = self.end.as_ref().and_then(|e| e.as_str());
        run.constraint(&PER_1, || match (start, end) {
            (Some(start), Some(end)) => compare_date_times(start, end) != Some(Ordering::Greater),
            _ => true,
        });
    }
}

/// Orders two dateTime values when the comparison is determinate: both
/// carry a full timestamp with offset, or both share the same precision.
pub(crate) fn compare_date_times(left: &str, right: &str) -> Option<Ordering> {
    if let (Ok(left), Ok(right)) = (
        ChronoDateTime::parse_from_rfc3339(left),
        ChronoDateTime::parse_from_rfc3339(right),
    ) {
        return Some(left.cmp(&right));
    }
    if left.len() == right.len() && !left.contains('T') {
        return Some(left.cmp(right));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_validation::ValidationContext;

    fn period(start: &str, end: &str) -> crate::error::Result<Period> {
        Period::builder()
            .start(start)
            .end(end)
            .build_with(&ValidationContext::default())
    }

    #[test]
    fn test_start_after_end_breaks_per_1() {
        let err = period("2024-03-01", "2024-02-01").unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages(),
            vec!["per-1: If present, start SHALL have a lower value than end"]
        );
        assert!(period("2024-02-01", "2024-03-01").is_ok());
    }

    #[test]
    fn test_offsets_are_honoured() {
        assert!(period("2024-01-01T10:00:00+02:00", "2024-01-01T09:30:00Z").is_ok());
        assert!(period("2024-01-01T10:00:00Z", "2024-01-01T09:30:00Z").is_err());
    }

    #[test]
    fn test_mixed_precision_is_not_compared() {
        assert_eq!(compare_date_times("2024", "2023-12-31"), None);
        assert!(period("2024", "2023-12-31").is_ok());
    }
}
