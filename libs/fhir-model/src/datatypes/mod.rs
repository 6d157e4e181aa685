//! General-purpose datatypes used by the resources

mod annotation;
mod attachment;
mod coding;
mod extension;
mod identifier;
mod meta;
mod period;
mod quantity;
mod reference;
mod timing;

pub use annotation::{Annotation, AnnotationBuilder};
pub use attachment::{Attachment, AttachmentBuilder};
pub use coding::{CodeableConcept, CodeableConceptBuilder, Coding, CodingBuilder};
pub use extension::{Extension, ExtensionBuilder};
pub use identifier::{Identifier, IdentifierBuilder};
pub use meta::{Meta, MetaBuilder, Narrative, NarrativeBuilder};
pub use period::{Period, PeriodBuilder};
pub use quantity::{Quantity, QuantityBuilder, Range, RangeBuilder, Ratio, RatioBuilder};
pub use reference::{Reference, ReferenceBuilder};
pub use timing::{Timing, TimingBuilder};

pub const DATA_ABSENT_REASON_URL: &str =
    "http://hl7.org/fhir/StructureDefinition/data-absent-reason";

pub(crate) fn has_data_absent_reason(extension: &[Extension]) -> bool {
    extension
        .iter()
        .any(|e| e.url() == Some(DATA_ABSENT_REASON_URL))
}
