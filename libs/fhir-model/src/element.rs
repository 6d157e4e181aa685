//! The open union of every datatype

use crate::datatypes::{
    Annotation, Attachment, CodeableConcept, Coding, Identifier, Meta, Period, Quantity, Range,
    Ratio, Reference, Timing,
};
use crate::node::{Node, NodeType};
use crate::primitive::{
    Base64Binary, Boolean, Canonical, Code, Date, DateTime, Decimal, FhirId, FhirString, Instant,
    Integer, Markdown, PositiveInt, Time, UnsignedInt, Uri, Url,
};

macro_rules! element_enum {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A value of any datatype.
        ///
        /// Holds `Extension.value[x]` and the not-yet-checked input of choice
        /// setters (see [`Untyped`](crate::Untyped)).
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Element {
            $( $variant($ty), )*
        }

        impl Element {
            pub fn type_name(&self) -> &'static str {
                match self {
                    $( Element::$variant(_) => <$ty as NodeType>::TYPE_NAME, )*
                }
            }

            pub fn as_node(&self) -> Node<'_> {
                match self {
                    $( Element::$variant(value) => value.into(), )*
                }
            }
        }

        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Element::$variant(value)
                }
            }
        )*
    };
}

element_enum! {
    Boolean(Boolean),
    Integer(Integer),
    PositiveInt(PositiveInt),
    UnsignedInt(UnsignedInt),
    Decimal(Decimal),
    String(FhirString),
    Uri(Uri),
    Url(Url),
    Canonical(Canonical),
    Code(Code),
    Id(FhirId),
    Markdown(Markdown),
    Date(Date),
    DateTime(DateTime),
    Time(Time),
    Instant(Instant),
    Base64Binary(Base64Binary),
    Coding(Coding),
    CodeableConcept(CodeableConcept),
    Identifier(Identifier),
    Reference(Reference),
    Period(Period),
    Quantity(Quantity),
    Range(Range),
    Ratio(Ratio),
    Annotation(Annotation),
    Attachment(Attachment),
    Timing(Timing),
    Meta(Meta),
}

impl<'a> From<&'a Element> for Node<'a> {
    fn from(value: &'a Element) -> Self {
        value.as_node()
    }
}
