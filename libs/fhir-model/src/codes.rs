//! Closed code enumerations for elements bound to a required value set

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::node::Node;

/// A required-binding code as seen by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodedValue {
    pub type_name: &'static str,
    pub system: &'static str,
    pub code: &'static str,
}

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($system:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const SYSTEM: &'static str = $system;
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub fn code(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(code: &str) -> Result<Self, Error> {
                match code {
                    $( $code => Ok($name::$variant), )+
                    other => Err(Error::UnknownCode {
                        type_name: stringify!($name),
                        code: other.to_string(),
                    }),
                }
            }
        }

        impl<'a> From<&'a $name> for Node<'a> {
            fn from(value: &'a $name) -> Self {
                Node::Coded(CodedValue {
                    type_name: stringify!($name),
                    system: $system,
                    code: value.code(),
                })
            }
        }
    };
}

code_enum! {
    /// Indicates whether the account is available to be used.
    AccountStatus ("http://hl7.org/fhir/account-status") {
        Active => "active",
        Inactive => "inactive",
        EnteredInError => "entered-in-error",
        OnHold => "on-hold",
        Unknown => "unknown",
    }
}

code_enum! {
    ClinicalImpressionStatus ("http://hl7.org/fhir/event-status") {
        InProgress => "in-progress",
        Completed => "completed",
        EnteredInError => "entered-in-error",
    }
}

code_enum! {
    DeviceUseStatementStatus ("http://hl7.org/fhir/device-statement-status") {
        Active => "active",
        Completed => "completed",
        EnteredInError => "entered-in-error",
        Intended => "intended",
        Stopped => "stopped",
        OnHold => "on-hold",
    }
}

code_enum! {
    /// Lifecycle status of the questionnaire response.
    QuestionnaireResponseStatus ("http://hl7.org/fhir/questionnaire-answers-status") {
        InProgress => "in-progress",
        Completed => "completed",
        Amended => "amended",
        EnteredInError => "entered-in-error",
        Stopped => "stopped",
    }
}

code_enum! {
    ObservationStatus ("http://hl7.org/fhir/observation-status") {
        Registered => "registered",
        Preliminary => "preliminary",
        Final => "final",
        Amended => "amended",
        Corrected => "corrected",
        Cancelled => "cancelled",
        EnteredInError => "entered-in-error",
        Unknown => "unknown",
    }
}

code_enum! {
    RequestStatus ("http://hl7.org/fhir/request-status") {
        Draft => "draft",
        Active => "active",
        OnHold => "on-hold",
        Revoked => "revoked",
        Completed => "completed",
        EnteredInError => "entered-in-error",
        Unknown => "unknown",
    }
}

code_enum! {
    /// Whether a request is a proposal, plan, an original order or a
    /// reflex order.
    RequestIntent ("http://hl7.org/fhir/request-intent") {
        Proposal => "proposal",
        Plan => "plan",
        Directive => "directive",
        Order => "order",
        OriginalOrder => "original-order",
        ReflexOrder => "reflex-order",
        FillerOrder => "filler-order",
        InstanceOrder => "instance-order",
        Option => "option",
    }
}

code_enum! {
    RequestPriority ("http://hl7.org/fhir/request-priority") {
        Routine => "routine",
        Urgent => "urgent",
        Asap => "asap",
        Stat => "stat",
    }
}

code_enum! {
    SupplyDeliveryStatus ("http://hl7.org/fhir/supplydelivery-status") {
        InProgress => "in-progress",
        Completed => "completed",
        Abandoned => "abandoned",
        EnteredInError => "entered-in-error",
    }
}

code_enum! {
    NarrativeStatus ("http://hl7.org/fhir/narrative-status") {
        Generated => "generated",
        Extensions => "extensions",
        Additional => "additional",
        Empty => "empty",
    }
}

code_enum! {
    IdentifierUse ("http://hl7.org/fhir/identifier-use") {
        Usual => "usual",
        Official => "official",
        Temp => "temp",
        Secondary => "secondary",
        Old => "old",
    }
}

code_enum! {
    /// How a quantity value should be understood relative to the real value.
    QuantityComparator ("http://hl7.org/fhir/quantity-comparator") {
        LessThan => "<",
        LessOrEqual => "<=",
        GreaterOrEqual => ">=",
        GreaterThan => ">",
    }
}
