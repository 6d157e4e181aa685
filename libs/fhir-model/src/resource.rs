//! The closed union of resource types, used for `contained`

use std::fmt;
use std::str::FromStr;

use crate::base::{Documented, Identified, Modifiable, ResourceMeta};
use crate::datatypes::{Extension, Meta, Narrative};
use crate::error::Error;
use crate::node::{Node, NodeType};
use crate::primitive::{Code, Uri};
use crate::resources::{
    Account, ClinicalImpression, DeviceUseStatement, QuestionnaireResponse, RiskAssessment,
    ServiceRequest, SupplyDelivery,
};
use crate::visitor::{walk, Visitor};

macro_rules! resource_enum {
    ($($variant:ident),+ $(,)?) => {
        /// Any resource of the model.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Resource {
            $( $variant($variant), )+
        }

        /// Resource type names known to the model.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ResourceType {
            $( $variant, )+
        }

        impl ResourceType {
            pub const ALL: &'static [ResourceType] = &[$( ResourceType::$variant ),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $( ResourceType::$variant => <$variant as NodeType>::TYPE_NAME, )+
                }
            }
        }

        impl FromStr for ResourceType {
            type Err = Error;

            fn from_str(name: &str) -> Result<Self, Error> {
                $(
                    if name == <$variant as NodeType>::TYPE_NAME {
                        return Ok(ResourceType::$variant);
                    }
                )+
                Err(Error::UnknownResourceType(name.to_string()))
            }
        }

        impl Resource {
            pub fn resource_type(&self) -> ResourceType {
                match self {
                    $( Resource::$variant(_) => ResourceType::$variant, )+
                }
            }

            pub fn as_node(&self) -> Node<'_> {
                self.into()
            }
        }

        impl<'a> From<&'a Resource> for Node<'a> {
            fn from(resource: &'a Resource) -> Self {
                match resource {
                    $( Resource::$variant(inner) => inner.into(), )+
                }
            }
        }

        $(
            impl From<$variant> for Resource {
                fn from(resource: $variant) -> Self {
                    Resource::$variant(resource)
                }
            }

            impl TryFrom<Resource> for $variant {
                type Error = Resource;

                fn try_from(resource: Resource) -> Result<Self, Resource> {
                    match resource {
                        Resource::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )+

        impl Identified for Resource {
            fn id(&self) -> Option<&str> {
                match self {
                    $( Resource::$variant(r) => r.id(), )+
                }
            }

            fn extension(&self) -> &[Extension] {
                match self {
                    $( Resource::$variant(r) => Identified::extension(r), )+
                }
            }
        }

        impl Modifiable for Resource {
            fn modifier_extension(&self) -> &[Extension] {
                match self {
                    $( Resource::$variant(r) => Modifiable::modifier_extension(r), )+
                }
            }
        }

        impl ResourceMeta for Resource {
            fn meta(&self) -> Option<&Meta> {
                match self {
                    $( Resource::$variant(r) => ResourceMeta::meta(r), )+
                }
            }

            fn implicit_rules(&self) -> Option<&Uri> {
                match self {
                    $( Resource::$variant(r) => ResourceMeta::implicit_rules(r), )+
                }
            }

            fn language(&self) -> Option<&Code> {
                match self {
                    $( Resource::$variant(r) => ResourceMeta::language(r), )+
                }
            }
        }

        impl Documented for Resource {
            fn text(&self) -> Option<&Narrative> {
                match self {
                    $( Resource::$variant(r) => Documented::text(r), )+
                }
            }

            fn contained(&self) -> &[Resource] {
                match self {
                    $( Resource::$variant(r) => Documented::contained(r), )+
                }
            }
        }
    };
}

resource_enum!(
    Account,
    ClinicalImpression,
    DeviceUseStatement,
    QuestionnaireResponse,
    RiskAssessment,
    ServiceRequest,
    SupplyDelivery,
);

impl Resource {
    pub fn type_name(&self) -> &'static str {
        self.resource_type().name()
    }

    pub fn accept<'a, V: Visitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        walk(self.type_name(), None, self.as_node(), visitor);
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_names_round_trip() {
        for resource_type in ResourceType::ALL {
            let parsed: ResourceType = resource_type.name().parse().unwrap();
            assert_eq!(&parsed, resource_type);
        }
        assert_eq!(ResourceType::SupplyDelivery.to_string(), "SupplyDelivery");
    }

    #[test]
    fn test_unknown_resource_type() {
        let err = "Patient".parse::<ResourceType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource type: Patient");
    }
}
