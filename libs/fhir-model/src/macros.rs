//! Declarative node definitions
//!
//! `fhir_node!` expands one field listing into the immutable struct, its
//! getters, the paired builder with setters, `to_builder`/`From`, and the
//! `build`/`build_with` pipeline. The schema-ordered child listing
//! (`own_fields`) and the rule list (`rules`) stay hand-written next to each
//! type.

macro_rules! base_of {
    (element) => {
        $crate::base::ElementBase
    };
    (backbone) => {
        $crate::base::BackboneBase
    };
    (domain_resource) => {
        $crate::base::DomainResourceBase
    };
}

macro_rules! base_setters {
    (element) => {
        pub fn id(mut self, id: impl $crate::builder::IntoElement<String>) -> Self {
            self.base.id = $crate::builder::IntoElement::into_element(id);
            self
        }

        /// Appends extensions.
        pub fn extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.extension.extend(extension);
            self
        }

        /// Replaces the extensions.
        pub fn set_extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.extension = extension.into_iter().collect();
            self
        }
    };
    (backbone) => {
        base_setters!(element);

        pub fn modifier_extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.modifier_extension.extend(extension);
            self
        }

        pub fn set_modifier_extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.modifier_extension = extension.into_iter().collect();
            self
        }
    };
    (domain_resource) => {
        pub fn id(mut self, id: impl $crate::builder::IntoElement<String>) -> Self {
            self.base.resource.id = $crate::builder::IntoElement::into_element(id);
            self
        }

        pub fn meta(mut self, meta: impl $crate::builder::IntoElement<$crate::datatypes::Meta>) -> Self {
            self.base.resource.meta = $crate::builder::IntoElement::into_element(meta);
            self
        }

        pub fn implicit_rules(
            mut self,
            implicit_rules: impl $crate::builder::IntoElement<$crate::primitive::Uri>,
        ) -> Self {
            self.base.resource.implicit_rules =
                $crate::builder::IntoElement::into_element(implicit_rules);
            self
        }

        pub fn language(
            mut self,
            language: impl $crate::builder::IntoElement<$crate::primitive::Code>,
        ) -> Self {
            self.base.resource.language = $crate::builder::IntoElement::into_element(language);
            self
        }

        pub fn text(
            mut self,
            text: impl $crate::builder::IntoElement<$crate::datatypes::Narrative>,
        ) -> Self {
            self.base.text = $crate::builder::IntoElement::into_element(text);
            self
        }

        /// Appends contained resources.
        pub fn contained<I, R>(mut self, contained: I) -> Self
        where
            I: IntoIterator<Item = R>,
            R: Into<$crate::resource::Resource>,
        {
            self.base.contained.extend(contained.into_iter().map(Into::into));
            self
        }

        pub fn set_contained<I, R>(mut self, contained: I) -> Self
        where
            I: IntoIterator<Item = R>,
            R: Into<$crate::resource::Resource>,
        {
            self.base.contained = contained.into_iter().map(Into::into).collect();
            self
        }

        pub fn extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.extension.extend(extension);
            self
        }

        pub fn set_extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.extension = extension.into_iter().collect();
            self
        }

        pub fn modifier_extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.modifier_extension.extend(extension);
            self
        }

        pub fn set_modifier_extension<I>(mut self, extension: I) -> Self
        where
            I: IntoIterator<Item = $crate::datatypes::Extension>,
        {
            self.base.modifier_extension = extension.into_iter().collect();
            self
        }
    };
}

macro_rules! impl_base_traits {
    (element, $name:ident) => {
        impl $crate::base::Identified for $name {
            fn id(&self) -> Option<&str> {
                self.base.id.as_deref()
            }

            fn extension(&self) -> &[$crate::datatypes::Extension] {
                &self.base.extension
            }
        }
    };
    (backbone, $name:ident) => {
        impl_base_traits!(element, $name);

        impl $crate::base::Modifiable for $name {
            fn modifier_extension(&self) -> &[$crate::datatypes::Extension] {
                &self.base.modifier_extension
            }
        }
    };
    (domain_resource, $name:ident) => {
        impl $crate::base::Identified for $name {
            fn id(&self) -> Option<&str> {
                self.base.resource.id.as_deref()
            }

            fn extension(&self) -> &[$crate::datatypes::Extension] {
                &self.base.extension
            }
        }

        impl $crate::base::Modifiable for $name {
            fn modifier_extension(&self) -> &[$crate::datatypes::Extension] {
                &self.base.modifier_extension
            }
        }

        impl $crate::base::ResourceMeta for $name {
            fn meta(&self) -> Option<&$crate::datatypes::Meta> {
                self.base.resource.meta.as_ref()
            }

            fn implicit_rules(&self) -> Option<&$crate::primitive::Uri> {
                self.base.resource.implicit_rules.as_ref()
            }

            fn language(&self) -> Option<&$crate::primitive::Code> {
                self.base.resource.language.as_ref()
            }
        }

        impl $crate::base::Documented for $name {
            fn text(&self) -> Option<&$crate::datatypes::Narrative> {
                self.base.text.as_ref()
            }

            fn contained(&self) -> &[$crate::resource::Resource] {
                &self.base.contained
            }
        }
    };
}

macro_rules! fhir_node {
    (
        $(#[$meta:meta])*
        $name:ident, $builder:ident, $kind:ident, $type_name:literal;
        one {
            $( $(#[$one_meta:meta])* $one:ident : $one_ty:ty ),* $(,)?
        }
        many {
            $( $(#[$many_meta:meta])* $many:ident / $set_many:ident : $many_ty:ty ),* $(,)?
        }
        choice {
            $( $(#[$choice_meta:meta])* $choice:ident ($choice_name:literal) : $choice_ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            structural_hash: u64,
            base: base_of!($kind),
            $( $one: Option<$one_ty>, )*
            $( $many: Vec<$many_ty>, )*
            $( $choice: Option<$choice_ty>, )*
        }

        impl $name {
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// A builder holding copies of every field of this node.
            pub fn to_builder(&self) -> $builder {
                $builder::from(self)
            }

            $(
                $(#[$one_meta])*
                pub fn $one(&self) -> Option<&$one_ty> {
                    self.$one.as_ref()
                }
            )*

            $(
                $(#[$many_meta])*
                pub fn $many(&self) -> &[$many_ty] {
                    &self.$many
                }
            )*

            $(
                $(#[$choice_meta])*
                pub fn $choice(&self) -> Option<&$choice_ty> {
                    self.$choice.as_ref()
                }
            )*

            pub fn as_node(&self) -> $crate::node::Node<'_> {
                $crate::node::Node::from(self)
            }

            pub fn has_children(&self) -> bool {
                self.as_node().has_children()
            }

            /// Walks this node and its subtree with `visitor`.
            pub fn accept<'a, V>(&'a self, visitor: &mut V)
            where
                V: $crate::visitor::Visitor<'a> + ?Sized,
            {
                $crate::visitor::walk($type_name, None, self.as_node(), visitor);
            }
        }

        impl ::std::hash::Hash for $name {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                state.write_u64(self.structural_hash);
            }
        }

        impl $crate::node::NodeType for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn fields<'a, S: $crate::node::FieldSink<'a>>(&'a self, sink: &mut S) {
                self.base.fields(sink);
                self.own_fields(sink);
            }

            fn hash_code(&self) -> u64 {
                self.structural_hash
            }
        }

        impl_base_traits!($kind, $name);

        #[doc = concat!("Builder for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            base: base_of!($kind),
            $( $one: Option<$one_ty>, )*
            $( $many: Vec<$many_ty>, )*
            $( $choice: Option<$crate::element::Element>, )*
        }

        impl $builder {
            base_setters!($kind);

            $(
                pub fn $one(mut self, value: impl $crate::builder::IntoElement<$one_ty>) -> Self {
                    self.$one = $crate::builder::IntoElement::into_element(value);
                    self
                }
            )*

            $(
                pub fn $many<I: IntoIterator<Item = $many_ty>>(mut self, values: I) -> Self {
                    self.$many.extend(values);
                    self
                }

                pub fn $set_many<I: IntoIterator<Item = $many_ty>>(mut self, values: I) -> Self {
                    self.$many = values.into_iter().collect();
                    self
                }
            )*

            $(
                pub fn $choice(mut self, value: impl $crate::builder::IntoChoice<$choice_ty>) -> Self {
                    self.$choice = $crate::builder::IntoChoice::into_choice(value);
                    self
                }
            )*

            /// Builds against the process-wide validation context.
            pub fn build(self) -> $crate::error::Result<$name> {
                let context = ::ferrum_validation::ValidationContext::global();
                self.build_with(&context)
            }

            pub fn build_with(
                self,
                context: &::ferrum_validation::ValidationContext,
            ) -> $crate::error::Result<$name> {
                let mut run = ::ferrum_validation::ValidationRun::new(context, $type_name);
                let mut node = $name {
                    structural_hash: 0,
                    base: self.base,
                    $( $one: self.$one, )*
                    $( $many: self.$many, )*
                    $( $choice: $crate::builder::choice_value(&mut run, $choice_name, self.$choice), )*
                };
                node.structural_hash = $crate::node::structural_hash(&node);
                if run.is_enabled() {
                    let view = node.as_node();
                    $crate::validation::check_primitive_values(view, &mut run);
                    node.base.validate(view, &mut run);
                    node.rules(&mut run);
                    node.base.validate_after(view, &mut run);
                }
                run.finish()?;
                tracing::trace!(type_name = $type_name, hash = node.structural_hash, "built node");
                Ok(node)
            }
        }

        impl From<&$name> for $builder {
            fn from(node: &$name) -> Self {
                Self {
                    base: node.base.clone(),
                    $( $one: node.$one.clone(), )*
                    $( $many: node.$many.clone(), )*
                    $( $choice: node.$choice.clone().map(Into::into), )*
                }
            }
        }
    };
}

/// One closed enum per distinct choice set.
macro_rules! choice_type {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident($ty:ty) ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant($ty), )+
        }

        impl $name {
            pub fn type_name(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => <$ty as $crate::node::NodeType>::TYPE_NAME, )+
                }
            }

            pub fn as_node(&self) -> $crate::node::Node<'_> {
                self.into()
            }
        }

        impl $crate::builder::ChoiceType for $name {
            const ALLOWED: &'static [&'static str] =
                &[$( <$ty as $crate::node::NodeType>::TYPE_NAME ),+];
        }

        impl From<$name> for $crate::element::Element {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant(inner) => $crate::element::Element::$variant(inner), )+
                }
            }
        }

        impl TryFrom<$crate::element::Element> for $name {
            type Error = $crate::element::Element;

            fn try_from(
                element: $crate::element::Element,
            ) -> ::std::result::Result<Self, $crate::element::Element> {
                match element {
                    $( $crate::element::Element::$variant(inner) => Ok($name::$variant(inner)), )+
                    other => Err(other),
                }
            }
        }

        impl<'a> From<&'a $name> for $crate::node::Node<'a> {
            fn from(value: &'a $name) -> Self {
                match value {
                    $( $name::$variant(inner) => inner.into(), )+
                }
            }
        }

        impl $crate::builder::IntoChoice<$name> for $name {
            fn into_choice(self) -> Option<$crate::element::Element> {
                Some(self.into())
            }
        }

        impl $crate::builder::IntoChoice<$name> for Option<$name> {
            fn into_choice(self) -> Option<$crate::element::Element> {
                self.map(Into::into)
            }
        }

        $(
            impl $crate::builder::IntoChoice<$name> for $ty {
                fn into_choice(self) -> Option<$crate::element::Element> {
                    Some($crate::element::Element::$variant(self))
                }
            }

            impl From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    $name::$variant(value)
                }
            }
        )+
    };
}
