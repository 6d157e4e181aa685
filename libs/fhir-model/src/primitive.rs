//! Primitive datatypes
//!
//! A primitive is an element carrying an optional host value next to its
//! `id` and extensions. All of them share [`Primitive`]; the kind parameter
//! fixes the host type, the FHIR type name and the lexical check.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use ferrum_validation::primitives::{
    check_base64, check_code, check_date, check_date_time, check_id, check_instant, check_min,
    check_string, check_time, check_uri, check_xhtml, ValueResult,
};
use ferrum_validation::{ValidationConfig, ValidationContext, ValidationRun};

use crate::base::{ElementBase, Identified};
use crate::builder::IntoElement;
use crate::datatypes::{has_data_absent_reason, Extension};
use crate::error::Result;
use crate::node::{structural_hash, FieldSink, Node, NodeType};
use crate::visitor::{walk, Visitor};

/// Fixes the host value and lexical rules of a [`Primitive`].
pub trait PrimitiveKind: 'static {
    type Value: Clone + fmt::Debug + Eq + Hash + Send + Sync;

    const NAME: &'static str;

    fn check(_value: &Self::Value, _config: &ValidationConfig) -> ValueResult {
        Ok(())
    }

    fn node(primitive: &Primitive<Self>) -> Node<'_>
    where
        Self: Sized;
}

pub struct Primitive<K: PrimitiveKind> {
    hash: u64,
    base: ElementBase,
    value: Option<K::Value>,
    kind: PhantomData<fn() -> K>,
}

impl<K: PrimitiveKind> Primitive<K> {
    /// Wraps a host value. Lexical checks run when the primitive is built
    /// explicitly or when the node holding it is built.
    pub fn of(value: impl Into<K::Value>) -> Self {
        Self::assemble(ElementBase::default(), Some(value.into()))
    }

    pub fn builder() -> PrimitiveBuilder<K> {
        PrimitiveBuilder::default()
    }

    pub fn to_builder(&self) -> PrimitiveBuilder<K> {
        PrimitiveBuilder::from(self)
    }

    pub fn value(&self) -> Option<&K::Value> {
        self.value.as_ref()
    }

    pub fn as_node(&self) -> Node<'_> {
        K::node(self)
    }

    pub fn has_children(&self) -> bool {
        self.as_node().has_children()
    }

    pub fn accept<'a, V: Visitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        walk(K::NAME, None, self.as_node(), visitor);
    }

    /// No value and nothing but a data-absent-reason extension.
    pub fn has_only_data_absent_reason(&self) -> bool {
        self.value.is_none() && has_data_absent_reason(&self.base.extension)
    }

    fn assemble(base: ElementBase, value: Option<K::Value>) -> Self {
        let mut primitive = Self {
            hash: 0,
            base,
            value,
            kind: PhantomData,
        };
        primitive.hash = structural_hash(&primitive);
        primitive
    }
}

impl<K: PrimitiveKind<Value = String>> Primitive<K> {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl<K: PrimitiveKind> NodeType for Primitive<K> {
    const TYPE_NAME: &'static str = K::NAME;

    fn fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        self.base.fields(sink);
    }

    fn hash_code(&self) -> u64 {
        self.hash
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn hash_value<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }

    fn check_value(&self, config: &ValidationConfig) -> ValueResult {
        match &self.value {
            Some(value) => K::check(value, config),
            None => Ok(()),
        }
    }
}

impl<K: PrimitiveKind> Identified for Primitive<K> {
    fn id(&self) -> Option<&str> {
        self.base.id.as_deref()
    }

    fn extension(&self) -> &[Extension] {
        &self.base.extension
    }
}

impl<K: PrimitiveKind> Clone for Primitive<K> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash,
            base: self.base.clone(),
            value: self.value.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: PrimitiveKind> PartialEq for Primitive<K> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.value == other.value && self.base == other.base
    }
}

impl<K: PrimitiveKind> Eq for Primitive<K> {}

impl<K: PrimitiveKind> Hash for Primitive<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<K: PrimitiveKind> fmt::Debug for Primitive<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(K::NAME);
        if let Some(id) = &self.base.id {
            out.field("id", id);
        }
        if !self.base.extension.is_empty() {
            out.field("extension", &self.base.extension);
        }
        out.field("value", &self.value).finish()
    }
}

pub struct PrimitiveBuilder<K: PrimitiveKind> {
    base: ElementBase,
    value: Option<K::Value>,
}

impl<K: PrimitiveKind> Default for PrimitiveBuilder<K> {
    fn default() -> Self {
        Self {
            base: ElementBase::default(),
            value: None,
        }
    }
}

impl<K: PrimitiveKind> Clone for PrimitiveBuilder<K> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            value: self.value.clone(),
        }
    }
}

impl<K: PrimitiveKind> fmt::Debug for PrimitiveBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveBuilder")
            .field("type", &K::NAME)
            .field("base", &self.base)
            .field("value", &self.value)
            .finish()
    }
}

impl<K: PrimitiveKind> From<&Primitive<K>> for PrimitiveBuilder<K> {
    fn from(primitive: &Primitive<K>) -> Self {
        Self {
            base: primitive.base.clone(),
            value: primitive.value.clone(),
        }
    }
}

impl<K: PrimitiveKind> PrimitiveBuilder<K> {
    pub fn id(mut self, id: impl IntoElement<String>) -> Self {
        self.base.id = id.into_element();
        self
    }

    pub fn extension<I: IntoIterator<Item = Extension>>(mut self, extension: I) -> Self {
        self.base.extension.extend(extension);
        self
    }

    pub fn set_extension<I: IntoIterator<Item = Extension>>(mut self, extension: I) -> Self {
        self.base.extension = extension.into_iter().collect();
        self
    }

    pub fn value(mut self, value: impl IntoElement<K::Value>) -> Self {
        self.value = value.into_element();
        self
    }

    pub fn build(self) -> Result<Primitive<K>> {
        let context = ValidationContext::global();
        self.build_with(&context)
    }

    pub fn build_with(self, context: &ValidationContext) -> Result<Primitive<K>> {
        let mut run = ValidationRun::new(context, K::NAME);
        let primitive = Primitive::assemble(self.base, self.value);
        if run.is_enabled() {
            let node = primitive.as_node();
            primitive.base.validate(node, &mut run);
            let checked = primitive.check_value(run.config());
            run.check_value("value", checked);
            primitive.base.validate_after(node, &mut run);
        }
        run.finish()?;
        Ok(primitive)
    }
}

macro_rules! primitive_kinds {
    ($(
        $(#[$meta:meta])*
        $alias:ident = $kind:ident ($name:literal, $value:ty) $(=> $check:expr)?;
    )*) => {
        $(
            #[derive(Debug)]
            pub enum $kind {}

            impl PrimitiveKind for $kind {
                type Value = $value;

                const NAME: &'static str = $name;

                fn node(primitive: &Primitive<Self>) -> Node<'_> {
                    Node::from(primitive)
                }

                $(
                    fn check(value: &$value, config: &ValidationConfig) -> ValueResult {
                        let check: fn(&$value, &ValidationConfig) -> ValueResult = $check;
                        check(value, config)
                    }
                )?
            }

            $(#[$meta])*
            pub type $alias = Primitive<$kind>;
        )*
    };
}

primitive_kinds! {
    Boolean = BooleanKind("Boolean", bool);
    Integer = IntegerKind("Integer", i32);
    /// An integer with a value of at least 1.
    PositiveInt = PositiveIntKind("PositiveInt", u32)
        => |v, _| check_min(i64::from(*v), 1);
    UnsignedInt = UnsignedIntKind("UnsignedInt", u32);
    Decimal = DecimalKind("Decimal", rust_decimal::Decimal);
    FhirString = StringKind("String", String)
        => |v, config| check_string(v, config.strings.check_control_chars);
    Uri = UriKind("Uri", String) => |v, config| check_uri(v, config.strings.check_control_chars);
    Url = UrlKind("Url", String) => |v, config| check_uri(v, config.strings.check_control_chars);
    Canonical = CanonicalKind("Canonical", String)
        => |v, config| check_uri(v, config.strings.check_control_chars);
    Code = CodeKind("Code", String) => |v, config| check_code(v, config.strings.check_control_chars);
    FhirId = IdKind("Id", String) => |v, _| check_id(v);
    Markdown = MarkdownKind("Markdown", String)
        => |v, config| check_string(v, config.strings.check_control_chars);
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    Date = DateKind("Date", String) => |v, _| check_date(v);
    DateTime = DateTimeKind("DateTime", String) => |v, _| check_date_time(v);
    Time = TimeKind("Time", String) => |v, _| check_time(v);
    Instant = InstantKind("Instant", String) => |v, _| check_instant(v);
    Base64Binary = Base64BinaryKind("Base64Binary", String) => |v, _| check_base64(v);
    /// Limited XHTML content of a narrative.
    Xhtml = XhtmlKind("Xhtml", String) => |v, _| check_xhtml(v);
}

macro_rules! host_conversions {
    ($host:ty => $($alias:ident),+) => {
        $(
            impl IntoElement<$alias> for $host {
                fn into_element(self) -> Option<$alias> {
                    Some($alias::of(self))
                }
            }
        )+
    };
}

host_conversions!(&str => FhirString, Uri, Url, Canonical, Code, FhirId, Markdown, Date, DateTime, Time, Instant, Base64Binary, Xhtml);
host_conversions!(String => FhirString, Uri, Url, Canonical, Code, FhirId, Markdown, Date, DateTime, Time, Instant, Base64Binary, Xhtml);
host_conversions!(bool => Boolean);
host_conversions!(i32 => Integer);
host_conversions!(u32 => PositiveInt, UnsignedInt);
host_conversions!(rust_decimal::Decimal => Decimal);
