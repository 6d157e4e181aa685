//! Setter argument conversions shared by every builder

use ferrum_validation::ValidationRun;

use crate::datatypes::Reference;
use crate::element::Element;

/// Argument accepted by a singular setter of type `T`.
///
/// Implemented for `T` itself, for `Option<T>` (so `None` clears the field)
/// and for the host values a primitive wraps, e.g. `&str` for
/// [`FhirString`](crate::FhirString) or `bool` for
/// [`Boolean`](crate::Boolean).
pub trait IntoElement<T> {
    fn into_element(self) -> Option<T>;
}

impl<T> IntoElement<T> for T {
    fn into_element(self) -> Option<T> {
        Some(self)
    }
}

impl<T> IntoElement<T> for Option<T> {
    fn into_element(self) -> Option<T> {
        self
    }
}

impl IntoElement<String> for &str {
    fn into_element(self) -> Option<String> {
        Some(self.to_string())
    }
}

/// `Identifier.assigner` is boxed to break the Reference/Identifier cycle.
impl IntoElement<Box<Reference>> for Reference {
    fn into_element(self) -> Option<Box<Reference>> {
        Some(Box::new(self))
    }
}

/// Argument accepted by the setter of a choice field typed `C`.
///
/// Any member type of the choice, the choice enum itself and `Option` of
/// it convert statically. [`Untyped`] defers the type check to `build()`.
pub trait IntoChoice<C> {
    fn into_choice(self) -> Option<Element>;
}

/// A value of any datatype handed to a choice setter without a static type
/// check. Building fails when the value is outside the declared type set
/// and validation is on; otherwise the value is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Untyped(pub Element);

impl<C> IntoChoice<C> for Untyped {
    fn into_choice(self) -> Option<Element> {
        Some(self.0)
    }
}

/// A closed union of the datatypes a choice field admits.
pub trait ChoiceType: TryFrom<Element, Error = Element> + Into<Element> {
    /// Member type names, in declaration order.
    const ALLOWED: &'static [&'static str];
}

/// Narrows a pending choice value to its declared set, recording the
/// rejection with `run` when it does not fit.
pub(crate) fn choice_value<C: ChoiceType>(
    run: &mut ValidationRun<'_>,
    element: &'static str,
    value: Option<Element>,
) -> Option<C> {
    match C::try_from(value?) {
        Ok(choice) => Some(choice),
        Err(other) => {
            run.reject_choice(element, other.type_name(), C::ALLOWED);
            None
        }
    }
}
