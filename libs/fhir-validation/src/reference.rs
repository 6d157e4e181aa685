//! Literal reference parsing.
//!
//! Only the shape of a reference is inspected; targets are never resolved.

use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((http|https)://([A-Za-z0-9\-\\\.:%\$]*/)+)?([A-Z][A-Za-z]+)/([A-Za-z0-9\-\.]{1,64})(/_history/([A-Za-z0-9\-\.]{1,64}))?$",
    )
    .expect("reference pattern is valid")
});

const RESOURCE_TYPE_GROUP: usize = 4;
const ID_GROUP: usize = 5;
const VERSION_GROUP: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralReference<'a> {
    /// `#id`, or `#` for a reference back to the container.
    Local(&'a str),
    /// A reference carrying a URI scheme (`urn:uuid:..`, `https://..`).
    Absolute {
        url: &'a str,
        resource_type: Option<&'a str>,
    },
    /// `Type?search-params`
    Conditional { resource_type: &'a str, query: &'a str },
    /// `Type/id` or `Type/id/_history/vid`
    Relative {
        resource_type: &'a str,
        id: &'a str,
        version: Option<&'a str>,
    },
    /// Anything else, e.g. `Patient` or `not a reference`.
    Unparsed(&'a str),
}

impl<'a> LiteralReference<'a> {
    pub fn parse(value: &'a str) -> Self {
        if let Some(fragment) = value.strip_prefix('#') {
            return Self::Local(fragment);
        }
        if has_scheme(value) {
            let resource_type = REFERENCE_PATTERN
                .captures(value)
                .and_then(|c| c.get(RESOURCE_TYPE_GROUP))
                .map(|m| m.as_str());
            return Self::Absolute {
                url: value,
                resource_type,
            };
        }
        if let Some((resource_type, query)) = value.split_once('?') {
            return Self::Conditional {
                resource_type,
                query,
            };
        }
        match REFERENCE_PATTERN.captures(value) {
            Some(captures) => match (captures.get(RESOURCE_TYPE_GROUP), captures.get(ID_GROUP)) {
                (Some(resource_type), Some(id)) => Self::Relative {
                    resource_type: resource_type.as_str(),
                    id: id.as_str(),
                    version: captures.get(VERSION_GROUP).map(|m| m.as_str()),
                },
                _ => Self::Unparsed(value),
            },
            None => Self::Unparsed(value),
        }
    }

    /// The resource type a type-whitelist check is applied to.
    ///
    /// Local and absolute references are never inspected; `None` for
    /// [`LiteralReference::Unparsed`] means the reference is malformed.
    pub fn checked_type(&self) -> Option<&'a str> {
        match *self {
            Self::Conditional { resource_type, .. } | Self::Relative { resource_type, .. } => {
                Some(resource_type)
            }
            Self::Local(_) | Self::Absolute { .. } | Self::Unparsed(_) => None,
        }
    }

    pub fn is_inspected(&self) -> bool {
        !matches!(self, Self::Local(_) | Self::Absolute { .. })
    }
}

/// A prefix followed by `:` and a non-empty remainder.
pub fn has_scheme(value: &str) -> bool {
    match value.find(':') {
        Some(index) => index > 0 && value.len() > index + 1,
        None => false,
    }
}
