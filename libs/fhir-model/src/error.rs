//! Error types for the object model

use ferrum_validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A builder produced a node that breaks one or more blocking rules.
    #[error(transparent)]
    IllegalState(#[from] ValidationError),

    #[error("Unknown code '{code}' for {type_name}")]
    UnknownCode {
        type_name: &'static str,
        code: String,
    },

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),
}

impl Error {
    /// The validation error behind a rejected build, if this is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Error::IllegalState(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
