use crate::value::ValueError;
use thiserror::Error;

/// Failures surfaced by catalog construction and accessor calls.
///
/// Every variant is local to the call that produced it; nothing here is
/// retried or cached.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("instance is not a {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("cyclic type graph at '{path}': {type_name} is already being expanded")]
    CyclicTypeGraph {
        path: String,
        type_name: &'static str,
    },

    #[error("property path '{path}' exceeds the depth limit of {limit}")]
    DepthLimitExceeded { path: String, limit: usize },

    #[error("property {declaring_type}.{property} has no setter")]
    MissingSetter {
        declaring_type: &'static str,
        property: String,
    },

    #[error("property {declaring_type}.{property} of type {property_type} cannot be set from a property value")]
    UnsupportedSetter {
        declaring_type: &'static str,
        property: String,
        property_type: &'static str,
    },

    #[error("cannot set '{path}': '{empty}' is empty")]
    EmptyIntermediate { path: String, empty: String },

    #[error("{type_name} has no accessor named '{name}'")]
    UnknownAccessor {
        type_name: &'static str,
        name: String,
    },

    #[error("cannot serialize '{path}': {message}")]
    Serialize { path: String, message: String },

    #[error("invalid value for '{path}': {source}")]
    Value {
        path: String,
        #[source]
        source: ValueError,
    },
}

impl Error {
    pub(crate) fn type_mismatch<T: ?Sized>() -> Self {
        Error::TypeMismatch {
            expected: std::any::type_name::<T>(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
