use std::fmt::{Display, Formatter};
use std::result;

use thiserror::Error;

/// Source position an error is attributed to, supplied by the ambient context.
#[derive(Debug, Clone, PartialEq, Eq, Default, derive_more::Display)]
#[display("{module} ({filename}:{lineno}:{col})")]
pub struct Location {
    pub module: String,
    pub filename: String,
    pub lineno: u32,
    pub col: u32,
}

/// Payload of every error raised through a [`crate::CallerContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    pub message: String,
    pub location: Location,
}

impl Display for Raised {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorKind {
    #[display("TypeError")]
    Type,
    #[display("IndexError")]
    Index,
    #[display("ValueError")]
    Value,
    #[display("AttributeError")]
    Attribute,
    #[display("MutationRejected")]
    MutationRejected,
    #[display("Unsupported")]
    Unsupported,
    #[display("ResourceLimit")]
    ResourceLimit,
    #[display("MaterializationFailure")]
    Materialization,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("TypeError: {0}")]
    Type(Raised),
    #[error("IndexError: {0}")]
    Index(Raised),
    #[error("ValueError: {0}")]
    Value(Raised),
    #[error("AttributeError: {0}")]
    Attribute(Raised),
    #[error("mutation rejected: {0}")]
    MutationRejected(Raised),
    #[error("unsupported: {0}")]
    Unsupported(Raised),
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(Raised),
    #[error("cannot materialize {type_name}: {source}")]
    Materialization {
        type_name: String,
        #[source]
        source: eyre::Report,
    },
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn materialization(type_name: impl Into<String>, source: eyre::Report) -> Self {
        Error::Materialization {
            type_name: type_name.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Type(_) => ErrorKind::Type,
            Error::Index(_) => ErrorKind::Index,
            Error::Value(_) => ErrorKind::Value,
            Error::Attribute(_) => ErrorKind::Attribute,
            Error::MutationRejected(_) => ErrorKind::MutationRejected,
            Error::Unsupported(_) => ErrorKind::Unsupported,
            Error::ResourceLimit(_) => ErrorKind::ResourceLimit,
            Error::Materialization { .. } => ErrorKind::Materialization,
        }
    }

    /// The raised payload, absent for materialization failures.
    pub fn raised_payload(&self) -> Option<&Raised> {
        match self {
            Error::Type(r)
            | Error::Index(r)
            | Error::Value(r)
            | Error::Attribute(r)
            | Error::MutationRejected(r)
            | Error::Unsupported(r)
            | Error::ResourceLimit(r) => Some(r),
            Error::Materialization { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self.raised_payload() {
            Some(raised) => raised.message.clone(),
            None => self.to_string(),
        }
    }
}
