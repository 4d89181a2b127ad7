//! Error and status types.
//!
//! Every fallible operation returns [`Result`]. Host bindings that cannot
//! carry a Rust error across the boundary convert it to a [`Status`] record,
//! whose default value means success.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("not a child: {0}")]
    NotAChild(String),

    #[error("not a descendant: {0}")]
    NotADescendant(String),

    #[error("node has no parent: {0}")]
    NoParent(String),

    #[error("child already has a parent: {0}")]
    AlreadyHasParent(String),

    #[error("insertion would create a cycle: {0}")]
    CycleDetected(String),

    #[error("node is not a composition: {0}")]
    NotAComposition(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("cannot compute available range: {0}")]
    CannotComputeAvailableRange(String),

    #[error("wrong type for {key}: expected {expected}, found {found}")]
    WrongType { key: String, expected: &'static str, found: &'static str },

    #[error("unresolvable schema: {0}")]
    UnresolvableSchema(String),

    #[error("serialized field type mismatch: {0}")]
    SerializationTypeMismatch(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("illegal index {index} (len {len})")]
    IllegalIndex { index: i64, len: usize },

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("invalid rate: {0}")]
    InvalidRate(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NotAChild(_) => ErrorCode::NotAChild,
            Error::NotADescendant(_) => ErrorCode::NotADescendant,
            Error::NoParent(_) => ErrorCode::NoParent,
            Error::AlreadyHasParent(_) => ErrorCode::AlreadyHasParent,
            Error::CycleDetected(_) => ErrorCode::CycleDetected,
            Error::NotAComposition(_) => ErrorCode::NotAComposition,
            Error::NodeNotFound(_) => ErrorCode::NodeNotFound,
            Error::CannotComputeAvailableRange(_) => ErrorCode::CannotComputeAvailableRange,
            Error::WrongType { .. } => ErrorCode::WrongType,
            Error::UnresolvableSchema(_) => ErrorCode::UnresolvableSchema,
            Error::SerializationTypeMismatch(_) => ErrorCode::SerializationTypeMismatch,
            Error::MissingField(_) => ErrorCode::MissingField,
            Error::IllegalIndex { .. } => ErrorCode::IllegalIndex,
            Error::InvalidTimeRange(_) => ErrorCode::InvalidTimeRange,
            Error::InvalidRate(_) => ErrorCode::InvalidRate,
            Error::Json(_) => ErrorCode::Json,
        }
    }
}

/// Outcome code carried by [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCode {
    #[default]
    Ok,
    NotAChild,
    NotADescendant,
    NoParent,
    AlreadyHasParent,
    CycleDetected,
    NotAComposition,
    NodeNotFound,
    CannotComputeAvailableRange,
    WrongType,
    UnresolvableSchema,
    SerializationTypeMismatch,
    MissingField,
    IllegalIndex,
    InvalidTimeRange,
    InvalidRate,
    Json,
}

/// `{ code, details }` status record for the host-binding boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub code: ErrorCode,
    pub details: String,
}

impl Status {
    pub fn is_ok(&self) -> bool {
        self.code == ErrorCode::Ok
    }

    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::default(),
            Err(e) => Self::from(e),
        }
    }

    /// Back to a `Result`; the error variant is rebuilt from the code.
    pub fn into_result(self) -> Result<()> {
        let d = self.details;
        match self.code {
            ErrorCode::Ok => Ok(()),
            ErrorCode::NotAChild => Err(Error::NotAChild(d)),
            ErrorCode::NotADescendant => Err(Error::NotADescendant(d)),
            ErrorCode::NoParent => Err(Error::NoParent(d)),
            ErrorCode::AlreadyHasParent => Err(Error::AlreadyHasParent(d)),
            ErrorCode::CycleDetected => Err(Error::CycleDetected(d)),
            ErrorCode::NotAComposition => Err(Error::NotAComposition(d)),
            ErrorCode::NodeNotFound => Err(Error::NodeNotFound(d)),
            ErrorCode::CannotComputeAvailableRange => Err(Error::CannotComputeAvailableRange(d)),
            ErrorCode::UnresolvableSchema => Err(Error::UnresolvableSchema(d)),
            ErrorCode::SerializationTypeMismatch => Err(Error::SerializationTypeMismatch(d)),
            ErrorCode::MissingField => Err(Error::MissingField(d)),
            ErrorCode::InvalidTimeRange => Err(Error::InvalidTimeRange(d)),
            ErrorCode::InvalidRate => Err(Error::InvalidRate(d)),
            ErrorCode::Json => Err(Error::Json(d)),
            // Structured variants lose their fields on the way through a status.
            ErrorCode::WrongType => Err(Error::WrongType { key: d, expected: "?", found: "?" }),
            ErrorCode::IllegalIndex => Err(Error::IllegalIndex { index: -1, len: 0 }),
        }
    }
}

impl From<&Error> for Status {
    fn from(e: &Error) -> Self {
        Self { code: e.code(), details: e.to_string() }
    }
}
