//! Error types for the conversion engine.

use crate::path::PathError;

/// Errors raised while converting between trees, flat mappings and records.
///
/// All of these are reported synchronously to the immediate caller; nothing is
/// retried or swallowed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path validation error.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// The destination cannot be bound into, e.g. an unallocated nested record.
    #[error("invalid target at '{path}': {message}")]
    InvalidTarget { path: String, message: String },

    /// A path position is used both as a leaf and as a container.
    #[error("type conflict at '{path}': {message}")]
    TypeConflict { path: String, message: String },

    /// A value cannot be cast to the declared type of a field.
    #[error("type mismatch for field '{field}': cannot cast {found} to {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// A value or field shape outside the supported set.
    #[error("unsupported type at '{path}': {message}")]
    UnsupportedType { path: String, message: String },

    /// Serializing a Rust value into a tree failed.
    #[error("encode error: {message}")]
    Encode { message: String },
}

impl Error {
    pub fn type_conflict(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::TypeConflict {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::UnsupportedType {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_target(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidTarget {
            path: path.into(),
            message: message.into(),
        }
    }
}
