//! Error types for the store adapter.

use structkv_core::PathError;
use structkv_kv_store::KvError;

/// Errors from putting or getting trees and records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Converting between tree, record and flat mapping failed.
    #[error("codec error: {0}")]
    Codec(#[from] structkv_core::Error),

    /// The key-value store failed; passed through unchanged.
    #[error("store error: {0}")]
    Store(#[from] KvError),

    /// A stored value is not UTF-8 text.
    #[error("value under key '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::Codec(e.into())
    }
}
