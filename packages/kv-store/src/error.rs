//! Error types for the key-value collaborator.
//!
//! Errors at this level come from the store or its transport. Path and type
//! errors belong to the conversion engine.

/// Errors raised by a key-value store.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// I/O or transport failure talking to the store.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The operation is not supported by this store.
    #[error("operation not supported")]
    NotSupported,

    /// The store answered with an error of its own.
    ///
    /// The code and detail are opaque here; the backend defines them.
    #[error("protocol error: code {code}{}", detail_suffix(.detail))]
    Protocol { code: u32, detail: String },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" - {}", detail)
    }
}

impl KvError {
    /// Wrap any error as a transport failure.
    pub fn transport(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        KvError::Transport(e.into())
    }
}

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::Transport(Box::new(e))
    }
}
