//! Core traits for the key-value collaborator.

use bytes::Bytes;

use crate::KvError;

/// One entry of a key-value store: a `/`-separated key and its raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KvPair {
    pub key: String,
    pub value: Bytes,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        KvPair {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// List entries by key prefix.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn KvReader>`.
pub trait KvReader: Send + Sync {
    /// List every pair whose key starts with `prefix`.
    ///
    /// Matching is a plain string prefix, the way hierarchical stores such as
    /// Consul do it: `"test"` also matches `"test2/key"`. Callers that need
    /// path semantics filter further. An empty result is not an error.
    fn list(&mut self, prefix: &str) -> Result<Vec<KvPair>, KvError>;
}

/// Write entries one at a time.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn KvWriter>`.
pub trait KvWriter: Send + Sync {
    /// Store `pair`, replacing any value already under its key.
    fn put(&mut self, pair: KvPair) -> Result<(), KvError>;

    /// Delete every pair whose key starts with `prefix`.
    ///
    /// Stores without recursive delete keep the default, which reports
    /// `NotSupported`.
    fn delete_tree(&mut self, _prefix: &str) -> Result<(), KvError> {
        Err(KvError::NotSupported)
    }
}

/// Combined list/put.
///
/// Automatically implemented for any type that implements both `KvReader`
/// and `KvWriter`.
pub trait KvStore: KvReader + KvWriter {}
impl<T: KvReader + KvWriter> KvStore for T {}

// Blanket implementations for references and boxes

impl<T: KvReader + ?Sized> KvReader for &mut T {
    fn list(&mut self, prefix: &str) -> Result<Vec<KvPair>, KvError> {
        (*self).list(prefix)
    }
}

impl<T: KvWriter + ?Sized> KvWriter for &mut T {
    fn put(&mut self, pair: KvPair) -> Result<(), KvError> {
        (*self).put(pair)
    }

    fn delete_tree(&mut self, prefix: &str) -> Result<(), KvError> {
        (*self).delete_tree(prefix)
    }
}

impl<T: KvReader + ?Sized> KvReader for Box<T> {
    fn list(&mut self, prefix: &str) -> Result<Vec<KvPair>, KvError> {
        self.as_mut().list(prefix)
    }
}

impl<T: KvWriter + ?Sized> KvWriter for Box<T> {
    fn put(&mut self, pair: KvPair) -> Result<(), KvError> {
        self.as_mut().put(pair)
    }

    fn delete_tree(&mut self, prefix: &str) -> Result<(), KvError> {
        self.as_mut().delete_tree(prefix)
    }
}
