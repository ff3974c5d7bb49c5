//! In-memory key-value store.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::{KvError, KvPair, KvReader, KvWriter};

/// A key-value store held in a sorted map.
///
/// Listing is by raw string prefix and returns pairs in key order, like a
/// Consul KV list. Useful for tests and for callers that want a flat mapping
/// of bytes without a server.
///
/// # Example
///
/// ```rust
/// use structkv_kv_store::{InMemoryKv, KvPair, KvReader, KvWriter};
///
/// let mut store = InMemoryKv::new();
/// store.put(KvPair::new("test/key1", "val1")).unwrap();
///
/// let pairs = store.list("test").unwrap();
/// assert_eq!(pairs[0].value, "val1");
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryKv {
    data: BTreeMap<String, Bytes>,
}

impl InMemoryKv {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `pairs`.
    pub fn with_pairs(pairs: impl IntoIterator<Item = KvPair>) -> Self {
        Self {
            data: pairs.into_iter().map(|p| (p.key, p.value)).collect(),
        }
    }

    /// The value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&Bytes> {
        self.data.get(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl KvReader for InMemoryKv {
    fn list(&mut self, prefix: &str) -> Result<Vec<KvPair>, KvError> {
        Ok(self
            .data
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KvPair {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }
}

impl KvWriter for InMemoryKv {
    fn put(&mut self, pair: KvPair) -> Result<(), KvError> {
        self.data.insert(pair.key, pair.value);
        Ok(())
    }

    fn delete_tree(&mut self, prefix: &str) -> Result<(), KvError> {
        self.data.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}
