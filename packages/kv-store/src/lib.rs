//! Key-value store collaborator for structkv.
//!
//! The conversion engine never talks to a server itself. It needs only two
//! things from a hierarchical key-value store: list every pair under a
//! prefix, and put one pair. This crate names that contract:
//!
//! - `KvPair`: a string key and its raw bytes
//! - `KvReader` / `KvWriter` / `KvStore`: the contract, object-safe
//! - `KvError`: transport-level failures
//! - `InMemoryKv`: a sorted in-memory implementation
//!
//! A client for a real backend (Consul, etcd, ...) implements `KvStore` and
//! maps its own failures onto `KvError`.

mod error;
mod in_memory;
mod traits;

pub use bytes::Bytes;
pub use error::KvError;
pub use in_memory::InMemoryKv;
pub use traits::{KvPair, KvReader, KvStore, KvWriter};
