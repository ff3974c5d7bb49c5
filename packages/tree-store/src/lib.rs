//! Store adapter for structkv.
//!
//! `TreeStore` puts nested trees and records into a flat key-value store as
//! one string value per slash-joined key, and reads them back:
//!
//! ```text
//! {"key1": "val1", "key3": [1, 2], "key4": {"key41": "val41"}}
//!
//! test/key1        = "val1"
//! test/key3/0      = "1"
//! test/key3/1      = "2"
//! test/key4/key41  = "val41"
//! ```
//!
//! Any store implementing [`KvStore`](structkv_kv_store::KvStore) works;
//! [`InMemoryKv`](structkv_kv_store::InMemoryKv) is the in-process one.

mod error;
mod tree_store;

pub use error::Error;
pub use tree_store::{to_pairs, TreeStore};
