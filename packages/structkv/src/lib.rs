//! structkv: nested trees and native structs as flat slash-keyed pairs.
//!
//! A hierarchical key-value store such as Consul holds one string per key.
//! structkv converts between that shape and the shapes programs work with:
//!
//! - [`tree`]: `Tree`/`Value`, `Path`, `flatten`/`unflatten`, slice keys
//! - [`record`]: the `Record` trait, `impl_record!`, binding into structs
//! - [`kv`]: the key-value store contract and an in-memory store
//! - [`store`]: `TreeStore`, putting and getting trees and records
//!
//! # Example
//!
//! ```rust
//! use structkv::{impl_record, path, InMemoryKv, TreeStore};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Backend {
//!     host: String,
//!     port: i64,
//!     zones: Vec<String>,
//! }
//! impl_record!(Backend {
//!     field host as "Host",
//!     field port as "Port",
//!     field zones as "Zones",
//! });
//!
//! let backend = Backend {
//!     host: "10.0.0.5".to_string(),
//!     port: 8080,
//!     zones: vec!["a".to_string(), "b".to_string()],
//! };
//!
//! let mut store = TreeStore::new(InMemoryKv::new()).with_root(path!("services"));
//! store.put_record(&path!("api"), &backend).unwrap();
//! assert_eq!(store.store().get("services/api/Port").unwrap(), "8080");
//!
//! let mut read = Backend::default();
//! store.get_record(&path!("api"), &mut read).unwrap();
//! assert_eq!(read, backend);
//! ```

pub use structkv_core as tree;
pub use structkv_kv_store as kv;
pub use structkv_record as record;
pub use structkv_tree_store as store;

pub use structkv_core::{
    flatten, flatten_to_map, path, to_tree, unflatten, Array, Error, FlatMap, Path, Tree, Value,
};
pub use structkv_kv_store::{InMemoryKv, KvError, KvPair, KvReader, KvStore, KvWriter};
pub use structkv_record::{bind_from_flat, bind_from_tree, impl_record, to_flat, Record};
pub use structkv_tree_store::TreeStore;
