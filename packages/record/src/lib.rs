//! Binding native structs to structkv trees and flat mappings.
//!
//! - `Record`: a struct's fields as a closed list of typed accessors
//! - `impl_record!`: implements `Record` from a field listing
//! - `to_tree` / `to_flat`: record to tree or flat mapping
//! - `bind_from_flat` / `bind_from_tree`: fill an existing record, casting
//!   store strings to the declared field types
//!
//! The binder never allocates nested records. A nullable child
//! (`Option<Box<R>>`) must be `Some` before binding if data exists under it.
//!
//! # Example
//!
//! ```rust
//! use structkv_core::{path, FlatMap, Value};
//! use structkv_record::{bind_from_flat, impl_record};
//!
//! #[derive(Default)]
//! struct Limits {
//!     max_conns: i64,
//!     strict: bool,
//! }
//! impl_record!(Limits { field max_conns as "MaxConns", field strict as "Strict" });
//!
//! let mut flat = FlatMap::new();
//! flat.insert("app/limits/MaxConns".to_string(), Value::from("64"));
//! flat.insert("app/limits/Strict".to_string(), Value::from("true"));
//!
//! let mut limits = Limits::default();
//! bind_from_flat(&flat, &path!("app/limits"), &mut limits).unwrap();
//! assert_eq!(limits.max_conns, 64);
//! assert!(limits.strict);
//! ```

mod binder;
mod record;

pub use binder::{bind_from_flat, bind_from_tree, to_flat, to_tree};
pub use record::{
    Embedding, Field, FieldEntry, FieldEntryMut, FieldKind, FieldMut, FieldRef, Record,
};
