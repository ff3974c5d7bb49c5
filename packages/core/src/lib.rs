//! Core structkv: nested trees, flat path-keyed mappings, and the engine
//! converting between them.
//!
//! - `Path`: validated slash-separated store key
//! - `Value`: leaf, homogeneous array or nested map (the "tree")
//! - `flatten` / `unflatten`: tree to flat mapping and back
//! - `slice`: arrays as positionally-indexed keys
//! - `cast_scalar` / `cast_array`: flat strings back to declared types
//!
//! # Example
//!
//! ```rust
//! use structkv_core::{flatten, unflatten, path, Tree, Value};
//!
//! let mut tree = Tree::new();
//! tree.insert("key1".to_string(), Value::from("val1"));
//! tree.insert("key3".to_string(), Value::from(vec!["a", "b"]));
//!
//! let flat = flatten(&tree, &path!("test"));
//! assert_eq!(flat["test/key3/1"], Value::from("b"));
//!
//! assert_eq!(unflatten(&flat, &path!("test")).unwrap(), tree);
//! ```

mod cast;
pub mod codec;
mod convert;
mod error;
mod path;
pub mod slice;
mod value;

pub use cast::{cast_array, cast_scalar};
pub use codec::{flatten, flatten_to_map, unflatten};
pub use convert::{json_to_value, to_tree};
pub use error::Error;
pub use path::{join_key, Path, PathError, SEPARATOR};
pub use value::{Array, FlatMap, ScalarKind, Tree, Value};
