//! Putting and getting nested trees and records against a key-value store.

use bytes::Bytes;
use log::{debug, trace};
use serde::Serialize;
use structkv_core::{flatten, unflatten, FlatMap, Path, Tree, Value};
use structkv_kv_store::{KvPair, KvStore};
use structkv_record::{bind_from_flat, to_tree, Record};

use crate::Error;

/// Render a tree as the pairs a key-value store holds, in key order.
///
/// Every value becomes its string form: `2` is stored as `"2"`, `true` as
/// `"true"`.
pub fn to_pairs(tree: &Tree, prefix: &Path) -> Result<Vec<KvPair>, Error> {
    let flat = flatten(tree, prefix);
    let mut pairs = Vec::with_capacity(flat.len());
    for (key, value) in flat {
        let Some(text) = value.to_scalar_string() else {
            return Err(structkv_core::Error::unsupported(
                key,
                format!("{} value in a flat mapping", value.kind_name()),
            )
            .into());
        };
        pairs.push(KvPair::new(key, text));
    }
    Ok(pairs)
}

/// A tree and record view over a flat key-value store.
///
/// Every path given to a method is taken relative to the adapter's root.
/// Writes are one `put` per key in key order with no transaction: if the
/// store fails midway the error is returned and the keys already written
/// stay written.
///
/// # Example
///
/// ```rust
/// use structkv_core::{path, Tree, Value};
/// use structkv_kv_store::InMemoryKv;
/// use structkv_tree_store::TreeStore;
///
/// let mut store = TreeStore::new(InMemoryKv::new()).with_root(path!("service"));
///
/// let mut tree = Tree::new();
/// tree.insert("host".to_string(), Value::from("web1"));
/// tree.insert("ports".to_string(), Value::from(vec![80, 443]));
/// store.put_tree(&path!("web"), &tree).unwrap();
///
/// assert_eq!(store.store().get("service/web/ports/1").unwrap(), "443");
///
/// // Everything comes back as strings
/// let back = store.get_tree(&path!("web")).unwrap();
/// assert_eq!(back["ports"], Value::from(vec!["80", "443"]));
/// ```
pub struct TreeStore<S> {
    store: S,
    root: Path,
}

impl<S: KvStore> TreeStore<S> {
    /// Create an adapter over `store`, rooted at the top of its key space.
    pub fn new(store: S) -> Self {
        Self {
            store,
            root: Path::root(),
        }
    }

    /// Root every path under `root`.
    #[must_use]
    pub fn with_root(mut self, root: Path) -> Self {
        self.root = root;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn resolve(&self, path: &Path) -> Path {
        self.root.join(path)
    }

    /// Write `tree` under `path`, one key per leaf and array element.
    ///
    /// Returns the number of keys written.
    pub fn put_tree(&mut self, path: &Path, tree: &Tree) -> Result<usize, Error> {
        let pairs = to_pairs(tree, &self.resolve(path))?;
        self.put_pairs(pairs)
    }

    /// Write the fields of `record` under `path`.
    ///
    /// Unallocated pointer fields and empty arrays write nothing.
    pub fn put_record(&mut self, path: &Path, record: &dyn Record) -> Result<usize, Error> {
        let tree = to_tree(record)?;
        self.put_tree(path, &tree)
    }

    /// Write any serializable value that serializes to a map.
    pub fn put_serialized<T: Serialize>(&mut self, path: &Path, data: &T) -> Result<usize, Error> {
        let tree = structkv_core::to_tree(data)?;
        self.put_tree(path, &tree)
    }

    fn put_pairs(&mut self, pairs: Vec<KvPair>) -> Result<usize, Error> {
        let count = pairs.len();
        for pair in pairs {
            debug!("Writing {}...", pair.key);
            self.store.put(pair)?;
        }
        trace!("wrote {} keys", count);
        Ok(count)
    }

    /// Every pair under `path`, as a flat mapping of string values.
    ///
    /// Keys sharing only a string prefix with `path` (`test2/...` for
    /// `test`) are left out.
    pub fn get_flat(&mut self, path: &Path) -> Result<FlatMap, Error> {
        let prefix = self.resolve(path).to_string();
        debug!("Listing {}...", prefix);
        let pairs = self.store.list(&prefix)?;
        trace!("listed {} pairs under '{}'", pairs.len(), prefix);

        let mut flat = FlatMap::new();
        for pair in pairs {
            if !is_under(&pair.key, &prefix) {
                continue;
            }
            let text = decode_text(&pair.key, &pair.value)?;
            flat.insert(pair.key, Value::String(text));
        }
        Ok(flat)
    }

    /// Read the nested tree under `path`.
    ///
    /// Scalars come back as strings and arrays as string arrays; see
    /// [`unflatten`] for how arrays are recognized.
    pub fn get_tree(&mut self, path: &Path) -> Result<Tree, Error> {
        let full = self.resolve(path);
        let flat = self.get_flat(path)?;
        Ok(unflatten(&flat, &full)?)
    }

    /// Fill `record` from the pairs under `path`, casting to field types.
    ///
    /// On error `record` is unchanged.
    pub fn get_record(&mut self, path: &Path, record: &mut dyn Record) -> Result<(), Error> {
        let full = self.resolve(path);
        let flat = self.get_flat(path)?;
        bind_from_flat(&flat, &full, record)?;
        Ok(())
    }

    /// Delete every key under `path`.
    ///
    /// A folder key stored at exactly `path` is kept; deleting the root
    /// clears the whole store.
    pub fn delete(&mut self, path: &Path) -> Result<(), Error> {
        let full = self.resolve(path);
        let prefix = if full.is_empty() {
            String::new()
        } else {
            format!("{}/", full)
        };
        debug!("Deleting {}...", prefix);
        self.store.delete_tree(&prefix)?;
        Ok(())
    }
}

fn is_under(key: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || key
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn decode_text(key: &str, value: &Bytes) -> Result<String, Error> {
    std::str::from_utf8(value)
        .map(str::to_string)
        .map_err(|_| Error::InvalidUtf8 {
            key: key.to_string(),
        })
}
