//! Flattening nested trees into path-keyed mappings, and back.
//!
//! `flatten` is straightforward recursion. `unflatten` has to recover nesting
//! and array order from nothing but sorted string keys; see its docs for the
//! slice-detection rule and where it falls short.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::path::join_key;
use crate::{slice, Array, Error, FlatMap, Path, Tree, Value};

/// Flatten a nested tree into one entry per leaf and per array element.
///
/// Keys are `prefix/k1/k2/...`; arrays explode into `.../name/0`, `.../name/1`.
/// Intermediate maps produce no entry of their own, so empty maps vanish.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use structkv_core::{flatten, path, Tree, Value};
///
/// let mut key4 = Tree::new();
/// key4.insert("key41".to_string(), Value::from("val41"));
///
/// let mut tree = Tree::new();
/// tree.insert("key1".to_string(), Value::from("val1"));
/// tree.insert("key3".to_string(), Value::from(vec![1, 2]));
/// tree.insert("key4".to_string(), Value::Map(key4));
///
/// let flat = flatten(&tree, &path!("test"));
/// assert_eq!(flat["test/key1"], Value::from("val1"));
/// assert_eq!(flat["test/key3/1"], Value::from(2));
/// assert_eq!(flat["test/key4/key41"], Value::from("val41"));
/// ```
pub fn flatten(tree: &Tree, prefix: &Path) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_into(tree, &prefix.to_string(), &mut out);
    out
}

fn flatten_into(tree: &Tree, base: &str, out: &mut FlatMap) {
    for (key, value) in tree {
        let path = join_key(base, key);
        match value {
            Value::Map(child) => flatten_into(child, &path, out),
            Value::Array(array) => slice::encode_into(&path, array, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

/// Flatten nested maps only, keeping arrays whole.
///
/// Suited to round-trips inside one process, where nothing forces values
/// down to strings: arrays stay single array-valued entries and an empty
/// nested map is kept as an explicit empty-map entry instead of vanishing.
pub fn flatten_to_map(tree: &Tree, prefix: &Path) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_to_map_into(tree, &prefix.to_string(), &mut out);
    out
}

fn flatten_to_map_into(tree: &Tree, base: &str, out: &mut FlatMap) {
    for (key, value) in tree {
        let path = join_key(base, key);
        match value {
            Value::Map(child) if !child.is_empty() => flatten_to_map_into(child, &path, out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

/// Rebuild a nested tree from the entries of `flat` under `prefix`.
///
/// Keys are visited in sorted order. Keys outside `prefix` are ignored and
/// `prefix` is stripped from the rest. Scalars always come back as strings:
/// without a destination record there is no declared type to cast to.
///
/// # Slice detection
///
/// A running counter starts at 1. A key with at least two segments whose last
/// segment is the decimal index the counter holds starts an array named by
/// the segment before it. Following keys with the same parent and an index
/// segment join that array at their own index, so `k/10` sorting before `k/2`
/// does not matter; each advances the counter. Any scalar key resets the
/// counter to 0. Array elements are typed from the values themselves
/// (`Integer` in memory, `String` from a store).
///
/// This is a heuristic, not a schema. When the very first key visited is an
/// array element, index 0 does not match the initial counter and the array
/// comes back as a map keyed `"0"`, `"1"`, …; the same happens to an array
/// that directly follows another one. A map with a child literally named
/// `"0"` after a scalar sibling comes back as an array. Binding into a record
/// avoids all of these by reading declared array fields by index.
///
/// # Folder keys
///
/// Stores such as Consul keep directory markers: keys ending in `/` with an
/// empty value. Such a key creates the maps along its path (so an empty
/// folder reads back as an empty map) and resets the counter like a scalar,
/// but stores nothing. Keys are split on `/` exactly as stored and never
/// validated as [`Path`]s.
///
/// # Errors
///
/// - `TypeConflict` when a key passes through a position already holding a
///   leaf or array, an array misses an index, or its elements differ in type.
/// - `UnsupportedType` when a value in `flat` is itself an array or a map.
pub fn unflatten(flat: &FlatMap, prefix: &Path) -> Result<Tree, Error> {
    let mut out = Tree::new();
    let mut expected_index: usize = 1;
    let mut pending: Option<PendingSlice<'_>> = None;

    // FlatMap is a BTreeMap: iteration is already in sorted key order.
    for (key, value) in flat {
        // Store keys are taken as they come: split, never validated.
        let segments: Vec<&str> = key.split('/').collect();
        let Some(relative) = strip_components(&segments, prefix) else {
            continue;
        };
        let Some((&last, parents)) = relative.split_last() else {
            continue;
        };
        if last.is_empty() {
            // Folder key: its maps exist, but it holds no value.
            if let Some(slice) = pending.take() {
                slice.write(&mut out)?;
            }
            expected_index = 0;
            walk(&mut out, parents, key)?;
            continue;
        }
        let index = slice_index(last);

        if let (Some(slice), Some(index)) = (pending.as_mut(), index) {
            if slice.parents == parents {
                slice.elements.insert(index, (key.as_str(), value));
                expected_index += 1;
                continue;
            }
        }

        if let Some(slice) = pending.take() {
            slice.write(&mut out)?;
        }

        match index {
            Some(index) if !parents.is_empty() && index == expected_index => {
                pending = Some(PendingSlice::start(parents, index, key, value));
                expected_index += 1;
            }
            _ => {
                expected_index = 0;
                let node = walk(&mut out, parents, key)?;
                assign_scalar(node, last, value, key)?;
            }
        }
    }

    if let Some(slice) = pending {
        slice.write(&mut out)?;
    }

    Ok(out)
}

/// The segments of a key left after `prefix`, or `None` when the key lies outside it.
fn strip_components<'k>(segments: &'k [&'k str], prefix: &Path) -> Option<&'k [&'k str]> {
    if segments.len() < prefix.components.len() {
        return None;
    }
    let (head, rest) = segments.split_at(prefix.components.len());
    head.iter()
        .zip(&prefix.components)
        .all(|(segment, component)| *segment == component.as_str())
        .then_some(rest)
}

/// The index named by a canonical decimal segment (`"7"`, not `"07"`).
fn slice_index(segment: &str) -> Option<usize> {
    let index: usize = segment.parse().ok()?;
    (index.to_string() == segment).then_some(index)
}

/// Elements of the array being collected, keyed by their index.
struct PendingSlice<'a> {
    /// Container path plus the array's own name.
    parents: Vec<String>,
    elements: BTreeMap<usize, (&'a str, &'a Value)>,
}

impl<'a> PendingSlice<'a> {
    fn start(parents: &[&str], index: usize, key: &'a str, value: &'a Value) -> Self {
        let mut elements = BTreeMap::new();
        elements.insert(index, (key, value));
        PendingSlice {
            parents: parents.iter().map(|s| s.to_string()).collect(),
            elements,
        }
    }

    fn write(self, out: &mut Tree) -> Result<(), Error> {
        let Some((name, container)) = self.parents.split_last() else {
            return Ok(());
        };

        let mut array: Option<Array> = None;
        let mut first_key = "";
        for (position, (index, (key, value))) in self.elements.iter().enumerate() {
            if *index != position {
                return Err(Error::type_conflict(
                    *key,
                    format!("array '{}' has no element at index {}", name, position),
                ));
            }
            match array.as_mut() {
                Some(array) => slice::push(array, value, key)?,
                None => {
                    first_key = *key;
                    array = Some(slice::start(value, key)?);
                }
            }
        }
        let Some(array) = array else {
            return Ok(());
        };

        let node = walk(out, container, first_key)?;
        match node.entry(name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(Value::Array(array));
                Ok(())
            }
            // A folder key for the array itself left an empty map behind.
            Entry::Occupied(mut entry) if matches!(entry.get(), Value::Map(map) if map.is_empty()) => {
                entry.insert(Value::Array(array));
                Ok(())
            }
            Entry::Occupied(entry) => Err(Error::type_conflict(
                first_key,
                format!(
                    "'{}' is both a {} and an array",
                    name,
                    entry.get().kind_name()
                ),
            )),
        }
    }
}

/// Descend through `segments`, creating empty maps where nothing exists yet.
fn walk<'a, S: AsRef<str>>(
    mut node: &'a mut Tree,
    segments: &[S],
    key: &str,
) -> Result<&'a mut Tree, Error> {
    for segment in segments {
        let segment = segment.as_ref();
        let child = node.entry(segment.to_string()).or_insert_with(Value::map);
        node = match child {
            Value::Map(map) => map,
            other => {
                return Err(Error::type_conflict(
                    key,
                    format!(
                        "'{}' is both a {} value and a directory",
                        segment,
                        other.kind_name()
                    ),
                ))
            }
        };
    }
    Ok(node)
}

fn assign_scalar(node: &mut Tree, name: &str, value: &Value, key: &str) -> Result<(), Error> {
    let scalar = value.to_scalar_string().ok_or_else(|| {
        Error::unsupported(
            key,
            format!("{} value in a flat mapping", value.kind_name()),
        )
    })?;

    match node.entry(name.to_string()) {
        Entry::Occupied(entry) => Err(Error::type_conflict(
            key,
            format!(
                "'{}' is both a {} and a data item",
                name,
                entry.get().kind_name()
            ),
        )),
        Entry::Vacant(entry) => {
            entry.insert(Value::String(scalar));
            Ok(())
        }
    }
}
