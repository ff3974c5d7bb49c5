//! Binding between records, trees and flat mappings.
//!
//! Reading into a record happens in two phases. The first walks the record's
//! fields read-only, finds a value for each one and casts it to the declared
//! type, producing a typed tree. The second assigns that tree into the
//! record. Every fallible step lives in the first phase, so a failed bind
//! leaves the record as it was.

use std::collections::BTreeMap;

use log::trace;
use structkv_core::{
    cast_array, cast_scalar, flatten, join_key, slice, unflatten, Array, Error, FlatMap, Path,
    ScalarKind, Tree, Value,
};

use crate::record::{FieldEntry, FieldKind, FieldMut, FieldRef, Record};

/// Convert a record into a nested tree.
///
/// Nested and embedded records become sub-maps under their segment.
/// Unallocated pointer fields contribute nothing.
///
/// # Errors
///
/// `TypeConflict` when two fields of one record share a path segment.
pub fn to_tree(record: &dyn Record) -> Result<Tree, Error> {
    to_tree_under(record, "")
}

fn to_tree_under(record: &dyn Record, base: &str) -> Result<Tree, Error> {
    let entries = record.fields();
    check_segments(&entries, base)?;

    let mut tree = Tree::new();
    for entry in entries {
        let value = match entry.field {
            FieldRef::Int(i) => Value::Integer(i),
            FieldRef::Bool(b) => Value::Bool(b),
            FieldRef::String(s) => Value::String(s.to_string()),
            FieldRef::IntArray(items) => Value::Array(Array::Integer(items.to_vec())),
            FieldRef::BoolArray(items) => Value::Array(Array::Bool(items.to_vec())),
            FieldRef::StringArray(items) => Value::Array(Array::String(items.to_vec())),
            FieldRef::Map(map) => Value::Map(map.clone()),
            FieldRef::Record(child) | FieldRef::Pointer(Some(child)) => {
                Value::Map(to_tree_under(child, &join_key(base, entry.segment))?)
            }
            FieldRef::Pointer(None) => continue,
        };
        tree.insert(entry.segment.to_string(), value);
    }
    Ok(tree)
}

/// Convert a record into a flat mapping under `prefix`.
///
/// # Example
///
/// ```rust
/// use structkv_core::{path, Value};
/// use structkv_record::{impl_record, to_flat};
///
/// struct Endpoint {
///     host: String,
///     ports: Vec<i64>,
/// }
/// impl_record!(Endpoint { field host as "Host", field ports as "Ports" });
///
/// let endpoint = Endpoint { host: "db1".to_string(), ports: vec![5432, 5433] };
/// let flat = to_flat(&endpoint, &path!("services/db")).unwrap();
/// assert_eq!(flat["services/db/Host"], Value::from("db1"));
/// assert_eq!(flat["services/db/Ports/1"], Value::from(5433));
/// ```
pub fn to_flat(record: &dyn Record, prefix: &Path) -> Result<FlatMap, Error> {
    Ok(flatten(&to_tree(record)?, prefix))
}

/// Fill `record` from the entries of `flat` under `prefix`.
///
/// Each field is looked up at `prefix/segment`: leaves by exact key, arrays
/// by looking up `segment/0`, `segment/1`, ..., maps by unflattening everything
/// under the segment, nested records recursively. Values are cast to the
/// declared field type, so store strings bind into integer and boolean
/// fields. Fields with nothing under their path keep their current value.
///
/// Arrays and maps stored whole under their key, as
/// [`flatten_to_map`](structkv_core::flatten_to_map) leaves them, are
/// accepted as well.
///
/// # Errors
///
/// - `TypeMismatch` when a value cannot be cast to its field's type
/// - `InvalidTarget` when data exists under an unallocated pointer field
/// - `TypeConflict` when two fields of one record share a path segment
/// - errors from [`unflatten`] for map fields
///
/// On error `record` is unchanged.
pub fn bind_from_flat(flat: &FlatMap, prefix: &Path, record: &mut dyn Record) -> Result<(), Error> {
    let base = prefix.to_string();
    let resolved = resolve_flat(flat, &base, &*record)?;
    assign(record, &resolved, &base)
}

/// Fill `record` from a nested tree.
///
/// Nested records are read from sub-maps under their segment. Leaves and
/// array elements are cast to the declared field types (`"2"` to `2`, string
/// arrays to integer arrays). An array that came back as a map keyed
/// `"0"`, `"1"`, ... is accepted as that array.
///
/// # Errors
///
/// As [`bind_from_flat`]; a non-map value where a map or record is declared
/// is a `TypeMismatch`. On error `record` is unchanged.
pub fn bind_from_tree(tree: &Tree, record: &mut dyn Record) -> Result<(), Error> {
    let resolved = resolve_tree(tree, "", &*record)?;
    assign(record, &resolved, "")
}

fn resolve_flat(flat: &FlatMap, base: &str, record: &dyn Record) -> Result<Tree, Error> {
    let entries = record.fields();
    check_segments(&entries, base)?;

    let mut out = Tree::new();
    for entry in entries {
        let key = join_key(base, entry.segment);
        let found = match entry.field.kind() {
            FieldKind::Scalar(kind) => match flat.get(&key) {
                Some(value) => Some(cast_scalar(value, kind, &key)?),
                None => None,
            },
            FieldKind::Array(kind) => match flat.get(&key) {
                Some(Value::Array(array)) => Some(Value::Array(cast_array(array, kind, &key)?)),
                _ => slice::decode(flat, &key, kind)?.map(Value::Array),
            },
            FieldKind::Map => match flat.get(&key) {
                Some(Value::Map(map)) => Some(Value::Map(map.clone())),
                _ if has_descendants(flat, &key) => {
                    Some(Value::Map(unflatten(flat, &Path::parse(&key)?)?))
                }
                _ => None,
            },
            FieldKind::Record => match entry.field.as_record() {
                Some(child) => Some(Value::Map(resolve_flat(flat, &key, child)?)),
                None if has_descendants(flat, &key) => {
                    return Err(unallocated(key, entry.name));
                }
                None => {
                    trace!("skipping unallocated field {} with no data", key);
                    None
                }
            },
        };

        if let Some(value) = found {
            out.insert(entry.segment.to_string(), value);
        }
    }
    Ok(out)
}

fn resolve_tree(tree: &Tree, base: &str, record: &dyn Record) -> Result<Tree, Error> {
    let entries = record.fields();
    check_segments(&entries, base)?;

    let mut out = Tree::new();
    for entry in entries {
        let Some(value) = tree.get(entry.segment) else {
            continue;
        };
        let key = join_key(base, entry.segment);
        let kind = entry.field.kind();

        let resolved = match kind {
            FieldKind::Scalar(scalar) => cast_scalar(value, scalar, &key)?,
            FieldKind::Array(element) => Value::Array(tree_array(value, element, &key)?),
            FieldKind::Map => Value::Map(tree_map(value, kind, &key)?.clone()),
            FieldKind::Record => match entry.field.as_record() {
                Some(child) => Value::Map(resolve_tree(tree_map(value, kind, &key)?, &key, child)?),
                None => return Err(unallocated(key, entry.name)),
            },
        };
        out.insert(entry.segment.to_string(), resolved);
    }
    Ok(out)
}

/// Assign an already-resolved tree into `record`.
fn assign(record: &mut dyn Record, tree: &Tree, base: &str) -> Result<(), Error> {
    for entry in record.fields_mut() {
        let Some(value) = tree.get(entry.segment) else {
            continue;
        };
        let key = join_key(base, entry.segment);

        match (entry.field, value) {
            (FieldMut::Int(slot), Value::Integer(i)) => *slot = *i,
            (FieldMut::Bool(slot), Value::Bool(b)) => *slot = *b,
            (FieldMut::String(slot), Value::String(s)) => slot.clone_from(s),
            (FieldMut::IntArray(slot), Value::Array(Array::Integer(items))) => slot.clone_from(items),
            (FieldMut::BoolArray(slot), Value::Array(Array::Bool(items))) => slot.clone_from(items),
            (FieldMut::StringArray(slot), Value::Array(Array::String(items))) => slot.clone_from(items),
            (FieldMut::Map(slot), Value::Map(map)) => slot.clone_from(map),
            (FieldMut::Record(child) | FieldMut::Pointer(Some(child)), Value::Map(map)) => {
                assign(child, map, &key)?
            }
            (FieldMut::Pointer(None), _) => return Err(unallocated(key, entry.name)),
            (field, value) => return Err(mismatch(&key, field.kind(), value)),
        }
    }
    Ok(())
}

/// Two fields resolving to one segment would overwrite each other.
fn check_segments(entries: &[FieldEntry<'_>], base: &str) -> Result<(), Error> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for entry in entries {
        if let Some(other) = seen.insert(entry.segment, entry.name) {
            return Err(Error::type_conflict(
                join_key(base, entry.segment),
                format!(
                    "fields '{}' and '{}' share the path segment '{}'",
                    other, entry.name, entry.segment
                ),
            ));
        }
    }
    Ok(())
}

fn unallocated(key: String, name: &str) -> Error {
    Error::invalid_target(key, format!("nested record field '{}' is not allocated", name))
}

/// Whether any key of `flat` lies strictly under `key`.
fn has_descendants(flat: &FlatMap, key: &str) -> bool {
    let prefix = format!("{}/", key);
    flat.range(prefix.clone()..)
        .next()
        .is_some_and(|(k, _)| k.starts_with(&prefix))
}

fn tree_array(value: &Value, kind: ScalarKind, key: &str) -> Result<Array, Error> {
    match value {
        Value::Array(array) => cast_array(array, kind, key),
        // The slice heuristic reads some arrays back as {"0": .., "1": ..}.
        Value::Map(map) => match slice::decode(map, "", kind)? {
            Some(array) if array.len() == map.len() => Ok(array),
            _ => Err(mismatch(key, FieldKind::Array(kind), value)),
        },
        other => Err(mismatch(key, FieldKind::Array(kind), other)),
    }
}

fn tree_map<'a>(value: &'a Value, kind: FieldKind, key: &str) -> Result<&'a Tree, Error> {
    value.as_map().ok_or_else(|| mismatch(key, kind, value))
}

fn mismatch(key: &str, kind: FieldKind, value: &Value) -> Error {
    Error::TypeMismatch {
        field: key.to_string(),
        expected: kind.name(),
        found: value.kind_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_record;
    use collection_literals::btree;
    use structkv_core::path;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Level2 {
        key431: Tree,
    }
    impl_record!(Level2 { field key431 as "Key431" });

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Level1 {
        key41: String,
        key42: Tree,
        key43: Option<Box<Level2>>,
    }
    impl_record!(Level1 {
        field key41 as "Key41",
        field key42 as "Key42",
        field key43 as "Key43",
    });

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Settings {
        key1: String,
        key2: i64,
        key3: Vec<i64>,
        key4: Option<Box<Level1>>,
    }
    impl_record!(Settings {
        field key1 as "Key1",
        field key2 as "Key2",
        field key3 as "Key3",
        field key4 as "Key4",
    });

    /// Same shape, nested records held by value.
    #[derive(Clone, Debug, Default, PartialEq)]
    struct PlainLevel1 {
        key41: String,
        key42: Tree,
        key43: Level2,
    }
    impl_record!(PlainLevel1 {
        field key41 as "Key41",
        field key42 as "Key42",
        nested key43 as "Key43",
    });

    #[derive(Clone, Debug, Default, PartialEq)]
    struct PlainSettings {
        key1: String,
        key2: i64,
        key3: Vec<i64>,
        key4: PlainLevel1,
    }
    impl_record!(PlainSettings {
        field key1 as "Key1",
        field key2 as "Key2",
        field key3 as "Key3",
        nested key4 as "Key4",
    });

    /// Same shape, nested records promoted under their type names.
    #[derive(Clone, Debug, Default, PartialEq)]
    struct EmbeddedLevel1 {
        key41: String,
        key42: Tree,
        level2: Level2,
    }
    impl_record!(EmbeddedLevel1 {
        field key41 as "Key41",
        field key42 as "Key42",
        embedded level2,
    });

    #[derive(Clone, Debug, Default, PartialEq)]
    struct EmbeddedSettings {
        key1: String,
        key2: i64,
        key3: Vec<i64>,
        level1: EmbeddedLevel1,
    }
    impl_record!(EmbeddedSettings {
        field key1 as "Key1",
        field key2 as "Key2",
        field key3 as "Key3",
        embedded level1,
    });

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Flags {
        enabled: bool,
        modes: Vec<bool>,
        names: Vec<String>,
    }
    impl_record!(Flags {
        field enabled,
        field modes,
        field names,
    });

    /// Two fields under one segment.
    #[derive(Clone, Debug, Default, PartialEq)]
    struct Listener {
        first: String,
        name: String,
        port: i64,
    }
    impl_record!(Listener {
        field first as "A",
        field name as "X",
        field port as "X",
    });

    /// A nested field named like the type of an embedded one.
    #[derive(Clone, Debug, Default, PartialEq)]
    struct Shadowed {
        key1: String,
        key43: Level2,
        level2: Level2,
    }
    impl_record!(Shadowed {
        field key1 as "Key1",
        nested key43 as "Level2",
        embedded level2,
    });

    fn key42() -> Tree {
        btree! {
            "Key421".into() => Value::from("val421"),
            "Key422".into() => Value::from(vec!["one", "two", "three"]),
        }
    }

    fn key431() -> Tree {
        btree! { "Key4311".into() => Value::from("val4311") }
    }

    fn allocated() -> Settings {
        Settings {
            key4: Some(Box::new(Level1 {
                key43: Some(Box::default()),
                ..Level1::default()
            })),
            ..Settings::default()
        }
    }

    fn expected() -> Settings {
        Settings {
            key1: "val1".to_string(),
            key2: 2,
            key3: vec![1, 2, 3],
            key4: Some(Box::new(Level1 {
                key41: "val41".to_string(),
                key42: key42(),
                key43: Some(Box::new(Level2 { key431: key431() })),
            })),
        }
    }

    fn store_strings(prefix: &str) -> FlatMap {
        let pairs = [
            ("Key1", "val1"),
            ("Key2", "2"),
            ("Key3/0", "1"),
            ("Key3/1", "2"),
            ("Key3/2", "3"),
            ("Key4/Key41", "val41"),
            ("Key4/Key42/Key421", "val421"),
            ("Key4/Key42/Key422/0", "one"),
            ("Key4/Key42/Key422/1", "two"),
            ("Key4/Key42/Key422/2", "three"),
            ("Key4/Key43/Key431/Key4311", "val4311"),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (join_key(prefix, k), Value::from(v)))
            .collect()
    }

    // ==================== to_tree / to_flat ====================

    #[test]
    fn to_flat_pointer_children() {
        let flat = to_flat(&expected(), &path!("nestedstructmap")).unwrap();
        let rendered: FlatMap = flat
            .into_iter()
            .map(|(k, v)| (k, Value::from(v.to_scalar_string().unwrap())))
            .collect();
        assert_eq!(rendered, store_strings("nestedstructmap"));
    }

    #[test]
    fn to_tree_skips_unallocated_pointers() {
        let settings = Settings {
            key1: "val1".to_string(),
            ..Settings::default()
        };
        let tree = to_tree(&settings).unwrap();
        assert_eq!(
            tree,
            btree! {
                "Key1".into() => Value::from("val1"),
                "Key2".into() => Value::from(0),
                "Key3".into() => Value::Array(Array::Integer(Vec::new())),
            }
        );
    }

    #[test]
    fn to_tree_embedded_uses_type_names() {
        let settings = EmbeddedSettings {
            level1: EmbeddedLevel1 {
                key41: "val41".to_string(),
                level2: Level2 { key431: key431() },
                ..EmbeddedLevel1::default()
            },
            ..EmbeddedSettings::default()
        };
        let flat = to_flat(&settings, &Path::root()).unwrap();
        assert_eq!(flat["EmbeddedLevel1/Key41"], Value::from("val41"));
        assert_eq!(
            flat["EmbeddedLevel1/Level2/Key431/Key4311"],
            Value::from("val4311")
        );
    }

    // ==================== bind_from_flat ====================

    #[test]
    fn bind_store_strings_into_pointer_children() {
        let mut settings = allocated();
        bind_from_flat(&store_strings("test"), &path!("test"), &mut settings).unwrap();
        assert_eq!(settings, expected());
    }

    #[test]
    fn bind_typed_flat_without_prefix() {
        let flat: FlatMap = btree! {
            "Key1".into() => Value::from("val1"),
            "Key2".into() => Value::from(2),
            "Key3/0".into() => Value::from(1),
            "Key3/1".into() => Value::from(2),
            "Key3/2".into() => Value::from(3),
            "Key4/Key41".into() => Value::from("val41"),
            "Key4/Key42/Key421".into() => Value::from("val421"),
            "Key4/Key42/Key422/0".into() => Value::from("one"),
            "Key4/Key42/Key422/1".into() => Value::from("two"),
            "Key4/Key42/Key422/2".into() => Value::from("three"),
            "Key4/Key43/Key431/Key4311".into() => Value::from("val4311"),
        };
        let mut settings = allocated();
        bind_from_flat(&flat, &Path::root(), &mut settings).unwrap();
        assert_eq!(settings, expected());
    }

    #[test]
    fn bind_value_children() {
        let mut settings = PlainSettings::default();
        bind_from_flat(&store_strings(""), &Path::root(), &mut settings).unwrap();
        assert_eq!(settings.key2, 2);
        assert_eq!(settings.key3, vec![1, 2, 3]);
        assert_eq!(settings.key4.key41, "val41");
        assert_eq!(settings.key4.key42, key42());
        assert_eq!(settings.key4.key43.key431, key431());
    }

    #[test]
    fn bind_embedded_children() {
        let flat: FlatMap = btree! {
            "Key1".into() => Value::from("val1"),
            "Key2".into() => Value::from("2"),
            "Key3/0".into() => Value::from("1"),
            "Key3/1".into() => Value::from("2"),
            "Key3/2".into() => Value::from("3"),
            "EmbeddedLevel1/Key41".into() => Value::from("val41"),
            "EmbeddedLevel1/Key42/Key421".into() => Value::from("val421"),
            "EmbeddedLevel1/Key42/Key422/0".into() => Value::from("one"),
            "EmbeddedLevel1/Key42/Key422/1".into() => Value::from("two"),
            "EmbeddedLevel1/Key42/Key422/2".into() => Value::from("three"),
            "EmbeddedLevel1/Level2/Key431/Key4311".into() => Value::from("val4311"),
        };

        let mut settings = EmbeddedSettings::default();
        bind_from_flat(&flat, &Path::root(), &mut settings).unwrap();
        assert_eq!(
            settings,
            EmbeddedSettings {
                key1: "val1".to_string(),
                key2: 2,
                key3: vec![1, 2, 3],
                level1: EmbeddedLevel1 {
                    key41: "val41".to_string(),
                    key42: key42(),
                    level2: Level2 { key431: key431() },
                },
            }
        );
    }

    #[test]
    fn bind_casts_bools_and_string_arrays() {
        let flat: FlatMap = btree! {
            "flags/enabled".into() => Value::from("true"),
            "flags/modes/0".into() => Value::from("1"),
            "flags/modes/1".into() => Value::from("F"),
            "flags/names/0".into() => Value::from("a"),
        };
        let mut flags = Flags::default();
        bind_from_flat(&flat, &path!("flags"), &mut flags).unwrap();
        assert_eq!(
            flags,
            Flags {
                enabled: true,
                modes: vec![true, false],
                names: vec!["a".to_string()],
            }
        );
    }

    #[test]
    fn bind_accepts_whole_arrays_and_maps() {
        let flat: FlatMap = btree! {
            "Key1".into() => Value::from("val1"),
            "Key3".into() => Value::from(vec!["4", "5"]),
            "Key4/Key42".into() => Value::Map(key42()),
        };
        let mut settings = allocated();
        bind_from_flat(&flat, &Path::root(), &mut settings).unwrap();
        assert_eq!(settings.key3, vec![4, 5]);
        assert_eq!(settings.key4.unwrap().key42, key42());
    }

    #[test]
    fn absent_fields_keep_their_values() {
        let mut settings = expected();
        let flat: FlatMap = btree! { "Key2".into() => Value::from("40") };
        bind_from_flat(&flat, &Path::root(), &mut settings).unwrap();
        assert_eq!(settings.key2, 40);
        assert_eq!(settings.key1, "val1");
        assert_eq!(settings.key3, vec![1, 2, 3]);
    }

    #[test]
    fn long_arrays_bind_in_index_order() {
        let items: Vec<i64> = (0..15).collect();
        let source = Settings {
            key3: items.clone(),
            ..Settings::default()
        };
        let mut settings = Settings::default();
        let flat = to_flat(&source, &path!("p")).unwrap();
        bind_from_flat(&flat, &path!("p"), &mut settings).unwrap();
        assert_eq!(settings.key3, items);
    }

    #[test]
    fn record_round_trip() {
        let mut settings = allocated();
        let flat = to_flat(&expected(), &path!("rt")).unwrap();
        bind_from_flat(&flat, &path!("rt"), &mut settings).unwrap();
        assert_eq!(settings, expected());
    }

    #[test]
    fn mismatch_names_field_and_leaves_record_untouched() {
        let mut flat = store_strings("test");
        flat.insert("test/Key2".into(), Value::from("two"));

        let mut settings = allocated();
        let err = bind_from_flat(&flat, &path!("test"), &mut settings).unwrap_err();
        assert!(
            matches!(err, Error::TypeMismatch { ref field, expected: "int", .. } if field == "test/Key2")
        );
        assert_eq!(settings, allocated());
    }

    #[test]
    fn bad_array_element_leaves_record_untouched() {
        let mut flat = store_strings("");
        flat.insert("Key3/1".into(), Value::from("x"));

        let mut settings = allocated();
        let err = bind_from_flat(&flat, &Path::root(), &mut settings).unwrap_err();
        assert!(err.to_string().contains("Key3/1"));
        assert_eq!(settings, allocated());
    }

    #[test]
    fn unallocated_pointer_with_data_is_invalid_target() {
        let mut settings = Settings::default();
        let err = bind_from_flat(&store_strings(""), &Path::root(), &mut settings).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { ref path, .. } if path == "Key4"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unallocated_pointer_without_data_is_skipped() {
        let flat: FlatMap = btree! { "Key1".into() => Value::from("val1") };
        let mut settings = Settings::default();
        bind_from_flat(&flat, &Path::root(), &mut settings).unwrap();
        assert_eq!(settings.key1, "val1");
        assert!(settings.key4.is_none());
    }

    // ==================== bind_from_tree ====================

    #[test]
    fn bind_tree_into_pointer_children() {
        let tree: Tree = btree! {
            "Key1".into() => Value::from("val1"),
            "Key2".into() => Value::from(2),
            "Key3".into() => Value::from(vec![1, 2, 3]),
            "Key4".into() => Value::Map(btree! {
                "Key41".into() => Value::from("val41"),
                "Key42".into() => Value::Map(key42()),
                "Key43".into() => Value::Map(btree! {
                    "Key431".into() => Value::Map(key431()),
                }),
            }),
        };

        let mut settings = allocated();
        bind_from_tree(&tree, &mut settings).unwrap();
        assert_eq!(settings, expected());
    }

    #[test]
    fn bind_tree_casts_store_shapes() {
        let tree: Tree = btree! {
            "Key2".into() => Value::from("2"),
            "Key3".into() => Value::from(vec!["1", "2", "3"]),
        };
        let mut settings = Settings::default();
        bind_from_tree(&tree, &mut settings).unwrap();
        assert_eq!(settings.key2, 2);
        assert_eq!(settings.key3, vec![1, 2, 3]);
    }

    #[test]
    fn bind_tree_accepts_index_keyed_map_as_array() {
        let tree: Tree = btree! {
            "Key3".into() => Value::Map(btree! {
                "0".into() => Value::from("7"),
                "1".into() => Value::from("8"),
            }),
        };
        let mut settings = Settings::default();
        bind_from_tree(&tree, &mut settings).unwrap();
        assert_eq!(settings.key3, vec![7, 8]);
    }

    #[test]
    fn bind_tree_rejects_leaf_for_record() {
        let tree: Tree = btree! { "Key4".into() => Value::from("flat") };
        let mut settings = allocated();
        let err = bind_from_tree(&tree, &mut settings).unwrap_err();
        assert!(
            matches!(err, Error::TypeMismatch { ref field, expected: "record", .. } if field == "Key4")
        );
    }

    #[test]
    fn bind_tree_unallocated_pointer_is_invalid_target() {
        let tree: Tree = btree! {
            "Key1".into() => Value::from("val1"),
            "Key4".into() => Value::Map(btree! {
                "Key41".into() => Value::from("val41"),
            }),
        };
        let mut settings = Settings::default();
        let err = bind_from_tree(&tree, &mut settings).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { ref path, .. } if path == "Key4"));
        assert_eq!(settings, Settings::default());
    }

    // ==================== shared segments ====================

    fn listener() -> Listener {
        Listener {
            first: "keep".to_string(),
            name: "web".to_string(),
            port: 80,
        }
    }

    #[test]
    fn to_tree_rejects_shared_segments() {
        let err = to_tree(&listener()).unwrap_err();
        assert!(matches!(err, Error::TypeConflict { ref path, .. } if path == "X"));
        assert!(err.to_string().contains("'name' and 'port'"));
    }

    #[test]
    fn bind_flat_rejects_shared_segments_before_assigning() {
        let flat: FlatMap = btree! {
            "A".into() => Value::from("changed"),
            "X".into() => Value::from("8080"),
        };
        let mut record = listener();
        let err = bind_from_flat(&flat, &Path::root(), &mut record).unwrap_err();
        assert!(matches!(err, Error::TypeConflict { ref path, .. } if path == "X"));
        assert_eq!(record, listener());
    }

    #[test]
    fn bind_tree_rejects_shared_segments_before_assigning() {
        let tree: Tree = btree! { "A".into() => Value::from("changed") };
        let mut record = listener();
        let err = bind_from_tree(&tree, &mut record).unwrap_err();
        assert!(matches!(err, Error::TypeConflict { .. }));
        assert_eq!(record, listener());
    }

    #[test]
    fn nested_name_shadowing_embedded_type_is_rejected() {
        let record = Shadowed::default();
        let err = to_flat(&record, &path!("svc")).unwrap_err();
        assert!(matches!(err, Error::TypeConflict { ref path, .. } if path == "Level2"));

        let flat: FlatMap = btree! { "svc/Key1".into() => Value::from("v") };
        let mut record = Shadowed::default();
        let err = bind_from_flat(&flat, &path!("svc"), &mut record).unwrap_err();
        assert!(matches!(err, Error::TypeConflict { ref path, .. } if path == "svc/Level2"));
        assert_eq!(record, Shadowed::default());
    }
}
