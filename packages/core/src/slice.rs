//! Homogeneous arrays as contiguous, positionally-indexed keys.
//!
//! An array `[a, b, c]` at `path` is stored as `path/0 → a`, `path/1 → b`,
//! `path/2 → c`. Indexes are zero-based decimal with no padding, so past ten
//! elements the keys no longer sort in index order (`10` before `2`); readers
//! must look elements up by index rather than trust key order.

use crate::cast::push_cast;
use crate::path::join_key;
use crate::{Array, Error, FlatMap, ScalarKind, Value};

/// The flat key of element `index` of the array at `path`.
pub fn index_key(path: &str, index: usize) -> String {
    join_key(path, &index.to_string())
}

/// Explode `array` into `out` as one key per element.
pub fn encode_into(path: &str, array: &Array, out: &mut FlatMap) {
    for (i, element) in array.values().enumerate() {
        out.insert(index_key(path, i), element);
    }
}

/// Explode `array` into a new flat mapping.
///
/// ```rust
/// use structkv_core::{slice, Array, Value};
///
/// let flat = slice::encode("test/key3", &Array::Integer(vec![1, 2, 3]));
/// assert_eq!(flat["test/key3/0"], Value::Integer(1));
/// assert_eq!(flat["test/key3/2"], Value::Integer(3));
/// ```
pub fn encode(path: &str, array: &Array) -> FlatMap {
    let mut out = FlatMap::new();
    encode_into(path, array, &mut out);
    out
}

/// Rebuild the array at `path` by looking up `path/0`, `path/1`, … until a miss.
///
/// Every element is cast to `kind`. Returns `None` when `path/0` is absent.
pub fn decode(flat: &FlatMap, path: &str, kind: ScalarKind) -> Result<Option<Array>, Error> {
    let mut array = Array::empty(kind);
    loop {
        let key = index_key(path, array.len());
        match flat.get(&key) {
            Some(value) => push_cast(&mut array, value, &key)?,
            None => break,
        }
    }

    if array.is_empty() {
        Ok(None)
    } else {
        Ok(Some(array))
    }
}

/// Start an array from its first element, typed from the element itself.
pub(crate) fn start(value: &Value, key: &str) -> Result<Array, Error> {
    let kind = element_kind(value, key)?;
    let mut array = Array::empty(kind);
    push_cast(&mut array, value, key)?;
    Ok(array)
}

/// Append a further element; its runtime type must match the array's.
pub(crate) fn push(array: &mut Array, value: &Value, key: &str) -> Result<(), Error> {
    let kind = element_kind(value, key)?;
    if kind != array.kind() {
        return Err(Error::type_conflict(
            key,
            format!(
                "cannot append {} element to {} array",
                kind.name(),
                array.kind().name()
            ),
        ));
    }
    push_cast(array, value, key)
}

fn element_kind(value: &Value, key: &str) -> Result<ScalarKind, Error> {
    value.scalar_kind().ok_or_else(|| {
        Error::unsupported(
            key,
            format!(
                "{} array element; only int, bool and string are supported",
                value.kind_name()
            ),
        )
    })
}
