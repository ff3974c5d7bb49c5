//! Conversions from serde types into trees.

use serde::Serialize;

use crate::path::join_key;
use crate::{Array, Error, ScalarKind, Tree, Value};

/// Convert any serializable Rust value into a tree.
///
/// The value must serialize to a map (a struct or a map type). Nulls, floats
/// and arrays of anything but one primitive kind have no flat representation
/// and are rejected with `UnsupportedType`. Empty arrays carry no element type
/// and come back as empty string arrays.
pub fn to_tree<T: Serialize>(data: &T) -> Result<Tree, Error> {
    let json = serde_json::to_value(data).map_err(|e| Error::Encode {
        message: e.to_string(),
    })?;
    match json_to_value(json, "")? {
        Value::Map(tree) => Ok(tree),
        other => Err(Error::unsupported(
            "",
            format!("top-level {} value; expected a map", other.kind_name()),
        )),
    }
}

/// Convert a `serde_json::Value` found at `path` into a tree value.
pub fn json_to_value(json: serde_json::Value, path: &str) -> Result<Value, Error> {
    match json {
        serde_json::Value::Null => Err(Error::unsupported(path, "null value")),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| Error::unsupported(path, format!("non-integer number {}", n))),
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Array(items) => json_to_array(items, path).map(Value::Array),
        serde_json::Value::Object(map) => {
            let mut tree = Tree::new();
            for (key, value) in map {
                let child = json_to_value(value, &join_key(path, &key))?;
                tree.insert(key, child);
            }
            Ok(Value::Map(tree))
        }
    }
}

fn json_to_array(elements: Vec<serde_json::Value>, path: &str) -> Result<Array, Error> {
    let mut array: Option<Array> = None;
    for (i, item) in elements.into_iter().enumerate() {
        let key = join_key(path, &i.to_string());
        let element = json_to_value(item, &key)?;
        let Some(kind) = element.scalar_kind() else {
            return Err(Error::unsupported(
                key,
                format!("nested {} inside an array", element.kind_name()),
            ));
        };

        let array = array.get_or_insert_with(|| Array::empty(kind));
        match (array, element) {
            (Array::Integer(items), Value::Integer(n)) => items.push(n),
            (Array::Bool(items), Value::Bool(b)) => items.push(b),
            (Array::String(items), Value::String(s)) => items.push(s),
            (array, element) => {
                return Err(Error::unsupported(
                    key,
                    format!(
                        "{} element in {} array; arrays must be homogeneous",
                        element.kind_name(),
                        array.kind().name()
                    ),
                ))
            }
        }
    }
    Ok(array.unwrap_or_else(|| Array::empty(ScalarKind::String)))
}
