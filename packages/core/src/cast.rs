//! Casting flat values back to declared scalar types.
//!
//! A key-value store returns every value as a string, so reading into a typed
//! destination means casting: `"2"` to `2`, `"true"` to `true`. Casts that
//! cannot succeed are errors naming the field, never silent zero values.

use crate::{Array, Error, ScalarKind, Value};

/// Cast a leaf to `kind`, naming `field` in the error on failure.
pub fn cast_scalar(value: &Value, kind: ScalarKind, field: &str) -> Result<Value, Error> {
    let cast = match kind {
        ScalarKind::Integer => to_int(value).map(Value::Integer),
        ScalarKind::Bool => to_bool(value).map(Value::Bool),
        ScalarKind::String => value.to_scalar_string().map(Value::String),
    };
    cast.ok_or_else(|| mismatch(value, kind, field))
}

/// Cast every element of `array` to `kind`.
pub fn cast_array(array: &Array, kind: ScalarKind, field: &str) -> Result<Array, Error> {
    if array.kind() == kind {
        return Ok(array.clone());
    }

    let mut out = Array::empty(kind);
    for (i, element) in array.values().enumerate() {
        let element_field = format!("{}/{}", field, i);
        push_cast(&mut out, &element, &element_field)?;
    }
    Ok(out)
}

/// Cast `value` to the element kind of `array` and append it.
pub(crate) fn push_cast(array: &mut Array, value: &Value, field: &str) -> Result<(), Error> {
    match array {
        Array::Integer(items) => {
            items.push(to_int(value).ok_or_else(|| mismatch(value, ScalarKind::Integer, field))?)
        }
        Array::Bool(items) => {
            items.push(to_bool(value).ok_or_else(|| mismatch(value, ScalarKind::Bool, field))?)
        }
        Array::String(items) => items.push(
            value
                .to_scalar_string()
                .ok_or_else(|| mismatch(value, ScalarKind::String, field))?,
        ),
    }
    Ok(())
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(_) | Value::Map(_) => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::String(s) => parse_bool(s.trim()),
        Value::Array(_) | Value::Map(_) => None,
    }
}

// The spellings store writers commonly emit for booleans.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn mismatch(value: &Value, kind: ScalarKind, field: &str) -> Error {
    let found = match value {
        Value::String(s) => format!("{:?}", s),
        Value::Integer(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.kind_name().to_string(),
    };
    Error::TypeMismatch {
        field: field.to_string(),
        expected: kind.name(),
        found,
    }
}
