//! The Value type - the leaves and branches of a nested tree.
//!
//! A tree is a `BTreeMap<String, Value>`. Leaves are booleans, integers and
//! strings; arrays are homogeneous by construction; maps nest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A nested tree: map keys to values, in lexicographic key order.
pub type Tree = BTreeMap<String, Value>;

/// A flat mapping from `/`-joined path keys to values.
///
/// Produced by [`flatten`](crate::flatten) (scalar values only) and
/// [`flatten_to_map`](crate::flatten_to_map) (arrays and empty maps kept whole).
/// Being a `BTreeMap`, iteration is always in byte-lexicographic key order.
pub type FlatMap = BTreeMap<String, Value>;

/// A value in a nested tree.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for deterministic ordering (canonical order is lexicographic)
/// - Uses `i64` for integers
/// - No null, float or bytes: a key-value store only ever hands back strings,
///   and those three cannot be cast back without a schema
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// UTF-8 string.
    String(String),
    /// Homogeneous array of primitives.
    Array(Array),
    /// Nested map.
    Map(Tree),
}

/// A homogeneous array of primitives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Array {
    Integer(Vec<i64>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

/// The primitive type of a leaf or of an array's elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Integer,
    Bool,
    String,
}

impl ScalarKind {
    /// Short lowercase name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Integer => "int",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
        }
    }
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Check if this value is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// The primitive kind of a leaf, `None` for arrays and maps.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Value::Bool(_) => Some(ScalarKind::Bool),
            Value::Integer(_) => Some(ScalarKind::Integer),
            Value::String(_) => Some(ScalarKind::String),
            Value::Array(_) | Value::Map(_) => None,
        }
    }

    /// Short lowercase name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            leaf => leaf.scalar_kind().map_or("unknown", ScalarKind::name),
        }
    }

    /// Borrow the map of a `Value::Map`.
    pub fn as_map(&self) -> Option<&Tree> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the string of a `Value::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string form a key-value store holds for this value.
    ///
    /// `None` for arrays and maps: they have no single-key representation.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Array(_) | Value::Map(_) => None,
        }
    }
}

impl Array {
    /// Create an empty array holding `kind` elements.
    pub fn empty(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Integer => Array::Integer(Vec::new()),
            ScalarKind::Bool => Array::Bool(Vec::new()),
            ScalarKind::String => Array::String(Vec::new()),
        }
    }

    /// The element kind.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Array::Integer(_) => ScalarKind::Integer,
            Array::Bool(_) => ScalarKind::Bool,
            Array::String(_) => ScalarKind::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Array::Integer(items) => items.len(),
            Array::Bool(items) => items.len(),
            Array::String(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone the element at `index` out as a leaf value.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Array::Integer(items) => items.get(index).map(|i| Value::Integer(*i)),
            Array::Bool(items) => items.get(index).map(|b| Value::Bool(*b)),
            Array::String(items) => items.get(index).map(|s| Value::String(s.clone())),
        }
    }

    /// Iterate over the elements as leaf values.
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Tree> for Value {
    fn from(v: Tree) -> Self {
        Value::Map(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Array(Array::Integer(v))
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::Array(Array::Integer(v.into_iter().map(i64::from).collect()))
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Value::Array(Array::Bool(v))
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Array(Array::String(v))
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::Array(Array::String(v.into_iter().map(str::to_string).collect()))
    }
}
