//! The Record trait - a closed description of a struct's fields.
//!
//! Binding needs to enumerate a struct's fields, learn their declared types,
//! and assign into them. Instead of runtime reflection each record hands out
//! a list of entries, one per field, whose accessor is one of a fixed set of
//! variants. `impl_record!` writes that list from a field listing.

use structkv_core::{ScalarKind, Tree};

/// A struct the binder can read from and write into.
///
/// Usually implemented with [`impl_record!`](crate::impl_record).
pub trait Record {
    /// The unqualified type name; the path segment of an embedded field.
    fn type_name(&self) -> &'static str;

    /// Read access to every field, in declaration order.
    fn fields(&self) -> Vec<FieldEntry<'_>>;

    /// Write access to every field, in declaration order.
    fn fields_mut(&mut self) -> Vec<FieldEntryMut<'_>>;
}

/// How a field contributes its path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Embedding {
    /// Under its own name: `prefix/Name/...`.
    Named,
    /// Promoted under its record's type name: `prefix/TypeName/...`.
    Embedded,
}

/// Read accessor for one field.
pub enum FieldRef<'a> {
    Int(i64),
    Bool(bool),
    String(&'a str),
    IntArray(&'a [i64]),
    BoolArray(&'a [bool]),
    StringArray(&'a [String]),
    Map(&'a Tree),
    /// A nested record held by value.
    Record(&'a dyn Record),
    /// A nullable nested record; `None` when unallocated.
    Pointer(Option<&'a dyn Record>),
}

/// Write accessor for one field.
pub enum FieldMut<'a> {
    Int(&'a mut i64),
    Bool(&'a mut bool),
    String(&'a mut String),
    IntArray(&'a mut Vec<i64>),
    BoolArray(&'a mut Vec<bool>),
    StringArray(&'a mut Vec<String>),
    Map(&'a mut Tree),
    Record(&'a mut dyn Record),
    Pointer(Option<&'a mut dyn Record>),
}

/// Declared shape of a field, independent of access mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Array(ScalarKind),
    Map,
    Record,
}

impl FieldKind {
    /// Short name used in type mismatch errors.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Scalar(kind) => kind.name(),
            FieldKind::Array(ScalarKind::Integer) => "int array",
            FieldKind::Array(ScalarKind::Bool) => "bool array",
            FieldKind::Array(ScalarKind::String) => "string array",
            FieldKind::Map => "map",
            FieldKind::Record => "record",
        }
    }
}

impl<'a> FieldRef<'a> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldRef::Int(_) => FieldKind::Scalar(ScalarKind::Integer),
            FieldRef::Bool(_) => FieldKind::Scalar(ScalarKind::Bool),
            FieldRef::String(_) => FieldKind::Scalar(ScalarKind::String),
            FieldRef::IntArray(_) => FieldKind::Array(ScalarKind::Integer),
            FieldRef::BoolArray(_) => FieldKind::Array(ScalarKind::Bool),
            FieldRef::StringArray(_) => FieldKind::Array(ScalarKind::String),
            FieldRef::Map(_) => FieldKind::Map,
            FieldRef::Record(_) | FieldRef::Pointer(_) => FieldKind::Record,
        }
    }

    /// The nested record of a `Record` field or an allocated `Pointer`.
    pub fn as_record(&self) -> Option<&'a dyn Record> {
        match self {
            FieldRef::Record(record) => Some(*record),
            FieldRef::Pointer(record) => *record,
            _ => None,
        }
    }
}

impl FieldMut<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldMut::Int(_) => FieldKind::Scalar(ScalarKind::Integer),
            FieldMut::Bool(_) => FieldKind::Scalar(ScalarKind::Bool),
            FieldMut::String(_) => FieldKind::Scalar(ScalarKind::String),
            FieldMut::IntArray(_) => FieldKind::Array(ScalarKind::Integer),
            FieldMut::BoolArray(_) => FieldKind::Array(ScalarKind::Bool),
            FieldMut::StringArray(_) => FieldKind::Array(ScalarKind::String),
            FieldMut::Map(_) => FieldKind::Map,
            FieldMut::Record(_) | FieldMut::Pointer(_) => FieldKind::Record,
        }
    }
}

/// One field of a record, for reading.
pub struct FieldEntry<'a> {
    /// The Rust field name.
    pub name: &'static str,
    /// The path segment the field lives under.
    pub segment: &'static str,
    pub embedding: Embedding,
    pub field: FieldRef<'a>,
}

impl<'a> FieldEntry<'a> {
    /// A field stored under `segment`.
    pub fn named(segment: &'static str, field: FieldRef<'a>) -> Self {
        FieldEntry {
            name: segment,
            segment,
            embedding: Embedding::Named,
            field,
        }
    }

    /// A record promoted under its own type name.
    pub fn embedded(name: &'static str, record: &'a dyn Record) -> Self {
        FieldEntry {
            name,
            segment: record.type_name(),
            embedding: Embedding::Embedded,
            field: FieldRef::Record(record),
        }
    }

    /// Keep `name` as the Rust field name when the segment differs.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

/// One field of a record, for writing.
pub struct FieldEntryMut<'a> {
    pub name: &'static str,
    pub segment: &'static str,
    pub embedding: Embedding,
    pub field: FieldMut<'a>,
}

impl<'a> FieldEntryMut<'a> {
    pub fn named(segment: &'static str, field: FieldMut<'a>) -> Self {
        FieldEntryMut {
            name: segment,
            segment,
            embedding: Embedding::Named,
            field,
        }
    }

    pub fn embedded(name: &'static str, record: &'a mut dyn Record) -> Self {
        let segment = record.type_name();
        FieldEntryMut {
            name,
            segment,
            embedding: Embedding::Embedded,
            field: FieldMut::Record(record),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

/// A Rust type usable as a record field.
///
/// Implemented for the supported leaf, array and map types, and for
/// `Option<Box<R>>` as a nullable nested record. Nested records held by value
/// are declared with `nested` in [`impl_record!`](crate::impl_record) instead.
pub trait Field {
    fn field_ref(&self) -> FieldRef<'_>;
    fn field_mut(&mut self) -> FieldMut<'_>;
}

impl Field for i64 {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Int(*self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Int(self)
    }
}

impl Field for bool {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Bool(*self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Bool(self)
    }
}

impl Field for String {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::String(self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::String(self)
    }
}

impl Field for Vec<i64> {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::IntArray(self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::IntArray(self)
    }
}

impl Field for Vec<bool> {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::BoolArray(self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::BoolArray(self)
    }
}

impl Field for Vec<String> {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::StringArray(self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::StringArray(self)
    }
}

impl Field for Tree {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Map(self)
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Map(self)
    }
}

impl<R: Record> Field for Option<Box<R>> {
    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Pointer(self.as_deref().map(|r| r as &dyn Record))
    }

    fn field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Pointer(self.as_deref_mut().map(|r| r as &mut dyn Record))
    }
}

/// Implement [`Record`] for a struct from a list of its fields.
///
/// Each field is introduced by a mode:
///
/// - `field name` - a leaf, array, map or `Option<Box<R>>` field
///   (anything implementing [`Field`])
/// - `nested name` - a nested record held by value
/// - `embedded name` - a nested record promoted under its type name
///
/// `field` and `nested` take an optional `as "Segment"` to store the field
/// under a different path segment than its Rust name.
///
/// # Example
///
/// ```rust
/// use structkv_core::Tree;
/// use structkv_record::{impl_record, Record};
///
/// #[derive(Default)]
/// struct Labels {
///     tags: Vec<String>,
/// }
/// impl_record!(Labels { field tags });
///
/// #[derive(Default)]
/// struct Service {
///     name: String,
///     port: i64,
///     meta: Tree,
///     labels: Labels,
/// }
/// impl_record!(Service {
///     field name as "Name",
///     field port as "Port",
///     field meta as "Meta",
///     embedded labels,
/// });
///
/// let service = Service::default();
/// let segments: Vec<&str> = service.fields().iter().map(|e| e.segment).collect();
/// assert_eq!(segments, ["Name", "Port", "Meta", "Labels"]);
/// ```
#[macro_export]
macro_rules! impl_record {
    (@segment $field:ident) => {
        stringify!($field)
    };
    (@segment $field:ident $segment:literal) => {
        $segment
    };

    (@ref $self:ident field $field:ident $($segment:literal)?) => {
        $crate::FieldEntry::named(
            $crate::impl_record!(@segment $field $($segment)?),
            $crate::Field::field_ref(&$self.$field),
        )
        .with_name(stringify!($field))
    };
    (@ref $self:ident nested $field:ident $($segment:literal)?) => {
        $crate::FieldEntry::named(
            $crate::impl_record!(@segment $field $($segment)?),
            $crate::FieldRef::Record(&$self.$field),
        )
        .with_name(stringify!($field))
    };
    (@ref $self:ident embedded $field:ident) => {
        $crate::FieldEntry::embedded(stringify!($field), &$self.$field)
    };

    (@mut $self:ident field $field:ident $($segment:literal)?) => {
        $crate::FieldEntryMut::named(
            $crate::impl_record!(@segment $field $($segment)?),
            $crate::Field::field_mut(&mut $self.$field),
        )
        .with_name(stringify!($field))
    };
    (@mut $self:ident nested $field:ident $($segment:literal)?) => {
        $crate::FieldEntryMut::named(
            $crate::impl_record!(@segment $field $($segment)?),
            $crate::FieldMut::Record(&mut $self.$field),
        )
        .with_name(stringify!($field))
    };
    (@mut $self:ident embedded $field:ident) => {
        $crate::FieldEntryMut::embedded(stringify!($field), &mut $self.$field)
    };

    ($ty:ident { $($mode:ident $field:ident $(as $segment:literal)?),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn fields(&self) -> Vec<$crate::FieldEntry<'_>> {
                vec![$($crate::impl_record!(@ref self $mode $field $($segment)?)),*]
            }

            fn fields_mut(&mut self) -> Vec<$crate::FieldEntryMut<'_>> {
                vec![$($crate::impl_record!(@mut self $mode $field $($segment)?)),*]
            }
        }
    };
}
