//! Schema types
//!
//! Index paths, field specifications and page layouts. Everything here is
//! `'static` and `Copy`; tables are built from these in `tables.rs`.

use crate::types::EntityKind;

/// One step of an index path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Child at this position
    Index(usize),
    /// n-th child counted from the end, 1-based (`FromEnd(1)` is the last)
    FromEnd(usize),
    /// First child whose shape matches
    FirstMatching(Shape),
}

/// Shape test used by [`Segment::FirstMatching`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Child is a sequence whose element at this index is a non-empty sequence
    NonEmptyArrayAt(usize),
    /// Descending the child by this path reaches a string
    StringAt(IndexPath),
}

/// Fixed sequence of segments locating one value
pub type IndexPath = &'static [Segment];

/// Conversion applied to a decoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Value as-is
    Raw,
    /// String, or absent for any other type
    Text,
    /// Marketplace HTML fragment to plain text
    HtmlText,
    /// Integer (numbers are truncated, digit strings parsed)
    Integer,
    /// Floating point number
    Float,
    /// Presence flag: any non-null, non-false value is `true`
    Flag,
    /// Localized count such as "10,000+" to an integer
    InstallCount,
    /// Price in micros to a decimal amount
    Micros,
    /// Unix seconds to an RFC 3339 UTC timestamp
    Timestamp,
    /// Image URL, sized by the format context
    ImageUrl,
    /// Sequence of nodes, each descended by the path to an image URL
    ImageList(IndexPath),
    /// Sequence of strings joined with the separator
    JoinStrings(&'static str),
    /// Value of a query parameter inside a link
    QueryParam(&'static str),
    /// Star histogram (five buckets, one to five stars)
    Histogram,
}

/// Value used when a field is absent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Null,
    Zero,
    ZeroFloat,
    False,
    True,
    EmptyText,
    EmptyList,
}

/// Fields computed from other fields of the same record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    /// `true` when the `price` field is zero
    FreeFromPrice,
    /// Store detail URL built from `appId`
    StoreUrl,
    /// Integer parsed from the `installs` text
    InstallsCount,
}

/// Where a field's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Path(IndexPath),
    Derived(Derived),
}

/// One canonical field of an entity schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub source: FieldSource,
    pub transform: Transform,
    pub default: FieldDefault,
}

impl FieldSpec {
    /// Field read from an index path, defaulting to null
    pub const fn at(name: &'static str, path: IndexPath, transform: Transform) -> Self {
        Self {
            name,
            source: FieldSource::Path(path),
            transform,
            default: FieldDefault::Null,
        }
    }

    /// Field computed after all path fields are formatted
    pub const fn derived(name: &'static str, derived: Derived, default: FieldDefault) -> Self {
        Self {
            name,
            source: FieldSource::Derived(derived),
            transform: Transform::Raw,
            default,
        }
    }

    /// Replace the default
    #[must_use]
    pub const fn or(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }
}

/// Immutable field table of one entity kind
#[derive(Debug)]
pub struct FieldSchema {
    pub kind: EntityKind,
    pub fields: &'static [FieldSpec],
}

impl FieldSchema {
    /// Canonical field names, in output order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Look up a field by canonical name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Where a response carries its payload tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// Embedded data block of an HTML page, by key (e.g. `ds:5`)
    Dataset(&'static str),
    /// Batch-execute response, by RPC id
    Rpc(&'static str),
}

/// Location of the item list and continuation token inside one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub source: PayloadSource,
    pub items: IndexPath,
    pub token: Option<IndexPath>,
}
