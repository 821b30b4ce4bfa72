//! Elements decoded from a document.

use crate::raw::Tag;
use crate::view::DocumentView;

/// A single key/value entry of a document.
///
/// An element borrows everything — key, value payload, and encoded span —
/// from the buffer of the view it was decoded from, and is therefore cheap
/// to copy and pass around. Keys are not required to be unique within a
/// document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element<'a> {
    pub(crate) bytes: &'a [u8],
    pub(crate) offset: usize,
    pub(crate) key: &'a str,
    pub(crate) tag: Tag,
    pub(crate) value: Value<'a>,
}

impl<'a> Element<'a> {
    /// The element's key.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The element's type marker.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The element's decoded value.
    pub fn value(&self) -> Value<'a> {
        self.value
    }

    /// The element's full encoded span: type marker, key, and value bytes.
    pub fn raw(&self) -> &'a [u8] {
        self.bytes
    }

    /// The element's byte offset within its document.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// A decoded value, borrowing variable-width payloads from the document
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// 64-bit IEEE 754 floating point.
    Double(f64),
    /// UTF-8 string.
    String(&'a str),
    /// Embedded document, yielded as a view and not entered.
    Document(DocumentView<'a>),
    /// Array, encoded as a document keyed by ascending decimal indices.
    Array(DocumentView<'a>),
    /// Binary data with a subtype marker.
    Binary(Binary<'a>),
    /// Undefined (deprecated).
    Undefined,
    /// 12-byte object identifier.
    ObjectId(ObjectId),
    /// Boolean.
    Boolean(bool),
    /// UTC datetime, in milliseconds since the Unix epoch.
    DateTime(i64),
    /// Null.
    Null,
    /// Regular expression.
    Regex(Regex<'a>),
    /// Database pointer (deprecated).
    DbPointer(DbPointer<'a>),
    /// JavaScript code.
    Code(&'a str),
    /// Symbol (deprecated).
    Symbol(&'a str),
    /// JavaScript code with a scope document (deprecated).
    CodeWithScope {
        /// The code.
        code: &'a str,
        /// Variable bindings for the code, as a document.
        scope: DocumentView<'a>,
    },
    /// 32-bit signed integer.
    Int32(i32),
    /// Internal timestamp, used for replication bookkeeping.
    Timestamp(Timestamp),
    /// 64-bit signed integer.
    Int64(i64),
    /// 128-bit decimal floating point, as raw little-endian bytes.
    Decimal128([u8; 16]),
    /// Sorts before every other value.
    MinKey,
    /// Sorts after every other value.
    MaxKey,
}

/// A binary value: a subtype marker and an opaque payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binary<'a> {
    /// The subtype marker (generic, UUID, MD5, user-defined, and so on).
    pub subtype: u8,
    /// The payload.
    pub bytes: &'a [u8],
}

/// A 12-byte object identifier, in its encoded byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub [u8; 12]);

/// A regular expression value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regex<'a> {
    /// The pattern.
    pub pattern: &'a str,
    /// The matching options, as sorted flag characters.
    pub options: &'a str,
}

/// A database pointer value (deprecated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbPointer<'a> {
    /// The namespace of the pointed-to collection.
    pub namespace: &'a str,
    /// The identifier of the pointed-to document.
    pub id: ObjectId,
}

/// An internal timestamp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// The ordinal within the second.
    pub increment: u32,
    /// Seconds since the Unix epoch.
    pub time: u32,
}
