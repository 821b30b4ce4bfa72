//! Fallible element-level decoding.
//!
//! The functions in this module decode single elements from a document
//! buffer and report malformed bytes as errors. [`crate::view`] builds its
//! traversal on top of them; use them directly to validate a buffer whose
//! framing cannot be trusted before wrapping it in a view.

use core::str;

use thiserror::Error;
use zerocopy::FromBytes;

use crate::element::{Binary, DbPointer, Element, ObjectId, Regex, Timestamp, Value};
use crate::view::DocumentView;

/// Errors occurring while decoding an element from a document buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Unexpectedly reached the end of the document buffer.
    #[error("Unexpectedly reached the end of the document buffer.")]
    EndOfDocument,
    /// Unknown element type marker.
    #[error("Unknown element type marker (0x{0:02x}).")]
    UnknownTag(u8),
    /// A key or string value holds invalid UTF-8.
    #[error("Invalid UTF-8 in a key or string value.")]
    InvalidUtf8,
    /// A length prefix is out of range for its value or buffer.
    #[error("Invalid length prefix ({0}).")]
    InvalidLength(i32),
    /// A length-prefixed string is missing its terminator.
    #[error("Missing string terminator.")]
    UnterminatedString,
    /// A boolean holds a byte other than 0x00 or 0x01.
    #[error("Invalid boolean value (0x{0:02x}).")]
    InvalidBoolean(u8),
}

/// Element type markers, in their encoded representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// 64-bit IEEE 754 floating point.
    Double = 0x01,
    /// UTF-8 string.
    String = 0x02,
    /// Embedded document.
    Document = 0x03,
    /// Array.
    Array = 0x04,
    /// Binary data.
    Binary = 0x05,
    /// Undefined (deprecated).
    Undefined = 0x06,
    /// ObjectId.
    ObjectId = 0x07,
    /// Boolean.
    Boolean = 0x08,
    /// UTC datetime.
    DateTime = 0x09,
    /// Null.
    Null = 0x0a,
    /// Regular expression.
    Regex = 0x0b,
    /// DBPointer (deprecated).
    DbPointer = 0x0c,
    /// JavaScript code.
    Code = 0x0d,
    /// Symbol (deprecated).
    Symbol = 0x0e,
    /// JavaScript code with scope (deprecated).
    CodeWithScope = 0x0f,
    /// 32-bit signed integer.
    Int32 = 0x10,
    /// Internal timestamp.
    Timestamp = 0x11,
    /// 64-bit signed integer.
    Int64 = 0x12,
    /// 128-bit decimal floating point.
    Decimal128 = 0x13,
    /// Max key.
    MaxKey = 0x7f,
    /// Min key.
    MinKey = 0xff,
}

impl TryFrom<u8> for Tag {
    type Error = Error;

    fn try_from(marker: u8) -> Result<Self, Error> {
        Ok(match marker {
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::Document,
            0x04 => Self::Array,
            0x05 => Self::Binary,
            0x06 => Self::Undefined,
            0x07 => Self::ObjectId,
            0x08 => Self::Boolean,
            0x09 => Self::DateTime,
            0x0a => Self::Null,
            0x0b => Self::Regex,
            0x0c => Self::DbPointer,
            0x0d => Self::Code,
            0x0e => Self::Symbol,
            0x0f => Self::CodeWithScope,
            0x10 => Self::Int32,
            0x11 => Self::Timestamp,
            0x12 => Self::Int64,
            0x13 => Self::Decimal128,
            0x7f => Self::MaxKey,
            0xff => Self::MinKey,
            marker => Err(Error::UnknownTag(marker))?,
        })
    }
}

/// Read and check a document's 4-byte little-endian length prefix.
///
/// The prefix counts the whole encoding, itself and the terminator
/// included, so it can never be less than five or exceed the buffer.
pub fn document_len(r: &[u8]) -> Result<usize, Error> {
    let i = &mut 0;

    let len = i32::from_le_bytes(take(r, i)?);

    if len < 5 || len as usize > r.len() {
        Err(Error::InvalidLength(len))?;
    }

    Ok(len as usize)
}

/// Decode the element at an offset in a document buffer.
///
/// The offset must point at an element's type marker; the first element of
/// a document sits at offset four, immediately after the length prefix.
/// Returns the element, borrowing its key, value, and encoded span from the
/// buffer.
pub fn element(r: &[u8], offset: usize) -> Result<Element<'_>, Error> {
    let mut i = offset;
    let i = &mut i;

    let tag = Tag::try_from(take::<1>(r, i)?[0])?;
    let key = take_cstr(r, i)?;
    let value = take_value(r, i, tag)?;

    Ok(Element {
        bytes: &r[offset..*i],
        offset,
        key,
        tag,
        value,
    })
}

fn take_value<'a>(r: &'a [u8], i: &mut usize, tag: Tag) -> Result<Value<'a>, Error> {
    Ok(match tag {
        Tag::Double => Value::Double(f64::from_le_bytes(take(r, i)?)),
        Tag::String => Value::String(take_string(r, i)?),
        Tag::Document => Value::Document(take_document(r, i)?),
        Tag::Array => Value::Array(take_document(r, i)?),
        Tag::Binary => {
            #[repr(C, packed)]
            #[derive(FromBytes)]
            struct BinaryHeader {
                length: [u8; 4],
                subtype: u8,
            }

            let BinaryHeader { length, subtype } = zerocopy::transmute!(take::<5>(r, i)?);

            let length = i32::from_le_bytes(length);
            if length < 0 {
                Err(Error::InvalidLength(length))?;
            }

            Value::Binary(Binary {
                subtype,
                bytes: take_n(r, i, length as usize)?,
            })
        }
        Tag::Undefined => Value::Undefined,
        Tag::ObjectId => Value::ObjectId(ObjectId(take(r, i)?)),
        Tag::Boolean => match take::<1>(r, i)?[0] {
            0x00 => Value::Boolean(false),
            0x01 => Value::Boolean(true),
            b => Err(Error::InvalidBoolean(b))?,
        },
        Tag::DateTime => Value::DateTime(i64::from_le_bytes(take(r, i)?)),
        Tag::Null => Value::Null,
        Tag::Regex => Value::Regex(Regex {
            pattern: take_cstr(r, i)?,
            options: take_cstr(r, i)?,
        }),
        Tag::DbPointer => Value::DbPointer(DbPointer {
            namespace: take_string(r, i)?,
            id: ObjectId(take(r, i)?),
        }),
        Tag::Code => Value::Code(take_string(r, i)?),
        Tag::Symbol => Value::Symbol(take_string(r, i)?),
        Tag::CodeWithScope => {
            // The outer length restates the code and scope lengths.
            let _ = take::<4>(r, i)?;

            Value::CodeWithScope {
                code: take_string(r, i)?,
                scope: take_document(r, i)?,
            }
        }
        Tag::Int32 => Value::Int32(i32::from_le_bytes(take(r, i)?)),
        Tag::Timestamp => {
            #[repr(C, packed)]
            #[derive(FromBytes)]
            struct TimestampValue {
                increment: [u8; 4],
                time: [u8; 4],
            }

            let TimestampValue { increment, time } = zerocopy::transmute!(take::<8>(r, i)?);

            Value::Timestamp(Timestamp {
                increment: u32::from_le_bytes(increment),
                time: u32::from_le_bytes(time),
            })
        }
        Tag::Int64 => Value::Int64(i64::from_le_bytes(take(r, i)?)),
        Tag::Decimal128 => Value::Decimal128(take(r, i)?),
        Tag::MaxKey => Value::MaxKey,
        Tag::MinKey => Value::MinKey,
    })
}

/// Take an exact number of bytes from an offset in a buffer, advancing the
/// offset.
fn take<const N: usize>(r: &[u8], i: &mut usize) -> Result<[u8; N], Error> {
    let s = *i;
    let e = s.checked_add(N).ok_or(Error::EndOfDocument)?;

    let bytes = r.get(s..e).ok_or(Error::EndOfDocument)?;
    *i = e;

    Ok(bytes.try_into().unwrap())
}

/// Take a counted number of bytes from an offset in a buffer, advancing the
/// offset.
fn take_n<'a>(r: &'a [u8], i: &mut usize, n: usize) -> Result<&'a [u8], Error> {
    let s = *i;
    let e = s.checked_add(n).ok_or(Error::EndOfDocument)?;

    let bytes = r.get(s..e).ok_or(Error::EndOfDocument)?;
    *i = e;

    Ok(bytes)
}

/// Take a NUL-terminated UTF-8 string from an offset in a buffer, advancing
/// the offset past the terminator.
fn take_cstr<'a>(r: &'a [u8], i: &mut usize) -> Result<&'a str, Error> {
    let s = *i;

    let rest = r.get(s..).ok_or(Error::EndOfDocument)?;
    let len = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::EndOfDocument)?;
    *i = s + len + 1;

    str::from_utf8(&rest[..len]).map_err(|_| Error::InvalidUtf8)
}

/// Take a length-prefixed UTF-8 string from an offset in a buffer, advancing
/// the offset. The prefix counts the body and a trailing NUL.
fn take_string<'a>(r: &'a [u8], i: &mut usize) -> Result<&'a str, Error> {
    let len = i32::from_le_bytes(take(r, i)?);

    if len < 1 {
        Err(Error::InvalidLength(len))?;
    }

    let bytes = take_n(r, i, len as usize)?;
    let (body, terminator) = bytes.split_at(len as usize - 1);

    if terminator != [0] {
        Err(Error::UnterminatedString)?;
    }

    str::from_utf8(body).map_err(|_| Error::InvalidUtf8)
}

/// Take an embedded document (or array) from an offset in a buffer,
/// advancing the offset. The sub-document's framing is checked lazily, like
/// any other view's.
fn take_document<'a>(r: &'a [u8], i: &mut usize) -> Result<DocumentView<'a>, Error> {
    let s = *i;

    let len = i32::from_le_bytes(take(r, i)?);
    if len < 5 {
        Err(Error::InvalidLength(len))?;
    }

    // Rewind: the length prefix is part of the sub-document's encoding.
    *i = s;

    Ok(DocumentView::new(take_n(r, i, len as usize)?))
}
