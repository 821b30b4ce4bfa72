#![no_std]

//! Zero-copy, read-only views over BSON documents.
//!
//! Wisent interprets a length-prefixed, self-describing document in place,
//! without copying or taking ownership of its bytes. A [`DocumentView`]
//! wraps a caller-supplied buffer and exposes forward iteration, linear key
//! lookup, and byte-exact comparison; every [`Element`] it yields borrows
//! from the same buffer.
//!
//! Most users should begin with [`DocumentView`] in the [`view`] module. The
//! fallible element decoder in the [`raw`] module underpins it, and suits
//! applications that must validate untrusted buffers before wrapping them.
//!
//! Views never mutate, encode, or own documents. The caller is responsible
//! for keeping a buffer alive and unmodified for as long as any view,
//! iterator, or element borrows from it; the borrow checker enforces this.

pub mod element;
pub mod raw;
pub mod view;

pub use element::{Binary, DbPointer, Element, ObjectId, Regex, Timestamp, Value};
pub use raw::Tag;
pub use view::{DocumentView, Elements};
