//! Read-only document views and their iterator.

use core::iter::FusedIterator;
use core::ptr;

use crate::element::Element;
use crate::raw;

/// The canonical empty document: a length prefix of five, no elements, and
/// the terminator.
const EMPTY: [u8; 5] = [5, 0, 0, 0, 0];

/// A read-only, non-owning view of a BSON document.
///
/// A view wraps a caller-supplied buffer without copying it. The buffer
/// must outlive the view and every iterator and element derived from it
/// (enforced by the borrow), and must hold a validly-framed document: a
/// little-endian length prefix, encoded elements, and a terminating zero
/// byte. Framing is not verified at construction but lazily during
/// traversal, where malformed bytes are a precondition violation and panic.
/// Use [`raw::element`] to walk an untrusted buffer fallibly instead.
///
/// Two views compare equal when their buffers are byte-for-byte identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentView<'a> {
    bytes: &'a [u8],
}

impl Default for DocumentView<'_> {
    /// A view of the canonical empty document.
    fn default() -> Self {
        Self { bytes: &EMPTY }
    }
}

impl<'a> DocumentView<'a> {
    /// Wrap a buffer holding an encoded document.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The raw bytes of the underlying document.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The length of the underlying document, in bytes.
    ///
    /// This is not the number of elements in the document; to compute that,
    /// count the iterator.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document holds no elements, i.e. it is equivalent to the
    /// trivial document `{}`.
    pub fn is_empty(&self) -> bool {
        self.bytes.len() == EMPTY.len()
    }

    /// Iterate over the document's elements in encoding order.
    ///
    /// Each call restarts from the first element and yields the same
    /// sequence. Iteration covers only the top level: embedded documents
    /// and arrays are yielded as views and not entered.
    pub fn iter(&self) -> Elements<'a> {
        Elements {
            bytes: self.bytes,
            offset: size_of::<i32>(),
        }
    }

    /// Position an iterator at the first element with the given key.
    ///
    /// Keys are compared byte for byte, and only the top level is searched;
    /// the runtime is linear in the length of the document. Keys are not
    /// required to be unique, and the first match in encoding order wins.
    /// The returned iterator yields the matching element and then the
    /// remainder of the document, or nothing if no element matches.
    pub fn find(&self, key: &str) -> Elements<'a> {
        let mut position = self.iter();

        loop {
            let at = position.clone();

            match position.next() {
                Some(element) if element.key() == key => return at,
                Some(_) => {}
                None => return position,
            }
        }
    }

    /// Look up the first element with the given key.
    ///
    /// Returns `None` if no element matches. Equivalent to
    /// `self.find(key).next()`.
    pub fn get(&self, key: &str) -> Option<Element<'a>> {
        self.find(key).next()
    }
}

impl<'a> IntoIterator for DocumentView<'a> {
    type Item = Element<'a>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Elements<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &DocumentView<'a> {
    type Item = Element<'a>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Elements<'a> {
        self.iter()
    }
}

/// A forward iterator over the elements of a document.
///
/// The iterator is a positioned cursor: its only state is a byte offset
/// into the document, so cloning it forks the position and re-creating it
/// restarts traversal. Elements are decoded lazily, one per step, and the
/// terminator byte is the past-the-end position; once reached, the iterator
/// stays exhausted.
///
/// Two iterators compare equal when they sit at the same decode position of
/// the same buffer. Exhausted iterators over one document are therefore all
/// equal, and an iterator over a byte-identical but distinct buffer is not.
///
/// # Panics
///
/// Advancing panics if the bytes at the current position do not form a
/// valid element, as wrapping a malformed buffer violates the documented
/// precondition of [`DocumentView::new`].
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl PartialEq for Elements<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.bytes, other.bytes) && self.offset == other.offset
    }
}

impl Eq for Elements<'_> {}

impl<'a> Iterator for Elements<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Element<'a>> {
        if self.bytes.get(self.offset) == Some(&0) {
            return None;
        }

        match raw::element(self.bytes, self.offset) {
            Ok(element) => {
                self.offset += element.raw().len();
                Some(element)
            }
            Err(err) => panic!("malformed document: {err}"),
        }
    }
}

impl FusedIterator for Elements<'_> {}
