//! Type Descriptor Module - Per-Class Reference Layout
//!
//! A type descriptor tells the collector which fields of a class hold
//! references and which hold scalars. Descriptors live in the metadata
//! region as NUL-terminated tag strings, one byte per field, in physical
//! field order:
//!
//! ```text
//! b'1' = reference field (word-width)
//! b'0' = scalar field (int-width)
//! 0    = terminator
//! ```
//!
//! They are reached indirectly: an object header holds a vtable reference,
//! and the vtable's first word points at the descriptor.
//!
//! Precondition: a descriptor's tag count and order must exactly match the
//! physical field layout of every object whose vtable resolves to it, and
//! its bytes must be drawn from the alphabet above. The interpreter trusts
//! this; mismatches are checked only by `debug_assert!`.

use std::iter::FusedIterator;

use crate::error::Result;
use crate::heap::{Heap, INT_SIZE, WORD_SIZE};
use crate::object::header;

/// Descriptor tag for a scalar field
pub const TAG_SCALAR: u8 = b'0';
/// Descriptor tag for a reference field
pub const TAG_REFERENCE: u8 = b'1';
/// Descriptor terminator byte
pub const TAG_TERMINATOR: u8 = 0;

/// Kind of one object field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Int-width payload the collector never follows
    Scalar,
    /// Word-width heap reference the collector relocates and rewrites
    Reference,
}

impl FieldKind {
    /// Decode a descriptor tag byte
    pub fn from_tag(tag: u8) -> Option<FieldKind> {
        match tag {
            TAG_SCALAR => Some(FieldKind::Scalar),
            TAG_REFERENCE => Some(FieldKind::Reference),
            _ => None,
        }
    }

    /// Encode as a descriptor tag byte
    pub fn tag(self) -> u8 {
        match self {
            FieldKind::Scalar => TAG_SCALAR,
            FieldKind::Reference => TAG_REFERENCE,
        }
    }

    /// Field width in bytes
    #[inline]
    pub fn width(self) -> usize {
        match self {
            FieldKind::Scalar => INT_SIZE,
            FieldKind::Reference => WORD_SIZE,
        }
    }

    /// True for `Reference`
    #[inline]
    pub fn is_reference(self) -> bool {
        matches!(self, FieldKind::Reference)
    }
}

#[inline]
fn decode(tag: u8) -> FieldKind {
    debug_assert!(
        tag == TAG_SCALAR || tag == TAG_REFERENCE,
        "invalid descriptor tag {:#04x}",
        tag
    );
    if tag == TAG_REFERENCE {
        FieldKind::Reference
    } else {
        FieldKind::Scalar
    }
}

/// Resolved view of one descriptor in the arena
///
/// Cheap to copy; holds the descriptor's address and pre-scanned length
/// (tag count, excluding the terminator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    addr: usize,
    len: usize,
}

impl Descriptor {
    /// Read the descriptor whose tags start at `addr`
    ///
    /// Scans forward to the NUL terminator; the terminator must exist
    /// within the arena.
    pub fn read(heap: &Heap, addr: usize) -> Self {
        let mut len = 0;
        while heap.byte(addr + len) != TAG_TERMINATOR {
            len += 1;
        }
        Self { addr, len }
    }

    /// Resolve a descriptor through a vtable reference
    ///
    /// The vtable's first word is the descriptor address.
    pub fn of_class(heap: &Heap, class_ref: usize) -> Self {
        Self::read(heap, heap.word(class_ref))
    }

    /// Resolve the descriptor of the object block at `block`
    pub fn of_object(heap: &Heap, block: usize) -> Self {
        debug_assert_eq!(
            header::kind(heap, block),
            header::KIND_OBJECT,
            "descriptor lookup on a non-object block"
        );
        Self::of_class(heap, header::class_ref(heap, block))
    }

    /// Arena address of the first tag byte
    #[inline]
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// Number of fields
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the class has no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Kind of field `index`
    pub fn field(&self, heap: &Heap, index: usize) -> FieldKind {
        debug_assert!(index < self.len, "field index out of range");
        decode(heap.byte(self.addr + index))
    }

    /// Total block size for an instance of this class
    ///
    /// Header plus the packed widths of every field.
    pub fn object_size(&self, heap: &Heap) -> usize {
        header::HEADER_SIZE + self.fields(heap).map(FieldKind::width).sum::<usize>()
    }

    /// Iterate the field kinds in physical order
    pub fn fields<'h>(&self, heap: &'h Heap) -> Fields<'h> {
        Fields {
            heap,
            addr: self.addr,
            index: 0,
            len: self.len,
        }
    }

    /// Iterate `(kind, byte offset within the block)` in physical order
    ///
    /// Offsets start at `HEADER_SIZE` and advance by each field's width;
    /// this is the collector's map of where the reference slots sit.
    pub fn field_offsets<'h>(&self, heap: &'h Heap) -> FieldOffsets<'h> {
        FieldOffsets {
            fields: self.fields(heap),
            offset: header::HEADER_SIZE,
        }
    }
}

/// Write `fields` as NUL-terminated tag bytes into the metadata region
///
/// Returns the descriptor's address. Shared by the class installer and the
/// frame builder.
///
/// # Errors
///
/// Returns `StaticRegionFull` when the tag bytes do not fit.
pub fn install(heap: &mut Heap, fields: &[FieldKind]) -> Result<usize> {
    let mut tags: Vec<u8> = fields.iter().map(|f| f.tag()).collect();
    tags.push(TAG_TERMINATOR);
    let addr = heap.static_alloc(tags.len())?;
    heap.write_bytes(addr, &tags);
    Ok(addr)
}

/// Iterator over a descriptor's field kinds
pub struct Fields<'h> {
    heap: &'h Heap,
    addr: usize,
    index: usize,
    len: usize,
}

impl Iterator for Fields<'_> {
    type Item = FieldKind;

    fn next(&mut self) -> Option<FieldKind> {
        if self.index >= self.len {
            return None;
        }
        let kind = decode(self.heap.byte(self.addr + self.index));
        self.index += 1;
        Some(kind)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Fields<'_> {}
impl FusedIterator for Fields<'_> {}

/// Iterator over `(field kind, block-relative byte offset)` pairs
pub struct FieldOffsets<'h> {
    fields: Fields<'h>,
    offset: usize,
}

impl Iterator for FieldOffsets<'_> {
    type Item = (FieldKind, usize);

    fn next(&mut self) -> Option<(FieldKind, usize)> {
        let kind = self.fields.next()?;
        let offset = self.offset;
        self.offset += kind.width();
        Some((kind, offset))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fields.size_hint()
    }
}

impl ExactSizeIterator for FieldOffsets<'_> {}
impl FusedIterator for FieldOffsets<'_> {}
