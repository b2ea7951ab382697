//! Object Header Module - Block Layout
//!
//! Every allocated block (object or array) starts with the same fixed
//! header, laid out to match what the code generator emits:
//!
//! ```text
//! offset  0                8         12        16               24
//!         +----------------+---------+---------+----------------+--------
//!         | class/vtable   | kind    | length  | forwarding     | payload
//!         | ref (word)     | (int)   | (int)   | ref (word)     |
//!         +----------------+---------+---------+----------------+--------
//! ```
//!
//! Objects carry their vtable reference and a zero length; arrays carry a
//! null vtable reference, kind 1, and the element count. The forwarding
//! reference is null until the collector relocates the block, after which
//! it holds the block's new to-space address.
//!
//! Payloads are packed: reference fields are word-width, scalar fields and
//! array elements are int-width, and blocks sit back-to-back with no
//! padding, so block bases are not necessarily word-aligned.

use crate::heap::{Heap, INT_SIZE, NULL_REF, WORD_SIZE};

/// Offset of the class/vtable reference word
pub const CLASS_OFFSET: usize = 0;
/// Offset of the kind tag
pub const KIND_OFFSET: usize = WORD_SIZE;
/// Offset of the array length
pub const LENGTH_OFFSET: usize = KIND_OFFSET + INT_SIZE;
/// Offset of the forwarding reference word
pub const FORWARDING_OFFSET: usize = LENGTH_OFFSET + INT_SIZE;
/// Total header size; the payload starts here
pub const HEADER_SIZE: usize = FORWARDING_OFFSET + WORD_SIZE;

/// Kind tag for class instances
pub const KIND_OBJECT: i32 = 0;
/// Kind tag for integer arrays
pub const KIND_ARRAY: i32 = 1;

/// Width of one array element in bytes
pub const ELEMENT_SIZE: usize = INT_SIZE;

/// Class/vtable reference of the block at `block`
#[inline]
pub fn class_ref(heap: &Heap, block: usize) -> usize {
    heap.word(block + CLASS_OFFSET)
}

/// Kind tag of the block at `block`
#[inline]
pub fn kind(heap: &Heap, block: usize) -> i32 {
    heap.int(block + KIND_OFFSET)
}

/// Array length of the block at `block` (zero for objects)
#[inline]
pub fn length(heap: &Heap, block: usize) -> i32 {
    heap.int(block + LENGTH_OFFSET)
}

/// Forwarding reference of the block at `block`
#[inline]
pub fn forwarding(heap: &Heap, block: usize) -> usize {
    heap.word(block + FORWARDING_OFFSET)
}

/// Record the block's relocated address in its (old) header
#[inline]
pub fn set_forwarding(heap: &mut Heap, block: usize, new_addr: usize) {
    heap.set_word(block + FORWARDING_OFFSET, new_addr);
}

/// True if the block is an array
#[inline]
pub fn is_array(heap: &Heap, block: usize) -> bool {
    kind(heap, block) == KIND_ARRAY
}

/// True if the block has been relocated this cycle
#[inline]
pub fn is_forwarded(heap: &Heap, block: usize) -> bool {
    forwarding(heap, block) != NULL_REF
}

/// Write a fresh object header
pub fn init_object_header(heap: &mut Heap, block: usize, class_ref: usize) {
    heap.set_word(block + CLASS_OFFSET, class_ref);
    heap.set_int(block + KIND_OFFSET, KIND_OBJECT);
    heap.set_int(block + LENGTH_OFFSET, 0);
    heap.set_word(block + FORWARDING_OFFSET, NULL_REF);
}

/// Write a fresh array header
pub fn init_array_header(heap: &mut Heap, block: usize, length: i32) {
    heap.set_word(block + CLASS_OFFSET, NULL_REF);
    heap.set_int(block + KIND_OFFSET, KIND_ARRAY);
    heap.set_int(block + LENGTH_OFFSET, length);
    heap.set_word(block + FORWARDING_OFFSET, NULL_REF);
}

/// Address of the first payload byte
#[inline]
pub fn field_base(block: usize) -> usize {
    block + HEADER_SIZE
}

/// Address of array element `index`
#[inline]
pub fn element_addr(block: usize, index: usize) -> usize {
    block + HEADER_SIZE + index * ELEMENT_SIZE
}

/// Size in bytes of an array block holding `length` elements
#[inline]
pub const fn array_size(length: usize) -> usize {
    HEADER_SIZE + length * ELEMENT_SIZE
}
