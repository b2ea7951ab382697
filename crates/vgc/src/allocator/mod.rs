//! Allocator Module - Block Emission
//!
//! Bump-pointer block writers for the from-space. These are the
//! mechanics only: the caller has already decided the allocation is
//! admissible (size fits the remaining from-space), typically after
//! giving the collector one chance to make room.
//!
//! Every new block is zero-filled before its header is written, so
//! fresh object fields read as null/zero and fresh array elements read
//! as zero no matter what the space held before. Blocks are packed
//! back-to-back with no padding.

use crate::heap::Heap;
use crate::object::header;

/// Write a zeroed object block of `size` bytes for `class_ref`
///
/// `size` must be the descriptor-computed instance size and must fit the
/// remaining from-space. Returns the block's base address.
pub fn write_object_block(heap: &mut Heap, class_ref: usize, size: usize) -> usize {
    debug_assert!(size >= header::HEADER_SIZE, "object smaller than its header");
    let block = heap.bump_from(size);
    heap.zero(block, size);
    header::init_object_header(heap, block, class_ref);
    block
}

/// Write a zeroed array block for `length` elements
///
/// The caller has bounded `length` to the header's int-width length
/// field and checked the size fits. Returns the block's base address.
pub fn write_array_block(heap: &mut Heap, length: usize) -> usize {
    debug_assert!(i32::try_from(length).is_ok(), "array length exceeds header field");
    let size = header::array_size(length);
    let block = heap.bump_from(size);
    heap.zero(block, size);
    header::init_array_header(heap, block, length as i32);
    block
}
