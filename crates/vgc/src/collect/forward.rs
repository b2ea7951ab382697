//! Forwarding Module - Discovery and Relocation
//!
//! `forward` moves one root's reachable subgraph into the to-space. It is
//! the first collection pass, applied once per root slot:
//!
//! - references outside the from-space (null, metadata, already-moved)
//!   come back unchanged;
//! - a from-space block is copied to the to-space cursor exactly once,
//!   with its header's forwarding slot overwritten in place so later
//!   sightings reuse the copy;
//! - object fields are traversed through the class descriptor, array
//!   elements are never traversed.
//!
//! Traversal is iterative over an explicit worklist (LIFO), so deep or
//! cyclic graphs cost heap memory, not native stack. Copies land in the
//! to-space with their original field bytes intact; rewriting those
//! fields to the new addresses is the fix-up scan's job, not ours.

use crate::heap::Heap;
use crate::object::descriptor::Descriptor;
use crate::object::{block_size, header};

/// Relocate the subgraph reachable from `addr`; return its new address
///
/// `forwarded` is incremented once per block moved (objects and arrays
/// alike). Passing a reference that needs no move returns it as-is and
/// leaves the count alone.
pub fn forward(heap: &mut Heap, addr: usize, forwarded: &mut usize) -> usize {
    if !heap.in_from_space(addr) {
        return addr;
    }

    let mut worklist = vec![addr];
    while let Some(block) = worklist.pop() {
        if !heap.in_from_space(block) || header::is_forwarded(heap, block) {
            continue;
        }
        relocate_block(heap, block, &mut worklist);
        *forwarded += 1;
    }

    header::forwarding(heap, addr)
}

/// Copy one block to the to-space cursor and queue its outgoing references
fn relocate_block(heap: &mut Heap, block: usize, worklist: &mut Vec<usize>) {
    let size = block_size(heap, block);
    let dst = heap.to_next();

    if !header::is_array(heap, block) {
        let desc = Descriptor::of_object(heap, block);
        for (kind, offset) in desc.field_offsets(heap) {
            if kind.is_reference() {
                worklist.push(heap.word(block + offset));
            }
        }
    }

    heap.copy(block, dst, size);
    header::set_forwarding(heap, block, dst);
    heap.advance_to_next(size);
}
