//! Collection Module - The Copying Cycle
//!
//! ====================================================================
//! CYCLE STRUCTURE
//! ====================================================================
//!
//! One stop-the-world cycle is three passes over already-known inputs
//! plus a role swap; no pass discovers work for an earlier one:
//!
//! ```text
//! pass 1  walk the frame chain; forward every rooted subgraph into
//!         the to-space (see [`forward`])
//! pass 2  rewrite each root slot through its target's forwarding ref
//! pass 3  scan the to-space run front to back; rewrite every object
//!         field that still holds a from-space address
//! swap    exchange space roles; zero the new to-space
//! ```
//!
//! ====================================================================
//! SCAN TERMINATION
//! ====================================================================
//!
//! Pass 3 has no end-pointer handed to it; it stops at the first block
//! position that reads as a terminator. Because the to-space is zeroed
//! before any relocation, the word after the last copied block is null
//! and its kind tag is zero, which no real block can exhibit: objects
//! always carry a non-null class reference (address 0 is the reserved
//! null), and arrays carry a null class reference but kind 1. The scan
//! also refuses to read a header that would straddle the space limit.
//!
//! After the scan the cursor must land exactly on the relocation
//! cursor; anything else means the to-space run has a gap.

pub mod forward;

pub use forward::forward;

use crate::heap::{Heap, NULL_REF};
use crate::object::descriptor::Descriptor;
use crate::object::{block_size, header};
use crate::roots::{self, RootStats};

/// True if the block position at `addr` reads as the end of the to-space run
///
/// A terminator is zeroed memory seen through header accessors: null class
/// reference and a zero kind tag. An array header is not a terminator even
/// though its class reference is null, because its kind tag is
/// [`header::KIND_ARRAY`].
#[inline]
pub fn is_scan_terminator(heap: &Heap, addr: usize) -> bool {
    header::class_ref(heap, addr) == NULL_REF && header::kind(heap, addr) == header::KIND_OBJECT
}

/// What one collection cycle accomplished
#[derive(Debug, Clone, Copy)]
pub struct CycleOutcome {
    /// Blocks relocated into the to-space
    pub forwarded: usize,
    /// Bytes occupied by the relocated run (the new from-space usage)
    pub live_bytes: usize,
    /// Root enumeration counts
    pub roots: RootStats,
}

/// Run one full collection cycle against the frame chain at `anchor`
///
/// On return the space roles are swapped: every live block sits in the new
/// from-space, every root slot and object field points at the new
/// addresses, and the new to-space is fully zeroed. Unreachable blocks are
/// simply left behind and erased by the zeroing.
pub fn run_cycle(heap: &mut Heap, anchor: usize) -> CycleOutcome {
    // Pass 1: relocate every rooted subgraph.
    let (slots, root_stats) = roots::collect_reference_slots(heap, anchor);
    let mut forwarded = 0;
    for &slot in &slots {
        let value = heap.word(slot);
        forward(heap, value, &mut forwarded);
    }

    // Pass 2: redirect the root slots themselves. The frame chain cannot
    // change mid-cycle, so the slot list from pass 1 is still exact.
    for &slot in &slots {
        let value = heap.word(slot);
        if heap.in_from_space(value) {
            let new_addr = header::forwarding(heap, value);
            debug_assert_ne!(new_addr, NULL_REF, "rooted block was never relocated");
            heap.set_word(slot, new_addr);
        }
    }

    // Pass 3: rewrite stale fields inside the relocated run.
    fix_up_to_space(heap);

    let live_bytes = heap.to_next() - heap.to_base();
    heap.swap_spaces();

    CycleOutcome {
        forwarded,
        live_bytes,
        roots: root_stats,
    }
}

/// Scan the relocated run and rewrite object fields to to-space addresses
fn fix_up_to_space(heap: &mut Heap) {
    let limit = heap.to_limit();
    let mut cursor = heap.to_base();

    while cursor + header::HEADER_SIZE <= limit && !is_scan_terminator(heap, cursor) {
        if !header::is_array(heap, cursor) {
            rewrite_object_fields(heap, cursor);
        }
        cursor += block_size(heap, cursor);
    }

    debug_assert_eq!(cursor, heap.to_next(), "to-space run has a gap or tail");
}

/// Rewrite every reference field of the object at `block` through the
/// forwarding reference of its (old) target
fn rewrite_object_fields(heap: &mut Heap, block: usize) {
    let desc = Descriptor::of_object(heap, block);
    let reference_offsets: Vec<usize> = desc
        .field_offsets(heap)
        .filter(|(kind, _)| kind.is_reference())
        .map(|(_, offset)| offset)
        .collect();

    for offset in reference_offsets {
        let value = heap.word(block + offset);
        if heap.in_from_space(value) {
            let new_addr = header::forwarding(heap, value);
            debug_assert_ne!(new_addr, NULL_REF, "field target was never relocated");
            heap.set_word(block + offset, new_addr);
        }
    }
}
