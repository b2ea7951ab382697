//! Root Enumeration Module - Frame Chain Walking
//!
//! ====================================================================
//! WHAT COUNTS AS A ROOT
//! ====================================================================
//!
//! The collector's only entry points into the object graph are the
//! argument and local slots of the live frame records (see [`frames`]).
//! Walking the chain from the anchor and reading each frame's two
//! descriptors yields every slot whose tag marks it as a reference;
//! those slot addresses are the collection roots.
//!
//! ```text
//! anchor -> [frame] -next-> [frame] -next-> [frame] -next-> null
//!              |               |
//!              v               v
//!          arg/local       arg/local
//!          slot areas      slot areas
//! ```
//!
//! The walk is bounded by [`MAX_FRAME_WALK`]: a corrupted chain that
//! loops back on itself would otherwise never reach the null terminator.
//! Hitting the bound logs a warning and stops the walk rather than
//! spinning forever inside a collection pause.

pub mod frames;

use std::iter::FusedIterator;

use crate::heap::{Heap, NULL_REF};
use crate::object::descriptor::Descriptor;
use crate::roots::frames::SLOT_SIZE;

/// Ceiling on the number of frames one walk will visit
pub const MAX_FRAME_WALK: usize = 1 << 20;

/// Counts gathered while enumerating roots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootStats {
    /// Frames visited
    pub frames: usize,
    /// Reference-tagged slots found across all frames
    pub reference_slots: usize,
}

/// Iterator over the frame records of a chain, innermost first
pub struct FrameIter<'h> {
    heap: &'h Heap,
    current: usize,
    visited: usize,
}

impl Iterator for FrameIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.current == NULL_REF {
            return None;
        }
        if self.visited >= MAX_FRAME_WALK {
            log::warn!(
                "frame walk stopped after {} frames; chain may be cyclic",
                self.visited
            );
            self.current = NULL_REF;
            return None;
        }
        let frame = self.current;
        self.current = frames::next(self.heap, frame);
        self.visited += 1;
        Some(frame)
    }
}

impl FusedIterator for FrameIter<'_> {}

/// Walk the frame chain starting at `anchor`
pub fn frames_from(heap: &Heap, anchor: usize) -> FrameIter<'_> {
    FrameIter {
        heap,
        current: anchor,
        visited: 0,
    }
}

/// Enumerate every reference slot reachable from `anchor`
///
/// Returns the slot addresses in walk order (innermost frame first,
/// arguments before locals within a frame) together with walk counts.
/// The addresses are slots, not their contents: the caller reads each
/// slot to get the root reference and writes it back after relocation.
pub fn collect_reference_slots(heap: &Heap, anchor: usize) -> (Vec<usize>, RootStats) {
    let mut slots = Vec::new();
    let mut stats = RootStats::default();

    for frame in frames_from(heap, anchor) {
        stats.frames += 1;
        push_region_slots(
            heap,
            frames::arg_descriptor(heap, frame),
            frames::arg_base(heap, frame),
            &mut slots,
        );
        push_region_slots(
            heap,
            frames::local_descriptor(heap, frame),
            frames::local_base(heap, frame),
            &mut slots,
        );
    }

    stats.reference_slots = slots.len();
    (slots, stats)
}

/// Push the reference-tagged slot addresses of one slot area
///
/// Every slot is word-width regardless of tag, so slot `i` sits at
/// `base + i * SLOT_SIZE`.
fn push_region_slots(heap: &Heap, descriptor_ref: usize, base: usize, out: &mut Vec<usize>) {
    let desc = Descriptor::read(heap, descriptor_ref);
    for (index, kind) in desc.fields(heap).enumerate() {
        if kind.is_reference() {
            out.push(base + index * SLOT_SIZE);
        }
    }
}
