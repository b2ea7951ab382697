//! Frame Record Module - Stack Frame Chain Layout
//!
//! Generated code publishes its live pointer slots to the collector
//! through a chain of five-word frame records:
//!
//! ```text
//! offset  0       8              16         24               32
//!         +-------+--------------+----------+----------------+------------+
//!         | next  | argument     | argument | local          | local      |
//!         |       | descriptor   | slot base| descriptor     | slot base  |
//!         +-------+--------------+----------+----------------+------------+
//! ```
//!
//! Each descriptor is a NUL-terminated tag string (same alphabet as class
//! descriptors) and each slot area is an array of word-width slots, one per
//! tag. A slot is a root exactly when its tag is `'1'`.
//!
//! [`FrameStack`] builds ABI-identical chains inside the metadata region so
//! embedders and tests can do what compiled prologue code does. Records and
//! slot areas are bump-allocated and never reclaimed on pop; the collector
//! only ever reads whatever chain the anchor currently points at.

use crate::error::{Result, VgcError};
use crate::heap::{Heap, NULL_REF, WORD_SIZE};
use crate::object::descriptor::{self, FieldKind};

/// Offset of the next-frame link
pub const NEXT_OFFSET: usize = 0;
/// Offset of the argument descriptor reference
pub const ARG_DESCRIPTOR_OFFSET: usize = WORD_SIZE;
/// Offset of the argument slot-area base
pub const ARG_BASE_OFFSET: usize = 2 * WORD_SIZE;
/// Offset of the local descriptor reference
pub const LOCAL_DESCRIPTOR_OFFSET: usize = 3 * WORD_SIZE;
/// Offset of the local slot-area base
pub const LOCAL_BASE_OFFSET: usize = 4 * WORD_SIZE;
/// Size of one frame record
pub const FRAME_RECORD_SIZE: usize = 5 * WORD_SIZE;

/// Width of one argument/local slot
pub const SLOT_SIZE: usize = WORD_SIZE;

/// Next-frame link of the record at `frame`
#[inline]
pub fn next(heap: &Heap, frame: usize) -> usize {
    heap.word(frame + NEXT_OFFSET)
}

/// Argument descriptor reference of the record at `frame`
#[inline]
pub fn arg_descriptor(heap: &Heap, frame: usize) -> usize {
    heap.word(frame + ARG_DESCRIPTOR_OFFSET)
}

/// Argument slot-area base of the record at `frame`
#[inline]
pub fn arg_base(heap: &Heap, frame: usize) -> usize {
    heap.word(frame + ARG_BASE_OFFSET)
}

/// Local descriptor reference of the record at `frame`
#[inline]
pub fn local_descriptor(heap: &Heap, frame: usize) -> usize {
    heap.word(frame + LOCAL_DESCRIPTOR_OFFSET)
}

/// Local slot-area base of the record at `frame`
#[inline]
pub fn local_base(heap: &Heap, frame: usize) -> usize {
    heap.word(frame + LOCAL_BASE_OFFSET)
}

/// Address of argument slot `index` of the record at `frame`
#[inline]
pub fn arg_slot_addr(heap: &Heap, frame: usize, index: usize) -> usize {
    arg_base(heap, frame) + index * SLOT_SIZE
}

/// Address of local slot `index` of the record at `frame`
#[inline]
pub fn local_slot_addr(heap: &Heap, frame: usize, index: usize) -> usize {
    local_base(heap, frame) + index * SLOT_SIZE
}

/// Owner of the frame-chain anchor, with a builder for test/embedder chains
///
/// The anchor is the single pointer the collector starts every root walk
/// from. `push`/`pop` maintain it for chains built here; `set_current`
/// accepts an externally built chain wholesale.
#[derive(Debug)]
pub struct FrameStack {
    current: usize,
}

impl FrameStack {
    /// Empty chain
    pub fn new() -> Self {
        Self { current: NULL_REF }
    }

    /// The anchor: innermost live frame, or `NULL_REF`
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// True if no frame is live
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current == NULL_REF
    }

    /// Point the anchor at an externally built chain
    pub fn set_current(&mut self, frame: usize) {
        self.current = frame;
    }

    /// Build and link a new innermost frame
    ///
    /// Writes both descriptors, one zeroed word-width slot per tag, and the
    /// record itself into the metadata region, then moves the anchor.
    /// Returns the record's address.
    ///
    /// # Errors
    ///
    /// Returns `StaticRegionFull` when the metadata region cannot hold the
    /// frame.
    pub fn push(
        &mut self,
        heap: &mut Heap,
        args: &[FieldKind],
        locals: &[FieldKind],
    ) -> Result<usize> {
        let arg_desc = descriptor::install(heap, args)?;
        let local_desc = descriptor::install(heap, locals)?;
        let arg_slots = heap.static_alloc(args.len() * SLOT_SIZE)?;
        let local_slots = heap.static_alloc(locals.len() * SLOT_SIZE)?;

        let record = heap.static_alloc(FRAME_RECORD_SIZE)?;
        heap.set_word(record + NEXT_OFFSET, self.current);
        heap.set_word(record + ARG_DESCRIPTOR_OFFSET, arg_desc);
        heap.set_word(record + ARG_BASE_OFFSET, arg_slots);
        heap.set_word(record + LOCAL_DESCRIPTOR_OFFSET, local_desc);
        heap.set_word(record + LOCAL_BASE_OFFSET, local_slots);

        self.current = record;
        Ok(record)
    }

    /// Unlink the innermost frame
    ///
    /// The record's storage stays where it is (bump region); only the
    /// anchor moves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when no frame is live.
    pub fn pop(&mut self, heap: &Heap) -> Result<()> {
        if self.current == NULL_REF {
            return Err(VgcError::InvalidArgument(
                "pop on an empty frame stack".to_string(),
            ));
        }
        self.current = next(heap, self.current);
        Ok(())
    }
}

impl Default for FrameStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GcConfig;
    use crate::object::descriptor::Descriptor;

    fn heap() -> Heap {
        Heap::new(&GcConfig {
            heap_size: 4096,
            static_capacity: 2048,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_record_layout_constants() {
        assert_eq!(NEXT_OFFSET, 0);
        assert_eq!(ARG_DESCRIPTOR_OFFSET, 8);
        assert_eq!(ARG_BASE_OFFSET, 16);
        assert_eq!(LOCAL_DESCRIPTOR_OFFSET, 24);
        assert_eq!(LOCAL_BASE_OFFSET, 32);
        assert_eq!(FRAME_RECORD_SIZE, 40);
    }

    #[test]
    fn test_push_writes_record() {
        let mut heap = heap();
        let mut stack = FrameStack::new();

        let frame = stack
            .push(
                &mut heap,
                &[FieldKind::Reference, FieldKind::Scalar],
                &[FieldKind::Reference],
            )
            .unwrap();

        assert_eq!(stack.current(), frame);
        assert_eq!(next(&heap, frame), NULL_REF);

        let arg_desc = Descriptor::read(&heap, arg_descriptor(&heap, frame));
        assert_eq!(arg_desc.len(), 2);
        let local_desc = Descriptor::read(&heap, local_descriptor(&heap, frame));
        assert_eq!(local_desc.len(), 1);

        // Fresh slots read as null.
        assert_eq!(heap.word(arg_slot_addr(&heap, frame, 0)), NULL_REF);
        assert_eq!(heap.word(arg_slot_addr(&heap, frame, 1)), NULL_REF);
        assert_eq!(heap.word(local_slot_addr(&heap, frame, 0)), NULL_REF);
    }

    #[test]
    fn test_slots_are_word_strided() {
        let mut heap = heap();
        let mut stack = FrameStack::new();
        let frame = stack
            .push(&mut heap, &[FieldKind::Scalar, FieldKind::Scalar], &[])
            .unwrap();

        let base = arg_base(&heap, frame);
        assert_eq!(arg_slot_addr(&heap, frame, 0), base);
        assert_eq!(arg_slot_addr(&heap, frame, 1), base + SLOT_SIZE);
    }

    #[test]
    fn test_push_links_chain_innermost_first() {
        let mut heap = heap();
        let mut stack = FrameStack::new();

        let outer = stack.push(&mut heap, &[], &[FieldKind::Reference]).unwrap();
        let inner = stack.push(&mut heap, &[FieldKind::Reference], &[]).unwrap();

        assert_eq!(stack.current(), inner);
        assert_eq!(next(&heap, inner), outer);
        assert_eq!(next(&heap, outer), NULL_REF);
    }

    #[test]
    fn test_pop_moves_anchor_back() {
        let mut heap = heap();
        let mut stack = FrameStack::new();

        let outer = stack.push(&mut heap, &[], &[]).unwrap();
        stack.push(&mut heap, &[], &[]).unwrap();

        stack.pop(&heap).unwrap();
        assert_eq!(stack.current(), outer);
        stack.pop(&heap).unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_on_empty_stack_fails() {
        let heap = heap();
        let mut stack = FrameStack::new();
        assert!(matches!(
            stack.pop(&heap),
            Err(VgcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_set_current_overrides_anchor() {
        let mut heap = heap();
        let mut stack = FrameStack::new();
        let frame = stack.push(&mut heap, &[], &[]).unwrap();
        stack.pop(&heap).unwrap();

        stack.set_current(frame);
        assert_eq!(stack.current(), frame);
    }

    #[test]
    fn test_slot_writes_roundtrip() {
        let mut heap = heap();
        let mut stack = FrameStack::new();
        let frame = stack
            .push(&mut heap, &[FieldKind::Reference], &[FieldKind::Reference])
            .unwrap();

        let arg_slot = arg_slot_addr(&heap, frame, 0);
        let local_slot = local_slot_addr(&heap, frame, 0);
        heap.set_word(arg_slot, 0x1234);
        heap.set_word(local_slot, 0x5678);

        assert_eq!(heap.word(arg_slot), 0x1234);
        assert_eq!(heap.word(local_slot), 0x5678);
    }
}
