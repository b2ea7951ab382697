//! Object Module - Headers, Descriptors, and Classes
//!
//! Everything the collector knows about block layout lives here:
//! - [`header`] - the fixed header every block starts with
//! - [`descriptor`] - the per-class reference-layout interpreter
//! - [`class_table`] - installs vtables/descriptors into the metadata region

pub mod class_table;
pub mod descriptor;
pub mod header;

pub use class_table::{ClassEntry, ClassTable};
pub use descriptor::{Descriptor, FieldKind};
pub use header::{HEADER_SIZE, KIND_ARRAY, KIND_OBJECT};

use crate::heap::Heap;

/// Size in bytes of the block at `block`, dispatched on its kind
///
/// Objects are sized through their descriptor; arrays from their length.
/// This is the collector's single sizing entry point for copying and for
/// walking the to-space.
pub fn block_size(heap: &Heap, block: usize) -> usize {
    if header::is_array(heap, block) {
        header::array_size(header::length(heap, block) as usize)
    } else {
        Descriptor::of_object(heap, block).object_size(heap)
    }
}
