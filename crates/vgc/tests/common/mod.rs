//! Test Utilities for the VGC Test Suite
//!
//! Shared fixture and strict assertion helpers. The helpers panic with a
//! diagnosis of the bug class they exist to catch; tests pass a short
//! context string so a failure names its scenario.

use std::collections::HashSet;

use vgc::object::header::{element_addr, HEADER_SIZE};
use vgc::object::Descriptor;
use vgc::roots::frames;
use vgc::{ClassEntry, FieldKind, GarbageCollector, GcConfig};

/// Heap size used by the canonical collection scenarios
pub const SCENARIO_HEAP: usize = 4096;

/// Metadata capacity used by the canonical collection scenarios
pub const SCENARIO_STATIC: usize = 4096;

/// ============================================================================
/// GC FIXTURE
/// ============================================================================

/// One collector plus convenience wrappers for building object graphs
///
/// Tags follow the descriptor encoding: `'1'` reference, `'0'` scalar,
/// so `fx.install("Node", "10")` is a class with a reference field then
/// a scalar field.
pub struct GcFixture {
    pub gc: GarbageCollector,
}

impl GcFixture {
    /// Fixture with a roomy heap for graph-shape tests
    ///
    /// **Bug this finds:** initialization failures, config validation bugs
    pub fn with_defaults() -> Self {
        Self::with_heap(64 * 1024, 16 * 1024)
    }

    /// Fixture sized like the canonical scenarios (2048-byte semispaces)
    ///
    /// **Bug this finds:** admission-policy bugs that only show near the
    /// space boundary
    pub fn scenario_sized() -> Self {
        Self::with_heap(SCENARIO_HEAP, SCENARIO_STATIC)
    }

    /// Fixture with explicit heap and metadata sizes
    pub fn with_heap(heap_size: usize, static_capacity: usize) -> Self {
        let gc = GarbageCollector::new(GcConfig {
            heap_size,
            static_capacity,
            ..Default::default()
        })
        .expect("collector initialization should succeed with a valid config");
        Self { gc }
    }

    /// Install a class from a tag string
    pub fn install(&mut self, name: &str, tags: &str) -> ClassEntry {
        self.gc
            .install_class(name, &fields_from_tags(tags))
            .unwrap_or_else(|e| panic!("installing class {:?} failed: {}", name, e))
    }

    /// Allocate an instance of a previously installed class
    ///
    /// **Bug this finds:** admission failures that should not happen,
    /// class-table lookup bugs
    pub fn alloc(&mut self, name: &str) -> usize {
        let entry = self
            .gc
            .class(name)
            .unwrap_or_else(|| panic!("class {:?} is not installed", name))
            .clone();
        self.gc
            .allocate_instance(&entry)
            .unwrap_or_else(|e| panic!("allocating {:?} failed: {}", name, e))
    }

    /// Allocate an int array
    pub fn alloc_array(&mut self, length: usize) -> usize {
        self.gc
            .allocate_array(length)
            .unwrap_or_else(|e| panic!("allocating int[{}] failed: {}", length, e))
    }

    /// Push a frame described by two tag strings (arguments, locals)
    pub fn push_frame(&mut self, arg_tags: &str, local_tags: &str) -> usize {
        self.gc
            .push_frame(&fields_from_tags(arg_tags), &fields_from_tags(local_tags))
            .expect("pushing a frame should succeed")
    }

    /// Address of argument slot `index` of `frame`
    pub fn arg_slot(&self, frame: usize, index: usize) -> usize {
        frames::arg_slot_addr(self.gc.heap(), frame, index)
    }

    /// Address of local slot `index` of `frame`
    pub fn local_slot(&self, frame: usize, index: usize) -> usize {
        frames::local_slot_addr(self.gc.heap(), frame, index)
    }

    pub fn set_arg(&mut self, frame: usize, index: usize, value: usize) {
        let slot = self.arg_slot(frame, index);
        self.gc.write_word(slot, value).expect("argument slot write");
    }

    pub fn set_local(&mut self, frame: usize, index: usize, value: usize) {
        let slot = self.local_slot(frame, index);
        self.gc.write_word(slot, value).expect("local slot write");
    }

    pub fn arg(&self, frame: usize, index: usize) -> usize {
        self.gc
            .read_word(self.arg_slot(frame, index))
            .expect("argument slot read")
    }

    pub fn local(&self, frame: usize, index: usize) -> usize {
        self.gc
            .read_word(self.local_slot(frame, index))
            .expect("local slot read")
    }

    /// Address of field `index` of the object at `block`, per its descriptor
    pub fn field_addr(&self, block: usize, index: usize) -> usize {
        let heap = self.gc.heap();
        let desc = Descriptor::of_object(heap, block);
        let (_, offset) = desc
            .field_offsets(heap)
            .nth(index)
            .unwrap_or_else(|| panic!("object at {:#x} has no field {}", block, index));
        block + offset
    }

    /// Write a reference field (word-width)
    pub fn set_field(&mut self, block: usize, index: usize, value: usize) {
        let addr = self.field_addr(block, index);
        self.gc.write_word(addr, value).expect("field write");
    }

    /// Read a reference field (word-width)
    pub fn field(&self, block: usize, index: usize) -> usize {
        self.gc.read_word(self.field_addr(block, index)).expect("field read")
    }

    /// Write a scalar field (int-width)
    pub fn set_scalar_field(&mut self, block: usize, index: usize, value: i32) {
        let addr = self.field_addr(block, index);
        self.gc.write_int(addr, value).expect("scalar field write");
    }

    /// Read a scalar field (int-width)
    pub fn scalar_field(&self, block: usize, index: usize) -> i32 {
        self.gc.read_int(self.field_addr(block, index)).expect("scalar field read")
    }

    /// Write array element `index`
    pub fn set_element(&mut self, array: usize, index: usize, value: i32) {
        self.gc
            .write_int(element_addr(array, index), value)
            .expect("element write");
    }

    /// Read array element `index`
    pub fn element(&self, array: usize, index: usize) -> i32 {
        self.gc
            .read_int(element_addr(array, index))
            .expect("element read")
    }
}

/// Decode a descriptor-style tag string into field kinds
pub fn fields_from_tags(tags: &str) -> Vec<FieldKind> {
    tags.bytes()
        .map(|tag| FieldKind::from_tag(tag).unwrap_or_else(|| panic!("bad tag {:?}", tag as char)))
        .collect()
}

/// ============================================================================
/// STRICT ASSERTION HELPERS
/// ============================================================================

/// Assert that `addr` lies in the current from-space
///
/// **Bug this finds:** references left pointing at the old space after a
/// collection, the classic stale-pointer outcome of a missed rewrite
#[track_caller]
pub fn assert_in_live_space(gc: &GarbageCollector, addr: usize, context: &str) {
    assert!(
        gc.heap().in_from_space(addr),
        "{}: address {:#x} is outside the live space [{:#x}, {:#x}) - stale reference survived",
        context,
        addr,
        gc.heap().from_base(),
        gc.heap().from_base() + gc.heap().semi_space_size()
    );
}

/// Assert that every address is distinct
///
/// **Bug this finds:** bump cursor not advancing, blocks handed out twice
#[track_caller]
pub fn assert_all_addresses_unique(addresses: &[usize], context: &str) {
    let unique: HashSet<_> = addresses.iter().collect();
    assert_eq!(
        unique.len(),
        addresses.len(),
        "{}: {} duplicate addresses out of {} - allocator reused a block",
        context,
        addresses.len() - unique.len(),
        addresses.len()
    );
}

/// Assert that addresses only ever grow
///
/// **Bug this finds:** bump cursor regression, out-of-order allocation
#[track_caller]
pub fn assert_addresses_monotonic(addresses: &[usize], context: &str) {
    for i in 1..addresses.len() {
        assert!(
            addresses[i] > addresses[i - 1],
            "{}: address[{}] = {:#x} does not follow address[{}] = {:#x} - cursor moved backwards",
            context,
            i,
            addresses[i],
            i - 1,
            addresses[i - 1]
        );
    }
}

/// Assert that a block's payload reads as all zero
///
/// **Bug this finds:** allocation over stale bytes from reclaimed blocks
#[track_caller]
pub fn assert_payload_zeroed(gc: &GarbageCollector, block: usize, block_size: usize, context: &str) {
    for offset in HEADER_SIZE..block_size {
        let byte = gc.heap().byte(block + offset);
        assert_eq!(
            byte, 0,
            "{}: payload byte at {:#x}+{} is {:#04x}, expected zero - stale memory leaked through",
            context, block, offset, byte
        );
    }
}
