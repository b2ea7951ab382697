//! Collector Facade Module - Policy and Bookkeeping
//!
//! ====================================================================
//! RESPONSIBILITIES
//! ====================================================================
//!
//! [`GarbageCollector`] owns the heap and everything registered against
//! it (class table, frame chain anchor, counters) and layers policy on
//! top of the mechanism modules:
//!
//! - allocation admission: an oversize request fails immediately, an
//!   undersize one gets exactly one collection before giving up;
//! - cycle bookkeeping: numbering, timing, per-cycle and lifetime
//!   counters, event emission;
//! - checked word/int access for embedders that hold raw references.
//!
//! The mechanism lives elsewhere: space layout in [`crate::heap`],
//! block writing in [`crate::allocator`], the copying cycle in
//! [`crate::collect`].

use indexmap::IndexMap;

use crate::allocator;
use crate::collect;
use crate::config::GcConfig;
use crate::error::{Result, VgcError};
use crate::heap::{Heap, INT_SIZE, WORD_SIZE};
use crate::logging::{log_event, GcEvent};
use crate::object::class_table::{ClassEntry, ClassTable};
use crate::object::descriptor::{Descriptor, FieldKind};
use crate::object::header;
use crate::roots::frames::FrameStack;
use crate::stats::{CycleStats, GcStats, GcTimer};

/// A complete two-space collector instance
///
/// One value owns one arena plus all the metadata registered against it.
/// All operations go through `&mut self`; the collector itself never runs
/// concurrently with the mutator.
///
/// ```
/// use vgc::{FieldKind, GarbageCollector, GcConfig};
///
/// let mut gc = GarbageCollector::new(GcConfig::default())?;
/// let point = gc.install_class("Point", &[FieldKind::Scalar, FieldKind::Scalar])?;
/// let obj = gc.allocate_instance(&point)?;
/// assert!(gc.heap().in_from_space(obj));
/// # Ok::<(), vgc::VgcError>(())
/// ```
pub struct GarbageCollector {
    heap: Heap,
    classes: ClassTable,
    frames: FrameStack,
    stats: GcStats,
    config: GcConfig,
    cycle_count: u64,
}

impl GarbageCollector {
    /// Create a collector with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for an invalid config and
    /// `HeapInitialization` if the arena cannot be mapped.
    pub fn new(config: GcConfig) -> Result<Self> {
        let heap = Heap::new(&config)?;

        log_event(GcEvent::HeapInit {
            total_size: config.heap_size,
            semi_space_size: heap.semi_space_size(),
            from_base: heap.from_base(),
            to_base: heap.to_base(),
        });
        log::info!(
            "heap initialized: {} bytes total, {} per semispace, {} static",
            config.heap_size,
            heap.semi_space_size(),
            config.static_capacity
        );

        Ok(Self {
            heap,
            classes: ClassTable::new(),
            frames: FrameStack::new(),
            stats: GcStats::new(),
            config,
            cycle_count: 0,
        })
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Allocate a zeroed object block for the class at `class_ref`
    ///
    /// `size` is the total block size the code generator computed from the
    /// class layout; it must equal the descriptor-derived instance size.
    /// May run one collection cycle to make room.
    ///
    /// # Errors
    ///
    /// Returns `OutOfMemory` when the block does not fit even after a
    /// collection, or when it could never fit a semispace at all.
    pub fn allocate_object(&mut self, class_ref: usize, size: usize) -> Result<usize> {
        debug_assert_eq!(
            size,
            Descriptor::of_class(&self.heap, class_ref).object_size(&self.heap),
            "object size disagrees with the class descriptor"
        );

        self.admit(size)?;
        let block = allocator::write_object_block(&mut self.heap, class_ref, size);
        self.note_allocation(block, size, "object");
        Ok(block)
    }

    /// Allocate a zeroed instance of an installed class
    ///
    /// # Errors
    ///
    /// Same as [`Self::allocate_object`].
    pub fn allocate_instance(&mut self, entry: &ClassEntry) -> Result<usize> {
        self.allocate_object(entry.class_ref, entry.object_size)
    }

    /// Allocate a zeroed int array of `length` elements
    ///
    /// May run one collection cycle to make room.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `length` does not fit the header's
    /// length field, otherwise the same errors as [`Self::allocate_object`].
    pub fn allocate_array(&mut self, length: usize) -> Result<usize> {
        if i32::try_from(length).is_err() {
            return Err(VgcError::InvalidArgument(format!(
                "array length {} exceeds the header length field",
                length
            )));
        }

        let size = header::array_size(length);
        self.admit(size)?;
        let block = allocator::write_array_block(&mut self.heap, length);
        self.note_allocation(block, size, "array");
        Ok(block)
    }

    /// Decide whether a `size`-byte block may be written right now
    ///
    /// A request larger than a whole semispace is refused outright, since
    /// no amount of collecting could ever satisfy it. Otherwise a full
    /// from-space earns exactly one collection; whatever room exists after
    /// that is final.
    fn admit(&mut self, size: usize) -> Result<()> {
        if size > self.heap.semi_space_size() {
            return Err(self.allocation_failure(size));
        }

        if self.heap.remaining() < size {
            self.collect();
            if self.heap.remaining() < size {
                return Err(self.allocation_failure(size));
            }
        }

        Ok(())
    }

    fn allocation_failure(&self, requested: usize) -> VgcError {
        let available = self.heap.remaining();
        log_event(GcEvent::AllocationFailure {
            requested,
            available,
        });
        log::error!(
            "out of memory: {} bytes requested, {} available in a {}-byte semispace",
            requested,
            available,
            self.heap.semi_space_size()
        );
        VgcError::OutOfMemory {
            requested,
            available,
        }
    }

    fn note_allocation(&mut self, block: usize, size: usize, kind: &'static str) {
        self.stats.record_allocation(size);
        if self.config.log_allocations {
            log_event(GcEvent::Allocation {
                address: block,
                size,
                kind,
            });
            log::trace!("allocated {} at {:#x} ({} bytes)", kind, block, size);
        }
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// Run one stop-the-world collection cycle
    ///
    /// Always succeeds: an empty root set simply reclaims the whole
    /// from-space. Returns what the cycle accomplished.
    pub fn collect(&mut self) -> CycleStats {
        self.cycle_count += 1;
        let cycle = self.cycle_count;
        let used_before = self.heap.used_bytes();

        log_event(GcEvent::CycleStart {
            cycle,
            used_bytes: used_before,
        });
        let timer = GcTimer::new();

        let outcome = collect::run_cycle(&mut self.heap, self.frames.current());

        let stats = CycleStats {
            cycle,
            forwarded: outcome.forwarded,
            live_bytes: outcome.live_bytes,
            reclaimed_bytes: used_before - outcome.live_bytes,
            duration: timer.elapsed(),
        };
        self.stats.record_collection(&stats);

        log::debug!(
            "cycle {}: {} frames, {} root slots, {} blocks forwarded, {} bytes reclaimed",
            cycle,
            outcome.roots.frames,
            outcome.roots.reference_slots,
            outcome.forwarded,
            stats.reclaimed_bytes
        );
        log_event(GcEvent::CycleEnd {
            cycle,
            forwarded: stats.forwarded,
            live_bytes: stats.live_bytes,
            reclaimed_bytes: stats.reclaimed_bytes,
            duration_us: stats.duration.as_micros() as u64,
        });

        stats
    }

    // ========================================================================
    // Classes and frames
    // ========================================================================

    /// Install a class layout; see [`ClassTable::install`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a duplicate name and
    /// `StaticRegionFull` when the metadata region is exhausted.
    pub fn install_class(&mut self, name: &str, fields: &[FieldKind]) -> Result<ClassEntry> {
        self.classes.install(&mut self.heap, name, fields)
    }

    /// Look up an installed class by name
    pub fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    /// Push a frame record; see [`FrameStack::push`]
    ///
    /// # Errors
    ///
    /// Returns `StaticRegionFull` when the metadata region is exhausted.
    pub fn push_frame(&mut self, args: &[FieldKind], locals: &[FieldKind]) -> Result<usize> {
        self.frames.push(&mut self.heap, args, locals)
    }

    /// Pop the innermost frame record
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when no frame is live.
    pub fn pop_frame(&mut self) -> Result<()> {
        self.frames.pop(&self.heap)
    }

    /// The frame-chain anchor the next collection will walk
    pub fn current_frame(&self) -> usize {
        self.frames.current()
    }

    /// Point the anchor at an externally built frame chain
    pub fn set_current_frame(&mut self, frame: usize) {
        self.frames.set_current(frame);
    }

    // ========================================================================
    // Checked access
    // ========================================================================

    /// Read a word, rejecting the guard word and out-of-arena addresses
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` when `[addr, addr + 8)` is not a readable
    /// arena range.
    pub fn read_word(&self, addr: usize) -> Result<usize> {
        self.check_range(addr, WORD_SIZE)?;
        Ok(self.heap.word(addr))
    }

    /// Write a word, rejecting the guard word and out-of-arena addresses
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` when `[addr, addr + 8)` is not a writable
    /// arena range.
    pub fn write_word(&mut self, addr: usize, value: usize) -> Result<()> {
        self.check_range(addr, WORD_SIZE)?;
        self.heap.set_word(addr, value);
        Ok(())
    }

    /// Read an int, with the same checks as [`Self::read_word`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` when `[addr, addr + 4)` is not a readable
    /// arena range.
    pub fn read_int(&self, addr: usize) -> Result<i32> {
        self.check_range(addr, INT_SIZE)?;
        Ok(self.heap.int(addr))
    }

    /// Write an int, with the same checks as [`Self::write_word`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` when `[addr, addr + 4)` is not a writable
    /// arena range.
    pub fn write_int(&mut self, addr: usize, value: i32) -> Result<()> {
        self.check_range(addr, INT_SIZE)?;
        self.heap.set_int(addr, value);
        Ok(())
    }

    fn check_range(&self, addr: usize, width: usize) -> Result<()> {
        // The guard word below the metadata region is never a valid target.
        if addr < WORD_SIZE || !self.heap.contains_range(addr, width) {
            return Err(VgcError::InvalidAddress { address: addr });
        }
        Ok(())
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The underlying heap (geometry, cursors, raw access)
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Lifetime counters
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// The configuration this collector was built with
    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Collection cycles run so far
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Installed classes
    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Snapshot of the collector state for debugging and tooling
    pub fn diagnostics(&self) -> IndexMap<String, String> {
        let mut info = IndexMap::new();
        info.insert("heap_size".to_string(), self.config.heap_size.to_string());
        info.insert(
            "semi_space_size".to_string(),
            self.heap.semi_space_size().to_string(),
        );
        info.insert(
            "static_capacity".to_string(),
            self.config.static_capacity.to_string(),
        );
        info.insert("used_bytes".to_string(), self.heap.used_bytes().to_string());
        info.insert("remaining".to_string(), self.heap.remaining().to_string());
        info.insert("static_used".to_string(), self.heap.static_used().to_string());
        info.insert("classes".to_string(), self.classes.len().to_string());
        info.insert("cycles".to_string(), self.cycle_count.to_string());
        info.insert(
            "allocations".to_string(),
            self.stats.allocations.to_string(),
        );
        info.insert(
            "allocated_bytes".to_string(),
            self.stats.allocated_bytes.to_string(),
        );
        info.insert(
            "total_forwarded".to_string(),
            self.stats.total_forwarded.to_string(),
        );
        info.insert(
            "peak_live_bytes".to_string(),
            self.stats.peak_live_bytes.to_string(),
        );
        info
    }
}

impl std::fmt::Debug for GarbageCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GarbageCollector")
            .field("heap", &self.heap)
            .field("classes", &self.classes.len())
            .field("cycles", &self.cycle_count)
            .finish()
    }
}
