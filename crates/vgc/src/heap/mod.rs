//! Heap Module - Semispace Layout and Cursors
//!
//! ====================================================================
//! ADDRESS SPACE LAYOUT
//! ====================================================================
//!
//! The heap carves one arena (see [`arena`]) into four regions:
//!
//! ```text
//! offset 0        8                heap_base         heap_base+semi    end
//! +---------------+----------------+-----------------+-----------------+
//! | guard word    | metadata       | semispace 0     | semispace 1     |
//! | (never valid) | (bump, no GC)  |                 |                 |
//! +---------------+----------------+-----------------+-----------------+
//! ```
//!
//! The two semispaces trade the "from" and "to" roles every collection
//! cycle. Only the from-space is ever allocated into; the to-space is kept
//! fully zeroed between cycles so the collector's fix-up scan can rely on
//! zeroed memory as its terminator.
//!
//! ====================================================================
//! CURSORS
//! ====================================================================
//!
//! ```text
//! from_base      from_free             from_base+semi
//! v              v                     v
//! +--------------+---------------------+
//! | live + dead  | free (all zero)     |
//! +--------------+---------------------+
//!
//! to_base == scan start; to_next = relocation bump cursor (collector only)
//! ```
//!
//! Invariants:
//! - `from_free - from_base <= semi_space_size`
//! - `to_next - to_base <= semi_space_size`
//! - the two spaces are disjoint and equal-size
//! - `[to_next, to_base + semi_space_size)` is always zero between cycles
//! - address 0 is the reserved null value and lies in no region

pub mod arena;

pub use arena::{Arena, INT_SIZE, WORD_SIZE};

use crate::config::GcConfig;
use crate::error::{Result, VgcError};

/// The reserved null reference. Arena offset 0 holds a guard word that is
/// never handed out, so 0 can never be a legitimate block address.
pub const NULL_REF: usize = 0;

/// Two equal semispaces plus a non-collected metadata region, all backed by
/// one arena
#[derive(Debug)]
pub struct Heap {
    arena: Arena,
    semi_space_size: usize,

    static_base: usize,
    static_top: usize,
    static_limit: usize,

    from_base: usize,
    from_free: usize,

    to_base: usize,
    to_next: usize,
}

impl Heap {
    /// Create a heap per `config`
    ///
    /// The arena is `guard + static_capacity + heap_size` bytes, fully
    /// zero-filled. Both bump cursors start at their space bases.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `config` fails validation and
    /// `HeapInitialization` if the arena mapping fails.
    pub fn new(config: &GcConfig) -> Result<Self> {
        config.validate()?;

        let static_base = WORD_SIZE;
        let heap_base = static_base + config.static_capacity;
        let semi_space_size = config.heap_size / 2;
        let arena = Arena::new(heap_base + config.heap_size)?;

        Ok(Self {
            arena,
            semi_space_size,
            static_base,
            static_top: static_base,
            static_limit: heap_base,
            from_base: heap_base,
            from_free: heap_base,
            to_base: heap_base + semi_space_size,
            to_next: heap_base + semi_space_size,
        })
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Size of one semispace in bytes
    #[inline]
    pub fn semi_space_size(&self) -> usize {
        self.semi_space_size
    }

    /// Current from-space base
    #[inline]
    pub fn from_base(&self) -> usize {
        self.from_base
    }

    /// Current from-space bump cursor (first free byte)
    #[inline]
    pub fn from_free(&self) -> usize {
        self.from_free
    }

    /// Current to-space base (also the collector's scan start)
    #[inline]
    pub fn to_base(&self) -> usize {
        self.to_base
    }

    /// Current to-space relocation cursor
    #[inline]
    pub fn to_next(&self) -> usize {
        self.to_next
    }

    /// First byte past the usable to-space
    #[inline]
    pub fn to_limit(&self) -> usize {
        self.to_base + self.semi_space_size
    }

    /// Bytes currently occupied in the from-space
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.from_free - self.from_base
    }

    /// Bytes still allocatable in the from-space
    #[inline]
    pub fn remaining(&self) -> usize {
        self.semi_space_size - self.used_bytes()
    }

    /// Total arena length
    #[inline]
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    // ========================================================================
    // Bounds predicates
    // ========================================================================

    /// The applicability test: is `addr` inside the current from-space?
    ///
    /// Half-open `[from_base, from_base + semi_space_size)`. Every
    /// relocate-or-skip and rewrite-or-leave decision in the collector
    /// starts with this predicate. `NULL_REF` and metadata-region addresses
    /// are always outside.
    #[inline]
    pub fn in_from_space(&self, addr: usize) -> bool {
        addr >= self.from_base && addr < self.from_base + self.semi_space_size
    }

    /// Is `addr` inside the current to-space?
    #[inline]
    pub fn in_to_space(&self, addr: usize) -> bool {
        addr >= self.to_base && addr < self.to_base + self.semi_space_size
    }

    /// Is `addr` inside the metadata region?
    #[inline]
    pub fn in_static_region(&self, addr: usize) -> bool {
        addr >= self.static_base && addr < self.static_limit
    }

    // ========================================================================
    // Allocation cursors
    // ========================================================================

    /// Advance the from-space cursor by `size` and return the block base
    ///
    /// The caller must have checked `remaining() >= size`.
    #[inline]
    pub fn bump_from(&mut self, size: usize) -> usize {
        debug_assert!(size <= self.remaining(), "bump past from-space limit");
        let addr = self.from_free;
        self.from_free += size;
        addr
    }

    /// Advance the to-space relocation cursor by `size`
    ///
    /// Collector-only. The destination was sized by the same computation
    /// that sized the source block, so it always fits: live bytes never
    /// exceed one semispace.
    #[inline]
    pub fn advance_to_next(&mut self, size: usize) {
        debug_assert!(
            self.to_next + size <= self.to_limit(),
            "relocation past to-space limit"
        );
        self.to_next += size;
    }

    /// Exchange the from and to roles after a collection
    ///
    /// The new from-space keeps the relocated bytes (`from_free` lands on
    /// the old `to_next`); the old from-space becomes the to-space and is
    /// zero-filled in full, restoring the zeroed-to-space invariant.
    pub fn swap_spaces(&mut self) {
        let old_from = self.from_base;

        self.from_base = self.to_base;
        self.from_free = self.to_next;
        self.to_base = old_from;
        self.to_next = old_from;

        self.arena.zero(old_from, self.semi_space_size);

        debug_assert!(self.used_bytes() <= self.semi_space_size);
    }

    // ========================================================================
    // Metadata region
    // ========================================================================

    /// Bump-allocate `size` bytes in the metadata region
    ///
    /// The region holds vtables, descriptors, and frame records; it is
    /// never collected and never reused.
    ///
    /// # Errors
    ///
    /// Returns `StaticRegionFull` when `size` does not fit.
    pub fn static_alloc(&mut self, size: usize) -> Result<usize> {
        let available = self.static_limit - self.static_top;
        if size > available {
            return Err(VgcError::StaticRegionFull {
                requested: size,
                available,
            });
        }
        let addr = self.static_top;
        self.static_top += size;
        Ok(addr)
    }

    /// Bytes consumed in the metadata region
    #[inline]
    pub fn static_used(&self) -> usize {
        self.static_top - self.static_base
    }

    // ========================================================================
    // Typed access (delegates to the arena)
    // ========================================================================

    /// True if `[addr, addr + width)` lies inside the arena
    #[inline]
    pub fn contains_range(&self, addr: usize, width: usize) -> bool {
        self.arena.contains_range(addr, width)
    }

    #[inline]
    pub fn word(&self, addr: usize) -> usize {
        self.arena.word(addr)
    }

    #[inline]
    pub fn set_word(&mut self, addr: usize, value: usize) {
        self.arena.set_word(addr, value)
    }

    #[inline]
    pub fn int(&self, addr: usize) -> i32 {
        self.arena.int(addr)
    }

    #[inline]
    pub fn set_int(&mut self, addr: usize, value: i32) {
        self.arena.set_int(addr, value)
    }

    #[inline]
    pub fn byte(&self, addr: usize) -> u8 {
        self.arena.byte(addr)
    }

    pub fn write_bytes(&mut self, addr: usize, bytes: &[u8]) {
        self.arena.write_bytes(addr, bytes)
    }

    pub fn zero(&mut self, addr: usize, len: usize) {
        self.arena.zero(addr, len)
    }

    pub fn copy(&mut self, src: usize, dst: usize, len: usize) {
        self.arena.copy(src, dst, len)
    }
}
