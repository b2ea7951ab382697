//! # VGC - Two-Space Copying Garbage Collector
//!
//! VGC is the memory manager of the Veld runtime: a stop-the-world,
//! two-space copying collector (Cheney-style) over a single flat arena,
//! built for compiled programs that publish their roots through an
//! ABI-fixed stack-frame chain.
//!
//! ## Overview
//!
//! - **Arena addressing**: every reference is a byte offset into one
//!   memory-mapped arena; offset 0 is the reserved null, so no raw
//!   pointers cross the API boundary
//! - **Bump allocation**: objects and int arrays are carved off the
//!   from-space cursor, zero-filled, and packed without padding
//! - **Descriptor-driven layout**: per-class tag strings tell the
//!   collector which fields are references, so tracing needs no
//!   per-object maps and no compiler cooperation beyond the vtable word
//! - **Copying collection**: live blocks are relocated into the
//!   to-space via forwarding references, roots and fields are rewritten,
//!   then the spaces trade roles and the vacated one is zeroed
//! - **Frame-chain roots**: the root set is exactly the reference-tagged
//!   argument and local slots of the live frame records
//!
//! ## Quick Start
//!
//! ```rust
//! use vgc::{FieldKind, GarbageCollector, GcConfig};
//!
//! fn main() -> Result<(), vgc::VgcError> {
//!     let mut gc = GarbageCollector::new(GcConfig::default())?;
//!
//!     // Describe a class: one reference field, one scalar field.
//!     let node = gc.install_class("Node", &[FieldKind::Reference, FieldKind::Scalar])?;
//!
//!     // Publish a frame so the allocation below stays reachable.
//!     let frame = gc.push_frame(&[], &[FieldKind::Reference])?;
//!     let obj = gc.allocate_instance(&node)?;
//!     let slot = vgc::roots::frames::local_slot_addr(gc.heap(), frame, 0);
//!     gc.write_word(slot, obj)?;
//!
//!     // Collect; the rooted object survives at a new address.
//!     let stats = gc.collect();
//!     assert_eq!(stats.forwarded, 1);
//!     assert!(gc.heap().in_from_space(gc.read_word(slot)?));
//!
//!     gc.pop_frame()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! arena (one anonymous mapping, addressed by byte offset)
//! ┌───────┬──────────────────────┬────────────────┬────────────────┐
//! │ guard │ metadata region      │ semispace 0    │ semispace 1    │
//! │ word  │ vtables, descriptors │                │                │
//! │       │ frame records        │  from / to roles swap per cycle │
//! └───────┴──────────────────────┴────────────────┴────────────────┘
//!
//! frame chain                      object graph (from-space)
//! anchor ─> [frame] ─> [frame]     [hdr|fields] [hdr|elements] ...
//!             │ ref slots │               │
//!             └───────────┴───────────────┘  roots point at blocks
//! ```
//!
//! ### Collection Cycle Phases
//!
//! 1. **Forward** (STW): walk the frame chain, copy every reachable
//!    block into the to-space, leave forwarding references behind
//! 2. **Redirect roots** (STW): rewrite each reference slot through its
//!    target's forwarding reference
//! 3. **Fix up** (STW): scan the relocated run front to back and rewrite
//!    object fields that still hold from-space addresses
//! 4. **Swap**: exchange space roles and zero the new to-space
//!
//! ## Modules
//!
//! - [`allocator`]: bump-pointer block writers
//! - [`collect`]: the copying cycle (forwarding, root redirect, fix-up)
//! - [`config`]: configuration parameters and validation
//! - [`error`]: error types for all VGC operations
//! - [`gc`]: collector facade, allocation policy, bookkeeping
//! - [`heap`]: arena mapping, semispace geometry, bump cursors
//! - [`logging`]: structured GC event logging
//! - [`object`]: headers, type descriptors, class table
//! - [`roots`]: frame records and root enumeration
//! - [`stats`]: per-cycle and lifetime counters
//!
//! ## Limitations
//!
//! - **Single-threaded**: one mutator, no concurrent collection; the
//!   whole world stops for every cycle
//! - **Precise roots only**: anything not reachable from a frame
//!   record's reference slots is garbage, raw copies of references
//!   included
//! - **Fixed spaces**: the heap never grows; an allocation larger than
//!   one semispace can never succeed

// Core collector modules
pub mod config;
pub mod error;
pub mod gc;

// Memory layout and allocation
pub mod allocator;
pub mod heap;
pub mod object;

// Collection algorithm
pub mod collect;
pub mod roots;

// Monitoring
pub mod logging;
pub mod stats;

// Re-export the embedder-facing surface
pub use config::{ConfigError, GcConfig};
pub use error::{Result, VgcError};
pub use gc::GarbageCollector;
pub use logging::{configure_logger, GcEvent, GcLogger, GcLoggerConfig, LogLevel};
pub use object::{ClassEntry, ClassTable, Descriptor, FieldKind};
pub use stats::{CycleStats, GcStats};

/// VGC version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create a collector with the default configuration
///
/// # Errors
///
/// Returns `HeapInitialization` if the arena cannot be mapped.
///
/// # Examples
///
/// ```rust
/// let mut gc = vgc::init()?;
/// let stats = gc.collect();
/// assert_eq!(stats.cycle, 1);
/// # Ok::<(), vgc::VgcError>(())
/// ```
pub fn init() -> Result<GarbageCollector> {
    GarbageCollector::new(GcConfig::default())
}

/// Create a collector with a custom configuration
///
/// # Errors
///
/// Returns `Configuration` for an invalid config and
/// `HeapInitialization` if the arena cannot be mapped.
///
/// # Examples
///
/// ```rust
/// use vgc::GcConfig;
///
/// let gc = vgc::init_with_config(GcConfig {
///     heap_size: 1024 * 1024,
///     ..Default::default()
/// })?;
/// assert_eq!(gc.heap().semi_space_size(), 512 * 1024);
/// # Ok::<(), vgc::VgcError>(())
/// ```
pub fn init_with_config(config: GcConfig) -> Result<GarbageCollector> {
    GarbageCollector::new(config)
}
