//! Error Module - VGC Error Types
//!
//! Defines all error types used in VGC.
//!
//! # Error Categories
//!
//! ## Memory Errors
//! - `OutOfMemory` - Semispace exhaustion that one collection could not cure
//! - `StaticRegionFull` - Metadata region exhaustion (collection cannot help)
//! - `InvalidAddress` - Address outside the arena
//!
//! ## Setup Errors
//! - `HeapInitialization` - Arena reservation failed
//! - `Configuration` - Invalid configuration
//! - `InvalidArgument` - Invalid function argument
//!
//! ## Bugs
//! - `Internal` - Invariant violation inside the collector

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for all VGC operations
///
/// # Examples
///
/// ```rust
/// use vgc::error::VgcError;
///
/// fn handle_error(err: VgcError) {
///     match err {
///         VgcError::OutOfMemory { requested, available } => {
///             eprintln!("OOM: requested {}, available {}", requested, available);
///         }
///         _ => {
///             eprintln!("Other error: {}", err);
///         }
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum VgcError {
    /// Out of memory - from-space exhaustion
    ///
    /// **When returned:** An allocation still does not fit after the single
    /// collection attempt the allocator is allowed to make.
    ///
    /// **Recovery strategy:** None. The heap never grows; the embedding
    /// process is expected to terminate with a non-zero status.
    #[error("Out of memory: requested {requested} bytes, available {available} bytes")]
    OutOfMemory { requested: usize, available: usize },

    /// Heap initialization failed
    ///
    /// **When returned:** The anonymous memory mapping backing the arena
    /// could not be created.
    ///
    /// **Recovery strategy:** Cannot recover - terminate gracefully
    #[error("Heap initialization failed: {0}")]
    HeapInitialization(String),

    /// Metadata region exhausted
    ///
    /// **When returned:** Installing a class or pushing a frame record needs
    /// more metadata-region bytes than remain. Distinct from `OutOfMemory`
    /// because the metadata region is never collected.
    #[error("Static region full: requested {requested} bytes, available {available} bytes")]
    StaticRegionFull { requested: usize, available: usize },

    /// Address outside the arena
    ///
    /// **When returned:** A checked embedder-facing accessor was handed an
    /// address (or address + width) that does not fall inside the arena.
    ///
    /// **Recovery strategy:** Fix the caller; the collector itself never
    /// produces such addresses.
    #[error("Invalid address: {address:#x}")]
    InvalidAddress { address: usize },

    /// Configuration error
    ///
    /// **When returned:** `GcConfig::validate` rejected the configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Invalid argument
    ///
    /// **When returned:** Function argument fails validation
    ///
    /// **Example scenarios:**
    /// - Duplicate class name passed to the installer
    /// - Array length exceeding the header's 32-bit length field
    /// - Pop on an empty frame stack
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error - indicates a bug in VGC
    ///
    /// **When returned:** Invariant violation or unexpected state
    ///
    /// **Recovery strategy:** Cannot recover - this is a bug
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VgcError {
    /// Check if this error is fatal for the embedding process
    ///
    /// Fatal errors mean the runtime cannot continue: the heap is
    /// exhausted or was never usable in the first place.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VgcError::OutOfMemory { .. }
                | VgcError::HeapInitialization(_)
                | VgcError::StaticRegionFull { .. }
        )
    }

    /// Check if this error indicates a bug in the code
    pub fn is_bug(&self) -> bool {
        matches!(self, VgcError::Internal(_))
    }
}

/// Result type alias for VGC operations
pub type Result<T> = std::result::Result<T, VgcError>;
