//! Configuration Module - GC Tuning Parameters
//!
//! Manages all configuration parameters for VGC.
//! The collector is deliberately small; so is its configuration surface.

/// Main configuration for the Veld garbage collector
///
/// Stores all parameters affecting GC behavior.
/// All parameters have sensible defaults.
///
/// # Examples
///
/// ```rust
/// use vgc::GcConfig;
///
/// // Use default configuration
/// let config = GcConfig::default();
///
/// // Small heap for tests
/// let config = GcConfig {
///     heap_size: 4096,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GcConfig {
    /// Total heap size in bytes (both semispaces together)
    ///
    /// The heap never grows: one semispace is `heap_size / 2` and an
    /// allocation that cannot fit after one collection is fatal.
    /// Must be even and at least `MIN_HEAP_SIZE`.
    ///
    /// Default: 64MB
    pub heap_size: usize,

    /// Capacity of the metadata region in bytes
    ///
    /// Holds vtables, type descriptors, frame records, and frame slot
    /// areas. Bump-allocated, never collected.
    ///
    /// Default: 1MB
    pub static_capacity: usize,

    /// Emit a structured event for every allocation
    ///
    /// Per-allocation logging is useful when debugging generated code but
    /// noisy in normal runs.
    ///
    /// Default: false
    pub log_allocations: bool,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            heap_size: 64 * MB,
            static_capacity: MB,
            log_allocations: false,
        }
    }
}

impl GcConfig {
    /// Validate configuration
    ///
    /// Checks if all values are in valid ranges.
    /// Returns error if configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vgc::GcConfig;
    ///
    /// let config = GcConfig {
    ///     heap_size: 0,  // Invalid!
    ///     ..Default::default()
    /// };
    ///
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heap_size < MIN_HEAP_SIZE {
            return Err(ConfigError::InvalidHeapSize(format!(
                "heap_size must be at least {} bytes",
                MIN_HEAP_SIZE
            )));
        }

        if self.heap_size % 2 != 0 {
            return Err(ConfigError::InvalidHeapSize(
                "heap_size must be even (two equal semispaces)".to_string(),
            ));
        }

        if self.static_capacity < MIN_STATIC_CAPACITY {
            return Err(ConfigError::InvalidStaticCapacity(format!(
                "static_capacity must be at least {} bytes",
                MIN_STATIC_CAPACITY
            )));
        }

        Ok(())
    }

    /// Size of one semispace under this configuration
    pub fn semi_space_size(&self) -> usize {
        self.heap_size / 2
    }

    /// Build configuration from environment variables
    ///
    /// Overrides defaults with environment variables:
    /// - VGC_HEAP_SIZE
    /// - VGC_STATIC_CAPACITY
    /// - VGC_LOG_ALLOCATIONS
    ///
    /// Malformed values are ignored with a warning.
    ///
    /// # Examples
    ///
    /// ```bash
    /// export VGC_HEAP_SIZE=4194304   # 4MB
    /// export VGC_LOG_ALLOCATIONS=1
    /// ```
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VGC_HEAP_SIZE") {
            match val.parse::<usize>() {
                Ok(size) => config.heap_size = size,
                Err(_) => log::warn!("ignoring malformed VGC_HEAP_SIZE: {:?}", val),
            }
        }

        if let Ok(val) = std::env::var("VGC_STATIC_CAPACITY") {
            match val.parse::<usize>() {
                Ok(size) => config.static_capacity = size,
                Err(_) => log::warn!("ignoring malformed VGC_STATIC_CAPACITY: {:?}", val),
            }
        }

        if let Ok(val) = std::env::var("VGC_LOG_ALLOCATIONS") {
            config.log_allocations = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid heap size: {0}")]
    InvalidHeapSize(String),

    #[error("Invalid static capacity: {0}")]
    InvalidStaticCapacity(String),
}

// ============================================================================
// CONSTANTS
// ============================================================================

/// One kibibyte
pub const KB: usize = 1024;
/// One mebibyte
pub const MB: usize = 1024 * 1024;
/// One gibibyte
pub const GB: usize = 1024 * 1024 * 1024;

/// Smallest heap worth initializing: room for a few header-sized blocks
/// per semispace.
pub const MIN_HEAP_SIZE: usize = 256;

/// Smallest metadata region: a handful of classes and frames.
pub const MIN_STATIC_CAPACITY: usize = KB;
