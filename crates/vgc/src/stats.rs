//! Statistics Module - GC Performance Counters
//!
//! Module ini mengumpulkan statistik performa GC untuk:
//! - Debugging dan analisa performa
//! - Monitoring produksi
//! - Assertion dalam test (forwarded count per cycle)
//!
//! Counters are plain fields: the collector is single-threaded and every
//! operation already holds `&mut` access.

use std::fmt;
use std::time::{Duration, Instant};

/// Per-cycle collection results
///
/// Returned by every `collect()` call; this is where the per-cycle
/// forwarded-object count is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Cycle number (1-based)
    pub cycle: u64,

    /// Blocks relocated this cycle (objects + arrays)
    pub forwarded: usize,

    /// Bytes occupied in the new from-space after the swap
    pub live_bytes: usize,

    /// Bytes freed compared to before the cycle
    pub reclaimed_bytes: usize,

    /// Wall-clock duration of the cycle
    pub duration: Duration,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycle {}: {} forwarded, {} bytes live, {} reclaimed in {}us",
            self.cycle,
            self.forwarded,
            self.live_bytes,
            self.reclaimed_bytes,
            self.duration.as_micros()
        )
    }
}

/// Cumulative collector statistics
#[derive(Debug, Clone, Default)]
pub struct GcStats {
    /// Completed collection cycles
    pub collections: u64,

    /// Blocks relocated across all cycles
    pub total_forwarded: u64,

    /// Successful allocations
    pub allocations: u64,

    /// Bytes handed out across all allocations
    pub allocated_bytes: u64,

    /// Largest post-cycle live size observed
    pub peak_live_bytes: usize,
}

impl GcStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful allocation
    pub fn record_allocation(&mut self, size: usize) {
        self.allocations += 1;
        self.allocated_bytes += size as u64;
    }

    /// Record a completed collection cycle
    pub fn record_collection(&mut self, cycle: &CycleStats) {
        self.collections += 1;
        self.total_forwarded += cycle.forwarded as u64;
        if cycle.live_bytes > self.peak_live_bytes {
            self.peak_live_bytes = cycle.live_bytes;
        }
    }
}

impl fmt::Display for GcStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} collections, {} forwarded, {} allocations ({} bytes), peak live {} bytes",
            self.collections,
            self.total_forwarded,
            self.allocations,
            self.allocated_bytes,
            self.peak_live_bytes
        )
    }
}

/// Simple wall-clock timer for GC phases
pub struct GcTimer {
    start: Instant,
}

impl GcTimer {
    /// Start timing now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since construction
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed microseconds since construction
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }
}

impl Default for GcTimer {
    fn default() -> Self {
        Self::new()
    }
}
