//! GC Logging and Tracing
//!
//! Structured logging for collector operations, useful for:
//! - Debugging generated code against the runtime
//! - Watching allocation/collection behavior in tests
//! - Production monitoring
//!
//! Log Levels:
//! - ERROR: allocation failures
//! - INFO: heap initialization, cycle completion
//! - DEBUG: cycle start detail
//! - TRACE: per-allocation records
//!
//! Events also flow through the [`log`] facade at matching levels from the
//! collector itself; this module is the structured, buffer-backed view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use serde::Serialize;

/// Log level for GC operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

/// GC event types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GcEvent {
    /// Heap initialized
    HeapInit {
        total_size: usize,
        semi_space_size: usize,
        from_base: usize,
        to_base: usize,
    },

    /// A block was allocated
    Allocation {
        address: usize,
        size: usize,
        kind: &'static str,
    },

    /// Allocation failed even after a collection
    AllocationFailure { requested: usize, available: usize },

    /// Collection cycle started
    CycleStart { cycle: u64, used_bytes: usize },

    /// Collection cycle completed
    CycleEnd {
        cycle: u64,
        forwarded: usize,
        live_bytes: usize,
        reclaimed_bytes: usize,
        duration_us: u64,
    },
}

/// GC Logger configuration
#[derive(Debug, Clone)]
pub struct GcLoggerConfig {
    /// Minimum log level
    pub level: LogLevel,

    /// Enable console output
    pub console: bool,

    /// Enable JSON format
    pub json: bool,

    /// Enable timestamps
    pub timestamps: bool,
}

impl Default for GcLoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            console: true,
            json: false,
            timestamps: true,
        }
    }
}

/// Retained event ceiling; the oldest half is dropped on overflow.
const MAX_BUFFERED_EVENTS: usize = 4096;

/// GC Logger - centralized logging for collector operations
pub struct GcLogger {
    config: GcLoggerConfig,
    events: Mutex<Vec<(Instant, GcEvent)>>,
    enabled: AtomicBool,
}

impl GcLogger {
    /// Create new GC logger
    pub fn new(config: GcLoggerConfig) -> Self {
        Self {
            config,
            events: Mutex::new(Vec::new()),
            enabled: AtomicBool::new(true),
        }
    }

    /// Enable logging
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disable logging
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Log a GC event
    pub fn log(&self, event: GcEvent) {
        if !self.is_enabled() {
            return;
        }

        let event_level = self.event_level(&event);
        if event_level > self.config.level {
            return;
        }

        if let Ok(mut events) = self.events.lock() {
            if events.len() >= MAX_BUFFERED_EVENTS {
                let half = events.len() / 2;
                events.drain(..half);
            }
            events.push((Instant::now(), event.clone()));
        }

        if self.config.console {
            self.output_console(&event);
        }
    }

    /// Get log level for event
    fn event_level(&self, event: &GcEvent) -> LogLevel {
        match event {
            GcEvent::AllocationFailure { .. } => LogLevel::Error,
            GcEvent::HeapInit { .. } | GcEvent::CycleEnd { .. } => LogLevel::Info,
            GcEvent::CycleStart { .. } => LogLevel::Debug,
            GcEvent::Allocation { .. } => LogLevel::Trace,
        }
    }

    /// Output to console
    fn output_console(&self, event: &GcEvent) {
        if self.config.timestamps {
            let now = chrono::Local::now();
            print!("[{}] ", now.format("%Y-%m-%d %H:%M:%S%.3f"));
        }

        if self.config.json {
            self.output_json(event);
        } else {
            self.output_human(event);
        }
    }

    /// Output in human-readable format
    fn output_human(&self, event: &GcEvent) {
        match event {
            GcEvent::HeapInit {
                total_size,
                semi_space_size,
                from_base,
                to_base,
            } => {
                println!(
                    "[GC] Heap initialized: {} bytes total, semispace {} (from @{:#x}, to @{:#x})",
                    total_size, semi_space_size, from_base, to_base
                );
            },
            GcEvent::Allocation {
                address,
                size,
                kind,
            } => {
                println!("[GC] Allocated {} bytes ({}) at {:#x}", size, kind, address);
            },
            GcEvent::AllocationFailure {
                requested,
                available,
            } => {
                eprintln!(
                    "[GC] Allocation failure: requested {} bytes, {} available",
                    requested, available
                );
            },
            GcEvent::CycleStart { cycle, used_bytes } => {
                println!("[GC] Cycle {} started ({} bytes used)", cycle, used_bytes);
            },
            GcEvent::CycleEnd {
                cycle,
                forwarded,
                live_bytes,
                reclaimed_bytes,
                duration_us,
            } => {
                println!(
                    "[GC] Cycle {} completed: {} objects forwarded, {} bytes live, {} reclaimed ({} us)",
                    cycle, forwarded, live_bytes, reclaimed_bytes, duration_us
                );
            },
        }
    }

    /// Output in JSON format (one object per line)
    fn output_json(&self, event: &GcEvent) {
        if let Ok(json_str) = serde_json::to_string(event) {
            println!("{}", json_str);
        }
    }

    /// Get all buffered events
    pub fn get_events(&self) -> Vec<(Instant, GcEvent)> {
        if let Ok(events) = self.events.lock() {
            events.clone()
        } else {
            Vec::new()
        }
    }

    /// Clear all buffered events
    pub fn clear_events(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get buffered event count
    pub fn event_count(&self) -> usize {
        if let Ok(events) = self.events.lock() {
            events.len()
        } else {
            0
        }
    }
}

impl Default for GcLogger {
    fn default() -> Self {
        Self::new(GcLoggerConfig::default())
    }
}

/// Global GC logger
lazy_static::lazy_static! {
    static ref GLOBAL_LOGGER: Mutex<GcLogger> = Mutex::new(GcLogger::default());
}

/// Log a GC event to the global logger
pub fn log_event(event: GcEvent) {
    if let Ok(logger) = GLOBAL_LOGGER.lock() {
        logger.log(event);
    }
}

/// Configure the global logger
pub fn configure_logger(config: GcLoggerConfig) {
    if let Ok(mut logger) = GLOBAL_LOGGER.lock() {
        *logger = GcLogger::new(config);
    }
}

/// Get global logger event count
pub fn get_event_count() -> usize {
    if let Ok(logger) = GLOBAL_LOGGER.lock() {
        logger.event_count()
    } else {
        0
    }
}
