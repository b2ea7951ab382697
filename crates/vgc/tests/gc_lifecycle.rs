//! Lifecycle Tests - Initialization, Configuration, and Observability
//!
//! Covers the crate's outer surface: building collectors from
//! configuration, rejecting bad geometry up front, frame bookkeeping
//! through the public API, and the structured event stream.

use anyhow::Result;
use vgc::heap::{NULL_REF, WORD_SIZE};
use vgc::logging::get_event_count;
use vgc::roots::frames;
use vgc::{
    configure_logger, ConfigError, FieldKind, GcConfig, GcLoggerConfig, LogLevel, VgcError,
};

/// ============================================================================
/// INITIALIZATION
/// ============================================================================

/// A default collector comes up empty with the documented geometry
///
/// **Bug this finds:** default configuration drifting from its documented
/// values, a fresh collector starting with stale counters or a
/// non-null frame anchor
#[test]
fn test_init_with_defaults() -> Result<()> {
    let gc = vgc::init()?;

    assert_eq!(gc.config().heap_size, 64 * 1024 * 1024);
    assert_eq!(gc.heap().semi_space_size(), 32 * 1024 * 1024);
    assert_eq!(gc.cycle_count(), 0);
    assert_eq!(gc.stats().allocations, 0);
    assert_eq!(gc.stats().collections, 0);
    assert_eq!(gc.current_frame(), NULL_REF);
    Ok(())
}

/// Custom sizes place every arena region where the layout promises
///
/// **Bug this finds:** off-by-one region boundaries, the guard word
/// being absorbed into the metadata region, diagnostics reporting a
/// different geometry than the heap actually uses
#[test]
fn test_custom_geometry() -> Result<()> {
    let gc = vgc::init_with_config(GcConfig {
        heap_size: 8192,
        static_capacity: 4096,
        ..Default::default()
    })?;

    let heap = gc.heap();
    assert_eq!(heap.from_base(), WORD_SIZE + 4096);
    assert_eq!(heap.to_base(), heap.from_base() + 4096);
    assert_eq!(heap.arena_len(), WORD_SIZE + 4096 + 8192);
    assert_eq!(heap.semi_space_size(), 4096);
    assert_eq!(heap.remaining(), 4096);
    assert_eq!(heap.used_bytes(), 0);

    let diagnostics = gc.diagnostics();
    assert_eq!(diagnostics["heap_size"], "8192");
    assert_eq!(diagnostics["semi_space_size"], "4096");
    assert_eq!(diagnostics["cycles"], "0");
    Ok(())
}

/// Bad geometry is refused before any mapping is created
///
/// **Bug this finds:** odd heap sizes silently producing unequal
/// semispaces, undersized regions being accepted and failing later
#[test]
fn test_invalid_configurations_are_rejected() {
    let odd = GcConfig {
        heap_size: 4097,
        ..Default::default()
    };
    assert!(matches!(
        odd.validate(),
        Err(ConfigError::InvalidHeapSize(_))
    ));

    let tiny = GcConfig {
        heap_size: 128,
        ..Default::default()
    };
    assert!(matches!(
        tiny.validate(),
        Err(ConfigError::InvalidHeapSize(_))
    ));

    let thin = GcConfig {
        static_capacity: 512,
        ..Default::default()
    };
    assert!(matches!(
        thin.validate(),
        Err(ConfigError::InvalidStaticCapacity(_))
    ));

    let err = vgc::init_with_config(tiny).unwrap_err();
    assert!(matches!(err, VgcError::Configuration(_)));
}

/// ============================================================================
/// FRAME BOOKKEEPING
/// ============================================================================

/// Pushed frames chain through the anchor and pop in LIFO order
///
/// **Bug this finds:** the anchor skipping a frame, pop unlinking the
/// wrong record, an empty chain accepting a pop
#[test]
fn test_frame_chain_management() -> Result<()> {
    let mut gc = vgc::init_with_config(GcConfig {
        heap_size: 4096,
        static_capacity: 4096,
        ..Default::default()
    })?;

    let outer = gc.push_frame(&[FieldKind::Reference], &[])?;
    assert_eq!(gc.current_frame(), outer);
    assert!(gc.heap().in_static_region(outer));

    let inner = gc.push_frame(&[], &[FieldKind::Scalar, FieldKind::Reference])?;
    assert_eq!(gc.current_frame(), inner);
    assert_eq!(frames::next(gc.heap(), inner), outer);

    gc.pop_frame()?;
    assert_eq!(gc.current_frame(), outer);
    gc.pop_frame()?;
    assert_eq!(gc.current_frame(), NULL_REF);

    assert!(matches!(gc.pop_frame(), Err(VgcError::InvalidArgument(_))));
    Ok(())
}

/// ============================================================================
/// EVENT STREAM
/// ============================================================================

/// Heap activity lands in the global event buffer
///
/// **Bug this finds:** events dropped below their level, allocation
/// events ignoring `log_allocations`, failures never reaching the
/// buffer
///
/// The buffer is process-global, so this asserts a lower bound rather
/// than an exact count: parallel tests in this binary feed the same
/// stream.
#[test]
fn test_event_stream_reflects_activity() -> Result<()> {
    configure_logger(GcLoggerConfig {
        level: LogLevel::Trace,
        console: false,
        json: false,
        timestamps: false,
    });

    let mut gc = vgc::init_with_config(GcConfig {
        heap_size: 4096,
        static_capacity: 4096,
        log_allocations: true,
    })?;

    let pair = gc.install_class("Pair", &[FieldKind::Scalar, FieldKind::Scalar])?;
    gc.allocate_instance(&pair)?;
    gc.allocate_instance(&pair)?;
    let stats = gc.collect();
    assert_eq!(stats.forwarded, 0);
    assert!(gc.allocate_array(1000).is_err());

    // HeapInit, two Allocations, CycleStart, CycleEnd, AllocationFailure.
    assert!(
        get_event_count() >= 6,
        "expected at least 6 buffered events, saw {}",
        get_event_count()
    );
    Ok(())
}
