//! GC Runtime - C FFI wrapper for VGC
//!
//! C-compatible entry points for generated Veld code: heap lifecycle,
//! class installation, frame publication, allocation, and collection.
//!
//! Lifecycle: `veld_gc_init` builds the process-wide collector (explicitly,
//! or implicitly on the first allocation); `veld_gc_shutdown` tears it down
//! and releases the arena. The collector lives behind a mutex so the shim
//! itself is race-free, but the ABI is designed for a single-threaded
//! runtime: generated code must not allocate or collect from two threads
//! at once, because addresses handed out before a cycle are stale after
//! it.
//!
//! Out-of-memory is unrecoverable for compiled programs: allocation
//! entry points report it on stderr and terminate the process with a
//! failure status. Every other failure returns the null reference (0).

use std::ffi::{c_char, CStr};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use vgc::heap::NULL_REF;
use vgc::{FieldKind, GarbageCollector, GcConfig, VgcError};

static RUNTIME: Mutex<Option<GarbageCollector>> = Mutex::new(None);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Run `f` against the live collector, if any
fn with_gc<T>(f: impl FnOnce(&mut GarbageCollector) -> T) -> Option<T> {
    RUNTIME.lock().as_mut().map(f)
}

fn ensure_initialized() {
    if !INITIALIZED.load(Ordering::SeqCst) {
        veld_gc_init(0);
    }
}

/// Read a NUL-terminated UTF-8 string from generated code
fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let c_str = unsafe { CStr::from_ptr(ptr) };
    c_str.to_str().ok().map(str::to_owned)
}

/// Decode a NUL-terminated descriptor tag string
fn parse_descriptor(ptr: *const c_char) -> Option<Vec<FieldKind>> {
    if ptr.is_null() {
        return None;
    }
    let c_str = unsafe { CStr::from_ptr(ptr) };
    c_str.to_bytes().iter().map(|&tag| FieldKind::from_tag(tag)).collect()
}

/// Exit on out-of-memory; report and return null for anything else
fn allocation_verdict(err: VgcError) -> usize {
    if matches!(err, VgcError::OutOfMemory { .. }) {
        eprintln!("veld runtime: {}", err);
        std::process::exit(1);
    }
    eprintln!("veld runtime: allocation failed: {}", err);
    NULL_REF
}

/// Initialize the process-wide collector
///
/// `heap_size` of 0 keeps the configured default (environment overrides
/// included). Idempotent: a second call reports success without touching
/// the existing heap.
#[no_mangle]
pub extern "C" fn veld_gc_init(heap_size: usize) -> bool {
    if INITIALIZED.load(Ordering::SeqCst) {
        return true;
    }

    let mut config = GcConfig::from_env();
    if heap_size != 0 {
        config.heap_size = heap_size;
    }

    match GarbageCollector::new(config) {
        Ok(gc) => {
            *RUNTIME.lock() = Some(gc);
            INITIALIZED.store(true, Ordering::SeqCst);
            log::info!("veld runtime initialized");
            true
        }
        Err(e) => {
            eprintln!("veld runtime: failed to initialize GC: {}", e);
            false
        }
    }
}

/// Tear down the collector and release the arena
///
/// Every reference handed out before this call is dead afterwards.
#[no_mangle]
pub extern "C" fn veld_gc_shutdown() {
    *RUNTIME.lock() = None;
    INITIALIZED.store(false, Ordering::SeqCst);
    log::info!("veld runtime shut down");
}

/// Allocate an object block; the allocation entry point for generated code
///
/// `size` is the instance size the code generator computed for the class
/// behind `class_ref`. Terminates the process on out-of-memory.
#[no_mangle]
pub extern "C" fn veld_gc_alloc_object(class_ref: usize, size: usize) -> usize {
    ensure_initialized();
    match with_gc(|gc| gc.allocate_object(class_ref, size)) {
        Some(Ok(block)) => block,
        Some(Err(e)) => allocation_verdict(e),
        None => NULL_REF,
    }
}

/// Allocate an int array of `length` elements
///
/// Terminates the process on out-of-memory.
#[no_mangle]
pub extern "C" fn veld_gc_alloc_array(length: usize) -> usize {
    ensure_initialized();
    match with_gc(|gc| gc.allocate_array(length)) {
        Some(Ok(block)) => block,
        Some(Err(e)) => allocation_verdict(e),
        None => NULL_REF,
    }
}

/// Run one collection cycle; returns the number of blocks relocated
#[no_mangle]
pub extern "C" fn veld_gc_collect() -> usize {
    ensure_initialized();
    with_gc(|gc| gc.collect().forwarded).unwrap_or(0)
}

/// Install a class from its name and descriptor tag string
///
/// Returns the class's vtable reference, or null on failure (bad
/// strings, duplicate name, metadata region full).
#[no_mangle]
pub extern "C" fn veld_gc_install_class(
    name: *const c_char,
    descriptor: *const c_char,
) -> usize {
    ensure_initialized();

    let name = match read_c_str(name) {
        Some(name) => name,
        None => {
            eprintln!("veld runtime: invalid class name");
            return NULL_REF;
        }
    };
    let fields = match parse_descriptor(descriptor) {
        Some(fields) => fields,
        None => {
            eprintln!("veld runtime: invalid descriptor for class {:?}", name);
            return NULL_REF;
        }
    };

    match with_gc(|gc| gc.install_class(&name, &fields)) {
        Some(Ok(entry)) => entry.class_ref,
        Some(Err(e)) => {
            eprintln!("veld runtime: installing class {:?} failed: {}", name, e);
            NULL_REF
        }
        None => NULL_REF,
    }
}

/// Push a frame record described by two descriptor tag strings
///
/// Returns the frame's address, or null on failure.
#[no_mangle]
pub extern "C" fn veld_gc_push_frame(
    arg_descriptor: *const c_char,
    local_descriptor: *const c_char,
) -> usize {
    ensure_initialized();

    let args = match parse_descriptor(arg_descriptor) {
        Some(fields) => fields,
        None => {
            eprintln!("veld runtime: invalid argument descriptor");
            return NULL_REF;
        }
    };
    let locals = match parse_descriptor(local_descriptor) {
        Some(fields) => fields,
        None => {
            eprintln!("veld runtime: invalid local descriptor");
            return NULL_REF;
        }
    };

    match with_gc(|gc| gc.push_frame(&args, &locals)) {
        Some(Ok(frame)) => frame,
        Some(Err(e)) => {
            eprintln!("veld runtime: pushing a frame failed: {}", e);
            NULL_REF
        }
        None => NULL_REF,
    }
}

/// Unlink the innermost frame record
#[no_mangle]
pub extern "C" fn veld_gc_pop_frame() -> bool {
    match with_gc(|gc| gc.pop_frame()) {
        Some(Ok(())) => true,
        Some(Err(e)) => {
            eprintln!("veld runtime: popping a frame failed: {}", e);
            false
        }
        None => false,
    }
}

/// The frame-chain anchor the next collection will walk
#[no_mangle]
pub extern "C" fn veld_gc_current_frame() -> usize {
    with_gc(|gc| gc.current_frame()).unwrap_or(NULL_REF)
}

/// Point the anchor at a chain built by generated prologue code
#[no_mangle]
pub extern "C" fn veld_gc_set_current_frame(frame: usize) {
    with_gc(|gc| gc.set_current_frame(frame));
}

/// Read a word at an arena address; returns 0 for invalid addresses
#[no_mangle]
pub extern "C" fn veld_gc_read_word(addr: usize) -> usize {
    with_gc(|gc| gc.read_word(addr).unwrap_or(NULL_REF)).unwrap_or(NULL_REF)
}

/// Write a word at an arena address
#[no_mangle]
pub extern "C" fn veld_gc_write_word(addr: usize, value: usize) -> bool {
    with_gc(|gc| gc.write_word(addr, value).is_ok()).unwrap_or(false)
}

/// Bytes currently allocated in the live space
#[no_mangle]
pub extern "C" fn veld_gc_heap_used() -> usize {
    with_gc(|gc| gc.heap().used_bytes()).unwrap_or(0)
}
