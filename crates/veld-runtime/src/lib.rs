//! Veld Runtime Library
//!
//! Runtime support linked into compiled Veld programs:
//! - GC allocation entry points (via VGC)
//! - class, frame, and heap-access shims for generated code

mod gc;

pub use gc::*;
