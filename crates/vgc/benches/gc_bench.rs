//! VGC Benchmarks
//!
//! Benchmark untuk mengukur performa alokasi dan siklus koleksi VGC.
//! Run dengan: `cargo bench --package vgc`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use vgc::heap::NULL_REF;
use vgc::object::HEADER_SIZE;
use vgc::roots::frames;
use vgc::{FieldKind, GarbageCollector, GcConfig};

fn create_gc(heap_size: usize) -> GarbageCollector {
    GarbageCollector::new(GcConfig {
        heap_size,
        static_capacity: 64 * 1024,
        ..Default::default()
    })
    .unwrap()
}

/// Root a freshly built chain of `length` one-reference nodes
fn build_rooted_chain(gc: &mut GarbageCollector, length: usize) {
    let node = gc
        .install_class("Node", &[FieldKind::Reference])
        .unwrap();
    let frame = gc.push_frame(&[], &[FieldKind::Reference]).unwrap();
    let slot = frames::local_slot_addr(gc.heap(), frame, 0);

    let mut head = NULL_REF;
    for _ in 0..length {
        let block = gc.allocate_instance(&node).unwrap();
        gc.write_word(block + HEADER_SIZE, head).unwrap();
        head = block;
    }
    gc.write_word(slot, head).unwrap();
}

fn bench_gc_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc_creation");

    group.bench_function("default_config", |b| {
        b.iter(|| black_box(GarbageCollector::new(GcConfig::default()).unwrap()))
    });

    group.bench_function("small_heap", |b| {
        b.iter(|| black_box(create_gc(64 * 1024)))
    });

    group.finish();
}

fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation");

    // Steady-state mutator: allocate unrooted blocks, collect when the
    // space runs low. Nothing is live, so cycles are near-free and the
    // numbers isolate the bump-and-zero path.
    let mut gc = create_gc(1024 * 1024);
    let pair = gc
        .install_class("Pair", &[FieldKind::Scalar, FieldKind::Scalar])
        .unwrap();
    group.throughput(Throughput::Bytes(pair.object_size as u64));
    group.bench_function("object_32", |b| {
        b.iter(|| {
            if gc.heap().remaining() < 64 {
                gc.collect();
            }
            black_box(gc.allocate_instance(&pair).unwrap())
        })
    });

    let mut gc = create_gc(1024 * 1024);
    for &length in &[16usize, 256] {
        let size = 24 + length * 4;
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("array_{}", length), |b| {
            b.iter(|| {
                if gc.heap().remaining() < 2 * size {
                    gc.collect();
                }
                black_box(gc.allocate_array(length).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection");

    // A rooted chain stays live forever, so every cycle copies the same
    // blocks back and forth between the spaces.
    for &live in &[0usize, 100, 1000] {
        let mut gc = create_gc(1024 * 1024);
        build_rooted_chain(&mut gc, live);

        group.throughput(Throughput::Bytes((live * 32) as u64));
        group.bench_function(format!("live_{}", live), |b| {
            b.iter(|| black_box(gc.collect()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gc_creation,
    bench_allocation,
    bench_collection
);
criterion_main!(benches);
