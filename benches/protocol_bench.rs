//! Benchmarks for the buffer protocols and generated component calls

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use erbridge::buffer::{call_fixed, call_growable};
use erbridge::{BufferConfig, Engine, NativeLibrary, ResizeFn, Resizer};
use std::ffi::c_void;
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::sync::Arc;

/// Grow to the requested size in doubling steps, the way the engine does
/// for large responses, then fill the block.
unsafe fn fill(buf: *mut *mut c_char, size: *mut usize, resize: ResizeFn, len: usize) -> c_int {
    let mut capacity = (*size).max(64);
    while capacity < len + 1 {
        capacity *= 2;
    }
    if *size < capacity {
        let block = resize(*buf as *mut c_void, capacity);
        if block.is_null() {
            return -1;
        }
        *buf = block as *mut c_char;
        *size = capacity;
    }
    ptr::write_bytes(*buf, b'x', len);
    *(*buf).add(len) = 0;
    0
}

unsafe extern "C" fn stats_stub(buf: *mut *mut c_char, size: *mut usize, resize: ResizeFn) -> c_int {
    fill(buf, size, resize, 512)
}

/// Benchmark the growable call path for varying response sizes
fn bench_growable(c: &mut Criterion) {
    let mut group = c.benchmark_group("growable_call");
    let resizer = Resizer::system();

    for &len in &[0usize, 64, 1024, 16 * 1024, 256 * 1024] {
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(format!("{}_bytes", len), |b| {
            b.iter(|| {
                let result = call_growable(&resizer, |buf, size, resize| unsafe {
                    fill(buf, size, resize, len)
                });
                black_box(result.payload.len())
            })
        });
    }

    group.finish();
}

/// Benchmark fixed export pages
fn bench_fixed(c: &mut Criterion) {
    c.bench_function("fixed_export_page", |b| {
        b.iter(|| {
            let result = call_fixed(erbridge::EXPORT_PAGE_CAPACITY, |buf, capacity| unsafe {
                let n = capacity.min(4096) - 1;
                ptr::write_bytes(buf, b'y', n);
                n as c_int
            });
            black_box(result.payload.len())
        })
    });
}

/// Benchmark a generated component method end to end
fn bench_component_call(c: &mut Criterion) {
    let library = Arc::new(NativeLibrary::in_process(
        "bench",
        [("G2_stats", stats_stub as usize)],
    ));
    let engine = Engine::new(library, Resizer::system(), BufferConfig::default());

    // Warm up the symbol cache
    let _ = engine.stats();

    c.bench_function("engine_stats", |b| {
        b.iter(|| {
            let result = engine.stats().unwrap();
            black_box(result.status)
        })
    });
}

criterion_group!(benches, bench_growable, bench_fixed, bench_component_call);
criterion_main!(benches);
