//! Compares dispatch through warm cache cells against the cache-less
//! resolve-every-time path.
//!
//! Run with:
//!   cargo bench --bench dispatch_cache

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bytecode::BytecodeBuilder;
use object::Value;
use vm::{CodeUnit, MethodTable, run_with_output};

/// `Arg 0 (Arg 1, Add)^n Halt` — a long fold with `n` dispatch sites.
fn fold_bytes(adds: usize) -> Vec<u8> {
    let mut b = BytecodeBuilder::new();
    b.arg(0);
    for _ in 0..adds {
        b.arg(1);
        b.add();
    }
    b.halt();
    b.into_bytes()
}

fn bench_dispatch(c: &mut Criterion) {
    let methods = MethodTable::with_defaults();
    let args = [Value::from_i64(1), Value::from_i64(1)];
    let bytes = fold_bytes(120);
    let mut sink = std::io::sink();

    let mut cached = CodeUnit::new(bytes.clone());
    // Fill every cell so the measured runs are pure hits.
    let warmup = run_with_output(&methods, &mut cached, &args, &mut sink).expect("warmup");
    black_box(warmup);

    c.bench_function("fold_with_cache", |b| {
        b.iter(|| {
            let value = run_with_output(&methods, &mut cached, &args, &mut sink)
                .expect("interpret");
            black_box(value);
        })
    });

    let mut uncached = CodeUnit::without_cache(bytes);
    c.bench_function("fold_without_cache", |b| {
        b.iter(|| {
            let value = run_with_output(&methods, &mut uncached, &args, &mut sink)
                .expect("interpret");
            black_box(value);
        })
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
