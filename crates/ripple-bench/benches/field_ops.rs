//! Criterion micro-benchmarks for the spherical engine's hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ripple_bench::{reference_field, walled_field};

/// Benchmark: one tick over 64 emitters with mature wavefronts — the
/// O(wavefronts × objects) intersection sweep dominates.
fn bench_intersection_sweep_64(c: &mut Criterion) {
    let (mut field, _queues) = reference_field(64, 10.0);
    for tick in 1..=8 {
        field.update(f64::from(tick) * 0.5, &[]);
    }

    let mut now = 4.0;
    c.bench_function("intersection_sweep_64", |b| {
        b.iter(|| {
            now += 0.5;
            let report = field.update(now, &[]);
            black_box(&report);
        });
    });
}

/// Benchmark: one tick with every wavefront re-deriving mirrors off a
/// surrounding obstacle box.
fn bench_reflection_pass_64(c: &mut Criterion) {
    let (mut field, _queues, bounds) = walled_field(64, 10.0);
    let obstacles = vec![bounds];
    for tick in 1..=40 {
        field.update(f64::from(tick), &obstacles);
    }

    let mut now = 40.0;
    c.bench_function("reflection_pass_64", |b| {
        b.iter(|| {
            now += 0.5;
            let report = field.update(now, &obstacles);
            black_box(&report);
        });
    });
}

/// Benchmark: a 100-tick run from empty, spawn through retirement.
fn bench_hundred_tick_run(c: &mut Criterion) {
    c.bench_function("hundred_tick_run", |b| {
        b.iter(|| {
            let (mut field, _queues) = reference_field(16, 5.0);
            for tick in 1..=100 {
                field.update(f64::from(tick) * 0.25, &[]);
            }
            black_box(field.wavefronts().count())
        });
    });
}

criterion_group!(
    benches,
    bench_intersection_sweep_64,
    bench_reflection_pass_64,
    bench_hundred_tick_run
);
criterion_main!(benches);
