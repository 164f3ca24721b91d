//! Benchmarks for dense arithmetic, reductions and products.
//!
//! Compares contiguous and strided operands, the float bulk backend against
//! the generic integer path, and eager evaluation against lazy fusion.
//!
//! Run with:
//! ```bash
//! cargo bench --bench dense_ops
//! cargo bench --bench dense_ops --features parallel
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use stratum_core::{DenseND, TensorExpression};

fn ramp_f64(shape: &[usize]) -> DenseND<f64> {
    let len: usize = shape.iter().product();
    DenseND::from_vec((0..len).map(|i| (i % 97) as f64 * 0.5).collect(), shape).unwrap()
}

fn ramp_i64(shape: &[usize]) -> DenseND<i64> {
    let len: usize = shape.iter().product();
    DenseND::from_vec((0..len).map(|i| (i % 97) as i64).collect(), shape).unwrap()
}

/// Element-wise addition: contiguous vs transposed vs broadcast operands
fn bench_elementwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("elementwise_add");

    for size in [128usize, 512, 1024] {
        let a = ramp_f64(&[size, size]);
        let b = ramp_f64(&[size, size]);
        let bt = b.transpose().unwrap();
        let row = ramp_f64(&[size]);
        let ai = ramp_i64(&[size, size]);
        let bi = ramp_i64(&[size, size]);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("f64_contiguous", size), &size, |bench, _| {
            bench.iter(|| black_box(&a + &b));
        });
        group.bench_with_input(BenchmarkId::new("f64_transposed", size), &size, |bench, _| {
            bench.iter(|| black_box(&a + &bt));
        });
        group.bench_with_input(BenchmarkId::new("f64_broadcast_row", size), &size, |bench, _| {
            bench.iter(|| black_box(&a + &row));
        });
        group.bench_with_input(BenchmarkId::new("i64_generic", size), &size, |bench, _| {
            bench.iter(|| black_box(&ai + &bi));
        });
    }

    group.finish();
}

/// Fused lazy chain vs the same chain evaluated eagerly
fn bench_lazy_fusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_fusion");

    for size in [256usize, 1024] {
        let a = ramp_f64(&[size, size]);
        let b = ramp_f64(&[size, size]);
        let d = ramp_f64(&[size, size]);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("eager", size), &size, |bench, _| {
            bench.iter(|| black_box(&(&(&a + &b) * &d) - &a));
        });
        group.bench_with_input(BenchmarkId::new("lazy", size), &size, |bench, _| {
            bench.iter(|| black_box(((a.lazy() + b.lazy()) * d.lazy() - a.lazy()).evaluate()));
        });
    }

    group.finish();
}

/// Full and per-axis reductions
fn bench_reductions(c: &mut Criterion) {
    let mut group = c.benchmark_group("reductions");

    let t = ramp_f64(&[64, 128, 128]);
    group.throughput(Throughput::Elements(t.len() as u64));

    group.bench_function("sum", |b| b.iter(|| black_box(t.sum())));
    for axis in 0..3 {
        group.bench_with_input(BenchmarkId::new("sum_axis", axis), &axis, |b, &axis| {
            b.iter(|| black_box(t.sum_axis(axis).unwrap()));
        });
    }
    group.bench_function("mean", |b| b.iter(|| black_box(t.mean())));

    group.finish();
}

/// Matrix multiplication through the bulk backend and the generic path
fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    group.sample_size(20);

    for size in [32usize, 128, 256] {
        let a = ramp_f64(&[size, size]);
        let b = ramp_f64(&[size, size]);
        let ai = ramp_i64(&[size, size]);
        let bi = ramp_i64(&[size, size]);
        group.throughput(Throughput::Elements((size * size * size) as u64));

        group.bench_with_input(BenchmarkId::new("f64", size), &size, |bench, _| {
            bench.iter(|| black_box(a.matmul(&b).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("i64", size), &size, |bench, _| {
            bench.iter(|| black_box(ai.matmul(&bi).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_elementwise,
    bench_lazy_fusion,
    bench_reductions,
    bench_matmul
);
criterion_main!(benches);
