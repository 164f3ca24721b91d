//! Benchmarks for view construction and materialization.
//!
//! Reshape, permute, slice and broadcast only build a new layout; the cost
//! shows up when a strided view is copied out with `to_contiguous`.
//!
//! Run with:
//! ```bash
//! cargo bench --bench reshape_permute
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use stratum_core::DenseND;

/// Benchmark reshape operations for various tensor sizes
fn bench_reshape(c: &mut Criterion) {
    let mut group = c.benchmark_group("reshape");

    let test_cases = vec![
        ("2d_to_1d", vec![1000, 1000], vec![1_000_000]),
        ("1d_to_2d", vec![1_000_000], vec![1000, 1000]),
        ("3d_to_2d", vec![100, 100, 100], vec![10000, 100]),
        ("4d_to_2d", vec![10, 20, 30, 40], vec![200, 1200]),
    ];

    for (name, from_shape, to_shape) in test_cases {
        let tensor = DenseND::<f64>::ones(&from_shape);
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(&tensor, &to_shape),
            |b, (tensor, to_shape)| {
                b.iter(|| {
                    let reshaped = tensor.reshape(black_box(to_shape)).unwrap();
                    black_box(reshaped);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark permute operations for various permutations
fn bench_permute(c: &mut Criterion) {
    let mut group = c.benchmark_group("permute");

    let test_cases = vec![
        ("2d_transpose", vec![1000, 1000], vec![1, 0]),
        ("3d_cycle", vec![100, 100, 100], vec![2, 0, 1]),
        ("4d_reverse", vec![50, 50, 50, 50], vec![3, 2, 1, 0]),
        (
            "batch_channels_first",
            vec![32, 64, 64, 3],
            vec![0, 3, 1, 2],
        ),
    ];

    for (name, shape, perm) in test_cases {
        let tensor = DenseND::<f64>::ones(&shape);
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(&tensor, &perm),
            |b, (tensor, perm)| {
                b.iter(|| {
                    let permuted = tensor.permute(black_box(perm)).unwrap();
                    black_box(permuted);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark slicing and broadcasting (layout-only views)
fn bench_slice_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_broadcast");

    let tensor = DenseND::<f64>::ones(&[100, 200, 300]);
    group.bench_function("slice_middle_axis", |b| {
        b.iter(|| {
            let view = tensor.slice_axis(1, black_box(50..150)).unwrap();
            black_box(view);
        });
    });

    let row = DenseND::<f64>::ones(&[1, 1000]);
    group.bench_function("broadcast_row", |b| {
        b.iter(|| {
            let view = row.broadcast_to(black_box(&[1000, 1000])).unwrap();
            black_box(view);
        });
    });

    group.finish();
}

/// Benchmark copying strided views into contiguous buffers
fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");

    for size in [64usize, 256, 1024] {
        let matrix = DenseND::<f64>::ones(&[size, size]);
        let transposed = matrix.transpose().unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("transpose", size), &transposed, |b, t| {
            b.iter(|| black_box(t.to_contiguous()));
        });

        let cube = DenseND::<f64>::ones(&[size / 4, size, 4]);
        let permuted = cube.permute(&[2, 0, 1]).unwrap();
        group.bench_with_input(BenchmarkId::new("permute_3d", size), &permuted, |b, t| {
            b.iter(|| black_box(t.to_contiguous()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_reshape,
    bench_permute,
    bench_slice_broadcast,
    bench_materialize
);

criterion_main!(benches);
