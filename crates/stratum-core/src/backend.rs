//! Bulk numeric backends over contiguous buffers.
//!
//! [`BulkOps`] is the one extension point the dense operations expose: a
//! set of kernels over raw contiguous slices (reductions, dot, gemm and
//! element-wise maps). Element types opt in through
//! [`Element::bulk_ops`](crate::Element::bulk_ops); `f32` and `f64` use
//! [`ScalarOps`], or [`ParallelOps`] with the `parallel` feature.
//!
//! A backend only changes speed. Element-wise kernels and gemm produce the
//! same values as the generic strided path; sums may differ by rounding
//! when a backend reorders additions.
//!
//! # Examples
//!
//! ```
//! use stratum_core::backend::{BulkOps, ScalarOps};
//!
//! let ops = ScalarOps;
//! let x = [1.0_f64, 2.0, 3.0];
//! assert_eq!(BulkOps::<f64>::sum(&ops, &x), 6.0);
//! assert_eq!(BulkOps::<f64>::dot(&ops, &x, &x), 14.0);
//! ```

use crate::types::count_as;
use scirs2_core::numeric::Float;

#[cfg(feature = "parallel")]
use scirs2_core::parallel_ops::*;

/// Kernels over contiguous buffers.
///
/// Output slices are pre-allocated by the caller with the same length as
/// the inputs. `gemm` computes `c = a · b` for row-major `a: m×k`,
/// `b: k×n`, `c: m×n`, overwriting `c`.
pub trait BulkOps<T>: Send + Sync {
    /// Short name used in trace logs.
    fn name(&self) -> &'static str;

    /// Sum of `x`; zero when empty.
    fn sum(&self, x: &[T]) -> T;

    /// Arithmetic mean of `x`.
    fn mean(&self, x: &[T]) -> T;

    /// Inner product of equal-length slices.
    fn dot(&self, a: &[T], b: &[T]) -> T;

    /// Row-major matrix product `c = a · b`.
    fn gemm(&self, m: usize, n: usize, k: usize, a: &[T], b: &[T], c: &mut [T]);

    /// `out[i] = a[i] + b[i]`
    fn add(&self, a: &[T], b: &[T], out: &mut [T]);

    /// `out[i] = a[i] - b[i]`
    fn sub(&self, a: &[T], b: &[T], out: &mut [T]);

    /// `out[i] = a[i] * b[i]`
    fn mul(&self, a: &[T], b: &[T], out: &mut [T]);

    /// `out[i] = a[i] / b[i]`
    fn div(&self, a: &[T], b: &[T], out: &mut [T]);

    /// `out[i] = x[i] + s`
    fn scalar_add(&self, x: &[T], s: T, out: &mut [T]);

    /// `out[i] = x[i] * s`
    fn scalar_mul(&self, x: &[T], s: T, out: &mut [T]);

    /// `out[i] = -x[i]`
    fn neg(&self, x: &[T], out: &mut [T]);
}

/// Sequential slice kernels.
///
/// Tight loops over slices that the compiler can vectorize. Also the
/// reference implementation other backends are tested against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarOps;

impl<T: Float + Send + Sync> BulkOps<T> for ScalarOps {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn sum(&self, x: &[T]) -> T {
        x.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    fn mean(&self, x: &[T]) -> T {
        self.sum(x) / count_as(x.len())
    }

    fn dot(&self, a: &[T], b: &[T]) -> T {
        a.iter()
            .zip(b)
            .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
    }

    fn gemm(&self, m: usize, n: usize, k: usize, a: &[T], b: &[T], c: &mut [T]) {
        debug_assert_eq!(a.len(), m * k);
        debug_assert_eq!(b.len(), k * n);
        debug_assert_eq!(c.len(), m * n);
        c.fill(T::zero());
        // i-p-j order streams rows of b; each c[i][j] still accumulates over p in order.
        for i in 0..m {
            let c_row = &mut c[i * n..(i + 1) * n];
            for p in 0..k {
                let a_ip = a[i * k + p];
                let b_row = &b[p * n..(p + 1) * n];
                for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                    *c_ij = *c_ij + a_ip * b_pj;
                }
            }
        }
    }

    fn add(&self, a: &[T], b: &[T], out: &mut [T]) {
        zip_into(a, b, out, |x, y| x + y);
    }

    fn sub(&self, a: &[T], b: &[T], out: &mut [T]) {
        zip_into(a, b, out, |x, y| x - y);
    }

    fn mul(&self, a: &[T], b: &[T], out: &mut [T]) {
        zip_into(a, b, out, |x, y| x * y);
    }

    fn div(&self, a: &[T], b: &[T], out: &mut [T]) {
        zip_into(a, b, out, |x, y| x / y);
    }

    fn scalar_add(&self, x: &[T], s: T, out: &mut [T]) {
        map_into(x, out, |v| v + s);
    }

    fn scalar_mul(&self, x: &[T], s: T, out: &mut [T]) {
        map_into(x, out, |v| v * s);
    }

    fn neg(&self, x: &[T], out: &mut [T]) {
        map_into(x, out, |v| -v);
    }
}

fn zip_into<T: Copy>(a: &[T], b: &[T], out: &mut [T], f: impl Fn(T, T) -> T) {
    debug_assert!(a.len() == b.len() && b.len() == out.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = f(x, y);
    }
}

fn map_into<T: Copy>(x: &[T], out: &mut [T], f: impl Fn(T) -> T) {
    debug_assert_eq!(x.len(), out.len());
    for (o, &v) in out.iter_mut().zip(x) {
        *o = f(v);
    }
}

/// Buffers shorter than this run on [`ScalarOps`] even with the parallel
/// backend selected.
pub const PARALLEL_THRESHOLD: usize = 1 << 15;

#[cfg(feature = "parallel")]
const SUM_CHUNK: usize = 1 << 12;

/// Multi-threaded kernels built on `scirs2_core::parallel_ops`.
///
/// Element-wise kernels and gemm split work by output element or output
/// row, so results equal [`ScalarOps`] exactly. Sums are reduced in chunks
/// and may differ from sequential order by rounding.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelOps;

#[cfg(feature = "parallel")]
impl<T: Float + Send + Sync> BulkOps<T> for ParallelOps {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn sum(&self, x: &[T]) -> T {
        if x.len() < PARALLEL_THRESHOLD {
            return ScalarOps.sum(x);
        }
        x.par_chunks(SUM_CHUNK)
            .map(|chunk| chunk.iter().fold(T::zero(), |acc, &v| acc + v))
            .reduce(T::zero, |a, b| a + b)
    }

    fn mean(&self, x: &[T]) -> T {
        self.sum(x) / count_as(x.len())
    }

    fn dot(&self, a: &[T], b: &[T]) -> T {
        if a.len() < PARALLEL_THRESHOLD {
            return ScalarOps.dot(a, b);
        }
        a.par_chunks(SUM_CHUNK)
            .zip(b.par_chunks(SUM_CHUNK))
            .map(|(xa, xb)| {
                xa.iter()
                    .zip(xb)
                    .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
            })
            .reduce(T::zero, |a, b| a + b)
    }

    fn gemm(&self, m: usize, n: usize, k: usize, a: &[T], b: &[T], c: &mut [T]) {
        if n == 0 || m * n * k < PARALLEL_THRESHOLD {
            return ScalarOps.gemm(m, n, k, a, b, c);
        }
        c.par_chunks_mut(n).enumerate().for_each(|(i, c_row)| {
            c_row.fill(T::zero());
            for p in 0..k {
                let a_ip = a[i * k + p];
                let b_row = &b[p * n..(p + 1) * n];
                for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                    *c_ij = *c_ij + a_ip * b_pj;
                }
            }
        });
    }

    fn add(&self, a: &[T], b: &[T], out: &mut [T]) {
        par_zip_into(a, b, out, |x, y| x + y);
    }

    fn sub(&self, a: &[T], b: &[T], out: &mut [T]) {
        par_zip_into(a, b, out, |x, y| x - y);
    }

    fn mul(&self, a: &[T], b: &[T], out: &mut [T]) {
        par_zip_into(a, b, out, |x, y| x * y);
    }

    fn div(&self, a: &[T], b: &[T], out: &mut [T]) {
        par_zip_into(a, b, out, |x, y| x / y);
    }

    fn scalar_add(&self, x: &[T], s: T, out: &mut [T]) {
        par_map_into(x, out, move |v| v + s);
    }

    fn scalar_mul(&self, x: &[T], s: T, out: &mut [T]) {
        par_map_into(x, out, move |v| v * s);
    }

    fn neg(&self, x: &[T], out: &mut [T]) {
        par_map_into(x, out, |v| -v);
    }
}

#[cfg(feature = "parallel")]
fn par_zip_into<T>(a: &[T], b: &[T], out: &mut [T], f: impl Fn(T, T) -> T + Send + Sync)
where
    T: Copy + Send + Sync,
{
    if out.len() < PARALLEL_THRESHOLD {
        return zip_into(a, b, out, f);
    }
    out.par_iter_mut()
        .zip(a.par_iter())
        .zip(b.par_iter())
        .for_each(|((o, &x), &y)| *o = f(x, y));
}

#[cfg(feature = "parallel")]
fn par_map_into<T>(x: &[T], out: &mut [T], f: impl Fn(T) -> T + Send + Sync)
where
    T: Copy + Send + Sync,
{
    if out.len() < PARALLEL_THRESHOLD {
        return map_into(x, out, f);
    }
    out.par_iter_mut()
        .zip(x.par_iter())
        .for_each(|(o, &v)| *o = f(v));
}

/// Backend used for the primitive float types.
#[cfg(feature = "parallel")]
pub fn float_ops<T: Float + Send + Sync + 'static>() -> &'static dyn BulkOps<T> {
    &ParallelOps
}

/// Backend used for the primitive float types.
#[cfg(not(feature = "parallel"))]
pub fn float_ops<T: Float + Send + Sync + 'static>() -> &'static dyn BulkOps<T> {
    &ScalarOps
}
