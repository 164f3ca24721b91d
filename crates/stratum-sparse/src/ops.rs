//! Operations shared by the sparse formats
//!
//! - **Merges**: sorted union and intersection used by element-wise
//!   arithmetic in both COO (over coordinate tuples) and CSR (over the
//!   column indices of one row)
//! - **[`SparseOps`]**: format-independent queries
//! - **Operators**: `+`, `-`, `*` between sparse operands of equal shape,
//!   scaling by a scalar, and negation
//!
//! Operators panic when the shapes differ; the `try_*` methods on each
//! format return the error instead.
//!
//! # Examples
//!
//! ```
//! use stratum_sparse::{CsrMatrix, SparseOps};
//!
//! let a = CsrMatrix::new(vec![0, 1, 2], vec![0, 1], vec![1.0, 2.0], (2, 2)).unwrap();
//! let b = CsrMatrix::new(vec![0, 1, 1], vec![1], vec![5.0], (2, 2)).unwrap();
//!
//! let c = &a + &b;
//! assert_eq!(c.nnz(), 3);
//! assert_eq!((&c * 2.0).values(), &[2.0, 10.0, 4.0]);
//! assert_eq!(SparseOps::density(&c), 0.75);
//! ```

use crate::coo::CooTensor;
use crate::csr::CsrMatrix;
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use stratum_core::{DenseND, Element};

/// Source of the next output entry in a two-way sorted merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeStep {
    /// Entry `i` exists only in the left operand
    Lhs(usize),
    /// Entry `j` exists only in the right operand
    Rhs(usize),
    /// Left entry `i` and right entry `j` share a key
    Both(usize, usize),
}

/// Walk two sorted entry lists in key order.
///
/// `cmp(i, j)` orders left entry `i` against right entry `j`; `step` is
/// called once per distinct key, in ascending order.
pub(crate) fn merge_steps(
    lhs_len: usize,
    rhs_len: usize,
    cmp: impl Fn(usize, usize) -> Ordering,
    mut step: impl FnMut(MergeStep),
) {
    let (mut i, mut j) = (0, 0);
    while i < lhs_len && j < rhs_len {
        match cmp(i, j) {
            Ordering::Less => {
                step(MergeStep::Lhs(i));
                i += 1;
            }
            Ordering::Greater => {
                step(MergeStep::Rhs(j));
                j += 1;
            }
            Ordering::Equal => {
                step(MergeStep::Both(i, j));
                i += 1;
                j += 1;
            }
        }
    }
    (i..lhs_len).for_each(|i| step(MergeStep::Lhs(i)));
    (j..rhs_len).for_each(|j| step(MergeStep::Rhs(j)));
}

/// Merge two sorted key lists, keeping every key present in either.
///
/// Keys only in `lhs` pass through unchanged, keys only in `rhs` go through
/// `rhs_only`, and shared keys combine with `both`. Output is appended to
/// `keys`/`values` in ascending key order.
pub(crate) fn merge_union<T: Copy>(
    (lhs_keys, lhs_values): (&[usize], &[T]),
    (rhs_keys, rhs_values): (&[usize], &[T]),
    both: impl Fn(T, T) -> T,
    rhs_only: impl Fn(T) -> T,
    keys: &mut Vec<usize>,
    values: &mut Vec<T>,
) {
    merge_steps(
        lhs_keys.len(),
        rhs_keys.len(),
        |i, j| lhs_keys[i].cmp(&rhs_keys[j]),
        |step| {
            let (key, value) = match step {
                MergeStep::Lhs(i) => (lhs_keys[i], lhs_values[i]),
                MergeStep::Rhs(j) => (rhs_keys[j], rhs_only(rhs_values[j])),
                MergeStep::Both(i, j) => (lhs_keys[i], both(lhs_values[i], rhs_values[j])),
            };
            keys.push(key);
            values.push(value);
        },
    );
}

/// Merge two sorted key lists, keeping only keys present in both.
pub(crate) fn merge_intersection<T: Copy>(
    (lhs_keys, lhs_values): (&[usize], &[T]),
    (rhs_keys, rhs_values): (&[usize], &[T]),
    both: impl Fn(T, T) -> T,
    keys: &mut Vec<usize>,
    values: &mut Vec<T>,
) {
    merge_steps(
        lhs_keys.len(),
        rhs_keys.len(),
        |i, j| lhs_keys[i].cmp(&rhs_keys[j]),
        |step| {
            if let MergeStep::Both(i, j) = step {
                keys.push(lhs_keys[i]);
                values.push(both(lhs_values[i], rhs_values[j]));
            }
        },
    );
}

/// Product of `shape`, or `None` if it does not fit in `usize`.
pub(crate) fn checked_size(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

/// `nnz / prod(shape)` computed in floating point; zero for an empty shape.
pub(crate) fn density_of(nnz: usize, shape: &[usize]) -> f64 {
    let total: f64 = shape.iter().map(|&n| n as f64).product();
    if total == 0.0 {
        0.0
    } else {
        nnz as f64 / total
    }
}

/// Format-independent view of a sparse tensor.
pub trait SparseOps<T: Element> {
    /// Logical shape as a list of extents
    fn shape_vec(&self) -> Vec<usize>;

    /// Number of stored entries, explicit zeros included
    fn nnz(&self) -> usize;

    /// Number of logical elements, saturating at `usize::MAX`
    fn len(&self) -> usize {
        checked_size(&self.shape_vec()).unwrap_or(usize::MAX)
    }

    /// True when some axis has length zero
    fn is_empty(&self) -> bool {
        self.shape_vec().contains(&0)
    }

    /// Fraction of logical elements that are stored
    fn density(&self) -> f64 {
        density_of(self.nnz(), &self.shape_vec())
    }

    /// Materialize with zeros at unstored positions
    fn to_dense(&self) -> DenseND<T>;

    /// Sum of all stored values
    fn sum(&self) -> T;
}

impl<T: Element> SparseOps<T> for CooTensor<T> {
    fn shape_vec(&self) -> Vec<usize> {
        self.shape().to_vec()
    }

    fn nnz(&self) -> usize {
        CooTensor::nnz(self)
    }

    fn to_dense(&self) -> DenseND<T> {
        CooTensor::to_dense(self)
    }

    fn sum(&self) -> T {
        CooTensor::sum(self)
    }
}

impl<T: Element> SparseOps<T> for CsrMatrix<T> {
    fn shape_vec(&self) -> Vec<usize> {
        vec![self.nrows(), self.ncols()]
    }

    fn nnz(&self) -> usize {
        CsrMatrix::nnz(self)
    }

    fn to_dense(&self) -> DenseND<T> {
        CsrMatrix::to_dense(self)
    }

    fn sum(&self) -> T {
        CsrMatrix::sum(self)
    }
}

macro_rules! impl_sparse_binary_op {
    ($ty:ident, $trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $checked:ident) => {
        impl<T: Element> $trait<&$ty<T>> for &$ty<T> {
            type Output = $ty<T>;

            fn $method(self, rhs: &$ty<T>) -> $ty<T> {
                self.$checked(rhs).unwrap_or_else(|err| {
                    panic!("sparse `{}` failed: {}", stringify!($method), err)
                })
            }
        }

        impl<T: Element> $trait<$ty<T>> for $ty<T> {
            type Output = $ty<T>;

            fn $method(self, rhs: $ty<T>) -> $ty<T> {
                (&self).$method(&rhs)
            }
        }

        impl<T: Element> $trait<&$ty<T>> for $ty<T> {
            type Output = $ty<T>;

            fn $method(self, rhs: &$ty<T>) -> $ty<T> {
                (&self).$method(rhs)
            }
        }

        impl<T: Element> $trait<$ty<T>> for &$ty<T> {
            type Output = $ty<T>;

            fn $method(self, rhs: $ty<T>) -> $ty<T> {
                self.$method(&rhs)
            }
        }

        impl<T: Element> $assign_trait<&$ty<T>> for $ty<T> {
            fn $assign_method(&mut self, rhs: &$ty<T>) {
                *self = (&*self).$method(rhs);
            }
        }

        impl<T: Element> $assign_trait<$ty<T>> for $ty<T> {
            fn $assign_method(&mut self, rhs: $ty<T>) {
                *self = (&*self).$method(&rhs);
            }
        }
    };
}

// Scaling keeps the sparsity structure, so only `*` and `/` take a scalar.
macro_rules! impl_sparse_scalar_ops {
    ($ty:ident) => {
        impl<T: Element> Mul<T> for &$ty<T> {
            type Output = $ty<T>;

            fn mul(self, rhs: T) -> $ty<T> {
                self.map_values(|v| v * rhs)
            }
        }

        impl<T: Element> Mul<T> for $ty<T> {
            type Output = $ty<T>;

            fn mul(self, rhs: T) -> $ty<T> {
                self.map_values(|v| v * rhs)
            }
        }

        impl<T: Element> Div<T> for &$ty<T> {
            type Output = $ty<T>;

            fn div(self, rhs: T) -> $ty<T> {
                self.map_values(|v| v / rhs)
            }
        }

        impl<T: Element> Div<T> for $ty<T> {
            type Output = $ty<T>;

            fn div(self, rhs: T) -> $ty<T> {
                self.map_values(|v| v / rhs)
            }
        }

        impl<T: Element> MulAssign<T> for $ty<T> {
            fn mul_assign(&mut self, rhs: T) {
                for v in self.values_mut() {
                    *v = *v * rhs;
                }
            }
        }

        impl<T: Element> DivAssign<T> for $ty<T> {
            fn div_assign(&mut self, rhs: T) {
                for v in self.values_mut() {
                    *v = *v / rhs;
                }
            }
        }

        impl<T: Element + Neg<Output = T>> Neg for &$ty<T> {
            type Output = $ty<T>;

            fn neg(self) -> $ty<T> {
                self.map_values(|v| -v)
            }
        }

        impl<T: Element + Neg<Output = T>> Neg for $ty<T> {
            type Output = $ty<T>;

            fn neg(self) -> $ty<T> {
                self.map_values(|v| -v)
            }
        }
    };
}

impl_sparse_binary_op!(CooTensor, Add, add, AddAssign, add_assign, try_add);
impl_sparse_binary_op!(CooTensor, Sub, sub, SubAssign, sub_assign, try_sub);
impl_sparse_binary_op!(CooTensor, Mul, mul, MulAssign, mul_assign, try_mul);
impl_sparse_binary_op!(CsrMatrix, Add, add, AddAssign, add_assign, try_add);
impl_sparse_binary_op!(CsrMatrix, Sub, sub, SubAssign, sub_assign, try_sub);
impl_sparse_binary_op!(CsrMatrix, Mul, mul, MulAssign, mul_assign, try_mul);
impl_sparse_scalar_ops!(CooTensor);
impl_sparse_scalar_ops!(CsrMatrix);

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),* $(,)?) => {
        $(
            impl Mul<&CooTensor<$t>> for $t {
                type Output = CooTensor<$t>;

                fn mul(self, rhs: &CooTensor<$t>) -> CooTensor<$t> {
                    rhs.map_values(|v| self * v)
                }
            }

            impl Mul<CooTensor<$t>> for $t {
                type Output = CooTensor<$t>;

                fn mul(self, rhs: CooTensor<$t>) -> CooTensor<$t> {
                    rhs.map_values(|v| self * v)
                }
            }

            impl Mul<&CsrMatrix<$t>> for $t {
                type Output = CsrMatrix<$t>;

                fn mul(self, rhs: &CsrMatrix<$t>) -> CsrMatrix<$t> {
                    rhs.map_values(|v| self * v)
                }
            }

            impl Mul<CsrMatrix<$t>> for $t {
                type Output = CsrMatrix<$t>;

                fn mul(self, rhs: CsrMatrix<$t>) -> CsrMatrix<$t> {
                    rhs.map_values(|v| self * v)
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_union_order_and_tails() {
        let (mut keys, mut values) = (Vec::new(), Vec::new());
        merge_union(
            (&[1, 4, 9][..], &[1, 4, 9][..]),
            (&[0, 4, 5, 12][..], &[10, 40, 50, 120][..]),
            |a, b| a + b,
            |b| -b,
            &mut keys,
            &mut values,
        );
        assert_eq!(keys, vec![0, 1, 4, 5, 9, 12]);
        assert_eq!(values, vec![-10, 1, 44, -50, 9, -120]);
    }

    #[test]
    fn test_merge_intersection() {
        let (mut keys, mut values) = (Vec::new(), Vec::new());
        merge_intersection(
            (&[1, 4, 9][..], &[2.0, 3.0, 4.0][..]),
            (&[4, 9, 10][..], &[5.0, 6.0, 7.0][..]),
            |a, b| a * b,
            &mut keys,
            &mut values,
        );
        assert_eq!(keys, vec![4, 9]);
        assert_eq!(values, vec![15.0, 24.0]);
    }

    #[test]
    fn test_merge_appends_to_existing_output() {
        let (mut keys, mut values) = (vec![7], vec![7]);
        merge_union((&[][..], &[][..]), (&[2][..], &[3][..]), |a, b| a + b, |b| b, &mut keys, &mut values);
        assert_eq!(keys, vec![7, 2]);
        assert_eq!(values, vec![7, 3]);
    }

    #[test]
    fn test_merge_steps_order() {
        let (lhs, rhs) = ([2, 5], [1, 5, 8]);
        let mut steps = Vec::new();
        merge_steps(lhs.len(), rhs.len(), |i, j| lhs[i].cmp(&rhs[j]), |step| steps.push(step));
        assert_eq!(
            steps,
            vec![
                MergeStep::Rhs(0),
                MergeStep::Lhs(0),
                MergeStep::Both(1, 1),
                MergeStep::Rhs(2),
            ]
        );
    }

    #[test]
    fn test_size_helpers_do_not_overflow() {
        assert_eq!(checked_size(&[3, 4]), Some(12));
        assert_eq!(checked_size(&[]), Some(1));
        assert_eq!(checked_size(&[1 << 33, 1 << 33]), None);
        assert_eq!(density_of(1, &[0, 5]), 0.0);
        assert_eq!(density_of(2, &[1 << 40, 1 << 40]), 2.0 / 2f64.powi(80));
    }

    fn coo(entries: Vec<(Vec<usize>, f64)>) -> CooTensor<f64> {
        CooTensor::from_entries(entries, vec![2, 3]).unwrap()
    }

    #[test]
    fn test_coo_operators() {
        let a = coo(vec![(vec![0, 0], 1.0), (vec![1, 2], 2.0)]);
        let b = coo(vec![(vec![1, 2], 3.0), (vec![0, 1], 4.0)]);

        assert_eq!((&a + &b).values(), &[1.0, 4.0, 5.0]);
        assert_eq!((a.clone() - b.clone()).values(), &[1.0, -4.0, -1.0]);
        assert_eq!((&a * b.clone()).values(), &[6.0]);
        assert_eq!((2.0 * &a).values(), &[2.0, 4.0]);
        assert_eq!((a.clone() / 2.0).values(), &[0.5, 1.0]);
        assert_eq!((-&a).values(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_csr_compound_assignment() {
        let mut a = CsrMatrix::new(vec![0, 1, 2], vec![0, 1], vec![1, 2], (2, 2)).unwrap();
        let b = CsrMatrix::new(vec![0, 1, 1], vec![1], vec![5], (2, 2)).unwrap();
        a += &b;
        a *= 3;
        assert_eq!(a.values(), &[3, 15, 6]);
        a -= b;
        assert_eq!(a.values(), &[3, 10, 6]);
        a /= 3;
        assert_eq!(a.values(), &[1, 3, 2]);
    }

    #[test]
    fn test_sparse_ops_trait_is_format_independent() {
        fn summary<S: SparseOps<f64>>(s: &S) -> (Vec<usize>, usize, f64, f64) {
            (s.shape_vec(), s.nnz(), s.density(), s.sum())
        }

        let coo = coo(vec![(vec![0, 0], 1.0), (vec![1, 2], 2.0)]);
        let csr = CsrMatrix::from_coo(&coo).unwrap();
        assert_eq!(summary(&coo), summary(&csr));
        assert_eq!(SparseOps::to_dense(&coo), SparseOps::to_dense(&csr));
        assert_eq!(summary(&coo).2, 2.0 / 6.0);
    }

    #[test]
    #[should_panic(expected = "sparse `add` failed")]
    fn test_operator_shape_mismatch_panics() {
        let a = CsrMatrix::<f64>::zeros((2, 2));
        let b = CsrMatrix::<f64>::zeros((2, 3));
        let _ = &a + &b;
    }
}
