//! COO (Coordinate) sparse tensor format
//!
//! The Coordinate format stores an N-dimensional sparse tensor as parallel
//! arrays: one coordinate array per axis plus one value array.
//!
//! # Format
//!
//! - `indices`: `Vec<Vec<usize>>` - `indices[axis][k]` is the coordinate of
//!   entry `k` along `axis`
//! - `values`: `Vec<T>` - the stored values
//! - `shape`: `Vec<usize>` - the logical shape
//!
//! Entries are kept in canonical form: sorted lexicographically by
//! coordinate (axis 0 most significant) with no duplicate coordinates.
//! Construction sorts and sums duplicates; every operation preserves the
//! order, which is what lets element-wise arithmetic run as a linear merge.
//!
//! Stored values are never pruned: an entry whose value is zero (for
//! example after `a - a`) stays stored.
//!
//! # Examples
//!
//! ```
//! use stratum_sparse::coo::CooTensor;
//!
//! // 3x4 matrix with entries (2,0)=1.5, (0,1)=2.5, (1,2)=3.0
//! let rows = vec![2, 0, 1];
//! let cols = vec![0, 1, 2];
//! let coo = CooTensor::new(vec![rows, cols], vec![1.5, 2.5, 3.0], vec![3, 4]).unwrap();
//!
//! assert_eq!(coo.nnz(), 3);
//! assert_eq!(coo.shape(), &[3, 4]);
//! // Sorted by row
//! assert_eq!(coo.indices()[0], vec![0, 1, 2]);
//! assert_eq!(coo.values(), &[2.5, 3.0, 1.5]);
//! ```

use crate::ops::{checked_size, density_of, merge_steps, MergeStep};
use scirs2_core::numeric::Float;
use std::cmp::Ordering;
use stratum_core::layout::{row_major_strides, unravel_index};
use stratum_core::{DenseND, Element};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CooError {
    #[error("Shape mismatch: indices have {indices_len} axes but shape has {shape_len} dimensions")]
    RankMismatch {
        indices_len: usize,
        shape_len: usize,
    },

    #[error("Length mismatch: axis {axis} has {indices} indices but {values} values")]
    LengthMismatch {
        axis: usize,
        indices: usize,
        values: usize,
    },

    #[error("Index out of bounds: index {index:?} exceeds shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },

    #[error("Operation requires rank {expected}, got shape {shape:?}")]
    RankRequired { expected: usize, shape: Vec<usize> },

    #[error("Axis {axis} out of range for rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    #[error("Dense size of shape {shape:?} overflows usize")]
    SizeOverflow { shape: Vec<usize> },

    #[error(transparent)]
    Dense(#[from] anyhow::Error),
}

/// COO (Coordinate) sparse tensor
///
/// Flexible and easy to construct; the interchange format between dense
/// tensors and [`CsrMatrix`](crate::csr::CsrMatrix).
#[derive(Debug, Clone, PartialEq)]
pub struct CooTensor<T> {
    /// One coordinate array per axis, each of length nnz
    indices: Vec<Vec<usize>>,

    /// Values at the corresponding coordinates
    values: Vec<T>,

    /// Shape of the tensor
    shape: Vec<usize>,
}

impl<T: Element> CooTensor<T> {
    /// Create a new COO sparse tensor
    ///
    /// # Arguments
    ///
    /// * `indices` - One coordinate array per axis
    /// * `values` - Values at those coordinates
    /// * `shape` - Shape of the tensor
    ///
    /// Entries are sorted into canonical order; entries sharing a
    /// coordinate are summed into one.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The number of coordinate arrays differs from the rank
    /// - A coordinate array and `values` have different lengths
    /// - Any coordinate is out of bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::coo::CooTensor;
    ///
    /// let coo = CooTensor::new(vec![vec![3, 1, 3]], vec![1, 2, 5], vec![4]).unwrap();
    /// assert_eq!(coo.indices()[0], vec![1, 3]);
    /// assert_eq!(coo.values(), &[2, 6]);
    /// ```
    pub fn new(indices: Vec<Vec<usize>>, values: Vec<T>, shape: Vec<usize>) -> Result<Self, CooError> {
        if indices.len() != shape.len() {
            return Err(CooError::RankMismatch {
                indices_len: indices.len(),
                shape_len: shape.len(),
            });
        }
        for (axis, coords) in indices.iter().enumerate() {
            if coords.len() != values.len() {
                return Err(CooError::LengthMismatch {
                    axis,
                    indices: coords.len(),
                    values: values.len(),
                });
            }
            if let Some(entry) = coords.iter().position(|&c| c >= shape[axis]) {
                return Err(CooError::IndexOutOfBounds {
                    index: indices.iter().map(|axis_coords| axis_coords[entry]).collect(),
                    shape,
                });
            }
        }

        let compare = |&a: &usize, &b: &usize| -> Ordering {
            indices
                .iter()
                .map(|coords| coords[a].cmp(&coords[b]))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        };
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(compare);

        let mut sorted_indices: Vec<Vec<usize>> = vec![Vec::with_capacity(order.len()); shape.len()];
        let mut sorted_values: Vec<T> = Vec::with_capacity(order.len());
        let mut previous: Option<usize> = None;
        for &entry in &order {
            let duplicate = previous.is_some_and(|p| compare(&p, &entry).is_eq());
            previous = Some(entry);
            if duplicate {
                if let Some(last) = sorted_values.last_mut() {
                    *last = *last + values[entry];
                    continue;
                }
            }
            for (axis, coords) in indices.iter().enumerate() {
                sorted_indices[axis].push(coords[entry]);
            }
            sorted_values.push(values[entry]);
        }

        Ok(Self::from_sorted_parts(sorted_indices, sorted_values, shape))
    }

    /// Create from `(coordinate, value)` entries in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::coo::CooTensor;
    ///
    /// let coo = CooTensor::from_entries(
    ///     vec![(vec![1, 0], 2.0), (vec![0, 1], 1.0)],
    ///     vec![2, 2],
    /// ).unwrap();
    /// assert_eq!(coo.coordinate(0), vec![0, 1]);
    /// ```
    pub fn from_entries(entries: Vec<(Vec<usize>, T)>, shape: Vec<usize>) -> Result<Self, CooError> {
        let mut indices = vec![Vec::with_capacity(entries.len()); shape.len()];
        let mut values = Vec::with_capacity(entries.len());
        for (coordinate, value) in entries {
            if coordinate.len() != shape.len() {
                return Err(CooError::RankMismatch {
                    indices_len: coordinate.len(),
                    shape_len: shape.len(),
                });
            }
            for (axis, c) in coordinate.into_iter().enumerate() {
                indices[axis].push(c);
            }
            values.push(value);
        }
        Self::new(indices, values, shape)
    }

    /// Convert to a dense tensor; unstored positions are zero.
    ///
    /// # Complexity
    ///
    /// Time: O(nnz · rank + ∏ shape)
    ///
    /// # Panics
    ///
    /// Panics if the number of logical elements overflows `usize`.
    pub fn to_dense(&self) -> DenseND<T> {
        self.to_dense_with_default(T::zero())
    }

    /// Convert to a dense tensor with unstored positions set to `default`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::coo::CooTensor;
    ///
    /// let coo = CooTensor::new(vec![vec![1]], vec![5], vec![3]).unwrap();
    /// assert_eq!(coo.to_dense_with_default(-1).to_vec(), vec![-1, 5, -1]);
    /// ```
    pub fn to_dense_with_default(&self, default: T) -> DenseND<T> {
        if self.checked_len().is_none() {
            panic!("{}", CooError::SizeOverflow { shape: self.shape.clone() });
        }
        let mut dense = DenseND::from_elem(&self.shape, default);
        for (linear, &value) in self.linear_keys().into_iter().zip(&self.values) {
            dense.set_linear(linear, value);
        }
        dense
    }

    /// Create from a dense tensor, storing every element that is not zero.
    ///
    /// A row-major scan emits coordinates already in canonical order.
    pub fn from_dense(dense: &DenseND<T>) -> Self {
        Self::from_dense_filtered(dense, |v| v != T::zero())
    }

    fn from_dense_filtered(dense: &DenseND<T>, keep: impl Fn(T) -> bool) -> Self {
        let shape = dense.shape().to_vec();
        let mut indices = vec![Vec::new(); shape.len()];
        let mut values = Vec::new();
        for (linear, &value) in dense.iter().enumerate() {
            if !keep(value) {
                continue;
            }
            for (axis, coord) in unravel_index(&shape, linear).into_iter().enumerate() {
                indices[axis].push(coord);
            }
            values.push(value);
        }
        log::debug!(
            "coo from dense {:?}: kept {} of {} elements",
            shape,
            values.len(),
            dense.len()
        );
        Self::from_sorted_parts(indices, values, shape)
    }

    /// Merge two tensors entry by entry in canonical order.
    ///
    /// Shared coordinates combine with `both`. When `keep_unshared` is set,
    /// entries stored only on the left pass through and entries stored only
    /// on the right go through `rhs_only`; otherwise they are dropped.
    fn merge(
        &self,
        other: &Self,
        op: &'static str,
        keep_unshared: bool,
        both: impl Fn(T, T) -> T,
        rhs_only: impl Fn(T) -> T,
    ) -> Result<Self, CooError> {
        self.check_same_shape(other, op)?;
        let mut indices = vec![Vec::new(); self.rank()];
        let mut values = Vec::new();
        merge_steps(
            self.nnz(),
            other.nnz(),
            |i, j| self.compare_entries(i, other, j),
            |step| {
                let (source, entry, value) = match step {
                    MergeStep::Both(i, j) => (self, i, both(self.values[i], other.values[j])),
                    MergeStep::Lhs(i) if keep_unshared => (self, i, self.values[i]),
                    MergeStep::Rhs(j) if keep_unshared => (other, j, rhs_only(other.values[j])),
                    _ => return,
                };
                for (out, coords) in indices.iter_mut().zip(&source.indices) {
                    out.push(coords[entry]);
                }
                values.push(value);
            },
        );
        Ok(Self::from_sorted_parts(indices, values, self.shape.clone()))
    }

    /// Element-wise sum. Entries stored in only one operand pass through.
    ///
    /// # Complexity
    ///
    /// O((nnz_a + nnz_b) · rank)
    ///
    /// Entries are matched on their full coordinates, so shapes whose
    /// element count exceeds `usize` are handled exactly.
    pub fn try_add(&self, other: &Self) -> Result<Self, CooError> {
        self.merge(other, "add", true, |a, b| a + b, |b| b)
    }

    /// Element-wise difference. Entries stored only in `other` are negated.
    pub fn try_sub(&self, other: &Self) -> Result<Self, CooError> {
        self.merge(other, "sub", true, |a, b| a - b, |b| T::zero() - b)
    }

    /// Hadamard product: only coordinates stored in both operands survive.
    pub fn try_mul(&self, other: &Self) -> Result<Self, CooError> {
        self.merge(other, "mul", false, |a, b| a * b, |b| b)
    }

    /// Inner product of two rank-1 tensors.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::coo::CooTensor;
    ///
    /// let a = CooTensor::new(vec![vec![0, 2, 3]], vec![1, 2, 3], vec![5]).unwrap();
    /// let b = CooTensor::new(vec![vec![2, 3, 4]], vec![10, 10, 10], vec![5]).unwrap();
    /// assert_eq!(a.dot(&b).unwrap(), 50);
    /// ```
    pub fn dot(&self, other: &Self) -> Result<T, CooError> {
        for tensor in [self, other] {
            if tensor.rank() != 1 {
                return Err(CooError::RankRequired {
                    expected: 1,
                    shape: tensor.shape.clone(),
                });
            }
        }
        let products = self.merge(other, "dot", false, |a, b| a * b, |b| b)?;
        Ok(products.values.iter().fold(T::zero(), |acc, &v| acc + v))
    }

    /// Apply `f` to every stored value; coordinates are unchanged.
    pub fn map_values(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            indices: self.indices.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Stored value at `index`, if any. O(rank · log nnz).
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.rank() || index.iter().zip(&self.shape).any(|(&i, &n)| i >= n) {
            return None;
        }
        let (mut lo, mut hi) = (0, self.nnz());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let ord = self
                .indices
                .iter()
                .zip(index)
                .map(|(coords, i)| coords[mid].cmp(i))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal);
            match ord {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(&self.values[mid]),
            }
        }
        None
    }
}

impl<T: Element + Float> CooTensor<T> {
    /// Create from a dense tensor, storing elements with `|x| > threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    /// use stratum_sparse::coo::CooTensor;
    ///
    /// let dense = DenseND::from_vec(vec![0.0, 1e-12, 3.0], &[3]).unwrap();
    /// assert_eq!(CooTensor::from_dense(&dense).nnz(), 2);
    /// assert_eq!(CooTensor::from_dense_threshold(&dense, 1e-10).nnz(), 1);
    /// ```
    pub fn from_dense_threshold(dense: &DenseND<T>, threshold: T) -> Self {
        Self::from_dense_filtered(dense, |v| v.abs() > threshold)
    }
}

impl<T> CooTensor<T> {
    /// Wrap arrays already in canonical order.
    pub(crate) fn from_sorted_parts(indices: Vec<Vec<usize>>, values: Vec<T>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(indices.len(), shape.len());
        debug_assert!(indices.iter().all(|coords| coords.len() == values.len()));
        Self {
            indices,
            values,
            shape,
        }
    }

    /// Create an empty COO tensor with given shape
    pub fn zeros(shape: Vec<usize>) -> Self {
        Self {
            indices: vec![Vec::new(); shape.len()],
            values: Vec::new(),
            shape,
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Shape of the tensor
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Rank (number of dimensions)
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of logical elements, stored or not, saturating at
    /// `usize::MAX`. See [`checked_len`](Self::checked_len).
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// Number of logical elements, or `None` if it overflows `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        checked_size(&self.shape)
    }

    /// True when some axis has length zero.
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    /// Compute density (nnz / total_elements); zero for an empty shape.
    pub fn density(&self) -> f64 {
        density_of(self.nnz(), &self.shape)
    }

    /// Coordinate arrays, one per axis
    pub fn indices(&self) -> &[Vec<usize>] {
        &self.indices
    }

    /// Get values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable values; coordinates stay fixed.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Full coordinate of stored entry `entry`.
    ///
    /// # Panics
    ///
    /// Panics if `entry >= nnz()`.
    pub fn coordinate(&self, entry: usize) -> Vec<usize> {
        self.indices.iter().map(|coords| coords[entry]).collect()
    }

    /// Iterate over `(coordinate, value)` in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (Vec<usize>, &T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(entry, value)| (self.coordinate(entry), value))
    }

    /// Canonical order of entry `i` of `self` against entry `j` of `other`.
    fn compare_entries(&self, i: usize, other: &Self, j: usize) -> Ordering {
        self.indices
            .iter()
            .zip(&other.indices)
            .map(|(lhs, rhs)| lhs[i].cmp(&rhs[j]))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Row-major linear position of every stored entry, ascending.
    ///
    /// Only valid when [`checked_len`](Self::checked_len) is `Some`.
    fn linear_keys(&self) -> Vec<usize> {
        let strides = row_major_strides(&self.shape);
        let mut keys = vec![0; self.nnz()];
        for (coords, &stride) in self.indices.iter().zip(strides.iter()) {
            for (key, &c) in keys.iter_mut().zip(coords) {
                *key += c * stride;
            }
        }
        keys
    }

    /// Fails with [`CooError::ShapeMismatch`] unless both shapes are equal.
    pub(crate) fn check_same_shape(&self, other: &Self, op: &'static str) -> Result<(), CooError> {
        if self.shape != other.shape {
            return Err(CooError::ShapeMismatch {
                op,
                lhs: self.shape.clone(),
                rhs: other.shape.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::CooTensor;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use stratum_core::Element;

    #[derive(Serialize, Deserialize)]
    struct CooRepr<T> {
        shape: Vec<usize>,
        indices: Vec<Vec<usize>>,
        values: Vec<T>,
    }

    impl<T: Clone + Serialize> Serialize for CooTensor<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            CooRepr {
                shape: self.shape.clone(),
                indices: self.indices.clone(),
                values: self.values.clone(),
            }
            .serialize(serializer)
        }
    }

    impl<'de, T: Element + Deserialize<'de>> Deserialize<'de> for CooTensor<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = CooRepr::<T>::deserialize(deserializer)?;
            CooTensor::new(repr.indices, repr.values, repr.shape).map_err(serde::de::Error::custom)
        }
    }
}
