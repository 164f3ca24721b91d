//! Reduction operations for sparse tensors
//!
//! Global and per-axis sums and means for [`CooTensor`] and [`CsrMatrix`].
//! Unstored positions count as zero: a mean divides by the number of
//! logical elements, not by `nnz`. Per-axis results are dense, since
//! collapsing an axis rarely preserves sparsity.
//!
//! # Complexity
//!
//! - Global reductions: O(nnz)
//! - Axis-wise reductions: O(nnz + output size)
//!
//! # Examples
//!
//! ```
//! use stratum_sparse::coo::CooTensor;
//!
//! // Sparse 3x4 matrix
//! let indices = vec![
//!     vec![0, 1, 2], // rows
//!     vec![1, 2, 0], // cols
//! ];
//! let coo = CooTensor::new(indices, vec![2.0, 3.0, 1.0], vec![3, 4]).unwrap();
//!
//! assert_eq!(coo.sum(), 6.0);
//! assert_eq!(coo.mean(), 0.5);
//! assert_eq!(coo.sum_axis(0).unwrap().to_vec(), vec![1.0, 2.0, 3.0, 0.0]);
//! ```

use crate::coo::{CooError, CooTensor};
use crate::ops::checked_size;
use crate::csr::{CsrError, CsrMatrix};
use scirs2_core::numeric::Float;
use stratum_core::layout::row_major_strides;
use stratum_core::{count_as, DenseND, Element};

/// Number of logical elements as `T`, computed without `usize` overflow.
fn logical_count<T: Float>(shape: &[usize]) -> T {
    shape.iter().fold(T::one(), |acc, &n| acc * count_as::<T>(n))
}

impl<T: Element> CooTensor<T> {
    /// Sum of all stored values.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::coo::CooTensor;
    ///
    /// let coo = CooTensor::new(vec![vec![0, 2, 4]], vec![1, 2, 3], vec![5]).unwrap();
    /// assert_eq!(coo.sum(), 6);
    /// ```
    pub fn sum(&self) -> T {
        self.values().iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Sum along `axis`, as a dense tensor of rank `rank - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`CooError::AxisOutOfRange`] if `axis >= rank`, and
    /// [`CooError::SizeOverflow`] if the dense result cannot be addressed.
    pub fn sum_axis(&self, axis: usize) -> Result<DenseND<T>, CooError> {
        let rank = self.rank();
        if axis >= rank {
            return Err(CooError::AxisOutOfRange { axis, rank });
        }

        let mut out_shape = self.shape().to_vec();
        out_shape.remove(axis);
        let out_len = checked_size(&out_shape).ok_or_else(|| CooError::SizeOverflow {
            shape: self.shape().to_vec(),
        })?;
        let out_strides = row_major_strides(&out_shape);

        let mut buckets = vec![T::zero(); out_len];
        for (entry, &value) in self.values().iter().enumerate() {
            let slot: usize = self
                .indices()
                .iter()
                .enumerate()
                .filter(|&(d, _)| d != axis)
                .zip(out_strides.iter())
                .map(|((_, idx), &stride)| idx[entry] * stride)
                .sum();
            buckets[slot] = buckets[slot] + value;
        }
        Ok(DenseND::from_vec(buckets, &out_shape)?)
    }
}

impl<T: Element + Float> CooTensor<T> {
    /// Mean over all logical elements, implicit zeros included (NaN when
    /// the shape has no elements).
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::coo::CooTensor;
    ///
    /// let coo = CooTensor::new(vec![vec![0, 1, 2]], vec![1.0, 2.0, 3.0], vec![4]).unwrap();
    /// assert_eq!(coo.mean(), 1.5);
    /// ```
    pub fn mean(&self) -> T {
        self.sum() / logical_count(self.shape())
    }

    /// Mean along `axis`: [`sum_axis`](Self::sum_axis) divided by the
    /// length of the collapsed axis.
    pub fn mean_axis(&self, axis: usize) -> Result<DenseND<T>, CooError> {
        let sums = self.sum_axis(axis)?;
        let divisor: T = count_as(self.shape()[axis]);
        Ok(sums.map(|&v| v / divisor))
    }
}

impl<T: Element> CsrMatrix<T> {
    /// Sum of all stored values.
    pub fn sum(&self) -> T {
        self.values().iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Sum along `axis`: `0` gives column sums (length `ncols`), `1` gives
    /// row sums (length `nrows`).
    ///
    /// # Errors
    ///
    /// Returns [`CsrError::AxisOutOfRange`] for any other axis.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::csr::CsrMatrix;
    ///
    /// // [1 0 2]
    /// // [0 3 0]
    /// let csr = CsrMatrix::new(vec![0, 2, 3], vec![0, 2, 1], vec![1, 2, 3], (2, 3)).unwrap();
    /// assert_eq!(csr.sum_axis(0).unwrap().to_vec(), vec![1, 3, 2]);
    /// assert_eq!(csr.sum_axis(1).unwrap().to_vec(), vec![3, 3]);
    /// ```
    pub fn sum_axis(&self, axis: usize) -> Result<DenseND<T>, CsrError> {
        let sums = match axis {
            0 => {
                let mut columns = vec![T::zero(); self.ncols()];
                for (&col, &value) in self.col_indices().iter().zip(self.values()) {
                    columns[col] = columns[col] + value;
                }
                columns
            }
            1 => self
                .row_ptr()
                .windows(2)
                .map(|bounds| {
                    self.values()[bounds[0]..bounds[1]]
                        .iter()
                        .fold(T::zero(), |acc, &v| acc + v)
                })
                .collect(),
            _ => return Err(CsrError::AxisOutOfRange { axis }),
        };
        let len = sums.len();
        Ok(DenseND::from_vec(sums, &[len])?)
    }
}

impl<T: Element + Float> CsrMatrix<T> {
    /// Mean over all `nrows * ncols` elements, implicit zeros included.
    pub fn mean(&self) -> T {
        self.sum() / logical_count(&[self.nrows(), self.ncols()])
    }

    /// Mean along `axis`, dividing by the length of the collapsed axis.
    pub fn mean_axis(&self, axis: usize) -> Result<DenseND<T>, CsrError> {
        let sums = self.sum_axis(axis)?;
        let collapsed = if axis == 0 { self.nrows() } else { self.ncols() };
        let divisor: T = count_as(collapsed);
        Ok(sums.map(|&v| v / divisor))
    }
}
