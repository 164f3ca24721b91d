//! CSR (Compressed Sparse Row) sparse matrix format
//!
//! CSR stores a matrix row by row:
//! - `row_ptr`: length `nrows + 1`; row `i` occupies `row_ptr[i]..row_ptr[i+1]`
//! - `col_indices`: column of each stored entry, strictly ascending within a row
//! - `values`: value of each stored entry
//!
//! The per-row column order is an invariant every operation relies on:
//! element-wise arithmetic merges rows as sorted lists and [`CsrMatrix::get`]
//! binary-searches them. [`CsrMatrix::new`] verifies it; unsorted or
//! duplicated input should go through [`CooTensor::new`] and
//! [`CsrMatrix::from_coo`], which sort and sum duplicates.
//!
//! # Examples
//!
//! ```
//! use stratum_sparse::csr::CsrMatrix;
//!
//! // [1 0 2]
//! // [0 3 0]
//! let csr = CsrMatrix::new(vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0], (2, 3)).unwrap();
//! assert_eq!(csr.nnz(), 3);
//! assert_eq!(csr.row(0), Some((&[0, 2][..], &[1.0, 2.0][..])));
//! assert_eq!(csr.get(1, 1), Some(&3.0));
//! assert_eq!(csr.get(1, 2), None);
//! ```

use crate::coo::{CooError, CooTensor};
use crate::ops::{density_of, merge_intersection, merge_union};
use scirs2_core::numeric::Float;
use stratum_core::{DenseND, Element};
use thiserror::Error;

#[cfg(feature = "parallel")]
use scirs2_core::parallel_ops::*;
#[cfg(feature = "parallel")]
use stratum_core::PARALLEL_THRESHOLD;

#[derive(Error, Debug)]
pub enum CsrError {
    #[error("Invalid row pointers: length {len} for {nrows} rows (expected {expected})")]
    InvalidRowPtr {
        len: usize,
        nrows: usize,
        expected: usize,
    },

    #[error("Row pointers must start at 0, got {first}")]
    RowPtrStart { first: usize },

    #[error("Row pointer not sorted at index {idx}: {curr} > {next}")]
    RowPtrNotSorted {
        idx: usize,
        curr: usize,
        next: usize,
    },

    #[error("Row pointers end at {last} but {nnz} entries are stored")]
    RowPtrEnd { last: usize, nnz: usize },

    #[error("Length mismatch: {col_indices} col_indices but {values} values")]
    LengthMismatch { col_indices: usize, values: usize },

    #[error("Column index out of bounds: {col_idx} >= {ncols}")]
    ColIndexOutOfBounds { col_idx: usize, ncols: usize },

    #[error("Column indices of row {row} are not strictly ascending at position {position}")]
    UnsortedColumns { row: usize, position: usize },

    #[error("Shape mismatch: matrix is {nrows}×{ncols}, vector has length {vec_len}")]
    ShapeMismatch {
        nrows: usize,
        ncols: usize,
        vec_len: usize,
    },

    #[error("Matrix shape mismatch: cannot multiply {m1}×{n1} by {m2}×{n2}")]
    MatrixShapeMismatch {
        m1: usize,
        n1: usize,
        m2: usize,
        n2: usize,
    },

    #[error("Shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    OperandShapes {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    #[error("Operation requires rank {expected}, got shape {shape:?}")]
    RankRequired { expected: usize, shape: Vec<usize> },

    #[error("Axis {axis} out of range for a matrix")]
    AxisOutOfRange { axis: usize },

    #[error("COO conversion error: {0}")]
    CooError(#[from] CooError),

    #[error(transparent)]
    Dense(#[from] anyhow::Error),
}

/// CSR (Compressed Sparse Row) matrix
///
/// Optimized for row-wise operations like SpMV (Sparse Matrix-Vector multiply).
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    /// Row pointers: row_ptr[i] = start index of row i in col_indices/values
    /// Length: nrows + 1, with row_ptr[nrows] = nnz
    row_ptr: Vec<usize>,

    /// Column indices for each stored entry
    col_indices: Vec<usize>,

    /// Values of stored entries
    values: Vec<T>,

    /// Shape: (nrows, ncols)
    shape: (usize, usize),
}

impl<T> CsrMatrix<T> {
    /// Create a new CSR matrix
    ///
    /// # Arguments
    ///
    /// * `row_ptr` - Row pointers (length nrows+1)
    /// * `col_indices` - Column indices for each stored entry
    /// * `values` - Values for each stored entry
    /// * `shape` - (nrows, ncols)
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - row_ptr length is incorrect, does not start at 0 or does not end at nnz
    /// - col_indices and values have different lengths
    /// - row_ptr is not monotonically increasing
    /// - any column index is out of bounds
    /// - column indices are not strictly ascending within a row
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::csr::{CsrError, CsrMatrix};
    ///
    /// let err = CsrMatrix::new(vec![0, 2], vec![1, 0], vec![1.0, 2.0], (1, 2)).unwrap_err();
    /// assert!(matches!(err, CsrError::UnsortedColumns { row: 0, position: 1 }));
    /// ```
    pub fn new(
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
        shape: (usize, usize),
    ) -> Result<Self, CsrError> {
        let (nrows, ncols) = shape;

        if row_ptr.len() != nrows + 1 {
            return Err(CsrError::InvalidRowPtr {
                len: row_ptr.len(),
                nrows,
                expected: nrows + 1,
            });
        }
        if col_indices.len() != values.len() {
            return Err(CsrError::LengthMismatch {
                col_indices: col_indices.len(),
                values: values.len(),
            });
        }
        if row_ptr[0] != 0 {
            return Err(CsrError::RowPtrStart { first: row_ptr[0] });
        }
        for (idx, pair) in row_ptr.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return Err(CsrError::RowPtrNotSorted {
                    idx,
                    curr: pair[0],
                    next: pair[1],
                });
            }
        }
        if row_ptr[nrows] != col_indices.len() {
            return Err(CsrError::RowPtrEnd {
                last: row_ptr[nrows],
                nnz: col_indices.len(),
            });
        }
        if let Some(&col_idx) = col_indices.iter().find(|&&c| c >= ncols) {
            return Err(CsrError::ColIndexOutOfBounds { col_idx, ncols });
        }
        for row in 0..nrows {
            let cols = &col_indices[row_ptr[row]..row_ptr[row + 1]];
            if let Some(position) = cols.windows(2).position(|pair| pair[0] >= pair[1]) {
                return Err(CsrError::UnsortedColumns {
                    row,
                    position: position + 1,
                });
            }
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            shape,
        })
    }

    /// Wrap CSR arrays without validation.
    ///
    /// The caller guarantees every invariant [`new`](Self::new) checks;
    /// they are only verified by debug assertions.
    pub fn from_parts_unchecked(
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
        shape: (usize, usize),
    ) -> Self {
        debug_assert_eq!(row_ptr.len(), shape.0 + 1);
        debug_assert_eq!(col_indices.len(), values.len());
        debug_assert_eq!(row_ptr.last().copied(), Some(col_indices.len()));
        debug_assert!(row_ptr.windows(2).all(|pair| pair[0] <= pair[1]));
        debug_assert!((0..shape.0).all(|row| {
            col_indices[row_ptr[row]..row_ptr[row + 1]]
                .windows(2)
                .all(|pair| pair[0] < pair[1])
        }));
        Self {
            row_ptr,
            col_indices,
            values,
            shape,
        }
    }

    /// Create an empty CSR matrix with given shape
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self {
            row_ptr: vec![0; shape.0 + 1],
            col_indices: Vec::new(),
            values: Vec::new(),
            shape,
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Shape (nrows, ncols)
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.shape.0
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.shape.1
    }

    /// Number of logical elements, `nrows * ncols`, saturating at
    /// `usize::MAX`.
    pub fn len(&self) -> usize {
        self.shape.0.saturating_mul(self.shape.1)
    }

    /// True when there are no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.shape.0 == 0 || self.shape.1 == 0
    }

    /// Get row pointers
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Get column indices
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Get values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable values; the sparsity structure stays fixed.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Compute density (nnz / total_elements); zero for an empty shape.
    pub fn density(&self) -> f64 {
        density_of(self.nnz(), &[self.shape.0, self.shape.1])
    }

    /// Column indices and values of row `i`, or `None` if out of range.
    pub fn row(&self, i: usize) -> Option<(&[usize], &[T])> {
        if i >= self.nrows() {
            return None;
        }
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        Some((&self.col_indices[range.clone()], &self.values[range]))
    }

    /// Stored value at `(row, col)`, if any. O(log nnz_row).
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        let (cols, values) = self.row(row)?;
        cols.binary_search(&col).ok().map(|k| &values[k])
    }

    fn check_same_shape(&self, other: &Self, op: &'static str) -> Result<(), CsrError> {
        if self.shape != other.shape {
            return Err(CsrError::OperandShapes {
                op,
                lhs: self.shape,
                rhs: other.shape,
            });
        }
        Ok(())
    }
}

impl<T: Element> CsrMatrix<T> {
    /// Convert from COO format
    ///
    /// The COO tensor must be 2-dimensional. Its canonical order (row, then
    /// column) is already CSR order, so only row pointers are computed.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::{CooTensor, CsrMatrix};
    ///
    /// let coo = CooTensor::new(vec![vec![1, 0, 1], vec![1, 2, 0]], vec![1, 2, 3], vec![2, 3]).unwrap();
    /// let csr = CsrMatrix::from_coo(&coo).unwrap();
    /// assert_eq!(csr.row_ptr(), &[0, 1, 3]);
    /// assert_eq!(csr.col_indices(), &[2, 0, 1]);
    /// assert_eq!(csr.to_coo(), coo);
    /// ```
    pub fn from_coo(coo: &CooTensor<T>) -> Result<Self, CsrError> {
        if coo.rank() != 2 {
            return Err(CsrError::RankRequired {
                expected: 2,
                shape: coo.shape().to_vec(),
            });
        }
        let (nrows, ncols) = (coo.shape()[0], coo.shape()[1]);

        let mut row_ptr = vec![0; nrows + 1];
        for &row in &coo.indices()[0] {
            row_ptr[row + 1] += 1;
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }

        log::debug!("csr from coo {}x{}: nnz={}", nrows, ncols, coo.nnz());
        Ok(Self::from_parts_unchecked(
            row_ptr,
            coo.indices()[1].clone(),
            coo.values().to_vec(),
            (nrows, ncols),
        ))
    }

    /// Convert to COO format
    pub fn to_coo(&self) -> CooTensor<T> {
        let mut rows = Vec::with_capacity(self.nnz());
        for row in 0..self.nrows() {
            let count = self.row_ptr[row + 1] - self.row_ptr[row];
            rows.extend(std::iter::repeat(row).take(count));
        }
        CooTensor::from_sorted_parts(
            vec![rows, self.col_indices.clone()],
            self.values.clone(),
            vec![self.nrows(), self.ncols()],
        )
    }

    /// Convert to a dense `[nrows, ncols]` tensor.
    ///
    /// # Panics
    ///
    /// Panics if `nrows * ncols` overflows `usize`.
    pub fn to_dense(&self) -> DenseND<T> {
        self.to_dense_with_default(T::zero())
    }

    /// Convert to a dense tensor with unstored positions set to `default`.
    pub fn to_dense_with_default(&self, default: T) -> DenseND<T> {
        let ncols = self.ncols();
        if self.nrows().checked_mul(ncols).is_none() {
            panic!("dense size of a {}x{} matrix overflows usize", self.nrows(), ncols);
        }
        let mut dense = DenseND::from_elem(&[self.nrows(), ncols], default);
        for row in 0..self.nrows() {
            for k in self.row_ptr[row]..self.row_ptr[row + 1] {
                dense.set_linear(row * ncols + self.col_indices[k], self.values[k]);
            }
        }
        dense
    }

    /// Create from a rank-2 dense tensor, storing every non-zero element.
    ///
    /// # Errors
    ///
    /// Fails if `dense` is not rank 2.
    pub fn from_dense(dense: &DenseND<T>) -> Result<Self, CsrError> {
        Self::from_dense_filtered(dense, |v| v != T::zero())
    }

    fn from_dense_filtered(dense: &DenseND<T>, keep: impl Fn(T) -> bool) -> Result<Self, CsrError> {
        let (nrows, ncols) = matrix_shape(dense)?;
        let mut row_ptr = Vec::with_capacity(nrows + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);

        let mut elements = dense.iter();
        for _ in 0..nrows {
            for (col, &value) in elements.by_ref().take(ncols).enumerate() {
                if keep(value) {
                    col_indices.push(col);
                    values.push(value);
                }
            }
            row_ptr.push(col_indices.len());
        }

        log::debug!("csr from dense {}x{}: nnz={}", nrows, ncols, values.len());
        Ok(Self::from_parts_unchecked(
            row_ptr,
            col_indices,
            values,
            (nrows, ncols),
        ))
    }

    /// Sparse Matrix-Vector product: y = A * x
    ///
    /// # Errors
    ///
    /// Returns error if `x` is not a vector of length `ncols`.
    ///
    /// # Complexity
    ///
    /// O(nnz). With the `parallel` feature, large matrices split rows
    /// across threads.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    /// use stratum_sparse::csr::CsrMatrix;
    ///
    /// // Matrix: [1 0 2]
    /// //         [0 3 0]
    /// let csr = CsrMatrix::new(vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0], (2, 3)).unwrap();
    ///
    /// let x = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
    /// let y = csr.spmv(&x).unwrap();
    /// assert_eq!(y.to_vec(), vec![7.0, 6.0]);
    /// ```
    pub fn spmv(&self, x: &DenseND<T>) -> Result<DenseND<T>, CsrError> {
        if x.rank() != 1 {
            return Err(CsrError::RankRequired {
                expected: 1,
                shape: x.shape().to_vec(),
            });
        }
        if x.len() != self.ncols() {
            return Err(CsrError::ShapeMismatch {
                nrows: self.nrows(),
                ncols: self.ncols(),
                vec_len: x.len(),
            });
        }

        let x = x.contiguous_data();
        let row_dot = |row: usize| {
            (self.row_ptr[row]..self.row_ptr[row + 1]).fold(T::zero(), |acc, k| {
                acc + self.values[k] * x[self.col_indices[k]]
            })
        };

        #[cfg(feature = "parallel")]
        let y: Vec<T> = if self.nnz() >= PARALLEL_THRESHOLD {
            (0..self.nrows()).into_par_iter().map(row_dot).collect()
        } else {
            (0..self.nrows()).map(row_dot).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let y: Vec<T> = (0..self.nrows()).map(row_dot).collect();

        Ok(DenseND::from_vec(y, &[self.nrows()])?)
    }

    /// Sparse Matrix-Matrix product with a dense right operand: C = A * B
    ///
    /// Each stored `A[row, col]` scatters `A[row, col] * B[col, :]` into
    /// `C[row, :]`.
    ///
    /// # Errors
    ///
    /// Returns error if `b` is not rank 2 or `A.ncols != B.nrows`.
    ///
    /// # Complexity
    ///
    /// O(nnz * k) where k is the number of columns in B
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    /// use stratum_sparse::csr::CsrMatrix;
    ///
    /// // Sparse matrix A: [1 0 2]
    /// //                  [0 3 0]
    /// let csr = CsrMatrix::new(vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0], (2, 3)).unwrap();
    ///
    /// let b = DenseND::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
    /// let c = csr.spmm(&b).unwrap();
    /// assert_eq!(c.to_vec(), vec![11.0, 14.0, 9.0, 12.0]);
    /// ```
    pub fn spmm(&self, b: &DenseND<T>) -> Result<DenseND<T>, CsrError> {
        let (b_rows, b_cols) = matrix_shape(b)?;
        if self.ncols() != b_rows {
            return Err(CsrError::MatrixShapeMismatch {
                m1: self.nrows(),
                n1: self.ncols(),
                m2: b_rows,
                n2: b_cols,
            });
        }

        let b = b.contiguous_data();
        let mut c = vec![T::zero(); self.nrows() * b_cols];
        for row in 0..self.nrows() {
            let c_row = &mut c[row * b_cols..(row + 1) * b_cols];
            for k in self.row_ptr[row]..self.row_ptr[row + 1] {
                let a = self.values[k];
                let col = self.col_indices[k];
                let b_row = &b[col * b_cols..(col + 1) * b_cols];
                for (c_ij, &b_kj) in c_row.iter_mut().zip(b_row) {
                    *c_ij = *c_ij + a * b_kj;
                }
            }
        }
        Ok(DenseND::from_vec(c, &[self.nrows(), b_cols])?)
    }

    /// Sparse matrix-matrix multiply: C = A * B (sparse × sparse → sparse)
    ///
    /// Row by row, products are gathered in a dense accumulator of length
    /// `B.ncols` with a marker array recording which columns were touched.
    /// Touched columns are sorted, emitted, and then reset individually, so
    /// the scratch arrays are reused across rows without a full clear.
    ///
    /// Entries that cancel to zero stay stored.
    ///
    /// # Complexity
    ///
    /// Time: O(flops + Σ_rows t log t) where t is the row's touched count
    /// Space: O(B.ncols + nnz_result)
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::csr::CsrMatrix;
    ///
    /// // [1 -1] x [3; 3] = [0], kept as an explicit entry
    /// let a = CsrMatrix::new(vec![0, 2], vec![0, 1], vec![1, -1], (1, 2)).unwrap();
    /// let b = CsrMatrix::new(vec![0, 1, 2], vec![0, 0], vec![3, 3], (2, 1)).unwrap();
    /// let c = a.spspmm(&b).unwrap();
    /// assert_eq!(c.nnz(), 1);
    /// assert_eq!(c.values(), &[0]);
    /// ```
    pub fn spspmm(&self, b: &CsrMatrix<T>) -> Result<CsrMatrix<T>, CsrError> {
        if self.ncols() != b.nrows() {
            return Err(CsrError::MatrixShapeMismatch {
                m1: self.nrows(),
                n1: self.ncols(),
                m2: b.nrows(),
                n2: b.ncols(),
            });
        }

        let (m, n) = (self.nrows(), b.ncols());
        let mut accumulator = vec![T::zero(); n];
        let mut marker = vec![false; n];
        let mut touched: Vec<usize> = Vec::new();

        let mut row_ptr = Vec::with_capacity(m + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);

        for i in 0..m {
            for a_idx in self.row_ptr[i]..self.row_ptr[i + 1] {
                let k = self.col_indices[a_idx];
                let a_val = self.values[a_idx];
                for b_idx in b.row_ptr[k]..b.row_ptr[k + 1] {
                    let j = b.col_indices[b_idx];
                    if !marker[j] {
                        marker[j] = true;
                        touched.push(j);
                    }
                    accumulator[j] = accumulator[j] + a_val * b.values[b_idx];
                }
            }

            touched.sort_unstable();
            for &j in &touched {
                col_indices.push(j);
                values.push(accumulator[j]);
                accumulator[j] = T::zero();
                marker[j] = false;
            }
            touched.clear();
            row_ptr.push(col_indices.len());
        }

        log::debug!(
            "spspmm {}x{} * {}x{}: nnz {} x {} -> {}",
            m,
            self.ncols(),
            b.nrows(),
            n,
            self.nnz(),
            b.nnz(),
            values.len()
        );
        Ok(Self::from_parts_unchecked(row_ptr, col_indices, values, (m, n)))
    }

    /// Row-wise merge of two matrices of equal shape.
    fn union(
        &self,
        other: &Self,
        op: &'static str,
        both: impl Fn(T, T) -> T + Copy,
        rhs_only: impl Fn(T) -> T + Copy,
    ) -> Result<Self, CsrError> {
        self.check_same_shape(other, op)?;
        self.rowwise(other, |lhs, rhs, cols, vals| {
            merge_union(lhs, rhs, both, rhs_only, cols, vals)
        })
    }

    fn rowwise(
        &self,
        other: &Self,
        mut merge_row: impl FnMut((&[usize], &[T]), (&[usize], &[T]), &mut Vec<usize>, &mut Vec<T>),
    ) -> Result<Self, CsrError> {
        let mut row_ptr = Vec::with_capacity(self.nrows() + 1);
        let mut col_indices = Vec::with_capacity(self.nnz().max(other.nnz()));
        let mut values = Vec::with_capacity(self.nnz().max(other.nnz()));
        row_ptr.push(0);

        for i in 0..self.nrows() {
            let (a, b) = (self.row_ptr[i]..self.row_ptr[i + 1], other.row_ptr[i]..other.row_ptr[i + 1]);
            merge_row(
                (&self.col_indices[a.clone()], &self.values[a]),
                (&other.col_indices[b.clone()], &other.values[b]),
                &mut col_indices,
                &mut values,
            );
            row_ptr.push(col_indices.len());
        }

        Ok(Self::from_parts_unchecked(
            row_ptr,
            col_indices,
            values,
            self.shape,
        ))
    }

    /// Element-wise sum. Entries stored in only one operand pass through.
    ///
    /// # Complexity
    ///
    /// O(nnz_a + nnz_b)
    pub fn try_add(&self, other: &Self) -> Result<Self, CsrError> {
        self.union(other, "add", |a, b| a + b, |b| b)
    }

    /// Element-wise difference. Entries stored only in `other` are negated.
    pub fn try_sub(&self, other: &Self) -> Result<Self, CsrError> {
        self.union(other, "sub", |a, b| a - b, |b| T::zero() - b)
    }

    /// Hadamard product: only positions stored in both operands survive.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_sparse::csr::CsrMatrix;
    ///
    /// let a = CsrMatrix::new(vec![0, 1, 2], vec![0, 1], vec![1.0, 2.0], (2, 2)).unwrap();
    /// let b = CsrMatrix::new(vec![0, 1, 2], vec![0, 1], vec![3.0, 4.0], (2, 2)).unwrap();
    /// assert_eq!(a.try_mul(&b).unwrap().values(), &[3.0, 8.0]);
    /// ```
    pub fn try_mul(&self, other: &Self) -> Result<Self, CsrError> {
        self.check_same_shape(other, "mul")?;
        self.rowwise(other, |lhs, rhs, cols, vals| {
            merge_intersection(lhs, rhs, |a, b| a * b, cols, vals)
        })
    }

    /// Apply `f` to every stored value; the structure is unchanged.
    pub fn map_values(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            row_ptr: self.row_ptr.clone(),
            col_indices: self.col_indices.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
            shape: self.shape,
        }
    }

    /// Transposed copy, built by counting entries per column.
    ///
    /// # Complexity
    ///
    /// O(nnz + nrows + ncols)
    pub fn transpose(&self) -> Self {
        let (nrows, ncols) = self.shape;
        let mut row_ptr = vec![0; ncols + 1];
        for &col in &self.col_indices {
            row_ptr[col + 1] += 1;
        }
        for j in 0..ncols {
            row_ptr[j + 1] += row_ptr[j];
        }

        let mut next = row_ptr.clone();
        let mut col_indices = vec![0; self.nnz()];
        let mut values = vec![T::zero(); self.nnz()];
        // Rows are visited in ascending order, so each output row fills sorted.
        for row in 0..nrows {
            for k in self.row_ptr[row]..self.row_ptr[row + 1] {
                let slot = &mut next[self.col_indices[k]];
                col_indices[*slot] = row;
                values[*slot] = self.values[k];
                *slot += 1;
            }
        }
        Self::from_parts_unchecked(row_ptr, col_indices, values, (ncols, nrows))
    }
}

impl<T: Element + Float> CsrMatrix<T> {
    /// Create from a rank-2 dense tensor, storing elements with `|x| > threshold`.
    pub fn from_dense_threshold(dense: &DenseND<T>, threshold: T) -> Result<Self, CsrError> {
        Self::from_dense_filtered(dense, |v| v.abs() > threshold)
    }
}

impl<T: Element> CooTensor<T> {
    /// Convert from CSR; the result is already in canonical order.
    pub fn from_csr(csr: &CsrMatrix<T>) -> Self {
        csr.to_coo()
    }
}

fn matrix_shape<T>(dense: &DenseND<T>) -> Result<(usize, usize), CsrError> {
    match *dense.shape() {
        [rows, cols] => Ok((rows, cols)),
        _ => Err(CsrError::RankRequired {
            expected: 2,
            shape: dense.shape().to_vec(),
        }),
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::CsrMatrix;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct CsrRepr<T> {
        shape: (usize, usize),
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    }

    impl<T: Clone + Serialize> Serialize for CsrMatrix<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            CsrRepr {
                shape: self.shape,
                row_ptr: self.row_ptr.clone(),
                col_indices: self.col_indices.clone(),
                values: self.values.clone(),
            }
            .serialize(serializer)
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for CsrMatrix<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = CsrRepr::<T>::deserialize(deserializer)?;
            CsrMatrix::new(repr.row_ptr, repr.col_indices, repr.values, repr.shape)
                .map_err(serde::de::Error::custom)
        }
    }
}
