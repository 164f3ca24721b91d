//! Tensor creation and initialization methods

use super::types::DenseND;
use crate::layout::{unravel_index, LayoutError};
use crate::types::Element;

impl<T: Clone> DenseND<T> {
    /// Create a tensor filled with a specific value
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let tensor = DenseND::from_elem(&[2, 3], 5.0);
    /// assert_eq!(tensor[&[1, 2]], 5.0);
    /// ```
    pub fn from_elem(shape: &[usize], elem: T) -> Self {
        let total: usize = shape.iter().product();
        Self::from_parts(vec![elem; total], shape)
    }

    /// Rank-0 tensor holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(vec![value], &[])
    }

    /// Build a matrix from nested rows.
    ///
    /// An empty outer vector yields shape `[0, 0]`.
    ///
    /// # Errors
    ///
    /// Fails if the rows have unequal lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let m = DenseND::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!(m.shape(), &[2, 3]);
    /// assert!(DenseND::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<T>>) -> anyhow::Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::from_parts(Vec::new(), &[0, 0]));
        };
        let ncols = first.len();
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(LayoutError::RaggedRows {
                row,
                expected: ncols,
                got: bad.len(),
            }
            .into());
        }
        let nrows = rows.len();
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Ok(Self::from_parts(data, &[nrows, ncols]))
    }

    /// Create a tensor by evaluating `f` at every multi-index, row-major.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let t = DenseND::from_shape_fn(&[2, 2], |idx| idx[0] * 10 + idx[1]);
    /// assert_eq!(t.to_vec(), vec![0, 1, 10, 11]);
    /// ```
    pub fn from_shape_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let total: usize = shape.iter().product();
        let data = (0..total)
            .map(|linear| f(&unravel_index(shape, linear)))
            .collect();
        Self::from_parts(data, shape)
    }
}

impl<T: Element> DenseND<T> {
    /// Create a tensor filled with zeros
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3]);
    /// assert_eq!(tensor.sum(), 0.0);
    /// ```
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_elem(shape, T::zero())
    }

    /// Create a tensor filled with ones
    pub fn ones(shape: &[usize]) -> Self {
        Self::from_elem(shape, T::one())
    }
}
