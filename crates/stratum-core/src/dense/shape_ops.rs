//! Zero-copy shape and view operations
//!
//! Every operation here returns a tensor sharing the parent's buffer; only
//! the layout changes.

use super::types::DenseND;
use std::ops::Range;

impl<T> DenseND<T> {
    /// Reshape the tensor to a new shape
    ///
    /// # Arguments
    ///
    /// * `new_shape` - The target shape (must have same total elements)
    ///
    /// # Errors
    ///
    /// Fails if the element count differs, or if this tensor is not
    /// contiguous. Non-contiguous views are never copied implicitly; call
    /// [`to_contiguous`](DenseND::to_contiguous) first.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
    /// let reshaped = tensor.reshape(&[6, 4]).unwrap();
    /// assert_eq!(reshaped.shape(), &[6, 4]);
    ///
    /// let t = DenseND::<f64>::zeros(&[2, 3]).transpose().unwrap();
    /// assert!(t.reshape(&[6]).is_err());
    /// ```
    pub fn reshape(&self, new_shape: &[usize]) -> anyhow::Result<Self> {
        let layout = self.layout.reshaped(new_shape)?;
        Ok(self.with_layout(layout))
    }

    /// Permute the axes of the tensor
    ///
    /// `result.shape()[i] == self.shape()[axes[i]]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
    /// let permuted = tensor.permute(&[2, 0, 1]).unwrap();
    /// assert_eq!(permuted.shape(), &[4, 2, 3]);
    /// ```
    pub fn permute(&self, axes: &[usize]) -> anyhow::Result<Self> {
        let layout = self.layout.permuted(axes)?;
        Ok(self.with_layout(layout))
    }

    /// Matrix transpose; the tensor must have rank 2.
    pub fn transpose(&self) -> anyhow::Result<Self> {
        let layout = self.layout.transposed()?;
        Ok(self.with_layout(layout))
    }

    /// Restrict `axis` to `range`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let m = DenseND::from_vec((0..12).collect::<Vec<i32>>(), &[3, 4]).unwrap();
    /// let rows = m.slice_axis(0, 1..3).unwrap();
    /// assert_eq!(rows.shape(), &[2, 4]);
    /// assert_eq!(rows[&[0, 0]], 4);
    /// ```
    pub fn slice_axis(&self, axis: usize, range: Range<usize>) -> anyhow::Result<Self> {
        let layout = self.layout.sliced(axis, range)?;
        Ok(self.with_layout(layout))
    }

    /// Broadcast to `shape`, expanding size-1 axes with stride 0.
    ///
    /// The result is a read-only view: writing through it panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let row = DenseND::from_vec(vec![1, 2, 3], &[3]).unwrap();
    /// let grid = row.broadcast_to(&[2, 3]).unwrap();
    /// assert_eq!(grid.to_vec(), vec![1, 2, 3, 1, 2, 3]);
    /// assert!(grid.is_broadcast_view());
    /// ```
    pub fn broadcast_to(&self, shape: &[usize]) -> anyhow::Result<Self> {
        let layout = self.layout.broadcast_to(shape)?;
        Ok(self.with_layout(layout))
    }
}
