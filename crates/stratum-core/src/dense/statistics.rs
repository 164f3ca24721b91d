//! Reductions: sums and means over all elements or along one axis.

use super::types::DenseND;
use crate::layout::LayoutError;
use crate::types::{count_as, Element};
use scirs2_core::numeric::Float;

impl<T: Element> DenseND<T> {
    /// Sum of all elements (zero for an empty tensor).
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let t = DenseND::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
    /// assert_eq!(t.sum(), 10);
    /// assert_eq!(t.transpose().unwrap().sum(), 10);
    /// ```
    pub fn sum(&self) -> T {
        if let Some(ops) = T::bulk_ops() {
            let data = self.contiguous_data();
            log::trace!("bulk {} sum over {} elements", ops.name(), data.len());
            return ops.sum(&data);
        }
        self.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Sum along `axis`, removing it from the shape.
    ///
    /// Collapsing the last axis reduces each row on its own, walking views
    /// in place without a copy; any other axis accumulates into one bucket
    /// per output element.
    /// A rank-1 input yields a rank-0 tensor.
    ///
    /// # Errors
    ///
    /// Fails if `axis >= rank`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let m = DenseND::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!(m.sum_axis(0).unwrap().to_vec(), vec![5, 7, 9]);
    /// assert_eq!(m.sum_axis(1).unwrap().to_vec(), vec![6, 15]);
    /// ```
    pub fn sum_axis(&self, axis: usize) -> anyhow::Result<Self> {
        let shape = self.shape();
        let rank = shape.len();
        if axis >= rank {
            return Err(LayoutError::AxisOutOfRange { axis, rank }.into());
        }

        let axis_len = shape[axis];
        let outer: usize = shape[..axis].iter().product();
        let inner: usize = shape[axis + 1..].iter().product();
        let mut out_shape = shape.to_vec();
        out_shape.remove(axis);

        if axis + 1 == rank {
            if axis_len == 0 {
                return Ok(Self::from_elem(&out_shape, T::zero()));
            }
            let sums: Vec<T> = match self.as_slice() {
                Some(data) => {
                    let bulk = T::bulk_ops();
                    data.chunks(axis_len)
                        .map(|row| match bulk {
                            Some(ops) => ops.sum(row),
                            None => row.iter().fold(T::zero(), |acc, &v| acc + v),
                        })
                        .collect()
                }
                None => {
                    let mut elements = self.iter();
                    (0..outer)
                        .map(|_| elements.by_ref().take(axis_len).fold(T::zero(), |acc, &v| acc + v))
                        .collect()
                }
            };
            return Ok(Self::from_parts(sums, &out_shape));
        }

        let mut buckets = vec![T::zero(); outer * inner];
        let block = axis_len * inner;
        for (linear, &v) in self.iter().enumerate() {
            let slot = (linear / block) * inner + linear % inner;
            buckets[slot] = buckets[slot] + v;
        }
        Ok(Self::from_parts(buckets, &out_shape))
    }
}

impl<T: Element + Float> DenseND<T> {
    /// Arithmetic mean of all elements (NaN for an empty tensor).
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let t = DenseND::from_vec(vec![1.0, 2.0, 3.0, 6.0], &[4]).unwrap();
    /// assert_eq!(t.mean(), 3.0);
    /// ```
    pub fn mean(&self) -> T {
        if let Some(ops) = T::bulk_ops() {
            return ops.mean(&self.contiguous_data());
        }
        self.sum() / count_as(self.len())
    }

    /// Mean along `axis`: [`sum_axis`](Self::sum_axis) divided by the
    /// length of the collapsed axis.
    pub fn mean_axis(&self, axis: usize) -> anyhow::Result<Self> {
        let sums = self.sum_axis(axis)?;
        let divisor: T = count_as(self.shape()[axis]);
        Ok(sums.map(|&v| v / divisor))
    }
}
