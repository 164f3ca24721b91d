//! Vector and matrix products.

use super::types::DenseND;
use crate::layout::LayoutError;
use crate::types::Element;

fn require_rank<T>(tensor: &DenseND<T>, expected: usize) -> Result<(), LayoutError> {
    if tensor.rank() != expected {
        return Err(LayoutError::RankRequired {
            expected,
            shape: tensor.shape().to_vec(),
        });
    }
    Ok(())
}

impl<T: Element> DenseND<T> {
    /// Inner product of two rank-1 tensors of equal length.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let a = DenseND::from_vec(vec![1, 2, 3], &[3]).unwrap();
    /// let b = DenseND::from_vec(vec![4, 5, 6], &[3]).unwrap();
    /// assert_eq!(a.dot(&b).unwrap(), 32);
    /// ```
    pub fn dot(&self, other: &Self) -> anyhow::Result<T> {
        require_rank(self, 1)?;
        require_rank(other, 1)?;
        if !self.same_shape(other) {
            return Err(LayoutError::ShapeMismatch {
                op: "dot",
                lhs: self.shape().to_vec(),
                rhs: other.shape().to_vec(),
            }
            .into());
        }

        if let Some(ops) = T::bulk_ops() {
            return Ok(ops.dot(&self.contiguous_data(), &other.contiguous_data()));
        }
        Ok(self
            .iter()
            .zip(other.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Matrix product of `[m, k]` and `[k, n]` tensors, giving `[m, n]`.
    ///
    /// # Errors
    ///
    /// Fails unless both operands have rank 2 and the inner dimensions
    /// agree.
    ///
    /// # Complexity
    ///
    /// O(m · n · k)
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let a = DenseND::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// let b = DenseND::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
    /// let c = a.matmul(&b).unwrap();
    /// assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    /// ```
    pub fn matmul(&self, other: &Self) -> anyhow::Result<Self> {
        require_rank(self, 2)?;
        require_rank(other, 2)?;
        let (m, k) = (self.shape()[0], self.shape()[1]);
        let (k2, n) = (other.shape()[0], other.shape()[1]);
        if k != k2 {
            return Err(LayoutError::ShapeMismatch {
                op: "matmul",
                lhs: self.shape().to_vec(),
                rhs: other.shape().to_vec(),
            }
            .into());
        }

        let a = self.contiguous_data();
        let b = other.contiguous_data();
        let mut c = vec![T::zero(); m * n];

        if let Some(ops) = T::bulk_ops() {
            if !(self.is_contiguous() && other.is_contiguous()) {
                log::debug!(
                    "matmul: materialized non-contiguous operand(s) {:?} x {:?} for bulk gemm",
                    self.shape(),
                    other.shape()
                );
            }
            log::trace!("bulk {} gemm {}x{}x{}", ops.name(), m, n, k);
            ops.gemm(m, n, k, &a, &b, &mut c);
            return Ok(Self::from_parts(c, &[m, n]));
        }

        for i in 0..m {
            for j in 0..n {
                let mut acc = T::zero();
                for p in 0..k {
                    acc = acc + a[i * k + p] * b[p * n + j];
                }
                c[i * n + j] = acc;
            }
        }
        Ok(Self::from_parts(c, &[m, n]))
    }
}

#[cfg(test)]
mod tests {
    use crate::DenseND;

    #[test]
    fn test_dot_errors() {
        let a = DenseND::<f64>::ones(&[3]);
        let b = DenseND::<f64>::ones(&[4]);
        assert_eq!(
            a.dot(&b).unwrap_err().to_string(),
            "Shape mismatch in dot: [3] vs [4]"
        );
        let m = DenseND::<f64>::ones(&[2, 2]);
        assert!(a.dot(&m).is_err());
    }

    #[test]
    fn test_dot_strided_operands() {
        let m = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let col = m.slice_axis(1, 1..2).unwrap().reshape(&[2]);
        // A column slice is not contiguous, so it cannot be reshaped in place.
        assert!(col.is_err());
        let col = m.transpose().unwrap().slice_axis(0, 1..2).unwrap();
        let col = col.to_contiguous().reshape(&[2]).unwrap();
        assert_eq!(col.dot(&col).unwrap(), 20.0);
    }

    #[test]
    fn test_matmul_integer_generic_path() {
        let a = DenseND::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let b = DenseND::from_rows(vec![vec![7, 8], vec![9, 10], vec![11, 12]]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.to_vec(), vec![58, 64, 139, 154]);
    }

    #[test]
    fn test_matmul_transposed_operand() {
        let a = DenseND::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let at = a.transpose().unwrap();
        let c = at.matmul(&a).unwrap();
        assert_eq!(c.to_vec(), vec![10.0, 14.0, 14.0, 20.0]);

        let ci = DenseND::from_rows(vec![vec![1, 2], vec![3, 4]])
            .unwrap()
            .transpose()
            .unwrap()
            .matmul(&DenseND::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap())
            .unwrap();
        assert_eq!(ci.to_vec(), vec![10, 14, 14, 20]);
    }

    #[test]
    fn test_matmul_shape_errors() {
        let a = DenseND::<f64>::ones(&[2, 3]);
        let b = DenseND::<f64>::ones(&[2, 3]);
        assert!(a.matmul(&b).is_err());
        assert!(a.matmul(&DenseND::ones(&[3])).is_err());
    }

    #[test]
    fn test_matmul_empty_inner_dimension() {
        let a = DenseND::<f64>::zeros(&[2, 0]);
        let b = DenseND::<f64>::zeros(&[0, 3]);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), &[2, 3]);
        assert_eq!(c.sum(), 0.0);
    }
}
