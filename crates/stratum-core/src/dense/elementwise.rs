//! Element-wise arithmetic with broadcasting
//!
//! The checked entry points here return errors on incompatible shapes; the
//! operator overloads in `functions.rs` call them and panic instead.

use super::types::DenseND;
use crate::layout::broadcast_shape;
use crate::ops::BinaryOp;
use crate::types::Element;
use std::ops::Neg;

impl<T> DenseND<T> {
    /// Apply `f` to every element, producing a new contiguous tensor.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let t = DenseND::from_vec(vec![1, 2, 3], &[3]).unwrap();
    /// let squares = t.map(|&v| v * v);
    /// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> DenseND<U>
    where
        F: FnMut(&T) -> U,
    {
        let data = match self.as_slice() {
            Some(slice) => slice.iter().map(f).collect(),
            None => self.iter().map(f).collect(),
        };
        DenseND::from_parts(data, self.shape())
    }
}

impl<T: Element> DenseND<T> {
    /// Combine two tensors element by element, broadcasting if needed.
    ///
    /// When the element type has a bulk backend, both operands are made
    /// contiguous and handed to it; otherwise contiguous operands are
    /// zipped directly and anything else goes through strided iteration.
    /// The result is always a fresh contiguous tensor.
    ///
    /// # Errors
    ///
    /// Fails if the shapes are neither equal nor broadcast-compatible.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::{BinaryOp, DenseND};
    ///
    /// let col = DenseND::from_vec(vec![10, 20], &[2, 1]).unwrap();
    /// let row = DenseND::from_vec(vec![1, 2, 3], &[3]).unwrap();
    /// let grid = col.zip_with(&row, BinaryOp::Add).unwrap();
    /// assert_eq!(grid.shape(), &[2, 3]);
    /// assert_eq!(grid.to_vec(), vec![11, 12, 13, 21, 22, 23]);
    /// ```
    pub fn zip_with(&self, other: &Self, op: BinaryOp) -> anyhow::Result<Self> {
        let (lhs, rhs) = if self.same_shape(other) {
            (self.clone(), other.clone())
        } else {
            let shape = broadcast_shape(self.shape(), other.shape())?;
            (self.broadcast_to(&shape)?, other.broadcast_to(&shape)?)
        };

        if let Some(ops) = T::bulk_ops() {
            let a = lhs.contiguous_data();
            let b = rhs.contiguous_data();
            let mut out = vec![T::zero(); a.len()];
            log::trace!("bulk {} `{}` over {} elements", ops.name(), op, a.len());
            op.apply_bulk(ops, &a, &b, &mut out);
            return Ok(Self::from_parts(out, lhs.shape()));
        }

        let data = match (lhs.as_slice(), rhs.as_slice()) {
            (Some(a), Some(b)) => a.iter().zip(b).map(|(&x, &y)| op.apply(x, y)).collect(),
            _ => lhs
                .iter()
                .zip(rhs.iter())
                .map(|(&x, &y)| op.apply(x, y))
                .collect(),
        };
        Ok(Self::from_parts(data, lhs.shape()))
    }

    /// Element-wise addition with broadcasting.
    pub fn try_add(&self, other: &Self) -> anyhow::Result<Self> {
        self.zip_with(other, BinaryOp::Add)
    }

    /// Element-wise subtraction with broadcasting.
    pub fn try_sub(&self, other: &Self) -> anyhow::Result<Self> {
        self.zip_with(other, BinaryOp::Sub)
    }

    /// Element-wise (Hadamard) product with broadcasting.
    pub fn try_mul(&self, other: &Self) -> anyhow::Result<Self> {
        self.zip_with(other, BinaryOp::Mul)
    }

    /// Element-wise division with broadcasting.
    pub fn try_div(&self, other: &Self) -> anyhow::Result<Self> {
        self.zip_with(other, BinaryOp::Div)
    }

    /// `self op scalar` for every element.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::{BinaryOp, DenseND};
    ///
    /// let t = DenseND::from_vec(vec![2.0, 4.0], &[2]).unwrap();
    /// assert_eq!(t.map_scalar(2.0, BinaryOp::Div).to_vec(), vec![1.0, 2.0]);
    /// ```
    pub fn map_scalar(&self, scalar: T, op: BinaryOp) -> Self {
        if let Some(out) = self.bulk_scalar(scalar, op) {
            return out;
        }
        self.map(|&v| op.apply(v, scalar))
    }

    /// `scalar op self` for every element.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::{BinaryOp, DenseND};
    ///
    /// let t = DenseND::from_vec(vec![1, 2], &[2]).unwrap();
    /// assert_eq!(t.map_scalar_lhs(10, BinaryOp::Sub).to_vec(), vec![9, 8]);
    /// ```
    pub fn map_scalar_lhs(&self, scalar: T, op: BinaryOp) -> Self {
        if op.is_commutative() {
            if let Some(out) = self.bulk_scalar(scalar, op) {
                return out;
            }
        }
        self.map(|&v| op.apply(scalar, v))
    }

    // Only scalar add/mul have bulk kernels.
    fn bulk_scalar(&self, scalar: T, op: BinaryOp) -> Option<Self> {
        let ops = T::bulk_ops()?;
        let data = self.contiguous_data();
        let mut out = vec![T::zero(); data.len()];
        match op {
            BinaryOp::Add => ops.scalar_add(&data, scalar, &mut out),
            BinaryOp::Mul => ops.scalar_mul(&data, scalar, &mut out),
            BinaryOp::Sub | BinaryOp::Div => return None,
        }
        log::trace!("bulk {} scalar `{}` over {} elements", ops.name(), op, out.len());
        Some(Self::from_parts(out, self.shape()))
    }
}

impl<T: Element + Neg<Output = T>> DenseND<T> {
    /// Negate every element.
    pub fn negated(&self) -> Self {
        if let Some(ops) = T::bulk_ops() {
            let data = self.contiguous_data();
            let mut out = vec![T::zero(); data.len()];
            ops.neg(&data, &mut out);
            return Self::from_parts(out, self.shape());
        }
        self.map(|&v| -v)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BinaryOp, DenseND};

    #[test]
    fn test_zip_same_shape_contiguous() {
        let a = DenseND::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        let b = DenseND::from_vec(vec![10, 20, 30, 40], &[2, 2]).unwrap();
        assert_eq!(a.try_add(&b).unwrap().to_vec(), vec![11, 22, 33, 44]);
        assert_eq!(b.try_sub(&a).unwrap().to_vec(), vec![9, 18, 27, 36]);
        assert_eq!(a.try_mul(&b).unwrap().to_vec(), vec![10, 40, 90, 160]);
        assert_eq!(b.try_div(&a).unwrap().to_vec(), vec![10, 10, 10, 10]);
    }

    #[test]
    fn test_zip_non_contiguous_operand() {
        let a = DenseND::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        let t = a.transpose().unwrap();
        let sum = a.try_add(&t).unwrap();
        assert_eq!(sum.to_vec(), vec![2, 5, 5, 8]);
        assert!(sum.is_contiguous());
    }

    #[test]
    fn test_zip_float_backend_with_views() {
        let a = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let t = a.transpose().unwrap();
        assert_eq!(a.try_mul(&t).unwrap().to_vec(), vec![1.0, 6.0, 6.0, 16.0]);
    }

    #[test]
    fn test_zip_broadcast_matches_definition() {
        let a = DenseND::from_vec(vec![1, 2, 3], &[3, 1]).unwrap();
        let b = DenseND::from_vec(vec![10, 20, 30, 40], &[1, 4]).unwrap();
        let c = a.try_mul(&b).unwrap();
        assert_eq!(c.shape(), &[3, 4]);
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(c[&[i, j]], a[&[i, 0]] * b[&[0, j]]);
            }
        }
    }

    #[test]
    fn test_zip_incompatible() {
        let a = DenseND::<f64>::zeros(&[3]);
        let b = DenseND::<f64>::zeros(&[4]);
        let err = a.try_add(&b).unwrap_err();
        assert_eq!(err.to_string(), "Shapes [3] and [4] are not broadcastable");
    }

    #[test]
    fn test_scalar_maps() {
        let t = DenseND::from_vec(vec![1.0, 2.0, 4.0], &[3]).unwrap();
        assert_eq!(t.map_scalar(1.0, BinaryOp::Add).to_vec(), vec![2.0, 3.0, 5.0]);
        assert_eq!(t.map_scalar(1.0, BinaryOp::Sub).to_vec(), vec![0.0, 1.0, 3.0]);
        assert_eq!(t.map_scalar_lhs(1.0, BinaryOp::Sub).to_vec(), vec![0.0, -1.0, -3.0]);
        assert_eq!(t.map_scalar_lhs(8.0, BinaryOp::Div).to_vec(), vec![8.0, 4.0, 2.0]);
        assert_eq!(t.map_scalar_lhs(3.0, BinaryOp::Mul).to_vec(), vec![3.0, 6.0, 12.0]);
    }

    #[test]
    fn test_negated() {
        let t = DenseND::from_vec(vec![1, -2], &[2]).unwrap();
        assert_eq!(t.negated().to_vec(), vec![-1, 2]);
        let f = DenseND::from_vec(vec![1.5_f32, 0.0], &[2]).unwrap();
        assert_eq!(f.negated().to_vec(), vec![-1.5, -0.0]);
    }

    #[test]
    fn test_map_over_view() {
        let t = DenseND::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        let doubled = t.transpose().unwrap().map(|&v| v * 2);
        assert_eq!(doubled.shape(), &[3, 2]);
        assert_eq!(doubled.to_vec(), vec![2, 8, 4, 10, 6, 12]);
    }
}
