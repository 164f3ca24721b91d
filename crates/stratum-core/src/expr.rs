//! Lazy element-wise expressions.
//!
//! Arithmetic on [`LazyTensor`] leaves builds an expression tree instead of
//! computing anything. [`TensorExpression::evaluate`] then fills a single
//! output buffer by asking the root for each element in turn, so a chain
//! like `(a + b) * c - d` runs in one pass with no intermediate tensors.
//!
//! Operands of a binary node must have identical shapes; lazy expressions
//! do not broadcast. Mismatched shapes panic when the node is built.
//!
//! # Examples
//!
//! ```
//! use stratum_core::{DenseND, TensorExpression};
//!
//! let a = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
//! let b = DenseND::from_vec(vec![4.0, 5.0, 6.0], &[3]).unwrap();
//! let c = DenseND::from_vec(vec![2.0, 2.0, 2.0], &[3]).unwrap();
//!
//! let expr = (a.lazy() + b.lazy()) * c.lazy();
//! assert_eq!(expr.evaluate().to_vec(), vec![10.0, 14.0, 18.0]);
//! ```

use crate::dense::DenseND;
use crate::ops::BinaryOp;
use crate::types::{Element, Shape};
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A node in a lazy element-wise expression tree.
pub trait TensorExpression<T: Element> {
    /// Logical shape of the result.
    fn shape(&self) -> &[usize];

    /// Element at a row-major linear position of the result.
    ///
    /// `linear` must be below [`len`](Self::len).
    fn element(&self, linear: usize) -> T;

    /// Number of result elements.
    fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// True when the result has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute every element into a new contiguous tensor.
    fn evaluate(&self) -> DenseND<T> {
        let data = (0..self.len()).map(|i| self.element(i)).collect();
        DenseND::from_parts(data, self.shape())
    }
}

/// Leaf node reading from a borrowed tensor, views included.
#[derive(Debug, Clone, Copy)]
pub struct LazyTensor<'a, T> {
    tensor: &'a DenseND<T>,
}

impl<'a, T: Element> TensorExpression<T> for LazyTensor<'a, T> {
    fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }

    #[inline]
    fn element(&self, linear: usize) -> T {
        let position = if self.tensor.is_contiguous() {
            linear
        } else {
            self.tensor.layout.linear_to_storage(linear)
        };
        self.tensor.storage[position]
    }
}

/// Two sub-expressions combined element by element.
#[derive(Debug, Clone)]
pub struct BinaryExpr<L, R, T> {
    lhs: L,
    rhs: R,
    op: BinaryOp,
    shape: Shape,
    _element: PhantomData<T>,
}

impl<L, R, T> BinaryExpr<L, R, T>
where
    T: Element,
    L: TensorExpression<T>,
    R: TensorExpression<T>,
{
    /// # Panics
    ///
    /// Panics if the operand shapes differ.
    pub fn new(lhs: L, rhs: R, op: BinaryOp) -> Self {
        assert!(
            lhs.shape() == rhs.shape(),
            "lazy `{}` requires equal shapes, got {:?} and {:?}",
            op,
            lhs.shape(),
            rhs.shape()
        );
        let shape = lhs.shape().iter().copied().collect();
        Self {
            lhs,
            rhs,
            op,
            shape,
            _element: PhantomData,
        }
    }

    /// Operator applied at each element.
    pub fn op(&self) -> BinaryOp {
        self.op
    }
}

impl<L, R, T> TensorExpression<T> for BinaryExpr<L, R, T>
where
    T: Element,
    L: TensorExpression<T>,
    R: TensorExpression<T>,
{
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    fn element(&self, linear: usize) -> T {
        self.op
            .apply(self.lhs.element(linear), self.rhs.element(linear))
    }
}

/// One sub-expression with a per-element transform.
#[derive(Debug, Clone)]
pub struct UnaryExpr<E, T> {
    inner: E,
    f: fn(T) -> T,
}

impl<E, T> UnaryExpr<E, T>
where
    T: Element,
    E: TensorExpression<T>,
{
    /// Wrap `inner`, applying `f` to each of its elements.
    pub fn new(inner: E, f: fn(T) -> T) -> Self {
        Self { inner, f }
    }
}

impl<E, T> TensorExpression<T> for UnaryExpr<E, T>
where
    T: Element,
    E: TensorExpression<T>,
{
    fn shape(&self) -> &[usize] {
        self.inner.shape()
    }

    #[inline]
    fn element(&self, linear: usize) -> T {
        (self.f)(self.inner.element(linear))
    }
}

macro_rules! expr_ops {
    ([$($params:tt)*] $ty:ty) => {
        expr_ops!(@op [$($params)*] $ty, Add, add, BinaryOp::Add);
        expr_ops!(@op [$($params)*] $ty, Sub, sub, BinaryOp::Sub);
        expr_ops!(@op [$($params)*] $ty, Mul, mul, BinaryOp::Mul);
        expr_ops!(@op [$($params)*] $ty, Div, div, BinaryOp::Div);

        impl<$($params)*> Neg for $ty
        where
            $ty: TensorExpression<T>,
            T: Neg<Output = T>,
        {
            type Output = UnaryExpr<$ty, T>;

            fn neg(self) -> Self::Output {
                UnaryExpr::new(self, |v| -v)
            }
        }
    };
    (@op [$($params:tt)*] $ty:ty, $trait:ident, $method:ident, $op:expr) => {
        impl<$($params)*, Rhs> $trait<Rhs> for $ty
        where
            $ty: TensorExpression<T>,
            Rhs: TensorExpression<T>,
        {
            type Output = BinaryExpr<$ty, Rhs, T>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                BinaryExpr::new(self, rhs, $op)
            }
        }
    };
}

expr_ops!(['a, T: Element] LazyTensor<'a, T>);
expr_ops!([L, R, T: Element] BinaryExpr<L, R, T>);
expr_ops!([E, T: Element] UnaryExpr<E, T>);

impl<T: Element> DenseND<T> {
    /// Wrap this tensor as the leaf of a lazy expression.
    pub fn lazy(&self) -> LazyTensor<'_, T> {
        LazyTensor { tensor: self }
    }

    /// Evaluate an expression into a new contiguous tensor.
    pub fn from_expr<E: TensorExpression<T>>(expr: &E) -> Self {
        expr.evaluate()
    }
}
