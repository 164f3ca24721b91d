//! Element-wise operation kinds shared by eager and lazy evaluation.
//!
//! Dense operators (`&a + &b`, `&a * 2.0`, …) and lazy expression nodes
//! both resolve to a [`BinaryOp`]; the enum knows how to apply itself to a
//! pair of elements and how to run over whole buffers through a
//! [`BulkOps`] backend.

use crate::backend::BulkOps;
use crate::types::Element;
use std::fmt;

/// Arithmetic operator applied element by element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Apply to one pair of elements.
    #[inline]
    pub fn apply<T: Element>(self, lhs: T, rhs: T) -> T {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }

    /// Apply over equal-length contiguous buffers through a backend.
    pub(crate) fn apply_bulk<T>(self, ops: &dyn BulkOps<T>, lhs: &[T], rhs: &[T], out: &mut [T]) {
        match self {
            BinaryOp::Add => ops.add(lhs, rhs, out),
            BinaryOp::Sub => ops.sub(lhs, rhs, out),
            BinaryOp::Mul => ops.mul(lhs, rhs, out),
            BinaryOp::Div => ops.div(lhs, rhs, out),
        }
    }

    /// True if `a op b == b op a` for every pair.
    pub fn is_commutative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }

    /// Operator symbol used in `Display`.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
