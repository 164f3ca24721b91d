//! Operator overloads for `DenseND`.
//!
//! Binary operators broadcast like [`DenseND::zip_with`] and panic with the
//! offending shapes when the operands are incompatible. Scalars may appear
//! on either side; scalar-on-the-left is provided for the primitive numeric
//! types.

use super::types::DenseND;
use crate::ops::BinaryOp;
use crate::types::Element;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

macro_rules! impl_tensor_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:expr) => {
        impl<T: Element> $trait<&DenseND<T>> for &DenseND<T> {
            type Output = DenseND<T>;

            fn $method(self, rhs: &DenseND<T>) -> DenseND<T> {
                self.zip_with(rhs, $op)
                    .unwrap_or_else(|err| panic!("tensor `{}` failed: {}", $op, err))
            }
        }

        impl<T: Element> $trait<DenseND<T>> for DenseND<T> {
            type Output = DenseND<T>;

            fn $method(self, rhs: DenseND<T>) -> DenseND<T> {
                (&self).$method(&rhs)
            }
        }

        impl<T: Element> $trait<&DenseND<T>> for DenseND<T> {
            type Output = DenseND<T>;

            fn $method(self, rhs: &DenseND<T>) -> DenseND<T> {
                (&self).$method(rhs)
            }
        }

        impl<T: Element> $trait<DenseND<T>> for &DenseND<T> {
            type Output = DenseND<T>;

            fn $method(self, rhs: DenseND<T>) -> DenseND<T> {
                self.$method(&rhs)
            }
        }

        impl<T: Element> $trait<T> for &DenseND<T> {
            type Output = DenseND<T>;

            fn $method(self, rhs: T) -> DenseND<T> {
                self.map_scalar(rhs, $op)
            }
        }

        impl<T: Element> $trait<T> for DenseND<T> {
            type Output = DenseND<T>;

            fn $method(self, rhs: T) -> DenseND<T> {
                self.map_scalar(rhs, $op)
            }
        }

        impl<T: Element> $assign_trait<&DenseND<T>> for DenseND<T> {
            fn $assign_method(&mut self, rhs: &DenseND<T>) {
                *self = (&*self).$method(rhs);
            }
        }

        impl<T: Element> $assign_trait<DenseND<T>> for DenseND<T> {
            fn $assign_method(&mut self, rhs: DenseND<T>) {
                *self = (&*self).$method(&rhs);
            }
        }

        impl<T: Element> $assign_trait<T> for DenseND<T> {
            fn $assign_method(&mut self, rhs: T) {
                *self = self.map_scalar(rhs, $op);
            }
        }
    };
}

impl_tensor_binary_op!(Add, add, AddAssign, add_assign, BinaryOp::Add);
impl_tensor_binary_op!(Sub, sub, SubAssign, sub_assign, BinaryOp::Sub);
impl_tensor_binary_op!(Mul, mul, MulAssign, mul_assign, BinaryOp::Mul);
impl_tensor_binary_op!(Div, div, DivAssign, div_assign, BinaryOp::Div);

impl<T: Element + Neg<Output = T>> Neg for &DenseND<T> {
    type Output = DenseND<T>;

    fn neg(self) -> DenseND<T> {
        self.negated()
    }
}

impl<T: Element + Neg<Output = T>> Neg for DenseND<T> {
    type Output = DenseND<T>;

    fn neg(self) -> DenseND<T> {
        self.negated()
    }
}

macro_rules! impl_scalar_lhs_ops {
    ($($t:ty),* $(,)?) => {
        $(
            impl_scalar_lhs_ops!(@op $t, Add, add, BinaryOp::Add);
            impl_scalar_lhs_ops!(@op $t, Sub, sub, BinaryOp::Sub);
            impl_scalar_lhs_ops!(@op $t, Mul, mul, BinaryOp::Mul);
            impl_scalar_lhs_ops!(@op $t, Div, div, BinaryOp::Div);
        )*
    };
    (@op $t:ty, $trait:ident, $method:ident, $op:expr) => {
        impl $trait<&DenseND<$t>> for $t {
            type Output = DenseND<$t>;

            fn $method(self, rhs: &DenseND<$t>) -> DenseND<$t> {
                rhs.map_scalar_lhs(self, $op)
            }
        }

        impl $trait<DenseND<$t>> for $t {
            type Output = DenseND<$t>;

            fn $method(self, rhs: DenseND<$t>) -> DenseND<$t> {
                rhs.map_scalar_lhs(self, $op)
            }
        }
    };
}

impl_scalar_lhs_ops!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
