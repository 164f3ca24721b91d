//! Core type definitions for Stratum tensors.
//!
//! This module defines the fundamental types used throughout the stack:
//!
//! - Type aliases for tensor dimensions ([`Axis`], [`Rank`], [`Shape`])
//! - The [`Element`] capability trait every numeric element type implements
//!
//! # Examples
//!
//! ```
//! use stratum_core::{DenseND, Shape};
//!
//! let tensor = DenseND::<f64>::zeros(&[2, 3]);
//! let shape: Shape = tensor.shape().iter().copied().collect();
//! assert_eq!(shape.as_slice(), &[2, 3]);
//! ```

use crate::backend::{self, BulkOps};
use scirs2_core::numeric::{Float, Num, NumCast};
use smallvec::SmallVec;

/// Type alias for tensor axis index.
///
/// Zero-indexed (0 is the first, most significant axis).
pub type Axis = usize;

/// Type alias for tensor rank (number of dimensions).
pub type Rank = usize;

/// Shape type using SmallVec to avoid heap allocation for common cases.
///
/// Optimized for tensors with up to 6 dimensions. Higher-rank tensors
/// spill to the heap transparently. Strides use the same representation.
pub type Shape = SmallVec<[usize; 6]>;

/// Numeric element stored in dense and sparse tensors.
///
/// `Element` is the additive + multiplicative base of the numeric trait
/// hierarchy; finer capabilities are requested per operation with extra
/// bounds (`Neg` for negation, `Float` for means, `Hash` for hashing).
///
/// The only method is a capability hook: a type may expose a
/// [`BulkOps`] backend for contiguous buffers. Dense operations consult it
/// and fall back to the generic strided path when it returns `None`.
///
/// # Examples
///
/// ```
/// use stratum_core::Element;
///
/// assert!(f64::bulk_ops().is_some());
/// assert!(i32::bulk_ops().is_none());
/// ```
pub trait Element: Copy + Num + Send + Sync + 'static {
    /// Bulk numeric backend for contiguous buffers of this type, if any.
    fn bulk_ops() -> Option<&'static dyn BulkOps<Self>> {
        None
    }
}

macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(impl Element for $t {})*
    };
}

impl_element!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Element for f32 {
    fn bulk_ops() -> Option<&'static dyn BulkOps<Self>> {
        Some(backend::float_ops::<f32>())
    }
}

impl Element for f64 {
    fn bulk_ops() -> Option<&'static dyn BulkOps<Self>> {
        Some(backend::float_ops::<f64>())
    }
}

/// Convert an element count into a float divisor.
///
/// Returns NaN if the count is not representable, which only happens for
/// float types narrower than the count.
pub fn count_as<T: Float>(count: usize) -> T {
    <T as NumCast>::from(count).unwrap_or_else(T::nan)
}
