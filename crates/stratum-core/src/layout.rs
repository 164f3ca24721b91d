//! Strided layouts: shape, strides and offset arithmetic.
//!
//! A [`StridedLayout`] maps a logical N-dimensional index space onto
//! positions of a flat buffer. Every zero-copy view (transpose, permute,
//! slice, broadcast) is just a different layout over the same buffer.
//!
//! # Examples
//!
//! ```
//! use stratum_core::layout::{broadcast_shape, row_major_strides, StridedLayout};
//!
//! assert_eq!(row_major_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
//!
//! let layout = StridedLayout::contiguous(&[2, 3]);
//! let transposed = layout.transposed().unwrap();
//! assert_eq!(transposed.strides(), &[1, 3]);
//! assert!(!transposed.is_contiguous());
//!
//! assert_eq!(broadcast_shape(&[3, 1], &[1, 4]).unwrap().as_slice(), &[3, 4]);
//! assert!(broadcast_shape(&[3], &[4]).is_err());
//! ```

use crate::types::Shape;
use smallvec::SmallVec;
use std::ops::Range;
use thiserror::Error;

/// Errors raised by layout and view computations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Index rank mismatch: expected {expected} coordinates, got {got}")]
    RankMismatch { expected: usize, got: usize },

    #[error("Shape {shape:?} requires {expected} elements, but got {got}")]
    ElementCount {
        shape: Vec<usize>,
        expected: usize,
        got: usize,
    },

    #[error("Invalid permutation {axes:?} for rank {rank}")]
    InvalidPermutation { axes: Vec<usize>, rank: usize },

    #[error("Axis {axis} out of range for rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    #[error("Range {start}..{end} out of bounds for axis {axis} of size {size}")]
    RangeOutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        size: usize,
    },

    #[error(
        "Cannot reshape non-contiguous layout (shape {shape:?}, strides {strides:?}, offset {offset})"
    )]
    NonContiguous {
        shape: Vec<usize>,
        strides: Vec<usize>,
        offset: usize,
    },

    #[error("Shapes {lhs:?} and {rhs:?} are not broadcastable")]
    BroadcastIncompatible { lhs: Vec<usize>, rhs: Vec<usize> },

    #[error("Cannot broadcast shape {from:?} to {to:?}")]
    BroadcastTarget { from: Vec<usize>, to: Vec<usize> },

    #[error("Operation requires rank {expected}, got shape {shape:?}")]
    RankRequired { expected: usize, shape: Vec<usize> },

    #[error("Shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },

    #[error("Ragged rows: row 0 has {expected} elements but row {row} has {got}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
}

/// Shape, strides and starting offset of a tensor over a flat buffer.
///
/// Strides are non-negative; a stride of 0 marks a broadcast axis whose
/// every logical position reads the same buffer cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StridedLayout {
    shape: Shape,
    strides: Shape,
    offset: usize,
    contiguous: bool,
}

impl StridedLayout {
    /// Row-major layout with zero offset.
    pub fn contiguous(shape: &[usize]) -> Self {
        Self {
            shape: shape.iter().copied().collect(),
            strides: row_major_strides(shape),
            offset: 0,
            contiguous: true,
        }
    }

    /// Build a layout from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RankMismatch`] if `shape` and `strides`
    /// differ in length.
    pub fn new(shape: &[usize], strides: &[usize], offset: usize) -> Result<Self, LayoutError> {
        if shape.len() != strides.len() {
            return Err(LayoutError::RankMismatch {
                expected: shape.len(),
                got: strides.len(),
            });
        }
        Ok(Self::from_parts(
            shape.iter().copied().collect(),
            strides.iter().copied().collect(),
            offset,
        ))
    }

    fn from_parts(shape: Shape, strides: Shape, offset: usize) -> Self {
        let contiguous = offset == 0 && strides == row_major_strides(&shape);
        Self {
            shape,
            strides,
            offset,
            contiguous,
        }
    }

    /// Logical extent of each axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Buffer step per axis; zero on broadcast axes.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Buffer position of the first logical element.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of logical elements (1 for rank 0).
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// True when some axis has length zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True iff strides equal the row-major strides of the shape and the
    /// offset is zero.
    pub fn is_contiguous(&self) -> bool {
        self.contiguous
    }

    /// True if some axis of size > 1 has stride 0.
    pub fn has_broadcast_axes(&self) -> bool {
        self.shape
            .iter()
            .zip(&self.strides)
            .any(|(&size, &stride)| stride == 0 && size > 1)
    }

    /// Buffer position of a multi-index: `offset + Σ index[i] * strides[i]`.
    ///
    /// Coordinates are not bounds-checked; see
    /// [`checked_storage_index`](Self::checked_storage_index).
    pub fn storage_index(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.rank());
        self.offset
            + index
                .iter()
                .zip(&self.strides)
                .map(|(&i, &stride)| i * stride)
                .sum::<usize>()
    }

    /// Bounds-checked [`storage_index`](Self::storage_index).
    pub fn checked_storage_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.rank() || index.iter().zip(&self.shape).any(|(&i, &n)| i >= n) {
            return None;
        }
        Some(self.storage_index(index))
    }

    /// Buffer position of the element at a logical row-major position.
    ///
    /// The linear index is unravelled against the logical shape and then
    /// projected through the physical strides. Contiguous layouts map
    /// linear indices to themselves.
    pub fn linear_to_storage(&self, linear: usize) -> usize {
        if self.contiguous {
            return linear;
        }
        let mut remainder = linear;
        let mut position = self.offset;
        for (&size, &stride) in self.shape.iter().zip(&self.strides).rev() {
            position += (remainder % size) * stride;
            remainder /= size;
        }
        position
    }

    /// Bounds-checked [`linear_to_storage`](Self::linear_to_storage).
    pub fn checked_linear_to_storage(&self, linear: usize) -> Option<usize> {
        (linear < self.len()).then(|| self.linear_to_storage(linear))
    }

    /// Reorder axes: `shape[i] = old.shape[axes[i]]`, same for strides.
    pub fn permuted(&self, axes: &[usize]) -> Result<Self, LayoutError> {
        let rank = self.rank();
        let invalid = || LayoutError::InvalidPermutation {
            axes: axes.to_vec(),
            rank,
        };
        if axes.len() != rank {
            return Err(invalid());
        }
        let mut seen: SmallVec<[bool; 6]> = SmallVec::from_elem(false, rank);
        for &axis in axes {
            if axis >= rank || seen[axis] {
                return Err(invalid());
            }
            seen[axis] = true;
        }

        let shape = axes.iter().map(|&a| self.shape[a]).collect();
        let strides = axes.iter().map(|&a| self.strides[a]).collect();
        Ok(Self::from_parts(shape, strides, self.offset))
    }

    /// Swap the two axes of a rank-2 layout.
    pub fn transposed(&self) -> Result<Self, LayoutError> {
        if self.rank() != 2 {
            return Err(LayoutError::RankRequired {
                expected: 2,
                shape: self.shape.to_vec(),
            });
        }
        self.permuted(&[1, 0])
    }

    /// Restrict one axis to `range`, sharing the buffer.
    pub fn sliced(&self, axis: usize, range: Range<usize>) -> Result<Self, LayoutError> {
        if axis >= self.rank() {
            return Err(LayoutError::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }
        let size = self.shape[axis];
        if range.start > range.end || range.end > size {
            return Err(LayoutError::RangeOutOfBounds {
                axis,
                start: range.start,
                end: range.end,
                size,
            });
        }

        let mut shape = self.shape.clone();
        shape[axis] = range.end - range.start;
        let offset = self.offset + range.start * self.strides[axis];
        Ok(Self::from_parts(shape, self.strides.clone(), offset))
    }

    /// Reinterpret a contiguous layout with a new shape of equal count.
    pub fn reshaped(&self, new_shape: &[usize]) -> Result<Self, LayoutError> {
        if !self.contiguous {
            return Err(LayoutError::NonContiguous {
                shape: self.shape.to_vec(),
                strides: self.strides.to_vec(),
                offset: self.offset,
            });
        }
        let expected: usize = new_shape.iter().product();
        if expected != self.len() {
            return Err(LayoutError::ElementCount {
                shape: new_shape.to_vec(),
                expected,
                got: self.len(),
            });
        }
        Ok(Self::contiguous(new_shape))
    }

    /// Expand to `target` by left-padding with size-1 axes and giving every
    /// stretched axis stride 0.
    pub fn broadcast_to(&self, target: &[usize]) -> Result<Self, LayoutError> {
        let incompatible = || LayoutError::BroadcastTarget {
            from: self.shape.to_vec(),
            to: target.to_vec(),
        };
        if target.len() < self.rank() {
            return Err(incompatible());
        }

        let pad = target.len() - self.rank();
        let mut strides = Shape::with_capacity(target.len());
        for (axis, &want) in target.iter().enumerate() {
            if axis < pad {
                strides.push(0);
                continue;
            }
            let have = self.shape[axis - pad];
            let stride = self.strides[axis - pad];
            if have == want {
                strides.push(stride);
            } else if have == 1 {
                strides.push(0);
            } else {
                return Err(incompatible());
            }
        }
        Ok(Self::from_parts(
            target.iter().copied().collect(),
            strides,
            self.offset,
        ))
    }
}

/// Row-major strides: `strides[last] = 1`, `strides[i] = strides[i+1] * shape[i+1]`.
pub fn row_major_strides(shape: &[usize]) -> Shape {
    let mut strides: Shape = SmallVec::from_elem(1, shape.len());
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Common shape of two broadcast-compatible shapes.
///
/// Dimensions are right-aligned; each aligned pair must be equal or
/// contain a 1, and the output takes the larger size.
///
/// # Errors
///
/// [`LayoutError::BroadcastIncompatible`] naming both shapes.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Shape, LayoutError> {
    let rank = lhs.len().max(rhs.len());
    let mut out: Shape = SmallVec::from_elem(1, rank);
    for i in 0..rank {
        let a = if i < lhs.len() { lhs[lhs.len() - 1 - i] } else { 1 };
        let b = if i < rhs.len() { rhs[rhs.len() - 1 - i] } else { 1 };
        out[rank - 1 - i] = match (a, b) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(LayoutError::BroadcastIncompatible {
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                })
            }
        };
    }
    Ok(out)
}

/// Row-major coordinates of a linear position within `shape`.
pub fn unravel_index(shape: &[usize], linear: usize) -> Shape {
    let mut index: Shape = SmallVec::from_elem(0, shape.len());
    let mut remainder = linear;
    for axis in (0..shape.len()).rev() {
        let size = shape[axis];
        if size == 0 {
            break;
        }
        index[axis] = remainder % size;
        remainder /= size;
    }
    index
}

/// Row-major linear position of a multi-index within `shape`.
pub fn ravel_index(shape: &[usize], index: &[usize]) -> usize {
    debug_assert_eq!(shape.len(), index.len());
    index
        .iter()
        .zip(row_major_strides(shape).iter())
        .map(|(&i, &stride)| i * stride)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
        assert_eq!(row_major_strides(&[5]).as_slice(), &[1]);
        assert!(row_major_strides(&[]).is_empty());
    }

    #[test]
    fn test_contiguous_layout() {
        let layout = StridedLayout::contiguous(&[2, 3]);
        assert!(layout.is_contiguous());
        assert_eq!(layout.len(), 6);
        assert_eq!(layout.storage_index(&[1, 2]), 5);
        assert_eq!(layout.linear_to_storage(4), 4);
    }

    #[test]
    fn test_scalar_layout() {
        let layout = StridedLayout::contiguous(&[]);
        assert_eq!(layout.rank(), 0);
        assert_eq!(layout.len(), 1);
        assert!(layout.is_contiguous());
        assert_eq!(layout.storage_index(&[]), 0);
        assert_eq!(layout.linear_to_storage(0), 0);
    }

    #[test]
    fn test_new_rank_mismatch() {
        let err = StridedLayout::new(&[2, 3], &[1], 0).unwrap_err();
        assert_eq!(
            err,
            LayoutError::RankMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_transposed_linear_to_storage() {
        // Logical order of the transpose of [[1,2,3],[4,5,6]] reads 0,3,1,4,2,5.
        let layout = StridedLayout::contiguous(&[2, 3]).transposed().unwrap();
        let positions: Vec<usize> = (0..6).map(|i| layout.linear_to_storage(i)).collect();
        assert_eq!(positions, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_transposed_requires_rank_two() {
        let err = StridedLayout::contiguous(&[2, 3, 4]).transposed().unwrap_err();
        assert!(matches!(err, LayoutError::RankRequired { expected: 2, .. }));
    }

    #[test]
    fn test_permuted_validation() {
        let layout = StridedLayout::contiguous(&[2, 3, 4]);
        assert!(layout.permuted(&[0, 0, 1]).is_err());
        assert!(layout.permuted(&[0, 1]).is_err());
        assert!(layout.permuted(&[0, 1, 3]).is_err());

        let p = layout.permuted(&[2, 0, 1]).unwrap();
        assert_eq!(p.shape(), &[4, 2, 3]);
        assert_eq!(p.strides(), &[1, 12, 4]);
        assert!(!p.is_contiguous());

        // Identity permutation recomputes contiguity as true.
        assert!(layout.permuted(&[0, 1, 2]).unwrap().is_contiguous());
    }

    #[test]
    fn test_sliced_offset() {
        let layout = StridedLayout::contiguous(&[4, 3]);
        let s = layout.sliced(0, 1..3).unwrap();
        assert_eq!(s.shape(), &[2, 3]);
        assert_eq!(s.offset(), 3);
        assert!(!s.is_contiguous());
        assert_eq!(s.storage_index(&[0, 0]), 3);
        assert_eq!(s.linear_to_storage(5), 8);

        let cols = layout.sliced(1, 1..2).unwrap();
        assert_eq!(cols.shape(), &[4, 1]);
        assert_eq!(cols.linear_to_storage(2), 7);
    }

    #[test]
    fn test_sliced_out_of_bounds() {
        let layout = StridedLayout::contiguous(&[4, 3]);
        assert!(matches!(
            layout.sliced(1, 2..4),
            Err(LayoutError::RangeOutOfBounds { size: 3, .. })
        ));
        assert!(matches!(
            layout.sliced(2, 0..1),
            Err(LayoutError::AxisOutOfRange { axis: 2, rank: 2 })
        ));
        assert_eq!(layout.sliced(0, 4..4).unwrap().len(), 0);
    }

    #[test]
    fn test_reshaped_rejects_non_contiguous() {
        let layout = StridedLayout::contiguous(&[2, 3]);
        assert_eq!(layout.reshaped(&[3, 2]).unwrap().shape(), &[3, 2]);
        assert!(matches!(
            layout.reshaped(&[4, 2]),
            Err(LayoutError::ElementCount { .. })
        ));
        let t = layout.transposed().unwrap();
        assert!(matches!(
            t.reshaped(&[6]),
            Err(LayoutError::NonContiguous { .. })
        ));
    }

    #[test]
    fn test_broadcast_to() {
        let layout = StridedLayout::contiguous(&[3, 1]);
        let b = layout.broadcast_to(&[2, 3, 4]).unwrap();
        assert_eq!(b.shape(), &[2, 3, 4]);
        assert_eq!(b.strides(), &[0, 1, 0]);
        assert!(!b.is_contiguous());
        assert!(b.has_broadcast_axes());
        assert_eq!(b.linear_to_storage(5), 1);

        assert!(layout.broadcast_to(&[3, 4]).unwrap().has_broadcast_axes());
        assert!(layout.broadcast_to(&[2, 4]).is_err());
        assert!(layout.broadcast_to(&[4]).is_err());
    }

    #[test]
    fn test_broadcast_shape() {
        assert_eq!(broadcast_shape(&[3, 1], &[1, 4]).unwrap().as_slice(), &[3, 4]);
        assert_eq!(broadcast_shape(&[2, 3], &[3]).unwrap().as_slice(), &[2, 3]);
        assert_eq!(broadcast_shape(&[], &[5]).unwrap().as_slice(), &[5]);
        let err = broadcast_shape(&[3], &[4]).unwrap_err();
        assert_eq!(err.to_string(), "Shapes [3] and [4] are not broadcastable");
    }

    #[test]
    fn test_unravel_ravel() {
        let shape = [2, 3, 4];
        for linear in 0..24 {
            let index = unravel_index(&shape, linear);
            assert_eq!(ravel_index(&shape, &index), linear);
        }
        assert_eq!(unravel_index(&shape, 13).as_slice(), &[1, 0, 1]);
    }

    #[test]
    fn test_checked_storage_index() {
        let layout = StridedLayout::contiguous(&[2, 2]);
        assert_eq!(layout.checked_storage_index(&[1, 1]), Some(3));
        assert_eq!(layout.checked_storage_index(&[2, 0]), None);
        assert_eq!(layout.checked_storage_index(&[0]), None);
        assert_eq!(layout.checked_linear_to_storage(4), None);
    }
}
