//! Logical-order iteration over strided tensors.

use super::types::DenseND;
use crate::types::Shape;
use smallvec::SmallVec;
use std::iter::FusedIterator;

/// Iterator over the elements of a [`DenseND`] in row-major logical order.
///
/// Keeps one counter per axis and advances like an odometer: the last
/// axis moves fastest, and a counter that reaches its axis size resets to
/// zero and carries into the axis before it. Each step adjusts the buffer
/// position by the strides, so permuted, sliced and broadcast views are
/// read without any index arithmetic per element.
///
/// # Examples
///
/// ```
/// use stratum_core::DenseND;
///
/// let m = DenseND::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
/// let t = m.transpose().unwrap();
/// let order: Vec<i32> = t.iter().copied().collect();
/// assert_eq!(order, vec![1, 4, 2, 5, 3, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct StridedIter<'a, T> {
    storage: &'a [T],
    shape: &'a [usize],
    strides: &'a [usize],
    counters: Shape,
    position: usize,
    remaining: usize,
    contiguous: bool,
}

impl<'a, T> StridedIter<'a, T> {
    pub(crate) fn new(tensor: &'a DenseND<T>) -> Self {
        let layout = &tensor.layout;
        Self {
            storage: &tensor.storage,
            shape: layout.shape(),
            strides: layout.strides(),
            counters: SmallVec::from_elem(0, layout.rank()),
            position: layout.offset(),
            remaining: layout.len(),
            contiguous: layout.is_contiguous(),
        }
    }

    fn advance(&mut self) {
        if self.contiguous {
            self.position += 1;
            return;
        }
        for axis in (0..self.shape.len()).rev() {
            self.counters[axis] += 1;
            self.position += self.strides[axis];
            if self.counters[axis] < self.shape[axis] {
                return;
            }
            // Carry: rewind this axis to zero and bump the next slower one.
            self.position -= self.strides[axis] * self.shape[axis];
            self.counters[axis] = 0;
        }
    }
}

impl<'a, T> Iterator for StridedIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.storage[self.position];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for StridedIter<'_, T> {}

impl<T> FusedIterator for StridedIter<'_, T> {}

impl<T> DenseND<T> {
    /// Iterate over elements in row-major logical order.
    pub fn iter(&self) -> StridedIter<'_, T> {
        StridedIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a DenseND<T> {
    type Item = &'a T;
    type IntoIter = StridedIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
