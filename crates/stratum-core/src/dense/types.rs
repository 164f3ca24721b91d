//! Dense tensor type definition and basic operations
//!
//! This module defines the core `DenseND<T>` type and provides basic
//! accessors. Creation, views, arithmetic and reductions live in sibling
//! modules.

use crate::layout::{LayoutError, StridedLayout};
use std::borrow::Cow;
use std::sync::Arc;

/// Dense N-dimensional tensor: a shared flat buffer seen through a
/// [`StridedLayout`].
///
/// Views produced by [`permute`](DenseND::permute),
/// [`transpose`](DenseND::transpose), [`slice_axis`](DenseND::slice_axis),
/// [`reshape`](DenseND::reshape) and
/// [`broadcast_to`](DenseND::broadcast_to) share the buffer with their
/// parent; no element is copied.
///
/// # Sharing and mutation
///
/// The buffer is reference counted. Writing through a tensor whose buffer
/// is shared first gives it a private contiguous copy of its own logical
/// elements, so a write never leaks into another tensor or view. Writing
/// through a view with broadcast (stride-0) axes panics: one buffer cell
/// backs several logical positions.
///
/// Tensors are `Send + Sync` when `T` is. Concurrent readers need no
/// synchronization; mutation requires `&mut` as usual.
///
/// # Type Parameters
///
/// * `T` - The element type (typically `f32`, `f64` or an integer type)
///
/// # Examples
///
/// ```
/// use stratum_core::DenseND;
///
/// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(tensor.shape(), &[2, 3, 4]);
/// assert_eq!(tensor.rank(), 3);
/// assert!(tensor.is_contiguous());
/// ```
#[derive(Clone)]
pub struct DenseND<T> {
    /// Flat element buffer, possibly shared with other views
    pub(crate) storage: Arc<Vec<T>>,

    /// Shape, strides and offset into `storage`
    pub(crate) layout: StridedLayout,
}

impl<T> DenseND<T> {
    /// Wrap a row-major buffer whose length is known to match `shape`.
    pub(crate) fn from_parts(data: Vec<T>, shape: &[usize]) -> Self {
        let layout = StridedLayout::contiguous(shape);
        debug_assert_eq!(data.len(), layout.len());
        Self {
            storage: Arc::new(data),
            layout,
        }
    }

    /// A view over the same buffer with a different layout.
    pub(crate) fn with_layout(&self, layout: StridedLayout) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            layout,
        }
    }

    /// Create a tensor from a vector with given shape
    ///
    /// # Arguments
    ///
    /// * `vec` - Flattened data in row-major order
    /// * `shape` - Target shape (empty for a scalar)
    ///
    /// # Errors
    ///
    /// Fails if `vec.len()` differs from the product of `shape`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let tensor = DenseND::from_vec(data, &[2, 3]).unwrap();
    /// assert_eq!(tensor.shape(), &[2, 3]);
    ///
    /// assert!(DenseND::from_vec(vec![1.0, 2.0], &[3]).is_err());
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            return Err(LayoutError::ElementCount {
                shape: shape.to_vec(),
                expected: total,
                got: vec.len(),
            }
            .into());
        }
        Ok(Self::from_parts(vec, shape))
    }

    /// Get the rank (number of dimensions) of this tensor
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let tensor = DenseND::<f32>::zeros(&[2, 3, 4]);
    /// assert_eq!(tensor.rank(), 3);
    /// ```
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Get the shape of this tensor
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Buffer positions skipped per unit step along each axis.
    pub fn strides(&self) -> &[usize] {
        self.layout.strides()
    }

    /// Buffer position of the first logical element.
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    /// Shape, strides and offset describing how this tensor reads its buffer.
    pub fn layout(&self) -> &StridedLayout {
        &self.layout
    }

    /// Get the total number of logical elements (1 for a scalar)
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// assert_eq!(DenseND::<f32>::zeros(&[2, 3, 4]).len(), 24);
    /// assert_eq!(DenseND::scalar(7_i32).len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// Check if the tensor is empty (has zero elements)
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Check if the tensor is laid out row-major from offset zero.
    ///
    /// Only contiguous tensors can be reshaped.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3]);
    /// assert!(tensor.is_contiguous());
    /// assert!(!tensor.transpose().unwrap().is_contiguous());
    /// ```
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// True if this tensor is a broadcast view and therefore read-only.
    pub fn is_broadcast_view(&self) -> bool {
        self.layout.has_broadcast_axes()
    }

    /// True if both tensors read from the same buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let a = DenseND::<f64>::ones(&[2, 2]);
    /// let t = a.transpose().unwrap();
    /// assert!(a.shares_storage_with(&t));
    /// assert!(!a.shares_storage_with(&t.to_contiguous()));
    /// ```
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// The logical elements as a slice, if the tensor is contiguous.
    pub fn as_slice(&self) -> Option<&[T]> {
        self.is_contiguous().then(|| &self.storage[..self.len()])
    }

    /// Check if two tensors have the same shape
    pub fn same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }
}

impl<T: Clone> DenseND<T> {
    /// Copy the logical elements, in row-major order, into a new vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let m = DenseND::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    /// assert_eq!(m.transpose().unwrap().to_vec(), vec![1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn to_vec(&self) -> Vec<T> {
        match self.as_slice() {
            Some(slice) => slice.to_vec(),
            None => self.iter().cloned().collect(),
        }
    }

    /// Logical elements as one row-major slice, borrowed when the tensor
    /// is contiguous and copied otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::borrow::Cow;
    /// use stratum_core::DenseND;
    ///
    /// let m = DenseND::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
    /// assert!(matches!(m.contiguous_data(), Cow::Borrowed(_)));
    /// let t = m.transpose().unwrap();
    /// assert_eq!(&*t.contiguous_data(), &[1, 3, 2, 4]);
    /// ```
    pub fn contiguous_data(&self) -> Cow<'_, [T]> {
        match self.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.to_vec()),
        }
    }

    /// A freshly allocated contiguous copy with its own buffer.
    pub fn to_contiguous(&self) -> Self {
        Self::from_parts(self.to_vec(), self.shape())
    }

    /// Prepare the buffer for writing.
    ///
    /// Panics on broadcast views. A shared buffer is replaced by a private
    /// contiguous copy of this tensor's elements, which also resets the
    /// layout; callers must compute storage positions afterwards.
    pub(crate) fn make_unique(&mut self) {
        assert!(
            !self.layout.has_broadcast_axes(),
            "cannot write through a broadcast view (shape {:?}, strides {:?})",
            self.shape(),
            self.strides()
        );
        if Arc::get_mut(&mut self.storage).is_none() {
            *self = self.to_contiguous();
        }
    }

    /// Mutable buffer access. Call [`make_unique`](Self::make_unique) first.
    pub(crate) fn buffer_mut(&mut self) -> &mut Vec<T> {
        Arc::make_mut(&mut self.storage)
    }

    /// Mutable access to the logical elements if the tensor is contiguous.
    ///
    /// A shared buffer is copied first.
    pub fn as_slice_mut(&mut self) -> Option<&mut [T]> {
        if !self.is_contiguous() {
            return None;
        }
        self.make_unique();
        let len = self.len();
        Some(&mut self.buffer_mut()[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_count_mismatch() {
        let err = DenseND::from_vec(vec![1, 2, 3], &[2, 2]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Shape [2, 2] requires 4 elements, but got 3"
        );
    }

    #[test]
    fn test_scalar_from_vec() {
        let s = DenseND::from_vec(vec![5], &[]).unwrap();
        assert_eq!(s.rank(), 0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.to_vec(), vec![5]);
    }

    #[test]
    fn test_zero_sized_dimension() {
        let t = DenseND::<i32>::from_vec(vec![], &[3, 0]).unwrap();
        assert!(t.is_empty());
        assert!(t.to_vec().is_empty());
    }

    #[test]
    fn test_as_slice_only_when_contiguous() {
        let t = DenseND::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        assert_eq!(t.as_slice(), Some(&[1, 2, 3, 4][..]));
        assert_eq!(t.transpose().unwrap().as_slice(), None);
    }

    #[test]
    fn test_as_slice_mut_detaches_shared_buffer() {
        let a = DenseND::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        let mut b = a.clone();
        assert!(a.shares_storage_with(&b));

        b.as_slice_mut().unwrap()[0] = 10;
        assert!(!a.shares_storage_with(&b));
        assert_eq!(a.to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(b.to_vec(), vec![10, 2, 3, 4]);
    }

    #[test]
    fn test_contiguous_prefix_slice() {
        // A leading-row slice is contiguous but addresses only a prefix of the buffer.
        let t = DenseND::from_vec((0..9).collect::<Vec<i32>>(), &[3, 3]).unwrap();
        let head = t.slice_axis(0, 0..1).unwrap();
        assert!(head.is_contiguous());
        assert_eq!(head.as_slice(), Some(&[0, 1, 2][..]));
    }
}
