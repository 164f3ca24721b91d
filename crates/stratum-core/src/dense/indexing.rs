//! Element access by multi-index and by logical linear index.

use super::types::DenseND;

impl<T> DenseND<T> {
    /// Get an element by index without panicking
    ///
    /// # Returns
    ///
    /// Some reference to the element if the index is valid, None otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// assert_eq!(tensor.get(&[0, 1]), Some(&2.0));
    /// assert_eq!(tensor.get(&[5, 5]), None);
    /// assert_eq!(tensor.transpose().unwrap().get(&[0, 1]), Some(&3.0));
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        let position = self.layout.checked_storage_index(index)?;
        self.storage.get(position)
    }

    /// Element at a row-major logical position.
    ///
    /// O(1) for contiguous tensors, O(rank) otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let m = DenseND::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    /// let t = m.transpose().unwrap();
    /// assert_eq!(t.get_linear(1), Some(&4));
    /// assert_eq!(t.get_linear(6), None);
    /// ```
    pub fn get_linear(&self, linear: usize) -> Option<&T> {
        let position = self.layout.checked_linear_to_storage(linear)?;
        self.storage.get(position)
    }
}

impl<T: Clone> DenseND<T> {
    /// Get a mutable reference to an element by index without panicking
    ///
    /// Returns `None` for an invalid index. If the buffer is shared with
    /// another tensor, this tensor first takes a private copy.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is a broadcast view.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let mut tensor = DenseND::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// if let Some(elem) = tensor.get_mut(&[0, 1]) {
    ///     *elem = 10.0;
    /// }
    /// assert_eq!(tensor[&[0, 1]], 10.0);
    /// ```
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        self.layout.checked_storage_index(index)?;
        self.make_unique();
        let position = self.layout.storage_index(index);
        self.buffer_mut().get_mut(position)
    }

    /// Mutable element at a row-major logical position.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is a broadcast view.
    pub fn get_linear_mut(&mut self, linear: usize) -> Option<&mut T> {
        self.layout.checked_linear_to_storage(linear)?;
        self.make_unique();
        let position = self.layout.linear_to_storage(linear);
        self.buffer_mut().get_mut(position)
    }

    /// Overwrite one element.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range or the tensor is a broadcast view.
    pub fn set(&mut self, index: &[usize], value: T) {
        let shape = self.shape().to_vec();
        match self.get_mut(index) {
            Some(slot) => *slot = value,
            None => panic!("index {index:?} out of bounds for shape {shape:?}"),
        }
    }

    /// Overwrite the element at a row-major logical position.
    ///
    /// # Panics
    ///
    /// Panics if `linear >= len()` or the tensor is a broadcast view.
    pub fn set_linear(&mut self, linear: usize, value: T) {
        let len = self.len();
        match self.get_linear_mut(linear) {
            Some(slot) => *slot = value,
            None => panic!("linear index {linear} out of bounds for {len} elements"),
        }
    }
}
