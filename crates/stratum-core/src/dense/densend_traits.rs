//! # DenseND - Trait Implementations
//!
//! ## Implemented Traits
//!
//! - `Index` / `IndexMut`
//! - `PartialEq` / `Eq` / `Hash` (logical contents, not layout)
//! - `Debug`
//! - `From<ArrayD<T>>`
//! - `Serialize` / `Deserialize` with the `serde` feature

use super::types::DenseND;
use scirs2_core::ndarray_ext::{Array, ArrayD, IxDyn};
use std::fmt;
use std::hash::{Hash, Hasher};

impl<T> std::ops::Index<&[usize]> for DenseND<T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &Self::Output {
        self.get(index).unwrap_or_else(|| {
            panic!(
                "index {:?} out of bounds for shape {:?}",
                index,
                self.shape()
            )
        })
    }
}

impl<T: Clone> std::ops::IndexMut<&[usize]> for DenseND<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut Self::Output {
        if self.layout.checked_storage_index(index).is_none() {
            panic!(
                "index {:?} out of bounds for shape {:?}",
                index,
                self.shape()
            );
        }
        self.make_unique();
        let position = self.layout.storage_index(index);
        &mut self.buffer_mut()[position]
    }
}

/// Equal when shapes match and the logical elements match in row-major
/// order. Strides, offsets and buffer sharing are ignored.
impl<T: PartialEq> PartialEq for DenseND<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other) && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DenseND<T> {}

/// Hashes the shape followed by the logical elements, so a view and its
/// contiguous copy hash alike.
impl<T: Hash> Hash for DenseND<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shape().hash(state);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DenseND<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseND")
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("offset", &self.offset())
            .field("data", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Clone> From<ArrayD<T>> for DenseND<T> {
    fn from(array: ArrayD<T>) -> Self {
        let shape = array.shape().to_vec();
        let data = array.iter().cloned().collect();
        Self::from_parts(data, &shape)
    }
}

impl<T: Clone> DenseND<T> {
    /// Copy into a `scirs2_core` dynamic-rank array.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_core::DenseND;
    ///
    /// let t = DenseND::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    /// let arr = t.transpose().unwrap().to_ndarray().unwrap();
    /// assert_eq!(arr.shape(), &[3, 2]);
    /// assert_eq!(arr[[0, 1]], 4);
    /// assert_eq!(DenseND::from(arr), t.transpose().unwrap());
    /// ```
    pub fn to_ndarray(&self) -> anyhow::Result<ArrayD<T>> {
        Ok(Array::from_shape_vec(IxDyn(self.shape()), self.to_vec())?)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DenseND;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct DenseRepr<T> {
        shape: Vec<usize>,
        data: Vec<T>,
    }

    impl<T: Clone + Serialize> Serialize for DenseND<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            DenseRepr {
                shape: self.shape().to_vec(),
                data: self.to_vec(),
            }
            .serialize(serializer)
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for DenseND<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = DenseRepr::<T>::deserialize(deserializer)?;
            DenseND::from_vec(repr.data, &repr.shape).map_err(serde::de::Error::custom)
        }
    }
}
