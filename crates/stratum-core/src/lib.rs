//! # stratum-core
//!
//! Dense strided tensors for the Stratum stack.
//!
//! This crate provides the foundational building blocks that the sparse
//! formats in `stratum-sparse` convert to and from:
//!
//! - **Strided layouts** ([`StridedLayout`]) mapping logical indices to
//!   buffer positions through shape, strides and an offset
//! - **Dense tensors** ([`DenseND`]) over a shared, reference-counted buffer
//! - **Zero-copy views**: permute, transpose, slice, reshape and broadcast
//! - **Element-wise arithmetic** with NumPy-style broadcasting, reductions,
//!   `dot` and `matmul`
//! - **Lazy expressions** ([`TensorExpression`]) fusing element-wise chains
//!   into a single pass
//! - **Bulk backends** ([`BulkOps`]) for contiguous float buffers
//!
//! ## Memory Layout
//!
//! Fresh tensors are C-contiguous (row-major) from offset zero. Views reuse
//! the parent's buffer with different strides. Writing through a tensor
//! whose buffer is shared first gives it a private copy, so a write never
//! changes another tensor.
//!
//! ## Quick Start
//!
//! ```
//! use stratum_core::DenseND;
//!
//! let m = DenseND::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
//! let t = m.transpose().unwrap();
//! assert_eq!(t.shape(), &[3, 2]);
//! assert!(!t.is_contiguous());
//! assert_eq!(t[&[1, 0]], 2);
//! assert_eq!(t.to_vec(), vec![1, 4, 2, 5, 3, 6]);
//! ```
//!
//! ## Broadcasting
//!
//! ```
//! use stratum_core::DenseND;
//!
//! let col = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[3, 1]).unwrap();
//! let row = DenseND::from_vec(vec![10.0, 20.0, 30.0, 40.0], &[1, 4]).unwrap();
//! let grid = &col * &row;
//! assert_eq!(grid.shape(), &[3, 4]);
//! assert_eq!(grid[&[2, 3]], 120.0);
//! ```
//!
//! ## Error Handling
//!
//! Named operations return `anyhow::Result`; the underlying cause is a
//! [`LayoutError`]. Arithmetic operators (`+`, `-`, `*`, `/`) panic on
//! incompatible shapes, the checked forms are `try_add` and friends:
//!
//! ```
//! use stratum_core::DenseND;
//!
//! let tensor = DenseND::<f64>::zeros(&[2, 3]);
//! assert!(tensor.reshape(&[7]).is_err());
//! assert!(tensor.try_add(&DenseND::zeros(&[4])).is_err());
//! ```
//!
//! ## Features
//!
//! - `parallel`: multi-threaded float backend via `scirs2_core::parallel_ops`
//! - `serde`: serialization of dense tensors as shape plus row-major data

pub mod backend;
pub mod dense;
pub mod expr;
pub mod layout;
pub mod ops;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use backend::{BulkOps, ScalarOps, PARALLEL_THRESHOLD};
pub use dense::{DenseND, StridedIter};
pub use expr::{BinaryExpr, LazyTensor, TensorExpression, UnaryExpr};
pub use layout::{
    broadcast_shape, ravel_index, row_major_strides, unravel_index, LayoutError, StridedLayout,
};
pub use ops::BinaryOp;
pub use types::{count_as, Axis, Element, Rank, Shape};

#[cfg(feature = "parallel")]
pub use backend::ParallelOps;
