//! # stratum-sparse
//!
//! Sparse tensor formats and operations for Stratum.
//!
//! This crate provides:
//! - COO (Coordinate) format for tensors of any rank, kept in canonical
//!   (sorted, duplicate-free) order
//! - CSR (Compressed Sparse Row) format for matrices
//! - Conversions between COO, CSR and [`DenseND`](stratum_core::DenseND)
//! - Element-wise merge arithmetic, SpMV, SpMM and SpSpMM (SpGEMM)
//! - Global and per-axis reductions
//!
//! Explicit zeros are stored entries like any other: they survive
//! construction, arithmetic and products, and count towards `nnz`.
//!
//! ## Quick Start
//!
//! ```
//! use stratum_core::DenseND;
//! use stratum_sparse::{CooTensor, CsrMatrix};
//!
//! // Duplicates are summed during construction.
//! let coo = CooTensor::new(
//!     vec![vec![1, 0, 1], vec![2, 1, 2]],
//!     vec![1.0, 4.0, 2.0],
//!     vec![2, 3],
//! )
//! .unwrap();
//! assert_eq!(coo.nnz(), 2);
//!
//! let csr = CsrMatrix::from_coo(&coo).unwrap();
//! let x = DenseND::from_vec(vec![1.0, 1.0, 1.0], &[3]).unwrap();
//! assert_eq!(csr.spmv(&x).unwrap().to_vec(), vec![4.0, 3.0]);
//! ```
//!
//! ## Error Handling
//!
//! Each format has its own error enum ([`CooError`], [`CsrError`]) built
//! with `thiserror`. Failures from dense construction arrive as
//! `anyhow::Error` and are wrapped transparently. Operators panic on shape
//! mismatch; the `try_*` methods return the error.
//!
//! ## Features
//!
//! - `parallel`: row-parallel SpMV and the parallel dense backend
//! - `serde`: serialization of both formats; deserialization re-validates

pub mod coo;
pub mod csr;
pub mod ops;
pub mod reductions;

// Re-exports
pub use coo::*;
pub use csr::*;
pub use ops::SparseOps;
