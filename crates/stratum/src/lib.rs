//! # Stratum - dense and sparse tensor numerics
//!
//! This is the **meta crate** that re-exports the Stratum components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use stratum::prelude::*;
//!
//! let m = DenseND::from_vec(vec![1.0, 0.0, 0.0, 2.0, 3.0, 0.0], &[2, 3])?;
//! let csr = CsrMatrix::from_dense(&m)?;
//! assert_eq!(csr.nnz(), 3);
//!
//! let x = DenseND::from_vec(vec![1.0, 1.0, 1.0], &[3])?;
//! let dense_result = m.matmul(&x.reshape(&[3, 1])?)?;
//! assert_eq!(csr.spmv(&x)?, dense_result.reshape(&[2])?);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Dense Tensors ([`core`])
//!
//! Strided layouts, zero-copy views, broadcasting arithmetic, reductions,
//! `dot`/`matmul` and lazy expressions.
//!
//! ```
//! use stratum::core::{DenseND, TensorExpression};
//!
//! let a = DenseND::<f64>::ones(&[2, 3]);
//! let b = a.transpose().unwrap();
//! assert_eq!(b.shape(), &[3, 2]);
//!
//! let fused = (a.lazy() + a.lazy()) * a.lazy();
//! assert_eq!(fused.evaluate().sum(), 12.0);
//! ```
//!
//! ### Sparse Tensors ([`sparse`])
//!
//! COO tensors of any rank and CSR matrices, with merge arithmetic, SpMV,
//! SpMM and SpSpMM.
//!
//! ```
//! use stratum::sparse::CooTensor;
//!
//! let indices = vec![vec![0, 1], vec![0, 1]];
//! let coo = CooTensor::new(indices, vec![1.0, 2.0], vec![2, 2]).unwrap();
//! assert_eq!(coo.nnz(), 2);
//! assert_eq!(coo.mean(), 0.75);
//! ```
//!
//! ## Features
//!
//! - `parallel`: multi-threaded dense backend and row-parallel SpMV
//! - `serde`: serialization for dense and sparse tensors

pub use stratum_core as core;
pub use stratum_sparse as sparse;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use stratum::prelude::*;
    //!
    //! let tensor = DenseND::<f64>::zeros(&[10, 20, 30]);
    //! assert_eq!(tensor.len(), 6000);
    //! ```

    // Dense types
    pub use crate::core::{BinaryOp, DenseND, Element, LayoutError, StridedLayout};

    // Lazy expressions
    pub use crate::core::{LazyTensor, TensorExpression};

    // Sparse types
    pub use crate::sparse::{CooError, CooTensor, CsrError, CsrMatrix, SparseOps};
}
