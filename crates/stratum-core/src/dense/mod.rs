//! Dense tensor implementation and operations
//!
//! `DenseND` is split into functional sub-modules: construction, element
//! access, zero-copy views, element-wise arithmetic, reductions and
//! products.

// Core type definition
pub mod types;

// Operation modules (organized by functionality)
mod algebra;
mod creation;
mod elementwise;
mod indexing;
pub mod iter;
mod shape_ops;
mod statistics;

// Supporting modules
pub mod densend_traits;
pub(crate) mod functions;

pub use iter::StridedIter;
pub use types::DenseND;
