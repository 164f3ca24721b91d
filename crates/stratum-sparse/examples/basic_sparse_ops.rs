//! Basic Sparse Matrix Operations Example
//!
//! This example demonstrates fundamental sparse operations including:
//! - Building a COO tensor from unsorted entries with duplicates
//! - Converting between COO, CSR and dense
//! - Sparse matrix-vector multiplication (SpMV)
//! - Sparse matrix-matrix multiplication (SpMM and SpSpMM)
//! - Merge arithmetic and reductions
//!
//! Run with: cargo run --example basic_sparse_ops

use stratum_core::DenseND;
use stratum_sparse::{CooTensor, CsrMatrix};

fn main() -> anyhow::Result<()> {
    println!("=== Stratum Sparse: Basic Operations Example ===\n");

    // 1. Create a sparse matrix using COO format
    println!("1. Creating a 5x5 sparse matrix from unsorted entries...");
    let entries = vec![
        (vec![2, 3], 6.0),
        (vec![0, 0], 5.0),
        (vec![4, 2], 4.0),
        (vec![0, 2], 3.0),
        (vec![1, 1], 8.0),
        (vec![2, 0], 2.0),
        (vec![3, 4], 1.0),
        (vec![0, 0], 1.0), // duplicate of (0, 0), summed
    ];
    let coo = CooTensor::from_entries(entries, vec![5, 5])?;
    println!(
        "   COO tensor: {} stored entries, density: {:.1}%",
        coo.nnz(),
        coo.density() * 100.0
    );
    println!("   (0, 0) = {:?}\n", coo.get(&[0, 0]));

    // 2. Convert to CSR for efficient row operations
    println!("2. Converting to CSR format...");
    let csr = CsrMatrix::from_coo(&coo)?;
    println!("   row_ptr:     {:?}", csr.row_ptr());
    println!("   col_indices: {:?}\n", csr.col_indices());

    // 3. SpMV
    println!("3. Sparse matrix-vector product...");
    let x = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0], &[5])?;
    let y = csr.spmv(&x)?;
    println!("   A * x = {:?}\n", y.to_vec());

    // 4. SpMM against a dense matrix
    println!("4. Sparse x dense matrix product...");
    let b = DenseND::from_shape_fn(&[5, 2], |idx| (idx[0] + idx[1]) as f64);
    let c = csr.spmm(&b)?;
    println!("   A * B shape {:?}, sum {}\n", c.shape(), c.sum());

    // 5. SpSpMM
    println!("5. Sparse x sparse product (A * A^T)...");
    let gram = csr.spspmm(&csr.transpose())?;
    println!("   result: {} stored entries in a {:?} matrix\n", gram.nnz(), gram.shape());

    // 6. Element-wise arithmetic keeps results sparse
    println!("6. Element-wise arithmetic...");
    let doubled = &csr * 2.0;
    let diff = &doubled - &csr;
    println!("   (2A - A) == A: {}", diff == csr);
    println!("   A ⊙ A stored entries: {}\n", (&csr * &csr).nnz());

    // 7. Reductions count implicit zeros
    println!("7. Reductions...");
    println!("   sum = {}, mean = {}", csr.sum(), csr.mean());
    println!("   row sums    = {:?}", csr.sum_axis(1)?.to_vec());
    println!("   column means = {:?}", csr.mean_axis(0)?.to_vec());

    // 8. Round trip through dense
    let dense = csr.to_dense();
    let back = CooTensor::from_dense(&dense);
    println!("\n8. Dense round trip preserves entries: {}", back == coo);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
