//! Integration tests for stratum-sparse
//!
//! These tests move data between dense tensors, COO and CSR and check
//! arithmetic, products and reductions across the formats.

use stratum_core::DenseND;
use stratum_sparse::{CooError, CooTensor, CsrError, CsrMatrix, SparseOps};

#[test]
fn test_diagonal_hadamard() {
    let a = CsrMatrix::new(vec![0, 1, 2], vec![0, 1], vec![1, 2], (2, 2)).unwrap();
    let b = CsrMatrix::new(vec![0, 1, 2], vec![0, 1], vec![3, 4], (2, 2)).unwrap();

    let product = &a * &b;
    assert_eq!(product.values(), &[3, 8]);
    assert_eq!(product.col_indices(), &[0, 1]);
    assert_eq!(product.row_ptr(), &[0, 1, 2]);
}

#[test]
fn test_mean_counts_unstored_elements() {
    let coo = CooTensor::new(vec![vec![0, 1, 2]], vec![1.0, 2.0, 3.0], vec![4]).unwrap();
    assert_eq!(coo.sum(), 6.0);
    assert_eq!(coo.mean(), 1.5);
}

#[test]
fn test_mean_of_length_five_vector() {
    let coo = CooTensor::new(vec![vec![0, 2, 3]], vec![1.0, 2.0, 3.0], vec![5]).unwrap();
    assert_eq!(coo.nnz(), 3);
    assert_eq!(coo.sum(), 6.0);
    assert_eq!(coo.mean(), 6.0 / 5.0);
    assert_ne!(coo.mean(), coo.sum() / coo.nnz() as f64);
    assert_eq!(coo.to_dense().to_vec(), vec![1.0, 0.0, 2.0, 3.0, 0.0]);
    assert_eq!(coo.to_dense().mean(), coo.mean());
}

#[test]
fn test_spspmm_keeps_cancelled_entry() {
    let a = CsrMatrix::new(vec![0, 2], vec![0, 1], vec![1.0, -1.0], (1, 2)).unwrap();
    let b = CsrMatrix::new(vec![0, 1, 2], vec![0, 0], vec![3.0, 3.0], (2, 1)).unwrap();

    let c = a.spspmm(&b).unwrap();
    assert_eq!(c.shape(), (1, 1));
    assert_eq!(c.nnz(), 1);
    assert_eq!(c.get(0, 0), Some(&0.0));
}

#[test]
fn test_explicit_zeros_survive_conversions() {
    let coo = CooTensor::new(vec![vec![0, 1], vec![1, 0]], vec![0.0, 5.0], vec![2, 2]).unwrap();
    assert_eq!(coo.nnz(), 2);

    let csr = CsrMatrix::from_coo(&coo).unwrap();
    assert_eq!(csr.get(0, 1), Some(&0.0));
    assert_eq!(csr.to_coo().nnz(), 2);

    // Only a dense round trip drops them.
    let dense_back = CooTensor::from_dense(&coo.to_dense());
    assert_eq!(dense_back.nnz(), 1);
}

#[test]
fn test_from_strided_dense_view() {
    let dense = DenseND::from_rows(vec![vec![0, 1, 0], vec![2, 0, 3]]).unwrap();
    let transposed = dense.transpose().unwrap();

    let csr = CsrMatrix::from_dense(&transposed).unwrap();
    assert_eq!(csr.shape(), (3, 2));
    assert_eq!(csr.to_dense(), transposed);
    assert_eq!(csr.row_ptr(), &[0, 1, 2, 3]);
    assert_eq!(csr.col_indices(), &[1, 0, 1]);
}

#[test]
fn test_products_against_dense() {
    let dense = DenseND::from_rows(vec![
        vec![1.0, 0.0, 0.0, 2.0],
        vec![0.0, 0.0, 3.0, 0.0],
        vec![4.0, 5.0, 0.0, 0.0],
    ])
    .unwrap();
    let csr = CsrMatrix::from_dense(&dense).unwrap();

    let x = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[4]).unwrap();
    assert_eq!(csr.spmv(&x).unwrap().to_vec(), vec![9.0, 9.0, 14.0]);

    let b = DenseND::from_vec((0..8).map(|v| v as f64).collect(), &[4, 2]).unwrap();
    assert_eq!(csr.spmm(&b).unwrap(), dense.matmul(&b).unwrap());

    let gram = csr.spspmm(&csr.transpose()).unwrap();
    assert_eq!(gram.to_dense(), dense.matmul(&dense.transpose().unwrap()).unwrap());
}

#[test]
fn test_errors_are_typed() {
    let err = CooTensor::new(vec![vec![0, 4]], vec![1, 2], vec![4]).unwrap_err();
    assert!(matches!(err, CooError::IndexOutOfBounds { .. }));

    let a = CsrMatrix::<i32>::zeros((2, 3));
    let x = DenseND::from_vec(vec![1, 2], &[2]).unwrap();
    assert!(matches!(a.spmv(&x), Err(CsrError::ShapeMismatch { vec_len: 2, .. })));
    assert!(matches!(
        a.try_add(&CsrMatrix::zeros((3, 2))),
        Err(CsrError::OperandShapes { op: "add", .. })
    ));

    let cube = CooTensor::<i32>::zeros(vec![2, 2, 2]);
    assert!(matches!(
        CsrMatrix::from_coo(&cube),
        Err(CsrError::RankRequired { expected: 2, .. })
    ));
}

#[test]
fn test_generic_over_formats() {
    fn fill_ratio<S: SparseOps<f64>>(s: &S) -> f64 {
        s.density()
    }

    let coo = CooTensor::from_entries(vec![(vec![0, 0], 1.0), (vec![1, 1], 2.0)], vec![2, 4]).unwrap();
    let csr = CsrMatrix::from_coo(&coo).unwrap();
    assert_eq!(fill_ratio(&coo), 0.25);
    assert_eq!(fill_ratio(&csr), 0.25);
}

#[test]
fn test_three_way_tensor_reductions() {
    let coo = CooTensor::from_entries(
        vec![(vec![0, 1, 1], 2.0), (vec![1, 0, 1], 4.0), (vec![1, 1, 0], 6.0)],
        vec![2, 2, 2],
    )
    .unwrap();
    let dense = coo.to_dense();
    for axis in 0..3 {
        assert_eq!(coo.mean_axis(axis).unwrap(), dense.mean_axis(axis).unwrap());
    }
    assert_eq!(coo.mean(), 1.5);
}
