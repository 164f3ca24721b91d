//! Property-based tests for layouts and dense tensor operations
//!
//! This module uses proptest to check the view and broadcasting laws over
//! randomly generated shapes and permutations.

#[cfg(test)]
mod tests {
    use crate::layout::{ravel_index, row_major_strides, unravel_index};
    use crate::{broadcast_shape, DenseND, StridedLayout, TensorExpression};
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    // Strategy for generating valid tensor shapes (1-4D, small sizes)
    fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(1usize..5, 1..=4)
    }

    fn ramp(shape: &[usize]) -> DenseND<i64> {
        let len: usize = shape.iter().product();
        DenseND::from_vec((0..len as i64).collect(), shape).unwrap()
    }

    // A shape together with a random permutation of its axes
    fn shape_and_permutation() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        shape_strategy().prop_flat_map(|shape| {
            let axes: Vec<usize> = (0..shape.len()).collect();
            (Just(shape), Just(axes).prop_shuffle())
        })
    }

    fn hash_of(t: &DenseND<i64>) -> u64 {
        let mut h = DefaultHasher::new();
        t.hash(&mut h);
        h.finish()
    }

    proptest! {
        #[test]
        fn prop_row_major_stride_law(shape in shape_strategy()) {
            let strides = row_major_strides(&shape);
            prop_assert_eq!(strides[shape.len() - 1], 1);
            for i in 0..shape.len() - 1 {
                prop_assert_eq!(strides[i], strides[i + 1] * shape[i + 1]);
            }
        }

        #[test]
        fn prop_ravel_unravel_inverse(shape in shape_strategy(), seed in any::<usize>()) {
            let len: usize = shape.iter().product();
            let linear = seed % len;
            let index = unravel_index(&shape, linear);
            prop_assert_eq!(ravel_index(&shape, &index), linear);
        }

        #[test]
        fn prop_contiguous_layout_is_identity(shape in shape_strategy()) {
            let layout = StridedLayout::contiguous(&shape);
            prop_assert!(layout.is_contiguous());
            for linear in 0..layout.len() {
                prop_assert_eq!(layout.linear_to_storage(linear), linear);
            }
        }

        #[test]
        fn prop_permuted_view_is_transparent((shape, axes) in shape_and_permutation()) {
            let t = ramp(&shape);
            let view = t.permute(&axes).unwrap();
            let copy = view.to_contiguous();
            prop_assert!(view.shares_storage_with(&t));

            let len = view.len();
            for linear in 0..len {
                let index = unravel_index(view.shape(), linear);
                let source: Vec<usize> = {
                    let mut source = vec![0; shape.len()];
                    for (i, &axis) in axes.iter().enumerate() {
                        source[axis] = index[i];
                    }
                    source
                };
                prop_assert_eq!(view[&index[..]], t[&source[..]]);
                prop_assert_eq!(copy.get_linear(linear), view.get_linear(linear));
            }
        }

        #[test]
        fn prop_reshape_requires_contiguity((shape, axes) in shape_and_permutation()) {
            let t = ramp(&shape);
            let flat = [t.len()];
            prop_assert!(t.reshape(&flat).is_ok());

            let view = t.permute(&axes).unwrap();
            prop_assert_eq!(view.reshape(&flat).is_ok(), view.is_contiguous());
            prop_assert!(view.to_contiguous().reshape(&flat).is_ok());
        }

        #[test]
        fn prop_transpose_twice_is_identity(rows in 1usize..6, cols in 1usize..6) {
            let t = ramp(&[rows, cols]);
            let back = t.transpose().unwrap().transpose().unwrap();
            prop_assert!(back.is_contiguous());
            prop_assert_eq!(&back, &t);
            prop_assert_eq!(back.strides(), t.strides());
        }

        #[test]
        fn prop_equal_tensors_hash_equal((shape, axes) in shape_and_permutation()) {
            let view = ramp(&shape).permute(&axes).unwrap();
            let copy = view.to_contiguous();
            prop_assert_eq!(&view, &copy);
            prop_assert_eq!(hash_of(&view), hash_of(&copy));
        }

        #[test]
        fn prop_slice_reads_parent(shape in shape_strategy(), axis_seed in any::<usize>(), cut in any::<usize>()) {
            let t = ramp(&shape);
            let axis = axis_seed % shape.len();
            let start = cut % shape[axis];
            let slice = t.slice_axis(axis, start..shape[axis]).unwrap();
            for linear in 0..slice.len() {
                let mut index = unravel_index(slice.shape(), linear);
                let value = slice[&index[..]];
                index[axis] += start;
                prop_assert_eq!(value, t[&index[..]]);
            }
        }

        #[test]
        fn prop_lazy_over_slice_matches_eager(
            (shape, axes) in shape_and_permutation(),
            axis_seed in any::<usize>(),
            lo in any::<usize>(),
            hi in any::<usize>(),
        ) {
            let t = ramp(&shape);
            let view = t.permute(&axes).unwrap();
            let axis = axis_seed % shape.len();
            let extent = view.shape()[axis];
            let (a, b) = (lo % extent, hi % extent);
            let slice = view.slice_axis(axis, a.min(b)..a.max(b) + 1).unwrap();
            let other = ramp(slice.shape());

            let lazy = ((slice.lazy() + other.lazy()) * slice.lazy()).evaluate();
            let eager = &(&slice + &other) * &slice;
            prop_assert!(lazy.is_contiguous());
            prop_assert_eq!(lazy.to_vec(), eager.to_vec());
        }

        #[test]
        fn prop_lazy_over_broadcast_matches_eager(
            shape in prop::collection::vec(1usize..4, 1..=3),
            mask in prop::collection::vec(any::<bool>(), 3),
        ) {
            let collapsed: Vec<usize> = shape
                .iter()
                .zip(&mask)
                .map(|(&n, &keep)| if keep { n } else { 1 })
                .collect();
            let source = ramp(&collapsed);
            let wide = source.broadcast_to(&shape).unwrap();
            let full = ramp(&shape);

            let lazy = (wide.lazy() - full.lazy()).evaluate();
            prop_assert_eq!(lazy, &source - &full);
        }

        #[test]
        fn prop_broadcast_shape_commutes(
            a in prop::collection::vec(prop::sample::select(vec![1usize, 3]), 0..4),
            b in prop::collection::vec(prop::sample::select(vec![1usize, 3]), 0..4),
        ) {
            let ab = broadcast_shape(&a, &b).unwrap();
            let ba = broadcast_shape(&b, &a).unwrap();
            prop_assert_eq!(&ab, &ba);
            prop_assert_eq!(ab.len(), a.len().max(b.len()));
        }

        #[test]
        fn prop_broadcast_add_matches_definition(
            a_shape in prop::collection::vec(prop::sample::select(vec![1usize, 2, 3]), 1..4),
            b_mask in prop::collection::vec(any::<bool>(), 1..4),
        ) {
            // Derive a compatible rhs by collapsing some trailing axes of lhs to 1.
            let offset = a_shape.len().saturating_sub(b_mask.len());
            let b_shape: Vec<usize> = a_shape[offset..]
                .iter()
                .zip(&b_mask)
                .map(|(&n, &keep)| if keep { n } else { 1 })
                .collect();
            let a = ramp(&a_shape);
            let b = ramp(&b_shape);

            let sum = &a + &b;
            prop_assert_eq!(sum.shape(), a.shape());
            for linear in 0..sum.len() {
                let index = unravel_index(sum.shape(), linear);
                let pad = index.len() - b_shape.len();
                let b_index: Vec<usize> = b_shape
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| if n == 1 { 0 } else { index[pad + i] })
                    .collect();
                prop_assert_eq!(sum[&index[..]], a[&index[..]] + b[&b_index[..]]);
            }
            prop_assert_eq!(&b + &a, sum);
        }

        #[test]
        fn prop_sum_axis_preserves_total(shape in shape_strategy(), axis_seed in any::<usize>()) {
            let t = ramp(&shape);
            let axis = axis_seed % shape.len();
            let reduced = t.sum_axis(axis).unwrap();
            prop_assert_eq!(reduced.rank(), shape.len() - 1);
            prop_assert_eq!(reduced.sum(), t.sum());
        }
    }
}
