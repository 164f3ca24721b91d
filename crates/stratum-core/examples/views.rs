//! Strided views and shape operations.
//!
//! This example demonstrates:
//! - Zero-copy transpose, permute, slice and broadcast views
//! - Reshape and its contiguity requirement
//! - Copy-on-write when writing through a view
//! - Fused lazy evaluation over views
//!
//! Run with:
//! ```bash
//! cargo run --example views
//! ```

use stratum_core::{broadcast_shape, DenseND, TensorExpression};

fn main() -> anyhow::Result<()> {
    println!("=== Stratum Core: Views and Shape Operations ===\n");

    example_views()?;
    example_reshape()?;
    example_copy_on_write()?;
    example_broadcast_and_lazy()?;

    println!("\n=== All examples completed successfully! ===");
    Ok(())
}

fn example_views() -> anyhow::Result<()> {
    println!("--- Example 1: Zero-Copy Views ---");

    let m = DenseND::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]])?;
    let t = m.transpose()?;
    println!("  original   {:?} strides {:?}", m.shape(), m.strides());
    println!("  transposed {:?} strides {:?}", t.shape(), t.strides());
    println!("  transposed elements: {:?}", t.to_vec());
    println!("  shares storage: {}", t.shares_storage_with(&m));

    let cube = DenseND::from_vec((0..24).collect::<Vec<i32>>(), &[2, 3, 4])?;
    let permuted = cube.permute(&[2, 0, 1])?;
    println!("  permuted [2,3,4] -> {:?}, [3,1,2] = {}", permuted.shape(), permuted[&[3, 1, 2]]);

    let middle = cube.slice_axis(1, 1..2)?;
    println!("  slice axis 1, 1..2 -> {:?}, offset {}", middle.shape(), middle.offset());
    println!();
    Ok(())
}

fn example_reshape() -> anyhow::Result<()> {
    println!("--- Example 2: Reshape ---");

    let v = DenseND::<f64>::ones(&[24]);
    let r = v.reshape(&[2, 3, 4])?;
    println!("  [24] -> {:?}, contiguous: {}", r.shape(), r.is_contiguous());

    let t = r.reshape(&[6, 4])?.transpose()?;
    match t.reshape(&[24]) {
        Ok(_) => println!("  unexpected: reshape of a transposed view succeeded"),
        Err(err) => println!("  reshape of a transposed view fails: {}", err),
    }
    let packed = t.to_contiguous().reshape(&[24])?;
    println!("  after to_contiguous: {:?}", packed.shape());
    println!();
    Ok(())
}

fn example_copy_on_write() -> anyhow::Result<()> {
    println!("--- Example 3: Copy-on-Write ---");

    let parent = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2])?;
    let mut column = parent.slice_axis(1, 0..1)?;
    column.set(&[1, 0], 30.0);
    println!("  view after write:   {:?}", column.to_vec());
    println!("  parent after write: {:?}", parent.to_vec());
    println!();
    Ok(())
}

fn example_broadcast_and_lazy() -> anyhow::Result<()> {
    println!("--- Example 4: Broadcasting and Lazy Evaluation ---");

    println!("  broadcast_shape([3,1], [1,4]) = {:?}", broadcast_shape(&[3, 1], &[1, 4])?.as_slice());
    println!("  broadcast_shape([3], [4]) = {:?}", broadcast_shape(&[3], &[4]));

    let col = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[3, 1])?;
    let row = DenseND::from_vec(vec![10.0, 20.0], &[1, 2])?;
    let grid = &col * &row;
    println!("  [3,1] * [1,2] -> {:?}: {:?}", grid.shape(), grid.to_vec());

    let a = grid.transpose()?;
    let b = DenseND::<f64>::ones(&[2, 3]);
    let fused = (a.lazy() - b.lazy()) * a.lazy();
    println!("  lazy (a - 1) * a over a transposed view: {:?}", fused.evaluate().to_vec());
    Ok(())
}
