//! Argument checks and output sizing shared by the entry points.

use convolver_shape::{Index, Shape};

use crate::{ConvolverError, Result, MAX_POOL_FACTOR};

pub(crate) fn ensure_same_rank(a: &[usize], b: &[usize]) -> Result<()> {
    if a.len() != b.len() {
        return Err(ConvolverError::RankMismatch(a.len(), b.len()));
    }
    Ok(())
}

pub(crate) fn ensure_same_shape(expected: &[usize], got: &[usize]) -> Result<()> {
    ensure_same_rank(expected, got)?;
    if expected != got {
        return Err(ConvolverError::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        });
    }
    Ok(())
}

/// Every `inner[d] <= outer[d]`, reported as a kernel larger than its signal.
pub(crate) fn ensure_fits(outer: &[usize], inner: &[usize]) -> Result<()> {
    ensure_same_rank(outer, inner)?;
    for (axis, (&signal, &kernel)) in outer.iter().zip(inner.iter()).enumerate() {
        if kernel > signal {
            return Err(ConvolverError::KernelTooLarge {
                axis,
                signal,
                kernel,
            });
        }
    }
    Ok(())
}

pub(crate) fn ensure_factor(name: &'static str, value: usize) -> Result<()> {
    if value == 0 || value > MAX_POOL_FACTOR {
        return Err(ConvolverError::InvalidFactor { name, value });
    }
    Ok(())
}

/// Shape produced by a valid-mode convolution: `input[d] - kernel[d] + 1`.
///
/// Ranks must match exactly and the kernel may not exceed the input on any axis.
pub fn convolve_output_shape(input: &[usize], kernel: &[usize]) -> Result<Shape> {
    ensure_fits(input, kernel)?;
    let dims: Index = input
        .iter()
        .zip(kernel.iter())
        .map(|(&i, &k)| i - k + 1)
        .collect();
    Ok(Shape::new(&dims)?)
}

/// Shape produced by max-pooling with `tile_by`: `ceil(input[d] / tile_by)`.
pub fn max_pool_output_shape(input: &[usize], tile_by: usize) -> Result<Shape> {
    ensure_factor("tile_by", tile_by)?;
    let dims: Index = input.iter().map(|&i| i.div_ceil(tile_by)).collect();
    Ok(Shape::new(&dims)?)
}

/// Default repositioning shift: half of each kernel extent, rounded down.
pub fn kernel_shift(src: &[usize]) -> Index {
    src.iter().map(|&s| s >> 1).collect()
}
