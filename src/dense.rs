//! Fully-connected layer: row-wise dot products, then threshold and ReLU.

use convolver_shape::ShapeError;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{simd, ConvolverError, Result};

#[cfg(feature = "parallel")]
use crate::threading;

fn check_buffers(out: &[f32], input: &[f32], weights: &[f32], thresholds: &[f32]) -> Result<()> {
    if thresholds.len() != out.len() {
        return Err(ConvolverError::BufferLength {
            expected: out.len(),
            got: thresholds.len(),
        });
    }
    let expected = input
        .len()
        .checked_mul(out.len())
        .ok_or_else(|| ShapeError::SizeOverflow(vec![input.len(), out.len()]))?;
    if weights.len() != expected {
        return Err(ConvolverError::BufferLength {
            expected,
            got: weights.len(),
        });
    }
    Ok(())
}

/// Raw activations `out[o] = dot(input, weights[o * in_size..][..in_size])`.
fn activations(out: &mut [f32], input: &[f32], weights: &[f32]) {
    let in_size = input.len();
    if in_size == 0 {
        out.fill(0.0);
        return;
    }

    #[cfg(feature = "parallel")]
    {
        if threading::should_split(out.len(), in_size) {
            out.par_iter_mut()
                .zip(weights.par_chunks_exact(in_size))
                .for_each(|(slot, row)| *slot = simd::dot(input, row));
            return;
        }
    }
    for (slot, row) in out.iter_mut().zip(weights.chunks_exact(in_size)) {
        *slot = simd::dot(input, row);
    }
}

/// Runs one fully-connected layer into `out`.
///
/// `out.len()` is the neuron count and must equal `thresholds.len()`;
/// `weights` holds one contiguous row of `input.len()` weights per neuron.
/// Each output is `max(dot(input, row) - threshold, 0)`.
pub fn dense_layer_into(
    out: &mut [f32],
    input: &[f32],
    weights: &[f32],
    thresholds: &[f32],
) -> Result<()> {
    check_buffers(out, input, weights, thresholds)?;
    tracing::debug!(in_size = input.len(), out_size = out.len(), "dense_layer");

    activations(out, input, weights);
    for (o, &t) in out.iter_mut().zip(thresholds.iter()) {
        *o -= t;
        if *o < 0.0 {
            *o = 0.0;
        }
    }
    Ok(())
}

/// Runs one fully-connected layer with `thresholds.len()` neurons.
pub fn dense_layer(input: &[f32], weights: &[f32], thresholds: &[f32]) -> Result<Vec<f32>> {
    let mut out = vec![0.0f32; thresholds.len()];
    dense_layer_into(&mut out, input, weights, thresholds)?;
    Ok(out)
}
