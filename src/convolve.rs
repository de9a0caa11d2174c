//! Valid-mode N-dimensional cross-correlation.
//!
//! `out[o] = sum_k input[o + k] * kernel[k]` with no kernel flip and no padding.
//!
//! Two tables drive the traversal. The kernel's [`OffsetCache`] gives the input
//! offset of every tap relative to the current output element. The output
//! [`CoIncrement`] advances that element's base offset in O(1) per step.
//! Neither is rebuilt inside the loop.

use convolver_shape::{col_major_strides, CoIncrement, Countdown, Index, OffsetCache};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::validate::{convolve_output_shape, ensure_same_shape};
use crate::view::{Array, ArrayView, ArrayViewMut};
use crate::{simd, Result};

#[cfg(feature = "parallel")]
use crate::threading;

/// Precomputed traversal state for one convolution call.
struct ConvolvePlan<'a> {
    input: &'a [f32],
    kernel: &'a [f32],
    in_strides: Index,
    out_dims: Index,
    out_step: CoIncrement,
    taps: OffsetCache,
}

impl<'a> ConvolvePlan<'a> {
    fn new(input: &ArrayView<'a>, kernel: &ArrayView<'a>, out_dims: &[usize]) -> Result<Self> {
        let out_step = CoIncrement::new(input.dims(), out_dims)?;
        let taps = OffsetCache::build(input.dims(), kernel.dims())?;
        Ok(Self {
            input: input.data(),
            kernel: kernel.data(),
            in_strides: col_major_strides(input.dims()),
            out_dims: SmallVec::from_slice(out_dims),
            out_step,
            taps,
        })
    }

    /// Fills `out`, whose first element is the output at flat position `start`.
    fn run(&self, start: usize, out: &mut [f32]) {
        let mut countdown = Countdown::new(&self.out_dims);
        countdown.seek(start);
        let mut base: usize = self
            .in_strides
            .iter()
            .enumerate()
            .map(|(axis, &stride)| countdown.coord(axis) * stride)
            .sum();

        simd::gather_dots(self.input, self.taps.as_slice(), self.kernel, out, |i| {
            if i > 0 {
                base += self.out_step.get(countdown.step());
            }
            base
        });
    }
}

fn execute(plan: &ConvolvePlan<'_>, out: &mut [f32]) {
    #[cfg(feature = "parallel")]
    {
        if threading::should_split(out.len(), plan.taps.len()) {
            let chunk = threading::chunk_len(out.len());
            out.par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(c, slots)| plan.run(c * chunk, slots));
            return;
        }
    }
    plan.run(0, out);
}

/// Valid-mode cross-correlation of `input` with `kernel`, written into `out`.
///
/// All three arrays must share a rank, and `out` must have shape
/// `input[d] - kernel[d] + 1` on every axis. `out` is fully overwritten.
pub fn convolve_into(
    out: &mut ArrayViewMut<'_>,
    input: &ArrayView<'_>,
    kernel: &ArrayView<'_>,
) -> Result<()> {
    let expected = convolve_output_shape(input.dims(), kernel.dims())?;
    ensure_same_shape(expected.dims(), out.dims())?;
    tracing::debug!(
        input = ?input.dims(),
        kernel = ?kernel.dims(),
        "convolve"
    );

    let plan = ConvolvePlan::new(input, kernel, out.dims())?;
    execute(&plan, out.data_mut());
    Ok(())
}

/// Valid-mode cross-correlation of `input` with `kernel` into a new array.
pub fn convolve(input: &ArrayView<'_>, kernel: &ArrayView<'_>) -> Result<Array> {
    let shape = convolve_output_shape(input.dims(), kernel.dims())?;
    let mut out = Array::zeros(shape.dims())?;
    convolve_into(&mut out.view_mut(), input, kernel)?;
    Ok(out)
}
