//! Tiled max-pooling with a window that may overlap neighbouring tiles.
//!
//! Output element `o` reduces the input window starting at `o[d] * tile_by`
//! and spanning `pool_by` positions along every axis. Positions past the end
//! of the input are excluded from the max.

use convolver_shape::{col_major_strides, CoIncrement, Countdown, Index, OffsetCache};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::validate::{ensure_factor, ensure_same_rank, max_pool_output_shape};
use crate::view::{Array, ArrayView, ArrayViewMut};
use crate::{ConvolverError, Result};

#[cfg(feature = "parallel")]
use crate::threading;

/// Every output window must start inside the input.
///
/// Only an output larger than `ceil(input / tile_by)` along some axis can
/// break this.
fn ensure_nonempty_windows(in_dims: &[usize], out_dims: &[usize], tile_by: usize) -> Result<()> {
    for (axis, (&input_extent, &out)) in in_dims.iter().zip(out_dims.iter()).enumerate() {
        let output_index = out - 1;
        if output_index * tile_by >= input_extent {
            return Err(ConvolverError::EmptyPoolWindow {
                axis,
                output_index,
                input_extent,
            });
        }
    }
    Ok(())
}

struct PoolPlan<'a> {
    input: &'a [f32],
    in_dims: Index,
    in_strides: Index,
    out_dims: Index,
    tile_by: usize,
    pool_by: usize,
    /// Input delta between consecutive output windows.
    grid_step: CoIncrement,
    /// Tap offsets of an unclipped window; `None` if no window fits the input.
    window: Option<OffsetCache>,
}

impl<'a> PoolPlan<'a> {
    fn new(
        input: &ArrayView<'a>,
        out_dims: &[usize],
        tile_by: usize,
        pool_by: usize,
    ) -> Result<Self> {
        let in_dims = input.dims();
        let grid_step = CoIncrement::new(in_dims, out_dims)?.scaled(tile_by);
        let window = if in_dims.iter().all(|&d| pool_by <= d) {
            let window_dims: Index = SmallVec::from_elem(pool_by, in_dims.len());
            Some(OffsetCache::build(in_dims, &window_dims)?)
        } else {
            None
        };
        Ok(Self {
            input: input.data(),
            in_dims: SmallVec::from_slice(in_dims),
            in_strides: col_major_strides(in_dims),
            out_dims: SmallVec::from_slice(out_dims),
            tile_by,
            pool_by,
            grid_step,
            window,
        })
    }

    fn run(&self, start: usize, out: &mut [f32]) -> Result<()> {
        let rank = self.in_dims.len();
        let mut countdown = Countdown::new(&self.out_dims);
        countdown.seek(start);
        let mut base: usize = self
            .in_strides
            .iter()
            .enumerate()
            .map(|(axis, &stride)| countdown.coord(axis) * self.tile_by * stride)
            .sum();

        let mut extent: Index = SmallVec::from_elem(self.pool_by, rank);
        for (i, slot) in out.iter_mut().enumerate() {
            if i > 0 {
                base += self.grid_step.get(countdown.step());
            }

            let mut clipped = false;
            for axis in 0..rank {
                let origin = countdown.coord(axis) * self.tile_by;
                let e = self.pool_by.min(self.in_dims[axis] - origin);
                clipped |= e < self.pool_by;
                extent[axis] = e;
            }

            *slot = match &self.window {
                Some(window) if !clipped => self.window_max(base, window.as_slice()),
                _ => self.clipped_max(base, &extent)?,
            };
        }
        Ok(())
    }

    /// Taps compare with `>` from `-inf`, so NaN never wins wherever it sits.
    #[inline]
    fn window_max(&self, base: usize, offsets: &[usize]) -> f32 {
        let mut max = f32::NEG_INFINITY;
        for &o in offsets {
            let v = self.input[base + o];
            if v > max {
                max = v;
            }
        }
        max
    }

    /// Max over a window cut short by the end of the input.
    fn clipped_max(&self, base: usize, extent: &[usize]) -> Result<f32> {
        let step = CoIncrement::new(&self.in_dims, extent)?;
        let taps: usize = extent.iter().product();
        let mut walk = Countdown::new(extent);
        let mut pos = base;
        let mut max = f32::NEG_INFINITY;
        for tap in 0..taps {
            if tap > 0 {
                pos += step.get(walk.step());
            }
            let v = self.input[pos];
            if v > max {
                max = v;
            }
        }
        Ok(max)
    }
}

fn execute(plan: &PoolPlan<'_>, out: &mut [f32]) -> Result<()> {
    #[cfg(feature = "parallel")]
    {
        let rank = plan.in_dims.len() as u32;
        if threading::should_split(out.len(), plan.pool_by.saturating_pow(rank)) {
            let chunk = threading::chunk_len(out.len());
            return out
                .par_chunks_mut(chunk)
                .enumerate()
                .try_for_each(|(c, slots)| plan.run(c * chunk, slots));
        }
    }
    plan.run(0, out)
}

/// Max-pools `input` into `out`.
///
/// `tile_by` is the window spacing and `pool_by` the window extent, both in
/// `1..=MAX_POOL_FACTOR` and applied to every axis. `out` normally has shape
/// [`max_pool_output_shape`]`(input, tile_by)`; a smaller output pools only the
/// leading windows, a larger one fails with [`ConvolverError::EmptyPoolWindow`].
pub fn max_pool_into(
    out: &mut ArrayViewMut<'_>,
    input: &ArrayView<'_>,
    tile_by: usize,
    pool_by: usize,
) -> Result<()> {
    ensure_factor("tile_by", tile_by)?;
    ensure_factor("pool_by", pool_by)?;
    ensure_same_rank(input.dims(), out.dims())?;
    ensure_nonempty_windows(input.dims(), out.dims(), tile_by)?;
    tracing::debug!(
        input = ?input.dims(),
        output = ?out.dims(),
        tile_by,
        pool_by,
        "max_pool"
    );

    let plan = PoolPlan::new(input, out.dims(), tile_by, pool_by)?;
    execute(&plan, out.data_mut())
}

/// Max-pools `input` into a new array of shape `ceil(input[d] / tile_by)`.
pub fn max_pool(input: &ArrayView<'_>, tile_by: usize, pool_by: usize) -> Result<Array> {
    let shape = max_pool_output_shape(input.dims(), tile_by)?;
    let mut out = Array::zeros(shape.dims())?;
    max_pool_into(&mut out.view_mut(), input, tile_by, pool_by)?;
    Ok(out)
}
