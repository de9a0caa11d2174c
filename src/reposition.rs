//! Reverse-and-shift kernel staging for frequency-domain convolution.
//!
//! Source element `k` lands at destination index
//! `x[d] = src[d] - shift_by[d] - k[d] - 1`, plus `dst[d]` when negative.
//! With `shift_by` at its default of half the kernel, the kernel's centre lands
//! on the destination origin, which is what a circular (FFT) product needs.

use convolver_shape::{col_major_strides, Countdown, Index};
use smallvec::SmallVec;

use crate::validate::{ensure_fits, ensure_same_rank, kernel_shift};
use crate::view::{Array, ArrayView, ArrayViewMut};
use crate::{ConvolverError, Result};

fn ensure_shift(dst: &[usize], shift_by: &[usize]) -> Result<()> {
    ensure_same_rank(dst, shift_by)?;
    for (axis, (&extent, &shift)) in dst.iter().zip(shift_by.iter()).enumerate() {
        if shift > extent {
            return Err(ConvolverError::ShiftOutOfRange {
                axis,
                shift,
                extent,
            });
        }
    }
    Ok(())
}

/// Writes `src` reversed and circularly shifted by `shift_by` into `dst`.
///
/// Requires `src[d] <= dst[d]` and `shift_by[d] <= dst[d]` on every axis.
/// Only the `src.len()` targeted positions are written; the rest of `dst` is
/// left as it was, so callers normally pass a zero-filled destination.
pub fn fit_kernel_backwards_into(
    dst: &mut ArrayViewMut<'_>,
    src: &ArrayView<'_>,
    shift_by: &[usize],
) -> Result<()> {
    ensure_fits(dst.dims(), src.dims())?;
    ensure_shift(dst.dims(), shift_by)?;
    tracing::debug!(
        dst = ?dst.dims(),
        src = ?src.dims(),
        shift_by = ?shift_by,
        "fit_kernel_backwards"
    );

    let dst_dims: Index = SmallVec::from_slice(dst.dims());
    let dst_strides = col_major_strides(&dst_dims);
    let src_dims = src.dims();

    // x at k = 0 on each axis; always in 0..dst[d] given the checks above.
    let start: Index = src_dims
        .iter()
        .zip(shift_by.iter())
        .zip(dst_dims.iter())
        .map(|((&s, &shift), &d)| (s + d - shift - 1) % d)
        .collect();

    let mut x = start.clone();
    let mut dpos: usize = x
        .iter()
        .zip(dst_strides.iter())
        .map(|(&xi, &stride)| xi * stride)
        .sum();

    let out = dst.data_mut();
    let mut countdown = Countdown::new(src_dims);
    let rank = src_dims.len();
    for (i, &value) in src.data().iter().enumerate() {
        if i > 0 {
            let k = countdown.step();
            for j in 0..k {
                dpos -= x[j] * dst_strides[j];
                x[j] = start[j];
                dpos += x[j] * dst_strides[j];
            }
            if k < rank {
                dpos -= x[k] * dst_strides[k];
                x[k] = if x[k] == 0 { dst_dims[k] - 1 } else { x[k] - 1 };
                dpos += x[k] * dst_strides[k];
            }
        }
        out[dpos] = value;
    }
    Ok(())
}

/// Stages `src` into a new zero-filled array of shape `dst_dims` using the
/// default shift of half the kernel extent on every axis.
pub fn fit_kernel_backwards(dst_dims: &[usize], src: &ArrayView<'_>) -> Result<Array> {
    let mut dst = Array::zeros(dst_dims)?;
    let shift_by = kernel_shift(src.dims());
    fit_kernel_backwards_into(&mut dst.view_mut(), src, &shift_by)?;
    Ok(dst)
}
