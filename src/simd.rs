//! Vector accumulation helpers.
//!
//! Dot products accumulate in independent lanes and sum the lanes last, so
//! results agree with a sequential sum only to within float rounding.
//! With `simd` enabled each public helper performs exactly one `pulp`
//! runtime dispatch and runs its whole loop inside it.

/// `sum_i a[i] * b[i]` over two contiguous slices of equal length.
#[inline]
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    #[cfg(feature = "simd")]
    {
        simd_impls::dot(a, b)
    }
    #[cfg(not(feature = "simd"))]
    {
        dot_lanes(a, b)
    }
}

/// Fills `out[i]` with `sum_j input[base_of(i) + offsets[j]] * kernel[j]`.
///
/// `base_of` is called once per slot, in slot order, so it may carry
/// incremental stepping state. Panics if a tap falls outside `input`.
pub(crate) fn gather_dots<F>(
    input: &[f32],
    offsets: &[usize],
    kernel: &[f32],
    out: &mut [f32],
    base_of: F,
) where
    F: FnMut(usize) -> usize,
{
    debug_assert_eq!(offsets.len(), kernel.len());
    #[cfg(feature = "simd")]
    {
        simd_impls::gather_dots(input, offsets, kernel, out, base_of);
    }
    #[cfg(not(feature = "simd"))]
    {
        let mut base_of = base_of;
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = gather_dot_lanes(input, base_of(i), offsets, kernel);
        }
    }
}

/// Portable four-lane dot product with a scalar tail for the last 0-3 elements.
#[cfg_attr(feature = "simd", allow(dead_code))]
#[inline(always)]
pub(crate) fn dot_lanes(a: &[f32], b: &[f32]) -> f32 {
    let aligned = a.len() & !3;
    let mut lanes = [0.0f32; 4];
    for (x, y) in a[..aligned]
        .chunks_exact(4)
        .zip(b[..aligned].chunks_exact(4))
    {
        for ((lane, &x), &y) in lanes.iter_mut().zip(x).zip(y) {
            *lane += x * y;
        }
    }
    let mut tail = 0.0f32;
    for (&x, &y) in a[aligned..].iter().zip(b[aligned..].iter()) {
        tail += x * y;
    }
    lanes[0] + lanes[1] + lanes[2] + lanes[3] + tail
}

/// Portable gathered dot product, four taps per step.
#[cfg_attr(feature = "simd", allow(dead_code))]
#[inline(always)]
pub(crate) fn gather_dot_lanes(
    input: &[f32],
    base: usize,
    offsets: &[usize],
    kernel: &[f32],
) -> f32 {
    let aligned = offsets.len() & !3;
    let src = &input[base..];
    let mut lanes = [0.0f32; 4];
    for (offs, ks) in offsets[..aligned]
        .chunks_exact(4)
        .zip(kernel[..aligned].chunks_exact(4))
    {
        for ((lane, &o), &k) in lanes.iter_mut().zip(offs).zip(ks) {
            *lane += src[o] * k;
        }
    }
    let mut tail = 0.0f32;
    for (&o, &k) in offsets[aligned..].iter().zip(kernel[aligned..].iter()) {
        tail += src[o] * k;
    }
    lanes[0] + lanes[1] + lanes[2] + lanes[3] + tail
}

#[cfg(feature = "simd")]
mod simd_impls {
    use pulp::{Simd, WithSimd};

    /// Taps staged per vector pass when gathering.
    const GATHER_BLOCK: usize = 64;

    #[inline(always)]
    fn dot_with<S: Simd>(simd: S, a: &[f32], b: &[f32]) -> f32 {
        let (a_head, a_tail) = S::as_simd_f32s(a);
        let (b_head, b_tail) = S::as_simd_f32s(b);
        debug_assert_eq!(a_head.len(), b_head.len());

        let mut acc = [simd.splat_f32s(0.0); 4];
        for (x, y) in a_head.chunks_exact(4).zip(b_head.chunks_exact(4)) {
            for ((lane, &x), &y) in acc.iter_mut().zip(x).zip(y) {
                *lane = simd.mul_add_f32s(x, y, *lane);
            }
        }
        let done = a_head.len() & !3;
        for (&x, &y) in a_head[done..].iter().zip(b_head[done..].iter()) {
            acc[0] = simd.mul_add_f32s(x, y, acc[0]);
        }

        let lanes = simd.add_f32s(
            simd.add_f32s(acc[0], acc[1]),
            simd.add_f32s(acc[2], acc[3]),
        );
        let mut total = simd.reduce_sum_f32s(lanes);
        for (&x, &y) in a_tail.iter().zip(b_tail.iter()) {
            total += x * y;
        }
        total
    }

    /// Copies up to `GATHER_BLOCK` taps into `buf`, then multiplies in registers.
    #[inline(always)]
    fn gather_dot_with<S: Simd>(
        simd: S,
        src: &[f32],
        offsets: &[usize],
        kernel: &[f32],
        buf: &mut [f32; GATHER_BLOCK],
    ) -> f32 {
        let mut total = 0.0f32;
        for (offs, ks) in offsets.chunks(GATHER_BLOCK).zip(kernel.chunks(GATHER_BLOCK)) {
            let taps = &mut buf[..offs.len()];
            for (t, &o) in taps.iter_mut().zip(offs.iter()) {
                *t = src[o];
            }
            total += dot_with(simd, taps, ks);
        }
        total
    }

    pub(super) fn dot(a: &[f32], b: &[f32]) -> f32 {
        struct Dot<'a> {
            a: &'a [f32],
            b: &'a [f32],
        }
        impl WithSimd for Dot<'_> {
            type Output = f32;

            #[inline(always)]
            fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
                dot_with(simd, self.a, self.b)
            }
        }

        pulp::Arch::new().dispatch(Dot { a, b })
    }

    pub(super) fn gather_dots<F>(
        input: &[f32],
        offsets: &[usize],
        kernel: &[f32],
        out: &mut [f32],
        base_of: F,
    ) where
        F: FnMut(usize) -> usize,
    {
        struct GatherDots<'a, F> {
            input: &'a [f32],
            offsets: &'a [usize],
            kernel: &'a [f32],
            out: &'a mut [f32],
            base_of: F,
        }
        impl<F: FnMut(usize) -> usize> WithSimd for GatherDots<'_, F> {
            type Output = ();

            #[inline(always)]
            fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
                let Self {
                    input,
                    offsets,
                    kernel,
                    out,
                    mut base_of,
                } = self;
                let mut buf = [0.0f32; GATHER_BLOCK];
                for (i, slot) in out.iter_mut().enumerate() {
                    let src = &input[base_of(i)..];
                    *slot = gather_dot_with(simd, src, offsets, kernel, &mut buf);
                }
            }
        }

        pulp::Arch::new().dispatch(GatherDots {
            input,
            offsets,
            kernel,
            out,
            base_of,
        });
    }
}
