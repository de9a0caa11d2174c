//! Direct index-arithmetic reference implementations.
#![allow(dead_code)]

use convolver::Array;
use convolver_shape::pos_to_index;
use rand::rngs::StdRng;
use rand::Rng;

pub fn random_array(rng: &mut StdRng, dims: &[usize]) -> Array {
    Array::from_fn(dims, |_| rng.gen_range(-1.0f32..1.0)).unwrap()
}

pub fn random_dims(rng: &mut StdRng, rank: usize, lo: usize, hi: usize) -> Vec<usize> {
    (0..rank).map(|_| rng.gen_range(lo..=hi)).collect()
}

pub fn convolve(input: &Array, kernel: &Array) -> Array {
    let out_dims: Vec<usize> = input
        .dims()
        .iter()
        .zip(kernel.dims())
        .map(|(&i, &k)| i - k + 1)
        .collect();
    let mut k_idx = vec![0usize; kernel.ndim()];
    Array::from_fn(&out_dims, |o| {
        let mut sum = 0.0f32;
        for (kp, &w) in kernel.data().iter().enumerate() {
            pos_to_index(kernel.dims(), kp, &mut k_idx);
            let at: Vec<usize> = o.iter().zip(&k_idx).map(|(a, b)| a + b).collect();
            sum += input.get(&at) * w;
        }
        sum
    })
    .unwrap()
}

pub fn max_pool(input: &Array, tile_by: usize, pool_by: usize) -> Array {
    let rank = input.ndim();
    let out_dims: Vec<usize> = input.dims().iter().map(|&i| i.div_ceil(tile_by)).collect();
    let window = vec![pool_by; rank];
    let taps: usize = window.iter().product();
    let mut w_idx = vec![0usize; rank];
    Array::from_fn(&out_dims, |o| {
        let mut max = f32::NEG_INFINITY;
        for wp in 0..taps {
            pos_to_index(&window, wp, &mut w_idx);
            let at: Vec<usize> = o.iter().zip(&w_idx).map(|(a, b)| a * tile_by + b).collect();
            if at.iter().zip(input.dims()).all(|(a, d)| a < d) {
                max = max.max(input.get(&at));
            }
        }
        max
    })
    .unwrap()
}

pub fn dense_layer(input: &[f32], weights: &[f32], thresholds: &[f32]) -> Vec<f32> {
    thresholds
        .iter()
        .enumerate()
        .map(|(o, &t)| {
            let sum: f32 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| x * weights[o * input.len() + i])
                .sum();
            (sum - t).max(0.0)
        })
        .collect()
}

/// Applies the reverse-and-shift mapping to a copy of `dst`.
pub fn fit_kernel_backwards(dst: &Array, src: &Array, shift_by: &[usize]) -> Array {
    let mut out = dst.clone();
    let mut k = vec![0usize; src.ndim()];
    for (kp, &v) in src.data().iter().enumerate() {
        pos_to_index(src.dims(), kp, &mut k);
        let x: Vec<usize> = (0..src.ndim())
            .map(|d| {
                let raw = src.dims()[d] as isize - shift_by[d] as isize - k[d] as isize - 1;
                if raw < 0 {
                    (raw + dst.dims()[d] as isize) as usize
                } else {
                    raw as usize
                }
            })
            .collect();
        out.set(&x, v);
    }
    out
}
