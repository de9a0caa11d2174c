mod support;

use convolver::{
    fit_kernel_backwards, fit_kernel_backwards_into, kernel_shift, Array, ArrayView,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use support::naive;

#[test]
fn test_fit_kernel_matches_naive_random() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let rank = rng.gen_range(1..=4);
        let src_dims = naive::random_dims(&mut rng, rank, 1, 6);
        let dst_dims: Vec<usize> = src_dims.iter().map(|&s| s + rng.gen_range(0..=4)).collect();
        let shift: Vec<usize> = dst_dims.iter().map(|&d| rng.gen_range(0..=d)).collect();
        let src = naive::random_array(&mut rng, &src_dims);
        let dst = naive::random_array(&mut rng, &dst_dims);

        let mut got = dst.clone();
        fit_kernel_backwards_into(&mut got.view_mut(), &src.view(), &shift).unwrap();
        assert_eq!(got, naive::fit_kernel_backwards(&dst, &src, &shift));
    }
}

#[test]
fn test_fit_kernel_default_shift_matches_naive() {
    let mut rng = StdRng::seed_from_u64(8);
    let src = naive::random_array(&mut rng, &[5, 4, 3]);
    let zeros = Array::zeros(&[9, 8, 3]).unwrap();
    let got = fit_kernel_backwards(&[9, 8, 3], &src.view()).unwrap();
    let shift = kernel_shift(src.dims());
    assert_eq!(got, naive::fit_kernel_backwards(&zeros, &src, &shift));
}

#[test]
fn test_fit_kernel_symmetric_round_trip_without_shift() {
    // Symmetric along both axes, so reversing reproduces the kernel.
    let kernel = [
        1.0f32, 2.0, 1.0, //
        3.0, 5.0, 3.0, //
        1.0, 2.0, 1.0,
    ];
    let src = ArrayView::new(&kernel, &[3, 3]).unwrap();
    let mut dst = Array::zeros(&[3, 3]).unwrap();
    fit_kernel_backwards_into(&mut dst.view_mut(), &src, &[0, 0]).unwrap();
    assert_eq!(dst.data(), &kernel);
}

#[test]
fn test_fit_kernel_default_shift_centres_kernel_on_origin() {
    let kernel = [1.0f32, 2.0, 3.0];
    let got = fit_kernel_backwards(&[3], &ArrayView::new(&kernel, &[3]).unwrap()).unwrap();
    // Reversed [3, 2, 1] rotated so the centre tap sits at index 0.
    assert_eq!(got.data(), &[2.0, 1.0, 3.0]);
}
