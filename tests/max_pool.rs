mod support;

use convolver::{max_pool, max_pool_into, Array, ArrayView, ArrayViewMut, ConvolverError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use support::naive;

fn pool(dims: &[usize], data: &[f32], tile_by: usize, pool_by: usize) -> Array {
    max_pool(&ArrayView::new(data, dims).unwrap(), tile_by, pool_by).unwrap()
}

const GRID_6X6: [f32; 36] = [
    1.0, -1.1, -1.2, 0.5, 1.3, 2.0, //
    1.0, -1.1, 1.2, 0.5, -7.3, 2.1, //
    1.0, -1.1, -1.2, 2.5, 4.5, -2.0, //
    -1.0, -1.1, -1.2, 0.5, 1.1, 7.0, //
    -9.0, -0.1, -1.2, 1.5, 7.3, 0.0, //
    -1.0, -1.1, 0.0, 0.5, 1.2, 1.0,
];

#[test]
fn test_max_pool_1d_tiles() {
    assert_eq!(pool(&[4], &[1.0, 1.1, 1.2, -0.5], 2, 2).data(), &[1.1, 1.2]);
    assert_eq!(
        pool(&[6], &[1.0, -1.1, -1.2, 0.5, 7.3, 2.0], 2, 2).data(),
        &[1.0, 0.5, 7.3]
    );
}

#[test]
fn test_max_pool_2d_square_tiles() {
    let input = [
        1.0, 1.1, 1.2, -0.5, //
        1.3, -1.1, 1.0, -0.75, //
        -1.0, -1.1, -1.2, 0.5, //
        -1.3, 1.1, -1.0, 0.75,
    ];
    let out = pool(&[4, 4], &input, 2, 2);
    assert_eq!(out.dims(), &[2, 2]);
    assert_eq!(out.data(), &[1.3, 1.2, 1.1, 0.75]);

    let out = pool(&[6, 6], &GRID_6X6, 3, 3);
    assert_eq!(out.data(), &[1.2, 4.5, 0.0, 7.3]);
}

#[test]
fn test_max_pool_2d_overlapping_windows() {
    let out = pool(&[6, 6], &GRID_6X6, 2, 3);
    assert_eq!(out.dims(), &[3, 3]);
    assert_eq!(
        out.data(),
        &[1.2, 4.5, 4.5, 1.0, 7.3, 7.3, 0.0, 7.3, 7.3]
    );
}

#[test]
fn test_max_pool_2d_partial_tiles() {
    let out = pool(&[4, 1], &[1.0, 1.1, 1.2, -0.5], 3, 3);
    assert_eq!(out.dims(), &[2, 1]);
    assert_eq!(out.data(), &[1.2, -0.5]);

    let input = [1.0, -1.1, -1.2, 2.0, -2.1, -2.2, 1.0, -1.1, 7.3];
    let out = pool(&[3, 3], &input, 2, 2);
    assert_eq!(out.data(), &[2.0, -1.2, 1.0, 7.3]);
}

#[test]
fn test_max_pool_matches_naive_random() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..60 {
        let rank = rng.gen_range(1..=3);
        let dims = naive::random_dims(&mut rng, rank, 1, 12);
        let tile_by = rng.gen_range(1..=4);
        let pool_by = rng.gen_range(1..=5);
        let input = naive::random_array(&mut rng, &dims);

        let got = max_pool(&input.view(), tile_by, pool_by).unwrap();
        assert_eq!(got, naive::max_pool(&input, tile_by, pool_by));
    }
}

#[test]
fn test_max_pool_large_input_matches_naive() {
    let mut rng = StdRng::seed_from_u64(256);
    let input = naive::random_array(&mut rng, &[256, 256]);
    let got = max_pool(&input.view(), 2, 3).unwrap();
    assert_eq!(got.dims(), &[128, 128]);
    assert_eq!(got, naive::max_pool(&input, 2, 3));
}

#[test]
fn test_max_pool_smaller_output_pools_leading_windows() {
    let input = [1.0f32, 5.0, 2.0, 9.0, 3.0];
    let mut out = [0.0f32; 2];
    max_pool_into(
        &mut ArrayViewMut::new(&mut out, &[2]).unwrap(),
        &ArrayView::new(&input, &[5]).unwrap(),
        2,
        2,
    )
    .unwrap();
    assert_eq!(out, [5.0, 9.0]);
}

#[test]
fn test_max_pool_into_rejects_rank_mismatch() {
    let input = [0.0f32; 4];
    let mut out = [0.0f32; 1];
    let err = max_pool_into(
        &mut ArrayViewMut::new(&mut out, &[1, 1]).unwrap(),
        &ArrayView::new(&input, &[4]).unwrap(),
        4,
        4,
    )
    .unwrap_err();
    assert!(matches!(err, ConvolverError::RankMismatch(1, 2)));
}
