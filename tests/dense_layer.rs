mod support;

use approx::assert_abs_diff_eq;
use convolver::{dense_layer, dense_layer_into};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use support::naive;

fn random_vec(rng: &mut StdRng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

#[test]
fn test_dense_layer_matches_naive_random_sizes() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..40 {
        let in_size = rng.gen_range(1..=37);
        let out_size = rng.gen_range(1..=19);
        let input = random_vec(&mut rng, in_size);
        let weights = random_vec(&mut rng, in_size * out_size);
        let thresholds = random_vec(&mut rng, out_size);

        let got = dense_layer(&input, &weights, &thresholds).unwrap();
        let expected = naive::dense_layer(&input, &weights, &thresholds);
        for (g, e) in got.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*g, *e, epsilon = 1e-5);
        }
    }
}

#[test]
fn test_dense_layer_large_layer() {
    let mut rng = StdRng::seed_from_u64(1024);
    let input = random_vec(&mut rng, 1024);
    let weights = random_vec(&mut rng, 1024 * 256);
    let thresholds = random_vec(&mut rng, 256);

    let mut out = vec![f32::NAN; 256];
    dense_layer_into(&mut out, &input, &weights, &thresholds).unwrap();
    let expected = naive::dense_layer(&input, &weights, &thresholds);
    for (g, e) in out.iter().zip(expected.iter()) {
        assert!(*g >= 0.0);
        assert_abs_diff_eq!(*g, *e, epsilon = 1e-3);
    }
}
