//! Common test utilities for irregular-ts integration tests.
#![allow(dead_code)]

use ndarray::{array, Array2, Array3};
use rand::prelude::*;

/// Single sequence, 10 timesteps, 3 channels with a fixed missing pattern.
///
/// Channel 0 is sparse, channel 1 dense, channel 2 categorical.
pub fn worked_example_series() -> Array3<f32> {
    let nan = f32::NAN;
    let rows = array![
        [nan, 10.0, 1.0],
        [2.0, 20.0, nan],
        [nan, 30.0, 2.0],
        [nan, nan, nan],
        [5.0, 50.0, nan],
        [nan, 60.0, 1.0],
        [nan, 70.0, nan],
        [nan, nan, 2.0],
        [9.0, 90.0, 2.0],
        [nan, 100.0, nan]
    ];
    rows.insert_axis(ndarray::Axis(0))
}

/// Fully observed random series
pub fn create_random_series(n: usize, t: usize, c: usize, seed: u64) -> Array3<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_fn((n, t, c), |_| rng.gen_range(-5.0..5.0))
}

/// Fully observed series with a categorical last channel taking values 0..levels
pub fn create_mixed_series(n: usize, t: usize, c: usize, levels: u32, seed: u64) -> Array3<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_fn((n, t, c), |(_, _, k)| {
        if k + 1 == c {
            rng.gen_range(0..levels) as f32
        } else {
            rng.gen_range(-5.0..5.0)
        }
    })
}

/// One-hot labels for `classes` classes
pub fn create_one_hot_labels(n: usize, classes: usize, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut labels = Array2::zeros((n, classes));
    for i in 0..n {
        labels[[i, rng.gen_range(0..classes)]] = 1.0;
    }
    labels
}

/// Strictly increasing, irregularly spaced time stamps
pub fn create_irregular_times(n: usize, t: usize, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut times = Array2::zeros((n, t));
    for i in 0..n {
        let mut now = 0.0f32;
        for j in 0..t {
            times[[i, j]] = now;
            now += rng.gen_range(0.25..2.0);
        }
    }
    times
}

/// Values of one channel of one sequence
pub fn channel(x: &ndarray::ArrayView3<'_, f32>, n: usize, c: usize) -> Vec<f32> {
    x.slice(ndarray::s![n, .., c]).to_vec()
}

/// Compare float slices treating NaN as equal to NaN
pub fn assert_same_values(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            assert!(a.is_nan(), "index {}: expected NaN, got {}", i, a);
        } else {
            assert!((a - e).abs() < 1e-5, "index {}: expected {}, got {}", i, e, a);
        }
    }
}
