//! Tests for the 2D transform.

use common::float_ext::FloatExt;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rustfft::num_complex::Complex64;

use super::*;

fn random_grid(rows: usize, cols: usize, seed: u64) -> Grid<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Grid::from_fn(rows, cols, |_, _| rng.random_range(-100.0..100.0))
}

#[test]
fn round_trip_reproduces_real_input() {
    for (rows, cols) in [(8, 8), (16, 12), (6, 10), (1, 7)] {
        let spectral = Spectral::new(rows, cols);
        let input = random_grid(rows, cols, 7);

        let restored = spectral.inverse(&spectral.forward(&input));

        for (orig, back) in input.data().iter().zip(restored.data()) {
            assert!(
                orig.approximately_eq_within(back.re, 1e-9),
                "{rows}x{cols}: {orig} vs {}",
                back.re
            );
            assert!(back.im.abs() < 1e-9);
        }
    }
}

#[test]
fn constant_input_concentrates_in_dc_bin() {
    let spectral = Spectral::new(4, 6);
    let input = Grid::filled(4, 6, 2.0);

    let spectrum = spectral.forward(&input);

    assert!(spectrum[(0, 0)].re.approximately_eq_within(48.0, 1e-9));
    for (i, v) in spectrum.data().iter().enumerate().skip(1) {
        assert!(v.norm() < 1e-9, "bin {i} = {v}");
    }
}

#[test]
fn impulse_has_flat_spectrum() {
    let spectral = Spectral::new(8, 4);
    let mut input = Grid::zeros(8, 4);
    input[(0, 0)] = 1.0;

    let spectrum = spectral.forward(&input);

    for v in spectrum.data() {
        assert!(v.re.approximately_eq_within(1.0, 1e-12));
        assert!(v.im.abs() < 1e-12);
    }
}

#[test]
fn forward_complex_matches_forward_for_real_data() {
    let spectral = Spectral::new(6, 8);
    let input = random_grid(6, 8, 3);
    let complex = input.map(|&v| Complex64::new(v, 0.0));

    let a = spectral.forward(&input);
    let b = spectral.forward_complex(&complex);

    for (x, y) in a.data().iter().zip(b.data()) {
        assert!((*x - *y).norm() < 1e-9);
    }
}

#[test]
fn fft_shift_and_inverse_cancel() {
    for (rows, cols) in [(4, 4), (5, 3), (6, 7)] {
        let grid = Grid::from_fn(rows, cols, |r, c| r * 100 + c);
        assert_eq!(ifft_shift(&fft_shift(&grid)), grid);
    }
}

#[test]
fn fft_shift_moves_origin_to_center() {
    let mut grid = Grid::zeros(4, 6);
    grid[(0, 0)] = 1;

    let shifted = fft_shift(&grid);

    assert_eq!(shifted[(2, 3)], 1);
    assert_eq!(shifted.data().iter().sum::<i32>(), 1);
}

#[test]
#[should_panic(expected = "grid shape does not match")]
fn rejects_mismatched_shape() {
    let spectral = Spectral::new(4, 4);
    let _ = spectral.forward(&Grid::zeros(4, 5));
}
