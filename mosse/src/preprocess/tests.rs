//! Tests for template preprocessing.

use common::float_ext::FloatExt;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::*;

fn noisy_template(rows: usize, cols: usize) -> Grid<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    Grid::from_fn(rows, cols, |_, _| rng.random_range(0.0..255.0))
}

#[test]
fn hann_window_is_symmetric_with_zero_ends() {
    let window = hann_window(33);

    assert_eq!(window.len(), 33);
    assert!(window[0].approximately_eq(0.0));
    assert!(window[32].approximately_eq(0.0));
    assert!(window[16].approximately_eq(1.0));
    for i in 0..33 {
        assert!(window[i].approximately_eq(window[32 - i]));
    }
}

#[test]
fn hann_window_of_one_is_unity() {
    assert_eq!(hann_window(1), vec![1.0]);
}

#[test]
fn cosine_window_is_outer_product_square_root() {
    let window = cosine_window(8, 6);
    let wr = hann_window(8);
    let wc = hann_window(6);

    assert_eq!(window.shape(), (8, 6));
    for r in 0..8 {
        for c in 0..6 {
            assert!(window[(r, c)].approximately_eq((wr[r] * wc[c]).sqrt()));
        }
    }
}

#[test]
fn preserves_shape_and_is_deterministic() {
    let template = noisy_template(16, 24);

    let a = preprocess(&template, 0.1).unwrap();
    let b = preprocess(&template, 0.1).unwrap();

    assert_eq!(a.shape(), (16, 24));
    assert_eq!(a, b);
}

#[test]
fn border_is_suppressed() {
    let template = noisy_template(16, 16);
    let out = preprocess(&template, 0.1).unwrap();

    for i in 0..16 {
        assert!(out[(0, i)].abs() < 1e-12);
        assert!(out[(15, i)].abs() < 1e-12);
        assert!(out[(i, 0)].abs() < 1e-12);
        assert!(out[(i, 15)].abs() < 1e-12);
    }
}

#[test]
fn untapered_values_are_standardized() {
    let template = noisy_template(32, 32);
    let eps = 1e-9;

    let out = preprocess(&template, eps).unwrap();
    let window = cosine_window(32, 32);
    let logged = template.map(|&v| (v + 1.0).ln());
    let (mean, std) = (logged.mean(), logged.std_dev());

    // Dividing the taper back out must give the plain z-score.
    let mut recovered = Vec::new();
    for ((v, w), raw) in out.data().iter().zip(window.data()).zip(logged.data()) {
        if *w > 1e-3 {
            let z = v / w;
            assert!(z.approximately_eq_within((raw - mean) / std, 1e-6));
            recovered.push(z);
        }
    }

    let recovered = Grid::new(1, recovered.len(), recovered);
    assert!(recovered.mean().abs() < 0.1);
    assert!(recovered.std_dev().approximately_eq_within(1.0, 0.1));
}

#[test]
fn windowed_energy_matches_window_energy() {
    let template = noisy_template(32, 32);
    let out = preprocess(&template, 1e-12).unwrap();
    let window = cosine_window(32, 32);

    // Weighted by the window energy the output behaves like unit-variance noise.
    let energy: f64 = out.data().iter().map(|v| v * v).sum();
    let window_energy: f64 = window.data().iter().map(|w| w * w).sum();

    assert!(
        energy.relatively_eq(window_energy, 0.5),
        "energy {energy} vs window energy {window_energy}"
    );
}

#[test]
fn flat_template_maps_to_zero() {
    let template = Grid::filled(8, 8, 42.0);
    let out = preprocess(&template, 0.1).unwrap();
    assert!(out.data().iter().all(|v| v.abs() < 1e-12));
}

#[test]
fn empty_template_is_rejected() {
    let empty = Grid::<f64>::zeros(0, 0);
    assert!(matches!(
        preprocess(&empty, 0.1),
        Err(TrackerError::EmptyInput)
    ));
}
