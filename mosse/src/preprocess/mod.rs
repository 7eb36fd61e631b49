//! Template normalization applied before every transform.
//!
//! 1. `ln(x + 1)` compresses the dynamic range and tames bright outliers.
//! 2. Standardize to zero mean and (almost) unit variance; `eps` keeps flat
//!    templates from dividing by zero.
//! 3. Taper with a separable cosine window so the periodic transform does not
//!    see a discontinuity at the template border.

#[cfg(test)]
mod tests;

use std::f64::consts::PI;

use crate::error::{Result, TrackerError};
use crate::grid::Grid;

/// Normalizes a raw template. Output has the same shape as the input.
pub fn preprocess(template: &Grid<f64>, eps: f64) -> Result<Grid<f64>> {
    if template.is_empty() {
        return Err(TrackerError::EmptyInput);
    }

    let logged = template.map(|&v| (v + 1.0).ln());

    let mean = logged.mean();
    let scale = 1.0 / (logged.std_dev() + eps);

    let (rows, cols) = template.shape();
    let window = cosine_window(rows, cols);

    Ok(logged.zip_map(&window, |&v, &w| (v - mean) * scale * w))
}

/// Symmetric Hann window, `0.5 - 0.5 cos(2 pi i / (n - 1))` (numpy `hanning`).
pub fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / denom).cos())
        .collect()
}

/// 2D taper `sqrt(hann(rows) ⊗ hann(cols))`.
pub fn cosine_window(rows: usize, cols: usize) -> Grid<f64> {
    let wr = hann_window(rows);
    let wc = hann_window(cols);
    Grid::from_fn(rows, cols, |r, c| (wr[r] * wc[c]).sqrt())
}
