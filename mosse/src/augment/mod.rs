//! Synthetic training samples from a single template.
//!
//! Each sample is the template under a small random similarity transform
//! (rotation about the template center, isotropic scale, integer-bounded
//! translation), resampled with a Catmull-Rom bicubic kernel. Pixels sampled
//! outside the template replicate the nearest edge pixel, so no dark borders
//! are introduced.


use glam::{DMat2, DVec2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;

/// Maximum absolute rotation, in degrees.
pub const MAX_ROTATION_DEG: f64 = 10.0;
/// Isotropic scale range.
pub const SCALE_RANGE: (f64, f64) = (0.9, 1.1);
/// Translation bound per axis is `axis_len / TRANSLATION_DIVISOR` (integer division).
pub const TRANSLATION_DIVISOR: usize = 40;

/// One random similarity transform in array coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    /// Rotation in radians.
    pub angle: f64,
    pub scale: f64,
    /// Shift as (row, col) in pixels.
    pub translation: DVec2,
}

impl Perturbation {
    pub fn identity() -> Self {
        Self {
            angle: 0.0,
            scale: 1.0,
            translation: DVec2::ZERO,
        }
    }

    /// Draws a perturbation for a template of `size = (rows, cols)`.
    pub fn sample<R: Rng>(rng: &mut R, size: (usize, usize)) -> Self {
        let angle = rng
            .random_range(-MAX_ROTATION_DEG..=MAX_ROTATION_DEG)
            .to_radians();
        let scale = rng.random_range(SCALE_RANGE.0..=SCALE_RANGE.1);

        let max_row = (size.0 / TRANSLATION_DIVISOR) as f64;
        let max_col = (size.1 / TRANSLATION_DIVISOR) as f64;
        let translation = DVec2::new(
            rng.random_range(-max_row..=max_row),
            rng.random_range(-max_col..=max_col),
        );

        Self {
            angle,
            scale,
            translation,
        }
    }

    /// Output-to-input sampling map: `src = M (dst + t - c) + c`, with
    /// `M = (scale * R(angle))^-1` and `c` the template center.
    fn source_map(&self, center: DVec2) -> impl Fn(DVec2) -> DVec2 {
        let (sin, cos) = self.angle.sin_cos();
        // Row-major [[cos, sin], [-sin, cos]] scaled.
        let forward = DMat2::from_cols(DVec2::new(cos, -sin), DVec2::new(sin, cos)) * self.scale;
        let inverse = forward.inverse();
        let translation = self.translation;
        move |dst| inverse * (dst + translation - center) + center
    }

    /// Resamples `template` under this perturbation.
    pub fn apply(&self, template: &Grid<f64>) -> Grid<f64> {
        let (rows, cols) = template.shape();
        if template.is_empty() {
            return template.clone();
        }

        let center = DVec2::new(rows as f64 / 2.0, cols as f64 / 2.0);
        let map = self.source_map(center);

        Grid::from_fn(rows, cols, |r, c| {
            let src = map(DVec2::new(r as f64, c as f64));
            sample_clamped(template, src.x, src.y)
        })
    }
}

/// Catmull-Rom cubic kernel.
#[inline]
fn cubic_kernel(x: f64) -> f64 {
    const A: f64 = -0.5;

    let abs_x = x.abs();
    if abs_x <= 1.0 {
        ((A + 2.0) * abs_x - (A + 3.0)) * abs_x * abs_x + 1.0
    } else if abs_x < 2.0 {
        ((A * abs_x - 5.0 * A) * abs_x + 8.0 * A) * abs_x - 4.0 * A
    } else {
        0.0
    }
}

/// Bicubic sample at fractional `(row, col)` over the 4x4 neighbourhood.
///
/// Neighbour indices outside the grid are clamped to the nearest edge, so
/// far-away coordinates return the edge value. The result is clamped to the
/// range of the 16 neighbours.
pub fn sample_clamped(grid: &Grid<f64>, row: f64, col: f64) -> f64 {
    let (rows, cols) = grid.shape();
    let max_row = rows as isize - 1;
    let max_col = cols as isize - 1;

    let r0 = row.floor();
    let c0 = col.floor();
    let fr = row - r0;
    let fc = col - c0;
    let (r0, c0) = (r0 as isize, c0 as isize);

    let wr = [
        cubic_kernel(fr + 1.0),
        cubic_kernel(fr),
        cubic_kernel(fr - 1.0),
        cubic_kernel(fr - 2.0),
    ];
    let wc = [
        cubic_kernel(fc + 1.0),
        cubic_kernel(fc),
        cubic_kernel(fc - 1.0),
        cubic_kernel(fc - 2.0),
    ];

    let mut sum = 0.0;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (j, &wrj) in wr.iter().enumerate() {
        let r = (r0 - 1 + j as isize).clamp(0, max_row) as usize;
        for (i, &wci) in wc.iter().enumerate() {
            let c = (c0 - 1 + i as isize).clamp(0, max_col) as usize;
            let v = grid[(r, c)];
            sum += v * wci * wrj;
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }

    if lo <= hi { sum.clamp(lo, hi) } else { sum }
}

/// Random template warper with an injectable generator.
#[derive(Debug, Clone)]
pub struct Augmenter<R = ChaCha8Rng> {
    rng: R,
}

impl Augmenter<ChaCha8Rng> {
    /// Reproducible augmentation.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Augmentation seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_os_rng())
    }
}

impl<R: Rng> Augmenter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draws the next perturbation for a template of the given size.
    pub fn perturbation(&mut self, size: (usize, usize)) -> Perturbation {
        Perturbation::sample(&mut self.rng, size)
    }

    /// Returns a randomly perturbed copy of `template`.
    pub fn warp(&mut self, template: &Grid<f64>) -> Grid<f64> {
        self.perturbation(template.shape()).apply(template)
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
