//! MOSSE correlation filter.
//!
//! The filter is kept as two frequency-domain accumulators
//!
//! ```text
//! A = sum_i G . conj(F_i)
//! B = sum_i F_i . conj(F_i) + eps
//! ```
//!
//! where `G` is the spectrum of the desired Gaussian response and `F_i` the
//! spectrum of the i-th preprocessed sample. The filter itself is derived as
//! `H = conj(A / B)` after every change and is never updated directly.
//!
//! Bootstrapping adds `eps` to `B` for every sample except one, so a filter
//! trained from `n` samples carries `(n - 1) * eps` of regularization.


#[cfg(feature = "bench")]
pub mod bench;

use rand::Rng;
use rayon::prelude::*;
use rustfft::num_complex::Complex64;

use crate::augment::Augmenter;
use crate::config::Config;
use crate::error::{ConfigError, Result, TrackerError};
use crate::grid::Grid;
use crate::preprocess::preprocess;
use crate::spectral::Spectral;

/// Learned filter state. Exists only after training.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Numerator accumulator.
    pub a: Grid<Complex64>,
    /// Denominator accumulator.
    pub b: Grid<Complex64>,
    /// Derived filter, `conj(A / B)`.
    pub h: Grid<Complex64>,
}

impl FilterState {
    pub fn from_accumulators(a: Grid<Complex64>, b: Grid<Complex64>) -> Self {
        let h = derive_filter(&a, &b);
        Self { a, b, h }
    }

    fn refresh(&mut self) {
        self.h = derive_filter(&self.a, &self.b);
    }
}

/// `H = conj(A / B)`, elementwise. A zero denominator bin can only come from a
/// zero sample spectrum, which also zeroes the numerator; that bin is 0.
pub fn derive_filter(a: &Grid<Complex64>, b: &Grid<Complex64>) -> Grid<Complex64> {
    a.zip_map(b, |&a, &b| {
        if b.norm_sqr() == 0.0 {
            Complex64::new(0.0, 0.0)
        } else {
            (a / b).conj()
        }
    })
}

/// Capability the tracker needs from a correlation filter.
///
/// Templates are raw crops; implementations apply their own preprocessing.
pub trait FilterStrategy {
    /// Bootstraps the filter from one template and its desired response.
    fn train<R: Rng>(
        &mut self,
        template: &Grid<f64>,
        desired: &Grid<f64>,
        augmenter: &mut Augmenter<R>,
    ) -> Result<()>;

    /// Blends one new sample into the trained filter with weight `rate`.
    fn update(&mut self, template: &Grid<f64>, desired: &Grid<f64>, rate: f64) -> Result<()>;

    /// Spatial-domain response of `template` to the filter.
    fn correlate(&self, template: &Grid<f64>) -> Result<Grid<Complex64>>;

    /// Spatial-domain filter kernel, for display.
    fn spatial_filter(&self) -> Result<Grid<Complex64>>;

    fn is_trained(&self) -> bool;

    /// Drops any learned state.
    fn reset(&mut self);
}

/// Minimum Output Sum of Squared Error filter.
#[derive(Debug, Clone)]
pub struct MosseFilter {
    size: (usize, usize),
    eps: f64,
    train_steps: usize,
    spectral: Spectral,
    state: Option<FilterState>,
}

impl MosseFilter {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config.temp_size, config.eps, config.train_steps))
    }

    /// Builds a filter without full config validation. `train` still checks
    /// `train_steps`.
    pub fn from_parts(size: (usize, usize), eps: f64, train_steps: usize) -> Self {
        Self {
            size,
            eps,
            train_steps,
            spectral: Spectral::new(size.0, size.1),
            state: None,
        }
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    #[inline]
    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn state(&self) -> Option<&FilterState> {
        self.state.as_ref()
    }

    /// Spectrum of the preprocessed template.
    fn sample_spectrum(&self, template: &Grid<f64>) -> Result<Grid<Complex64>> {
        Ok(self.spectral.forward(&preprocess(template, self.eps)?))
    }

    fn check_shape(&self, grid: &Grid<f64>) -> Result<()> {
        if grid.shape() != self.size {
            return Err(TrackerError::DimensionMismatch {
                expected: self.size,
                actual: grid.shape(),
            });
        }
        Ok(())
    }
}

/// One sample's contribution `(G . conj(F), F . conj(F))`, without epsilon.
fn sample_terms(g: &Grid<Complex64>, f: &Grid<Complex64>) -> (Grid<Complex64>, Grid<Complex64>) {
    let a = g.zip_map(f, |g, f| *g * f.conj());
    let b = f.map(|f| *f * f.conj());
    (a, b)
}

fn add_assign(acc: &mut Grid<Complex64>, other: &Grid<Complex64>) {
    acc.data_mut()
        .iter_mut()
        .zip(other.data())
        .for_each(|(x, y)| *x += *y);
}

impl FilterStrategy for MosseFilter {
    fn train<R: Rng>(
        &mut self,
        template: &Grid<f64>,
        desired: &Grid<f64>,
        augmenter: &mut Augmenter<R>,
    ) -> Result<()> {
        if self.train_steps < 1 {
            return Err(ConfigError::TrainSteps(self.train_steps).into());
        }
        self.check_shape(template)?;
        self.check_shape(desired)?;

        let g = self.spectral.forward(desired);

        // Draw sequentially so a seeded generator gives reproducible samples,
        // then sum the spectral terms in parallel.
        let samples: Vec<Grid<f64>> = (0..self.train_steps)
            .map(|_| augmenter.warp(template))
            .collect();

        let (rows, cols) = self.size;
        let zeros = || {
            (
                Grid::filled(rows, cols, Complex64::new(0.0, 0.0)),
                Grid::filled(rows, cols, Complex64::new(0.0, 0.0)),
            )
        };

        let (a, mut b) = samples
            .par_iter()
            .map(|sample| -> Result<_> {
                let f = self.sample_spectrum(sample)?;
                Ok(sample_terms(&g, &f))
            })
            .try_reduce(zeros, |(mut a1, mut b1), (a2, b2)| {
                add_assign(&mut a1, &a2);
                add_assign(&mut b1, &b2);
                Ok((a1, b1))
            })?;

        let regularization = (self.train_steps - 1) as f64 * self.eps;
        b.data_mut().iter_mut().for_each(|v| v.re += regularization);

        self.state = Some(FilterState::from_accumulators(a, b));

        tracing::info!(
            steps = self.train_steps,
            rows,
            cols,
            "correlation filter trained"
        );

        Ok(())
    }

    fn update(&mut self, template: &Grid<f64>, desired: &Grid<f64>, rate: f64) -> Result<()> {
        if self.state.is_none() {
            return Err(TrackerError::UntrainedFilter);
        }
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::LearningRate(rate).into());
        }
        self.check_shape(template)?;
        self.check_shape(desired)?;

        let f = self.sample_spectrum(template)?;
        let g = self.spectral.forward(desired);
        let (a_new, b_new) = sample_terms(&g, &f);
        let eps = self.eps;
        let keep = 1.0 - rate;

        let Some(state) = self.state.as_mut() else {
            return Err(TrackerError::UntrainedFilter);
        };

        state
            .a
            .data_mut()
            .iter_mut()
            .zip(a_new.data())
            .for_each(|(a, n)| *a = *a * keep + *n * rate);
        state
            .b
            .data_mut()
            .iter_mut()
            .zip(b_new.data())
            .for_each(|(b, n)| *b = *b * keep + (*n + eps) * rate);
        state.refresh();

        Ok(())
    }

    fn correlate(&self, template: &Grid<f64>) -> Result<Grid<Complex64>> {
        let state = self.state.as_ref().ok_or(TrackerError::UntrainedFilter)?;
        self.check_shape(template)?;

        let f = self.sample_spectrum(template)?;
        let product = f.zip_map(&state.h, |f, h| *f * h.conj());

        Ok(self.spectral.inverse(&product))
    }

    fn spatial_filter(&self) -> Result<Grid<Complex64>> {
        let state = self.state.as_ref().ok_or(TrackerError::UntrainedFilter)?;
        Ok(self.spectral.inverse(&state.h))
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    fn reset(&mut self) {
        self.state = None;
    }
}
