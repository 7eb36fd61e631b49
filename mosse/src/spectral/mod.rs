//! 2D discrete Fourier transform of template-sized grids.
//!
//! Row and column transforms are planned once per size and reused for every
//! frame. The inverse is normalized by `1 / (rows * cols)` so that
//! `inverse(forward(x)) == x`.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::grid::Grid;

/// Planned forward and inverse 2D FFTs for a fixed `(rows, cols)` size.
#[derive(Clone)]
pub struct Spectral {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for Spectral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spectral")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl Spectral {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            row_forward: planner.plan_fft_forward(cols),
            row_inverse: planner.plan_fft_inverse(cols),
            col_forward: planner.plan_fft_forward(rows),
            col_inverse: planner.plan_fft_inverse(rows),
        }
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Forward transform of a real grid.
    pub fn forward(&self, input: &Grid<f64>) -> Grid<Complex64> {
        let mut data = input.map(|&v| Complex64::new(v, 0.0));
        self.process(&mut data, Direction::Forward);
        data
    }

    /// Forward transform of a complex grid.
    pub fn forward_complex(&self, input: &Grid<Complex64>) -> Grid<Complex64> {
        let mut data = input.clone();
        self.process(&mut data, Direction::Forward);
        data
    }

    /// Normalized inverse transform.
    pub fn inverse(&self, input: &Grid<Complex64>) -> Grid<Complex64> {
        let mut data = input.clone();
        self.process(&mut data, Direction::Inverse);

        let norm = 1.0 / (self.rows * self.cols) as f64;
        data.data_mut().iter_mut().for_each(|v| *v *= norm);
        data
    }

    fn process(&self, data: &mut Grid<Complex64>, direction: Direction) {
        assert_eq!(
            data.shape(),
            (self.rows, self.cols),
            "grid shape does not match planned transform size"
        );
        if data.is_empty() {
            return;
        }

        let (row_fft, col_fft) = match direction {
            Direction::Forward => (&self.row_forward, &self.col_forward),
            Direction::Inverse => (&self.row_inverse, &self.col_inverse),
        };

        // Rows are contiguous, transform them in place.
        for row in data.data_mut().chunks_exact_mut(self.cols) {
            row_fft.process(row);
        }

        // Columns are strided, gather into a scratch line.
        let mut line = vec![Complex64::new(0.0, 0.0); self.rows];
        for c in 0..self.cols {
            for (r, v) in line.iter_mut().enumerate() {
                *v = data[(r, c)];
            }
            col_fft.process(&mut line);
            for (r, v) in line.iter().enumerate() {
                data[(r, c)] = *v;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Inverse,
}

/// Moves the zero-frequency bin to the center (numpy `fftshift`).
pub fn fft_shift<T: Clone>(grid: &Grid<T>) -> Grid<T> {
    let (rows, cols) = grid.shape();
    Grid::from_fn(rows, cols, |r, c| {
        grid[((r + (rows - rows / 2)) % rows, (c + (cols - cols / 2)) % cols)].clone()
    })
}

/// Inverse of [`fft_shift`] (numpy `ifftshift`). Identical for even sizes.
pub fn ifft_shift<T: Clone>(grid: &Grid<T>) -> Grid<T> {
    let (rows, cols) = grid.shape();
    Grid::from_fn(rows, cols, |r, c| {
        grid[((r + rows / 2) % rows, (c + cols / 2) % cols)].clone()
    })
}

/// Elementwise magnitude of a complex grid.
pub fn magnitude(grid: &Grid<Complex64>) -> Grid<f64> {
    grid.map(|v| v.norm())
}
