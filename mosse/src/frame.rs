//! Frames, target positions and template cropping.
//!
//! A [`Position`] always denotes the target CENTER. A template of size
//! `(h, w)` cropped at `p` covers rows `[p.row - h/2, p.row + h/2)` and
//! cols `[p.col - w/2, p.col + w/2)`, so the target lands on template pixel
//! `(h/2, w/2)`.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::config::BoundaryPolicy;
use crate::error::{Result, TrackerError};
use crate::grid::Grid;

/// Grayscale intensity image.
pub type Frame = Grid<f64>;

/// Target center in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub row: isize,
    pub col: isize,
}

impl Position {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }
}

impl From<(isize, isize)> for Position {
    fn from((row, col): (isize, isize)) -> Self {
        Self { row, col }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Result of cropping a template out of a frame.
#[derive(Debug, Clone)]
pub struct Crop {
    pub template: Grid<f64>,
    /// Set when part of the window fell outside the frame and edge pixels
    /// were replicated to fill it.
    pub clamped: bool,
}

/// Crops a `size = (rows, cols)` template centered at `center`.
pub fn crop(
    frame: &Frame,
    center: Position,
    size: (usize, usize),
    policy: BoundaryPolicy,
) -> Result<Crop> {
    if frame.is_empty() {
        return Err(TrackerError::EmptyInput);
    }

    let top = center.row - (size.0 / 2) as isize;
    let left = center.col - (size.1 / 2) as isize;
    let inside = top >= 0
        && left >= 0
        && top + size.0 as isize <= frame.rows() as isize
        && left + size.1 as isize <= frame.cols() as isize;

    if !inside && policy == BoundaryPolicy::Reject {
        return Err(TrackerError::OutOfBoundsCrop {
            position: center,
            size,
            frame: frame.shape(),
        });
    }

    let max_row = frame.rows() as isize - 1;
    let max_col = frame.cols() as isize - 1;
    let template = Grid::from_fn(size.0, size.1, |r, c| {
        let fr = (top + r as isize).clamp(0, max_row) as usize;
        let fc = (left + c as isize).clamp(0, max_col) as usize;
        frame[(fr, fc)]
    });

    if !inside {
        tracing::warn!(
            position = %center,
            rows = size.0,
            cols = size.1,
            "template window clamped at frame border"
        );
    }

    Ok(Crop {
        template,
        clamped: !inside,
    })
}

/// Converts interleaved 8-bit RGB to luma (ITU-R BT.601 weights).
///
/// # Panics
///
/// Panics if `rgb.len() != rows * cols * 3`.
pub fn rgb_to_gray(rows: usize, cols: usize, rgb: &[u8]) -> Frame {
    assert_eq!(rgb.len(), rows * cols * 3, "rgb length must be rows * cols * 3");
    let data = rgb
        .chunks_exact(3)
        .map(|px| 0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64)
        .collect();
    Grid::new(rows, cols, data)
}

/// Wraps 8-bit grayscale samples as a frame.
///
/// # Panics
///
/// Panics if `gray.len() != rows * cols`.
pub fn gray_from_u8(rows: usize, cols: usize, gray: &[u8]) -> Frame {
    Grid::new(rows, cols, gray.iter().map(|&v| v as f64).collect())
}
