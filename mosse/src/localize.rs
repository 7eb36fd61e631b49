//! Response peak search and remap into frame coordinates.

use rustfft::num_complex::Complex64;

use crate::frame::Position;
use crate::grid::Grid;

/// Location and magnitude of the strongest response bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub row: usize,
    pub col: usize,
    pub magnitude: f64,
}

/// Finds the maximum-magnitude element of `response`.
///
/// Ties resolve to the first occurrence in row-major order. NaN entries never
/// win. Returns `None` for an empty response.
pub fn peak(response: &Grid<Complex64>) -> Option<Peak> {
    let cols = response.cols();
    let mut best: Option<Peak> = None;

    for (i, v) in response.data().iter().enumerate() {
        let magnitude = v.norm();
        if magnitude.is_nan() {
            continue;
        }
        if best.map_or(true, |b| magnitude > b.magnitude) {
            best = Some(Peak {
                row: i / cols,
                col: i % cols,
                magnitude,
            });
        }
    }

    best
}

/// Converts a template-local peak into a frame position, assuming the
/// template was cropped centered on `previous`:
/// `new = previous + peak - temp_size / 2`.
pub fn remap(peak: &Peak, previous: Position, temp_size: (usize, usize)) -> Position {
    Position::new(
        previous.row + peak.row as isize - (temp_size.0 / 2) as isize,
        previous.col + peak.col as isize - (temp_size.1 / 2) as isize,
    )
}

/// Peak search followed by [`remap`]. An empty response keeps `previous`.
pub fn locate(
    response: &Grid<Complex64>,
    previous: Position,
    temp_size: (usize, usize),
) -> Position {
    match peak(response) {
        Some(p) => remap(&p, previous, temp_size),
        None => previous,
    }
}
