//! Desired filter output: a 2D Gaussian peaked on the target.

use crate::config::Config;
use crate::grid::Grid;

/// `g[r, c] = (value_range - 1) * exp(-(r - cr)^2 / (2 sr^2) - (c - cc)^2 / (2 sc^2))`
///
/// `size`, `center` and `sigma` are all given as (row, col).
pub fn gaussian_response(
    value_range: u32,
    size: (usize, usize),
    center: (f64, f64),
    sigma: (f64, f64),
) -> Grid<f64> {
    let amplitude = value_range.saturating_sub(1) as f64;
    let (cr, cc) = center;
    let row_denom = 2.0 * sigma.0 * sigma.0;
    let col_denom = 2.0 * sigma.1 * sigma.1;

    Grid::from_fn(size.0, size.1, |r, c| {
        let dr = r as f64 - cr;
        let dc = c as f64 - cc;
        amplitude * (-(dr * dr) / row_denom - (dc * dc) / col_denom).exp()
    })
}

/// Gaussian centered on the template center, where every crop puts the target.
pub fn desired_response(config: &Config) -> Grid<f64> {
    let (cr, cc) = config.template_center();
    gaussian_response(
        config.value_range,
        config.temp_size,
        (cr as f64, cc as f64),
        config.sigma,
    )
}

#[cfg(test)]
mod tests {
    use common::float_ext::FloatExt;

    use super::*;

    #[test]
    fn peak_at_center_equals_range_minus_one() {
        let g = gaussian_response(256, (32, 32), (16.0, 16.0), (2.0, 2.0));
        assert!(g[(16, 16)].approximately_eq(255.0));
        assert_eq!(g.max(), Some(g[(16, 16)]));
    }

    #[test]
    fn strictly_decreases_away_from_center() {
        let g = gaussian_response(256, (32, 40), (16.0, 20.0), (3.0, 5.0));

        for r in 16..31 {
            assert!(g[(r + 1, 20)] < g[(r, 20)]);
        }
        for r in 1..=16 {
            assert!(g[(r - 1, 20)] < g[(r, 20)]);
        }
        for c in 20..30 {
            assert!(g[(16, c + 1)] < g[(16, c)]);
        }
        for c in 1..=20 {
            assert!(g[(16, c - 1)] < g[(16, c)]);
        }
    }

    #[test]
    fn sigma_is_applied_per_axis() {
        let g = gaussian_response(2, (21, 21), (10.0, 10.0), (1.0, 4.0));

        // One sigma along each axis gives exp(-1/2).
        let expected = (-0.5f64).exp();
        assert!(g[(11, 10)].approximately_eq(expected));
        assert!(g[(10, 14)].approximately_eq(expected));
    }

    #[test]
    fn zero_value_range_gives_flat_response() {
        let g = gaussian_response(0, (8, 8), (4.0, 4.0), (2.0, 2.0));
        assert!(g.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn desired_response_uses_template_center() {
        let config = Config {
            temp_size: (16, 24),
            value_range: 100,
            ..Default::default()
        };
        let g = desired_response(&config);

        assert_eq!(g.shape(), (16, 24));
        assert!(g[(8, 12)].approximately_eq(99.0));
    }
}
