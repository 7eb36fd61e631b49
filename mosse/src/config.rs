//! Tracker configuration.
//!
//! Defaults reproduce the reference MOSSE parameters: 128x128 templates,
//! a 2-pixel Gaussian target, 256 bootstrap samples and a 1/8 learning rate.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to do when a crop window reaches past the frame border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Fail the step with [`crate::TrackerError::OutOfBoundsCrop`].
    #[default]
    Reject,
    /// Replicate the nearest edge pixel and flag the crop as clamped.
    Clamp,
}

/// Session configuration. Immutable once a tracker is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of representable intensity levels (256 for 8-bit frames).
    pub value_range: u32,
    /// Template size as (rows, cols). Both must be positive and even.
    pub temp_size: (usize, usize),
    /// Standard deviations of the desired Gaussian response as (row, col).
    pub sigma: (f64, f64),
    /// Regularization added to the filter denominator and the std normalization.
    pub eps: f64,
    /// Number of perturbed samples used to bootstrap the filter.
    pub train_steps: usize,
    /// Weight of the newest sample in the running average.
    pub learning_rate: f64,
    pub boundary: BoundaryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            value_range: 256,
            temp_size: (128, 128),
            sigma: (2.0, 2.0),
            eps: 0.1,
            train_steps: 256,
            learning_rate: 0.125,
            boundary: BoundaryPolicy::Reject,
        }
    }
}

impl Config {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.value_range < 2 {
            return Err(ConfigError::ValueRange(self.value_range));
        }

        let (rows, cols) = self.temp_size;
        if rows == 0 || cols == 0 || rows % 2 != 0 || cols % 2 != 0 {
            return Err(ConfigError::TempSize { rows, cols });
        }

        let (sr, sc) = self.sigma;
        if !(sr.is_finite() && sc.is_finite() && sr > 0.0 && sc > 0.0) {
            return Err(ConfigError::Sigma(sr, sc));
        }

        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(ConfigError::Eps(self.eps));
        }

        if self.train_steps < 1 {
            return Err(ConfigError::TrainSteps(self.train_steps));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }

        Ok(())
    }

    /// Template center in template coordinates, `(rows / 2, cols / 2)`.
    #[inline]
    pub fn template_center(&self) -> (usize, usize) {
        (self.temp_size.0 / 2, self.temp_size.1 / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_odd_or_empty_template() {
        for temp_size in [(0, 64), (64, 0), (63, 64), (64, 65)] {
            let config = Config {
                temp_size,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::TempSize {
                    rows: temp_size.0,
                    cols: temp_size.1
                })
            );
        }
    }

    #[test]
    fn rejects_non_positive_numeric_parameters() {
        let cases = [
            (
                Config {
                    value_range: 1,
                    ..Default::default()
                },
                ConfigError::ValueRange(1),
            ),
            (
                Config {
                    sigma: (2.0, 0.0),
                    ..Default::default()
                },
                ConfigError::Sigma(2.0, 0.0),
            ),
            (
                Config {
                    eps: 0.0,
                    ..Default::default()
                },
                ConfigError::Eps(0.0),
            ),
            (
                Config {
                    train_steps: 0,
                    ..Default::default()
                },
                ConfigError::TrainSteps(0),
            ),
            (
                Config {
                    learning_rate: 0.0,
                    ..Default::default()
                },
                ConfigError::LearningRate(0.0),
            ),
            (
                Config {
                    learning_rate: 1.5,
                    ..Default::default()
                },
                ConfigError::LearningRate(1.5),
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn rejects_nan_eps() {
        let config = Config {
            eps: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Eps(_))));
    }

    #[test]
    fn full_learning_rate_is_allowed() {
        let config = Config {
            learning_rate: 1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn yaml_with_missing_fields_uses_defaults() {
        let yaml = "temp_size: [64, 32]\nboundary: clamp\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();

        assert_eq!(config.temp_size, (64, 32));
        assert_eq!(config.boundary, BoundaryPolicy::Clamp);
        assert_eq!(config.train_steps, 256);
        assert_eq!(config.eps, 0.1);
    }

    #[test]
    fn template_center_is_half_size() {
        let config = Config {
            temp_size: (64, 32),
            ..Default::default()
        };
        assert_eq!(config.template_center(), (32, 16));
    }
}
