use thiserror::Error;

use crate::frame::Position;

/// Invalid tracker configuration. Reported when a session is constructed;
/// values are never clamped into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("value_range must be at least 2, got {0}")]
    ValueRange(u32),

    #[error("temp_size must be positive and even in both axes, got {rows}x{cols}")]
    TempSize { rows: usize, cols: usize },

    #[error("sigma must be positive and finite in both axes, got ({0}, {1})")]
    Sigma(f64, f64),

    #[error("eps must be positive and finite, got {0}")]
    Eps(f64),

    #[error("train_steps must be at least 1, got {0}")]
    TrainSteps(usize),

    #[error("learning_rate {0} is outside the allowed range")]
    LearningRate(f64),
}

/// Failure reported by a [`crate::FrameSource`] implementation.
#[derive(Debug, Error)]
#[error("frame source failed: {message}")]
pub struct FrameSourceError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FrameSourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "crop of {}x{} centered at {position} leaves the {}x{} frame",
        size.0, size.1, frame.0, frame.1
    )]
    OutOfBoundsCrop {
        position: Position,
        size: (usize, usize),
        frame: (usize, usize),
    },

    #[error("filter used before it was trained")]
    UntrainedFilter,

    #[error("tracker has no target position; call set_position first")]
    NotInitialized,

    #[error("input array is empty")]
    EmptyInput,

    #[error("filter response has no finite peak")]
    NoFinitePeak,

    #[error("expected a {}x{} array, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error(
        "frame size changed mid-session from {}x{} to {}x{}",
        expected.0, expected.1, actual.0, actual.1
    )]
    FrameSizeChanged {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error(transparent)]
    FrameSource(#[from] FrameSourceError),

    #[error("frame source is exhausted")]
    EndOfSequence,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
