//! Single-target tracking session.
//!
//! A [`Tracker`] moves through three phases:
//!
//! ```text
//! Uninitialized --set_position--> Ready --step--> Tracking --step--> Tracking
//!                                   ^                 |
//!                                   +--set_position---+
//! ```
//!
//! The first step after `set_position` bootstraps the filter from the crop at
//! that position. Every later step crops at the current position, correlates,
//! moves to the response peak and blends the crop at the new position into
//! the filter.


use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::augment::Augmenter;
use crate::config::Config;
use crate::error::{FrameSourceError, Result, TrackerError};
use crate::filter::{FilterStrategy, MosseFilter};
use crate::frame::{Frame, Position, crop};
use crate::grid::Grid;
use crate::localize::{Peak, peak, remap};
use crate::response::desired_response;
use crate::spectral::{ifft_shift, magnitude};

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No target position yet.
    Uninitialized,
    /// Position known, filter not trained.
    Ready,
    /// Filter trained; every step relocates the target.
    Tracking,
}

/// Everything one step produced. Handed to an [`ArtifactSink`].
#[derive(Debug, Clone)]
pub struct StepOutput {
    /// 1-based count of successful steps.
    pub iteration: usize,
    /// Target center after this step.
    pub position: Position,
    /// Crop the response was computed from. On the bootstrap step, the
    /// training crop.
    pub template: Grid<f64>,
    /// `|ifftshift(h)|` of the filter that produced `response_magnitude`,
    /// with its origin moved to the middle. On the bootstrap step, the
    /// freshly trained filter.
    pub filter_magnitude: Grid<f64>,
    /// `|response|`. On the bootstrap step this is the desired response.
    pub response_magnitude: Grid<f64>,
    pub peak: Peak,
    /// Any crop of this step needed edge replication.
    pub clamped: bool,
}

/// Supplies frames in sequence. `Ok(None)` ends the sequence.
pub trait FrameSource {
    fn next_frame(&mut self) -> std::result::Result<Option<Frame>, FrameSourceError>;
}

impl FrameSource for VecDeque<Frame> {
    fn next_frame(&mut self) -> std::result::Result<Option<Frame>, FrameSourceError> {
        Ok(self.pop_front())
    }
}

/// Adapts any frame iterator into a [`FrameSource`].
#[derive(Debug, Clone)]
pub struct IterSource<I>(pub I);

impl<I> IterSource<I> {
    pub fn new(frames: I) -> Self {
        Self(frames)
    }
}

impl<I: Iterator<Item = Frame>> FrameSource for IterSource<I> {
    fn next_frame(&mut self) -> std::result::Result<Option<Frame>, FrameSourceError> {
        Ok(self.0.next())
    }
}

/// Receives per-step artifacts. Delivery is fire-and-forget.
pub trait ArtifactSink {
    fn accept(&mut self, output: &StepOutput);
}

impl<F: FnMut(&StepOutput)> ArtifactSink for F {
    fn accept(&mut self, output: &StepOutput) {
        self(output)
    }
}

/// Discards every artifact.
impl ArtifactSink for () {
    fn accept(&mut self, _output: &StepOutput) {}
}

/// Scales `grid` so its maximum becomes `value_range - 1`, for display.
/// Grids whose maximum is not positive are returned unchanged.
pub fn scale_to_range(grid: &Grid<f64>, value_range: u32) -> Grid<f64> {
    match grid.max() {
        Some(max) if max > 0.0 => {
            let factor = value_range.saturating_sub(1) as f64 / max;
            grid.map(|v| v * factor)
        }
        _ => grid.clone(),
    }
}

/// Correlation-filter tracker for one target.
#[derive(Debug)]
pub struct Tracker<F: FilterStrategy = MosseFilter, R: Rng = ChaCha8Rng> {
    config: Config,
    filter: F,
    augmenter: Augmenter<R>,
    desired: Grid<f64>,
    position: Option<Position>,
    state: TrackerState,
    frame_shape: Option<(usize, usize)>,
    iteration: usize,
}

impl Tracker {
    /// MOSSE tracker with augmentation seeded from the operating system.
    pub fn new(config: Config) -> Result<Self> {
        let filter = MosseFilter::new(&config)?;
        Self::with_parts(config, filter, Augmenter::from_entropy())
    }

    /// MOSSE tracker with reproducible augmentation.
    pub fn with_seed(config: Config, seed: u64) -> Result<Self> {
        let filter = MosseFilter::new(&config)?;
        Self::with_parts(config, filter, Augmenter::seeded(seed))
    }
}

impl<F: FilterStrategy, R: Rng> Tracker<F, R> {
    /// Assembles a tracker from a custom filter strategy and augmenter.
    /// The filter must work on `config.temp_size` templates.
    pub fn with_parts(config: Config, filter: F, augmenter: Augmenter<R>) -> Result<Self> {
        config.validate()?;
        let desired = desired_response(&config);

        Ok(Self {
            config,
            filter,
            augmenter,
            desired,
            position: None,
            state: TrackerState::Uninitialized,
            frame_shape: None,
            iteration: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    #[inline]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    #[inline]
    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Number of successful steps so far.
    #[inline]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Sets the target center. The next step retrains from scratch.
    pub fn set_position(&mut self, position: Position) {
        if self.state == TrackerState::Tracking {
            self.filter.reset();
        }
        self.position = Some(position);
        self.state = TrackerState::Ready;

        tracing::info!(position = %position, "target position set");
    }

    /// Processes one frame.
    ///
    /// A failed step leaves the session untouched: position, filter and
    /// phase only change when the whole step succeeds.
    pub fn step(&mut self, frame: &Frame) -> Result<StepOutput> {
        let previous = match (self.state, self.position) {
            (TrackerState::Uninitialized, _) | (_, None) => {
                return Err(TrackerError::NotInitialized);
            }
            (_, Some(position)) => position,
        };
        self.check_frame(frame)?;

        let iteration = self.iteration + 1;
        let output = match self.state {
            TrackerState::Ready => self.bootstrap(frame, previous, iteration)?,
            _ => self.track(frame, previous, iteration)?,
        };

        self.iteration = iteration;
        self.position = Some(output.position);
        self.state = TrackerState::Tracking;

        tracing::debug!(
            iteration,
            position = %output.position,
            peak_row = output.peak.row,
            peak_col = output.peak.col,
            peak_magnitude = output.peak.magnitude,
            clamped = output.clamped,
            "step"
        );

        Ok(output)
    }

    /// Pulls one frame from `source` and processes it.
    /// Fails with [`TrackerError::EndOfSequence`] when the source is exhausted.
    pub fn step_from<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> Result<StepOutput> {
        let frame = source.next_frame()?.ok_or(TrackerError::EndOfSequence)?;
        self.step(&frame)
    }

    /// Steps through `source` until it ends, handing each output to `sink`.
    /// Returns the number of processed frames.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<usize>
    where
        S: FrameSource + ?Sized,
        K: ArtifactSink + ?Sized,
    {
        let mut processed = 0;
        while let Some(frame) = source.next_frame()? {
            let output = self.step(&frame)?;
            sink.accept(&output);
            processed += 1;
        }

        tracing::info!(frames = processed, "sequence finished");
        Ok(processed)
    }

    fn check_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.is_empty() {
            return Err(TrackerError::EmptyInput);
        }
        match self.frame_shape {
            Some(expected) if expected != frame.shape() => Err(TrackerError::FrameSizeChanged {
                expected,
                actual: frame.shape(),
            }),
            Some(_) => Ok(()),
            None => {
                self.frame_shape = Some(frame.shape());
                Ok(())
            }
        }
    }

    fn bootstrap(
        &mut self,
        frame: &Frame,
        position: Position,
        iteration: usize,
    ) -> Result<StepOutput> {
        let window = crop(frame, position, self.config.temp_size, self.config.boundary)?;
        self.filter
            .train(&window.template, &self.desired, &mut self.augmenter)?;

        let (row, col) = self.config.template_center();
        let peak = Peak {
            row,
            col,
            magnitude: self.desired[(row, col)],
        };

        Ok(StepOutput {
            iteration,
            position,
            template: window.template,
            filter_magnitude: self.filter_magnitude()?,
            response_magnitude: self.desired.clone(),
            peak,
            clamped: window.clamped,
        })
    }

    fn track(&mut self, frame: &Frame, previous: Position, iteration: usize) -> Result<StepOutput> {
        let (temp_size, boundary) = (self.config.temp_size, self.config.boundary);

        let current = crop(frame, previous, temp_size, boundary)?;
        let response = self.filter.correlate(&current.template)?;
        let peak = peak(&response).ok_or(TrackerError::NoFinitePeak)?;
        let position = remap(&peak, previous, temp_size);
        let next = crop(frame, position, temp_size, boundary)?;

        // Report the filter that produced `response`, before it learns from `next`.
        let filter_magnitude = self.filter_magnitude()?;
        self.filter
            .update(&next.template, &self.desired, self.config.learning_rate)?;

        Ok(StepOutput {
            iteration,
            position,
            template: current.template,
            filter_magnitude,
            response_magnitude: magnitude(&response),
            peak,
            clamped: current.clamped || next.clamped,
        })
    }

    fn filter_magnitude(&self) -> Result<Grid<f64>> {
        Ok(magnitude(&ifft_shift(&self.filter.spatial_filter()?)))
    }
}
