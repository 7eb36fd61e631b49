//! MOSSE - correlation-filter single-target tracking.
//!
//! A Minimum Output Sum of Squared Error filter is bootstrapped from one
//! annotated frame, then correlated against every following frame to
//! relocate the target and refined online with a running average.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mosse::{Config, Position, Tracker};
//!
//! let mut tracker = Tracker::with_seed(Config::default(), 7)?;
//! tracker.set_position(Position::new(240, 320));
//!
//! for frame in &frames {
//!     let output = tracker.step(frame)?;
//!     println!("{}: {}", output.iteration, output.position);
//! }
//! ```

pub mod augment;
pub mod config;
pub mod error;
pub mod filter;
pub mod frame;
pub mod grid;
pub mod localize;
pub mod preprocess;
pub mod response;
pub mod spectral;
pub mod tracker;

#[cfg(test)]
pub mod testing;

pub mod prelude;

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{BoundaryPolicy, Config};
pub use error::{ConfigError, FrameSourceError, Result, TrackerError};

// ============================================================================
// Images and geometry
// ============================================================================

pub use frame::{Crop, Frame, Position, crop, gray_from_u8, rgb_to_gray};
pub use grid::Grid;

// ============================================================================
// Signal processing
// ============================================================================

pub use augment::{Augmenter, Perturbation};
pub use preprocess::{cosine_window, hann_window, preprocess};
pub use response::{desired_response, gaussian_response};
pub use spectral::{Spectral, fft_shift, ifft_shift, magnitude};

// ============================================================================
// Filter and localization
// ============================================================================

pub use filter::{FilterState, FilterStrategy, MosseFilter, derive_filter};
pub use localize::{Peak, locate, peak, remap};

// ============================================================================
// Tracking
// ============================================================================

pub use tracker::{
    ArtifactSink, FrameSource, IterSource, StepOutput, Tracker, TrackerState, scale_to_range,
};

// Complex sample type used by spectra and responses.
pub use rustfft::num_complex::Complex64;
