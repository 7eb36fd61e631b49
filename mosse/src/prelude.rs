//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use mosse::prelude::*;
//! ```

// Session
pub use crate::{BoundaryPolicy, Config, Tracker, TrackerError, TrackerState};

// Data
pub use crate::{Frame, Grid, Position, StepOutput};

// Seams
pub use crate::{ArtifactSink, FilterStrategy, FrameSource, IterSource, MosseFilter};
