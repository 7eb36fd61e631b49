//! Example: Track a synthetic target drifting across a textured background
//!
//! Frames are generated in memory: a bright blob moves along a slow curve over
//! a fixed noise pattern. The tracker is bootstrapped at the true position of
//! the first frame and every step is compared against ground truth.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p mosse --example synthetic_track
//! RUST_LOG=mosse=debug cargo run -p mosse --example synthetic_track
//! ```

use std::time::Instant;

use anyhow::Result;
use mosse::{Config, Frame, Grid, IterSource, Position, StepOutput, Tracker, scale_to_range};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const ROWS: usize = 240;
const COLS: usize = 320;
const FRAMES: usize = 60;

fn main() -> Result<()> {
    common::log_setup::setup_logging("info", None);

    let config = Config {
        temp_size: (64, 64),
        train_steps: 128,
        ..Default::default()
    };

    let background = noise_background(11);
    let truth: Vec<Position> = (0..FRAMES).map(target_center).collect();
    let frames = truth.clone().into_iter().map(|p| render(&background, p));

    let mut tracker = Tracker::with_seed(config.clone(), 42)?;
    tracker.set_position(truth[0]);

    let mut worst = 0isize;
    let mut sink = |output: &StepOutput| {
        let expected = truth[output.iteration - 1];
        let offset = output.position - expected;
        let error = offset.row.abs() + offset.col.abs();
        worst = worst.max(error);

        let response = scale_to_range(&output.response_magnitude, config.value_range);
        tracing::info!(
            iteration = output.iteration,
            position = %output.position,
            expected = %expected,
            response_peak = response.max().unwrap_or(0.0),
            "tracked"
        );
    };

    let start = Instant::now();
    let processed = tracker.run(&mut IterSource::new(frames), &mut sink)?;
    let elapsed = start.elapsed();

    tracing::info!(
        frames = processed,
        worst_l1_error = worst,
        ms_per_frame = elapsed.as_secs_f64() * 1000.0 / processed as f64,
        "done"
    );

    Ok(())
}

/// Slow Lissajous drift around the frame center.
fn target_center(frame: usize) -> Position {
    let t = frame as f64 * 0.05;
    Position::new(
        (ROWS as f64 / 2.0 + 40.0 * (1.3 * t).sin()).round() as isize,
        (COLS as f64 / 2.0 + 70.0 * t.sin()).round() as isize,
    )
}

fn noise_background(seed: u64) -> Grid<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Grid::from_fn(ROWS, COLS, |_, _| rng.random_range(20.0..60.0))
}

fn render(background: &Grid<f64>, center: Position) -> Frame {
    Grid::from_fn(ROWS, COLS, |r, c| {
        let dr = r as f64 - center.row as f64;
        let dc = c as f64 - center.col as f64;
        let blob = 180.0 * (-(dr * dr) / 50.0 - (dc * dc) / 120.0).exp();
        let stripe = if dr.abs() < 2.0 && dc.abs() < 10.0 { 15.0 } else { 0.0 };
        (background[(r, c)] + blob + stripe).min(255.0)
    })
}
