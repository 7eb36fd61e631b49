//! Benchmark module for the correlation filter.
//! Run with: cargo bench -p mosse --features bench --bench filter

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};

use super::{FilterStrategy, MosseFilter};
use crate::augment::Augmenter;
use crate::grid::Grid;
use crate::response::gaussian_response;

/// Register filter benchmarks with Criterion.
pub fn benchmarks(c: &mut Criterion) {
    benchmark_train(c);
    benchmark_correlate(c);
}

fn textured_template(size: usize) -> Grid<f64> {
    let half = size as f64 / 2.0;
    Grid::from_fn(size, size, |r, c| {
        let dr = r as f64 - half;
        let dc = c as f64 - half;
        40.0 + 180.0 * (-(dr * dr + dc * dc) / (size as f64)).exp() + ((r * 7 + c * 3) % 11) as f64
    })
}

fn centered_response(size: usize) -> Grid<f64> {
    let half = size as f64 / 2.0;
    gaussian_response(256, (size, size), (half, half), (2.0, 2.0))
}

fn benchmark_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("mosse_train");
    group.sample_size(10);

    for size in [64, 128] {
        let template = textured_template(size);
        let desired = centered_response(size);

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::new("train_64_steps", format!("{size}x{size}")), |b| {
            b.iter(|| {
                let mut filter = MosseFilter::from_parts((size, size), 0.1, 64);
                let mut augmenter = Augmenter::seeded(0);
                filter
                    .train(black_box(&template), black_box(&desired), &mut augmenter)
                    .unwrap();
                black_box(filter)
            })
        });
    }

    group.finish();
}

fn benchmark_correlate(c: &mut Criterion) {
    let mut group = c.benchmark_group("mosse_correlate");

    for size in [64, 128, 256] {
        let template = textured_template(size);
        let desired = centered_response(size);
        let mut filter = MosseFilter::from_parts((size, size), 0.1, 8);
        filter
            .train(&template, &desired, &mut Augmenter::seeded(0))
            .unwrap();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::new("correlate", format!("{size}x{size}")), |b| {
            b.iter(|| black_box(filter.correlate(black_box(&template)).unwrap()))
        });
        group.bench_function(BenchmarkId::new("update", format!("{size}x{size}")), |b| {
            b.iter(|| {
                filter
                    .update(black_box(&template), black_box(&desired), 0.125)
                    .unwrap()
            })
        });
    }

    group.finish();
}
