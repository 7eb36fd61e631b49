//! Benchmark for correlation filter operations.

use criterion::{Criterion, criterion_group, criterion_main};

fn benchmarks(c: &mut Criterion) {
    mosse::filter::bench::benchmarks(c);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
