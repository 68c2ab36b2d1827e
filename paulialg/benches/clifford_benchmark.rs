extern crate criterion;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use paulialg::clifford::synthesis::{synthesize_gaussian, synthesize_optimal};
use paulialg::Clifford;
use rand::prelude::*;

pub fn compose_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("Clifford::compose");
    for size in [8usize, 24usize, 48usize] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(
                || (random_clifford(*size), random_clifford(*size)),
                |pair| pair.0.compose(&pair.1),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

pub fn inverse_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("Clifford::inverse");
    for size in [8usize, 24usize, 48usize] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(|| random_clifford(*size), |clifford| clifford.inverse(), BatchSize::LargeInput);
        });
    }
    group.finish();
}

pub fn synthesis_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("Clifford::synthesize_gaussian");
    for size in [4usize, 16usize, 64usize] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(
                || random_clifford(*size),
                |clifford| synthesize_gaussian(&clifford),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();

    let mut group = criterion.benchmark_group("Clifford::synthesize_optimal");
    for size in [1usize, 2usize, 3usize] {
        // the lookup table is built once, outside the timed loop
        let _ = synthesize_optimal(&Clifford::identity(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(
                || random_clifford(*size),
                |clifford| synthesize_optimal(&clifford),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, compose_benchmark, inverse_benchmark, synthesis_benchmark);
criterion_main!(benches);

fn random_clifford(num_qubits: usize) -> Clifford {
    Clifford::random(num_qubits, &mut thread_rng())
}
