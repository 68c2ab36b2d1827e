extern crate criterion;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use num_complex::Complex64;
use paulialg::{PauliTable, SparsePauliOp};
use rand::prelude::*;

pub fn compose_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("PauliTable::compose");
    for size in [10usize, 100usize, 1000usize] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(
                || (random_table(*size, 64), random_table(*size, 64)),
                |pair| pair.0.compose(&pair.1, None),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

pub fn sort_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("PauliTable::sort");
    for size in [100usize, 1000usize, 10000usize] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(
                || random_table(*size, 16),
                |table| table.sort(true),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

pub fn group_commuting_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("PauliTable::group_commuting");
    for size in [10usize, 100usize, 500usize] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(
                || random_table(*size, 8),
                |table| table.group_commuting(true),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

pub fn sparse_compose_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("SparsePauliOp::compose");
    for size in [4usize, 16usize, 64usize] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter_batched(
                || (random_op(*size, 12), random_op(*size, 12)),
                |pair| pair.0.compose(&pair.1, None),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    compose_benchmark,
    sort_benchmark,
    group_commuting_benchmark,
    sparse_compose_benchmark
);
criterion_main!(benches);

fn random_label(num_qubits: usize) -> String {
    (0..num_qubits)
        .map(|_| ['I', 'X', 'Y', 'Z'][thread_rng().gen_range(0..4)])
        .collect()
}

fn random_table(rows: usize, num_qubits: usize) -> PauliTable {
    let labels = (0..rows).map(|_| random_label(num_qubits)).collect::<Vec<_>>();
    PauliTable::from_labels(&labels).expect("random labels are well formed")
}

fn random_op(terms: usize, num_qubits: usize) -> SparsePauliOp {
    let terms = (0..terms).map(|_| {
        let coeff = Complex64::new(thread_rng().gen::<f64>(), thread_rng().gen::<f64>());
        (random_label(num_qubits), coeff)
    });
    SparsePauliOp::from_list(terms).expect("random labels are well formed")
}
