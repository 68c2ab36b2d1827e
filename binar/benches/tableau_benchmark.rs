use binar::{BitMatrix, BitVec, BitwisePair};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::prelude::*;

const QUBIT_COUNTS: [usize; 3] = [8, 32, 128];

/// `S · Ω · Sᵀ`, the product behind every symplecticity check of a `2N × 2N` tableau.
pub fn symplectic_condition_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitMatrix::symplectic_condition");
    for num_qubits in QUBIT_COUNTS {
        group.sample_size(10);
        let omega = symplectic_form(num_qubits);
        group.bench_with_input(BenchmarkId::from_parameter(num_qubits), &num_qubits, |bencher, &num_qubits| {
            bencher.iter_batched(
                || random_tableau(num_qubits),
                |tableau| &(&tableau * &omega) * &tableau.transposed(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Composition of two tableaux.
pub fn compose_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitMatrix::mul");
    for num_qubits in QUBIT_COUNTS {
        group.sample_size(10);
        group.bench_with_input(BenchmarkId::from_parameter(num_qubits), &num_qubits, |bencher, &num_qubits| {
            bencher.iter_batched(
                || (random_tableau(num_qubits), random_tableau(num_qubits)),
                |(first, second)| &first * &second,
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Pairwise symplectic products and Y counts of the rows of a table, as in commutation tests
/// and Pauli phase bookkeeping.
pub fn row_products_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitVec::row_products");
    for num_qubits in QUBIT_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(num_qubits), &num_qubits, |bencher, &num_qubits| {
            bencher.iter_batched(
                || split_rows(&random_tableau(num_qubits), num_qubits),
                |rows| {
                    let mut anticommuting = 0usize;
                    let mut y_count = 0usize;
                    for (x_left, z_left) in &rows {
                        y_count += x_left.and_weight(z_left);
                        for (x_right, z_right) in &rows {
                            if x_left.dot(z_right) ^ z_left.dot(x_right) {
                                anticommuting += 1;
                            }
                        }
                    }
                    (anticommuting, y_count)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    symplectic_condition_benchmark,
    compose_benchmark,
    row_products_benchmark
);
criterion_main!(benches);

fn symplectic_form(num_qubits: usize) -> BitMatrix {
    let mut omega = BitMatrix::zeros(2 * num_qubits, 2 * num_qubits);
    for qubit in 0..num_qubits {
        omega.set((qubit, num_qubits + qubit), true);
        omega.set((num_qubits + qubit, qubit), true);
    }
    omega
}

fn random_tableau(num_qubits: usize) -> BitMatrix {
    let mut rng = thread_rng();
    let dimension = 2 * num_qubits;
    let rows = (0..dimension)
        .map(|_| (0..dimension).map(|_| rng.gen_bool(0.5)).collect::<BitVec>())
        .collect();
    BitMatrix::from_rows(rows, dimension)
}

fn split_rows(tableau: &BitMatrix, num_qubits: usize) -> Vec<(BitVec, BitVec)> {
    tableau
        .rows()
        .map(|row| (row.extract(0, num_qubits), row.extract(num_qubits, 2 * num_qubits)))
        .collect()
}
