//! Cheapest `H`, `S`, `CX` sequences for every symplectic matrix on up to three qubits.
//!
//! Tables are built once by Dijkstra's algorithm from the identity, with costs compared by
//! `CX` count and then by total gate count, and are shared read-only afterwards.

use super::Clifford;
use crate::operations::{asymmetric_two_qubit_operations, qubit_operations, Circuit, GateKind, Instruction};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Add;
use tracing::debug;

pub const MAX_CANONICAL_QUBITS: usize = 3;

/// Symplectic part of a tableau on at most three qubits. Row `r` keeps its x bits in the low
/// `n` bits and its z bits in the next `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SmallTableau {
    rows: [u8; 2 * MAX_CANONICAL_QUBITS],
    num_qubits: usize,
}

impl SmallTableau {
    /// # Panics
    ///
    /// Panics for more than [`MAX_CANONICAL_QUBITS`] qubits.
    #[must_use]
    pub fn identity(num_qubits: usize) -> Self {
        assert!(num_qubits <= MAX_CANONICAL_QUBITS);
        let mut rows = [0; 2 * MAX_CANONICAL_QUBITS];
        for (row, bits) in rows.iter_mut().take(2 * num_qubits).enumerate() {
            *bits = 1 << row;
        }
        SmallTableau { rows, num_qubits }
    }

    /// # Panics
    ///
    /// Panics for more than [`MAX_CANONICAL_QUBITS`] qubits.
    #[must_use]
    pub fn from_clifford(clifford: &Clifford) -> Self {
        let num_qubits = clifford.num_qubits();
        assert!(num_qubits <= MAX_CANONICAL_QUBITS);
        let mut rows = [0; 2 * MAX_CANONICAL_QUBITS];
        for (bits, image) in rows.iter_mut().zip(clifford.images()) {
            *bits = (image.x_bits().low_word() | image.z_bits().low_word() << num_qubits) as u8;
        }
        SmallTableau { rows, num_qubits }
    }

    #[must_use]
    pub fn key(&self) -> u64 {
        self.rows
            .iter()
            .enumerate()
            .fold(0, |key, (row, &bits)| key | u64::from(bits) << (2 * MAX_CANONICAL_QUBITS * row))
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == SmallTableau::identity(self.num_qubits)
    }

    fn factor(&self, row: usize, qubit: usize) -> (bool, bool) {
        let bits = self.rows[row];
        (bits >> qubit & 1 == 1, bits >> (self.num_qubits + qubit) & 1 == 1)
    }

    fn assign_factor(&mut self, row: usize, qubit: usize, (x_bit, z_bit): (bool, bool)) {
        let x_mask = 1u8 << qubit;
        let z_mask = 1u8 << (self.num_qubits + qubit);
        let mut bits = self.rows[row] & !(x_mask | z_mask);
        if x_bit {
            bits |= x_mask;
        }
        if z_bit {
            bits |= z_mask;
        }
        self.rows[row] = bits;
    }

    /// Same action on the bits as [`Clifford::append_gate`], phases aside.
    pub fn apply_gate(&mut self, gate: GateKind, qubits: &[usize]) {
        for row in 0..2 * self.num_qubits {
            match gate {
                GateKind::H => {
                    let (x_bit, z_bit) = self.factor(row, qubits[0]);
                    self.assign_factor(row, qubits[0], (z_bit, x_bit));
                }
                GateKind::S | GateKind::Sdg => {
                    let (x_bit, z_bit) = self.factor(row, qubits[0]);
                    self.assign_factor(row, qubits[0], (x_bit, z_bit ^ x_bit));
                }
                GateKind::CX => {
                    let (control_x, control_z) = self.factor(row, qubits[0]);
                    let (target_x, target_z) = self.factor(row, qubits[1]);
                    self.assign_factor(row, qubits[1], (target_x ^ control_x, target_z));
                    self.assign_factor(row, qubits[0], (control_x, control_z ^ target_z));
                }
                GateKind::Swap => {
                    let first = self.factor(row, qubits[0]);
                    let second = self.factor(row, qubits[1]);
                    self.assign_factor(row, qubits[0], second);
                    self.assign_factor(row, qubits[1], first);
                }
                GateKind::CZ | GateKind::I | GateKind::X | GateKind::Y | GateKind::Z => {}
            }
        }
        if gate == GateKind::CZ {
            let target = [qubits[1]];
            self.apply_gate(GateKind::H, &target);
            self.apply_gate(GateKind::CX, qubits);
            self.apply_gate(GateKind::H, &target);
        }
    }

    #[must_use]
    pub fn after(&self, instructions: &[Instruction]) -> SmallTableau {
        let mut res = *self;
        for instruction in instructions {
            res.apply_gate(instruction.gate, &instruction.qubits);
        }
        res
    }
}

/// Cost of a gate sequence, ordered by `CX` count first and total gate count second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GateCost {
    pub cx_count: u8,
    pub gate_count: u8,
}

impl GateCost {
    #[must_use]
    pub fn of(gate: GateKind) -> Self {
        GateCost {
            cx_count: u8::from(gate == GateKind::CX),
            gate_count: 1,
        }
    }
}

impl Add for GateCost {
    type Output = GateCost;

    fn add(self, other: GateCost) -> GateCost {
        GateCost {
            cx_count: self.cx_count + other.cx_count,
            gate_count: self.gate_count + other.gate_count,
        }
    }
}

/// The generators searched over, in priority order: `H` on each qubit, `S` on each qubit, then
/// `CX` on each ordered pair. Each acts as an involution on symplectic matrices.
#[must_use]
pub fn generator_moves(num_qubits: usize) -> Circuit {
    let mut moves = qubit_operations(num_qubits, GateKind::H);
    moves.append(&mut qubit_operations(num_qubits, GateKind::S));
    moves.append(&mut asymmetric_two_qubit_operations(num_qubits, GateKind::CX));
    moves
}

/// Least [`GateCost`] of a generator sequence reaching each symplectic matrix.
pub struct CanonicalTable {
    num_qubits: usize,
    costs: FxHashMap<u64, GateCost>,
}

impl CanonicalTable {
    fn build(num_qubits: usize) -> Self {
        let moves = generator_moves(num_qubits);
        let start = SmallTableau::identity(num_qubits);
        let mut costs = FxHashMap::default();
        costs.insert(start.key(), GateCost::default());
        let mut heap = BinaryHeap::from([Reverse((GateCost::default(), start))]);
        while let Some(Reverse((cost, state))) = heap.pop() {
            if costs.get(&state.key()).is_some_and(|&best| best < cost) {
                continue;
            }
            for instruction in &moves {
                let next = state.after(std::slice::from_ref(instruction));
                let candidate = cost + GateCost::of(instruction.gate);
                let improved = costs.get(&next.key()).map_or(true, |&known| candidate < known);
                if improved {
                    costs.insert(next.key(), candidate);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }
        debug!(num_qubits, states = costs.len(), "built canonical Clifford table");
        CanonicalTable { num_qubits, costs }
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of symplectic matrices in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    #[must_use]
    pub fn cost(&self, tableau: &SmallTableau) -> Option<GateCost> {
        self.costs.get(&tableau.key()).copied()
    }

    #[must_use]
    pub fn max_cost(&self) -> GateCost {
        self.costs.values().copied().max().unwrap_or_default()
    }
}

static ONE_QUBIT: Lazy<CanonicalTable> = Lazy::new(|| CanonicalTable::build(1));
static TWO_QUBITS: Lazy<CanonicalTable> = Lazy::new(|| CanonicalTable::build(2));
static THREE_QUBITS: Lazy<CanonicalTable> = Lazy::new(|| CanonicalTable::build(3));

/// Shared table for 1 to 3 qubits, built on first use.
#[must_use]
pub fn canonical_table(num_qubits: usize) -> Option<&'static CanonicalTable> {
    match num_qubits {
        1 => Some(&*ONE_QUBIT),
        2 => Some(&*TWO_QUBITS),
        3 => Some(&*THREE_QUBITS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Cheapest cost of every reachable state, settling all states with `k` CX gates before any
    /// with `k + 1`, and within one CX level by a bucket queue on the gate count.
    fn layered_costs(num_qubits: usize) -> HashMap<SmallTableau, GateCost> {
        let moves = generator_moves(num_qubits);
        let mut settled = HashMap::new();
        let mut seeds = vec![(SmallTableau::identity(num_qubits), 0u8)];
        for cx_count in 0u8.. {
            let mut buckets: Vec<Vec<SmallTableau>> = Vec::new();
            for (state, gate_count) in seeds.drain(..) {
                let bucket = usize::from(gate_count);
                if buckets.len() <= bucket {
                    buckets.resize(bucket + 1, Vec::new());
                }
                buckets[bucket].push(state);
            }
            let mut bucket = 0;
            while bucket < buckets.len() {
                for state in std::mem::take(&mut buckets[bucket]) {
                    if settled.contains_key(&state) {
                        continue;
                    }
                    let gate_count = bucket as u8;
                    settled.insert(state, GateCost { cx_count, gate_count });
                    for instruction in &moves {
                        let next = state.after(std::slice::from_ref(instruction));
                        if instruction.gate == GateKind::CX {
                            seeds.push((next, gate_count + 1));
                        } else {
                            if buckets.len() <= bucket + 1 {
                                buckets.push(Vec::new());
                            }
                            buckets[bucket + 1].push(next);
                        }
                    }
                }
                bucket += 1;
            }
            seeds.retain(|(state, _)| !settled.contains_key(state));
            if seeds.is_empty() {
                break;
            }
        }
        settled
    }

    #[test]
    fn table_sizes_match_symplectic_group_orders() {
        assert_eq!(canonical_table(1).unwrap().len(), 6);
        assert_eq!(canonical_table(2).unwrap().len(), 720);
        assert_eq!(
            canonical_table(1).unwrap().max_cost(),
            GateCost {
                cx_count: 0,
                gate_count: 3
            }
        );
        assert_eq!(canonical_table(2).unwrap().max_cost().cx_count, 3);
    }

    #[test]
    fn costs_agree_with_layered_search() {
        for num_qubits in 1..=2 {
            let table = canonical_table(num_qubits).unwrap();
            let expected = layered_costs(num_qubits);
            assert_eq!(expected.len(), table.len());
            for (state, cost) in expected {
                assert_eq!(table.cost(&state), Some(cost), "{state:?}");
            }
        }
    }

    #[test]
    fn gate_costs_order_cx_first() {
        let cx = GateCost::of(GateKind::CX);
        let h = GateCost::of(GateKind::H);
        assert!(h + h + h < cx);
        assert!(cx + h > cx);
        assert_eq!((cx + h).gate_count, 2);
    }

    #[test]
    fn small_tableau_tracks_clifford_bits() {
        let circuit = [
            Instruction::new(GateKind::H, vec![1]),
            Instruction::new(GateKind::CX, vec![1, 0]),
            Instruction::new(GateKind::S, vec![0]),
            Instruction::new(GateKind::CZ, vec![0, 1]),
        ];
        let clifford = Clifford::from_circuit(2, &circuit).unwrap();
        assert_eq!(SmallTableau::from_clifford(&clifford), SmallTableau::identity(2).after(&circuit));
    }
}
