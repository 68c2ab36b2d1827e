//! Decomposition of Clifford tableaux into `H`, `S`, `CX` and Pauli gates.
//!
//! Both algorithms reduce a working copy of the tableau to the identity by appending gates and
//! return the inverse of the recorded sequence, so [`Clifford::from_circuit`] of the result
//! reproduces the input, phases included.

use super::canonical::{canonical_table, generator_moves, GateCost, SmallTableau, MAX_CANONICAL_QUBITS};
use super::Clifford;
use crate::error::{AlgebraError, AlgebraResult};
use crate::operations::{Circuit, GateKind, Instruction};
use binar::Bitwise;
use tracing::{debug, instrument};

/// Largest qubit count handled by [`synthesize_optimal`].
pub const MAX_OPTIMAL_QUBITS: usize = MAX_CANONICAL_QUBITS;

struct Reduction {
    tableau: Clifford,
    gates: Circuit,
}

impl Reduction {
    fn new(clifford: &Clifford) -> Self {
        Reduction {
            tableau: clifford.clone(),
            gates: Vec::new(),
        }
    }

    fn apply(&mut self, gate: GateKind, qubits: &[usize]) {
        self.tableau.apply_gate(gate, qubits);
        self.gates.push(Instruction::new(gate, qubits.to_vec()));
    }

    fn x_bit(&self, row: usize, qubit: usize) -> bool {
        self.tableau.images()[row].x_bits().index(qubit)
    }

    fn z_bit(&self, row: usize, qubit: usize) -> bool {
        self.tableau.images()[row].z_bits().index(qubit)
    }

    /// Brings the image of `X_qubit` to `±X_qubit`, assuming lower qubits are already reduced.
    fn reduce_x_row(&mut self, qubit: usize) {
        let num_qubits = self.tableau.num_qubits();
        let row = qubit;
        let pivot = match (qubit..num_qubits).find(|&other| self.x_bit(row, other)) {
            Some(pivot) => pivot,
            None => {
                let Some(pivot) = (qubit..num_qubits).find(|&other| self.z_bit(row, other)) else {
                    unreachable!("image of X{qubit} must act on qubits {qubit}..{num_qubits}");
                };
                self.apply(GateKind::H, &[pivot]);
                pivot
            }
        };
        if pivot != qubit {
            self.apply(GateKind::CX, &[qubit, pivot]);
            self.apply(GateKind::CX, &[pivot, qubit]);
            self.apply(GateKind::CX, &[qubit, pivot]);
        }
        for other in qubit + 1..num_qubits {
            if self.x_bit(row, other) {
                self.apply(GateKind::CX, &[qubit, other]);
            }
        }
        if self.z_bit(row, qubit) {
            self.apply(GateKind::S, &[qubit]);
        }
        for other in qubit + 1..num_qubits {
            if self.z_bit(row, other) {
                self.apply(GateKind::H, &[other]);
                self.apply(GateKind::CX, &[qubit, other]);
                self.apply(GateKind::H, &[other]);
            }
        }
    }

    /// Brings the image of `Z_qubit` to `±Z_qubit` once the image of `X_qubit` is `±X_qubit`.
    fn reduce_z_row(&mut self, qubit: usize) {
        let num_qubits = self.tableau.num_qubits();
        let row = num_qubits + qubit;
        for other in qubit + 1..num_qubits {
            if self.x_bit(row, other) {
                if self.z_bit(row, other) {
                    self.apply(GateKind::S, &[other]);
                }
                self.apply(GateKind::H, &[other]);
            }
            if self.z_bit(row, other) {
                self.apply(GateKind::CX, &[other, qubit]);
            }
        }
        if self.x_bit(row, qubit) {
            self.apply(GateKind::H, &[qubit]);
            self.apply(GateKind::S, &[qubit]);
            self.apply(GateKind::H, &[qubit]);
        }
    }

    /// Clears the signs left on a tableau with identity symplectic part and returns the
    /// circuit of the original tableau.
    fn finish(mut self) -> Circuit {
        for qubit in 0..self.tableau.num_qubits() {
            let x_negative = self.tableau.image_x(qubit).xz_phase_exponent() == 2;
            let z_negative = self.tableau.image_z(qubit).xz_phase_exponent() == 2;
            let correction = match (x_negative, z_negative) {
                (true, true) => GateKind::Y,
                (true, false) => GateKind::Z,
                (false, true) => GateKind::X,
                (false, false) => continue,
            };
            self.apply(correction, &[qubit]);
        }
        debug_assert!(self.tableau.is_identity());
        self.gates.iter().rev().map(Instruction::inverse).collect()
    }
}

/// Circuit with the fewest `CX` gates, for at most [`MAX_OPTIMAL_QUBITS`] qubits.
///
/// Among those, the number of `H`, `S` and `Sdg` gates is also minimal; ties are broken by
/// generator priority (`H`, then `S`, then `CX`, lowest qubits first). Sign corrections add at
/// most one Pauli gate per qubit.
///
/// # Errors
///
/// [`AlgebraError::Validation`] for more than [`MAX_OPTIMAL_QUBITS`] qubits.
pub fn synthesize_optimal(clifford: &Clifford) -> AlgebraResult<Circuit> {
    if clifford.num_qubits() > MAX_OPTIMAL_QUBITS {
        return Err(AlgebraError::Validation(format!(
            "optimal synthesis handles at most {MAX_OPTIMAL_QUBITS} qubits, got {}",
            clifford.num_qubits()
        )));
    }
    Ok(synthesize_optimal_unchecked(clifford))
}

#[instrument(level = "trace", skip_all, fields(num_qubits = clifford.num_qubits()))]
pub(crate) fn synthesize_optimal_unchecked(clifford: &Clifford) -> Circuit {
    let num_qubits = clifford.num_qubits();
    let mut reduction = Reduction::new(clifford);
    let Some(table) = canonical_table(num_qubits) else {
        return reduction.finish();
    };
    let moves = generator_moves(num_qubits);
    loop {
        let state = SmallTableau::from_clifford(&reduction.tableau);
        let Some(cost) = table.cost(&state) else {
            unreachable!("every symplectic matrix on {num_qubits} qubits is tabulated");
        };
        if cost == GateCost::default() {
            break;
        }
        // Moves are involutions, so the cost to the identity equals the tabulated cost.
        let step = moves.iter().find(|instruction| {
            let next = state.after(std::slice::from_ref(*instruction));
            table.cost(&next).map(|rest| rest + GateCost::of(instruction.gate)) == Some(cost)
        });
        let Some(step) = step else {
            unreachable!("some generator lies on a cheapest path to the identity");
        };
        reduction.apply(step.gate, &step.qubits);
    }
    let circuit = reduction.finish();
    debug!(
        num_qubits,
        gates = circuit.len(),
        cx_count = circuit.iter().filter(|instruction| instruction.gate == GateKind::CX).count(),
        "synthesized Clifford by exact search"
    );
    circuit
}

/// Circuit from Gaussian elimination over GF(2), valid for any qubit count.
///
/// Qubit by qubit, the image of `X_i` is reduced to `±X_i` (pivot swap, `CX` to clear x bits,
/// `S` and conjugated `CX` to clear z bits), then the image of `Z_i` to `±Z_i`. Remaining signs
/// are cleared with Pauli gates.
#[must_use]
#[instrument(level = "trace", skip_all, fields(num_qubits = clifford.num_qubits()))]
pub fn synthesize_gaussian(clifford: &Clifford) -> Circuit {
    let mut reduction = Reduction::new(clifford);
    for qubit in 0..clifford.num_qubits() {
        reduction.reduce_x_row(qubit);
        reduction.reduce_z_row(qubit);
    }
    let circuit = reduction.finish();
    debug!(
        num_qubits = clifford.num_qubits(),
        gates = circuit.len(),
        "synthesized Clifford by Gaussian elimination"
    );
    circuit
}
