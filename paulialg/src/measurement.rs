//! Measuring groups of qubit-wise commuting Paulis in one product basis.
//!
//! Outcome bitstrings are written like labels, most significant qubit first, so the last
//! character is the outcome of qubit 0.

use crate::error::{AlgebraError, AlgebraResult};
use crate::operations::{Circuit, GateKind, Instruction};
use crate::pauli::Pauli;
use crate::pauli_table::PauliTable;
use binar::{BitVec, Bitwise, BitwiseMut, BitwisePair, BitwisePairMut};
use tracing::trace;

/// Basis-change circuit and the qubits to read out afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementSetting {
    pub rotation: Circuit,
    pub measured_qubits: Vec<usize>,
}

/// One qubit-wise commuting group together with how to measure it.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementGroup {
    pub paulis: PauliTable,
    pub basis: Pauli,
    pub setting: MeasurementSetting,
    /// `paulis` restricted to `setting.measured_qubits`, diagonal after the rotation.
    pub measured: PauliTable,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expectation {
    pub value: f64,
    pub variance: f64,
}

/// Product basis measuring every row of a qubit-wise commuting group: the OR of its x and z
/// blocks.
///
/// # Errors
///
/// [`AlgebraError::Validation`] if two rows act differently on a shared qubit.
pub fn measurement_basis(group: &PauliTable) -> AlgebraResult<Pauli> {
    let num_qubits = group.num_qubits();
    let mut x_bits = BitVec::zeros(num_qubits);
    let mut z_bits = BitVec::zeros(num_qubits);
    for index in 0..group.len() {
        let (row_x, row_z) = group.row_bits(index);
        x_bits.bitor_assign(row_x);
        z_bits.bitor_assign(row_z);
    }
    for index in 0..group.len() {
        let (row_x, row_z) = group.row_bits(index);
        let conflict = (0..num_qubits).find(|&qubit| {
            (row_x.index(qubit) || row_z.index(qubit))
                && (row_x.index(qubit) != x_bits.index(qubit) || row_z.index(qubit) != z_bits.index(qubit))
        });
        if let Some(qubit) = conflict {
            return Err(AlgebraError::Validation(format!(
                "row {} ({}) does not commute qubit-wise with the group on qubit {qubit}",
                index,
                group.label(index)
            )));
        }
    }
    Ok(Pauli::from_hermitian_bits(x_bits, z_bits))
}

/// `Sdg` then `H` on Y qubits, `H` on X qubits, nothing on Z qubits.
///
/// An identity basis still reads out qubit 0.
#[must_use]
pub fn measurement_rotation(basis: &Pauli) -> MeasurementSetting {
    let mut rotation = Circuit::new();
    let mut measured_qubits = Vec::new();
    for qubit in 0..basis.num_qubits() {
        let (x_bit, z_bit) = (basis.x_bits().index(qubit), basis.z_bits().index(qubit));
        if x_bit {
            if z_bit {
                rotation.push(Instruction::new(GateKind::Sdg, vec![qubit]));
            }
            rotation.push(Instruction::new(GateKind::H, vec![qubit]));
        }
        if x_bit || z_bit {
            measured_qubits.push(qubit);
        }
    }
    if measured_qubits.is_empty() {
        measured_qubits.push(0);
    }
    MeasurementSetting {
        rotation,
        measured_qubits,
    }
}

/// Splits `table` into qubit-wise commuting groups and derives the measurement of each.
///
/// # Errors
///
/// Propagates [`measurement_basis`] failures, which cannot occur for groups produced by
/// [`PauliTable::group_commuting`].
pub fn measurement_groups(table: &PauliTable) -> AlgebraResult<Vec<MeasurementGroup>> {
    let groups = table
        .group_commuting(true)
        .into_iter()
        .map(|paulis| {
            let basis = measurement_basis(&paulis)?;
            let setting = measurement_rotation(&basis);
            let columns = setting
                .measured_qubits
                .iter()
                .copied()
                .filter(|&qubit| qubit < paulis.num_qubits())
                .collect::<Vec<_>>();
            let measured = PauliTable::from_symplectic(
                paulis.x_block().select_columns(&columns),
                paulis.z_block().select_columns(&columns),
            )?;
            Ok(MeasurementGroup {
                paulis,
                basis,
                setting,
                measured,
            })
        })
        .collect::<AlgebraResult<Vec<_>>>()?;
    trace!(rows = table.len(), groups = groups.len(), "grouped Paulis for measurement");
    Ok(groups)
}

/// Per row, the mask of qubits where the row acts non-trivially.
#[must_use]
pub fn diagonal_indices(table: &PauliTable) -> Vec<BitVec> {
    (0..table.len())
        .map(|index| {
            let (row_x, row_z) = table.row_bits(index);
            let mut mask = row_x.clone();
            mask.bitor_assign(row_z);
            mask
        })
        .collect()
}

/// Reads a `0`/`1` string of exactly `num_qubits` characters, qubit 0 last; anything after the
/// first space is ignored.
fn outcome_bits(bitstring: &str, num_qubits: usize) -> AlgebraResult<BitVec> {
    let outcome = bitstring.split(' ').next().unwrap_or_default();
    let malformed = outcome.chars().any(|character| character != '0' && character != '1');
    if malformed || outcome.len() != num_qubits {
        return Err(AlgebraError::InvalidLabel {
            label: bitstring.to_owned(),
        });
    }
    let mut bits = BitVec::zeros(num_qubits);
    for (qubit, character) in outcome.chars().rev().enumerate() {
        bits.assign_index(qubit, character == '1');
    }
    Ok(bits)
}

/// Expectation value and variance of every row, treating each row as diagonal (all non-identity
/// factors read as `Z`), from outcome counts taken after the basis rotation.
///
/// # Errors
///
/// [`AlgebraError::Validation`] when there are no shots, [`AlgebraError::InvalidLabel`] for a
/// bitstring with characters other than `0` and `1` or whose length before the first space is
/// not the qubit count of `table`.
pub fn expectation_values<Outcome, Counts>(counts: Counts, table: &PauliTable) -> AlgebraResult<Vec<Expectation>>
where
    Outcome: AsRef<str>,
    Counts: IntoIterator<Item = (Outcome, u64)>,
{
    let masks = diagonal_indices(table);
    let mut sums = vec![0.0; table.len()];
    let mut shots = 0u64;
    for (outcome, frequency) in counts {
        let bits = outcome_bits(outcome.as_ref(), table.num_qubits())?;
        shots += frequency;
        for (sum, mask) in sums.iter_mut().zip(&masks) {
            let sign = if mask.dot(&bits) { -1.0 } else { 1.0 };
            *sum += sign * frequency as f64;
        }
    }
    if shots == 0 {
        return Err(AlgebraError::Validation("expectation values need at least one shot".to_owned()));
    }
    Ok(sums
        .into_iter()
        .map(|sum| {
            let value = sum / shots as f64;
            Expectation {
                value,
                variance: 1.0 - value * value,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_of_qubit_wise_group() {
        let group = PauliTable::from_labels(&["XI", "XZ", "IZ"]).unwrap();
        assert_eq!(measurement_basis(&group).unwrap().label(), "XZ");
        let clash = PauliTable::from_labels(&["XI", "ZI"]).unwrap();
        assert!(measurement_basis(&clash).is_err());
    }

    #[test]
    fn rotation_of_y_uses_sdg_then_h() {
        let setting = measurement_rotation(&"YIZ".parse().unwrap());
        let names = setting.rotation.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(names, ["Sdg 2", "H 2"]);
        assert_eq!(setting.measured_qubits, [0, 2]);
        assert_eq!(measurement_rotation(&Pauli::identity(2)).measured_qubits, [0]);
    }

    #[test]
    fn outcome_bits_read_least_significant_last() {
        let bits = outcome_bits("01 11", 2).unwrap();
        assert!(bits.index(0));
        assert!(!bits.index(1));
        assert!(outcome_bits("0a", 2).is_err());
    }

    #[test]
    fn outcome_bits_match_qubit_count() {
        assert!(outcome_bits("011", 2).is_err());
        assert!(outcome_bits("1", 2).is_err());
        assert!(outcome_bits(" 11", 2).is_err());
        assert!(outcome_bits("10 1", 2).is_ok());
    }
}
