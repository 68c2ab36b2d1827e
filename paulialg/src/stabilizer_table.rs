//! Signed Pauli lists in the real convention.
//!
//! A row with sign bit `s` and label `P` stands for the real matrix `(-1)^s · i^{#Y} · P`, so a
//! bare `Y` is `Z·X = [[0, 1], [-1, 0]]`. Every product of such rows is again real, which keeps
//! signs in `{+1, -1}` under composition.

use crate::error::{AlgebraError, AlgebraResult};
use crate::matrix::{pauli_to_dense, pauli_to_sparse, CMatrix, CsrMatrix};
use crate::pauli::{bits_from_label, Pauli};
use crate::pauli_table::{row_cursor, PauliTable};
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Display};
use std::ops::Neg;

#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StabilizerTable {
    table: PauliTable,
    phases: Vec<bool>,
}

impl StabilizerTable {
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] if `phases` does not have one entry per row.
    pub fn new(table: PauliTable, phases: Vec<bool>) -> AlgebraResult<Self> {
        if phases.len() != table.len() {
            return Err(AlgebraError::InvalidShape(format!(
                "{} sign bits for {} rows",
                phases.len(),
                table.len()
            )));
        }
        Ok(StabilizerTable { table, phases })
    }

    /// All signs positive.
    pub fn from_pauli_table(table: PauliTable) -> Self {
        let phases = vec![false; table.len()];
        StabilizerTable { table, phases }
    }

    /// Parses labels with an optional `+`/`-` sign, e.g. `["+XZ", "-YI", "ZZ"]`.
    ///
    /// # Errors
    ///
    /// Same as [`PauliTable::from_labels`].
    pub fn from_labels<Label: AsRef<str>>(labels: &[Label]) -> AlgebraResult<Self> {
        let mut phases = Vec::with_capacity(labels.len());
        let mut bodies = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            let (negative, body) = match label.strip_prefix('-') {
                Some(body) => (true, body),
                None => (false, label.strip_prefix('+').unwrap_or(label)),
            };
            bits_from_label(body).map_err(|_| AlgebraError::InvalidLabel {
                label: label.to_owned(),
            })?;
            phases.push(negative);
            bodies.push(body);
        }
        let table = PauliTable::from_labels(&bodies)?;
        Ok(StabilizerTable { table, phases })
    }

    pub fn pauli_table(&self) -> &PauliTable {
        &self.table
    }

    #[must_use]
    pub fn phases(&self) -> &[bool] {
        &self.phases
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.table.num_qubits()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Signed label of row `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        let sign = if self.phases[index] { '-' } else { '+' };
        format!("{sign}{}", self.table.label(index))
    }

    /// Row `index` as a [`Pauli`] equal to its real matrix.
    pub fn row(&self, index: usize) -> Pauli {
        let (x_bits, z_bits) = self.table.row_bits(index);
        Pauli::from_bits(x_bits.clone(), z_bits.clone(), self.real_phase_exponent(index))
    }

    /// Raw exponent `e` with row `index` equal to `i^e · X^x · Z^z`; always 0 or 2.
    fn real_phase_exponent(&self, index: usize) -> u8 {
        let odd = (self.table.y_count(index) % 2 == 1) ^ self.phases[index];
        if odd {
            2
        } else {
            0
        }
    }

    pub(crate) fn row_matrix(&self, index: usize) -> CMatrix {
        let (x_bits, z_bits) = self.table.row_bits(index);
        pauli_to_dense(x_bits, z_bits, self.real_phase_exponent(index))
    }

    pub(crate) fn row_sparse_matrix(&self, index: usize) -> CsrMatrix {
        let (x_bits, z_bits) = self.table.row_bits(index);
        pauli_to_sparse(x_bits, z_bits, self.real_phase_exponent(index))
    }

    pub fn label_iter(&self) -> StabilizerLabelIter<'_> {
        StabilizerLabelIter {
            table: self,
            position: 0,
        }
    }

    /// Real dense matrices in row order.
    pub fn matrix_iter(&self) -> StabilizerMatrixIter<'_> {
        StabilizerMatrixIter {
            table: self,
            position: 0,
        }
    }

    pub fn sparse_matrix_iter(&self) -> StabilizerSparseMatrixIter<'_> {
        StabilizerSparseMatrixIter {
            table: self,
            position: 0,
        }
    }

    pub fn select(&self, indexes: &[usize]) -> StabilizerTable {
        StabilizerTable {
            table: self.table.select(indexes),
            phases: indexes.iter().map(|&index| self.phases[index]).collect(),
        }
    }

    fn compose_impl(&self, other: &StabilizerTable, qargs: Option<&[usize]>, front: bool) -> AlgebraResult<StabilizerTable> {
        let (table, label_phases) = self.table.compose_with_phases(&other.table, qargs, front)?;
        let pairs = crate::pauli_table::broadcast_pairs("compose", self.len(), other.len())?;
        let phases = pairs
            .iter()
            .zip(&label_phases)
            .enumerate()
            .map(|(row, (&(left, right), &label_phase))| {
                let exponent = self.table.y_count(left) + other.table.y_count(right) + label_phase as usize + 4
                    - table.y_count(row) % 4;
                debug_assert_eq!(exponent % 2, 0);
                self.phases[left] ^ other.phases[right] ^ (exponent % 4 == 2)
            })
            .collect();
        Ok(StabilizerTable { table, phases })
    }

    /// Row-wise `other ∘ self`, with signs tracked exactly.
    ///
    /// # Errors
    ///
    /// Same as [`PauliTable::compose`].
    pub fn compose(&self, other: &StabilizerTable, qargs: Option<&[usize]>) -> AlgebraResult<StabilizerTable> {
        self.compose_impl(other, qargs, false)
    }

    /// Row-wise `self · other`.
    ///
    /// # Errors
    ///
    /// Same as [`PauliTable::compose`].
    pub fn dot(&self, other: &StabilizerTable, qargs: Option<&[usize]>) -> AlgebraResult<StabilizerTable> {
        self.compose_impl(other, qargs, true)
    }

    /// # Errors
    ///
    /// [`AlgebraError::RowCountMismatch`] when the row counts cannot be broadcast.
    pub fn tensor(&self, other: &StabilizerTable) -> AlgebraResult<StabilizerTable> {
        let table = self.table.tensor(&other.table)?;
        let phases = crate::pauli_table::broadcast_pairs("tensor", self.len(), other.len())?
            .into_iter()
            .map(|(high, low)| self.phases[high] ^ other.phases[low])
            .collect();
        Ok(StabilizerTable { table, phases })
    }

    /// # Errors
    ///
    /// [`AlgebraError::RowCountMismatch`] when the row counts cannot be broadcast.
    pub fn expand(&self, other: &StabilizerTable) -> AlgebraResult<StabilizerTable> {
        other.tensor(self)
    }

    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn add(&self, other: &StabilizerTable) -> AlgebraResult<StabilizerTable> {
        let table = self.table.add(&other.table)?;
        let phases = self.phases.iter().chain(&other.phases).copied().collect();
        Ok(StabilizerTable { table, phases })
    }

    #[must_use]
    pub fn argsort(&self, weight: bool) -> Vec<usize> {
        self.table.argsort(weight)
    }

    /// Rows in the order of [`PauliTable::sort`]; signs travel with their rows.
    pub fn sort(&self, weight: bool) -> StabilizerTable {
        self.select(&self.argsort(weight))
    }

    fn unique_indices(&self) -> (Vec<usize>, Vec<usize>) {
        let mut positions = FxHashMap::default();
        let mut kept = Vec::new();
        let mut inverse = Vec::with_capacity(self.len());
        for index in 0..self.len() {
            let key = (self.table.row_bits(index), self.phases[index]);
            let position = *positions.entry(key).or_insert_with(|| {
                kept.push(index);
                kept.len() - 1
            });
            inverse.push(position);
        }
        (kept, inverse)
    }

    /// Removes repeated signed rows; `+X` and `-X` are distinct.
    pub fn unique(&self) -> StabilizerTable {
        self.select(&self.unique_indices().0)
    }

    #[must_use]
    pub fn unique_with_counts(&self) -> (StabilizerTable, Vec<usize>) {
        let (kept, inverse) = self.unique_indices();
        let mut counts = vec![0; kept.len()];
        for position in inverse {
            counts[position] += 1;
        }
        (self.select(&kept), counts)
    }

    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn commutes(&self, pauli: &Pauli) -> AlgebraResult<Vec<bool>> {
        self.table.commutes(pauli)
    }

    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn anticommutes(&self, pauli: &Pauli) -> AlgebraResult<Vec<bool>> {
        self.table.anticommutes(pauli)
    }

    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn commutes_with_all(&self, other: &StabilizerTable) -> AlgebraResult<Vec<bool>> {
        self.table.commutes_with_all(&other.table)
    }

    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn anticommutes_with_all(&self, other: &StabilizerTable) -> AlgebraResult<Vec<bool>> {
        self.table.anticommutes_with_all(&other.table)
    }
}

row_cursor!(StabilizerLabelIter, StabilizerTable, String, label);
row_cursor!(StabilizerMatrixIter, StabilizerTable, CMatrix, row_matrix);
row_cursor!(StabilizerSparseMatrixIter, StabilizerTable, CsrMatrix, row_sparse_matrix);

impl Neg for &StabilizerTable {
    type Output = StabilizerTable;

    fn neg(self) -> StabilizerTable {
        StabilizerTable {
            table: self.table.clone(),
            phases: self.phases.iter().map(|phase| !phase).collect(),
        }
    }
}

impl Display for StabilizerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (index, label) in self.label_iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}")?;
        }
        write!(f, "]")
    }
}

impl Debug for StabilizerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StabilizerTable{self}")
    }
}
