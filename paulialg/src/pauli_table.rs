use crate::error::{AlgebraError, AlgebraResult};
use crate::matrix::{pauli_to_dense, pauli_to_sparse, CMatrix, CsrMatrix};
use crate::pauli::{bits_from_label, label_from_bits, product_phase_exponent, Pauli};
use binar::{BitMatrix, BitVec, Bitwise, BitwisePair};
use quantum_core::PositionedPauli;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// Ordered list of Pauli operators on a common set of qubits, stored without phases.
///
/// Row `k` is the Hermitian label-form operator `P(x_k, z_k)`. Every operation returns a new
/// table and keeps the row order of its inputs.
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PauliTable {
    x_block: BitMatrix,
    z_block: BitMatrix,
}

/// Row pairs of a row-wise binary operation: equal counts pair up, a single row broadcasts.
pub(crate) fn broadcast_pairs(operation: &'static str, left: usize, right: usize) -> AlgebraResult<Vec<(usize, usize)>> {
    if left == right {
        Ok((0..left).map(|index| (index, index)).collect())
    } else if left == 1 {
        Ok((0..right).map(|index| (0, index)).collect())
    } else if right == 1 {
        Ok((0..left).map(|index| (index, 0)).collect())
    } else {
        Err(AlgebraError::RowCountMismatch { operation, left, right })
    }
}

/// Checks that `qargs` names `expected` distinct qubits below `num_qubits`.
pub(crate) fn validate_qargs(qargs: &[usize], expected: usize, num_qubits: usize) -> AlgebraResult<()> {
    let mut seen = vec![false; num_qubits];
    let distinct_in_range = qargs.iter().all(|&qubit| {
        if qubit >= num_qubits || seen[qubit] {
            return false;
        }
        seen[qubit] = true;
        true
    });
    if qargs.len() != expected || !distinct_in_range {
        return Err(AlgebraError::InvalidQargs {
            qargs: qargs.to_vec(),
            num_qubits,
        });
    }
    Ok(())
}

pub(crate) fn check_qubit_counts(operation: &'static str, left: usize, right: usize) -> AlgebraResult<()> {
    if left == right {
        Ok(())
    } else {
        Err(AlgebraError::QubitCountMismatch { operation, left, right })
    }
}

/// No qubit carries two different non-identity Paulis.
fn qubit_wise_commute(x1: &BitVec, z1: &BitVec, x2: &BitVec, z2: &BitVec) -> bool {
    x1.as_words()
        .iter()
        .zip(z1.as_words())
        .zip(x2.as_words().iter().zip(z2.as_words()))
        .all(|((a, b), (c, d))| (a | b) & (c | d) & ((a ^ c) | (b ^ d)) == 0)
}

/// Position of a single-qubit Pauli in the order `I < X < Y < Z`.
fn label_rank(x_bit: bool, z_bit: bool) -> u8 {
    match (x_bit, z_bit) {
        (false, false) => 0,
        (true, false) => 1,
        (true, true) => 2,
        (false, true) => 3,
    }
}

impl PauliTable {
    /// Builds a table from `I`/`X`/`Y`/`Z` labels, most significant qubit first.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidLabel`] for characters outside the alphabet and
    /// [`AlgebraError::InvalidShape`] for an empty list or labels of different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use paulialg::PauliTable;
    ///
    /// let table = PauliTable::from_labels(&["XI", "IZ"]).unwrap();
    /// assert_eq!(table.num_qubits(), 2);
    /// assert_eq!(table.label_iter().collect::<Vec<_>>(), vec!["XI", "IZ"]);
    /// ```
    pub fn from_labels<Label: AsRef<str>>(labels: &[Label]) -> AlgebraResult<Self> {
        let Some(first) = labels.first() else {
            return Err(AlgebraError::InvalidShape(
                "cannot infer the qubit count of an empty label list".to_owned(),
            ));
        };
        let num_qubits = first.as_ref().chars().count();
        let mut x_rows = Vec::with_capacity(labels.len());
        let mut z_rows = Vec::with_capacity(labels.len());
        for label in labels {
            let (x_bits, z_bits) = bits_from_label(label.as_ref())?;
            if x_bits.len() != num_qubits {
                return Err(AlgebraError::InvalidShape(format!(
                    "label '{}' has {} qubits, expected {num_qubits}",
                    label.as_ref(),
                    x_bits.len()
                )));
            }
            x_rows.push(x_bits);
            z_rows.push(z_bits);
        }
        Ok(PauliTable::from_rows(x_rows, z_rows, num_qubits))
    }

    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] if the blocks have different shapes.
    pub fn from_symplectic(x_block: BitMatrix, z_block: BitMatrix) -> AlgebraResult<Self> {
        if x_block.shape() != z_block.shape() {
            return Err(AlgebraError::InvalidShape(format!(
                "x block is {:?} but z block is {:?}",
                x_block.shape(),
                z_block.shape()
            )));
        }
        Ok(PauliTable { x_block, z_block })
    }

    /// Builds a table from row-major boolean arrays; column `q` is qubit `q`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] for ragged or mismatched arrays.
    pub fn from_bool_arrays(x_rows: &[Vec<bool>], z_rows: &[Vec<bool>]) -> AlgebraResult<Self> {
        let num_qubits = x_rows.first().map_or(0, Vec::len);
        let rectangular = x_rows.len() == z_rows.len()
            && x_rows
                .iter()
                .chain(z_rows)
                .all(|row| row.len() == num_qubits);
        if !rectangular {
            return Err(AlgebraError::InvalidShape(
                "x and z arrays must be rectangular with equal shapes".to_owned(),
            ));
        }
        Ok(PauliTable {
            x_block: BitMatrix::from_row_iter(x_rows.iter().map(|row| row.iter().copied()), num_qubits),
            z_block: BitMatrix::from_row_iter(z_rows.iter().map(|row| row.iter().copied()), num_qubits),
        })
    }

    /// Drops the phases of `paulis`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] for an empty list, [`AlgebraError::QubitCountMismatch`]
    /// if the operators act on different numbers of qubits.
    pub fn from_paulis(paulis: &[Pauli]) -> AlgebraResult<Self> {
        let Some(first) = paulis.first() else {
            return Err(AlgebraError::InvalidShape(
                "cannot infer the qubit count of an empty Pauli list".to_owned(),
            ));
        };
        let num_qubits = first.num_qubits();
        for pauli in paulis {
            check_qubit_counts("from_paulis", num_qubits, pauli.num_qubits())?;
        }
        let x_rows = paulis.iter().map(|pauli| pauli.x_bits().clone()).collect();
        let z_rows = paulis.iter().map(|pauli| pauli.z_bits().clone()).collect();
        Ok(PauliTable::from_rows(x_rows, z_rows, num_qubits))
    }

    /// One row per list of positioned single-qubit Paulis, identity elsewhere.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidQargs`] if a qubit is out of range or repeated within a row.
    pub fn from_positioned<Row: AsRef<[PositionedPauli]>>(rows: &[Row], num_qubits: usize) -> AlgebraResult<Self> {
        let paulis = rows
            .iter()
            .map(|row| Pauli::from_positioned(row.as_ref(), num_qubits))
            .collect::<AlgebraResult<Vec<_>>>()?;
        let x_rows = paulis.iter().map(|pauli| pauli.x_bits().clone()).collect();
        let z_rows = paulis.iter().map(|pauli| pauli.z_bits().clone()).collect();
        Ok(PauliTable::from_rows(x_rows, z_rows, num_qubits))
    }

    /// A single identity row.
    pub fn identity(num_qubits: usize) -> Self {
        PauliTable {
            x_block: BitMatrix::zeros(1, num_qubits),
            z_block: BitMatrix::zeros(1, num_qubits),
        }
    }

    pub(crate) fn from_rows(x_rows: Vec<BitVec>, z_rows: Vec<BitVec>, num_qubits: usize) -> Self {
        PauliTable {
            x_block: BitMatrix::from_rows(x_rows, num_qubits),
            z_block: BitMatrix::from_rows(z_rows, num_qubits),
        }
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.x_block.column_count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x_block.row_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn x_block(&self) -> &BitMatrix {
        &self.x_block
    }

    pub fn z_block(&self) -> &BitMatrix {
        &self.z_block
    }

    #[must_use]
    pub fn row_bits(&self, index: usize) -> (&BitVec, &BitVec) {
        (self.x_block.row(index), self.z_block.row(index))
    }

    /// Row `index` as a Hermitian [`Pauli`].
    pub fn row(&self, index: usize) -> Pauli {
        Pauli::from_hermitian_bits(self.x_block.row(index).clone(), self.z_block.row(index).clone())
    }

    pub fn paulis(&self) -> impl ExactSizeIterator<Item = Pauli> + '_ {
        (0..self.len()).map(|index| self.row(index))
    }

    #[must_use]
    pub fn label(&self, index: usize) -> String {
        label_from_bits(self.x_block.row(index), self.z_block.row(index))
    }

    #[must_use]
    pub(crate) fn y_count(&self, index: usize) -> usize {
        self.x_block.row(index).and_weight(self.z_block.row(index))
    }

    #[must_use]
    pub fn weight(&self, index: usize) -> usize {
        self.x_block.row(index).or_weight(self.z_block.row(index))
    }

    #[must_use]
    pub fn weights(&self) -> Vec<usize> {
        (0..self.len()).map(|index| self.weight(index)).collect()
    }

    /// Rows at `indexes`, in that order.
    pub fn select(&self, indexes: &[usize]) -> PauliTable {
        PauliTable {
            x_block: self.x_block.select_rows(indexes),
            z_block: self.z_block.select_rows(indexes),
        }
    }

    /// Row-wise products together with the label-form phase exponent of each product.
    ///
    /// With `front` the product is `self · other` (as for [`PauliTable::dot`]),
    /// otherwise `other · self` (as for [`PauliTable::compose`]).
    pub(crate) fn compose_with_phases(
        &self,
        other: &PauliTable,
        qargs: Option<&[usize]>,
        front: bool,
    ) -> AlgebraResult<(PauliTable, Vec<u8>)> {
        let num_qubits = self.num_qubits();
        match qargs {
            Some(qargs) => validate_qargs(qargs, other.num_qubits(), num_qubits)?,
            None => check_qubit_counts("compose", num_qubits, other.num_qubits())?,
        }
        let pairs = broadcast_pairs("compose", self.len(), other.len())?;
        let widen = |row: &BitVec| match qargs {
            Some(qargs) => row.scattered(qargs, num_qubits),
            None => row.clone(),
        };
        let mut x_rows = Vec::with_capacity(pairs.len());
        let mut z_rows = Vec::with_capacity(pairs.len());
        let mut phases = Vec::with_capacity(pairs.len());
        for (left, right) in pairs {
            let (self_x, self_z) = self.row_bits(left);
            let other_x = widen(other.x_block.row(right));
            let other_z = widen(other.z_block.row(right));
            let phase = if front {
                product_phase_exponent(self_x, self_z, &other_x, &other_z)
            } else {
                product_phase_exponent(&other_x, &other_z, self_x, self_z)
            };
            x_rows.push(self_x ^ &other_x);
            z_rows.push(self_z ^ &other_z);
            phases.push(phase);
        }
        Ok((PauliTable::from_rows(x_rows, z_rows, num_qubits), phases))
    }

    /// Row-wise `other ∘ self`, i.e. `self` applied first. Phases are dropped.
    ///
    /// `qargs` places `other` on the listed qubits of `self`; the remaining qubits pass through.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`], [`AlgebraError::InvalidQargs`] or
    /// [`AlgebraError::RowCountMismatch`] when the operands cannot be paired.
    pub fn compose(&self, other: &PauliTable, qargs: Option<&[usize]>) -> AlgebraResult<PauliTable> {
        Ok(self.compose_with_phases(other, qargs, false)?.0)
    }

    /// Row-wise `self · other`.
    ///
    /// # Errors
    ///
    /// Same as [`PauliTable::compose`].
    pub fn dot(&self, other: &PauliTable, qargs: Option<&[usize]>) -> AlgebraResult<PauliTable> {
        Ok(self.compose_with_phases(other, qargs, true)?.0)
    }

    /// Row-wise `self ⊗ other`: `self` lands on the more significant qubits.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::RowCountMismatch`] when the row counts cannot be broadcast.
    pub fn tensor(&self, other: &PauliTable) -> AlgebraResult<PauliTable> {
        let pairs = broadcast_pairs("tensor", self.len(), other.len())?;
        let num_qubits = self.num_qubits() + other.num_qubits();
        let mut x_rows = Vec::with_capacity(pairs.len());
        let mut z_rows = Vec::with_capacity(pairs.len());
        for (high, low) in pairs {
            x_rows.push(BitVec::concatenated(other.x_block.row(low), self.x_block.row(high)));
            z_rows.push(BitVec::concatenated(other.z_block.row(low), self.z_block.row(high)));
        }
        Ok(PauliTable::from_rows(x_rows, z_rows, num_qubits))
    }

    /// Row-wise `other ⊗ self`.
    ///
    /// # Errors
    ///
    /// Same as [`PauliTable::tensor`].
    pub fn expand(&self, other: &PauliTable) -> AlgebraResult<PauliTable> {
        other.tensor(self)
    }

    /// Rows of `self` followed by rows of `other`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn add(&self, other: &PauliTable) -> AlgebraResult<PauliTable> {
        check_qubit_counts("add", self.num_qubits(), other.num_qubits())?;
        Ok(PauliTable {
            x_block: BitMatrix::row_stacked(&self.x_block, &other.x_block),
            z_block: BitMatrix::row_stacked(&self.z_block, &other.z_block),
        })
    }

    /// Compares rows by their labels, qubit by qubit from the most significant, with `I < X < Y < Z`.
    pub(crate) fn compare_rows(&self, left: usize, right: usize) -> Ordering {
        let (left_x, left_z) = self.row_bits(left);
        let (right_x, right_z) = self.row_bits(right);
        for qubit in (0..self.num_qubits()).rev() {
            let ordering = label_rank(left_x.index(qubit), left_z.index(qubit))
                .cmp(&label_rank(right_x.index(qubit), right_z.index(qubit)));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Permutation that sorts the rows, stable for equal rows.
    #[must_use]
    pub fn argsort(&self, weight: bool) -> Vec<usize> {
        let weights = self.weights();
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&left, &right| {
            let by_weight = if weight {
                weights[left].cmp(&weights[right])
            } else {
                Ordering::Equal
            };
            by_weight.then_with(|| self.compare_rows(left, right))
        });
        order
    }

    /// Rows in label order (`I < X < Y < Z`, most significant qubit first), or by weight first.
    pub fn sort(&self, weight: bool) -> PauliTable {
        self.select(&self.argsort(weight))
    }

    /// First occurrence of every distinct row, and for each row the position of its
    /// representative among the kept rows.
    pub(crate) fn unique_indices(&self) -> (Vec<usize>, Vec<usize>) {
        let mut positions: FxHashMap<(&BitVec, &BitVec), usize> = FxHashMap::default();
        let mut kept = Vec::new();
        let mut inverse = Vec::with_capacity(self.len());
        for index in 0..self.len() {
            let position = *positions.entry(self.row_bits(index)).or_insert_with(|| {
                kept.push(index);
                kept.len() - 1
            });
            inverse.push(position);
        }
        (kept, inverse)
    }

    /// Removes repeated rows, keeping first occurrences in their original order.
    pub fn unique(&self) -> PauliTable {
        self.select(&self.unique_indices().0)
    }

    /// Like [`PauliTable::unique`], with the multiplicity of each kept row.
    #[must_use]
    pub fn unique_with_counts(&self) -> (PauliTable, Vec<usize>) {
        let (kept, inverse) = self.unique_indices();
        let mut counts = vec![0; kept.len()];
        for position in inverse {
            counts[position] += 1;
        }
        (self.select(&kept), counts)
    }

    /// Whether each row commutes with `pauli`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn commutes(&self, pauli: &Pauli) -> AlgebraResult<Vec<bool>> {
        check_qubit_counts("commutes", self.num_qubits(), pauli.num_qubits())?;
        Ok((0..self.len())
            .map(|index| {
                let (x_bits, z_bits) = self.row_bits(index);
                crate::pauli::commutes_with(x_bits, z_bits, pauli.x_bits(), pauli.z_bits())
            })
            .collect())
    }

    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn anticommutes(&self, pauli: &Pauli) -> AlgebraResult<Vec<bool>> {
        Ok(self.commutes(pauli)?.into_iter().map(|commutes| !commutes).collect())
    }

    /// Whether each row commutes with every row of `other`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn commutes_with_all(&self, other: &PauliTable) -> AlgebraResult<Vec<bool>> {
        self.relation_with_all(other, true)
    }

    /// Whether each row anticommutes with every row of `other`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn anticommutes_with_all(&self, other: &PauliTable) -> AlgebraResult<Vec<bool>> {
        self.relation_with_all(other, false)
    }

    fn relation_with_all(&self, other: &PauliTable, commuting: bool) -> AlgebraResult<Vec<bool>> {
        check_qubit_counts("commutes_with_all", self.num_qubits(), other.num_qubits())?;
        Ok((0..self.len())
            .map(|index| {
                let (x_bits, z_bits) = self.row_bits(index);
                (0..other.len()).all(|other_index| {
                    let (other_x, other_z) = other.row_bits(other_index);
                    crate::pauli::commutes_with(x_bits, z_bits, other_x, other_z) == commuting
                })
            })
            .collect())
    }

    fn rows_commute(&self, left: usize, right: usize, qubit_wise: bool) -> bool {
        let (left_x, left_z) = self.row_bits(left);
        let (right_x, right_z) = self.row_bits(right);
        if qubit_wise {
            qubit_wise_commute(left_x, left_z, right_x, right_z)
        } else {
            crate::pauli::commutes_with(left_x, left_z, right_x, right_z)
        }
    }

    /// Partitions the rows into mutually commuting groups by greedy first fit.
    ///
    /// With `qubit_wise`, members of a group agree on every qubit where both act non-trivially,
    /// so a single product basis measures the whole group.
    #[must_use]
    pub fn group_commuting(&self, qubit_wise: bool) -> Vec<PauliTable> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for index in 0..self.len() {
            let fitting = groups
                .iter_mut()
                .find(|group| group.iter().all(|&member| self.rows_commute(index, member, qubit_wise)));
            match fitting {
                Some(group) => group.push(index),
                None => groups.push(vec![index]),
            }
        }
        groups.iter().map(|group| self.select(group)).collect()
    }

    /// Labels in row order. Each call starts a fresh pass.
    pub fn label_iter(&self) -> LabelIter<'_> {
        LabelIter {
            table: self,
            position: 0,
        }
    }

    /// Dense matrices in row order, built one at a time.
    pub fn matrix_iter(&self) -> MatrixIter<'_> {
        MatrixIter {
            table: self,
            position: 0,
        }
    }

    /// Sparse matrices in row order, built one at a time.
    pub fn sparse_matrix_iter(&self) -> SparseMatrixIter<'_> {
        SparseMatrixIter {
            table: self,
            position: 0,
        }
    }

    pub(crate) fn row_matrix(&self, index: usize) -> CMatrix {
        let (x_bits, z_bits) = self.row_bits(index);
        pauli_to_dense(x_bits, z_bits, (self.y_count(index) % 4) as u8)
    }

    pub(crate) fn row_sparse_matrix(&self, index: usize) -> CsrMatrix {
        let (x_bits, z_bits) = self.row_bits(index);
        pauli_to_sparse(x_bits, z_bits, (self.y_count(index) % 4) as u8)
    }
}

/// Restartable cursor over the rows of a table, producing one item per step.
macro_rules! row_cursor {
    ($name:ident, $table:ty, $item:ty, $produce:ident) => {
        #[derive(Clone)]
        pub struct $name<'life> {
            table: &'life $table,
            position: usize,
        }

        impl Iterator for $name<'_> {
            type Item = $item;

            fn next(&mut self) -> Option<$item> {
                if self.position >= self.table.len() {
                    return None;
                }
                self.position += 1;
                Some(self.table.$produce(self.position - 1))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let remaining = self.table.len().saturating_sub(self.position);
                (remaining, Some(remaining))
            }
        }

        impl ExactSizeIterator for $name<'_> {}
    };
}

pub(crate) use row_cursor;

row_cursor!(LabelIter, PauliTable, String, label);
row_cursor!(MatrixIter, PauliTable, CMatrix, row_matrix);
row_cursor!(SparseMatrixIter, PauliTable, CsrMatrix, row_sparse_matrix);

impl Display for PauliTable {
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

impl Debug for PauliTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PauliTable{self}")
    }
}
