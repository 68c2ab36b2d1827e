//! Weighted sums of Pauli operators.

use crate::error::{AlgebraError, AlgebraResult};
use crate::matrix::{phase_factor, qubit_count_of_dimension, CMatrix, CsrMatrix};
use crate::pauli::{bits_from_label, bits_from_mask, split_phase_prefix};
use crate::pauli_table::{row_cursor, validate_qargs, PauliTable};
use binar::{BitVec, Bitwise, BitwiseMut};
use ndarray::Array1;
use num_complex::Complex64;
use std::fmt::{Debug, Display};
use std::ops::{Mul, Neg};

/// `Σ_k c_k · P_k` with `P_k` the Hermitian label-form rows of a [`PauliTable`].
#[must_use]
#[derive(Clone, PartialEq)]
pub struct SparsePauliOp {
    paulis: PauliTable,
    coeffs: Array1<Complex64>,
}

impl SparsePauliOp {
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] unless there is one coefficient per row.
    pub fn new(paulis: PauliTable, coeffs: Array1<Complex64>) -> AlgebraResult<Self> {
        if paulis.len() != coeffs.len() {
            return Err(AlgebraError::InvalidShape(format!(
                "{} coefficients for {} Pauli terms",
                coeffs.len(),
                paulis.len()
            )));
        }
        Ok(SparsePauliOp { paulis, coeffs })
    }

    /// Builds the sum from `(label, coefficient)` terms. A label may carry a phase prefix
    /// (`-`, `i`, `-i`), which is folded into its coefficient.
    ///
    /// # Errors
    ///
    /// Same as [`PauliTable::from_labels`].
    ///
    /// # Examples
    ///
    /// ```
    /// use num_complex::Complex64;
    /// use paulialg::SparsePauliOp;
    ///
    /// let op = SparsePauliOp::from_list([("XX", Complex64::new(0.5, 0.0)), ("-iZI", Complex64::new(1.0, 0.0))]).unwrap();
    /// assert_eq!(op.coeffs()[1], Complex64::new(0.0, -1.0));
    /// ```
    pub fn from_list<Label, Terms>(terms: Terms) -> AlgebraResult<Self>
    where
        Label: AsRef<str>,
        Terms: IntoIterator<Item = (Label, Complex64)>,
    {
        let mut labels = Vec::new();
        let mut coeffs = Vec::new();
        for (label, coeff) in terms {
            let (exponent, body) = split_phase_prefix(label.as_ref());
            labels.push(body.to_owned());
            coeffs.push(coeff * phase_factor(exponent));
        }
        SparsePauliOp::new(PauliTable::from_labels(&labels)?, Array1::from_vec(coeffs))
    }

    /// Builds the sum from `(label, qubits, coefficient)` terms where character `k` of the label
    /// acts on `qubits[k]` and every other qubit carries an identity.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidLabel`] for bad characters, [`AlgebraError::InvalidQargs`] if the
    /// qubit list does not match the label or leaves the range.
    pub fn from_sparse_list<Label, Qubits, Terms>(terms: Terms, num_qubits: usize) -> AlgebraResult<Self>
    where
        Label: AsRef<str>,
        Qubits: AsRef<[usize]>,
        Terms: IntoIterator<Item = (Label, Qubits, Complex64)>,
    {
        let mut x_rows = Vec::new();
        let mut z_rows = Vec::new();
        let mut coeffs = Vec::new();
        for (label, qubits, coeff) in terms {
            let qubits = qubits.as_ref();
            let (local_x, local_z) = bits_from_label(label.as_ref())?;
            validate_qargs(qubits, local_x.len(), num_qubits)?;
            // character k of the label is bit len-1-k
            let mut x_bits = BitVec::zeros(num_qubits);
            let mut z_bits = BitVec::zeros(num_qubits);
            for (position, &qubit) in qubits.iter().enumerate() {
                let bit = qubits.len() - 1 - position;
                x_bits.assign_index(qubit, local_x.index(bit));
                z_bits.assign_index(qubit, local_z.index(bit));
            }
            x_rows.push(x_bits);
            z_rows.push(z_bits);
            coeffs.push(coeff);
        }
        SparsePauliOp::new(
            PauliTable::from_rows(x_rows, z_rows, num_qubits),
            Array1::from_vec(coeffs),
        )
    }

    /// The identity with coefficient one.
    pub fn identity(num_qubits: usize) -> Self {
        SparsePauliOp {
            paulis: PauliTable::identity(num_qubits),
            coeffs: Array1::from_vec(vec![Complex64::new(1.0, 0.0)]),
        }
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.paulis.num_qubits()
    }

    /// Number of stored terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paulis.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paulis.is_empty()
    }

    pub fn paulis(&self) -> &PauliTable {
        &self.paulis
    }

    #[must_use]
    pub fn coeffs(&self) -> &Array1<Complex64> {
        &self.coeffs
    }

    /// Merges repeated Pauli rows by summing their coefficients, keeping first occurrences.
    fn sum_duplicates(&self) -> SparsePauliOp {
        let (kept, inverse) = self.paulis.unique_indices();
        let mut coeffs = Array1::zeros(kept.len());
        for (coeff, position) in self.coeffs.iter().zip(inverse) {
            coeffs[position] += coeff;
        }
        SparsePauliOp {
            paulis: self.paulis.select(&kept),
            coeffs,
        }
    }

    /// `self + other`, with duplicate terms merged.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn add(&self, other: &SparsePauliOp) -> AlgebraResult<SparsePauliOp> {
        let paulis = self.paulis.add(&other.paulis)?;
        let coeffs = self.coeffs.iter().chain(other.coeffs.iter()).copied().collect();
        Ok(SparsePauliOp { paulis, coeffs }.sum_duplicates())
    }

    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn sub(&self, other: &SparsePauliOp) -> AlgebraResult<SparsePauliOp> {
        self.add(&-other)
    }

    pub fn mul_scalar(&self, scalar: Complex64) -> SparsePauliOp {
        SparsePauliOp {
            paulis: self.paulis.clone(),
            coeffs: self.coeffs.mapv(|coeff| coeff * scalar),
        }
    }

    /// Every pair of terms, `self` terms varying slowest, multiplied with their phases folded into
    /// the coefficients.
    fn compose_terms(&self, other: &SparsePauliOp, qargs: Option<&[usize]>, front: bool) -> AlgebraResult<SparsePauliOp> {
        let repeated: Vec<usize> = (0..self.len())
            .flat_map(|index| std::iter::repeat(index).take(other.len()))
            .collect();
        let tiled: Vec<usize> = (0..self.len()).flat_map(|_| 0..other.len()).collect();
        let (paulis, phases) = self
            .paulis
            .select(&repeated)
            .compose_with_phases(&other.paulis.select(&tiled), qargs, front)?;
        let coeffs = repeated
            .iter()
            .zip(&tiled)
            .zip(phases)
            .map(|((&left, &right), phase)| self.coeffs[left] * other.coeffs[right] * phase_factor(phase))
            .collect();
        Ok(SparsePauliOp { paulis, coeffs }.sum_duplicates())
    }

    /// `other ∘ self` as operators, i.e. the matrix product `other · self`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] or [`AlgebraError::InvalidQargs`].
    pub fn compose(&self, other: &SparsePauliOp, qargs: Option<&[usize]>) -> AlgebraResult<SparsePauliOp> {
        self.compose_terms(other, qargs, false)
    }

    /// The matrix product `self · other`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] or [`AlgebraError::InvalidQargs`].
    pub fn dot(&self, other: &SparsePauliOp, qargs: Option<&[usize]>) -> AlgebraResult<SparsePauliOp> {
        self.compose_terms(other, qargs, true)
    }

    /// `self ⊗ other`, with `self` on the more significant qubits.
    pub fn tensor(&self, other: &SparsePauliOp) -> SparsePauliOp {
        let mut paulis = Vec::with_capacity(self.len() * other.len());
        let mut coeffs = Vec::with_capacity(self.len() * other.len());
        for high in 0..self.len() {
            for low in 0..other.len() {
                paulis.push((high, low));
                coeffs.push(self.coeffs[high] * other.coeffs[low]);
            }
        }
        let (repeated, tiled): (Vec<usize>, Vec<usize>) = paulis.into_iter().unzip();
        let x_rows = repeated
            .iter()
            .zip(&tiled)
            .map(|(&high, &low)| BitVec::concatenated(other.paulis.x_block().row(low), self.paulis.x_block().row(high)))
            .collect();
        let z_rows = repeated
            .iter()
            .zip(&tiled)
            .map(|(&high, &low)| BitVec::concatenated(other.paulis.z_block().row(low), self.paulis.z_block().row(high)))
            .collect();
        SparsePauliOp {
            paulis: PauliTable::from_rows(x_rows, z_rows, self.num_qubits() + other.num_qubits()),
            coeffs: Array1::from_vec(coeffs),
        }
        .sum_duplicates()
    }

    /// `other ⊗ self`.
    pub fn expand(&self, other: &SparsePauliOp) -> SparsePauliOp {
        other.tensor(self)
    }

    /// Hermitian conjugate; the label-form rows are Hermitian, so only coefficients change.
    pub fn adjoint(&self) -> SparsePauliOp {
        SparsePauliOp {
            paulis: self.paulis.clone(),
            coeffs: self.coeffs.mapv(|coeff| coeff.conj()),
        }
    }

    /// Merges duplicates and drops terms with `|c| <= atol`. The zero operator keeps one identity
    /// term with coefficient zero.
    pub fn simplify(&self, atol: f64) -> SparsePauliOp {
        let merged = self.sum_duplicates();
        let kept: Vec<usize> = (0..merged.len())
            .filter(|&index| merged.coeffs[index].norm() > atol)
            .collect();
        if kept.is_empty() {
            return SparsePauliOp {
                paulis: PauliTable::identity(self.num_qubits()),
                coeffs: Array1::zeros(1),
            };
        }
        SparsePauliOp {
            paulis: merged.paulis.select(&kept),
            coeffs: kept.iter().map(|&index| merged.coeffs[index]).collect(),
        }
    }

    /// Whether `self` and `other` are the same operator up to term order and `atol`.
    #[must_use]
    pub fn equiv(&self, other: &SparsePauliOp, atol: f64) -> bool {
        self.sub(other)
            .map(|difference| difference.simplify(atol).coeffs.iter().all(|coeff| coeff.norm() <= atol))
            .unwrap_or(false)
    }

    /// Decomposes a dense `2^N × 2^N` matrix into Pauli terms, dropping those with `|c| <= atol`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] for an empty, non-square or non power-of-two matrix.
    pub fn from_operator(matrix: &CMatrix, atol: f64) -> AlgebraResult<SparsePauliOp> {
        let (rows, columns) = matrix.dim();
        let num_qubits = qubit_count_of_dimension(rows)
            .filter(|_| rows == columns)
            .ok_or_else(|| AlgebraError::InvalidShape(format!("{rows}x{columns} is not a square 2^N matrix")))?;
        let scale = 1.0 / rows as f64;
        let mut x_rows = Vec::new();
        let mut z_rows = Vec::new();
        let mut coeffs = Vec::new();
        for x_mask in 0..rows {
            for z_mask in 0..rows {
                let y_count = (x_mask & z_mask).count_ones() as u8;
                let trace: Complex64 = (0..rows)
                    .map(|column| {
                        let value = matrix[[column ^ x_mask, column]];
                        if (z_mask & column).count_ones() % 2 == 0 {
                            value
                        } else {
                            -value
                        }
                    })
                    .sum();
                let coeff = trace * phase_factor(4 - y_count % 4) * scale;
                if coeff.norm() > atol {
                    x_rows.push(bits_from_mask(x_mask, num_qubits));
                    z_rows.push(bits_from_mask(z_mask, num_qubits));
                    coeffs.push(coeff);
                }
            }
        }
        if coeffs.is_empty() {
            x_rows.push(BitVec::zeros(num_qubits));
            z_rows.push(BitVec::zeros(num_qubits));
            coeffs.push(Complex64::new(0.0, 0.0));
        }
        Ok(SparsePauliOp {
            paulis: PauliTable::from_rows(x_rows, z_rows, num_qubits),
            coeffs: Array1::from_vec(coeffs),
        })
    }

    /// Dense matrix `Σ c_k · P_k`.
    ///
    /// # Panics
    ///
    /// Panics if the qubit count does not fit a machine word.
    #[must_use]
    pub fn to_matrix(&self) -> CMatrix {
        let dimension = 1usize << self.num_qubits();
        let mut res = CMatrix::zeros((dimension, dimension));
        for (term, coeff) in self.paulis.sparse_matrix_iter().zip(&self.coeffs) {
            for row in 0..dimension {
                for (column, value) in term.row(row) {
                    res[[row, column]] += coeff * value;
                }
            }
        }
        res
    }

    /// Sparse matrix `Σ c_k · P_k`; every term contributes one entry per row.
    ///
    /// # Panics
    ///
    /// Panics if the qubit count does not fit a machine word.
    #[must_use]
    pub fn to_sparse_matrix(&self) -> CsrMatrix {
        let dimension = 1usize << self.num_qubits();
        let mut rows: Vec<Vec<(usize, Complex64)>> = vec![Vec::with_capacity(self.len()); dimension];
        for (term, coeff) in self.paulis.sparse_matrix_iter().zip(&self.coeffs) {
            for (row, entries) in rows.iter_mut().enumerate() {
                entries.extend(term.row(row).map(|(column, value)| (column, coeff * value)));
            }
        }
        CsrMatrix::from_row_entries((dimension, dimension), rows)
    }

    /// Same dense matrix as [`SparsePauliOp::to_matrix`], the operator form used by conversions.
    #[must_use]
    pub fn to_operator(&self) -> CMatrix {
        self.to_matrix()
    }

    pub(crate) fn term(&self, index: usize) -> (String, Complex64) {
        (self.paulis.label(index), self.coeffs[index])
    }

    /// `(label, coefficient)` per term, in storage order.
    pub fn label_iter(&self) -> TermIter<'_> {
        TermIter {
            table: self,
            position: 0,
        }
    }
}

row_cursor!(TermIter, SparsePauliOp, (String, Complex64), term);

impl Mul<Complex64> for &SparsePauliOp {
    type Output = SparsePauliOp;

    fn mul(self, scalar: Complex64) -> SparsePauliOp {
        self.mul_scalar(scalar)
    }
}

impl Neg for &SparsePauliOp {
    type Output = SparsePauliOp;

    fn neg(self) -> SparsePauliOp {
        self.mul_scalar(Complex64::new(-1.0, 0.0))
    }
}

impl Display for SparsePauliOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, (label, coeff)) in self.label_iter().enumerate() {
            if index > 0 {
                write!(f, " + ")?;
            }
            write!(f, "({coeff})·{label}")?;
        }
        Ok(())
    }
}

impl Debug for SparsePauliOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SparsePauliOp({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn duplicate_terms_merge_on_add() {
        let left = SparsePauliOp::from_list([("XI", c(1.0, 0.0)), ("ZZ", c(2.0, 0.0))]).unwrap();
        let right = SparsePauliOp::from_list([("ZZ", c(-2.0, 0.0)), ("IY", c(0.0, 1.0))]).unwrap();
        let sum = left.add(&right).unwrap();
        assert_eq!(sum.len(), 3);
        assert_eq!(sum.simplify(1e-12).len(), 2);
    }

    #[test]
    fn compose_tracks_phase() {
        let x = SparsePauliOp::from_list([("X", c(1.0, 0.0))]).unwrap();
        let y = SparsePauliOp::from_list([("Y", c(1.0, 0.0))]).unwrap();
        // X · Y = iZ
        let product = x.dot(&y, None).unwrap();
        assert_eq!(product.label_iter().collect::<Vec<_>>(), vec![("Z".to_owned(), c(0.0, 1.0))]);
        // compose applies X first: Y · X = -iZ
        let product = x.compose(&y, None).unwrap();
        assert_eq!(product.coeffs()[0], c(0.0, -1.0));
    }

    #[test]
    fn simplify_of_zero_keeps_identity() {
        let op = SparsePauliOp::from_list([("XZ", c(1e-12, 0.0))]).unwrap();
        let simplified = op.simplify(1e-8);
        assert_eq!(simplified.paulis().label(0), "II");
        assert_eq!(simplified.coeffs()[0], c(0.0, 0.0));
    }
}
