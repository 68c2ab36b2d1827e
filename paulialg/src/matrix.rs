//! Dense and compressed-sparse-row materialization of Pauli operators.
//!
//! Basis index bit `q` corresponds to qubit `q`, so qubit 0 is the least significant
//! factor of the Kronecker product, matching labels written most significant qubit first.

use crate::error::{AlgebraError, AlgebraResult};
use binar::{BitVec, Word};
use ndarray::Array2;
use num_complex::Complex64;

pub type CMatrix = Array2<Complex64>;

pub(crate) fn phase_factor(exponent: u8) -> Complex64 {
    match exponent % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    }
}

/// `log2(dimension)` when `dimension` is a power of two.
#[must_use]
pub fn qubit_count_of_dimension(dimension: usize) -> Option<usize> {
    dimension
        .is_power_of_two()
        .then(|| dimension.trailing_zeros() as usize)
}

fn mask_of(bits: &BitVec) -> usize {
    bits.low_word() as usize
}

fn sign_of(z_mask: usize, column: usize) -> f64 {
    if (z_mask & column).count_ones() % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Dense `2^N × 2^N` matrix of `i^e · X^x · Z^z`.
///
/// # Panics
///
/// Panics if the operator has more qubits than fit in a machine word.
pub fn pauli_to_dense(x_bits: &BitVec, z_bits: &BitVec, xz_phase_exponent: u8) -> CMatrix {
    assert!(x_bits.len() < Word::BITS as usize, "too many qubits for a dense matrix");
    let dimension = 1usize << x_bits.len();
    let (x_mask, z_mask) = (mask_of(x_bits), mask_of(z_bits));
    let phase = phase_factor(xz_phase_exponent);
    let mut res = CMatrix::zeros((dimension, dimension));
    for column in 0..dimension {
        res[[column ^ x_mask, column]] = phase * sign_of(z_mask, column);
    }
    res
}

/// Same operator as [`pauli_to_dense`], one stored entry per row.
///
/// # Panics
///
/// Panics if the operator has more qubits than fit in a machine word.
pub fn pauli_to_sparse(x_bits: &BitVec, z_bits: &BitVec, xz_phase_exponent: u8) -> CsrMatrix {
    assert!(x_bits.len() < Word::BITS as usize, "too many qubits for a sparse matrix");
    let dimension = 1usize << x_bits.len();
    let (x_mask, z_mask) = (mask_of(x_bits), mask_of(z_bits));
    let phase = phase_factor(xz_phase_exponent);
    let indices: Vec<usize> = (0..dimension).map(|row| row ^ x_mask).collect();
    let data = indices
        .iter()
        .map(|&column| phase * sign_of(z_mask, column))
        .collect();
    CsrMatrix {
        shape: (dimension, dimension),
        indptr: (0..=dimension).collect(),
        indices,
        data,
    }
}

#[must_use]
pub fn kron(left: &CMatrix, right: &CMatrix) -> CMatrix {
    let (left_rows, left_columns) = left.dim();
    let (right_rows, right_columns) = right.dim();
    let mut res = CMatrix::zeros((left_rows * right_rows, left_columns * right_columns));
    for ((i, j), a) in left.indexed_iter() {
        if *a == Complex64::new(0.0, 0.0) {
            continue;
        }
        for ((k, l), b) in right.indexed_iter() {
            res[[i * right_rows + k, j * right_columns + l]] = a * b;
        }
    }
    res
}

#[must_use]
pub fn is_hermitian(matrix: &CMatrix, atol: f64) -> bool {
    let (rows, columns) = matrix.dim();
    rows == columns
        && matrix
            .indexed_iter()
            .all(|((i, j), value)| (value - matrix[[j, i]].conj()).norm() <= atol)
}

/// Compressed sparse row matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<Complex64>,
}

impl CsrMatrix {
    /// # Errors
    ///
    /// Returns [`AlgebraError::InvalidShape`] if the arrays are inconsistent with `shape`.
    pub fn new(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<Complex64>,
    ) -> AlgebraResult<Self> {
        let consistent = indptr.len() == shape.0 + 1
            && indptr.first() == Some(&0)
            && indptr.windows(2).all(|pair| pair[0] <= pair[1])
            && indptr.last() == Some(&indices.len())
            && indices.len() == data.len()
            && indices.iter().all(|&column| column < shape.1);
        if !consistent {
            return Err(AlgebraError::InvalidShape(format!(
                "CSR arrays do not describe a {}x{} matrix",
                shape.0, shape.1
            )));
        }
        Ok(CsrMatrix {
            shape,
            indptr,
            indices,
            data,
        })
    }

    #[must_use]
    pub fn zeros(shape: (usize, usize)) -> Self {
        CsrMatrix {
            shape,
            indptr: vec![0; shape.0 + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Builds the matrix from per-row `(column, value)` lists; repeated columns are summed and
    /// exact zeros dropped.
    ///
    /// # Panics
    ///
    /// Panics if a column is out of range or the row count differs from `shape.0`.
    #[must_use]
    pub fn from_row_entries(shape: (usize, usize), rows: Vec<Vec<(usize, Complex64)>>) -> Self {
        assert_eq!(rows.len(), shape.0);
        let mut indptr = Vec::with_capacity(shape.0 + 1);
        let mut indices = Vec::new();
        let mut data: Vec<Complex64> = Vec::new();
        indptr.push(0);
        for mut entries in rows {
            entries.sort_by_key(|&(column, _)| column);
            let row_start = indices.len();
            for (column, value) in entries {
                assert!(column < shape.1);
                if indices.len() > row_start && indices.last() == Some(&column) {
                    if let Some(last) = data.last_mut() {
                        *last += value;
                    }
                } else {
                    indices.push(column);
                    data.push(value);
                }
            }
            let mut kept = row_start;
            for position in row_start..indices.len() {
                if data[position] != Complex64::new(0.0, 0.0) {
                    indices[kept] = indices[position];
                    data[kept] = data[position];
                    kept += 1;
                }
            }
            indices.truncate(kept);
            data.truncate(kept);
            indptr.push(indices.len());
        }
        CsrMatrix {
            shape,
            indptr,
            indices,
            data,
        }
    }

    /// Keeps entries with magnitude above `atol`.
    #[must_use]
    pub fn from_dense(matrix: &CMatrix, atol: f64) -> Self {
        let (rows, columns) = matrix.dim();
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in 0..rows {
            for column in 0..columns {
                let value = matrix[[row, column]];
                if value.norm() > atol {
                    indices.push(column);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }
        CsrMatrix {
            shape: (rows, columns),
            indptr,
            indices,
            data,
        }
    }

    #[must_use]
    pub fn to_dense(&self) -> CMatrix {
        let mut res = CMatrix::zeros(self.shape);
        for row in 0..self.shape.0 {
            for (column, value) in self.row(row) {
                res[[row, column]] += value;
            }
        }
        res
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Stored `(column, value)` pairs of one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, Complex64)> + '_ {
        let range = self.indptr[row]..self.indptr[row + 1];
        self.indices[range.clone()]
            .iter()
            .copied()
            .zip(self.data[range].iter().copied())
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Complex64 {
        self.row(row)
            .filter(|(stored, _)| *stored == column)
            .map(|(_, value)| value)
            .sum()
    }
}
