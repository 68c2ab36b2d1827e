use crate::error::{AlgebraError, AlgebraResult};
use crate::matrix::{qubit_count_of_dimension, CMatrix};
use crate::sparse_pauli_op::SparsePauliOp;
use num_complex::Complex64;
use std::fmt::Display;

/// `coeff · I_dim`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarOp {
    dim: usize,
    coeff: Complex64,
}

impl ScalarOp {
    #[must_use]
    pub fn new(dim: usize, coeff: Complex64) -> Self {
        ScalarOp { dim, coeff }
    }

    #[must_use]
    pub fn identity(dim: usize) -> Self {
        ScalarOp::new(dim, Complex64::new(1.0, 0.0))
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn coeff(&self) -> Complex64 {
        self.coeff
    }

    /// `log2(dim)` when the dimension is a power of two.
    #[must_use]
    pub fn num_qubits(&self) -> Option<usize> {
        qubit_count_of_dimension(self.dim)
    }

    fn check_dims(&self, operation: &'static str, other_dim: usize) -> AlgebraResult<()> {
        if self.dim == other_dim {
            Ok(())
        } else {
            Err(AlgebraError::DimensionMismatch {
                operation,
                left: self.dim,
                right: other_dim,
            })
        }
    }

    /// Product of the scalars. With `qargs`, `other` acts on those qubits of `self` and
    /// must have dimension `2^qargs.len()`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::DimensionMismatch`] or [`AlgebraError::InvalidQargs`].
    pub fn compose(&self, other: &ScalarOp, qargs: Option<&[usize]>) -> AlgebraResult<ScalarOp> {
        match qargs {
            None => self.check_dims("compose", other.dim)?,
            Some(qargs) => {
                let num_qubits = self.num_qubits().ok_or_else(|| AlgebraError::InvalidQargs {
                    qargs: qargs.to_vec(),
                    num_qubits: 0,
                })?;
                crate::pauli_table::validate_qargs(qargs, qargs.len(), num_qubits)?;
                if other.num_qubits() != Some(qargs.len()) {
                    return Err(AlgebraError::DimensionMismatch {
                        operation: "compose",
                        left: 1 << qargs.len(),
                        right: other.dim,
                    });
                }
            }
        }
        Ok(ScalarOp::new(self.dim, self.coeff * other.coeff))
    }

    #[must_use]
    pub fn tensor(&self, other: &ScalarOp) -> ScalarOp {
        ScalarOp::new(self.dim * other.dim, self.coeff * other.coeff)
    }

    /// # Errors
    ///
    /// [`AlgebraError::DimensionMismatch`] if the dimensions differ.
    pub fn add(&self, other: &ScalarOp) -> AlgebraResult<ScalarOp> {
        self.check_dims("add", other.dim)?;
        Ok(ScalarOp::new(self.dim, self.coeff + other.coeff))
    }

    #[must_use]
    pub fn mul_scalar(&self, scalar: Complex64) -> ScalarOp {
        ScalarOp::new(self.dim, self.coeff * scalar)
    }

    /// Explicit promotion to a one-term Pauli sum on `log2(dim)` qubits.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] if `dim` is not a power of two.
    pub fn to_sparse_pauli_op(&self) -> AlgebraResult<SparsePauliOp> {
        let num_qubits = self
            .num_qubits()
            .ok_or_else(|| AlgebraError::InvalidShape(format!("dimension {} is not a power of two", self.dim)))?;
        Ok(SparsePauliOp::identity(num_qubits).mul_scalar(self.coeff))
    }

    #[must_use]
    pub fn to_matrix(&self) -> CMatrix {
        CMatrix::eye(self.dim) * self.coeff
    }
}

impl Display for ScalarOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})·I{}", self.coeff, self.dim)
    }
}
