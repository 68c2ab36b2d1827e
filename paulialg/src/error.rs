//! Error types for the algebra engine.

use crate::sdp::SdpStatus;
use thiserror::Error;

/// Errors returned by table, tableau, operator and diamond-norm operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AlgebraError {
    /// Operands act on different numbers of qubits.
    #[error("{operation}: qubit counts differ ({left} vs {right})")]
    QubitCountMismatch {
        operation: &'static str,
        left: usize,
        right: usize,
    },

    /// Row counts can neither be paired nor broadcast.
    #[error("{operation}: cannot broadcast {left} rows against {right} rows")]
    RowCountMismatch {
        operation: &'static str,
        left: usize,
        right: usize,
    },

    /// Matrix or operator dimensions differ.
    #[error("{operation}: dimensions differ ({left} vs {right})")]
    DimensionMismatch {
        operation: &'static str,
        left: usize,
        right: usize,
    },

    /// A label contains a character outside the accepted alphabet or a malformed prefix.
    #[error("invalid label '{label}'")]
    InvalidLabel { label: String },

    /// Bit arrays, coefficient vectors or matrices with an unusable shape.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Qubit arguments out of range, repeated, or of the wrong count.
    #[error("invalid qubit arguments {qargs:?} for {num_qubits} qubits")]
    InvalidQargs { qargs: Vec<usize>, num_qubits: usize },

    /// Tableau fails `S·Ω·Sᵗ = Ω`.
    #[error("tableau is not symplectic")]
    NotSymplectic,

    /// A tableau row describes an anti-Hermitian Pauli.
    #[error("image of {generator} is not Hermitian")]
    NonHermitianImage { generator: String },

    /// Gate applied to the wrong number of qubits.
    #[error("gate {gate} expects {expected} qubits, got {qubits:?}")]
    InvalidGate {
        gate: String,
        expected: usize,
        qubits: Vec<usize>,
    },

    /// Numerical input failing a structural requirement (e.g. non-Hermitian Choi matrix).
    #[error("{0}")]
    Validation(String),

    /// The operator variant does not implement the requested capability.
    #[error("{operation} is not supported by {variant}")]
    UnsupportedOperation {
        operation: &'static str,
        variant: &'static str,
    },

    /// The operation has no meaning for this pair of operator variants.
    #[error("{operation} is not defined between {left} and {right}")]
    MixedOperands {
        operation: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// The semidefinite solver did not produce a usable optimum.
    #[error("semidefinite solver failed: {status}")]
    Solver { status: SdpStatus },
}

impl AlgebraError {
    #[must_use]
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            AlgebraError::QubitCountMismatch { .. }
                | AlgebraError::RowCountMismatch { .. }
                | AlgebraError::DimensionMismatch { .. }
        )
    }

    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AlgebraError::InvalidLabel { .. }
                | AlgebraError::InvalidShape(_)
                | AlgebraError::InvalidQargs { .. }
                | AlgebraError::NotSymplectic
                | AlgebraError::NonHermitianImage { .. }
                | AlgebraError::InvalidGate { .. }
                | AlgebraError::Validation(_)
        )
    }

    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            AlgebraError::UnsupportedOperation { .. } | AlgebraError::MixedOperands { .. }
        )
    }

    #[must_use]
    pub fn is_dependency_error(&self) -> bool {
        matches!(self, AlgebraError::Solver { .. })
    }
}

pub type AlgebraResult<T> = Result<T, AlgebraError>;
