//! Symplectic algebra of Pauli operators, stabilizer tables and Clifford tableaux, with a
//! weighted Pauli-sum operator and a diamond-norm program builder.

pub mod clifford;
pub mod diamond;
pub mod error;
pub mod matrix;
pub mod measurement;
pub mod operations;
pub mod operator;
pub mod pauli;
pub mod pauli_table;
pub mod scalar_op;
pub mod sdp;
pub mod sparse_pauli_op;
pub mod stabilizer_table;

#[cfg(feature = "serde")]
mod serde;

pub use clifford::Clifford;
pub use diamond::{
    diamond_distance, diamond_norm, diamond_norm_with, output_major_choi, DiamondNorm, DiamondNormOptions, DiamondNormProblem,
};
pub use error::{AlgebraError, AlgebraResult};
pub use matrix::{CMatrix, CsrMatrix};
pub use operations::{Circuit, GateKind, Instruction};
pub use operator::{Addable, Capability, Composable, Operator, ScalarMultipliable, Tensorable};
pub use pauli::Pauli;
pub use pauli_table::PauliTable;
pub use scalar_op::ScalarOp;
pub use sparse_pauli_op::SparsePauliOp;
pub use stabilizer_table::StabilizerTable;

/// Absolute tolerance used when no explicit tolerance is given.
pub const DEFAULT_ATOL: f64 = 1e-8;
