//! Capability traits and the closed set of operator variants.
//!
//! Each variant declares what it can do by implementing [`Composable`], [`Tensorable`],
//! [`Addable`] and [`ScalarMultipliable`]. [`Operator`] dispatches on the variant pair and
//! reports a missing capability as [`AlgebraError::UnsupportedOperation`] instead of panicking.
//! A [`ScalarOp`] meeting a [`SparsePauliOp`] is promoted with
//! [`ScalarOp::to_sparse_pauli_op`] before the operation.

use crate::error::{AlgebraError, AlgebraResult};
use crate::pauli_table::PauliTable;
use crate::scalar_op::ScalarOp;
use crate::sparse_pauli_op::SparsePauliOp;
use crate::stabilizer_table::StabilizerTable;
use derive_more::From;
use num_complex::Complex64;
use std::borrow::Cow;

pub trait Composable: Sized {
    /// `other ∘ self`, optionally with `other` placed on `qargs`.
    ///
    /// # Errors
    ///
    /// Dimension or qubit-argument errors of the implementing type.
    fn compose(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self>;

    /// `self ∘ other`.
    ///
    /// # Errors
    ///
    /// Dimension or qubit-argument errors of the implementing type.
    fn dot(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self>;
}

pub trait Tensorable: Sized {
    /// `self ⊗ other`.
    ///
    /// # Errors
    ///
    /// Shape errors of the implementing type.
    fn tensor(&self, other: &Self) -> AlgebraResult<Self>;

    /// `other ⊗ self`.
    ///
    /// # Errors
    ///
    /// Shape errors of the implementing type.
    fn expand(&self, other: &Self) -> AlgebraResult<Self> {
        other.tensor(self)
    }
}

pub trait Addable: Sized {
    /// # Errors
    ///
    /// Dimension errors of the implementing type.
    fn add(&self, other: &Self) -> AlgebraResult<Self>;
}

pub trait ScalarMultipliable: Sized {
    fn mul_scalar(&self, scalar: Complex64) -> Self;
}

impl Composable for PauliTable {
    fn compose(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        PauliTable::compose(self, other, qargs)
    }

    fn dot(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        PauliTable::dot(self, other, qargs)
    }
}

impl Tensorable for PauliTable {
    fn tensor(&self, other: &Self) -> AlgebraResult<Self> {
        PauliTable::tensor(self, other)
    }
}

impl Addable for PauliTable {
    fn add(&self, other: &Self) -> AlgebraResult<Self> {
        PauliTable::add(self, other)
    }
}

impl Composable for StabilizerTable {
    fn compose(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        StabilizerTable::compose(self, other, qargs)
    }

    fn dot(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        StabilizerTable::dot(self, other, qargs)
    }
}

impl Tensorable for StabilizerTable {
    fn tensor(&self, other: &Self) -> AlgebraResult<Self> {
        StabilizerTable::tensor(self, other)
    }
}

impl Addable for StabilizerTable {
    fn add(&self, other: &Self) -> AlgebraResult<Self> {
        StabilizerTable::add(self, other)
    }
}

impl Composable for SparsePauliOp {
    fn compose(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        SparsePauliOp::compose(self, other, qargs)
    }

    fn dot(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        SparsePauliOp::dot(self, other, qargs)
    }
}

impl Tensorable for SparsePauliOp {
    fn tensor(&self, other: &Self) -> AlgebraResult<Self> {
        Ok(SparsePauliOp::tensor(self, other))
    }
}

impl Addable for SparsePauliOp {
    fn add(&self, other: &Self) -> AlgebraResult<Self> {
        SparsePauliOp::add(self, other)
    }
}

impl ScalarMultipliable for SparsePauliOp {
    fn mul_scalar(&self, scalar: Complex64) -> Self {
        SparsePauliOp::mul_scalar(self, scalar)
    }
}

impl Composable for ScalarOp {
    fn compose(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        ScalarOp::compose(self, other, qargs)
    }

    fn dot(&self, other: &Self, qargs: Option<&[usize]>) -> AlgebraResult<Self> {
        ScalarOp::compose(self, other, qargs)
    }
}

impl Tensorable for ScalarOp {
    fn tensor(&self, other: &Self) -> AlgebraResult<Self> {
        Ok(ScalarOp::tensor(self, other))
    }
}

impl Addable for ScalarOp {
    fn add(&self, other: &Self) -> AlgebraResult<Self> {
        ScalarOp::add(self, other)
    }
}

impl ScalarMultipliable for ScalarOp {
    fn mul_scalar(&self, scalar: Complex64) -> Self {
        ScalarOp::mul_scalar(self, scalar)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Compose,
    Tensor,
    Add,
    ScalarMultiply,
}

#[derive(Clone, Debug, PartialEq, From)]
pub enum Operator {
    PauliTable(PauliTable),
    StabilizerTable(StabilizerTable),
    SparsePauliOp(SparsePauliOp),
    Scalar(ScalarOp),
}

/// Operand pair after promotion, with both sides of the same variant.
enum Operands<'life> {
    Tables(&'life PauliTable, &'life PauliTable),
    Stabilizers(&'life StabilizerTable, &'life StabilizerTable),
    Sums(Cow<'life, SparsePauliOp>, Cow<'life, SparsePauliOp>),
    Scalars(&'life ScalarOp, &'life ScalarOp),
}

impl Operator {
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Operator::PauliTable(_) => "PauliTable",
            Operator::StabilizerTable(_) => "StabilizerTable",
            Operator::SparsePauliOp(_) => "SparsePauliOp",
            Operator::Scalar(_) => "ScalarOp",
        }
    }

    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Compose | Capability::Tensor | Capability::Add => true,
            Capability::ScalarMultiply => matches!(self, Operator::SparsePauliOp(_) | Operator::Scalar(_)),
        }
    }

    /// Qubit count, if the operator acts on qubits.
    #[must_use]
    pub fn num_qubits(&self) -> Option<usize> {
        match self {
            Operator::PauliTable(table) => Some(table.num_qubits()),
            Operator::StabilizerTable(table) => Some(table.num_qubits()),
            Operator::SparsePauliOp(op) => Some(op.num_qubits()),
            Operator::Scalar(scalar) => scalar.num_qubits(),
        }
    }

    fn require(&self, capability: Capability, operation: &'static str) -> AlgebraResult<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(AlgebraError::UnsupportedOperation {
                operation,
                variant: self.variant_name(),
            })
        }
    }

    fn operands<'life>(
        operation: &'static str,
        left: &'life Operator,
        right: &'life Operator,
    ) -> AlgebraResult<Operands<'life>> {
        Ok(match (left, right) {
            (Operator::PauliTable(left), Operator::PauliTable(right)) => Operands::Tables(left, right),
            (Operator::StabilizerTable(left), Operator::StabilizerTable(right)) => Operands::Stabilizers(left, right),
            (Operator::SparsePauliOp(left), Operator::SparsePauliOp(right)) => {
                Operands::Sums(Cow::Borrowed(left), Cow::Borrowed(right))
            }
            (Operator::SparsePauliOp(left), Operator::Scalar(right)) => {
                Operands::Sums(Cow::Borrowed(left), Cow::Owned(right.to_sparse_pauli_op()?))
            }
            (Operator::Scalar(left), Operator::SparsePauliOp(right)) => {
                Operands::Sums(Cow::Owned(left.to_sparse_pauli_op()?), Cow::Borrowed(right))
            }
            (Operator::Scalar(left), Operator::Scalar(right)) => Operands::Scalars(left, right),
            _ => {
                return Err(AlgebraError::MixedOperands {
                    operation,
                    left: left.variant_name(),
                    right: right.variant_name(),
                })
            }
        })
    }

    fn compose_impl(&self, other: &Operator, qargs: Option<&[usize]>, front: bool) -> AlgebraResult<Operator> {
        fn apply<Op: Composable>(left: &Op, right: &Op, qargs: Option<&[usize]>, front: bool) -> AlgebraResult<Op> {
            if front {
                left.dot(right, qargs)
            } else {
                left.compose(right, qargs)
            }
        }
        let operation = if front { "dot" } else { "compose" };
        self.require(Capability::Compose, operation)?;
        other.require(Capability::Compose, operation)?;
        Ok(match Operator::operands(operation, self, other)? {
            Operands::Tables(left, right) => apply(left, right, qargs, front)?.into(),
            Operands::Stabilizers(left, right) => apply(left, right, qargs, front)?.into(),
            Operands::Sums(left, right) => apply(&*left, &*right, qargs, front)?.into(),
            Operands::Scalars(left, right) => apply(left, right, qargs, front)?.into(),
        })
    }

    /// `other ∘ self`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::MixedOperands`] for incompatible variants, otherwise the errors of the
    /// variant's own `compose`.
    pub fn compose(&self, other: &Operator, qargs: Option<&[usize]>) -> AlgebraResult<Operator> {
        self.compose_impl(other, qargs, false)
    }

    /// `self ∘ other`.
    ///
    /// # Errors
    ///
    /// Same as [`Operator::compose`].
    pub fn dot(&self, other: &Operator, qargs: Option<&[usize]>) -> AlgebraResult<Operator> {
        self.compose_impl(other, qargs, true)
    }

    /// # Errors
    ///
    /// [`AlgebraError::MixedOperands`] for incompatible variants, otherwise the errors of the
    /// variant's own `tensor`.
    pub fn tensor(&self, other: &Operator) -> AlgebraResult<Operator> {
        self.require(Capability::Tensor, "tensor")?;
        other.require(Capability::Tensor, "tensor")?;
        Ok(match Operator::operands("tensor", self, other)? {
            Operands::Tables(left, right) => Tensorable::tensor(left, right)?.into(),
            Operands::Stabilizers(left, right) => Tensorable::tensor(left, right)?.into(),
            Operands::Sums(left, right) => Tensorable::tensor(&*left, &*right)?.into(),
            Operands::Scalars(left, right) => Tensorable::tensor(left, right)?.into(),
        })
    }

    /// `other ⊗ self`.
    ///
    /// # Errors
    ///
    /// Same as [`Operator::tensor`].
    pub fn expand(&self, other: &Operator) -> AlgebraResult<Operator> {
        other.tensor(self)
    }

    /// Sum for operators, row concatenation for tables.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::MixedOperands`] for incompatible variants, otherwise the errors of the
    /// variant's own `add`.
    pub fn add(&self, other: &Operator) -> AlgebraResult<Operator> {
        self.require(Capability::Add, "add")?;
        other.require(Capability::Add, "add")?;
        Ok(match Operator::operands("add", self, other)? {
            Operands::Tables(left, right) => Addable::add(left, right)?.into(),
            Operands::Stabilizers(left, right) => Addable::add(left, right)?.into(),
            Operands::Sums(left, right) => Addable::add(&*left, &*right)?.into(),
            Operands::Scalars(left, right) => Addable::add(left, right)?.into(),
        })
    }

    /// # Errors
    ///
    /// [`AlgebraError::UnsupportedOperation`] for Pauli and stabilizer tables.
    pub fn mul_scalar(&self, scalar: Complex64) -> AlgebraResult<Operator> {
        self.require(Capability::ScalarMultiply, "mul_scalar")?;
        match self {
            Operator::SparsePauliOp(op) => Ok(ScalarMultipliable::mul_scalar(op, scalar).into()),
            Operator::Scalar(op) => Ok(ScalarMultipliable::mul_scalar(op, scalar).into()),
            Operator::PauliTable(_) | Operator::StabilizerTable(_) => unreachable!("capability checked above"),
        }
    }
}
