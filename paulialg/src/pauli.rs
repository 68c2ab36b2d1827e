//! Symplectic encoding of single Pauli operators.
//!
//! A [`Pauli`] on N qubits is stored as `i^e · X^x · Z^z` with `x`, `z` bit vectors of
//! length N and `e` an exponent mod 4. Labels use the Hermitian *label form*, where each
//! `Y` stands for `i·X·Z`, so a bare label `P(x,z)` equals `i^{|x∧z|} X^x Z^z`.
//!
//! Labels list the most significant qubit first: the last character acts on qubit 0.

use crate::error::{AlgebraError, AlgebraResult};
use binar::{BitVec, Bitwise, BitwiseMut, BitwisePair, Word};
use quantum_core::{PauliMatrix, PositionedPauli};
use sorted_iter::SortedIterator;
use std::fmt::{Debug, Display};
use std::ops::Mul;
use std::str::FromStr;

#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pauli {
    x_bits: BitVec,
    z_bits: BitVec,
    xz_phase_exponent: u8,
}

/// `|(x1 ⊕ x2) ∧ (z1 ⊕ z2)|`, the Y count of a product, without allocating it.
fn product_y_count(x1: &BitVec, z1: &BitVec, x2: &BitVec, z2: &BitVec) -> usize {
    x1.as_words()
        .iter()
        .zip(z1.as_words())
        .zip(x2.as_words().iter().zip(z2.as_words()))
        .map(|((a, b), (c, d))| ((a ^ c) & (b ^ d)).count_ones() as usize)
        .sum()
}

/// Phase exponent `q` with `P(x1,z1) · P(x2,z2) = i^q · P(x1⊕x2, z1⊕z2)`, all in label form.
///
/// Only popcounts over whole words are involved: `q = |x1∧z1| + |x2∧z2| + 2|z1∧x2| − |x3∧z3|`.
#[must_use]
pub fn product_phase_exponent(x1: &BitVec, z1: &BitVec, x2: &BitVec, z2: &BitVec) -> u8 {
    let left_ys = x1.and_weight(z1);
    let right_ys = x2.and_weight(z2);
    let crossings = z1.and_weight(x2);
    let result_ys = product_y_count(x1, z1, x2, z2);
    let exponent = (left_ys + right_ys + 2 * crossings) % 4 + 4 - result_ys % 4;
    (exponent % 4) as u8
}

/// Symplectic inner product is zero.
#[must_use]
pub fn commutes_with(x1: &BitVec, z1: &BitVec, x2: &BitVec, z2: &BitVec) -> bool {
    x1.dot(z2) == z1.dot(x2)
}

#[must_use]
pub fn anti_commutes_with(x1: &BitVec, z1: &BitVec, x2: &BitVec, z2: &BitVec) -> bool {
    !commutes_with(x1, z1, x2, z2)
}

/// Decodes an `I`/`X`/`Y`/`Z` label into `(x, z)` bits.
pub(crate) fn bits_from_label(label: &str) -> AlgebraResult<(BitVec, BitVec)> {
    let paulis = label
        .chars()
        .rev()
        .map(PauliMatrix::from_char)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| AlgebraError::InvalidLabel {
            label: label.to_owned(),
        })?;
    let x_bits = paulis.iter().map(|pauli| pauli.x_bit()).collect();
    let z_bits = paulis.iter().map(|pauli| pauli.z_bit()).collect();
    Ok((x_bits, z_bits))
}

pub(crate) fn label_from_bits(x_bits: &BitVec, z_bits: &BitVec) -> String {
    (0..x_bits.len())
        .rev()
        .map(|qubit| PauliMatrix::from_bits(x_bits.index(qubit), z_bits.index(qubit)).to_char())
        .collect()
}

/// Splits an optional `+`, `-`, `i`, `+i`, `-i` prefix off a label.
pub(crate) fn split_phase_prefix(label: &str) -> (u8, &str) {
    for (prefix, exponent) in [("+i", 1), ("-i", 3), ("i", 1), ("+", 0), ("-", 2)] {
        if let Some(rest) = label.strip_prefix(prefix) {
            return (exponent, rest);
        }
    }
    (0, label)
}

pub(crate) fn phase_prefix(exponent: u8) -> &'static str {
    match exponent % 4 {
        0 => "",
        1 => "i",
        2 => "-",
        _ => "-i",
    }
}

/// Bit vector of `num_qubits` bits from the low bits of `mask`.
pub(crate) fn bits_from_mask(mask: usize, num_qubits: usize) -> BitVec {
    BitVec::from_word(num_qubits, mask as Word)
}

impl Pauli {
    pub fn identity(num_qubits: usize) -> Self {
        Pauli {
            x_bits: BitVec::zeros(num_qubits),
            z_bits: BitVec::zeros(num_qubits),
            xz_phase_exponent: 0,
        }
    }

    /// `i^xz_phase_exponent · X^x · Z^z`.
    ///
    /// # Panics
    ///
    /// Panics if the bit vectors have different lengths.
    pub fn from_bits(x_bits: BitVec, z_bits: BitVec, xz_phase_exponent: u8) -> Self {
        assert_eq!(x_bits.len(), z_bits.len());
        Pauli {
            x_bits,
            z_bits,
            xz_phase_exponent: xz_phase_exponent % 4,
        }
    }

    /// The Hermitian label-form operator `P(x, z)`.
    pub fn from_hermitian_bits(x_bits: BitVec, z_bits: BitVec) -> Self {
        let y_count = x_bits.and_weight(&z_bits);
        Pauli::from_bits(x_bits, z_bits, (y_count % 4) as u8)
    }

    /// Tensor product of the given single-qubit Paulis, identity elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::InvalidQargs`] if a qubit is out of range or repeated.
    pub fn from_positioned(paulis: &[PositionedPauli], num_qubits: usize) -> AlgebraResult<Self> {
        let mut x_bits = BitVec::zeros(num_qubits);
        let mut z_bits = BitVec::zeros(num_qubits);
        let mut seen = BitVec::zeros(num_qubits);
        for positioned in paulis {
            let qubit = positioned.qubit_id;
            if qubit >= num_qubits || seen.index(qubit) {
                return Err(AlgebraError::InvalidQargs {
                    qargs: paulis.iter().map(|p| p.qubit_id).collect(),
                    num_qubits,
                });
            }
            seen.assign_index(qubit, true);
            x_bits.assign_index(qubit, positioned.pauli.x_bit());
            z_bits.assign_index(qubit, positioned.pauli.z_bit());
        }
        Ok(Pauli::from_hermitian_bits(x_bits, z_bits))
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.x_bits.len()
    }

    pub fn x_bits(&self) -> &BitVec {
        &self.x_bits
    }

    pub fn z_bits(&self) -> &BitVec {
        &self.z_bits
    }

    #[must_use]
    pub fn xz_phase_exponent(&self) -> u8 {
        self.xz_phase_exponent
    }

    /// Exponent `k` with `self = i^k · P(x, z)` in label form.
    #[must_use]
    pub fn label_phase_exponent(&self) -> u8 {
        let y_count = (self.y_count() % 4) as u8;
        (self.xz_phase_exponent + 4 - y_count) % 4
    }

    #[must_use]
    pub fn y_count(&self) -> usize {
        self.x_bits.and_weight(&self.z_bits)
    }

    /// Number of qubits with a non-identity factor.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.x_bits.or_weight(&self.z_bits)
    }

    pub fn support(&self) -> impl SortedIterator<Item = usize> + '_ {
        self.x_bits.support().union(self.z_bits.support())
    }

    #[must_use]
    pub fn pauli_at(&self, qubit: usize) -> PauliMatrix {
        PauliMatrix::from_bits(self.x_bits.index(qubit), self.z_bits.index(qubit))
    }

    /// Identity up to phase.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.x_bits.is_zero() && self.z_bits.is_zero()
    }

    #[must_use]
    pub fn is_hermitian(&self) -> bool {
        self.label_phase_exponent() % 2 == 0
    }

    pub fn add_assign_phase_exponent(&mut self, exponent: u8) {
        self.xz_phase_exponent = (self.xz_phase_exponent + exponent % 4) % 4;
    }

    /// `self ← self · rhs`.
    pub fn mul_assign_right(&mut self, rhs: &Pauli) {
        assert_eq!(self.num_qubits(), rhs.num_qubits());
        let crossings = (self.z_bits.and_weight(&rhs.x_bits) % 2) as u8;
        self.add_assign_phase_exponent(rhs.xz_phase_exponent + 2 * crossings);
        self.x_bits ^= &rhs.x_bits;
        self.z_bits ^= &rhs.z_bits;
    }

    /// `self ← lhs · self`.
    pub fn mul_assign_left(&mut self, lhs: &Pauli) {
        assert_eq!(self.num_qubits(), lhs.num_qubits());
        let crossings = (lhs.z_bits.and_weight(&self.x_bits) % 2) as u8;
        self.add_assign_phase_exponent(lhs.xz_phase_exponent + 2 * crossings);
        self.x_bits ^= &lhs.x_bits;
        self.z_bits ^= &lhs.z_bits;
    }

    #[must_use]
    pub fn commutes_with(&self, other: &Pauli) -> bool {
        commutes_with(&self.x_bits, &self.z_bits, &other.x_bits, &other.z_bits)
    }

    /// Label without phase prefix.
    #[must_use]
    pub fn label(&self) -> String {
        label_from_bits(&self.x_bits, &self.z_bits)
    }

    pub(crate) fn into_bits(self) -> (BitVec, BitVec, u8) {
        (self.x_bits, self.z_bits, self.xz_phase_exponent)
    }

    /// Overwrites the factor on `qubit` without touching the phase exponent.
    pub(crate) fn assign_factor(&mut self, qubit: usize, x_bit: bool, z_bit: bool) {
        self.x_bits.assign_index(qubit, x_bit);
        self.z_bits.assign_index(qubit, z_bit);
    }
}

impl Mul for &Pauli {
    type Output = Pauli;

    fn mul(self, rhs: &Pauli) -> Pauli {
        let mut res = self.clone();
        res.mul_assign_right(rhs);
        res
    }
}

impl FromStr for Pauli {
    type Err = AlgebraError;

    /// Parses labels such as `XIZ`, `-YY` or `+iZ`; the prefix is relative to the label form.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let (exponent, body) = split_phase_prefix(label);
        let (x_bits, z_bits) = bits_from_label(body).map_err(|_| AlgebraError::InvalidLabel {
            label: label.to_owned(),
        })?;
        let mut res = Pauli::from_hermitian_bits(x_bits, z_bits);
        res.add_assign_phase_exponent(exponent);
        Ok(res)
    }
}

impl Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = phase_prefix(self.label_phase_exponent());
        if f.alternate() && prefix.is_empty() {
            write!(f, "+")?;
        }
        write!(f, "{prefix}{}", self.label())
    }
}

impl Debug for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pauli(\"{self:#}\")")
    }
}
