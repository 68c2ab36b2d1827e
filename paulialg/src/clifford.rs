//! Clifford unitaries as stabilizer tableaux.
//!
//! A [`Clifford`] `C` on N qubits is stored as the images `C·X_j·C†` and `C·Z_j·C†` of the
//! single-qubit generators. Each image is a Hermitian [`Pauli`] with its phase kept as the
//! exponent of `i^e · X^x · Z^z`. Row `j < N` of the symplectic matrix is the image of `X_j`,
//! row `N + j` the image of `Z_j`; columns are the x bits followed by the z bits.

pub mod canonical;
pub mod synthesis;

use crate::error::{AlgebraError, AlgebraResult};
use crate::operations::{
    asymmetric_two_qubit_operations, qubit_operations, symmetric_two_qubit_operations, Circuit, GateKind, Instruction,
};
use crate::pauli::Pauli;
use crate::pauli_table::check_qubit_counts;
use binar::{BitMatrix, BitVec, Bitwise, BitwisePair};
use std::fmt::{Debug, Display};
use std::str::FromStr;

#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Clifford {
    num_qubits: usize,
    images: Vec<Pauli>,
}

/// `Ω = [[0, I], [I, 0]]`.
#[must_use]
pub fn symplectic_form(num_qubits: usize) -> BitMatrix {
    let mut res = BitMatrix::zeros(2 * num_qubits, 2 * num_qubits);
    for qubit in 0..num_qubits {
        res.set((qubit, num_qubits + qubit), true);
        res.set((num_qubits + qubit, qubit), true);
    }
    res
}

fn generator_name(num_qubits: usize, row: usize) -> String {
    if row < num_qubits {
        format!("X{row}")
    } else {
        format!("Z{}", row - num_qubits)
    }
}

/// Replaces `row` by `G·row·G†`.
fn conjugate_by_gate(row: &mut Pauli, gate: GateKind, qubits: &[usize]) {
    let factor = |row: &Pauli, qubit: usize| (row.x_bits().index(qubit), row.z_bits().index(qubit));
    match gate {
        GateKind::I => {}
        GateKind::X => {
            if factor(row, qubits[0]).1 {
                row.add_assign_phase_exponent(2);
            }
        }
        GateKind::Z => {
            if factor(row, qubits[0]).0 {
                row.add_assign_phase_exponent(2);
            }
        }
        GateKind::Y => {
            let (x_bit, z_bit) = factor(row, qubits[0]);
            if x_bit ^ z_bit {
                row.add_assign_phase_exponent(2);
            }
        }
        GateKind::H => {
            let (x_bit, z_bit) = factor(row, qubits[0]);
            if x_bit && z_bit {
                row.add_assign_phase_exponent(2);
            }
            row.assign_factor(qubits[0], z_bit, x_bit);
        }
        GateKind::S | GateKind::Sdg => {
            let (x_bit, z_bit) = factor(row, qubits[0]);
            if x_bit {
                row.add_assign_phase_exponent(if gate == GateKind::S { 1 } else { 3 });
                row.assign_factor(qubits[0], x_bit, !z_bit);
            }
        }
        GateKind::CX => {
            let (control, target) = (qubits[0], qubits[1]);
            let (control_x, control_z) = factor(row, control);
            let (target_x, target_z) = factor(row, target);
            row.assign_factor(target, target_x ^ control_x, target_z);
            row.assign_factor(control, control_x, control_z ^ target_z);
        }
        GateKind::CZ => {
            let target = [qubits[1]];
            conjugate_by_gate(row, GateKind::H, &target);
            conjugate_by_gate(row, GateKind::CX, qubits);
            conjugate_by_gate(row, GateKind::H, &target);
        }
        GateKind::Swap => {
            let first = factor(row, qubits[0]);
            let second = factor(row, qubits[1]);
            row.assign_factor(qubits[0], second.0, second.1);
            row.assign_factor(qubits[1], first.0, first.1);
        }
    }
}

impl Clifford {
    pub fn identity(num_qubits: usize) -> Self {
        let mut images = Vec::with_capacity(2 * num_qubits);
        for is_z in [false, true] {
            for qubit in 0..num_qubits {
                let mut image = Pauli::identity(num_qubits);
                image.assign_factor(qubit, !is_z, is_z);
                images.push(image);
            }
        }
        Clifford { num_qubits, images }
    }

    /// Validates and wraps images given in generator order `X_0 .. X_{N-1}, Z_0 .. Z_{N-1}`.
    fn from_images(images: Vec<Pauli>) -> AlgebraResult<Self> {
        if images.len() % 2 != 0 {
            return Err(AlgebraError::InvalidShape(format!("{} generator images", images.len())));
        }
        let num_qubits = images.len() / 2;
        for (row, image) in images.iter().enumerate() {
            check_qubit_counts("Clifford", num_qubits, image.num_qubits())?;
            if !image.is_hermitian() {
                return Err(AlgebraError::NonHermitianImage {
                    generator: generator_name(num_qubits, row),
                });
            }
        }
        let res = Clifford { num_qubits, images };
        if !res.is_symplectic() {
            return Err(AlgebraError::NotSymplectic);
        }
        Ok(res)
    }

    /// Builds a tableau from its `2N × 2N` symplectic matrix and the raw phase exponents
    /// (`i^e · X^x · Z^z`) of its rows.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] for mismatched shapes, [`AlgebraError::NotSymplectic`]
    /// if `S·Ω·Sᵗ ≠ Ω`, [`AlgebraError::NonHermitianImage`] for a row that is not Hermitian.
    pub fn from_symplectic(matrix: &BitMatrix, phase_exponents: &[u8]) -> AlgebraResult<Self> {
        let (rows, columns) = matrix.shape();
        if rows != columns || rows % 2 != 0 || phase_exponents.len() != rows {
            return Err(AlgebraError::InvalidShape(format!(
                "{rows}x{columns} symplectic matrix with {} phases",
                phase_exponents.len()
            )));
        }
        let num_qubits = rows / 2;
        let images = matrix
            .rows()
            .zip(phase_exponents)
            .map(|(row, &exponent)| {
                Pauli::from_bits(row.extract(0, num_qubits), row.extract(num_qubits, rows), exponent)
            })
            .collect();
        Clifford::from_images(images)
    }

    /// Like [`Clifford::from_symplectic`], with one sign bit per row relative to the Hermitian
    /// label form of the row.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidShape`] for mismatched shapes, [`AlgebraError::NotSymplectic`]
    /// if `S·Ω·Sᵗ ≠ Ω`.
    pub fn from_sign_bits(matrix: &BitMatrix, signs: &[bool]) -> AlgebraResult<Self> {
        if signs.len() != matrix.row_count() {
            return Err(AlgebraError::InvalidShape(format!(
                "{} sign bits for {} rows",
                signs.len(),
                matrix.row_count()
            )));
        }
        let num_qubits = matrix.column_count() / 2;
        let exponents: Vec<u8> = matrix
            .rows()
            .zip(signs)
            .map(|(row, &negative)| {
                let y_count = row.extract(0, num_qubits).and_weight(&row.extract(num_qubits, 2 * num_qubits));
                ((y_count + if negative { 2 } else { 0 }) % 4) as u8
            })
            .collect();
        Clifford::from_symplectic(matrix, &exponents)
    }

    /// Builds a tableau from the signed labels of the images of `X_j` and `Z_j`,
    /// e.g. `(["+Z"], ["+X"])` for the Hadamard gate.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidLabel`] for unparsable labels, otherwise as
    /// [`Clifford::from_symplectic`].
    pub fn from_image_labels<Label: AsRef<str>>(x_images: &[Label], z_images: &[Label]) -> AlgebraResult<Self> {
        if x_images.len() != z_images.len() {
            return Err(AlgebraError::InvalidShape(format!(
                "{} X images and {} Z images",
                x_images.len(),
                z_images.len()
            )));
        }
        let images = x_images
            .iter()
            .chain(z_images)
            .map(|label| label.as_ref().parse::<Pauli>())
            .collect::<AlgebraResult<Vec<_>>>()?;
        Clifford::from_images(images)
    }

    /// The unitary of `circuit`, with the first instruction applied first.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidGate`] or [`AlgebraError::InvalidQargs`] for malformed instructions.
    pub fn from_circuit(num_qubits: usize, circuit: &[Instruction]) -> AlgebraResult<Self> {
        let mut res = Clifford::identity(num_qubits);
        for instruction in circuit {
            res.append_gate(instruction)?;
        }
        Ok(res)
    }

    /// Product of `4N² + 1` generators drawn uniformly from `H`, `S`, `X`, `Z` on each qubit,
    /// `CX` on each ordered pair and `CZ`, `Swap` on each unordered pair. Not uniform over the
    /// Clifford group.
    pub fn random(num_qubits: usize, random_number_generator: &mut impl rand::Rng) -> Self {
        let mut generators = Vec::new();
        for gate in [GateKind::H, GateKind::S, GateKind::X, GateKind::Z] {
            generators.append(&mut qubit_operations(num_qubits, gate));
        }
        generators.append(&mut asymmetric_two_qubit_operations(num_qubits, GateKind::CX));
        for gate in [GateKind::CZ, GateKind::Swap] {
            generators.append(&mut symmetric_two_qubit_operations(num_qubits, gate));
        }
        let mut res = Clifford::identity(num_qubits);
        if generators.is_empty() {
            return res;
        }
        for _ in 0..4 * num_qubits * num_qubits + 1 {
            let instruction = &generators[random_number_generator.gen_range(0..generators.len())];
            res.apply_gate(instruction.gate, &instruction.qubits);
        }
        res
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// `2N × 2N` matrix whose rows are the x bits followed by the z bits of each image.
    #[must_use]
    pub fn symplectic_matrix(&self) -> BitMatrix {
        let rows = self
            .images
            .iter()
            .map(|image| BitVec::concatenated(image.x_bits(), image.z_bits()))
            .collect();
        BitMatrix::from_rows(rows, 2 * self.num_qubits)
    }

    /// Raw exponents `e` of the rows `i^e · X^x · Z^z`.
    #[must_use]
    pub fn phase_exponents(&self) -> Vec<u8> {
        self.images.iter().map(Pauli::xz_phase_exponent).collect()
    }

    /// `true` for rows equal to minus their Hermitian label form.
    #[must_use]
    pub fn sign_bits(&self) -> Vec<bool> {
        self.images
            .iter()
            .map(|image| image.label_phase_exponent() == 2)
            .collect()
    }

    pub fn image_x(&self, qubit: usize) -> &Pauli {
        &self.images[qubit]
    }

    pub fn image_z(&self, qubit: usize) -> &Pauli {
        &self.images[self.num_qubits + qubit]
    }

    pub(crate) fn images(&self) -> &[Pauli] {
        &self.images
    }

    /// `C·P·C†`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if `pauli` acts on a different number of qubits.
    pub fn image(&self, pauli: &Pauli) -> AlgebraResult<Pauli> {
        check_qubit_counts("image", self.num_qubits, pauli.num_qubits())?;
        Ok(self.conjugate(pauli))
    }

    pub(crate) fn conjugate(&self, pauli: &Pauli) -> Pauli {
        let mut res = Pauli::identity(self.num_qubits);
        res.add_assign_phase_exponent(pauli.xz_phase_exponent());
        for qubit in pauli.x_bits().support() {
            res.mul_assign_right(&self.images[qubit]);
        }
        for qubit in pauli.z_bits().support() {
            res.mul_assign_right(&self.images[self.num_qubits + qubit]);
        }
        res
    }

    fn is_symplectic(&self) -> bool {
        let matrix = self.symplectic_matrix();
        let omega = symplectic_form(self.num_qubits);
        &(&matrix * &omega) * &matrix.transposed() == omega
    }

    /// Symplectic condition and Hermitian images.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.images.iter().all(Pauli::is_hermitian) && self.is_symplectic()
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Clifford::identity(self.num_qubits)
    }

    /// `other ∘ self`: `self` acts first.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn compose(&self, other: &Clifford) -> AlgebraResult<Clifford> {
        check_qubit_counts("compose", self.num_qubits, other.num_qubits)?;
        Ok(Clifford {
            num_qubits: self.num_qubits,
            images: self.images.iter().map(|image| other.conjugate(image)).collect(),
        })
    }

    /// `self ∘ other`: `other` acts first.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::QubitCountMismatch`] if the qubit counts differ.
    pub fn dot(&self, other: &Clifford) -> AlgebraResult<Clifford> {
        other.compose(self)
    }

    /// `self ⊗ other`, with `self` on the more significant qubits.
    pub fn tensor(&self, other: &Clifford) -> Clifford {
        let (high, low) = (self.num_qubits, other.num_qubits);
        let widen_low = |image: &Pauli| {
            Pauli::from_bits(
                BitVec::concatenated(image.x_bits(), &BitVec::zeros(high)),
                BitVec::concatenated(image.z_bits(), &BitVec::zeros(high)),
                image.xz_phase_exponent(),
            )
        };
        let widen_high = |image: &Pauli| {
            Pauli::from_bits(
                BitVec::concatenated(&BitVec::zeros(low), image.x_bits()),
                BitVec::concatenated(&BitVec::zeros(low), image.z_bits()),
                image.xz_phase_exponent(),
            )
        };
        let mut images = Vec::with_capacity(2 * (high + low));
        images.extend(other.images[..low].iter().map(widen_low));
        images.extend(self.images[..high].iter().map(widen_high));
        images.extend(other.images[low..].iter().map(widen_low));
        images.extend(self.images[high..].iter().map(widen_high));
        Clifford {
            num_qubits: high + low,
            images,
        }
    }

    /// `other ⊗ self`.
    pub fn expand(&self, other: &Clifford) -> Clifford {
        other.tensor(self)
    }

    /// `C†`. The symplectic part is `Ω·Sᵗ·Ω`; signs are fixed by conjugating back.
    pub fn inverse(&self) -> Clifford {
        let omega = symplectic_form(self.num_qubits);
        let inverse_matrix = &(&omega * &self.symplectic_matrix().transposed()) * &omega;
        let images = inverse_matrix
            .rows()
            .map(|row| {
                let mut image = Pauli::from_hermitian_bits(
                    row.extract(0, self.num_qubits),
                    row.extract(self.num_qubits, 2 * self.num_qubits),
                );
                if self.conjugate(&image).xz_phase_exponent() == 2 {
                    image.add_assign_phase_exponent(2);
                }
                image
            })
            .collect();
        Clifford {
            num_qubits: self.num_qubits,
            images,
        }
    }

    /// `C ← G·C` for the gate of `instruction`, i.e. the gate acts after `C`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::InvalidGate`] or [`AlgebraError::InvalidQargs`] for malformed instructions.
    pub fn append_gate(&mut self, instruction: &Instruction) -> AlgebraResult<()> {
        instruction.validate(self.num_qubits)?;
        self.apply_gate(instruction.gate, &instruction.qubits);
        Ok(())
    }

    pub(crate) fn apply_gate(&mut self, gate: GateKind, qubits: &[usize]) {
        for image in &mut self.images {
            conjugate_by_gate(image, gate, qubits);
        }
    }

    /// Gate sequence reproducing this tableau exactly: CX-optimal search up to three qubits,
    /// Gaussian elimination beyond.
    #[must_use]
    pub fn to_circuit(&self) -> Circuit {
        if self.num_qubits <= synthesis::MAX_OPTIMAL_QUBITS {
            synthesis::synthesize_optimal_unchecked(self)
        } else {
            synthesis::synthesize_gaussian(self)
        }
    }
}

impl Display for Clifford {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, image) in self.images.iter().enumerate() {
            if row > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}→{image:#}", generator_name(self.num_qubits, row))?;
        }
        Ok(())
    }
}

impl Debug for Clifford {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Clifford({self})")
    }
}

impl FromStr for Clifford {
    type Err = AlgebraError;

    /// Parses the [`Display`] form, `X0→+IZ, X1→+XI, Z0→+IX, Z1→+ZI`; generators may appear in
    /// any order.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || AlgebraError::InvalidLabel { label: text.to_owned() };
        let entries: Vec<&str> = text.split(',').map(str::trim).filter(|entry| !entry.is_empty()).collect();
        if entries.len() % 2 != 0 {
            return Err(invalid());
        }
        let num_qubits = entries.len() / 2;
        let mut images: Vec<Option<Pauli>> = vec![None; 2 * num_qubits];
        for entry in entries {
            let (generator, label) = entry.split_once('→').ok_or_else(invalid)?;
            let offset = match generator.chars().next() {
                Some('X') => 0,
                Some('Z') => num_qubits,
                _ => return Err(invalid()),
            };
            let qubit: usize = generator[1..].parse().map_err(|_| invalid())?;
            if qubit >= num_qubits || images[offset + qubit].is_some() {
                return Err(invalid());
            }
            images[offset + qubit] = Some(label.trim().parse()?);
        }
        let images = images.into_iter().collect::<Option<Vec<_>>>().ok_or_else(invalid)?;
        Clifford::from_images(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hadamard_swaps_x_and_z() {
        let mut clifford = Clifford::identity(1);
        clifford.append_gate(&Instruction::new(GateKind::H, vec![0])).unwrap();
        assert_eq!(clifford, Clifford::from_image_labels(&["Z"], &["X"]).unwrap());
    }

    #[test]
    fn phase_gate_maps_x_to_y() {
        let mut clifford = Clifford::identity(1);
        clifford.append_gate(&Instruction::new(GateKind::S, vec![0])).unwrap();
        assert_eq!(clifford.image_x(0).to_string(), "Y");
        assert_eq!(clifford.image_z(0).to_string(), "Z");
    }

    #[test]
    fn cx_images() {
        let mut clifford = Clifford::identity(2);
        clifford.append_gate(&Instruction::new(GateKind::CX, vec![0, 1])).unwrap();
        assert_eq!(clifford.image_x(0).to_string(), "XX");
        assert_eq!(clifford.image_x(1).to_string(), "XI");
        assert_eq!(clifford.image_z(0).to_string(), "IZ");
        assert_eq!(clifford.image_z(1).to_string(), "ZZ");
    }

    #[test]
    fn rejects_non_symplectic_matrix() {
        let matrix = BitMatrix::identity(2);
        let mut broken = matrix.clone();
        broken.set((1, 0), true);
        broken.set((1, 1), false);
        assert!(Clifford::from_symplectic(&matrix, &[0, 0]).is_ok());
        assert_eq!(Clifford::from_symplectic(&broken, &[0, 0]), Err(AlgebraError::NotSymplectic));
        assert!(Clifford::from_symplectic(&matrix, &[1, 0]).is_err());
    }

    #[test]
    fn display_parses_back() {
        let circuit = [
            Instruction::new(GateKind::H, vec![0]),
            Instruction::new(GateKind::CX, vec![0, 1]),
            Instruction::new(GateKind::S, vec![1]),
            Instruction::new(GateKind::X, vec![0]),
        ];
        let clifford = Clifford::from_circuit(2, &circuit).unwrap();
        assert_eq!(clifford.to_string().parse::<Clifford>().unwrap(), clifford);
    }
}
