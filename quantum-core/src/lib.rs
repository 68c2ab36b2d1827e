use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

/// All elements of a given type. Usually used for simple enums.
pub trait All<const NUM_ELEMENTS: usize>: Sized {
    fn all() -> [Self; NUM_ELEMENTS];
}

const X_BIT: u8 = 0b01;
const Z_BIT: u8 = 0b10;

/// Pauli matrices on one qubit.
///
/// The discriminant is the symplectic encoding: bit 0 is the x bit, bit 1 is the z bit.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, FromPrimitive, ToPrimitive)]
pub enum PauliMatrix {
    /// One qubit identity matrix
    /// ```text
    /// |1 0|
    /// |0 1|
    /// ```
    I = 0b00,

    /// Pauli X
    /// ```text
    /// |0 1|
    /// |1 0|
    /// ```
    X = 0b01,

    /// Pauli Y
    /// ```text
    /// |0 -i|
    /// |i  0|
    /// ```
    Y = 0b11,

    /// Pauli Z
    /// ```text
    /// |1  0|
    /// |0 -1|
    /// ```
    Z = 0b10,
}

impl All<4> for PauliMatrix {
    fn all() -> [Self; 4] {
        [PauliMatrix::I, PauliMatrix::X, PauliMatrix::Y, PauliMatrix::Z]
    }
}

impl PauliMatrix {
    #[must_use]
    pub fn from_bits(x_bit: bool, z_bit: bool) -> PauliMatrix {
        let code = u8::from(x_bit) * X_BIT | u8::from(z_bit) * Z_BIT;
        PauliMatrix::from_u8(code).unwrap_or(PauliMatrix::I)
    }

    #[must_use]
    pub fn x_bit(self) -> bool {
        (self as u8) & X_BIT != 0
    }

    #[must_use]
    pub fn z_bit(self) -> bool {
        (self as u8) & Z_BIT != 0
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == PauliMatrix::I
    }

    /// Label character, one of `I`, `X`, `Y`, `Z`.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            PauliMatrix::I => 'I',
            PauliMatrix::X => 'X',
            PauliMatrix::Y => 'Y',
            PauliMatrix::Z => 'Z',
        }
    }

    #[must_use]
    pub fn from_char(character: char) -> Option<PauliMatrix> {
        match character {
            'I' => Some(PauliMatrix::I),
            'X' => Some(PauliMatrix::X),
            'Y' => Some(PauliMatrix::Y),
            'Z' => Some(PauliMatrix::Z),
            _ => None,
        }
    }

    /// Product `self * rhs = i^k R`, returned as `(k, R)`.
    #[must_use]
    pub fn product(self, rhs: PauliMatrix) -> (u8, PauliMatrix) {
        use PauliMatrix::{I, X, Y, Z};
        let result = PauliMatrix::from_bits(self.x_bit() ^ rhs.x_bit(), self.z_bit() ^ rhs.z_bit());
        let exponent = match (self, rhs) {
            (X, Y) | (Y, Z) | (Z, X) => 1,
            (Y, X) | (Z, Y) | (X, Z) => 3,
            (I, _) | (_, I) | (X, X) | (Y, Y) | (Z, Z) => 0,
        };
        (exponent, result)
    }

    #[must_use]
    pub fn commutes_with(self, other: PauliMatrix) -> bool {
        self.is_identity() || other.is_identity() || self == other
    }
}

/// A single-qubit Pauli matrix acting on a given qubit.
///
/// Ordered by qubit first, then by Pauli.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct PositionedPauli {
    pub qubit_id: usize,
    pub pauli: PauliMatrix,
}

impl PositionedPauli {
    #[must_use]
    pub fn new(qubit_id: usize, pauli: PauliMatrix) -> Self {
        PositionedPauli { qubit_id, pauli }
    }
}

#[must_use]
pub fn x(qubit_id: usize) -> PositionedPauli {
    PositionedPauli::new(qubit_id, PauliMatrix::X)
}

#[must_use]
pub fn y(qubit_id: usize) -> PositionedPauli {
    PositionedPauli::new(qubit_id, PauliMatrix::Y)
}

#[must_use]
pub fn z(qubit_id: usize) -> PositionedPauli {
    PositionedPauli::new(qubit_id, PauliMatrix::Z)
}

#[must_use]
pub fn id(qubit_id: usize) -> PositionedPauli {
    PositionedPauli::new(qubit_id, PauliMatrix::I)
}
