use crate::error::{AlgebraError, AlgebraResult};
use derive_more::{Display, FromStr};

/// Gates a Clifford tableau can absorb. Synthesis only emits `H`, `S`, `Sdg`, `CX` and Paulis.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Display, FromStr, PartialEq, Eq, Hash)]
pub enum GateKind {
    I,
    X,
    Y,
    Z,
    S,
    Sdg,
    H,
    CX,
    CZ,
    Swap,
}

impl GateKind {
    #[must_use]
    pub fn num_qubits(self) -> usize {
        match self {
            GateKind::CX | GateKind::CZ | GateKind::Swap => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn inverse(self) -> GateKind {
        match self {
            GateKind::S => GateKind::Sdg,
            GateKind::Sdg => GateKind::S,
            other => other,
        }
    }
}

/// One gate on an ordered list of qubits; for `CX` the first qubit is the control.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub gate: GateKind,
    pub qubits: Vec<usize>,
    /// Rotation angle of parametrized gates; `None` throughout the Clifford generator set.
    pub parameter: Option<f64>,
}

pub type Circuit = Vec<Instruction>;

impl Instruction {
    #[must_use]
    pub fn new(gate: GateKind, qubits: Vec<usize>) -> Self {
        Instruction {
            gate,
            qubits,
            parameter: None,
        }
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        Instruction {
            gate: self.gate.inverse(),
            qubits: self.qubits.clone(),
            parameter: self.parameter.map(|angle| -angle),
        }
    }

    /// # Errors
    ///
    /// [`AlgebraError::InvalidGate`] for the wrong number of (distinct) qubits and
    /// [`AlgebraError::InvalidQargs`] for qubits outside `0..num_qubits`.
    pub fn validate(&self, num_qubits: usize) -> AlgebraResult<()> {
        let expected = self.gate.num_qubits();
        let distinct = self.qubits.len() < 2 || self.qubits[0] != self.qubits[1];
        if self.qubits.len() != expected || !distinct {
            return Err(AlgebraError::InvalidGate {
                gate: self.gate.to_string(),
                expected,
                qubits: self.qubits.clone(),
            });
        }
        if self.qubits.iter().any(|&qubit| qubit >= num_qubits) {
            return Err(AlgebraError::InvalidQargs {
                qargs: self.qubits.clone(),
                num_qubits,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.gate)?;
        if let Some(angle) = self.parameter {
            write!(f, "({angle})")?;
        }
        for qubit in &self.qubits {
            write!(f, " {qubit}")?;
        }
        Ok(())
    }
}

/// `gate` on every qubit in turn.
#[must_use]
pub fn qubit_operations(qubit_count: usize, gate: GateKind) -> Circuit {
    (0..qubit_count)
        .map(|qubit| Instruction::new(gate, vec![qubit]))
        .collect()
}

/// `gate` on every ordered pair of distinct qubits.
#[must_use]
pub fn asymmetric_two_qubit_operations(qubit_count: usize, gate: GateKind) -> Circuit {
    let mut res = Vec::new();
    for first in 0..qubit_count {
        for second in 0..qubit_count {
            if first != second {
                res.push(Instruction::new(gate, vec![first, second]));
            }
        }
    }
    res
}

/// `gate` on every unordered pair of distinct qubits.
#[must_use]
pub fn symmetric_two_qubit_operations(qubit_count: usize, gate: GateKind) -> Circuit {
    let mut res = Vec::new();
    for first in 0..qubit_count {
        for second in 0..first {
            res.push(Instruction::new(gate, vec![first, second]));
        }
    }
    res
}
