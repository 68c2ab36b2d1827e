//! Solver-facing description of a semidefinite program.
//!
//! Variables are real scalars `y`. Constraints are affine equalities `a·y = b` and linear
//! matrix inequalities `F0 + Σ_k y_k F_k ⪰ 0` with sparse Hermitian coefficients. The
//! interior-point machinery lives behind [`SdpSolver`].

use crate::matrix::CMatrix;
use num_complex::Complex64;
use std::fmt::Display;

/// Hermitian matrix given by its non-zero entries; both triangles are stored.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SparseHermitian {
    dimension: usize,
    entries: Vec<(usize, usize, Complex64)>,
}

impl SparseHermitian {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        SparseHermitian {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Adds `value` at `(row, column)` and its conjugate at `(column, row)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of range, or if a diagonal `value` is not real.
    pub fn push(&mut self, row: usize, column: usize, value: Complex64) {
        assert!(row < self.dimension && column < self.dimension);
        if row == column {
            assert!(value.im == 0.0, "diagonal entries of a Hermitian matrix are real");
            self.entries.push((row, column, value));
        } else {
            self.entries.push((row, column, value));
            self.entries.push((column, row, value.conj()));
        }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn entries(&self) -> &[(usize, usize, Complex64)] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn add_scaled_into(&self, target: &mut CMatrix, scale: f64) {
        for &(row, column, value) in &self.entries {
            target[[row, column]] += value * scale;
        }
    }

    #[must_use]
    pub fn to_dense(&self) -> CMatrix {
        let mut res = CMatrix::zeros((self.dimension, self.dimension));
        self.add_scaled_into(&mut res, 1.0);
        res
    }
}

/// `constant + Σ_k y_k · terms[k] ⪰ 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearMatrixInequality {
    name: String,
    constant: SparseHermitian,
    terms: Vec<(usize, SparseHermitian)>,
}

impl LinearMatrixInequality {
    #[must_use]
    pub fn new(name: impl Into<String>, constant: SparseHermitian) -> Self {
        LinearMatrixInequality {
            name: name.into(),
            constant,
            terms: Vec::new(),
        }
    }

    pub fn add_term(&mut self, variable: usize, coefficient: SparseHermitian) {
        assert_eq!(coefficient.dimension(), self.constant.dimension());
        self.terms.push((variable, coefficient));
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.constant.dimension()
    }

    #[must_use]
    pub fn constant(&self) -> &SparseHermitian {
        &self.constant
    }

    #[must_use]
    pub fn terms(&self) -> &[(usize, SparseHermitian)] {
        &self.terms
    }

    /// The matrix `F(y)`.
    #[must_use]
    pub fn evaluate(&self, variables: &[f64]) -> CMatrix {
        let mut res = self.constant.to_dense();
        for (variable, coefficient) in &self.terms {
            coefficient.add_scaled_into(&mut res, variables[*variable]);
        }
        res
    }
}

/// `Σ coefficient · y_variable = rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineEquality {
    pub terms: Vec<(usize, f64)>,
    pub rhs: f64,
}

impl AffineEquality {
    #[must_use]
    pub fn residual(&self, variables: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(variable, coefficient)| coefficient * variables[*variable])
            .sum::<f64>()
            - self.rhs
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// Semidefinite program with a linear objective.
#[derive(Clone, Debug, PartialEq)]
pub struct SdpProblem {
    sense: ObjectiveSense,
    variable_names: Vec<String>,
    objective: Vec<f64>,
    equalities: Vec<AffineEquality>,
    inequalities: Vec<LinearMatrixInequality>,
}

impl SdpProblem {
    #[must_use]
    pub fn new(sense: ObjectiveSense) -> Self {
        SdpProblem {
            sense,
            variable_names: Vec::new(),
            objective: Vec::new(),
            equalities: Vec::new(),
            inequalities: Vec::new(),
        }
    }

    /// Registers a real variable with zero objective weight and returns its index.
    pub fn add_variable(&mut self, name: impl Into<String>) -> usize {
        self.variable_names.push(name.into());
        self.objective.push(0.0);
        self.variable_names.len() - 1
    }

    pub fn set_objective_coefficient(&mut self, variable: usize, coefficient: f64) {
        self.objective[variable] = coefficient;
    }

    pub fn add_equality(&mut self, equality: AffineEquality) {
        self.equalities.push(equality);
    }

    pub fn add_inequality(&mut self, inequality: LinearMatrixInequality) {
        self.inequalities.push(inequality);
    }

    #[must_use]
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.variable_names.len()
    }

    #[must_use]
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    #[must_use]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    #[must_use]
    pub fn equalities(&self) -> &[AffineEquality] {
        &self.equalities
    }

    #[must_use]
    pub fn inequalities(&self) -> &[LinearMatrixInequality] {
        &self.inequalities
    }

    #[must_use]
    pub fn objective_value(&self, variables: &[f64]) -> f64 {
        self.objective.iter().zip(variables).map(|(c, y)| c * y).sum()
    }

    #[must_use]
    pub fn equality_residuals(&self, variables: &[f64]) -> Vec<f64> {
        self.equalities
            .iter()
            .map(|equality| equality.residual(variables))
            .collect()
    }
}

/// Outcome reported by a solver.
#[derive(Clone, Debug, PartialEq)]
pub enum SdpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    MaxIterations,
    NumericalError(String),
    /// The solver could not be run at all.
    Unavailable(String),
}

impl Display for SdpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdpStatus::Optimal => write!(f, "optimal"),
            SdpStatus::Infeasible => write!(f, "infeasible"),
            SdpStatus::Unbounded => write!(f, "unbounded"),
            SdpStatus::MaxIterations => write!(f, "iteration limit reached"),
            SdpStatus::NumericalError(message) => write!(f, "numerical error: {message}"),
            SdpStatus::Unavailable(message) => write!(f, "solver unavailable: {message}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SdpSolution {
    pub status: SdpStatus,
    pub value: f64,
    pub variables: Option<Vec<f64>>,
}

impl SdpSolution {
    #[must_use]
    pub fn failed(status: SdpStatus) -> Self {
        SdpSolution {
            status,
            value: f64::NAN,
            variables: None,
        }
    }
}

/// External semidefinite-program solver.
pub trait SdpSolver {
    fn solve(&self, problem: &SdpProblem) -> SdpSolution;
}

impl<F> SdpSolver for F
where
    F: Fn(&SdpProblem) -> SdpSolution,
{
    fn solve(&self, problem: &SdpProblem) -> SdpSolution {
        self(problem)
    }
}
