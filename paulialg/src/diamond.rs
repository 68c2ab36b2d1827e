//! Diamond norm of a Hermitian-preserving map from its Choi matrix.
//!
//! The norm is the optimum of Watrous' primal program
//!
//! ```text
//! maximize    Re Tr(J† X)
//! subject to  [[ I ⊗ ρ0, X ], [ X†, I ⊗ ρ1 ]] ⪰ 0,  ρ0, ρ1 ⪰ 0,  Tr ρ0 = Tr ρ1 = 1
//! ```
//!
//! with `X` a free complex `D × D` matrix, `D = d_in · d_out`, and the identity acting on the
//! output space. Rows and columns of `J` are indexed by `o · d_in + i`, output factor first;
//! [`output_major_choi`] converts a Choi matrix stored input factor first. This module only
//! builds the instance and interprets the answer; solving is delegated to an [`SdpSolver`].

use crate::error::{AlgebraError, AlgebraResult};
use crate::matrix::{is_hermitian, CMatrix};
use crate::sdp::{
    AffineEquality, LinearMatrixInequality, ObjectiveSense, SdpProblem, SdpSolution, SdpSolver, SdpStatus,
    SparseHermitian,
};
use crate::DEFAULT_ATOL;
use num_complex::Complex64;
use tracing::{debug, instrument};

const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiamondNormOptions {
    /// Tolerance of the Hermiticity check on the Choi matrix.
    pub hermitian_atol: f64,
    /// Optimal values in `[-value_atol, 0)` are reported as zero.
    pub value_atol: f64,
}

impl Default for DiamondNormOptions {
    fn default() -> Self {
        DiamondNormOptions {
            hermitian_atol: DEFAULT_ATOL,
            value_atol: 1e-6,
        }
    }
}

/// Optimal value, with the optimal input states when the solver returned its variables.
#[derive(Clone, Debug, PartialEq)]
pub struct DiamondNorm {
    pub value: f64,
    pub rho0: Option<CMatrix>,
    pub rho1: Option<CMatrix>,
}

/// Variable indices of a Hermitian `d × d` matrix: one per diagonal entry, a real and an
/// imaginary part per entry above the diagonal.
#[derive(Clone, Debug, PartialEq)]
struct HermitianCoordinates {
    diagonal: Vec<usize>,
    upper: Vec<(usize, usize, usize, usize)>,
}

impl HermitianCoordinates {
    fn register(problem: &mut SdpProblem, name: &str, dimension: usize) -> Self {
        let diagonal = (0..dimension)
            .map(|k| problem.add_variable(format!("{name}[{k},{k}]")))
            .collect();
        let mut upper = Vec::new();
        for row in 0..dimension {
            for column in row + 1..dimension {
                let real = problem.add_variable(format!("re {name}[{row},{column}]"));
                let imaginary = problem.add_variable(format!("im {name}[{row},{column}]"));
                upper.push((row, column, real, imaginary));
            }
        }
        HermitianCoordinates { diagonal, upper }
    }

    fn dimension(&self) -> usize {
        self.diagonal.len()
    }

    /// Adds `Σ_k y_k B_k` to `inequality`, each basis matrix `B_k` repeated on the diagonal
    /// blocks starting at `offsets`.
    fn add_terms(&self, inequality: &mut LinearMatrixInequality, offsets: &[usize]) {
        let dimension = inequality.dimension();
        for (k, &variable) in self.diagonal.iter().enumerate() {
            let mut coefficient = SparseHermitian::new(dimension);
            for offset in offsets {
                coefficient.push(offset + k, offset + k, ONE);
            }
            inequality.add_term(variable, coefficient);
        }
        for &(row, column, real, imaginary) in &self.upper {
            for (variable, value) in [(real, ONE), (imaginary, I)] {
                let mut coefficient = SparseHermitian::new(dimension);
                for offset in offsets {
                    coefficient.push(offset + row, offset + column, value);
                }
                inequality.add_term(variable, coefficient);
            }
        }
    }

    fn unit_trace(&self) -> AffineEquality {
        AffineEquality {
            terms: self.diagonal.iter().map(|&variable| (variable, 1.0)).collect(),
            rhs: 1.0,
        }
    }

    fn decode(&self, variables: &[f64]) -> CMatrix {
        let mut res = CMatrix::zeros((self.dimension(), self.dimension()));
        for (k, &variable) in self.diagonal.iter().enumerate() {
            res[[k, k]] = Complex64::new(variables[variable], 0.0);
        }
        for &(row, column, real, imaginary) in &self.upper {
            let value = Complex64::new(variables[real], variables[imaginary]);
            res[[row, column]] = value;
            res[[column, row]] = value.conj();
        }
        res
    }

    fn encode(&self, matrix: &CMatrix, variables: &mut [f64]) {
        for (k, &variable) in self.diagonal.iter().enumerate() {
            variables[variable] = matrix[[k, k]].re;
        }
        for &(row, column, real, imaginary) in &self.upper {
            variables[real] = matrix[[row, column]].re;
            variables[imaginary] = matrix[[row, column]].im;
        }
    }
}

/// The semidefinite program of one diamond-norm evaluation, with its variable layout.
#[derive(Clone, Debug, PartialEq)]
pub struct DiamondNormProblem {
    problem: SdpProblem,
    input_dim: usize,
    output_dim: usize,
    /// `(re, im)` variables of `X[a, b]`, row-major.
    operator: Vec<(usize, usize)>,
    rho0: HermitianCoordinates,
    rho1: HermitianCoordinates,
}

impl DiamondNormProblem {
    #[must_use]
    pub fn problem(&self) -> &SdpProblem {
        &self.problem
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn joint_dim(&self) -> usize {
        self.input_dim * self.output_dim
    }

    /// Variable vector of the point `(X, ρ0, ρ1)`.
    ///
    /// # Panics
    ///
    /// Panics if a matrix is smaller than the instance requires.
    #[must_use]
    pub fn encode_point(&self, operator: &CMatrix, rho0: &CMatrix, rho1: &CMatrix) -> Vec<f64> {
        let joint_dim = self.joint_dim();
        let mut variables = vec![0.0; self.problem.num_variables()];
        for (index, &(real, imaginary)) in self.operator.iter().enumerate() {
            let value = operator[[index / joint_dim, index % joint_dim]];
            variables[real] = value.re;
            variables[imaginary] = value.im;
        }
        self.rho0.encode(rho0, &mut variables);
        self.rho1.encode(rho1, &mut variables);
        variables
    }

    /// The matrix `X` of a variable vector.
    #[must_use]
    pub fn operator(&self, variables: &[f64]) -> CMatrix {
        let joint_dim = self.joint_dim();
        let mut res = CMatrix::zeros((joint_dim, joint_dim));
        for (index, &(real, imaginary)) in self.operator.iter().enumerate() {
            res[[index / joint_dim, index % joint_dim]] = Complex64::new(variables[real], variables[imaginary]);
        }
        res
    }

    /// `(ρ0, ρ1)` of a variable vector.
    #[must_use]
    pub fn density_matrices(&self, variables: &[f64]) -> (CMatrix, CMatrix) {
        (self.rho0.decode(variables), self.rho1.decode(variables))
    }

    /// Turns a solver answer into the norm.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::Solver`] unless the status is optimal with a finite value no smaller
    /// than `-options.value_atol`, or when the returned variables do not fit the program.
    pub fn interpret(&self, solution: SdpSolution, options: &DiamondNormOptions) -> AlgebraResult<DiamondNorm> {
        let SdpSolution {
            status,
            value,
            variables,
        } = solution;
        if status != SdpStatus::Optimal {
            return Err(AlgebraError::Solver { status });
        }
        if !value.is_finite() {
            return Err(AlgebraError::Solver {
                status: SdpStatus::NumericalError(format!("optimal value {value} is not finite")),
            });
        }
        if value < -options.value_atol {
            return Err(AlgebraError::Solver {
                status: SdpStatus::NumericalError(format!("negative optimal value {value}")),
            });
        }
        let (rho0, rho1) = match variables {
            Some(variables) if variables.len() == self.problem.num_variables() => {
                let (rho0, rho1) = self.density_matrices(&variables);
                (Some(rho0), Some(rho1))
            }
            Some(variables) => {
                return Err(AlgebraError::Solver {
                    status: SdpStatus::NumericalError(format!(
                        "solver returned {} variables for a program with {}",
                        variables.len(),
                        self.problem.num_variables()
                    )),
                });
            }
            None => (None, None),
        };
        Ok(DiamondNorm {
            value: value.max(0.0),
            rho0,
            rho1,
        })
    }
}

fn check_choi_shape(choi: &CMatrix, input_dim: usize, output_dim: usize) -> AlgebraResult<()> {
    let (rows, columns) = choi.dim();
    if rows != columns {
        return Err(AlgebraError::InvalidShape(format!("Choi matrix is {rows}x{columns}, not square")));
    }
    if input_dim == 0 || output_dim == 0 {
        return Err(AlgebraError::InvalidShape(format!(
            "channel dimensions must be positive, got {input_dim} -> {output_dim}"
        )));
    }
    if rows != input_dim * output_dim {
        return Err(AlgebraError::DimensionMismatch {
            operation: "diamond_norm",
            left: input_dim * output_dim,
            right: rows,
        });
    }
    Ok(())
}

fn check_choi(choi: &CMatrix, input_dim: usize, output_dim: usize, options: &DiamondNormOptions) -> AlgebraResult<()> {
    check_choi_shape(choi, input_dim, output_dim)?;
    if !is_hermitian(choi, options.hermitian_atol) {
        return Err(AlgebraError::Validation(
            "Choi matrix of a Hermitian-preserving map must be Hermitian".to_owned(),
        ));
    }
    Ok(())
}

/// Reorders a Choi matrix indexed by `i · d_out + o` (input factor first) into the `o · d_in + i`
/// layout taken by this module.
///
/// ```
/// use num_complex::Complex64;
/// use paulialg::diamond::output_major_choi;
/// use paulialg::CMatrix;
///
/// // |0⟩⟨0| on the input times |1⟩⟨1| on the output, input factor first.
/// let mut input_major = CMatrix::zeros((4, 4));
/// input_major[[1, 1]] = Complex64::new(1.0, 0.0);
/// let output_major = output_major_choi(&input_major, 2, 2).unwrap();
/// assert_eq!(output_major[[2, 2]], Complex64::new(1.0, 0.0));
/// assert_eq!(output_major[[1, 1]], Complex64::new(0.0, 0.0));
/// ```
///
/// # Errors
///
/// [`AlgebraError::InvalidShape`] for a non-square matrix or a zero dimension,
/// [`AlgebraError::DimensionMismatch`] if the size is not `input_dim · output_dim`.
pub fn output_major_choi(choi: &CMatrix, input_dim: usize, output_dim: usize) -> AlgebraResult<CMatrix> {
    check_choi_shape(choi, input_dim, output_dim)?;
    let reordered = |index: usize| (index % output_dim) * input_dim + index / output_dim;
    let joint_dim = input_dim * output_dim;
    let mut res = CMatrix::zeros((joint_dim, joint_dim));
    for ((row, column), &value) in choi.indexed_iter() {
        res[[reordered(row), reordered(column)]] = value;
    }
    Ok(res)
}

/// Builds the program for the Choi matrix `choi` of a map from `input_dim` to `output_dim`
/// dimensions.
///
/// # Errors
///
/// [`AlgebraError::InvalidShape`] for a non-square matrix or a zero dimension,
/// [`AlgebraError::DimensionMismatch`] if the size is not `input_dim · output_dim`, and
/// [`AlgebraError::Validation`] if `choi` is not Hermitian.
pub fn diamond_norm_problem(
    choi: &CMatrix,
    input_dim: usize,
    output_dim: usize,
    options: &DiamondNormOptions,
) -> AlgebraResult<DiamondNormProblem> {
    check_choi(choi, input_dim, output_dim, options)?;
    let joint_dim = input_dim * output_dim;
    let mut problem = SdpProblem::new(ObjectiveSense::Maximize);

    let mut operator = Vec::with_capacity(joint_dim * joint_dim);
    for row in 0..joint_dim {
        for column in 0..joint_dim {
            let real = problem.add_variable(format!("re X[{row},{column}]"));
            let imaginary = problem.add_variable(format!("im X[{row},{column}]"));
            let weight = choi[[row, column]];
            problem.set_objective_coefficient(real, weight.re);
            problem.set_objective_coefficient(imaginary, weight.im);
            operator.push((real, imaginary));
        }
    }
    let rho0 = HermitianCoordinates::register(&mut problem, "rho0", input_dim);
    let rho1 = HermitianCoordinates::register(&mut problem, "rho1", input_dim);

    let mut block = LinearMatrixInequality::new("block", SparseHermitian::new(2 * joint_dim));
    let top_offsets = (0..output_dim).map(|o| o * input_dim).collect::<Vec<_>>();
    let bottom_offsets = top_offsets.iter().map(|offset| joint_dim + offset).collect::<Vec<_>>();
    rho0.add_terms(&mut block, &top_offsets);
    rho1.add_terms(&mut block, &bottom_offsets);
    for (index, &(real, imaginary)) in operator.iter().enumerate() {
        let (row, column) = (index / joint_dim, joint_dim + index % joint_dim);
        for (variable, value) in [(real, ONE), (imaginary, I)] {
            let mut coefficient = SparseHermitian::new(2 * joint_dim);
            coefficient.push(row, column, value);
            block.add_term(variable, coefficient);
        }
    }
    problem.add_inequality(block);

    for (name, rho) in [("rho0", &rho0), ("rho1", &rho1)] {
        let mut positivity = LinearMatrixInequality::new(name, SparseHermitian::new(input_dim));
        rho.add_terms(&mut positivity, &[0]);
        problem.add_inequality(positivity);
        problem.add_equality(rho.unit_trace());
    }

    debug!(
        input_dim,
        output_dim,
        variables = problem.num_variables(),
        block_dimension = 2 * joint_dim,
        "built diamond norm program"
    );
    Ok(DiamondNormProblem {
        problem,
        input_dim,
        output_dim,
        operator,
        rho0,
        rho1,
    })
}

/// Diamond norm with explicit options, keeping the optimal input states.
///
/// # Errors
///
/// Input errors of [`diamond_norm_problem`] and [`AlgebraError::Solver`] when the solver does
/// not report a usable optimum.
#[instrument(level = "debug", skip_all, fields(input_dim = input_dim, output_dim = output_dim))]
pub fn diamond_norm_with(
    choi: &CMatrix,
    input_dim: usize,
    output_dim: usize,
    solver: &impl SdpSolver,
    options: &DiamondNormOptions,
) -> AlgebraResult<DiamondNorm> {
    let instance = diamond_norm_problem(choi, input_dim, output_dim, options)?;
    let solution = solver.solve(instance.problem());
    debug!(status = %solution.status, value = solution.value, "diamond norm solver returned");
    instance.interpret(solution, options)
}

/// # Errors
///
/// Same as [`diamond_norm_with`].
pub fn diamond_norm(choi: &CMatrix, input_dim: usize, output_dim: usize, solver: &impl SdpSolver) -> AlgebraResult<f64> {
    diamond_norm_with(choi, input_dim, output_dim, solver, &DiamondNormOptions::default()).map(|norm| norm.value)
}

/// Diamond norm of the difference of two maps given by their Choi matrices.
///
/// # Errors
///
/// [`AlgebraError::DimensionMismatch`] if the matrices differ in size, otherwise as
/// [`diamond_norm_with`].
pub fn diamond_distance(
    first: &CMatrix,
    second: &CMatrix,
    input_dim: usize,
    output_dim: usize,
    solver: &impl SdpSolver,
) -> AlgebraResult<f64> {
    if first.dim() != second.dim() {
        return Err(AlgebraError::DimensionMismatch {
            operation: "diamond_distance",
            left: first.nrows(),
            right: second.nrows(),
        });
    }
    diamond_norm(&(first - second), input_dim, output_dim, solver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_size() {
        let choi = CMatrix::zeros((4, 4));
        let instance = diamond_norm_problem(&choi, 2, 2, &DiamondNormOptions::default()).unwrap();
        let problem = instance.problem();
        assert_eq!(problem.num_variables(), 2 * 16 + 2 * 4);
        assert_eq!(problem.inequalities().len(), 3);
        assert_eq!(problem.inequalities()[0].dimension(), 8);
        assert_eq!(problem.equalities().len(), 2);
        assert_eq!(problem.sense(), ObjectiveSense::Maximize);
    }

    #[test]
    fn point_round_trip() {
        let choi = CMatrix::zeros((2, 2));
        let instance = diamond_norm_problem(&choi, 2, 1, &DiamondNormOptions::default()).unwrap();
        let mut rho = CMatrix::eye(2) * Complex64::new(0.5, 0.0);
        rho[[0, 1]] = Complex64::new(0.1, 0.2);
        rho[[1, 0]] = Complex64::new(0.1, -0.2);
        let mut operator = CMatrix::zeros((2, 2));
        operator[[1, 0]] = Complex64::new(0.3, -0.4);
        let variables = instance.encode_point(&operator, &rho, &CMatrix::eye(2));
        assert_eq!(instance.operator(&variables), operator);
        assert_eq!(instance.density_matrices(&variables), (rho, CMatrix::eye(2)));
    }
}
