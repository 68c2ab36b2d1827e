use num_complex::Complex64;
use paulialg::diamond::diamond_norm_problem;
use paulialg::sdp::{SdpProblem, SdpSolution, SdpStatus};
use paulialg::{
    diamond_distance, diamond_norm, diamond_norm_with, output_major_choi, AlgebraError, CMatrix, DiamondNormOptions,
};

const TOLERANCE: f64 = 1e-9;

fn real(value: f64) -> Complex64 {
    Complex64::new(value, 0.0)
}

fn units(dimension: usize, entries: &[(usize, usize)]) -> CMatrix {
    let mut res = CMatrix::zeros((dimension, dimension));
    for &(row, column) in entries {
        res[[row, column]] = real(1.0);
    }
    res
}

fn maximally_mixed(dimension: usize) -> CMatrix {
    CMatrix::eye(dimension) * real(1.0 / dimension as f64)
}

/// Cholesky factorization of `matrix + tolerance · I`.
fn is_positive_semidefinite(matrix: &CMatrix, tolerance: f64) -> bool {
    let dimension = matrix.nrows();
    let mut lower = CMatrix::zeros((dimension, dimension));
    for column in 0..dimension {
        let diagonal = matrix[[column, column]].re + tolerance
            - (0..column).map(|k| lower[[column, k]].norm_sqr()).sum::<f64>();
        if diagonal <= 0.0 {
            return false;
        }
        let pivot = diagonal.sqrt();
        lower[[column, column]] = real(pivot);
        for row in column + 1..dimension {
            let dot: Complex64 = (0..column).map(|k| lower[[row, k]] * lower[[column, k]].conj()).sum();
            lower[[row, column]] = (matrix[[row, column]] - dot) / pivot;
        }
    }
    true
}

/// A solver that answers with a known point after checking it is feasible for the instance.
fn certified(point: Vec<f64>) -> impl Fn(&SdpProblem) -> SdpSolution {
    move |problem: &SdpProblem| {
        assert_eq!(point.len(), problem.num_variables());
        for residual in problem.equality_residuals(&point) {
            assert!(residual.abs() < TOLERANCE);
        }
        for inequality in problem.inequalities() {
            assert!(
                is_positive_semidefinite(&inequality.evaluate(&point), TOLERANCE),
                "{} is not positive semidefinite",
                inequality.name()
            );
        }
        SdpSolution {
            status: SdpStatus::Optimal,
            value: problem.objective_value(&point),
            variables: Some(point.clone()),
        }
    }
}

fn answering(status: SdpStatus, value: f64) -> impl Fn(&SdpProblem) -> SdpSolution {
    move |_: &SdpProblem| SdpSolution {
        status: status.clone(),
        value,
        variables: None,
    }
}

/// Choi matrix of `ρ ↦ ρ - (ρ + ZρZ)/2` on one qubit.
fn identity_minus_dephasing() -> CMatrix {
    units(4, &[(0, 3), (3, 0)])
}

fn optimal_point_for_dephasing(choi: &CMatrix) -> Vec<f64> {
    let instance = diamond_norm_problem(choi, 2, 2, &DiamondNormOptions::default()).unwrap();
    let operator = units(4, &[(0, 3), (3, 0)]) * real(0.5);
    instance.encode_point(&operator, &maximally_mixed(2), &maximally_mixed(2))
}

#[test]
fn identity_minus_dephasing_has_norm_one() {
    let choi = identity_minus_dephasing();
    let solver = certified(optimal_point_for_dephasing(&choi));
    let norm = diamond_norm_with(&choi, 2, 2, &solver, &DiamondNormOptions::default()).unwrap();
    assert!((norm.value - 1.0).abs() < TOLERANCE);
    assert_eq!(norm.rho0, Some(maximally_mixed(2)));
    assert_eq!(norm.rho1, Some(maximally_mixed(2)));
    assert!((diamond_norm(&choi, 2, 2, &solver).unwrap() - 1.0).abs() < TOLERANCE);
}

#[test]
fn distance_between_identity_and_dephasing() {
    let identity = units(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);
    let dephasing = units(4, &[(0, 0), (3, 3)]);
    let solver = certified(optimal_point_for_dephasing(&identity_minus_dephasing()));
    let distance = diamond_distance(&identity, &dephasing, 2, 2, &solver).unwrap();
    assert!((distance - 1.0).abs() < TOLERANCE);
}

#[test]
fn zero_map_and_identical_channels() {
    let zero = CMatrix::zeros((4, 4));
    let instance = diamond_norm_problem(&zero, 2, 2, &DiamondNormOptions::default()).unwrap();
    let point = instance.encode_point(&CMatrix::zeros((4, 4)), &maximally_mixed(2), &maximally_mixed(2));
    let solver = certified(point);
    assert_eq!(diamond_norm(&zero, 2, 2, &solver).unwrap(), 0.0);
    let channel = units(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);
    assert_eq!(diamond_distance(&channel, &channel, 2, 2, &solver).unwrap(), 0.0);
}

#[test]
fn objective_is_real_part_of_overlap() {
    let mut choi = CMatrix::zeros((2, 2));
    choi[[0, 1]] = Complex64::new(0.0, 1.0);
    choi[[1, 0]] = Complex64::new(0.0, -1.0);
    let instance = diamond_norm_problem(&choi, 2, 1, &DiamondNormOptions::default()).unwrap();
    let mut operator = CMatrix::zeros((2, 2));
    operator[[0, 1]] = Complex64::new(0.0, 0.5);
    operator[[1, 0]] = Complex64::new(0.0, -0.5);
    let point = instance.encode_point(&operator, &maximally_mixed(2), &maximally_mixed(2));
    let solver = certified(point);
    assert!((diamond_norm(&choi, 2, 1, &solver).unwrap() - 1.0).abs() < TOLERANCE);
}

#[test]
fn solver_failures_are_reported() {
    let choi = identity_minus_dephasing();
    for status in [SdpStatus::Infeasible, SdpStatus::Unbounded, SdpStatus::MaxIterations] {
        let error = diamond_norm(&choi, 2, 2, &answering(status.clone(), 1.0)).unwrap_err();
        assert_eq!(error, AlgebraError::Solver { status });
        assert!(error.is_dependency_error());
    }
    let unavailable = answering(SdpStatus::Unavailable("no backend".to_owned()), f64::NAN);
    let message = diamond_norm(&choi, 2, 2, &unavailable).unwrap_err().to_string();
    assert!(message.contains("no backend"));
    assert!(matches!(
        diamond_norm(&choi, 2, 2, &answering(SdpStatus::Optimal, f64::NAN)),
        Err(AlgebraError::Solver {
            status: SdpStatus::NumericalError(_)
        })
    ));
    assert!(diamond_norm(&choi, 2, 2, &answering(SdpStatus::Optimal, -0.5)).is_err());
}

#[test]
fn tiny_negative_optimum_is_clamped() {
    let choi = identity_minus_dephasing();
    assert_eq!(diamond_norm(&choi, 2, 2, &answering(SdpStatus::Optimal, -1e-9)).unwrap(), 0.0);
    let norm = diamond_norm_with(
        &choi,
        2,
        2,
        &answering(SdpStatus::Optimal, 0.75),
        &DiamondNormOptions::default(),
    )
    .unwrap();
    assert_eq!(norm.value, 0.75);
    assert_eq!(norm.rho0, None);
    let strict = DiamondNormOptions {
        value_atol: 0.0,
        ..DiamondNormOptions::default()
    };
    assert!(diamond_norm_with(&choi, 2, 2, &answering(SdpStatus::Optimal, -1e-9), &strict).is_err());
}

#[test]
fn invalid_choi_matrices_are_rejected() {
    let solver = answering(SdpStatus::Optimal, 1.0);
    let mut skewed = identity_minus_dephasing();
    skewed[[0, 3]] = Complex64::new(0.0, 1.0);
    assert!(matches!(
        diamond_norm(&skewed, 2, 2, &solver),
        Err(AlgebraError::Validation(_))
    ));
    assert!(matches!(
        diamond_norm(&identity_minus_dephasing(), 2, 3, &solver),
        Err(AlgebraError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        diamond_norm(&CMatrix::zeros((4, 2)), 2, 2, &solver),
        Err(AlgebraError::InvalidShape(_))
    ));
    assert!(matches!(
        diamond_norm(&CMatrix::zeros((0, 0)), 0, 2, &solver),
        Err(AlgebraError::InvalidShape(_))
    ));
    assert!(diamond_distance(&CMatrix::zeros((4, 4)), &CMatrix::zeros((2, 2)), 2, 2, &solver)
        .unwrap_err()
        .is_dimension_error());
}

#[test]
fn variables_of_the_wrong_length_are_reported() {
    let choi = identity_minus_dephasing();
    let truncated = move |problem: &SdpProblem| SdpSolution {
        status: SdpStatus::Optimal,
        value: 1.0,
        variables: Some(vec![0.0; problem.num_variables() - 1]),
    };
    let error = diamond_norm_with(&choi, 2, 2, &truncated, &DiamondNormOptions::default()).unwrap_err();
    assert!(matches!(
        error,
        AlgebraError::Solver {
            status: SdpStatus::NumericalError(_)
        }
    ));
    assert!(error.to_string().contains("variables"));
}

#[test]
fn input_major_choi_matrices_are_reordered() {
    let mut input_major = CMatrix::zeros((6, 6));
    for (index, value) in input_major.iter_mut().enumerate() {
        *value = Complex64::new(index as f64, -(index as f64));
    }
    let output_major = output_major_choi(&input_major, 2, 3).unwrap();
    // (i, o) = (1, 2) sits at 1·3 + 2 = 5 input first and at 2·2 + 1 = 5 output first;
    // (i, o) = (0, 1) moves from 1 to 2.
    assert_eq!(output_major[[5, 5]], input_major[[5, 5]]);
    assert_eq!(output_major[[2, 0]], input_major[[1, 0]]);
    assert_eq!(output_major_choi(&output_major, 3, 2).unwrap(), input_major);
    assert_eq!(
        output_major_choi(&identity_minus_dephasing(), 2, 2).unwrap(),
        identity_minus_dephasing()
    );
    assert!(output_major_choi(&input_major, 2, 2).unwrap_err().is_dimension_error());
    assert!(matches!(
        output_major_choi(&CMatrix::zeros((6, 3)), 2, 3),
        Err(AlgebraError::InvalidShape(_))
    ));
}
