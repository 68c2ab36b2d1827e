use binar::{Bitwise, BitwisePairMut};
use paulialg::measurement::{diagonal_indices, expectation_values, measurement_groups, measurement_rotation};
use paulialg::{AlgebraError, Clifford, PauliTable};

fn table(labels: &[&str]) -> PauliTable {
    PauliTable::from_labels(labels).unwrap()
}

#[test]
fn groups_cover_every_row_once() {
    let observables = table(&["ZZ", "ZI", "XX", "IX", "YY"]);
    let groups = measurement_groups(&observables).unwrap();
    assert_eq!(groups.iter().map(|group| group.paulis.len()).sum::<usize>(), observables.len());
    let mut labels = groups
        .iter()
        .flat_map(|group| group.paulis.label_iter())
        .collect::<Vec<_>>();
    labels.sort();
    assert_eq!(labels, ["IX", "XX", "YY", "ZI", "ZZ"]);
    assert_eq!(groups[0].paulis.label_iter().collect::<Vec<_>>(), ["ZZ", "ZI"]);
    assert_eq!(groups[0].basis.label(), "ZZ");
    assert!(groups[0].setting.rotation.is_empty());
    assert_eq!(groups[0].setting.measured_qubits, [0, 1]);
}

#[test]
fn rotation_diagonalizes_the_basis() {
    for label in ["XYZ", "YYI", "IXX", "ZIY"] {
        let basis = label.parse().unwrap();
        let setting = measurement_rotation(&basis);
        let rotation = Clifford::from_circuit(3, &setting.rotation).unwrap();
        let rotated = rotation.image(&basis).unwrap();
        assert!(rotated.x_bits().is_zero(), "{label} rotated to {rotated}");
        let mut support = basis.x_bits().clone();
        support.bitor_assign(basis.z_bits());
        assert_eq!(rotated.z_bits(), &support);
    }
}

#[test]
fn measured_rows_are_restricted_to_read_out_qubits() {
    let groups = measurement_groups(&table(&["XIY", "IIY"])).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].setting.measured_qubits, [0, 2]);
    assert_eq!(groups[0].measured.label_iter().collect::<Vec<_>>(), ["XY", "IY"]);
    let masks = diagonal_indices(&groups[0].paulis);
    assert_eq!(masks[0].support().collect::<Vec<_>>(), [0, 2]);
    assert_eq!(masks[1].support().collect::<Vec<_>>(), [0]);
}

#[test]
fn expectation_values_from_counts() {
    let observables = table(&["ZI", "IZ", "ZZ", "II"]);
    let counts = [("00", 60u64), ("11", 20), ("01", 20)];
    let expectations = expectation_values(counts, &observables).unwrap();
    let values = expectations.iter().map(|expectation| expectation.value).collect::<Vec<_>>();
    assert_eq!(values, [0.6, 0.2, 0.6, 1.0]);
    assert!((expectations[0].variance - 0.64).abs() < 1e-12);
    assert_eq!(expectations[3].variance, 0.0);
}

#[test]
fn register_suffixes_are_ignored() {
    let observables = table(&["Z"]);
    let counts = vec![("1 00".to_owned(), 3u64), ("0 11".to_owned(), 1)];
    let expectations = expectation_values(counts, &observables).unwrap();
    assert_eq!(expectations[0].value, -0.5);
}

#[test]
fn malformed_counts_are_rejected() {
    let observables = table(&["Z"]);
    assert!(matches!(
        expectation_values(Vec::<(&str, u64)>::new(), &observables),
        Err(AlgebraError::Validation(_))
    ));
    assert!(matches!(
        expectation_values([("0", 0u64)], &observables),
        Err(AlgebraError::Validation(_))
    ));
    assert!(matches!(
        expectation_values([("2", 1u64)], &observables),
        Err(AlgebraError::InvalidLabel { .. })
    ));
}

#[test]
fn outcomes_must_cover_every_qubit() {
    let observables = table(&["ZI", "IZ"]);
    assert!(matches!(
        expectation_values([("1", 4u64)], &observables),
        Err(AlgebraError::InvalidLabel { .. })
    ));
    assert!(matches!(
        expectation_values([("10", 2u64), ("110", 2)], &observables),
        Err(AlgebraError::InvalidLabel { .. })
    ));
    let expectations = expectation_values([("10 0", 4u64)], &observables).unwrap();
    assert_eq!(expectations[0].value, -1.0);
    assert_eq!(expectations[1].value, 1.0);
}
