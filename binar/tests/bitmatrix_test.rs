use binar::{BitMatrix, BitVec, Bitwise};
use proptest::prelude::*;
use rand::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn shape(row_count in 0..100usize, column_count in 0..100usize) {
        let matrix = BitMatrix::zeros(row_count, column_count);
        assert_eq!(matrix.row_count(), row_count);
        assert_eq!(matrix.column_count(), column_count);
        assert_eq!(matrix.shape(), (row_count, column_count));
        assert!(matrix.is_zero());
    }

    #[test]
    fn indexing(matrix in arbitrary_bitmatrix(100)) {
        for irow in 0..matrix.row_count() {
            for icol in 0..matrix.column_count() {
                assert_eq!(matrix[(irow, icol)], matrix.row(irow).index(icol));
            }
        }
    }

    #[test]
    fn swap_rows(matrix in nonempty_bitmatrix(100), raw_row_indexes in (0..100usize, 0..100usize)) {
        let row_indexes = [raw_row_indexes.0 % matrix.row_count(), raw_row_indexes.1 % matrix.row_count()];
        let mut swapped = matrix.clone();
        swapped.swap_rows(row_indexes[0], row_indexes[1]);
        for column_index in 0..matrix.column_count() {
            assert_eq!(matrix[(row_indexes[0], column_index)], swapped[(row_indexes[1], column_index)]);
        }
        for row_index in (0..matrix.row_count()).collect::<HashSet<usize>>().difference(&HashSet::from(row_indexes)) {
            assert_eq!(matrix.row(*row_index), swapped.row(*row_index));
        }
    }

    #[test]
    fn swap_columns(matrix in nonempty_bitmatrix(100), raw_column_indexes in (0..100usize, 0..100usize)) {
        let column_indexes = [raw_column_indexes.0 % matrix.column_count(), raw_column_indexes.1 % matrix.column_count()];
        let mut swapped = matrix.clone();
        swapped.swap_columns(column_indexes[0], column_indexes[1]);
        for row_index in 0..matrix.row_count() {
            assert_eq!(matrix[(row_index, column_indexes[0])], swapped[(row_index, column_indexes[1])]);
        }
        for column_index in (0..matrix.column_count()).collect::<HashSet<usize>>().difference(&HashSet::from(column_indexes)) {
            assert_eq!(matrix.column(*column_index), swapped.column(*column_index));
        }
    }

    #[test]
    fn addition((left, right) in equal_shape_bitmatrices(100)) {
        let sum = &left + &right;
        for irow in 0..left.row_count() {
            for icol in 0..right.column_count() {
                let index = (irow, icol);
                assert_eq!(sum[index], left[index] ^ right[index]);
            }
        }
        assert_eq!(sum, &right ^ &left);
    }

    #[test]
    fn transpose_involution(matrix in arbitrary_bitmatrix(100)) {
        let transposed = matrix.transposed();
        assert_eq!(transposed.shape(), (matrix.column_count(), matrix.row_count()));
        assert_eq!(transposed.transposed(), matrix);
    }

    #[test]
    fn multiplication_matches_definition(dimensions in (1..20usize, 1..20usize, 1..20usize)) {
        let (rows, inner, columns) = dimensions;
        let left = random_bitmatrix(rows, inner);
        let right = random_bitmatrix(inner, columns);
        let product = &left * &right;
        for irow in 0..rows {
            for icol in 0..columns {
                let expected = (0..inner).filter(|&k| left[(irow, k)] && right[(k, icol)]).count() % 2 == 1;
                assert_eq!(product[(irow, icol)], expected);
            }
        }
    }

    #[test]
    fn multiplication_is_associative(dimensions in (1..20usize, 1..20usize, 1..20usize, 1..20usize)) {
        let (a, b, c, d) = dimensions;
        let first = random_bitmatrix(a, b);
        let second = random_bitmatrix(b, c);
        let third = random_bitmatrix(c, d);
        assert_eq!(&(&first * &second) * &third, &first * &(&second * &third));
    }

    #[test]
    fn echelon_form(matrix in arbitrary_bitmatrix(60)) {
        let mut reduced = matrix.clone();
        let rank_profile = reduced.echelonize();
        assert!(rank_profile.windows(2).all(|pair| pair[0] < pair[1]));
        for (row, &column) in rank_profile.iter().enumerate() {
            assert!(reduced.column(column).is_unit(row));
        }
        for row in rank_profile.len()..reduced.row_count() {
            assert!(reduced.row(row).is_zero());
        }
        assert_eq!(matrix.rank(), rank_profile.len());
        assert_eq!(matrix.transposed().rank(), rank_profile.len());
    }

    #[test]
    fn inverse(matrix in invertible_bitmatrix(60)) {
        let inverse = matrix.inverted();
        prop_assert!(inverse.is_some());
        if let Some(inverse) = inverse {
            assert!((&matrix * &inverse).is_identity());
            assert!((&inverse * &matrix).is_identity());
        }
    }

    #[test]
    fn stacking(matrix in nonempty_bitmatrix(40)) {
        let doubled = BitMatrix::row_stacked(&matrix, &matrix);
        assert_eq!(doubled.row_count(), 2 * matrix.row_count());
        assert_eq!(doubled.rank(), matrix.rank());
        let wide = BitMatrix::column_stacked(&matrix, &BitMatrix::identity(matrix.row_count()));
        assert_eq!(wide.rank(), matrix.row_count());
        let left_columns: Vec<usize> = (0..matrix.column_count()).collect();
        assert_eq!(wide.select_columns(&left_columns), matrix);
    }
}

fn random_bitmatrix(row_count: usize, column_count: usize) -> BitMatrix {
    let mut rng = thread_rng();
    let rows = (0..row_count)
        .map(|_| (0..column_count).map(|_| rng.gen_bool(0.5)).collect::<BitVec>())
        .collect();
    BitMatrix::from_rows(rows, column_count)
}

prop_compose! {
   fn arbitrary_bitmatrix(max_dimension: usize)(shape in (0..=max_dimension, 0..=max_dimension)) -> BitMatrix {
       random_bitmatrix(shape.0, shape.1)
   }
}

prop_compose! {
   fn nonempty_bitmatrix(max_dimension: usize)(shape in (1..=max_dimension, 1..=max_dimension)) -> BitMatrix {
       random_bitmatrix(shape.0, shape.1)
   }
}

prop_compose! {
   fn equal_shape_bitmatrices(max_dimension: usize)(shape in (1..=max_dimension, 1..=max_dimension)) -> (BitMatrix, BitMatrix) {
       (random_bitmatrix(shape.0, shape.1), random_bitmatrix(shape.0, shape.1))
   }
}

prop_compose! {
   fn invertible_bitmatrix(max_dimension: usize)(dimension in 1..=max_dimension) -> BitMatrix {
       let mut matrix = BitMatrix::identity(dimension);
       let mut rng = thread_rng();
       for _ in 0..dimension * dimension {
            let from_index = rng.gen_range(0..dimension);
            let to_index = rng.gen_range(0..dimension);
            if from_index != to_index {
                matrix.add_into_row(to_index, from_index);
            }
       }
       matrix
   }
}
