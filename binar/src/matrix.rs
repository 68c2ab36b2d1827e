use crate::{BitVec, Bitwise, BitwiseMut};
use std::fmt::{Debug, Display};
use std::ops::{Add, BitXor, BitXorAssign, Index, Mul};

/// Dense matrix over GF(2) stored row by row.
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    rows: Vec<BitVec>,
    column_count: usize,
}

static TRUE: bool = true;
static FALSE: bool = false;

impl BitMatrix {
    pub fn zeros(row_count: usize, column_count: usize) -> Self {
        BitMatrix {
            rows: vec![BitVec::zeros(column_count); row_count],
            column_count,
        }
    }

    pub fn identity(dimension: usize) -> Self {
        let mut res = BitMatrix::zeros(dimension, dimension);
        for index in 0..dimension {
            res.set((index, index), true);
        }
        res
    }

    /// # Panics
    ///
    /// Panics if some row does not have `column_count` bits.
    pub fn from_rows(rows: Vec<BitVec>, column_count: usize) -> Self {
        assert!(rows.iter().all(|row| row.len() == column_count), "ragged rows");
        BitMatrix { rows, column_count }
    }

    pub fn from_row_iter<Row, Rows>(rows: Rows, column_count: usize) -> Self
    where
        Row: IntoIterator<Item = bool>,
        Rows: IntoIterator<Item = Row>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut bits: BitVec = row.into_iter().collect();
                bits.resize(column_count);
                bits
            })
            .collect();
        BitMatrix { rows, column_count }
    }

    /// Stacks `top` above `bottom`.
    ///
    /// # Panics
    ///
    /// Panics if the column counts differ.
    pub fn row_stacked(top: &BitMatrix, bottom: &BitMatrix) -> Self {
        assert_eq!(top.column_count, bottom.column_count);
        let mut rows = top.rows.clone();
        rows.extend(bottom.rows.iter().cloned());
        BitMatrix {
            rows,
            column_count: top.column_count,
        }
    }

    /// Places `left` in columns `0..left.column_count()` and `right` after it.
    ///
    /// # Panics
    ///
    /// Panics if the row counts differ.
    pub fn column_stacked(left: &BitMatrix, right: &BitMatrix) -> Self {
        assert_eq!(left.row_count(), right.row_count());
        let rows = left
            .rows
            .iter()
            .zip(&right.rows)
            .map(|(left_row, right_row)| BitVec::concatenated(left_row, right_row))
            .collect();
        BitMatrix {
            rows,
            column_count: left.column_count + right.column_count,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count)
    }

    pub fn row(&self, index: usize) -> &BitVec {
        &self.rows[index]
    }

    pub fn row_mut(&mut self, index: usize) -> &mut BitVec {
        &mut self.rows[index]
    }

    pub fn rows(&self) -> std::slice::Iter<'_, BitVec> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<BitVec> {
        self.rows
    }

    pub fn push_row(&mut self, row: BitVec) {
        assert_eq!(row.len(), self.column_count);
        self.rows.push(row);
    }

    #[must_use]
    pub fn get(&self, (row, column): (usize, usize)) -> bool {
        self.rows[row].index(column)
    }

    pub fn set(&mut self, (row, column): (usize, usize), to: bool) {
        self.rows[row].assign_index(column, to);
    }

    pub fn negate(&mut self, (row, column): (usize, usize)) {
        self.rows[row].negate_index(column);
    }

    pub fn column(&self, index: usize) -> BitVec {
        self.rows.iter().map(|row| row.index(index)).collect()
    }

    pub fn swap_rows(&mut self, first: usize, second: usize) {
        self.rows.swap(first, second);
    }

    pub fn swap_columns(&mut self, first: usize, second: usize) {
        for row in &mut self.rows {
            let (a, b) = (row.index(first), row.index(second));
            row.assign_index(first, b);
            row.assign_index(second, a);
        }
    }

    /// `rows[target] ^= rows[source]`.
    pub fn add_into_row(&mut self, target: usize, source: usize) {
        if target == source {
            self.rows[target].clear_bits();
            return;
        }
        let source_row = self.rows[source].clone();
        self.rows[target] ^= &source_row;
    }

    pub fn select_rows(&self, indexes: &[usize]) -> BitMatrix {
        BitMatrix {
            rows: indexes.iter().map(|&index| self.rows[index].clone()).collect(),
            column_count: self.column_count,
        }
    }

    pub fn select_columns(&self, indexes: &[usize]) -> BitMatrix {
        BitMatrix {
            rows: self.rows.iter().map(|row| row.selected(indexes)).collect(),
            column_count: indexes.len(),
        }
    }

    pub fn transposed(&self) -> BitMatrix {
        let mut res = BitMatrix::zeros(self.column_count, self.row_count());
        for (row_index, row) in self.rows.iter().enumerate() {
            for column_index in row.support() {
                res.set((column_index, row_index), true);
            }
        }
        res
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(Bitwise::is_zero)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.row_count() == self.column_count && self.rows.iter().enumerate().all(|(index, row)| row.is_unit(index))
    }

    /// Brings the matrix to reduced row echelon form in place and returns the pivot columns.
    pub fn echelonize(&mut self) -> Vec<usize> {
        let mut rank_profile = Vec::new();
        let mut pivot_row = 0;
        for column in 0..self.column_count {
            if pivot_row == self.row_count() {
                break;
            }
            let Some(found) = (pivot_row..self.row_count()).find(|&row| self.rows[row].index(column)) else {
                continue;
            };
            self.swap_rows(pivot_row, found);
            for row in 0..self.row_count() {
                if row != pivot_row && self.rows[row].index(column) {
                    self.add_into_row(row, pivot_row);
                }
            }
            rank_profile.push(column);
            pivot_row += 1;
        }
        rank_profile
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.clone().echelonize().len()
    }

    /// Inverse of a square matrix, `None` when singular.
    #[must_use]
    pub fn inverted(&self) -> Option<BitMatrix> {
        if self.row_count() != self.column_count {
            return None;
        }
        let dimension = self.column_count;
        let mut augmented = BitMatrix::column_stacked(self, &BitMatrix::identity(dimension));
        let rank_profile = augmented.echelonize();
        if rank_profile.len() != dimension || rank_profile.iter().any(|&column| column >= dimension) {
            return None;
        }
        let pivots = (dimension..2 * dimension).collect::<Vec<_>>();
        Some(augmented.select_columns(&pivots))
    }
}

impl Index<(usize, usize)> for BitMatrix {
    type Output = bool;

    fn index(&self, index: (usize, usize)) -> &bool {
        if self.get(index) {
            &TRUE
        } else {
            &FALSE
        }
    }
}

impl Mul for &BitMatrix {
    type Output = BitMatrix;

    /// # Panics
    ///
    /// Panics if the inner dimensions differ.
    fn mul(self, rhs: &BitMatrix) -> BitMatrix {
        assert_eq!(self.column_count, rhs.row_count(), "inner dimensions differ");
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut product = BitVec::zeros(rhs.column_count);
                for index in row.support() {
                    product ^= rhs.row(index);
                }
                product
            })
            .collect();
        BitMatrix {
            rows,
            column_count: rhs.column_count,
        }
    }
}

impl BitXor for &BitMatrix {
    type Output = BitMatrix;

    fn bitxor(self, rhs: &BitMatrix) -> BitMatrix {
        let mut res = self.clone();
        res ^= rhs;
        res
    }
}

impl Add for &BitMatrix {
    type Output = BitMatrix;

    fn add(self, rhs: &BitMatrix) -> BitMatrix {
        self ^ rhs
    }
}

impl BitXorAssign<&BitMatrix> for BitMatrix {
    fn bitxor_assign(&mut self, rhs: &BitMatrix) {
        assert_eq!(self.shape(), rhs.shape());
        for (left, right) in self.rows.iter_mut().zip(&rhs.rows) {
            *left ^= right;
        }
    }
}

impl Display for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl Debug for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitMatrix{:?}\n{self}", self.shape())
    }
}
