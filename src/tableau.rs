//! # Full tableau
//!
//! Dense row-major storage of a linear program in standard form together with the basis mapping.
//! Row 0 holds the reduced costs, column 0 the right-hand side. The entry at `(0, 0)` is the
//! negated objective value of the current basic solution.
use std::fmt;
use std::io::{BufRead, Read};
use std::ops::Index;
use std::str::FromStr;

use approx::abs_diff_eq;
use log::trace;
use rand::Rng;

use crate::error::SimplexError;

/// Default tolerance for comparisons against zero.
pub const EPS: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    rows: usize,
    cols: usize,
    contents: Vec<f64>,
    /// Variable basic in each row, entry 0 is unused.
    mapping: Vec<usize>,
    epsilon: f64,
}

impl Tableau {
    /// Zero filled tableau.
    pub fn new(rows: usize, cols: usize) -> Self {
        Tableau {
            rows,
            cols,
            contents: vec![0.0; rows * cols],
            mapping: vec![0; rows],
            epsilon: EPS,
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SimplexError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(SimplexError::Dimension(
                "a tableau needs at least one row and one column".to_string(),
            ));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != cols) {
            return Err(SimplexError::Dimension(format!(
                "row {} has {} entries, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }

        let nr_rows = rows.len();
        Ok(Tableau {
            rows: nr_rows,
            cols,
            contents: rows.into_iter().flatten().collect(),
            mapping: vec![0; nr_rows],
            epsilon: EPS,
        })
    }

    /// Read a tableau in text format: a `rows cols` header followed by the entries in row-major
    /// order.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, SimplexError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        text.parse()
    }

    /// Tableau with integer entries drawn uniformly from `[-range, range]`.
    pub fn random<R: Rng>(rows: usize, cols: usize, range: u32, rng: &mut R) -> Self {
        let range = i64::from(range);
        let mut tableau = Tableau::new(rows, cols);
        for value in tableau.contents.iter_mut() {
            *value = rng.random_range(-range..=range) as f64;
        }
        tableau
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Whether `value` is within epsilon of zero.
    pub fn is_zero(&self, value: f64) -> bool {
        abs_diff_eq!(value, 0.0, epsilon = self.epsilon)
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} tableau",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    fn row_start(&self, row: usize) -> usize {
        assert!(row < self.rows, "row {} out of range for {} rows", row, self.rows);
        row * self.cols
    }

    /// # Panics
    ///
    /// If `(row, col)` lies outside the tableau.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.contents[self.offset(row, col)]
    }

    pub fn checked_get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.contents[row * self.cols + col])
        } else {
            None
        }
    }

    /// # Panics
    ///
    /// If `(row, col)` lies outside the tableau.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let offset = self.offset(row, col);
        self.contents[offset] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = self.row_start(row);
        &self.contents[start..start + self.cols]
    }

    /// Variable basic in `row`.
    pub fn mapping(&self, row: usize) -> usize {
        self.mapping[row]
    }

    pub fn set_mapping(&mut self, row: usize, var: usize) {
        self.mapping[row] = var;
    }

    /// Basic variables of the constraint rows, in row order.
    pub fn basis(&self) -> &[usize] {
        self.mapping.get(1..).unwrap_or(&[])
    }

    /// Objective value of the current basic solution.
    pub fn objective_value(&self) -> f64 {
        -self.get(0, 0)
    }

    /// Elementary row operation: multiply `row` by `factor`.
    pub fn scale_row(&mut self, row: usize, factor: f64) {
        let start = self.row_start(row);
        for value in &mut self.contents[start..start + self.cols] {
            *value *= factor;
        }
    }

    /// Elementary row operation: add `factor` times row `source` to row `target`.
    pub fn combine_rows(&mut self, target: usize, source: usize, factor: f64) {
        if target == source {
            self.scale_row(target, 1.0 + factor);
            return;
        }

        let (target, source) = (self.row_start(target), self.row_start(source));
        for y in 0..self.cols {
            let value = self.contents[source + y];
            self.contents[target + y] += factor * value;
        }
    }

    /// Let variable `pivot_col` enter the basis in row `pivot_row`.
    ///
    /// Scales the pivot row to a one in the pivot column and clears that column in every other
    /// row, the objective row included. Fails without touching the tableau when the pivot element
    /// is zero.
    pub fn eliminate(&mut self, pivot_row: usize, pivot_col: usize) -> Result<(), SimplexError> {
        let element = self.get(pivot_row, pivot_col);
        if self.is_zero(element) {
            return Err(SimplexError::ZeroPivot {
                row: pivot_row,
                column: pivot_col,
            });
        }

        self.set_mapping(pivot_row, pivot_col);

        trace!("({}) = ({}) * {}", pivot_row, pivot_row, 1.0 / element);
        self.scale_row(pivot_row, 1.0 / element);
        for x in 0..self.rows {
            if x == pivot_row {
                continue;
            }
            let factor = -self.get(x, pivot_col);
            if factor != 0.0 {
                trace!("({}) = ({}) + ({}) * {}", x, x, pivot_row, factor);
                self.combine_rows(x, pivot_row, factor);
            }
        }

        Ok(())
    }

    /// Delete `row` and its mapping entry, the rows below move up by one.
    pub fn remove_row(&mut self, row: usize) {
        let start = self.row_start(row);
        self.contents.drain(start..start + self.cols);
        self.mapping.remove(row);
        self.rows -= 1;
    }

    /// Set every entry within epsilon of zero to exactly zero.
    pub fn canonicalize(&mut self) {
        let epsilon = self.epsilon;
        for value in self.contents.iter_mut() {
            if abs_diff_eq!(*value, 0.0, epsilon = epsilon) {
                *value = 0.0;
            }
        }
    }

    /// Gauss-Jordan elimination along the diagonal.
    ///
    /// A zero on the diagonal is repaired by adding the first row below it with a nonzero entry in
    /// that column. Requires the leading square block to have full rank.
    pub fn to_reduced_row_echelon_form(&mut self) -> Result<(), SimplexError> {
        self.canonicalize();
        for x in 0..self.rows.min(self.cols) {
            if self.is_zero(self.get(x, x)) {
                let donor = (x + 1..self.rows)
                    .find(|&y| !self.is_zero(self.get(y, x)))
                    .ok_or(SimplexError::RankDeficient { column: x })?;
                self.combine_rows(x, donor, 1.0);
            }
            self.eliminate(x, x)?;
        }
        Ok(())
    }

    /// Constraint rows that are linear combinations of the constraint rows above them, right-hand
    /// side included. Sorted in increasing order.
    pub fn redundant_rows(&self) -> Vec<usize> {
        // Rows in reduced row echelon form, with their pivot column.
        let mut reduced: Vec<(usize, Vec<f64>)> = Vec::new();
        let mut redundant = Vec::new();

        for x in 1..self.rows {
            let mut row = self.row(x).to_vec();
            for (pivot, basis_row) in &reduced {
                let factor = row[*pivot];
                if factor != 0.0 {
                    row.iter_mut().zip(basis_row).for_each(|(value, b)| *value -= factor * b);
                }
            }
            for value in row.iter_mut() {
                if self.is_zero(*value) {
                    *value = 0.0;
                }
            }

            match row.iter().position(|&value| value != 0.0) {
                None => redundant.push(x),
                Some(pivot) => {
                    let element = row[pivot];
                    row.iter_mut().for_each(|value| *value /= element);
                    for (_, basis_row) in reduced.iter_mut() {
                        let factor = basis_row[pivot];
                        if factor != 0.0 {
                            basis_row.iter_mut().zip(&row).for_each(|(b, value)| *b -= factor * value);
                        }
                    }
                    reduced.push((pivot, row));
                }
            }
        }

        redundant
    }

    /// Remove all redundant constraint rows, returning the indices they had.
    pub fn reduce_to_rank(&mut self) -> Vec<usize> {
        let redundant = self.redundant_rows();
        for &row in redundant.iter().rev() {
            self.remove_row(row);
        }
        redundant
    }
}

impl Index<(usize, usize)> for Tableau {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.contents[self.offset(row, col)]
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows, self.cols)?;
        for x in 0..self.rows {
            let line = self
                .row(x)
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for Tableau {
    type Err = SimplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mut dimension = |name: &str| -> Result<usize, SimplexError> {
            let token = tokens
                .next()
                .ok_or_else(|| SimplexError::Parse(format!("missing {} count", name)))?;
            token
                .parse()
                .map_err(|_| SimplexError::Parse(format!("invalid {} count {:?}", name, token)))
        };
        let rows = dimension("row")?;
        let cols = dimension("column")?;
        if rows == 0 || cols == 0 {
            return Err(SimplexError::Parse(format!("empty {}x{} tableau", rows, cols)));
        }

        let mut tableau = Tableau::new(rows, cols);
        for (i, value) in tableau.contents.iter_mut().enumerate() {
            let token = tokens.next().ok_or_else(|| {
                SimplexError::Parse(format!(
                    "expected {} entries, found {}",
                    rows * cols,
                    i
                ))
            })?;
            *value = token.parse().map_err(|_| {
                SimplexError::Parse(format!(
                    "invalid entry {:?} at row {}, column {}",
                    token,
                    i / cols,
                    i % cols
                ))
            })?;
        }
        if let Some(extra) = tokens.next() {
            return Err(SimplexError::Parse(format!("unexpected trailing input {:?}", extra)));
        }

        Ok(tableau)
    }
}
