//! # Pivot engine
//!
//! One iteration of the primal simplex method on a canonical tableau. The entering variable is the
//! leftmost column with a negative reduced cost, the leaving variable is chosen with the
//! lexicographic minimum ratio test. Together they rule out cycling on degenerate problems.
use std::cmp::Ordering;

use log::debug;

use crate::context::{Context, Step};
use crate::error::SimplexError;
use crate::tableau::Tableau;

/// Result of a single pivot step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotResult {
    /// No reduced cost is negative, the current basis is optimal.
    Optimal,
    /// The entering column has no positive entry.
    Unbounded,
    /// A pivot was performed.
    NonOptimal,
}

/// First column with a negative reduced cost.
pub fn entering_column(tableau: &Tableau) -> Option<usize> {
    let epsilon = tableau.epsilon();
    (1..tableau.cols()).find(|&y| tableau.get(0, y) < -epsilon)
}

/// Compare the rows `a` and `b` after dividing each by its entry in column `column`.
///
/// Components are compared from column 0 onwards, values within epsilon count as equal.
pub fn compare_ratios(tableau: &Tableau, a: usize, b: usize, column: usize) -> Ordering {
    let epsilon = tableau.epsilon();
    let (ua, ub) = (tableau.get(a, column), tableau.get(b, column));
    for (va, vb) in tableau.row(a).iter().zip(tableau.row(b)) {
        let difference = va / ua - vb / ub;
        if difference < -epsilon {
            return Ordering::Less;
        }
        if difference > epsilon {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

/// Row with the lexicographically smallest ratio vector among the rows with a positive entry in
/// `column`. Ties go to the topmost row.
pub fn leaving_row(tableau: &Tableau, column: usize) -> Option<usize> {
    let epsilon = tableau.epsilon();
    (1..tableau.rows())
        .filter(|&x| tableau.get(x, column) > epsilon)
        .min_by(|&a, &b| compare_ratios(tableau, a, b, column))
}

/// Perform one iteration of the simplex method.
pub fn perform_pivot(
    tableau: &mut Tableau,
    context: &mut Context,
) -> Result<PivotResult, SimplexError> {
    let column = match entering_column(tableau) {
        Some(column) => column,
        None => {
            context.record(Step::Optimal {
                objective: tableau.objective_value(),
            });
            return Ok(PivotResult::Optimal);
        }
    };

    let row = match leaving_row(tableau, column) {
        Some(row) => row,
        None => {
            debug!("column {} has no positive entry", column);
            context.record(Step::Unbounded { column });
            return Ok(PivotResult::Unbounded);
        }
    };

    let element = tableau.get(row, column);
    debug!(
        "x{} enters in row {} replacing x{}",
        column,
        row,
        tableau.mapping(row)
    );
    tableau.eliminate(row, column)?;
    tableau.canonicalize();

    context.count_pivot();
    context.record(Step::Pivot {
        row,
        column,
        element,
    });

    Ok(PivotResult::NonOptimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn example() -> Tableau {
        let mut tableau = Tableau::from_rows(vec![
            vec![0.0, -10.0, -12.0, -12.0, 0.0, 0.0, 0.0],
            vec![20.0, 1.0, 2.0, 2.0, 1.0, 0.0, 0.0],
            vec![20.0, 2.0, 1.0, 2.0, 0.0, 1.0, 0.0],
            vec![20.0, 2.0, 2.0, 1.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        for (row, col) in [(1, 4), (2, 5), (3, 6)] {
            tableau.set_mapping(row, col);
        }
        tableau
    }

    #[test]
    fn first_pivot() {
        let mut tableau = example();
        let mut context = Context::tracing();
        assert_eq!(perform_pivot(&mut tableau, &mut context).unwrap(), PivotResult::NonOptimal);

        // Rows 2 and 3 tie on the ratio 10, row 2 is lexicographically smaller.
        assert_eq!(tableau.basis(), &[4, 1, 6]);
        assert_relative_eq!(tableau.get(0, 0), 100.0);
        assert_eq!(context.pivots(), 1);
        assert_eq!(
            context.trace()[0].1,
            Step::Pivot { row: 2, column: 1, element: 2.0 }
        );
    }

    #[test]
    fn entering_column_is_leftmost_negative() {
        let mut tableau = example();
        assert_eq!(entering_column(&tableau), Some(1));
        tableau.set(0, 1, -1e-12);
        assert_eq!(entering_column(&tableau), Some(2));
    }

    #[test]
    fn lexicographic_tie_break() {
        let tableau = Tableau::from_rows(vec![
            vec![0.0, -1.0, 0.0, 0.0],
            vec![0.0, 1.0, 1.0, 0.0],
            vec![0.0, 2.0, 0.0, 1.0],
        ])
        .unwrap();
        // Both ratios are zero in column 0, column 1 ties as well, row 2 wins on column 2.
        assert_eq!(compare_ratios(&tableau, 1, 2, 1), Ordering::Greater);
        assert_eq!(compare_ratios(&tableau, 2, 1, 1), Ordering::Less);
        assert_eq!(compare_ratios(&tableau, 2, 2, 1), Ordering::Equal);
        assert_eq!(leaving_row(&tableau, 1), Some(2));
    }

    #[test]
    fn unbounded() {
        let mut tableau = Tableau::from_rows(vec![
            vec![0.0, -1.0, 0.0],
            vec![1.0, -1.0, 1.0],
        ])
        .unwrap();
        tableau.set_mapping(1, 2);
        let before = tableau.clone();
        let mut context = Context::default();
        assert_eq!(perform_pivot(&mut tableau, &mut context).unwrap(), PivotResult::Unbounded);
        assert_eq!(tableau, before);
        assert_eq!(context.pivots(), 0);
    }

    #[test]
    fn optimal() {
        let mut tableau = Tableau::from_rows(vec![
            vec![-3.0, 0.0, 2.0],
            vec![3.0, 1.0, 1.0],
        ])
        .unwrap();
        tableau.set_mapping(1, 1);
        let mut context = Context::tracing();
        assert_eq!(perform_pivot(&mut tableau, &mut context).unwrap(), PivotResult::Optimal);
        assert_eq!(context.trace()[0].1, Step::Optimal { objective: 3.0 });
    }
}
