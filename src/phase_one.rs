//! # Phase one
//!
//! Finding an initial basic feasible solution with the help of artificial variables.
//!
//! One artificial variable is added per constraint row and their sum is minimized. If that sum
//! can be brought down to zero, the final basis of the auxiliary problem (after pushing remaining
//! artificial variables out of it) is feasible for the original problem. The original tableau is
//! then rebuilt in canonical form for that basis by multiplying it with the basis inverse.
use log::{debug, info};

use crate::context::{Context, Phase, Step};
use crate::error::SimplexError;
use crate::phase_two::optimize;
use crate::tableau::Tableau;

/// Whether a problem admits a feasible solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Feasible,
    Infeasible,
}

/// Perform phase 1 of the full tableau simplex method.
///
/// The input tableau is expected to contain the cost in the zeroth row and the constraints, with
/// their right-hand sides in column 0, in the remaining rows. No basis needs to be known.
///
/// When feasible, the tableau is replaced by an equivalent one that is canonical with respect to a
/// feasible basis, ready for [`crate::phase_two()`]. Redundant constraint rows are dropped along the
/// way, so the tableau can have fewer rows afterwards.
pub fn phase_one(tableau: &mut Tableau, context: &mut Context) -> Result<Feasibility, SimplexError> {
    let previous = context.enter(Phase::One);
    let result = find_feasible_basis(tableau, context);
    context.leave(previous);
    result
}

fn find_feasible_basis(
    tableau: &mut Tableau,
    context: &mut Context,
) -> Result<Feasibility, SimplexError> {
    tableau.canonicalize();
    if context.config().reduce_rank {
        for row in tableau.reduce_to_rank().into_iter().rev() {
            debug!("constraint row {} is linearly dependent", row);
            context.record(Step::RowRemoved { row });
        }
    }

    if tableau.rows() == 1 {
        return Ok(Feasibility::Feasible);
    }

    let mut auxiliary = auxiliary_tableau(tableau);
    let objective = optimize(&mut auxiliary, context)?;
    context.record(Step::AuxiliarySolved { objective });
    if !tableau.is_zero(objective) {
        info!("problem is infeasible, auxiliary objective value {}", objective);
        return Ok(Feasibility::Infeasible);
    }

    drive_out_artificials(&mut auxiliary, tableau, context)?;

    let inverse = basis_inverse(tableau, auxiliary.basis())?;
    reconstruct(tableau, &inverse, auxiliary.basis());
    info!(
        "feasible basis found after {} pivots, {} constraint rows",
        context.pivots(),
        tableau.rows() - 1
    );

    Ok(Feasibility::Feasible)
}

/// Minimize the sum of one artificial variable per constraint.
///
/// Constraint rows are negated where needed to make the right-hand side non-negative, so that the
/// artificial variables form a feasible basis. The artificial columns follow the original ones.
fn auxiliary_tableau(tableau: &Tableau) -> Tableau {
    let (rows, cols) = (tableau.rows(), tableau.cols());
    let mut auxiliary = Tableau::new(rows, cols + rows - 1).with_epsilon(tableau.epsilon());

    for x in 1..rows {
        let sign = if tableau.get(x, 0) < 0.0 { -1.0 } else { 1.0 };
        for y in 0..cols {
            let value = sign * tableau.get(x, y);
            auxiliary.set(x, y, value);
            auxiliary.set(0, y, auxiliary.get(0, y) - value);
        }

        let artificial = cols + x - 1;
        auxiliary.set(x, artificial, 1.0);
        auxiliary.set_mapping(x, artificial);
    }

    auxiliary
}

/// Replace artificial variables that are still basic (at value zero) by original ones.
///
/// A row without a nonzero original entry is a linear combination of the other constraints and is
/// removed from both tableaus.
fn drive_out_artificials(
    auxiliary: &mut Tableau,
    tableau: &mut Tableau,
    context: &mut Context,
) -> Result<(), SimplexError> {
    let nr_original = tableau.cols();

    let mut row = 1;
    while row < auxiliary.rows() {
        if auxiliary.mapping(row) < nr_original {
            row += 1;
            continue;
        }

        match (1..nr_original).find(|&y| !auxiliary.is_zero(auxiliary.get(row, y))) {
            Some(column) => {
                let element = auxiliary.get(row, column);
                auxiliary.eliminate(row, column)?;
                auxiliary.canonicalize();
                context.count_pivot();
                context.record(Step::Pivot { row, column, element });
                row += 1;
            }
            None => {
                debug!(
                    "artificial x{} can't leave the basis, dropping row {}",
                    auxiliary.mapping(row),
                    row
                );
                auxiliary.remove_row(row);
                tableau.remove_row(row);
                context.record(Step::RowRemoved { row });
            }
        }
    }

    Ok(())
}

/// Inverse of the matrix formed by the columns `basis` of the constraint rows.
///
/// Row `k` of the result belongs to the variable `basis[k]`.
fn basis_inverse(tableau: &Tableau, basis: &[usize]) -> Result<Vec<Vec<f64>>, SimplexError> {
    let m = basis.len();
    let mut augmented = Tableau::new(m, 2 * m).with_epsilon(tableau.epsilon());
    for i in 0..m {
        for (k, &var) in basis.iter().enumerate() {
            augmented.set(i, k, tableau.get(i + 1, var));
        }
        augmented.set(i, m + i, 1.0);
    }

    augmented.to_reduced_row_echelon_form()?;

    Ok((0..m).map(|k| augmented.row(k)[m..].to_vec()).collect())
}

/// Rewrite the constraints as `inverse` times the original constraints and price out the basic
/// variables from the objective row.
fn reconstruct(tableau: &mut Tableau, inverse: &[Vec<f64>], basis: &[usize]) {
    let cols = tableau.cols();
    let mut canonical = Tableau::new(basis.len() + 1, cols).with_epsilon(tableau.epsilon());

    for (k, inverse_row) in inverse.iter().enumerate() {
        for (i, &factor) in inverse_row.iter().enumerate() {
            if factor == 0.0 {
                continue;
            }
            for y in 0..cols {
                let value = canonical.get(k + 1, y) + factor * tableau.get(i + 1, y);
                canonical.set(k + 1, y, value);
            }
        }
        canonical.set_mapping(k + 1, basis[k]);
    }

    for y in 0..cols {
        canonical.set(0, y, tableau.get(0, y));
    }
    for (k, &var) in basis.iter().enumerate() {
        let cost = tableau.get(0, var);
        if cost != 0.0 {
            canonical.combine_rows(0, k + 1, -cost);
        }
    }

    canonical.canonicalize();
    *tableau = canonical;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::context::Config;
    use crate::phase_two::phase_two;
    use crate::tableau::EPS;

    fn example_rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, -10.0, -12.0, -12.0, 0.0, 0.0, 0.0],
            vec![20.0, 1.0, 2.0, 2.0, 1.0, 0.0, 0.0],
            vec![20.0, 2.0, 1.0, 2.0, 0.0, 1.0, 0.0],
            vec![20.0, 2.0, 2.0, 1.0, 0.0, 0.0, 1.0],
        ]
    }

    fn assert_canonical(tableau: &Tableau) {
        for (k, &var) in tableau.basis().iter().enumerate() {
            for x in 0..tableau.rows() {
                let expected = if x == k + 1 { 1.0 } else { 0.0 };
                assert_relative_eq!(tableau.get(x, var), expected, epsilon = EPS);
            }
            assert!(tableau.get(k + 1, 0) >= -EPS);
        }
    }

    #[test]
    fn feasible() {
        let mut tableau = Tableau::from_rows(example_rows()).unwrap();
        let mut context = Context::tracing();
        assert_eq!(phase_one(&mut tableau, &mut context).unwrap(), Feasibility::Feasible);
        assert_eq!(tableau.rows(), 4);
        assert_canonical(&tableau);
        assert!(context.trace().iter().all(|(phase, _)| *phase == Phase::One));
        assert!(context.trace().iter().any(
            |(_, step)| matches!(step, Step::AuxiliarySolved { objective } if objective.abs() < EPS)
        ));

        let value = phase_two(&mut tableau, &mut context).unwrap();
        assert_relative_eq!(value, -136.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_right_hand_side() {
        // minimize 2 x1 + 3 x2 + x3 subject to
        // x1 + 4 x2 + 2 x3 >= 8 and 3 x1 + 2 x2 >= 6, written with surplus variables.
        let mut tableau = Tableau::from_rows(vec![
            vec![0.0, 2.0, 3.0, 1.0, 0.0, 0.0],
            vec![-8.0, -1.0, -4.0, -2.0, 1.0, 0.0],
            vec![-6.0, -3.0, -2.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        let mut context = Context::default();
        assert_eq!(phase_one(&mut tableau, &mut context).unwrap(), Feasibility::Feasible);
        assert_canonical(&tableau);
        assert_relative_eq!(phase_two(&mut tableau, &mut context).unwrap(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn infeasible() {
        // x1 - s1 = 5 and x1 + s2 = 2
        let mut tableau = Tableau::from_rows(vec![
            vec![0.0, 1.0, 0.0, 0.0],
            vec![5.0, 1.0, -1.0, 0.0],
            vec![2.0, 1.0, 0.0, 1.0],
        ])
        .unwrap();
        let mut context = Context::default();
        assert_eq!(phase_one(&mut tableau, &mut context).unwrap(), Feasibility::Infeasible);
    }

    #[test]
    fn duplicated_constraint_is_removed() {
        let mut rows = example_rows();
        rows.insert(2, rows[1].clone());
        let mut tableau = Tableau::from_rows(rows).unwrap();
        let mut context = Context::tracing();

        assert_eq!(phase_one(&mut tableau, &mut context).unwrap(), Feasibility::Feasible);
        assert_eq!(tableau.rows(), 4);
        assert_eq!(context.trace()[0], (Phase::One, Step::RowRemoved { row: 2 }));
        assert_canonical(&tableau);
        assert_relative_eq!(phase_two(&mut tableau, &mut context).unwrap(), -136.0, epsilon = 1e-9);
    }

    #[test]
    fn duplicated_constraint_without_rank_reduction() {
        let mut rows = example_rows();
        rows.insert(2, rows[1].clone());
        let mut tableau = Tableau::from_rows(rows).unwrap();
        let mut context = Context::new(Config {
            reduce_rank: false,
            record_trace: true,
        });

        assert_eq!(phase_one(&mut tableau, &mut context).unwrap(), Feasibility::Feasible);
        assert_eq!(tableau.rows(), 4);
        assert!(context
            .trace()
            .iter()
            .any(|(_, step)| matches!(step, Step::RowRemoved { .. })));
        assert_canonical(&tableau);
        assert_relative_eq!(phase_two(&mut tableau, &mut context).unwrap(), -136.0, epsilon = 1e-9);
    }

    #[test]
    fn artificial_at_zero_is_pivoted_out() {
        // minimize -2 x1 - 2 x2 - 2 x3 subject to
        // -2 x1 - x3 = 0 and -2 x1 + x2 - x3 = 2. The first row is degenerate but not redundant,
        // its artificial variable stays basic at zero after the auxiliary problem is solved.
        let mut tableau = Tableau::from_rows(vec![
            vec![0.0, -2.0, -2.0, -2.0],
            vec![0.0, -2.0, 0.0, -1.0],
            vec![2.0, -2.0, 1.0, -1.0],
        ])
        .unwrap();
        let mut context = Context::tracing();

        assert_eq!(phase_one(&mut tableau, &mut context).unwrap(), Feasibility::Feasible);
        assert_eq!(tableau.rows(), 3);
        assert_eq!(tableau.basis(), &[1, 2]);
        assert!(tableau.basis().iter().all(|&var| var < tableau.cols()));
        assert_canonical(&tableau);

        let solved_at = context
            .trace()
            .iter()
            .position(|(_, step)| matches!(step, Step::AuxiliarySolved { .. }))
            .unwrap();
        assert_eq!(
            context.trace()[solved_at + 1],
            (Phase::One, Step::Pivot { row: 1, column: 1, element: -2.0 })
        );
        assert!(!context
            .trace()
            .iter()
            .any(|(_, step)| matches!(step, Step::RowRemoved { .. })));

        assert_relative_eq!(phase_two(&mut tableau, &mut context).unwrap(), -4.0, epsilon = 1e-9);
        assert_relative_eq!(tableau.get(2, 0), 2.0, epsilon = 1e-9);
        assert_eq!(tableau.mapping(2), 2);
    }

    #[test]
    fn no_constraints() {
        let mut tableau = Tableau::from_rows(vec![vec![0.0, 1.0, 2.0]]).unwrap();
        let mut context = Context::default();
        assert_eq!(phase_one(&mut tableau, &mut context).unwrap(), Feasibility::Feasible);
        assert_eq!(phase_two(&mut tableau, &mut context).unwrap(), 0.0);
    }

    #[test]
    fn auxiliary_problem_layout() {
        let tableau = Tableau::from_rows(vec![
            vec![0.0, 1.0, 1.0],
            vec![-2.0, 1.0, -1.0],
            vec![3.0, 1.0, 1.0],
        ])
        .unwrap();
        let auxiliary = auxiliary_tableau(&tableau);
        assert_eq!(auxiliary.cols(), 5);
        assert_eq!(auxiliary.basis(), &[3, 4]);
        assert_eq!(auxiliary.row(0), &[-5.0, 0.0, -2.0, 0.0, 0.0]);
        assert_eq!(auxiliary.row(1), &[2.0, -1.0, 1.0, 1.0, 0.0]);
        assert_eq!(auxiliary.row(2), &[3.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn inverse_of_basis() {
        let tableau = Tableau::from_rows(vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 2.0],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap();
        let inverse = basis_inverse(&tableau, &[1, 2]).unwrap();
        assert_relative_eq!(inverse[0][0], -0.5);
        assert_relative_eq!(inverse[0][1], 1.0);
        assert_relative_eq!(inverse[1][0], 0.5);
        assert_relative_eq!(inverse[1][1], 0.0);
    }
}
