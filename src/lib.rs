//! Two-phase full tableau simplex method.
//!
//! A [`Tableau`] holds the costs in row 0 and the constraints, with their right-hand sides in
//! column 0, in the remaining rows. [`phase_one()`] finds a feasible basis (or proves there is none)
//! and brings the tableau in canonical form, [`phase_two()`] then minimizes row 0. Pivots follow the
//! leftmost negative reduced cost and the lexicographic ratio test, so degenerate problems can't
//! cycle.
use std::fmt;

pub mod context;
pub mod error;
pub mod experiment;
pub mod phase_one;
pub mod phase_two;
pub mod pivot;
pub mod tableau;

pub use crate::context::{Config, Context, Phase, Step};
pub use crate::error::SimplexError;
pub use crate::phase_one::{phase_one, Feasibility};
pub use crate::phase_two::phase_two;
pub use crate::pivot::{perform_pivot, PivotResult};
pub use crate::tableau::{Tableau, EPS};

/// Final state of a tableau after both phases.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Optimal(Solution),
    Infeasible,
    Unbounded,
}

/// Objective value and the values of the basic variables of an optimal tableau.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    objective: f64,
    values: Vec<(usize, f64)>,
}

impl Solution {
    /// Read the basic solution off a canonical tableau.
    pub fn from_tableau(tableau: &Tableau) -> Self {
        Solution {
            objective: tableau.objective_value(),
            values: (1..tableau.rows())
                .map(|row| (tableau.mapping(row), tableau.get(row, 0)))
                .collect(),
        }
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// `(variable, value)` for every basic row, in row order.
    pub fn values(&self) -> &[(usize, f64)] {
        &self.values
    }

    /// Value of `var`, zero when it is not basic.
    pub fn value_of(&self, var: usize) -> f64 {
        self.values
            .iter()
            .find(|&&(basic, _)| basic == var)
            .map_or(0.0, |&(_, value)| value)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "objective value: {}", self.objective)?;
        for (var, value) in &self.values {
            writeln!(f, "x{} = {}", var, value)?;
        }
        Ok(())
    }
}

/// Run both phases on `tableau`.
///
/// On an optimal outcome the tableau is left in its final canonical form.
pub fn solve(tableau: &mut Tableau, context: &mut Context) -> Result<Outcome, SimplexError> {
    if phase_one(tableau, context)? == Feasibility::Infeasible {
        return Ok(Outcome::Infeasible);
    }

    let value = phase_two(tableau, context)?;
    if value == f64::NEG_INFINITY {
        Ok(Outcome::Unbounded)
    } else {
        Ok(Outcome::Optimal(Solution::from_tableau(tableau)))
    }
}

/// Standard form for LP
///
/// maximize   sum_{j} c[j] * x[j]
/// subject to sum_{j} a[i][j] * x[j] <= b[i] (for all i)
///            x[j] >= 0 (for all j)
#[derive(Debug, Clone)]
pub struct StandardForm {
    c: Vec<f64>,
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
}

impl StandardForm {
    pub fn new(c: Vec<f64>, a: Vec<Vec<f64>>, b: Vec<f64>) -> Result<Self, SimplexError> {
        let dimensions = c.len();
        let num_constraints = b.len();

        if a.len() != num_constraints {
            return Err(SimplexError::Dimension(format!(
                "{} constraint rows for {} right-hand sides",
                a.len(),
                num_constraints
            )));
        }
        if let Some(i) = a.iter().position(|ai| ai.len() != dimensions) {
            return Err(SimplexError::Dimension(format!(
                "constraint {} has {} coefficients, expected {}",
                i,
                a[i].len(),
                dimensions
            )));
        }

        Ok(StandardForm { c, a, b })
    }

    /// Tableau minimizing `-c` with one slack variable per constraint.
    ///
    /// Columns are ordered by [rhs, x, slack], so `x[j]` is variable `j + 1`.
    pub fn to_tableau(&self) -> Tableau {
        let num_variables = self.c.len();
        let num_constraints = self.b.len();

        let mut tableau = Tableau::new(num_constraints + 1, num_variables + num_constraints + 1);
        for (j, &cj) in self.c.iter().enumerate() {
            tableau.set(0, j + 1, -cj);
        }
        for (i, (ai, &bi)) in self.a.iter().zip(&self.b).enumerate() {
            tableau.set(i + 1, 0, bi);
            for (j, &aij) in ai.iter().enumerate() {
                tableau.set(i + 1, j + 1, aij);
            }
            tableau.set(i + 1, num_variables + i + 1, 1.0);
        }
        tableau
    }
}

#[derive(Debug)]
pub enum LPResult {
    Feasible((Vec<f64>, f64)),
    Infeasible,
    Unbounded,
}

pub fn simplex(standard: &StandardForm) -> Result<LPResult, SimplexError> {
    let mut tableau = standard.to_tableau();
    let mut context = Context::default();

    let solution = match solve(&mut tableau, &mut context)? {
        Outcome::Optimal(solution) => solution,
        Outcome::Infeasible => return Ok(LPResult::Infeasible),
        Outcome::Unbounded => return Ok(LPResult::Unbounded),
    };

    let num_variables = standard.c.len();
    let x = (1..=num_variables).map(|var| solution.value_of(var)).collect();

    Ok(LPResult::Feasible((x, -solution.objective())))
}
