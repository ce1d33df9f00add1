//! # Phase two
//!
//! Optimization of a tableau that is already canonical with respect to a feasible basis.
use log::info;

use crate::context::{Context, Phase};
use crate::error::SimplexError;
use crate::pivot::{perform_pivot, PivotResult};
use crate::tableau::Tableau;

/// Perform phase 2 of the full tableau simplex method.
///
/// # Return value
///
/// The optimal objective value of minimizing row 0, or negative infinity if the problem is
/// unbounded.
pub fn phase_two(tableau: &mut Tableau, context: &mut Context) -> Result<f64, SimplexError> {
    let previous = context.enter(Phase::Two);
    let result = optimize(tableau, context);
    context.leave(previous);

    if let Ok(value) = result {
        info!("phase two finished with objective value {}", value);
    }
    result
}

/// Pivot until optimal or unbounded, without changing the phase recorded in the context.
pub(crate) fn optimize(tableau: &mut Tableau, context: &mut Context) -> Result<f64, SimplexError> {
    loop {
        match perform_pivot(tableau, context)? {
            PivotResult::Optimal => return Ok(tableau.objective_value()),
            PivotResult::Unbounded => return Ok(f64::NEG_INFINITY),
            PivotResult::NonOptimal => {}
        }
    }
}
