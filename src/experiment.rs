//! # Randomized experiments
//!
//! Solve batches of random tableaus of growing size and collect how they ended and how many pivots
//! they took. All randomness comes from a single generator seeded by the caller, so a run is
//! reproducible from its seed.
use std::fmt;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::context::Context;
use crate::tableau::Tableau;
use crate::{solve, Outcome};

/// Number of problem sizes per experiment; size `k` has `k * factor` constraints.
pub const NR_SIZES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentConfig {
    pub seed: u64,
    /// Multiplier for the number of constraints.
    pub factor: usize,
    /// Problems solved per size.
    pub runs: usize,
    /// Entries are drawn from `[-range, range]`.
    pub range: u32,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            seed: 0,
            factor: 1,
            runs: 100,
            range: 10,
        }
    }
}

/// Statistics over all runs of a single problem size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentReport {
    pub constraints: usize,
    pub variables: usize,
    pub runs: usize,
    pub optimal: usize,
    pub infeasible: usize,
    pub unbounded: usize,
    /// Runs aborted by a numerical error.
    pub errors: usize,
    pub total_pivots: usize,
    pub max_pivots: usize,
}

impl ExperimentReport {
    pub fn mean_pivots(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.total_pivots as f64 / self.runs as f64
        }
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m = {:3}, n = {:3}: {} optimal, {} infeasible, {} unbounded, {} errors, \
             pivots mean {:.2} max {}",
            self.constraints,
            self.variables,
            self.optimal,
            self.infeasible,
            self.unbounded,
            self.errors,
            self.mean_pivots(),
            self.max_pivots
        )
    }
}

/// Run all problem sizes, smallest first.
pub fn run_experiments(config: &ExperimentConfig) -> Vec<ExperimentReport> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (1..=NR_SIZES)
        .map(|k| {
            let constraints = k * config.factor;
            run_size(constraints, 2 * constraints, config, &mut rng)
        })
        .collect()
}

fn run_size(
    constraints: usize,
    variables: usize,
    config: &ExperimentConfig,
    rng: &mut StdRng,
) -> ExperimentReport {
    let mut report = ExperimentReport {
        constraints,
        variables,
        runs: config.runs,
        ..Default::default()
    };

    for run in 0..config.runs {
        let mut tableau = Tableau::random(constraints + 1, variables + 1, config.range, rng);
        tableau.set(0, 0, 0.0);

        let mut context = Context::default();
        match solve(&mut tableau, &mut context) {
            Ok(Outcome::Optimal(_)) => report.optimal += 1,
            Ok(Outcome::Infeasible) => report.infeasible += 1,
            Ok(Outcome::Unbounded) => report.unbounded += 1,
            Err(error) => {
                warn!("run {} of size {}x{} failed: {}", run, constraints, variables, error);
                report.errors += 1;
            }
        }
        report.total_pivots += context.pivots();
        report.max_pivots = report.max_pivots.max(context.pivots());
    }

    debug!("{}", report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproducible() {
        let config = ExperimentConfig {
            seed: 42,
            factor: 2,
            runs: 10,
            range: 5,
        };
        let first = run_experiments(&config);
        let second = run_experiments(&config);
        assert_eq!(first, second);

        assert_eq!(first.len(), NR_SIZES);
        for (k, report) in first.iter().enumerate() {
            assert_eq!(report.constraints, 2 * (k + 1));
            assert_eq!(report.variables, 4 * (k + 1));
            assert_eq!(
                report.optimal + report.infeasible + report.unbounded + report.errors,
                config.runs
            );
            assert!(report.max_pivots as f64 >= report.mean_pivots());
        }
    }

    #[test]
    fn report_line() {
        let report = ExperimentReport {
            constraints: 2,
            variables: 4,
            runs: 4,
            optimal: 1,
            infeasible: 2,
            unbounded: 1,
            errors: 0,
            total_pivots: 10,
            max_pivots: 5,
        };
        assert_eq!(
            report.to_string(),
            "m =   2, n =   4: 1 optimal, 2 infeasible, 1 unbounded, 0 errors, pivots mean 2.50 max 5"
        );
    }
}
