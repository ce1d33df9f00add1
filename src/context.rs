//! Execution context threaded through both phases.
//!
//! Holds the solver configuration, the number of pivots performed so far and, when requested, a
//! log of every step the algorithm took. Rendering the log is left to the caller.
use std::fmt;

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Drop linearly dependent constraint rows before building the auxiliary problem.
    pub reduce_rank: bool,
    /// Record a [`Step`] for every pivot and row removal.
    pub record_trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reduce_rank: true,
            record_trace: false,
        }
    }
}

/// Phase of the two phase method a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    One,
    Two,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::One => f.write_str("phase 1"),
            Phase::Two => f.write_str("phase 2"),
        }
    }
}

/// A single event emitted by the algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Variable `column` entered the basis in `row`.
    Pivot {
        row: usize,
        column: usize,
        /// The pivot element before scaling.
        element: f64,
    },
    /// A constraint row was dropped as redundant.
    RowRemoved { row: usize },
    /// The auxiliary problem was solved with the given objective value.
    AuxiliarySolved { objective: f64 },
    /// No entering variable exists anymore.
    Optimal { objective: f64 },
    /// The entering column has no positive entry.
    Unbounded { column: usize },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Step::Pivot { row, column, element } => {
                write!(f, "pivot on ({}, {}), element {}", row, column, element)
            }
            Step::RowRemoved { row } => write!(f, "removed redundant row {}", row),
            Step::AuxiliarySolved { objective } => {
                write!(f, "auxiliary objective value {}", objective)
            }
            Step::Optimal { objective } => write!(f, "optimal, objective value {}", objective),
            Step::Unbounded { column } => write!(f, "unbounded along column {}", column),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    config: Config,
    pivots: usize,
    trace: Vec<(Phase, Step)>,
    phase: Option<Phase>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Context {
            config,
            ..Default::default()
        }
    }

    /// Context recording every step, for verbose output.
    pub fn tracing() -> Self {
        Context::new(Config {
            record_trace: true,
            ..Config::default()
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Total number of pivots over both phases.
    pub fn pivots(&self) -> usize {
        self.pivots
    }

    pub fn trace(&self) -> &[(Phase, Step)] {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Vec<(Phase, Step)> {
        std::mem::take(&mut self.trace)
    }

    pub(crate) fn enter(&mut self, phase: Phase) -> Option<Phase> {
        self.phase.replace(phase)
    }

    pub(crate) fn leave(&mut self, previous: Option<Phase>) {
        self.phase = previous;
    }

    pub(crate) fn count_pivot(&mut self) {
        self.pivots += 1;
    }

    pub(crate) fn record(&mut self, step: Step) {
        if self.config.record_trace {
            self.trace.push((self.phase.unwrap_or(Phase::Two), step));
        }
    }
}
