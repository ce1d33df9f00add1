use thiserror::Error;

/// Errors that can occur while building or solving a tableau.
///
/// Infeasibility and unboundedness are regular results of the simplex method and are not
/// represented here, see [`crate::Outcome`].
#[derive(Error, Debug)]
pub enum SimplexError {
    #[error("pivot element at row {row}, column {column} is zero")]
    ZeroPivot { row: usize, column: usize },
    #[error("matrix is rank deficient: no row with a nonzero entry in column {column}")]
    RankDeficient { column: usize },
    #[error("dimension mismatch: {0}")]
    Dimension(String),
    #[error("malformed tableau: {0}")]
    Parse(String),
    #[error("failed to read tableau")]
    Io(#[from] std::io::Error),
}
