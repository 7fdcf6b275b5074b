pub use crate::math::matrix::{Element, Matrix};
pub use crate::math::partition::RowRange;

/// Common error type for matrix construction, access and multiplication.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("allocation failed: {0}")]
    Allocation(String),
    #[error("index ({row}, {col}) out of bounds for {height}x{width} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("dimension mismatch: lhs width {lhs_width} != rhs height {rhs_height}")]
    DimensionMismatch { lhs_width: usize, rhs_height: usize },
    #[error("accumulator overflow at ({row}, {col})")]
    Overflow { row: usize, col: usize },
    #[error("worker {worker} failed: {reason}")]
    WorkerFailed { worker: usize, reason: String },
}

pub type MatrixResult<T> = Result<T, MatrixError>;

/// Strategy for computing `lhs * rhs`.
pub trait Multiplier {
    fn multiply(&self, lhs: &Matrix, rhs: &Matrix) -> MatrixResult<Matrix>;
}

/// Operands are compatible when the left width equals the right height.
pub(crate) fn check_dimensions(lhs: &Matrix, rhs: &Matrix) -> MatrixResult<()> {
    if lhs.width() != rhs.height() {
        return Err(MatrixError::DimensionMismatch {
            lhs_width: lhs.width(),
            rhs_height: rhs.height(),
        });
    }
    Ok(())
}
