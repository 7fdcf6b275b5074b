use crate::math::kernel::multiply_range;
use crate::math::matrix::Matrix;
use crate::math::partition::RowRange;
use crate::prelude::{check_dimensions, MatrixResult, Multiplier};

/// Runs the kernel over every row on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialMultiplier;

impl Multiplier for SequentialMultiplier {
    fn multiply(&self, lhs: &Matrix, rhs: &Matrix) -> MatrixResult<Matrix> {
        check_dimensions(lhs, rhs)?;
        let mut result = Matrix::new(rhs.width(), lhs.height())?;
        multiply_range(lhs, rhs, &mut result, RowRange::new(0, lhs.height()))?;
        Ok(result)
    }
}
