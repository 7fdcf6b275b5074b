use crate::math::matrix::{Element, Matrix};
use crate::math::partition::RowRange;
use crate::prelude::{MatrixError, MatrixResult};

/// Computes rows `range` of `lhs * rhs` into `result`.
///
/// Only the rows inside `range` are written. The inner dimension is
/// `min(lhs.width, rhs.height)`, so callers that want a mathematically
/// defined product must check the shapes first.
pub fn multiply_range(
    lhs: &Matrix,
    rhs: &Matrix,
    result: &mut Matrix,
    range: RowRange,
) -> MatrixResult<()> {
    if result.width() != rhs.width() || result.height() != lhs.height() {
        return Err(MatrixError::InvalidArgument(format!(
            "result is {}x{}, expected {}x{}",
            result.height(),
            result.width(),
            lhs.height(),
            rhs.width()
        )));
    }
    if range.start() > range.end_exclusive() || range.end_exclusive() > result.height() {
        return Err(MatrixError::InvalidArgument(format!(
            "row range {:?} exceeds {} rows",
            range,
            result.height()
        )));
    }
    let width = result.width();
    let rows = &mut result.as_mut_slice()[range.start() * width..range.end_exclusive() * width];
    multiply_rows(lhs, rhs, range, rows)
}

/// Worker-side kernel: `out` holds exactly the rows of `range`, nothing else.
pub(crate) fn multiply_rows(
    lhs: &Matrix,
    rhs: &Matrix,
    range: RowRange,
    out: &mut [Element],
) -> MatrixResult<()> {
    let out_width = rhs.width();
    if range.start() > range.end_exclusive() {
        return Err(MatrixError::InvalidArgument(format!(
            "row range {:?} starts after it ends",
            range
        )));
    }
    if out.len() != range.len() * out_width || range.end_exclusive() > lhs.height() {
        return Err(MatrixError::InvalidArgument(format!(
            "output slice of {} elements does not match rows {:?}",
            out.len(),
            range
        )));
    }

    let depth = lhs.width().min(rhs.height());
    let a = lhs.as_slice();
    let b = rhs.as_slice();

    for (local, row) in range.rows().enumerate() {
        let a_row = &a[row * lhs.width()..row * lhs.width() + depth];
        let out_row = &mut out[local * out_width..(local + 1) * out_width];
        for (col, cell) in out_row.iter_mut().enumerate() {
            let mut sum: Element = 0;
            for (k, &a_val) in a_row.iter().enumerate() {
                sum = a_val
                    .checked_mul(b[k * out_width + col])
                    .and_then(|product| sum.checked_add(product))
                    .ok_or(MatrixError::Overflow { row, col })?;
            }
            *cell = sum;
        }
    }
    Ok(())
}
