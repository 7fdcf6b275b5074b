use crate::prelude::{MatrixError, MatrixResult};
use ndarray::ArrayView2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type for both operands and results. Products are accumulated with
/// checked 64-bit arithmetic.
pub type Element = i64;

/// Dense row-major matrix backed by a single flat buffer.
///
/// `data.len() == width * height` holds for every constructed value, and
/// element `(row, col)` lives at `data[row * width + col]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr")]
pub struct Matrix {
    width: usize,
    height: usize,
    data: Vec<Element>,
}

#[derive(Deserialize)]
struct MatrixRepr {
    width: usize,
    height: usize,
    data: Vec<Element>,
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = MatrixError;

    fn try_from(repr: MatrixRepr) -> MatrixResult<Self> {
        Matrix::from_vec(repr.width, repr.height, repr.data)
    }
}

fn checked_len(width: usize, height: usize) -> MatrixResult<usize> {
    if width == 0 || height == 0 {
        return Err(MatrixError::InvalidArgument(format!(
            "matrix dimensions must be positive, got {}x{}",
            height, width
        )));
    }
    width.checked_mul(height).ok_or_else(|| {
        MatrixError::Allocation(format!("{}x{} elements overflow usize", height, width))
    })
}

impl Matrix {
    /// Allocates a zero-filled `height x width` matrix.
    pub fn new(width: usize, height: usize) -> MatrixResult<Self> {
        let len = checked_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|err| MatrixError::Allocation(err.to_string()))?;
        data.resize(len, 0);
        log::debug!("allocated {}x{} matrix", height, width);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<Element>) -> MatrixResult<Self> {
        let len = checked_len(width, height)?;
        if data.len() != len {
            return Err(MatrixError::InvalidArgument(format!(
                "expected {} elements for {}x{} matrix, got {}",
                len,
                height,
                width,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a matrix from a slice of equally sized rows.
    pub fn from_rows<R: AsRef<[Element]>>(rows: &[R]) -> MatrixResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MatrixError::InvalidArgument(format!(
                    "row {} has {} columns, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(width, height, data)
    }

    /// Copies a two-dimensional ndarray view.
    pub fn from_array(array: ArrayView2<'_, Element>) -> MatrixResult<Self> {
        let (height, width) = array.dim();
        Self::from_vec(width, height, array.iter().copied().collect())
    }

    pub fn identity(size: usize) -> MatrixResult<Self> {
        let mut matrix = Self::new(size, size)?;
        for i in 0..size {
            matrix.data[i * size + i] = 1;
        }
        Ok(matrix)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, row: usize, col: usize) -> MatrixResult<usize> {
        if row >= self.height || col >= self.width {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(row * self.width + col)
    }

    pub fn get(&self, row: usize, col: usize) -> MatrixResult<Element> {
        let offset = self.offset(row, col)?;
        Ok(self.data[offset])
    }

    pub fn set(&mut self, row: usize, col: usize, value: Element) -> MatrixResult<()> {
        let offset = self.offset(row, col)?;
        self.data[offset] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> MatrixResult<&[Element]> {
        if row >= self.height {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col: 0,
                height: self.height,
                width: self.width,
            });
        }
        let start = row * self.width;
        Ok(&self.data[start..start + self.width])
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.data
    }

    /// Borrows the buffer as a `height x width` ndarray view.
    pub fn view(&self) -> MatrixResult<ArrayView2<'_, Element>> {
        ArrayView2::from_shape((self.height, self.width), &self.data)
            .map_err(|err| MatrixError::InvalidArgument(err.to_string()))
    }

    /// Overwrites every element with a value drawn uniformly from `[1, limit)`.
    pub fn fill_random<R: Rng>(&mut self, limit: Element, rng: &mut R) -> MatrixResult<()> {
        if limit < 2 {
            return Err(MatrixError::InvalidArgument(format!(
                "random bound must be at least 2, got {}",
                limit
            )));
        }
        for value in self.data.iter_mut() {
            *value = rng.gen_range(1..limit);
        }
        log::debug!(
            "filled {}x{} matrix with values in [1, {})",
            self.height,
            self.width,
            limit
        );
        Ok(())
    }

    /// Human-readable grid: one line per row, comma-separated columns.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Wrapping sum of all elements, handy for comparing large results.
    pub fn checksum(&self) -> Element {
        self.data.iter().fold(0, |acc: Element, &v| acc.wrapping_add(v))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.width) {
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{:4}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
