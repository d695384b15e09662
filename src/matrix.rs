use crate::error::{check_len, Error, Result};

use rand::distributions::Distribution;
use rand::Rng;

/// A dense matrix of `f64`, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    pub fn random<D, R>(distribution: &D, rng: &mut R, rows: usize, cols: usize) -> Self
    where
        D: Distribution<f64>,
        R: Rng + ?Sized,
    {
        let data = (0..rows * cols).map(|_| distribution.sample(rng)).collect();
        Mat { rows, cols, data }
    }

    /// Builds a matrix from explicit rows, which must all have `cols`
    /// entries.
    pub fn from_rows<R>(rows: &[R], cols: usize) -> Result<Self>
    where
        R: AsRef<[f64]>,
    {
        if rows.is_empty() || cols == 0 {
            return Err(Error::InvalidConfiguration(
                "weight matrix must have at least one row and one column"
                    .into(),
            ));
        }
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            check_len("weight row", cols, row.as_ref().len())?;
            data.extend_from_slice(row.as_ref());
        }
        Ok(Mat {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Iterates over the rows of the matrix.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols)
    }

    pub fn iter_rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        self.data.chunks_mut(self.cols)
    }
}
