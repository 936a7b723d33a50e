use rand::Rng;

use crate::error::{Error, Result};

/// Half-width of the uniform range used by [`Matrix::random`].
pub const RANDOM_RANGE: f64 = 5.0;

/// Dense row-major matrix of `f64`.
///
/// The shape is fixed at construction and is always at least 1x1. Binary
/// operations return a fresh matrix and fail with [`Error::ShapeMismatch`]
/// when the operands do not line up; `transpose`, `apply`, the scalar ops and
/// `clone_from` rewrite the receiver's own storage.
#[derive(Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    /// Allocates a `rows x cols` matrix. Every entry is `fill` when given,
    /// otherwise drawn uniformly from `[-5, 5)`.
    pub fn new(rows: usize, cols: usize, fill: Option<f64>) -> Result<Matrix> {
        match fill {
            Some(value) => Matrix::filled(rows, cols, value),
            None => Matrix::random(rows, cols, &mut rand::thread_rng()),
        }
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Matrix> {
        check_dims(rows, cols)?;
        Ok(Matrix::alloc(rows, cols, value))
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix> {
        Matrix::filled(rows, cols, 0.0)
    }

    /// Uniform fill from `[-RANDOM_RANGE, RANDOM_RANGE)` using the caller's generator.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Matrix> {
        check_dims(rows, cols)?;
        let data = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| rng.gen_range(-RANDOM_RANGE..RANDOM_RANGE))
                    .collect()
            })
            .collect();
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from row vectors. Rows must be non-empty and of equal length.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        check_dims(rows, cols)?;
        if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::RaggedRows { row, len: r.len(), expected: cols });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Column vector of shape `(values.len(), 1)`.
    pub fn column(values: &[f64]) -> Result<Matrix> {
        Matrix::from_rows(values.iter().map(|&v| vec![v]).collect())
    }

    // Shapes reaching here are already validated.
    fn alloc(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix { rows, cols, data: vec![vec![value; cols]; rows] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.data[row][col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        self.data[row][col] = value;
        Ok(())
    }

    /// Row-major copy of every entry.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    /// Standard matrix product `self · rhs`.
    ///
    /// Each output row depends only on the matching row of `self`, so the
    /// outer loop can be partitioned by row.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("multiply", rhs));
        }

        let data = self
            .data
            .iter()
            .map(|lhs_row| {
                (0..rhs.cols)
                    .map(|j| {
                        let mut sum = 0.0;
                        for (k, &a) in lhs_row.iter().enumerate() {
                            sum += a * rhs.data[k][j];
                        }
                        sum
                    })
                    .collect()
            })
            .collect();

        Ok(Matrix { rows: self.rows, cols: rhs.cols, data })
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    pub fn scalar_multiply(&mut self, k: f64) {
        self.apply(|x| x * k);
    }

    pub fn scalar_divide(&mut self, k: f64) -> Result<()> {
        if k == 0.0 {
            return Err(Error::DivisionByZero);
        }
        self.apply(|x| x / k);
        Ok(())
    }

    /// Replaces this matrix with its transpose; the shape flips.
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Transposed copy, leaving `self` untouched.
    pub fn transposed(&self) -> Matrix {
        let mut res = Matrix::alloc(self.cols, self.rows, 0.0);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// In-place map of `f` over every entry.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for x in self.data.iter_mut().flatten() {
            *x = f(*x);
        }
    }

    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        let mut res = self.clone();
        res.apply(f);
        res
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch(op, rhs));
        }

        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(&a, &b)| f(a, b)).collect())
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> Error {
        Error::ShapeMismatch { op, left: self.shape(), right: rhs.shape() }
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfRange { row, col, rows: self.rows, cols: self.cols });
        }
        Ok(())
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        Matrix { rows: self.rows, cols: self.cols, data: self.data.clone() }
    }

    /// Deep-copies `source` into this matrix, reusing its row buffers where
    /// they fit. Shape and data are replaced together.
    fn clone_from(&mut self, source: &Self) {
        self.rows = source.rows;
        self.cols = source.cols;
        self.data.clone_from(&source.data);
    }
}

fn check_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::EmptyDimension { rows, cols });
    }
    Ok(())
}
