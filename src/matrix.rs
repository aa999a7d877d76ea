//! Matrix containers for assembled operators
use crate::traits::Matrix;
use crate::types::{AssemblyError, Storage};

/// A dense matrix stored in row-major order
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    shape: [usize; 2],
}

impl DenseMatrix {
    /// Create a matrix of zeros
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            data: vec![0.0; rows * columns],
            shape: [rows, columns],
        }
    }

    /// The entries in row-major order
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

impl Matrix for DenseMatrix {
    fn shape(&self) -> [usize; 2] {
        self.shape
    }
    fn storage(&self) -> Storage {
        Storage::General
    }
    fn get(&self, row: usize, column: usize) -> f64 {
        self.data[row * self.shape[1] + column]
    }
    fn set(&mut self, row: usize, column: usize, value: f64) {
        self.data[row * self.shape[1] + column] = value;
    }
    fn add(&mut self, row: usize, column: usize, value: f64) {
        self.data[row * self.shape[1] + column] += value;
    }
}

/// A symmetric matrix storing the upper triangle column by column
///
/// The entries (i, j) and (j, i) are the same storage location.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricMatrix {
    data: Vec<f64>,
    size: usize,
}

impl SymmetricMatrix {
    /// Create a matrix of zeros
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * (size + 1) / 2],
            size,
        }
    }

    fn index(row: usize, column: usize) -> usize {
        let (i, j) = if row <= column {
            (row, column)
        } else {
            (column, row)
        };
        i + j * (j + 1) / 2
    }
}

impl Matrix for SymmetricMatrix {
    fn shape(&self) -> [usize; 2] {
        [self.size, self.size]
    }
    fn storage(&self) -> Storage {
        Storage::Symmetric
    }
    fn get(&self, row: usize, column: usize) -> f64 {
        self.data[Self::index(row, column)]
    }
    fn set(&mut self, row: usize, column: usize, value: f64) {
        self.data[Self::index(row, column)] = value;
    }
    fn add(&mut self, row: usize, column: usize, value: f64) {
        self.data[Self::index(row, column)] += value;
    }
}

/// Multiply the block `[start[0], stop[0]) x [start[1], stop[1])` of a matrix by a coefficient.
///
/// On symmetric storage a block whose corner lies on the diagonal is scaled over its upper half
/// only, so that every stored entry is scaled once.
pub fn scale_block(
    mat: &mut impl Matrix,
    start: [usize; 2],
    stop: [usize; 2],
    coeff: f64,
) -> Result<(), AssemblyError> {
    let shape = mat.shape();
    if stop[0] < start[0] || stop[1] < start[1] || stop[0] > shape[0] || stop[1] > shape[1] {
        return Err(AssemblyError::DimensionMismatch {
            offset: start,
            block_shape: [
                stop[0].saturating_sub(start[0]),
                stop[1].saturating_sub(start[1]),
            ],
            shape,
        });
    }
    let diagonal = mat.storage() == Storage::Symmetric && start[0] == start[1];
    if mat.storage() == Storage::Symmetric && !diagonal && stop[0] > start[1] + 1 {
        return Err(AssemblyError::SymmetricStorageViolation {
            offset: start,
            block_shape: [stop[0] - start[0], stop[1] - start[1]],
        });
    }
    for i in start[0]..stop[0] {
        let first = if diagonal { i } else { start[1] };
        for j in first..stop[1] {
            let value = mat.get(i, j);
            mat.set(i, j, coeff * value);
        }
    }
    Ok(())
}
