//! Element access to matrices that operators are assembled into
use crate::types::Storage;

pub trait Matrix {
    //! A matrix that blocks of operators can be written into
    //!
    //! For `Storage::Symmetric` only entries with `row <= column` are written by
    //! assembly. Reads may use either triangle.

    /// The number of rows and columns
    fn shape(&self) -> [usize; 2];

    /// The storage layout
    fn storage(&self) -> Storage;

    /// Get an entry
    fn get(&self, row: usize, column: usize) -> f64;

    /// Overwrite an entry
    fn set(&mut self, row: usize, column: usize, value: f64);

    /// Add a value to an entry
    fn add(&mut self, row: usize, column: usize, value: f64);

    /// Add three values to three entries of a row.
    ///
    /// This is the write used by kernels that produce one value per vertex of a triangle.
    fn accumulate_triple(&mut self, row: usize, columns: [usize; 3], values: [f64; 3]) {
        for (column, value) in columns.into_iter().zip(values) {
            self.add(row, column, value);
        }
    }
}
