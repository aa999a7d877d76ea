//! Common utility functions
use crate::traits::{Matrix, Mesh, Progress};
use crate::types::{AssemblyError, Storage};
use rayon::prelude::*;

pub(crate) fn equal_meshes<M1: Mesh, M2: Mesh>(mesh1: &M1, mesh2: &M2) -> bool {
    std::ptr::addr_of!(*mesh1) as *const u8 as usize
        == std::ptr::addr_of!(*mesh2) as *const u8 as usize
}

/// How assembled values are written into a matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WriteMode {
    /// Overwrite the entry
    Assign,
    /// Add to the entry
    Accumulate,
}

/// Entries of a matrix in coordinate format
pub(crate) struct MatrixEntries {
    /// Data
    pub(crate) data: Vec<f64>,
    /// Rows
    pub(crate) rows: Vec<usize>,
    /// Columns
    pub(crate) cols: Vec<usize>,
}

impl MatrixEntries {
    /// Create an empty set of entries with space for a known number of entries
    pub(crate) fn new_known_size(size: usize) -> Self {
        Self {
            data: Vec::with_capacity(size),
            rows: Vec::with_capacity(size),
            cols: Vec::with_capacity(size),
        }
    }

    /// Add an entry
    pub(crate) fn push(&mut self, row: usize, col: usize, value: f64) {
        self.rows.push(row);
        self.cols.push(col);
        self.data.push(value);
    }

    /// Write the entries into a matrix, in the order they were added
    pub(crate) fn write_into(&self, mat: &mut impl Matrix, mode: WriteMode) {
        for ((i, j), value) in self.rows.iter().zip(&self.cols).zip(&self.data) {
            match mode {
                WriteMode::Assign => mat.set(*i, *j, *value),
                WriteMode::Accumulate => mat.add(*i, *j, *value),
            }
        }
    }
}

/// Assemble a matrix one batch of rows at a time
///
/// The rows of a batch are computed in parallel from a shared view of the matrix. The batch is
/// then written into the matrix by the calling thread, in row order, before the next batch
/// starts.
pub(crate) fn assemble_in_batches<M, R, F, W>(
    mat: &mut M,
    nrows: usize,
    batch_size: usize,
    progress: &impl Progress,
    compute_row: F,
    mut write_row: W,
) where
    M: Matrix + Sync,
    R: Send,
    F: Fn(&M, usize) -> R + Sync,
    W: FnMut(&mut M, R),
{
    let batch_size = batch_size.max(1);
    let mut start = 0;
    while start < nrows {
        let end = std::cmp::min(start + batch_size, nrows);
        let view: &M = mat;
        let rows = (start..end)
            .into_par_iter()
            .map(|row| compute_row(view, row))
            .collect::<Vec<_>>();
        for row in rows {
            write_row(mat, row);
        }
        progress.report(end, nrows);
        start = end;
    }
}

/// Check that a mesh can be integrated over
pub(crate) fn check_mesh(mesh: &impl Mesh) -> Result<(), AssemblyError> {
    if let Some(p) = (0..mesh.number_of_points()).find(|p| !mesh.point(*p).is_finite()) {
        return Err(AssemblyError::InvalidGeometry(format!(
            "point {p} has non-finite coordinates"
        )));
    }
    for t in 0..mesh.number_of_triangles() {
        let area = mesh.triangle(t).area();
        if !area.is_finite() || area <= 0.0 {
            return Err(AssemblyError::InvalidGeometry(format!(
                "triangle {t} has area {area}"
            )));
        }
    }
    Ok(())
}

/// Check that a block of a matrix can be written
///
/// `diagonal` is set when the block couples a mesh with itself and only the entries with
/// `row <= column` of the block are written.
pub(crate) fn check_block(
    mat: &impl Matrix,
    offsets: [usize; 2],
    block_shape: [usize; 2],
    diagonal: bool,
) -> Result<(), AssemblyError> {
    let shape = mat.shape();
    if offsets[0] + block_shape[0] > shape[0] || offsets[1] + block_shape[1] > shape[1] {
        return Err(AssemblyError::DimensionMismatch {
            offset: offsets,
            block_shape,
            shape,
        });
    }
    if mat.storage() == Storage::Symmetric && block_shape[0] > 0 && block_shape[1] > 0 {
        let valid = if diagonal {
            offsets[0] == offsets[1]
        } else {
            offsets[0] + block_shape[0] - 1 <= offsets[1]
        };
        if !valid {
            return Err(AssemblyError::SymmetricStorageViolation {
                offset: offsets,
                block_shape,
            });
        }
    }
    Ok(())
}

fn overlap(
    a_start: [usize; 2],
    a_shape: [usize; 2],
    b_start: [usize; 2],
    b_shape: [usize; 2],
) -> bool {
    (0..2).all(|d| a_start[d] < b_start[d] + b_shape[d] && b_start[d] < a_start[d] + a_shape[d])
}

/// Check that a block that is read does not overlap a block that is written
pub(crate) fn check_no_overlap(
    mat: &impl Matrix,
    read: [usize; 2],
    read_shape: [usize; 2],
    write: [usize; 2],
    write_shape: [usize; 2],
) -> Result<(), AssemblyError> {
    let shape = mat.shape();
    if read[0] + read_shape[0] > shape[0] || read[1] + read_shape[1] > shape[1] {
        return Err(AssemblyError::DimensionMismatch {
            offset: read,
            block_shape: read_shape,
            shape,
        });
    }
    let mut overlapping = overlap(read, read_shape, write, write_shape);
    if mat.storage() == Storage::Symmetric {
        overlapping |= overlap(
            [read[1], read[0]],
            [read_shape[1], read_shape[0]],
            write,
            write_shape,
        );
    }
    if overlapping {
        Err(AssemblyError::OverlappingBlocks { read, write })
    } else {
        Ok(())
    }
}

/// Check that a range of a vector can be written
pub(crate) fn check_range(len: usize, offset: usize, count: usize) -> Result<(), AssemblyError> {
    if offset + count > len {
        Err(AssemblyError::DimensionMismatch {
            offset: [offset, 0],
            block_shape: [count, 1],
            shape: [len, 1],
        })
    } else {
        Ok(())
    }
}
