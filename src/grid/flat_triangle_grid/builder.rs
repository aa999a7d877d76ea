//! Grid builder

use crate::grid::flat_triangle_grid::FlatTriangleGrid;
use crate::types::{AssemblyError, Vect3};
use std::collections::HashMap;

/// Grid builder for a flat triangle grid
#[derive(Default)]
pub struct FlatTriangleGridBuilder {
    pub(crate) points: Vec<Vect3>,
    cells: Vec<[usize; 3]>,
    point_indices_to_ids: Vec<usize>,
    point_ids_to_indices: HashMap<usize, usize>,
    cell_indices_to_ids: Vec<usize>,
}

impl FlatTriangleGridBuilder {
    /// Create a builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with space for a known number of points and cells
    pub fn new_with_capacity(npoints: usize, ncells: usize) -> Self {
        Self {
            points: Vec::with_capacity(npoints),
            cells: Vec::with_capacity(ncells),
            point_indices_to_ids: Vec::with_capacity(npoints),
            point_ids_to_indices: HashMap::new(),
            cell_indices_to_ids: Vec::with_capacity(ncells),
        }
    }

    /// Add a point
    pub fn add_point(&mut self, id: usize, data: [f64; 3]) {
        self.point_ids_to_indices
            .insert(id, self.point_indices_to_ids.len());
        self.point_indices_to_ids.push(id);
        self.points.push(data.into());
    }

    /// Add a cell, given by the ids of its three points
    pub fn add_cell(&mut self, id: usize, cell_data: [usize; 3]) {
        self.cell_indices_to_ids.push(id);
        self.cells.push(cell_data);
    }

    /// Create the grid
    pub fn create_grid(self) -> Result<FlatTriangleGrid, AssemblyError> {
        let mut cells = Vec::with_capacity(self.cells.len());
        for (cell_id, cell) in self.cell_indices_to_ids.iter().zip(&self.cells) {
            let mut indices = [0; 3];
            for (index, point_id) in indices.iter_mut().zip(cell) {
                *index = *self.point_ids_to_indices.get(point_id).ok_or_else(|| {
                    AssemblyError::InvalidGeometry(format!(
                        "cell {cell_id} uses unknown point id {point_id}"
                    ))
                })?;
            }
            cells.push(indices);
        }
        FlatTriangleGrid::new_with_ids(
            self.points,
            &cells,
            self.point_indices_to_ids,
            self.cell_indices_to_ids,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::Mesh;

    #[test]
    fn test_ids() {
        let mut b = FlatTriangleGridBuilder::new();
        b.add_point(10, [0.0, 0.0, 0.0]);
        b.add_point(3, [1.0, 0.0, 0.0]);
        b.add_point(7, [0.0, 1.0, 0.0]);
        b.add_cell(42, [10, 3, 7]);
        let g = b.create_grid().unwrap();
        assert_eq!(g.triangle(0).vertices(), [0, 1, 2]);
        assert_eq!(g.point_index_from_id(7), Some(2));
        assert_eq!(g.point_id_from_index(1), 3);
        assert_eq!(g.cell_index_from_id(42), Some(0));
        assert_eq!(g.cell_id_from_index(0), 42);
    }

    #[test]
    fn test_unknown_point_id() {
        let mut b = FlatTriangleGridBuilder::new();
        b.add_point(0, [0.0, 0.0, 0.0]);
        b.add_cell(0, [0, 1, 2]);
        assert!(b.create_grid().is_err());
    }
}
