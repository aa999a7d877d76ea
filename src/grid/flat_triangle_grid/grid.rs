//! Flat triangle grid

use crate::traits::{Mesh, Triangle};
use crate::types::{AssemblyError, Vect3};
use std::collections::HashMap;

/// A flat triangle grid
pub struct FlatTriangleGrid {
    // Geometry information
    points: Vec<Vect3>,
    triangles: Vec<Triangle>,

    // Topological information
    point_to_triangles: Vec<Vec<usize>>,

    // Point and cell ids
    point_indices_to_ids: Vec<usize>,
    point_ids_to_indices: HashMap<usize, usize>,
    cell_indices_to_ids: Vec<usize>,
    cell_ids_to_indices: HashMap<usize, usize>,
}

impl FlatTriangleGrid {
    /// Create a flat triangle grid whose point and cell ids are their indices
    pub fn new(points: Vec<Vect3>, cells: &[[usize; 3]]) -> Result<Self, AssemblyError> {
        let point_ids = (0..points.len()).collect::<Vec<_>>();
        let cell_ids = (0..cells.len()).collect::<Vec<_>>();
        Self::new_with_ids(points, cells, point_ids, cell_ids)
    }

    /// Create a flat triangle grid
    pub fn new_with_ids(
        points: Vec<Vect3>,
        cells: &[[usize; 3]],
        point_ids: Vec<usize>,
        cell_ids: Vec<usize>,
    ) -> Result<Self, AssemblyError> {
        if points.len() != point_ids.len() {
            return Err(AssemblyError::InvalidGeometry(format!(
                "{} points were given {} ids",
                points.len(),
                point_ids.len()
            )));
        }
        if cells.len() != cell_ids.len() {
            return Err(AssemblyError::InvalidGeometry(format!(
                "{} cells were given {} ids",
                cells.len(),
                cell_ids.len()
            )));
        }
        let npoints = points.len();

        if let Some(p) = points.iter().position(|p| !p.is_finite()) {
            return Err(AssemblyError::InvalidGeometry(format!(
                "point {p} has non-finite coordinates"
            )));
        }

        let mut triangles = Vec::with_capacity(cells.len());
        let mut point_to_triangles = vec![vec![]; npoints];

        for (cell_index, cell) in cells.iter().enumerate() {
            if let Some(v) = cell.iter().find(|v| **v >= npoints) {
                return Err(AssemblyError::InvalidGeometry(format!(
                    "cell {cell_index} uses point {v} but the grid has {npoints} points"
                )));
            }
            if cell[0] == cell[1] || cell[1] == cell[2] || cell[0] == cell[2] {
                return Err(AssemblyError::InvalidGeometry(format!(
                    "cell {cell_index} repeats a vertex: {cell:?}"
                )));
            }
            triangles.push(Triangle::new(*cell, cell.map(|v| points[v])));
            for v in cell {
                point_to_triangles[*v].push(cell_index);
            }
        }

        let point_ids_to_indices = point_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();
        let cell_ids_to_indices = cell_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();

        Ok(Self {
            points,
            triangles,
            point_to_triangles,
            point_indices_to_ids: point_ids,
            point_ids_to_indices,
            cell_indices_to_ids: cell_ids,
            cell_ids_to_indices,
        })
    }

    /// Get the index of a point from its id
    pub fn point_index_from_id(&self, id: usize) -> Option<usize> {
        self.point_ids_to_indices.get(&id).copied()
    }

    /// Get the id of a point from its index
    pub fn point_id_from_index(&self, index: usize) -> usize {
        self.point_indices_to_ids[index]
    }

    /// Get the index of a cell from its id
    pub fn cell_index_from_id(&self, id: usize) -> Option<usize> {
        self.cell_ids_to_indices.get(&id).copied()
    }

    /// Get the id of a cell from its index
    pub fn cell_id_from_index(&self, index: usize) -> usize {
        self.cell_indices_to_ids[index]
    }

    /// Create a copy of the grid with every point moved by a map
    pub fn map_points(&self, f: impl Fn(Vect3) -> Vect3) -> Result<Self, AssemblyError> {
        let cells = self
            .triangles
            .iter()
            .map(|t| t.vertices())
            .collect::<Vec<_>>();
        Self::new_with_ids(
            self.points.iter().map(|p| f(*p)).collect(),
            &cells,
            self.point_indices_to_ids.clone(),
            self.cell_indices_to_ids.clone(),
        )
    }
}

impl Mesh for FlatTriangleGrid {
    fn number_of_points(&self) -> usize {
        self.points.len()
    }

    fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    fn point(&self, index: usize) -> Vect3 {
        self.points[index]
    }

    fn triangle(&self, index: usize) -> Triangle {
        self.triangles[index]
    }

    fn triangles_for_point(&self, index: usize) -> &[usize] {
        &self.point_to_triangles[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_triangles() -> FlatTriangleGrid {
        FlatTriangleGrid::new(
            vec![
                Vect3::new(0.0, 0.0, 0.0),
                Vect3::new(1.0, 0.0, 0.0),
                Vect3::new(0.0, 1.0, 0.0),
                Vect3::new(1.0, 1.0, 0.0),
            ],
            &[[0, 1, 2], [1, 3, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_point_to_triangles() {
        let g = two_triangles();
        assert_eq!(g.number_of_points(), 4);
        assert_eq!(g.number_of_triangles(), 2);
        assert_eq!(g.triangles_for_point(0), &[0]);
        assert_eq!(g.triangles_for_point(1), &[0, 1]);
        assert_eq!(g.triangles_for_point(2), &[0, 1]);
        assert_eq!(g.triangles_for_point(3), &[1]);
    }

    #[test]
    fn test_invalid_vertex() {
        let r = FlatTriangleGrid::new(vec![Vect3::new(0.0, 0.0, 0.0)], &[[0, 1, 2]]);
        assert!(matches!(r, Err(AssemblyError::InvalidGeometry(_))));
    }

    #[test]
    fn test_mismatched_ids() {
        let points = vec![
            Vect3::new(0.0, 0.0, 0.0),
            Vect3::new(1.0, 0.0, 0.0),
            Vect3::new(0.0, 1.0, 0.0),
        ];
        let r = FlatTriangleGrid::new_with_ids(points.clone(), &[[0, 1, 2]], vec![4, 5], vec![0]);
        assert!(matches!(r, Err(AssemblyError::InvalidGeometry(_))));
        let r = FlatTriangleGrid::new_with_ids(points, &[[0, 1, 2]], vec![4, 5, 6], vec![]);
        assert!(matches!(r, Err(AssemblyError::InvalidGeometry(_))));
    }

    #[test]
    fn test_map_points() {
        let g = two_triangles()
            .map_points(|p| p * 2.0 + Vect3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(g.point(3), Vect3::new(2.0, 2.0, 1.0));
        assert!((g.triangle(0).area() - 2.0).abs() < 1e-14);
    }
}
