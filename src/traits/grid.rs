//! Definition of a mesh
use crate::types::Vect3;

/// A flat triangle of a mesh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    vertices: [usize; 3],
    area: f64,
    normal: Vect3,
}

impl Triangle {
    /// Create a triangle from its vertex indices and the coordinates of those vertices.
    ///
    /// The normal follows the vertex order: it points along (v1 - v0) x (v2 - v0).
    pub fn new(vertices: [usize; 3], points: [Vect3; 3]) -> Self {
        let cross = (points[1] - points[0]).cross(&(points[2] - points[0]));
        let length = cross.norm();
        Self {
            vertices,
            area: 0.5 * length,
            normal: cross / length,
        }
    }

    /// The indices of the vertices
    pub fn vertices(&self) -> [usize; 3] {
        self.vertices
    }

    /// The area
    pub fn area(&self) -> f64 {
        self.area
    }

    /// The unit normal
    pub fn normal(&self) -> Vect3 {
        self.normal
    }

    /// The local index (0, 1 or 2) of a point in this triangle, if it is a vertex
    pub fn local_index(&self, point: usize) -> Option<usize> {
        self.vertices.iter().position(|v| *v == point)
    }

    /// Check if a point is a vertex of this triangle
    pub fn contains(&self, point: usize) -> bool {
        self.vertices.contains(&point)
    }

    /// The vertex after the vertex with the given local index
    pub fn next(&self, local_index: usize) -> usize {
        self.vertices[(local_index + 1) % 3]
    }

    /// The vertex before the vertex with the given local index
    pub fn prev(&self, local_index: usize) -> usize {
        self.vertices[(local_index + 2) % 3]
    }
}

pub trait Mesh: Sync {
    //! A triangulated surface
    //!
    //! Implementations are read-only inputs to assembly. Vertex indices of every
    //! triangle must be valid point indices.

    /// The number of points
    fn number_of_points(&self) -> usize;

    /// The number of triangles
    fn number_of_triangles(&self) -> usize;

    /// Get a point from its index
    fn point(&self, index: usize) -> Vect3;

    /// Get a triangle from its index
    fn triangle(&self, index: usize) -> Triangle;

    /// The indices of the triangles that have a point as a vertex
    fn triangles_for_point(&self, index: usize) -> &[usize];

    /// The coordinates of the vertices of a triangle
    fn triangle_points(&self, index: usize) -> [Vect3; 3] {
        self.triangle(index).vertices().map(|v| self.point(v))
    }
}
