//! Regular sphere grid

use crate::grid::flat_triangle_grid::{FlatTriangleGrid, FlatTriangleGridBuilder};
use crate::types::Vect3;
use std::collections::{hash_map::Entry::Vacant, HashMap};

/// Create a regular sphere
///
/// A regular sphere is created by starting with a regular octahedron. The shape is then refined `refinement_level` times.
/// Each time the grid is refined, each triangle is split into four triangles (by adding lines connecting the midpoints of
/// each edge). The new points are then scaled so that they are a distance of 1 from the origin.
///
/// Triangle normals point outwards.
pub fn regular_sphere(refinement_level: u32) -> FlatTriangleGrid {
    let mut b = FlatTriangleGridBuilder::new_with_capacity(
        2 + usize::pow(4, refinement_level + 1),
        8 * usize::pow(4, refinement_level),
    );
    b.add_point(0, [0.0, 0.0, 1.0]);
    b.add_point(1, [1.0, 0.0, 0.0]);
    b.add_point(2, [0.0, 1.0, 0.0]);
    b.add_point(3, [-1.0, 0.0, 0.0]);
    b.add_point(4, [0.0, -1.0, 0.0]);
    b.add_point(5, [0.0, 0.0, -1.0]);
    let mut point_n = 6;

    let mut cells = vec![
        [0, 1, 2],
        [0, 2, 3],
        [0, 3, 4],
        [0, 4, 1],
        [5, 2, 1],
        [5, 3, 2],
        [5, 4, 3],
        [5, 1, 4],
    ];

    for level in 0..refinement_level {
        let mut edge_points = HashMap::new();
        let mut new_cells = Vec::with_capacity(8 * usize::pow(4, level + 1));
        for c in &cells {
            let v = c.map(|i| b.points[i]);
            let edges = [[1, 2], [0, 2], [0, 1]]
                .iter()
                .map(|[i, j]| {
                    let mut pt_i = c[*i];
                    let mut pt_j = c[*j];
                    if pt_i > pt_j {
                        std::mem::swap(&mut pt_i, &mut pt_j);
                    }
                    if let Vacant(e) = edge_points.entry((pt_i, pt_j)) {
                        let new_pt = ((v[*i] + v[*j]) * 0.5).normalized();
                        b.add_point(point_n, new_pt.to_array());
                        e.insert(point_n);
                        point_n += 1;
                    }
                    edge_points[&(pt_i, pt_j)]
                })
                .collect::<Vec<_>>();
            new_cells.push([c[0], edges[2], edges[1]]);
            new_cells.push([c[1], edges[0], edges[2]]);
            new_cells.push([c[2], edges[1], edges[0]]);
            new_cells.push([edges[0], edges[1], edges[2]]);
        }
        cells = new_cells;
    }
    for (i, v) in cells.iter().enumerate() {
        b.add_cell(i, *v);
    }

    b.create_grid()
        .expect("regular sphere cells only use points that were added")
}

/// Create a regular sphere with a given radius and centre
pub fn sphere(refinement_level: u32, radius: f64, centre: Vect3) -> FlatTriangleGrid {
    regular_sphere(refinement_level)
        .map_points(|p| p * radius + centre)
        .expect("scaling a sphere keeps its cells valid")
}
