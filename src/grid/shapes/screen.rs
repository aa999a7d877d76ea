//! Flat square grid

use crate::grid::flat_triangle_grid::{FlatTriangleGrid, FlatTriangleGridBuilder};

/// Create a square grid with triangle cells
///
/// Create a grid of the square \[0,1\]^2 in the plane z = 0 with triangle cells. The input ncells is the number of cells
/// along each side of the square. All normals point along +z.
pub fn screen_triangles(ncells: usize) -> FlatTriangleGrid {
    if ncells == 0 {
        panic!("Cannot create a grid with 0 cells");
    }
    let npoints = (ncells + 1) * (ncells + 1);
    let mut b = FlatTriangleGridBuilder::new_with_capacity(npoints, 2 * ncells * ncells);

    let n = ncells as f64;
    for y in 0..ncells + 1 {
        for x in 0..ncells + 1 {
            b.add_point(y * (ncells + 1) + x, [x as f64 / n, y as f64 / n, 0.0]);
        }
    }
    for y in 0..ncells {
        for x in 0..ncells {
            b.add_cell(
                2 * y * ncells + 2 * x,
                [
                    y * (ncells + 1) + x,
                    y * (ncells + 1) + x + 1,
                    y * (ncells + 1) + x + ncells + 2,
                ],
            );
            b.add_cell(
                2 * y * ncells + 2 * x + 1,
                [
                    y * (ncells + 1) + x,
                    y * (ncells + 1) + x + ncells + 2,
                    y * (ncells + 1) + x + ncells + 1,
                ],
            );
        }
    }

    b.create_grid()
        .expect("screen cells only use points that were added")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::Mesh;
    use approx::*;

    #[test]
    fn test_screen() {
        let g = screen_triangles(3);
        assert_eq!(g.number_of_points(), 16);
        assert_eq!(g.number_of_triangles(), 18);
        let total_area = (0..g.number_of_triangles())
            .map(|t| g.triangle(t).area())
            .sum::<f64>();
        assert_relative_eq!(total_area, 1.0, max_relative = 1e-14);
        for t in 0..g.number_of_triangles() {
            assert_relative_eq!(g.triangle(t).normal().z, 1.0);
        }
    }
}
