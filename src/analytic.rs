//! Closed-form potentials of flat triangles
//!
//! The kernels are integrals of `1/|x - y|` and its derivatives over a triangle, with no
//! `1/(4π)` factor.
mod dipole;
mod double_layer;
mod single_layer;

pub use dipole::{
    DipolePotential, DipolePotentialDerivative, DipolePotentialDerivativeGrad,
    DipolePotentialGrad,
};
pub use double_layer::{AnalyticD, AnalyticD3};
pub use single_layer::AnalyticS;

use crate::types::Vect3;

/// An edge of a triangle, from `start` to `end`
#[derive(Clone, Copy, Debug)]
pub(crate) struct Edge {
    pub(crate) start: Vect3,
    pub(crate) end: Vect3,
    /// Unit tangent
    pub(crate) tangent: Vect3,
    /// Unit in-plane normal pointing out of the triangle
    pub(crate) outward: Vect3,
    pub(crate) length: f64,
}

impl Edge {
    /// The integral of `1/|x - y|` along the edge
    ///
    /// Requires `x` to be off the line through the edge.
    pub(crate) fn log_integral(&self, x: &Vect3, distance2: f64) -> f64 {
        let to_start = self.start - *x;
        let to_end = self.end - *x;
        let l_start = to_start.dot(&self.tangent);
        let l_end = to_end.dot(&self.tangent);
        let r_start = to_start.norm();
        let r_end = to_end.norm();
        // R + l loses all precision behind the edge, where R - l = rho^2 / (R + l) is used instead
        let plus = |r: f64, l: f64| {
            if l >= 0.0 {
                r + l
            } else {
                distance2 / (r - l)
            }
        };
        (plus(r_end, l_end) / plus(r_start, l_start)).ln()
    }
}

/// Geometry of a triangle shared by the analytic evaluators
#[derive(Clone, Copy, Debug)]
pub(crate) struct TriangleFrame {
    pub(crate) vertices: [Vect3; 3],
    pub(crate) normal: Vect3,
    pub(crate) area: f64,
    /// Edge `i` joins vertex `i` to vertex `i + 1`
    pub(crate) edges: [Edge; 3],
}

impl TriangleFrame {
    pub(crate) fn new(vertices: [Vect3; 3]) -> Self {
        let cross = (vertices[1] - vertices[0]).cross(&(vertices[2] - vertices[0]));
        let double_area = cross.norm();
        let normal = cross / double_area;
        let edges = [0, 1, 2].map(|i| {
            let start = vertices[i];
            let end = vertices[(i + 1) % 3];
            let length = (end - start).norm();
            let tangent = (end - start) / length;
            Edge {
                start,
                end,
                tangent,
                outward: tangent.cross(&normal),
                length,
            }
        });
        Self {
            vertices,
            normal,
            area: 0.5 * double_area,
            edges,
        }
    }

    /// Signed height of a point above the plane of the triangle
    pub(crate) fn height(&self, x: &Vect3) -> f64 {
        self.normal.dot(&(*x - self.vertices[0]))
    }

    /// The longest edge length, used as the length scale of the triangle
    pub(crate) fn diameter(&self) -> f64 {
        self.edges.iter().map(|e| e.length).fold(0.0, f64::max)
    }

    /// Signed solid angle subtended by the triangle at a point
    ///
    /// The sign is opposite to the sign of the height of the point.
    pub(crate) fn solid_angle(&self, x: &Vect3) -> f64 {
        let [y1, y2, y3] = self.vertices.map(|v| v - *x);
        let [n1, n2, n3] = [y1.norm(), y2.norm(), y3.norm()];
        let triple = y1.dot(&y2.cross(&y3));
        let denominator = n1 * n2 * n3 + y1.dot(&y2) * n3 + y1.dot(&y3) * n2 + y2.dot(&y3) * n1;
        2.0 * triple.atan2(denominator)
    }

    /// Value at a point of the linear function that is 1 at one vertex and 0 at the others
    pub(crate) fn basis(&self, local_index: usize, x: &Vect3) -> f64 {
        let a = self.vertices[(local_index + 1) % 3];
        let b = self.vertices[(local_index + 2) % 3];
        (b - a).cross(&(*x - a)).dot(&self.normal) / (2.0 * self.area)
    }

    /// Values at a point of the three linear basis functions
    pub(crate) fn basis_values(&self, x: &Vect3) -> Vect3 {
        Vect3::new(self.basis(0, x), self.basis(1, x), self.basis(2, x))
    }

    /// Surface gradient of a linear basis function
    pub(crate) fn basis_gradient(&self, local_index: usize) -> Vect3 {
        let a = self.vertices[(local_index + 1) % 3];
        let b = self.vertices[(local_index + 2) % 3];
        self.normal.cross(&(b - a)) / (2.0 * self.area)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    fn frame() -> TriangleFrame {
        TriangleFrame::new([
            Vect3::new(0.0, 0.0, 0.0),
            Vect3::new(2.0, 0.0, 0.0),
            Vect3::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn test_edges_point_outwards() {
        let f = frame();
        let centroid = (f.vertices[0] + f.vertices[1] + f.vertices[2]) / 3.0;
        for e in &f.edges {
            assert!((e.start - centroid).dot(&e.outward) > 0.0);
            assert_relative_eq!(e.outward.dot(&f.normal), 0.0);
        }
    }

    #[test]
    fn test_basis() {
        let f = frame();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(f.basis(i, &f.vertices[j]), expected, epsilon = 1e-14);
            }
        }
        let x = Vect3::new(0.3, 0.2, 5.0);
        let values = f.basis_values(&x);
        assert_relative_eq!(values.x + values.y + values.z, 1.0, epsilon = 1e-14);

        let gradient = f.basis_gradient(1);
        assert_relative_eq!(gradient.x, 0.5, epsilon = 1e-14);
        assert_relative_eq!(gradient.y, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_solid_angle_far_point() {
        let f = frame();
        let x = Vect3::new(0.5, 0.25, 100.0);
        // Far away, the solid angle approaches area * cos / distance^2
        assert_relative_eq!(f.solid_angle(&x), -f.area / 1e4, max_relative = 1e-3);
        let below = Vect3::new(0.5, 0.25, -100.0);
        assert_relative_eq!(f.solid_angle(&below), f.area / 1e4, max_relative = 1e-3);
    }

    #[test]
    fn test_solid_angle_close_to_interior() {
        let f = frame();
        let x = Vect3::new(0.5, 0.25, 1e-9);
        assert_relative_eq!(f.solid_angle(&x), -2.0 * std::f64::consts::PI, max_relative = 1e-6);
    }
}
