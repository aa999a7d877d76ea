//! Single layer potential of a triangle
use crate::analytic::TriangleFrame;
use crate::traits::{Integrand, Mesh};
use crate::types::Vect3;

/// Relative distance to an edge line below which the edge does not contribute
const EDGE_EPSILON: f64 = 1e-12;

/// The integral of `1/|x - y|` over a flat triangle, as a function of `x`
#[derive(Clone, Copy, Debug)]
pub struct AnalyticS {
    frame: TriangleFrame,
}

impl AnalyticS {
    /// Create the potential of a triangle of a mesh
    pub fn new(mesh: &impl Mesh, triangle: usize) -> Self {
        Self::from_points(mesh.triangle_points(triangle))
    }

    /// Create the potential of the triangle with the given vertices
    pub fn from_points(vertices: [Vect3; 3]) -> Self {
        Self {
            frame: TriangleFrame::new(vertices),
        }
    }

    /// Evaluate the potential at a point
    pub fn value(&self, x: &Vect3) -> f64 {
        let h = self.frame.height(x);
        let mut total = 0.0;
        for e in &self.frame.edges {
            let t = (e.start - *x).dot(&e.outward);
            if t.abs() < EDGE_EPSILON * e.length {
                continue;
            }
            total += t * e.log_integral(x, t * t + h * h);
        }
        if h != 0.0 {
            total -= h.abs() * self.frame.solid_angle(x).abs();
        }
        total
    }
}

impl Integrand for AnalyticS {
    type Output = f64;
    fn evaluate(&self, x: &Vect3) -> f64 {
        self.value(x)
    }
}
