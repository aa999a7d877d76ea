//! Double layer potentials of a triangle with linear densities
use crate::analytic::TriangleFrame;
use crate::traits::{Integrand, Mesh};
use crate::types::Vect3;

/// Relative height below which a point is treated as lying in the plane of the triangle
const PLANE_EPSILON: f64 = 1e-12;

/// The double layer potentials of the three linear basis functions of a triangle
///
/// Component `i` of the value at `x` is `∫_T φ_i(y) ∂/∂n_y (1/|x - y|) dy`, where `φ_i` is
/// the linear function that is 1 at vertex `i` and 0 at the other two vertices. Points in the
/// plane of the triangle evaluate to zero.
#[derive(Clone, Copy, Debug)]
pub struct AnalyticD3 {
    frame: TriangleFrame,
    // gradient of basis function i dotted with the outward normal of edge e
    gradient_flux: [[f64; 3]; 3],
}

impl AnalyticD3 {
    /// Create the potentials of a triangle of a mesh
    pub fn new(mesh: &impl Mesh, triangle: usize) -> Self {
        Self::from_points(mesh.triangle_points(triangle))
    }

    /// Create the potentials of the triangle with the given vertices
    pub fn from_points(vertices: [Vect3; 3]) -> Self {
        let frame = TriangleFrame::new(vertices);
        let gradient_flux = [0, 1, 2].map(|i| {
            let gradient = frame.basis_gradient(i);
            frame.edges.map(|e| gradient.dot(&e.outward))
        });
        Self {
            frame,
            gradient_flux,
        }
    }

    /// Evaluate the three potentials at a point
    pub fn value(&self, x: &Vect3) -> Vect3 {
        let h = self.frame.height(x);
        if h.abs() <= PLANE_EPSILON * self.frame.diameter() {
            return Vect3::new(0.0, 0.0, 0.0);
        }
        let omega = self.frame.solid_angle(x);
        let gamma = self.frame.edges.map(|e| {
            let t = (e.start - *x).dot(&e.outward);
            e.log_integral(x, t * t + h * h)
        });
        let phi = self.frame.basis_values(x);
        let component = |i: usize| {
            let flux = self.gradient_flux[i]
                .iter()
                .zip(gamma)
                .map(|(g, l)| g * l)
                .sum::<f64>();
            -phi[i] * omega - h * flux
        };
        Vect3::new(component(0), component(1), component(2))
    }
}

impl Integrand for AnalyticD3 {
    type Output = Vect3;
    fn evaluate(&self, x: &Vect3) -> Vect3 {
        self.value(x)
    }
}

/// The double layer potential of the linear basis function of one vertex of a triangle
#[derive(Clone, Copy, Debug)]
pub struct AnalyticD {
    potentials: AnalyticD3,
    local_index: usize,
}

impl AnalyticD {
    /// Create the potential for the vertex with local index `local_index` of a triangle of a mesh
    pub fn new(mesh: &impl Mesh, triangle: usize, local_index: usize) -> Self {
        Self::from_points(mesh.triangle_points(triangle), local_index)
    }

    /// Create the potential for a vertex of the triangle with the given vertices
    pub fn from_points(vertices: [Vect3; 3], local_index: usize) -> Self {
        assert!(local_index < 3, "Invalid local vertex index: {local_index}");
        Self {
            potentials: AnalyticD3::from_points(vertices),
            local_index,
        }
    }

    /// Evaluate the potential at a point
    pub fn value(&self, x: &Vect3) -> f64 {
        self.potentials.value(x)[self.local_index]
    }
}

impl Integrand for AnalyticD {
    type Output = f64;
    fn evaluate(&self, x: &Vect3) -> f64 {
        self.value(x)
    }
}
