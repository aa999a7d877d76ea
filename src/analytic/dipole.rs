//! Fields of a current dipole in an infinite homogeneous medium
//!
//! With `r = x - r0` for a dipole at `r0` with moment `q`, the potential is `q·r / |r|³`.
use crate::analytic::TriangleFrame;
use crate::traits::{Integrand, Mesh};
use crate::types::Vect3;

/// The potential of a dipole
#[derive(Clone, Copy, Debug)]
pub struct DipolePotential {
    position: Vect3,
    moment: Vect3,
}

impl DipolePotential {
    /// Create the potential of a dipole at `position` with moment `moment`
    pub fn new(position: Vect3, moment: Vect3) -> Self {
        Self { position, moment }
    }
}

impl Integrand for DipolePotential {
    type Output = f64;
    fn evaluate(&self, x: &Vect3) -> f64 {
        let r = *x - self.position;
        self.moment.dot(&r) / r.norm().powi(3)
    }
}

/// The gradient of the potential of a dipole with respect to the dipole position
#[derive(Clone, Copy, Debug)]
pub struct DipolePotentialGrad {
    position: Vect3,
    moment: Vect3,
}

impl DipolePotentialGrad {
    /// Create the gradient for a dipole at `position` with moment `moment`
    pub fn new(position: Vect3, moment: Vect3) -> Self {
        Self { position, moment }
    }
}

impl Integrand for DipolePotentialGrad {
    type Output = Vect3;
    fn evaluate(&self, x: &Vect3) -> Vect3 {
        let r = *x - self.position;
        let inv_r2 = 1.0 / r.norm2();
        let inv_r3 = inv_r2.sqrt() * inv_r2;
        (r * (3.0 * self.moment.dot(&r) * inv_r2) - self.moment) * inv_r3
    }
}

/// The normal derivative of the potential of a dipole, weighted by the three linear basis
/// functions of a triangle
#[derive(Clone, Copy, Debug)]
pub struct DipolePotentialDerivative {
    position: Vect3,
    moment: Vect3,
    frame: TriangleFrame,
}

impl DipolePotentialDerivative {
    /// Create the weighted normal derivative on a triangle of a mesh
    pub fn new(position: Vect3, moment: Vect3, mesh: &impl Mesh, triangle: usize) -> Self {
        Self {
            position,
            moment,
            frame: TriangleFrame::new(mesh.triangle_points(triangle)),
        }
    }
}

impl Integrand for DipolePotentialDerivative {
    type Output = Vect3;
    fn evaluate(&self, x: &Vect3) -> Vect3 {
        let r = *x - self.position;
        let n = self.frame.normal;
        let inv_r2 = 1.0 / r.norm2();
        let inv_r3 = inv_r2.sqrt() * inv_r2;
        let derivative =
            (n.dot(&self.moment) - 3.0 * self.moment.dot(&r) * n.dot(&r) * inv_r2) * inv_r3;
        self.frame.basis_values(x) * derivative
    }
}

/// One component of the gradient with respect to the dipole position of
/// [DipolePotentialDerivative]
#[derive(Clone, Copy, Debug)]
pub struct DipolePotentialDerivativeGrad {
    position: Vect3,
    moment: Vect3,
    frame: TriangleFrame,
    axis: usize,
}

impl DipolePotentialDerivativeGrad {
    /// Create the component `axis` (0, 1 or 2) of the gradient on a triangle of a mesh
    pub fn new(
        position: Vect3,
        moment: Vect3,
        mesh: &impl Mesh,
        triangle: usize,
        axis: usize,
    ) -> Self {
        assert!(axis < 3, "Invalid axis: {axis}");
        Self {
            position,
            moment,
            frame: TriangleFrame::new(mesh.triangle_points(triangle)),
            axis,
        }
    }
}

impl Integrand for DipolePotentialDerivativeGrad {
    type Output = Vect3;
    fn evaluate(&self, x: &Vect3) -> Vect3 {
        let r = *x - self.position;
        let n = self.frame.normal;
        let q = self.moment;
        let a = n.dot(&q);
        let b = q.dot(&r);
        let c = n.dot(&r);
        let inv_r2 = 1.0 / r.norm2();
        let inv_r5 = inv_r2 * inv_r2 * inv_r2.sqrt();
        // gradient with respect to x of (a - 3bc/|r|²)/|r|³
        let gradient_x =
            (r * (15.0 * b * c * inv_r2 - 3.0 * a) - (q * c + n * b) * 3.0) * inv_r5;
        self.frame.basis_values(x) * -gradient_x[self.axis]
    }
}
