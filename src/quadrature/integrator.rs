//! Integration of kernels over triangles
use crate::quadrature::simplex_rules::simplex_rule;
use crate::quadrature::types::{NumericalQuadratureDefinition, QuadratureError, QuadratureValue};
use crate::traits::Integrand;
use crate::types::{QuadraturePolicy, Vect3};
use log::warn;
use num::Zero;

/// Default absolute tolerance of adaptive integration
pub const DEFAULT_TOLERANCE: f64 = 0.005;
/// Default number of times a triangle may be subdivided during adaptive integration
pub const DEFAULT_MAX_DEPTH: usize = 16;

fn area(vertices: &[Vect3; 3]) -> f64 {
    0.5 * (vertices[1] - vertices[0])
        .cross(&(vertices[2] - vertices[0]))
        .norm()
}

/// Fixed order Gauss integration
#[derive(Clone, Copy)]
pub struct GaussIntegrator {
    rule: &'static NumericalQuadratureDefinition,
}

impl GaussIntegrator {
    /// Create an integrator using the rule of the given order
    pub fn new(order: usize) -> Result<Self, QuadratureError> {
        Ok(Self {
            rule: simplex_rule(order)?,
        })
    }

    /// The order of the rule
    pub fn order(&self) -> usize {
        self.rule.order
    }

    /// Integrate a kernel over the triangle with the given vertices
    pub fn integrate<I: Integrand>(&self, f: &I, vertices: &[Vect3; 3]) -> I::Output {
        let mut sum = I::Output::zero();
        for (x, w) in self.rule.mapped_points(vertices) {
            sum = sum + f.evaluate(&x) * w;
        }
        sum * area(vertices)
    }
}

/// Adaptive integration by recursive subdivision into four triangles
#[derive(Clone, Copy)]
pub struct AdaptiveIntegrator {
    gauss: GaussIntegrator,
    tolerance: f64,
    max_depth: usize,
}

impl AdaptiveIntegrator {
    /// Create an adaptive integrator
    pub fn new(order: usize, tolerance: f64) -> Result<Self, QuadratureError> {
        Ok(Self {
            gauss: GaussIntegrator::new(order)?,
            tolerance,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Set the maximum number of times a triangle may be subdivided
    ///
    /// Each branch of the subdivision is bounded separately.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// The absolute tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Integrate a kernel over the triangle with the given vertices
    pub fn integrate<I: Integrand>(&self, f: &I, vertices: &[Vect3; 3]) -> I::Output {
        let coarse = self.gauss.integrate(f, vertices);
        self.refine(f, vertices, coarse, 0)
    }

    fn refine<I: Integrand>(
        &self,
        f: &I,
        vertices: &[Vect3; 3],
        coarse: I::Output,
        depth: usize,
    ) -> I::Output {
        let [v0, v1, v2] = *vertices;
        let m01 = (v0 + v1) * 0.5;
        let m12 = (v1 + v2) * 0.5;
        let m02 = (v0 + v2) * 0.5;
        let children = [
            [v0, m01, m02],
            [m01, v1, m12],
            [m02, m12, v2],
            [m01, m12, m02],
        ];
        let parts = children.map(|c| self.gauss.integrate(f, &c));
        let fine = parts
            .iter()
            .fold(I::Output::zero(), |acc, part| acc + *part);

        if (coarse - fine).magnitude() <= self.tolerance || depth >= self.max_depth {
            return fine;
        }
        children
            .iter()
            .zip(parts)
            .fold(I::Output::zero(), |acc, (child, part)| {
                acc + self.refine(f, child, part, depth + 1)
            })
    }
}

/// An integrator chosen at run time
#[derive(Clone, Copy)]
pub enum Integrator {
    /// Fixed order Gauss integration
    Gauss(GaussIntegrator),
    /// Adaptive integration
    Adaptive(AdaptiveIntegrator),
}

impl Integrator {
    /// Create the integrator described by a quadrature policy
    pub fn new(order: usize, policy: QuadraturePolicy) -> Result<Self, QuadratureError> {
        match policy {
            QuadraturePolicy::Fixed => Ok(Self::Gauss(GaussIntegrator::new(order)?)),
            QuadraturePolicy::Adaptive { tolerance } => {
                if tolerance > 0.0 {
                    Ok(Self::Adaptive(AdaptiveIntegrator::new(order, tolerance)?))
                } else {
                    warn!("Adaptive quadrature with tolerance {tolerance} requested. Using a fixed rule instead.");
                    Ok(Self::Gauss(GaussIntegrator::new(order)?))
                }
            }
        }
    }

    /// Integrate a kernel over the triangle with the given vertices
    pub fn integrate<I: Integrand>(&self, f: &I, vertices: &[Vect3; 3]) -> I::Output {
        match self {
            Self::Gauss(g) => g.integrate(f, vertices),
            Self::Adaptive(a) => a.integrate(f, vertices),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytic::TriangleFrame;
    use approx::*;

    struct Linear(Vect3);
    impl Integrand for Linear {
        type Output = f64;
        fn evaluate(&self, x: &Vect3) -> f64 {
            1.0 + self.0.dot(x)
        }
    }

    struct InverseDistance(Vect3);
    impl Integrand for InverseDistance {
        type Output = f64;
        fn evaluate(&self, x: &Vect3) -> f64 {
            1.0 / (*x - self.0).norm()
        }
    }

    struct Position;
    impl Integrand for Position {
        type Output = Vect3;
        fn evaluate(&self, x: &Vect3) -> Vect3 {
            *x
        }
    }

    fn triangle() -> [Vect3; 3] {
        [
            Vect3::new(0.0, 0.0, 0.0),
            Vect3::new(2.0, 0.0, 0.0),
            Vect3::new(0.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_linear_is_exact() {
        let v = triangle();
        let f = Linear(Vect3::new(0.5, -1.0, 2.0));
        let centroid = (v[0] + v[1] + v[2]) / 3.0;
        let expected = area(&v) * f.evaluate(&centroid);
        for order in 0..4 {
            let g = GaussIntegrator::new(order).unwrap();
            assert_relative_eq!(g.integrate(&f, &v), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_vector_valued() {
        let v = triangle();
        let g = GaussIntegrator::new(2).unwrap();
        let result = g.integrate(&Position, &v);
        let expected = (v[0] + v[1] + v[2]) * (area(&v) / 3.0);
        assert_relative_eq!(result.x, expected.x, max_relative = 1e-12);
        assert_relative_eq!(result.y, expected.y, max_relative = 1e-12);
        assert_relative_eq!(result.z, expected.z, max_relative = 1e-12);
    }

    #[test]
    fn test_adaptive_improves_near_singular() {
        let v = triangle();
        // A point just above a vertex makes the integrand nearly singular
        let f = InverseDistance(Vect3::new(0.0, -0.01, 0.01));
        let reference = AdaptiveIntegrator::new(3, 1e-10).unwrap().integrate(&f, &v);
        let fixed = GaussIntegrator::new(3).unwrap().integrate(&f, &v);
        let adaptive = AdaptiveIntegrator::new(3, DEFAULT_TOLERANCE)
            .unwrap()
            .integrate(&f, &v);
        assert!((adaptive - reference).abs() < (fixed - reference).abs());
    }

    struct NormalDipole(Vect3);
    impl Integrand for NormalDipole {
        type Output = f64;
        fn evaluate(&self, x: &Vect3) -> f64 {
            let r = *x - self.0;
            r.z / r.norm().powi(3)
        }
    }

    #[test]
    fn test_adaptive_meets_tolerance_near_edge() {
        // The integral of a normal dipole over a flat triangle is the solid angle it subtends
        let v = [
            Vect3::new(0.0, 0.0, 0.0),
            Vect3::new(1.0, 0.0, 0.0),
            Vect3::new(0.0, 1.0, 0.0),
        ];
        let frame = TriangleFrame::new(v);
        let a = AdaptiveIntegrator::new(3, DEFAULT_TOLERANCE).unwrap();
        for height in [0.01, 0.002] {
            let position = Vect3::new(0.48, 0.48, -height);
            let reference = frame.solid_angle(&position).abs();
            let adaptive = a.integrate(&NormalDipole(position), &v);
            assert!(
                (adaptive - reference).abs() <= DEFAULT_TOLERANCE,
                "{adaptive} differs from {reference} at height {height}"
            );
        }
    }

    #[test]
    fn test_depth_is_bounded() {
        let v = triangle();
        let f = InverseDistance(Vect3::new(0.0, 0.0, 0.0));
        let mut a = AdaptiveIntegrator::new(0, 1e-14).unwrap();
        a.set_max_depth(0);
        let coarse = GaussIntegrator::new(0).unwrap();
        let children = [
            [v[0], (v[0] + v[1]) * 0.5, (v[0] + v[2]) * 0.5],
            [(v[0] + v[1]) * 0.5, v[1], (v[1] + v[2]) * 0.5],
            [(v[0] + v[2]) * 0.5, (v[1] + v[2]) * 0.5, v[2]],
            [(v[0] + v[1]) * 0.5, (v[1] + v[2]) * 0.5, (v[0] + v[2]) * 0.5],
        ];
        let expected = children.iter().map(|c| coarse.integrate(&f, c)).sum::<f64>();
        assert_relative_eq!(a.integrate(&f, &v), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_non_positive_tolerance_falls_back() {
        let i = Integrator::new(1, QuadraturePolicy::Adaptive { tolerance: 0.0 }).unwrap();
        assert!(matches!(i, Integrator::Gauss(_)));
    }

    #[test]
    fn test_unknown_order() {
        assert!(Integrator::new(12, QuadraturePolicy::Fixed).is_err());
    }
}
