//! Operator kernels for one pair of mesh entities
//!
//! These are the entries of the boundary operators before they are placed in a matrix.
use crate::analytic::{AnalyticD, AnalyticD3, AnalyticS};
use crate::quadrature::Integrator;
use crate::traits::Mesh;
use crate::types::{KernelVariant, Vect3};
use itertools::iproduct;
use std::collections::HashMap;

/// Single layer entries of the rows of one mesh
///
/// The analytic potential of each row triangle is computed once and kept, so later entries of
/// the same triangle only integrate. An evaluator is used by a single task.
pub struct SingleLayerEvaluator<'a, M: Mesh> {
    mesh: &'a M,
    integrator: &'a Integrator,
    potentials: HashMap<usize, AnalyticS>,
}

impl<'a, M: Mesh> SingleLayerEvaluator<'a, M> {
    /// Create an evaluator for the triangles of `mesh`
    pub fn new(mesh: &'a M, integrator: &'a Integrator) -> Self {
        Self {
            mesh,
            integrator,
            potentials: HashMap::new(),
        }
    }

    /// The single layer entry of triangle `t1` of the evaluator mesh and triangle `t2` of `mesh2`
    pub fn value(&mut self, t1: usize, mesh2: &impl Mesh, t2: usize) -> f64 {
        let mesh = self.mesh;
        let potential = self.potentials.entry(t1);
        let potential = *potential.or_insert_with(|| AnalyticS::new(mesh, t1));
        let vertices = mesh2.triangle_points(t2);
        self.integrator.integrate(&potential, &vertices)
    }
}

/// The single layer entry `∫_{T2} ∫_{T1} 1/|x - y| dy dx` of two triangles
pub fn single_layer(
    mesh1: &impl Mesh,
    t1: usize,
    mesh2: &impl Mesh,
    t2: usize,
    integrator: &Integrator,
) -> f64 {
    integrator.integrate(&AnalyticS::new(mesh1, t1), &mesh2.triangle_points(t2))
}

/// The double layer entry of triangle `t1` of `mesh1` and the hat function of point `p2` of
/// `mesh2`
pub fn double_layer_point(
    mesh1: &impl Mesh,
    t1: usize,
    mesh2: &impl Mesh,
    p2: usize,
    integrator: &Integrator,
) -> f64 {
    let vertices = mesh1.triangle_points(t1);
    mesh2
        .triangles_for_point(p2)
        .iter()
        .filter_map(|t| {
            let local_index = mesh2.triangle(*t).local_index(p2)?;
            Some(integrator.integrate(&AnalyticD::new(mesh2, *t, local_index), &vertices))
        })
        .sum()
}

/// The contributions of triangle `t2` of `mesh2` to the double layer entries of triangle `t1`
/// of `mesh1` and the three hat functions of the vertices of `t2`
pub fn double_layer_triangle(
    mesh1: &impl Mesh,
    t1: usize,
    mesh2: &impl Mesh,
    t2: usize,
    integrator: &Integrator,
) -> Vect3 {
    integrator.integrate(&AnalyticD3::new(mesh2, t2), &mesh1.triangle_points(t1))
}

/// The factor that multiplies the single layer entry of `t1` and `t2` in the hypersingular
/// entry of `p1` and `p2`
pub fn hypersingular_weight(
    mesh1: &impl Mesh,
    t1: usize,
    p1: usize,
    mesh2: &impl Mesh,
    t2: usize,
    p2: usize,
    variant: KernelVariant,
) -> f64 {
    let triangle1 = mesh1.triangle(t1);
    let triangle2 = mesh2.triangle(t2);
    let (Some(l1), Some(l2)) = (triangle1.local_index(p1), triangle2.local_index(p2)) else {
        return 0.0;
    };
    match variant {
        KernelVariant::Optimized => {
            let cb1 = mesh1.point(triangle1.next(l1)) - mesh1.point(triangle1.prev(l1));
            let cb2 = mesh2.point(triangle2.next(l2)) - mesh2.point(triangle2.prev(l2));
            -0.25 / (triangle1.area() * triangle2.area()) * cb1.dot(&cb2)
        }
        KernelVariant::Reference => {
            // Surface curls of the hat functions, from the gradients normal to the opposite edges
            let curl1 = hat_gradient(mesh1, t1, l1).cross(&triangle1.normal());
            let curl2 = hat_gradient(mesh2, t2, l2).cross(&triangle2.normal());
            -curl1.dot(&curl2)
        }
    }
}

fn hat_gradient(mesh: &impl Mesh, triangle: usize, local_index: usize) -> Vect3 {
    let t = mesh.triangle(triangle);
    let p = mesh.point(t.vertices()[local_index]);
    let a = mesh.point(t.next(local_index));
    let b = mesh.point(t.prev(local_index));
    let ab = b - a;
    let foot = a + ab * ((p - a).dot(&ab) / ab.norm2());
    let aq = p - foot;
    aq / aq.norm2()
}

/// The hypersingular entry of the hat functions of `p1` of `mesh1` and `p2` of `mesh2`
///
/// `single_layer` gives the single layer entry of a triangle of `mesh1` and a triangle of
/// `mesh2`.
pub fn hypersingular(
    mesh1: &impl Mesh,
    p1: usize,
    mesh2: &impl Mesh,
    p2: usize,
    variant: KernelVariant,
    mut single_layer: impl FnMut(usize, usize) -> f64,
) -> f64 {
    iproduct!(mesh1.triangles_for_point(p1), mesh2.triangles_for_point(p2))
        .map(|(t1, t2)| {
            hypersingular_weight(mesh1, *t1, p1, mesh2, *t2, p2, variant) * single_layer(*t1, *t2)
        })
        .sum()
}

/// The integral over triangle `t` of the hat function of point `p`
pub fn p1p0(mesh: &impl Mesh, t: usize, p: usize) -> f64 {
    let triangle = mesh.triangle(t);
    if triangle.contains(p) {
        triangle.area() / 3.0
    } else {
        0.0
    }
}

/// The Ferguson entry of the hat function of point `p` at `x`
pub fn ferguson(x: &Vect3, mesh: &impl Mesh, p: usize) -> Vect3 {
    let point = mesh.point(p);
    mesh.triangles_for_point(p)
        .iter()
        .fold(Vect3::new(0.0, 0.0, 0.0), |total, t| {
            let triangle = mesh.triangle(*t);
            let Some(l) = triangle.local_index(p) else {
                return total;
            };
            let a = mesh.point(triangle.next(l));
            let b = mesh.point(triangle.prev(l));
            let potential = AnalyticS::from_points([point, a, b]).value(x);
            total + (b - a) * (-0.5 / triangle.area() * potential)
        })
}

/// The single layer potential of triangle `t` at a point
pub fn single_layer_internal(mesh: &impl Mesh, t: usize, x: &Vect3) -> f64 {
    AnalyticS::new(mesh, t).value(x)
}

/// The double layer potentials of the three hat functions of triangle `t` at a point
pub fn double_layer_internal(mesh: &impl Mesh, t: usize, x: &Vect3) -> Vect3 {
    AnalyticD3::new(mesh, t).value(x)
}
